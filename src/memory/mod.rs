//! Core memory: named text sections the model sees on every round.
//!
//! Sections are declared up front and are never removed during a session.
//! They change only through [`CoreMemory::append`] and
//! [`CoreMemory::replace`], which the built-in memory tools call.

use serde::{Deserialize, Serialize};

use crate::error::{HeartloopError, Result};

pub const USER_SECTION: &str = "User";
pub const AGENT_SECTION: &str = "Agent";

/// A named, independently mutable region of core memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreMemorySection {
    pub name: String,
    pub data: String,
}

/// Ordered set of memory sections. Order is declaration order and is the
/// order [`CoreMemory::render`] emits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreMemory {
    sections: Vec<CoreMemorySection>,
}

impl CoreMemory {
    /// Empty memory with no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory with the user-facing and agent-facing sections, both empty.
    pub fn with_default_sections() -> Self {
        Self::new()
            .with_section(USER_SECTION, "")
            .with_section(AGENT_SECTION, "")
    }

    /// Builder: declare a section. Redeclaring a name overwrites its data.
    pub fn with_section(mut self, name: impl Into<String>, data: impl Into<String>) -> Self {
        let name = name.into();
        let data = data.into();
        match self.sections.iter().position(|s| s.name == name) {
            Some(index) => self.sections[index].data = data,
            None => self.sections.push(CoreMemorySection { name, data }),
        }
        self
    }

    /// Rebuild memory from persisted sections, rejecting duplicate names.
    pub fn from_sections(sections: Vec<CoreMemorySection>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for section in &sections {
            if !seen.insert(section.name.as_str()) {
                return Err(HeartloopError::Configuration(format!(
                    "duplicate memory section '{}'",
                    section.name
                )));
            }
        }
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[CoreMemorySection] {
        &self.sections
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.data.as_str())
    }

    /// Append `"\n" + text` to a section. Repeated calls accumulate.
    pub fn append(&mut self, section: &str, text: &str) -> Result<&str> {
        let section = self.section_mut(section)?;
        section.data.push('\n');
        section.data.push_str(text);
        Ok(&section.data)
    }

    /// Replace every literal occurrence of `old` with `new`.
    ///
    /// Returns whether the section changed. An absent (or empty) `old`
    /// leaves the section untouched and is not an error.
    pub fn replace(&mut self, section: &str, old: &str, new: &str) -> Result<bool> {
        let section = self.section_mut(section)?;
        if old.is_empty() || !section.data.contains(old) {
            return Ok(false);
        }
        section.data = section.data.replace(old, new);
        Ok(true)
    }

    /// Deterministic `"<name>:\n<data>\n"` per section, in declaration order.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("{}:\n{}\n", s.name, s.data))
            .collect()
    }

    fn section_mut(&mut self, name: &str) -> Result<&mut CoreMemorySection> {
        self.sections
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| HeartloopError::UnknownSection(name.to_string()))
    }
}
