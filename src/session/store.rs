use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{SessionSnapshot, SNAPSHOT_VERSION};
use crate::error::{HeartloopError, Result};

/// Storage abstraction for saved sessions.
pub trait SessionStore: Send + Sync {
    fn load(&self, name: &str) -> Result<Option<SessionSnapshot>>;
    fn save(&self, name: &str, snapshot: &SessionSnapshot) -> Result<()>;
    fn delete(&self, name: &str) -> Result<()>;
}

/// Configuration for file-backed session storage.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    pub base_dir: PathBuf,
}

impl SessionStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> PathBuf {
        default_sessions_dir()
    }
}

/// One pretty-printed JSON file per session.
///
/// # Example
/// ```no_run
/// use heartloop::agent::AgentState;
/// use heartloop::session::{FileSessionStore, SessionStore};
///
/// let store = FileSessionStore::new_default();
/// let state = AgentState::builder().build();
/// store.save("default", &state.snapshot())?;
/// # Ok::<(), heartloop::error::HeartloopError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            base_dir: config.base_dir,
        }
    }

    pub fn new_default() -> Self {
        Self {
            base_dir: default_sessions_dir(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn session_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", normalize_label(name)))
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, name: &str) -> Result<Option<SessionSnapshot>> {
        let path = self.session_path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot: SessionSnapshot = serde_json::from_str(&raw)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(HeartloopError::Configuration(format!(
                "session '{name}' was saved with format version {}, newest supported is {SNAPSHOT_VERSION}",
                snapshot.version
            )));
        }
        debug!(session = name, messages = snapshot.messages.len(), "loaded session");
        Ok(Some(snapshot))
    }

    fn save(&self, name: &str, snapshot: &SessionSnapshot) -> Result<()> {
        let path = self.session_path(name);
        Self::ensure_parent(&path)?;
        let serialized = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, serialized)?;
        debug!(session = name, path = %path.display(), "saved session");
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.session_path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn default_sessions_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".heartloop").join("sessions"))
        .unwrap_or_else(|| PathBuf::from(".heartloop").join("sessions"))
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let out: String = trimmed
        .chars()
        .map(|ch| {
            let lower = ch.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || lower == '-' || lower == '_' {
                lower
            } else {
                '-'
            }
        })
        .collect();
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}
