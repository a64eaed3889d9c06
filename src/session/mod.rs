//! Session persistence: the recoverable part of an agent's state.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::memory::CoreMemorySection;
use crate::types::Message;

pub use store::{FileSessionStore, SessionStore, SessionStoreConfig};

/// Current on-disk snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to resume a session: core memory plus the full
/// conversation. Tools are code and are re-registered on restore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub version: u32,
    pub persona: String,
    pub heartbeat: bool,
    pub memory: Vec<CoreMemorySection>,
    pub messages: Vec<Message>,
    pub saved_at: DateTime<Utc>,
}
