//! Tests for saving and resuming sessions.

mod common;

use serde_json::json;
use tempfile::TempDir;

use common::{agent_with, builtin_registry, ScriptedProvider};
use heartloop::agent::AgentState;
use heartloop::agent_loop::Agent;
use heartloop::error::HeartloopError;
use heartloop::session::{FileSessionStore, SessionStore, SessionStoreConfig};
use heartloop::types::{Message, ToolResult};

fn temp_store() -> (TempDir, FileSessionStore) {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(SessionStoreConfig::new(dir.path().to_path_buf()));
    (dir, store)
}

#[tokio::test]
async fn saved_session_resumes_with_memory_and_history() {
    let (_dir, store) = temp_store();

    let provider = ScriptedProvider::new();
    provider.queue_tool_use(
        "m1",
        "coreMemoryAppend",
        json!({"section": "User", "newContent": "name: Bob", "requestHeartbeat": true}),
    );
    provider.queue_text("Nice to meet you, Bob.");
    let mut agent = agent_with(provider.clone());
    agent.run("I'm Bob.").await.unwrap();
    store.save("bob", &agent.state().snapshot()).unwrap();

    let snapshot = store.load("bob").unwrap().unwrap();
    let state = AgentState::restore(snapshot, builtin_registry()).unwrap();
    assert_eq!(state.memory.get("User"), Some("\nname: Bob"));
    assert_eq!(state.conversation.len(), 4);

    let resumed_provider = ScriptedProvider::new();
    resumed_provider.queue_text("Your name is Bob.");
    let mut resumed = Agent::new(resumed_provider.clone(), state);
    let result = resumed.run("What's my name?").await.unwrap();

    assert_eq!(result.output, "Your name is Bob.");
    let request = &resumed_provider.requests()[0];
    assert_eq!(request.messages.len(), 5);
    assert!(request.system.contains("name: Bob"));
}

#[test]
fn tampered_snapshot_is_rejected_on_restore() {
    let (_dir, store) = temp_store();
    let mut snapshot = AgentState::default().snapshot();
    snapshot.messages.push(Message::user("hi"));
    snapshot
        .messages
        .push(Message::tool_result(ToolResult::new("ghost", "getWeather", "10")));
    store.save("bad", &snapshot).unwrap();

    let loaded = store.load("bad").unwrap().unwrap();
    let err = AgentState::restore(loaded, builtin_registry()).unwrap_err();

    assert!(matches!(err, HeartloopError::ProtocolViolation(_)));
}

#[test]
fn unknown_session_loads_as_none() {
    let (_dir, store) = temp_store();
    assert!(store.load("never-saved").unwrap().is_none());
}
