//! Testing utilities.
//!
//! Scripted and failing stand-ins for the two remote collaborators, so the
//! fallback tiers can be exercised deterministically without any network.

use crate::dialogue::RemoteChat;
use crate::persist::{PersistError, StateStore};
use crate::state::GameState;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use supabase_lite::ChatRequest;

/// A remote chat tier that replays canned replies in order.
///
/// Once the script runs out it starts failing, which routes callers to the
/// keyword fallback. Every request is recorded for inspection.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The requests seen so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteChat for ScriptedChat {
    async fn chat(&self, request: ChatRequest) -> Result<String, supabase_lite::Error> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| supabase_lite::Error::Parse("no scripted replies left".to_string()))
    }
}

/// A remote chat tier that always fails.
pub struct FailingChat;

#[async_trait]
impl RemoteChat for FailingChat {
    async fn chat(&self, _request: ChatRequest) -> Result<String, supabase_lite::Error> {
        Err(supabase_lite::Error::Network(
            "connection refused".to_string(),
        ))
    }
}

/// An in-memory state store, with shared handles for assertions.
pub struct MemoryStore {
    slot: Arc<Mutex<Option<GameState>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the stored state.
    pub fn slot(&self) -> Arc<Mutex<Option<GameState>>> {
        self.slot.clone()
    }

    /// Handle to the number of completed saves.
    pub fn save_count(&self) -> Arc<AtomicUsize> {
        self.saves.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn save(&self, state: &GameState) -> Result<(), PersistError> {
        *self.slot.lock().unwrap() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self) -> Result<Option<GameState>, PersistError> {
        Ok(self.slot.lock().unwrap().clone())
    }
}

/// A state store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl StateStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn save(&self, _state: &GameState) -> Result<(), PersistError> {
        Err(PersistError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "store unavailable",
        )))
    }

    async fn load(&self) -> Result<Option<GameState>, PersistError> {
        Err(PersistError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "store unavailable",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_chat_replays_then_fails() {
        let chat = ScriptedChat::new(vec!["eerste".to_string(), "tweede".to_string()]);
        let request = ChatRequest {
            npc: supabase_lite::NpcProfile {
                name: "N".to_string(),
                role: "R".to_string(),
                description: String::new(),
            },
            message: "hallo".to_string(),
            scenario_id: "rampjaar".to_string(),
            conversation_history: vec![],
        };

        assert_eq!(chat.chat(request.clone()).await.unwrap(), "eerste");
        assert_eq!(chat.chat(request.clone()).await.unwrap(), "tweede");
        assert!(chat.chat(request).await.is_err());
        assert_eq!(chat.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(&GameState::new("rampjaar")).await.unwrap();
        assert_eq!(
            store.load().await.unwrap().unwrap().current_scenario,
            "rampjaar"
        );
        assert_eq!(store.save_count().load(Ordering::SeqCst), 1);
    }
}
