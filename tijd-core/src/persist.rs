//! Game state persistence.
//!
//! Two backends behind one trait: the Supabase `game_states` table and a
//! local JSON file. A `SaveStack` tries them in order and the first backend
//! that succeeds wins; failures are logged, never surfaced, so the worst
//! case is an in-memory-only session. The `Autosaver` coalesces the
//! save-after-every-mutation stream into at most one write per debounce
//! window, keeping only the latest state (last writer wins).

use crate::state::GameState;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Fixed key under which the whole game state is stored remotely.
pub const STATE_KEY: &str = "current_game";

/// Default local save file name.
pub const DEFAULT_SAVE_FILE: &str = "tijd-detective-game-state.json";

/// Trailing debounce window for coalescing saves.
pub const SAVE_DEBOUNCE: Duration = Duration::from_secs(1);

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Remote store error: {0}")]
    Remote(#[from] supabase_lite::Error),
}

/// One persistence backend.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Short backend name for logs and save outcomes.
    fn name(&self) -> &'static str;

    async fn save(&self, state: &GameState) -> Result<(), PersistError>;

    /// Load the stored state. `Ok(None)` means nothing is stored.
    async fn load(&self) -> Result<Option<GameState>, PersistError>;
}

/// Remote backend: the `game_states` table, one row under [`STATE_KEY`].
pub struct RemoteStore {
    client: supabase_lite::Client,
    key: String,
}

impl RemoteStore {
    pub fn new(client: supabase_lite::Client) -> Self {
        Self {
            client,
            key: STATE_KEY.to_string(),
        }
    }
}

#[async_trait]
impl StateStore for RemoteStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn save(&self, state: &GameState) -> Result<(), PersistError> {
        let value = serde_json::to_value(state)?;
        self.client.upsert_state(&self.key, &value).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<GameState>, PersistError> {
        match self.client.fetch_state(&self.key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

/// Local backend: one JSON file on disk.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn save(&self, state: &GameState) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<GameState>, PersistError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // A corrupt save file reads as absent; starting fresh beats failing.
        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed save file");
                Ok(None)
            }
        }
    }
}

/// An ordered list of backends: saves and loads try each in turn.
pub struct SaveStack {
    stores: Vec<Box<dyn StateStore>>,
}

/// Where a save ended up, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { backend: &'static str },
    Failed,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

impl SaveStack {
    pub fn new(stores: Vec<Box<dyn StateStore>>) -> Self {
        Self { stores }
    }

    /// Local file only.
    pub fn local_only(path: impl Into<PathBuf>) -> Self {
        Self::new(vec![Box::new(LocalStore::new(path))])
    }

    /// Remote-preferred when Supabase is configured in the environment,
    /// with the local file as the fallback tier either way.
    pub fn from_env(local_path: impl Into<PathBuf>) -> Self {
        let mut stores: Vec<Box<dyn StateStore>> = Vec::new();
        if let Ok(client) = supabase_lite::Client::from_env() {
            stores.push(Box::new(RemoteStore::new(client)));
        }
        stores.push(Box::new(LocalStore::new(local_path)));
        Self::new(stores)
    }

    /// Save to the first backend that accepts the write.
    pub async fn save(&self, state: &GameState) -> SaveOutcome {
        for store in &self.stores {
            match store.save(state).await {
                Ok(()) => {
                    debug!(backend = store.name(), "game state saved");
                    return SaveOutcome::Saved {
                        backend: store.name(),
                    };
                }
                Err(e) => {
                    warn!(backend = store.name(), error = %e, "save failed, trying next backend");
                }
            }
        }
        warn!("all save backends failed; continuing in memory only");
        SaveOutcome::Failed
    }

    /// Load from the first backend that has a state. Backend errors fall
    /// through to the next tier; `None` means no prior session anywhere.
    pub async fn load(&self) -> Option<GameState> {
        for store in &self.stores {
            match store.load().await {
                Ok(Some(state)) => {
                    debug!(backend = store.name(), "game state loaded");
                    return Some(state);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(backend = store.name(), error = %e, "load failed, trying next backend");
                }
            }
        }
        None
    }
}

/// Background task that coalesces save requests.
///
/// Every scheduled state replaces the previous pending one; a write only
/// happens once the stream has been quiet for [`SAVE_DEBOUNCE`], or at
/// shutdown, which flushes whatever is still pending.
pub struct Autosaver {
    tx: mpsc::UnboundedSender<GameState>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    pub fn spawn(stack: Arc<SaveStack>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<GameState>();

        let handle = tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    match tokio::time::timeout(SAVE_DEBOUNCE, rx.recv()).await {
                        // Newer state within the window: keep it, restart the window.
                        Ok(Some(next)) => latest = next,
                        // Channel closed: flush and stop.
                        Ok(None) => {
                            stack.save(&latest).await;
                            return;
                        }
                        // Quiet for a full window: write.
                        Err(_) => break,
                    }
                }
                stack.save(&latest).await;
            }
        });

        Self { tx, handle }
    }

    /// Queue the given state for saving. Cheap; never blocks.
    pub fn schedule(&self, state: &GameState) {
        // A closed channel only happens after shutdown; nothing to do then.
        let _ = self.tx.send(state.clone());
    }

    /// Flush any pending save and stop the task.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScenarioCatalog;
    use crate::testing::{FailingStore, MemoryStore};
    use tempfile::TempDir;

    fn sample_state() -> GameState {
        let catalog = ScenarioCatalog::builtin();
        let scenario = catalog.get("rampjaar").unwrap();
        let mut state = GameState::new("rampjaar");
        state.discover_clue(scenario, "observe_1");
        state.record_guess(scenario, 1671, catalog.len());
        state
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("save.json"));

        let state = sample_state();
        store.save(&state).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.current_scenario, "rampjaar");
        assert_eq!(loaded.score, state.score);
        assert_eq!(loaded.discovered_clues, state.discovered_clues);
        assert_eq!(loaded.guesses[0].hint, state.guesses[0].hint);
    }

    #[tokio::test]
    async fn test_local_store_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("nothing.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_store_malformed_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = LocalStore::new(path);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_store_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("nested/dir/save.json"));
        store.save(&sample_state()).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_save_stack_falls_through_on_failure() {
        let memory = MemoryStore::new();
        let slot = memory.slot();
        let stack = SaveStack::new(vec![Box::new(FailingStore), Box::new(memory)]);

        let outcome = stack.save(&sample_state()).await;
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                backend: "memory"
            }
        );
        assert!(slot.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_stack_all_backends_failing() {
        let stack = SaveStack::new(vec![Box::new(FailingStore), Box::new(FailingStore)]);
        let outcome = stack.save(&sample_state()).await;
        assert_eq!(outcome, SaveOutcome::Failed);
        assert!(!outcome.is_saved());
    }

    #[tokio::test]
    async fn test_load_skips_failing_backend() {
        let memory = MemoryStore::new();
        *memory.slot().lock().unwrap() = Some(sample_state());
        let stack = SaveStack::new(vec![Box::new(FailingStore), Box::new(memory)]);

        let loaded = stack.load().await.unwrap();
        assert_eq!(loaded.current_scenario, "rampjaar");
    }

    #[tokio::test]
    async fn test_load_absent_everywhere() {
        let stack = SaveStack::new(vec![Box::new(MemoryStore::new())]);
        assert!(stack.load().await.is_none());
    }

    #[tokio::test]
    async fn test_autosaver_coalesces_to_latest() {
        let memory = MemoryStore::new();
        let slot = memory.slot();
        let saves = memory.save_count();
        let stack = Arc::new(SaveStack::new(vec![Box::new(memory)]));

        let autosaver = Autosaver::spawn(stack);

        let mut state = GameState::new("rampjaar");
        autosaver.schedule(&state);
        state.travel_to("provo");
        autosaver.schedule(&state);
        state.travel_to("hongerwinter");
        autosaver.schedule(&state);

        // Shutdown flushes the pending save without waiting out the window.
        autosaver.shutdown().await;

        assert_eq!(saves.load(std::sync::atomic::Ordering::SeqCst), 1);
        let saved = slot.lock().unwrap().clone().unwrap();
        assert_eq!(saved.current_scenario, "hongerwinter");
    }

    #[tokio::test]
    async fn test_autosaver_shutdown_with_nothing_pending() {
        let memory = MemoryStore::new();
        let saves = memory.save_count();
        let stack = Arc::new(SaveStack::new(vec![Box::new(memory)]));

        let autosaver = Autosaver::spawn(stack);
        autosaver.shutdown().await;

        assert_eq!(saves.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
