//! GameSession - the primary public API for playing Tijd-Detective.
//!
//! Wraps the scenario catalog, the game state, the dialogue engine, and
//! persistence into a single owning context. Every mutation goes through a
//! method here, and every method schedules a debounced save afterwards;
//! the state itself is always updated synchronously, only the dialogue
//! reply and the saves are asynchronous.

use crate::catalog::ScenarioCatalog;
use crate::dialogue::DialogueEngine;
use crate::persist::{Autosaver, PersistError, SaveOutcome, SaveStack, DEFAULT_SAVE_FILE};
use crate::scenario::{Clue, Guess, Message, Scenario};
use crate::state::GameState;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Configuration for creating a new game session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Path of the local save file.
    pub save_path: PathBuf,

    /// Scenario to start in when there is no prior save.
    pub starting_scenario: Option<String>,

    /// Whether to use remote services when the environment configures them.
    pub use_remote: bool,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_FILE),
            starting_scenario: None,
            use_remote: true,
        }
    }

    /// Set the local save file path.
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    /// Set the starting scenario for fresh sessions.
    pub fn with_starting_scenario(mut self, id: impl Into<String>) -> Self {
        self.starting_scenario = Some(id.into());
        self
    }

    /// Disable remote dialogue and persistence regardless of environment.
    pub fn local_only(mut self) -> Self {
        self.use_remote = false;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A running game: the owning context for all state transitions.
pub struct GameSession {
    catalog: ScenarioCatalog,
    state: GameState,
    dialogue: DialogueEngine,
    stack: Arc<SaveStack>,
    autosaver: Autosaver,
}

impl GameSession {
    /// Create a session: load the prior state if any backend has one,
    /// otherwise start fresh at the configured scenario.
    pub async fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let catalog = ScenarioCatalog::builtin();

        if let Some(ref id) = config.starting_scenario {
            if catalog.get(id).is_none() {
                return Err(SessionError::UnknownScenario(id.clone()));
            }
        }

        let stack = if config.use_remote {
            SaveStack::from_env(&config.save_path)
        } else {
            SaveStack::local_only(&config.save_path)
        };

        let dialogue = if config.use_remote {
            DialogueEngine::from_env()
        } else {
            DialogueEngine::local_only()
        };

        let loaded = stack.load().await;
        let starting = config
            .starting_scenario
            .as_deref()
            .unwrap_or(&catalog.first().id)
            .to_string();
        let state = restore_or_default(&catalog, loaded, &starting);

        Ok(Self::from_parts(catalog, state, dialogue, stack))
    }

    /// Assemble a session from explicit parts. Used by tests and by
    /// front-ends that build their own persistence stack.
    pub fn from_parts(
        catalog: ScenarioCatalog,
        state: GameState,
        dialogue: DialogueEngine,
        stack: SaveStack,
    ) -> Self {
        let stack = Arc::new(stack);
        let autosaver = Autosaver::spawn(stack.clone());
        Self {
            catalog,
            state,
            dialogue,
            stack,
            autosaver,
        }
    }

    /// The scenario the player is currently in.
    pub fn current_scenario(&self) -> &Scenario {
        self.catalog
            .get(&self.state.current_scenario)
            .unwrap_or_else(|| self.catalog.first())
    }

    /// Discover a clue in the current scenario.
    ///
    /// Idempotent; unknown ids are silent no-ops. Returns the clue when it
    /// was newly discovered.
    pub fn discover_clue(&mut self, clue_id: &str) -> Option<Clue> {
        let scenario_id = self.state.current_scenario.clone();
        let scenario = self.catalog.get(&scenario_id)?;
        let clue = self.state.discover_clue(scenario, clue_id).cloned();
        if clue.is_some() {
            self.autosaver.schedule(&self.state);
        }
        clue
    }

    /// Submit a year guess for the current scenario.
    ///
    /// No range check here; the input surface constrains the year before
    /// it reaches the evaluator.
    pub fn guess_year(&mut self, year: i32) -> Guess {
        let scenario_id = self.state.current_scenario.clone();
        let total = self.catalog.len();
        let scenario = self
            .catalog
            .get(&scenario_id)
            .unwrap_or_else(|| self.catalog.first());
        let guess = self.state.record_guess(scenario, year, total);
        self.autosaver.schedule(&self.state);
        guess
    }

    /// Talk to an NPC in the current scenario.
    ///
    /// The player message is logged before the dialogue call, the NPC reply
    /// after it resolves, so each conversation stays in call order. An
    /// unknown NPC id is a no-op and returns `None`.
    pub async fn talk_to(&mut self, npc_id: &str, message: &str) -> Option<String> {
        let scenario_id = self.state.current_scenario.clone();
        let npc = self.catalog.get(&scenario_id)?.npc(npc_id)?.clone();

        self.state.append_message(&npc.id, Message::player(message));
        self.autosaver.schedule(&self.state);

        let history = self.state.conversation(&npc.id).to_vec();
        let reply = self
            .dialogue
            .respond(&npc, message, &scenario_id, &history)
            .await;

        self.state.append_message(&npc.id, Message::npc(reply.clone()));
        self.autosaver.schedule(&self.state);
        Some(reply)
    }

    /// Travel to another scenario. Unknown ids and the current scenario
    /// are no-ops; returns whether the move happened.
    pub fn travel_to(&mut self, scenario_id: &str) -> bool {
        if self.catalog.get(scenario_id).is_none() {
            return false;
        }
        let moved = self.state.travel_to(scenario_id);
        if moved {
            self.autosaver.schedule(&self.state);
        }
        moved
    }

    /// Clear the win flag and keep playing.
    pub fn continue_playing(&mut self) {
        self.state.continue_playing();
        self.autosaver.schedule(&self.state);
    }

    /// Save immediately, bypassing the debounce window.
    pub async fn save_now(&self) -> SaveOutcome {
        self.stack.save(&self.state).await
    }

    /// Flush any pending save and tear the session down.
    pub async fn shutdown(self) {
        self.autosaver.shutdown().await;
    }

    // ========================================================================
    // State queries
    // ========================================================================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_game_won(&self) -> bool {
        self.state.is_game_won
    }

    pub fn is_current_scenario_complete(&self) -> bool {
        self.state
            .is_scenario_complete(&self.state.current_scenario)
    }

    /// Points earned in the current scenario.
    pub fn current_scenario_score(&self) -> u32 {
        self.state.scenario_score(self.current_scenario())
    }
}

/// Use the loaded state if it is usable, else start fresh.
///
/// A save naming a scenario that no longer exists keeps its progress but is
/// repositioned at the starting scenario.
fn restore_or_default(
    catalog: &ScenarioCatalog,
    loaded: Option<GameState>,
    starting: &str,
) -> GameState {
    match loaded {
        Some(mut state) => {
            if catalog.get(&state.current_scenario).is_none() {
                warn!(
                    scenario = %state.current_scenario,
                    "saved scenario not in catalog, repositioning"
                );
                state.current_scenario = starting.to_string();
            }
            state
        }
        None => GameState::new(starting),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::SaveStack;
    use crate::testing::{MemoryStore, ScriptedChat};

    fn test_session() -> GameSession {
        let catalog = ScenarioCatalog::builtin();
        let state = GameState::new(&catalog.first().id);
        GameSession::from_parts(
            catalog,
            state,
            DialogueEngine::local_only(),
            SaveStack::new(vec![Box::new(MemoryStore::new())]),
        )
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::new()
            .with_save_path("/tmp/save.json")
            .with_starting_scenario("provo")
            .local_only();

        assert_eq!(config.save_path, PathBuf::from("/tmp/save.json"));
        assert_eq!(config.starting_scenario.as_deref(), Some("provo"));
        assert!(!config.use_remote);
    }

    #[tokio::test]
    async fn test_discovery_and_guess_flow() {
        let mut session = test_session();
        assert_eq!(session.current_scenario().id, "rampjaar");

        assert!(session.discover_clue("observe_1").is_some());
        assert!(session.discover_clue("observe_1").is_none());
        assert_eq!(session.score(), 10);

        let miss = session.guess_year(1700);
        assert!(!miss.is_correct);
        assert!(miss.hint.is_none());

        let hit = session.guess_year(1672);
        assert!(hit.is_correct);
        assert!(session.is_current_scenario_complete());
        assert_eq!(session.score(), 110);
        assert_eq!(session.current_scenario_score(), 110);

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_winning_the_game() {
        let mut session = test_session();

        let ids: Vec<(String, i32)> = session
            .catalog()
            .scenarios()
            .iter()
            .map(|s| (s.id.clone(), s.target_year))
            .collect();

        for (id, year) in ids {
            session.travel_to(&id);
            session.guess_year(year);
        }

        assert!(session.is_game_won());
        session.continue_playing();
        assert!(!session.is_game_won());
        assert_eq!(session.state().completed_scenarios.len(), 6);

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_travel_guards() {
        let mut session = test_session();
        assert!(!session.travel_to("atlantis"));
        assert!(!session.travel_to("rampjaar"));
        assert!(session.travel_to("provo"));
        assert_eq!(session.current_scenario().id, "provo");
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_talk_to_logs_both_sides_in_order() {
        let catalog = ScenarioCatalog::builtin();
        let state = GameState::new(&catalog.first().id);
        let mut session = GameSession::from_parts(
            catalog,
            state,
            DialogueEngine::with_remote(Box::new(ScriptedChat::new(vec![
                "Het water beschermt ons.".to_string(),
            ]))),
            SaveStack::new(vec![Box::new(MemoryStore::new())]),
        );

        let reply = session
            .talk_to("burger_rampjaar", "Vertel over het water")
            .await
            .unwrap();
        assert_eq!(reply, "Het water beschermt ons.");

        let log = session.state().conversation("burger_rampjaar");
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].content, "Vertel over het water");
        assert_eq!(log[1].content, "Het water beschermt ons.");

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_talk_to_unknown_npc_is_noop() {
        let mut session = test_session();
        assert!(session.talk_to("spook", "Hallo?").await.is_none());
        assert!(session.state().conversations.is_empty());
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_save_now_and_restore() {
        let memory = MemoryStore::new();
        let slot = memory.slot();

        let catalog = ScenarioCatalog::builtin();
        let mut session = GameSession::from_parts(
            catalog,
            GameState::new("rampjaar"),
            DialogueEngine::local_only(),
            SaveStack::new(vec![Box::new(memory)]),
        );

        session.discover_clue("observe_1");
        session.guess_year(1672);
        let outcome = session.save_now().await;
        assert!(outcome.is_saved());
        session.shutdown().await;

        let saved = slot.lock().unwrap().clone().unwrap();
        let catalog = ScenarioCatalog::builtin();
        let restored = restore_or_default(&catalog, Some(saved), &catalog.first().id);
        assert_eq!(restored.score, 110);
        assert!(restored.is_scenario_complete("rampjaar"));
    }

    #[test]
    fn test_restore_repositions_unknown_scenario() {
        let catalog = ScenarioCatalog::builtin();
        let mut stale = GameState::new("verwijderd_scenario");
        stale.score = 40;

        let restored = restore_or_default(&catalog, Some(stale), "rampjaar");
        assert_eq!(restored.current_scenario, "rampjaar");
        assert_eq!(restored.score, 40); // progress survives repositioning
    }

    #[test]
    fn test_restore_default_when_absent() {
        let catalog = ScenarioCatalog::builtin();
        let fresh = restore_or_default(&catalog, None, "provo");
        assert_eq!(fresh.current_scenario, "provo");
        assert_eq!(fresh.score, 0);
    }
}
