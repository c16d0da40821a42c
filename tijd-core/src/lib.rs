//! Tijd-Detective game engine.
//!
//! This crate provides:
//! - A catalog of historical scenarios with clues, NPCs, and year hints
//! - A game state store with scoring, completion, and win tracking
//! - A keyword dialogue engine with an optional remote AI tier
//! - Debounced remote/local persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use tijd_core::{GameSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::new(SessionConfig::new()).await?;
//!
//!     session.discover_clue("observe_1");
//!     let guess = session.guess_year(1672);
//!     println!("correct: {}", guess.is_correct);
//!
//!     if let Some(reply) = session.talk_to("burger_rampjaar", "Wat gebeurt er?").await {
//!         println!("{reply}");
//!     }
//!
//!     session.shutdown().await; // flushes the pending save
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod dialogue;
pub mod persist;
pub mod scenario;
pub mod session;
pub mod state;
pub mod testing;

// Primary public API
pub use catalog::{ScenarioCatalog, CLUE_POINTS};
pub use dialogue::{DialogueEngine, RemoteChat, HISTORY_WINDOW};
pub use persist::{
    Autosaver, LocalStore, PersistError, RemoteStore, SaveOutcome, SaveStack, StateStore,
    DEFAULT_SAVE_FILE, SAVE_DEBOUNCE, STATE_KEY,
};
pub use scenario::{
    Clue, ClueKind, Guess, GuessId, KeywordResponses, Message, MessageId, Npc, Scenario, Sender,
    YearHint,
};
pub use session::{GameSession, SessionConfig, SessionError};
pub use state::{GameState, GUESS_POINTS};
