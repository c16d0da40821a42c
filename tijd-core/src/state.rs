//! Player game state and its transitions.
//!
//! `GameState` is the single mutable value of the game. It is only changed
//! through the methods here, each of which keeps the scoring invariants:
//! a clue id is discovered at most once, a scenario is completed iff a
//! correct guess for it was recorded, the win flag tracks completion of the
//! whole catalog, and `score` is the sum of all awarded clue and guess
//! points.

use crate::scenario::{Clue, Guess, GuessId, Message, Scenario};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points awarded for a correct year guess.
pub const GUESS_POINTS: u32 = 100;

/// All mutable progress for one play session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Id of the scenario the player is currently in.
    pub current_scenario: String,

    /// Ids of clues the player has found, in discovery order.
    pub discovered_clues: Vec<String>,

    /// Conversation log per NPC id. Append-only, in call order.
    pub conversations: HashMap<String, Vec<Message>>,

    /// Every guess ever made, across all scenarios.
    pub guesses: Vec<Guess>,

    /// Cumulative score from clues and correct guesses.
    pub score: u32,

    /// Ids of scenarios solved with a correct guess. Never shrinks.
    pub completed_scenarios: Vec<String>,

    /// Set when every scenario in the catalog has been completed.
    /// Cleared only by an explicit `continue_playing`.
    pub is_game_won: bool,
}

impl GameState {
    /// Fresh state positioned at the given scenario.
    pub fn new(starting_scenario: impl Into<String>) -> Self {
        Self {
            current_scenario: starting_scenario.into(),
            discovered_clues: Vec::new(),
            conversations: HashMap::new(),
            guesses: Vec::new(),
            score: 0,
            completed_scenarios: Vec::new(),
            is_game_won: false,
        }
    }

    /// Mark a clue as discovered and award its points.
    ///
    /// Idempotent: rediscovering a clue changes nothing. An id that does
    /// not exist in the scenario is a silent no-op as well; stale ids from
    /// an old save must not corrupt the score. Returns the clue when it was
    /// newly discovered.
    pub fn discover_clue<'a>(&mut self, scenario: &'a Scenario, clue_id: &str) -> Option<&'a Clue> {
        if self.discovered_clues.iter().any(|id| id == clue_id) {
            return None;
        }

        let clue = scenario.clue(clue_id)?;
        self.discovered_clues.push(clue.id.clone());
        self.score += clue.points;
        Some(clue)
    }

    /// Whether the player has discovered the given clue.
    pub fn has_discovered(&self, clue_id: &str) -> bool {
        self.discovered_clues.iter().any(|id| id == clue_id)
    }

    /// Evaluate a year guess against the scenario and record it.
    ///
    /// Correctness is an exact integer match with no tolerance band; this
    /// method performs no range validation, that belongs to the input
    /// surface. On a miss, the first hint range in declared order that
    /// contains the year is attached. The attempt is logged even when the
    /// scenario was already solved. Completion and the win flag only ever
    /// move forward here; `total_scenarios` is the catalog size used for
    /// the win check.
    pub fn record_guess(
        &mut self,
        scenario: &Scenario,
        year: i32,
        total_scenarios: usize,
    ) -> Guess {
        let is_correct = year == scenario.target_year;
        let hint = if is_correct {
            None
        } else {
            scenario.hint_for(year).map(|h| h.hint.clone())
        };

        let guess = Guess {
            id: GuessId::new(),
            scenario_id: scenario.id.clone(),
            year,
            is_correct,
            hint,
            timestamp: Utc::now(),
            points: if is_correct { GUESS_POINTS } else { 0 },
        };

        self.score += guess.points;
        self.guesses.push(guess.clone());

        if is_correct && !self.is_scenario_complete(&scenario.id) {
            self.completed_scenarios.push(scenario.id.clone());
            if self.completed_scenarios.len() == total_scenarios {
                self.is_game_won = true;
            }
        }

        guess
    }

    /// Append a message to an NPC's conversation log.
    pub fn append_message(&mut self, npc_id: &str, message: Message) {
        self.conversations
            .entry(npc_id.to_string())
            .or_default()
            .push(message);
    }

    /// The conversation log for an NPC (empty if they never talked).
    pub fn conversation(&self, npc_id: &str) -> &[Message] {
        self.conversations
            .get(npc_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Move to another scenario. Progress is kept; moving to the current
    /// scenario is a no-op. Returns whether the move happened.
    pub fn travel_to(&mut self, scenario_id: &str) -> bool {
        if scenario_id == self.current_scenario {
            return false;
        }
        self.current_scenario = scenario_id.to_string();
        true
    }

    /// Clear the win flag so play can continue. Completed scenarios and
    /// score are untouched.
    pub fn continue_playing(&mut self) {
        self.is_game_won = false;
    }

    pub fn is_scenario_complete(&self, scenario_id: &str) -> bool {
        self.completed_scenarios.iter().any(|id| id == scenario_id)
    }

    /// Guesses recorded for one scenario, in order.
    pub fn scenario_guesses<'a>(&'a self, scenario_id: &'a str) -> impl Iterator<Item = &'a Guess> {
        self.guesses
            .iter()
            .filter(move |g| g.scenario_id == scenario_id)
    }

    /// Points earned within one scenario: its discovered clues plus its
    /// guess points.
    pub fn scenario_score(&self, scenario: &Scenario) -> u32 {
        let clue_points: u32 = scenario
            .clues
            .iter()
            .filter(|c| self.has_discovered(&c.id))
            .map(|c| c.points)
            .sum();
        let guess_points: u32 = self.scenario_guesses(&scenario.id).map(|g| g.points).sum();
        clue_points + guess_points
    }
}
