//! Scenario data model.
//!
//! Contains all types for representing the game's content and records:
//! scenarios, clues, NPCs with their keyword tables, year hints,
//! conversation messages, and year guesses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for conversation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for recorded guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuessId(pub Uuid);

impl GuessId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GuessId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GuessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Clues
// ============================================================================

/// How a clue is gathered in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClueKind {
    Observe,
    Listen,
    Read,
}

impl ClueKind {
    pub fn label(&self) -> &'static str {
        match self {
            ClueKind::Observe => "observe",
            ClueKind::Listen => "listen",
            ClueKind::Read => "read",
        }
    }
}

impl fmt::Display for ClueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A discoverable fact worth a fixed number of points.
///
/// Discovery status is not stored here: clues are immutable catalog data,
/// and whether the player has found one lives in `GameState`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clue {
    pub id: String,
    pub kind: ClueKind,
    pub title: String,
    pub description: String,
    pub content: String,
    pub points: u32,
}

impl Clue {
    pub fn new(
        id: impl Into<String>,
        kind: ClueKind,
        title: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
        points: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: description.into(),
            content: content.into(),
            points,
        }
    }
}

// ============================================================================
// NPCs
// ============================================================================

/// One keyword with its canned replies.
///
/// Tables are kept as an ordered list rather than a map: matching walks the
/// entries in declared order and the first containment match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordResponses {
    pub keyword: String,
    pub replies: Vec<String>,
}

/// A character the player can talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: String,
    pub avatar: String,
    pub responses: Vec<KeywordResponses>,
}

impl Npc {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        description: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            description: description.into(),
            avatar: avatar.into(),
            responses: Vec::new(),
        }
    }

    /// Append a keyword entry to the response table.
    pub fn with_responses(mut self, keyword: impl Into<String>, replies: &[&str]) -> Self {
        self.responses.push(KeywordResponses {
            keyword: keyword.into(),
            replies: replies.iter().map(|r| r.to_string()).collect(),
        });
        self
    }
}

// ============================================================================
// Year hints
// ============================================================================

/// An inclusive year range with the hint shown for guesses inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearHint {
    pub low: i32,
    pub high: i32,
    pub hint: String,
}

impl YearHint {
    pub fn new(low: i32, high: i32, hint: impl Into<String>) -> Self {
        Self {
            low,
            high,
            hint: hint.into(),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.low..=self.high).contains(&year)
    }
}

// ============================================================================
// Scenarios
// ============================================================================

/// One playable historical vignette with a secret target year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub period: String,
    pub target_year: i32,
    pub description: String,
    pub setting: String,
    pub mystery: String,
    pub clues: Vec<Clue>,
    pub npcs: Vec<Npc>,
    pub hints: Vec<YearHint>,
}

impl Scenario {
    /// Look up a clue by id.
    pub fn clue(&self, clue_id: &str) -> Option<&Clue> {
        self.clues.iter().find(|c| c.id == clue_id)
    }

    /// Look up an NPC by id.
    pub fn npc(&self, npc_id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == npc_id)
    }

    /// Find the hint for a missed guess.
    ///
    /// Returns the first entry in declared order whose range contains the
    /// year. Declaration order is the contract; the built-in data lists
    /// ranges narrowest-first, but nothing here assumes that.
    pub fn hint_for(&self, year: i32) -> Option<&YearHint> {
        self.hints.iter().find(|h| h.contains(year))
    }

    /// Total points available from this scenario's clues.
    pub fn total_clue_points(&self) -> u32 {
        self.clues.iter().map(|c| c.points).sum()
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Player,
    Npc,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::Player => "player",
            Sender::Npc => "npc",
        }
    }
}

/// A single conversation message. Immutable once created; conversations are
/// append-only lists of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn player(content: impl Into<String>) -> Self {
        Self::new(Sender::Player, content)
    }

    pub fn npc(content: impl Into<String>) -> Self {
        Self::new(Sender::Npc, content)
    }
}

// ============================================================================
// Guesses
// ============================================================================

/// A recorded attempt at a scenario's target year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guess {
    pub id: GuessId,
    pub scenario_id: String,
    pub year: i32,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hinted_scenario() -> Scenario {
        Scenario {
            id: "test".to_string(),
            title: "Test".to_string(),
            period: "Testtijd".to_string(),
            target_year: 1672,
            description: String::new(),
            setting: String::new(),
            mystery: String::new(),
            clues: vec![],
            npcs: vec![],
            hints: vec![
                YearHint::new(1670, 1674, "heel dichtbij"),
                YearHint::new(1665, 1679, "goede periode"),
                YearHint::new(1650, 1690, "17e eeuw"),
            ],
        }
    }

    #[test]
    fn test_year_hint_inclusive_bounds() {
        let hint = YearHint::new(1670, 1674, "dichtbij");
        assert!(hint.contains(1670));
        assert!(hint.contains(1674));
        assert!(!hint.contains(1669));
        assert!(!hint.contains(1675));
    }

    #[test]
    fn test_hint_for_picks_first_declared_match() {
        let scenario = hinted_scenario();
        // 1671 sits in all three ranges; the first declared one wins.
        assert_eq!(scenario.hint_for(1671).unwrap().hint, "heel dichtbij");
        // 1666 only matches the second and third.
        assert_eq!(scenario.hint_for(1666).unwrap().hint, "goede periode");
    }

    #[test]
    fn test_hint_for_declared_order_not_narrowest() {
        let mut scenario = hinted_scenario();
        scenario.hints.reverse(); // widest first
        assert_eq!(scenario.hint_for(1671).unwrap().hint, "17e eeuw");
    }

    #[test]
    fn test_hint_for_none_outside_all_ranges() {
        let scenario = hinted_scenario();
        assert!(scenario.hint_for(1700).is_none());
        assert!(scenario.hint_for(1200).is_none());
    }

    #[test]
    fn test_npc_response_table_preserves_order() {
        let npc = Npc::new("a", "A", "Rol", "", "x")
            .with_responses("oorlog", &["eerste"])
            .with_responses("water", &["tweede"]);

        assert_eq!(npc.responses[0].keyword, "oorlog");
        assert_eq!(npc.responses[1].keyword, "water");
    }

    #[test]
    fn test_message_constructors() {
        let m = Message::player("Hallo");
        assert_eq!(m.sender, Sender::Player);
        assert_eq!(m.content, "Hallo");

        let m = Message::npc("Goedendag");
        assert_eq!(m.sender, Sender::Npc);
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Sender::Player).unwrap(), "player");
        assert_eq!(serde_json::to_value(Sender::Npc).unwrap(), "npc");
    }

    #[test]
    fn test_clue_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ClueKind::Observe).unwrap(), "observe");
    }
}
