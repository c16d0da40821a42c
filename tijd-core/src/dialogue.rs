//! NPC dialogue engine.
//!
//! Two tiers: an optional remote AI chat call, and a local keyword matcher
//! over the NPC's canned response table. The remote tier is best-effort;
//! any failure is logged and the engine falls through to the local tier,
//! which always produces a reply. The engine keeps no state of its own —
//! conversation history is owned by `GameState` and passed in as context.

use crate::scenario::{Message, Npc};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use supabase_lite::{ChatRequest, HistoryEntry, NpcProfile};
use tracing::warn;

/// How many trailing history messages are sent as remote chat context.
pub const HISTORY_WINDOW: usize = 5;

/// The remote tier of the dialogue engine.
///
/// Implemented by the Supabase client for real play and by scripted fakes
/// in tests.
#[async_trait]
pub trait RemoteChat: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<String, supabase_lite::Error>;
}

#[async_trait]
impl RemoteChat for supabase_lite::Client {
    async fn chat(&self, request: ChatRequest) -> Result<String, supabase_lite::Error> {
        self.invoke_chat(&request).await
    }
}

/// Produces NPC replies to free-text player messages.
pub struct DialogueEngine {
    remote: Option<Box<dyn RemoteChat>>,
}

impl DialogueEngine {
    /// An engine with only the keyword tier.
    pub fn local_only() -> Self {
        Self { remote: None }
    }

    /// An engine that tries the given remote tier first.
    pub fn with_remote(remote: Box<dyn RemoteChat>) -> Self {
        Self {
            remote: Some(remote),
        }
    }

    /// Build from the environment: remote tier when Supabase is configured,
    /// local-only otherwise.
    pub fn from_env() -> Self {
        match supabase_lite::Client::from_env() {
            Ok(client) => Self::with_remote(Box::new(client)),
            Err(_) => Self::local_only(),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Produce a reply for the player's message.
    ///
    /// Single attempt, no retry: if the remote tier is configured it is
    /// tried once with the NPC's public profile and the last
    /// [`HISTORY_WINDOW`] history messages; on any failure the keyword
    /// tier answers instead. This never returns an error to the caller.
    pub async fn respond(
        &self,
        npc: &Npc,
        message: &str,
        scenario_id: &str,
        history: &[Message],
    ) -> String {
        if let Some(remote) = &self.remote {
            let request = build_chat_request(npc, message, scenario_id, history);
            match remote.chat(request).await {
                Ok(reply) => return reply,
                Err(err) => {
                    warn!(npc = %npc.id, error = %err, "remote chat failed, using keyword fallback");
                }
            }
        }

        fallback_response(npc, message)
    }
}

fn build_chat_request(
    npc: &Npc,
    message: &str,
    scenario_id: &str,
    history: &[Message],
) -> ChatRequest {
    let window = history.len().saturating_sub(HISTORY_WINDOW);
    ChatRequest {
        npc: NpcProfile {
            name: npc.name.clone(),
            role: npc.role.clone(),
            description: npc.description.clone(),
        },
        message: message.to_string(),
        scenario_id: scenario_id.to_string(),
        conversation_history: history[window..]
            .iter()
            .map(|m| HistoryEntry {
                sender: m.sender.label().to_string(),
                content: m.content.clone(),
            })
            .collect(),
    }
}

/// The local keyword tier.
///
/// Lower-cases the message and walks the NPC's table in declared order; the
/// first keyword contained in the message wins and one of its replies is
/// picked uniformly at random. With no match, a generic reply keyed on the
/// NPC's role is used.
pub fn fallback_response(npc: &Npc, message: &str) -> String {
    let lowered = message.to_lowercase();

    for entry in &npc.responses {
        if lowered.contains(&entry.keyword.to_lowercase()) {
            if let Some(reply) = entry.replies.choose(&mut rand::thread_rng()) {
                return reply.clone();
            }
        }
    }

    generic_response(&npc.role)
}

/// A generic reply for NPCs whose table had no match.
pub fn generic_response(role: &str) -> String {
    let pool = generic_responses(role);
    pool.choose(&mut rand::thread_rng())
        .map(|r| r.to_string())
        .unwrap_or_default()
}

fn generic_responses(role: &str) -> &'static [&'static str] {
    match role {
        "Stadsbestuurder" => &[
            "Dat is een interessante vraag. Als bestuurder zie ik veel gebeuren in deze tijden.",
            "De situatie is complex. Er spelen veel belangen.",
            "Ik probeer het beste te doen voor onze stad en haar burgers.",
        ],
        "Calvinistische prediker" => &[
            "Gods wegen zijn ondoorgrondelijk, maar Zijn woord is duidelijk.",
            "In deze tijden moeten we vasthouden aan het geloof.",
            "De Heer zal ons leiden door deze beproevingen.",
        ],
        "VOC-koopman" => &[
            "De handel brengt ons welvaart, maar ook risico's.",
            "Ik heb veel van de wereld gezien door mijn reizen.",
            "Zaken zijn zaken, maar eerlijkheid is belangrijk.",
        ],
        "Patriot en revolutionair" => &[
            "De tijden veranderen! Het volk moet opstaan voor zijn rechten.",
            "Vrijheid is niet gratis, daar moet voor gevochten worden.",
            "De oude orde moet wijken voor vooruitgang.",
        ],
        "Moeder van drie kinderen" => &[
            "Ik maak me vooral zorgen om mijn kinderen.",
            "Deze tijden zijn zwaar voor gewone mensen zoals wij.",
            "We moeten elkaar helpen om dit te overleven.",
        ],
        "Provo-activist" => &[
            "Het establishment begrijpt de jeugd niet, man!",
            "We moeten de wereld veranderen met liefde en creativiteit.",
            "De oude regels zijn achterhaald, tijd voor iets nieuws!",
        ],
        _ => &[
            "Dat is een goede vraag. Laat me daar eens over nadenken.",
            "In deze tijden is het moeilijk te zeggen wat juist is.",
            "Ik kan je alleen vertellen wat ik zelf heb meegemaakt.",
            "Misschien kun je beter met iemand anders praten over dat onderwerp.",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Npc;
    use crate::testing::{FailingChat, ScriptedChat};

    fn war_npc() -> Npc {
        Npc::new("burger", "Cornelis", "Stadsbestuurder", "", "x")
            .with_responses("oorlog", &["A", "B"])
    }

    #[test]
    fn test_keyword_match_never_falls_through() {
        let npc = war_npc();
        for _ in 0..50 {
            let reply = fallback_response(&npc, "Wat is er met de oorlog gebeurd?");
            assert!(reply == "A" || reply == "B", "unexpected reply: {reply}");
        }
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let npc = war_npc();
        let reply = fallback_response(&npc, "VERTEL OVER DE OORLOG");
        assert!(reply == "A" || reply == "B");
    }

    #[test]
    fn test_first_declared_keyword_wins() {
        let npc = Npc::new("n", "N", "Stadsbestuurder", "", "x")
            .with_responses("water", &["eerste"])
            .with_responses("oorlog", &["tweede"]);

        // Both keywords occur; the table's declared order decides.
        let reply = fallback_response(&npc, "oorlog om het water");
        assert_eq!(reply, "eerste");
    }

    #[test]
    fn test_no_match_uses_role_generics() {
        let npc = war_npc();
        let reply = fallback_response(&npc, "Hoe heet jouw hond?");
        assert!(generic_responses("Stadsbestuurder").contains(&reply.as_str()));
    }

    #[test]
    fn test_unknown_role_uses_default_pool() {
        let npc = Npc::new("n", "N", "Tijdreiziger", "", "x");
        let reply = fallback_response(&npc, "Hallo");
        assert!(generic_responses("_onbekend_").contains(&reply.as_str()));
    }

    #[tokio::test]
    async fn test_remote_reply_wins_when_available() {
        let engine = DialogueEngine::with_remote(Box::new(ScriptedChat::new(vec![
            "Uit de machine".to_string(),
        ])));
        let npc = war_npc();
        let reply = engine.respond(&npc, "oorlog?", "rampjaar", &[]).await;
        assert_eq!(reply, "Uit de machine");
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_keywords() {
        let engine = DialogueEngine::with_remote(Box::new(FailingChat));
        let npc = war_npc();
        let reply = engine
            .respond(&npc, "Wat is er met de oorlog gebeurd?", "rampjaar", &[])
            .await;
        assert!(reply == "A" || reply == "B");
    }

    #[tokio::test]
    async fn test_local_only_engine() {
        let engine = DialogueEngine::local_only();
        assert!(!engine.has_remote());
        let npc = war_npc();
        let reply = engine.respond(&npc, "de oorlog", "rampjaar", &[]).await;
        assert!(reply == "A" || reply == "B");
    }

    #[test]
    fn test_chat_request_window_is_last_five() {
        let npc = war_npc();
        let history: Vec<Message> = (0..8).map(|i| Message::player(format!("m{i}"))).collect();

        let request = build_chat_request(&npc, "hallo", "rampjaar", &history);
        assert_eq!(request.conversation_history.len(), HISTORY_WINDOW);
        assert_eq!(request.conversation_history[0].content, "m3");
        assert_eq!(request.conversation_history[4].content, "m7");
        assert_eq!(request.scenario_id, "rampjaar");
        assert_eq!(request.npc.name, "Cornelis");
    }

    #[test]
    fn test_chat_request_short_history() {
        let npc = war_npc();
        let history = vec![Message::player("enige")];
        let request = build_chat_request(&npc, "hallo", "rampjaar", &history);
        assert_eq!(request.conversation_history.len(), 1);
    }
}
