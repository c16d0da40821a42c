//! Minimal Supabase client.
//!
//! This crate provides a focused client for the two Supabase surfaces the
//! game uses:
//! - Edge Function invocation (the `ai-chat` function)
//! - PostgREST key-value access to the `game_states` table
//!
//! It is deliberately small: one client, one error enum, and the request
//! types for the chat function.

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum plausible length for an anon key; anything shorter is a typo.
const MIN_ANON_KEY_LEN: usize = 20;

/// Errors that can occur when using the Supabase client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Supabase not configured")]
    NoConfig,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Supabase API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl Client {
    /// Create a new client for the given project URL and anon key.
    ///
    /// The URL must use https and the key must look like a real anon key;
    /// this mirrors the configuration check the game performs before
    /// enabling any remote features.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, Error> {
        let base_url = base_url.into();
        let anon_key = anon_key.into();

        if !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "project URL must use https: {base_url}"
            )));
        }
        if anon_key.len() <= MIN_ANON_KEY_LEN {
            return Err(Error::Config("anon key is too short".to_string()));
        }

        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .map_err(|e| Error::Config(e.to_string()))?,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    /// Create a client from the `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    /// environment variables.
    pub fn from_env() -> Result<Self, Error> {
        let url = std::env::var("SUPABASE_URL").map_err(|_| Error::NoConfig)?;
        let key = std::env::var("SUPABASE_ANON_KEY").map_err(|_| Error::NoConfig)?;
        Self::new(url, key)
    }

    /// Invoke the `ai-chat` Edge Function and return the reply text.
    pub async fn invoke_chat(&self, request: &ChatRequest) -> Result<String, Error> {
        let response = self
            .http
            .post(format!("{}/functions/v1/ai-chat", self.base_url))
            .headers(self.headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        match reply.response {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(Error::Parse("missing response field".to_string())),
        }
    }

    /// Upsert a state row under the given key in the `game_states` table.
    pub async fn upsert_state(&self, key: &str, state: &serde_json::Value) -> Result<(), Error> {
        let row = StateRow {
            id: key.to_string(),
            state: state.clone(),
            updated_at: Some(Utc::now().to_rfc3339()),
        };

        let mut headers = self.headers()?;
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates"),
        );

        let response = self
            .http
            .post(format!("{}/rest/v1/game_states", self.base_url))
            .headers(headers)
            .json(&[row])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        Ok(())
    }

    /// Fetch the state stored under the given key, if any.
    pub async fn fetch_state(&self, key: &str) -> Result<Option<serde_json::Value>, Error> {
        let response = self
            .http
            .get(format!(
                "{}/rest/v1/game_states?id=eq.{key}&select=state",
                self.base_url
            ))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let mut rows: Vec<FetchedRow> = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        Ok(rows.pop().map(|r| r.state))
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key)
                .map_err(|e| Error::Config(format!("Invalid anon key: {e}")))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key))
                .map_err(|e| Error::Config(format!("Invalid anon key: {e}")))?,
        );
        Ok(headers)
    }
}

/// Public profile of an NPC, sent to the chat function as character context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcProfile {
    pub name: String,
    pub role: String,
    pub description: String,
}

/// One prior exchange from the conversation, for chat context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender: String,
    pub content: String,
}

/// Request body for the `ai-chat` Edge Function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub npc: NpcProfile,
    pub message: String,
    pub scenario_id: String,
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: Option<String>,
}

#[derive(Debug, Serialize)]
struct StateRow {
    id: String,
    state: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FetchedRow {
    state: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_key() -> String {
        "a".repeat(40)
    }

    #[test]
    fn test_client_requires_https() {
        let err = Client::new("http://example.supabase.co", valid_key()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_client_rejects_short_key() {
        let err = Client::new("https://example.supabase.co", "short").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_client_accepts_valid_config() {
        let client = Client::new("https://example.supabase.co/", valid_key()).unwrap();
        assert_eq!(client.base_url, "https://example.supabase.co");
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            npc: NpcProfile {
                name: "Meester Cornelis".to_string(),
                role: "Stadsbestuurder".to_string(),
                description: "Een bezorgde regentenzoon".to_string(),
            },
            message: "Wat gebeurt er?".to_string(),
            scenario_id: "rampjaar".to_string(),
            conversation_history: vec![HistoryEntry {
                sender: "player".to_string(),
                content: "Hallo".to_string(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["scenarioId"], "rampjaar");
        assert_eq!(json["conversationHistory"][0]["sender"], "player");
        assert_eq!(json["npc"]["name"], "Meester Cornelis");
    }

    #[test]
    fn test_chat_reply_missing_field() {
        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(reply.response.is_none());
    }
}
