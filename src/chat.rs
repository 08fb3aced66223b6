//! OpenAI-compatible `/v1/chat/completions` client shared by the narrator
//! and the preference extractor

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::{Result, TripPlannerError};

pub struct ChatClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    content: String,
}

impl ChatClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>, timeout_seconds: u32) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.into()))
            .user_agent(concat!("TripPlanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TripPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system and one user message, return the first reply
    pub async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        let start = Instant::now();
        let url = format!("{}/v1/chat/completions", self.base_url);
        let mut req = self.http_client.post(&url).json(&ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
        });
        if let Some(ref api_key) = self.api_key {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(TripPlannerError::api(format!("Chat service error (HTTP {status})")));
        }
        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| TripPlannerError::api("Chat service returned no choices"))?;

        debug!("Chat completion from {} in {:.3}s", self.model, start.elapsed().as_secs_f64());
        Ok(content)
    }
}

/// The outermost `{...}` in a model reply, ignoring code fences and prose
pub(crate) fn json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object() {
        assert_eq!(json_object("```json\n{\"a\": 1}\n```"), Some("{\"a\": 1}"));
        assert_eq!(json_object("Sure! {\"a\": {\"b\": 2}} hope it helps"), Some("{\"a\": {\"b\": 2}}"));
        assert_eq!(json_object("} backwards {"), None);
        assert_eq!(json_object("plain text"), None);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_api_error() {
        let client = ChatClient::new("http://127.0.0.1:9/", "gpt-4o-mini", None, 2).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9");
        let err = client.complete("system", "user", 0.0).await.unwrap_err();
        assert!(matches!(err, TripPlannerError::Api { .. }));
    }
}
