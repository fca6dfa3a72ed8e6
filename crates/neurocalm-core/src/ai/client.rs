//! Text-generation client.
//!
//! Flows talk to a [`TextGenerator`]; [`GeminiClient`] is the HTTP
//! implementation against the `generateContent` JSON API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::error::{AiError, CoreError};
use crate::storage::AiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    /// System instruction, sent separately from the conversation.
    pub system: Option<String>,
    /// Earlier turns, oldest first.
    pub history: Vec<ChatMessage>,
    /// Final user turn. Skipped when empty.
    pub prompt: String,
    /// Ask the service for a JSON document instead of prose.
    pub json_output: bool,
}

impl GenerateRequest {
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Anything that can turn a request into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<String, AiError>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    endpoint: Url,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(
        endpoint: Url,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from the `[ai]` config section, reading the API key
    /// from the configured environment variable.
    pub fn from_config(config: &AiConfig) -> Result<Self, CoreError> {
        let endpoint = config.endpoint_url()?;
        let api_key = config.api_key().ok_or_else(|| AiError::MissingApiKey {
            env_var: config.api_key_env.clone(),
        })?;
        Ok(Self::new(endpoint, &config.model, api_key, config.timeout())?)
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.as_str().trim_end_matches('/'),
            self.model
        )
    }

    fn body(request: &GenerateRequest) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> = request
            .history
            .iter()
            .map(|m| json!({ "role": m.role, "parts": [{ "text": m.text }] }))
            .collect();
        if !request.prompt.is_empty() {
            contents.push(json!({ "role": Role::User, "parts": [{ "text": request.prompt }] }));
        }

        let mut body = json!({ "contents": contents });
        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        if request.json_output {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }
        body
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, AiError> {
        tracing::debug!(model = %self.model, turns = request.history.len(), "generateContent");

        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::body(&request))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::Server) -> GeminiClient {
        GeminiClient::new(
            Url::parse(&server.url()).unwrap(),
            "test-model",
            "secret",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn body_places_history_before_prompt() {
        let request = GenerateRequest {
            system: Some("be kind".into()),
            history: vec![ChatMessage::user("hi"), ChatMessage::model("hello")],
            prompt: "how am I?".into(),
            json_output: true,
        };
        let body = GeminiClient::body(&request);
        let roles: Vec<_> = body["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, ["user", "model", "user"]);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be kind");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn body_skips_empty_prompt() {
        let request = GenerateRequest {
            history: vec![ChatMessage::user("hi")],
            ..GenerateRequest::default()
        };
        let body = GeminiClient::body(&request);
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert!(body.get("systemInstruction").is_none());
    }

    #[tokio::test]
    async fn generate_concatenates_candidate_parts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .match_header("x-goog-api-key", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"there"}]}}]}"#)
            .create_async()
            .await;

        let text = client(&server)
            .generate(GenerateRequest::prompt("hi"))
            .await
            .unwrap();
        assert_eq!(text, "Hello there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_maps_http_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let err = client(&server)
            .generate(GenerateRequest::prompt("hi"))
            .await
            .unwrap_err();
        match err {
            AiError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn generate_rejects_empty_candidates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = client(&server)
            .generate(GenerateRequest::prompt("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = AiConfig {
            api_key_env: "NEUROCALM_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..AiConfig::default()
        };
        let err = GeminiClient::from_config(&config).unwrap_err();
        assert!(matches!(err, CoreError::Ai(AiError::MissingApiKey { .. })));
    }
}
