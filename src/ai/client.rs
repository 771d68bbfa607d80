//! Completion client: provider abstraction over the chat-completions API.
//!
//! The trait seam lets tests and local runs swap the paid provider for a
//! deterministic mock, the same way the aggregation sources are stubbed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ai::AiConfig;
use crate::error::{Result, UpstreamError};

const GROQ_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// One generation request. The response carries no structural guarantee;
/// callers run it through the extractor.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, req: &CompletionRequest) -> Result<String>;
    /// Provider name for diagnostics/headers.
    fn provider_name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynCompletionClient = Arc<dyn CompletionClient>;

/// Factory: build a client according to config and environment variables.
///
/// * If `AI_TEST_MODE=mock`, returns a deterministic mock client.
/// * Else if `config.enabled==false`, returns a disabled client.
/// * Else builds the configured provider.
pub fn build_completion_client(config: &AiConfig) -> DynCompletionClient {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockClient::canned());
    }

    if !config.enabled {
        return Arc::new(DisabledClient);
    }

    match config.provider.as_str() {
        "groq" => Arc::new(GroqClient::new(config)),
        "mock" => Arc::new(MockClient::canned()),
        _ => Arc::new(DisabledClient),
    }
}

/// Groq provider (OpenAI-compatible Chat Completions API). Requires an API
/// key resolved by the config layer.
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl GroqClient {
    pub fn new(config: &AiConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(
                "github-portfolio-service/0.1 (+github.com/lumlich/github-portfolio-service)",
            )
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            url: GROQ_CHAT_COMPLETIONS_URL.to_string(),
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, req: &CompletionRequest) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::AuthInvalid);
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let body = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &req.system,
                },
                Msg {
                    role: "user",
                    content: &req.prompt,
                },
            ],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(UpstreamError::from_transport)?;

        if !resp.status().is_success() {
            return Err(UpstreamError::from_status(resp.status()));
        }

        let parsed: Resp = resp.json().await.map_err(UpstreamError::from_transport)?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "groq"
    }
}

/// Always fails; used when generation is disabled. Callers treat any error
/// as "use the fallback path".
pub struct DisabledClient;

#[async_trait]
impl CompletionClient for DisabledClient {
    async fn complete(&self, _req: &CompletionRequest) -> Result<String> {
        Err(UpstreamError::Unavailable { status: 503 })
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Fixed-response client for tests/local runs.
#[derive(Clone)]
pub struct MockClient {
    pub fixed: String,
}

impl MockClient {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
        }
    }

    /// A well-formed canned response so mock runs exercise the happy path.
    pub fn canned() -> Self {
        Self::new(
            r#"{"summary":"Mock developer summary.","highlights":["1 public repository"],"skills":["Software Development"],"title":"Mock - Developer Portfolio","description":"Mock portfolio.","keywords":["mock"]}"#,
        )
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    async fn complete(&self, _req: &CompletionRequest) -> Result<String> {
        Ok(self.fixed.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
