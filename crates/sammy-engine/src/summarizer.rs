//! Text-generation backends

use async_trait::async_trait;
use sammy_core::{Error, Result, Service};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

const INSTRUCTION: &str = "Pick relevant information about repositories and actions made from the following text, keep in mind actions should be reported in a human readable form: ";
const MAX_ERROR_BODY: usize = 512;

/// Wrap a (masked) activity feed in the summarization instruction
pub fn build_prompt(feed: &str) -> String {
    format!("{}{}", INSTRUCTION, feed)
}

/// A single request/response completion call
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Complete `prompt`, producing at most `max_tokens` tokens per candidate.
    /// Returns every candidate the backend produced, best first.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Vec<String>>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` backend
#[derive(Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::transport(Service::Summarizer, e))?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl SummaryBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Vec<String>> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: self.temperature,
        };

        debug!(model = %self.model, max_tokens, prompt_len = prompt.len(), "Requesting completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(Service::Summarizer, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::BadResponse {
                service: Service::Summarizer,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(Service::Summarizer, e))?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|source| Error::Decode {
            service: Service::Summarizer,
            source,
        })?;

        Ok(parsed
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default())
            .collect())
    }
}
