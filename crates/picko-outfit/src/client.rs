//! Text-generation API client.

use std::time::Duration;

use serde::Serialize;
use tracing::instrument;

use crate::error::GenerationError;

pub const DEFAULT_API_URL: &str = "https://newell.fastshot.ai";
pub const DEFAULT_MAX_TOKENS: u32 = 400;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Request body for `/v1/generate/text`.
#[derive(Debug, Clone, Serialize)]
pub struct TextRequest<'a> {
    pub project_id: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Client for the text-generation endpoint. Responses are raw text, not JSON.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    max_tokens: u32,
}

impl GenerationClient {
    pub fn new(
        base_url: &str,
        project_id: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Override the token budget. Sampling temperature is fixed.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Send a prompt and return the raw completion text.
    #[instrument(skip(self, prompt), level = "info")]
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/v1/generate/text", self.base_url);
        let body = TextRequest {
            project_id: &self.project_id,
            prompt,
            max_tokens: self.max_tokens,
            temperature: DEFAULT_TEMPERATURE,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.text().await?);
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(GenerationError::ProjectValidation);
        }

        let text = response.text().await.unwrap_or_default();
        Err(GenerationError::Api {
            status: status.as_u16(),
            body: text,
        })
    }
}
