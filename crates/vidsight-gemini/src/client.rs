//! Gemini API client.
//!
//! One client instance covers the three sequential remote phases of a run:
//! upload, readiness polling, structured generation. Each phase fails
//! independently with its own error; the orchestrator maps them to stages.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use vidsight_models::{AnalysisResult, AnalysisVariant};

use crate::error::{GeminiError, GeminiResult};
use crate::prompt;
use crate::schema;
use crate::types::{
    Content, FileState, GenerateRequest, GenerateResponse, GenerationConfig, Part, RemoteFile,
    UploadResponse,
};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Client for the Gemini file and generation APIs.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client against the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the API base URL. Used by tests and self-hosted relays.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the generation model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn key(&self) -> GeminiResult<&str> {
        if self.api_key.is_empty() {
            return Err(GeminiError::MissingApiKey);
        }
        Ok(&self.api_key)
    }

    /// Upload a media blob to the file store.
    ///
    /// Returns the service-side handle, typically still in `PROCESSING`.
    pub async fn upload_file(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> GeminiResult<RemoteFile> {
        let url = format!("{}/upload/v1beta/files?key={}", self.base_url, self.key()?);

        info!(name = %display_name, mime = %mime_type, size = bytes.len(), "Uploading media");

        let response = self
            .http
            .post(&url)
            .header("X-Goog-Upload-Protocol", "raw")
            .header("X-Goog-File-Name", display_name)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;

        let parsed: UploadResponse = Self::read_json(response).await?;
        debug!(name = %parsed.file.name, state = %parsed.file.state, "Upload accepted");
        Ok(parsed.file)
    }

    /// Fetch the current state of an uploaded file.
    pub async fn get_file(&self, name: &str) -> GeminiResult<RemoteFile> {
        let url = format!("{}/v1beta/{}?key={}", self.base_url, name, self.key()?);
        let response = self.http.get(&url).send().await?;
        Self::read_json(response).await
    }

    /// Poll a file on a fixed interval until it leaves `PROCESSING`.
    ///
    /// `ACTIVE` resolves, `FAILED` and any unrecognized state fail. Without a
    /// deadline the wait is unbounded; the contract is wait, not fail fast.
    pub async fn wait_until_active(
        &self,
        name: &str,
        interval: Duration,
        deadline: Option<Duration>,
    ) -> GeminiResult<RemoteFile> {
        let started = Instant::now();
        loop {
            let file = self.get_file(name).await?;
            match file.state {
                FileState::Active => {
                    info!(name = %name, "Remote file is active");
                    return Ok(file);
                }
                FileState::Failed => {
                    warn!(name = %name, "Remote processing failed");
                    return Err(GeminiError::ProcessingFailed {
                        name: name.to_string(),
                    });
                }
                FileState::Processing => {
                    debug!(name = %name, elapsed = started.elapsed().as_secs(), "Still processing");
                }
                FileState::Other(state) => {
                    warn!(name = %name, state = %state, "Unexpected file state");
                    return Err(GeminiError::UnexpectedFileState { state });
                }
            }

            if let Some(limit) = deadline {
                if started.elapsed() >= limit {
                    return Err(GeminiError::PollTimeout {
                        secs: limit.as_secs(),
                    });
                }
            }

            tokio::time::sleep(interval).await;
        }
    }

    /// Issue one structured generation call for an active file and parse the
    /// response strictly against the variant's schema.
    pub async fn generate_analysis(
        &self,
        variant: AnalysisVariant,
        file: &RemoteFile,
    ) -> GeminiResult<AnalysisResult> {
        let text = self.generate_text(variant, file).await?;

        serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| GeminiError::response_format(e.to_string()))
    }

    /// Raw generation call returning the first candidate's text payload.
    pub async fn generate_text(
        &self,
        variant: AnalysisVariant,
        file: &RemoteFile,
    ) -> GeminiResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.key()?
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text(prompt::instruction(variant)),
                    Part::file(file.mime_type.clone(), file.uri.clone()),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema::response_schema(variant),
            },
        };

        info!(model = %self.model, variant = %variant.as_str(), file = %file.name, "Requesting structured generation");

        let response = self.http.post(&url).json(&request).send().await?;
        let parsed: GenerateResponse = Self::read_json(response).await?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(GeminiError::EmptyResponse)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> GeminiResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::api(status.as_u16(), body));
        }
        let value: Value = response.json().await?;
        serde_json::from_value(value).map_err(|e| GeminiError::response_format(e.to_string()))
    }
}

/// Trim markdown code fences some models wrap around JSON payloads.
/// The parse itself stays strict.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
