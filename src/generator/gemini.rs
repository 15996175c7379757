//! [`CompletionBackend`] for the Google Generative Language API.

use std::fmt;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::{
    domain::Config,
    generator::{CompletionBackend, GenerationError},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Talks to a Gemini model over HTTPS.
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiBackend {
    /// Build a backend from the configuration, reading the API key from the
    /// configured environment variable.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the environment variable is unset or blank
    /// - the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let api_key = std::env::var(config.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey(config.api_key_env().to_string()))?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
        })
    }

    /// The model requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn map_api_error(status: u16, body: &str) -> GenerationError {
        let message = serde_json::from_str::<GenerateResponse>(body)
            .ok()
            .and_then(|response| response.error)
            .map_or_else(|| body.to_string(), |error| error.message);

        GenerationError::Api { status, message }
    }

    fn extract_text(response: GenerateResponse) -> Result<String, GenerationError> {
        let candidate = response
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .ok_or(GenerationError::EmptyResponse)?;

        if let Some(reason) = &candidate.finish_reason {
            debug!("Finish reason: {reason}");
        }

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

impl CompletionBackend for GeminiBackend {
    #[instrument(skip_all, fields(model = %self.model))]
    fn complete(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
                candidate_count: 1,
            },
        };

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            GenerationError::Nonconforming(format!("unexpected response envelope: {e}"))
        })?;

        if let Some(error) = parsed.error {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error.message,
            });
        }

        let text = Self::extract_text(parsed)?;
        debug!("Received {} bytes from Gemini", text.len());
        Ok(text)
    }
}

impl fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
