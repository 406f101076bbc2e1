/// LLM Gateway — the single point of entry for all model-provider calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through this module.
///
/// Fallback policy (no retries, no backoff):
/// 1. Primary provider (Groq), trying each model variant in order. A 4xx
///    client status moves to the next variant; any other failure aborts the
///    provider.
/// 2. Secondary provider (OpenRouter) with a fixed model, preferring the
///    structured-JSON response mode and downgrading to free text if the
///    provider rejects that parameter.
/// If both fail, the PRIMARY failure is surfaced so callers see the root
/// cause rather than "secondary missing credential".
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod json_extract;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Primary model variants, tried in order. The first is the workhorse; the
/// second covers model-id rotations on the provider side.
pub const PRIMARY_MODELS: &[&str] = &["llama-3.1-8b-instant", "llama-3.3-70b-versatile"];
/// Fixed model for the secondary provider.
pub const SECONDARY_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// System prompt sent with every gateway call. Callers only supply the user
/// prompt; the JSON-only contract is enforced here.
const JSON_ONLY_SYSTEM: &str =
    "You are a structured AI engine. Return only valid JSON. No explanations.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no API key configured for {provider}")]
    CredentialMissing { provider: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned status {status}: {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("model returned empty content")]
    EmptyContent,
}

/// What to do with the remaining model variants after a failed attempt.
#[derive(Debug, PartialEq, Eq)]
enum Disposition {
    /// Client error (bad model id, malformed request) — the next variant may
    /// still work.
    NextVariant,
    /// Auth failure, rate limit exhaustion, server error, network error —
    /// more variants against the same provider will not help.
    AbortProvider,
}

fn disposition_for(error: &GatewayError) -> Disposition {
    match error {
        GatewayError::Api { status, .. } if (400..500).contains(status) => {
            Disposition::NextVariant
        }
        _ => Disposition::AbortProvider,
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// The single LLM gateway used by all extraction and planning services.
#[derive(Clone)]
pub struct LlmGateway {
    client: Client,
    groq_api_key: Option<String>,
    openrouter_api_key: Option<String>,
}

impl LlmGateway {
    pub fn new(groq_api_key: Option<String>, openrouter_api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            groq_api_key,
            openrouter_api_key,
        }
    }

    /// True if at least one provider has a configured credential.
    pub fn has_any_provider(&self) -> bool {
        self.groq_api_key.is_some() || self.openrouter_api_key.is_some()
    }

    /// Sends a prompt expected to yield JSON and returns the raw response
    /// text (not yet parsed — see `json_extract`).
    pub async fn ask_for_json(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, GatewayError> {
        let primary_error = match self.try_primary(prompt, temperature).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };

        warn!("primary provider failed, trying secondary: {primary_error}");

        match self.try_secondary(prompt, temperature).await {
            Ok(text) => Ok(text),
            Err(secondary_error) => {
                warn!("secondary provider also failed: {secondary_error}");
                // Root-cause visibility: the primary failure is the one the
                // caller needs to see.
                Err(primary_error)
            }
        }
    }

    async fn try_primary(&self, prompt: &str, temperature: f32) -> Result<String, GatewayError> {
        let api_key = self
            .groq_api_key
            .as_deref()
            .ok_or(GatewayError::CredentialMissing { provider: "groq" })?;

        let mut last_error = None;

        for model in PRIMARY_MODELS {
            match self
                .send_chat("groq", GROQ_API_URL, api_key, model, prompt, temperature, None)
                .await
            {
                Ok(text) => return Ok(text),
                Err(e) => {
                    let disposition = disposition_for(&e);
                    warn!("groq model {model} failed ({e}), disposition: {disposition:?}");
                    last_error = Some(e);
                    if disposition == Disposition::AbortProvider {
                        break;
                    }
                }
            }
        }

        Err(last_error.unwrap_or(GatewayError::EmptyContent))
    }

    async fn try_secondary(&self, prompt: &str, temperature: f32) -> Result<String, GatewayError> {
        let api_key =
            self.openrouter_api_key
                .as_deref()
                .ok_or(GatewayError::CredentialMissing {
                    provider: "openrouter",
                })?;

        let structured = Some(ResponseFormat {
            format_type: "json_object",
        });

        match self
            .send_chat(
                "openrouter",
                OPENROUTER_API_URL,
                api_key,
                SECONDARY_MODEL,
                prompt,
                temperature,
                structured,
            )
            .await
        {
            Ok(text) => Ok(text),
            // Some routed models reject response_format; degrade to free-text
            // mode within the same fallback step.
            Err(GatewayError::Api { status: 400, .. }) => {
                debug!("openrouter rejected response_format, retrying in free-text mode");
                self.send_chat(
                    "openrouter",
                    OPENROUTER_API_URL,
                    api_key,
                    SECONDARY_MODEL,
                    prompt,
                    temperature,
                    None,
                )
                .await
            }
            Err(e) => Err(e),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn send_chat(
        &self,
        provider: &'static str,
        url: &str,
        api_key: &str,
        model: &str,
        prompt: &str,
        temperature: f32,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, GatewayError> {
        let request_body = ChatRequest {
            model,
            temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: JSON_ONLY_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                provider,
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GatewayError::EmptyContent)?;

        debug!(
            "{provider} call succeeded (model: {model}, {} chars)",
            content.len()
        );

        Ok(content)
    }
}
