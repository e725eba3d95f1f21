//! Chat-completion call: build the request, POST once, map failures.
//!
//! This module turns an idea into a single OpenAI-compatible chat request and
//! returns the raw assistant content. It is intentionally thin — prompt text
//! lives in [`crate::prompts`] and content parsing in
//! [`crate::pipeline::parse`], so either can change without touching the
//! HTTP handling here.
//!
//! ## No retries
//!
//! One run makes exactly one completion request. Auth failures and rate
//! limits are surfaced to the caller unchanged (with actionable hints), and a
//! malformed assistant payload is handled downstream by the parser fallback.
//! Callers who want retry loops own them.

use crate::config::DeckConfig;
use crate::error::DeckError;
use crate::prompts::{user_prompt, DEFAULT_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Service label used in error messages.
const SERVICE: &str = "model service";

/// Longest error-body excerpt carried into an error message.
const MAX_DETAIL_LEN: usize = 300;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
    response_format: ResponseFormat,
    // Sampling extensions understood by the default endpoint; harmless
    // elsewhere as long as the endpoint tolerates extra fields.
    top_k: u32,
    repetition_penalty: f32,
    min_p: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: String,
}

/// Token usage reported by the completion endpoint.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Raw completion: assistant content plus token usage.
#[derive(Debug)]
pub struct Completion {
    pub content: String,
    pub usage: Usage,
}

/// Ask the model for pitch-deck content as JSON.
///
/// Sends exactly one `POST {api_base}/chat/completions` with a system message
/// pinning the model to bare JSON, a user message carrying the idea, and
/// `response_format: json_object`.
///
/// # Errors
///
/// * [`DeckError::AuthRejected`] on HTTP 401/403
/// * [`DeckError::RateLimited`] on HTTP 429 (with `Retry-After` when present)
/// * [`DeckError::ServiceError`] on any other non-success status
/// * [`DeckError::Transport`] when no HTTP response arrived at all
/// * [`DeckError::MalformedReply`] when the envelope is unusable (body not
///   JSON, or an empty `choices` array)
///
/// The returned content being valid JSON is *not* checked here; that is the
/// parser's job, and its failure mode is a placeholder deck, not an error.
pub async fn request_completion(
    idea: &str,
    api_key: &str,
    config: &DeckConfig,
) -> Result<Completion, DeckError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api_timeout_secs))
        .build()
        .map_err(|e| DeckError::Internal(format!("failed to build HTTP client: {e}")))?;

    let system = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let prompt = user_prompt(idea);
    let request = ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: &prompt,
            },
        ],
        stream: false,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        top_p: config.top_p,
        presence_penalty: config.presence_penalty,
        frequency_penalty: config.frequency_penalty,
        response_format: ResponseFormat {
            kind: "json_object",
        },
        top_k: config.top_k,
        repetition_penalty: config.repetition_penalty,
        min_p: config.min_p,
    };

    let url = format!("{}/chat/completions", config.api_base);
    info!("Requesting pitch-deck content from {}", config.model);

    let response = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    if !status.is_success() {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let detail = truncate_detail(
            response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string()),
        );
        return Err(match status.as_u16() {
            401 | 403 => DeckError::AuthRejected {
                service: SERVICE.to_string(),
                detail,
            },
            429 => DeckError::RateLimited {
                service: SERVICE.to_string(),
                retry_after_secs: retry_after,
            },
            code => DeckError::ServiceError {
                service: SERVICE.to_string(),
                status: code,
                detail,
            },
        });
    }

    let envelope: ChatResponse = response.json().await.map_err(|e| DeckError::MalformedReply {
        service: SERVICE.to_string(),
        detail: format!("response body is not valid JSON: {e}"),
    })?;

    let usage = envelope.usage.unwrap_or_default();
    let content = envelope
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| DeckError::MalformedReply {
            service: SERVICE.to_string(),
            detail: "no choices in response".to_string(),
        })?;

    debug!(
        "{} prompt tokens, {} completion tokens, {} bytes of content",
        usage.prompt_tokens,
        usage.completion_tokens,
        content.len()
    );

    Ok(Completion { content, usage })
}

fn transport_error(e: reqwest::Error) -> DeckError {
    let reason = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    DeckError::Transport {
        service: SERVICE.to_string(),
        reason,
    }
}

fn truncate_detail(mut detail: String) -> String {
    if detail.len() > MAX_DETAIL_LEN {
        let cut = detail
            .char_indices()
            .take_while(|(i, _)| *i < MAX_DETAIL_LEN)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        detail.truncate(cut);
        detail.push('…');
    }
    detail
}
