//! Claude API client struct, request building, and response parsing.

use reqwest::header::{HeaderMap, HeaderValue};

use crate::{AiError, AiResponse, Message, Role, TokenUsage};

use super::config::ClaudeConfig;

pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Longest slice of an error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Claude API client.
pub struct ClaudeClient {
    pub(crate) config: ClaudeConfig,
    pub(crate) http: reqwest::Client,
}

impl ClaudeClient {
    /// Build a client. Fails if the key is not a valid header value or the
    /// HTTP client cannot be constructed; no request is sent.
    pub fn new(config: ClaudeConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .default_headers(auth_headers(&config.api_key)?)
            .build()
            .map_err(|e| AiError::ClientBuild(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub(crate) fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the JSON request body for the Messages API.
    ///
    /// System messages are lifted out of the list into the top-level
    /// `system` field; the first one wins.
    pub(crate) fn build_request_body(&self, messages: &[Message]) -> serde_json::Value {
        let mut msgs = Vec::new();
        let mut system = None;
        for msg in messages {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => {
                    if system.is_none() {
                        system = Some(msg.content.as_str());
                    }
                    continue;
                }
            };
            msgs.push(serde_json::json!({
                "role": role,
                "content": msg.content,
            }));
        }

        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": msgs,
        });

        if let Some(system) = system {
            body["system"] = serde_json::json!(system);
        }
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }
}

fn auth_headers(api_key: &str) -> Result<HeaderMap, AiError> {
    let mut key = HeaderValue::from_str(api_key)
        .map_err(|_| AiError::ClientBuild("API key contains invalid header characters".into()))?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", key);
    headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
    Ok(headers)
}

/// Parse a non-streaming Messages API response.
///
/// All `text` content blocks are joined in order; other block types are
/// skipped.
pub(crate) fn parse_response(json: &serde_json::Value) -> Result<AiResponse, AiError> {
    let blocks = json["content"]
        .as_array()
        .ok_or_else(|| AiError::ParseError("response has no content array".into()))?;

    let content = blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect::<String>();

    let usage = TokenUsage {
        input_tokens: json["usage"]["input_tokens"].as_u64().unwrap_or(0),
        output_tokens: json["usage"]["output_tokens"].as_u64().unwrap_or(0),
    };

    Ok(AiResponse { content, usage })
}

/// Map a non-success HTTP status and its body to an `AiError`.
///
/// Anthropic error bodies look like
/// `{"type":"error","error":{"type":"...","message":"..."}}`; when the body
/// is not in that shape the raw text is used, truncated.
pub(crate) fn error_from_status(status: reqwest::StatusCode, body: &str) -> AiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY_CHARS).collect());

    match status.as_u16() {
        401 | 403 => AiError::Authentication(message),
        429 => AiError::RateLimited,
        code => AiError::ApiError {
            status: code,
            message,
        },
    }
}

pub(crate) fn error_from_transport(err: reqwest::Error) -> AiError {
    if err.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(err.to_string())
    }
}
