//! AI provider integrations for daily reviews.
//!
//! Supports OpenAI, Anthropic, Google Gemini and a local Ollama server.
//! Each provider implements the [`ReviewProvider`] trait, and the
//! [`create_provider`] factory builds the appropriate provider from
//! resolved [`ProviderSettings`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::ProviderError;

/// Timeout for establishing a connection (30 seconds).
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the entire request including response (120 seconds).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound on generated tokens for a review.
const MAX_TOKENS: u32 = 400;

/// Longest upstream error detail kept, in characters.
pub const MAX_ERROR_DETAIL: usize = 200;

pub const OPENAI_API_URL: &str = "https://api.openai.com";
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const OLLAMA_DEFAULT_HOST: &str = "http://localhost:11434";

// ==================== Types ====================

/// Supported AI provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// OpenAI Chat Completions API.
    OpenAI,
    /// Anthropic Messages API.
    Anthropic,
    /// Google Gemini generateContent API.
    Gemini,
    /// Local Ollama server.
    Ollama,
}

impl ProviderKind {
    /// All providers, in fallback priority order.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Ollama,
    ];

    /// Human-facing product name.
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Ollama => "Ollama",
        }
    }

    /// Whether the provider needs an API key.
    pub fn requires_api_key(self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }

    /// What to set to make this provider available.
    pub fn setup_hint(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Ollama => "OLLAMA_MODEL or OLLAMA_HOST",
        }
    }

    /// Environment variable selecting the model.
    pub fn model_env(self) -> &'static str {
        use crate::config::keys;
        match self {
            ProviderKind::OpenAI => keys::OPENAI_MODEL,
            ProviderKind::Anthropic => keys::ANTHROPIC_MODEL,
            ProviderKind::Gemini => keys::GEMINI_MODEL,
            ProviderKind::Ollama => keys::OLLAMA_MODEL,
        }
    }

    /// Comma-separated list of accepted provider names.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "gemini" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(ProviderError::UnsupportedProvider(s.trim().to_string())),
        }
    }
}

/// Everything needed to call one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// API key; `None` only for providers that need none.
    pub api_key: Option<String>,
    pub model: String,
    /// API base URL without trailing slash.
    pub base_url: String,
}

/// Response from a review request.
#[derive(Debug, Clone)]
pub struct ReviewResponse {
    /// The generated review text.
    pub content: String,
    /// Model that produced it.
    pub model: String,
    /// Provider that produced it.
    pub provider: ProviderKind,
    /// Total tokens reported by the API, when available.
    pub tokens_used: Option<u64>,
}

// ==================== Trait ====================

/// Trait for AI providers that can write a daily review.
///
/// Implementors send a system prompt and the day's summary to an API
/// and return the generated text. One call, no retries.
pub trait ReviewProvider {
    /// Generate a review from the given prompts.
    fn generate(&self, system_prompt: &str, prompt: &str)
        -> Result<ReviewResponse, ProviderError>;
}

// ==================== OpenAI ====================

/// OpenAI Chat Completions provider.
pub(crate) struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    pub(crate) fn new(client: Client, api_key: String, model: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    /// Builds the JSON request body for the Chat Completions API.
    fn build_request_body(&self, system_prompt: &str, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": 0.7,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": prompt }
            ]
        })
    }
}

impl ReviewProvider for OpenAIProvider {
    fn generate(&self, system_prompt: &str, prompt: &str) -> Result<ReviewResponse, ProviderError> {
        let body = self.build_request_body(system_prompt, prompt);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| ProviderError::NetworkFailure(e.to_string()))?;

        let json = read_json(response)?;
        let content = parse_openai_content(&json)?;

        Ok(ReviewResponse {
            content,
            model: self.model.clone(),
            provider: ProviderKind::OpenAI,
            tokens_used: json
                .get("usage")
                .and_then(|u| u.get("total_tokens"))
                .and_then(|t| t.as_u64()),
        })
    }
}

// ==================== Anthropic ====================

/// Anthropic Messages API provider.
pub(crate) struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    pub(crate) fn new(client: Client, api_key: String, model: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    /// Builds the JSON request body for the Messages API.
    fn build_request_body(&self, system_prompt: &str, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": system_prompt,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        })
    }
}

impl ReviewProvider for AnthropicProvider {
    fn generate(&self, system_prompt: &str, prompt: &str) -> Result<ReviewResponse, ProviderError> {
        let body = self.build_request_body(system_prompt, prompt);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| ProviderError::NetworkFailure(e.to_string()))?;

        let json = read_json(response)?;
        let content = parse_anthropic_content(&json)?;

        let usage = json.get("usage");
        let tokens_used = match (
            usage.and_then(|u| u.get("input_tokens")).and_then(|t| t.as_u64()),
            usage.and_then(|u| u.get("output_tokens")).and_then(|t| t.as_u64()),
        ) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        };

        Ok(ReviewResponse {
            content,
            model: self.model.clone(),
            provider: ProviderKind::Anthropic,
            tokens_used,
        })
    }
}

// ==================== Gemini ====================

/// Google Gemini provider.
pub(crate) struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub(crate) fn new(client: Client, api_key: String, model: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    /// Builds the JSON request body for generateContent.
    fn build_request_body(&self, system_prompt: &str, prompt: &str) -> Value {
        serde_json::json!({
            "systemInstruction": {
                "parts": [ { "text": system_prompt } ]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [ { "text": prompt } ]
                }
            ],
            "generationConfig": {
                "maxOutputTokens": MAX_TOKENS,
                "temperature": 0.7
            }
        })
    }
}

impl ReviewProvider for GeminiProvider {
    fn generate(&self, system_prompt: &str, prompt: &str) -> Result<ReviewResponse, ProviderError> {
        let body = self.build_request_body(system_prompt, prompt);

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| ProviderError::NetworkFailure(e.to_string()))?;

        let json = read_json(response)?;
        let content = parse_gemini_content(&json)?;

        Ok(ReviewResponse {
            content,
            model: self.model.clone(),
            provider: ProviderKind::Gemini,
            tokens_used: json
                .get("usageMetadata")
                .and_then(|u| u.get("totalTokenCount"))
                .and_then(|t| t.as_u64()),
        })
    }
}

// ==================== Ollama ====================

/// Local Ollama chat provider. Needs no API key.
pub(crate) struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaProvider {
    pub(crate) fn new(client: Client, model: String, base_url: String) -> Self {
        Self {
            client,
            model,
            base_url,
        }
    }

    /// Builds the JSON request body for `/api/chat` without streaming.
    fn build_request_body(&self, system_prompt: &str, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "stream": false,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": prompt }
            ]
        })
    }
}

impl ReviewProvider for OllamaProvider {
    fn generate(&self, system_prompt: &str, prompt: &str) -> Result<ReviewResponse, ProviderError> {
        let body = self.build_request_body(system_prompt, prompt);

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| ProviderError::NetworkFailure(e.to_string()))?;

        let json = read_json(response)?;
        let content = json
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ProviderError::ParseError("Missing message.content in Ollama response".to_string())
            })?;

        let tokens_used = match (
            json.get("prompt_eval_count").and_then(|t| t.as_u64()),
            json.get("eval_count").and_then(|t| t.as_u64()),
        ) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        };

        Ok(ReviewResponse {
            content: content.to_string(),
            model: self.model.clone(),
            provider: ProviderKind::Ollama,
            tokens_used,
        })
    }
}

// ==================== Shared Helpers ====================

/// Checks the status and decodes the JSON body of a provider response.
fn read_json(response: reqwest::blocking::Response) -> Result<Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ProviderError::UpstreamError {
            status: status.as_u16(),
            body: error_detail(&body),
        });
    }

    response
        .json()
        .map_err(|e| ProviderError::ParseError(e.to_string()))
}

/// Reduces an error response body to one short line.
///
/// Prefers the API's own message (`error.message` for OpenAI, Anthropic
/// and Gemini, `error` for Ollama). Whitespace is collapsed and the result
/// is cut to [`MAX_ERROR_DETAIL`] characters.
pub(crate) fn error_detail(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        let error = json.get("error")?;
        error
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| error.as_str())
            .map(str::to_string)
    });

    let text = message.unwrap_or_else(|| body.to_string());
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= MAX_ERROR_DETAIL {
        collapsed
    } else {
        let cut: String = collapsed.chars().take(MAX_ERROR_DETAIL).collect();
        format!("{cut}...")
    }
}

/// Extracts `choices[0].message.content` from a Chat Completions response.
fn parse_openai_content(json: &Value) -> Result<String, ProviderError> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::ParseError("Missing choices[0].message.content in response".to_string())
        })
}

/// Extracts `content[0].text` from a Messages API response.
fn parse_anthropic_content(json: &Value) -> Result<String, ProviderError> {
    json.get("content")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|item| item.get("text"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::ParseError("Missing content[0].text in Anthropic response".to_string())
        })
}

/// Joins the text parts of the first Gemini candidate.
fn parse_gemini_content(json: &Value) -> Result<String, ProviderError> {
    let parts = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|cand| cand.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| {
            ProviderError::ParseError(
                "Missing candidates[0].content.parts in Gemini response".to_string(),
            )
        })?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(ProviderError::ParseError(
            "Gemini response contained no text".to_string(),
        ));
    }
    Ok(text)
}

// ==================== Factory ====================

/// Returns the default model for the given provider kind.
pub fn default_model(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAI => "gpt-4o-mini",
        ProviderKind::Anthropic => "claude-3-5-haiku-latest",
        ProviderKind::Gemini => "gemini-1.5-flash",
        ProviderKind::Ollama => "llama3.2",
    }
}

/// Returns the default API base URL for the given provider kind.
pub fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAI => OPENAI_API_URL,
        ProviderKind::Anthropic => ANTHROPIC_API_URL,
        ProviderKind::Gemini => GEMINI_API_URL,
        ProviderKind::Ollama => OLLAMA_DEFAULT_HOST,
    }
}

/// Creates a review provider from resolved settings.
///
/// Fails with `MissingCredentials` when a keyed provider has no key.
pub fn create_provider(settings: &ProviderSettings) -> Result<Box<dyn ReviewProvider>, ProviderError> {
    let client = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::NetworkFailure(e.to_string()))?;

    let model = settings.model.clone();
    let base_url = settings.base_url.trim_end_matches('/').to_string();

    let api_key = || {
        settings
            .api_key
            .clone()
            .ok_or(ProviderError::MissingCredentials {
                provider: settings.kind,
            })
    };

    let provider: Box<dyn ReviewProvider> = match settings.kind {
        ProviderKind::OpenAI => Box::new(OpenAIProvider::new(client, api_key()?, model, base_url)),
        ProviderKind::Anthropic => {
            Box::new(AnthropicProvider::new(client, api_key()?, model, base_url))
        }
        ProviderKind::Gemini => Box::new(GeminiProvider::new(client, api_key()?, model, base_url)),
        ProviderKind::Ollama => Box::new(OllamaProvider::new(client, model, base_url)),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::test_server::serve_once;

    /// Builds an HTTP client for use in tests.
    fn build_client() -> Client {
        Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client")
    }

    fn settings(kind: ProviderKind, api_key: Option<&str>) -> ProviderSettings {
        ProviderSettings {
            kind,
            api_key: api_key.map(str::to_string),
            model: default_model(kind).to_string(),
            base_url: default_base_url(kind).to_string(),
        }
    }

    // ==================== ProviderKind tests ====================

    #[test]
    fn test_provider_kind_display_round_trips() {
        for kind in ProviderKind::ALL {
            assert_eq!(ProviderKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }

    #[test]
    fn test_provider_kind_from_str_case_insensitive() {
        assert_eq!(
            ProviderKind::from_str("OpenAI").unwrap(),
            ProviderKind::OpenAI
        );
        assert_eq!(
            ProviderKind::from_str(" GEMINI ").unwrap(),
            ProviderKind::Gemini
        );
    }

    #[test]
    fn test_provider_kind_from_str_unknown() {
        match ProviderKind::from_str("mistral").unwrap_err() {
            ProviderError::UnsupportedProvider(name) => assert_eq!(name, "mistral"),
            other => panic!("Expected UnsupportedProvider, got: {other:?}"),
        }
    }

    #[test]
    fn test_valid_names_in_priority_order() {
        assert_eq!(ProviderKind::valid_names(), "openai, anthropic, gemini, ollama");
    }

    #[test]
    fn test_only_ollama_is_keyless() {
        assert!(ProviderKind::OpenAI.requires_api_key());
        assert!(ProviderKind::Anthropic.requires_api_key());
        assert!(ProviderKind::Gemini.requires_api_key());
        assert!(!ProviderKind::Ollama.requires_api_key());
        assert_eq!(ProviderKind::Gemini.setup_hint(), "GEMINI_API_KEY");
        assert_eq!(ProviderKind::Ollama.model_env(), "OLLAMA_MODEL");
    }

    #[test]
    fn test_default_models() {
        assert_eq!(default_model(ProviderKind::OpenAI), "gpt-4o-mini");
        assert_eq!(default_model(ProviderKind::Ollama), "llama3.2");
    }

    // ==================== create_provider tests ====================

    #[test]
    fn test_create_provider_with_keys() {
        for kind in [ProviderKind::OpenAI, ProviderKind::Anthropic, ProviderKind::Gemini] {
            assert!(create_provider(&settings(kind, Some("test-key"))).is_ok());
        }
    }

    #[test]
    fn test_create_provider_missing_key() {
        let err = create_provider(&settings(ProviderKind::Anthropic, None))
            .err()
            .expect("should fail without key");
        match err {
            ProviderError::MissingCredentials { provider } => {
                assert_eq!(provider, ProviderKind::Anthropic)
            }
            other => panic!("Expected MissingCredentials, got: {other:?}"),
        }
    }

    #[test]
    fn test_create_provider_ollama_without_key() {
        assert!(create_provider(&settings(ProviderKind::Ollama, None)).is_ok());
    }

    #[test]
    fn test_unreachable_server_is_network_failure() {
        let mut s = settings(ProviderKind::Ollama, None);
        s.base_url = "http://127.0.0.1:9".to_string();
        let provider = create_provider(&s).expect("provider");

        match provider.generate("system", "prompt").unwrap_err() {
            ProviderError::NetworkFailure(_) => {}
            other => panic!("Expected NetworkFailure, got: {other:?}"),
        }
    }

    // ==================== Request body construction tests ====================

    #[test]
    fn test_openai_request_body() {
        let provider = OpenAIProvider::new(
            build_client(),
            "test-key".to_string(),
            "gpt-4o-mini".to_string(),
            OPENAI_API_URL.to_string(),
        );

        let body = provider.build_request_body("Be a coach.", "Review my day.");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], MAX_TOKENS);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "Be a coach.");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Review my day.");
    }

    #[test]
    fn test_anthropic_request_body() {
        let provider = AnthropicProvider::new(
            build_client(),
            "test-key".to_string(),
            "claude-3-5-haiku-latest".to_string(),
            ANTHROPIC_API_URL.to_string(),
        );

        let body = provider.build_request_body("Be a coach.", "Review my day.");

        assert_eq!(body["model"], "claude-3-5-haiku-latest");
        assert_eq!(body["system"], "Be a coach.");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Review my day.");
    }

    #[test]
    fn test_gemini_request_body() {
        let provider = GeminiProvider::new(
            build_client(),
            "test-key".to_string(),
            "gemini-1.5-flash".to_string(),
            GEMINI_API_URL.to_string(),
        );

        let body = provider.build_request_body("Be a coach.", "Review my day.");

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be a coach.");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Review my day.");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], MAX_TOKENS);
    }

    #[test]
    fn test_ollama_request_body() {
        let provider = OllamaProvider::new(
            build_client(),
            "llama3.2".to_string(),
            OLLAMA_DEFAULT_HOST.to_string(),
        );

        let body = provider.build_request_body("Be a coach.", "Review my day.");

        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    // ==================== Response parsing tests ====================

    #[test]
    fn test_parse_openai_content_valid() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Solid day." } }
            ]
        });
        assert_eq!(parse_openai_content(&json).unwrap(), "Solid day.");
    }

    #[test]
    fn test_parse_openai_content_empty_choices() {
        let json = serde_json::json!({ "choices": [] });
        match parse_openai_content(&json).unwrap_err() {
            ProviderError::ParseError(msg) => assert!(msg.contains("choices[0].message.content")),
            other => panic!("Expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn test_parse_anthropic_content_valid() {
        let json = serde_json::json!({
            "content": [ { "type": "text", "text": "You shipped two tasks." } ]
        });
        assert_eq!(parse_anthropic_content(&json).unwrap(), "You shipped two tasks.");
    }

    #[test]
    fn test_parse_anthropic_content_missing() {
        let json = serde_json::json!({ "content": [] });
        assert!(matches!(
            parse_anthropic_content(&json),
            Err(ProviderError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_gemini_content_joins_parts() {
        let json = serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "Went well: " }, { "text": "focus." } ] } }
            ]
        });
        assert_eq!(parse_gemini_content(&json).unwrap(), "Went well: focus.");
    }

    #[test]
    fn test_parse_gemini_content_no_text() {
        let json = serde_json::json!({
            "candidates": [ { "content": { "parts": [] } } ]
        });
        assert!(matches!(
            parse_gemini_content(&json),
            Err(ProviderError::ParseError(_))
        ));
    }

    // ==================== Error detail tests ====================

    #[test]
    fn test_error_detail_prefers_api_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_detail(body), "Incorrect API key provided");

        let ollama = r#"{"error": "model 'llama9' not found"}"#;
        assert_eq!(error_detail(ollama), "model 'llama9' not found");
    }

    #[test]
    fn test_error_detail_truncates_and_collapses() {
        let body = format!("<html>\n  <body>{}</body>\n</html>", "x".repeat(3000));
        let detail = error_detail(&body);

        assert!(!detail.contains('\n'));
        assert!(detail.starts_with("<html> <body>"));
        assert!(detail.ends_with("..."));
        assert_eq!(detail.chars().count(), MAX_ERROR_DETAIL + 3);
    }

    #[test]
    fn test_error_detail_empty_body() {
        assert_eq!(error_detail(""), "");
        assert_eq!(error_detail("  \n "), "");
    }

    // ==================== HTTP round-trip tests ====================

    fn ollama_at(base_url: String) -> Box<dyn ReviewProvider> {
        create_provider(&ProviderSettings {
            kind: ProviderKind::Ollama,
            api_key: None,
            model: "llama3.2".to_string(),
            base_url,
        })
        .expect("provider")
    }

    #[test]
    fn test_ollama_success_reports_content_and_tokens() {
        let server = serve_once(
            "200 OK",
            r#"{"message": {"role": "assistant", "content": "Nice focus today."}, "prompt_eval_count": 120, "eval_count": 30}"#,
        );

        let response = ollama_at(server.url.clone())
            .generate("Be a coach.", "Review my day.")
            .expect("review succeeds");

        assert_eq!(response.content, "Nice focus today.");
        assert_eq!(response.provider, ProviderKind::Ollama);
        assert_eq!(response.tokens_used, Some(150));

        let request = server.request();
        assert!(request.starts_with("POST /api/chat "));
        assert!(request.contains("\"stream\":false"));
    }

    #[test]
    fn test_server_error_is_upstream_error() {
        let server = serve_once("500 Internal Server Error", r#"{"error": "out of memory"}"#);

        match ollama_at(server.url.clone()).generate("system", "prompt").unwrap_err() {
            ProviderError::UpstreamError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "out of memory");
            }
            other => panic!("Expected UpstreamError, got: {other:?}"),
        }
    }

    #[test]
    fn test_openai_unauthorized_is_upstream_error() {
        let server = serve_once(
            "401 Unauthorized",
            r#"{"error": {"message": "Incorrect API key provided"}}"#,
        );
        let provider = create_provider(&ProviderSettings {
            kind: ProviderKind::OpenAI,
            api_key: Some("sk-bad".to_string()),
            model: "gpt-4o-mini".to_string(),
            base_url: server.url.clone(),
        })
        .expect("provider");

        match provider.generate("system", "prompt").unwrap_err() {
            ProviderError::UpstreamError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Incorrect API key provided");
            }
            other => panic!("Expected UpstreamError, got: {other:?}"),
        }
        assert!(server
            .request()
            .to_lowercase()
            .contains("authorization: bearer sk-bad"));
    }

    #[test]
    fn test_timeout_constants() {
        assert_eq!(CONNECT_TIMEOUT.as_secs(), 30);
        assert_eq!(REQUEST_TIMEOUT.as_secs(), 120);
    }
}
