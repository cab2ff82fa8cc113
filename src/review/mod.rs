//! Daily reviews, AI-generated or rule-based.
//!
//! [`review_day`] gathers the day's activity, composes a prompt and sends
//! it to one AI provider. When no provider is configured or the call fails
//! in any way, it falls back to [`offline::offline_review`] and records a
//! notice explaining why. Provider problems never surface as errors to the
//! caller; only database failures do.
//!
//! Provider choice is made by [`resolve_provider`] from an explicit
//! [`Config`]. Nothing in this module reads the environment.

pub mod offline;
pub mod prompt;
pub mod provider;

#[cfg(test)]
mod test_server;

use anyhow::Result;
use chrono::NaiveDate;

use crate::config::Config;
use crate::github::CommitCount;
use crate::stats::{self, DailyStats};
use crate::storage::Database;

pub use prompt::{compose_prompt, ReviewContext};
pub use provider::{
    create_provider, ProviderKind, ProviderSettings, ReviewProvider, ReviewResponse,
};

/// Errors from choosing or calling an AI provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider needs an API key that is not set.
    #[error("{} is not configured. Set {}.", .provider.label(), .provider.setup_hint())]
    MissingCredentials {
        /// The provider that was asked for.
        provider: ProviderKind,
    },

    /// Network or connection error when calling the provider API.
    #[error("Request failed: {0}")]
    NetworkFailure(String),

    /// The provider API returned a non-success HTTP status code.
    #[error("{}", describe_upstream(.status, .body))]
    UpstreamError {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The requested provider name is not one we support.
    #[error("Unsupported provider '{0}'. Valid providers: {}", ProviderKind::valid_names())]
    UnsupportedProvider(String),

    /// Failed to parse the provider API response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// No provider is configured at all.
    #[error("No AI provider configured. Set OPENAI_API_KEY, ANTHROPIC_API_KEY, GEMINI_API_KEY or OLLAMA_MODEL.")]
    NotConfigured,
}

/// The provider picked for a review and any notices about the choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSelection {
    pub settings: ProviderSettings,
    /// Messages the user should see, such as an ignored default.
    pub notices: Vec<String>,
}

/// How a review was produced.
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    /// An AI provider wrote the review.
    Ai(ReviewResponse),
    /// The rule-based review was used instead.
    Offline {
        /// Why the AI path was not taken.
        notice: String,
        /// The generated review text.
        review: String,
    },
}

/// A finished review along with what it was based on.
#[derive(Debug, Clone)]
pub struct DailyReview {
    pub date: NaiveDate,
    pub context: ReviewContext,
    /// Notices from provider selection, shown before the review.
    pub notices: Vec<String>,
    pub outcome: ReviewOutcome,
}

/// API key configured for `kind`, if any.
fn api_key_for(config: &Config, kind: ProviderKind) -> Option<&str> {
    match kind {
        ProviderKind::OpenAI => config.openai_api_key.as_deref(),
        ProviderKind::Anthropic => config.anthropic_api_key.as_deref(),
        ProviderKind::Gemini => config.gemini_api_key.as_deref(),
        ProviderKind::Ollama => None,
    }
}

/// Model configured for `kind`, if any.
fn model_for(config: &Config, kind: ProviderKind) -> Option<&str> {
    match kind {
        ProviderKind::OpenAI => config.openai_model.as_deref(),
        ProviderKind::Anthropic => config.anthropic_model.as_deref(),
        ProviderKind::Gemini => config.gemini_model.as_deref(),
        ProviderKind::Ollama => config.ollama_model.as_deref(),
    }
}

/// Whether `kind` can be used without being asked for explicitly.
///
/// Keyed providers need their API key. Ollama needs `OLLAMA_MODEL` or
/// `OLLAMA_HOST`, since it may not be running at all.
pub fn is_available(config: &Config, kind: ProviderKind) -> bool {
    match kind {
        ProviderKind::Ollama => config.ollama_model.is_some() || config.ollama_host.is_some(),
        _ => api_key_for(config, kind).is_some(),
    }
}

/// Available providers in priority order.
pub fn available_providers(config: &Config) -> Vec<ProviderKind> {
    ProviderKind::ALL
        .into_iter()
        .filter(|kind| is_available(config, *kind))
        .collect()
}

/// Builds the settings for calling `kind`.
///
/// Model precedence: `model` argument, then the configured model, then the
/// built-in default.
pub fn settings_for(
    config: &Config,
    kind: ProviderKind,
    model: Option<&str>,
) -> Result<ProviderSettings, ProviderError> {
    let api_key = api_key_for(config, kind).map(str::to_string);
    if kind.requires_api_key() && api_key.is_none() {
        return Err(ProviderError::MissingCredentials { provider: kind });
    }

    let model = model
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or_else(|| model_for(config, kind))
        .unwrap_or_else(|| provider::default_model(kind))
        .to_string();

    let base_url = match kind {
        ProviderKind::Ollama => config
            .ollama_host
            .clone()
            .unwrap_or_else(|| provider::default_base_url(kind).to_string()),
        _ => provider::default_base_url(kind).to_string(),
    };

    Ok(ProviderSettings {
        kind,
        api_key,
        model,
        base_url,
    })
}

/// Picks the provider for a review.
///
/// An explicit `requested` provider always wins and is never substituted.
/// Otherwise a valid, available `default_provider` is used, then the first
/// available provider in priority order. Returns `NotConfigured` when
/// nothing is available.
pub fn resolve_provider(
    config: &Config,
    requested: Option<&str>,
    model: Option<&str>,
) -> Result<ProviderSelection, ProviderError> {
    if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        let kind: ProviderKind = name.parse()?;
        return Ok(ProviderSelection {
            settings: settings_for(config, kind, model)?,
            notices: Vec::new(),
        });
    }

    let available = available_providers(config);
    let mut notices = Vec::new();

    let default = match config.default_provider.as_deref() {
        None => None,
        Some(name) => match name.parse::<ProviderKind>() {
            Ok(kind) if available.contains(&kind) => Some(kind),
            Ok(kind) => {
                notices.push(format!(
                    "Default provider '{kind}' is not configured (set {}). Choosing another provider.",
                    kind.setup_hint()
                ));
                None
            }
            Err(_) => {
                notices.push(format!(
                    "Default provider '{name}' is not supported. Valid providers: {}",
                    ProviderKind::valid_names()
                ));
                None
            }
        },
    };

    let kind = default
        .or_else(|| available.first().copied())
        .ok_or(ProviderError::NotConfigured)?;

    if available.len() > 1 {
        let names: Vec<String> = available.iter().map(|k| k.to_string()).collect();
        let suffix = if default.is_some() { " (default)" } else { "" };
        notices.push(format!(
            "Available AI providers: {}. Using: {kind}{suffix}",
            names.join(", ")
        ));
    }

    tracing::debug!(provider = %kind, "Resolved review provider");
    Ok(ProviderSelection {
        settings: settings_for(config, kind, model)?,
        notices,
    })
}

/// Sends one review request with the given settings.
fn dispatch(settings: &ProviderSettings, prompt: &str) -> Result<ReviewResponse, ProviderError> {
    tracing::debug!(
        provider = %settings.kind,
        model = %settings.model,
        "Requesting AI review"
    );
    let provider = create_provider(settings)?;
    let mut response = provider.generate(prompt::system_prompt(), prompt)?;
    response.content = normalize_whitespace(&response.content);
    if response.content.is_empty() {
        return Err(ProviderError::ParseError(
            "Provider returned an empty review".to_string(),
        ));
    }
    Ok(response)
}

/// One review request and what the user should be told about it.
#[derive(Debug)]
pub struct ReviewAttempt {
    /// Notices from provider selection.
    pub notices: Vec<String>,
    /// Provider that was called, if selection succeeded.
    pub provider: Option<ProviderKind>,
    pub result: Result<ReviewResponse, ProviderError>,
}

/// Generates an AI review for `prompt`.
///
/// Resolves the provider from `config`, then makes at most one request.
pub fn generate_review(
    config: &Config,
    provider: Option<&str>,
    model: Option<&str>,
    prompt: &str,
) -> ReviewAttempt {
    match resolve_provider(config, provider, model) {
        Ok(selection) => ReviewAttempt {
            result: dispatch(&selection.settings, prompt),
            provider: Some(selection.settings.kind),
            notices: selection.notices,
        },
        Err(e) => ReviewAttempt {
            notices: Vec::new(),
            provider: None,
            result: Err(e),
        },
    }
}

/// Reviews one day, falling back to the rule-based review on any
/// provider problem.
///
/// `fetch_commits` is called once with `date`; an unavailable count is
/// left out of the prompt.
pub fn review_day<F>(
    db: &Database,
    config: &Config,
    date: NaiveDate,
    provider: Option<&str>,
    model: Option<&str>,
    fetch_commits: F,
) -> Result<DailyReview>
where
    F: FnOnce(NaiveDate) -> CommitCount,
{
    let stats = stats::summarize(db, date)?;
    let context = ReviewContext {
        stats,
        commit_count: fetch_commits(date).value(),
        tasks: db.list_tasks(date)?,
        recent_logs: db.list_logs(date)?,
    };

    let attempt = generate_review(config, provider, model, &compose_prompt(&context));
    let outcome = match (attempt.result, attempt.provider) {
        (Ok(response), _) => ReviewOutcome::Ai(response),
        (Err(e), Some(kind)) => {
            tracing::warn!(provider = %kind, "AI review failed: {e}");
            offline_outcome(
                format!("{} review failed: {e}. Showing basic review instead.", kind.label()),
                &context.stats,
            )
        }
        (Err(ProviderError::NotConfigured), None) => {
            offline_outcome(ProviderError::NotConfigured.to_string(), &context.stats)
        }
        (Err(e), None) => offline_outcome(format!("{e} Showing basic review instead."), &context.stats),
    };

    Ok(DailyReview {
        date,
        context,
        notices: attempt.notices,
        outcome,
    })
}

/// Turns an HTTP failure into a readable message with a short detail.
fn describe_upstream(status: &u16, detail: &str) -> String {
    let status = *status;
    let reason = match status {
        401 | 403 => "authentication failed, check the API key",
        404 => "model or endpoint not found",
        429 => "rate limit or quota exceeded",
        500..=599 => "provider service error",
        _ => "request rejected",
    };

    let detail = provider::error_detail(detail);
    if detail.is_empty() {
        format!("{reason} (HTTP {status})")
    } else {
        format!("{reason} (HTTP {status}): {detail}")
    }
}

fn offline_outcome(notice: String, stats: &DailyStats) -> ReviewOutcome {
    ReviewOutcome::Offline {
        notice,
        review: offline::offline_review(stats),
    }
}

/// Normalizes whitespace in a review string.
///
/// Trims leading/trailing whitespace and collapses runs of 3+ consecutive
/// newlines down to 2 (one blank line).
fn normalize_whitespace(text: &str) -> String {
    let trimmed = text.trim();
    let mut result = String::with_capacity(trimmed.len());
    let mut consecutive_newlines = 0u32;

    for ch in trimmed.chars() {
        if ch == '\n' {
            consecutive_newlines += 1;
            if consecutive_newlines <= 2 {
                result.push(ch);
            }
        } else {
            consecutive_newlines = 0;
            result.push(ch);
        }
    }

    result
}
