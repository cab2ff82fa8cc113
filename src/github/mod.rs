//! GitHub commit lookups.
//!
//! Counts (and lists) the commits a user authored on a given day using the
//! commit search API. Count lookups never fail outright: any problem turns
//! into [`CommitCount::Unavailable`] so callers can show "N/A" and move on.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use reqwest::blocking::Client;
use serde_json::Value;

/// Base URL of the public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Timeout for the whole request (15 seconds).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from the GitHub API.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// Username or token is not configured.
    #[error("GitHub credentials not configured. Set GITHUB_USERNAME and GITHUB_TOKEN.")]
    MissingCredentials,

    /// Network or connection error.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Non-success HTTP status.
    #[error("HTTP error ({status}): {body}")]
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Commit count for a day, or the reason it could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitCount {
    Count(u32),
    Unavailable(String),
}

impl CommitCount {
    /// The count, if one was obtained.
    pub fn value(&self) -> Option<u32> {
        match self {
            CommitCount::Count(n) => Some(*n),
            CommitCount::Unavailable(_) => None,
        }
    }
}

impl fmt::Display for CommitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitCount::Count(n) => write!(f, "{n}"),
            CommitCount::Unavailable(_) => write!(f, "N/A"),
        }
    }
}

/// A single commit from the search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Commit message (first line only)
    pub message: String,
    /// Committer date converted to local time, if it parsed
    pub committed_at: Option<DateTime<Local>>,
}

/// Parsed commit search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSearch {
    /// Total matches reported by the API
    pub total_count: u32,
    /// The commits on the first result page
    pub commits: Vec<Commit>,
}

/// Client for the GitHub commit search endpoint.
pub struct CommitFetcher {
    client: Client,
    base_url: String,
}

impl CommitFetcher {
    /// Creates a fetcher for the public GitHub API.
    pub fn new() -> Result<Self, GithubError> {
        Self::with_url(GITHUB_API_URL)
    }

    /// Creates a fetcher against a custom API base URL.
    pub fn with_url(base_url: &str) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("reflex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GithubError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Searches commits authored by `username` with a committer date of `date`.
    pub fn search_commits(
        &self,
        username: &str,
        token: &str,
        date: NaiveDate,
    ) -> Result<CommitSearch, GithubError> {
        let url = format!("{}/search/commits", self.base_url);
        let query = format!("author:{username} committer-date:{}", date.format("%Y-%m-%d"));
        tracing::debug!("Searching GitHub commits: {query}");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query.as_str())])
            .header("Accept", "application/vnd.github.cloak-preview")
            .header("Authorization", format!("token {token}"))
            .send()
            .map_err(|e| GithubError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GithubError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .map_err(|e| GithubError::ParseError(e.to_string()))?;

        parse_search_response(&json)
    }

    /// Counts a user's commits for `date`, degrading to `Unavailable`.
    pub fn commit_count(
        &self,
        username: Option<&str>,
        token: Option<&str>,
        date: NaiveDate,
    ) -> CommitCount {
        let (Some(username), Some(token)) = (username, token) else {
            return CommitCount::Unavailable(GithubError::MissingCredentials.to_string());
        };

        match self.search_commits(username, token, date) {
            Ok(search) => CommitCount::Count(search.total_count),
            Err(e) => {
                tracing::warn!("GitHub commit lookup failed: {e}");
                CommitCount::Unavailable(e.to_string())
            }
        }
    }
}

/// Counts a user's commits for `date` against the public API.
///
/// Missing credentials short-circuit without any network traffic.
pub fn fetch_commit_count(
    username: Option<&str>,
    token: Option<&str>,
    date: NaiveDate,
) -> CommitCount {
    if username.is_none() || token.is_none() {
        return CommitCount::Unavailable(GithubError::MissingCredentials.to_string());
    }

    match CommitFetcher::new() {
        Ok(fetcher) => fetcher.commit_count(username, token, date),
        Err(e) => CommitCount::Unavailable(e.to_string()),
    }
}

/// Extracts `total_count` and `items[].commit` from a search response.
///
/// Falls back to the number of items when `total_count` is missing.
fn parse_search_response(json: &Value) -> Result<CommitSearch, GithubError> {
    let items = json
        .get("items")
        .and_then(|i| i.as_array())
        .ok_or_else(|| GithubError::ParseError("Missing items in search response".to_string()))?;

    let commits: Vec<Commit> = items
        .iter()
        .filter_map(|item| item.get("commit"))
        .map(|commit| {
            let message = commit
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("")
                .lines()
                .next()
                .unwrap_or("")
                .to_string();
            let committed_at = commit
                .get("committer")
                .and_then(|c| c.get("date"))
                .and_then(|d| d.as_str())
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                .map(|d| d.with_timezone(&Local));
            Commit {
                message,
                committed_at,
            }
        })
        .collect();

    let total_count = json
        .get("total_count")
        .and_then(|t| t.as_u64())
        .map(|t| u32::try_from(t).unwrap_or(u32::MAX))
        .unwrap_or(commits.len() as u32);

    Ok(CommitSearch {
        total_count,
        commits,
    })
}
