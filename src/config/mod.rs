//! Configuration management
//!
//! Settings come from an optional `~/.reflex/config.yaml` and are then
//! overridden by environment variables. Variables may also live in a
//! `.env` file in the working directory or in `~/.reflex/.env`; the
//! process environment wins over both. The resolved [`Config`] is passed
//! explicitly to whatever needs it; nothing reads the environment later.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable names recognized by Reflex.
pub mod keys {
    pub const DEFAULT_PROVIDER: &str = "DEFAULT_PROVIDER";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
    pub const ANTHROPIC_MODEL: &str = "ANTHROPIC_MODEL";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    pub const OLLAMA_MODEL: &str = "OLLAMA_MODEL";
    pub const OLLAMA_HOST: &str = "OLLAMA_HOST";
    /// Older name for [`OLLAMA_HOST`], still honored.
    pub const OLLAMA_SERVER_URL: &str = "OLLAMA_SERVER_URL";
    pub const GITHUB_USERNAME: &str = "GITHUB_USERNAME";
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
}

/// Default focus session length in minutes.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Provider used by `review` when none is given on the command line
    pub default_provider: Option<String>,

    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,

    pub anthropic_api_key: Option<String>,
    pub anthropic_model: Option<String>,

    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,

    /// Setting either Ollama key marks the local provider as configured
    pub ollama_model: Option<String>,
    pub ollama_host: Option<String>,

    pub github_username: Option<String>,
    pub github_token: Option<String>,

    /// Focus session length used when `focus` is run without a duration
    pub focus_minutes: Option<u32>,
}

impl Config {
    /// Loads the config file (if any) and applies environment overrides.
    ///
    /// Lookup order per key: process environment, `./.env`,
    /// `~/.reflex/.env`, then the YAML file.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let file = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            Self::from_yaml(&text)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?
        } else {
            Self::default()
        };

        let mut dotenv_paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            dotenv_paths.push(cwd.join(".env"));
        }
        dotenv_paths.push(data_dir()?.join(".env"));
        let dotenv = read_dotenv_files(&dotenv_paths);

        Ok(Self::from_lookup(file, |key| {
            std::env::var(key)
                .ok()
                .and_then(non_empty)
                .or_else(|| dotenv.get(key).cloned())
        }))
    }

    /// Parses the YAML config file format.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_saphyr::from_str(text)?;
        Ok(config.normalized())
    }

    /// Overlays values from `lookup` (usually the process environment) on
    /// top of `base`. Environment values win; empty values are ignored.
    pub fn from_lookup<F>(base: Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).and_then(non_empty);
        let base = base.normalized();

        Self {
            default_provider: get(keys::DEFAULT_PROVIDER).or(base.default_provider),
            openai_api_key: get(keys::OPENAI_API_KEY).or(base.openai_api_key),
            openai_model: get(keys::OPENAI_MODEL).or(base.openai_model),
            anthropic_api_key: get(keys::ANTHROPIC_API_KEY).or(base.anthropic_api_key),
            anthropic_model: get(keys::ANTHROPIC_MODEL).or(base.anthropic_model),
            gemini_api_key: get(keys::GEMINI_API_KEY).or(base.gemini_api_key),
            gemini_model: get(keys::GEMINI_MODEL).or(base.gemini_model),
            ollama_model: get(keys::OLLAMA_MODEL).or(base.ollama_model),
            ollama_host: get(keys::OLLAMA_HOST)
                .or_else(|| get(keys::OLLAMA_SERVER_URL))
                .or(base.ollama_host),
            github_username: get(keys::GITHUB_USERNAME).or(base.github_username),
            github_token: get(keys::GITHUB_TOKEN).or(base.github_token),
            focus_minutes: base.focus_minutes,
        }
    }

    /// Focus duration to use when none is given explicitly.
    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_FOCUS_MINUTES)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.yaml"))
    }

    fn normalized(self) -> Self {
        Self {
            default_provider: self.default_provider.and_then(non_empty),
            openai_api_key: self.openai_api_key.and_then(non_empty),
            openai_model: self.openai_model.and_then(non_empty),
            anthropic_api_key: self.anthropic_api_key.and_then(non_empty),
            anthropic_model: self.anthropic_model.and_then(non_empty),
            gemini_api_key: self.gemini_api_key.and_then(non_empty),
            gemini_model: self.gemini_model.and_then(non_empty),
            ollama_model: self.ollama_model.and_then(non_empty),
            ollama_host: self.ollama_host.and_then(non_empty),
            github_username: self.github_username.and_then(non_empty),
            github_token: self.github_token.and_then(non_empty),
            focus_minutes: self.focus_minutes,
        }
    }
}

/// Directory holding the database and config file (`~/.reflex`).
pub fn data_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Could not find home directory")?
        .join(".reflex"))
}

/// Reads variables from `.env` files. Earlier files win; missing files
/// are skipped and unparsable ones are skipped with a warning.
pub fn read_dotenv_files(paths: &[PathBuf]) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for path in paths {
        for (key, value) in read_dotenv(path) {
            vars.entry(key).or_insert(value);
        }
    }
    vars
}

fn read_dotenv(path: &Path) -> Vec<(String, String)> {
    if !path.is_file() {
        return Vec::new();
    }

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            tracing::warn!("Could not read {}: {e}", path.display());
            return Vec::new();
        }
    };

    match iter.collect::<Result<Vec<_>, _>>() {
        Ok(vars) => {
            tracing::debug!("Loaded {} variables from {}", vars.len(), path.display());
            vars
        }
        Err(e) => {
            tracing::warn!("Ignoring {}: {e}", path.display());
            Vec::new()
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
