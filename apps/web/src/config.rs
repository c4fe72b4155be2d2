use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

/// Name of the credential, both as an environment variable and as a key in the secrets file.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
const DEFAULT_SECRETS_FILE: &str = "secrets.toml";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Application configuration loaded from environment variables.
/// Fails at startup if a setting is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub openai_base_url: String,
    pub secrets_file: PathBuf,
    /// Request body cap for the page form, which may carry two file uploads.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            secrets_file: std::env::var("SECRETS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_FILE)),
            max_upload_bytes: parse_upload_limit(
                &std::env::var("MAX_UPLOAD_MB")
                    .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_MB.to_string()),
            )?,
        })
    }
}

/// Megabytes to bytes; a value too large for `usize` is rejected.
fn parse_upload_limit(megabytes: &str) -> Result<usize> {
    megabytes
        .trim()
        .parse::<usize>()
        .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
        .checked_mul(1024 * 1024)
        .context("MAX_UPLOAD_MB is too large")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set in the environment or in {}", .secrets_file.display())]
    MissingCredential { secrets_file: PathBuf },

    #[error("Failed to read secrets file {}: {message}", .path.display())]
    SecretsFile { path: PathBuf, message: String },
}

/// The completion API credential. Loaded once at startup and never mutated.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub fn from_static(key: &str) -> Self {
        ApiKey(key.to_string())
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "OPENAI_API_KEY")]
    openai_api_key: Option<String>,
}

/// Reads the API key from the environment, falling back to the secrets file.
pub fn load_api_key(config: &Config) -> Result<ApiKey, ConfigError> {
    resolve_api_key(std::env::var(API_KEY_VAR).ok(), &config.secrets_file)
}

/// Environment value wins; a blank value counts as absent.
/// A missing secrets file is not an error by itself, only a missing key is.
fn resolve_api_key(env_value: Option<String>, secrets_file: &Path) -> Result<ApiKey, ConfigError> {
    if let Some(key) = non_blank(env_value) {
        return Ok(ApiKey(key));
    }

    let raw = match std::fs::read_to_string(secrets_file) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingCredential {
                secrets_file: secrets_file.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(ConfigError::SecretsFile {
                path: secrets_file.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    let parsed: SecretsFile = toml::from_str(&raw).map_err(|e| ConfigError::SecretsFile {
        path: secrets_file.to_path_buf(),
        message: e.to_string(),
    })?;

    non_blank(parsed.openai_api_key)
        .map(ApiKey)
        .ok_or_else(|| ConfigError::MissingCredential {
            secrets_file: secrets_file.to_path_buf(),
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
