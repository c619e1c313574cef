//! Environment-driven configuration for the client and server binaries.
//!
//! Values come from the process environment, after an optional `.env` file
//! in the working directory has been loaded.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::options::{TransportOptions, DEFAULT_TIMEOUT};
use crate::providers::gemini::GEMINI_BASE_URL;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const GEMINI_URL_VAR: &str = "GEMINI_BASE_URL";
pub const RAG_URL_VAR: &str = "RAG_API_URL";
pub const TIMEOUT_VAR: &str = "TOOLBRIDGE_TIMEOUT_SECS";
pub const LOG_FILE_VAR: &str = "TOOLBRIDGE_LOG_FILE";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_RAG_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_CLIENT_LOG: &str = "toolbridge-client.log";
pub const DEFAULT_SERVER_LOG: &str = "rag_server.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please set {0} in your environment or .env file")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to load .env file: {0}")]
    DotEnv(String),
}

/// Load `.env` from the working directory if there is one.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::DotEnv(e.to_string())),
    }
}

/// Settings for the interactive client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub model: String,
    pub gemini_base_url: String,
    pub timeout: Duration,
    pub log_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(&lookup, API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;

        Ok(Self {
            api_key,
            model: non_empty(&lookup, MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: non_empty(&lookup, GEMINI_URL_VAR)
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            timeout: timeout(&lookup)?,
            log_file: non_empty(&lookup, LOG_FILE_VAR)
                .unwrap_or_else(|| DEFAULT_CLIENT_LOG.to_string())
                .into(),
        })
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions::new().with_timeout(self.timeout)
    }
}

/// Settings for the tool server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub rag_api_url: String,
    pub timeout: Duration,
    pub log_file: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            rag_api_url: non_empty(&lookup, RAG_URL_VAR)
                .unwrap_or_else(|| DEFAULT_RAG_API_URL.to_string()),
            timeout: timeout(&lookup)?,
            log_file: non_empty(&lookup, LOG_FILE_VAR)
                .unwrap_or_else(|| DEFAULT_SERVER_LOG.to_string())
                .into(),
        })
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions::new().with_timeout(self.timeout)
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn timeout<F>(lookup: &F) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = non_empty(lookup, TIMEOUT_VAR) else {
        return Ok(DEFAULT_TIMEOUT);
    };

    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var: TIMEOUT_VAR,
            value: raw,
            reason: "must be at least one second".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            var: TIMEOUT_VAR,
            value: raw,
            reason: e.to_string(),
        }),
    }
}
