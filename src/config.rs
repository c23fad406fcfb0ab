use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::providers::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use crate::providers::searchapi::DEFAULT_SEARCHAPI_BASE_URL;
use crate::search::requirements::DEFAULT_MAX_ATTEMPTS;

const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    /// Without a key the offline mock booking provider is used
    pub searchapi_api_key: Option<String>,
    pub searchapi_base_url: String,
    pub anchors_path: Option<PathBuf>,
    pub call_timeout: Duration,
    pub llm_max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| get(key).filter(|value| !value.trim().is_empty());

        let timeout_secs: u64 = match non_empty("EXTERNAL_CALL_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .context("EXTERNAL_CALL_TIMEOUT_SECS must be a valid number")?,
            None => DEFAULT_CALL_TIMEOUT_SECS,
        };

        let llm_max_attempts: u32 = match non_empty("LLM_MAX_ATTEMPTS") {
            Some(raw) => raw
                .parse()
                .context("LLM_MAX_ATTEMPTS must be a valid number")?,
            None => DEFAULT_MAX_ATTEMPTS,
        };

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: non_empty("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            searchapi_api_key: non_empty("SEARCHAPI_IO_API_KEY"),
            searchapi_base_url: non_empty("SEARCHAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SEARCHAPI_BASE_URL.to_string()),
            anchors_path: non_empty("ANCHORS_PATH").map(PathBuf::from),
            call_timeout: Duration::from_secs(timeout_secs),
            llm_max_attempts,
        })
    }
}
