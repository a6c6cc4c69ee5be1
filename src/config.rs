//! Process configuration loaded from the environment.

use crate::error::{CourierError, Result};

/// Connection settings for the hosted agents platform.
///
/// All three values are required; loading fails before any network call is
/// made when one is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the agents platform (`PROJECT_ENDPOINT`).
    pub endpoint: String,
    /// Model deployment identifier used when creating the agent
    /// (`MODEL_DEPLOYMENT_NAME`).
    pub model_deployment: String,
    /// Bearer credential for the platform (`PROJECT_API_KEY`).
    pub api_key: String,
}

impl Config {
    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            endpoint: required(&lookup, "PROJECT_ENDPOINT")?
                .trim_end_matches('/')
                .to_string(),
            model_deployment: required(&lookup, "MODEL_DEPLOYMENT_NAME")?,
            api_key: required(&lookup, "PROJECT_API_KEY")?,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CourierError::Configuration(format!(
            "Missing required environment variable {name}"
        ))),
    }
}
