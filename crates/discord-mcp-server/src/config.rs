//! Runtime configuration resolved at startup.

use std::fmt;

use thiserror::Error;

use crate::discord::DISCORD_API_BASE;

/// Environment variable holding the bot token unless overridden.
pub const DEFAULT_TOKEN_ENV: &str = "DISCORD_TOKEN";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingToken(String),
    #[error("Invalid API base URL: {0}")]
    InvalidApiBase(String),
}

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        let api_base = api_base.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken(DEFAULT_TOKEN_ENV.to_string()));
        }
        if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
            return Err(ConfigError::InvalidApiBase(api_base));
        }
        Ok(Self {
            token: token.trim().to_string(),
            api_base,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        })
    }

    /// Read the token from `token_var`. Unset and empty are both fatal.
    pub fn from_env(token_var: &str, api_base: Option<String>) -> Result<Self, ConfigError> {
        let token = std::env::var(token_var)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingToken(token_var.to_string()))?;
        Self::new(token, api_base.unwrap_or_else(|| DISCORD_API_BASE.to_string()))
    }
}
