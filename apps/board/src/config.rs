use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Client configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    /// No client-side timeout unless set; the transport default applies.
    pub request_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` is the
    /// production entry point; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let api_url = require("ATS_API_URL")?.trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            bail!("ATS_API_URL must start with http:// or https:// (got '{api_url}')");
        }

        let request_timeout = match lookup("ATS_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .context("ATS_REQUEST_TIMEOUT_SECS must be a positive integer")?;
                if secs == 0 {
                    bail!("ATS_REQUEST_TIMEOUT_SECS must be a positive integer");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Config {
            api_url,
            api_token: require("ATS_API_TOKEN")?,
            request_timeout,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "warn".to_string()),
        })
    }
}
