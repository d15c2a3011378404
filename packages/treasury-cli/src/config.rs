use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use treasury_client::{ClientOptions, DEFAULT_API_URL};

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub ws_url: Option<String>,
    pub session_file: PathBuf,
    pub preflight_expiry: bool,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_url: non_empty("TREASURY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            ws_url: non_empty("TREASURY_WS_URL"),
            session_file: non_empty("TREASURY_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".treasury/session.json")),
            preflight_expiry: match non_empty("TREASURY_PREFLIGHT_EXPIRY") {
                Some(value) => parse_flag(&value)
                    .context("TREASURY_PREFLIGHT_EXPIRY must be true or false")?,
                None => false,
            },
            request_timeout: Duration::from_secs(
                non_empty("TREASURY_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .context("TREASURY_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_url: self.api_url.clone(),
            ws_url: self.ws_url.clone(),
            request_timeout: self.request_timeout,
            preflight_expiry: self.preflight_expiry,
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("not a boolean: {other}"),
    }
}
