//! Build-time configuration.
//!
//! The browser has no process environment, so the values are baked in by
//! `dx build` from the same variables the CLI reads at run time.

use std::time::Duration;

use treasury_client::{ClientOptions, DEFAULT_API_URL};

pub fn client_options() -> ClientOptions {
    ClientOptions {
        api_url: option_env!("TREASURY_API_URL")
            .unwrap_or(DEFAULT_API_URL)
            .to_string(),
        ws_url: option_env!("TREASURY_WS_URL").map(str::to_string),
        request_timeout: Duration::from_secs(30),
        preflight_expiry: matches!(
            option_env!("TREASURY_PREFLIGHT_EXPIRY"),
            Some("1" | "true" | "yes" | "on")
        ),
    }
}
