//! Live-update channel: `/ws/{wallet_address}` push notifications.
//!
//! The reconnect policy lives here so the native driver ([`LiveUpdates`]) and
//! the browser driver share it.

#[cfg(feature = "live")]
mod socket;

#[cfg(feature = "live")]
pub use socket::{LiveSubscription, LiveUpdates};

use std::time::Duration;

use url::Url;

use crate::error::{Result, TreasuryError};

/// What a live-update consumer sees.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent<T> {
    Connected,
    Message(T),
    /// The connection dropped; the next attempt starts after `delay`.
    Reconnecting { attempt: u32, delay: Duration },
}

/// Bounded exponential backoff with jitter.
///
/// Delay `n` (zero-based) is `initial * factor^n` capped at `max`, then
/// jittered into `[delay / 2, delay]`. [`Backoff::reset`] after every
/// successful connection.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    factor: u32,
    max_attempts: Option<u32>,
    jitter: bool,
    attempt: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30))
    }
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            factor: 2,
            max_attempts: None,
            jitter: true,
            attempt: 0,
        }
    }

    /// Give up after this many consecutive failed attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_factor(mut self, factor: u32) -> Self {
        self.factor = factor.max(1);
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Consecutive failures since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Un-jittered delay before retry number `attempt` (zero-based).
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let multiplier = self.factor.saturating_pow(attempt);
        self.initial
            .checked_mul(multiplier)
            .unwrap_or(self.max)
            .min(self.max)
    }

    /// Delay before the next attempt, or `None` once attempts are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.max_attempts.is_some_and(|max| self.attempt >= max) {
            return None;
        }
        let delay = self.base_delay(self.attempt);
        self.attempt = self.attempt.saturating_add(1);

        if !self.jitter {
            return Some(delay);
        }
        let half = delay / 2;
        let spread = (delay - half).as_millis() as u64;
        Some(half + Duration::from_millis(fastrand::u64(0..=spread)))
    }
}

/// `http(s)://host/prefix/` becomes `ws(s)://host/prefix/`.
pub fn ws_base_from_api(api: &Url) -> Result<Url> {
    let scheme = match api.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(TreasuryError::Live(format!(
                "Cannot derive a websocket URL from scheme '{other}'"
            )))
        }
    };
    let mut ws = api.clone();
    ws.set_scheme(scheme)
        .map_err(|_| TreasuryError::Live(format!("Cannot switch {api} to {scheme}")))?;
    Ok(ws)
}

/// Endpoint for one wallet's notifications.
pub fn live_url(ws_base: &Url, wallet_address: &str) -> Result<Url> {
    let wallet = wallet_address.trim();
    if wallet.is_empty() || wallet.contains('/') {
        return Err(TreasuryError::Invalid(format!(
            "Invalid wallet address: '{wallet_address}'"
        )));
    }
    Ok(ws_base.join(&format!("ws/{}", wallet))?)
}
