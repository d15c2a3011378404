//! Client for the National Financial System backend.
//!
//! The backend owns the ledger, budgets and authentication. This crate owns
//! the client side of that relationship: who is signed in, which views that
//! identity may open, and the typed REST and live-update calls made on its
//! behalf.
//!
//! # Example
//!
//! ```rust,ignore
//! use treasury_client::{ClientOptions, MemoryStorage, SessionGate, TreasuryClient};
//!
//! let gate = SessionGate::new(MemoryStorage::new());
//! gate.restore()?;
//!
//! let client = TreasuryClient::new(ClientOptions::default(), gate.clone())?;
//! client.login("FinanceOffice", "secret").await?;
//!
//! for ministry in client.ministries().await? {
//!     println!("{} ({})", ministry.name, ministry.remaining_balance);
//! }
//! ```

pub mod client;
pub mod error;
pub mod live;
pub mod session;
pub mod token;
pub mod types;

pub use client::{ClientOptions, TreasuryClient, DEFAULT_API_URL};
pub use error::{flatten_error_body, Result, StorageError, TokenError, TreasuryError};
pub use live::{Backoff, LiveEvent};
#[cfg(feature = "live")]
pub use live::{LiveSubscription, LiveUpdates};
pub use session::{
    authorize, Access, AuthState, FileStorage, Identity, MemoryStorage, Redirect, Role, Session,
    SessionGate, SessionStorage, SignOutReason,
};
pub use types::*;
