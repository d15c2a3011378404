//! National Financial System - Dioxus web portal
//!
//! A client-side application over the treasury REST API. Session state is
//! owned by a [`treasury_client::SessionGate`] persisted in localStorage.
//!
//! ## Running
//!
//! Development (with hot reload):
//! ```bash
//! TREASURY_API_URL=http://127.0.0.1:8000 dx serve --features web
//! ```
//!
//! Production build:
//! ```bash
//! dx build --release --features web
//! ```

#![allow(non_snake_case)]

mod app;
mod auth;
mod components;
mod config;
mod forms;
mod live;
mod pages;
mod routes;
mod storage;

fn main() {
    // The browser build logs through Dioxus' own console logger.
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dioxus::launch(app::App);
}
