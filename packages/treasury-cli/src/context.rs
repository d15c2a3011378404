//! Application context with the session gate and API client

use anyhow::{bail, Context, Result};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::debug;

use treasury_client::{
    Access, FileStorage, Redirect, Role, Session, SessionGate, SignOutReason, TreasuryClient,
};

use crate::config::Config;

/// Application context passed to all commands
pub struct AppContext {
    pub quiet: bool,
    pub config: Config,
    pub gate: SessionGate,
    pub client: TreasuryClient,
}

impl AppContext {
    pub fn new(config: Config, quiet: bool) -> Result<Self> {
        let storage = FileStorage::open(&config.session_file).with_context(|| {
            format!(
                "Failed to open session file {}",
                config.session_file.display()
            )
        })?;
        let gate = SessionGate::new(storage);
        let state = gate.restore().context("Failed to restore session")?;
        debug!(authenticated = state.is_authenticated(), "Session restored");

        let client = TreasuryClient::new(config.client_options(), gate.clone())
            .context("Invalid API configuration")?;

        Ok(Self {
            quiet,
            config,
            gate,
            client,
        })
    }

    /// Session allowed to run a command that needs `role` (any signed-in
    /// identity when `None`).
    pub fn require(&self, role: Option<Role>) -> Result<Session> {
        match self.gate.authorize(role) {
            Access::Allow => self
                .gate
                .current()
                .context("Session disappeared while checking access"),
            Access::Deny(Redirect::Login) => {
                bail!("Not signed in. Run `treasury login` first.")
            }
            Access::Deny(Redirect::Home) => {
                let needed = role.map(|r| r.label()).unwrap_or("a different");
                bail!("This command needs the {} role", needed)
            }
        }
    }

    /// Print why the gate signed us out, if it did so on its own.
    pub fn report_sign_out(&self) {
        match self.gate.state().sign_out_reason() {
            Some(reason @ (SignOutReason::Unauthorized | SignOutReason::Expired)) => {
                self.print_warning(reason.message());
                self.print_info("Run `treasury login` to start a new session.");
            }
            _ => {}
        }
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", msg.bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.cyan());
        }
    }
}
