//! `treasury`: command line front door to the National Financial System.
//!
//! The session lives in a JSON file (`TREASURY_SESSION_FILE`), so a `login`
//! carries over to later invocations until `logout` or a 401 clears it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;
mod config;
mod context;

use config::Config;
use context::AppContext;

#[derive(Parser)]
#[command(name = "treasury")]
#[command(about = "National Financial System command line")]
#[command(version)]
struct Cli {
    /// Skip confirmations and decorative output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Backend base URL (overrides TREASURY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides TREASURY_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with office credentials
    Login {
        /// Office name (prompted when omitted)
        office_name: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long, env = "TREASURY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in office
    Whoami,

    /// Headline ledger numbers
    Kpis,

    /// Recent ledger transactions
    Transactions {
        /// Show at most this many
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Ministries and budgets
    #[command(subcommand)]
    Ministries(cmd::ministries::MinistriesCommand),

    /// Ministry projects
    #[command(subcommand)]
    Projects(cmd::projects::ProjectsCommand),

    /// Expense requests and approvals
    #[command(subcommand)]
    Expenses(cmd::expenses::ExpensesCommand),

    /// Tax collection
    #[command(subcommand)]
    Tax(cmd::tax::TaxCommand),

    /// Stream live notifications for the signed-in wallet
    Watch {
        /// Give up after this many failed reconnects
        #[arg(long)]
        max_attempts: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }
    let ctx = AppContext::new(config, cli.quiet)?;

    let outcome = match cli.command {
        Commands::Login {
            office_name,
            password,
        } => cmd::session::login(&ctx, office_name, password).await,
        Commands::Logout => cmd::session::logout(&ctx),
        Commands::Whoami => cmd::session::whoami(&ctx),
        Commands::Kpis => cmd::ledger::kpis(&ctx).await,
        Commands::Transactions { limit } => cmd::ledger::transactions(&ctx, limit).await,
        Commands::Ministries(cmd) => cmd::ministries::run(&ctx, cmd).await,
        Commands::Projects(cmd) => cmd::projects::run(&ctx, cmd).await,
        Commands::Expenses(cmd) => cmd::expenses::run(&ctx, cmd).await,
        Commands::Tax(cmd) => cmd::tax::run(&ctx, cmd).await,
        Commands::Watch { max_attempts } => cmd::watch::run(&ctx, max_attempts).await,
    };

    if outcome.is_err() {
        ctx.report_sign_out();
    }
    outcome
}
