//! Expense requests and their approval

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use rust_decimal::Decimal;
use treasury_client::{
    format_kes, ExpenseDecision, ExpenseRequest, ExpenseStatus, NewExpenseRequest, Role,
};

use crate::context::AppContext;

#[derive(Subcommand)]
pub enum ExpensesCommand {
    /// List expense requests
    List {
        /// Ministry id (defaults to your own)
        #[arg(long)]
        ministry: Option<i64>,

        /// Only show requests still waiting for a decision
        #[arg(long)]
        pending: bool,
    },

    /// Ask the treasury to release funds
    Submit {
        #[arg(long)]
        amount: Decimal,

        #[arg(long)]
        purpose: String,

        /// Project the expense belongs to
        #[arg(long)]
        project: Option<i64>,
    },

    /// Approve a pending request
    Approve { id: i64 },

    /// Reject a pending request
    Reject { id: i64 },
}

pub async fn run(ctx: &AppContext, cmd: ExpensesCommand) -> Result<()> {
    match cmd {
        ExpensesCommand::List { ministry, pending } => list(ctx, ministry, pending).await,
        ExpensesCommand::Submit {
            amount,
            purpose,
            project,
        } => submit(ctx, amount, purpose, project).await,
        ExpensesCommand::Approve { id } => decide(ctx, id, ExpenseDecision::Approve).await,
        ExpensesCommand::Reject { id } => decide(ctx, id, ExpenseDecision::Reject).await,
    }
}

async fn list(ctx: &AppContext, ministry: Option<i64>, pending: bool) -> Result<()> {
    let session = ctx.require(Some(Role::MinistryAdmin))?;
    let ministry = ministry.or(session.ministry_id());

    let requests: Vec<ExpenseRequest> = ctx
        .client
        .expense_requests(ministry)
        .await?
        .into_iter()
        .filter(|r| !pending || r.status == ExpenseStatus::Pending)
        .collect();

    ctx.print_header(&format!("Expense requests ({})", requests.len()));
    for request in &requests {
        let status = match request.status {
            ExpenseStatus::Pending => "pending".yellow(),
            ExpenseStatus::Approved => "approved".green(),
            ExpenseStatus::Rejected => "rejected".red(),
        };
        println!(
            "{:>4}  ministry {:<4} {:>20}  {:<9} {}",
            request.id,
            request.ministry_id,
            format_kes(request.amount),
            status,
            request.purpose
        );
    }
    Ok(())
}

async fn submit(
    ctx: &AppContext,
    amount: Decimal,
    purpose: String,
    project: Option<i64>,
) -> Result<()> {
    let session = ctx.require(Some(Role::MinistryAdmin))?;
    let Some(ministry_id) = session.ministry_id() else {
        bail!("Only ministry offices can submit expense requests");
    };

    let request = ctx
        .client
        .submit_expense_request(&NewExpenseRequest {
            ministry_id,
            project_id: project,
            amount,
            purpose,
        })
        .await?;

    ctx.print_success(&format!(
        "Submitted request {} for {}",
        request.id,
        format_kes(request.amount)
    ));
    Ok(())
}

async fn decide(ctx: &AppContext, id: i64, decision: ExpenseDecision) -> Result<()> {
    ctx.require(Some(Role::SuperAdmin))?;

    let verb = match decision {
        ExpenseDecision::Approve => "Approve",
        ExpenseDecision::Reject => "Reject",
    };
    if !ctx.confirm(&format!("{} expense request {}?", verb, id), true)? {
        ctx.print_info("Cancelled.");
        return Ok(());
    }

    let request = ctx.client.decide_expense_request(id, decision).await?;

    ctx.print_success(&format!(
        "Request {} is now {:?}",
        request.id, request.status
    ));
    Ok(())
}
