//! Ministry budgets, allocations, and transfers

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rust_decimal::Decimal;
use treasury_client::{format_kes, AllocateBudget, BudgetTransfer, Ministry, NewMinistry, Role};

use crate::context::AppContext;

#[derive(Subcommand)]
pub enum MinistriesCommand {
    /// List ministries with their budgets
    List,

    /// Register a new ministry
    Create {
        /// Display name, e.g. "Ministry of Health"
        #[arg(long)]
        name: String,

        /// Short code, e.g. MOH
        #[arg(long)]
        code: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Allocate budget from the treasury to a ministry
    Allocate {
        /// Ministry id
        id: i64,

        #[arg(long)]
        amount: Decimal,

        #[arg(long)]
        purpose: String,
    },

    /// Transfer funds from your ministry to another
    Transfer {
        /// Receiving ministry id
        #[arg(long)]
        to: i64,

        #[arg(long)]
        amount: Decimal,

        #[arg(long)]
        purpose: String,
    },
}

pub async fn run(ctx: &AppContext, cmd: MinistriesCommand) -> Result<()> {
    match cmd {
        MinistriesCommand::List => list(ctx).await,
        MinistriesCommand::Create {
            name,
            code,
            description,
        } => create(ctx, name, code, description).await,
        MinistriesCommand::Allocate {
            id,
            amount,
            purpose,
        } => allocate(ctx, id, amount, purpose).await,
        MinistriesCommand::Transfer {
            to,
            amount,
            purpose,
        } => transfer(ctx, to, amount, purpose).await,
    }
}

async fn list(ctx: &AppContext) -> Result<()> {
    let session = ctx.require(Some(Role::MinistryAdmin))?;
    let ministries = ctx.client.ministries().await?;

    ctx.print_header(&format!("Ministries ({})", ministries.len()));
    for ministry in &ministries {
        print_ministry(ministry, session.ministry_id() == Some(ministry.id));
    }
    Ok(())
}

fn print_ministry(ministry: &Ministry, own: bool) {
    let name = if own {
        format!("{} (yours)", ministry.name).bold().to_string()
    } else {
        ministry.name.clone()
    };
    println!(
        "{:>4}  {:<40} {:<6} allocated {:>20}  used {:>20}  left {:>20}  {:>3}%",
        ministry.id,
        name,
        ministry.code.as_deref().unwrap_or("-"),
        format_kes(ministry.allocated_budget),
        format_kes(ministry.used_funds),
        format_kes(ministry.remaining_balance),
        ministry.utilization_percent()
    );
}

async fn create(
    ctx: &AppContext,
    name: String,
    code: String,
    description: Option<String>,
) -> Result<()> {
    ctx.require(Some(Role::SuperAdmin))?;

    let ministry = ctx
        .client
        .create_ministry(&NewMinistry {
            name,
            ministry_type: code,
            description,
        })
        .await?;

    ctx.print_success(&format!(
        "Created {} (id {})",
        ministry.name, ministry.id
    ));
    if let Some(wallet) = &ministry.wallet_address {
        ctx.print_info(&format!("Wallet: {}", wallet));
    }
    Ok(())
}

async fn allocate(ctx: &AppContext, id: i64, amount: Decimal, purpose: String) -> Result<()> {
    ctx.require(Some(Role::SuperAdmin))?;

    ctx.client
        .allocate_budget(id, &AllocateBudget { amount, purpose })
        .await?;

    ctx.print_success(&format!(
        "{} allocated to ministry {}",
        format_kes(amount),
        id
    ));
    Ok(())
}

async fn transfer(ctx: &AppContext, to: i64, amount: Decimal, purpose: String) -> Result<()> {
    ctx.require(Some(Role::MinistryAdmin))?;

    if !ctx.confirm(
        &format!("Transfer {} to ministry {}?", format_kes(amount), to),
        true,
    )? {
        ctx.print_info("Cancelled.");
        return Ok(());
    }

    let receipt = ctx
        .client
        .transfer(&BudgetTransfer {
            to_ministry_id: to,
            amount,
            purpose,
        })
        .await?;

    ctx.print_success(&format!(
        "Transferred {} to {}",
        format_kes(receipt.amount.unwrap_or(amount)),
        receipt.to_ministry
    ));
    if let Some(id) = &receipt.transaction_id {
        ctx.print_info(&format!("Transaction {}", id));
    }
    Ok(())
}
