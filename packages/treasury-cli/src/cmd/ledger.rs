//! Public ledger views

use anyhow::Result;
use colored::Colorize;
use treasury_client::format_kes;

use crate::context::AppContext;

pub async fn kpis(ctx: &AppContext) -> Result<()> {
    let kpis = ctx.client.kpis().await?;

    ctx.print_header("Ledger");
    println!("{:<22} {}", "Transactions", kpis.total_transactions);
    println!("{:<22} {}", "Volume", format_kes(kpis.total_volume));
    println!("{:<22} {}", "Pending", kpis.pending_transactions);

    // Counts come from separate endpoints; a failure there should not hide
    // the numbers above.
    match ctx.client.wallet_count().await {
        Ok(count) => println!("{:<22} {}", "Registered wallets", count),
        Err(e) => ctx.print_warning(&format!("Wallet count unavailable: {}", e.user_message())),
    }
    match ctx.client.block_count().await {
        Ok(count) => println!("{:<22} {}", "Blocks", count),
        Err(e) => ctx.print_warning(&format!("Block count unavailable: {}", e.user_message())),
    }
    Ok(())
}

pub async fn transactions(ctx: &AppContext, limit: usize) -> Result<()> {
    let transactions = ctx.client.transactions().await?;

    ctx.print_header(&format!(
        "Transactions ({} of {})",
        transactions.len().min(limit),
        transactions.len()
    ));
    for tx in transactions.iter().rev().take(limit) {
        println!(
            "{:<20} {:<18} -> {:<18} {:>20}  {}",
            tx.timestamp.dimmed(),
            tx.sender,
            tx.recipient,
            format_kes(tx.amount),
            tx.purpose.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}
