//! Sign in, sign out, and who am I

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};

use crate::context::AppContext;

pub async fn login(
    ctx: &AppContext,
    office_name: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let office_name = match office_name {
        Some(name) => name,
        None => Input::<String>::with_theme(&ctx.theme())
            .with_prompt("Office name")
            .interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ctx.theme())
            .with_prompt("Password")
            .interact()?,
    };

    let session = ctx.client.login(&office_name, &password).await?;

    ctx.print_success(&format!(
        "Signed in as {} ({})",
        session.office_name(),
        session.role().label()
    ));
    ctx.print_info(&format!("Landing view: {}", session.role().landing_path()));
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    if !ctx.gate.is_authenticated() {
        ctx.print_info("Not signed in.");
        return Ok(());
    }
    ctx.client.logout()?;
    ctx.print_success("Signed out.");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.require(None)?;

    println!("{:<10} {}", "Office".bold(), session.office_name());
    println!("{:<10} {}", "Role".bold(), session.role().label());
    println!("{:<10} {}", "Wallet".bold(), session.wallet_address());
    if let Some(ministry_id) = session.ministry_id() {
        println!("{:<10} {}", "Ministry".bold(), ministry_id);
    }
    Ok(())
}
