//! Tax payments and collection summaries

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;
use treasury_client::{format_kes, NewTaxPayment, PaymentMethod, Role, TaxPaymentQuery, TaxType};

use crate::context::AppContext;

#[derive(Clone, Copy, ValueEnum)]
pub enum Method {
    Mpesa,
    Card,
}

impl From<Method> for PaymentMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Mpesa => PaymentMethod::Mpesa,
            Method::Card => PaymentMethod::Card,
        }
    }
}

#[derive(Subcommand)]
pub enum TaxCommand {
    /// Record a tax payment
    Pay {
        #[arg(long)]
        name: String,

        /// National ID number
        #[arg(long)]
        id_number: String,

        /// income, vat, corporate, property, or excise
        #[arg(long)]
        tax_type: TaxType,

        #[arg(long)]
        amount: Decimal,

        #[arg(long, value_enum, default_value = "mpesa")]
        method: Method,

        /// Required for M-Pesa
        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// List recorded payments
    List {
        #[arg(long)]
        tax_type: Option<TaxType>,

        #[arg(long)]
        ministry: Option<i64>,

        /// Match taxpayer name, ID number, or receipt number
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Revenue summary
    Stats,
}

pub async fn run(ctx: &AppContext, cmd: TaxCommand) -> Result<()> {
    match cmd {
        TaxCommand::Pay {
            name,
            id_number,
            tax_type,
            amount,
            method,
            phone,
            email,
        } => {
            let payment = NewTaxPayment {
                taxpayer_name: name,
                id_number,
                tax_type,
                amount,
                payment_method: method.into(),
                phone_number: phone,
                email,
                ministry_id: None,
            };
            pay(ctx, payment).await
        }
        TaxCommand::List {
            tax_type,
            ministry,
            search,
            skip,
            limit,
        } => {
            let query = TaxPaymentQuery {
                skip,
                limit,
                ministry_id: ministry,
                tax_type,
            };
            list(ctx, query, search.as_deref()).await
        }
        TaxCommand::Stats => stats(ctx).await,
    }
}

async fn pay(ctx: &AppContext, payment: NewTaxPayment) -> Result<()> {
    ctx.require(None)?;

    let recorded = ctx.client.pay_tax(&payment).await?;

    ctx.print_success(&format!(
        "{} paid for {} via {}",
        format_kes(recorded.amount),
        recorded.tax_type.label(),
        recorded.payment_method.label()
    ));
    if let Some(receipt) = &recorded.receipt_number {
        ctx.print_info(&format!("Receipt {}", receipt));
    }
    Ok(())
}

async fn list(ctx: &AppContext, query: TaxPaymentQuery, search: Option<&str>) -> Result<()> {
    ctx.require(Some(Role::SuperAdmin))?;

    let payments: Vec<_> = ctx
        .client
        .tax_payments(&query)
        .await?
        .into_iter()
        .filter(|p| search.map_or(true, |needle| p.matches(needle)))
        .collect();

    ctx.print_header(&format!("Tax payments ({})", payments.len()));
    for payment in &payments {
        println!(
            "{:<12} {:<28} {:<10} {:<24} {:>20}  {}",
            payment.receipt_number.as_deref().unwrap_or("-"),
            payment.taxpayer_name,
            payment.id_number,
            payment.tax_type.label(),
            format_kes(payment.amount),
            payment.payment_method.label().dimmed()
        );
    }
    Ok(())
}

async fn stats(ctx: &AppContext) -> Result<()> {
    ctx.require(Some(Role::SuperAdmin))?;

    let stats = ctx.client.tax_payment_stats().await?;

    ctx.print_header("Tax revenue");
    println!("{:<22} {}", "Total revenue", format_kes(stats.total_revenue));
    println!("{:<22} {}", "Payments", stats.total_payments);
    println!("{:<22} {}", "Last 30 days", stats.recent_payments_30days);
    for total in &stats.by_tax_type {
        let label = total
            .tax_type
            .parse::<TaxType>()
            .map(|t| t.label())
            .unwrap_or(total.tax_type.as_str());
        println!(
            "  {:<28} {:>6} payments {:>20}",
            label,
            total.count,
            format_kes(total.total_amount)
        );
    }
    Ok(())
}
