//! Follow live notifications until Ctrl-C

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use treasury_client::{Backoff, LiveEvent};

use crate::context::AppContext;

pub async fn run(ctx: &AppContext, max_attempts: Option<u32>) -> Result<()> {
    let session = ctx.require(None)?;

    let backoff = match max_attempts {
        Some(max) => Backoff::default().with_max_attempts(max),
        None => Backoff::default(),
    };
    let mut subscription = ctx
        .client
        .live_updates()?
        .with_backoff(backoff)
        .spawn::<Value>();

    ctx.print_header(&format!(
        "Watching {} (Ctrl-C to stop)",
        session.wallet_address()
    ));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                ctx.print_info("Stopping.");
                break;
            }
            event = subscription.next() => match event {
                Some(LiveEvent::Connected) => ctx.print_success("Connected"),
                Some(LiveEvent::Message(message)) => print_message(&message),
                Some(LiveEvent::Reconnecting { attempt, delay }) => ctx.print_warning(&format!(
                    "Connection lost, retry {} in {:.1}s",
                    attempt,
                    delay.as_secs_f64()
                )),
                // The driver ended on its own: it gave up or failed.
                None => break,
            },
        }
    }

    subscription
        .shutdown()
        .await
        .context("Live updates stopped")
}

fn print_message(message: &Value) {
    let kind = message
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("update");
    println!("{} {}", kind.bold(), message);
}
