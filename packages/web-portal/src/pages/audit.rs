//! Audit trail over the ledger

use dioxus::prelude::*;
use treasury_client::{format_kes, Transaction, TreasuryError};

use super::{INPUT, PANEL};
use crate::auth::use_session;
use crate::components::{LoadError, LoadingSpinner, StatCard};

struct Trail {
    entries: Vec<Transaction>,
    blocks: usize,
    wallets: usize,
}

#[component]
pub fn Audit() -> Element {
    let session = use_session();
    let client = session.client.clone();
    let mut search = use_signal(String::new);

    let trail = use_resource(move || {
        let client = client.clone();
        async move {
            let entries = client.transactions().await?;
            let blocks = client.block_count().await?;
            let wallets = client.wallet_count().await?;
            Ok::<_, TreasuryError>(Trail {
                entries,
                blocks,
                wallets,
            })
        }
    });

    let loaded = trail.read();
    let trail = match &*loaded {
        Some(Ok(trail)) => trail,
        Some(Err(e)) => return rsx! { LoadError { message: e.user_message() } },
        None => return rsx! { LoadingSpinner {} },
    };

    let needle = search();
    let matching: Vec<&Transaction> = trail
        .entries
        .iter()
        .rev()
        .filter(|tx| tx.matches(&needle))
        .collect();

    rsx! {
        div {
            h1 { class: "text-2xl font-bold text-gray-900 mb-6", "Audit Logs" }

            div {
                class: "grid grid-cols-1 md:grid-cols-3 gap-6 mb-8",
                StatCard { title: "Ledger Entries", value: trail.entries.len().to_string() }
                StatCard { title: "Blocks", value: trail.blocks.to_string(), color: "blue" }
                StatCard { title: "Wallets", value: trail.wallets.to_string(), color: "amber" }
            }

            input {
                class: "{INPUT} mb-4",
                r#type: "search",
                placeholder: "Search entries",
                value: "{search}",
                oninput: move |e| search.set(e.value())
            }

            div {
                class: PANEL,
                if matching.is_empty() {
                    p { class: "text-sm text-gray-500", "No entries match." }
                }
                ol {
                    class: "space-y-3",
                    for (i, tx) in matching.into_iter().enumerate() {
                        li {
                            key: "{i}",
                            class: "border-l-2 border-emerald-400 pl-3",
                            p {
                                class: "text-xs text-gray-500",
                                "{tx.timestamp}"
                                if let Some(id) = &tx.transaction_id {
                                    " \u{00B7} {id}"
                                }
                            }
                            p {
                                class: "text-sm text-gray-900",
                                "{format_kes(tx.amount)} from "
                                span { class: "font-mono text-xs", "{tx.sender}" }
                                " to "
                                span { class: "font-mono text-xs", "{tx.recipient}" }
                            }
                            if let Some(purpose) = &tx.purpose {
                                p { class: "text-xs text-gray-600", "{purpose}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
