//! Public ledger view, open without signing in

use dioxus::prelude::*;
use treasury_client::{format_kes, Kpis, Transaction, TreasuryError};

use super::TransactionTable;
use crate::auth::use_session;
use crate::components::{LoadError, LoadingSpinner, StatCard};
use crate::routes::Route;

struct PublicLedger {
    kpis: Kpis,
    wallets: usize,
    blocks: usize,
    latest: Vec<Transaction>,
}

#[component]
pub fn Transparency() -> Element {
    let session = use_session();
    let client = session.client.clone();

    let ledger = use_resource(move || {
        let client = client.clone();
        async move {
            let transactions = client.transactions().await?;
            Ok::<_, TreasuryError>(PublicLedger {
                kpis: Kpis::from_transactions(&transactions),
                wallets: client.wallet_count().await?,
                blocks: client.block_count().await?,
                latest: transactions.into_iter().rev().take(20).collect(),
            })
        }
    });

    let (back, back_label) = if session.is_authenticated() {
        (Route::Dashboard {}, "Back to the portal")
    } else {
        (Route::Login {}, "Office sign in")
    };

    rsx! {
        div {
            class: "min-h-screen bg-gray-50",
            header {
                class: "bg-emerald-800 text-white",
                div {
                    class: "max-w-6xl mx-auto px-6 py-10",
                    h1 { class: "text-3xl font-bold mb-2", "National Financial Transparency Portal" }
                    p { class: "text-emerald-100", "Every public transfer, as recorded on the ledger." }
                    Link { to: back, class: "inline-block mt-4 text-sm underline", "{back_label}" }
                }
            }

            main {
                class: "max-w-6xl mx-auto px-6 py-8",
                match &*ledger.read() {
                    Some(Ok(ledger)) => rsx! {
                        div {
                            class: "grid grid-cols-1 md:grid-cols-4 gap-6 mb-8",
                            StatCard { title: "Public Funds Moved", value: format_kes(ledger.kpis.total_volume) }
                            StatCard { title: "Transactions", value: ledger.kpis.total_transactions.to_string(), color: "blue" }
                            StatCard { title: "Wallets", value: ledger.wallets.to_string(), color: "amber" }
                            StatCard { title: "Blocks", value: ledger.blocks.to_string(), color: "blue" }
                        }
                        TransactionTable { transactions: ledger.latest.clone(), title: "Latest Transactions" }
                    },
                    Some(Err(e)) => rsx! { LoadError { message: e.user_message() } },
                    None => rsx! { LoadingSpinner {} },
                }
            }
        }
    }
}
