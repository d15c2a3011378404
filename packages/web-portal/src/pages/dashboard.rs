//! Landing dashboard

use dioxus::prelude::*;
use treasury_client::{format_kes, Kpis, Transaction, TreasuryError};

use crate::auth::use_session;
use crate::components::{LoadError, LoadingSpinner, StatCard};
use crate::routes::Route;

struct Overview {
    kpis: Kpis,
    wallets: usize,
    blocks: usize,
    recent: Vec<Transaction>,
}

/// Headline ledger numbers, the latest transactions and shortcuts into the
/// views this session may open.
#[component]
pub fn Dashboard() -> Element {
    let session = use_session();
    let client = session.client.clone();

    let overview = use_resource(move || {
        let client = client.clone();
        async move {
            let transactions = client.transactions().await?;
            let wallets = client.wallet_count().await?;
            let blocks = client.block_count().await?;
            let kpis = Kpis::from_transactions(&transactions);
            let recent = transactions.into_iter().rev().take(8).collect();
            Ok::<_, TreasuryError>(Overview {
                kpis,
                wallets,
                blocks,
                recent,
            })
        }
    });

    let shortcuts: Vec<(Route, &'static str)> = [
        (Route::Ministries {}, "Manage Ministries"),
        (Route::Financial {}, "Financial Overview"),
        (Route::TaxPayments {}, "Tax Payments"),
        (Route::PayTax {}, "Pay Tax"),
        (Route::Transparency {}, "Public Ledger"),
    ]
    .into_iter()
    .filter(|(route, _)| route.is_public() || session.authorize(route.required_role()).is_allowed())
    .collect();

    let greeting = session
        .current()
        .map(|s| s.office_name().to_string())
        .unwrap_or_default();

    let overview = overview.read();

    rsx! {
        div {
            h1 { class: "text-2xl font-bold text-gray-900 mb-1", "Dashboard" }
            p { class: "text-sm text-gray-500 mb-6", "Signed in as {greeting}" }

            match &*overview {
                Some(Ok(overview)) => rsx! {
                    div {
                        class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6 mb-8",
                        StatCard {
                            title: "Transaction Volume",
                            value: format_kes(overview.kpis.total_volume),
                            hint: "All recorded transfers"
                        }
                        StatCard {
                            title: "Transactions",
                            value: overview.kpis.total_transactions.to_string(),
                            color: "blue"
                        }
                        StatCard {
                            title: "Wallets",
                            value: overview.wallets.to_string(),
                            color: "amber"
                        }
                        StatCard {
                            title: "Blocks",
                            value: overview.blocks.to_string(),
                            hint: "{overview.kpis.pending_transactions} pending",
                            color: "blue"
                        }
                    }

                    TransactionTable { transactions: overview.recent.clone(), title: "Recent Activity" }
                },
                Some(Err(e)) => rsx! {
                    LoadError { message: e.user_message() }
                },
                None => rsx! {
                    LoadingSpinner {}
                },
            }

            if !shortcuts.is_empty() {
                div {
                    class: "bg-white rounded-lg shadow-sm border border-gray-200 p-6 mt-8",
                    h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Quick Actions" }
                    div {
                        class: "flex flex-wrap gap-3",
                        for (route, label) in shortcuts {
                            Link {
                                key: "{label}",
                                to: route,
                                class: "inline-flex items-center gap-2 px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200",
                                "{label}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct TransactionTableProps {
    transactions: Vec<Transaction>,
    #[props(into)]
    title: String,
}

/// Ledger rows, newest first as given.
#[component]
pub fn TransactionTable(props: TransactionTableProps) -> Element {
    rsx! {
        div {
            class: "bg-white rounded-lg shadow-sm border border-gray-200",
            h2 { class: "text-lg font-semibold text-gray-900 px-6 py-4 border-b border-gray-200", "{props.title}" }
            if props.transactions.is_empty() {
                p { class: "p-6 text-sm text-gray-500", "No transactions recorded yet." }
            } else {
                table {
                    class: "w-full text-sm",
                    thead {
                        tr {
                            class: "text-left text-gray-500",
                            th { class: "px-6 py-2", "Time" }
                            th { class: "px-6 py-2", "From" }
                            th { class: "px-6 py-2", "To" }
                            th { class: "px-6 py-2", "Purpose" }
                            th { class: "px-6 py-2 text-right", "Amount" }
                        }
                    }
                    tbody {
                        for (i, tx) in props.transactions.iter().enumerate() {
                            tr {
                                key: "{i}",
                                class: "border-t border-gray-100",
                                td { class: "px-6 py-2 text-gray-500 whitespace-nowrap", "{tx.timestamp}" }
                                td { class: "px-6 py-2 font-mono text-xs", "{tx.sender}" }
                                td { class: "px-6 py-2 font-mono text-xs", "{tx.recipient}" }
                                td { class: "px-6 py-2", {tx.purpose.clone().unwrap_or_default()} }
                                td { class: "px-6 py-2 text-right font-medium", {format_kes(tx.amount)} }
                            }
                        }
                    }
                }
            }
        }
    }
}
