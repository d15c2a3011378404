//! Financial overview: ledger volume, the busiest recipients and a
//! searchable transaction table

use std::collections::BTreeMap;

use dioxus::prelude::*;
use rust_decimal::Decimal;
use treasury_client::{format_kes, Kpis, Transaction};

use super::{TransactionTable, INPUT, PANEL};
use crate::auth::use_session;
use crate::components::{LoadError, LoadingSpinner, StatCard};

/// Recipients ranked by total received, largest first.
fn volume_by_recipient(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(tx.recipient.as_str()).or_default() += tx.amount;
    }
    let mut ranked: Vec<(String, Decimal)> = totals
        .into_iter()
        .map(|(recipient, total)| (recipient.to_string(), total))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[component]
pub fn Financial() -> Element {
    let session = use_session();
    let client = session.client.clone();
    let mut search = use_signal(String::new);

    let transactions = use_resource(move || {
        let client = client.clone();
        async move { client.transactions().await }
    });

    let loaded = transactions.read();
    let transactions = match &*loaded {
        Some(Ok(list)) => list,
        Some(Err(e)) => return rsx! { LoadError { message: e.user_message() } },
        None => return rsx! { LoadingSpinner {} },
    };

    let kpis = Kpis::from_transactions(transactions);
    let average = if kpis.total_transactions == 0 {
        Decimal::ZERO
    } else {
        kpis.total_volume / Decimal::from(kpis.total_transactions)
    };
    let top_recipients: Vec<_> = volume_by_recipient(transactions).into_iter().take(5).collect();
    let needle = search();
    let visible: Vec<Transaction> = transactions
        .iter()
        .rev()
        .filter(|tx| tx.matches(&needle))
        .cloned()
        .collect();

    rsx! {
        div {
            h1 { class: "text-2xl font-bold text-gray-900 mb-6", "Financial Overview" }

            div {
                class: "grid grid-cols-1 md:grid-cols-3 gap-6 mb-8",
                StatCard { title: "Total Volume", value: format_kes(kpis.total_volume) }
                StatCard { title: "Transactions", value: kpis.total_transactions.to_string(), color: "blue" }
                StatCard { title: "Average Transaction", value: format_kes(average), color: "amber" }
            }

            if !top_recipients.is_empty() {
                div {
                    class: "{PANEL} mb-6",
                    h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Largest Recipients" }
                    ul {
                        class: "space-y-2 text-sm",
                        for (recipient, total) in top_recipients {
                            li {
                                key: "{recipient}",
                                class: "flex justify-between",
                                span { class: "font-mono text-xs", "{recipient}" }
                                span { class: "font-medium", {format_kes(total)} }
                            }
                        }
                    }
                }
            }

            input {
                class: "{INPUT} mb-4",
                r#type: "search",
                placeholder: "Search by wallet, purpose or transaction id",
                value: "{search}",
                oninput: move |e| search.set(e.value())
            }
            TransactionTable { transactions: visible, title: "Transactions" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(recipient: &str, amount: i64) -> Transaction {
        Transaction {
            sender: "0xtreasury".into(),
            recipient: recipient.into(),
            amount: Decimal::from(amount),
            timestamp: "2024-06-01T10:00:00".into(),
            transaction_id: None,
            purpose: None,
        }
    }

    #[test]
    fn recipients_ranked_by_volume() {
        let ranked = volume_by_recipient(&[
            tx("0xroads", 500),
            tx("0xhealth", 300),
            tx("0xhealth", 400),
            tx("0xeducation", 100),
        ]);
        assert_eq!(
            ranked,
            vec![
                ("0xhealth".to_string(), Decimal::from(700)),
                ("0xroads".to_string(), Decimal::from(500)),
                ("0xeducation".to_string(), Decimal::from(100)),
            ]
        );
    }
}
