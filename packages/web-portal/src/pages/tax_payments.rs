//! Tax revenue summary and the payment register

use dioxus::prelude::*;
use treasury_client::{format_kes, TaxPaymentQuery, TaxType};

use super::{INPUT, PANEL};
use crate::auth::use_session;
use crate::components::{LoadError, LoadingSpinner, StatCard};

#[component]
pub fn TaxPayments() -> Element {
    let session = use_session();
    let mut search = use_signal(String::new);
    let mut tax_type = use_signal(|| None::<TaxType>);

    let stats = use_resource({
        let client = session.client.clone();
        move || {
            let client = client.clone();
            async move { client.tax_payment_stats().await }
        }
    });

    // Re-fetches whenever the tax type filter changes
    let payments = use_resource({
        let client = session.client.clone();
        move || {
            let client = client.clone();
            let query = TaxPaymentQuery {
                tax_type: tax_type(),
                ..TaxPaymentQuery::default()
            };
            async move { client.tax_payments(&query).await }
        }
    });

    let needle = search();

    rsx! {
        div {
            h1 { class: "text-2xl font-bold text-gray-900 mb-6", "Tax Payments" }

            match &*stats.read() {
                Some(Ok(stats)) => rsx! {
                    div {
                        class: "grid grid-cols-1 md:grid-cols-3 gap-6 mb-8",
                        StatCard { title: "Total Revenue", value: format_kes(stats.total_revenue) }
                        StatCard { title: "Payments", value: stats.total_payments.to_string(), color: "blue" }
                        StatCard {
                            title: "Last 30 Days",
                            value: stats.recent_payments_30days.to_string(),
                            hint: "payments",
                            color: "amber"
                        }
                    }
                },
                Some(Err(e)) => rsx! { LoadError { message: e.user_message() } },
                None => rsx! { LoadingSpinner {} },
            }

            div {
                class: "flex flex-col md:flex-row gap-3 mb-4",
                input {
                    class: INPUT,
                    r#type: "search",
                    placeholder: "Search by name, ID number or receipt",
                    value: "{search}",
                    oninput: move |e| search.set(e.value())
                }
                select {
                    class: INPUT,
                    onchange: move |e| tax_type.set(e.value().parse().ok()),
                    option { value: "", "All tax types" }
                    for t in TaxType::variants() {
                        option { key: "{t.as_str()}", value: t.as_str(), "{t.label()}" }
                    }
                }
            }

            match &*payments.read() {
                Some(Ok(list)) => {
                    let rows: Vec<_> = list.iter().filter(|p| p.matches(&needle)).collect();
                    rsx! {
                        div {
                            class: PANEL,
                            if rows.is_empty() {
                                p { class: "text-sm text-gray-500", "No payments match." }
                            } else {
                                table {
                                    class: "w-full text-sm",
                                    thead {
                                        tr {
                                            class: "text-left text-gray-500",
                                            th { class: "py-2", "Receipt" }
                                            th { class: "py-2", "Taxpayer" }
                                            th { class: "py-2", "ID Number" }
                                            th { class: "py-2", "Tax Type" }
                                            th { class: "py-2", "Method" }
                                            th { class: "py-2 text-right", "Amount" }
                                        }
                                    }
                                    tbody {
                                        for payment in rows {
                                            tr {
                                                key: "{payment.id}",
                                                class: "border-t border-gray-100",
                                                td { class: "py-2 font-mono text-xs", {payment.receipt_number.clone().unwrap_or_else(|| "-".to_string())} }
                                                td { class: "py-2", "{payment.taxpayer_name}" }
                                                td { class: "py-2", "{payment.id_number}" }
                                                td { class: "py-2", "{payment.tax_type.label()}" }
                                                td { class: "py-2", "{payment.payment_method.label()}" }
                                                td { class: "py-2 text-right font-medium", {format_kes(payment.amount)} }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                Some(Err(e)) => rsx! { LoadError { message: e.user_message() } },
                None => rsx! { LoadingSpinner {} },
            }
        }
    }
}
