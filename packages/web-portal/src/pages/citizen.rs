//! Citizen portal: landing page and tax payment

use dioxus::prelude::*;
use treasury_client::{format_kes, NewTaxPayment, PaymentMethod, TaxPayment, TaxType};

use super::{BUTTON, INPUT, LABEL, PANEL};
use crate::auth::use_session;
use crate::components::use_notices;
use crate::forms::{optional, parse_amount, required};
use crate::routes::Route;

#[component]
pub fn CitizenHome() -> Element {
    let session = use_session();
    let name = session
        .current()
        .map(|s| s.office_name().to_string())
        .unwrap_or_default();

    rsx! {
        div {
            div {
                class: "bg-emerald-700 text-white rounded-lg p-8 mb-8",
                h1 { class: "text-3xl font-bold mb-2", "Welcome to the Citizen Portal" }
                p { class: "text-emerald-100", "Signed in as {name}. Pay taxes and follow how public funds are spent." }
            }

            div {
                class: "grid grid-cols-1 md:grid-cols-2 gap-6",
                Link {
                    to: Route::PayTax {},
                    class: "{PANEL} block hover:shadow-md transition-shadow",
                    h2 { class: "text-lg font-semibold text-gray-900 mb-1", "Pay Tax" }
                    p { class: "text-sm text-gray-500", "Income, VAT, corporate, property and excise duty via M-Pesa or card." }
                }
                Link {
                    to: Route::Transparency {},
                    class: "{PANEL} block hover:shadow-md transition-shadow",
                    h2 { class: "text-lg font-semibold text-gray-900 mb-1", "Public Transparency" }
                    p { class: "text-sm text-gray-500", "See every ministry transfer recorded on the ledger." }
                }
            }
        }
    }
}

#[component]
pub fn PayTax() -> Element {
    let session = use_session();
    let mut notices = use_notices();

    let mut taxpayer_name = use_signal(String::new);
    let mut id_number = use_signal(String::new);
    let mut tax_type = use_signal(|| TaxType::Income);
    let mut amount = use_signal(String::new);
    let mut method = use_signal(|| PaymentMethod::Mpesa);
    let mut phone = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_pending = use_signal(|| false);
    let mut receipt = use_signal(|| None::<TaxPayment>);

    if let Some(paid) = receipt() {
        return rsx! {
            div {
                class: "{PANEL} max-w-lg",
                h1 { class: "text-2xl font-bold text-gray-900 mb-4", "Payment Received" }
                dl {
                    class: "text-sm space-y-2",
                    ReceiptLine { label: "Receipt", value: paid.receipt_number.clone().unwrap_or_else(|| "Pending".to_string()) }
                    ReceiptLine { label: "Taxpayer", value: paid.taxpayer_name.clone() }
                    ReceiptLine { label: "Tax type", value: paid.tax_type.label() }
                    ReceiptLine { label: "Amount", value: format_kes(paid.amount) }
                    ReceiptLine { label: "Method", value: paid.payment_method.label() }
                }
                button {
                    class: "{BUTTON} mt-6",
                    onclick: move |_| receipt.set(None),
                    "Make another payment"
                }
            }
        };
    }

    let client = session.client.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let parsed = (|| {
            let payment_method = method();
            let phone_number = optional(&phone());
            if payment_method == PaymentMethod::Mpesa && phone_number.is_none() {
                return Err("A phone number is required for M-Pesa payments".to_string());
            }
            Ok(NewTaxPayment {
                taxpayer_name: required(&taxpayer_name(), "Taxpayer name is required")?,
                id_number: required(&id_number(), "ID number is required")?,
                tax_type: tax_type(),
                amount: parse_amount(&amount(), "Please enter a valid amount")?,
                payment_method,
                phone_number,
                email: optional(&email()),
                ministry_id: None,
            })
        })();
        let payment = match parsed {
            Ok(payment) => payment,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        let client = client.clone();

        spawn(async move {
            is_pending.set(true);
            error.set(None);
            match client.pay_tax(&payment).await {
                Ok(paid) => {
                    notices.success("Payment successful", format_kes(paid.amount));
                    amount.set(String::new());
                    receipt.set(Some(paid));
                }
                Err(e) => notices.api_error("Payment failed", &e),
            }
            is_pending.set(false);
        });
    };

    rsx! {
        form {
            class: "{PANEL} max-w-2xl",
            onsubmit: handle_submit,
            h1 { class: "text-2xl font-bold text-gray-900 mb-6", "Pay Tax" }
            if let Some(err) = error() {
                p { class: "mb-4 text-sm text-orange-700", "{err}" }
            }
            div {
                class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                div {
                    label { class: LABEL, "Full name" }
                    input { class: INPUT, value: "{taxpayer_name}", oninput: move |e| taxpayer_name.set(e.value()) }
                }
                div {
                    label { class: LABEL, "National ID number" }
                    input { class: INPUT, value: "{id_number}", oninput: move |e| id_number.set(e.value()) }
                }
                div {
                    label { class: LABEL, "Tax type" }
                    select {
                        class: INPUT,
                        onchange: move |e| {
                            if let Ok(parsed) = e.value().parse() {
                                tax_type.set(parsed);
                            }
                        },
                        for t in TaxType::variants() {
                            option {
                                key: "{t.as_str()}",
                                value: t.as_str(),
                                selected: *t == tax_type(),
                                "{t.label()}"
                            }
                        }
                    }
                }
                div {
                    label { class: LABEL, "Amount (KES)" }
                    input { class: INPUT, value: "{amount}", inputmode: "decimal", oninput: move |e| amount.set(e.value()) }
                }
                div {
                    label { class: LABEL, "Payment method" }
                    div {
                        class: "flex gap-4 text-sm",
                        label {
                            input {
                                r#type: "radio",
                                name: "method",
                                checked: method() == PaymentMethod::Mpesa,
                                onchange: move |_| method.set(PaymentMethod::Mpesa)
                            }
                            " M-Pesa"
                        }
                        label {
                            input {
                                r#type: "radio",
                                name: "method",
                                checked: method() == PaymentMethod::Card,
                                onchange: move |_| method.set(PaymentMethod::Card)
                            }
                            " Card"
                        }
                    }
                }
                if method() == PaymentMethod::Mpesa {
                    div {
                        label { class: LABEL, "M-Pesa phone number" }
                        input { class: INPUT, r#type: "tel", placeholder: "07XX XXX XXX", value: "{phone}", oninput: move |e| phone.set(e.value()) }
                    }
                }
                div {
                    label { class: LABEL, "Email (optional)" }
                    input { class: INPUT, r#type: "email", value: "{email}", oninput: move |e| email.set(e.value()) }
                }
            }
            button {
                r#type: "submit",
                class: "{BUTTON} mt-6",
                disabled: is_pending(),
                if is_pending() { "Processing..." } else { "Pay Now" }
            }
        }
    }
}

#[component]
fn ReceiptLine(label: &'static str, #[props(into)] value: String) -> Element {
    rsx! {
        div {
            class: "flex justify-between",
            dt { class: "text-gray-500", "{label}" }
            dd { class: "font-medium text-gray-900", "{value}" }
        }
    }
}
