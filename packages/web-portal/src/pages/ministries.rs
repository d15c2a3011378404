//! Ministry budgets: the super admin's allocation view and a ministry
//! admin's own balance with transfers to other ministries

use dioxus::prelude::*;
use treasury_client::{format_kes, AllocateBudget, BudgetTransfer, Ministry, NewMinistry, Role};

use super::{BUTTON, INPUT, LABEL, PANEL};
use crate::auth::use_session;
use crate::components::{use_notices, LoadError, LoadingSpinner, StatCard};
use crate::forms::{optional, parse_amount, required, selected_id};
use crate::routes::Route;

#[component]
pub fn Ministries() -> Element {
    let session = use_session();
    let client = session.client.clone();

    let mut ministries = use_resource(move || {
        let client = client.clone();
        async move { client.ministries().await }
    });

    let role = session.role();
    let own_ministry = session.current().and_then(|s| s.ministry_id());
    let on_change = move |_: ()| ministries.restart();

    let list = ministries.read();
    let list = match &*list {
        Some(Ok(list)) => list.clone(),
        Some(Err(e)) => {
            return rsx! {
                h1 { class: "text-2xl font-bold text-gray-900 mb-6", "Ministries" }
                LoadError { message: e.user_message() }
            }
        }
        None => return rsx! { LoadingSpinner {} },
    };

    if role == Some(Role::SuperAdmin) {
        let total_allocated = list.iter().map(|m| m.allocated_budget).sum();
        let total_remaining = list.iter().map(|m| m.remaining_balance).sum();

        return rsx! {
            div {
                h1 { class: "text-2xl font-bold text-gray-900 mb-6", "Ministries" }

                div {
                    class: "grid grid-cols-1 md:grid-cols-3 gap-6 mb-8",
                    StatCard { title: "Ministries", value: list.len().to_string(), color: "blue" }
                    StatCard { title: "Allocated", value: format_kes(total_allocated) }
                    StatCard { title: "Remaining", value: format_kes(total_remaining), color: "amber" }
                }

                MinistryGrid { ministries: list.clone() }

                div {
                    class: "grid grid-cols-1 lg:grid-cols-2 gap-6 mt-8",
                    AllocateBudgetForm { ministries: list.clone(), on_done: on_change }
                    AddMinistryForm { on_done: on_change }
                }
            }
        };
    }

    let Some(own) = list.iter().find(|m| Some(m.id) == own_ministry).cloned() else {
        return rsx! {
            h1 { class: "text-2xl font-bold text-gray-900 mb-6", "Ministries" }
            LoadError { message: "This office is not linked to a ministry." }
        };
    };
    let others: Vec<Ministry> = list.iter().filter(|m| m.id != own.id).cloned().collect();

    rsx! {
        div {
            h1 { class: "text-2xl font-bold text-gray-900 mb-1", "{own.name}" }
            if let Some(description) = &own.description {
                p { class: "text-sm text-gray-500 mb-6", "{description}" }
            }

            div {
                class: "grid grid-cols-1 md:grid-cols-3 gap-6 mb-8",
                StatCard { title: "Allocated Budget", value: format_kes(own.allocated_budget) }
                StatCard { title: "Used Funds", value: format_kes(own.used_funds), color: "amber" }
                StatCard {
                    title: "Remaining Balance",
                    value: format_kes(own.remaining_balance),
                    hint: "{own.utilization_percent()}% utilised",
                    color: "blue"
                }
            }

            div {
                class: "grid grid-cols-1 lg:grid-cols-2 gap-6",
                TransferForm { recipients: others, on_done: on_change }
                div {
                    class: PANEL,
                    h2 { class: "text-lg font-semibold text-gray-900 mb-2", "Projects and Expenses" }
                    p { class: "text-sm text-gray-500 mb-4", "Track projects and file expense requests for your ministry." }
                    Link {
                        to: Route::MinistryDetail { id: own.id },
                        class: "text-emerald-700 hover:underline text-sm",
                        "Open ministry workspace"
                    }
                }
            }
        }
    }
}

#[component]
fn MinistryGrid(ministries: Vec<Ministry>) -> Element {
    if ministries.is_empty() {
        return rsx! {
            div {
                class: "{PANEL} text-center",
                p { class: "text-gray-500", "No ministries registered yet." }
            }
        };
    }

    rsx! {
        div {
            class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4",
            for ministry in ministries {
                MinistryCard { key: "{ministry.id}", ministry }
            }
        }
    }
}

#[component]
fn MinistryCard(ministry: Ministry) -> Element {
    let utilization = ministry.utilization_percent();
    let code = ministry
        .code
        .clone()
        .or_else(|| ministry.ministry_type.clone())
        .unwrap_or_default();

    rsx! {
        Link {
            to: Route::MinistryDetail { id: ministry.id },
            class: "block bg-white rounded-lg shadow-sm border border-gray-200 p-4 hover:shadow-md transition-shadow",
            div {
                class: "flex items-center justify-between mb-2",
                h3 { class: "font-medium text-gray-900", "{ministry.name}" }
                span { class: "text-xs font-mono text-gray-500", "{code}" }
            }
            dl {
                class: "text-sm space-y-1",
                div {
                    class: "flex justify-between",
                    dt { class: "text-gray-500", "Allocated" }
                    dd { {format_kes(ministry.allocated_budget)} }
                }
                div {
                    class: "flex justify-between",
                    dt { class: "text-gray-500", "Remaining" }
                    dd { {format_kes(ministry.remaining_balance)} }
                }
            }
            div {
                class: "mt-3 h-2 bg-gray-100 rounded",
                div { class: "h-2 bg-emerald-500 rounded", style: "width: {utilization}%" }
            }
            p { class: "text-xs text-gray-400 mt-1", "{utilization}% utilised" }
        }
    }
}

#[component]
fn AddMinistryForm(on_done: EventHandler<()>) -> Element {
    let session = use_session();
    let mut notices = use_notices();

    let mut name = use_signal(String::new);
    let mut code = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut is_pending = use_signal(|| false);

    let client = session.client.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let ministry = NewMinistry {
            name: name().trim().to_string(),
            ministry_type: code().trim().to_string(),
            description: optional(&description()),
        };
        let client = client.clone();

        spawn(async move {
            is_pending.set(true);
            match client.create_ministry(&ministry).await {
                Ok(created) => {
                    notices.success("Ministry added", created.name);
                    name.set(String::new());
                    code.set(String::new());
                    description.set(String::new());
                    on_done.call(());
                }
                Err(e) => notices.api_error("Could not add ministry", &e),
            }
            is_pending.set(false);
        });
    };

    rsx! {
        form {
            class: PANEL,
            onsubmit: handle_submit,
            h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Add Ministry" }
            div {
                class: "space-y-3",
                div {
                    label { class: LABEL, "Name" }
                    input { class: INPUT, value: "{name}", oninput: move |e| name.set(e.value()) }
                }
                div {
                    label { class: LABEL, "Code" }
                    input { class: INPUT, value: "{code}", placeholder: "e.g. MOH", oninput: move |e| code.set(e.value()) }
                }
                div {
                    label { class: LABEL, "Description" }
                    textarea { class: INPUT, value: "{description}", oninput: move |e| description.set(e.value()) }
                }
                button { r#type: "submit", class: BUTTON, disabled: is_pending(), "Add Ministry" }
            }
        }
    }
}

#[component]
fn AllocateBudgetForm(ministries: Vec<Ministry>, on_done: EventHandler<()>) -> Element {
    let session = use_session();
    let mut notices = use_notices();

    let mut ministry = use_signal(String::new);
    let mut amount = use_signal(String::new);
    let mut purpose = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_pending = use_signal(|| false);

    let client = session.client.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let parsed = (|| {
            let id = selected_id(&ministry()).ok_or("Please select a ministry")?;
            let amount = parse_amount(&amount(), "Invalid allocation amount")?;
            let purpose = required(&purpose(), "Please provide a purpose for the allocation")?;
            Ok::<_, String>((id, AllocateBudget { amount, purpose }))
        })();
        let (id, allocation) = match parsed {
            Ok(parsed) => parsed,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        let client = client.clone();

        spawn(async move {
            is_pending.set(true);
            error.set(None);
            match client.allocate_budget(id, &allocation).await {
                Ok(_) => {
                    notices.success("Budget allocated", format_kes(allocation.amount));
                    amount.set(String::new());
                    purpose.set(String::new());
                    on_done.call(());
                }
                Err(e) => notices.api_error("Allocation failed", &e),
            }
            is_pending.set(false);
        });
    };

    rsx! {
        form {
            class: PANEL,
            onsubmit: handle_submit,
            h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Allocate Budget" }
            if let Some(err) = error() {
                p { class: "mb-3 text-sm text-orange-700", "{err}" }
            }
            div {
                class: "space-y-3",
                div {
                    label { class: LABEL, "Ministry" }
                    select {
                        class: INPUT,
                        value: "{ministry}",
                        onchange: move |e| ministry.set(e.value()),
                        option { value: "", "Select a ministry" }
                        for m in ministries.iter() {
                            option { key: "{m.id}", value: "{m.id}", "{m.name}" }
                        }
                    }
                }
                div {
                    label { class: LABEL, "Amount (KES)" }
                    input { class: INPUT, value: "{amount}", inputmode: "decimal", oninput: move |e| amount.set(e.value()) }
                }
                div {
                    label { class: LABEL, "Purpose" }
                    input { class: INPUT, value: "{purpose}", oninput: move |e| purpose.set(e.value()) }
                }
                button { r#type: "submit", class: BUTTON, disabled: is_pending(), "Allocate" }
            }
        }
    }
}

#[component]
fn TransferForm(recipients: Vec<Ministry>, on_done: EventHandler<()>) -> Element {
    let session = use_session();
    let mut notices = use_notices();

    let mut recipient = use_signal(String::new);
    let mut amount = use_signal(String::new);
    let mut purpose = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_pending = use_signal(|| false);

    let client = session.client.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let parsed = (|| {
            let to_ministry_id =
                selected_id(&recipient()).ok_or("Please select a recipient ministry")?;
            let amount = parse_amount(&amount(), "Invalid transfer amount")?;
            let purpose = required(&purpose(), "Please provide a purpose for the transfer")?;
            Ok::<_, String>(BudgetTransfer {
                to_ministry_id,
                amount,
                purpose,
            })
        })();
        let transfer = match parsed {
            Ok(transfer) => transfer,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        let client = client.clone();

        spawn(async move {
            is_pending.set(true);
            error.set(None);
            match client.transfer(&transfer).await {
                Ok(receipt) => {
                    notices.success(
                        "Transfer sent",
                        format!("{} to {}", format_kes(transfer.amount), receipt.to_ministry),
                    );
                    recipient.set(String::new());
                    amount.set(String::new());
                    purpose.set(String::new());
                    on_done.call(());
                }
                Err(e) => notices.api_error("Transfer failed", &e),
            }
            is_pending.set(false);
        });
    };

    rsx! {
        form {
            class: PANEL,
            onsubmit: handle_submit,
            h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Transfer Funds" }
            if let Some(err) = error() {
                p { class: "mb-3 text-sm text-orange-700", "{err}" }
            }
            div {
                class: "space-y-3",
                div {
                    label { class: LABEL, "Recipient ministry" }
                    select {
                        class: INPUT,
                        value: "{recipient}",
                        onchange: move |e| recipient.set(e.value()),
                        option { value: "", "Select a ministry" }
                        for m in recipients.iter() {
                            option { key: "{m.id}", value: "{m.id}", "{m.name}" }
                        }
                    }
                }
                div {
                    label { class: LABEL, "Amount (KES)" }
                    input { class: INPUT, value: "{amount}", inputmode: "decimal", oninput: move |e| amount.set(e.value()) }
                }
                div {
                    label { class: LABEL, "Purpose" }
                    input { class: INPUT, value: "{purpose}", oninput: move |e| purpose.set(e.value()) }
                }
                button { r#type: "submit", class: BUTTON, disabled: is_pending(), "Send Transfer" }
            }
        }
    }
}
