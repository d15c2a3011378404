//! One ministry's workspace: projects and expense requests

use dioxus::prelude::*;
use treasury_client::{
    format_kes, ExpenseRequest, ExpenseStatus, Ministry, NewExpenseRequest, NewProject, Project,
    ProjectStatus, TreasuryClient, TreasuryError,
};

use super::{BUTTON, INPUT, LABEL, PANEL};
use crate::auth::use_session;
use crate::components::{use_notices, LoadError, LoadingSpinner, Notices};
use crate::forms::{optional, parse_amount, required, selected_id};

#[derive(Clone, PartialEq)]
struct Workspace {
    ministry: Option<Ministry>,
    projects: Vec<Project>,
    expenses: Vec<ExpenseRequest>,
}

async fn load_workspace(client: &TreasuryClient, id: i64) -> Result<Workspace, TreasuryError> {
    let ministry = client.ministries().await?.into_iter().find(|m| m.id == id);
    let projects = client.projects(Some(id)).await?;
    let expenses = client.expense_requests(Some(id)).await?;
    Ok(Workspace {
        ministry,
        projects,
        expenses,
    })
}

#[component]
pub fn MinistryDetail(id: i64) -> Element {
    let session = use_session();
    let client = session.client.clone();

    let mut workspace = use_resource(use_reactive!(|id| {
        let client = client.clone();
        async move { load_workspace(&client, id).await }
    }));

    let can_decide = session.role().is_some_and(|r| r.is_super_admin());
    let on_change = move |_: ()| workspace.restart();

    let loaded = workspace.read();
    let ws = match &*loaded {
        Some(Ok(ws)) => ws.clone(),
        Some(Err(e)) => return rsx! { LoadError { message: e.user_message() } },
        None => return rsx! { LoadingSpinner {} },
    };

    let title = ws
        .ministry
        .as_ref()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| format!("Ministry #{id}"));
    let pending = ws
        .expenses
        .iter()
        .filter(|e| e.status == ExpenseStatus::Pending)
        .count();

    rsx! {
        div {
            h1 { class: "text-2xl font-bold text-gray-900 mb-1", "{title}" }
            if let Some(ministry) = &ws.ministry {
                p {
                    class: "text-sm text-gray-500 mb-6",
                    "Remaining balance {format_kes(ministry.remaining_balance)} of {format_kes(ministry.allocated_budget)}"
                }
            }

            div {
                class: "{PANEL} mb-6",
                h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Projects" }
                if ws.projects.is_empty() {
                    p { class: "text-sm text-gray-500", "No projects yet." }
                } else {
                    table {
                        class: "w-full text-sm",
                        thead {
                            tr {
                                class: "text-left text-gray-500",
                                th { class: "py-2", "Project" }
                                th { class: "py-2", "Status" }
                                th { class: "py-2 text-right", "Budget" }
                                th { class: "py-2 text-right", "Spent" }
                            }
                        }
                        tbody {
                            for project in ws.projects.iter() {
                                tr {
                                    key: "{project.id}",
                                    class: "border-t border-gray-100",
                                    td { class: "py-2", "{project.name}" }
                                    td { class: "py-2", "{project.status.label()}" }
                                    td { class: "py-2 text-right", {format_kes(project.budget)} }
                                    td { class: "py-2 text-right", {format_kes(project.spent)} }
                                }
                            }
                        }
                    }
                }
            }

            div {
                class: "{PANEL} mb-6",
                h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Expense Requests ({pending} pending)" }
                if ws.expenses.is_empty() {
                    p { class: "text-sm text-gray-500", "No expense requests filed." }
                } else {
                    div {
                        class: "divide-y divide-gray-100",
                        for request in ws.expenses.iter() {
                            ExpenseRow {
                                key: "{request.id}",
                                request: request.clone(),
                                can_decide,
                                on_done: on_change
                            }
                        }
                    }
                }
            }

            div {
                class: "grid grid-cols-1 lg:grid-cols-2 gap-6",
                ExpenseRequestForm { ministry_id: id, projects: ws.projects.clone(), on_done: on_change }
                AddProjectForm { ministry_id: id, on_done: on_change }
            }
        }
    }
}

#[component]
fn ExpenseRow(request: ExpenseRequest, can_decide: bool, on_done: EventHandler<()>) -> Element {
    let session = use_session();
    let notices = use_notices();
    let is_pending = use_signal(|| false);

    let (badge, label) = match request.status {
        ExpenseStatus::Pending => ("bg-amber-100 text-amber-800", "Pending"),
        ExpenseStatus::Approved => ("bg-green-100 text-green-800", "Approved"),
        ExpenseStatus::Rejected => ("bg-red-100 text-red-800", "Rejected"),
    };
    let request_id = request.id;

    let client = session.client.clone();
    let approve = {
        let client = client.clone();
        move |_| record_decision(client.clone(), request_id, true, is_pending, notices, on_done)
    };
    let reject =
        move |_| record_decision(client.clone(), request_id, false, is_pending, notices, on_done);

    rsx! {
        div {
            class: "py-3 flex items-center justify-between gap-4",
            div {
                p { class: "text-sm font-medium text-gray-900", "{request.purpose}" }
                p {
                    class: "text-xs text-gray-500",
                    {request.requested_by.clone().unwrap_or_else(|| "Unknown requester".to_string())}
                    if let Some(created) = &request.created_at {
                        " \u{00B7} {created}"
                    }
                }
            }
            div {
                class: "flex items-center gap-3",
                span { class: "text-sm font-semibold", {format_kes(request.amount)} }
                span { class: "text-xs px-2 py-1 rounded-full {badge}", "{label}" }
                if can_decide && request.status == ExpenseStatus::Pending {
                    button {
                        class: "text-xs px-3 py-1 rounded bg-green-600 text-white disabled:opacity-50",
                        disabled: is_pending(),
                        onclick: approve,
                        "Approve"
                    }
                    button {
                        class: "text-xs px-3 py-1 rounded bg-red-600 text-white disabled:opacity-50",
                        disabled: is_pending(),
                        onclick: reject,
                        "Reject"
                    }
                }
            }
        }
    }
}

fn record_decision(
    client: TreasuryClient,
    request_id: i64,
    approve: bool,
    mut is_pending: Signal<bool>,
    mut notices: Notices,
    on_done: EventHandler<()>,
) {
    spawn(async move {
        is_pending.set(true);
        let result = if approve {
            client.approve_expense_request(request_id).await
        } else {
            client.reject_expense_request(request_id).await
        };
        match result {
            Ok(updated) => {
                let verb = if approve { "approved" } else { "rejected" };
                notices.success(format!("Expense {verb}"), format_kes(updated.amount));
                on_done.call(());
            }
            Err(e) => notices.api_error("Could not record the decision", &e),
        }
        is_pending.set(false);
    });
}

#[component]
fn ExpenseRequestForm(ministry_id: i64, projects: Vec<Project>, on_done: EventHandler<()>) -> Element {
    let session = use_session();
    let mut notices = use_notices();

    let mut project = use_signal(String::new);
    let mut amount = use_signal(String::new);
    let mut purpose = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_pending = use_signal(|| false);

    let client = session.client.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let parsed = (|| {
            let amount = parse_amount(&amount(), "Invalid expense amount")?;
            let purpose = required(&purpose(), "Please describe the expense")?;
            Ok::<_, String>(NewExpenseRequest {
                ministry_id,
                project_id: selected_id(&project()),
                amount,
                purpose,
            })
        })();
        let request = match parsed {
            Ok(request) => request,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        let client = client.clone();

        spawn(async move {
            is_pending.set(true);
            error.set(None);
            match client.submit_expense_request(&request).await {
                Ok(_) => {
                    notices.success("Expense request submitted", format_kes(request.amount));
                    amount.set(String::new());
                    purpose.set(String::new());
                    on_done.call(());
                }
                Err(e) => notices.api_error("Could not submit the request", &e),
            }
            is_pending.set(false);
        });
    };

    rsx! {
        form {
            class: PANEL,
            onsubmit: handle_submit,
            h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Request Expense" }
            if let Some(err) = error() {
                p { class: "mb-3 text-sm text-orange-700", "{err}" }
            }
            div {
                class: "space-y-3",
                div {
                    label { class: LABEL, "Project (optional)" }
                    select {
                        class: INPUT,
                        value: "{project}",
                        onchange: move |e| project.set(e.value()),
                        option { value: "", "No project" }
                        for p in projects.iter() {
                            option { key: "{p.id}", value: "{p.id}", "{p.name}" }
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
                button { r#type: "submit", class: BUTTON, disabled: is_pending(), "Submit Request" }
            }
        }
    }
}

#[component]
fn AddProjectForm(ministry_id: i64, on_done: EventHandler<()>) -> Element {
    let session = use_session();
    let mut notices = use_notices();

    let mut name = use_signal(String::new);
    let mut budget = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_pending = use_signal(|| false);

    let client = session.client.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let parsed = (|| {
            let name = required(&name(), "Project name is required")?;
            let budget = parse_amount(&budget(), "Invalid project budget")?;
            Ok::<_, String>(NewProject {
                ministry_id,
                name,
                description: optional(&description()),
                budget,
                status: ProjectStatus::Planning,
            })
        })();
        let project = match parsed {
            Ok(project) => project,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        let client = client.clone();

        spawn(async move {
            is_pending.set(true);
            error.set(None);
            match client.create_project(&project).await {
                Ok(created) => {
                    notices.success("Project created", created.name);
                    name.set(String::new());
                    budget.set(String::new());
                    description.set(String::new());
                    on_done.call(());
                }
                Err(e) => notices.api_error("Could not create the project", &e),
            }
            is_pending.set(false);
        });
    };

    rsx! {
        form {
            class: PANEL,
            onsubmit: handle_submit,
            h2 { class: "text-lg font-semibold text-gray-900 mb-4", "Add Project" }
            if let Some(err) = error() {
                p { class: "mb-3 text-sm text-orange-700", "{err}" }
            }
            div {
                class: "space-y-3",
                div {
                    label { class: LABEL, "Name" }
                    input { class: INPUT, value: "{name}", oninput: move |e| name.set(e.value()) }
                }
                div {
                    label { class: LABEL, "Budget (KES)" }
                    input { class: INPUT, value: "{budget}", inputmode: "decimal", oninput: move |e| budget.set(e.value()) }
                }
                div {
                    label { class: LABEL, "Description" }
                    textarea { class: INPUT, value: "{description}", oninput: move |e| description.set(e.value()) }
                }
                button { r#type: "submit", class: BUTTON, disabled: is_pending(), "Add Project" }
            }
        }
    }
}
