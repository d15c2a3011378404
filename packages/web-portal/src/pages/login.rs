//! Office login page

use dioxus::prelude::*;
use treasury_client::SignOutReason;

use crate::auth::use_session;
use crate::components::RedirectTo;
use crate::routes::{landing_route, Route};

#[component]
pub fn Login() -> Element {
    let session = use_session();
    let navigator = use_navigator();

    let mut office_name = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_pending = use_signal(|| false);

    // Already signed in: straight to the role's landing view
    if let Some(role) = session.role() {
        return rsx! {
            RedirectTo { to: landing_route(role) }
        };
    }

    let notice = session
        .state
        .read()
        .sign_out_reason()
        .filter(|reason| *reason != SignOutReason::UserRequested)
        .map(|reason| reason.message());

    let client = session.client.clone();
    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let office = office_name().trim().to_string();
        let secret = password();
        let client = client.clone();

        spawn(async move {
            is_pending.set(true);
            error.set(None);

            match client.login(&office, &secret).await {
                Ok(signed_in) => {
                    password.set(String::new());
                    navigator.replace(landing_route(signed_in.role()));
                }
                Err(e) => error.set(Some(e.user_message())),
            }

            is_pending.set(false);
        });
    };

    rsx! {
        div {
            class: "min-h-screen bg-slate-100 flex items-center justify-center px-4",

            div {
                class: "bg-white rounded-lg shadow-md p-8 max-w-md w-full",

                div {
                    class: "mb-6 text-center",
                    h1 { class: "text-2xl font-bold text-gray-900 mb-2", "National Financial System" }
                    p { class: "text-gray-600 text-sm", "Sign in with your office credentials" }
                }

                if let Some(message) = notice {
                    div {
                        class: "mb-4 p-3 bg-blue-50 border border-blue-200 text-blue-800 rounded text-sm",
                        "{message}"
                    }
                }

                if let Some(err) = error() {
                    div {
                        class: "mb-4 p-3 bg-orange-50 border border-orange-200 text-orange-800 rounded text-sm",
                        "{err}"
                    }
                }

                form {
                    onsubmit: handle_login,
                    div {
                        class: "mb-4",
                        label { class: "block text-sm font-medium text-gray-700 mb-2", "Office Name" }
                        input {
                            r#type: "text",
                            value: "{office_name}",
                            oninput: move |e| office_name.set(e.value()),
                            placeholder: "e.g. MinistryOfHealth",
                            class: "w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-emerald-500",
                            disabled: is_pending()
                        }
                    }
                    div {
                        class: "mb-6",
                        label { class: "block text-sm font-medium text-gray-700 mb-2", "Password" }
                        input {
                            r#type: "password",
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                            class: "w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-emerald-500",
                            disabled: is_pending()
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "w-full bg-emerald-700 text-white py-2 px-4 rounded-md hover:bg-emerald-800 disabled:opacity-50 disabled:cursor-not-allowed",
                        disabled: is_pending(),
                        if is_pending() { "Signing in..." } else { "Sign In" }
                    }
                }

                div {
                    class: "mt-6 text-center",
                    Link {
                        to: Route::Transparency {},
                        class: "text-sm text-emerald-700 hover:underline",
                        "View the public transparency portal"
                    }
                }
            }
        }
    }
}
