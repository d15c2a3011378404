//! Portal layout wrapper with the session gate in front of it

use dioxus::prelude::*;
use treasury_client::{Access, Redirect};

use super::{use_notices, RedirectTo, Sidebar};
use crate::auth::use_session;
use crate::live::LiveFeed;
use crate::routes::Route;

/// Layout for every gated view: asks the gate, then renders sidebar,
/// header and the routed page.
#[component]
pub fn PortalLayout() -> Element {
    let session = use_session();
    let route = use_route::<Route>();

    match session.authorize(route.required_role()) {
        Access::Allow => {}
        Access::Deny(Redirect::Login) => {
            return rsx! {
                RedirectTo { to: Route::Login {} }
            };
        }
        Access::Deny(Redirect::Home) => {
            return rsx! {
                RedirectTo { to: Route::Dashboard {} }
            };
        }
    }

    rsx! {
        div {
            class: "min-h-screen flex bg-gray-50",

            Sidebar {}

            div {
                class: "flex-1 flex flex-col min-w-0",
                Header {}
                main {
                    class: "p-6",
                    Outlet::<Route> {}
                }
            }

            LiveFeed {}
        }
    }
}

#[component]
fn Header() -> Element {
    let session = use_session();
    let navigator = use_navigator();
    let mut notices = use_notices();

    let Some(current) = session.current() else {
        return rsx! {};
    };

    let handle_logout = {
        let session = session.clone();
        move |_| match session.logout() {
            Ok(()) => {
                navigator.replace(Route::Login {});
            }
            Err(e) => notices.api_error("Sign out failed", &e),
        }
    };

    rsx! {
        header {
            class: "bg-white border-b border-gray-200 px-6 py-3 flex items-center justify-between",
            div {
                p { class: "text-sm font-semibold text-gray-900", "{current.office_name()}" }
                p { class: "text-xs text-gray-500 font-mono", "{current.wallet_address()}" }
            }
            div {
                class: "flex items-center gap-4",
                span {
                    class: "text-xs px-2 py-1 rounded-full bg-emerald-100 text-emerald-800",
                    "{current.role().label()}"
                }
                button {
                    class: "text-sm text-gray-600 hover:text-gray-900 px-3 py-1.5 rounded hover:bg-gray-100",
                    onclick: handle_logout,
                    "Logout"
                }
            }
        }
    }
}
