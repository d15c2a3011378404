//! Sidebar navigation, filtered by what the gate lets the session open

use dioxus::prelude::*;

use crate::auth::use_session;
use crate::routes::Route;

struct NavItem {
    label: &'static str,
    icon: &'static str,
    route: fn() -> Route,
}

const NAV_ITEMS: &[NavItem] = &[
    NavItem { label: "Dashboard", icon: "\u{1F4CA}", route: || Route::Dashboard {} },
    NavItem { label: "Ministries", icon: "\u{1F3DB}", route: || Route::Ministries {} },
    NavItem { label: "Financial Overview", icon: "\u{1F4B0}", route: || Route::Financial {} },
    NavItem { label: "Tax Payments", icon: "\u{1F9FE}", route: || Route::TaxPayments {} },
    NavItem { label: "Audit Logs", icon: "\u{1F4CB}", route: || Route::Audit {} },
    NavItem { label: "Citizen Portal", icon: "\u{1F465}", route: || Route::CitizenHome {} },
    NavItem { label: "Pay Tax", icon: "\u{1F4B3}", route: || Route::PayTax {} },
    NavItem { label: "System Transparency", icon: "\u{1F441}", route: || Route::Transparency {} },
];

#[component]
pub fn Sidebar() -> Element {
    let session = use_session();
    let mut collapsed = use_signal(|| false);

    let visible: Vec<(&'static str, &'static str, Route)> = NAV_ITEMS
        .iter()
        .map(|item| (item.label, item.icon, (item.route)()))
        .filter(|(_, _, route)| {
            route.is_public() || session.authorize(route.required_role()).is_allowed()
        })
        .collect();

    rsx! {
        aside {
            class: if collapsed() { "w-16 bg-slate-900 text-slate-100 flex flex-col" } else { "w-64 bg-slate-900 text-slate-100 flex flex-col" },

            div {
                class: "p-3 flex items-center justify-between border-b border-slate-700",
                if !collapsed() {
                    span { class: "font-bold text-sm", "National Financial System" }
                }
                button {
                    class: "h-8 w-8 rounded hover:bg-slate-800",
                    onclick: move |_| collapsed.set(!collapsed()),
                    if collapsed() { "\u{203A}" } else { "\u{2039}" }
                }
            }

            nav {
                class: "flex-1 p-3 space-y-1",
                for (label, icon, route) in visible {
                    NavLink { key: "{label}", to: route, label, icon, collapsed: collapsed() }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct NavLinkProps {
    to: Route,
    label: &'static str,
    icon: &'static str,
    collapsed: bool,
}

#[component]
fn NavLink(props: NavLinkProps) -> Element {
    let route = use_route::<Route>();
    let is_active = route == props.to;

    rsx! {
        Link {
            to: props.to.clone(),
            class: if is_active {
                "flex items-center gap-3 px-3 py-2.5 rounded-md text-sm bg-slate-800 text-white font-medium border-l-2 border-emerald-400"
            } else {
                "flex items-center gap-3 px-3 py-2.5 rounded-md text-sm text-slate-300 hover:bg-slate-800 hover:text-white"
            },
            span { "{props.icon}" }
            if !props.collapsed {
                span { "{props.label}" }
            }
        }
    }
}
