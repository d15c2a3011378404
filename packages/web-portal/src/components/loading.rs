//! Loading and error placeholders

use dioxus::prelude::*;

/// Full-panel loading spinner
#[component]
pub fn LoadingSpinner() -> Element {
    rsx! {
        div {
            class: "flex flex-col items-center justify-center py-12",
            div {
                class: "flex space-x-2",
                div { class: "w-3 h-3 bg-emerald-500 rounded-full animate-bounce" }
                div { class: "w-3 h-3 bg-emerald-500 rounded-full animate-bounce", style: "animation-delay: 0.1s" }
                div { class: "w-3 h-3 bg-emerald-500 rounded-full animate-bounce", style: "animation-delay: 0.2s" }
            }
            p { class: "mt-4 text-sm text-gray-500", "Loading..." }
        }
    }
}

/// Inline failure message for a panel whose data could not be loaded
#[component]
pub fn LoadError(#[props(into)] message: String) -> Element {
    rsx! {
        div {
            class: "p-4 bg-orange-50 border border-orange-200 text-orange-800 rounded text-sm",
            "{message}"
        }
    }
}
