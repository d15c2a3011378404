use dioxus::prelude::*;

use crate::routes::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        div {
            class: "min-h-screen flex flex-col items-center justify-center gap-3 bg-gray-50",
            h1 { class: "text-4xl font-bold text-gray-900", "404" }
            p { class: "text-gray-600", "Nothing lives at /{path}" }
            Link {
                to: Route::Dashboard {},
                class: "text-emerald-700 hover:underline",
                "Back to the dashboard"
            }
        }
    }
}
