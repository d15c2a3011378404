//! Root application component

use dioxus::prelude::*;

use crate::auth::SessionProvider;
use crate::components::{NoticeProvider, NoticeStack};
use crate::routes::Route;

/// Root application component
#[component]
pub fn App() -> Element {
    rsx! {
        // Global styles
        document::Stylesheet { href: asset!("/assets/tailwind.css") }

        NoticeProvider {
            // Session context wraps the whole router so every view sees
            // the same gate.
            SessionProvider {
                Router::<Route> {}
            }
            NoticeStack {}
        }
    }
}
