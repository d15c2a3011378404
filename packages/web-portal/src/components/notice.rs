//! Dismissible notifications (toasts)

use dioxus::prelude::*;
use treasury_client::TreasuryError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

/// Handle for raising notifications from anywhere under [`NoticeProvider`].
#[derive(Clone, Copy)]
pub struct Notices {
    items: Signal<Vec<Notice>>,
    next_id: Signal<u64>,
}

impl Notices {
    pub fn success(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(NoticeKind::Success, title.into(), body.into());
    }

    pub fn info(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(NoticeKind::Info, title.into(), body.into());
    }

    pub fn error(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(NoticeKind::Error, title.into(), body.into());
    }

    /// Report a failed API call. Authorization failures need no toast: the
    /// gate already signed out and the layout is redirecting to login.
    pub fn api_error(&mut self, title: impl Into<String>, err: &TreasuryError) {
        if err.is_unauthorized() {
            return;
        }
        self.error(title, err.user_message());
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.write().retain(|n| n.id != id);
    }

    fn push(&mut self, kind: NoticeKind, title: String, body: String) {
        let id = *self.next_id.peek();
        self.next_id.set(id + 1);
        self.items.write().push(Notice {
            id,
            kind,
            title,
            body,
        });

        #[cfg(feature = "web")]
        {
            let mut notices = *self;
            spawn(async move {
                gloo_timers::future::sleep(std::time::Duration::from_secs(6)).await;
                notices.dismiss(id);
            });
        }
    }
}

#[component]
pub fn NoticeProvider(children: Element) -> Element {
    let items = use_signal(Vec::new);
    let next_id = use_signal(|| 0u64);
    use_context_provider(|| Notices { items, next_id });

    children
}

/// Hook to raise notifications
pub fn use_notices() -> Notices {
    use_context::<Notices>()
}

/// Stack of current notifications, bottom right
#[component]
pub fn NoticeStack() -> Element {
    let mut notices = use_notices();
    let items = notices.items.read().clone();

    rsx! {
        div {
            class: "fixed bottom-4 right-4 z-50 flex flex-col gap-2 w-80",
            for notice in items {
                div {
                    key: "{notice.id}",
                    class: match notice.kind {
                        NoticeKind::Success => "p-3 rounded shadow bg-green-50 border border-green-200 text-green-900",
                        NoticeKind::Info => "p-3 rounded shadow bg-blue-50 border border-blue-200 text-blue-900",
                        NoticeKind::Error => "p-3 rounded shadow bg-red-50 border border-red-200 text-red-900",
                    },
                    div {
                        class: "flex items-start justify-between gap-2",
                        p { class: "font-semibold text-sm", "{notice.title}" }
                        button {
                            class: "text-xs opacity-60 hover:opacity-100",
                            onclick: move |_| notices.dismiss(notice.id),
                            "\u{2715}"
                        }
                    }
                    if !notice.body.is_empty() {
                        p { class: "text-sm mt-1", "{notice.body}" }
                    }
                }
            }
        }
    }
}
