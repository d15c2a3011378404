//! Session context provider

use dioxus::prelude::*;
use tracing::{error, info};
use treasury_client::{
    authorize, Access, AuthState, Role, Session, SessionGate, TreasuryClient, TreasuryError,
};

use crate::config;
use crate::storage::session_storage;

/// Session state shared with the entire app.
///
/// The gate is the only writer. `state` mirrors it as a signal so components
/// re-render on login, logout and forced sign-out alike.
#[derive(Clone)]
pub struct SessionContext {
    pub gate: SessionGate,
    pub client: TreasuryClient,
    pub state: Signal<AuthState>,
}

impl SessionContext {
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.read().session().cloned()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.read().role()
    }

    /// Gate decision for a view that needs `required`.
    pub fn authorize(&self, required: Option<Role>) -> Access {
        authorize(self.state.read().session(), required)
    }

    /// Sign out. On error the session is still signed in and stored.
    pub fn logout(&self) -> Result<(), TreasuryError> {
        self.client.logout().map(|_| ()).inspect_err(|e| {
            error!(error = %e, "Failed to clear stored session");
        })
    }
}

/// Session provider component that wraps the app
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let gate = use_hook(|| {
        let gate = SessionGate::new(session_storage());
        match gate.restore() {
            Ok(state) => info!(authenticated = state.is_authenticated(), "Session restored"),
            Err(e) => error!(error = %e, "Failed to restore session"),
        }
        gate
    });
    let client = use_hook({
        let gate = gate.clone();
        move || TreasuryClient::new(config::client_options(), gate).map_err(|e| e.to_string())
    });
    let mut state = use_signal(|| gate.state());

    // Mirror every gate change into the signal.
    use_hook({
        let gate = gate.clone();
        move || {
            let mut changes = gate.subscribe();
            spawn(async move {
                while changes.changed().await.is_ok() {
                    let next = changes.borrow_and_update().clone();
                    state.set(next);
                }
            });
        }
    });

    let client = match client {
        Ok(client) => client,
        Err(message) => {
            return rsx! {
                div {
                    class: "min-h-screen flex items-center justify-center p-6",
                    div {
                        class: "max-w-md p-4 bg-red-50 border border-red-200 text-red-800 rounded",
                        p { class: "font-semibold", "The portal is misconfigured" }
                        p { class: "text-sm mt-1", "{message}" }
                    }
                }
            }
        }
    };

    use_context_provider(|| SessionContext {
        gate,
        client,
        state,
    });

    children
}

/// Hook to access the session context
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}
