//! Browser side of the live-update channel.
//!
//! The socket is opened with gloo-net and retried with the shared
//! [`Backoff`] policy. The driver runs as a task of [`LiveFeed`], so it stops
//! when the layout unmounts (on logout, for instance).

use dioxus::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;
use treasury_client::format_kes;

use crate::auth::use_session;
use crate::components::use_notices;

/// Toast title and body for one pushed message.
pub fn describe(message: &Value) -> (String, String) {
    let title = match message.get("type").and_then(Value::as_str) {
        Some(kind) if !kind.is_empty() => {
            let words = kind.replace(['_', '-'], " ");
            let mut chars = words.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => "Update".to_string(),
            }
        }
        _ => "Update".to_string(),
    };

    let amount = message
        .get("amount")
        .and_then(Value::as_f64)
        .and_then(|a| Decimal::try_from(a).ok())
        .map(format_kes);
    let counterpart = ["from", "sender", "from_ministry"]
        .iter()
        .find_map(|key| message.get(*key).and_then(Value::as_str));

    let body = match (amount, counterpart) {
        (Some(amount), Some(from)) => format!("{amount} from {from}"),
        (Some(amount), None) => amount,
        (None, Some(from)) => format!("From {from}"),
        (None, None) => message
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    };
    (title, body)
}

/// Invisible component that keeps the signed-in wallet's socket open and
/// turns pushed messages into notifications.
#[component]
pub fn LiveFeed() -> Element {
    let session = use_session();
    let notices = use_notices();

    // Reading the session inside the resource restarts the driver (dropping
    // the old one) whenever the signed-in identity changes.
    #[cfg(feature = "web")]
    {
        let _driver = use_resource(move || {
            let url = session
                .current()
                .and_then(|_| session.client.live_url().ok());
            async move {
                if let Some(url) = url {
                    browser::drive(url, notices).await;
                }
            }
        });
    }
    #[cfg(not(feature = "web"))]
    let _ = (session, notices);

    rsx! {}
}

#[cfg(feature = "web")]
mod browser {
    use futures::StreamExt;
    use gloo_net::websocket::{futures::WebSocket, Message};
    use gloo_timers::future::sleep;
    use serde_json::Value;
    use tracing::{debug, info, warn};
    use treasury_client::{Backoff, LiveEvent};
    use url::Url;

    use super::describe;
    use crate::components::Notices;

    /// Reconnects until the owning task is dropped.
    pub async fn drive(url: Url, mut notices: Notices) {
        let mut backoff = Backoff::default();

        loop {
            match stream(&url, &mut backoff, &mut |event| match event {
                LiveEvent::Message(message) => {
                    let (title, body) = describe(&message);
                    notices.info(title, body);
                }
                LiveEvent::Connected => info!(%url, "Live updates connected"),
                LiveEvent::Reconnecting { .. } => {}
            })
            .await
            {
                Ok(()) => info!(%url, "Live update connection closed"),
                Err(e) => warn!(%url, error = %e, "Live update connection failed"),
            }

            let Some(delay) = backoff.next_delay() else {
                return;
            };
            debug!(attempt = backoff.attempts(), ?delay, "Reconnecting live updates");
            sleep(delay).await;
        }
    }

    async fn stream(
        url: &Url,
        backoff: &mut Backoff,
        on_event: &mut impl FnMut(LiveEvent<Value>),
    ) -> Result<(), String> {
        let socket = WebSocket::open(url.as_str()).map_err(|e| e.to_string())?;
        let (_sink, mut frames) = socket.split();

        let mut announced = false;
        while let Some(frame) = frames.next().await {
            let decoded = match frame.map_err(|e| e.to_string())? {
                Message::Text(text) => serde_json::from_str::<Value>(&text),
                Message::Bytes(bytes) => serde_json::from_slice::<Value>(&bytes),
            };
            if !announced {
                backoff.reset();
                on_event(LiveEvent::Connected);
                announced = true;
            }
            match decoded {
                Ok(message) => on_event(LiveEvent::Message(message)),
                Err(e) => warn!(error = %e, "Ignoring malformed live update"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transfer_notifications() {
        let (title, body) = describe(&json!({
            "type": "transfer_received",
            "amount": 2500.0,
            "from": "National Treasury"
        }));
        assert_eq!(title, "Transfer received");
        assert_eq!(body, "KES 2,500.00 from National Treasury");
    }

    #[test]
    fn messages_without_a_type() {
        let (title, body) = describe(&json!({"message": "Budget allocated"}));
        assert_eq!(title, "Update");
        assert_eq!(body, "Budget allocated");
    }
}
