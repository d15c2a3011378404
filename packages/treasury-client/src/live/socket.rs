use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::{Backoff, LiveEvent};
use crate::error::{Result, TreasuryError};

/// Native live-update driver with bounded, jittered reconnects.
///
/// Runs until the subscription is dropped, the cancellation token fires, or
/// the backoff gives up.
pub struct LiveUpdates {
    url: Url,
    token: Option<String>,
    backoff: Backoff,
    cancel: CancellationToken,
    buffer: usize,
}

enum StreamEnd {
    /// Server closed the socket or the stream ended.
    Closed,
    /// Nobody is listening any more.
    ReceiverGone,
}

impl LiveUpdates {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            backoff: Backoff::default(),
            cancel: CancellationToken::new(),
            buffer: 64,
        }
    }

    /// Also send the bearer token as an `Authorization` header.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Tie the driver to an outer lifetime (e.g. a child of a shutdown token).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Start the driver on the current tokio runtime.
    pub fn spawn<T>(self) -> LiveSubscription<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (tx, events) = mpsc::channel(self.buffer);
        let cancel = self.cancel.clone();
        let task = tokio::spawn(self.run(tx));
        LiveSubscription {
            events,
            cancel,
            task: Some(task),
        }
    }

    /// Drive the connection, pushing events into `tx`.
    pub async fn run<T: DeserializeOwned>(mut self, tx: mpsc::Sender<LiveEvent<T>>) -> Result<()> {
        let cancel = self.cancel.clone();

        loop {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                outcome = self.connect_and_stream(&tx) => outcome,
            };

            match outcome {
                Ok(StreamEnd::ReceiverGone) => {
                    debug!("Live update receiver dropped, stopping");
                    return Ok(());
                }
                Ok(StreamEnd::Closed) => info!(url = %self.url, "Live update connection closed"),
                Err(e) => warn!(url = %self.url, error = %e, "Live update connection failed"),
            }

            let Some(delay) = self.backoff.next_delay() else {
                return Err(TreasuryError::Live(format!(
                    "gave up after {} attempts",
                    self.backoff.attempts()
                )));
            };
            let attempt = self.backoff.attempts();
            debug!(attempt, ?delay, "Reconnecting live updates");

            if tx.send(LiveEvent::Reconnecting { attempt, delay }).await.is_err() {
                return Ok(());
            }

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tx.closed() => return Ok(()),
                _ = sleep(delay) => {}
            }
        }
    }

    async fn connect_and_stream<T: DeserializeOwned>(
        &mut self,
        tx: &mpsc::Sender<LiveEvent<T>>,
    ) -> Result<StreamEnd> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| TreasuryError::Live(e.to_string()))?;
        if let Some(token) = &self.token {
            let value: HeaderValue = format!("Bearer {}", token)
                .parse()
                .map_err(|_| TreasuryError::Live("token is not a valid header value".into()))?;
            request.headers_mut().insert("Authorization", value);
        }

        let (mut stream, _response) = connect_async(request)
            .await
            .map_err(|e| TreasuryError::Live(e.to_string()))?;

        info!(url = %self.url, "Live updates connected");
        if tx.send(LiveEvent::Connected).await.is_err() {
            return Ok(StreamEnd::ReceiverGone);
        }

        // A handshake alone does not prove the server is healthy.
        let mut received = false;
        loop {
            let frame = tokio::select! {
                _ = tx.closed() => return Ok(StreamEnd::ReceiverGone),
                frame = stream.next() => frame,
            };

            let Some(frame) = frame else {
                return Ok(StreamEnd::Closed);
            };

            let decoded = match frame.map_err(|e| TreasuryError::Live(e.to_string()))? {
                Message::Text(text) => serde_json::from_str::<T>(&text),
                Message::Binary(bytes) => serde_json::from_slice::<T>(&bytes),
                Message::Close(_) => return Ok(StreamEnd::Closed),
                _ => continue,
            };
            if !received {
                self.backoff.reset();
                received = true;
            }

            match decoded {
                Ok(message) => {
                    if tx.send(LiveEvent::Message(message)).await.is_err() {
                        return Ok(StreamEnd::ReceiverGone);
                    }
                }
                Err(e) => warn!(error = %e, "Ignoring malformed live update"),
            }
        }
    }
}

/// Handle to a running driver. Dropping it stops the driver.
pub struct LiveSubscription<T> {
    events: mpsc::Receiver<LiveEvent<T>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<Result<()>>>,
}

impl<T> LiveSubscription<T> {
    pub async fn next(&mut self) -> Option<LiveEvent<T>> {
        self.events.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop the driver and wait for it to finish.
    pub async fn shutdown(mut self) -> Result<()> {
        self.cancel.cancel();
        match self.task.take() {
            Some(task) => task
                .await
                .map_err(|e| TreasuryError::Live(format!("driver task failed: {e}")))?,
            None => Ok(()),
        }
    }
}

impl<T> Drop for LiveSubscription<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
