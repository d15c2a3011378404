//! Live-update driver: delivery, reconnects, cancellation.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use treasury_client::{Backoff, LiveEvent, LiveSubscription, LiveUpdates, TreasuryError};
use url::Url;

mod common;
use common::TestBackend;

#[derive(Debug, Deserialize, PartialEq)]
struct TransferReceived {
    #[serde(rename = "type")]
    kind: String,
    wallet: String,
}

fn quick_backoff() -> Backoff {
    Backoff::new(Duration::from_millis(10), Duration::from_millis(50))
}

async fn next_event<T>(subscription: &mut LiveSubscription<T>) -> LiveEvent<T> {
    timeout(Duration::from_secs(5), subscription.next())
        .await
        .expect("live event timed out")
        .expect("driver stopped early")
}

#[tokio::test]
async fn delivers_messages_and_reconnects_after_close() {
    let backend = TestBackend::start().await;
    let (client, _gate) = backend.client();
    client.login("HealthOffice", "health").await.unwrap();

    let mut subscription = client
        .live_updates()
        .unwrap()
        .with_backoff(quick_backoff())
        .spawn::<TransferReceived>();

    assert_eq!(next_event(&mut subscription).await, LiveEvent::Connected);
    // The malformed frame before this one is skipped.
    assert_eq!(
        next_event(&mut subscription).await,
        LiveEvent::Message(TransferReceived {
            kind: "transfer_received".into(),
            wallet: "0xhealthoffice".into(),
        })
    );
    match next_event(&mut subscription).await {
        LiveEvent::Reconnecting { attempt, delay } => {
            assert_eq!(attempt, 1);
            assert!(delay <= Duration::from_millis(10));
        }
        other => panic!("expected a reconnect, got {other:?}"),
    }
    assert_eq!(next_event(&mut subscription).await, LiveEvent::Connected);
}

#[tokio::test]
async fn shutdown_stops_the_driver() {
    let backend = TestBackend::start().await;
    let (client, _gate) = backend.client();
    client.login("HealthOffice", "health").await.unwrap();

    let mut subscription = client
        .live_updates()
        .unwrap()
        .with_backoff(quick_backoff())
        .spawn::<Value>();
    let first = timeout(Duration::from_secs(5), subscription.next())
        .await
        .unwrap();
    assert_eq!(first, Some(LiveEvent::Connected));

    timeout(Duration::from_secs(5), subscription.shutdown())
        .await
        .expect("driver ignored cancellation")
        .unwrap();
}

#[tokio::test]
async fn dropping_the_subscription_cancels_it() {
    let backend = TestBackend::start().await;
    let (client, _gate) = backend.client();
    client.login("HealthOffice", "health").await.unwrap();
    let cancel = CancellationToken::new();

    let subscription = client
        .live_updates()
        .unwrap()
        .with_cancellation(cancel.clone())
        .spawn::<Value>();
    drop(subscription);

    assert!(cancel.is_cancelled());
}

#[tokio::test]
async fn gives_up_after_the_attempt_budget() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("ws://{addr}/ws/0xnobody")).unwrap();
    let (tx, mut rx) = mpsc::channel::<LiveEvent<Value>>(16);

    let outcome = timeout(
        Duration::from_secs(10),
        LiveUpdates::new(url)
            .with_backoff(quick_backoff().with_max_attempts(2))
            .run(tx),
    )
    .await
    .expect("driver never gave up");

    assert!(matches!(outcome, Err(TreasuryError::Live(_))));
    let mut attempts = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            LiveEvent::Reconnecting { attempt, .. } => attempts.push(attempt),
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(attempts, vec![1, 2]);
}

#[tokio::test]
async fn silent_servers_keep_growing_the_backoff() {
    let backend = TestBackend::start().await;
    let url = Url::parse(&backend.dropping_ws_url("0xhealthoffice")).unwrap();
    let (tx, mut rx) = mpsc::channel::<LiveEvent<Value>>(16);

    let outcome = timeout(
        Duration::from_secs(5),
        LiveUpdates::new(url)
            .with_backoff(
                Backoff::new(Duration::from_millis(5), Duration::from_millis(200))
                    .without_jitter()
                    .with_max_attempts(2),
            )
            .run(tx),
    )
    .await
    .expect("handshakes without frames reset the backoff");

    assert!(matches!(outcome, Err(TreasuryError::Live(_))));
    let mut waits = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            LiveEvent::Reconnecting { attempt, delay } => waits.push((attempt, delay)),
            LiveEvent::Connected => {}
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        waits,
        vec![
            (1, Duration::from_millis(5)),
            (2, Duration::from_millis(10)),
        ]
    );
}

#[tokio::test]
async fn anonymous_clients_have_no_live_channel() {
    let backend = TestBackend::start().await;
    let (client, _gate) = backend.client();

    assert!(matches!(
        client.live_updates(),
        Err(TreasuryError::NotAuthenticated)
    ));
}
