//! In-process stand-in for the treasury backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::Engine;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use treasury_client::{ClientOptions, MemoryStorage, SessionGate, TreasuryClient};

pub const GOOD_TOKEN: &str = "good-token";
pub const STALE_TOKEN: &str = "stale-token";
pub const STALE_REJECTION_DELAY: Duration = Duration::from_millis(300);

#[derive(Default)]
pub struct Hits {
    pub ministries: AtomicUsize,
    pub transfers: AtomicUsize,
    pub tax_payments: AtomicUsize,
}

pub struct TestBackend {
    pub api_url: String,
    pub hits: Arc<Hits>,
}

impl TestBackend {
    pub async fn start() -> Self {
        let hits = Arc::new(Hits::default());

        let app = Router::new()
            .route("/token", post(token))
            .route("/transactions_all/", get(transactions))
            .route("/ministries", get(ministries))
            .route("/ministries/transfer", post(transfer))
            .route("/expense-requests/:id/approve", put(approve))
            .route("/tax-payments", get(tax_payments))
            .route("/ws/:wallet", get(live))
            .route("/ws-drop/:wallet", get(drop_after_upgrade))
            .with_state(hits.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test backend");
        let addr = listener.local_addr().expect("No local address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test backend crashed");
        });

        Self {
            api_url: format!("http://{}", addr),
            hits,
        }
    }

    /// Live channel that accepts the upgrade and hangs up without a frame.
    pub fn dropping_ws_url(&self, wallet: &str) -> String {
        format!(
            "{}/ws-drop/{}",
            self.api_url.replacen("http://", "ws://", 1),
            wallet
        )
    }

    pub fn client(&self) -> (TreasuryClient, SessionGate) {
        self.client_with(ClientOptions::default())
    }

    pub fn client_with(&self, options: ClientOptions) -> (TreasuryClient, SessionGate) {
        let gate = SessionGate::new(MemoryStorage::new());
        let client = TreasuryClient::new(options.with_api_url(self.api_url.clone()), gate.clone())
            .expect("Failed to build client");
        (client, gate)
    }
}

/// Unsigned JWT carrying `claims`.
pub fn jwt(claims: Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.sig",
        engine.encode(br#"{"alg":"HS256"}"#),
        engine.encode(claims.to_string())
    )
}

fn detail(status: StatusCode, detail: Value) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn require_good_token(headers: &HeaderMap) -> Result<(), Response> {
    match bearer(headers) {
        Some(GOOD_TOKEN) => Ok(()),
        _ => Err(detail(
            StatusCode::UNAUTHORIZED,
            json!("Could not validate credentials"),
        )),
    }
}

async fn token(Json(body): Json<Value>) -> Response {
    let office = body["office_name"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let (role, ministry_id, access_token) = match (office, password) {
        ("FinanceOffice", "treasury") => ("super_admin", Value::Null, GOOD_TOKEN),
        ("HealthOffice", "health") => ("ministry_admin", json!(2), GOOD_TOKEN),
        ("StaleOffice", "stale") => ("ministry_officer", json!(3), STALE_TOKEN),
        _ => {
            return detail(
                StatusCode::UNAUTHORIZED,
                json!("Incorrect office name or password"),
            )
        }
    };

    Json(json!({
        "access_token": access_token,
        "refresh_token": "refresh-1",
        "token_type": "bearer",
        "role": role,
        "office_name": office,
        "wallet_address": format!("0x{}", office.to_lowercase()),
        "ministry_id": ministry_id,
    }))
    .into_response()
}

async fn transactions() -> Json<Value> {
    Json(json!({
        "transactions_all": [
            {"sender": "treasury", "recipient": "health", "amount": 1200.0, "timestamp": "2024-05-01T10:00:00", "transaction_id": "tx-1", "purpose": "Q2 allocation"},
            {"sender": "health", "recipient": "supplier", "amount": 300.0, "timestamp": "2024-05-03T09:30:00", "transaction_id": "tx-2"}
        ]
    }))
}

async fn ministries(State(hits): State<Arc<Hits>>, headers: HeaderMap) -> Response {
    hits.ministries.fetch_add(1, Ordering::SeqCst);
    if bearer(&headers) == Some(STALE_TOKEN) {
        // Slow rejection, so a newer login can land while it is in flight.
        tokio::time::sleep(STALE_REJECTION_DELAY).await;
    }
    if let Err(rejection) = require_good_token(&headers) {
        return rejection;
    }
    Json(json!([
        {"id": 1, "name": "National Treasury", "code": "TRS", "allocated_budget": 900000.0, "used_funds": 0.0, "remaining_balance": 900000.0},
        {"id": 2, "name": "Ministry of Health", "code": "MOH", "wallet_address": "0xhealth", "allocated_budget": 500000.0, "used_funds": 125000.0, "remaining_balance": 375000.0}
    ]))
    .into_response()
}

async fn transfer(
    State(hits): State<Arc<Hits>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    hits.transfers.fetch_add(1, Ordering::SeqCst);
    if let Err(rejection) = require_good_token(&headers) {
        return rejection;
    }
    if body["amount"].as_f64().unwrap_or_default() > 1_000_000.0 {
        return detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!([
                {"loc": ["body", "amount"], "msg": "exceeds available balance", "type": "value_error"}
            ]),
        );
    }
    Json(json!({
        "to_ministry": "Ministry of Health",
        "from_ministry": "National Treasury",
        "amount": body["amount"],
        "transaction_id": "tx-99"
    }))
    .into_response()
}

async fn approve(Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if let Err(rejection) = require_good_token(&headers) {
        return rejection;
    }
    Json(json!({
        "id": id,
        "ministry_id": 2,
        "amount": 4500.0,
        "purpose": "Vaccines",
        "status": "approved",
        "approved_by": "FinanceOffice"
    }))
    .into_response()
}

async fn tax_payments(
    State(hits): State<Arc<Hits>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    hits.tax_payments.fetch_add(1, Ordering::SeqCst);
    if let Err(rejection) = require_good_token(&headers) {
        return rejection;
    }
    let all = vec![
        json!({"id": 1, "taxpayer_name": "Jane Doe", "id_number": "111", "tax_type": "vat", "amount": 1000.0, "payment_method": "mpesa", "receipt_number": "R-1"}),
        json!({"id": 2, "taxpayer_name": "John Roe", "id_number": "222", "tax_type": "income", "amount": 2000.0, "payment_method": "card", "receipt_number": "R-2"}),
    ];
    let filtered: Vec<Value> = match query.get("tax_type") {
        Some(tax_type) => all
            .into_iter()
            .filter(|p| p["tax_type"] == tax_type.as_str())
            .collect(),
        None => all,
    };
    Json(Value::Array(filtered)).into_response()
}

async fn live(ws: WebSocketUpgrade, Path(wallet): Path<String>) -> Response {
    ws.on_upgrade(move |socket| push_then_close(socket, wallet))
}

async fn push_then_close(mut socket: WebSocket, wallet: String) {
    let _ = socket.send(Message::Text("not json".into())).await;
    let payload = json!({"type": "transfer_received", "wallet": wallet, "amount": 250.0});
    let _ = socket.send(Message::Text(payload.to_string())).await;
    let _ = socket.send(Message::Close(None)).await;
}

async fn drop_after_upgrade(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|socket| async move { drop(socket) })
}
