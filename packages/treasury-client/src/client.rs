//! REST client for the treasury backend.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{api_error, Result, TreasuryError};
use crate::live;
use crate::session::{Redirect, Session, SessionGate};
use crate::types::*;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_url: String,
    /// Live-update base; derived from `api_url` when unset.
    pub ws_url: Option<String>,
    /// Ignored in the browser, where fetch has no timeout knob.
    pub request_timeout: Duration,
    /// Check the token's `exp` before every authenticated call instead of
    /// waiting for the backend to answer 401.
    pub preflight_expiry: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: None,
            request_timeout: Duration::from_secs(30),
            preflight_expiry: false,
        }
    }
}

impl ClientOptions {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Whether a call needs a signed-in identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Auth {
    /// Sent with a token if there is one (public ledger views).
    Optional,
    Required,
    /// The login call itself. A 401 here means bad credentials.
    None,
}

/// Treasury API client.
///
/// Every 401 on a call that carried the current token clears the
/// [`SessionGate`] before [`TreasuryError::Unauthorized`] is returned, so
/// screens only have to navigate to the login view. A rejection of a token
/// that was replaced mid-flight leaves the newer session alone.
#[derive(Clone)]
pub struct TreasuryClient {
    http: reqwest::Client,
    base: Url,
    ws_base: Url,
    gate: SessionGate,
    preflight_expiry: bool,
}

impl TreasuryClient {
    pub fn new(options: ClientOptions, gate: SessionGate) -> Result<Self> {
        let base = with_trailing_slash(Url::parse(&options.api_url)?);
        let ws_base = match &options.ws_url {
            Some(ws) => with_trailing_slash(Url::parse(ws)?),
            None => live::ws_base_from_api(&base)?,
        };

        #[cfg(not(target_arch = "wasm32"))]
        let http = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()?;
        #[cfg(target_arch = "wasm32")]
        let http = reqwest::Client::new();

        Ok(Self {
            http,
            base,
            ws_base,
            gate,
            preflight_expiry: options.preflight_expiry,
        })
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Exchange office credentials for a token and sign the gate in.
    pub async fn login(&self, office_name: &str, password: &str) -> Result<Session> {
        let request = TokenRequest {
            office_name: office_name.trim().to_string(),
            password: password.trim().to_string(),
        };
        if request.office_name.is_empty() || request.password.is_empty() {
            return Err(TreasuryError::Invalid(
                "Office name and password are required".into(),
            ));
        }

        info!(office = %request.office_name, "Signing in");
        let response: TokenResponse = self
            .call(Method::POST, "token", Auth::None, Some(&request))
            .await?;
        Ok(self.gate.login_with_response(&response)?)
    }

    /// Local sign-out; the backend keeps no session to revoke.
    pub fn logout(&self) -> Result<Redirect> {
        Ok(self.gate.logout()?)
    }

    // ------------------------------------------------------------------
    // Ledger
    // ------------------------------------------------------------------

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        let envelope: TransactionsEnvelope = self
            .call(Method::GET, "transactions_all/", Auth::Optional, None::<&()>)
            .await?;
        Ok(envelope.transactions_all)
    }

    pub async fn kpis(&self) -> Result<Kpis> {
        Ok(Kpis::from_transactions(&self.transactions().await?))
    }

    /// Number of registered wallets.
    pub async fn wallet_count(&self) -> Result<usize> {
        let envelope: UsersEnvelope = self
            .call(Method::GET, "users/", Auth::Optional, None::<&()>)
            .await?;
        Ok(envelope.users.len())
    }

    /// Number of blocks on the chain.
    pub async fn block_count(&self) -> Result<usize> {
        let blocks: Vec<serde_json::Value> = self
            .call(Method::GET, "blockchain", Auth::Optional, None::<&()>)
            .await?;
        Ok(blocks.len())
    }

    // ------------------------------------------------------------------
    // Ministries
    // ------------------------------------------------------------------

    pub async fn ministries(&self) -> Result<Vec<Ministry>> {
        self.call(Method::GET, "ministries", Auth::Required, None::<&()>)
            .await
    }

    pub async fn create_ministry(&self, ministry: &NewMinistry) -> Result<Ministry> {
        ministry.validate()?;
        self.call(Method::POST, "ministries", Auth::Required, Some(ministry))
            .await
    }

    pub async fn allocate_budget(
        &self,
        ministry_id: i64,
        allocation: &AllocateBudget,
    ) -> Result<serde_json::Value> {
        allocation.validate()?;
        let path = format!("ministries/{}/allocate-budget", ministry_id);
        self.call(Method::POST, &path, Auth::Required, Some(allocation))
            .await
    }

    pub async fn transfer(&self, transfer: &BudgetTransfer) -> Result<TransferReceipt> {
        transfer.validate()?;
        if self
            .gate
            .current()
            .and_then(|s| s.ministry_id())
            .is_some_and(|own| own == transfer.to_ministry_id)
        {
            return Err(TreasuryError::Invalid(
                "Cannot transfer to your own ministry".into(),
            ));
        }
        self.call(Method::POST, "ministries/transfer", Auth::Required, Some(transfer))
            .await
    }

    // ------------------------------------------------------------------
    // Projects and expense requests
    // ------------------------------------------------------------------

    pub async fn projects(&self, ministry_id: Option<i64>) -> Result<Vec<Project>> {
        let path = with_ministry_filter("projects", ministry_id);
        self.call(Method::GET, &path, Auth::Required, None::<&()>)
            .await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project> {
        project.validate()?;
        self.call(Method::POST, "projects", Auth::Required, Some(project))
            .await
    }

    pub async fn expense_requests(&self, ministry_id: Option<i64>) -> Result<Vec<ExpenseRequest>> {
        let path = with_ministry_filter("expense-requests", ministry_id);
        self.call(Method::GET, &path, Auth::Required, None::<&()>)
            .await
    }

    pub async fn submit_expense_request(
        &self,
        request: &NewExpenseRequest,
    ) -> Result<ExpenseRequest> {
        request.validate()?;
        self.call(Method::POST, "expense-requests", Auth::Required, Some(request))
            .await
    }

    pub async fn decide_expense_request(
        &self,
        request_id: i64,
        decision: ExpenseDecision,
    ) -> Result<ExpenseRequest> {
        let path = format!("expense-requests/{}/{}", request_id, decision.path_segment());
        self.call(Method::PUT, &path, Auth::Required, None::<&()>)
            .await
    }

    pub async fn approve_expense_request(&self, request_id: i64) -> Result<ExpenseRequest> {
        self.decide_expense_request(request_id, ExpenseDecision::Approve)
            .await
    }

    pub async fn reject_expense_request(&self, request_id: i64) -> Result<ExpenseRequest> {
        self.decide_expense_request(request_id, ExpenseDecision::Reject)
            .await
    }

    // ------------------------------------------------------------------
    // Tax payments
    // ------------------------------------------------------------------

    pub async fn pay_tax(&self, payment: &NewTaxPayment) -> Result<TaxPayment> {
        payment.validate()?;
        self.call(Method::POST, "tax-payments", Auth::Required, Some(payment))
            .await
    }

    pub async fn tax_payments(&self, query: &TaxPaymentQuery) -> Result<Vec<TaxPayment>> {
        let (request, token) = self.request(Method::GET, "tax-payments", Auth::Required)?;
        self.send(request.query(query), token).await
    }

    pub async fn tax_payment_stats(&self) -> Result<TaxPaymentStats> {
        self.call(
            Method::GET,
            "tax-payments/stats/summary",
            Auth::Required,
            None::<&()>,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Live updates
    // ------------------------------------------------------------------

    /// Live-update endpoint for the signed-in wallet.
    pub fn live_url(&self) -> Result<Url> {
        let session = self.gate.current().ok_or(TreasuryError::NotAuthenticated)?;
        live::live_url(&self.ws_base, session.wallet_address())
    }

    /// Live-update subscription for the signed-in wallet.
    #[cfg(feature = "live")]
    pub fn live_updates(&self) -> Result<live::LiveUpdates> {
        let url = self.live_url()?;
        let updates = live::LiveUpdates::new(url);
        Ok(match self.gate.access_token() {
            Some(token) => updates.with_token(token),
            None => updates,
        })
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    async fn call<B, T>(&self, method: Method, path: &str, auth: Auth, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (mut request, token) = self.request(method, path, auth)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, token).await
    }

    /// Build a request, returning the bearer token it carries alongside it.
    fn request(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
    ) -> Result<(RequestBuilder, Option<String>)> {
        let url = self.base.join(path)?;
        debug!(%method, path, "Calling treasury API");

        let request = self.http.request(method, url);
        if auth == Auth::None {
            return Ok((request, None));
        }

        if auth == Auth::Required && self.preflight_expiry && self.gate.check_expiry(Utc::now())? {
            warn!("Access token expired before the call was made");
            return Err(TreasuryError::Unauthorized);
        }

        match self.gate.access_token() {
            Some(token) => Ok((request.bearer_auth(&token), Some(token))),
            None if auth == Auth::Required => Err(TreasuryError::NotAuthenticated),
            None => Ok((request, None)),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<String>,
    ) -> Result<T> {
        let response = self.execute(request, token.as_deref()).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn execute(&self, request: RequestBuilder, token: Option<&str>) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if let (StatusCode::UNAUTHORIZED, Some(token)) = (status, token) {
            // Only the session that sent the token is signed out.
            match self.gate.expire_token(token) {
                Ok(Some(_)) => warn!("Backend rejected the session token, signed out"),
                Ok(None) => warn!("Backend rejected a token that has since been replaced"),
                Err(e) => error!(error = %e, "Failed to clear stored session"),
            }
            return Err(TreasuryError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = api_error(status, &body);
            warn!(status = status.as_u16(), error = %err, "Treasury API call failed");
            return Err(err);
        }

        Ok(response)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn with_ministry_filter(path: &str, ministry_id: Option<i64>) -> String {
    match ministry_id {
        Some(id) => format!("{}?ministry_id={}", path, id),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    #[test]
    fn base_url_keeps_its_prefix() {
        let client = TreasuryClient::new(
            ClientOptions::default().with_api_url("https://finance.example.gov/api"),
            SessionGate::new(MemoryStorage::new()),
        )
        .unwrap();

        assert_eq!(client.base_url().as_str(), "https://finance.example.gov/api/");
        assert_eq!(
            client.base.join("ministries/4/allocate-budget").unwrap().as_str(),
            "https://finance.example.gov/api/ministries/4/allocate-budget"
        );
        assert_eq!(client.ws_base.as_str(), "wss://finance.example.gov/api/");
    }

    #[test]
    fn live_url_needs_a_session() {
        let client = TreasuryClient::new(
            ClientOptions::default(),
            SessionGate::new(MemoryStorage::new()),
        )
        .unwrap();
        assert!(matches!(
            client.live_url(),
            Err(TreasuryError::NotAuthenticated)
        ));
    }

    #[test]
    fn ministry_filter_is_a_query_string() {
        assert_eq!(with_ministry_filter("projects", None), "projects");
        assert_eq!(
            with_ministry_filter("projects", Some(3)),
            "projects?ministry_id=3"
        );
    }
}
