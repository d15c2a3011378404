use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::storage::*;
use super::{Identity, Role, Session, SessionStorage};
use crate::error::StorageError;
use crate::token;
use crate::types::TokenResponse;

/// Why the gate last went anonymous.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignOutReason {
    /// Explicit logout.
    UserRequested,
    /// The backend answered 401.
    Unauthorized,
    /// The token's `exp` claim passed (only when expiry is checked).
    Expired,
}

impl SignOutReason {
    pub fn message(&self) -> &'static str {
        match self {
            SignOutReason::UserRequested => "You have been signed out.",
            SignOutReason::Unauthorized | SignOutReason::Expired => {
                "Your session has expired. Please sign in again."
            }
        }
    }
}

/// Snapshot of the gate.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthState {
    Anonymous { reason: Option<SignOutReason> },
    Authenticated(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous { .. } => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn role(&self) -> Option<Role> {
        self.session().map(Session::role)
    }

    pub fn sign_out_reason(&self) -> Option<SignOutReason> {
        match self {
            AuthState::Anonymous { reason } => *reason,
            AuthState::Authenticated(_) => None,
        }
    }
}

/// Where a denied view sends the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Home,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        match self {
            Redirect::Login => "/login",
            Redirect::Home => "/",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny(Redirect),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// Route policy.
///
/// Anonymous is always denied (to the login view), even when no role is
/// required. A signed-in identity passes when no role is required, when its
/// role matches, or when it is the super admin; otherwise it is sent home.
pub fn authorize(session: Option<&Session>, required: Option<Role>) -> Access {
    let Some(session) = session else {
        return Access::Deny(Redirect::Login);
    };

    match required {
        None => Access::Allow,
        Some(role) if session.role() == role => Access::Allow,
        Some(_) if session.role().is_super_admin() => Access::Allow,
        Some(_) => Access::Deny(Redirect::Home),
    }
}

/// Single writer of the session; everything else reads snapshots.
///
/// Cheap to clone. Hand one to every consumer instead of reaching for a
/// global.
#[derive(Clone)]
pub struct SessionGate {
    inner: Arc<Inner>,
}

struct Inner {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<AuthState>,
    // Held across each storage write and the publish that follows it.
    writes: Mutex<()>,
}

impl SessionGate {
    /// Create an anonymous gate over `storage`. Call [`SessionGate::restore`]
    /// to pick up a previous session.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self::with_storage(Arc::new(storage))
    }

    pub fn with_storage(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::Anonymous { reason: None });
        Self {
            inner: Arc::new(Inner {
                storage,
                state,
                writes: Mutex::new(()),
            }),
        }
    }

    /// Load the stored session, if any. No network call and no expiry check.
    ///
    /// A token without a readable identity restores as anonymous.
    pub fn restore(&self) -> Result<AuthState, StorageError> {
        let _writes = self.inner.writes.lock();
        let storage = &self.inner.storage;

        let state = match storage.get(ACCESS_TOKEN_KEY)? {
            Some(token) => match self.stored_identity()? {
                Some(identity) => {
                    let session = Session::new(token, identity)
                        .with_refresh_token(storage.get(REFRESH_TOKEN_KEY)?);
                    info!(
                        office = %session.office_name(),
                        role = %session.role(),
                        "Restored session"
                    );
                    AuthState::Authenticated(session)
                }
                None => {
                    warn!("Stored token has no readable identity, starting anonymous");
                    AuthState::Anonymous { reason: None }
                }
            },
            None => {
                debug!("No stored session");
                AuthState::Anonymous { reason: None }
            }
        };

        self.inner.state.send_replace(state.clone());
        Ok(state)
    }

    fn stored_identity(&self) -> Result<Option<Identity>, StorageError> {
        let storage = &self.inner.storage;

        if let Some(json) = storage.get(USER_KEY)? {
            match serde_json::from_str::<Identity>(&json) {
                Ok(identity) => return Ok(Some(identity)),
                Err(e) => warn!(error = %e, "Stored identity is corrupt"),
            }
        }

        // Older records only carry the individual keys.
        let (Some(office_name), Some(wallet_address), Some(role)) = (
            storage.get(OFFICE_NAME_KEY)?,
            storage.get(WALLET_ADDRESS_KEY)?,
            storage.get(USER_ROLE_KEY)?,
        ) else {
            return Ok(None);
        };
        let Ok(role) = role.parse::<Role>() else {
            return Ok(None);
        };
        let ministry_id = storage
            .get(MINISTRY_ID_KEY)?
            .and_then(|id| id.parse::<i64>().ok());

        Ok(Some(Identity {
            office_name,
            wallet_address,
            role,
            ministry_id,
        }))
    }

    /// Store a fresh session durably and in memory, then notify readers.
    pub fn login(&self, token: impl Into<String>, identity: Identity) -> Result<(), StorageError> {
        self.establish(Session::new(token, identity))
    }

    /// [`SessionGate::login`] from a `/token` response, keeping the refresh token.
    pub fn login_with_response(&self, response: &TokenResponse) -> Result<Session, StorageError> {
        let session = Session::new(response.access_token.clone(), response.identity())
            .with_refresh_token(response.refresh_token.clone());
        self.establish(session.clone())?;
        Ok(session)
    }

    fn establish(&self, session: Session) -> Result<(), StorageError> {
        let _writes = self.inner.writes.lock();
        let storage = &self.inner.storage;
        let identity = session.identity();

        storage.set(ACCESS_TOKEN_KEY, session.access_token())?;
        match session.refresh_token() {
            Some(refresh) => storage.set(REFRESH_TOKEN_KEY, refresh)?,
            None => storage.remove(REFRESH_TOKEN_KEY)?,
        }
        storage.set(USER_KEY, &serde_json::to_string(identity)?)?;
        storage.set(USER_ROLE_KEY, identity.role.as_str())?;
        storage.set(OFFICE_NAME_KEY, &identity.office_name)?;
        storage.set(WALLET_ADDRESS_KEY, &identity.wallet_address)?;
        match identity.ministry_id {
            Some(id) => storage.set(MINISTRY_ID_KEY, &id.to_string())?,
            None => storage.remove(MINISTRY_ID_KEY)?,
        }

        info!(office = %identity.office_name, role = %identity.role, "Signed in");
        self.inner
            .state
            .send_replace(AuthState::Authenticated(session));
        Ok(())
    }

    /// Sign out and return where to go next (always the login view).
    pub fn logout(&self) -> Result<Redirect, StorageError> {
        self.sign_out(SignOutReason::UserRequested)
    }

    /// Forced sign-out after the backend rejected the token.
    pub fn expire(&self) -> Result<Redirect, StorageError> {
        self.sign_out(SignOutReason::Unauthorized)
    }

    /// Forced sign-out after the backend rejected `token`. Returns `None`
    /// and keeps the current session when `token` is no longer the one held.
    pub fn expire_token(&self, token: &str) -> Result<Option<Redirect>, StorageError> {
        let _writes = self.inner.writes.lock();
        if self.access_token().as_deref() != Some(token) {
            debug!("Rejected token was already replaced");
            return Ok(None);
        }
        self.clear_and_publish(SignOutReason::Unauthorized).map(Some)
    }

    /// Explicit expiry check against the token's `exp` claim. Signs out and
    /// returns `true` when the token is expired or unreadable.
    pub fn check_expiry(&self, now: DateTime<Utc>) -> Result<bool, StorageError> {
        let Some(token) = self.access_token() else {
            return Ok(false);
        };
        if !token::is_expired(&token, now) {
            return Ok(false);
        }
        self.sign_out(SignOutReason::Expired)?;
        Ok(true)
    }

    fn sign_out(&self, reason: SignOutReason) -> Result<Redirect, StorageError> {
        let _writes = self.inner.writes.lock();
        self.clear_and_publish(reason)
    }

    /// Readers only see the anonymous state once storage is clear; on a
    /// storage failure the session stays signed in.
    fn clear_and_publish(&self, reason: SignOutReason) -> Result<Redirect, StorageError> {
        self.inner.storage.clear_session()?;
        let previous = self
            .inner
            .state
            .send_replace(AuthState::Anonymous { reason: Some(reason) });
        if let Some(session) = previous.session() {
            info!(office = %session.office_name(), ?reason, "Signed out");
        }
        Ok(Redirect::Login)
    }

    pub fn authorize(&self, required: Option<Role>) -> Access {
        authorize(self.inner.state.borrow().session(), required)
    }

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.state.borrow().session().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn role(&self) -> Option<Role> {
        self.inner.state.borrow().role()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .session()
            .map(|s| s.access_token().to_string())
    }

    /// Post-login destination for the current identity.
    pub fn landing_path(&self) -> &'static str {
        self.role()
            .map(|role| role.landing_path())
            .unwrap_or(Redirect::Login.path())
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session::new(
            "token",
            Identity {
                office_name: "Office".into(),
                wallet_address: "0x1".into(),
                role,
                ministry_id: None,
            },
        )
    }

    #[test]
    fn anonymous_is_always_denied() {
        assert_eq!(authorize(None, None), Access::Deny(Redirect::Login));
        for role in Role::variants() {
            assert_eq!(authorize(None, Some(*role)), Access::Deny(Redirect::Login));
        }
    }

    #[test]
    fn no_required_role_allows_any_identity() {
        for role in Role::variants() {
            assert!(authorize(Some(&session(*role)), None).is_allowed());
        }
    }

    #[test]
    fn super_admin_passes_every_check() {
        let admin = session(Role::SuperAdmin);
        for role in Role::variants() {
            assert!(authorize(Some(&admin), Some(*role)).is_allowed());
        }
    }

    #[test]
    fn mismatched_role_goes_home() {
        assert_eq!(
            authorize(Some(&session(Role::Citizen)), Some(Role::MinistryAdmin)),
            Access::Deny(Redirect::Home)
        );
        assert_eq!(
            authorize(Some(&session(Role::MinistryAdmin)), Some(Role::SuperAdmin)),
            Access::Deny(Redirect::Home)
        );
        assert_eq!(
            authorize(Some(&session(Role::MinistryOfficer)), Some(Role::MinistryAdmin)),
            Access::Deny(Redirect::Home)
        );
    }
}
