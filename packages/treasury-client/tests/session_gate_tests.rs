//! Session gate lifecycle: restore, login, logout, forced expiry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use treasury_client::session::{
    ACCESS_TOKEN_KEY, MINISTRY_ID_KEY, OFFICE_NAME_KEY, SESSION_KEYS, USER_KEY, USER_ROLE_KEY,
    WALLET_ADDRESS_KEY,
};
use treasury_client::{
    Access, AuthState, FileStorage, Identity, MemoryStorage, Redirect, Role, SessionGate,
    SessionStorage, SignOutReason, StorageError,
};

mod common;

fn ministry_admin() -> Identity {
    Identity {
        office_name: "HealthOffice".into(),
        wallet_address: "0xhealth".into(),
        role: Role::MinistryAdmin,
        ministry_id: Some(2),
    }
}

fn gate_over(storage: &Arc<MemoryStorage>) -> SessionGate {
    SessionGate::with_storage(storage.clone())
}

#[test]
fn restore_without_stored_token_is_anonymous() {
    let gate = SessionGate::new(MemoryStorage::new());

    let state = gate.restore().unwrap();

    assert_eq!(state, AuthState::Anonymous { reason: None });
    assert!(!gate.is_authenticated());
    assert_eq!(gate.authorize(None), Access::Deny(Redirect::Login));
}

#[test]
fn restore_returns_the_exact_stored_identity() {
    let storage = Arc::new(MemoryStorage::new());
    gate_over(&storage).login("token-1", ministry_admin()).unwrap();

    let restored = gate_over(&storage);
    let state = restored.restore().unwrap();

    let session = state.session().expect("session should be restored");
    assert_eq!(session.role(), Role::MinistryAdmin);
    assert_eq!(session.ministry_id(), Some(2));
    assert_eq!(session.access_token(), "token-1");
    assert_eq!(session.identity(), &ministry_admin());
}

#[test]
fn token_without_identity_restores_anonymous() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(ACCESS_TOKEN_KEY, "orphan").unwrap();

    assert!(!gate_over(&storage).restore().unwrap().is_authenticated());

    storage.set(USER_KEY, "{not json").unwrap();
    assert!(!gate_over(&storage).restore().unwrap().is_authenticated());
}

#[test]
fn identity_without_token_restores_anonymous() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .set(USER_KEY, &serde_json::to_string(&ministry_admin()).unwrap())
        .unwrap();

    assert!(!gate_over(&storage).restore().unwrap().is_authenticated());
}

#[test]
fn restore_falls_back_to_individual_keys() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(ACCESS_TOKEN_KEY, "token-2").unwrap();
    storage.set(OFFICE_NAME_KEY, "RoadsOffice").unwrap();
    storage.set(WALLET_ADDRESS_KEY, "0xroads").unwrap();
    storage.set(USER_ROLE_KEY, "ministry_officer").unwrap();
    storage.set(MINISTRY_ID_KEY, "5").unwrap();

    let gate = gate_over(&storage);
    gate.restore().unwrap();

    let session = gate.current().unwrap();
    assert_eq!(session.office_name(), "RoadsOffice");
    assert_eq!(session.role(), Role::MinistryOfficer);
    assert_eq!(session.ministry_id(), Some(5));
}

#[test]
fn login_writes_every_identity_key() {
    let storage = Arc::new(MemoryStorage::new());
    gate_over(&storage).login("token-1", ministry_admin()).unwrap();

    assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("token-1"));
    assert_eq!(storage.get(USER_ROLE_KEY).unwrap().as_deref(), Some("ministry_admin"));
    assert_eq!(storage.get(OFFICE_NAME_KEY).unwrap().as_deref(), Some("HealthOffice"));
    assert_eq!(storage.get(WALLET_ADDRESS_KEY).unwrap().as_deref(), Some("0xhealth"));
    assert_eq!(storage.get(MINISTRY_ID_KEY).unwrap().as_deref(), Some("2"));
}

#[test]
fn logout_then_restore_leaves_nothing_behind() {
    let storage = Arc::new(MemoryStorage::new());
    let gate = gate_over(&storage);
    gate.login("token-1", ministry_admin()).unwrap();

    let redirect = gate.logout().unwrap();

    assert_eq!(redirect, Redirect::Login);
    assert_eq!(
        gate.state(),
        AuthState::Anonymous {
            reason: Some(SignOutReason::UserRequested)
        }
    );
    for key in SESSION_KEYS {
        assert_eq!(storage.get(key).unwrap(), None, "{key} survived logout");
    }
    assert!(storage.is_empty());
    assert!(!gate_over(&storage).restore().unwrap().is_authenticated());
}

/// Memory storage whose removals can be switched off.
#[derive(Default)]
struct LockableStorage {
    entries: MemoryStorage,
    locked: AtomicBool,
}

impl SessionStorage for LockableStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.entries.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.locked.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage is locked".into()));
        }
        self.entries.remove(key)
    }
}

#[test]
fn failed_logout_keeps_the_session_signed_in() {
    let storage = Arc::new(LockableStorage::default());
    let gate = SessionGate::with_storage(storage.clone());
    gate.login("token-1", ministry_admin()).unwrap();
    let changes = gate.subscribe();
    storage.locked.store(true, Ordering::SeqCst);

    assert!(gate.logout().is_err());
    assert!(gate.expire().is_err());

    assert!(gate.is_authenticated());
    assert_eq!(gate.access_token().as_deref(), Some("token-1"));
    assert!(!changes.has_changed().unwrap());
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("token-1"));

    storage.locked.store(false, Ordering::SeqCst);
    assert_eq!(gate.logout().unwrap(), Redirect::Login);
    assert!(!gate.is_authenticated());
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[test]
fn expiring_a_replaced_token_keeps_the_new_session() {
    let gate = SessionGate::new(MemoryStorage::new());
    gate.login("token-1", ministry_admin()).unwrap();
    gate.login("token-2", ministry_admin()).unwrap();

    assert_eq!(gate.expire_token("token-1").unwrap(), None);
    assert_eq!(gate.access_token().as_deref(), Some("token-2"));

    assert_eq!(gate.expire_token("token-2").unwrap(), Some(Redirect::Login));
    assert_eq!(
        gate.state().sign_out_reason(),
        Some(SignOutReason::Unauthorized)
    );
}

#[test]
fn file_backed_session_survives_restart_and_logout_clears_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    SessionGate::new(FileStorage::open(&path).unwrap())
        .login("token-9", ministry_admin())
        .unwrap();

    let gate = SessionGate::new(FileStorage::open(&path).unwrap());
    gate.restore().unwrap();
    assert_eq!(gate.role(), Some(Role::MinistryAdmin));

    gate.logout().unwrap();
    assert!(!path.exists());

    let after = SessionGate::new(FileStorage::open(&path).unwrap());
    assert!(!after.restore().unwrap().is_authenticated());
}

#[test]
fn ministry_routes_allow_ministry_admin_and_super_admin_only() {
    let gate = SessionGate::new(MemoryStorage::new());

    gate.login("t", ministry_admin()).unwrap();
    assert!(gate.authorize(Some(Role::MinistryAdmin)).is_allowed());

    gate.login(
        "t",
        Identity {
            role: Role::SuperAdmin,
            ministry_id: None,
            ..ministry_admin()
        },
    )
    .unwrap();
    assert!(gate.authorize(Some(Role::MinistryAdmin)).is_allowed());

    gate.login(
        "t",
        Identity {
            role: Role::Citizen,
            ministry_id: None,
            ..ministry_admin()
        },
    )
    .unwrap();
    assert_eq!(
        gate.authorize(Some(Role::MinistryAdmin)),
        Access::Deny(Redirect::Home)
    );
}

#[tokio::test]
async fn subscribers_see_login_and_forced_logout() {
    let gate = SessionGate::new(MemoryStorage::new());
    let mut changes = gate.subscribe();

    gate.login("t", ministry_admin()).unwrap();
    changes.changed().await.unwrap();
    assert_eq!(changes.borrow_and_update().role(), Some(Role::MinistryAdmin));

    gate.expire().unwrap();
    changes.changed().await.unwrap();
    assert_eq!(
        changes.borrow_and_update().sign_out_reason(),
        Some(SignOutReason::Unauthorized)
    );
}

#[test]
fn explicit_expiry_check_signs_out_stale_tokens() {
    let now = Utc::now();
    let storage = Arc::new(MemoryStorage::new());
    let gate = gate_over(&storage);

    let fresh = common::jwt(json!({"sub": "HealthOffice", "exp": (now + Duration::hours(1)).timestamp()}));
    gate.login(fresh, ministry_admin()).unwrap();
    assert!(!gate.check_expiry(now).unwrap());
    assert!(gate.is_authenticated());

    let stale = common::jwt(json!({"sub": "HealthOffice", "exp": (now - Duration::minutes(1)).timestamp()}));
    gate.login(stale, ministry_admin()).unwrap();
    assert!(gate.check_expiry(now).unwrap());
    assert_eq!(gate.state().sign_out_reason(), Some(SignOutReason::Expired));
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[test]
fn landing_path_follows_role() {
    let gate = SessionGate::new(MemoryStorage::new());
    assert_eq!(gate.landing_path(), "/login");

    gate.login("t", ministry_admin()).unwrap();
    assert_eq!(gate.landing_path(), "/ministries");
}
