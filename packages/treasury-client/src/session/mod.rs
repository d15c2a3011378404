//! Session model, durable storage and the authorization gate.

mod gate;
mod storage;

pub use gate::*;
pub use storage::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Office role. Decides which views an identity may open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    MinistryAdmin,
    MinistryOfficer,
    Citizen,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::MinistryAdmin => "ministry_admin",
            Role::MinistryOfficer => "ministry_officer",
            Role::Citizen => "citizen",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::MinistryAdmin => "Ministry Admin",
            Role::MinistryOfficer => "Ministry Officer",
            Role::Citizen => "Citizen",
        }
    }

    /// The top-level administrative role passes every role check.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Where a freshly signed-in identity of this role lands.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::MinistryAdmin | Role::MinistryOfficer => "/ministries",
            Role::SuperAdmin | Role::Citizen => "/",
        }
    }

    pub fn variants() -> &'static [Role] {
        &[
            Role::SuperAdmin,
            Role::MinistryAdmin,
            Role::MinistryOfficer,
            Role::Citizen,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::variants()
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Who is signed in. Stored as JSON under the `user` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub office_name: String,
    pub wallet_address: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ministry_id: Option<i64>,
}

/// An authenticated identity plus the credentials that prove it.
///
/// There is no way to hold a token without an identity, so a bearer token
/// always comes with a role.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    refresh_token: Option<String>,
    identity: Identity,
}

impl Session {
    pub fn new(access_token: impl Into<String>, identity: Identity) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            identity,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    pub fn office_name(&self) -> &str {
        &self.identity.office_name
    }

    pub fn wallet_address(&self) -> &str {
        &self.identity.wallet_address
    }

    pub fn ministry_id(&self) -> Option<i64> {
        self.identity.ministry_id
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("identity", &self.identity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names() {
        for role in Role::variants() {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        assert!("treasurer".parse::<Role>().is_err());
        assert!(serde_json::from_str::<Role>("\"treasurer\"").is_err());
    }

    #[test]
    fn identity_omits_missing_ministry() {
        let identity = Identity {
            office_name: "FinanceOffice".into(),
            wallet_address: "0xabc".into(),
            role: Role::SuperAdmin,
            ministry_id: None,
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("ministry_id").is_none());
        assert_eq!(json["role"], "super_admin");
    }

    #[test]
    fn debug_redacts_tokens() {
        let session = Session::new(
            "secret-token",
            Identity {
                office_name: "HealthOffice".into(),
                wallet_address: "0xdef".into(),
                role: Role::MinistryAdmin,
                ministry_id: Some(3),
            },
        )
        .with_refresh_token(Some("refresh-secret".into()));

        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(!rendered.contains("refresh-secret"));
        assert!(rendered.contains("HealthOffice"));
    }

    #[test]
    fn landing_paths() {
        assert_eq!(Role::SuperAdmin.landing_path(), "/");
        assert_eq!(Role::MinistryAdmin.landing_path(), "/ministries");
        assert_eq!(Role::MinistryOfficer.landing_path(), "/ministries");
        assert_eq!(Role::Citizen.landing_path(), "/");
    }
}
