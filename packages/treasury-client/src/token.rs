//! Bearer token helpers.
//!
//! The payload is decoded without checking the signature; the backend is the
//! only party that can validate a token. These helpers exist for display and
//! for the opt-in expiry check.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::TokenError;
use crate::session::{Identity, Role};

/// Claims the backend puts in its access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Office name.
    pub sub: Option<String>,
    pub role: Option<String>,
    pub wallet_address: Option<String>,
    pub ministry_id: Option<i64>,
    /// Expiry, seconds since the epoch.
    pub exp: Option<i64>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Identity carried by the token, when it names an office and a known role.
    pub fn identity(&self) -> Option<Identity> {
        let role = self.role.as_deref()?.parse::<Role>().ok()?;
        Some(Identity {
            office_name: self.sub.clone()?,
            wallet_address: self.wallet_address.clone().unwrap_or_default(),
            role,
            ministry_id: self.ministry_id,
        })
    }
}

pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// True when the token has passed its `exp`, or cannot be read at all.
/// A token without an `exp` claim never expires locally.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp.is_some_and(|exp| now.timestamp() >= exp),
        Err(_) => true,
    }
}

#[cfg(test)]
pub(crate) fn encode_for_test(claims: serde_json::Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.signature",
        engine.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        engine.encode(claims.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_claims() {
        let token = encode_for_test(json!({
            "sub": "HealthOffice",
            "role": "ministry_admin",
            "wallet_address": "0xfeed",
            "ministry_id": 4,
            "exp": 1_900_000_000
        }));

        let claims = decode_claims(&token).unwrap();
        let identity = claims.identity().unwrap();
        assert_eq!(identity.office_name, "HealthOffice");
        assert_eq!(identity.role, Role::MinistryAdmin);
        assert_eq!(identity.ministry_id, Some(4));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_900_000_000);
    }

    #[test]
    fn expiry_is_inclusive() {
        let token = encode_for_test(json!({ "sub": "x", "exp": 1_000 }));
        let at = |secs| DateTime::from_timestamp(secs, 0).unwrap();

        assert!(!is_expired(&token, at(999)));
        assert!(is_expired(&token, at(1_000)));
        assert!(is_expired(&token, at(5_000)));
    }

    #[test]
    fn garbage_counts_as_expired() {
        let now = Utc::now();
        assert!(is_expired("not-a-jwt", now));
        assert!(is_expired("a.!!!.c", now));
        assert!(matches!(decode_claims("a.b"), Err(TokenError::Malformed)));
    }

    #[test]
    fn missing_exp_never_expires() {
        let token = encode_for_test(json!({ "sub": "x" }));
        assert!(!is_expired(&token, Utc::now()));
    }
}
