//! Access token claims.
//!
//! Tokens are signed by the identity platform and checked there; this module
//! only reads the payload segment and enforces the time, audience and issuer
//! constraints a client can check locally.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, ErrorCode, Result};

/// `aud` is either a single string or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::One(value) => value == audience,
            Self::Many(values) => values.iter().any(|v| v == audience),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Space-separated delegated scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scp: Option<String>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scp.as_deref().unwrap_or_default().split_whitespace()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Constraints applied by [`validate_claims`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsValidation {
    pub audience: Option<String>,
    pub issuer: Option<String>,
    /// Clock skew tolerated on `exp` and `nbf`.
    pub leeway_secs: i64,
}

/// Decode the payload of a compact JWS without checking its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    const OP: &str = "decode_claims";
    let invalid = |message: &str| CryptoError::new(ErrorCode::InvalidToken, OP, message);

    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(invalid("token must have three dot-separated segments"));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| {
            CryptoError::with_source(ErrorCode::InvalidToken, OP, "payload is not base64url", e)
        })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        CryptoError::with_source(
            ErrorCode::InvalidToken,
            OP,
            "payload is not a claims object",
            e,
        )
    })
}

/// Check expiry, not-before, audience, issuer and subject at `now`.
pub fn validate_claims(
    claims: &TokenClaims,
    validation: &ClaimsValidation,
    now: DateTime<Utc>,
) -> Result<()> {
    const OP: &str = "validate_claims";
    let now = now.timestamp();
    let leeway = validation.leeway_secs.max(0);

    if claims.exp.saturating_add(leeway) <= now {
        return Err(CryptoError::new(
            ErrorCode::TokenExpired,
            OP,
            format!("token expired at {}", claims.exp),
        ));
    }
    if let Some(nbf) = claims.nbf {
        if nbf.saturating_sub(leeway) > now {
            return Err(CryptoError::new(
                ErrorCode::InvalidToken,
                OP,
                format!("token not valid before {}", nbf),
            ));
        }
    }
    if let Some(expected) = &validation.audience {
        let matches = claims
            .aud
            .as_ref()
            .map(|aud| aud.contains(expected))
            .unwrap_or(false);
        if !matches {
            return Err(CryptoError::new(
                ErrorCode::InvalidToken,
                OP,
                format!("audience does not include {}", expected),
            ));
        }
    }
    if let Some(expected) = &validation.issuer {
        if claims.iss.as_deref() != Some(expected.as_str()) {
            return Err(CryptoError::new(
                ErrorCode::InvalidToken,
                OP,
                "issuer mismatch",
            ));
        }
    }
    if claims.sub.trim().is_empty() {
        return Err(CryptoError::new(ErrorCode::InvalidToken, OP, "subject is empty"));
    }

    tracing::debug!(exp = claims.exp, "token claims validated");
    Ok(())
}
