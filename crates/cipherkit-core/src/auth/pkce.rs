//! PKCE code verifier and challenge (RFC 7636, `S256` only).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, Result};
use crate::utils::random_bytes;

pub const PKCE_METHOD: &str = "S256";
pub const MIN_VERIFIER_LEN: usize = 43;
pub const MAX_VERIFIER_LEN: usize = 128;

const VERIFIER_ENTROPY_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
    pub method: &'static str,
}

/// Fresh verifier (32 random bytes, 43 characters) and its challenge.
pub fn generate_pkce() -> PkcePair {
    let verifier = URL_SAFE_NO_PAD.encode(random_bytes(VERIFIER_ENTROPY_BYTES));
    let challenge = s256(&verifier);
    PkcePair {
        verifier,
        challenge,
        method: PKCE_METHOD,
    }
}

/// `BASE64URL(SHA256(verifier))` for a caller-supplied verifier.
pub fn challenge_for(verifier: &str) -> Result<String> {
    const OP: &str = "pkce_challenge";
    let len = verifier.len();
    if !(MIN_VERIFIER_LEN..=MAX_VERIFIER_LEN).contains(&len) {
        return Err(CryptoError::invalid_input(
            OP,
            format!(
                "verifier must be {}..={} characters (got {})",
                MIN_VERIFIER_LEN, MAX_VERIFIER_LEN, len
            ),
        ));
    }
    if !verifier.bytes().all(is_unreserved) {
        return Err(CryptoError::invalid_input(
            OP,
            "verifier may only contain A-Z a-z 0-9 - . _ ~",
        ));
    }
    Ok(s256(verifier))
}

fn s256(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}
