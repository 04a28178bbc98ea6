//! Random material, digests, MACs and constant-time comparison.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::config::MIN_SALT_LENGTH;
use crate::error::{CryptoError, ErrorCode, LibraryError, Result};

/// Minimum entropy for generated tokens, in bytes.
pub const MIN_TOKEN_BYTES: usize = 16;

/// Digest used by [`hash`] and [`hmac`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl std::str::FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(CryptoError::new(
                ErrorCode::InvalidParameters,
                "parse_hash_algorithm",
                format!("unsupported hash algorithm: {}", other),
            )),
        }
    }
}

/// Fill a buffer of `len` bytes from the OS CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// `len` random bytes, hex encoded (`2 * len` characters).
pub fn random_hex(len: usize) -> String {
    hex::encode(random_bytes(len))
}

/// Generate a random salt of at least 16 bytes.
///
/// # Errors
///
/// `INSUFFICIENT_SALT_LENGTH` when `length < 16`.
pub fn generate_salt(length: usize) -> Result<Vec<u8>> {
    if length < MIN_SALT_LENGTH {
        return Err(CryptoError::new(
            ErrorCode::InsufficientSaltLength,
            "generate_salt",
            format!(
                "salt must be at least {} bytes (got {})",
                MIN_SALT_LENGTH, length
            ),
        ));
    }
    Ok(random_bytes(length))
}

/// URL-safe, unpadded base64 token built from `bytes` random bytes.
pub fn generate_token(bytes: usize) -> Result<String> {
    if bytes < MIN_TOKEN_BYTES {
        return Err(CryptoError::new(
            ErrorCode::InvalidParameters,
            "generate_token",
            format!(
                "token must use at least {} random bytes (got {})",
                MIN_TOKEN_BYTES, bytes
            ),
        ));
    }
    Ok(URL_SAFE_NO_PAD.encode(random_bytes(bytes)))
}

/// Random (v4) UUID in hyphenated form.
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Hex digest of `data`.
pub fn hash(data: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
    }
}

/// Hex HMAC of `data` under `key`.
pub fn hmac(data: &[u8], key: &[u8], algorithm: HashAlgorithm) -> Result<String> {
    let tag = match algorithm {
        HashAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(|e| {
                CryptoError::with_source(
                    ErrorCode::InvalidKey,
                    "hmac",
                    "invalid HMAC key",
                    LibraryError::from_display(e),
                )
            })?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(|e| {
                CryptoError::with_source(
                    ErrorCode::InvalidKey,
                    "hmac",
                    "invalid HMAC key",
                    LibraryError::from_display(e),
                )
            })?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    };
    Ok(hex::encode(tag))
}

/// Check a hex HMAC in constant time. Malformed hex is a mismatch.
pub fn verify_hmac(
    data: &[u8],
    key: &[u8],
    expected_hex: &str,
    algorithm: HashAlgorithm,
) -> Result<bool> {
    let computed = hmac(data, key, algorithm)?;
    Ok(constant_time_eq(
        computed.as_bytes(),
        expected_hex.to_ascii_lowercase().as_bytes(),
    ))
}

/// Constant-time equality. Slices of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

pub(crate) fn decode_hex(value: &str, operation: &'static str, what: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| {
        CryptoError::with_source(
            ErrorCode::InvalidInput,
            operation,
            format!("{} is not valid hex", what),
            e,
        )
    })
}
