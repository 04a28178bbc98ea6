//! Colon-delimited PBKDF2 and scrypt password hashes.
//!
//! Format: `<scheme>:<cost>:<salt-hex>:<hash-hex>` where `scheme` is
//! `pbkdf2` (PBKDF2-HMAC-SHA256, cost = iterations) or `scrypt`
//! (cost = N, r = 8, p = 1).

use crate::config::{
    KeyDerivation, MAX_PBKDF2_ITERATIONS, MAX_SCRYPT_LOG_N, MIN_SALT_LENGTH, MIN_SCRYPT_LOG_N,
};
use crate::error::{CryptoError, ErrorCode, Result};
use crate::symmetric::kdf::{derive_key, KdfParams};
use crate::utils::{constant_time_eq, decode_hex, random_bytes};

pub const PBKDF2_SCHEME: &str = "pbkdf2";
pub const SCRYPT_SCHEME: &str = "scrypt";

/// Derived hash length for new legacy hashes.
pub const LEGACY_HASH_LEN: usize = 64;

/// Stored hashes outside this range are rejected as malformed.
const MIN_STORED_HASH_LEN: usize = 16;
const MAX_STORED_HASH_LEN: usize = 128;

pub fn hash_pbkdf2(password: &str, iterations: u32) -> Result<String> {
    const OP: &str = "hash_password_pbkdf2";
    let salt = random_bytes(MIN_SALT_LENGTH);
    let params = KdfParams {
        kdf: KeyDerivation::Pbkdf2Sha256,
        iterations,
        scrypt_log_n: 0,
    };
    let hash = derive_key(password.as_bytes(), &salt, &params, LEGACY_HASH_LEN)
        .map_err(|e| e.rewrap(ErrorCode::HashingFailed, OP))?;
    Ok(format!(
        "{}:{}:{}:{}",
        PBKDF2_SCHEME,
        iterations,
        hex::encode(&salt),
        hex::encode(hash.as_bytes())
    ))
}

pub fn hash_scrypt(password: &str, log_n: u8) -> Result<String> {
    const OP: &str = "hash_password_scrypt";
    let salt = random_bytes(MIN_SALT_LENGTH);
    let params = KdfParams {
        kdf: KeyDerivation::Scrypt,
        iterations: 0,
        scrypt_log_n: log_n,
    };
    let hash = derive_key(password.as_bytes(), &salt, &params, LEGACY_HASH_LEN)
        .map_err(|e| e.rewrap(ErrorCode::HashingFailed, OP))?;
    Ok(format!(
        "{}:{}:{}:{}",
        SCRYPT_SCHEME,
        1u64 << log_n,
        hex::encode(&salt),
        hex::encode(hash.as_bytes())
    ))
}

/// Recompute and compare in constant time.
pub fn verify_legacy(password: &str, stored: &str) -> Result<bool> {
    const OP: &str = "verify_password_legacy";

    let parsed = parse(stored)?;
    if password.is_empty() {
        return Ok(false);
    }

    let computed = derive_key(password.as_bytes(), &parsed.salt, &parsed.params, parsed.hash.len())
        .map_err(|e| e.rewrap(ErrorCode::VerificationFailed, OP))?;
    Ok(constant_time_eq(computed.as_bytes(), &parsed.hash))
}

struct ParsedLegacy {
    params: KdfParams,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

fn parse(stored: &str) -> Result<ParsedLegacy> {
    const OP: &str = "verify_password_legacy";
    let unsupported = |message: String| CryptoError::new(ErrorCode::UnsupportedHashFormat, OP, message);

    let parts: Vec<&str> = stored.split(':').collect();
    let [scheme, cost, salt_hex, hash_hex] = parts.as_slice() else {
        return Err(unsupported(format!(
            "expected <scheme>:<cost>:<salt>:<hash> (got {} parts)",
            parts.len()
        )));
    };

    let cost: u64 = cost
        .parse()
        .map_err(|_| unsupported(format!("cost is not a number: {}", cost)))?;

    let params = match *scheme {
        PBKDF2_SCHEME => {
            let iterations = u32::try_from(cost)
                .ok()
                .filter(|iterations| *iterations <= MAX_PBKDF2_ITERATIONS)
                .ok_or_else(|| unsupported(format!("iteration count out of range: {}", cost)))?;
            KdfParams {
                kdf: KeyDerivation::Pbkdf2Sha256,
                iterations,
                scrypt_log_n: 0,
            }
        }
        SCRYPT_SCHEME => {
            if !cost.is_power_of_two() {
                return Err(unsupported(format!("scrypt N must be a power of two: {}", cost)));
            }
            let log_n = cost.trailing_zeros() as u8;
            if !(MIN_SCRYPT_LOG_N..=MAX_SCRYPT_LOG_N).contains(&log_n) {
                return Err(unsupported(format!("scrypt N out of range: {}", cost)));
            }
            KdfParams {
                kdf: KeyDerivation::Scrypt,
                iterations: 0,
                scrypt_log_n: log_n,
            }
        }
        other => return Err(unsupported(format!("unknown legacy scheme: {}", other))),
    };

    let salt = decode_hex(salt_hex, OP, "salt")
        .map_err(|e| e.rewrap(ErrorCode::UnsupportedHashFormat, OP))?;
    let hash = decode_hex(hash_hex, OP, "hash")
        .map_err(|e| e.rewrap(ErrorCode::UnsupportedHashFormat, OP))?;
    if !(MIN_STORED_HASH_LEN..=MAX_STORED_HASH_LEN).contains(&hash.len()) {
        return Err(unsupported(format!(
            "stored hash must be {}..={} bytes (got {})",
            MIN_STORED_HASH_LEN,
            MAX_STORED_HASH_LEN,
            hash.len()
        )));
    }

    Ok(ParsedLegacy { params, salt, hash })
}
