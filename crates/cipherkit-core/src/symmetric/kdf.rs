//! Password-to-key derivation (PBKDF2 and scrypt).
//!
//! Derived keys live in a [`DerivedKey`], which zeroizes its bytes on drop
//! and never prints them.

use pbkdf2::pbkdf2_hmac;
use sha2::{Sha256, Sha512};
use zeroize::ZeroizeOnDrop;

use crate::config::{KeyDerivation, SymmetricConfig, MIN_PBKDF2_ITERATIONS, MIN_SALT_LENGTH};
use crate::error::{CryptoError, ErrorCode, LibraryError, Result};

/// scrypt block size and parallelism; only N is tunable.
pub const SCRYPT_R: u32 = 8;
pub const SCRYPT_P: u32 = 1;

/// Parameters for one derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub kdf: KeyDerivation,
    pub iterations: u32,
    pub scrypt_log_n: u8,
}

impl From<&SymmetricConfig> for KdfParams {
    fn from(config: &SymmetricConfig) -> Self {
        Self {
            kdf: config.kdf,
            iterations: config.iterations,
            scrypt_log_n: config.scrypt_log_n,
        }
    }
}

/// Key material derived from a password.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: Vec<u8>,
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Use only for the immediate cipher operation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .field("len", &self.key.len())
            .finish()
    }
}

/// Derive `key_len` bytes from `password` and `salt`.
///
/// Same password, salt and parameters always give the same key.
///
/// # Errors
///
/// - `INVALID_INPUT` for an empty password
/// - `INSUFFICIENT_SALT_LENGTH` for a salt shorter than 16 bytes
/// - `INSUFFICIENT_ITERATIONS` for PBKDF2 below 100,000 iterations
/// - `KEY_DERIVATION_FAILED` when scrypt rejects its parameters
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
    key_len: usize,
) -> Result<DerivedKey> {
    const OP: &str = "derive_key";

    if password.is_empty() {
        return Err(CryptoError::invalid_input(OP, "password cannot be empty"));
    }
    if salt.len() < MIN_SALT_LENGTH {
        return Err(CryptoError::new(
            ErrorCode::InsufficientSaltLength,
            OP,
            format!(
                "salt must be at least {} bytes (got {})",
                MIN_SALT_LENGTH,
                salt.len()
            ),
        ));
    }

    let mut key = vec![0u8; key_len];
    match params.kdf {
        KeyDerivation::Pbkdf2Sha256 | KeyDerivation::Pbkdf2Sha512 => {
            if params.iterations < MIN_PBKDF2_ITERATIONS {
                return Err(CryptoError::new(
                    ErrorCode::InsufficientIterations,
                    OP,
                    format!(
                        "PBKDF2 needs at least {} iterations (got {})",
                        MIN_PBKDF2_ITERATIONS, params.iterations
                    ),
                ));
            }
            if params.kdf == KeyDerivation::Pbkdf2Sha256 {
                pbkdf2_hmac::<Sha256>(password, salt, params.iterations, &mut key);
            } else {
                pbkdf2_hmac::<Sha512>(password, salt, params.iterations, &mut key);
            }
        }
        KeyDerivation::Scrypt => {
            let scrypt_params =
                scrypt::Params::new(params.scrypt_log_n, SCRYPT_R, SCRYPT_P, key_len).map_err(
                    |e| {
                        CryptoError::with_source(
                            ErrorCode::KeyDerivationFailed,
                            OP,
                            "invalid scrypt parameters",
                            LibraryError::from_display(e),
                        )
                    },
                )?;
            scrypt::scrypt(password, salt, &scrypt_params, &mut key).map_err(|e| {
                CryptoError::with_source(
                    ErrorCode::KeyDerivationFailed,
                    OP,
                    "scrypt derivation failed",
                    LibraryError::from_display(e),
                )
            })?;
        }
    }

    tracing::trace!(kdf = ?params.kdf, key_len, "derived key");
    Ok(DerivedKey::from_bytes(key))
}
