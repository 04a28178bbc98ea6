//! Password hashing and verification.
//!
//! New hashes use Argon2id (PHC string format) and are gated by a strength
//! check. bcrypt and the colon-delimited PBKDF2/scrypt formats are kept for
//! existing data. [`PasswordCrypto::verify_password_universal`] picks the
//! verifier from the hash prefix and refuses formats it does not know.

pub mod legacy;
pub mod strength;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::Serialize;

use crate::config::{PasswordConfig, SymmetricConfig, MIN_SALT_LENGTH};
use crate::error::{CryptoError, ErrorCode, LibraryError, Result};
use crate::utils::random_bytes;

pub use strength::{check_strength, PasswordStrength};

/// bcrypt silently ignores input past this many bytes.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

/// Hash families recognised by [`detect_scheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashScheme {
    Argon2,
    Bcrypt,
    Pbkdf2,
    Scrypt,
}

/// Identify a stored hash by its textual prefix.
pub fn detect_scheme(hash: &str) -> Option<HashScheme> {
    let bytes = hash.as_bytes();
    if hash.starts_with("$argon2") {
        Some(HashScheme::Argon2)
    } else if bytes.len() >= 4
        && &bytes[..2] == b"$2"
        && matches!(bytes[2], b'a' | b'b' | b'x' | b'y')
        && bytes[3] == b'$'
    {
        Some(HashScheme::Bcrypt)
    } else if hash.starts_with("pbkdf2:") {
        Some(HashScheme::Pbkdf2)
    } else if hash.starts_with("scrypt:") {
        Some(HashScheme::Scrypt)
    } else {
        None
    }
}

/// Password hashing façade.
#[derive(Debug, Clone, Default)]
pub struct PasswordCrypto {
    config: PasswordConfig,
    legacy: SymmetricConfig,
}

impl PasswordCrypto {
    /// Build a hasher; `legacy` supplies PBKDF2 iterations and scrypt N for
    /// the colon-delimited formats.
    pub fn new(config: PasswordConfig, legacy: SymmetricConfig) -> Result<Self> {
        config.validate()?;
        legacy.validate()?;
        Ok(Self { config, legacy })
    }

    pub fn config(&self) -> &PasswordConfig {
        &self.config
    }

    /// Score a password with the configured minimum length.
    pub fn check_strength(&self, password: &str) -> PasswordStrength {
        check_strength(password, self.config.min_length)
    }

    /// Hash with Argon2id. Weak passwords are refused when strength
    /// enforcement is on.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        const OP: &str = "hash_password";
        if password.is_empty() {
            return Err(CryptoError::invalid_input(OP, "password cannot be empty"));
        }
        if self.config.enforce_strength {
            let strength = self.check_strength(password);
            if !strength.is_strong {
                return Err(CryptoError::new(
                    ErrorCode::WeakPassword,
                    OP,
                    strength.feedback.join("; "),
                ));
            }
        }

        let argon2 = self.argon2(OP)?;
        let salt = SaltString::encode_b64(&random_bytes(MIN_SALT_LENGTH)).map_err(|e| {
            CryptoError::with_source(
                ErrorCode::HashingFailed,
                OP,
                "salt encoding failed",
                LibraryError::from_display(e),
            )
        })?;

        tracing::debug!(
            memory_kib = self.config.argon2_memory_kib,
            time_cost = self.config.argon2_time_cost,
            "hashing password with argon2id"
        );
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                CryptoError::with_source(
                    ErrorCode::HashingFailed,
                    OP,
                    "argon2 hashing failed",
                    LibraryError::from_display(e),
                )
            })
    }

    /// Verify against an Argon2 PHC hash. A wrong password is `Ok(false)`.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        const OP: &str = "verify_password";
        let parsed = PasswordHash::new(hash).map_err(|e| {
            CryptoError::with_source(
                ErrorCode::UnsupportedHashFormat,
                OP,
                "not a PHC password hash",
                LibraryError::from_display(e),
            )
        })?;
        if !parsed.algorithm.as_str().starts_with("argon2") {
            return Err(CryptoError::new(
                ErrorCode::UnsupportedHashFormat,
                OP,
                format!("expected an argon2 hash (got {})", parsed.algorithm),
            ));
        }

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CryptoError::with_source(
                ErrorCode::VerificationFailed,
                OP,
                "argon2 verification failed",
                LibraryError::from_display(e),
            )),
        }
    }

    /// Hash with bcrypt at the configured cost. Inputs over 72 bytes are
    /// refused rather than truncated.
    pub fn hash_password_bcrypt(&self, password: &str) -> Result<String> {
        const OP: &str = "hash_password_bcrypt";
        if password.is_empty() {
            return Err(CryptoError::invalid_input(OP, "password cannot be empty"));
        }
        check_bcrypt_length(password, OP)?;

        tracing::debug!(cost = self.config.bcrypt_cost, "hashing password with bcrypt");
        bcrypt::hash(password, self.config.bcrypt_cost).map_err(|e| {
            CryptoError::with_source(ErrorCode::HashingFailed, OP, "bcrypt hashing failed", e)
        })
    }

    pub fn verify_password_bcrypt(&self, password: &str, hash: &str) -> Result<bool> {
        const OP: &str = "verify_password_bcrypt";
        if detect_scheme(hash) != Some(HashScheme::Bcrypt) {
            return Err(CryptoError::new(
                ErrorCode::UnsupportedHashFormat,
                OP,
                "expected a $2a$/$2b$/$2x$/$2y$ bcrypt hash",
            ));
        }
        check_bcrypt_length(password, OP)?;

        bcrypt::verify(password, hash).map_err(|e| {
            CryptoError::with_source(
                ErrorCode::UnsupportedHashFormat,
                OP,
                "malformed bcrypt hash",
                e,
            )
        })
    }

    /// `pbkdf2:<iterations>:<salt>:<hash>` using the configured iterations.
    pub fn hash_password_pbkdf2(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(CryptoError::invalid_input(
                "hash_password_pbkdf2",
                "password cannot be empty",
            ));
        }
        legacy::hash_pbkdf2(password, self.legacy.iterations)
    }

    /// `scrypt:<N>:<salt>:<hash>` using the configured N.
    pub fn hash_password_scrypt(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(CryptoError::invalid_input(
                "hash_password_scrypt",
                "password cannot be empty",
            ));
        }
        legacy::hash_scrypt(password, self.legacy.scrypt_log_n)
    }

    /// Verify a colon-delimited PBKDF2/scrypt hash in constant time.
    pub fn verify_password_legacy(&self, password: &str, hash: &str) -> Result<bool> {
        legacy::verify_legacy(password, hash)
    }

    /// Verify against any supported format, chosen by prefix.
    ///
    /// # Errors
    ///
    /// `UNSUPPORTED_HASH_FORMAT` when the prefix is not recognised; this
    /// never degrades to `Ok(false)`.
    pub fn verify_password_universal(&self, password: &str, hash: &str) -> Result<bool> {
        let scheme = detect_scheme(hash).ok_or_else(|| {
            CryptoError::new(
                ErrorCode::UnsupportedHashFormat,
                "verify_password_universal",
                "unsupported hash format",
            )
        })?;
        tracing::debug!(?scheme, "verifying password");

        match scheme {
            HashScheme::Argon2 => self.verify_password(password, hash),
            HashScheme::Bcrypt => self.verify_password_bcrypt(password, hash),
            HashScheme::Pbkdf2 | HashScheme::Scrypt => self.verify_password_legacy(password, hash),
        }
    }

    /// Whether a stored hash should be replaced with a fresh Argon2id hash
    /// at the configured parameters.
    pub fn needs_rehash(&self, hash: &str) -> Result<bool> {
        const OP: &str = "needs_rehash";
        match detect_scheme(hash) {
            None => Err(CryptoError::new(
                ErrorCode::UnsupportedHashFormat,
                OP,
                "unsupported hash format",
            )),
            Some(HashScheme::Argon2) => {
                let parsed = PasswordHash::new(hash).map_err(|e| {
                    CryptoError::with_source(
                        ErrorCode::UnsupportedHashFormat,
                        OP,
                        "not a PHC password hash",
                        LibraryError::from_display(e),
                    )
                })?;
                if parsed.algorithm.as_str() != "argon2id" {
                    return Ok(true);
                }
                let params = Params::try_from(&parsed).map_err(|e| {
                    CryptoError::with_source(
                        ErrorCode::UnsupportedHashFormat,
                        OP,
                        "invalid argon2 parameters",
                        LibraryError::from_display(e),
                    )
                })?;
                let output_len = parsed
                    .hash
                    .map(|output| output.len())
                    .unwrap_or(self.config.argon2_output_len);
                Ok(params.m_cost() < self.config.argon2_memory_kib
                    || params.t_cost() < self.config.argon2_time_cost
                    || params.p_cost() != self.config.argon2_parallelism
                    || output_len != self.config.argon2_output_len)
            }
            Some(_) => Ok(true),
        }
    }

    fn argon2(&self, operation: &'static str) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.config.argon2_memory_kib,
            self.config.argon2_time_cost,
            self.config.argon2_parallelism,
            Some(self.config.argon2_output_len),
        )
        .map_err(|e| {
            CryptoError::with_source(
                ErrorCode::InvalidParameters,
                operation,
                "invalid argon2 parameters",
                LibraryError::from_display(e),
            )
        })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

fn check_bcrypt_length(password: &str, operation: &'static str) -> Result<()> {
    if password.len() > BCRYPT_MAX_PASSWORD_BYTES {
        return Err(CryptoError::new(
            ErrorCode::PasswordTooLong,
            operation,
            format!(
                "bcrypt accepts at most {} bytes (got {})",
                BCRYPT_MAX_PASSWORD_BYTES,
                password.len()
            ),
        ));
    }
    Ok(())
}
