//! Tunable parameters for every cipherkit operation.
//!
//! Defaults meet the minimum security floors; [`CryptoConfig::validate`]
//! rejects anything weaker, so a config read from disk can only make the
//! parameters stronger.

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, ErrorCode, Result};

/// Minimum PBKDF2 iteration count.
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Upper PBKDF2 iteration count accepted from config or a stored hash.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Accepted range for scrypt log2(N).
pub const MIN_SCRYPT_LOG_N: u8 = 10;
pub const MAX_SCRYPT_LOG_N: u8 = 20;

/// Minimum salt length in bytes.
pub const MIN_SALT_LENGTH: usize = 16;

/// Argon2id floors (memory in KiB).
pub const MIN_ARGON2_MEMORY_KIB: u32 = 19_456;
pub const MIN_ARGON2_TIME_COST: u32 = 2;
pub const ARGON2_OUTPUT_LEN: usize = 32;

/// bcrypt cost range accepted by the hasher.
pub const MIN_BCRYPT_COST: u32 = 10;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Minimum RSA modulus size in bits.
pub const MIN_RSA_KEY_BITS: usize = 2048;

/// Top-level configuration, one section per façade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CryptoConfig {
    #[serde(default)]
    pub symmetric: SymmetricConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub rsa: RsaConfig,
}

/// Block cipher and mode used by [`crate::symmetric::AesCrypto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CipherAlgorithm {
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    #[default]
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
    #[serde(rename = "aes-128-gcm")]
    Aes128Gcm,
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

impl CipherAlgorithm {
    pub fn key_len(&self) -> usize {
        match self {
            Self::Aes128Cbc | Self::Aes128Gcm => 16,
            Self::Aes256Cbc | Self::Aes256Gcm => 32,
        }
    }

    pub fn iv_len(&self) -> usize {
        match self {
            Self::Aes128Cbc | Self::Aes256Cbc => 16,
            Self::Aes128Gcm | Self::Aes256Gcm => 12,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Aes128Gcm | Self::Aes256Gcm)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes128Cbc => "aes-128-cbc",
            Self::Aes256Cbc => "aes-256-cbc",
            Self::Aes128Gcm => "aes-128-gcm",
            Self::Aes256Gcm => "aes-256-gcm",
        }
    }
}

impl std::str::FromStr for CipherAlgorithm {
    type Err = CryptoError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "aes-128-cbc" => Ok(Self::Aes128Cbc),
            "aes-256-cbc" => Ok(Self::Aes256Cbc),
            "aes-128-gcm" => Ok(Self::Aes128Gcm),
            "aes-256-gcm" => Ok(Self::Aes256Gcm),
            other => Err(CryptoError::new(
                ErrorCode::InvalidParameters,
                "parse_algorithm",
                format!("unknown cipher algorithm: {}", other),
            )),
        }
    }
}

/// Password-to-key derivation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum KeyDerivation {
    #[default]
    Pbkdf2Sha256,
    Pbkdf2Sha512,
    Scrypt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetricConfig {
    pub algorithm: CipherAlgorithm,
    pub kdf: KeyDerivation,
    /// PBKDF2 iteration count.
    pub iterations: u32,
    /// Salt length in bytes for password-based encryption.
    pub salt_length: usize,
    /// log2(N) for scrypt; r = 8 and p = 1 are fixed.
    pub scrypt_log_n: u8,
}

impl Default for SymmetricConfig {
    fn default() -> Self {
        Self {
            algorithm: CipherAlgorithm::default(),
            kdf: KeyDerivation::default(),
            iterations: MIN_PBKDF2_ITERATIONS,
            salt_length: MIN_SALT_LENGTH,
            scrypt_log_n: 14,
        }
    }
}

impl SymmetricConfig {
    /// Same parameters with a different cipher.
    pub fn with_algorithm(mut self, algorithm: CipherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations > MAX_PBKDF2_ITERATIONS {
            return Err(CryptoError::new(
                ErrorCode::InvalidParameters,
                "validate_config",
                format!(
                    "iterations must be at most {} (got {})",
                    MAX_PBKDF2_ITERATIONS, self.iterations
                ),
            ));
        }
        if self.iterations < MIN_PBKDF2_ITERATIONS {
            return Err(CryptoError::new(
                ErrorCode::InsufficientIterations,
                "validate_config",
                format!(
                    "iterations must be at least {} (got {})",
                    MIN_PBKDF2_ITERATIONS, self.iterations
                ),
            ));
        }
        if self.salt_length < MIN_SALT_LENGTH {
            return Err(CryptoError::new(
                ErrorCode::InsufficientSaltLength,
                "validate_config",
                format!(
                    "salt length must be at least {} bytes (got {})",
                    MIN_SALT_LENGTH, self.salt_length
                ),
            ));
        }
        if !(MIN_SCRYPT_LOG_N..=MAX_SCRYPT_LOG_N).contains(&self.scrypt_log_n) {
            return Err(CryptoError::new(
                ErrorCode::InvalidParameters,
                "validate_config",
                format!(
                    "scrypt log_n must be in {}..={} (got {})",
                    MIN_SCRYPT_LOG_N, MAX_SCRYPT_LOG_N, self.scrypt_log_n
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub argon2_memory_kib: u32,
    pub argon2_time_cost: u32,
    pub argon2_parallelism: u32,
    pub argon2_output_len: usize,
    pub bcrypt_cost: u32,
    /// Reject weak passwords before hashing.
    pub enforce_strength: bool,
    pub min_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            argon2_memory_kib: MIN_ARGON2_MEMORY_KIB,
            argon2_time_cost: MIN_ARGON2_TIME_COST,
            argon2_parallelism: 1,
            argon2_output_len: ARGON2_OUTPUT_LEN,
            bcrypt_cost: MIN_BCRYPT_COST,
            enforce_strength: true,
            min_length: 8,
        }
    }
}

impl PasswordConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| {
            Err(CryptoError::new(
                ErrorCode::InvalidParameters,
                "validate_config",
                message,
            ))
        };
        if self.argon2_memory_kib < MIN_ARGON2_MEMORY_KIB {
            return invalid(format!(
                "argon2 memory must be at least {} KiB (got {})",
                MIN_ARGON2_MEMORY_KIB, self.argon2_memory_kib
            ));
        }
        if self.argon2_time_cost < MIN_ARGON2_TIME_COST {
            return invalid(format!(
                "argon2 time cost must be at least {} (got {})",
                MIN_ARGON2_TIME_COST, self.argon2_time_cost
            ));
        }
        if self.argon2_parallelism == 0 {
            return invalid("argon2 parallelism must be at least 1".to_string());
        }
        if self.argon2_output_len != ARGON2_OUTPUT_LEN {
            return invalid(format!(
                "argon2 output length must be {} bytes (got {})",
                ARGON2_OUTPUT_LEN, self.argon2_output_len
            ));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return invalid(format!(
                "bcrypt cost must be in {}..={} (got {})",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.bcrypt_cost
            ));
        }
        if self.min_length < 8 {
            return invalid(format!(
                "minimum password length must be at least 8 (got {})",
                self.min_length
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsaConfig {
    pub key_bits: usize,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            key_bits: MIN_RSA_KEY_BITS,
        }
    }
}

impl RsaConfig {
    pub fn validate(&self) -> Result<()> {
        validate_rsa_bits(self.key_bits, "validate_config")
    }
}

pub(crate) fn validate_rsa_bits(bits: usize, operation: &'static str) -> Result<()> {
    if bits < MIN_RSA_KEY_BITS || bits % 8 != 0 {
        return Err(CryptoError::new(
            ErrorCode::InvalidParameters,
            operation,
            format!(
                "RSA key size must be a multiple of 8 and at least {} bits (got {})",
                MIN_RSA_KEY_BITS, bits
            ),
        ));
    }
    Ok(())
}

impl CryptoConfig {
    /// Check every section against the security floors.
    pub fn validate(&self) -> Result<()> {
        self.symmetric.validate()?;
        self.password.validate()?;
        self.rsa.validate()?;
        Ok(())
    }
}
