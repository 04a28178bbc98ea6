//! # Cipherkit Core
//!
//! Encryption, password hashing and token helpers behind one error type.
//!
//! Every fallible operation returns [`CryptoError`], tagged with an
//! [`ErrorCode`] and the operation name. Secrets never appear in error
//! messages or log events.
//!
//! ## Architecture
//!
//! - **symmetric**: AES-CBC / AES-GCM with PBKDF2 or scrypt key derivation
//! - **asymmetric**: RSA-OAEP encryption and PKCS#1 v1.5 signatures
//! - **password**: Argon2id, bcrypt and legacy PBKDF2/scrypt password hashes
//! - **fields**: `encrypted:`-prefixed field values in JSON records
//! - **utils**: salts, tokens, digests, HMAC and constant-time comparison
//! - **auth**: PKCE, token claims, user profile and token cache
//! - **config**: tunable parameters and their security floors

pub mod asymmetric;
pub mod auth;
pub mod config;
pub mod error;
pub mod fields;
pub mod password;
pub mod symmetric;
pub mod utils;

pub use asymmetric::{KeyPair, RsaCrypto};
pub use config::{CipherAlgorithm, CryptoConfig, KeyDerivation};
pub use error::{CryptoError, ErrorCode, Result};
pub use fields::FieldEncryptor;
pub use password::{HashScheme, PasswordCrypto, PasswordStrength};
pub use symmetric::{AesCrypto, EncryptedData};
pub use utils::HashAlgorithm;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
