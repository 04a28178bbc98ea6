//! Symmetric encryption.
//!
//! - **aes**: AES-CBC / AES-GCM with password-derived or raw keys
//! - **kdf**: PBKDF2 and scrypt key derivation

pub mod aes;
pub mod kdf;

pub use aes::{AesCrypto, EncryptedData, TAG_LEN};
pub use kdf::{derive_key, DerivedKey, KdfParams};
