//! Field-level encryption for JSON records.
//!
//! Encrypted values are stored as strings of the form
//! `encrypted:<salt>:<ciphertext>:<iv>` (GCM appends `:<tag>`), so a record
//! can hold plain and encrypted fields side by side.

use serde_json::{Map, Value};

use crate::error::{CryptoError, ErrorCode, Result};
use crate::symmetric::{AesCrypto, EncryptedData};

/// Marker prefix on every encrypted field value.
pub const ENCRYPTED_PREFIX: &str = "encrypted:";

/// Serialize an encrypted payload into the field format.
pub fn format_field_value(data: &EncryptedData) -> String {
    match &data.tag {
        Some(tag) => format!("{}{}:{}:{}", ENCRYPTED_PREFIX, data.encrypted, data.iv, tag),
        None => format!("{}{}:{}", ENCRYPTED_PREFIX, data.encrypted, data.iv),
    }
}

/// Parse a field value produced by [`format_field_value`].
pub fn parse_field_value(value: &str) -> Result<EncryptedData> {
    const OP: &str = "parse_field_value";

    let body = value.strip_prefix(ENCRYPTED_PREFIX).ok_or_else(|| {
        CryptoError::invalid_input(OP, "value does not carry the encrypted: prefix")
    })?;
    let parts: Vec<&str> = body.split(':').collect();
    match parts.as_slice() {
        [salt, ciphertext, iv] => Ok(EncryptedData {
            encrypted: format!("{}:{}", salt, ciphertext),
            iv: iv.to_string(),
            tag: None,
        }),
        [salt, ciphertext, iv, tag] => Ok(EncryptedData {
            encrypted: format!("{}:{}", salt, ciphertext),
            iv: iv.to_string(),
            tag: Some(tag.to_string()),
        }),
        _ => Err(CryptoError::invalid_input(
            OP,
            format!(
                "expected 3 or 4 colon-separated parts after the prefix (got {})",
                parts.len()
            ),
        )),
    }
}

/// Whether a JSON value is an encrypted field value.
pub fn is_encrypted_value(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| s.starts_with(ENCRYPTED_PREFIX))
        .unwrap_or(false)
}

/// Encrypts and decrypts selected fields of a JSON object.
#[derive(Debug, Clone, Copy)]
pub struct FieldEncryptor<'a> {
    crypto: &'a AesCrypto,
}

impl<'a> FieldEncryptor<'a> {
    pub fn new(crypto: &'a AesCrypto) -> Self {
        Self { crypto }
    }

    /// Return a copy of `record` with the listed fields encrypted.
    ///
    /// Missing and null fields are skipped. Already-encrypted values are
    /// kept as is. Strings encrypt their text, other values their compact
    /// JSON form.
    pub fn encrypt_fields<S: AsRef<str>>(
        &self,
        record: &Map<String, Value>,
        fields: &[S],
        password: &str,
    ) -> Result<Map<String, Value>> {
        const OP: &str = "encrypt_fields";
        if password.is_empty() {
            return Err(CryptoError::invalid_input(OP, "password cannot be empty"));
        }

        let mut output = record.clone();
        let mut count = 0usize;
        for field in fields {
            let name = field.as_ref();
            let Some(value) = record.get(name) else {
                continue;
            };
            if value.is_null() || is_encrypted_value(value) {
                continue;
            }

            let plaintext = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            let encrypted = self
                .crypto
                .encrypt(plaintext.as_bytes(), password)
                .map_err(|e| {
                    CryptoError::with_source(
                        ErrorCode::EncryptionFailed,
                        OP,
                        format!("field '{}' could not be encrypted", name),
                        e,
                    )
                })?;
            output.insert(name.to_string(), Value::String(format_field_value(&encrypted)));
            count += 1;
        }

        tracing::debug!(fields = count, "encrypted record fields");
        Ok(output)
    }

    /// Return a copy of `record` with the listed encrypted fields decrypted
    /// back to string values. Fields without the prefix pass through.
    pub fn decrypt_fields<S: AsRef<str>>(
        &self,
        record: &Map<String, Value>,
        fields: &[S],
        password: &str,
    ) -> Result<Map<String, Value>> {
        const OP: &str = "decrypt_fields";
        if password.is_empty() {
            return Err(CryptoError::invalid_input(OP, "password cannot be empty"));
        }

        let mut output = record.clone();
        let mut count = 0usize;
        for field in fields {
            let name = field.as_ref();
            let Some(Value::String(stored)) = record.get(name) else {
                continue;
            };
            if !stored.starts_with(ENCRYPTED_PREFIX) {
                continue;
            }

            let plaintext = parse_field_value(stored)
                .and_then(|data| self.crypto.decrypt_to_string(&data, password))
                .map_err(|e| {
                    CryptoError::with_source(
                        ErrorCode::DecryptionFailed,
                        OP,
                        format!("field '{}' could not be decrypted", name),
                        e,
                    )
                })?;
            output.insert(name.to_string(), Value::String(plaintext));
            count += 1;
        }

        tracing::debug!(fields = count, "decrypted record fields");
        Ok(output)
    }
}
