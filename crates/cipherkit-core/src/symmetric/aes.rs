//! AES-CBC and AES-GCM encryption behind a password-based API.
//!
//! Password-based calls produce `encrypted = "<salt-hex>:<ciphertext-hex>"`
//! and a hex IV. GCM additionally produces a 16-byte tag and fails closed on
//! any tampering.

use aes::{Aes128, Aes256};
use aes_gcm::aead::{Aead, KeyInit, Nonce, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::kdf::{derive_key, KdfParams};
use crate::config::{CipherAlgorithm, SymmetricConfig};
use crate::error::{CryptoError, ErrorCode, LibraryError, Result};
use crate::utils::{decode_hex, random_bytes};

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Ciphertext plus the IV (and GCM tag) needed to reverse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub encrypted: String,
    pub iv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl EncryptedData {
    /// Split a password-based payload into `(salt_hex, ciphertext_hex)`.
    pub fn salt_and_ciphertext(&self) -> Option<(&str, &str)> {
        self.encrypted.split_once(':')
    }
}

/// Symmetric encryption façade.
#[derive(Debug, Clone, Default)]
pub struct AesCrypto {
    config: SymmetricConfig,
}

impl AesCrypto {
    /// Build a façade after checking the config against the security floors.
    pub fn new(config: SymmetricConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Default parameters with the given cipher.
    pub fn with_algorithm(algorithm: CipherAlgorithm) -> Self {
        Self {
            config: SymmetricConfig::default().with_algorithm(algorithm),
        }
    }

    pub fn config(&self) -> &SymmetricConfig {
        &self.config
    }

    pub fn algorithm(&self) -> CipherAlgorithm {
        self.config.algorithm
    }

    /// Encrypt `plaintext` under a key derived from `password`.
    ///
    /// A fresh salt and IV are drawn on every call, so encrypting the same
    /// input twice never yields the same output.
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<EncryptedData> {
        self.encrypt_inner(plaintext, password, None)
    }

    /// Encrypt with associated data. Requires a GCM cipher.
    pub fn encrypt_with_aad(
        &self,
        plaintext: &[u8],
        password: &str,
        aad: &[u8],
    ) -> Result<EncryptedData> {
        self.require_authenticated("encrypt_with_aad")?;
        self.encrypt_inner(plaintext, password, Some(aad))
    }

    /// Reverse [`AesCrypto::encrypt`].
    pub fn decrypt(&self, data: &EncryptedData, password: &str) -> Result<Vec<u8>> {
        self.decrypt_inner(data, password, None)
    }

    /// Reverse [`AesCrypto::encrypt_with_aad`]; the same `aad` must be given.
    pub fn decrypt_with_aad(
        &self,
        data: &EncryptedData,
        password: &str,
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        self.require_authenticated("decrypt_with_aad")?;
        self.decrypt_inner(data, password, Some(aad))
    }

    /// Decrypt and interpret the plaintext as UTF-8.
    pub fn decrypt_to_string(&self, data: &EncryptedData, password: &str) -> Result<String> {
        let bytes = self.decrypt(data, password)?;
        String::from_utf8(bytes).map_err(|e| {
            CryptoError::with_source(
                ErrorCode::DecryptionFailed,
                "decrypt",
                "plaintext is not valid UTF-8",
                e,
            )
        })
    }

    /// Random key sized for the configured cipher.
    pub fn generate_key(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(random_bytes(self.config.algorithm.key_len()))
    }

    /// Encrypt with a raw key; `encrypted` holds bare ciphertext hex.
    pub fn encrypt_with_key(&self, plaintext: &[u8], key: &[u8]) -> Result<EncryptedData> {
        const OP: &str = "encrypt_with_key";
        self.check_key_len(key, OP)?;
        let sealed = seal(self.config.algorithm, key, plaintext, None)
            .map_err(|e| e.rewrap(ErrorCode::EncryptionFailed, OP))?;
        Ok(EncryptedData {
            encrypted: hex::encode(sealed.ciphertext),
            iv: hex::encode(sealed.iv),
            tag: sealed.tag.map(hex::encode),
        })
    }

    /// Reverse [`AesCrypto::encrypt_with_key`].
    pub fn decrypt_with_key(&self, data: &EncryptedData, key: &[u8]) -> Result<Vec<u8>> {
        const OP: &str = "decrypt_with_key";
        self.check_key_len(key, OP)?;
        let parts = parse_parts(self.config.algorithm, &data.encrypted, data, OP)?;
        open(self.config.algorithm, key, &parts, None)
            .map_err(|e| e.rewrap(ErrorCode::DecryptionFailed, OP))
    }

    fn encrypt_inner(
        &self,
        plaintext: &[u8],
        password: &str,
        aad: Option<&[u8]>,
    ) -> Result<EncryptedData> {
        const OP: &str = "encrypt";
        if password.is_empty() {
            return Err(CryptoError::invalid_input(OP, "password cannot be empty"));
        }

        let algorithm = self.config.algorithm;
        tracing::debug!(
            algorithm = algorithm.as_str(),
            bytes = plaintext.len(),
            "encrypting payload"
        );

        let salt = random_bytes(self.config.salt_length);
        let key = derive_key(
            password.as_bytes(),
            &salt,
            &KdfParams::from(&self.config),
            algorithm.key_len(),
        )
        .map_err(|e| e.rewrap(ErrorCode::EncryptionFailed, OP))?;

        let sealed = seal(algorithm, key.as_bytes(), plaintext, aad)
            .map_err(|e| e.rewrap(ErrorCode::EncryptionFailed, OP))?;

        Ok(EncryptedData {
            encrypted: format!("{}:{}", hex::encode(&salt), hex::encode(sealed.ciphertext)),
            iv: hex::encode(sealed.iv),
            tag: sealed.tag.map(hex::encode),
        })
    }

    fn decrypt_inner(
        &self,
        data: &EncryptedData,
        password: &str,
        aad: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        const OP: &str = "decrypt";
        if password.is_empty() {
            return Err(CryptoError::invalid_input(OP, "password cannot be empty"));
        }

        let algorithm = self.config.algorithm;
        let (salt_hex, ciphertext_hex) = data.salt_and_ciphertext().ok_or_else(|| {
            CryptoError::new(
                ErrorCode::DecryptionFailed,
                OP,
                "encrypted value must be <salt>:<ciphertext>",
            )
        })?;
        let salt = decode_hex(salt_hex, OP, "salt")
            .map_err(|e| e.rewrap(ErrorCode::DecryptionFailed, OP))?;
        let parts = parse_parts(algorithm, ciphertext_hex, data, OP)?;

        tracing::debug!(
            algorithm = algorithm.as_str(),
            bytes = parts.ciphertext.len(),
            "decrypting payload"
        );

        let key = derive_key(
            password.as_bytes(),
            &salt,
            &KdfParams::from(&self.config),
            algorithm.key_len(),
        )
        .map_err(|e| e.rewrap(ErrorCode::DecryptionFailed, OP))?;

        open(algorithm, key.as_bytes(), &parts, aad)
            .map_err(|e| e.rewrap(ErrorCode::DecryptionFailed, OP))
    }

    fn require_authenticated(&self, operation: &'static str) -> Result<()> {
        if !self.config.algorithm.is_authenticated() {
            return Err(CryptoError::new(
                ErrorCode::InvalidParameters,
                operation,
                format!(
                    "associated data requires a GCM cipher (configured: {})",
                    self.config.algorithm.as_str()
                ),
            ));
        }
        Ok(())
    }

    fn check_key_len(&self, key: &[u8], operation: &'static str) -> Result<()> {
        let expected = self.config.algorithm.key_len();
        if key.len() != expected {
            return Err(CryptoError::new(
                ErrorCode::InvalidKey,
                operation,
                format!("key must be {} bytes (got {})", expected, key.len()),
            ));
        }
        Ok(())
    }
}

struct Sealed {
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Option<Vec<u8>>,
}

struct Parts {
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Option<Vec<u8>>,
}

fn parse_parts(
    algorithm: CipherAlgorithm,
    ciphertext_hex: &str,
    data: &EncryptedData,
    operation: &'static str,
) -> Result<Parts> {
    let malformed = |e: CryptoError| e.rewrap(ErrorCode::DecryptionFailed, operation);

    let ciphertext = decode_hex(ciphertext_hex, operation, "ciphertext").map_err(malformed)?;
    let iv = decode_hex(&data.iv, operation, "iv").map_err(malformed)?;
    if iv.len() != algorithm.iv_len() {
        return Err(CryptoError::new(
            ErrorCode::DecryptionFailed,
            operation,
            format!(
                "iv must be {} bytes for {} (got {})",
                algorithm.iv_len(),
                algorithm.as_str(),
                iv.len()
            ),
        ));
    }

    let tag = if algorithm.is_authenticated() {
        let tag_hex = data.tag.as_deref().ok_or_else(|| {
            CryptoError::new(
                ErrorCode::DecryptionFailed,
                operation,
                "authentication tag is required",
            )
        })?;
        let tag = decode_hex(tag_hex, operation, "tag").map_err(malformed)?;
        if tag.len() != TAG_LEN {
            return Err(CryptoError::new(
                ErrorCode::DecryptionFailed,
                operation,
                format!("tag must be {} bytes (got {})", TAG_LEN, tag.len()),
            ));
        }
        Some(tag)
    } else {
        None
    };

    Ok(Parts {
        iv,
        ciphertext,
        tag,
    })
}

fn seal(
    algorithm: CipherAlgorithm,
    key: &[u8],
    plaintext: &[u8],
    aad: Option<&[u8]>,
) -> Result<Sealed> {
    let iv = random_bytes(algorithm.iv_len());
    match algorithm {
        CipherAlgorithm::Aes128Cbc => {
            let ciphertext = cbc::Encryptor::<Aes128>::new_from_slices(key, &iv)
                .map_err(invalid_length)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
            Ok(Sealed {
                iv,
                ciphertext,
                tag: None,
            })
        }
        CipherAlgorithm::Aes256Cbc => {
            let ciphertext = cbc::Encryptor::<Aes256>::new_from_slices(key, &iv)
                .map_err(invalid_length)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
            Ok(Sealed {
                iv,
                ciphertext,
                tag: None,
            })
        }
        CipherAlgorithm::Aes128Gcm => gcm_seal::<Aes128Gcm>(key, iv, plaintext, aad),
        CipherAlgorithm::Aes256Gcm => gcm_seal::<Aes256Gcm>(key, iv, plaintext, aad),
    }
}

fn open(
    algorithm: CipherAlgorithm,
    key: &[u8],
    parts: &Parts,
    aad: Option<&[u8]>,
) -> Result<Vec<u8>> {
    match algorithm {
        CipherAlgorithm::Aes128Cbc => cbc::Decryptor::<Aes128>::new_from_slices(key, &parts.iv)
            .map_err(invalid_length)?
            .decrypt_padded_vec_mut::<Pkcs7>(&parts.ciphertext)
            .map_err(bad_padding),
        CipherAlgorithm::Aes256Cbc => cbc::Decryptor::<Aes256>::new_from_slices(key, &parts.iv)
            .map_err(invalid_length)?
            .decrypt_padded_vec_mut::<Pkcs7>(&parts.ciphertext)
            .map_err(bad_padding),
        CipherAlgorithm::Aes128Gcm => gcm_open::<Aes128Gcm>(key, parts, aad),
        CipherAlgorithm::Aes256Gcm => gcm_open::<Aes256Gcm>(key, parts, aad),
    }
}

fn gcm_seal<C>(key: &[u8], iv: Vec<u8>, plaintext: &[u8], aad: Option<&[u8]>) -> Result<Sealed>
where
    C: Aead + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(invalid_length)?;
    let payload = Payload {
        msg: plaintext,
        aad: aad.unwrap_or_default(),
    };
    let mut sealed = cipher
        .encrypt(Nonce::<C>::from_slice(&iv), payload)
        .map_err(|e| {
            CryptoError::with_source(
                ErrorCode::EncryptionFailed,
                "seal",
                "AES-GCM encryption failed",
                LibraryError::from_display(e),
            )
        })?;
    let tag = sealed.split_off(sealed.len() - TAG_LEN);
    Ok(Sealed {
        iv,
        ciphertext: sealed,
        tag: Some(tag),
    })
}

fn gcm_open<C>(key: &[u8], parts: &Parts, aad: Option<&[u8]>) -> Result<Vec<u8>>
where
    C: Aead + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(invalid_length)?;
    let tag = parts.tag.as_deref().unwrap_or_default();
    let mut combined = Vec::with_capacity(parts.ciphertext.len() + tag.len());
    combined.extend_from_slice(&parts.ciphertext);
    combined.extend_from_slice(tag);

    let payload = Payload {
        msg: &combined,
        aad: aad.unwrap_or_default(),
    };
    cipher
        .decrypt(Nonce::<C>::from_slice(&parts.iv), payload)
        .map_err(|e| {
            CryptoError::with_source(
                ErrorCode::DecryptionFailed,
                "open",
                "authentication failed (wrong password, data or associated data)",
                LibraryError::from_display(e),
            )
        })
}

fn invalid_length(err: impl std::fmt::Display) -> CryptoError {
    CryptoError::with_source(
        ErrorCode::InvalidKey,
        "cipher_init",
        "invalid key or iv length",
        LibraryError::from_display(err),
    )
}

fn bad_padding(err: impl std::fmt::Display) -> CryptoError {
    CryptoError::with_source(
        ErrorCode::DecryptionFailed,
        "open",
        "bad padding (wrong password or corrupted data)",
        LibraryError::from_display(err),
    )
}
