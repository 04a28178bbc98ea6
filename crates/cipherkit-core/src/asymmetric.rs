//! RSA key pairs, OAEP encryption and PKCS#1 v1.5 signatures.
//!
//! Keys travel as PEM: SPKI for public keys, PKCS#8 for private keys.
//! Ciphertexts and signatures are standard base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{validate_rsa_bits, RsaConfig};
use crate::error::{CryptoError, ErrorCode, LibraryError, Result};

/// PEM-encoded RSA key pair. The private key is wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub public_key: String,
    pub private_key: String,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// RSA façade.
#[derive(Debug, Clone, Default)]
pub struct RsaCrypto {
    config: RsaConfig,
}

impl RsaCrypto {
    pub fn new(config: RsaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Generate a key pair with the configured modulus size.
    pub fn generate_key_pair(&self) -> Result<KeyPair> {
        self.generate_key_pair_with_bits(self.config.key_bits)
    }

    /// Generate a key pair of `bits` (at least 2048, multiple of 8).
    pub fn generate_key_pair_with_bits(&self, bits: usize) -> Result<KeyPair> {
        const OP: &str = "generate_key_pair";
        validate_rsa_bits(bits, OP)?;

        tracing::debug!(bits, "generating RSA key pair");
        let private = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| library(ErrorCode::KeyGenerationFailed, OP, "key generation failed", e))?;
        let public = RsaPublicKey::from(&private);

        let private_key = private
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| library(ErrorCode::KeyGenerationFailed, OP, "private key encoding failed", e))?
            .to_string();
        let public_key = public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| library(ErrorCode::KeyGenerationFailed, OP, "public key encoding failed", e))?;

        Ok(KeyPair {
            public_key,
            private_key,
        })
    }

    /// RSA-OAEP (SHA-256) encrypt; returns base64 ciphertext.
    pub fn encrypt(&self, plaintext: &[u8], public_key_pem: &str) -> Result<String> {
        const OP: &str = "rsa_encrypt";
        let public = parse_public(public_key_pem, OP)?;
        let ciphertext = public
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| library(ErrorCode::EncryptionFailed, OP, "OAEP encryption failed", e))?;
        Ok(STANDARD.encode(ciphertext))
    }

    /// Reverse [`RsaCrypto::encrypt`].
    pub fn decrypt(&self, ciphertext_b64: &str, private_key_pem: &str) -> Result<Vec<u8>> {
        const OP: &str = "rsa_decrypt";
        let private = parse_private(private_key_pem, OP)?;
        let ciphertext = STANDARD.decode(ciphertext_b64.trim()).map_err(|e| {
            CryptoError::with_source(
                ErrorCode::DecryptionFailed,
                OP,
                "ciphertext is not valid base64",
                e,
            )
        })?;
        private
            .decrypt(Oaep::new::<Sha256>(), &ciphertext)
            .map_err(|e| library(ErrorCode::DecryptionFailed, OP, "OAEP decryption failed", e))
    }

    /// RSASSA-PKCS1-v1_5 with SHA-256; returns base64 signature.
    pub fn sign(&self, data: &[u8], private_key_pem: &str) -> Result<String> {
        const OP: &str = "sign";
        let private = parse_private(private_key_pem, OP)?;
        let signing_key = SigningKey::<Sha256>::new(private);
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| library(ErrorCode::SigningFailed, OP, "signing failed", e))?;
        Ok(STANDARD.encode(signature.to_vec()))
    }

    /// Check a signature from [`RsaCrypto::sign`]. A mismatch or an
    /// undecodable signature is `false`; a bad key is an error.
    pub fn verify(&self, data: &[u8], signature_b64: &str, public_key_pem: &str) -> Result<bool> {
        const OP: &str = "verify";
        let public = parse_public(public_key_pem, OP)?;
        let verifying_key = VerifyingKey::<Sha256>::new(public);

        let Ok(bytes) = STANDARD.decode(signature_b64.trim()) else {
            return Ok(false);
        };
        let Ok(signature) = Signature::try_from(bytes.as_slice()) else {
            return Ok(false);
        };
        Ok(verifying_key.verify(data, &signature).is_ok())
    }
}

fn parse_public(pem: &str, operation: &'static str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem.trim())
        .map_err(|e| library(ErrorCode::InvalidKey, operation, "invalid public key PEM", e))
}

fn parse_private(pem: &str, operation: &'static str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem.trim())
        .map_err(|e| library(ErrorCode::InvalidKey, operation, "invalid private key PEM", e))
}

fn library(
    code: ErrorCode,
    operation: &'static str,
    message: &str,
    err: impl std::fmt::Display,
) -> CryptoError {
    CryptoError::with_source(code, operation, message, LibraryError::from_display(err))
}
