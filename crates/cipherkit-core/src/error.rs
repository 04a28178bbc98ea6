//! Error types for cipherkit operations.
//!
//! Every public operation fails with a [`CryptoError`] carrying a
//! machine-readable [`ErrorCode`] and the name of the operation that failed.
//! The underlying library error, when there is one, is kept as the error
//! source. Messages never contain plaintext, passwords or key material.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for cipherkit operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Machine-readable failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    EncryptionFailed,
    DecryptionFailed,
    WeakPassword,
    InsufficientSaltLength,
    InsufficientIterations,
    PasswordTooLong,
    UnsupportedHashFormat,
    InvalidInput,
    InvalidKey,
    InvalidParameters,
    KeyDerivationFailed,
    KeyGenerationFailed,
    HashingFailed,
    VerificationFailed,
    SigningFailed,
    InvalidToken,
    TokenExpired,
    InvalidConfig,
}

impl ErrorCode {
    /// The stable string form, e.g. `ENCRYPTION_FAILED`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EncryptionFailed => "ENCRYPTION_FAILED",
            Self::DecryptionFailed => "DECRYPTION_FAILED",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InsufficientSaltLength => "INSUFFICIENT_SALT_LENGTH",
            Self::InsufficientIterations => "INSUFFICIENT_ITERATIONS",
            Self::PasswordTooLong => "PASSWORD_TOO_LONG",
            Self::UnsupportedHashFormat => "UNSUPPORTED_HASH_FORMAT",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidKey => "INVALID_KEY",
            Self::InvalidParameters => "INVALID_PARAMETERS",
            Self::KeyDerivationFailed => "KEY_DERIVATION_FAILED",
            Self::KeyGenerationFailed => "KEY_GENERATION_FAILED",
            Self::HashingFailed => "HASHING_FAILED",
            Self::VerificationFailed => "VERIFICATION_FAILED",
            Self::SigningFailed => "SIGNING_FAILED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidConfig => "INVALID_CONFIG",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Tagged error returned by every cipherkit operation.
#[derive(Debug, Error)]
#[error("{operation} failed ({code}): {message}")]
pub struct CryptoError {
    code: ErrorCode,
    operation: &'static str,
    message: String,
    #[source]
    source: Option<BoxedSource>,
}

impl CryptoError {
    /// Create an error with no underlying cause.
    pub fn new(code: ErrorCode, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping an underlying library failure.
    pub fn with_source<E>(
        code: ErrorCode,
        operation: &'static str,
        message: impl Into<String>,
        source: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            code,
            operation,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for [`ErrorCode::InvalidInput`].
    pub fn invalid_input(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, operation, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Re-tag an error raised by a helper with the caller's code and
    /// operation, keeping the original as the source.
    pub(crate) fn rewrap(self, code: ErrorCode, operation: &'static str) -> Self {
        let message = self.message.clone();
        Self::with_source(code, operation, message, self)
    }
}

/// Wrapper for library errors that implement `Display` but not `Error`.
#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct LibraryError(pub(crate) String);

impl LibraryError {
    pub(crate) fn from_display(err: impl fmt::Display) -> Self {
        Self(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_code_display_is_screaming_snake() {
        assert_eq!(ErrorCode::EncryptionFailed.to_string(), "ENCRYPTION_FAILED");
        assert_eq!(
            ErrorCode::InsufficientSaltLength.to_string(),
            "INSUFFICIENT_SALT_LENGTH"
        );
    }

    #[test]
    fn test_code_serializes_like_display() {
        let json = serde_json::to_string(&ErrorCode::PasswordTooLong).unwrap();
        assert_eq!(json, "\"PASSWORD_TOO_LONG\"");
    }

    #[test]
    fn test_error_message_carries_code_and_operation() {
        let err = CryptoError::new(ErrorCode::WeakPassword, "hash_password", "too weak");
        let text = err.to_string();
        assert!(text.contains("hash_password"));
        assert!(text.contains("WEAK_PASSWORD"));
        assert_eq!(err.code(), ErrorCode::WeakPassword);
        assert_eq!(err.operation(), "hash_password");
    }

    #[test]
    fn test_source_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = CryptoError::with_source(ErrorCode::HashingFailed, "hash", "failed", io);
        assert_eq!(err.source().unwrap().to_string(), "boom");
    }

    #[test]
    fn test_rewrap_keeps_original() {
        let inner = CryptoError::invalid_input("derive_key", "empty password");
        let outer = inner.rewrap(ErrorCode::EncryptionFailed, "encrypt");
        assert_eq!(outer.code(), ErrorCode::EncryptionFailed);
        assert_eq!(outer.operation(), "encrypt");
        let source = outer.source().unwrap();
        assert!(source.to_string().contains("INVALID_INPUT"));
    }
}
