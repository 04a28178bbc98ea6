//! CLI error type carrying an exit code and an optional hint.

use std::fmt;

use cipherkit_core::{CryptoError, ErrorCode};

use crate::constants::exit_codes;
use crate::ui::{render, UiContext};

/// An error that maps to a specific process exit code.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub hint: Option<String>,
    pub exit_code: i32,
}

impl CliError {
    pub fn new(exit_code: i32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
            exit_code,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::new(exit_codes::NOT_FOUND, message).with_hint(hint)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INVALID_INPUT, message)
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(exit_codes::AUTH_FAILED, message)
    }

    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::auth_failed(message).with_hint(hint)
    }

    pub fn integrity_failed(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INTEGRITY_FAILED, message)
    }

    /// Print to stderr and exit immediately.
    pub fn exit(self, ctx: &UiContext) -> ! {
        render::print_error(ctx, &self.message, self.hint.as_deref());
        std::process::exit(self.exit_code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<CryptoError> for CliError {
    fn from(err: CryptoError) -> Self {
        let message = err.to_string();
        match err.code() {
            ErrorCode::DecryptionFailed => Self::auth_failed_with_hint(
                message,
                "Check the password, algorithm and --aad; the payload may also be corrupted.",
            ),
            ErrorCode::TokenExpired => Self::auth_failed(message),
            ErrorCode::InvalidInput
            | ErrorCode::InvalidKey
            | ErrorCode::InvalidParameters
            | ErrorCode::InvalidConfig
            | ErrorCode::InvalidToken
            | ErrorCode::WeakPassword
            | ErrorCode::InsufficientSaltLength
            | ErrorCode::InsufficientIterations
            | ErrorCode::PasswordTooLong
            | ErrorCode::UnsupportedHashFormat => Self::invalid_input(message),
            _ => Self::new(exit_codes::GENERAL, message),
        }
    }
}

/// Resolve any command failure into a [`CliError`].
pub fn classify(err: anyhow::Error) -> CliError {
    match err.downcast::<CliError>() {
        Ok(cli) => cli,
        Err(err) => match err.downcast::<CryptoError>() {
            Ok(crypto) => crypto.into(),
            Err(other) => CliError::new(exit_codes::GENERAL, format!("{:#}", other)),
        },
    }
}
