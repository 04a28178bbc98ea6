//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const GENERAL: i32 = 1;

    /// Input file or key file not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, parameters or stored format.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password, expired token).
    pub const AUTH_FAILED: i32 = 5;

    /// Signature did not verify.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variable consulted before prompting for a password.
pub const PASSWORD_ENV: &str = "CIPHERKIT_PASSWORD";

/// Directory name under `$XDG_CONFIG_HOME`.
pub const APP_DIR: &str = "cipherkit";

pub const PRIVATE_KEY_FILE: &str = "private.pem";
pub const PUBLIC_KEY_FILE: &str = "public.pem";
