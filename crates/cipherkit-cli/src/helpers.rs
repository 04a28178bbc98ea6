//! Input helpers shared by the commands.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use cipherkit_core::CipherAlgorithm;

use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;

/// Password from `CIPHERKIT_PASSWORD`, else an interactive prompt.
pub fn read_password() -> anyhow::Result<SecretString> {
    if let Some(value) = password_from_env() {
        return Ok(value);
    }
    ensure_interactive()?;
    Password::new()
        .with_prompt("Password")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Like [`read_password`] but asks twice when prompting.
pub fn read_new_password() -> anyhow::Result<SecretString> {
    if let Some(value) = password_from_env() {
        return Ok(value);
    }
    ensure_interactive()?;
    Password::new()
        .with_prompt("Enter password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

fn password_from_env() -> Option<SecretString> {
    match std::env::var(PASSWORD_ENV) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn ensure_interactive() -> anyhow::Result<()> {
    if io::stdin().is_terminal() {
        return Ok(());
    }
    Err(CliError::invalid_input("No password available")
        .with_hint(format!(
            "Set {} when running non-interactively.",
            PASSWORD_ENV
        ))
        .into())
}

/// Read bytes from `path`, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<Zeroizing<Vec<u8>>> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::not_found(
                    format!("Input file not found: {}", path.display()),
                    "Check the --input path.",
                )
                .into());
            }
            let bytes = std::fs::read(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            Ok(Zeroizing::new(bytes))
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            Ok(Zeroizing::new(buffer))
        }
    }
}

/// Read UTF-8 text with trailing newlines removed.
pub fn read_input_string(path: Option<&Path>) -> anyhow::Result<String> {
    let bytes = read_input(path)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| CliError::invalid_input("Input is not valid UTF-8"))?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a key file, mapping a missing file to NOT_FOUND.
pub fn read_key_file(path: &Path) -> anyhow::Result<Zeroizing<String>> {
    if !path.exists() {
        return Err(CliError::not_found(
            format!("Key file not found: {}", path.display()),
            "Generate keys with `cipherkit rsa keygen --out-dir DIR`.",
        )
        .into());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read key {}: {}", path.display(), e))?;
    Ok(Zeroizing::new(contents))
}

pub fn parse_algorithm(value: Option<&str>) -> anyhow::Result<Option<CipherAlgorithm>> {
    value
        .map(|v| {
            v.parse::<CipherAlgorithm>().map_err(|_| {
                anyhow::Error::from(CliError::invalid_input(format!(
                    "Unsupported algorithm: {} (use aes-128-cbc, aes-256-cbc, aes-128-gcm or aes-256-gcm)",
                    v
                )))
            })
        })
        .transpose()
}
