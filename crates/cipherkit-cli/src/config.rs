use std::path::{Path, PathBuf};

use cipherkit_core::CryptoConfig;

use crate::constants::APP_DIR;
use crate::errors::CliError;

/// Load the config from `explicit` (flag or `CIPHERKIT_CONFIG`) or the XDG
/// default. A missing default file means built-in defaults; a missing
/// explicit file is an error.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<CryptoConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_path()?, false),
    };

    if !path.exists() {
        if required {
            return Err(CliError::not_found(
                format!("Config file not found: {}", path.display()),
                "Pass an existing file with --config or unset CIPHERKIT_CONFIG.",
            )
            .into());
        }
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(CryptoConfig::default());
    }

    let config = read_config(&path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<CryptoConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    let config: CryptoConfig = toml::from_str(&contents).map_err(|e| {
        CliError::invalid_input(format!(
            "Failed to parse config {}: {}",
            path.display(),
            e
        ))
    })?;
    config.validate().map_err(|e| {
        CliError::invalid_input(format!("Invalid config {}: {}", path.display(), e))
    })?;
    Ok(config)
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".config").join(APP_DIR))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherkit_core::CipherAlgorithm;

    #[test]
    fn test_read_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[symmetric]\nalgorithm = \"aes-256-gcm\"\niterations = 200000\n",
        )
        .unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.symmetric.algorithm, CipherAlgorithm::Aes256Gcm);
        assert_eq!(config.symmetric.iterations, 200_000);
        assert_eq!(config.password, CryptoConfig::default().password);
    }

    #[test]
    fn test_weak_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[symmetric]\niterations = 1000\n").unwrap();

        let err = read_config(&path).unwrap_err();
        let cli = err.downcast::<CliError>().unwrap();
        assert_eq!(cli.exit_code, crate::constants::exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_missing_explicit_config_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        let cli = err.downcast::<CliError>().unwrap();
        assert_eq!(cli.exit_code, crate::constants::exit_codes::NOT_FOUND);
    }
}
