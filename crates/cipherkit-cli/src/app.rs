//! Application context for the Cipherkit CLI.
//!
//! Bundles the parsed arguments, the resolved UI context and the loaded
//! configuration so handlers do not thread them separately.

use cipherkit_core::{AesCrypto, CipherAlgorithm, CryptoConfig, PasswordCrypto, RsaCrypto};

use crate::cli::Cli;
use crate::ui::UiContext;

pub struct AppContext<'a> {
    cli: &'a Cli,
    ui: UiContext,
    config: CryptoConfig,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli, ui: UiContext, config: CryptoConfig) -> Self {
        Self { cli, ui, config }
    }

    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config(&self) -> &CryptoConfig {
        &self.config
    }

    /// Symmetric façade, optionally overriding the configured cipher.
    pub fn aes(&self, algorithm: Option<CipherAlgorithm>) -> anyhow::Result<AesCrypto> {
        let mut symmetric = self.config().symmetric.clone();
        if let Some(algorithm) = algorithm {
            symmetric = symmetric.with_algorithm(algorithm);
        }
        Ok(AesCrypto::new(symmetric)?)
    }

    pub fn passwords(&self) -> anyhow::Result<PasswordCrypto> {
        let config = self.config();
        Ok(PasswordCrypto::new(
            config.password.clone(),
            config.symmetric.clone(),
        )?)
    }

    pub fn rsa(&self) -> anyhow::Result<RsaCrypto> {
        Ok(RsaCrypto::new(self.config().rsa.clone())?)
    }
}
