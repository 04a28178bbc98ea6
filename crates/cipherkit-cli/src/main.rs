//! Cipherkit CLI - encryption, password hashing and token utilities
//!
//! This is the command-line interface for Cipherkit. It exposes the core
//! library operations to scripts and humans.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod security;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::ui::UiContext;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ui = UiContext::from_env(cli.json, cli.no_color);
    if let Err(err) = run(&cli, ui.clone()) {
        let err = errors::classify(err);
        tracing::debug!(exit_code = err.exit_code, "command failed");
        err.exit(&ui)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, ui: UiContext) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        return commands::handle_completions(*shell);
    }

    let config = config::load(cli.config.as_deref())?;
    let ctx = AppContext::new(cli, ui, config);

    match &cli.command {
        Commands::Encrypt(args) => commands::handle_encrypt(&ctx, args),
        Commands::Decrypt(args) => commands::handle_decrypt(&ctx, args),
        Commands::HashPassword(args) => commands::handle_hash_password(&ctx, args),
        Commands::VerifyPassword(args) => commands::handle_verify_password(&ctx, args),
        Commands::CheckPassword => commands::handle_check_password(&ctx),
        Commands::Rsa(command) => commands::handle_rsa(&ctx, command),
        Commands::Fields(command) => commands::handle_fields(&ctx, command),
        Commands::Salt { length } => commands::handle_salt(&ctx, *length),
        Commands::Token { bytes } => commands::handle_token(&ctx, *bytes),
        Commands::Digest { algorithm, input } => {
            commands::handle_digest(&ctx, algorithm, input.as_deref())
        }
        Commands::Uuid => commands::handle_uuid(&ctx),
        Commands::Pkce { verifier } => commands::handle_pkce(&ctx, verifier.as_deref()),
        Commands::Claims(args) => commands::handle_claims(&ctx, args),
        Commands::Completions { .. } => Ok(()),
    }
}
