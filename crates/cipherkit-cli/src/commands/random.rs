use cipherkit_core::utils::{generate_salt, generate_token, generate_uuid, hash};
use cipherkit_core::HashAlgorithm;

use crate::app::AppContext;
use crate::errors::CliError;
use crate::helpers::read_input;
use crate::output::{print_json, print_value};

pub fn handle_salt(ctx: &AppContext, length: usize) -> anyhow::Result<()> {
    let salt = generate_salt(length)?;
    print_value(ctx.ui(), "salt", &hex::encode(salt))
}

pub fn handle_token(ctx: &AppContext, bytes: usize) -> anyhow::Result<()> {
    let token = generate_token(bytes)?;
    print_value(ctx.ui(), "token", &token)
}

pub fn handle_uuid(ctx: &AppContext) -> anyhow::Result<()> {
    print_value(ctx.ui(), "uuid", &generate_uuid())
}

pub fn handle_digest(
    ctx: &AppContext,
    algorithm: &str,
    input: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let algorithm: HashAlgorithm = algorithm.parse().map_err(|_| {
        CliError::invalid_input(format!(
            "Unsupported digest algorithm: {} (use sha256 or sha512)",
            algorithm
        ))
    })?;
    let data = read_input(input)?;
    let digest = hash(&data, algorithm);

    if ctx.ui().mode.is_json() {
        return print_json(&serde_json::json!({
            "algorithm": algorithm,
            "digest": digest,
        }));
    }
    println!("{}", digest);
    Ok(())
}
