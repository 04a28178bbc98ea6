use secrecy::ExposeSecret;

use cipherkit_core::EncryptedData;

use crate::app::AppContext;
use crate::cli::{DecryptArgs, EncryptArgs};
use crate::errors::CliError;
use crate::helpers::{parse_algorithm, read_input, read_input_string, read_new_password, read_password};
use crate::output::{print_json, status};
use crate::security::write_plaintext_file;
use crate::ui::Badge;

pub fn handle_encrypt(ctx: &AppContext, args: &EncryptArgs) -> anyhow::Result<()> {
    let aes = ctx.aes(parse_algorithm(args.algorithm.as_deref())?)?;
    let plaintext = read_input(args.input.as_deref())?;
    let password = read_new_password()?;

    let encrypted = match &args.aad {
        Some(aad) => aes.encrypt_with_aad(&plaintext, password.expose_secret(), aad.as_bytes())?,
        None => aes.encrypt(&plaintext, password.expose_secret())?,
    };
    tracing::debug!(
        algorithm = aes.algorithm().as_str(),
        bytes = plaintext.len(),
        "encrypted input"
    );

    print_json(&encrypted)?;
    status(
        ctx.ui(),
        ctx.quiet(),
        Badge::Ok,
        &format!("Encrypted with {}", aes.algorithm().as_str()),
    );
    Ok(())
}

pub fn handle_decrypt(ctx: &AppContext, args: &DecryptArgs) -> anyhow::Result<()> {
    let aes = ctx.aes(parse_algorithm(args.algorithm.as_deref())?)?;
    let payload = read_input_string(args.input.as_deref())?;
    let data: EncryptedData = serde_json::from_str(&payload).map_err(|e| {
        CliError::invalid_input(format!("Input is not an encrypted payload: {}", e))
            .with_hint("Pass the JSON printed by `cipherkit encrypt`.")
    })?;
    let password = read_password()?;

    let plaintext = zeroize::Zeroizing::new(match &args.aad {
        Some(aad) => aes.decrypt_with_aad(&data, password.expose_secret(), aad.as_bytes())?,
        None => aes.decrypt(&data, password.expose_secret())?,
    });

    match &args.output {
        Some(path) => {
            write_plaintext_file(path, &plaintext)?;
            status(
                ctx.ui(),
                ctx.quiet(),
                Badge::Ok,
                &format!("Decrypted to {}", path.display()),
            );
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&plaintext)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
