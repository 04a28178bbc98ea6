use std::path::Path;

use crate::app::AppContext;
use crate::cli::RsaCommand;
use crate::constants::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use crate::errors::CliError;
use crate::helpers::{read_input, read_input_string, read_key_file};
use crate::output::{print_json, print_value};
use crate::security::{ensure_absent, write_private_file, write_public_file};
use crate::ui::{render, Badge};

pub fn handle_rsa(ctx: &AppContext, command: &RsaCommand) -> anyhow::Result<()> {
    match command {
        RsaCommand::Keygen { bits, out_dir } => handle_keygen(ctx, *bits, out_dir),
        RsaCommand::Encrypt { public_key, input } => {
            let rsa = ctx.rsa()?;
            let key = read_key_file(public_key)?;
            let plaintext = read_input(input.as_deref())?;
            let ciphertext = rsa.encrypt(&plaintext, &key)?;
            print_value(ctx.ui(), "ciphertext", &ciphertext)
        }
        RsaCommand::Decrypt { private_key, input } => {
            let rsa = ctx.rsa()?;
            let key = read_key_file(private_key)?;
            let ciphertext = read_input_string(input.as_deref())?;
            let plaintext = zeroize::Zeroizing::new(rsa.decrypt(ciphertext.trim(), &key)?);
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&plaintext)?;
            stdout.flush()?;
            Ok(())
        }
        RsaCommand::Sign { private_key, input } => {
            let rsa = ctx.rsa()?;
            let key = read_key_file(private_key)?;
            let data = read_input(input.as_deref())?;
            let signature = rsa.sign(&data, &key)?;
            print_value(ctx.ui(), "signature", &signature)
        }
        RsaCommand::Verify {
            public_key,
            signature,
            input,
        } => {
            let rsa = ctx.rsa()?;
            let key = read_key_file(public_key)?;
            let data = read_input(input.as_deref())?;
            let valid = rsa.verify(&data, signature.trim(), &key)?;

            if ctx.ui().mode.is_json() {
                print_json(&serde_json::json!({ "valid": valid }))?;
            } else if valid && !ctx.quiet() {
                println!("{}", render::badge(ctx.ui(), Badge::Ok, "Signature valid"));
            }
            if !valid {
                return Err(CliError::integrity_failed("Signature does not match").into());
            }
            Ok(())
        }
    }
}

fn handle_keygen(ctx: &AppContext, bits: Option<usize>, out_dir: &Path) -> anyhow::Result<()> {
    let rsa = ctx.rsa()?;
    let private_path = out_dir.join(PRIVATE_KEY_FILE);
    let public_path = out_dir.join(PUBLIC_KEY_FILE);
    ensure_absent(&[private_path.as_path(), public_path.as_path()])?;

    let pair = match bits {
        Some(bits) => rsa.generate_key_pair_with_bits(bits)?,
        None => rsa.generate_key_pair()?,
    };

    write_private_file(&private_path, &pair.private_key)?;
    write_public_file(&public_path, &pair.public_key)?;
    tracing::debug!(dir = %out_dir.display(), "wrote RSA key pair");

    let private_display = private_path.display().to_string();
    let public_display = public_path.display().to_string();
    if ctx.ui().mode.is_json() {
        return print_json(&serde_json::json!({
            "private_key": private_display,
            "public_key": public_display,
        }));
    }
    if !ctx.quiet() {
        println!(
            "{}",
            render::receipt(
                ctx.ui(),
                "Key pair written",
                &[("Private", private_display.as_str()), ("Public", public_display.as_str())],
            )
        );
    }
    Ok(())
}
