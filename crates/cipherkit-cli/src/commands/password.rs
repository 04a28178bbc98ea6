use secrecy::ExposeSecret;

use cipherkit_core::password::detect_scheme;

use crate::app::AppContext;
use crate::cli::{HashPasswordArgs, SchemeArg, VerifyPasswordArgs};
use crate::errors::CliError;
use crate::helpers::{read_new_password, read_password};
use crate::output::print_json;
use crate::ui::{render, Badge};

pub fn handle_hash_password(ctx: &AppContext, args: &HashPasswordArgs) -> anyhow::Result<()> {
    let passwords = ctx.passwords()?;
    let password = read_new_password()?;
    let password = password.expose_secret();

    let hash = match args.scheme {
        SchemeArg::Argon2 => passwords.hash_password(password)?,
        SchemeArg::Bcrypt => passwords.hash_password_bcrypt(password)?,
        SchemeArg::Pbkdf2 => passwords.hash_password_pbkdf2(password)?,
        SchemeArg::Scrypt => passwords.hash_password_scrypt(password)?,
    };

    if ctx.ui().mode.is_json() {
        return print_json(&serde_json::json!({
            "scheme": detect_scheme(&hash),
            "hash": hash,
        }));
    }
    println!("{}", hash);
    Ok(())
}

pub fn handle_verify_password(ctx: &AppContext, args: &VerifyPasswordArgs) -> anyhow::Result<()> {
    let passwords = ctx.passwords()?;
    let password = read_password()?;

    let valid = passwords.verify_password_universal(password.expose_secret(), &args.hash)?;
    let needs_rehash = valid && passwords.needs_rehash(&args.hash)?;

    if ctx.ui().mode.is_json() {
        print_json(&serde_json::json!({
            "valid": valid,
            "scheme": detect_scheme(&args.hash),
            "needs_rehash": needs_rehash,
        }))?;
    } else if valid && !ctx.quiet() {
        println!("{}", render::badge(ctx.ui(), Badge::Ok, "Password matches"));
        if needs_rehash {
            println!(
                "{}",
                render::hint(ctx.ui(), "Hash uses outdated parameters; rehash with `cipherkit hash-password`.")
            );
        }
    }

    if !valid {
        return Err(CliError::auth_failed("Password does not match").into());
    }
    Ok(())
}

pub fn handle_check_password(ctx: &AppContext) -> anyhow::Result<()> {
    let passwords = ctx.passwords()?;
    let password = read_password()?;
    let strength = passwords.check_strength(password.expose_secret());

    if ctx.ui().mode.is_json() {
        return print_json(&strength);
    }

    let ui = ctx.ui();
    if ui.mode.is_pretty() && !ctx.quiet() {
        println!("{}", render::header(ui, "check-password"));
    }
    let kind = if strength.is_strong { Badge::Ok } else { Badge::Warn };
    let verdict = if strength.is_strong { "strong" } else { "weak" };
    println!("{}", render::badge(ui, kind, verdict));
    println!("{}", render::kv(ui, "Score", &format!("{}/4", strength.score)));
    for item in &strength.feedback {
        println!("{}", render::hint(ui, item));
    }
    Ok(())
}
