use chrono::Utc;

use cipherkit_core::auth::{challenge_for, decode_claims, generate_pkce, validate_claims, ClaimsValidation};

use crate::app::AppContext;
use crate::cli::ClaimsArgs;
use crate::output::print_json;
use crate::ui::{render, Badge};

pub fn handle_pkce(ctx: &AppContext, verifier: Option<&str>) -> anyhow::Result<()> {
    let pair = match verifier {
        Some(verifier) => {
            let challenge = challenge_for(verifier)?;
            serde_json::json!({
                "verifier": verifier,
                "challenge": challenge,
                "method": cipherkit_core::auth::pkce::PKCE_METHOD,
            })
        }
        None => serde_json::to_value(generate_pkce())?,
    };

    if ctx.ui().mode.is_json() {
        return print_json(&pair);
    }
    let ui = ctx.ui();
    for key in ["verifier", "challenge", "method"] {
        let value = pair.get(key).and_then(|v| v.as_str()).unwrap_or_default();
        println!("{}", render::kv(ui, key, value));
    }
    Ok(())
}

pub fn handle_claims(ctx: &AppContext, args: &ClaimsArgs) -> anyhow::Result<()> {
    let claims = decode_claims(&args.token)?;
    let validation = ClaimsValidation {
        audience: args.audience.clone(),
        issuer: args.issuer.clone(),
        leeway_secs: args.leeway,
    };
    validate_claims(&claims, &validation, Utc::now())?;

    if ctx.ui().mode.is_json() {
        return print_json(&claims);
    }
    let ui = ctx.ui();
    if !ctx.quiet() {
        println!("{}", render::badge(ui, Badge::Ok, "Token claims valid"));
    }
    println!("{}", render::kv(ui, "Subject", &claims.sub));
    if let Some(name) = claims.preferred_username.as_deref().or(claims.name.as_deref()) {
        println!("{}", render::kv(ui, "User", name));
    }
    if let Some(expires) = claims.expires_at() {
        println!("{}", render::kv(ui, "Expires", &expires.to_rfc3339()));
    }
    if !claims.roles.is_empty() {
        println!("{}", render::kv(ui, "Roles", &claims.roles.join(", ")));
    }
    let scopes: Vec<&str> = claims.scopes().collect();
    if !scopes.is_empty() {
        println!("{}", render::kv(ui, "Scopes", &scopes.join(" ")));
    }
    Ok(())
}
