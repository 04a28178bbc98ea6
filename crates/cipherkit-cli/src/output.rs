//! Output formatting helpers for the CLI.

use serde::Serialize;

use crate::ui::{render, Badge, UiContext};

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{}", output);
    Ok(())
}

/// Print a single generated value: JSON object in JSON mode, bare value
/// otherwise so it can be captured by scripts.
pub fn print_value(ctx: &UiContext, key: &str, value: &str) -> anyhow::Result<()> {
    if ctx.mode.is_json() {
        let mut object = serde_json::Map::new();
        object.insert(key.to_string(), serde_json::Value::from(value));
        return print_json(&object);
    }
    println!("{}", value);
    Ok(())
}

/// Print a status line unless quiet or in JSON mode.
pub fn status(ctx: &UiContext, quiet: bool, kind: Badge, message: &str) {
    if quiet || ctx.mode.is_json() {
        return;
    }
    eprintln!("{}", render::badge(ctx, kind, message));
}
