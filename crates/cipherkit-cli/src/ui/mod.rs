//! UI primitives for the Cipherkit CLI.
//!
//! This module provides:
//! - **Context**: Terminal detection (color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and styles
//! - **Render**: Badges, key-value lines, hints, errors
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{render, Badge, UiContext};
//!
//! let ctx = UiContext::from_env(cli.json, cli.no_color);
//! if ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//! println!("{}", render::badge(&ctx, Badge::Ok, "Password verified"));
//! ```

mod context;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;
