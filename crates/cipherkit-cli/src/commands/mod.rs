//! Command handlers, one module per command group.

mod auth;
mod crypt;
mod fields;
mod misc;
mod password;
mod random;
mod rsa;

pub use auth::{handle_claims, handle_pkce};
pub use crypt::{handle_decrypt, handle_encrypt};
pub use fields::handle_fields;
pub use misc::handle_completions;
pub use password::{handle_check_password, handle_hash_password, handle_verify_password};
pub use random::{handle_digest, handle_salt, handle_token, handle_uuid};
pub use rsa::handle_rsa;
