//! Auth helpers that need no network access.
//!
//! - **pkce**: PKCE verifier/challenge pairs (RFC 7636, S256)
//! - **claims**: access token claim decoding and validation
//! - **profile**: the signed-in user's directory profile
//! - **token_cache**: single-slot access token cache with refresh skew

pub mod claims;
pub mod pkce;
pub mod profile;
pub mod token_cache;

pub use claims::{decode_claims, validate_claims, Audience, ClaimsValidation, TokenClaims};
pub use pkce::{challenge_for, generate_pkce, PkcePair};
pub use profile::UserProfile;
pub use token_cache::{TokenCache, DEFAULT_REFRESH_SKEW_SECS};
