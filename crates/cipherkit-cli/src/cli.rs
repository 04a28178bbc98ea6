use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use cipherkit_core::VERSION;

/// Cipherkit - encryption, password hashing and token utilities
#[derive(Parser)]
#[command(name = "cipherkit")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "CIPHERKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt data under a password
    Encrypt(EncryptArgs),

    /// Decrypt a payload produced by `encrypt`
    Decrypt(DecryptArgs),

    /// Hash a password for storage
    HashPassword(HashPasswordArgs),

    /// Verify a password against a stored hash (exit 5 on mismatch)
    VerifyPassword(VerifyPasswordArgs),

    /// Report password strength
    CheckPassword,

    /// RSA key generation, encryption and signatures
    #[command(subcommand)]
    Rsa(RsaCommand),

    /// Encrypt or decrypt selected fields of a JSON object
    #[command(subcommand)]
    Fields(FieldsCommand),

    /// Generate a random salt (hex)
    Salt {
        /// Salt length in bytes
        #[arg(long, default_value_t = 32)]
        length: usize,
    },

    /// Generate a URL-safe random token
    Token {
        /// Random bytes before encoding
        #[arg(long, default_value_t = 32)]
        bytes: usize,
    },

    /// Hash input with SHA-256 or SHA-512
    Digest {
        /// Digest algorithm
        #[arg(long, default_value = "sha256")]
        algorithm: String,

        /// Read input from a file instead of stdin
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Generate a random UUID
    Uuid,

    /// Generate a PKCE verifier and S256 challenge
    Pkce {
        /// Compute the challenge for an existing verifier
        #[arg(long)]
        verifier: Option<String>,
    },

    /// Decode and validate access token claims (signature is not checked)
    Claims(ClaimsArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// Read plaintext from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Associated data to authenticate (GCM only)
    #[arg(long)]
    pub aad: Option<String>,

    /// Cipher (aes-128-cbc, aes-256-cbc, aes-128-gcm, aes-256-gcm)
    #[arg(long)]
    pub algorithm: Option<String>,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Read the payload JSON from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Associated data supplied at encryption time
    #[arg(long)]
    pub aad: Option<String>,

    /// Cipher the payload was produced with
    #[arg(long)]
    pub algorithm: Option<String>,

    /// Write plaintext to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    Argon2,
    Bcrypt,
    Pbkdf2,
    Scrypt,
}

/// Arguments for the `hash-password` command
#[derive(Args)]
pub struct HashPasswordArgs {
    /// Hash scheme
    #[arg(long, value_enum, default_value_t = SchemeArg::Argon2)]
    pub scheme: SchemeArg,
}

/// Arguments for the `verify-password` command
#[derive(Args)]
pub struct VerifyPasswordArgs {
    /// Stored hash (any supported format)
    #[arg(long)]
    pub hash: String,
}

#[derive(Subcommand)]
pub enum RsaCommand {
    /// Generate a PEM key pair
    Keygen {
        /// Modulus size in bits
        #[arg(long)]
        bits: Option<usize>,

        /// Directory for private.pem and public.pem
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
    },

    /// Encrypt stdin (or --input) with a public key
    Encrypt {
        #[arg(long, value_name = "FILE")]
        public_key: PathBuf,

        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Decrypt base64 ciphertext with a private key
    Decrypt {
        #[arg(long, value_name = "FILE")]
        private_key: PathBuf,

        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Sign stdin (or --input) with a private key
    Sign {
        #[arg(long, value_name = "FILE")]
        private_key: PathBuf,

        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Verify a base64 signature (exit 6 when it does not match)
    Verify {
        #[arg(long, value_name = "FILE")]
        public_key: PathBuf,

        #[arg(long)]
        signature: String,

        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum FieldsCommand {
    /// Encrypt the listed fields
    Encrypt(FieldsArgs),

    /// Decrypt the listed fields
    Decrypt(FieldsArgs),
}

/// Arguments shared by the `fields` subcommands
#[derive(Args)]
pub struct FieldsArgs {
    /// Comma-separated field names
    #[arg(long, value_delimiter = ',', required = true)]
    pub fields: Vec<String>,

    /// Read the JSON object from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Cipher for newly encrypted fields
    #[arg(long)]
    pub algorithm: Option<String>,
}

/// Arguments for the `claims` command
#[derive(Args)]
pub struct ClaimsArgs {
    /// Compact JWT
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Required audience
    #[arg(long)]
    pub audience: Option<String>,

    /// Required issuer
    #[arg(long)]
    pub issuer: Option<String>,

    /// Clock skew tolerance in seconds
    #[arg(long, default_value_t = 0)]
    pub leeway: i64,
}
