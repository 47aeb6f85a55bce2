//! # Answer Seal - Wicket Operator CLI
//!
//! Encrypts plaintext answers into the `iv:cipher` tokens the question
//! catalog stores, decrypts tokens back for auditing, and generates
//! fresh encryption keys.
//!
//! The key comes from `WICKET_ENCRYPTION_KEY` (a `.env` file is honored).
//! Exits non-zero with an error message on a bad key or malformed token.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use wicket_common::SecretCodec;
use wicket_common::constants::ENCRYPTION_KEY_ENV;
use wicket_common::crypto::KEY_LEN;

/// Wicket answer token tool
#[derive(Parser, Debug)]
#[command(name = "answer-seal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a plaintext answer into an `iv:cipher` token
    Encrypt {
        /// The answer to encrypt
        plaintext: String,
    },
    /// Decrypt an `iv:cipher` token back into the plaintext answer
    Decrypt {
        /// The token to decrypt
        token: String,
    },
    /// Generate a fresh 64-hex-char encryption key
    Keygen,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Encrypt { plaintext } => {
            let codec = load_codec()?;
            let token = codec.encrypt(&plaintext);
            println!("plaintext: {plaintext}");
            println!("token:     {token}");
            println!();
            println!("Set this token as encrypted_answer in the question catalog.");
        }
        Command::Decrypt { token } => {
            let codec = load_codec()?;
            let plaintext = codec
                .decrypt(&token)
                .context("Failed to decrypt token")?;
            println!("token:     {token}");
            println!("plaintext: {plaintext}");
        }
        Command::Keygen => {
            let mut key = [0u8; KEY_LEN];
            rand::Rng::fill(&mut rand::rng(), &mut key[..]);
            println!("{}", hex::encode(key));
        }
    }

    Ok(())
}

fn load_codec() -> Result<SecretCodec> {
    let key = std::env::var(ENCRYPTION_KEY_ENV)
        .with_context(|| format!("{ENCRYPTION_KEY_ENV} is not set"))?;
    SecretCodec::from_hex(&key).context("Invalid encryption key")
}
