//! The answer codec: AES-256-CBC with a random IV per value.
//!
//! Tokens are `<ivHex>:<cipherHex>`. Encryption is non-deterministic, so
//! two tokens for the same plaintext never compare equal and the catalog
//! file leaks nothing through ciphertext equality.
//!
//! CBC carries no authentication tag: a tampered token may decrypt to
//! garbage instead of failing. The gate treats any decrypt failure as a
//! system fault, never as a user mistake.

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

use crate::error::WicketError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Key length in bytes (256 bits)
pub const KEY_LEN: usize = 32;

/// IV length in bytes (128 bits, one AES block)
pub const IV_LEN: usize = 16;

/// Encrypts and decrypts reference answers
pub struct SecretCodec {
    key: [u8; KEY_LEN],
}

impl SecretCodec {
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Parse a key from its 64-hex-char form (process configuration).
    pub fn from_hex(hex_key: &str) -> Result<Self, WicketError> {
        if hex_key.len() != KEY_LEN * 2 {
            return Err(WicketError::Config(format!(
                "encryption key must be {} hex characters ({} bytes), got {}",
                KEY_LEN * 2,
                KEY_LEN,
                hex_key.len()
            )));
        }

        let bytes = hex::decode(hex_key)
            .map_err(|e| WicketError::Config(format!("encryption key is not valid hex: {e}")))?;

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&bytes);
        Ok(Self { key })
    }

    /// Encrypt a plaintext answer into an `iv:cipher` hex token.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let mut iv = [0u8; IV_LEN];
        rand::Rng::fill(&mut rand::rng(), &mut iv[..]);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        format!("{}:{}", hex::encode(iv), hex::encode(ciphertext))
    }

    /// Decrypt an `iv:cipher` hex token back into the plaintext answer.
    pub fn decrypt(&self, token: &str) -> Result<String, WicketError> {
        let parts: Vec<&str> = token.split(':').collect();
        let [iv_hex, cipher_hex] = parts.as_slice() else {
            return Err(WicketError::CryptoFormat(
                "expected \"iv:cipher\"".to_string(),
            ));
        };
        if iv_hex.is_empty() || cipher_hex.is_empty() {
            return Err(WicketError::CryptoFormat(
                "empty iv or cipher segment".to_string(),
            ));
        }

        let iv = hex::decode(iv_hex)
            .map_err(|e| WicketError::CryptoFormat(format!("iv is not valid hex: {e}")))?;
        if iv.len() != IV_LEN {
            return Err(WicketError::CryptoFormat(format!(
                "iv must be {IV_LEN} bytes, got {}",
                iv.len()
            )));
        }

        let ciphertext = hex::decode(cipher_hex)
            .map_err(|e| WicketError::CryptoFormat(format!("cipher is not valid hex: {e}")))?;

        let mut iv_block = [0u8; IV_LEN];
        iv_block.copy_from_slice(&iv);

        let plaintext = Aes256CbcDec::new(&self.key.into(), &iv_block.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| WicketError::Crypto("bad padding (wrong key or corrupted token)".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| WicketError::Crypto("decrypted bytes are not valid UTF-8".to_string()))
    }
}
