// SPDX-License-Identifier: AGPL-3.0-or-later

//! AES-256-CBC encryption of secrets at rest.
//!
//! The vault owns the process-wide symmetric key, injected from
//! configuration at startup. Every value is encrypted with a fresh random
//! 16-byte IV unless the caller pins one explicitly; ciphertext and IV are
//! returned (and stored) as hex.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// IV length for AES-CBC, in bytes.
pub const IV_LENGTH: usize = 16;

/// Errors raised by vault encryption operations.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("ciphertext or IV is not valid hex: {0}")]
    Encoding(#[from] hex::FromHexError),

    #[error("IV must be {IV_LENGTH} bytes")]
    InvalidIv,

    /// Wrong IV, corrupted ciphertext or a mismatched key. Must abort the
    /// request; never degrades to returning garbage plaintext.
    #[error("decryption failed: ciphertext does not match key/IV pair")]
    Decryption,
}

/// Hex-encoded ciphertext together with the IV it was produced under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    pub ciphertext: String,
    pub iv: String,
}

/// Process-wide symmetric vault for secrets at rest.
#[derive(Clone)]
pub struct KeyVault {
    key: [u8; 32],
}

impl KeyVault {
    /// Create a vault around the configured AES-256 key.
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Encrypt a secret with AES-256-CBC.
    ///
    /// A random IV is generated when `iv` is `None`; with an explicit IV
    /// the output is deterministic.
    pub fn encrypt(&self, plaintext: &str, iv: Option<[u8; IV_LENGTH]>) -> Result<Encrypted, CipherError> {
        let iv = iv.unwrap_or_else(|| {
            let mut buf = [0u8; IV_LENGTH];
            OsRng.fill_bytes(&mut buf);
            buf
        });

        let ciphertext = Aes256CbcEnc::new_from_slices(&self.key, &iv)
            .map_err(|_| CipherError::InvalidIv)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        Ok(Encrypted {
            ciphertext: hex::encode(ciphertext),
            iv: hex::encode(iv),
        })
    }

    /// Decrypt a hex ciphertext/IV pair produced by [`encrypt`](Self::encrypt).
    ///
    /// A wrong IV or key corrupts the plaintext; padding and UTF-8
    /// validation catch that and surface [`CipherError::Decryption`].
    pub fn decrypt(&self, ciphertext_hex: &str, iv_hex: &str) -> Result<String, CipherError> {
        let ciphertext = hex::decode(ciphertext_hex)?;
        let iv = hex::decode(iv_hex)?;
        if iv.len() != IV_LENGTH {
            return Err(CipherError::InvalidIv);
        }

        let plaintext = Aes256CbcDec::new_from_slices(&self.key, &iv)
            .map_err(|_| CipherError::InvalidIv)?
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CipherError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Decryption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vault() -> KeyVault {
        KeyVault::new([0x42; 32])
    }

    const SECRET: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn encrypt_decrypt_round_trip() {
        let vault = test_vault();
        let sealed = vault.encrypt(SECRET, None).unwrap();

        assert_ne!(sealed.ciphertext, SECRET);
        assert_eq!(sealed.iv.len(), IV_LENGTH * 2);

        let opened = vault.decrypt(&sealed.ciphertext, &sealed.iv).unwrap();
        assert_eq!(opened, SECRET);
    }

    #[test]
    fn explicit_iv_is_deterministic() {
        let vault = test_vault();
        let iv = [7u8; IV_LENGTH];

        let a = vault.encrypt(SECRET, Some(iv)).unwrap();
        let b = vault.encrypt(SECRET, Some(iv)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_iv_varies_ciphertext() {
        let vault = test_vault();

        let a = vault.encrypt(SECRET, None).unwrap();
        let b = vault.encrypt(SECRET, None).unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn mismatched_iv_fails_instead_of_returning_garbage() {
        let vault = test_vault();
        let sealed = vault.encrypt(SECRET, Some([0u8; IV_LENGTH])).unwrap();

        // Flipping the IV's top bit garbles the first plaintext block into
        // bytes that cannot start a UTF-8 string.
        let mut wrong_iv = [0u8; IV_LENGTH];
        wrong_iv[0] = 0x80;

        let result = vault.decrypt(&sealed.ciphertext, &hex::encode(wrong_iv));
        assert!(matches!(result, Err(CipherError::Decryption)));
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let vault = test_vault();
        let sealed = vault.encrypt(SECRET, None).unwrap();

        // Dropping one byte leaves a non-block-multiple ciphertext.
        let truncated = &sealed.ciphertext[..sealed.ciphertext.len() - 2];
        let result = vault.decrypt(truncated, &sealed.iv);
        assert!(matches!(result, Err(CipherError::Decryption)));
    }

    #[test]
    fn non_hex_input_fails_with_encoding_error() {
        let vault = test_vault();
        let result = vault.decrypt("not-hex", &"00".repeat(IV_LENGTH));
        assert!(matches!(result, Err(CipherError::Encoding(_))));
    }

    #[test]
    fn short_iv_is_rejected() {
        let vault = test_vault();
        let sealed = vault.encrypt(SECRET, None).unwrap();
        let result = vault.decrypt(&sealed.ciphertext, "0011");
        assert!(matches!(result, Err(CipherError::InvalidIv)));
    }
}
