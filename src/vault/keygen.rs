// SPDX-License-Identifier: AGPL-3.0-or-later

//! secp256k1 key-pair generation for custodial wallets.
//!
//! Ethereum addresses are derived by:
//! 1. Generate secp256k1 private key from the OS CSPRNG
//! 2. Get uncompressed public key (65 bytes: 0x04 || x || y)
//! 3. Take keccak256 of the public key without the 0x04 prefix (64 bytes)
//! 4. Take the last 20 bytes of the hash
//! 5. Apply the EIP-55 mixed-case checksum

use alloy::primitives::{keccak256, Address};
use alloy::signers::local::PrivateKeySigner;
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::rand_core::OsRng;

use super::cipher::CipherError;

/// A freshly generated wallet key pair.
///
/// `private_key` exists in memory only between generation and encryption;
/// it is never persisted or returned through the API.
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// EIP-55 checksummed address (0x + 40 hex chars).
    pub address: String,
    /// Compressed SEC1 public key (0x + 66 hex chars).
    pub public_key: String,
    /// Private key (0x + 64 hex chars).
    pub private_key: String,
}

/// Generate a fresh key pair.
///
/// Entropy comes from the OS CSPRNG; a failing entropy source aborts the
/// process, which is the only acceptable behavior for key generation.
pub fn generate_key_pair() -> KeyPair {
    let signing_key = SigningKey::random(&mut OsRng);
    let verifying_key = signing_key.verifying_key();

    let uncompressed = verifying_key.to_encoded_point(false);
    let hash = keccak256(&uncompressed.as_bytes()[1..]);
    let address = Address::from_slice(&hash[12..]).to_checksum(None);

    let compressed = verifying_key.to_encoded_point(true);

    KeyPair {
        address,
        public_key: format!("0x{}", hex::encode(compressed.as_bytes())),
        private_key: format!("0x{}", hex::encode(signing_key.to_bytes())),
    }
}

/// Rebuild a transaction signer from a decrypted private key.
///
/// A stored key that no longer parses indicates corruption or a key
/// mismatch, so it surfaces as a decryption-class failure.
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, CipherError> {
    let stripped = private_key_hex
        .strip_prefix("0x")
        .unwrap_or(private_key_hex);
    let key_bytes = hex::decode(stripped)?;

    PrivateKeySigner::from_slice(&key_bytes).map_err(|_| CipherError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_address_is_checksummed_ethereum_format() {
        let pair = generate_key_pair();

        assert!(pair.address.starts_with("0x"));
        assert_eq!(pair.address.len(), 42, "address must be 42 characters");
        assert!(pair.address[2..].chars().all(|c| c.is_ascii_hexdigit()));

        // 33-byte compressed point: 0x02/0x03 prefix
        assert!(pair.public_key.starts_with("0x02") || pair.public_key.starts_with("0x03"));
        assert_eq!(pair.public_key.len(), 2 + 66);

        assert!(pair.private_key.starts_with("0x"));
        assert_eq!(pair.private_key.len(), 2 + 64);
    }

    #[test]
    fn generated_addresses_are_unique() {
        let mut addresses = std::collections::HashSet::new();
        for _ in 0..10 {
            let pair = generate_key_pair();
            assert!(addresses.insert(pair.address), "generated duplicate address");
        }
    }

    #[test]
    fn signer_round_trips_to_same_address() {
        let pair = generate_key_pair();
        let signer = signer_from_hex(&pair.private_key).unwrap();
        assert_eq!(signer.address().to_checksum(None), pair.address);
    }

    #[test]
    fn signer_from_garbage_fails() {
        assert!(signer_from_hex("0xzz").is_err());
        assert!(signer_from_hex("0x0011").is_err());
    }
}
