//! # Hashing Utilities
//!
//! The ledger uses three hash constructions and we expose exactly those:
//!
//! - **SHA-512Half**: the first 32 bytes of SHA-512. Used for signing
//!   hashes, transaction ids, invoice ids, and key derivation.
//! - **double SHA-256**: base58check checksums on seeds and addresses.
//! - **RIPEMD-160(SHA-256)**: turns a public key into an account id.
//!
//! All three are thin wrappers over the RustCrypto implementations.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

use crate::config::ACCOUNT_ID_LENGTH;

/// A 32-byte digest. Used for every SHA-512Half output.
pub type Hash256 = [u8; 32];

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use rtx_protocol::crypto::hash::sha256;
///
/// let hash = sha256(b"payment");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the double-SHA-256 hash: `SHA-256(SHA-256(data))`.
///
/// Only the first four bytes are ever used, as the base58check checksum.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// SHA-512Half over a sequence of byte slices.
///
/// Taking slices avoids building a temporary buffer for the common
/// `prefix || payload` shape.
pub fn sha512_half_parts(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    out
}

/// SHA-512Half of a single buffer.
///
/// ```
/// use rtx_protocol::crypto::hash::sha512_half;
///
/// assert_eq!(sha512_half(b"abc").len(), 32);
/// ```
pub fn sha512_half(data: &[u8]) -> Hash256 {
    sha512_half_parts(&[data])
}

/// RIPEMD-160 of SHA-256: the account id of a public key.
pub fn account_hash(public_key: &[u8]) -> [u8; ACCOUNT_ID_LENGTH] {
    let mut hasher = Ripemd160::new();
    hasher.update(sha256(public_key));
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha512_half_is_prefix_of_sha512() {
        // SHA-512("abc") starts with ddaf35a1...
        let half = sha512_half(b"abc");
        assert_eq!(
            hex::encode(half),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a"
        );
    }

    #[test]
    fn parts_and_whole_agree() {
        let whole = sha512_half(b"STX\0payload");
        let parts = sha512_half_parts(&[b"STX\0", b"payload"]);
        assert_eq!(whole, parts);
    }

    #[test]
    fn account_hash_is_twenty_bytes_and_deterministic() {
        let a = account_hash(&[2u8; 33]);
        let b = account_hash(&[2u8; 33]);
        assert_eq!(a.len(), 20);
        assert_eq!(a, b);
        assert_ne!(a, account_hash(&[3u8; 33]));
    }
}
