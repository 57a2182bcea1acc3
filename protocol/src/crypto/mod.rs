//! # Cryptographic Primitives
//!
//! Everything the signer needs from cryptography, and nothing more:
//!
//! - **base58**: base58check with the ledger alphabet (seeds, addresses).
//! - **hash**: SHA-256, SHA-512Half, RIPEMD-160.
//! - **keys**: family seeds, deterministic secp256k1 account keys, ECDSA.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Curves and hashes come from the RustCrypto crates (`k256`,
//! `sha2`, `ripemd`); this module only arranges them the way the ledger
//! expects.

pub mod base58;
pub mod hash;
pub mod keys;

pub use hash::{sha512_half, Hash256};
pub use keys::{derive_key, AccountKey, FamilySeed, KeyError, PublicKey};
