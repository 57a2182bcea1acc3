//! # Key Management
//!
//! Family seeds and deterministic secp256k1 account keys.
//!
//! A family seed is 16 bytes of entropy. From it we derive a *root* key, and
//! from the root public key plus a 32-bit index we derive any number of
//! *account* keys:
//!
//! ```text
//! root_priv    = first valid SHA512Half(seed || i)          i = 0, 1, ...
//! root_pub     = compress(root_priv * G)
//! additional   = first valid SHA512Half(root_pub || index || j)   j = 0, 1, ...
//! account_priv = (root_priv + additional) mod n
//! account_id   = RIPEMD160(SHA256(compress(account_priv * G)))
//! ```
//!
//! "Valid" means a non-zero scalar strictly below the curve order. The loop
//! almost never runs twice, but it has to exist.
//!
//! ## The derivation index is the transaction sequence
//!
//! The signer derives the account key with `index = sequence`, so one seed
//! fans out into one account per sequence number. Accounts funded under this
//! scheme are only reachable with the same index, so the coupling stays.
//!
//! Key bytes are never logged.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::{Field, PrimeField};
use k256::{FieldBytes, Scalar};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use super::base58::{decode_check, encode_check, Base58Error};
use super::hash::{account_hash, sha512_half_parts, Hash256};
use crate::config::{FAMILY_SEED_LENGTH, FAMILY_SEED_VERSION, PUBLIC_KEY_LENGTH};
use crate::types::AccountId;

/// Errors that can occur during seed decoding and key derivation.
///
/// Deliberately silent about key material.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid seed: {0}")]
    InvalidSeed(#[from] Base58Error),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("invalid public key bytes")]
    InvalidPublicKey,

    #[error("signing failed: {0}")]
    Signing(String),
}

// ---------------------------------------------------------------------------
// FamilySeed
// ---------------------------------------------------------------------------

/// A checksum-verified 16-byte family seed.
///
/// Does not implement `Debug` with contents or `Serialize` at all: printing a
/// seed should take an explicit call to [`FamilySeed::to_base58`].
#[derive(Clone, PartialEq, Eq)]
pub struct FamilySeed([u8; FAMILY_SEED_LENGTH]);

impl FamilySeed {
    /// Decodes an `s...` seed string, verifying version and checksum.
    ///
    /// ```
    /// use rtx_protocol::crypto::keys::FamilySeed;
    ///
    /// assert!(FamilySeed::from_base58("snoPBrXtMeMyMHUVTgbuqAfg1SUTb").is_ok());
    /// assert!(FamilySeed::from_base58("snoPBrXtMeMyMHUVTgbuqAfg1SUTc").is_err());
    /// ```
    pub fn from_base58(encoded: &str) -> Result<Self, KeyError> {
        let payload = decode_check(encoded, FAMILY_SEED_VERSION, FAMILY_SEED_LENGTH)?;
        let mut bytes = [0u8; FAMILY_SEED_LENGTH];
        bytes.copy_from_slice(&payload);
        Ok(Self(bytes))
    }

    /// Wraps raw seed entropy.
    pub fn from_bytes(bytes: [u8; FAMILY_SEED_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Re-encodes the seed. Handle the result like the seed itself.
    pub fn to_base58(&self) -> String {
        encode_check(FAMILY_SEED_VERSION, &self.0)
    }

    /// Derives the root key of this seed's family.
    pub fn root_key(&self) -> Result<RootKey, KeyError> {
        let scalar = first_valid_scalar(|i| sha512_half_parts(&[&self.0, &i.to_be_bytes()]))?;
        let public = compressed_public(&scalar)?;
        Ok(RootKey { scalar, public })
    }
}

impl fmt::Debug for FamilySeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FamilySeed(..)")
    }
}

// ---------------------------------------------------------------------------
// RootKey
// ---------------------------------------------------------------------------

/// The root of a seed's key family. Only used to derive account keys.
pub struct RootKey {
    scalar: Scalar,
    public: [u8; PUBLIC_KEY_LENGTH],
}

impl RootKey {
    /// Compressed root public key (the "public generator").
    pub fn public_generator(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.public
    }

    /// Derives the account key at `index`.
    pub fn account_key(&self, index: u32) -> Result<AccountKey, KeyError> {
        let additional = first_valid_scalar(|j| {
            sha512_half_parts(&[&self.public, &index.to_be_bytes(), &j.to_be_bytes()])
        })?;
        let scalar = self.scalar + additional;
        let signing_key = SigningKey::from_bytes(&scalar.to_repr())
            .map_err(|e| KeyError::Derivation(e.to_string()))?;
        Ok(AccountKey::from_signing_key(signing_key))
    }
}

// ---------------------------------------------------------------------------
// AccountKey
// ---------------------------------------------------------------------------

/// A derived account signing key together with its public key and account id.
///
/// This is the only key material the signer ever holds, and it is passed
/// around explicitly.
///
/// ```
/// use rtx_protocol::crypto::keys::derive_key;
///
/// let key = derive_key("snoPBrXtMeMyMHUVTgbuqAfg1SUTb", 0).unwrap();
/// assert_eq!(key.account_id().to_address(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
/// ```
pub struct AccountKey {
    signing_key: SigningKey,
    public_key: PublicKey,
    account_id: AccountId,
}

impl AccountKey {
    fn from_signing_key(signing_key: SigningKey) -> Self {
        let point = signing_key.verifying_key().to_encoded_point(true);
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(point.as_bytes());
        let public_key = PublicKey(bytes);
        let account_id = public_key.account_id();
        Self {
            signing_key,
            public_key,
            account_id,
        }
    }

    /// The compressed public key that goes into `SigningPubKey`.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The account this key controls.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Signs a 32-byte digest, returning a DER-encoded low-S signature.
    ///
    /// Signing is deterministic (RFC 6979): the same key and digest always
    /// produce the same bytes.
    pub fn sign_digest(&self, digest: &Hash256) -> Result<Vec<u8>, KeyError> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| KeyError::Signing(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountKey")
            .field("public_key", &self.public_key)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A 33-byte compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Parses compressed SEC1 bytes, checking the point is on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidPublicKey);
        }
        VerifyingKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        let mut out = [0u8; PUBLIC_KEY_LENGTH];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Upper-case hex, the form used in transaction JSON.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// The account id this key controls.
    pub fn account_id(&self) -> AccountId {
        AccountId::from_bytes(account_hash(&self.0))
    }

    /// Verifies a DER signature over a 32-byte digest.
    pub fn verify_digest(&self, digest: &Hash256, der_signature: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_sec1_bytes(&self.0) else {
            return false;
        };
        let Ok(signature) = Signature::from_der(der_signature) else {
            return false;
        };
        key.verify_prehash(digest, &signature).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Decodes `seed` and derives the account key at `index`.
///
/// Fails if the seed does not decode under base58check or if derivation
/// produces an invalid key.
pub fn derive_key(seed: &str, index: u32) -> Result<AccountKey, KeyError> {
    let seed = FamilySeed::from_base58(seed)?;
    let key = seed.root_key()?.account_key(index)?;
    tracing::debug!(
        account = %key.account_id(),
        index,
        "derived account key"
    );
    Ok(key)
}

/// Runs `candidate(0), candidate(1), ...` until one hashes to a non-zero
/// scalar below the curve order.
fn first_valid_scalar(candidate: impl Fn(u32) -> Hash256) -> Result<Scalar, KeyError> {
    for i in 0..=u32::MAX {
        let bytes = FieldBytes::from(candidate(i));
        let scalar: Option<Scalar> = Scalar::from_repr(bytes).into();
        if let Some(scalar) = scalar {
            if !bool::from(Field::is_zero(&scalar)) {
                return Ok(scalar);
            }
        }
    }
    Err(KeyError::Derivation(
        "exhausted candidate space without a valid scalar".to_string(),
    ))
}

fn compressed_public(scalar: &Scalar) -> Result<[u8; PUBLIC_KEY_LENGTH], KeyError> {
    let signing_key =
        SigningKey::from_bytes(&scalar.to_repr()).map_err(|e| KeyError::Derivation(e.to_string()))?;
    let point = signing_key.verifying_key().to_encoded_point(true);
    let mut out = [0u8; PUBLIC_KEY_LENGTH];
    out.copy_from_slice(point.as_bytes());
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
