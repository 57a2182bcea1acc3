//! Payment signing with deterministic secp256k1 ECDSA.
//!
//! Signing is a separate step from building because the sender, sequence,
//! and fee are only known once a key has been derived. The signer takes the
//! [`Payment`] by value and hands back an immutable [`SignedPayment`]: no
//! field can change after the signature is computed.
//!
//! ## Procedure
//!
//! 1. Fill in `Account` (from the key), `Sequence`, `SigningPubKey`, `Fee`,
//!    optional `LastLedgerSequence`, and a zero `Flags` if none is set.
//! 2. `signing_hash = SHA512Half("STX\0" ‖ encode(fields without TxnSignature))`.
//! 3. Sign the hash (RFC 6979 nonce, low-S, DER) and store it in `TxnSignature`.
//! 4. `blob = encode(all fields)`, `hash = SHA512Half("TXN\0" ‖ blob)`.
//!
//! Because the nonce is derived from the key and the message, the same
//! inputs always produce the same blob.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::codec::{self, CodecError, EncodeMode};
use super::payment::Payment;
use super::types::{Blob, HexHash};
use crate::config::{HASH_PREFIX_TRANSACTION_ID, HASH_PREFIX_TX_SIGN};
use crate::crypto::hash::{sha512_half_parts, Hash256};
use crate::crypto::keys::{AccountKey, KeyError};
use crate::types::Amount;

/// Errors from signing or verifying a transaction.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Sequence numbers start at 1.
    #[error("sequence must be greater than zero")]
    InvalidSequence,

    /// The fee does not fit in a native amount.
    #[error("fee of {0} drops exceeds the native supply")]
    InvalidFee(u64),

    /// The transaction has no `SigningPubKey` or `TxnSignature`.
    #[error("transaction is not signed")]
    Unsigned,

    /// The signature does not match the signing hash and public key.
    #[error("signature verification failed")]
    InvalidSignature,

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("encoding failed: {0}")]
    Codec(#[from] CodecError),
}

/// Envelope values supplied at signing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningParams {
    pub sequence: u32,
    /// Fee in drops.
    pub fee: u64,
    /// `None` leaves the transaction valid indefinitely.
    pub last_ledger_sequence: Option<u32>,
}

// ---------------------------------------------------------------------------
// SignedPayment
// ---------------------------------------------------------------------------

/// A signed payment with its canonical blob and transaction hash.
///
/// Read-only by construction: the only ways to get one are
/// [`sign_payment`] and [`SignedPayment::from_blob`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedPayment {
    #[serde(flatten)]
    payment: Payment,
    #[serde(skip)]
    blob: Vec<u8>,
    hash: HexHash,
}

impl SignedPayment {
    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    /// The canonical binary encoding, signature included.
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Upper-case hex of [`blob`](Self::blob), as submitted.
    pub fn blob_hex(&self) -> String {
        hex::encode_upper(&self.blob)
    }

    /// The transaction id.
    pub fn hash(&self) -> &HexHash {
        &self.hash
    }

    pub fn into_payment(self) -> Payment {
        self.payment
    }

    /// Decodes a signed blob.
    ///
    /// The result is not verified; call [`verify_signature`] for that.
    pub fn from_blob(blob: &[u8]) -> Result<Self, SigningError> {
        let payment = Payment::from_fields(codec::decode(blob)?)?;
        if payment.base.signing_pub_key.is_none() || payment.base.txn_signature.is_none() {
            return Err(SigningError::Unsigned);
        }
        Ok(Self {
            payment,
            blob: blob.to_vec(),
            hash: HexHash(transaction_id(blob)),
        })
    }
}

// ---------------------------------------------------------------------------
// Hashes
// ---------------------------------------------------------------------------

/// The digest that gets signed: the encoding without `TxnSignature`,
/// prefixed with `STX\0`.
pub fn signing_hash(payment: &Payment) -> Result<Hash256, CodecError> {
    let bytes = codec::encode(&payment.to_fields(), EncodeMode::Signing)?;
    Ok(sha512_half_parts(&[&HASH_PREFIX_TX_SIGN, &bytes]))
}

/// The transaction id of a full signed blob.
pub fn transaction_id(blob: &[u8]) -> Hash256 {
    sha512_half_parts(&[&HASH_PREFIX_TRANSACTION_ID, blob])
}

// ---------------------------------------------------------------------------
// Sign / verify
// ---------------------------------------------------------------------------

/// Completes the envelope from `key` and `params`, then signs.
///
/// Any previous signature on `payment` is replaced.
pub fn sign_payment(
    mut payment: Payment,
    key: &AccountKey,
    params: &SigningParams,
) -> Result<SignedPayment, SigningError> {
    if params.sequence == 0 {
        return Err(SigningError::InvalidSequence);
    }

    let base = &mut payment.base;
    base.account = key.account_id();
    base.sequence = params.sequence;
    base.signing_pub_key = Some(*key.public_key());
    base.fee = Amount::native(params.fee).map_err(|_| SigningError::InvalidFee(params.fee))?;
    base.last_ledger_sequence = params.last_ledger_sequence;
    base.flags.get_or_insert(0);
    base.txn_signature = None;

    let digest = signing_hash(&payment)?;
    let signature = key.sign_digest(&digest)?;
    debug!(signature_len = signature.len(), "payment signed");
    payment.base.txn_signature = Some(Blob(signature));

    let blob = codec::encode(&payment.to_fields(), EncodeMode::Full)?;
    let hash = HexHash(transaction_id(&blob));

    info!(
        hash = %hash,
        account = %payment.base.account,
        sequence = params.sequence,
        "signed payment"
    );

    Ok(SignedPayment {
        payment,
        blob,
        hash,
    })
}

/// Checks the embedded signature against the embedded public key.
pub fn verify_signature(signed: &SignedPayment) -> Result<(), SigningError> {
    let base = &signed.payment.base;
    let (Some(key), Some(signature)) = (&base.signing_pub_key, &base.txn_signature) else {
        return Err(SigningError::Unsigned);
    };
    let digest = signing_hash(&signed.payment)?;
    if key.verify_digest(&digest, signature.as_bytes()) {
        Ok(())
    } else {
        Err(SigningError::InvalidSignature)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
