//! # Transaction Module
//!
//! Construction, canonical encoding, and signing of payment transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs     TransactionType, PaymentFlags, hex-rendered byte wrappers
//! envelope.rs  TxBase: the header fields every transaction carries
//! payment.rs   Payment, PaymentBuilder, build_payment (from CLI strings)
//! codec.rs     canonical binary encoding and strict decoding
//! signing.rs   sign_payment, verify_signature, SignedPayment
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`build_payment`] or [`PaymentBuilder`] assemble the unsigned
//!    payment.
//! 2. **Sign**: [`sign_payment`] completes the envelope from the account key
//!    and signing parameters and returns a [`SignedPayment`].
//! 3. **Emit / submit**: the blob and hash come off the signed payment; the
//!    blob goes to [`crate::network::Remote::submit`].
//!
//! ## Design Decisions
//!
//! - The transaction id is `SHA512Half("TXN\0" ‖ blob)`, so it covers the
//!   signature. Signing twice with the same key gives the same id because
//!   the ECDSA nonce is deterministic.
//! - Amounts never pass through floating point.
//! - `sign_payment` consumes the payment. There is no API to edit a
//!   [`SignedPayment`].

pub mod codec;
pub mod envelope;
pub mod payment;
pub mod signing;
pub mod types;

pub use codec::{CodecError, EncodeMode, Field, FieldId, FieldValue};
pub use envelope::TxBase;
pub use payment::{build_payment, Payment, PaymentBuilder, PaymentFields};
pub use signing::{
    sign_payment, signing_hash, transaction_id, verify_signature, SignedPayment, SigningError,
    SigningParams,
};
pub use types::{Blob, HexHash, PaymentFlags, TransactionType};
