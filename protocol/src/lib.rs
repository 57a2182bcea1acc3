// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # RTX Protocol: Payment Signing Library
//!
//! Everything needed to turn a family seed and a handful of strings into a
//! signed, submittable ledger payment, and nothing that needs a running
//! ledger to test.
//!
//! ## Architecture
//!
//! - **config**: Version bytes, hash prefixes, flag bits, defaults.
//! - **crypto**: Base58check, hashes, family-seed key derivation, ECDSA.
//! - **types**: Accounts, currencies, amounts, paths: text, wire, and JSON.
//! - **transaction**: Payment construction, canonical codec, signing.
//! - **network**: Websocket submission client.
//! - **error**: [`TxError`], the union of the per-module errors.
//!
//! ## Pipeline
//!
//! ```no_run
//! use rtx_protocol::crypto::derive_key;
//! use rtx_protocol::transaction::{build_payment, sign_payment, PaymentFields, SigningParams};
//!
//! # async fn run() -> Result<(), rtx_protocol::TxError> {
//! let sequence = 1;
//! let key = derive_key("snoPBrXtMeMyMHUVTgbuqAfg1SUTb", sequence)?;
//! let payment = build_payment(&PaymentFields {
//!     destination: "rrrrrrrrrrrrrrrrrrrrBZbvji".into(),
//!     amount: "1000000".into(),
//!     ..Default::default()
//! })?;
//! let signed = sign_payment(
//!     payment,
//!     &key,
//!     &SigningParams { sequence, fee: 10, last_ledger_sequence: None },
//! )?;
//! let result = rtx_protocol::network::submit_blob(
//!     rtx_protocol::config::DEFAULT_ENDPOINT,
//!     signed.blob(),
//!     None,
//! )
//! .await?;
//! println!("{}: {}", result.engine_result, result.engine_result_message);
//! # Ok(())
//! # }
//! ```
//!
//! ## Ground Rules
//!
//! 1. No curve or hash code lives here. RustCrypto does that.
//! 2. No floating point near amounts.
//! 3. No global state: keys are values, passed where they're needed.
//! 4. Nothing in this crate exits the process.

pub mod config;
pub mod crypto;
pub mod error;
pub mod network;
pub mod transaction;
pub mod types;

pub use error::TxError;
