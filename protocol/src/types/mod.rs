//! # Ledger Value Types
//!
//! The vocabulary a payment is written in: accounts, currencies, amounts, and
//! path sets. Each type owns three representations and keeps them in sync:
//!
//! - the **textual** form users type on the command line (`FromStr`),
//! - the **binary** form that goes into the canonical encoding,
//! - the **JSON** form the ledger's APIs print (`Serialize`).
//!
//! Parsing never panics and never guesses: anything that doesn't match the
//! grammar is a [`ParseError`].

pub mod account;
pub mod amount;
pub mod currency;
pub mod error;
pub mod path;

pub use account::AccountId;
pub use amount::{Amount, IssuedAmount, IssuedValue};
pub use currency::Currency;
pub use error::ParseError;
pub use path::{Path, PathSet, PathStep};
