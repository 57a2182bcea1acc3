//! Parse failures for user-supplied ledger values.

use thiserror::Error;

use crate::crypto::base58::Base58Error;

/// A textual account, amount, currency, or path did not match its grammar.
///
/// Every variant carries the offending input so the message printed at the
/// top level is enough to find the bad flag.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The string is not a checksum-valid account address.
    #[error("invalid account '{input}': {source}")]
    Account {
        /// The rejected input.
        input: String,
        /// Why base58check decoding failed.
        source: Base58Error,
    },

    /// The string is not a valid native or issued amount.
    #[error("invalid amount '{input}': {reason}")]
    Amount {
        /// The rejected input.
        input: String,
        /// Which rule it broke.
        reason: String,
    },

    /// The currency code is neither a 3-character code nor 40 hex digits.
    #[error("invalid currency '{0}'")]
    Currency(String),

    /// A path segment could not be parsed.
    #[error("invalid path '{input}': {reason}")]
    Path {
        /// The rejected segment.
        input: String,
        /// Which rule it broke.
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn amount(input: &str, reason: impl Into<String>) -> Self {
        Self::Amount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn path(input: &str, reason: impl Into<String>) -> Self {
        Self::Path {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
