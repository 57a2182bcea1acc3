//! Crate-wide error type.
//!
//! Each module has its own error enum. [`TxError`] wraps all of them so a
//! caller running the whole build → sign → submit pipeline can use one
//! `Result` type and still match on the stage that failed.

use thiserror::Error;

use crate::crypto::keys::KeyError;
use crate::network::SubmitError;
use crate::transaction::codec::CodecError;
use crate::transaction::signing::SigningError;
use crate::types::ParseError;

/// Any failure in the signing pipeline.
#[derive(Debug, Error)]
pub enum TxError {
    /// A user-supplied account, amount, currency, or path is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Seed decoding or key derivation failed.
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Canonical encoding or decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl TxError {
    /// Short name of the failing stage, for log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Key(_) => "derive",
            Self::Signing(_) => "sign",
            Self::Codec(_) => "encode",
            Self::Submit(_) => "submit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_each_stage() {
        let parse: TxError = ParseError::Currency("??".to_string()).into();
        assert_eq!(parse.stage(), "parse");
        assert_eq!(parse.to_string(), "invalid currency '??'");

        let sign: TxError = SigningError::InvalidSequence.into();
        assert_eq!(sign.stage(), "sign");

        let submit: TxError = SubmitError::ConnectionClosed.into();
        assert_eq!(submit.stage(), "submit");
        assert_eq!(
            submit.to_string(),
            "connection closed before a response arrived"
        );
    }
}
