//! Base58check with the ledger's alphabet.
//!
//! Layout of every encoded value: `version (1) || payload || checksum (4)`,
//! where checksum is the first four bytes of double-SHA-256 over
//! `version || payload`. The alphabet is bs58's `RIPPLE` table, which is why
//! accounts begin with `r` and seeds with `s`.

use thiserror::Error;

use super::hash::double_sha256;
use crate::config::CHECKSUM_LENGTH;

/// Failures decoding a base58check string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Base58Error {
    #[error("invalid base58 encoding: {0}")]
    Encoding(String),

    #[error("decoded value too short ({0} bytes)")]
    TooShort(usize),

    #[error("checksum mismatch")]
    Checksum,

    #[error("unexpected version byte: expected {expected:#04x}, got {got:#04x}")]
    Version { expected: u8, got: u8 },

    #[error("unexpected payload length: expected {expected}, got {got}")]
    Length { expected: usize, got: usize },
}

/// Encodes `payload` under `version` with a trailing checksum.
pub fn encode_check(version: u8, payload: &[u8]) -> String {
    let mut buf = Vec::with_capacity(1 + payload.len() + CHECKSUM_LENGTH);
    buf.push(version);
    buf.extend_from_slice(payload);
    let checksum = double_sha256(&buf);
    buf.extend_from_slice(&checksum[..CHECKSUM_LENGTH]);
    bs58::encode(buf)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

/// Decodes a base58check string, verifying checksum, version, and length.
///
/// Returns the payload without the version byte.
pub fn decode_check(input: &str, version: u8, length: usize) -> Result<Vec<u8>, Base58Error> {
    let raw = bs58::decode(input)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| Base58Error::Encoding(e.to_string()))?;

    if raw.len() < 1 + CHECKSUM_LENGTH {
        return Err(Base58Error::TooShort(raw.len()));
    }

    let (body, checksum) = raw.split_at(raw.len() - CHECKSUM_LENGTH);
    if double_sha256(body)[..CHECKSUM_LENGTH] != *checksum {
        return Err(Base58Error::Checksum);
    }

    if body[0] != version {
        return Err(Base58Error::Version {
            expected: version,
            got: body[0],
        });
    }

    let payload = &body[1..];
    if payload.len() != length {
        return Err(Base58Error::Length {
            expected: length,
            got: payload.len(),
        });
    }

    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ACCOUNT_ID_LENGTH, ACCOUNT_ID_VERSION, FAMILY_SEED_VERSION};

    #[test]
    fn zero_account_encodes_to_well_known_address() {
        let encoded = encode_check(ACCOUNT_ID_VERSION, &[0u8; ACCOUNT_ID_LENGTH]);
        assert_eq!(encoded, "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
    }

    #[test]
    fn decode_recovers_payload() {
        let payload = [7u8; ACCOUNT_ID_LENGTH];
        let encoded = encode_check(ACCOUNT_ID_VERSION, &payload);
        let decoded = decode_check(&encoded, ACCOUNT_ID_VERSION, ACCOUNT_ID_LENGTH).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn flipped_character_fails_checksum() {
        // Last char of the zero account swapped for another alphabet char.
        let err = decode_check("rrrrrrrrrrrrrrrrrrrrrhoLvTr", ACCOUNT_ID_VERSION, ACCOUNT_ID_LENGTH)
            .unwrap_err();
        assert_eq!(err, Base58Error::Checksum);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let err = decode_check(
            "rrrrrrrrrrrrrrrrrrrrrhoLvTp",
            FAMILY_SEED_VERSION,
            ACCOUNT_ID_LENGTH,
        )
        .unwrap_err();
        assert!(matches!(err, Base58Error::Version { got: 0, .. }));
    }

    #[test]
    fn characters_outside_alphabet_are_rejected() {
        // '0' and 'l' are not in the alphabet.
        let err = decode_check("r0l", ACCOUNT_ID_VERSION, ACCOUNT_ID_LENGTH).unwrap_err();
        assert!(matches!(err, Base58Error::Encoding(_)));
    }
}
