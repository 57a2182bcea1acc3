//! Account identifiers.
//!
//! An account id is the 20-byte RIPEMD-160(SHA-256) hash of a public key.
//! Humans see it as a base58check address starting with `r`:
//!
//! ```text
//! public_key (33 bytes)
//!     -> RIPEMD160(SHA256(public_key)) -> 20 bytes
//!     -> base58check(0x00, hash)       -> rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh
//! ```

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::ParseError;
use crate::config::{ACCOUNT_ID_LENGTH, ACCOUNT_ID_VERSION};
use crate::crypto::base58::{decode_check, encode_check};

/// A 20-byte ledger account identifier.
///
/// # Examples
///
/// ```
/// use rtx_protocol::types::AccountId;
///
/// let zero: AccountId = "rrrrrrrrrrrrrrrrrrrrrhoLvTp".parse().unwrap();
/// assert_eq!(zero, AccountId::ZERO);
/// assert_eq!(zero.to_address(), "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId([u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    /// The all-zero account. Used as the implicit issuer when none is given.
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_ID_LENGTH]);

    /// Wraps raw account id bytes.
    pub const fn from_bytes(bytes: [u8; ACCOUNT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses a base58check address, verifying version byte and checksum.
    pub fn from_address(address: &str) -> Result<Self, ParseError> {
        let payload = decode_check(address, ACCOUNT_ID_VERSION, ACCOUNT_ID_LENGTH).map_err(
            |source| ParseError::Account {
                input: address.to_string(),
                source,
            },
        )?;
        let mut bytes = [0u8; ACCOUNT_ID_LENGTH];
        bytes.copy_from_slice(&payload);
        Ok(Self(bytes))
    }

    /// Encodes the id as an `r...` address.
    pub fn to_address(&self) -> String {
        encode_check(ACCOUNT_ID_VERSION, &self.0)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ACCOUNT_ID_LENGTH]
    }
}

impl FromStr for AccountId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_address(s.trim())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_address())
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::base58::Base58Error;

    #[test]
    fn genesis_address_round_trips() {
        let addr = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
        let id = AccountId::from_address(addr).unwrap();
        assert_eq!(id.to_address(), addr);
        assert!(!id.is_zero());
    }

    #[test]
    fn account_one_is_not_zero() {
        let one: AccountId = "rrrrrrrrrrrrrrrrrrrrBZbvji".parse().unwrap();
        let mut expected = [0u8; ACCOUNT_ID_LENGTH];
        expected[19] = 1;
        assert_eq!(one.as_bytes(), &expected);
    }

    #[test]
    fn bad_checksum_reports_input() {
        let err = AccountId::from_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTi").unwrap_err();
        match err {
            ParseError::Account { input, source } => {
                assert_eq!(input, "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTi");
                assert_eq!(source, Base58Error::Checksum);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(AccountId::from_address("").is_err());
    }

    #[test]
    fn serializes_as_address_string() {
        let json = serde_json::to_string(&AccountId::ZERO).unwrap();
        assert_eq!(json, "\"rrrrrrrrrrrrrrrrrrrrrhoLvTp\"");
    }
}
