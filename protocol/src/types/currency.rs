//! Currency codes.
//!
//! On the wire every currency is 20 bytes. Two textual shapes map onto it:
//!
//! - a 3-character code (`USD`) stored at bytes 12..15, everything else zero;
//! - 40 hex digits, stored verbatim (non-standard currencies).
//!
//! The all-zero code is the native currency and prints as `XRP`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::ParseError;
use crate::config::CURRENCY_LENGTH;

/// Characters rippled accepts in a 3-character currency code.
const ISO_SYMBOLS: &str = "?!@#$%^&*<>(){}[]|";

/// A 20-byte currency code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Currency([u8; CURRENCY_LENGTH]);

impl Currency {
    /// The native currency (all zeros).
    pub const XRP: Currency = Currency([0u8; CURRENCY_LENGTH]);

    pub const fn from_bytes(bytes: [u8; CURRENCY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CURRENCY_LENGTH] {
        &self.0
    }

    pub fn is_native(&self) -> bool {
        *self == Self::XRP
    }

    /// Returns the 3-character code if this is a standard currency.
    pub fn iso_code(&self) -> Option<&str> {
        let b = &self.0;
        let padded = b[..12].iter().chain(&b[15..]).all(|&x| x == 0);
        if !padded || self.is_native() {
            return None;
        }
        std::str::from_utf8(&b[12..15]).ok()
    }
}

impl FromStr for Currency {
    type Err = ParseError;

    /// Parses `XRP`, a 3-character code, or 40 hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "XRP" {
            return Ok(Self::XRP);
        }

        if s.len() == 3 {
            let valid = s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || ISO_SYMBOLS.contains(c));
            if !valid {
                return Err(ParseError::Currency(s.to_string()));
            }
            let mut bytes = [0u8; CURRENCY_LENGTH];
            bytes[12..15].copy_from_slice(s.as_bytes());
            return Ok(Self(bytes));
        }

        if s.len() == 2 * CURRENCY_LENGTH {
            let decoded = hex::decode(s).map_err(|_| ParseError::Currency(s.to_string()))?;
            let mut bytes = [0u8; CURRENCY_LENGTH];
            bytes.copy_from_slice(&decoded);
            return Ok(Self(bytes));
        }

        Err(ParseError::Currency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            return f.write_str("XRP");
        }
        match self.iso_code() {
            Some(code) => f.write_str(code),
            None => f.write_str(&hex::encode_upper(self.0)),
        }
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_code_layout() {
        let usd: Currency = "USD".parse().unwrap();
        assert_eq!(&usd.as_bytes()[12..15], b"USD");
        assert_eq!(usd.to_string(), "USD");
        assert!(!usd.is_native());
    }

    #[test]
    fn xrp_is_all_zero() {
        let xrp: Currency = "XRP".parse().unwrap();
        assert!(xrp.is_native());
        assert_eq!(xrp.to_string(), "XRP");
    }

    #[test]
    fn hex_codes_round_trip() {
        let code = "0158415500000000C1F76FF6ECB0BAC600000000";
        let c: Currency = code.parse().unwrap();
        assert_eq!(c.to_string(), code);
        assert!(c.iso_code().is_none());
    }

    #[test]
    fn rejects_bad_lengths_and_characters() {
        assert!("US".parse::<Currency>().is_err());
        assert!("USDT".parse::<Currency>().is_err());
        assert!("U D".parse::<Currency>().is_err());
        assert!("zz58415500000000C1F76FF6ECB0BAC600000000"
            .parse::<Currency>()
            .is_err());
    }
}
