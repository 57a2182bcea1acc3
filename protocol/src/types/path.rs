//! Payment paths.
//!
//! A path set is a list of alternative routes; a route is a list of steps.
//! On the command line:
//!
//! ```text
//! --paths "USD/rIssuerA => rHop, XRP => EUR/rIssuerB"
//!          \_____ path 1 _____/  \_____ path 2 _____/
//! ```
//!
//! Paths are comma-separated, steps are `=>`-separated, and each step is one
//! of `XRP`, `CUR`, `CUR/issuer`, or an account address.
//!
//! Wire form: each step is a type byte (`0x01` account, `0x10` currency,
//! `0x20` issuer, OR-ed) followed by the 20-byte fields it announces; `0xFF`
//! separates paths and `0x00` ends the set.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::str::FromStr;

use super::account::AccountId;
use super::currency::Currency;
use super::error::ParseError;

const STEP_ACCOUNT: u8 = 0x01;
const STEP_CURRENCY: u8 = 0x10;
const STEP_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATHSET_END: u8 = 0x00;

// ---------------------------------------------------------------------------
// PathStep
// ---------------------------------------------------------------------------

/// One hop of a path: rippling through an account, or converting into a
/// currency (optionally pinned to an issuer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathStep {
    pub account: Option<AccountId>,
    pub currency: Option<Currency>,
    pub issuer: Option<AccountId>,
}

impl PathStep {
    /// A hop through an account.
    pub fn account(account: AccountId) -> Self {
        Self {
            account: Some(account),
            ..Self::default()
        }
    }

    /// A hop into a currency, optionally from a specific issuer.
    pub fn currency(currency: Currency, issuer: Option<AccountId>) -> Self {
        Self {
            currency: Some(currency),
            issuer,
            ..Self::default()
        }
    }

    fn type_byte(&self) -> u8 {
        let mut t = 0;
        if self.account.is_some() {
            t |= STEP_ACCOUNT;
        }
        if self.currency.is_some() {
            t |= STEP_CURRENCY;
        }
        if self.issuer.is_some() {
            t |= STEP_ISSUER;
        }
        t
    }
}

impl FromStr for PathStep {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let step = s.trim();
        if step.is_empty() {
            return Err(ParseError::path(s, "empty step"));
        }

        if let Some((currency, issuer)) = step.split_once('/') {
            let currency: Currency = currency.trim().parse()?;
            let issuer = AccountId::from_address(issuer.trim())?;
            return Ok(Self::currency(currency, Some(issuer)));
        }

        // Currency codes are exactly 3 or 40 characters; addresses are 25+.
        if step.len() == 3 || step.len() == 40 {
            let currency: Currency = step.parse()?;
            return Ok(Self::currency(currency, None));
        }

        Ok(Self::account(AccountId::from_address(step)?))
    }
}

impl Serialize for PathStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(account) = &self.account {
            map.serialize_entry("account", account)?;
        }
        if let Some(currency) = &self.currency {
            map.serialize_entry("currency", currency)?;
        }
        if let Some(issuer) = &self.issuer {
            map.serialize_entry("issuer", issuer)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Path / PathSet
// ---------------------------------------------------------------------------

/// An ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Path(pub Vec<PathStep>);

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseError::path(s, "empty path"));
        }
        s.split("=>")
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

/// Alternative paths for a payment.
///
/// ```
/// use rtx_protocol::types::PathSet;
///
/// let set: PathSet = "XRP => USD/rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh, EUR".parse().unwrap();
/// assert_eq!(set.0.len(), 2);
/// assert_eq!(set.0[0].0.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PathSet(pub Vec<Path>);

impl PathSet {
    /// Appends the canonical binary form.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                buf.push(PATH_SEPARATOR);
            }
            for step in &path.0 {
                buf.push(step.type_byte());
                if let Some(account) = &step.account {
                    buf.extend_from_slice(account.as_bytes());
                }
                if let Some(currency) = &step.currency {
                    buf.extend_from_slice(currency.as_bytes());
                }
                if let Some(issuer) = &step.issuer {
                    buf.extend_from_slice(issuer.as_bytes());
                }
            }
        }
        buf.push(PATHSET_END);
    }

    /// Reads a path set from the front of `bytes`, returning it and the
    /// number of bytes consumed.
    pub fn read_from(bytes: &[u8]) -> Result<(Self, usize), String> {
        let mut pos = 0;
        let mut paths = Vec::new();
        let mut current = Vec::new();

        let take20 = |pos: &mut usize| -> Result<[u8; 20], String> {
            let slice = bytes
                .get(*pos..*pos + 20)
                .ok_or_else(|| "truncated path step".to_string())?;
            *pos += 20;
            let mut out = [0u8; 20];
            out.copy_from_slice(slice);
            Ok(out)
        };

        loop {
            let t = *bytes.get(pos).ok_or_else(|| "unterminated path set".to_string())?;
            pos += 1;
            match t {
                PATHSET_END | PATH_SEPARATOR => {
                    if current.is_empty() {
                        return Err("empty path in path set".to_string());
                    }
                    paths.push(Path(std::mem::take(&mut current)));
                    if t == PATHSET_END {
                        return Ok((PathSet(paths), pos));
                    }
                }
                t if t & !(STEP_ACCOUNT | STEP_CURRENCY | STEP_ISSUER) == 0 => {
                    let mut step = PathStep::default();
                    if t & STEP_ACCOUNT != 0 {
                        step.account = Some(AccountId::from_bytes(take20(&mut pos)?));
                    }
                    if t & STEP_CURRENCY != 0 {
                        step.currency = Some(Currency::from_bytes(take20(&mut pos)?));
                    }
                    if t & STEP_ISSUER != 0 {
                        step.issuer = Some(AccountId::from_bytes(take20(&mut pos)?));
                    }
                    current.push(step);
                }
                other => return Err(format!("unknown path step type {other:#04x}")),
            }
        }
    }
}

impl FromStr for PathSet {
    type Err = ParseError;

    /// Parses comma-separated paths. Every segment is validated on its own;
    /// the first bad one fails the whole set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(PathSet)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HOP: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    #[test]
    fn step_kinds() {
        let xrp: PathStep = "XRP".parse().unwrap();
        assert_eq!(xrp.currency, Some(Currency::XRP));
        assert_eq!(xrp.type_byte(), STEP_CURRENCY);

        let pinned: PathStep = format!("USD/{HOP}").parse().unwrap();
        assert_eq!(pinned.type_byte(), STEP_CURRENCY | STEP_ISSUER);

        let hop: PathStep = HOP.parse().unwrap();
        assert_eq!(hop.type_byte(), STEP_ACCOUNT);
    }

    #[test]
    fn multiple_paths_keep_order() {
        let set: PathSet = format!("USD/{HOP} => {HOP}, XRP").parse().unwrap();
        assert_eq!(set.0.len(), 2);
        assert_eq!(set.0[0].0[1], PathStep::account(HOP.parse().unwrap()));
        assert_eq!(set.0[1].0[0], PathStep::currency(Currency::XRP, None));
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!("USD,,EUR".parse::<PathSet>().is_err());
        assert!("USD => => EUR".parse::<PathSet>().is_err());
        assert!("".parse::<PathSet>().is_err());
    }

    #[test]
    fn bad_segment_fails_whole_set() {
        let err = "USD, rNotAnAccount".parse::<PathSet>().unwrap_err();
        assert!(matches!(err, ParseError::Account { .. }));
    }

    #[test]
    fn wire_form_layout() {
        let set: PathSet = "USD, XRP".parse().unwrap();
        let mut buf = Vec::new();
        set.write_to(&mut buf);
        // type, 20 bytes, separator, type, 20 bytes, end
        assert_eq!(buf.len(), 1 + 20 + 1 + 1 + 20 + 1);
        assert_eq!(buf[0], STEP_CURRENCY);
        assert_eq!(buf[21], PATH_SEPARATOR);
        assert_eq!(*buf.last().unwrap(), PATHSET_END);
    }

    #[test]
    fn wire_form_reads_back() {
        let set: PathSet = format!("USD/{HOP} => {HOP}, XRP => EUR").parse().unwrap();
        let mut buf = Vec::new();
        set.write_to(&mut buf);
        buf.extend_from_slice(b"trailing");
        let (back, used) = PathSet::read_from(&buf).unwrap();
        assert_eq!(back, set);
        assert_eq!(used, buf.len() - b"trailing".len());
    }

    #[test]
    fn unknown_step_type_is_rejected() {
        assert!(PathSet::read_from(&[0x02, 0x00]).is_err());
    }

    #[test]
    fn json_is_nested_arrays() {
        let set: PathSet = format!("USD/{HOP}").parse().unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([[{"currency": "USD", "issuer": HOP}]])
        );
    }
}
