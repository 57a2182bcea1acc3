//! Amounts: native drops or issued-currency values.
//!
//! Textual grammar, as accepted on the command line:
//!
//! ```text
//! 1000000             native, in drops
//! 1.5                 native, in whole XRP (scaled to 1500000 drops)
//! 25/XRP              native, in drops
//! 12.34/USD           issued, zero issuer
//! 12.34/USD/rIssuer   issued
//! -1e-3/USD/rIssuer   issued, signed, scientific
//! ```
//!
//! Issued values are decimal floating point: a 16-digit mantissa and a
//! power-of-ten exponent in [-96, 80]. No `f64` anywhere. Float rounding is
//! not something you want in a signed payment.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::account::AccountId;
use super::currency::Currency;
use super::error::ParseError;
use crate::config::{
    DROPS_PER_XRP, MAX_EXPONENT, MAX_MANTISSA, MAX_NATIVE_DROPS, MIN_EXPONENT, MIN_MANTISSA,
};

/// Bit 63: set for issued amounts.
const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
/// Bit 62: set for positive values.
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
/// Low 54 bits: issued mantissa.
const MANTISSA_MASK: u64 = (1 << 54) - 1;
/// Exponents are stored with this bias.
const EXPONENT_BIAS: i32 = 97;
/// Digits kept while accumulating a mantissa; more than fit in 16, so
/// normalization rounds down rather than the parser.
const MAX_PARSE_DIGITS: u32 = 18;

// ---------------------------------------------------------------------------
// IssuedValue
// ---------------------------------------------------------------------------

/// A normalized decimal value: `(-1)^negative * mantissa * 10^exponent`.
///
/// Non-zero values always have `MIN_MANTISSA <= mantissa <= MAX_MANTISSA`.
/// Zero is `mantissa == 0, exponent == 0, negative == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssuedValue {
    negative: bool,
    mantissa: u64,
    exponent: i32,
}

impl IssuedValue {
    pub const ZERO: IssuedValue = IssuedValue {
        negative: false,
        mantissa: 0,
        exponent: 0,
    };

    /// Builds a value and normalizes it into canonical range.
    ///
    /// Values too small to represent become zero; values too large are an
    /// error.
    pub fn new(negative: bool, mantissa: u64, exponent: i32) -> Result<Self, String> {
        if mantissa == 0 {
            return Ok(Self::ZERO);
        }
        let mut mantissa = mantissa;
        let mut exponent = exponent;
        while mantissa < MIN_MANTISSA && exponent > MIN_EXPONENT {
            mantissa *= 10;
            exponent -= 1;
        }
        while mantissa > MAX_MANTISSA {
            if exponent >= MAX_EXPONENT {
                return Err("value too large".to_string());
            }
            mantissa /= 10;
            exponent += 1;
        }
        if exponent < MIN_EXPONENT || mantissa < MIN_MANTISSA {
            return Ok(Self::ZERO);
        }
        if exponent > MAX_EXPONENT {
            return Err("value too large".to_string());
        }
        Ok(Self {
            negative,
            mantissa,
            exponent,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// The 64-bit wire form (without currency and issuer).
    pub fn to_bits(&self) -> u64 {
        if self.is_zero() {
            return NOT_NATIVE_BIT;
        }
        let mut bits = NOT_NATIVE_BIT | self.mantissa;
        if !self.negative {
            bits |= POSITIVE_BIT;
        }
        bits | (((self.exponent + EXPONENT_BIAS) as u64) << 54)
    }

    /// Inverse of [`to_bits`](Self::to_bits). Rejects native-tagged input.
    pub fn from_bits(bits: u64) -> Result<Self, String> {
        if bits & NOT_NATIVE_BIT == 0 {
            return Err("native amount where issued expected".to_string());
        }
        let mantissa = bits & MANTISSA_MASK;
        if mantissa == 0 {
            return Ok(Self::ZERO);
        }
        let exponent = ((bits >> 54) & 0xFF) as i32 - EXPONENT_BIAS;
        let negative = bits & POSITIVE_BIT == 0;
        let value = Self::new(negative, mantissa, exponent)?;
        if value.mantissa != mantissa || value.exponent != exponent {
            return Err("issued amount is not normalized".to_string());
        }
        Ok(value)
    }
}

impl FromStr for IssuedValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (number, exp_part) = match unsigned.find(['e', 'E']) {
            Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
            None => (unsigned, None),
        };

        let (int_part, frac_part) = match number.split_once('.') {
            Some((i, f)) => (i, f),
            None => (number, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err("no digits".to_string());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err("not a decimal number".to_string());
        }

        let mut mantissa: u64 = 0;
        let mut exponent: i32 = 0;
        let mut significant: u32 = 0;

        for d in int_part.bytes().map(|b| u64::from(b - b'0')) {
            if significant < MAX_PARSE_DIGITS {
                mantissa = mantissa * 10 + d;
                if mantissa != 0 {
                    significant += 1;
                }
            } else {
                exponent += 1;
            }
        }
        for d in frac_part.bytes().map(|b| u64::from(b - b'0')) {
            if significant >= MAX_PARSE_DIGITS {
                break;
            }
            mantissa = mantissa * 10 + d;
            exponent -= 1;
            if mantissa != 0 {
                significant += 1;
            }
        }

        if let Some(exp) = exp_part {
            let exp: i32 = exp
                .parse()
                .map_err(|_| format!("invalid exponent '{exp}'"))?;
            exponent = exponent
                .checked_add(exp)
                .ok_or_else(|| "exponent out of range".to_string())?;
        }

        Self::new(negative, mantissa, exponent)
    }
}

impl fmt::Display for IssuedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut mantissa = self.mantissa;
        let mut exponent = self.exponent;
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exponent += 1;
        }
        if self.negative {
            f.write_str("-")?;
        }
        let digits = mantissa.to_string();
        let len = digits.len() as i32;

        if (0..=10).contains(&exponent) {
            write!(f, "{}{}", digits, "0".repeat(exponent as usize))
        } else if exponent < 0 && -exponent <= len + 20 {
            let point = len + exponent;
            if point > 0 {
                let (whole, frac) = digits.split_at(point as usize);
                write!(f, "{}.{}", whole, frac)
            } else {
                write!(f, "0.{}{}", "0".repeat((-point) as usize), digits)
            }
        } else {
            write!(f, "{}e{}", digits, exponent)
        }
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// An issued-currency amount: value, currency, and issuing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssuedAmount {
    pub value: IssuedValue,
    pub currency: Currency,
    pub issuer: AccountId,
}

/// A payment amount.
///
/// # Examples
///
/// ```
/// use rtx_protocol::types::Amount;
///
/// assert_eq!("1000000".parse::<Amount>().unwrap(), Amount::Native(1_000_000));
/// assert_eq!("1.5".parse::<Amount>().unwrap(), Amount::Native(1_500_000));
/// assert!("1/USD/rrrrrrrrrrrrrrrrrrrrBZbvji".parse::<Amount>().unwrap().is_issued());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Amount {
    /// Native currency, in drops.
    Native(u64),
    /// Issued currency.
    Issued(IssuedAmount),
}

impl Amount {
    /// A native amount in drops, checked against the supply cap.
    pub fn native(drops: u64) -> Result<Self, ParseError> {
        if drops > MAX_NATIVE_DROPS {
            return Err(ParseError::amount(&drops.to_string(), "exceeds native supply"));
        }
        Ok(Self::Native(drops))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    pub fn is_issued(&self) -> bool {
        matches!(self, Self::Issued(_))
    }

    /// Wire size in bytes: 8 for native, 48 for issued.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Native(_) => 8,
            Self::Issued(_) => 48,
        }
    }

    /// Appends the canonical binary form.
    ///
    /// Native drops above the supply cap would overlap the tag bits, so they
    /// are refused rather than written.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<(), String> {
        match self {
            Self::Native(drops) => {
                if *drops > MAX_NATIVE_DROPS {
                    return Err("native amount exceeds supply".to_string());
                }
                buf.extend_from_slice(&(POSITIVE_BIT | drops).to_be_bytes());
            }
            Self::Issued(issued) => {
                buf.extend_from_slice(&issued.value.to_bits().to_be_bytes());
                buf.extend_from_slice(issued.currency.as_bytes());
                buf.extend_from_slice(issued.issuer.as_bytes());
            }
        }
        Ok(())
    }

    /// Reads an amount from the front of `bytes`, returning it and the number
    /// of bytes consumed.
    pub fn read_from(bytes: &[u8]) -> Result<(Self, usize), String> {
        let head: [u8; 8] = bytes
            .get(..8)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| "truncated amount".to_string())?;
        let bits = u64::from_be_bytes(head);

        if bits & NOT_NATIVE_BIT == 0 {
            if bits & POSITIVE_BIT == 0 && bits != 0 {
                return Err("negative native amount".to_string());
            }
            let drops = bits & !POSITIVE_BIT;
            if drops > MAX_NATIVE_DROPS {
                return Err("native amount exceeds supply".to_string());
            }
            return Ok((Self::Native(drops), 8));
        }

        let rest = bytes
            .get(8..48)
            .ok_or_else(|| "truncated issued amount".to_string())?;
        let mut currency = [0u8; 20];
        currency.copy_from_slice(&rest[..20]);
        let mut issuer = [0u8; 20];
        issuer.copy_from_slice(&rest[20..]);

        Ok((
            Self::Issued(IssuedAmount {
                value: IssuedValue::from_bits(bits)?,
                currency: Currency::from_bytes(currency),
                issuer: AccountId::from_bytes(issuer),
            }),
            48,
        ))
    }

    fn parse_native(input: &str, value: &str) -> Result<Self, ParseError> {
        if value.starts_with('-') {
            return Err(ParseError::amount(input, "native amounts cannot be negative"));
        }
        let value = value.strip_prefix('+').unwrap_or(value);

        let drops = match value.split_once('.') {
            None => value
                .parse::<u64>()
                .map_err(|_| ParseError::amount(input, "not a whole number of drops"))?,
            Some((whole, frac)) => {
                let digits_ok = !(whole.is_empty() && frac.is_empty())
                    && whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit());
                if !digits_ok {
                    return Err(ParseError::amount(input, "not a decimal number"));
                }
                if frac.len() > 6 {
                    return Err(ParseError::amount(input, "more than 6 decimal places"));
                }
                let whole: u64 = if whole.is_empty() {
                    0
                } else {
                    whole
                        .parse()
                        .map_err(|_| ParseError::amount(input, "value too large"))?
                };
                let frac_drops: u64 = if frac.is_empty() {
                    0
                } else {
                    let padded = format!("{:0<6}", frac);
                    padded
                        .parse()
                        .map_err(|_| ParseError::amount(input, "not a decimal number"))?
                };
                whole
                    .checked_mul(DROPS_PER_XRP)
                    .and_then(|d| d.checked_add(frac_drops))
                    .ok_or_else(|| ParseError::amount(input, "value too large"))?
            }
        };

        if drops > MAX_NATIVE_DROPS {
            return Err(ParseError::amount(input, "exceeds native supply"));
        }
        Ok(Self::Native(drops))
    }
}

impl FromStr for Amount {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let parts: Vec<&str> = input.split('/').collect();

        match parts.as_slice() {
            [value] => Self::parse_native(input, value),
            [value, "XRP"] => Self::parse_native(input, value),
            [value, currency] | [value, currency, _] => {
                let currency: Currency = currency.parse()?;
                if currency.is_native() {
                    return Err(ParseError::amount(input, "XRP cannot have an issuer"));
                }
                let issuer = match parts.get(2) {
                    Some(addr) => AccountId::from_address(addr)?,
                    None => AccountId::ZERO,
                };
                let value: IssuedValue = value
                    .parse()
                    .map_err(|reason: String| ParseError::amount(input, reason))?;
                Ok(Self::Issued(IssuedAmount {
                    value,
                    currency,
                    issuer,
                }))
            }
            _ => Err(ParseError::amount(input, "expected value[/currency[/issuer]]")),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(drops) => write!(f, "{}", drops),
            Self::Issued(i) => write!(f, "{}/{}/{}", i.value, i.currency, i.issuer),
        }
    }
}

impl Serialize for Amount {
    /// Native amounts are drop strings; issued amounts are
    /// `{"value", "currency", "issuer"}` objects.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Native(drops) => serializer.collect_str(drops),
            Self::Issued(i) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("value", &i.value.to_string())?;
                map.serialize_entry("currency", &i.currency)?;
                map.serialize_entry("issuer", &i.issuer)?;
                map.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
