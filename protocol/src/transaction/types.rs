//! Core type definitions for transactions.
//!
//! Small value types shared by the envelope, the payment, and the codec:
//! the transaction type discriminant, payment flags, and the hex-rendered
//! byte wrappers used for blobs and 256-bit hashes.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::config::{TF_LIMIT_QUALITY, TF_NO_DIRECT_RIPPLE, TF_PARTIAL_PAYMENT};
use crate::crypto::hash::Hash256;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction represents.
///
/// Only payments are supported. The enum exists so the wire code and the
/// JSON name come from one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionType {
    /// Value transfer from `Account` to `Destination`.
    Payment,
}

impl TransactionType {
    /// The UInt16 value stored in the `TransactionType` field.
    pub fn code(self) -> u16 {
        match self {
            Self::Payment => 0,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Payment),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payment => write!(f, "Payment"),
        }
    }
}

// ---------------------------------------------------------------------------
// PaymentFlags
// ---------------------------------------------------------------------------

/// The three payment-specific flags.
///
/// The mask is a plain bitwise OR of the set flags: no flag changes the
/// meaning of another, and order of assignment is irrelevant.
///
/// ```
/// use rtx_protocol::transaction::PaymentFlags;
///
/// let flags = PaymentFlags { partial_payment: true, limit_quality: true, ..Default::default() };
/// assert_eq!(flags.bits(), 0x0002_0000 | 0x0004_0000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaymentFlags {
    pub no_direct_ripple: bool,
    pub partial_payment: bool,
    pub limit_quality: bool,
}

impl PaymentFlags {
    pub fn bits(&self) -> u32 {
        let mut mask = 0;
        if self.no_direct_ripple {
            mask |= TF_NO_DIRECT_RIPPLE;
        }
        if self.partial_payment {
            mask |= TF_PARTIAL_PAYMENT;
        }
        if self.limit_quality {
            mask |= TF_LIMIT_QUALITY;
        }
        mask
    }

    /// Recovers the payment flags present in a raw mask. Other bits are
    /// ignored.
    pub fn from_bits(mask: u32) -> Self {
        Self {
            no_direct_ripple: mask & TF_NO_DIRECT_RIPPLE != 0,
            partial_payment: mask & TF_PARTIAL_PAYMENT != 0,
            limit_quality: mask & TF_LIMIT_QUALITY != 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Blob / HexHash
// ---------------------------------------------------------------------------

/// Variable-length bytes (signatures, keys). JSON form is upper-case hex.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.0))
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob({})", self)
    }
}

impl Serialize for Blob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A 256-bit hash rendered as upper-case hex (transaction ids, invoice ids).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexHash(pub Hash256);

impl HexHash {
    pub fn as_bytes(&self) -> &Hash256 {
        &self.0
    }
}

impl fmt::Display for HexHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for HexHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexHash({})", self)
    }
}

impl Serialize for HexHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_code_is_zero() {
        assert_eq!(TransactionType::Payment.code(), 0);
        assert_eq!(TransactionType::from_code(0), Some(TransactionType::Payment));
        assert_eq!(TransactionType::from_code(3), None);
    }

    #[test]
    fn payment_type_serializes_by_name() {
        let json = serde_json::to_string(&TransactionType::Payment).unwrap();
        assert_eq!(json, "\"Payment\"");
    }

    #[test]
    fn every_flag_subset_is_the_or_of_its_bits() {
        let bits = [TF_NO_DIRECT_RIPPLE, TF_PARTIAL_PAYMENT, TF_LIMIT_QUALITY];
        for subset in 0u8..8 {
            let flags = PaymentFlags {
                no_direct_ripple: subset & 1 != 0,
                partial_payment: subset & 2 != 0,
                limit_quality: subset & 4 != 0,
            };
            let expected = bits
                .iter()
                .enumerate()
                .filter(|(i, _)| subset & (1 << i) != 0)
                .fold(0, |acc, (_, b)| acc | b);
            assert_eq!(flags.bits(), expected, "subset {subset:03b}");
            assert_eq!(PaymentFlags::from_bits(flags.bits()), flags);
        }
    }

    #[test]
    fn hex_wrappers_render_upper_case() {
        assert_eq!(Blob(vec![0xab, 0x01]).to_string(), "AB01");
        assert_eq!(HexHash([0xff; 32]).to_string(), "F".repeat(64));
    }
}
