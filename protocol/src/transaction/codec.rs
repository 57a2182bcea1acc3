//! Canonical binary encoding.
//!
//! A transaction on the wire is a sequence of `(header, value)` pairs sorted
//! by `(type code, field code)`. The header packs both codes into one to
//! three bytes:
//!
//! ```text
//! type < 16, field < 16    [type << 4 | field]
//! type >= 16, field < 16   [field] [type]
//! type < 16, field >= 16   [type << 4] [field]
//! both >= 16               [0] [type] [field]
//! ```
//!
//! Blobs and account ids are length-prefixed (1 to 3 bytes). Sorting makes
//! the encoding canonical: the same fields always produce the same bytes,
//! which is what makes the signature and the transaction id well defined.
//!
//! The decoder is strict: unknown fields, duplicates, out-of-order fields and
//! trailing garbage are all errors.

use thiserror::Error;

use crate::config::ACCOUNT_ID_LENGTH;
use crate::types::{AccountId, Amount, PathSet};

use super::types::{Blob, HexHash};

const TYPE_UINT16: u8 = 1;
const TYPE_UINT32: u8 = 2;
const TYPE_HASH256: u8 = 5;
const TYPE_AMOUNT: u8 = 6;
const TYPE_BLOB: u8 = 7;
const TYPE_ACCOUNT_ID: u8 = 8;
const TYPE_PATHSET: u8 = 18;

/// Largest length a variable-length prefix can express.
const MAX_VL_LENGTH: usize = 918_744;

/// Errors from encoding or decoding the canonical form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("duplicate field {0}")]
    DuplicateField(&'static str),

    #[error("field {0} is out of canonical order")]
    OutOfOrder(&'static str),

    #[error("unknown field (type {type_code}, field {field_code})")]
    UnknownField { type_code: u8, field_code: u8 },

    #[error("field {0} carries a value of the wrong type")]
    TypeMismatch(&'static str),

    #[error("input ended while reading {0}")]
    Truncated(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("field {0} is not allowed in this transaction type")]
    UnexpectedField(&'static str),

    #[error("unsupported transaction type code {0}")]
    UnsupportedType(u16),

    #[error("{0} bytes exceed the maximum encodable length")]
    TooLong(usize),
}

// ---------------------------------------------------------------------------
// FieldId
// ---------------------------------------------------------------------------

/// The fields a payment can carry, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    TransactionType,
    Flags,
    Sequence,
    DestinationTag,
    LastLedgerSequence,
    InvoiceId,
    Amount,
    Fee,
    SendMax,
    SigningPubKey,
    TxnSignature,
    Account,
    Destination,
    Paths,
}

impl FieldId {
    const ALL: [FieldId; 14] = [
        FieldId::TransactionType,
        FieldId::Flags,
        FieldId::Sequence,
        FieldId::DestinationTag,
        FieldId::LastLedgerSequence,
        FieldId::InvoiceId,
        FieldId::Amount,
        FieldId::Fee,
        FieldId::SendMax,
        FieldId::SigningPubKey,
        FieldId::TxnSignature,
        FieldId::Account,
        FieldId::Destination,
        FieldId::Paths,
    ];

    /// `(type code, field code)`.
    pub fn codes(self) -> (u8, u8) {
        match self {
            Self::TransactionType => (TYPE_UINT16, 2),
            Self::Flags => (TYPE_UINT32, 2),
            Self::Sequence => (TYPE_UINT32, 4),
            Self::DestinationTag => (TYPE_UINT32, 14),
            Self::LastLedgerSequence => (TYPE_UINT32, 27),
            Self::InvoiceId => (TYPE_HASH256, 17),
            Self::Amount => (TYPE_AMOUNT, 1),
            Self::Fee => (TYPE_AMOUNT, 8),
            Self::SendMax => (TYPE_AMOUNT, 9),
            Self::SigningPubKey => (TYPE_BLOB, 3),
            Self::TxnSignature => (TYPE_BLOB, 4),
            Self::Account => (TYPE_ACCOUNT_ID, 1),
            Self::Destination => (TYPE_ACCOUNT_ID, 3),
            Self::Paths => (TYPE_PATHSET, 1),
        }
    }

    pub fn from_codes(type_code: u8, field_code: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.codes() == (type_code, field_code))
    }

    /// The JSON / ledger name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::TransactionType => "TransactionType",
            Self::Flags => "Flags",
            Self::Sequence => "Sequence",
            Self::DestinationTag => "DestinationTag",
            Self::LastLedgerSequence => "LastLedgerSequence",
            Self::InvoiceId => "InvoiceID",
            Self::Amount => "Amount",
            Self::Fee => "Fee",
            Self::SendMax => "SendMax",
            Self::SigningPubKey => "SigningPubKey",
            Self::TxnSignature => "TxnSignature",
            Self::Account => "Account",
            Self::Destination => "Destination",
            Self::Paths => "Paths",
        }
    }

    /// Whether the field is covered by the signature.
    pub fn is_signing_field(self) -> bool {
        self != Self::TxnSignature
    }
}

// ---------------------------------------------------------------------------
// Field / FieldValue
// ---------------------------------------------------------------------------

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    UInt16(u16),
    UInt32(u32),
    Hash256(HexHash),
    Amount(Amount),
    Blob(Blob),
    AccountId(AccountId),
    PathSet(PathSet),
}

impl FieldValue {
    fn type_code(&self) -> u8 {
        match self {
            Self::UInt16(_) => TYPE_UINT16,
            Self::UInt32(_) => TYPE_UINT32,
            Self::Hash256(_) => TYPE_HASH256,
            Self::Amount(_) => TYPE_AMOUNT,
            Self::Blob(_) => TYPE_BLOB,
            Self::AccountId(_) => TYPE_ACCOUNT_ID,
            Self::PathSet(_) => TYPE_PATHSET,
        }
    }
}

/// One `(id, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: FieldId,
    pub value: FieldValue,
}

impl Field {
    pub fn new(id: FieldId, value: FieldValue) -> Self {
        Self { id, value }
    }
}

/// Which fields an encoding covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// Every field: the blob that gets submitted and hashed into the id.
    Full,
    /// Everything but the signature: the bytes that get signed.
    Signing,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encodes fields in canonical order.
///
/// Input order does not matter. Duplicate ids and values of the wrong type
/// are rejected.
pub fn encode(fields: &[Field], mode: EncodeMode) -> Result<Vec<u8>, CodecError> {
    let mut sorted: Vec<&Field> = fields
        .iter()
        .filter(|f| mode == EncodeMode::Full || f.id.is_signing_field())
        .collect();
    sorted.sort_by_key(|f| f.id.codes());

    let mut buf = Vec::with_capacity(256);
    let mut previous: Option<FieldId> = None;

    for field in sorted {
        if previous == Some(field.id) {
            return Err(CodecError::DuplicateField(field.id.name()));
        }
        previous = Some(field.id);

        let (type_code, field_code) = field.id.codes();
        if field.value.type_code() != type_code {
            return Err(CodecError::TypeMismatch(field.id.name()));
        }

        write_header(type_code, field_code, &mut buf);
        match &field.value {
            FieldValue::UInt16(v) => buf.extend_from_slice(&v.to_be_bytes()),
            FieldValue::UInt32(v) => buf.extend_from_slice(&v.to_be_bytes()),
            FieldValue::Hash256(h) => buf.extend_from_slice(h.as_bytes()),
            FieldValue::Amount(a) => {
                a.write_to(&mut buf)
                    .map_err(|reason| CodecError::InvalidValue {
                        field: field.id.name(),
                        reason,
                    })?
            }
            FieldValue::Blob(b) => {
                write_vl_length(b.as_bytes().len(), &mut buf)?;
                buf.extend_from_slice(b.as_bytes());
            }
            FieldValue::AccountId(a) => {
                write_vl_length(ACCOUNT_ID_LENGTH, &mut buf)?;
                buf.extend_from_slice(a.as_bytes());
            }
            FieldValue::PathSet(p) => p.write_to(&mut buf),
        }
    }

    Ok(buf)
}

fn write_header(type_code: u8, field_code: u8, buf: &mut Vec<u8>) {
    match (type_code < 16, field_code < 16) {
        (true, true) => buf.push(type_code << 4 | field_code),
        (false, true) => buf.extend_from_slice(&[field_code, type_code]),
        (true, false) => buf.extend_from_slice(&[type_code << 4, field_code]),
        (false, false) => buf.extend_from_slice(&[0, type_code, field_code]),
    }
}

fn write_vl_length(len: usize, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    if len <= 192 {
        buf.push(len as u8);
    } else if len <= 12_480 {
        let l = len - 193;
        buf.extend_from_slice(&[(193 + (l >> 8)) as u8, (l & 0xFF) as u8]);
    } else if len <= MAX_VL_LENGTH {
        let l = len - 12_481;
        buf.extend_from_slice(&[
            (241 + (l >> 16)) as u8,
            ((l >> 8) & 0xFF) as u8,
            (l & 0xFF) as u8,
        ]);
    } else {
        return Err(CodecError::TooLong(len));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Cursor over the input with field-aware error messages.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn byte(&mut self, what: &'static str) -> Result<u8, CodecError> {
        let b = *self.bytes.get(self.pos).ok_or(CodecError::Truncated(what))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], CodecError> {
        let slice = self
            .bytes
            .get(self.pos..self.pos + n)
            .ok_or(CodecError::Truncated(what))?;
        self.pos += n;
        Ok(slice)
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn vl_length(&mut self, what: &'static str) -> Result<usize, CodecError> {
        let b1 = self.byte(what)? as usize;
        if b1 <= 192 {
            return Ok(b1);
        }
        if b1 <= 240 {
            let b2 = self.byte(what)? as usize;
            return Ok(193 + (b1 - 193) * 256 + b2);
        }
        if b1 <= 254 {
            let b2 = self.byte(what)? as usize;
            let b3 = self.byte(what)? as usize;
            return Ok(12_481 + (b1 - 241) * 65_536 + b2 * 256 + b3);
        }
        Err(CodecError::InvalidValue {
            field: what,
            reason: "invalid length prefix".to_string(),
        })
    }

    /// Reads a field header, accepting only the shortest packing.
    fn header(&mut self) -> Result<(u8, u8), CodecError> {
        let b = self.byte("field header")?;
        let mut type_code = b >> 4;
        let mut field_code = b & 0x0F;
        if type_code == 0 {
            type_code = self.byte("field header")?;
            if type_code < 16 {
                return Err(non_canonical_header());
            }
        }
        if field_code == 0 {
            field_code = self.byte("field header")?;
            if field_code < 16 {
                return Err(non_canonical_header());
            }
        }
        Ok((type_code, field_code))
    }
}

fn non_canonical_header() -> CodecError {
    CodecError::InvalidValue {
        field: "field header",
        reason: "non-canonical encoding".to_string(),
    }
}

/// Decodes a canonical encoding back into fields.
pub fn decode(bytes: &[u8]) -> Result<Vec<Field>, CodecError> {
    let mut reader = Reader { bytes, pos: 0 };
    let mut fields = Vec::new();
    let mut previous: Option<FieldId> = None;

    while !reader.is_empty() {
        let (type_code, field_code) = reader.header()?;
        let id = FieldId::from_codes(type_code, field_code).ok_or(CodecError::UnknownField {
            type_code,
            field_code,
        })?;

        match previous {
            Some(p) if p == id => return Err(CodecError::DuplicateField(id.name())),
            Some(p) if p.codes() > id.codes() => return Err(CodecError::OutOfOrder(id.name())),
            _ => {}
        }
        previous = Some(id);

        let name = id.name();
        let value = match type_code {
            TYPE_UINT16 => {
                let b = reader.take(2, name)?;
                FieldValue::UInt16(u16::from_be_bytes([b[0], b[1]]))
            }
            TYPE_UINT32 => {
                let b = reader.take(4, name)?;
                FieldValue::UInt32(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
            }
            TYPE_HASH256 => {
                let mut h = [0u8; 32];
                h.copy_from_slice(reader.take(32, name)?);
                FieldValue::Hash256(HexHash(h))
            }
            TYPE_AMOUNT => {
                let (amount, used) = Amount::read_from(reader.rest()).map_err(|reason| {
                    CodecError::InvalidValue {
                        field: name,
                        reason,
                    }
                })?;
                reader.take(used, name)?;
                FieldValue::Amount(amount)
            }
            TYPE_BLOB => {
                let len = reader.vl_length(name)?;
                FieldValue::Blob(Blob(reader.take(len, name)?.to_vec()))
            }
            TYPE_ACCOUNT_ID => {
                let len = reader.vl_length(name)?;
                if len != ACCOUNT_ID_LENGTH {
                    return Err(CodecError::InvalidValue {
                        field: name,
                        reason: format!("account id of {len} bytes"),
                    });
                }
                let mut a = [0u8; ACCOUNT_ID_LENGTH];
                a.copy_from_slice(reader.take(len, name)?);
                FieldValue::AccountId(AccountId::from_bytes(a))
            }
            TYPE_PATHSET => {
                let (paths, used) = PathSet::read_from(reader.rest()).map_err(|reason| {
                    CodecError::InvalidValue {
                        field: name,
                        reason,
                    }
                })?;
                reader.take(used, name)?;
                FieldValue::PathSet(paths)
            }
            other => {
                return Err(CodecError::UnknownField {
                    type_code: other,
                    field_code,
                })
            }
        };

        fields.push(Field::new(id, value));
    }

    Ok(fields)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: FieldId, value: FieldValue) -> Field {
        Field::new(id, value)
    }

    #[test]
    fn headers_pack_per_code_ranges() {
        let mut buf = Vec::new();
        write_header(1, 2, &mut buf);
        assert_eq!(buf, [0x12]);

        buf.clear();
        write_header(2, 27, &mut buf);
        assert_eq!(buf, [0x20, 0x1B]);

        buf.clear();
        write_header(18, 1, &mut buf);
        assert_eq!(buf, [0x01, 0x12]);

        buf.clear();
        write_header(18, 20, &mut buf);
        assert_eq!(buf, [0x00, 0x12, 0x14]);
    }

    #[test]
    fn vl_lengths_at_boundaries() {
        for len in [0usize, 192, 193, 12_480, 12_481, MAX_VL_LENGTH] {
            let mut buf = Vec::new();
            write_vl_length(len, &mut buf).unwrap();
            let mut reader = Reader { bytes: &buf, pos: 0 };
            assert_eq!(reader.vl_length("test").unwrap(), len, "len {len}");
            assert!(reader.is_empty());
        }
        assert_eq!(
            write_vl_length(MAX_VL_LENGTH + 1, &mut Vec::new()),
            Err(CodecError::TooLong(MAX_VL_LENGTH + 1))
        );
    }

    #[test]
    fn encoding_sorts_fields() {
        let fields = vec![
            field(FieldId::Sequence, FieldValue::UInt32(1)),
            field(FieldId::TransactionType, FieldValue::UInt16(0)),
            field(FieldId::Fee, FieldValue::Amount(Amount::Native(10))),
        ];
        let bytes = encode(&fields, EncodeMode::Full).unwrap();
        assert_eq!(
            hex::encode_upper(&bytes),
            "120000240000000168400000000000000A"
        );
    }

    #[test]
    fn signing_mode_drops_signature() {
        let fields = vec![
            field(FieldId::Sequence, FieldValue::UInt32(1)),
            field(FieldId::TxnSignature, FieldValue::Blob(Blob(vec![1, 2, 3]))),
        ];
        let full = encode(&fields, EncodeMode::Full).unwrap();
        let signing = encode(&fields, EncodeMode::Signing).unwrap();
        assert_eq!(signing, hex::decode("2400000001").unwrap());
        assert_eq!(full.len(), signing.len() + 1 + 1 + 3);
    }

    #[test]
    fn duplicates_and_type_mismatches_are_rejected() {
        let dup = vec![
            field(FieldId::Sequence, FieldValue::UInt32(1)),
            field(FieldId::Sequence, FieldValue::UInt32(2)),
        ];
        assert_eq!(
            encode(&dup, EncodeMode::Full),
            Err(CodecError::DuplicateField("Sequence"))
        );

        let wrong = vec![field(FieldId::Sequence, FieldValue::UInt16(1))];
        assert_eq!(
            encode(&wrong, EncodeMode::Full),
            Err(CodecError::TypeMismatch("Sequence"))
        );
    }

    #[test]
    fn decode_inverts_encode() {
        let fields = vec![
            field(FieldId::TransactionType, FieldValue::UInt16(0)),
            field(FieldId::Flags, FieldValue::UInt32(0x0002_0000)),
            field(FieldId::LastLedgerSequence, FieldValue::UInt32(99)),
            field(FieldId::InvoiceId, FieldValue::Hash256(HexHash([9; 32]))),
            field(FieldId::Amount, FieldValue::Amount(Amount::Native(5))),
            field(FieldId::SigningPubKey, FieldValue::Blob(Blob(vec![2; 33]))),
            field(FieldId::Account, FieldValue::AccountId(AccountId::ZERO)),
            field(
                FieldId::Paths,
                FieldValue::PathSet("USD, XRP".parse().unwrap()),
            ),
        ];
        let bytes = encode(&fields, EncodeMode::Full).unwrap();
        assert_eq!(decode(&bytes).unwrap(), fields);
    }

    #[test]
    fn decode_rejects_out_of_order_and_unknown() {
        // Sequence then TransactionType.
        let out_of_order = hex::decode("2400000001120000").unwrap();
        assert_eq!(
            decode(&out_of_order),
            Err(CodecError::OutOfOrder("TransactionType"))
        );

        // UInt32 field 5 (PreviousTxnLgrSeq) is not a payment field.
        let unknown = hex::decode("2500000001").unwrap();
        assert!(matches!(
            decode(&unknown),
            Err(CodecError::UnknownField { type_code: 2, field_code: 5 })
        ));
    }

    #[test]
    fn decode_rejects_padded_headers() {
        // TransactionType as [0x00, 0x01, 0x02] instead of [0x12].
        let three_byte = hex::decode("0001020000").unwrap();
        assert!(matches!(
            decode(&three_byte),
            Err(CodecError::InvalidValue { field: "field header", .. })
        ));

        // Sequence as [0x20, 0x04] instead of [0x24].
        let two_byte = hex::decode("200400000001").unwrap();
        assert!(decode(&two_byte).is_err());

        // Paths packs as [0x01, 0x12], which is already the shortest form.
        let paths = vec![field(FieldId::Paths, FieldValue::PathSet("USD".parse().unwrap()))];
        let bytes = encode(&paths, EncodeMode::Full).unwrap();
        assert_eq!(bytes[..2], [0x01, 0x12]);
        assert_eq!(decode(&bytes).unwrap(), paths);
    }

    #[test]
    fn oversized_native_amount_is_an_encode_error() {
        let fields = vec![field(FieldId::Fee, FieldValue::Amount(Amount::Native(1 << 62)))];
        assert!(matches!(
            encode(&fields, EncodeMode::Full),
            Err(CodecError::InvalidValue { field: "Fee", .. })
        ));
    }

    #[test]
    fn decode_rejects_truncation() {
        assert_eq!(
            decode(&hex::decode("240000").unwrap()),
            Err(CodecError::Truncated("Sequence"))
        );
    }
}
