//! Payment construction.
//!
//! Two ways in:
//!
//! - [`PaymentBuilder`] takes typed values (`AccountId`, `Amount`, ...) and
//!   cannot fail.
//! - [`build_payment`] takes the raw strings from the command line and parses
//!   each one, failing on the first that doesn't match its grammar.
//!
//! Either way the result is an unsigned [`Payment`]. Sender, sequence, fee,
//! and signature are the signer's job (see [`super::signing`]), which keeps
//! construction testable without key material.

use serde::Serialize;
use tracing::debug;

use super::codec::{CodecError, Field, FieldId, FieldValue};
use super::envelope::TxBase;
use super::types::{HexHash, PaymentFlags, TransactionType};
use crate::crypto::hash::sha512_half;
use crate::types::{AccountId, Amount, ParseError, PathSet};

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

/// A payment transaction.
///
/// Serializes to the ledger's JSON shape: envelope fields first, then the
/// payment fields, optional ones omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(flatten)]
    pub base: TxBase,

    pub destination: AccountId,

    pub amount: Amount,

    /// Upper bound on what the sender spends, for cross-currency payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_max: Option<Amount>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_tag: Option<u32>,

    #[serde(rename = "InvoiceID", skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<HexHash>,
}

impl Payment {
    /// The payment flags set in the envelope's flag mask.
    pub fn flags(&self) -> PaymentFlags {
        PaymentFlags::from_bits(self.base.flags.unwrap_or(0))
    }

    /// All fields, envelope included, in no particular order.
    pub fn to_fields(&self) -> Vec<Field> {
        let mut fields = self.base.fields();
        fields.push(Field::new(
            FieldId::Destination,
            FieldValue::AccountId(self.destination),
        ));
        fields.push(Field::new(FieldId::Amount, FieldValue::Amount(self.amount)));
        if let Some(send_max) = self.send_max {
            fields.push(Field::new(FieldId::SendMax, FieldValue::Amount(send_max)));
        }
        if let Some(paths) = &self.paths {
            fields.push(Field::new(FieldId::Paths, FieldValue::PathSet(paths.clone())));
        }
        if let Some(tag) = self.destination_tag {
            fields.push(Field::new(FieldId::DestinationTag, FieldValue::UInt32(tag)));
        }
        if let Some(invoice) = self.invoice_id {
            fields.push(Field::new(FieldId::InvoiceId, FieldValue::Hash256(invoice)));
        }
        fields
    }

    /// Rebuilds a payment from decoded fields.
    ///
    /// `Account`, `Sequence`, `Fee`, `Destination` and `Amount` must be
    /// present. Fields that don't belong to a payment are an error.
    pub fn from_fields(fields: Vec<Field>) -> Result<Self, CodecError> {
        let mut base = TxBase::new(TransactionType::Payment);
        let mut seen = Vec::with_capacity(fields.len());
        let mut destination = None;
        let mut amount = None;
        let mut send_max = None;
        let mut paths = None;
        let mut destination_tag = None;
        let mut invoice_id = None;

        for field in fields {
            seen.push(field.id);
            let Some(field) = base.apply_field(field)? else {
                continue;
            };
            match (field.id, field.value) {
                (FieldId::Destination, FieldValue::AccountId(a)) => destination = Some(a),
                (FieldId::Amount, FieldValue::Amount(a)) => amount = Some(a),
                (FieldId::SendMax, FieldValue::Amount(a)) => send_max = Some(a),
                (FieldId::Paths, FieldValue::PathSet(p)) => paths = Some(p),
                (FieldId::DestinationTag, FieldValue::UInt32(t)) => destination_tag = Some(t),
                (FieldId::InvoiceId, FieldValue::Hash256(h)) => invoice_id = Some(h),
                (id, _) => return Err(CodecError::UnexpectedField(id.name())),
            }
        }

        for required in [
            FieldId::TransactionType,
            FieldId::Sequence,
            FieldId::Fee,
            FieldId::Account,
        ] {
            if !seen.contains(&required) {
                return Err(CodecError::MissingField(required.name()));
            }
        }

        Ok(Self {
            base,
            destination: destination.ok_or(CodecError::MissingField("Destination"))?,
            amount: amount.ok_or(CodecError::MissingField("Amount"))?,
            send_max,
            paths,
            destination_tag,
            invoice_id,
        })
    }
}

// ---------------------------------------------------------------------------
// PaymentBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Payment`]s.
///
/// ```
/// use rtx_protocol::transaction::{PaymentBuilder, PaymentFlags};
/// use rtx_protocol::types::{AccountId, Amount};
///
/// let payment = PaymentBuilder::new(AccountId::ZERO, Amount::Native(1_000_000))
///     .destination_tag(42)
///     .flags(PaymentFlags { partial_payment: true, ..Default::default() })
///     .build();
///
/// assert_eq!(payment.destination_tag, Some(42));
/// assert_eq!(payment.base.flags, Some(0x0002_0000));
/// ```
#[derive(Debug, Clone)]
pub struct PaymentBuilder {
    destination: AccountId,
    amount: Amount,
    send_max: Option<Amount>,
    paths: Option<PathSet>,
    destination_tag: Option<u32>,
    invoice_id: Option<HexHash>,
    flags: PaymentFlags,
}

impl PaymentBuilder {
    pub fn new(destination: AccountId, amount: Amount) -> Self {
        Self {
            destination,
            amount,
            send_max: None,
            paths: None,
            destination_tag: None,
            invoice_id: None,
            flags: PaymentFlags::default(),
        }
    }

    pub fn send_max(mut self, send_max: Amount) -> Self {
        self.send_max = Some(send_max);
        self
    }

    pub fn paths(mut self, paths: PathSet) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn destination_tag(mut self, tag: u32) -> Self {
        self.destination_tag = Some(tag);
        self
    }

    pub fn invoice_id(mut self, id: HexHash) -> Self {
        self.invoice_id = Some(id);
        self
    }

    /// Sets the invoice id to the SHA-512Half of `invoice`.
    pub fn invoice(self, invoice: &str) -> Self {
        self.invoice_id(HexHash(sha512_half(invoice.as_bytes())))
    }

    pub fn flags(mut self, flags: PaymentFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Produces the unsigned payment.
    ///
    /// The flag mask is only written when at least one flag is set; the
    /// signer supplies the zero placeholder otherwise.
    pub fn build(self) -> Payment {
        let mut base = TxBase::new(TransactionType::Payment);
        let bits = self.flags.bits();
        if bits != 0 {
            base.flags = Some(bits);
        }
        Payment {
            base,
            destination: self.destination,
            amount: self.amount,
            send_max: self.send_max,
            paths: self.paths,
            destination_tag: self.destination_tag,
            invoice_id: self.invoice_id,
        }
    }
}

// ---------------------------------------------------------------------------
// build_payment
// ---------------------------------------------------------------------------

/// Raw payment inputs as they arrive from the command line.
///
/// Empty strings count as "not provided", same as `None`.
#[derive(Debug, Clone, Default)]
pub struct PaymentFields {
    pub destination: String,
    pub amount: String,
    pub send_max: Option<String>,
    pub paths: Option<String>,
    pub destination_tag: Option<u32>,
    pub invoice: Option<String>,
    pub flags: PaymentFlags,
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Parses every supplied field and assembles an unsigned payment.
///
/// Destination and amount are required. Send-max, paths, tag, and invoice
/// are attached only when provided. Parsing stops at the first bad value.
pub fn build_payment(fields: &PaymentFields) -> Result<Payment, ParseError> {
    let destination: AccountId = fields.destination.parse()?;
    let amount: Amount = fields.amount.parse()?;

    let mut builder = PaymentBuilder::new(destination, amount).flags(fields.flags);

    if let Some(send_max) = provided(&fields.send_max) {
        builder = builder.send_max(send_max.parse()?);
    }
    if let Some(paths) = provided(&fields.paths) {
        builder = builder.paths(paths.parse()?);
    }
    if let Some(tag) = fields.destination_tag {
        builder = builder.destination_tag(tag);
    }
    if let Some(invoice) = provided(&fields.invoice) {
        builder = builder.invoice(invoice);
    }

    let payment = builder.build();
    debug!(
        destination = %payment.destination,
        amount = %payment.amount,
        flags = payment.flags().bits(),
        "payment built"
    );
    Ok(payment)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DEST: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    fn fields(dest: &str, amount: &str) -> PaymentFields {
        PaymentFields {
            destination: dest.to_string(),
            amount: amount.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_payment() {
        let p = build_payment(&fields(DEST, "1000000")).unwrap();
        assert_eq!(p.destination.to_address(), DEST);
        assert_eq!(p.amount, Amount::Native(1_000_000));
        assert!(p.send_max.is_none());
        assert!(p.paths.is_none());
        assert!(p.destination_tag.is_none());
        assert!(p.invoice_id.is_none());
        assert!(p.base.flags.is_none());
    }

    #[test]
    fn empty_optional_strings_are_not_provided() {
        let mut f = fields(DEST, "1");
        f.send_max = Some(String::new());
        f.paths = Some("  ".to_string());
        f.invoice = Some(String::new());
        let p = build_payment(&f).unwrap();
        assert!(p.send_max.is_none());
        assert!(p.paths.is_none());
        assert!(p.invoice_id.is_none());
    }

    #[test]
    fn optional_fields_are_attached() {
        let mut f = fields(DEST, "10/USD");
        f.send_max = Some(format!("11/USD/{DEST}"));
        f.paths = Some(format!("XRP => USD/{DEST}"));
        f.destination_tag = Some(99);
        f.invoice = Some("INV-1".to_string());
        let p = build_payment(&f).unwrap();

        assert!(p.send_max.is_some());
        assert_eq!(p.paths.as_ref().map(|s| s.0.len()), Some(1));
        assert_eq!(p.destination_tag, Some(99));
        assert_eq!(p.invoice_id, Some(HexHash(sha512_half(b"INV-1"))));
    }

    #[test]
    fn flags_are_ored() {
        let mut f = fields(DEST, "1");
        f.flags = PaymentFlags {
            no_direct_ripple: true,
            partial_payment: true,
            limit_quality: true,
        };
        let p = build_payment(&f).unwrap();
        assert_eq!(p.base.flags, Some(0x0007_0000));
        assert_eq!(p.flags(), f.flags);
    }

    #[test]
    fn bad_inputs_are_rejected() {
        assert!(matches!(
            build_payment(&fields("rBogus", "1")),
            Err(ParseError::Account { .. })
        ));
        assert!(matches!(
            build_payment(&fields(DEST, "lots")),
            Err(ParseError::Amount { .. })
        ));
        let mut f = fields(DEST, "1");
        f.paths = Some("USD,,EUR".to_string());
        assert!(matches!(build_payment(&f), Err(ParseError::Path { .. })));
    }

    #[test]
    fn fields_rebuild_the_payment() {
        let mut f = fields(DEST, "2.5/EUR");
        f.send_max = Some("3/EUR".to_string());
        f.paths = Some("XRP".to_string());
        f.destination_tag = Some(5);
        f.invoice = Some("abc".to_string());
        let mut p = build_payment(&f).unwrap();
        p.base.sequence = 3;

        let back = Payment::from_fields(p.to_fields()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn from_fields_requires_destination() {
        let p = build_payment(&fields(DEST, "1")).unwrap();
        let without: Vec<Field> = p
            .to_fields()
            .into_iter()
            .filter(|f| f.id != FieldId::Destination)
            .collect();
        assert_eq!(
            Payment::from_fields(without),
            Err(CodecError::MissingField("Destination"))
        );
    }

    #[test]
    fn json_field_names() {
        let mut f = fields(DEST, "1000000");
        f.invoice = Some("x".to_string());
        let p = build_payment(&f).unwrap();
        let json = serde_json::to_value(&p).unwrap();

        assert_eq!(json["TransactionType"], "Payment");
        assert_eq!(json["Destination"], DEST);
        assert_eq!(json["Amount"], "1000000");
        assert!(json.get("InvoiceID").is_some());
        assert!(json.get("SendMax").is_none());
        assert!(json.get("Paths").is_none());
    }
}
