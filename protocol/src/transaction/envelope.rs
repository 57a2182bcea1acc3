//! The common transaction envelope.
//!
//! Every ledger transaction carries the same header fields regardless of its
//! type: who sends it, in which sequence slot, for what fee, and (once
//! signed) with which key and signature. [`TxBase`] holds exactly those.
//! Type-specific fields live in the transaction that embeds it (see
//! [`super::payment::Payment`]).

use serde::Serialize;

use super::codec::{CodecError, Field, FieldId, FieldValue};
use super::types::{Blob, TransactionType};
use crate::config::DEFAULT_FEE_DROPS;
use crate::crypto::keys::PublicKey;
use crate::types::{AccountId, Amount};

/// Header fields shared by every transaction type.
///
/// `Flags` is `None` until the signer fills in a placeholder of zero, so an
/// unsigned payment without flags prints without the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxBase {
    pub transaction_type: TransactionType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,

    pub sequence: u32,

    /// Ledger index after which the transaction can no longer be included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ledger_sequence: Option<u32>,

    pub fee: Amount,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_pub_key: Option<PublicKey>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_signature: Option<Blob>,

    pub account: AccountId,
}

impl TxBase {
    /// An empty envelope of the given type: zero account and sequence,
    /// default fee, no signature.
    pub fn new(transaction_type: TransactionType) -> Self {
        Self {
            transaction_type,
            flags: None,
            sequence: 0,
            last_ledger_sequence: None,
            fee: Amount::Native(DEFAULT_FEE_DROPS),
            signing_pub_key: None,
            txn_signature: None,
            account: AccountId::ZERO,
        }
    }

    /// The envelope's fields, in no particular order.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = vec![
            Field::new(
                FieldId::TransactionType,
                FieldValue::UInt16(self.transaction_type.code()),
            ),
            Field::new(FieldId::Sequence, FieldValue::UInt32(self.sequence)),
            Field::new(FieldId::Fee, FieldValue::Amount(self.fee)),
            Field::new(FieldId::Account, FieldValue::AccountId(self.account)),
        ];
        if let Some(flags) = self.flags {
            fields.push(Field::new(FieldId::Flags, FieldValue::UInt32(flags)));
        }
        if let Some(seq) = self.last_ledger_sequence {
            fields.push(Field::new(FieldId::LastLedgerSequence, FieldValue::UInt32(seq)));
        }
        if let Some(key) = &self.signing_pub_key {
            fields.push(Field::new(
                FieldId::SigningPubKey,
                FieldValue::Blob(Blob(key.as_bytes().to_vec())),
            ));
        }
        if let Some(sig) = &self.txn_signature {
            fields.push(Field::new(FieldId::TxnSignature, FieldValue::Blob(sig.clone())));
        }
        fields
    }

    /// Takes an envelope field off a decoded field list.
    ///
    /// Returns the field back if it is not an envelope field, so the caller
    /// can offer it to the type-specific part.
    pub fn apply_field(&mut self, field: Field) -> Result<Option<Field>, CodecError> {
        let name = field.id.name();
        match (field.id, field.value) {
            (FieldId::TransactionType, FieldValue::UInt16(code)) => {
                self.transaction_type =
                    TransactionType::from_code(code).ok_or(CodecError::UnsupportedType(code))?;
            }
            (FieldId::Flags, FieldValue::UInt32(v)) => self.flags = Some(v),
            (FieldId::Sequence, FieldValue::UInt32(v)) => self.sequence = v,
            (FieldId::LastLedgerSequence, FieldValue::UInt32(v)) => {
                self.last_ledger_sequence = Some(v)
            }
            (FieldId::Fee, FieldValue::Amount(fee)) => {
                if !fee.is_native() {
                    return Err(CodecError::InvalidValue {
                        field: name,
                        reason: "fee must be native".to_string(),
                    });
                }
                self.fee = fee;
            }
            (FieldId::SigningPubKey, FieldValue::Blob(bytes)) => {
                let key = PublicKey::from_bytes(bytes.as_bytes()).map_err(|e| {
                    CodecError::InvalidValue {
                        field: name,
                        reason: e.to_string(),
                    }
                })?;
                self.signing_pub_key = Some(key);
            }
            (FieldId::TxnSignature, FieldValue::Blob(sig)) => self.txn_signature = Some(sig),
            (FieldId::Account, FieldValue::AccountId(account)) => self.account = account,
            (id, value) => return Ok(Some(Field::new(id, value))),
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
