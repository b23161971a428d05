// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Transactions, their metadata and assembled results.

mod engine_result;
mod meta;
mod result;
mod signing;

use std::ops::{Deref, DerefMut};

use serde_json::Value as Json;

pub use self::engine_result::{EngineResult, ResultCategory};
pub use self::meta::{AffectedNode, NodeKind, TransactionMeta};
pub use self::result::{ResultSummary, Source, TransactionResult};
pub use self::signing::{hash_from_blob, signing_data, SignedTransaction};
use crate::fields::Field;
use crate::format::{apply_format, Format, TransactionType};
use crate::object::{STObject, SerializedType};
use crate::types::{AccountId, Amount, Blob, Hash256, PathSet, UInt32};
use crate::{Error, Result, Serializable};

/// Universal transaction flag: the signature must be fully canonical.
pub const TF_FULLY_CANONICAL_SIG: u32 = 0x8000_0000;

/// A transaction of any type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    tx_type: TransactionType,
    object: STObject,
}

impl Transaction {
    /// Wraps `object` after checking it names a known transaction type.
    pub fn from_object(object: STObject) -> Result<Self> {
        let code = object
            .get_u16(Field::TransactionType)
            .ok_or(Error::MissingField(Field::TransactionType.name()))?;
        let tx_type = TransactionType::from_code(code)?;
        Ok(Self { tx_type, object })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_object(STObject::from_slice(bytes)?)
    }

    pub fn from_json(json: &Json) -> Result<Self> {
        Self::from_object(STObject::from_json(json)?)
    }

    /// Defaults and validates the transaction against its format.
    pub fn finalize(self) -> Result<Self> {
        Self::from_object(apply_format(self.object)?)
    }

    pub fn as_object(&self) -> &STObject {
        &self.object
    }

    pub fn into_object(self) -> STObject {
        self.object
    }

    pub fn to_json(&self) -> Json {
        self.object.to_json()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.object.to_bytes()
    }

    pub fn tx_type(&self) -> TransactionType {
        self.tx_type
    }

    pub fn account(&self) -> Result<&AccountId> {
        self.object.required(Field::Account)
    }

    pub fn sequence(&self) -> Result<u32> {
        self.object.required_u32(Field::Sequence)
    }

    pub fn fee(&self) -> Result<&Amount> {
        self.object.required(Field::Fee)
    }

    pub fn flags(&self) -> u32 {
        self.object.get_u32(Field::Flags).unwrap_or(0)
    }

    pub fn last_ledger_sequence(&self) -> Option<u32> {
        self.object.get_u32(Field::LastLedgerSequence)
    }

    pub fn source_tag(&self) -> Option<u32> {
        self.object.get_u32(Field::SourceTag)
    }

    pub fn signing_pub_key(&self) -> Option<&Blob> {
        self.object.get_blob(Field::SigningPubKey)
    }

    pub fn txn_signature(&self) -> Option<&Blob> {
        self.object.get_blob(Field::TxnSignature)
    }

    /// The id carried in the JSON-only `hash` field.
    pub fn hash(&self) -> Option<&Hash256> {
        self.object.get_hash256(Field::Hash)
    }

    /// The id computed from the serialized transaction.
    pub fn compute_hash(&self) -> Result<Hash256> {
        Ok(hash_from_blob(&self.object.to_bytes()?))
    }

    /// Sets `field` after checking the transaction's format allows it. A
    /// carried `hash` no longer matches and is dropped.
    pub fn put<T: SerializedType>(
        &mut self,
        field: Field,
        value: T,
    ) -> Result<()> {
        if field == Field::TransactionType {
            return Err(Error::InvalidValue(
                "the type of a transaction is fixed".into(),
            ));
        }
        Format::for_transaction(self.tx_type)?.put(
            &mut self.object,
            field,
            value,
        )?;
        if field != Field::Hash {
            self.object.remove(Field::Hash);
        }
        Ok(())
    }

    pub fn set_account(&mut self, account: AccountId) -> Result<()> {
        self.put(Field::Account, account)
    }

    pub fn set_sequence(&mut self, sequence: u32) -> Result<()> {
        self.put(Field::Sequence, UInt32::from(sequence))
    }

    /// Fees are paid in drops.
    pub fn set_fee(&mut self, fee: Amount) -> Result<()> {
        if !fee.is_native() {
            let reason = format!("fee {fee} is not native");
            return Err(Error::InvalidAmount(reason));
        }
        self.put(Field::Fee, fee)
    }

    pub fn set_flags(&mut self, flags: u32) -> Result<()> {
        self.put(Field::Flags, UInt32::from(flags))
    }

    pub fn set_last_ledger_sequence(&mut self, sequence: u32) -> Result<()> {
        self.put(Field::LastLedgerSequence, UInt32::from(sequence))
    }

    pub fn set_source_tag(&mut self, tag: u32) -> Result<()> {
        self.put(Field::SourceTag, UInt32::from(tag))
    }

    pub(crate) fn set_hash(&mut self, hash: Hash256) {
        self.object.set(Field::Hash, hash.into());
    }
}

macro_rules! tx_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(Transaction);

        impl $name {
            pub fn into_inner(self) -> Transaction {
                self.0
            }
        }

        impl Deref for $name {
            type Target = Transaction;

            fn deref(&self) -> &Transaction {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Transaction {
                &mut self.0
            }
        }

        impl TryFrom<Transaction> for $name {
            type Error = Error;

            fn try_from(tx: Transaction) -> Result<Self> {
                if tx.tx_type() != TransactionType::$name {
                    return Err(Error::InvalidValue(format!(
                        "expected a {} transaction, found {}",
                        TransactionType::$name,
                        tx.tx_type()
                    )));
                }
                Ok(Self(tx))
            }
        }
    };
}

pub const TF_NO_RIPPLE_DIRECT: u32 = 0x0001_0000;
pub const TF_PARTIAL_PAYMENT: u32 = 0x0002_0000;
pub const TF_LIMIT_QUALITY: u32 = 0x0004_0000;

tx_view! {
    /// Moves value from `Account` to `Destination`.
    Payment
}

impl Payment {
    pub fn destination(&self) -> Result<&AccountId> {
        self.as_object().required(Field::Destination)
    }

    pub fn amount(&self) -> Result<&Amount> {
        self.as_object().required(Field::Amount)
    }

    pub fn send_max(&self) -> Option<&Amount> {
        self.as_object().get_amount(Field::SendMax)
    }

    pub fn paths(&self) -> Option<&PathSet> {
        self.as_object().get_pathset(Field::Paths)
    }

    pub fn destination_tag(&self) -> Option<u32> {
        self.as_object().get_u32(Field::DestinationTag)
    }

    pub fn invoice_id(&self) -> Option<&Hash256> {
        self.as_object().get_hash256(Field::InvoiceID)
    }

    pub fn set_destination(&mut self, destination: AccountId) -> Result<()> {
        self.put(Field::Destination, destination)
    }

    pub fn set_amount(&mut self, amount: Amount) -> Result<()> {
        self.put(Field::Amount, amount)
    }

    pub fn set_send_max(&mut self, send_max: Amount) -> Result<()> {
        self.put(Field::SendMax, send_max)
    }

    pub fn set_paths(&mut self, paths: PathSet) -> Result<()> {
        self.put(Field::Paths, paths)
    }

    pub fn set_destination_tag(&mut self, tag: u32) -> Result<()> {
        self.put(Field::DestinationTag, UInt32::from(tag))
    }

    pub fn is_partial(&self) -> bool {
        self.flags() & TF_PARTIAL_PAYMENT != 0
    }
}

pub const TF_PASSIVE: u32 = 0x0001_0000;
pub const TF_IMMEDIATE_OR_CANCEL: u32 = 0x0002_0000;
pub const TF_FILL_OR_KILL: u32 = 0x0004_0000;
pub const TF_SELL: u32 = 0x0008_0000;

tx_view! {
    /// Places an offer in the order book.
    OfferCreate
}

impl OfferCreate {
    pub fn taker_pays(&self) -> Result<&Amount> {
        self.as_object().required(Field::TakerPays)
    }

    pub fn taker_gets(&self) -> Result<&Amount> {
        self.as_object().required(Field::TakerGets)
    }

    pub fn expiration(&self) -> Option<u32> {
        self.as_object().get_u32(Field::Expiration)
    }

    /// Sequence of an offer this one replaces.
    pub fn offer_sequence(&self) -> Option<u32> {
        self.as_object().get_u32(Field::OfferSequence)
    }

    pub fn set_taker_pays(&mut self, amount: Amount) -> Result<()> {
        self.put(Field::TakerPays, amount)
    }

    pub fn set_taker_gets(&mut self, amount: Amount) -> Result<()> {
        self.put(Field::TakerGets, amount)
    }

    pub fn set_expiration(&mut self, expiration: u32) -> Result<()> {
        self.put(Field::Expiration, UInt32::from(expiration))
    }

    pub fn is_passive(&self) -> bool {
        self.flags() & TF_PASSIVE != 0
    }

    pub fn is_sell(&self) -> bool {
        self.flags() & TF_SELL != 0
    }
}

tx_view! {
    OfferCancel
}

impl OfferCancel {
    pub fn offer_sequence(&self) -> Result<u32> {
        self.as_object().required_u32(Field::OfferSequence)
    }
}

pub const TF_SET_AUTH: u32 = 0x0001_0000;
pub const TF_SET_NO_RIPPLE: u32 = 0x0002_0000;
pub const TF_CLEAR_NO_RIPPLE: u32 = 0x0004_0000;

tx_view! {
    /// Creates or changes a trust line.
    TrustSet
}

impl TrustSet {
    pub fn limit_amount(&self) -> Option<&Amount> {
        self.as_object().get_amount(Field::LimitAmount)
    }

    pub fn quality_in(&self) -> Option<u32> {
        self.as_object().get_u32(Field::QualityIn)
    }

    pub fn quality_out(&self) -> Option<u32> {
        self.as_object().get_u32(Field::QualityOut)
    }

    pub fn set_limit_amount(&mut self, limit: Amount) -> Result<()> {
        self.put(Field::LimitAmount, limit)
    }
}

pub const ASF_REQUIRE_DEST: u32 = 1;
pub const ASF_REQUIRE_AUTH: u32 = 2;
pub const ASF_DISALLOW_XRP: u32 = 3;
pub const ASF_DISABLE_MASTER: u32 = 4;

tx_view! {
    AccountSet
}

impl AccountSet {
    pub fn set_flag(&self) -> Option<u32> {
        self.as_object().get_u32(Field::SetFlag)
    }

    pub fn clear_flag(&self) -> Option<u32> {
        self.as_object().get_u32(Field::ClearFlag)
    }

    pub fn domain(&self) -> Option<&Blob> {
        self.as_object().get_blob(Field::Domain)
    }

    pub fn transfer_rate(&self) -> Option<u32> {
        self.as_object().get_u32(Field::TransferRate)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payment_json() -> Json {
        json!({
            "TransactionType": "Payment",
            "Flags": TF_PARTIAL_PAYMENT,
            "Account": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            "Destination": "rrrrrrrrrrrrrrrrrrrrrhoLvTp",
            "Sequence": 2,
            "Fee": "10",
            "Amount": "1000000",
            "SigningPubKey": ""
        })
    }

    #[test]
    fn payment_view() {
        let tx = Transaction::from_json(&payment_json()).unwrap();
        assert_eq!(tx.tx_type(), TransactionType::Payment);
        assert_eq!(tx.fee().unwrap().drops(), Some(10));
        assert!(tx.hash().is_none());

        let payment =
            Payment::try_from(tx.clone().finalize().unwrap()).unwrap();
        assert!(payment.is_partial());
        assert_eq!(payment.amount().unwrap().drops(), Some(1_000_000));
        assert!(payment.destination().unwrap().is_zero());
        assert!(payment.paths().is_none());
        assert_eq!(payment.sequence().unwrap(), 2);

        assert!(matches!(
            OfferCreate::try_from(tx),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn rejects_missing_or_unknown_type() {
        assert!(matches!(
            Transaction::from_json(&json!({ "Sequence": 1 })),
            Err(Error::MissingField("TransactionType"))
        ));
        let mut object = STObject::new();
        object
            .put(Field::TransactionType, crate::types::UInt16::from(99u16))
            .unwrap();
        assert!(matches!(
            Transaction::from_object(object),
            Err(Error::UnknownType { kind: "transaction type", .. })
        ));
    }

    #[test]
    fn finalize_checks_required_fields() {
        let mut json = payment_json();
        json.as_object_mut().unwrap().remove("Destination");
        let tx = Transaction::from_json(&json).unwrap();
        assert!(matches!(
            tx.finalize(),
            Err(Error::MissingRequiredField {
                format: "Payment",
                field: "Destination"
            })
        ));
    }

    #[test]
    fn offer_create_view() {
        let tx = Transaction::from_json(&json!({
            "TransactionType": "OfferCreate",
            "Flags": TF_SELL,
            "Account": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            "Sequence": 9,
            "Fee": "12",
            "TakerPays": "500",
            "TakerGets": {
                "currency": "USD",
                "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
                "value": "3"
            },
            "SigningPubKey": ""
        }))
        .unwrap();
        let offer = OfferCreate::try_from(tx).unwrap();
        assert!(offer.is_sell());
        assert!(!offer.is_passive());
        assert_eq!(offer.taker_gets().unwrap().value_string(), "3");
        assert_eq!(offer.offer_sequence(), None);
    }

    #[test]
    fn setters_follow_the_format() {
        let tx = Transaction::from_json(&payment_json()).unwrap();
        let mut payment = Payment::try_from(tx).unwrap();
        payment.put(Field::Hash, Hash256::new([7; 32])).unwrap();
        assert!(payment.hash().is_some());

        payment.set_amount(Amount::from_drops(5).unwrap()).unwrap();
        payment.set_destination_tag(4).unwrap();
        payment.set_fee(Amount::from_drops(12).unwrap()).unwrap();
        payment.set_last_ledger_sequence(90).unwrap();
        assert!(payment.hash().is_none());
        assert_eq!(payment.amount().unwrap().drops(), Some(5));
        assert_eq!(payment.destination_tag(), Some(4));
        assert_eq!(payment.fee().unwrap().drops(), Some(12));
        assert_eq!(payment.last_ledger_sequence(), Some(90));

        assert!(matches!(
            payment.put(Field::TakerPays, Amount::from_drops(1).unwrap()),
            Err(Error::InvalidFieldPresent {
                format: "Payment",
                field: "TakerPays"
            })
        ));
        assert!(matches!(
            payment.put(
                Field::TransactionType,
                crate::types::UInt16::from(7u16)
            ),
            Err(Error::InvalidValue(_))
        ));
        let usd = crate::types::Issue::new(
            crate::types::Currency::from_iso("USD").unwrap(),
            AccountId::new([2; 20]),
        );
        assert!(matches!(
            payment.set_fee(Amount::parse("1", usd).unwrap()),
            Err(Error::InvalidAmount(_))
        ));
        assert_eq!(payment.tx_type(), TransactionType::Payment);
        assert!(payment.into_inner().finalize().is_ok());
    }

    #[test]
    fn offer_create_setters() {
        let mut json = payment_json();
        let map = json.as_object_mut().unwrap();
        map.insert("TransactionType".into(), "OfferCreate".into());
        map.remove("Destination");
        map.remove("Amount");
        let tx = Transaction::from_json(&json).unwrap();
        let mut offer = OfferCreate::try_from(tx).unwrap();
        offer.set_taker_pays(Amount::from_drops(500).unwrap()).unwrap();
        offer.set_taker_gets(Amount::from_drops(700).unwrap()).unwrap();
        offer.set_expiration(11).unwrap();
        assert!(matches!(
            offer.put(Field::Destination, AccountId::new([3; 20])),
            Err(Error::InvalidFieldPresent { field: "Destination", .. })
        ));
        let tx = offer.into_inner().finalize().unwrap();
        assert_eq!(tx.as_object().get_u32(Field::Expiration), Some(11));
    }
}
