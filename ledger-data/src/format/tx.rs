// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::{coded_enum, Format, Requirement};
use crate::fields::Field;
use crate::{Error, Result};

use Requirement::{Optional as Opt, Required as Req};

coded_enum! {
    /// Discriminator stored in the `TransactionType` field.
    pub enum TransactionType ("transaction type") {
        Payment = 0,
        AccountSet = 3,
        SetRegularKey = 5,
        OfferCreate = 7,
        OfferCancel = 8,
        TicketCreate = 10,
        TicketCancel = 11,
        TrustSet = 20,
        EnableAmendment = 100,
        SetFee = 101,
    }
}

const COMMON: &[(Field, Requirement)] = &[
    (Field::TransactionType, Req),
    (Field::Flags, Opt),
    (Field::SourceTag, Opt),
    (Field::Account, Req),
    (Field::Sequence, Req),
    (Field::LastLedgerSequence, Opt),
    (Field::AccountTxnID, Opt),
    (Field::Fee, Req),
    (Field::OperationLimit, Opt),
    (Field::Memos, Opt),
    (Field::SigningPubKey, Req),
    (Field::TxnSignature, Opt),
];

static FORMATS: Lazy<BTreeMap<TransactionType, Format>> = Lazy::new(|| {
    use TransactionType::*;

    let table = [
        (
            Payment,
            Format::new("Payment", COMMON, &[
                (Field::Destination, Req),
                (Field::Amount, Req),
                (Field::SendMax, Opt),
                (Field::Paths, Opt),
                (Field::InvoiceID, Opt),
                (Field::DestinationTag, Opt),
            ]),
        ),
        (
            AccountSet,
            Format::new("AccountSet", COMMON, &[
                (Field::EmailHash, Opt),
                (Field::WalletLocator, Opt),
                (Field::WalletSize, Opt),
                (Field::MessageKey, Opt),
                (Field::Domain, Opt),
                (Field::TransferRate, Opt),
                (Field::SetFlag, Opt),
                (Field::ClearFlag, Opt),
            ]),
        ),
        (
            SetRegularKey,
            Format::new("SetRegularKey", COMMON, &[(Field::RegularKey, Opt)]),
        ),
        (
            OfferCreate,
            Format::new("OfferCreate", COMMON, &[
                (Field::TakerPays, Req),
                (Field::TakerGets, Req),
                (Field::Expiration, Opt),
                (Field::OfferSequence, Opt),
            ]),
        ),
        (
            OfferCancel,
            Format::new("OfferCancel", COMMON, &[(Field::OfferSequence, Req)]),
        ),
        (
            TicketCreate,
            Format::new("TicketCreate", COMMON, &[
                (Field::Target, Opt),
                (Field::Expiration, Opt),
            ]),
        ),
        (
            TicketCancel,
            Format::new("TicketCancel", COMMON, &[(Field::TicketID, Req)]),
        ),
        (
            TrustSet,
            Format::new("TrustSet", COMMON, &[
                (Field::LimitAmount, Opt),
                (Field::QualityIn, Opt),
                (Field::QualityOut, Opt),
            ]),
        ),
        (
            EnableAmendment,
            Format::new("EnableAmendment", COMMON, &[(Field::Amendment, Req)]),
        ),
        (
            SetFee,
            Format::new("SetFee", COMMON, &[
                (Field::BaseFee, Req),
                (Field::ReferenceFeeUnits, Req),
                (Field::ReserveBase, Req),
                (Field::ReserveIncrement, Req),
            ]),
        ),
    ];

    let mut formats = BTreeMap::new();
    for (tx_type, format) in table {
        if format.name() != tx_type.name() {
            panic!("format {} registered for {tx_type}", format.name());
        }
        if formats.insert(tx_type, format).is_some() {
            panic!("transaction type {tx_type} has two formats");
        }
    }
    for tx_type in TransactionType::ALL {
        if !formats.contains_key(tx_type) {
            panic!("transaction type {tx_type} has no format");
        }
    }
    formats
});

pub(super) fn format(tx_type: TransactionType) -> Result<&'static Format> {
    FORMATS.get(&tx_type).ok_or_else(|| Error::UnknownType {
        kind: "transaction type",
        value: tx_type.to_string(),
    })
}

pub(super) fn init() {
    Lazy::force(&FORMATS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_common_fields() {
        for tx_type in TransactionType::ALL {
            let format = format(*tx_type).unwrap();
            assert_eq!(format.requirement(Field::SigningPubKey), Req);
            assert_eq!(format.requirement(Field::TxnSignature), Opt);
            assert_eq!(
                format.requirement(Field::LedgerEntryType),
                Requirement::Invalid
            );
        }
    }

    #[test]
    fn codes() {
        assert_eq!(
            TransactionType::from_code(20).unwrap(),
            TransactionType::TrustSet
        );
        assert_eq!(TransactionType::OfferCreate.to_string(), "OfferCreate");
        assert!(TransactionType::from_code(2).is_err());
    }
}
