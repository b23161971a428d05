// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::{coded_enum, Format, Requirement};
use crate::fields::Field;
use crate::ledger::set_exchange_defaults;
use crate::{Error, Result};

use Requirement::{Default as Def, Optional as Opt, Required as Req};

coded_enum! {
    /// Discriminator stored in the `LedgerEntryType` field.
    pub enum LedgerEntryType ("ledger entry type") {
        AccountRoot = 0x61,
        DirectoryNode = 0x64,
        EnabledAmendments = 0x66,
        LedgerHashes = 0x68,
        Offer = 0x6f,
        RippleState = 0x72,
        FeeSettings = 0x73,
        Ticket = 0x54,
    }
}

const COMMON: &[(Field, Requirement)] = &[
    (Field::LedgerEntryType, Req),
    (Field::Flags, Req),
    (Field::LedgerIndex, Opt),
];

static FORMATS: Lazy<BTreeMap<LedgerEntryType, Format>> = Lazy::new(|| {
    use LedgerEntryType::*;

    let table = [
        (
            AccountRoot,
            Format::new("AccountRoot", COMMON, &[
                (Field::Account, Req),
                (Field::Sequence, Req),
                (Field::Balance, Req),
                (Field::OwnerCount, Def),
                (Field::PreviousTxnID, Req),
                (Field::PreviousTxnLgrSeq, Req),
                (Field::AccountTxnID, Opt),
                (Field::RegularKey, Opt),
                (Field::EmailHash, Opt),
                (Field::WalletLocator, Opt),
                (Field::WalletSize, Opt),
                (Field::MessageKey, Opt),
                (Field::TransferRate, Opt),
                (Field::Domain, Opt),
            ]),
        ),
        (
            DirectoryNode,
            Format::new("DirectoryNode", COMMON, &[
                (Field::Owner, Opt),
                (Field::TakerPaysCurrency, Opt),
                (Field::TakerPaysIssuer, Opt),
                (Field::TakerGetsCurrency, Opt),
                (Field::TakerGetsIssuer, Opt),
                (Field::ExchangeRate, Opt),
                (Field::Indexes, Def),
                (Field::RootIndex, Req),
                (Field::IndexNext, Opt),
                (Field::IndexPrevious, Opt),
            ])
            .with_defaults(set_exchange_defaults),
        ),
        (
            EnabledAmendments,
            Format::new("EnabledAmendments", COMMON, &[(
                Field::Amendments,
                Req,
            )]),
        ),
        (
            LedgerHashes,
            Format::new("LedgerHashes", COMMON, &[
                (Field::FirstLedgerSequence, Opt),
                (Field::LastLedgerSequence, Opt),
                (Field::Hashes, Req),
            ]),
        ),
        (
            Offer,
            Format::new("Offer", COMMON, &[
                (Field::Account, Req),
                (Field::Sequence, Req),
                (Field::TakerPays, Req),
                (Field::TakerGets, Req),
                (Field::BookDirectory, Req),
                (Field::BookNode, Req),
                (Field::OwnerNode, Req),
                (Field::PreviousTxnID, Req),
                (Field::PreviousTxnLgrSeq, Req),
                (Field::Expiration, Opt),
            ]),
        ),
        (
            RippleState,
            Format::new("RippleState", COMMON, &[
                (Field::Balance, Req),
                (Field::LowLimit, Req),
                (Field::HighLimit, Req),
                (Field::PreviousTxnID, Req),
                (Field::PreviousTxnLgrSeq, Req),
                (Field::LowNode, Opt),
                (Field::LowQualityIn, Opt),
                (Field::LowQualityOut, Opt),
                (Field::HighNode, Opt),
                (Field::HighQualityIn, Opt),
                (Field::HighQualityOut, Opt),
            ]),
        ),
        (
            FeeSettings,
            Format::new("FeeSettings", COMMON, &[
                (Field::BaseFee, Req),
                (Field::ReferenceFeeUnits, Req),
                (Field::ReserveBase, Req),
                (Field::ReserveIncrement, Req),
            ]),
        ),
        (
            Ticket,
            Format::new("Ticket", COMMON, &[
                (Field::Account, Req),
                (Field::Sequence, Req),
                (Field::OwnerNode, Req),
                (Field::Target, Opt),
                (Field::Expiration, Opt),
            ]),
        ),
    ];

    let mut formats = BTreeMap::new();
    for (entry_type, format) in table {
        if format.name() != entry_type.name() {
            panic!("format {} registered for {entry_type}", format.name());
        }
        if formats.insert(entry_type, format).is_some() {
            panic!("ledger entry type {entry_type} has two formats");
        }
    }
    for entry_type in LedgerEntryType::ALL {
        if !formats.contains_key(entry_type) {
            panic!("ledger entry type {entry_type} has no format");
        }
    }
    formats
});

pub(super) fn format(entry_type: LedgerEntryType) -> Result<&'static Format> {
    FORMATS.get(&entry_type).ok_or_else(|| Error::UnknownType {
        kind: "ledger entry type",
        value: entry_type.to_string(),
    })
}

pub(super) fn init() {
    Lazy::force(&FORMATS);
}
