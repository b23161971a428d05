// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! The closed field catalog.
//!
//! Every field is a `(type code, field code)` pair. The pair is unique, forms
//! the wire tag and defines canonical ordering: ascending by type code, then
//! by field code.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// Wire type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum TypeCode {
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    AccountID = 8,
    STObject = 14,
    STArray = 15,
    UInt8 = 16,
    Hash160 = 17,
    PathSet = 18,
    Vector256 = 19,
}

impl TypeCode {
    pub const ALL: [TypeCode; 14] = [
        TypeCode::UInt16,
        TypeCode::UInt32,
        TypeCode::UInt64,
        TypeCode::Hash128,
        TypeCode::Hash256,
        TypeCode::Amount,
        TypeCode::Blob,
        TypeCode::AccountID,
        TypeCode::STObject,
        TypeCode::STArray,
        TypeCode::UInt8,
        TypeCode::Hash160,
        TypeCode::PathSet,
        TypeCode::Vector256,
    ];

    pub fn from_code(code: u16) -> Option<TypeCode> {
        Self::ALL.into_iter().find(|t| *t as u16 == code)
    }

    /// Whether values of this type carry a variable-length prefix inside an
    /// object.
    pub fn is_vl_encoded(self) -> bool {
        matches!(self, TypeCode::Blob | TypeCode::AccountID)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

macro_rules! fields {
    ($($variant:ident, $name:literal, $ty:ident, $code:literal;)*) => {
        /// A named field of the catalog.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $($variant,)*
        }

        impl Field {
            /// Every field, in declaration order.
            pub const ALL: &'static [Field] = &[$(Field::$variant,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)*
                }
            }

            pub const fn type_code(self) -> TypeCode {
                match self {
                    $(Field::$variant => TypeCode::$ty,)*
                }
            }

            pub const fn code(self) -> u16 {
                match self {
                    $(Field::$variant => $code,)*
                }
            }
        }
    };
}

fields! {
    // UInt16
    LedgerEntryType, "LedgerEntryType", UInt16, 1;
    TransactionType, "TransactionType", UInt16, 2;
    SignerWeight, "SignerWeight", UInt16, 3;

    // UInt8
    CloseResolution, "CloseResolution", UInt8, 1;
    Method, "Method", UInt8, 2;
    TransactionResult, "TransactionResult", UInt8, 3;

    // UInt32
    Flags, "Flags", UInt32, 2;
    SourceTag, "SourceTag", UInt32, 3;
    Sequence, "Sequence", UInt32, 4;
    PreviousTxnLgrSeq, "PreviousTxnLgrSeq", UInt32, 5;
    LedgerSequence, "LedgerSequence", UInt32, 6;
    CloseTime, "CloseTime", UInt32, 7;
    ParentCloseTime, "ParentCloseTime", UInt32, 8;
    SigningTime, "SigningTime", UInt32, 9;
    Expiration, "Expiration", UInt32, 10;
    TransferRate, "TransferRate", UInt32, 11;
    WalletSize, "WalletSize", UInt32, 12;
    OwnerCount, "OwnerCount", UInt32, 13;
    DestinationTag, "DestinationTag", UInt32, 14;
    HighQualityIn, "HighQualityIn", UInt32, 16;
    HighQualityOut, "HighQualityOut", UInt32, 17;
    LowQualityIn, "LowQualityIn", UInt32, 18;
    LowQualityOut, "LowQualityOut", UInt32, 19;
    QualityIn, "QualityIn", UInt32, 20;
    QualityOut, "QualityOut", UInt32, 21;
    StampEscrow, "StampEscrow", UInt32, 22;
    BondAmount, "BondAmount", UInt32, 23;
    LoadFee, "LoadFee", UInt32, 24;
    OfferSequence, "OfferSequence", UInt32, 25;
    FirstLedgerSequence, "FirstLedgerSequence", UInt32, 26;
    LastLedgerSequence, "LastLedgerSequence", UInt32, 27;
    TransactionIndex, "TransactionIndex", UInt32, 28;
    OperationLimit, "OperationLimit", UInt32, 29;
    ReferenceFeeUnits, "ReferenceFeeUnits", UInt32, 30;
    ReserveBase, "ReserveBase", UInt32, 31;
    ReserveIncrement, "ReserveIncrement", UInt32, 32;
    SetFlag, "SetFlag", UInt32, 33;
    ClearFlag, "ClearFlag", UInt32, 34;

    // UInt64
    IndexNext, "IndexNext", UInt64, 1;
    IndexPrevious, "IndexPrevious", UInt64, 2;
    BookNode, "BookNode", UInt64, 3;
    OwnerNode, "OwnerNode", UInt64, 4;
    BaseFee, "BaseFee", UInt64, 5;
    ExchangeRate, "ExchangeRate", UInt64, 6;
    LowNode, "LowNode", UInt64, 7;
    HighNode, "HighNode", UInt64, 8;

    // Hash128
    EmailHash, "EmailHash", Hash128, 1;

    // Hash256
    LedgerHash, "LedgerHash", Hash256, 1;
    ParentHash, "ParentHash", Hash256, 2;
    TransactionHash, "TransactionHash", Hash256, 3;
    AccountHash, "AccountHash", Hash256, 4;
    PreviousTxnID, "PreviousTxnID", Hash256, 5;
    LedgerIndex, "LedgerIndex", Hash256, 6;
    WalletLocator, "WalletLocator", Hash256, 7;
    RootIndex, "RootIndex", Hash256, 8;
    AccountTxnID, "AccountTxnID", Hash256, 9;
    BookDirectory, "BookDirectory", Hash256, 16;
    InvoiceID, "InvoiceID", Hash256, 17;
    Nickname, "Nickname", Hash256, 18;
    Amendment, "Amendment", Hash256, 19;
    TicketID, "TicketID", Hash256, 20;
    // JSON-only
    Hash, "hash", Hash256, 257;
    Index, "index", Hash256, 258;

    // Amount
    Amount, "Amount", Amount, 1;
    Balance, "Balance", Amount, 2;
    LimitAmount, "LimitAmount", Amount, 3;
    TakerPays, "TakerPays", Amount, 4;
    TakerGets, "TakerGets", Amount, 5;
    LowLimit, "LowLimit", Amount, 6;
    HighLimit, "HighLimit", Amount, 7;
    Fee, "Fee", Amount, 8;
    SendMax, "SendMax", Amount, 9;
    MinimumOffer, "MinimumOffer", Amount, 16;
    RippleEscrow, "RippleEscrow", Amount, 17;
    DeliveredAmount, "DeliveredAmount", Amount, 18;

    // Blob
    PublicKey, "PublicKey", Blob, 1;
    MessageKey, "MessageKey", Blob, 2;
    SigningPubKey, "SigningPubKey", Blob, 3;
    TxnSignature, "TxnSignature", Blob, 4;
    Generator, "Generator", Blob, 5;
    Signature, "Signature", Blob, 6;
    Domain, "Domain", Blob, 7;
    FundCode, "FundCode", Blob, 8;
    RemoveCode, "RemoveCode", Blob, 9;
    ExpireCode, "ExpireCode", Blob, 10;
    CreateCode, "CreateCode", Blob, 11;
    MemoType, "MemoType", Blob, 12;
    MemoData, "MemoData", Blob, 13;
    MemoFormat, "MemoFormat", Blob, 14;

    // AccountID
    Account, "Account", AccountID, 1;
    Owner, "Owner", AccountID, 2;
    Destination, "Destination", AccountID, 3;
    Issuer, "Issuer", AccountID, 4;
    Target, "Target", AccountID, 7;
    RegularKey, "RegularKey", AccountID, 8;

    // STObject
    ObjectEndMarker, "ObjectEndMarker", STObject, 1;
    TransactionMetaData, "TransactionMetaData", STObject, 2;
    CreatedNode, "CreatedNode", STObject, 3;
    DeletedNode, "DeletedNode", STObject, 4;
    ModifiedNode, "ModifiedNode", STObject, 5;
    PreviousFields, "PreviousFields", STObject, 6;
    FinalFields, "FinalFields", STObject, 7;
    NewFields, "NewFields", STObject, 8;
    TemplateEntry, "TemplateEntry", STObject, 9;
    Memo, "Memo", STObject, 10;

    // STArray
    ArrayEndMarker, "ArrayEndMarker", STArray, 1;
    SigningAccounts, "SigningAccounts", STArray, 2;
    TxnSignatures, "TxnSignatures", STArray, 3;
    Signatures, "Signatures", STArray, 4;
    Template, "Template", STArray, 5;
    Necessary, "Necessary", STArray, 6;
    Sufficient, "Sufficient", STArray, 7;
    AffectedNodes, "AffectedNodes", STArray, 8;
    Memos, "Memos", STArray, 9;

    // Hash160
    TakerPaysCurrency, "TakerPaysCurrency", Hash160, 1;
    TakerPaysIssuer, "TakerPaysIssuer", Hash160, 2;
    TakerGetsCurrency, "TakerGetsCurrency", Hash160, 3;
    TakerGetsIssuer, "TakerGetsIssuer", Hash160, 4;

    // PathSet
    Paths, "Paths", PathSet, 1;

    // Vector256
    Indexes, "Indexes", Vector256, 1;
    Hashes, "Hashes", Vector256, 2;
    Amendments, "Amendments", Vector256, 3;
}

static BY_NAME: Lazy<HashMap<&'static str, Field>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        if let Some(other) = map.insert(field.name(), *field) {
            panic!("field name {} defined twice ({other:?})", field.name());
        }
    }
    map
});

static BY_CODES: Lazy<HashMap<(u16, u16), Field>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        let key = (field.type_code() as u16, field.code());
        if let Some(other) = map.insert(key, *field) {
            panic!("field codes {key:?} shared by {field:?} and {other:?}");
        }
    }
    map
});

pub(crate) fn init() {
    Lazy::force(&BY_NAME);
    Lazy::force(&BY_CODES);
}

impl Field {
    pub fn from_name(name: &str) -> Option<Field> {
        BY_NAME.get(name).copied()
    }

    pub fn from_codes(type_code: u16, field_code: u16) -> Option<Field> {
        BY_CODES.get(&(type_code, field_code)).copied()
    }

    /// Fields with a code above 255 exist only in JSON renderings.
    pub const fn is_serialized(self) -> bool {
        self.code() <= 255
    }

    /// Fields covered by a transaction signature.
    pub fn is_signing_field(self) -> bool {
        self.is_serialized() && self != Field::TxnSignature
    }

    fn sort_key(self) -> (u16, u16) {
        (self.type_code() as u16, self.code())
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
