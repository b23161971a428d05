// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use ledger_data::ledger::{AccountRoot, LedgerEntry, LedgerObject, Offer};
use ledger_data::tx::{NodeKind, TransactionMeta};
use ledger_data::types::{AccountId, Hash256};
use ledger_data::{Error, Field, STObject, Serializable};
use serde_json::json;

const GENESIS: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
const PREVIOUS_TXN: &str =
    "DE2DB139A8C7EAE5675E6A6A1A7A4FC1A9C4F8B9C3D8DC83E2C1A1F0A1C2D3E4";

/// AccountRoot with `lsfRequireAuth` set and three owned entries.
const ACCOUNT_ROOT: &str = "11006122000400002400000005250109A4B22D0000000355\
    DE2DB139A8C7EAE5675E6A6A1A7A4FC1A9C4F8B9C3D8DC83E2C1A1F0A1C2D3E4\
    624000000005F5E0F68114B5F762798A53D543A014CAF8B297CFF8F2F937E8";

/// The same account without flags and without `OwnerCount`.
const ACCOUNT_ROOT_BARE: &str = "11006122000000002400000005250109A4B255\
    DE2DB139A8C7EAE5675E6A6A1A7A4FC1A9C4F8B9C3D8DC83E2C1A1F0A1C2D3E4\
    624000000005F5E0F68114B5F762798A53D543A014CAF8B297CFF8F2F937E8";

#[test]
fn account_root_from_blob() {
    let bytes = hex::decode(ACCOUNT_ROOT).unwrap();
    let root = AccountRoot::from_bytes(&bytes).unwrap();

    assert_eq!(root.account().unwrap().to_address(), GENESIS);
    assert_eq!(root.sequence().unwrap(), 5);
    assert_eq!(root.balance().unwrap().drops(), Some(99_999_990));
    assert_eq!(root.owner_count(), 3);
    assert!(root.requires_auth());
    assert!(!root.requires_dest_tag());
    assert_eq!(root.previous_txn_id().unwrap().to_hex(), PREVIOUS_TXN);
    assert_eq!(root.previous_txn_lgr_seq(), Some(0x0109_A4B2));
    assert_eq!(root.as_object().to_bytes().unwrap(), bytes);

    let json = root.to_json();
    assert_eq!(json["LedgerEntryType"], "AccountRoot");
    assert_eq!(json["Balance"], "99999990");
    assert_eq!(json["Account"], GENESIS);
}

#[test]
fn owner_count_defaults_only_when_absent() {
    let bare = AccountRoot::from_bytes(&hex::decode(ACCOUNT_ROOT_BARE).unwrap())
        .unwrap();
    assert!(!bare.as_object().contains(Field::OwnerCount));
    assert_eq!(bare.owner_count(), 0);
    assert!(!bare.requires_auth());

    let finalized = bare.finalize().unwrap();
    assert_eq!(finalized.as_object().get_u32(Field::OwnerCount), Some(0));

    let full = AccountRoot::from_bytes(&hex::decode(ACCOUNT_ROOT).unwrap())
        .unwrap()
        .finalize()
        .unwrap();
    assert_eq!(full.owner_count(), 3);
}

#[test]
fn truncated_blob_reports_offset() {
    let bytes = hex::decode(ACCOUNT_ROOT).unwrap();
    let err = STObject::from_slice(&bytes[..bytes.len() - 4]).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEnd { .. }));
}

fn offer_in(directory: &str) -> Offer {
    Offer::from_json(&json!({
        "LedgerEntryType": "Offer",
        "Flags": 0,
        "Account": GENESIS,
        "Sequence": 12,
        "TakerPays": { "currency": "USD", "issuer": GENESIS, "value": "10" },
        "TakerGets": { "currency": "EUR", "issuer": GENESIS, "value": "5" },
        "BookDirectory": directory,
        "BookNode": "0",
        "OwnerNode": "0"
    }))
    .unwrap()
}

#[test]
fn book_membership_uses_the_first_24_bytes() {
    let first = "7E984B5F9B6D1A4B36A5F0C1D2E3F40516273849AABBCCDD4E11C37937E08000";
    let second = "7E984B5F9B6D1A4B36A5F0C1D2E3F40516273849AABBCCDD5A038D7EA4C68000";
    let mut base = Hash256::from_hex(first).unwrap().as_bytes().to_owned();
    base[24..].fill(0);
    let base = Hash256::new(base);

    assert!(offer_in(first).belongs_to_book(&base).unwrap());
    assert!(offer_in(second).belongs_to_book(&base).unwrap());

    let mut other = *base.as_bytes();
    other[10] ^= 0xFF;
    assert!(!offer_in(first).belongs_to_book(&Hash256::new(other)).unwrap());
}

#[test]
fn offer_qualities() {
    let offer = offer_in(&Hash256::default().to_hex());
    let ask = offer.ask_quality().unwrap();
    let bid = offer.bid_quality().unwrap();
    assert_eq!(ask.to_string(), "2");
    assert_eq!(bid.to_string(), "0.5");
    assert!((ask.to_f64() * bid.to_f64() - 1.0).abs() < 1e-12);
}

#[test]
fn metadata_reconstructs_trust_line_states() {
    let low = AccountId::new([0x11; 20]).to_address();
    let high = AccountId::new([0x22; 20]).to_address();
    let meta = TransactionMeta::from_json(&json!({
        "TransactionIndex": 5,
        "TransactionResult": "tesSUCCESS",
        "AffectedNodes": [
            { "ModifiedNode": {
                "LedgerEntryType": "RippleState",
                "LedgerIndex": PREVIOUS_TXN,
                "FinalFields": {
                    "Flags": 0,
                    "Balance": { "currency": "USD", "issuer": "rrrrrrrrrrrrrrrrrrrrBZbvji", "value": "-7" },
                    "LowLimit": { "currency": "USD", "issuer": low, "value": "0" },
                    "HighLimit": { "currency": "USD", "issuer": high, "value": "100" }
                },
                "PreviousFields": {
                    "Balance": { "currency": "USD", "issuer": "rrrrrrrrrrrrrrrrrrrrBZbvji", "value": "-3" }
                }
            }},
            { "CreatedNode": {
                "LedgerEntryType": "Offer",
                "LedgerIndex": PREVIOUS_TXN,
                "NewFields": { "Account": low, "Sequence": 4 }
            }}
        ]
    }))
    .unwrap();

    let mut nodes = meta.affected_nodes();
    let modified = nodes.next().unwrap();
    assert_eq!(modified.kind(), NodeKind::Modified);

    let LedgerEntry::RippleState(after) = modified.final_entry().unwrap() else {
        panic!("expected a trust line");
    };
    let Some(LedgerEntry::RippleState(before)) =
        modified.previous_entry().unwrap()
    else {
        panic!("expected a previous trust line");
    };

    let high = AccountId::parse(&high).unwrap();
    assert_eq!(after.balance_for(&high).unwrap().value_string(), "7");
    assert_eq!(before.balance_for(&high).unwrap().value_string(), "3");
    assert_eq!(before.high_limit().unwrap().value_string(), "100");
    assert_eq!(after.ledger_index().unwrap().to_hex(), PREVIOUS_TXN);

    let created = nodes.next().unwrap();
    assert!(created.node_as_previous().is_none());
    assert!(matches!(created.final_entry().unwrap(), LedgerEntry::Offer(_)));
    assert!(nodes.next().is_none());

    let again = TransactionMeta::from_bytes(&meta.to_bytes().unwrap()).unwrap();
    assert_eq!(again, meta);
}
