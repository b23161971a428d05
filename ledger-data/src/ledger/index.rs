// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Ledger index derivation.
//!
//! Every entry lives at `SHA512Half(space ‖ key material)`, where the space
//! is a two-byte tag `0x00, char`.

use crate::crypto::Sha512Half;
use crate::types::{AccountId, Currency, Hash256, Issue};

/// Namespaces of the ledger key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSpace {
    Account,
    Offer,
    RippleState,
    OwnerDirectory,
    BookDirectory,
    DirectoryNode,
    Amendments,
    FeeSettings,
    SkipList,
}

impl LedgerSpace {
    pub fn tag(self) -> [u8; 2] {
        let c = match self {
            LedgerSpace::Account => b'a',
            LedgerSpace::Offer => b'o',
            LedgerSpace::RippleState => b'r',
            LedgerSpace::OwnerDirectory => b'O',
            LedgerSpace::BookDirectory => b'B',
            LedgerSpace::DirectoryNode => b'd',
            LedgerSpace::Amendments => b'f',
            LedgerSpace::FeeSettings => b'e',
            LedgerSpace::SkipList => b's',
        };
        [0, c]
    }

    fn hasher(self) -> Sha512Half {
        let mut hasher = Sha512Half::new();
        hasher.update(&self.tag());
        hasher
    }
}

pub fn account_root_index(account: &AccountId) -> Hash256 {
    let mut hasher = LedgerSpace::Account.hasher();
    hasher.update(account.as_bytes());
    hasher.finish()
}

pub fn offer_index(account: &AccountId, sequence: u32) -> Hash256 {
    let mut hasher = LedgerSpace::Offer.hasher();
    hasher.update(account.as_bytes());
    hasher.update(&sequence.to_be_bytes());
    hasher.finish()
}

/// The trust line between two accounts; argument order does not matter.
pub fn ripple_state_index(
    a: &AccountId,
    b: &AccountId,
    currency: &Currency,
) -> Hash256 {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    let mut hasher = LedgerSpace::RippleState.hasher();
    hasher.update(low.as_bytes());
    hasher.update(high.as_bytes());
    hasher.update(currency.as_bytes());
    hasher.finish()
}

pub fn owner_dir_index(account: &AccountId) -> Hash256 {
    let mut hasher = LedgerSpace::OwnerDirectory.hasher();
    hasher.update(account.as_bytes());
    hasher.finish()
}

/// First index of the order book taking `pays` and giving `gets`. The low
/// 64 bits are zero, leaving room for the quality.
pub fn book_base(pays: &Issue, gets: &Issue) -> Hash256 {
    let mut hasher = LedgerSpace::BookDirectory.hasher();
    hasher.update(pays.currency.as_bytes());
    hasher.update(gets.currency.as_bytes());
    hasher.update(pays.issuer.as_bytes());
    hasher.update(gets.issuer.as_bytes());
    quality_index(&hasher.finish(), 0)
}

/// Replaces the low 64 bits of `base` with `rate`.
pub fn quality_index(base: &Hash256, rate: u64) -> Hash256 {
    let mut bytes = *base.as_bytes();
    bytes[24..].copy_from_slice(&rate.to_be_bytes());
    Hash256::new(bytes)
}

/// Page `page` of the directory rooted at `root`. Page 0 is the root.
pub fn dir_node_index(root: &Hash256, page: u64) -> Hash256 {
    if page == 0 {
        return *root;
    }
    let mut hasher = LedgerSpace::DirectoryNode.hasher();
    hasher.update(root.as_bytes());
    hasher.update(&page.to_be_bytes());
    hasher.finish()
}

pub fn amendments_index() -> Hash256 {
    LedgerSpace::Amendments.hasher().finish()
}

pub fn fee_settings_index() -> Hash256 {
    LedgerSpace::FeeSettings.hasher().finish()
}

pub fn skip_list_index() -> Hash256 {
    LedgerSpace::SkipList.hasher().finish()
}
