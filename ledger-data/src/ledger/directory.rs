// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use super::index::dir_node_index;
use super::{ledger_view, LedgerObject};
use crate::fields::Field;
use crate::object::{STObject, Value};
use crate::types::{
    AccountId, Currency, Hash160, Hash256, Issue, Quality, UInt64, Vector256,
};
use crate::Result;

ledger_view! {
    /// One page of an owner directory or an order book directory.
    DirectoryNode
}

impl DirectoryNode {
    pub fn root_index(&self) -> Result<&Hash256> {
        self.0.required(Field::RootIndex)
    }

    /// Keys of the entries on this page.
    pub fn indexes(&self) -> &[Hash256] {
        self.0
            .get_vector256(Field::Indexes)
            .map(|v| v.hashes())
            .unwrap_or(&[])
    }

    pub fn owner(&self) -> Option<&AccountId> {
        self.0.get_account(Field::Owner)
    }

    pub fn is_book_directory(&self) -> bool {
        self.0.contains(Field::ExchangeRate)
    }

    pub fn exchange_rate(&self) -> Option<u64> {
        self.0.get_u64(Field::ExchangeRate)
    }

    /// Quality of the offers listed in a book directory.
    pub fn quality(&self) -> Option<Quality> {
        self.exchange_rate().map(Quality::from_rate)
    }

    pub fn taker_pays(&self) -> Option<Issue> {
        self.issue(Field::TakerPaysCurrency, Field::TakerPaysIssuer)
    }

    pub fn taker_gets(&self) -> Option<Issue> {
        self.issue(Field::TakerGetsCurrency, Field::TakerGetsIssuer)
    }

    /// Key of the next page; the root when there is none.
    pub fn next_index(&self) -> Result<Hash256> {
        let page = self.0.get_u64(Field::IndexNext).unwrap_or(0);
        Ok(dir_node_index(self.root_index()?, page))
    }

    /// Key of the previous page; the root when there is none.
    pub fn prev_index(&self) -> Result<Hash256> {
        let page = self.0.get_u64(Field::IndexPrevious).unwrap_or(0);
        Ok(dir_node_index(self.root_index()?, page))
    }

    pub fn set_root_index(&mut self, root: Hash256) -> Result<()> {
        self.put(Field::RootIndex, root)
    }

    pub fn set_indexes(&mut self, indexes: Vector256) -> Result<()> {
        self.put(Field::Indexes, indexes)
    }

    pub fn set_owner(&mut self, owner: AccountId) -> Result<()> {
        self.put(Field::Owner, owner)
    }

    pub fn set_index_next(&mut self, page: u64) -> Result<()> {
        self.put(Field::IndexNext, UInt64::from(page))
    }

    pub fn set_index_previous(&mut self, page: u64) -> Result<()> {
        self.put(Field::IndexPrevious, UInt64::from(page))
    }

    pub fn set_exchange_defaults(&mut self) {
        set_exchange_defaults(&mut self.0);
    }

    fn issue(&self, currency: Field, issuer: Field) -> Option<Issue> {
        let currency = self.0.get_hash160(currency)?;
        let issuer = self.0.get_hash160(issuer)?;
        Some(Issue::new(
            Currency::new(*currency.as_bytes()),
            AccountId::new(*issuer.as_bytes()),
        ))
    }
}

/// Gives book directories the native currency and the null issuer on both
/// sides where unset. Owner directories carry no `ExchangeRate` and are left
/// unchanged.
pub(crate) fn set_exchange_defaults(object: &mut STObject) {
    if !object.contains(Field::ExchangeRate) {
        return;
    }
    for field in [
        Field::TakerPaysCurrency,
        Field::TakerPaysIssuer,
        Field::TakerGetsCurrency,
        Field::TakerGetsIssuer,
    ] {
        if !object.contains(field) {
            object.set(field, Value::Hash160(Hash160::default()));
        }
    }
}
