// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use super::index::{book_base, offer_index};
use super::{ledger_view, LedgerObject};
use crate::fields::Field;
use crate::types::{AccountId, Amount, Hash256, Quality, UInt32, UInt64};
use crate::Result;

pub const LSF_PASSIVE: u32 = 0x0001_0000;
pub const LSF_SELL: u32 = 0x0002_0000;

/// Bytes of a book directory index shared by every page of one book.
const BOOK_PREFIX_LEN: usize = 24;

ledger_view! {
    /// A standing order to exchange `TakerGets` for `TakerPays`.
    Offer
}

impl Offer {
    pub fn account(&self) -> Result<&AccountId> {
        self.0.required(Field::Account)
    }

    pub fn sequence(&self) -> Result<u32> {
        self.0.required_u32(Field::Sequence)
    }

    /// What the taker pays the owner.
    pub fn taker_pays(&self) -> Result<&Amount> {
        self.0.required(Field::TakerPays)
    }

    /// What the taker receives.
    pub fn taker_gets(&self) -> Result<&Amount> {
        self.0.required(Field::TakerGets)
    }

    pub fn book_directory(&self) -> Result<&Hash256> {
        self.0.required(Field::BookDirectory)
    }

    pub fn book_node(&self) -> Result<u64> {
        self.0.required_u64(Field::BookNode)
    }

    pub fn owner_node(&self) -> Result<u64> {
        self.0.required_u64(Field::OwnerNode)
    }

    pub fn expiration(&self) -> Option<u32> {
        self.0.get_u32(Field::Expiration)
    }

    pub fn set_taker_pays(&mut self, amount: Amount) -> Result<()> {
        self.put(Field::TakerPays, amount)
    }

    pub fn set_taker_gets(&mut self, amount: Amount) -> Result<()> {
        self.put(Field::TakerGets, amount)
    }

    pub fn set_book_directory(&mut self, directory: Hash256) -> Result<()> {
        self.put(Field::BookDirectory, directory)
    }

    pub fn set_book_node(&mut self, page: u64) -> Result<()> {
        self.put(Field::BookNode, UInt64::from(page))
    }

    pub fn set_expiration(&mut self, expiration: u32) -> Result<()> {
        self.put(Field::Expiration, UInt32::from(expiration))
    }

    pub fn is_passive(&self) -> bool {
        self.flags() & LSF_PASSIVE != 0
    }

    pub fn is_sell(&self) -> bool {
        self.flags() & LSF_SELL != 0
    }

    /// `TakerPays / TakerGets`.
    pub fn ask_quality(&self) -> Result<Quality> {
        Quality::compute(self.taker_pays()?, self.taker_gets()?)
    }

    /// `TakerGets / TakerPays`.
    pub fn bid_quality(&self) -> Result<Quality> {
        Quality::compute(self.taker_gets()?, self.taker_pays()?)
    }

    /// The ask quality encoded in the low 64 bits of `BookDirectory`.
    pub fn directory_ask_quality(&self) -> Result<Quality> {
        Ok(Quality::from_book_directory(
            self.book_directory()?,
            self.taker_pays()?.is_native(),
            self.taker_gets()?.is_native(),
        ))
    }

    /// Start index of the book this offer trades in.
    pub fn book_base(&self) -> Result<Hash256> {
        Ok(book_base(
            &self.taker_pays()?.issue(),
            &self.taker_gets()?.issue(),
        ))
    }

    /// Whether `BookDirectory` is a page of the book starting at `base`.
    pub fn belongs_to_book(&self, base: &Hash256) -> Result<bool> {
        let directory = self.book_directory()?;
        Ok(directory.as_bytes()[..BOOK_PREFIX_LEN]
            == base.as_bytes()[..BOOK_PREFIX_LEN])
    }

    pub fn index(&self) -> Result<Hash256> {
        Ok(offer_index(self.account()?, self.sequence()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LedgerEntryType;
    use crate::ledger::index::quality_index;
    use crate::object::STObject;
    use crate::types::{Currency, Issue, UInt16};

    fn issue(code: &str) -> Issue {
        Issue::new(Currency::from_iso(code).unwrap(), AccountId::new([5; 20]))
    }

    fn offer(pays: Amount, gets: Amount, directory: Hash256) -> Offer {
        let mut object = STObject::new();
        object
            .put(
                Field::LedgerEntryType,
                UInt16::from(LedgerEntryType::Offer.code()),
            )
            .unwrap();
        object.put_u32(Field::Flags, LSF_SELL).unwrap();
        object.put(Field::Account, AccountId::new([6; 20])).unwrap();
        object.put_u32(Field::Sequence, 3).unwrap();
        object.put(Field::TakerPays, pays).unwrap();
        object.put(Field::TakerGets, gets).unwrap();
        object.put(Field::BookDirectory, directory).unwrap();
        Offer::from_object(object).unwrap()
    }

    #[test]
    fn qualities_are_reciprocal() {
        let pays = Amount::parse("10", issue("USD")).unwrap();
        let gets = Amount::parse("5", issue("EUR")).unwrap();
        let offer = offer(pays, gets, Hash256::default());
        assert_eq!(offer.ask_quality().unwrap().to_string(), "2");
        assert_eq!(offer.bid_quality().unwrap().to_string(), "0.5");
        let product = offer.ask_quality().unwrap().to_f64()
            * offer.bid_quality().unwrap().to_f64();
        assert!((product - 1.0).abs() < 1e-12);
        assert!(offer.is_sell());
        assert!(!offer.is_passive());
    }

    #[test]
    fn book_membership() {
        let pays = Amount::from_drops(2_000_000).unwrap();
        let gets = Amount::parse("1", issue("USD")).unwrap();
        let base = book_base(&pays.issue(), &gets.issue());

        // 2 XRP per USD in drops: 2e6 = 2000000000000000e-9.
        let rate = Quality::raw_rate(&pays, &gets).unwrap().to_rate();
        let offer = offer(pays, gets, quality_index(&base, rate));

        assert_eq!(offer.book_base().unwrap(), base);
        assert!(offer.belongs_to_book(&base).unwrap());
        let other = book_base(&gets.issue(), &pays.issue());
        assert!(!offer.belongs_to_book(&other).unwrap());

        assert_eq!(
            offer.directory_ask_quality().unwrap(),
            offer.ask_quality().unwrap()
        );
        assert_eq!(offer.directory_ask_quality().unwrap().to_string(), "2");
    }

    #[test]
    fn setters_move_the_offer() {
        let pays = Amount::from_drops(2_000_000).unwrap();
        let gets = Amount::parse("1", issue("USD")).unwrap();
        let mut offer = offer(pays, gets, Hash256::default());

        let gets = Amount::parse("4", issue("USD")).unwrap();
        offer.set_taker_gets(gets).unwrap();
        let base = book_base(&pays.issue(), &gets.issue());
        let rate = Quality::raw_rate(&pays, &gets).unwrap().to_rate();
        offer.set_book_directory(quality_index(&base, rate)).unwrap();
        offer.set_book_node(0).unwrap();
        offer.set_expiration(77).unwrap();

        assert_eq!(offer.taker_gets().unwrap().value_string(), "4");
        assert_eq!(offer.ask_quality().unwrap().to_string(), "0.5");
        assert_eq!(
            offer.directory_ask_quality().unwrap(),
            offer.ask_quality().unwrap()
        );
        assert_eq!(offer.book_node().unwrap(), 0);
        assert_eq!(offer.expiration(), Some(77));

        offer.set_taker_pays(Amount::from_drops(8_000_000).unwrap()).unwrap();
        assert_eq!(offer.ask_quality().unwrap().to_string(), "2");
        assert!(matches!(
            offer.put(Field::Domain, crate::types::Blob::new(vec![1])),
            Err(crate::Error::InvalidFieldPresent { field: "Domain", .. })
        ));
    }
}
