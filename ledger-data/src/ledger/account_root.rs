// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use super::index::account_root_index;
use super::{ledger_view, LedgerObject};
use crate::fields::Field;
use crate::types::{AccountId, Amount, Blob, Hash256, UInt32};
use crate::{Error, Result};

pub const LSF_PASSWORD_SPENT: u32 = 0x0001_0000;
pub const LSF_REQUIRE_DEST_TAG: u32 = 0x0002_0000;
pub const LSF_REQUIRE_AUTH: u32 = 0x0004_0000;
pub const LSF_DISALLOW_XRP: u32 = 0x0008_0000;
pub const LSF_DISABLE_MASTER: u32 = 0x0010_0000;

ledger_view! {
    /// An account's root entry: balance, sequence and settings.
    AccountRoot
}

impl AccountRoot {
    pub fn account(&self) -> Result<&AccountId> {
        self.0.required(Field::Account)
    }

    pub fn sequence(&self) -> Result<u32> {
        self.0.required_u32(Field::Sequence)
    }

    pub fn balance(&self) -> Result<&Amount> {
        self.0.required(Field::Balance)
    }

    /// Number of entries the account owns; 0 when the field is absent.
    pub fn owner_count(&self) -> u32 {
        self.0.get_u32(Field::OwnerCount).unwrap_or(0)
    }

    pub fn requires_auth(&self) -> bool {
        self.flags() & LSF_REQUIRE_AUTH != 0
    }

    pub fn requires_dest_tag(&self) -> bool {
        self.flags() & LSF_REQUIRE_DEST_TAG != 0
    }

    pub fn master_disabled(&self) -> bool {
        self.flags() & LSF_DISABLE_MASTER != 0
    }

    pub fn regular_key(&self) -> Option<&AccountId> {
        self.0.get_account(Field::RegularKey)
    }

    pub fn domain(&self) -> Option<&Blob> {
        self.0.get_blob(Field::Domain)
    }

    pub fn transfer_rate(&self) -> Option<u32> {
        self.0.get_u32(Field::TransferRate)
    }

    pub fn set_sequence(&mut self, sequence: u32) -> Result<()> {
        self.put(Field::Sequence, UInt32::from(sequence))
    }

    /// Account balances are always held in drops.
    pub fn set_balance(&mut self, balance: Amount) -> Result<()> {
        if !balance.is_native() {
            return Err(Error::InvalidAmount(format!(
                "account balance {balance} is not native"
            )));
        }
        self.put(Field::Balance, balance)
    }

    pub fn set_owner_count(&mut self, count: u32) -> Result<()> {
        self.put(Field::OwnerCount, UInt32::from(count))
    }

    pub fn set_flags(&mut self, flags: u32) -> Result<()> {
        self.put(Field::Flags, UInt32::from(flags))
    }

    pub fn set_regular_key(&mut self, key: AccountId) -> Result<()> {
        self.put(Field::RegularKey, key)
    }

    pub fn set_domain(&mut self, domain: Blob) -> Result<()> {
        self.put(Field::Domain, domain)
    }

    pub fn set_transfer_rate(&mut self, rate: u32) -> Result<()> {
        self.put(Field::TransferRate, UInt32::from(rate))
    }

    /// Recomputes the entry's key from its account.
    pub fn index(&self) -> Result<Hash256> {
        Ok(account_root_index(self.account()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LedgerEntryType;
    use crate::object::STObject;
    use crate::types::UInt16;
    use crate::Error;

    fn base(flags: u32) -> STObject {
        let mut object = STObject::new();
        object
            .put(
                Field::LedgerEntryType,
                UInt16::from(LedgerEntryType::AccountRoot.code()),
            )
            .unwrap();
        object.put_u32(Field::Flags, flags).unwrap();
        object.put(Field::Account, AccountId::new([1; 20])).unwrap();
        object.put_u32(Field::Sequence, 4).unwrap();
        object.put(Field::Balance, Amount::from_drops(1_000).unwrap()).unwrap();
        object.put(Field::PreviousTxnID, Hash256::new([2; 32])).unwrap();
        object.put_u32(Field::PreviousTxnLgrSeq, 9).unwrap();
        object
    }

    #[test]
    fn accessors() {
        let root = AccountRoot::from_object(base(LSF_REQUIRE_AUTH)).unwrap();
        assert_eq!(root.owner_count(), 0);
        assert!(root.requires_auth());
        assert!(!root.requires_dest_tag());
        assert_eq!(root.sequence().unwrap(), 4);
        assert_eq!(root.balance().unwrap().drops(), Some(1_000));
        assert_eq!(
            root.index().unwrap(),
            account_root_index(&AccountId::new([1; 20]))
        );
    }

    #[test]
    fn finalize_fills_owner_count() {
        let root = AccountRoot::from_object(base(0)).unwrap();
        assert_eq!(root.as_object().get_u32(Field::OwnerCount), None);
        let root = root.finalize().unwrap();
        assert_eq!(root.as_object().get_u32(Field::OwnerCount), Some(0));
        assert!(!root.requires_auth());

        let mut missing = base(0);
        missing.remove(Field::Sequence);
        let root = AccountRoot::from_object(missing).unwrap();
        assert!(matches!(
            root.sequence(),
            Err(Error::MissingField("Sequence"))
        ));
        assert!(matches!(
            root.finalize(),
            Err(Error::MissingRequiredField { field: "Sequence", .. })
        ));
    }

    #[test]
    fn setters() {
        let mut root = AccountRoot::from_object(base(0)).unwrap();
        root.set_owner_count(3).unwrap();
        root.set_sequence(5).unwrap();
        root.set_balance(Amount::from_drops(250).unwrap()).unwrap();
        root.set_flags(LSF_REQUIRE_DEST_TAG).unwrap();
        root.set_regular_key(AccountId::new([7; 20])).unwrap();
        root.set_domain(Blob::new(b"example.com".to_vec())).unwrap();
        root.set_transfer_rate(1_005_000_000).unwrap();

        assert_eq!(root.owner_count(), 3);
        assert_eq!(root.sequence().unwrap(), 5);
        assert_eq!(root.balance().unwrap().drops(), Some(250));
        assert!(root.requires_dest_tag());
        assert_eq!(root.regular_key(), Some(&AccountId::new([7; 20])));
        assert_eq!(root.domain().unwrap().as_bytes(), b"example.com");
        assert_eq!(root.transfer_rate(), Some(1_005_000_000));
        let root = root.finalize().unwrap();
        assert_eq!(root.owner_count(), 3);
    }

    #[test]
    fn setters_reject_what_the_format_rules_out() {
        let mut root = AccountRoot::from_object(base(0)).unwrap();
        assert!(matches!(
            root.put(Field::TakerPays, Amount::from_drops(1).unwrap()),
            Err(Error::InvalidFieldPresent {
                format: "AccountRoot",
                field: "TakerPays"
            })
        ));
        assert!(matches!(
            root.put(Field::LedgerEntryType, UInt16::from(0x6fu16)),
            Err(Error::InvalidValue(_))
        ));
        let usd = crate::types::Issue::new(
            crate::types::Currency::from_iso("USD").unwrap(),
            AccountId::new([2; 20]),
        );
        assert!(matches!(
            root.set_balance(Amount::parse("1", usd).unwrap()),
            Err(Error::InvalidAmount(_))
        ));
        assert_eq!(root, AccountRoot::from_object(base(0)).unwrap());
    }
}
