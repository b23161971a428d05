// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use super::index::ripple_state_index;
use super::{ledger_view, LedgerObject};
use crate::fields::Field;
use crate::types::{AccountId, Amount, Currency, Hash256, Issue};
use crate::{Error, Result};

pub const LSF_LOW_RESERVE: u32 = 0x0001_0000;
pub const LSF_HIGH_RESERVE: u32 = 0x0002_0000;
pub const LSF_LOW_AUTH: u32 = 0x0004_0000;
pub const LSF_HIGH_AUTH: u32 = 0x0008_0000;
pub const LSF_LOW_NO_RIPPLE: u32 = 0x0010_0000;
pub const LSF_HIGH_NO_RIPPLE: u32 = 0x0020_0000;

ledger_view! {
    /// A trust line between a low and a high account.
    ///
    /// `Balance` is stated from the low account's side: positive means the
    /// high account owes the low account.
    RippleState
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Low,
    High,
}

impl RippleState {
    pub fn balance(&self) -> Result<&Amount> {
        self.0.required(Field::Balance)
    }

    pub fn low_limit(&self) -> Result<&Amount> {
        self.0.required(Field::LowLimit)
    }

    pub fn high_limit(&self) -> Result<&Amount> {
        self.0.required(Field::HighLimit)
    }

    pub fn set_balance(&mut self, balance: Amount) -> Result<()> {
        if balance.is_native() {
            return Err(Error::InvalidAmount(
                "trust line balances are issued amounts".into(),
            ));
        }
        self.put(Field::Balance, balance)
    }

    pub fn set_low_limit(&mut self, limit: Amount) -> Result<()> {
        self.put(Field::LowLimit, limit)
    }

    pub fn set_high_limit(&mut self, limit: Amount) -> Result<()> {
        self.put(Field::HighLimit, limit)
    }

    pub fn low_account(&self) -> Result<AccountId> {
        Ok(self.low_limit()?.issuer())
    }

    pub fn high_account(&self) -> Result<AccountId> {
        Ok(self.high_limit()?.issuer())
    }

    pub fn currency(&self) -> Result<Currency> {
        Ok(self.balance()?.currency())
    }

    pub fn is_party(&self, account: &AccountId) -> Result<bool> {
        Ok(*account == self.low_account()? || *account == self.high_account()?)
    }

    /// The other account on the line.
    pub fn counterparty(&self, owner: &AccountId) -> Result<AccountId> {
        match self.side(owner)? {
            Side::Low => self.high_account(),
            Side::High => self.low_account(),
        }
    }

    /// The balance as `owner` sees it, issued by the counterparty.
    pub fn balance_for(&self, owner: &AccountId) -> Result<Amount> {
        let balance = self.balance()?;
        let balance = match self.side(owner)? {
            Side::Low => *balance,
            Side::High => balance.negate(),
        };
        Ok(balance.with_issuer(self.counterparty(owner)?))
    }

    /// The limit `owner` set on the line.
    pub fn limit_for(&self, owner: &AccountId) -> Result<&Amount> {
        match self.side(owner)? {
            Side::Low => self.low_limit(),
            Side::High => self.high_limit(),
        }
    }

    /// The issue `owner` holds on this line.
    pub fn issued(&self, owner: &AccountId) -> Result<Issue> {
        Ok(Issue::new(self.currency()?, self.counterparty(owner)?))
    }

    pub fn is_authorized_by(&self, owner: &AccountId) -> Result<bool> {
        let flag = match self.side(owner)? {
            Side::Low => LSF_LOW_AUTH,
            Side::High => LSF_HIGH_AUTH,
        };
        Ok(self.flags() & flag != 0)
    }

    pub fn no_ripple(&self, owner: &AccountId) -> Result<bool> {
        let flag = match self.side(owner)? {
            Side::Low => LSF_LOW_NO_RIPPLE,
            Side::High => LSF_HIGH_NO_RIPPLE,
        };
        Ok(self.flags() & flag != 0)
    }

    pub fn index(&self) -> Result<Hash256> {
        Ok(ripple_state_index(
            &self.low_account()?,
            &self.high_account()?,
            &self.currency()?,
        ))
    }

    fn side(&self, owner: &AccountId) -> Result<Side> {
        if *owner == self.low_account()? {
            Ok(Side::Low)
        } else if *owner == self.high_account()? {
            Ok(Side::High)
        } else {
            Err(Error::InvalidValue(format!(
                "{owner} is not a party to this trust line"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LedgerEntryType;
    use crate::object::STObject;
    use crate::types::UInt16;

    const LOW: AccountId = AccountId::new([1; 20]);
    const HIGH: AccountId = AccountId::new([2; 20]);

    fn line(balance: &str) -> RippleState {
        let usd = Currency::from_iso("USD").unwrap();
        let mut object = STObject::new();
        object
            .put(
                Field::LedgerEntryType,
                UInt16::from(LedgerEntryType::RippleState.code()),
            )
            .unwrap();
        object.put_u32(Field::Flags, LSF_HIGH_AUTH).unwrap();
        object
            .put(
                Field::Balance,
                Amount::parse(balance, Issue::new(usd, AccountId::default()))
                    .unwrap(),
            )
            .unwrap();
        object
            .put(
                Field::LowLimit,
                Amount::parse("100", Issue::new(usd, LOW)).unwrap(),
            )
            .unwrap();
        object
            .put(
                Field::HighLimit,
                Amount::parse("0", Issue::new(usd, HIGH)).unwrap(),
            )
            .unwrap();
        RippleState::from_object(object).unwrap()
    }

    #[test]
    fn balance_per_side() {
        let line = line("12.5");
        let low = line.balance_for(&LOW).unwrap();
        assert_eq!(low.value_string(), "12.5");
        assert_eq!(low.issuer(), HIGH);

        let high = line.balance_for(&HIGH).unwrap();
        assert_eq!(high.value_string(), "-12.5");
        assert_eq!(high.issuer(), LOW);

        assert_eq!(line.issued(&LOW).unwrap().issuer, HIGH);
        assert_eq!(line.issued(&HIGH).unwrap().issuer, LOW);
        assert_eq!(line.limit_for(&LOW).unwrap().value_string(), "100");
    }

    #[test]
    fn flags_and_strangers() {
        let line = line("-3");
        assert!(line.is_authorized_by(&HIGH).unwrap());
        assert!(!line.is_authorized_by(&LOW).unwrap());
        assert_eq!(line.balance_for(&HIGH).unwrap().value_string(), "3");

        let stranger = AccountId::new([3; 20]);
        assert!(!line.is_party(&stranger).unwrap());
        assert!(matches!(
            line.balance_for(&stranger),
            Err(Error::InvalidValue(_))
        ));
        assert_eq!(
            line.index().unwrap(),
            ripple_state_index(&HIGH, &LOW, &line.currency().unwrap())
        );
    }

    #[test]
    fn setters() {
        let usd = Currency::from_iso("USD").unwrap();
        let mut line = line("1");
        line.set_balance(
            Amount::parse("-7", Issue::new(usd, AccountId::default()))
                .unwrap(),
        )
        .unwrap();
        line.set_low_limit(Amount::parse("50", Issue::new(usd, LOW)).unwrap())
            .unwrap();
        line.set_high_limit(Amount::parse("9", Issue::new(usd, HIGH)).unwrap())
            .unwrap();

        assert_eq!(line.balance_for(&HIGH).unwrap().value_string(), "7");
        assert_eq!(line.limit_for(&LOW).unwrap().value_string(), "50");
        assert_eq!(line.limit_for(&HIGH).unwrap().value_string(), "9");

        assert!(matches!(
            line.set_balance(Amount::from_drops(5).unwrap()),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            line.put(Field::Sequence, crate::types::UInt32::from(1u32)),
            Err(Error::InvalidFieldPresent { field: "Sequence", .. })
        ));
        assert!(line.finalize().is_ok());
    }
}
