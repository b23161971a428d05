// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use super::ledger_view;
use crate::fields::Field;
use crate::types::{Hash256, Vector256};
use crate::Result;

ledger_view! {
    /// Hashes of recent ledgers.
    LedgerHashes
}

impl LedgerHashes {
    pub fn hashes(&self) -> Result<&[Hash256]> {
        Ok(self.0.required::<Vector256>(Field::Hashes)?.hashes())
    }

    pub fn first_ledger_sequence(&self) -> Option<u32> {
        self.0.get_u32(Field::FirstLedgerSequence)
    }

    pub fn last_ledger_sequence(&self) -> Option<u32> {
        self.0.get_u32(Field::LastLedgerSequence)
    }
}

ledger_view! {
    /// Network fee and reserve settings.
    FeeSettings
}

impl FeeSettings {
    /// Cost of the reference transaction, in drops.
    pub fn base_fee(&self) -> Result<u64> {
        self.0.required_u64(Field::BaseFee)
    }

    pub fn reference_fee_units(&self) -> Result<u32> {
        self.0.required_u32(Field::ReferenceFeeUnits)
    }

    pub fn reserve_base(&self) -> Result<u32> {
        self.0.required_u32(Field::ReserveBase)
    }

    pub fn reserve_increment(&self) -> Result<u32> {
        self.0.required_u32(Field::ReserveIncrement)
    }

    /// Reserve held by an account owning `owner_count` entries.
    pub fn account_reserve(&self, owner_count: u32) -> Result<u64> {
        let base = u64::from(self.reserve_base()?);
        let increment = u64::from(self.reserve_increment()?);
        Ok(base + increment * u64::from(owner_count))
    }
}
