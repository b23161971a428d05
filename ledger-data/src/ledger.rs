// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Typed views over ledger entries.
//!
//! A view owns its [`STObject`] and only checks the `LedgerEntryType` on
//! construction; [`LedgerObject::finalize`] additionally applies the entry's
//! format.

mod account_root;
mod directory;
pub mod index;
mod misc;
mod offer;
mod ripple_state;

use serde_json::Value as Json;
use tracing::debug;

pub use self::account_root::AccountRoot;
pub(crate) use self::directory::set_exchange_defaults;
pub use self::directory::DirectoryNode;
pub use self::misc::{FeeSettings, LedgerHashes};
pub use self::offer::Offer;
pub use self::ripple_state::RippleState;
use crate::fields::Field;
use crate::format::{apply_format, LedgerEntryType};
use crate::object::{STObject, SerializedType};
use crate::types::Hash256;
use crate::{Error, Result, Serializable};

/// Common behaviour of the ledger-entry views.
pub trait LedgerObject: Sized {
    const ENTRY_TYPE: LedgerEntryType;

    /// Wraps `object` after checking its `LedgerEntryType`.
    fn from_object(object: STObject) -> Result<Self>;

    fn as_object(&self) -> &STObject;

    fn into_object(self) -> STObject;

    /// Sets `field` after checking the entry's format allows it. The
    /// `LedgerEntryType` itself cannot be changed.
    fn put<T: SerializedType>(
        &mut self,
        field: Field,
        value: T,
    ) -> Result<()>;

    /// Applies the entry's format: defaults absent fields, then validates.
    fn finalize(self) -> Result<Self> {
        Self::from_object(apply_format(self.into_object())?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_object(STObject::from_slice(bytes)?)
    }

    fn from_json(json: &Json) -> Result<Self> {
        Self::from_object(STObject::from_json(json)?)
    }

    fn to_json(&self) -> Json {
        self.as_object().to_json()
    }

    fn flags(&self) -> u32 {
        self.as_object().get_u32(Field::Flags).unwrap_or(0)
    }

    /// The entry's key, from `LedgerIndex` or the JSON `index`.
    fn ledger_index(&self) -> Option<&Hash256> {
        let object = self.as_object();
        object
            .get_hash256(Field::LedgerIndex)
            .or_else(|| object.get_hash256(Field::Index))
    }

    fn previous_txn_id(&self) -> Option<&Hash256> {
        self.as_object().get_hash256(Field::PreviousTxnID)
    }

    fn previous_txn_lgr_seq(&self) -> Option<u32> {
        self.as_object().get_u32(Field::PreviousTxnLgrSeq)
    }
}

pub(crate) fn check_entry_type(
    object: &STObject,
    expected: LedgerEntryType,
) -> Result<()> {
    let code = object
        .get_u16(Field::LedgerEntryType)
        .ok_or(Error::MissingField(Field::LedgerEntryType.name()))?;
    if code != expected.code() {
        return Err(Error::InvalidValue(format!(
            "expected a {expected} entry, found type {code:#06x}"
        )));
    }
    Ok(())
}

pub(crate) fn check_settable(field: Field) -> Result<()> {
    if field == Field::LedgerEntryType {
        return Err(Error::InvalidValue(
            "the entry type of a view is fixed".into(),
        ));
    }
    Ok(())
}

/// Declares a newtype view and its [`LedgerObject`] impl.
macro_rules! ledger_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name($crate::object::STObject);

        impl $crate::ledger::LedgerObject for $name {
            const ENTRY_TYPE: $crate::format::LedgerEntryType =
                $crate::format::LedgerEntryType::$name;

            fn from_object(
                object: $crate::object::STObject,
            ) -> $crate::Result<Self> {
                $crate::ledger::check_entry_type(&object, Self::ENTRY_TYPE)?;
                Ok(Self(object))
            }

            fn as_object(&self) -> &$crate::object::STObject {
                &self.0
            }

            fn into_object(self) -> $crate::object::STObject {
                self.0
            }

            fn put<T: $crate::object::SerializedType>(
                &mut self,
                field: $crate::fields::Field,
                value: T,
            ) -> $crate::Result<()> {
                $crate::ledger::check_settable(field)?;
                $crate::format::Format::for_ledger_entry(Self::ENTRY_TYPE)?
                    .put(&mut self.0, field, value)
            }
        }

        impl TryFrom<$crate::object::STObject> for $name {
            type Error = $crate::Error;

            fn try_from(
                object: $crate::object::STObject,
            ) -> $crate::Result<Self> {
                <Self as $crate::ledger::LedgerObject>::from_object(object)
            }
        }
    };
}
pub(crate) use ledger_view;

/// Any ledger entry, dispatched on `LedgerEntryType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEntry {
    AccountRoot(AccountRoot),
    DirectoryNode(DirectoryNode),
    Offer(Offer),
    RippleState(RippleState),
    LedgerHashes(LedgerHashes),
    FeeSettings(FeeSettings),
    /// Known types without a dedicated view, and types this crate does not
    /// know.
    Other(STObject),
}

impl LedgerEntry {
    pub fn from_object(object: STObject) -> Result<Self> {
        let code = object
            .get_u16(Field::LedgerEntryType)
            .ok_or(Error::MissingField(Field::LedgerEntryType.name()))?;
        let Ok(entry_type) = LedgerEntryType::from_code(code) else {
            debug!(code, "keeping entry of unknown type as opaque");
            return Ok(LedgerEntry::Other(object));
        };
        let entry = match entry_type {
            LedgerEntryType::AccountRoot => {
                LedgerEntry::AccountRoot(AccountRoot::from_object(object)?)
            }
            LedgerEntryType::DirectoryNode => {
                LedgerEntry::DirectoryNode(DirectoryNode::from_object(object)?)
            }
            LedgerEntryType::Offer => {
                LedgerEntry::Offer(Offer::from_object(object)?)
            }
            LedgerEntryType::RippleState => {
                LedgerEntry::RippleState(RippleState::from_object(object)?)
            }
            LedgerEntryType::LedgerHashes => {
                LedgerEntry::LedgerHashes(LedgerHashes::from_object(object)?)
            }
            LedgerEntryType::FeeSettings => {
                LedgerEntry::FeeSettings(FeeSettings::from_object(object)?)
            }
            LedgerEntryType::EnabledAmendments | LedgerEntryType::Ticket => {
                LedgerEntry::Other(object)
            }
        };
        Ok(entry)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_object(STObject::from_slice(bytes)?)
    }

    /// `None` for entries of an unknown type.
    pub fn entry_type(&self) -> Option<LedgerEntryType> {
        LedgerEntryType::from_code(
            self.as_object().get_u16(Field::LedgerEntryType)?,
        )
        .ok()
    }

    pub fn as_object(&self) -> &STObject {
        match self {
            LedgerEntry::AccountRoot(v) => v.as_object(),
            LedgerEntry::DirectoryNode(v) => v.as_object(),
            LedgerEntry::Offer(v) => v.as_object(),
            LedgerEntry::RippleState(v) => v.as_object(),
            LedgerEntry::LedgerHashes(v) => v.as_object(),
            LedgerEntry::FeeSettings(v) => v.as_object(),
            LedgerEntry::Other(object) => object,
        }
    }

    pub fn into_object(self) -> STObject {
        match self {
            LedgerEntry::AccountRoot(v) => v.into_object(),
            LedgerEntry::DirectoryNode(v) => v.into_object(),
            LedgerEntry::Offer(v) => v.into_object(),
            LedgerEntry::RippleState(v) => v.into_object(),
            LedgerEntry::LedgerHashes(v) => v.into_object(),
            LedgerEntry::FeeSettings(v) => v.into_object(),
            LedgerEntry::Other(object) => object,
        }
    }
}
