// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Per-type field schemas.
//!
//! Each ledger-entry type and transaction type has one [`Format`] stating
//! which fields are required, optional or defaulted. All formats are built
//! from the literal tables in [`ledger`] and [`tx`].

pub mod ledger;
pub mod tx;

use std::collections::BTreeMap;

use tracing::debug;

pub use self::ledger::LedgerEntryType;
pub use self::tx::TransactionType;
use crate::fields::Field;
use crate::object::{STObject, SerializedType, Value};
use crate::{Error, Result};

/// How a format treats a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Must not be present
    Invalid,
    /// Must be present once the object is finalized
    Required,
    /// May be present
    Optional,
    /// Filled with the type's default value when absent
    Default,
}

/// Defines a `u16`-coded enum with name lookups.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $($variant:ident = $code:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub const fn code(self) -> u16 {
                match self {
                    $($name::$variant => $code,)*
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)*
                }
            }

            pub fn from_code(code: u16) -> $crate::Result<Self> {
                match code {
                    $($code => Ok($name::$variant),)*
                    _ => Err($crate::Error::UnknownType {
                        kind: $kind,
                        value: code.to_string(),
                    }),
                }
            }

            pub fn from_name(name: &str) -> $crate::Result<Self> {
                match name {
                    $(stringify!($variant) => Ok($name::$variant),)*
                    _ => Err($crate::Error::UnknownType {
                        kind: $kind,
                        value: name.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}
pub(crate) use coded_enum;

/// The schema of one ledger-entry or transaction type.
#[derive(Debug, Clone)]
pub struct Format {
    name: &'static str,
    fields: BTreeMap<Field, Requirement>,
    extra_defaults: Option<fn(&mut STObject)>,
}

impl Format {
    /// Builds a format from the category's common fields followed by the
    /// type's own fields.
    ///
    /// # Panics
    ///
    /// Panics if a field is listed twice. Formats are static tables, so this
    /// only fires on a definition bug.
    pub fn new(
        name: &'static str,
        common: &[(Field, Requirement)],
        specific: &[(Field, Requirement)],
    ) -> Self {
        let mut fields = BTreeMap::new();
        for (field, requirement) in common.iter().chain(specific) {
            if fields.insert(*field, *requirement).is_some() {
                panic!("format {name} lists {field} twice");
            }
        }
        Self {
            name,
            fields,
            extra_defaults: None,
        }
    }

    /// Adds a defaulting step that runs after the per-field defaults.
    pub fn with_defaults(mut self, hook: fn(&mut STObject)) -> Self {
        self.extra_defaults = Some(hook);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields absent from the format are [`Requirement::Invalid`].
    pub fn requirement(&self, field: Field) -> Requirement {
        self.fields
            .get(&field)
            .copied()
            .unwrap_or(Requirement::Invalid)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, Requirement)> + '_ {
        self.fields.iter().map(|(f, r)| (*f, *r))
    }

    /// Inserts the default value of every absent `Default` field.
    pub fn apply_defaults(&self, object: &mut STObject) {
        for (field, requirement) in self.fields() {
            if requirement == Requirement::Default && !object.contains(field) {
                object.set(field, Value::default_for(field.type_code()));
            }
        }
        if let Some(hook) = self.extra_defaults {
            hook(object);
        }
    }

    /// Checks that every required field is present and that nothing outside
    /// the format is. JSON-only fields are ignored.
    pub fn validate(&self, object: &STObject) -> Result<()> {
        for (field, requirement) in self.fields() {
            if requirement == Requirement::Required && !object.contains(field) {
                debug!(
                    format = self.name,
                    field = %field,
                    "missing required field"
                );
                return Err(Error::MissingRequiredField {
                    format: self.name,
                    field: field.name(),
                });
            }
        }
        for field in object.fields().filter(|f| f.is_serialized()) {
            if self.requirement(field) == Requirement::Invalid {
                debug!(format = self.name, field = %field, "field not allowed");
                return Err(Error::InvalidFieldPresent {
                    format: self.name,
                    field: field.name(),
                });
            }
        }
        Ok(())
    }

    /// Inserts `value` into `object` unless this format rules the field out.
    pub fn put<T: SerializedType>(
        &self,
        object: &mut STObject,
        field: Field,
        value: T,
    ) -> Result<()> {
        let invalid = self.requirement(field) == Requirement::Invalid;
        if invalid && field.is_serialized() {
            debug!(format = self.name, field = %field, "field not allowed");
            return Err(Error::InvalidFieldPresent {
                format: self.name,
                field: field.name(),
            });
        }
        object.put(field, value)
    }

    /// Defaults then validates.
    pub fn apply(&self, mut object: STObject) -> Result<STObject> {
        self.apply_defaults(&mut object);
        self.validate(&object)?;
        Ok(object)
    }

    pub fn for_ledger_entry(
        entry_type: LedgerEntryType,
    ) -> Result<&'static Format> {
        ledger::format(entry_type)
    }

    pub fn for_transaction(
        tx_type: TransactionType,
    ) -> Result<&'static Format> {
        tx::format(tx_type)
    }

    /// The format selected by the object's `TransactionType` or
    /// `LedgerEntryType` field.
    pub fn for_object(object: &STObject) -> Result<&'static Format> {
        if let Some(code) = object.get_u16(Field::TransactionType) {
            return Self::for_transaction(TransactionType::from_code(code)?);
        }
        if let Some(code) = object.get_u16(Field::LedgerEntryType) {
            return Self::for_ledger_entry(LedgerEntryType::from_code(code)?);
        }
        Err(Error::MissingField(Field::TransactionType.name()))
    }
}

/// Defaults and validates `object` against the format its type field
/// selects.
pub fn apply_format(object: STObject) -> Result<STObject> {
    Format::for_object(&object)?.apply(object)
}

pub(crate) fn init() {
    ledger::init();
    tx::init();
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{AccountId, Amount, Blob, Hash256, UInt16};

    fn account_root() -> STObject {
        let mut object = STObject::new();
        let entry_type = UInt16::from(LedgerEntryType::AccountRoot.code());
        object.put(Field::LedgerEntryType, entry_type).unwrap();
        object.put_u32(Field::Flags, 0).unwrap();
        object.put(Field::Account, AccountId::new([3; 20])).unwrap();
        object.put_u32(Field::Sequence, 1).unwrap();
        object.put(Field::Balance, Amount::from_drops(25).unwrap()).unwrap();
        object.put(Field::PreviousTxnID, Hash256::default()).unwrap();
        object.put_u32(Field::PreviousTxnLgrSeq, 2).unwrap();
        object
    }

    #[test]
    #[should_panic(expected = "lists Flags twice")]
    fn duplicate_fields_panic() {
        Format::new(
            "Broken",
            &[(Field::Flags, Requirement::Required)],
            &[(Field::Flags, Requirement::Optional)],
        );
    }

    #[test]
    fn defaults_then_validate() {
        let object = apply_format(account_root()).unwrap();
        assert_eq!(object.get_u32(Field::OwnerCount), Some(0));

        let mut missing = account_root();
        missing.remove(Field::Balance);
        assert!(matches!(
            apply_format(missing),
            Err(Error::MissingRequiredField {
                format: "AccountRoot",
                field: "Balance"
            })
        ));

        let mut extra = account_root();
        extra.put(Field::TxnSignature, Blob::default()).unwrap();
        assert!(matches!(
            apply_format(extra),
            Err(Error::InvalidFieldPresent { field: "TxnSignature", .. })
        ));
    }

    #[test]
    fn json_only_fields_are_exempt() {
        let mut object = account_root();
        object.put(Field::Index, Hash256::new([5; 32])).unwrap();
        assert!(apply_format(object).is_ok());
    }

    #[test]
    fn unknown_type_codes() {
        let mut object = STObject::new();
        object.put(Field::LedgerEntryType, UInt16::from(0x7777u16)).unwrap();
        assert!(matches!(
            Format::for_object(&object),
            Err(Error::UnknownType { kind: "ledger entry type", .. })
        ));
        assert!(matches!(
            Format::for_object(&STObject::new()),
            Err(Error::MissingField(_))
        ));
    }

    #[test]
    fn requirement_lookup() {
        let format =
            Format::for_ledger_entry(LedgerEntryType::AccountRoot).unwrap();
        assert_eq!(format.requirement(Field::OwnerCount), Requirement::Default);
        assert_eq!(format.requirement(Field::Flags), Requirement::Required);
        assert_eq!(format.requirement(Field::Domain), Requirement::Optional);
        assert_eq!(format.requirement(Field::TakerPays), Requirement::Invalid);
    }

    proptest! {
        #[test]
        fn defaulting_is_idempotent(
            owner_count in proptest::option::of(any::<u32>()),
            domain in proptest::option::of(
                proptest::collection::vec(any::<u8>(), 0..16),
            ),
        ) {
            let mut object = account_root();
            if let Some(count) = owner_count {
                object.put_u32(Field::OwnerCount, count).unwrap();
            }
            if let Some(domain) = domain {
                object.put(Field::Domain, Blob::new(domain)).unwrap();
            }
            let once = apply_format(object).unwrap();
            let twice = apply_format(once.clone()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
