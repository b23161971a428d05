// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Generic field containers.
//!
//! An [`STObject`] maps fields to values and always iterates in canonical
//! field order, so serialization does not depend on insertion order. An
//! [`STArray`] is a sequence of one-field wrapper objects such as
//! `{"ModifiedNode": {...}}`.

mod binary;
mod json;

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::fields::{Field, TypeCode};
use crate::types::{
    AccountId, Amount, Blob, Hash128, Hash160, Hash256, PathSet, UInt8, UInt16,
    UInt32, UInt64, Vector256,
};
use crate::{Error, Result};

/// A value of any field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    UInt8(UInt8),
    UInt16(UInt16),
    UInt32(UInt32),
    UInt64(UInt64),
    Hash128(Hash128),
    Hash160(Hash160),
    Hash256(Hash256),
    Amount(Amount),
    Blob(Blob),
    AccountID(AccountId),
    STObject(STObject),
    STArray(STArray),
    PathSet(PathSet),
    Vector256(Vector256),
}

impl Value {
    pub fn type_code(&self) -> TypeCode {
        match self {
            Value::UInt8(_) => TypeCode::UInt8,
            Value::UInt16(_) => TypeCode::UInt16,
            Value::UInt32(_) => TypeCode::UInt32,
            Value::UInt64(_) => TypeCode::UInt64,
            Value::Hash128(_) => TypeCode::Hash128,
            Value::Hash160(_) => TypeCode::Hash160,
            Value::Hash256(_) => TypeCode::Hash256,
            Value::Amount(_) => TypeCode::Amount,
            Value::Blob(_) => TypeCode::Blob,
            Value::AccountID(_) => TypeCode::AccountID,
            Value::STObject(_) => TypeCode::STObject,
            Value::STArray(_) => TypeCode::STArray,
            Value::PathSet(_) => TypeCode::PathSet,
            Value::Vector256(_) => TypeCode::Vector256,
        }
    }

    /// The value a defaulted field of this type receives.
    pub fn default_for(type_code: TypeCode) -> Value {
        match type_code {
            TypeCode::UInt8 => Value::UInt8(Default::default()),
            TypeCode::UInt16 => Value::UInt16(Default::default()),
            TypeCode::UInt32 => Value::UInt32(Default::default()),
            TypeCode::UInt64 => Value::UInt64(Default::default()),
            TypeCode::Hash128 => Value::Hash128(Default::default()),
            TypeCode::Hash160 => Value::Hash160(Default::default()),
            TypeCode::Hash256 => Value::Hash256(Default::default()),
            TypeCode::Amount => Value::Amount(Default::default()),
            TypeCode::Blob => Value::Blob(Default::default()),
            TypeCode::AccountID => Value::AccountID(Default::default()),
            TypeCode::STObject => Value::STObject(Default::default()),
            TypeCode::STArray => Value::STArray(Default::default()),
            TypeCode::PathSet => Value::PathSet(Default::default()),
            TypeCode::Vector256 => Value::Vector256(Default::default()),
        }
    }
}

/// Rust types that can be stored in an [`STObject`].
pub trait SerializedType: Sized {
    const TYPE_CODE: TypeCode;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<&Self>;
}

macro_rules! serialized_type {
    ($($ty:ty => $variant:ident,)*) => {
        $(
            impl SerializedType for $ty {
                const TYPE_CODE: TypeCode = TypeCode::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Option<&Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

serialized_type! {
    UInt8 => UInt8,
    UInt16 => UInt16,
    UInt32 => UInt32,
    UInt64 => UInt64,
    Hash128 => Hash128,
    Hash160 => Hash160,
    Hash256 => Hash256,
    Amount => Amount,
    Blob => Blob,
    AccountId => AccountID,
    STObject => STObject,
    STArray => STArray,
    PathSet => PathSet,
    Vector256 => Vector256,
}

/// Field to value map iterated in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct STObject {
    fields: BTreeMap<Field, Value>,
}

impl STObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Field, Value> {
        self.fields.iter()
    }

    pub fn get_value(&self, field: Field) -> Option<&Value> {
        self.fields.get(&field)
    }

    pub fn get<T: SerializedType>(&self, field: Field) -> Option<&T> {
        self.fields.get(&field).and_then(T::from_value)
    }

    /// Like [`STObject::get`] but a missing field is an error.
    pub fn required<T: SerializedType>(&self, field: Field) -> Result<&T> {
        self.get(field).ok_or(Error::MissingField(field.name()))
    }

    /// Inserts `value`, replacing any previous value of the field.
    pub fn put<T: SerializedType>(
        &mut self,
        field: Field,
        value: T,
    ) -> Result<()> {
        self.put_value(field, value.into_value())
    }

    pub fn put_value(&mut self, field: Field, value: Value) -> Result<()> {
        if field.type_code() != value.type_code() {
            return Err(Error::FieldTypeMismatch {
                field: field.name(),
                expected: field.type_code(),
                found: value.type_code().to_string(),
                at: "put".into(),
            });
        }
        self.fields.insert(field, value);
        Ok(())
    }

    /// Insert for values whose type follows from the field itself.
    pub(crate) fn set(&mut self, field: Field, value: Value) {
        debug_assert_eq!(field.type_code(), value.type_code());
        self.fields.insert(field, value);
    }

    pub fn remove(&mut self, field: Field) -> Option<Value> {
        self.fields.remove(&field)
    }

    /// Copies every field of `other` over this object.
    pub fn overlay(&mut self, other: &STObject) {
        for (field, value) in other.iter() {
            self.fields.insert(*field, value.clone());
        }
    }

    pub fn get_u8(&self, field: Field) -> Option<u8> {
        self.get::<UInt8>(field).map(|v| v.to_u64() as u8)
    }

    pub fn get_u16(&self, field: Field) -> Option<u16> {
        self.get::<UInt16>(field).map(|v| v.to_u64() as u16)
    }

    pub fn get_u32(&self, field: Field) -> Option<u32> {
        self.get::<UInt32>(field).map(|v| v.to_u64() as u32)
    }

    pub fn get_u64(&self, field: Field) -> Option<u64> {
        self.get::<UInt64>(field).map(UInt64::to_u64)
    }

    pub fn get_hash128(&self, field: Field) -> Option<&Hash128> {
        self.get(field)
    }

    pub fn get_hash160(&self, field: Field) -> Option<&Hash160> {
        self.get(field)
    }

    pub fn get_hash256(&self, field: Field) -> Option<&Hash256> {
        self.get(field)
    }

    pub fn get_amount(&self, field: Field) -> Option<&Amount> {
        self.get(field)
    }

    pub fn get_blob(&self, field: Field) -> Option<&Blob> {
        self.get(field)
    }

    pub fn get_account(&self, field: Field) -> Option<&AccountId> {
        self.get(field)
    }

    pub fn get_object(&self, field: Field) -> Option<&STObject> {
        self.get(field)
    }

    pub fn get_array(&self, field: Field) -> Option<&STArray> {
        self.get(field)
    }

    pub fn get_pathset(&self, field: Field) -> Option<&PathSet> {
        self.get(field)
    }

    pub fn get_vector256(&self, field: Field) -> Option<&Vector256> {
        self.get(field)
    }

    pub fn required_u32(&self, field: Field) -> Result<u32> {
        self.get_u32(field).ok_or(Error::MissingField(field.name()))
    }

    pub fn required_u64(&self, field: Field) -> Result<u64> {
        self.get_u64(field).ok_or(Error::MissingField(field.name()))
    }

    pub fn put_u32(&mut self, field: Field, value: u32) -> Result<()> {
        self.put(field, UInt32::from(value))
    }

    pub fn put_u64(&mut self, field: Field, value: u64) -> Result<()> {
        self.put(field, UInt64::from(value))
    }
}

impl<'a> IntoIterator for &'a STObject {
    type Item = (&'a Field, &'a Value);
    type IntoIter = btree_map::Iter<'a, Field, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Ordered list of wrapper objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct STArray(Vec<STObject>);

impl STArray {
    pub fn new(elements: Vec<STObject>) -> Self {
        Self(elements)
    }

    /// Appends `{field: inner}`.
    pub fn push_wrapped(
        &mut self,
        field: Field,
        inner: STObject,
    ) -> Result<()> {
        let mut wrapper = STObject::new();
        wrapper.put(field, inner)?;
        self.0.push(wrapper);
        Ok(())
    }

    pub fn push(&mut self, element: STObject) {
        self.0.push(element);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&STObject> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, STObject> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a STArray {
    type Item = &'a STObject;
    type IntoIter = std::slice::Iter<'a, STObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<STObject> for STArray {
    fn from_iter<I: IntoIterator<Item = STObject>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
