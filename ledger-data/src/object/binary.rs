// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io::Write;

use super::{STArray, STObject, Value};
use crate::binary::{write_field_tag, write_vl};
use crate::config::BinaryConfig;
use crate::fields::{Field, TypeCode};
use crate::types::{
    AccountId, Amount, Blob, Hash128, Hash160, Hash256, PathSet, UInt8, UInt16,
    UInt32, UInt64, Vector256,
};
use crate::{BinaryParser, Error, Result, Serializable};

impl Value {
    pub(crate) fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        match self {
            Value::UInt8(v) => v.write(w),
            Value::UInt16(v) => v.write(w),
            Value::UInt32(v) => v.write(w),
            Value::UInt64(v) => v.write(w),
            Value::Hash128(v) => v.write(w),
            Value::Hash160(v) => v.write(w),
            Value::Hash256(v) => v.write(w),
            Value::Amount(v) => v.write(w),
            Value::Blob(v) => v.write(w),
            Value::AccountID(v) => write_vl(w, v.as_bytes()),
            Value::STObject(v) => {
                v.write_fields(w, Field::is_serialized)?;
                write_field_tag(w, Field::ObjectEndMarker)
            }
            Value::STArray(v) => v.write(w),
            Value::PathSet(v) => v.write(w),
            Value::Vector256(v) => v.write(w),
        }
    }

    pub(crate) fn read_from(
        type_code: TypeCode,
        parser: &mut BinaryParser<'_>,
    ) -> Result<Value> {
        let value = match type_code {
            TypeCode::UInt8 => Value::UInt8(UInt8::read(parser)?),
            TypeCode::UInt16 => Value::UInt16(UInt16::read(parser)?),
            TypeCode::UInt32 => Value::UInt32(UInt32::read(parser)?),
            TypeCode::UInt64 => Value::UInt64(UInt64::read(parser)?),
            TypeCode::Hash128 => Value::Hash128(Hash128::read(parser)?),
            TypeCode::Hash160 => Value::Hash160(Hash160::read(parser)?),
            TypeCode::Hash256 => Value::Hash256(Hash256::read(parser)?),
            TypeCode::Amount => Value::Amount(Amount::read(parser)?),
            TypeCode::Blob => Value::Blob(Blob::read(parser)?),
            TypeCode::AccountID => {
                let offset = parser.position();
                let bytes = parser.read_vl()?;
                let account = AccountId::from_bytes(bytes).map_err(|_| {
                    Error::InvalidValue(format!(
                        "account id at offset {offset} has {} bytes",
                        bytes.len()
                    ))
                })?;
                Value::AccountID(account)
            }
            TypeCode::STObject => Value::STObject(
                parser.nested(|p| STObject::read_body(p, true))?,
            ),
            TypeCode::STArray => {
                Value::STArray(parser.nested(|p| STArray::read(p))?)
            }
            TypeCode::PathSet => Value::PathSet(PathSet::read(parser)?),
            TypeCode::Vector256 => Value::Vector256(Vector256::read(parser)?),
        };
        Ok(value)
    }
}

impl STObject {
    /// Writes the fields accepted by `filter` in canonical order, without a
    /// closing marker.
    pub fn write_fields<W, F>(&self, w: &mut W, filter: F) -> Result<()>
    where
        W: Write,
        F: Fn(Field) -> bool,
    {
        for (field, value) in self.iter().filter(|(f, _)| filter(**f)) {
            write_field_tag(w, *field)?;
            value.write_to(w)?;
        }
        Ok(())
    }

    /// Decodes a top-level object with explicit parser limits.
    pub fn from_bytes_with(
        bytes: &[u8],
        config: &BinaryConfig,
    ) -> Result<Self> {
        let mut parser = BinaryParser::with_config(bytes, config);
        let object = Self::read_body(&mut parser, false)?;
        parser.expect_end()?;
        Ok(object)
    }

    pub fn to_hex(&self) -> Result<String> {
        Ok(hex::encode_upper(self.to_bytes()?))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        Self::from_slice(&hex::decode(hex_str)?)
    }

    /// Reads fields until the end of input, or until `ObjectEndMarker` when
    /// `nested`.
    fn read_body(parser: &mut BinaryParser<'_>, nested: bool) -> Result<Self> {
        let mut object = STObject::new();
        loop {
            if !nested && parser.is_empty() {
                return Ok(object);
            }
            let offset = parser.position();
            let field = parser.read_field()?;
            match field {
                Field::ObjectEndMarker if nested => return Ok(object),
                Field::ObjectEndMarker | Field::ArrayEndMarker => {
                    return Err(Error::InvalidValue(format!(
                        "unexpected {field} at offset {offset}"
                    )));
                }
                _ => {}
            }
            let value = Value::read_from(field.type_code(), parser)?;
            if object.contains(field) {
                return Err(Error::InvalidValue(format!(
                    "duplicate field {field} at offset {offset}"
                )));
            }
            object.set(field, value);
        }
    }
}

impl Serializable for STObject {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        self.write_fields(w, Field::is_serialized)
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        Self::read_body(parser, false)
    }
}

/// Nested form: each element's wrapper field, its object and marker, then
/// `ArrayEndMarker`.
impl Serializable for STArray {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        for element in self {
            for (field, value) in element {
                if field.type_code() != TypeCode::STObject {
                    return Err(Error::Encoding(format!(
                        "array element wrapper {field} is not an object"
                    )));
                }
                write_field_tag(w, *field)?;
                value.write_to(w)?;
            }
        }
        write_field_tag(w, Field::ArrayEndMarker)
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        let mut array = STArray::default();
        loop {
            let offset = parser.position();
            let field = parser.read_field()?;
            if field == Field::ArrayEndMarker {
                return Ok(array);
            }
            if field.type_code() != TypeCode::STObject
                || field == Field::ObjectEndMarker
            {
                return Err(Error::FieldTypeMismatch {
                    field: field.name(),
                    expected: TypeCode::STObject,
                    found: field.type_code().to_string(),
                    at: format!("offset {offset}"),
                });
            }
            let inner = parser.nested(|p| STObject::read_body(p, true))?;
            let mut wrapper = STObject::new();
            wrapper.set(field, Value::STObject(inner));
            array.push(wrapper);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BinaryConfig;
    use crate::types::{Currency, Issue};

    fn sample() -> STObject {
        let mut inner = STObject::new();
        inner.put_u32(Field::Flags, 0).unwrap();
        inner.put(Field::LedgerEntryType, UInt16::from(0x72u16)).unwrap();

        let mut nodes = STArray::default();
        nodes.push_wrapped(Field::ModifiedNode, inner).unwrap();

        let mut object = STObject::new();
        object.put_u32(Field::TransactionIndex, 3).unwrap();
        object.put(Field::TransactionResult, UInt8::from(0u8)).unwrap();
        object.put(Field::AffectedNodes, nodes).unwrap();
        object.put(Field::Account, AccountId::new([9; 20])).unwrap();
        object.put(Field::Domain, Blob::new(b"example.com".to_vec())).unwrap();
        let usd = Issue::new(
            Currency::from_iso("USD").unwrap(),
            AccountId::new([4; 20]),
        );
        object
            .put(Field::LimitAmount, Amount::parse("100", usd).unwrap())
            .unwrap();
        object
    }

    #[test]
    fn binary_round_trip() {
        let object = sample();
        let bytes = object.to_bytes().unwrap();
        assert_eq!(STObject::from_slice(&bytes).unwrap(), object);
        let hex_str = object.to_hex().unwrap();
        assert_eq!(STObject::from_hex(&hex_str).unwrap(), object);
    }

    #[test]
    fn account_is_length_prefixed() {
        let mut object = STObject::new();
        object.put(Field::Account, AccountId::new([9; 20])).unwrap();
        let bytes = object.to_bytes().unwrap();
        assert_eq!(&bytes[..2], &[0x81, 0x14]);
        assert_eq!(bytes.len(), 22);
    }

    #[test]
    fn json_only_fields_are_not_written() {
        let mut object = STObject::new();
        object.put(Field::Hash, Hash256::new([1; 32])).unwrap();
        assert!(object.to_bytes().unwrap().is_empty());
    }

    #[test]
    fn truncated_input_reports_offset() {
        let bytes = sample().to_bytes().unwrap();
        let cut = &bytes[..bytes.len() - 1];
        assert!(matches!(
            STObject::from_slice(cut),
            Err(Error::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn depth_limit() {
        let config = BinaryConfig {
            max_depth: 1,
            ..Default::default()
        };
        let bytes = sample().to_bytes().unwrap();
        assert!(matches!(
            STObject::from_bytes_with(&bytes, &config),
            Err(Error::InvalidValue(_))
        ));
        assert!(
            STObject::from_bytes_with(&bytes, &BinaryConfig::default()).is_ok()
        );
    }

    #[test]
    fn array_elements_must_be_objects() {
        // AffectedNodes, then a UInt32 Flags tag inside the array.
        let bytes = [0xF8, 0x22, 0, 0, 0, 0, 0xF1];
        assert!(matches!(
            STObject::from_slice(&bytes),
            Err(Error::FieldTypeMismatch { .. })
        ));
    }

    #[test]
    fn stray_end_marker() {
        assert!(matches!(
            STObject::from_slice(&[0xE1]),
            Err(Error::InvalidValue(_))
        ));
    }
}
