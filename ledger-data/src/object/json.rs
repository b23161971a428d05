// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};
use tracing::debug;

use super::{STArray, STObject, Value};
use crate::config::JsonConfig;
use crate::fields::{Field, TypeCode};
use crate::format::{LedgerEntryType, TransactionType};
use crate::tx::EngineResult;
use crate::types::{
    AccountId, Amount, Blob, Hash, PathSet, UInt, UInt8, UInt16, Vector256,
};
use crate::{Error, Result};

impl Value {
    /// JSON rendering of this value as the contents of `field`.
    pub fn to_json(&self, field: Field) -> Json {
        match self {
            Value::UInt8(v) if field == Field::TransactionResult => {
                EngineResult::from_code(v.to_u64() as i32)
                    .map(|r| Json::from(r.name()))
                    .unwrap_or_else(|| Json::from(v.to_u64()))
            }
            Value::UInt16(v) if field == Field::TransactionType => {
                TransactionType::from_code(v.to_u64() as u16)
                    .map(|t| Json::from(t.name()))
                    .unwrap_or_else(|_| Json::from(v.to_u64()))
            }
            Value::UInt16(v) if field == Field::LedgerEntryType => {
                LedgerEntryType::from_code(v.to_u64() as u16)
                    .map(|t| Json::from(t.name()))
                    .unwrap_or_else(|_| Json::from(v.to_u64()))
            }
            Value::UInt8(v) => Json::from(v.to_u64()),
            Value::UInt16(v) => Json::from(v.to_u64()),
            Value::UInt32(v) => Json::from(v.to_u64()),
            Value::UInt64(v) => Json::String(v.to_string()),
            Value::Hash128(v) => Json::String(v.to_hex()),
            Value::Hash160(v) => Json::String(v.to_hex()),
            Value::Hash256(v) => Json::String(v.to_hex()),
            Value::Amount(v) => v.to_json(),
            Value::Blob(v) => Json::String(v.to_hex()),
            Value::AccountID(v) => Json::String(v.to_address()),
            Value::STObject(v) => v.to_json(),
            Value::STArray(v) => {
                Json::Array(v.iter().map(STObject::to_json).collect())
            }
            Value::PathSet(v) => v.to_json(),
            Value::Vector256(v) => v.to_json(),
        }
    }

    /// Parses `json` as a value of `field`'s declared type.
    pub fn from_json(
        field: Field,
        json: &Json,
        path: &str,
        config: &JsonConfig,
    ) -> Result<Value> {
        let value = match field.type_code() {
            TypeCode::UInt8 => match json {
                Json::String(name) if field == Field::TransactionResult => {
                    let code = EngineResult::from_name(name)?.code();
                    let code = u8::try_from(code).map_err(|_| {
                        Error::InvalidValue(format!(
                            "{name} cannot be stored in {field}"
                        ))
                    })?;
                    Value::UInt8(UInt8::from(code))
                }
                _ => Value::UInt8(uint(json, path)?),
            },
            TypeCode::UInt16 => match json {
                Json::String(name) if field == Field::TransactionType => {
                    let code = TransactionType::from_name(name)?.code();
                    Value::UInt16(UInt16::from(code))
                }
                Json::String(name) if field == Field::LedgerEntryType => {
                    let code = LedgerEntryType::from_name(name)?.code();
                    Value::UInt16(UInt16::from(code))
                }
                _ => Value::UInt16(uint(json, path)?),
            },
            TypeCode::UInt32 => Value::UInt32(uint(json, path)?),
            TypeCode::UInt64 => Value::UInt64(uint(json, path)?),
            TypeCode::Hash128 => Value::Hash128(hash(json, path)?),
            TypeCode::Hash160 => Value::Hash160(hash(json, path)?),
            TypeCode::Hash256 => Value::Hash256(hash(json, path)?),
            TypeCode::Amount => Value::Amount(Amount::from_json(json, path)?),
            TypeCode::Blob => Value::Blob(Blob::from_hex(string(json, path)?)?),
            TypeCode::AccountID => {
                Value::AccountID(AccountId::parse(string(json, path)?)?)
            }
            TypeCode::STObject => {
                Value::STObject(STObject::from_json_at(json, path, config)?)
            }
            TypeCode::STArray => {
                Value::STArray(STArray::from_json_at(json, path, config)?)
            }
            TypeCode::PathSet => {
                Value::PathSet(PathSet::from_json(json, path)?)
            }
            TypeCode::Vector256 => {
                Value::Vector256(Vector256::from_json(json, path)?)
            }
        };
        Ok(value)
    }
}

fn string<'a>(json: &'a Json, path: &str) -> Result<&'a str> {
    json.as_str()
        .ok_or_else(|| {
            Error::json(path, format!("expected a string, got {json}"))
        })
}

// Numbers are accepted for every width; strings are decimal up to 32 bits
// and hex for 64 bits.
fn uint<const W: usize>(json: &Json, path: &str) -> Result<UInt<W>> {
    match json {
        Json::Number(n) => {
            let value = n.as_u64().ok_or_else(|| {
                Error::json(path, format!("{n} is not an unsigned integer"))
            })?;
            UInt::from_u64(value)
        }
        Json::String(text) => UInt::from_text(text),
        _ => Err(Error::json(path, format!("expected an integer, got {json}"))),
    }
}

fn hash<const N: usize>(json: &Json, path: &str) -> Result<Hash<N>> {
    Hash::from_hex(string(json, path)?)
}

impl STObject {
    pub fn to_json(&self) -> Json {
        let map: Map<String, Json> = self
            .iter()
            .map(|(field, value)| {
                (field.name().to_string(), value.to_json(*field))
            })
            .collect();
        Json::Object(map)
    }

    /// Parses with default settings: unknown keys are skipped.
    pub fn from_json(json: &Json) -> Result<Self> {
        Self::from_json_with(json, &JsonConfig::default())
    }

    pub fn from_json_with(json: &Json, config: &JsonConfig) -> Result<Self> {
        Self::from_json_at(json, "$", config)
    }

    pub(crate) fn from_json_at(
        json: &Json,
        path: &str,
        config: &JsonConfig,
    ) -> Result<Self> {
        let Json::Object(map) = json else {
            return Err(Error::json(path, "expected an object"));
        };

        let mut object = STObject::new();
        for (key, value) in map {
            let at = format!("{path}.{key}");
            let Some(field) = Field::from_name(key) else {
                if config.strict_fields {
                    return Err(Error::UnknownFieldName {
                        name: key.clone(),
                        path: at,
                    });
                }
                debug!(key = %key, path = %path, "skipping unknown JSON key");
                continue;
            };
            if matches!(field, Field::ObjectEndMarker | Field::ArrayEndMarker)
            {
                return Err(Error::json(at, "end markers are not fields"));
            }
            let value = Value::from_json(field, value, &at, config)?;
            object.set(field, value);
        }
        Ok(object)
    }
}

impl STArray {
    pub(crate) fn from_json_at(
        json: &Json,
        path: &str,
        config: &JsonConfig,
    ) -> Result<Self> {
        let Json::Array(items) = json else {
            return Err(Error::json(path, "expected an array"));
        };

        let mut array = STArray::default();
        for (i, item) in items.iter().enumerate() {
            let at = format!("{path}[{i}]");
            let Some((key, inner)) = item
                .as_object()
                .filter(|m| m.len() == 1)
                .and_then(|m| m.iter().next())
            else {
                return Err(Error::json(
                    at,
                    "expected a one-key wrapper object",
                ));
            };
            let field = Field::from_name(key).ok_or_else(|| {
                Error::UnknownFieldName {
                    name: key.clone(),
                    path: at.clone(),
                }
            })?;
            if field.type_code() != TypeCode::STObject {
                return Err(Error::FieldTypeMismatch {
                    field: field.name(),
                    expected: TypeCode::STObject,
                    found: field.type_code().to_string(),
                    at,
                });
            }
            let inner =
                STObject::from_json_at(inner, &format!("{at}.{key}"), config)?;
            array.push_wrapped(field, inner)?;
        }
        Ok(array)
    }
}

impl Serialize for STObject {
    fn serialize<S>(&self, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(s)
    }
}

impl<'de> Deserialize<'de> for STObject {
    fn deserialize<D>(
        deserializer: D,
    ) -> std::result::Result<STObject, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json: Json = Deserialize::deserialize(deserializer)?;
        STObject::from_json(&json).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn offer_json() -> Json {
        json!({
            "LedgerEntryType": "Offer",
            "Flags": 131072,
            "Account": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            "Sequence": 12,
            "TakerPays": "2000000",
            "TakerGets": {
                "currency": "USD",
                "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
                "value": "1.25"
            },
            "BookDirectory": "4627DFFCFF8B5A265EDBD8AE8C14A52325DBFEDAF4F5C32E5D06F4C3362FE1D0",
            "BookNode": "0",
            "OwnerNode": "1a",
            "PreviousTxnID": "1D2F2B4E5C43E2A1F6B5F04F60C1BE028B6B28A2047A4C3B2CB62B1E2B4D8C51",
            "PreviousTxnLgrSeq": 8326738
        })
    }

    #[test]
    fn json_round_trip() {
        let json = offer_json();
        let object = STObject::from_json(&json).unwrap();
        assert_eq!(object.get_u64(Field::OwnerNode), Some(0x1a));
        assert_eq!(object.get_u16(Field::LedgerEntryType), Some(0x6f));
        assert_eq!(object.to_json(), json);
        assert_eq!(STObject::from_json(&object.to_json()).unwrap(), object);
    }

    #[test]
    fn unknown_keys() {
        let json = json!({ "Flags": 0, "date": 12345 });
        let object = STObject::from_json(&json).unwrap();
        assert_eq!(object.len(), 1);

        let strict = JsonConfig {
            strict_fields: true,
        };
        match STObject::from_json_with(&json, &strict) {
            Err(Error::UnknownFieldName { name, path }) => {
                assert_eq!(name, "date");
                assert_eq!(path, "$.date");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn value_shape_errors_carry_path() {
        let err = STObject::from_json(&json!({ "Sequence": "x" })).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
        let err = STObject::from_json(&json!({ "Sequence": [] })).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidJson { path, .. } if path == "$.Sequence"
        ));
        let err = STObject::from_json(&json!({ "Flags": 4294967296u64 }))
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn arrays_and_results() {
        let json = json!({
            "TransactionIndex": 4,
            "TransactionResult": "tecPATH_DRY",
            "AffectedNodes": [
                { "DeletedNode": { "LedgerEntryType": "RippleState" } }
            ]
        });
        let object = STObject::from_json(&json).unwrap();
        assert_eq!(object.get_u8(Field::TransactionResult), Some(128));
        assert_eq!(object.to_json(), json);

        let bad = json!({ "AffectedNodes": [ { "Flags": 0 } ] });
        assert!(matches!(
            STObject::from_json(&bad),
            Err(Error::FieldTypeMismatch { .. })
        ));
    }

    #[test]
    fn serde_impls() {
        let object = STObject::from_json(&offer_json()).unwrap();
        let text = serde_json::to_string(&object).unwrap();
        let back: STObject = serde_json::from_str(&text).unwrap();
        assert_eq!(back, object);
    }

    #[test]
    fn hostile_amount_exponent_is_an_error() {
        let json = json!({
            "LimitAmount": {
                "currency": "USD",
                "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
                "value": "99999999999999999e2147483647"
            }
        });
        assert!(matches!(
            STObject::from_json(&json),
            Err(Error::InvalidAmount(_))
        ));
    }
}
