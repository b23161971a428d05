// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io::Write;

use serde_json::Value as Json;

use super::Hash256;
use crate::binary::write_vl;
use crate::{BinaryParser, Error, Result, Serializable};

/// A length-prefixed list of 256-bit hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Vector256(Vec<Hash256>);

impl Vector256 {
    pub fn new(hashes: Vec<Hash256>) -> Self {
        Self(hashes)
    }

    pub fn hashes(&self) -> &[Hash256] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, hash: &Hash256) -> bool {
        self.0.contains(hash)
    }

    pub fn to_json(&self) -> Json {
        Json::Array(
            self.0.iter().map(|h| Json::String(h.to_hex())).collect(),
        )
    }

    pub fn from_json(value: &Json, path: &str) -> Result<Self> {
        let Json::Array(items) = value else {
            return Err(Error::json(path, "expected an array of hashes"));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Json::String(s) => Hash256::from_hex(s),
                _ => Err(Error::json(
                    format!("{path}[{i}]"),
                    "expected a hash",
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl FromIterator<Hash256> for Vector256 {
    fn from_iter<I: IntoIterator<Item = Hash256>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serializable for Vector256 {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        let bytes: Vec<u8> =
            self.0.iter().flat_map(|h| h.as_bytes().to_vec()).collect();
        write_vl(w, &bytes)
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        let offset = parser.position();
        let bytes = parser.read_vl()?;
        if bytes.len() % 32 != 0 {
            return Err(Error::InvalidValue(format!(
                "Vector256 at offset {offset} has {} bytes",
                bytes.len()
            )));
        }
        bytes
            .chunks_exact(32)
            .map(Hash256::from_bytes)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}
