// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{BinaryParser, Error, Result, Serializable};

/// Fixed-size opaque byte string, rendered as uppercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash<const N: usize>([u8; N]);

pub type Hash128 = Hash<16>;
pub type Hash160 = Hash<20>;
pub type Hash256 = Hash<32>;

impl<const N: usize> Default for Hash<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> Hash<N> {
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner: [u8; N] = bytes.try_into().map_err(|_| {
            Error::InvalidValue(format!(
                "expected {N} bytes for hash, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(inner))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl<const N: usize> From<[u8; N]> for Hash<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for Hash<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> FromStr for Hash<N> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl<const N: usize> fmt::Display for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const N: usize> fmt::Debug for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash{}({})", N * 8, self.to_hex())
    }
}

impl<const N: usize> Serializable for Hash<N> {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&self.0)?;
        Ok(())
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        Ok(Self(parser.read_array()?))
    }
}

impl<const N: usize> Serialize for Hash<N> {
    fn serialize<S>(&self, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de, const N: usize> Deserialize<'de> for Hash<N> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        let hash =
            Hash128::from_hex("00112233445566778899aabbccddeeff").unwrap();
        assert_eq!(hash.to_string(), "00112233445566778899AABBCCDDEEFF");
        assert!(Hash256::default().is_zero());
        assert!(matches!(
            Hash160::from_hex("0011"),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(Hash160::from_hex("zz"), Err(Error::Hex(_))));
    }
}
