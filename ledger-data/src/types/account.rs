// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::sha256;
use crate::{BinaryParser, Error, Result, Serializable};

const ACCOUNT_ID_VERSION: u8 = 0x00;

/// A 160-bit account identifier.
///
/// Renders as a base58check address (`r...`). [`Serializable`] covers the raw
/// 20 bytes; inside an object the field carries a length prefix.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 20]);

impl AccountId {
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner: [u8; 20] = bytes.try_into().map_err(|_| {
            Error::InvalidValue(format!(
                "account id must be 20 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(inner))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn to_address(&self) -> String {
        let mut payload = Vec::with_capacity(25);
        payload.push(ACCOUNT_ID_VERSION);
        payload.extend_from_slice(&self.0);
        let checksum = checksum(&payload);
        payload.extend_from_slice(&checksum);
        bs58::encode(payload)
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .into_string()
    }

    pub fn from_address(address: &str) -> Result<Self> {
        let decoded = bs58::decode(address)
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .into_vec()
            .map_err(|e| {
                Error::InvalidValue(format!("invalid address {address}: {e}"))
            })?;
        if decoded.len() != 25 || decoded[0] != ACCOUNT_ID_VERSION {
            return Err(Error::InvalidValue(format!(
                "{address} is not an account address"
            )));
        }
        let (payload, check) = decoded.split_at(21);
        if checksum(payload)[..] != *check {
            return Err(Error::InvalidValue(format!(
                "bad checksum in address {address}"
            )));
        }
        Self::from_bytes(&payload[1..])
    }

    /// Accepts either an address or 40 hex characters.
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() == 40 && text.chars().all(|c| c.is_ascii_hexdigit()) {
            Self::from_bytes(&hex::decode(text)?)
        } else {
            Self::from_address(text)
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

fn checksum(payload: &[u8]) -> [u8; 4] {
    let digest = sha256(&sha256(payload));
    [digest[0], digest[1], digest[2], digest[3]]
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_address())
    }
}

impl Serializable for AccountId {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&self.0)?;
        Ok(())
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        Ok(Self(parser.read_array()?))
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_address())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
