// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use super::AccountId;
use crate::{BinaryParser, Error, Result, Serializable};

const NATIVE_CODE: &str = "XRP";
const ISO_OFFSET: usize = 12;

/// A 160-bit currency code. All zeros is the native currency; a standard
/// code keeps its three ASCII letters at bytes 12..15.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Currency([u8; 20]);

impl Currency {
    pub const NATIVE: Currency = Currency([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner: [u8; 20] = bytes.try_into().map_err(|_| {
            Error::InvalidValue(format!(
                "currency must be 20 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(inner))
    }

    pub fn from_iso(code: &str) -> Result<Self> {
        if code == NATIVE_CODE {
            return Ok(Self::NATIVE);
        }
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(Error::InvalidValue(format!(
                "`{code}` is not a currency code"
            )));
        }
        let mut bytes = [0u8; 20];
        bytes[ISO_OFFSET..ISO_OFFSET + 3].copy_from_slice(code.as_bytes());
        Ok(Self(bytes))
    }

    /// Accepts `XRP`, a three letter code, or 40 hex characters.
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() == 40 {
            Self::from_bytes(&hex::decode(text)?)
        } else {
            Self::from_iso(text)
        }
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_native(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The three letter code when the layout is the standard one.
    pub fn iso_code(&self) -> Option<&str> {
        let outside_zero = self
            .0
            .iter()
            .enumerate()
            .all(|(i, b)| (ISO_OFFSET..ISO_OFFSET + 3).contains(&i) || *b == 0);
        if !outside_zero || self.is_native() {
            return None;
        }
        let code =
            std::str::from_utf8(&self.0[ISO_OFFSET..ISO_OFFSET + 3]).ok()?;
        code.bytes().all(|b| b.is_ascii_alphanumeric()).then_some(code)
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            f.write_str(NATIVE_CODE)
        } else if let Some(code) = self.iso_code() {
            f.write_str(code)
        } else {
            f.write_str(&hex::encode_upper(self.0))
        }
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({self})")
    }
}

impl Serializable for Currency {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&self.0)?;
        Ok(())
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        Ok(Self(parser.read_array()?))
    }
}

/// A currency together with the account issuing it. The native issue has a
/// zero currency and a zero issuer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Issue {
    pub currency: Currency,
    pub issuer: AccountId,
}

impl Issue {
    pub const fn new(currency: Currency, issuer: AccountId) -> Self {
        Self { currency, issuer }
    }

    pub fn native() -> Self {
        Self::default()
    }

    pub fn is_native(&self) -> bool {
        self.currency.is_native()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "{}", self.currency)
        } else {
            write!(f, "{}/{}", self.currency, self.issuer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_layout() {
        let usd = Currency::from_iso("USD").unwrap();
        assert_eq!(&usd.as_bytes()[12..15], b"USD");
        assert_eq!(usd.to_string(), "USD");
        assert_eq!(
            hex::encode_upper(usd.as_bytes()),
            "0000000000000000000000005553440000000000"
        );
        assert_eq!(
            Currency::parse("0000000000000000000000005553440000000000")
                .unwrap(),
            usd
        );
    }

    #[test]
    fn native_and_custom() {
        assert!(Currency::parse("XRP").unwrap().is_native());
        assert_eq!(Currency::NATIVE.to_string(), "XRP");

        let custom = "015841551A748AD2C1F76FF6ECB0CCCD00000000";
        let currency = Currency::parse(custom).unwrap();
        assert_eq!(currency.iso_code(), None);
        assert_eq!(currency.to_string(), custom);
        assert!(Currency::from_iso("US").is_err());
    }
}
