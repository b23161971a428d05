// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::io::Write;

use num_bigint::BigUint;

use crate::{BinaryParser, Error, Result, Serializable};

/// Unsigned integer of exactly `WIDTH` bytes on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UInt<const WIDTH: usize>(BigUint);

pub type UInt8 = UInt<1>;
pub type UInt16 = UInt<2>;
pub type UInt32 = UInt<4>;
pub type UInt64 = UInt<8>;

/// Big-endian encoding of `value`, left-padded to `width` bytes.
pub fn encode_uint(value: &BigUint, width: usize) -> Result<Vec<u8>> {
    if value.bits() > (width as u64) * 8 {
        return Err(Error::Encoding(format!(
            "{value} does not fit in {width} bytes"
        )));
    }
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

pub fn decode_uint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

impl<const WIDTH: usize> UInt<WIDTH> {
    pub fn new(value: BigUint) -> Result<Self> {
        if value.bits() > (WIDTH as u64) * 8 {
            return Err(Error::Encoding(format!(
                "{value} does not fit in {WIDTH} bytes"
            )));
        }
        Ok(Self(value))
    }

    pub fn from_u64(value: u64) -> Result<Self> {
        Self::new(BigUint::from(value))
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn to_u64(&self) -> u64 {
        self.0.iter_u64_digits().next().unwrap_or(0)
    }

    /// Parses the text form: decimal for widths up to 4 bytes, hex above.
    pub fn from_text(text: &str) -> Result<Self> {
        let radix = if WIDTH <= 4 { 10 } else { 16 };
        let invalid = || {
            Error::InvalidValue(format!("`{text}` is not a UInt{}", WIDTH * 8))
        };
        let value =
            BigUint::parse_bytes(text.as_bytes(), radix).ok_or_else(invalid)?;
        Self::new(value)
    }
}

impl<const WIDTH: usize> fmt::Display for UInt<WIDTH> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if WIDTH <= 4 {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{}", self.0.to_str_radix(16))
        }
    }
}

impl<const WIDTH: usize> Serializable for UInt<WIDTH> {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&encode_uint(&self.0, WIDTH)?)?;
        Ok(())
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        Ok(Self(decode_uint(parser.read(WIDTH)?)))
    }
}

impl From<u8> for UInt8 {
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}

impl From<u16> for UInt16 {
    fn from(value: u16) -> Self {
        Self(value.into())
    }
}

impl From<u32> for UInt32 {
    fn from(value: u32) -> Self {
        Self(value.into())
    }
}

impl From<u64> for UInt64 {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn text_forms() {
        assert_eq!(UInt32::from(4_000_000_000u32).to_string(), "4000000000");
        assert_eq!(UInt64::from(0xABCDu64).to_string(), "abcd");
        assert_eq!(UInt64::from_text("ABCD").unwrap().to_u64(), 0xabcd);
        assert_eq!(UInt16::from_text("65535").unwrap().to_u64(), 65535);
        assert!(matches!(UInt16::from_text("65536"), Err(Error::Encoding(_))));
        assert!(UInt8::from_text("x1").is_err());
    }

    #[test]
    fn fixed_width_wire() {
        let bytes = UInt32::from(1u32).to_bytes().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 1]);
        assert_eq!(UInt32::from_slice(&bytes).unwrap(), UInt32::from(1u32));
        assert_eq!(encode_uint(&BigUint::default(), 2).unwrap(), vec![0, 0]);
    }

    proptest! {
        #[test]
        fn width_bound(
            value in any::<u64>(),
            width in prop::sample::select(vec![1usize, 2, 4, 8]),
        ) {
            let big = BigUint::from(value);
            let fits = width == 8 || value < (1u64 << (width * 8));
            match encode_uint(&big, width) {
                Ok(bytes) => {
                    prop_assert!(fits);
                    prop_assert_eq!(bytes.len(), width);
                    prop_assert_eq!(decode_uint(&bytes), big);
                }
                Err(Error::Encoding(_)) => prop_assert!(!fits),
                Err(e) => prop_assert!(false, "unexpected error {e}"),
            }
        }
    }
}
