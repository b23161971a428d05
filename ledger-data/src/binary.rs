// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Wire primitives: the byte cursor, variable-length prefixes and field tags.

use std::io::Write;

use crate::config::BinaryConfig;
use crate::fields::Field;
use crate::{Error, Result};

/// Largest length a one-byte prefix can carry.
pub const VL_ONE_BYTE_MAX: usize = 192;
/// Largest length a two-byte prefix can carry.
pub const VL_TWO_BYTE_MAX: usize = 12480;
/// Largest length a three-byte prefix can carry.
pub const MAX_VL_LENGTH: usize = 918744;

/// Cursor over an in-memory buffer that reports offsets on failure.
#[derive(Debug, Clone)]
pub struct BinaryParser<'a> {
    bytes: &'a [u8],
    offset: usize,
    depth: usize,
    max_depth: usize,
    max_blob_len: usize,
}

impl<'a> BinaryParser<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_config(bytes, &BinaryConfig::default())
    }

    pub fn with_config(bytes: &'a [u8], config: &BinaryConfig) -> Self {
        Self {
            bytes,
            offset: 0,
            depth: 0,
            max_depth: config.max_depth,
            max_blob_len: config.max_blob_len,
        }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn expect_end(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Error::InvalidValue(format!(
                "{n} trailing bytes at offset {}",
                self.offset
            ))),
        }
    }

    pub fn read(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::UnexpectedEnd {
                offset: self.offset,
                needed: len - self.remaining(),
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..start + len])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    pub fn read_u64_be(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Reads a variable-length prefix.
    pub fn read_vl_length(&mut self) -> Result<usize> {
        let offset = self.offset;
        let b1 = self.read_u8()? as usize;
        let len = match b1 {
            0..=192 => b1,
            193..=240 => {
                let b2 = self.read_u8()? as usize;
                193 + (b1 - 193) * 256 + b2
            }
            241..=254 => {
                let b2 = self.read_u8()? as usize;
                let b3 = self.read_u8()? as usize;
                12481 + (b1 - 241) * 65536 + b2 * 256 + b3
            }
            _ => {
                return Err(Error::InvalidValue(format!(
                    "invalid length prefix {b1:#04x} at offset {offset}"
                )));
            }
        };
        if len > self.max_blob_len {
            return Err(Error::InvalidValue(format!(
                "length {len} at offset {offset} exceeds limit {}",
                self.max_blob_len
            )));
        }
        Ok(len)
    }

    /// Reads a length-prefixed blob.
    pub fn read_vl(&mut self) -> Result<&'a [u8]> {
        let len = self.read_vl_length()?;
        self.read(len)
    }

    /// Reads a field tag and resolves it against the registry.
    pub fn read_field(&mut self) -> Result<Field> {
        let offset = self.offset;
        let first = self.read_u8()?;
        let mut type_code = (first >> 4) as u16;
        let mut field_code = (first & 0x0f) as u16;

        if type_code == 0 {
            type_code = self.read_u8()? as u16;
            if type_code < 16 {
                return Err(Error::InvalidValue(format!(
                    "non-canonical type code {type_code} at offset {offset}"
                )));
            }
        }
        if field_code == 0 {
            field_code = self.read_u8()? as u16;
            if field_code < 16 {
                return Err(Error::InvalidValue(format!(
                    "non-canonical field code {field_code} at offset {offset}"
                )));
            }
        }

        Field::from_codes(type_code, field_code).ok_or(Error::UnknownField {
            type_code,
            field_code,
            offset,
        })
    }

    /// Runs `f` one nesting level deeper.
    pub(crate) fn nested<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.depth >= self.max_depth {
            return Err(Error::InvalidValue(format!(
                "nesting deeper than {} at offset {}",
                self.max_depth, self.offset
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Encodes a variable-length prefix.
pub fn encode_vl_length(len: usize) -> Result<Vec<u8>> {
    match len {
        0..=VL_ONE_BYTE_MAX => Ok(vec![len as u8]),
        193..=VL_TWO_BYTE_MAX => {
            let len = len - 193;
            Ok(vec![193 + (len >> 8) as u8, (len & 0xff) as u8])
        }
        12481..=MAX_VL_LENGTH => {
            let len = len - 12481;
            Ok(vec![
                241 + (len >> 16) as u8,
                ((len >> 8) & 0xff) as u8,
                (len & 0xff) as u8,
            ])
        }
        _ => Err(Error::Encoding(format!(
            "variable length {len} exceeds {MAX_VL_LENGTH}"
        ))),
    }
}

/// Writes a length-prefixed blob.
pub fn write_vl<W: Write>(w: &mut W, bytes: &[u8]) -> Result<()> {
    w.write_all(&encode_vl_length(bytes.len())?)?;
    w.write_all(bytes)?;
    Ok(())
}

/// Encodes the nibble-packed tag of a field.
pub fn encode_field_tag(field: Field) -> Vec<u8> {
    let type_code = field.type_code() as u16;
    let field_code = field.code();

    match (type_code < 16, field_code < 16) {
        (true, true) => vec![((type_code << 4) | field_code) as u8],
        (true, false) => vec![(type_code << 4) as u8, field_code as u8],
        (false, true) => vec![field_code as u8, type_code as u8],
        (false, false) => vec![0, type_code as u8, field_code as u8],
    }
}

pub fn write_field_tag<W: Write>(w: &mut W, field: Field) -> Result<()> {
    w.write_all(&encode_field_tag(field))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vl_length_thresholds() {
        assert_eq!(encode_vl_length(0).unwrap(), vec![0]);
        assert_eq!(encode_vl_length(192).unwrap(), vec![192]);
        assert_eq!(encode_vl_length(193).unwrap(), vec![193, 0]);
        assert_eq!(encode_vl_length(12480).unwrap(), vec![240, 255]);
        assert_eq!(encode_vl_length(12481).unwrap(), vec![241, 0, 0]);
        assert_eq!(encode_vl_length(918744).unwrap(), vec![254, 212, 23]);
        assert!(matches!(
            encode_vl_length(918745),
            Err(Error::Encoding(_))
        ));

        for len in [0, 1, 192, 193, 500, 12480, 12481, 100_000, 918744] {
            let prefix = encode_vl_length(len).unwrap();
            let mut parser = BinaryParser::new(&prefix);
            assert_eq!(parser.read_vl_length().unwrap(), len);
            assert!(parser.is_empty());
        }
    }

    #[test]
    fn vl_respects_configured_limit() {
        let config = BinaryConfig {
            max_blob_len: 10,
            ..Default::default()
        };
        let bytes = [11u8];
        let mut parser = BinaryParser::with_config(&bytes, &config);
        assert!(matches!(
            parser.read_vl_length(),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn field_tags() {
        assert_eq!(encode_field_tag(Field::Flags), vec![0x22]);
        assert_eq!(encode_field_tag(Field::ObjectEndMarker), vec![0xe1]);
        assert_eq!(encode_field_tag(Field::ArrayEndMarker), vec![0xf1]);
        assert_eq!(encode_field_tag(Field::OwnerCount), vec![0x2d]);
        assert_eq!(encode_field_tag(Field::BookDirectory), vec![0x50, 0x10]);
        assert_eq!(
            encode_field_tag(Field::TransactionResult),
            vec![0x03, 0x10]
        );
        assert_eq!(encode_field_tag(Field::Paths), vec![0x01, 0x12]);

        for field in [
            Field::Flags,
            Field::BookDirectory,
            Field::TransactionResult,
            Field::Indexes,
            Field::TakerGetsIssuer,
        ] {
            let tag = encode_field_tag(field);
            let mut parser = BinaryParser::new(&tag);
            assert_eq!(parser.read_field().unwrap(), field);
        }
    }

    #[test]
    fn unknown_and_truncated_tags() {
        let mut parser = BinaryParser::new(&[0x2f]);
        assert!(matches!(
            parser.read_field(),
            Err(Error::UnknownField {
                type_code: 2,
                field_code: 15,
                offset: 0
            })
        ));

        let mut parser = BinaryParser::new(&[0x50]);
        assert!(matches!(
            parser.read_field(),
            Err(Error::UnexpectedEnd { offset: 1, .. })
        ));
    }

    #[test]
    fn nesting_limit() {
        let config = BinaryConfig {
            max_depth: 1,
            ..Default::default()
        };
        let mut parser = BinaryParser::with_config(&[], &config);
        let res = parser.nested(|p| p.nested(|_| Ok(())));
        assert!(matches!(res, Err(Error::InvalidValue(_))));
    }
}
