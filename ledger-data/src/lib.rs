// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Typed binary ("ST") and JSON serialization for ledger entries and
//! transactions.
//!
//! Objects are generic field maps ([`STObject`]) keyed by the closed
//! [`Field`] catalog. Each ledger-entry type and transaction type has a
//! [`Format`] declaring which fields are required, optional or defaulted.
//! Typed views ([`ledger::AccountRoot`], [`ledger::Offer`],
//! [`tx::Transaction`], ...) wrap an object and expose protocol-specific
//! accessors, and [`tx::TransactionResult`] assembles transactions with their
//! metadata from the shapes returned by ledger servers.

pub mod binary;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fields;
pub mod format;
pub mod ledger;
pub mod object;
pub mod tx;
pub mod types;

use std::io::Write;

pub use binary::BinaryParser;
pub use config::CodecConfig;
pub use error::{Error, Result};
pub use fields::{Field, TypeCode};
pub use format::{apply_format, Format, Requirement};
pub use object::{STArray, STObject, SerializedType, Value};

/// Binary codec shared by every serialized type.
pub trait Serializable {
    fn write<W: Write>(&self, w: &mut W) -> Result<()>;

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self>
    where
        Self: Sized;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![];
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Decodes a value that must span the whole slice.
    fn from_slice(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        let mut parser = BinaryParser::new(bytes);
        let value = Self::read(&mut parser)?;
        parser.expect_end()?;
        Ok(value)
    }
}

/// Builds the field and format registries.
///
/// Registries are otherwise built on first use; calling this once at startup
/// moves any schema-definition panic to load time.
pub fn init() {
    fields::init();
    format::init();
}
