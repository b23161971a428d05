// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Error-type for ledger-data.

use std::io;

use thiserror::Error;

use crate::fields::TypeCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The ledger-data error type.
///
/// Every variant describes malformed input or a rejected object and is
/// returned to the caller. Schema-definition bugs panic when the registries
/// are built instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unexpected end of data at {offset}: {needed} more bytes needed")]
    UnexpectedEnd { offset: usize, needed: usize },
    #[error("Unknown field (type {type_code}, code {field_code}) at {offset}")]
    UnknownField {
        type_code: u16,
        field_code: u16,
        offset: usize,
    },
    #[error("Unknown field name `{name}` at {path}")]
    UnknownFieldName { name: String, path: String },
    #[error("Field {field} expects {expected}, found {found} at {at}")]
    FieldTypeMismatch {
        field: &'static str,
        expected: TypeCode,
        found: String,
        at: String,
    },
    #[error("Invalid JSON at {path}: {reason}")]
    InvalidJson { path: String, reason: String },
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("{format} is missing required field {field}")]
    MissingRequiredField {
        format: &'static str,
        field: &'static str,
    },
    #[error("{format} does not allow field {field}")]
    InvalidFieldPresent {
        format: &'static str,
        field: &'static str,
    },
    #[error("Object has no {0} field")]
    MissingField(&'static str),
    #[error("Unknown {kind} `{value}`")]
    UnknownType { kind: &'static str, value: String },
    #[error("Inconsistent transaction result: {0}")]
    InconsistentResult(String),
    #[error("Invalid affected node: {0}")]
    InvalidAffectedNode(String),
    #[error("Crypto error: {0}")]
    Crypto(String),
    #[error("Hex decoding failed: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn json<P: Into<String>, R: Into<String>>(
        path: P,
        reason: R,
    ) -> Self {
        Error::InvalidJson {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
