// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

use super::{hash_from_blob, EngineResult, Transaction, TransactionMeta};
use crate::config::CodecConfig;
use crate::object::STObject;
use crate::types::Hash256;
use crate::{Error, Result};

/// Response shapes a transaction result can be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Stream message: `transaction`, `meta`, top-level `ledger_index`.
    TransactionSubscriptionNotification,
    /// `tx` response: the transaction fields at top level, `meta`.
    RequestTxResult,
    /// `tx` response in binary mode: hex `tx` (or `tx_blob`) and `meta`.
    RequestTxBinary,
    /// `account_tx` entry: `tx` object holding `ledger_index`, `meta`.
    RequestAccountTx,
    /// `account_tx` entry in binary mode: hex `tx_blob` and `meta`.
    RequestAccountTxBinary,
    /// Expanded ledger transaction with `metaData` and an injected
    /// `ledger_index`.
    LedgerTransactionsExpandedWithLedgerIndexInjected,
}

impl Source {
    /// Guesses the shape of `json` from the keys it carries.
    pub fn detect(json: &Json) -> Result<Self> {
        let is_str = |key: &str| json.get(key).is_some_and(Json::is_string);
        let is_obj = |key: &str| json.get(key).is_some_and(Json::is_object);
        let source = if is_str("tx_blob") {
            Source::RequestAccountTxBinary
        } else if is_str("tx") {
            Source::RequestTxBinary
        } else if is_obj("transaction") {
            Source::TransactionSubscriptionNotification
        } else if is_obj("tx") {
            Source::RequestAccountTx
        } else if json.get("metaData").is_some() {
            Source::LedgerTransactionsExpandedWithLedgerIndexInjected
        } else if json.get("TransactionType").is_some() {
            Source::RequestTxResult
        } else {
            return Err(Error::json(
                "$",
                "unrecognized transaction result shape",
            ));
        };
        Ok(source)
    }

    fn is_binary(self) -> bool {
        matches!(
            self,
            Source::RequestTxBinary | Source::RequestAccountTxBinary
        )
    }

    fn validated_by_default(self) -> bool {
        self == Source::LedgerTransactionsExpandedWithLedgerIndexInjected
    }
}

/// Keys of the response envelope that are not transaction fields.
const ENVELOPE_KEYS: &[&str] = &[
    "meta",
    "metadata",
    "metaData",
    "validated",
    "ledger_index",
    "ledger_hash",
    "inLedger",
    "date",
    "ctid",
    "engine_result",
    "engine_result_code",
    "engine_result_message",
];

const META_KEYS: &[&str] = &["meta", "metadata", "metaData"];

/// A transaction together with where and how it was applied.
#[derive(Debug, Clone)]
pub struct TransactionResult {
    pub transaction: Transaction,
    pub meta: Option<TransactionMeta>,
    pub ledger_index: u32,
    pub hash: Hash256,
    pub ledger_hash: Option<Hash256>,
    pub engine_result: Option<EngineResult>,
    pub validated: bool,
}

struct Parts {
    transaction: Transaction,
    meta: Option<TransactionMeta>,
    ledger_index: Option<u32>,
    blob_hash: Option<Hash256>,
}

impl TransactionResult {
    /// Detects the source shape, then assembles the result.
    pub fn parse(json: &Json) -> Result<Self> {
        Self::from_json(json, Source::detect(json)?)
    }

    pub fn from_json(json: &Json, source: Source) -> Result<Self> {
        Self::from_json_with(json, source, &CodecConfig::default())
    }

    pub fn from_json_with(
        json: &Json,
        source: Source,
        config: &CodecConfig,
    ) -> Result<Self> {
        if !json.is_object() {
            return Err(Error::json("$", "expected an object"));
        }
        let parts = if source.is_binary() {
            Self::binary_parts(json, source, config)?
        } else {
            Self::json_parts(json, source, config)?
        };

        let validated = match json.get("validated") {
            Some(Json::Bool(validated)) => *validated,
            Some(other) => {
                return Err(Error::json(
                    "$.validated",
                    format!("expected a boolean, got {other}"),
                ));
            }
            None => source.validated_by_default(),
        };
        if validated && parts.meta.is_none() {
            warn!(?source, "validated result carries no metadata");
            return Err(Error::InconsistentResult(
                "validated transaction without metadata".into(),
            ));
        }
        let ledger_index = match parts.ledger_index {
            Some(index) => index,
            None if validated => {
                warn!(?source, "validated result carries no ledger index");
                return Err(Error::InconsistentResult(
                    "validated transaction without ledger_index".into(),
                ));
            }
            None => 0,
        };

        let mut transaction = parts.transaction;
        let hash = match (transaction.hash().copied(), hash_at(json, "hash")?) {
            (Some(hash), _) | (None, Some(hash)) => hash,
            (None, None) => {
                let hash = match parts.blob_hash {
                    Some(hash) => hash,
                    None => transaction.compute_hash()?,
                };
                debug!(%hash, ?source, "derived transaction hash");
                hash
            }
        };
        transaction.set_hash(hash);

        let engine_result = match &parts.meta {
            Some(meta) => meta.engine_result(),
            None => match json.get("engine_result").and_then(Json::as_str) {
                Some(name) => Some(EngineResult::from_name(name)?),
                None => None,
            },
        };

        Ok(Self {
            transaction,
            meta: parts.meta,
            ledger_index,
            hash,
            ledger_hash: hash_at(json, "ledger_hash")?,
            engine_result,
            validated,
        })
    }

    fn json_parts(
        json: &Json,
        source: Source,
        config: &CodecConfig,
    ) -> Result<Parts> {
        let (tx_json, ledger_index_holder) = match source {
            Source::TransactionSubscriptionNotification => {
                (required(json, "transaction")?, json)
            }
            Source::RequestAccountTx => {
                let tx = required(json, "tx")?;
                (tx, tx)
            }
            _ => (json, json),
        };
        let tx_object =
            STObject::from_json_with(&strip_envelope(tx_json), &config.json)?;
        let meta = match meta_value(json) {
            None | Some(Json::Null) => None,
            Some(meta) => Some(TransactionMeta::from_object(
                STObject::from_json_with(meta, &config.json)?,
            )?),
        };
        Ok(Parts {
            transaction: Transaction::from_object(tx_object)?,
            meta,
            ledger_index: ledger_index_at(ledger_index_holder)?,
            blob_hash: None,
        })
    }

    fn binary_parts(
        json: &Json,
        source: Source,
        config: &CodecConfig,
    ) -> Result<Parts> {
        let tx_key = match source {
            Source::RequestTxBinary if json.get("tx_blob").is_none() => "tx",
            _ => "tx_blob",
        };
        let tx_blob = hex::decode(string_at(json, tx_key)?)?;
        let tx_object = STObject::from_bytes_with(&tx_blob, &config.binary)?;
        let meta = match meta_value(json) {
            None | Some(Json::Null) => None,
            Some(Json::String(meta_hex)) => {
                let bytes = hex::decode(meta_hex)?;
                Some(TransactionMeta::from_object(STObject::from_bytes_with(
                    &bytes,
                    &config.binary,
                )?)?)
            }
            Some(other) => {
                return Err(Error::json(
                    "$.meta",
                    format!("expected a hex string, got {other}"),
                ));
            }
        };
        Ok(Parts {
            transaction: Transaction::from_object(tx_object)?,
            meta,
            ledger_index: ledger_index_at(json)?,
            blob_hash: Some(hash_from_blob(&tx_blob)),
        })
    }

    pub fn transaction_index(&self) -> Option<u32> {
        self.meta.as_ref().map(TransactionMeta::transaction_index)
    }

    /// The `tx` response shape, which [`Source::RequestTxResult`] reads back.
    pub fn to_json(&self) -> Json {
        let mut json = self.transaction.to_json();
        if let Json::Object(map) = &mut json {
            if let Some(meta) = &self.meta {
                map.insert("meta".into(), meta.to_json());
            }
            map.insert("ledger_index".into(), self.ledger_index.into());
            if let Some(ledger_hash) = &self.ledger_hash {
                map.insert("ledger_hash".into(), ledger_hash.to_hex().into());
            }
            map.insert("validated".into(), self.validated.into());
        }
        json
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            hash: *self.hash.as_bytes(),
            ledger_index: self.ledger_index,
            ledger_hash: self.ledger_hash.map(|h| *h.as_bytes()),
            transaction_index: self.transaction_index(),
            transaction_type: self.transaction.tx_type().to_string(),
            account: self.transaction.account().ok().map(|a| a.to_address()),
            engine_result: self.engine_result.map(|r| r.name().to_string()),
            validated: self.validated,
        }
    }

    fn sort_key(&self) -> (u32, Option<u32>, &Hash256) {
        (self.ledger_index, self.transaction_index(), &self.hash)
    }
}

/// Ordered by ledger, then position in the ledger, then hash.
impl Ord for TransactionResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for TransactionResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TransactionResult {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for TransactionResult {}

/// Flat rendering of a [`TransactionResult`] for logs and APIs.
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    #[serde_as(as = "serde_with::hex::Hex<serde_with::formats::Uppercase>")]
    pub hash: [u8; 32],
    pub ledger_index: u32,
    #[serde_as(
        as = "Option<serde_with::hex::Hex<serde_with::formats::Uppercase>>"
    )]
    pub ledger_hash: Option<[u8; 32]>,
    pub transaction_index: Option<u32>,
    pub transaction_type: String,
    pub account: Option<String>,
    pub engine_result: Option<String>,
    pub validated: bool,
}

fn required<'a>(json: &'a Json, key: &str) -> Result<&'a Json> {
    json.get(key)
        .ok_or_else(|| Error::json(format!("$.{key}"), "missing"))
}

fn string_at<'a>(json: &'a Json, key: &str) -> Result<&'a str> {
    required(json, key)?
        .as_str()
        .ok_or_else(|| Error::json(format!("$.{key}"), "expected a string"))
}

fn meta_value(json: &Json) -> Option<&Json> {
    META_KEYS.iter().find_map(|key| json.get(*key))
}

fn hash_at(json: &Json, key: &str) -> Result<Option<Hash256>> {
    match json.get(key) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(hex_str)) => Ok(Some(Hash256::from_hex(hex_str)?)),
        Some(_) => Err(Error::json(format!("$.{key}"), "expected a hash")),
    }
}

// Servers send the index as a number, and sometimes as a decimal string.
fn ledger_index_at(json: &Json) -> Result<Option<u32>> {
    let path = "$.ledger_index";
    let index = match json.get("ledger_index") {
        None | Some(Json::Null) => return Ok(None),
        Some(Json::Number(n)) => n.as_u64(),
        Some(Json::String(s)) => s.parse::<u64>().ok(),
        Some(_) => None,
    };
    let index =
        index.ok_or_else(|| Error::json(path, "expected a ledger index"))?;
    u32::try_from(index)
        .map(Some)
        .map_err(|_| Error::json(path, format!("{index} is out of range")))
}

fn strip_envelope(json: &Json) -> Json {
    let Json::Object(map) = json else {
        return json.clone();
    };
    let map: Map<String, Json> = map
        .iter()
        .filter(|(key, _)| !ENVELOPE_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Json::Object(map)
}
