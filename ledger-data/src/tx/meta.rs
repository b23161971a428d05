// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use serde_json::Value as Json;

use super::EngineResult;
use crate::fields::Field;
use crate::format::LedgerEntryType;
use crate::ledger::LedgerEntry;
use crate::object::{STArray, STObject};
use crate::types::{Amount, Hash256, UInt8};
use crate::{Error, Result, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Created,
    Modified,
    Deleted,
}

impl NodeKind {
    pub fn field(self) -> Field {
        match self {
            NodeKind::Created => Field::CreatedNode,
            NodeKind::Modified => Field::ModifiedNode,
            NodeKind::Deleted => Field::DeletedNode,
        }
    }

    fn from_field(field: Field) -> Option<Self> {
        match field {
            Field::CreatedNode => Some(NodeKind::Created),
            Field::ModifiedNode => Some(NodeKind::Modified),
            Field::DeletedNode => Some(NodeKind::Deleted),
            _ => None,
        }
    }
}

/// One entry of `AffectedNodes`, borrowed from its metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffectedNode<'a> {
    kind: NodeKind,
    node: &'a STObject,
}

impl<'a> AffectedNode<'a> {
    /// Reads a `{"ModifiedNode": {...}}` style wrapper.
    pub fn from_wrapper(wrapper: &'a STObject) -> Result<Self> {
        let mut fields = wrapper.iter();
        let (Some((field, _)), None) = (fields.next(), fields.next()) else {
            return Err(Error::InvalidAffectedNode(format!(
                "wrapper has {} fields",
                wrapper.len()
            )));
        };
        let kind = NodeKind::from_field(*field).ok_or_else(|| {
            Error::InvalidAffectedNode(format!("unexpected wrapper {field}"))
        })?;
        let node = wrapper.required::<STObject>(*field)?;
        Ok(Self { kind, node })
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's own fields, e.g. `LedgerEntryType` and `FinalFields`.
    pub fn node(&self) -> &'a STObject {
        self.node
    }

    /// `None` when the type is absent or unknown.
    pub fn entry_type(&self) -> Option<LedgerEntryType> {
        let code = self.node.get_u16(Field::LedgerEntryType)?;
        LedgerEntryType::from_code(code).ok()
    }

    pub fn ledger_index(&self) -> Option<&'a Hash256> {
        self.node.get_hash256(Field::LedgerIndex)
    }

    /// The entry as it stands after the transaction.
    pub fn node_as_final(&self) -> STObject {
        let fields = match self.kind {
            NodeKind::Created => Field::NewFields,
            NodeKind::Modified | NodeKind::Deleted => Field::FinalFields,
        };
        let mut entry = self.siblings();
        if let Some(fields) = self.node.get_object(fields) {
            entry.overlay(fields);
        }
        entry
    }

    /// The entry as it stood before the transaction; `None` for created
    /// entries. Nodes without `PreviousFields`, such as untouched directory
    /// pages, yield their final fields.
    pub fn node_as_previous(&self) -> Option<STObject> {
        if self.kind == NodeKind::Created {
            return None;
        }
        let mut entry = self.node_as_final();
        if let Some(previous) = self.node.get_object(Field::PreviousFields) {
            entry.overlay(previous);
        }
        Some(entry)
    }

    pub fn final_entry(&self) -> Result<LedgerEntry> {
        LedgerEntry::from_object(self.node_as_final())
    }

    pub fn previous_entry(&self) -> Result<Option<LedgerEntry>> {
        self.node_as_previous().map(LedgerEntry::from_object).transpose()
    }

    // Wrapper members other than the field sets, with `LedgerIndex` moved
    // to the JSON-only `index`.
    fn siblings(&self) -> STObject {
        let mut entry = STObject::new();
        for (field, value) in self.node {
            match field {
                Field::NewFields
                | Field::PreviousFields
                | Field::FinalFields => {}
                Field::LedgerIndex => entry.set(Field::Index, value.clone()),
                _ => entry.set(*field, value.clone()),
            }
        }
        entry
    }
}

/// Metadata of an applied transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionMeta(STObject);

impl TransactionMeta {
    /// Wraps `object` after checking every affected node is well formed.
    pub fn from_object(object: STObject) -> Result<Self> {
        object.required_u32(Field::TransactionIndex)?;
        object.required::<UInt8>(Field::TransactionResult)?;
        for wrapper in object.required::<STArray>(Field::AffectedNodes)? {
            AffectedNode::from_wrapper(wrapper)?;
        }
        Ok(Self(object))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_object(STObject::from_slice(bytes)?)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        Self::from_object(STObject::from_hex(hex_str)?)
    }

    pub fn from_json(json: &Json) -> Result<Self> {
        Self::from_object(STObject::from_json(json)?)
    }

    pub fn as_object(&self) -> &STObject {
        &self.0
    }

    pub fn into_object(self) -> STObject {
        self.0
    }

    pub fn to_json(&self) -> Json {
        self.0.to_json()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.0.to_bytes()
    }

    /// Position of the transaction within its ledger.
    pub fn transaction_index(&self) -> u32 {
        self.0.get_u32(Field::TransactionIndex).unwrap_or(0)
    }

    pub fn result_code(&self) -> u8 {
        self.0.get_u8(Field::TransactionResult).unwrap_or(0)
    }

    /// `None` for codes missing from the catalog.
    pub fn engine_result(&self) -> Option<EngineResult> {
        EngineResult::from_code(i32::from(self.result_code()))
    }

    /// What a payment actually delivered, when recorded.
    pub fn delivered_amount(&self) -> Option<&Amount> {
        self.0.get_amount(Field::DeliveredAmount)
    }

    /// Affected nodes in metadata order.
    pub fn affected_nodes(&self) -> impl Iterator<Item = AffectedNode<'_>> {
        self.0
            .get_array(Field::AffectedNodes)
            .into_iter()
            .flatten()
            .filter_map(|wrapper| AffectedNode::from_wrapper(wrapper).ok())
    }

    pub fn len(&self) -> usize {
        self.affected_nodes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.affected_nodes().next().is_none()
    }

    /// Calls `f` with every modified or deleted node and its previous
    /// state, in metadata order.
    pub fn walk_previous<F>(&self, mut f: F)
    where
        F: FnMut(&AffectedNode<'_>, STObject),
    {
        for node in self.affected_nodes() {
            if let Some(previous) = node.node_as_previous() {
                f(&node, previous);
            }
        }
    }
}
