// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Transaction;
use crate::crypto::{self, HashPrefix, Sha512Half, Signer};
use crate::fields::Field;
use crate::object::STObject;
use crate::types::{Blob, Hash256};
use crate::{Error, Result, Serializable};

/// A signed transaction ready for submission.
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde_as(as = "serde_with::hex::Hex<serde_with::formats::Uppercase>")]
    pub tx_blob: Vec<u8>,
    pub hash: Hash256,
}

/// The bytes a single signature covers: the signing prefix followed by every
/// serialized field except `TxnSignature`.
pub fn signing_data(object: &STObject) -> Result<Vec<u8>> {
    let mut data = HashPrefix::TxSign.to_bytes().to_vec();
    object.write_fields(&mut data, Field::is_signing_field)?;
    Ok(data)
}

/// Transaction id of a serialized transaction.
pub fn hash_from_blob(tx_blob: &[u8]) -> Hash256 {
    let mut hasher = Sha512Half::with_prefix(HashPrefix::TransactionId);
    hasher.update(tx_blob);
    hasher.finish()
}

impl Transaction {
    /// Sets `SigningPubKey`, finalizes against the transaction's format and
    /// signs.
    pub fn sign<S: Signer>(&self, signer: &S) -> Result<SignedTransaction> {
        let mut object = self.as_object().clone();
        object.remove(Field::TxnSignature);
        object.remove(Field::Hash);
        object.put(Field::SigningPubKey, Blob::new(signer.public_key()))?;
        let mut object =
            Transaction::from_object(object)?.finalize()?.into_object();

        let signature = signer.sign(&signing_data(&object)?)?;
        object.put(Field::TxnSignature, Blob::new(signature))?;

        let tx_blob = object.to_bytes()?;
        let hash = hash_from_blob(&tx_blob);
        debug!(%hash, tx_type = %self.tx_type(), "signed transaction");
        Ok(SignedTransaction { tx_blob, hash })
    }

    /// Checks `TxnSignature` against `SigningPubKey`.
    pub fn verify_signature(&self) -> Result<bool> {
        let public_key = self
            .signing_pub_key()
            .ok_or(Error::MissingField(Field::SigningPubKey.name()))?;
        let signature = self
            .txn_signature()
            .ok_or(Error::MissingField(Field::TxnSignature.name()))?;
        crypto::verify(
            public_key.as_bytes(),
            &signing_data(self.as_object())?,
            signature.as_bytes(),
        )
    }
}

impl SignedTransaction {
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.tx_blob)
    }

    /// Decodes the blob; the result carries `hash`.
    pub fn transaction(&self) -> Result<Transaction> {
        let mut tx = Transaction::from_bytes(&self.tx_blob)?;
        tx.set_hash(self.hash);
        Ok(tx)
    }
}
