// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Hashing and secp256k1 signatures.
//!
//! Messages are signed as `SHA512Half(message)` with ECDSA and the signature
//! is DER encoded. Account ids are `RIPEMD160(SHA256(public key))`.

use std::io;

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

use crate::types::{AccountId, Hash256};
use crate::{Error, Result};

/// Four-byte prefixes that domain-separate hashed payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum HashPrefix {
    /// `TXN\0`, transaction id
    TransactionId = 0x5458_4E00,
    /// `STX\0`, single-signing payload
    TxSign = 0x5354_5800,
}

impl HashPrefix {
    pub fn to_bytes(self) -> [u8; 4] {
        (self as u32).to_be_bytes()
    }
}

/// Incremental SHA-512 that keeps the first 256 bits of the digest.
#[derive(Default, Clone)]
pub struct Sha512Half(Sha512);

impl Sha512Half {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: HashPrefix) -> Self {
        let mut hasher = Self::new();
        hasher.update(&prefix.to_bytes());
        hasher
    }

    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    pub fn finish(self) -> Hash256 {
        let digest = self.0.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest[..32]);
        Hash256::new(out)
    }
}

impl io::Write for Sha512Half {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn sha512_half(data: &[u8]) -> Hash256 {
    let mut hasher = Sha512Half::new();
    hasher.update(data);
    hasher.finish()
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

pub fn account_id_from_public_key(public_key: &[u8]) -> AccountId {
    AccountId::new(ripemd160(&sha256(public_key)))
}

/// Produces signatures over arbitrary messages.
pub trait Signer {
    /// SEC1 compressed public key
    fn public_key(&self) -> Vec<u8>;

    /// DER encoded signature of `SHA512Half(message)`
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;

    fn account_id(&self) -> AccountId {
        account_id_from_public_key(&self.public_key())
    }
}

/// A secp256k1 key pair.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| Error::Crypto(format!("invalid secret key: {e}")))?;
        Ok(Self { signing_key })
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode_upper(self.public_key()))
            .finish()
    }
}

impl Signer for KeyPair {
    fn public_key(&self) -> Vec<u8> {
        self.verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let digest = sha512_half(message);
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest.as_bytes())
            .map_err(|e| Error::Crypto(format!("signing failed: {e}")))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

/// Checks a DER signature of `SHA512Half(message)`.
///
/// A malformed public key is an error, a malformed or mismatching signature
/// is `Ok(false)`.
pub fn verify(
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<bool> {
    let key = VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| Error::Crypto(format!("invalid public key: {e}")))?;
    let Ok(signature) = Signature::from_der(signature) else {
        return Ok(false);
    };
    let digest = sha512_half(message);
    Ok(key.verify_prehash(digest.as_bytes(), &signature).is_ok())
}
