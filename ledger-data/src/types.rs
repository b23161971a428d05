// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Value types carried by fields.

mod account;
mod amount;
mod blob;
mod currency;
mod hash;
mod path;
mod quality;
mod uint;
mod vector256;

pub use account::AccountId;
pub use amount::Amount;
pub use blob::Blob;
pub use currency::{Currency, Issue};
pub use hash::{Hash, Hash128, Hash160, Hash256};
pub use path::{Path, PathSet, PathStep};
pub use quality::Quality;
pub use uint::{UInt, UInt8, UInt16, UInt32, UInt64, decode_uint, encode_uint};
pub use vector256::Vector256;
