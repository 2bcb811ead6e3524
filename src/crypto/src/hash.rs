/*
  Copyright (C) 2018-2020 The Indigo Core Developers.
  This file is part of the Indigo Core Library.

  The Indigo Core Library is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  The Indigo Core Library is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with the Indigo Core Library. If not, see <http://www.gnu.org/licenses/>.
*/

use blake2::{Blake2s256, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HASH_BYTES: usize = 32;

/// The zero hash. Used as the parent hash of the genesis block.
pub const NULL_HASH: Hash = Hash([0; HASH_BYTES]);

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(pub [u8; HASH_BYTES]);

impl Hash {
    pub const NULL: Hash = NULL_HASH;

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Parses a `Hash` from a slice of exactly `HASH_BYTES` bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Hash, &'static str> {
        if bytes.len() != HASH_BYTES {
            return Err("Bad hash length");
        }

        let mut buf = [0; HASH_BYTES];
        buf.copy_from_slice(bytes);

        Ok(Hash(buf))
    }

    /// The textual form of the hash, lowercase base16.
    pub fn to_base16(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hash({})", self.to_base16())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_base16())
    }
}

impl quickcheck::Arbitrary for Hash {
    fn arbitrary(g: &mut quickcheck::Gen) -> Hash {
        use quickcheck::Arbitrary;

        let mut buf = [0; HASH_BYTES];

        for byte in buf.iter_mut() {
            *byte = u8::arbitrary(g);
        }

        Hash(buf)
    }
}

/// Hashes a slice of bytes with Blake2s-256.
pub fn hash_slice(val: &[u8]) -> Hash {
    let mut hasher = Blake2s256::new();
    let mut result = [0; HASH_BYTES];

    hasher.update(val);
    result.copy_from_slice(hasher.finalize().as_slice());

    Hash(result)
}
