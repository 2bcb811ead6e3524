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

use crypto::{hash_slice, Hash, HASH_BYTES};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
/// Per-block pointers to the most recent superblocks. The entry at
/// index `i` references the latest predecessor whose proof-of-work
/// reached `i + 1` levels above the block's own target depth.
pub struct BlockInterlink {
    hashes: Vec<Hash>,
}

impl BlockInterlink {
    pub fn new(hashes: Vec<Hash>) -> BlockInterlink {
        BlockInterlink { hashes }
    }

    pub fn empty() -> BlockInterlink {
        BlockInterlink { hashes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn hashes(&self) -> &[Hash] {
        &self.hashes
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.hashes.iter().any(|h| h == hash)
    }

    /// The hash the successor header commits to via `interlink_hash`.
    pub fn hash(&self) -> Hash {
        hash_slice(&self.to_bytes())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::with_capacity(1 + self.hashes.len() * HASH_BYTES);

        buf.push(self.hashes.len() as u8);

        for hash in self.hashes.iter() {
            buf.extend_from_slice(&hash.0);
        }

        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<BlockInterlink, &'static str> {
        if bytes.is_empty() {
            return Err("Bad interlink length");
        }

        let count = bytes[0] as usize;

        if bytes.len() != 1 + count * HASH_BYTES {
            return Err("Bad interlink length");
        }

        let mut hashes = Vec::with_capacity(count);

        for chunk in bytes[1..].chunks(HASH_BYTES) {
            hashes.push(Hash::from_slice(chunk)?);
        }

        Ok(BlockInterlink { hashes })
    }
}

impl quickcheck::Arbitrary for BlockInterlink {
    fn arbitrary(g: &mut quickcheck::Gen) -> BlockInterlink {
        use quickcheck::Arbitrary;

        let len = usize::arbitrary(g) % 8;
        let hashes = (0..len).map(|_| Hash::arbitrary(g)).collect();

        BlockInterlink { hashes }
    }
}
