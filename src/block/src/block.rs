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

use crate::header::{BlockHeader, HEADER_BASE_SIZE};
use crate::interlink::BlockInterlink;
use crate::target::{self, hash_to_target, target_depth, target_to_compact, BLOCK_TARGET_MAX};
use chrono::prelude::*;
use crypto::{Hash, NULL_HASH};
use lazy_static::*;
use num_bigint::BigUint;
use std::hash::Hash as HashTrait;
use std::hash::Hasher;
use std::sync::Arc;

lazy_static! {
    /// Atomic reference count to the genesis block.
    static ref GENESIS_RC: Arc<Block> = {
        let interlink = BlockInterlink::empty();
        let header = BlockHeader::new(
            0,
            NULL_HASH,
            interlink.hash(),
            target_to_compact(&BLOCK_TARGET_MAX),
            0,
            Utc.with_ymd_and_hms(2020, 3, 14, 9, 26, 53).unwrap(),
        );

        Arc::new(Block { header, interlink })
    };
}

#[derive(Clone, Debug)]
/// A light block: a header plus the interlink it commits to.
pub struct Block {
    header: BlockHeader,
    interlink: BlockInterlink,
}

impl PartialEq for Block {
    fn eq(&self, other: &Block) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for Block {}

impl HashTrait for Block {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash().hash(state);
    }
}

impl Block {
    pub fn new(header: BlockHeader, interlink: BlockInterlink) -> Block {
        Block { header, interlink }
    }

    /// Returns the genesis block.
    pub fn genesis() -> Arc<Block> {
        GENESIS_RC.clone()
    }

    pub fn is_genesis(&self) -> bool {
        self.hash() == Block::hash(&GENESIS_RC)
    }

    /// The hash of the block, equal to the hash of its header.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    pub fn height(&self) -> u64 {
        self.header.height()
    }

    pub fn prev_hash(&self) -> Hash {
        self.header.prev_hash()
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn interlink(&self) -> &BlockInterlink {
        &self.interlink
    }

    /// The claimed work of the block in fixed-point work units.
    pub fn difficulty(&self) -> BigUint {
        self.header
            .target()
            .map(|t| target::difficulty(&t))
            .unwrap_or_default()
    }

    /// The light form of the block. Light blocks already carry nothing
    /// beyond header and interlink, so this is a plain copy.
    pub fn to_light(&self) -> Block {
        self.clone()
    }

    /// Derives the interlink a successor mined at `next_target` must
    /// commit to. This block replaces the entries for every level its
    /// own proof-of-work saturates; deeper entries are inherited from
    /// this block's interlink, shifted by the difference between the
    /// two target depths.
    pub fn next_interlink(&self, next_target: &BigUint) -> BlockInterlink {
        let next_depth = target_depth(next_target);
        let pow_depth = target_depth(&hash_to_target(&self.hash()));

        // Levels above `next_depth` saturated by this block's proof-of-work.
        let covered = pow_depth.saturating_sub(next_depth) as usize;

        let own_depth = self
            .header
            .target()
            .map(|t| target_depth(&t))
            .unwrap_or(0);
        let offset = own_depth as i64 - next_depth as i64;
        let inherited = (self.interlink.len() as i64 + offset).max(0) as usize;

        let hash = self.hash();
        let len = covered.max(inherited);
        let mut hashes = Vec::with_capacity(len);

        for i in 0..len {
            if i < covered {
                hashes.push(hash);
            } else {
                hashes.push(self.interlink.hashes()[(i as i64 - offset) as usize]);
            }
        }

        BlockInterlink::new(hashes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = self.header.to_bytes();
        buf.extend_from_slice(&self.interlink.to_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Arc<Block>, &'static str> {
        if bytes.is_empty() {
            return Err("Bad block length");
        }

        // The leading byte is the header's timestamp length.
        let header_len = HEADER_BASE_SIZE + bytes[0] as usize;

        if bytes.len() < header_len {
            return Err("Bad block length");
        }

        let header = BlockHeader::from_bytes(&bytes[..header_len])?;
        let interlink = BlockInterlink::from_bytes(&bytes[header_len..])?;

        Ok(Arc::new(Block { header, interlink }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::difficulty;
    use quickcheck::*;

    #[test]
    fn genesis_is_anchored() {
        let genesis = Block::genesis();

        assert!(genesis.is_genesis());
        assert_eq!(genesis.height(), 0);
        assert_eq!(genesis.prev_hash(), NULL_HASH);
        assert!(genesis.interlink().is_empty());
        assert_eq!(genesis.difficulty(), difficulty(&BLOCK_TARGET_MAX));
    }

    #[test]
    fn next_interlink_covers_saturated_levels() {
        let genesis = Block::genesis();
        let interlink = genesis.next_interlink(&BLOCK_TARGET_MAX);

        let pow_depth = target_depth(&hash_to_target(&Block::hash(&genesis)));

        assert_eq!(interlink.len() as u32, pow_depth);
        assert!(interlink.hashes().iter().all(|h| *h == Block::hash(&genesis)));
    }

    #[test]
    fn next_interlink_inherits_deeper_entries() {
        // A block whose own interlink is deeper than its proof-of-work
        // reaches keeps the tail entries of its predecessor view.
        let deep = Hash([7; 32]);
        let header = BlockHeader::new(
            5,
            Hash([1; 32]),
            Hash([2; 32]),
            target_to_compact(&BLOCK_TARGET_MAX),
            0,
            Utc.with_ymd_and_hms(2020, 3, 14, 10, 0, 0).unwrap(),
        );
        let block = Block::new(header, BlockInterlink::new(vec![deep; 6]));

        let interlink = block.next_interlink(&BLOCK_TARGET_MAX);
        let pow_depth = target_depth(&hash_to_target(&block.hash())) as usize;

        assert_eq!(interlink.len(), 6.max(pow_depth));
        for (i, entry) in interlink.hashes().iter().enumerate() {
            if i < pow_depth {
                assert_eq!(*entry, block.hash());
            } else {
                assert_eq!(*entry, deep);
            }
        }
    }

    quickcheck! {
        fn serialize_deserialize(header: BlockHeader, interlink: BlockInterlink) -> bool {
            let block = Block::new(header, interlink);
            *Block::from_bytes(&block.to_bytes()).unwrap() == block
        }
    }
}
