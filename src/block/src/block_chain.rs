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

use crate::block::Block;
use crypto::Hash;
use hashbrown::HashSet;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
/// A sparse chain of superblocks, ordered by strictly increasing height.
/// Consecutive blocks are connected either directly via `prev_hash` or
/// through an interlink entry of the later block.
pub struct BlockChain {
    blocks: Vec<Arc<Block>>,
}

impl BlockChain {
    pub fn new(blocks: Vec<Arc<Block>>) -> BlockChain {
        BlockChain { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    /// The last block of the chain.
    pub fn head(&self) -> Option<&Arc<Block>> {
        self.blocks.last()
    }

    /// Verifies the internal consistency of the chain: heights strictly
    /// increase, every non-genesis block carries a valid proof-of-work
    /// and every block connects to its predecessor in the sequence.
    pub fn verify_prefix(&self) -> bool {
        if self.blocks.is_empty() {
            return false;
        }

        for window in self.blocks.windows(2) {
            let (prev, next) = (&window[0], &window[1]);

            if next.height() <= prev.height() {
                return false;
            }

            if !Self::connects(prev, next) {
                return false;
            }
        }

        self.blocks
            .iter()
            .all(|b| b.is_genesis() || b.header().verify_proof_of_work())
    }

    /// A block connects to a predecessor if its parent link or any of
    /// its interlink entries references the predecessor's hash.
    fn connects(prev: &Arc<Block>, next: &Arc<Block>) -> bool {
        let prev_hash = prev.hash();

        next.prev_hash() == prev_hash || next.interlink().contains(&prev_hash)
    }

    /// The highest block present in both chains, if any.
    pub fn lowest_common_ancestor(c1: &BlockChain, c2: &BlockChain) -> Option<Arc<Block>> {
        let hashes: HashSet<Hash> = c1.blocks.iter().map(|b| b.hash()).collect();

        c2.blocks
            .iter()
            .rev()
            .find(|b| hashes.contains(&b.hash()))
            .cloned()
    }
}
