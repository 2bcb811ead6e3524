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

//! Utilities for testing chain modules

use block::target::{hash_to_target, target_depth, target_to_compact, BLOCK_TARGET_MAX};
use block::{Block, BlockChain, BlockHeader, ChainProof, HeaderChain};
use chrono::Duration;
use constants::BLOCK_TIME;
use num_bigint::BigUint;
use std::sync::Arc;

/// Grinds the nonce until the header satisfies its own target.
pub fn mine(mut header: BlockHeader) -> BlockHeader {
    let mut nonce = 0;

    while !header.verify_proof_of_work() {
        nonce += 1;
        header.set_nonce(nonce);
    }

    header
}

/// Mines a child of `prev` at the given target, `gap` seconds after it.
pub fn mine_child_at(prev: &Arc<Block>, target: &BigUint, gap: i64) -> Arc<Block> {
    let interlink = prev.next_interlink(target);

    let header = mine(BlockHeader::new(
        prev.height() + 1,
        prev.hash(),
        interlink.hash(),
        target_to_compact(target),
        0,
        prev.header().timestamp() + Duration::seconds(gap),
    ));

    Arc::new(Block::new(header, interlink))
}

/// Mines a child of `prev` at the maximum target with the nominal
/// block spacing. Chains built this way keep a stable retarget.
pub fn mine_child(prev: &Arc<Block>) -> Arc<Block> {
    mine_child_at(prev, &BLOCK_TARGET_MAX, BLOCK_TIME as i64)
}

/// Mines a child whose hash reaches at least `depth` levels below the
/// maximum target. The claimed target stays at the maximum; only the
/// hash is deeper.
pub fn mine_super_child(prev: &Arc<Block>, depth: u32) -> Arc<Block> {
    let interlink = prev.next_interlink(&BLOCK_TARGET_MAX);

    let mut header = BlockHeader::new(
        prev.height() + 1,
        prev.hash(),
        interlink.hash(),
        target_to_compact(&BLOCK_TARGET_MAX),
        0,
        prev.header().timestamp() + Duration::seconds(BLOCK_TIME as i64),
    );

    let mut nonce = 0;
    while !header.verify_proof_of_work() || target_depth(&hash_to_target(&header.hash())) < depth {
        nonce += 1;
        header.set_nonce(nonce);
    }

    Arc::new(Block::new(header, interlink))
}

/// Builds a chain of `len` blocks starting with genesis, mined at the
/// maximum target with the nominal spacing.
pub fn build_chain(len: usize) -> Vec<Arc<Block>> {
    let mut blocks = vec![Block::genesis()];

    while blocks.len() < len {
        let next = mine_child(blocks.last().unwrap());
        blocks.push(next);
    }

    blocks
}

/// Builds a chain proof over the given blocks: the first `prefix_len`
/// blocks form the prefix, the headers of the rest form the suffix.
pub fn proof_over(blocks: &[Arc<Block>], prefix_len: usize) -> ChainProof {
    let prefix = BlockChain::new(blocks[..prefix_len].to_vec());
    let suffix = HeaderChain::new(
        blocks[prefix_len..]
            .iter()
            .map(|b| b.header().clone())
            .collect(),
    );

    ChainProof::new(prefix, suffix)
}
