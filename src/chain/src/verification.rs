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

use crate::score::score;
use block::{Block, BlockChain, ChainProof};
use constants::DENSE_SUFFIX_LENGTH;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Reasons a chain proof is rejected.
pub enum ProofErr {
    /// The proof's internal structure does not verify: empty or badly
    /// linked prefix, detached or non-dense suffix, bad proof-of-work.
    BadProof,

    /// The dense suffix is neither the protocol length nor the full
    /// tail of a chain shorter than that.
    BadSuffixLength,

    /// A suffix header commits to a different interlink than the one
    /// recomputed from its predecessor.
    InterlinkMismatch,
}

/// Validates a chain proof and materializes its dense suffix.
///
/// Beyond the proof's internal checks this recomputes the interlink of
/// every suffix header from the prefix head forward; a proof can only
/// be applied if its dense tail carries exactly the interlinks our own
/// rules derive.
pub fn verify_proof(proof: &ChainProof) -> Result<Vec<Arc<Block>>, ProofErr> {
    if !proof.verify() {
        return Err(ProofErr::BadProof);
    }

    let suffix_len = proof.suffix().len();

    if suffix_len != DENSE_SUFFIX_LENGTH
        && suffix_len as u64 != proof.head_height().saturating_sub(1)
    {
        return Err(ProofErr::BadSuffixLength);
    }

    let mut head = proof.prefix_head().ok_or(ProofErr::BadProof)?.clone();
    let mut suffix_blocks = Vec::with_capacity(suffix_len);

    for header in proof.suffix().headers() {
        let target = header.target().ok_or(ProofErr::BadProof)?;
        let interlink = head.next_interlink(&target);

        if interlink.hash() != header.interlink_hash() {
            return Err(ProofErr::InterlinkMismatch);
        }

        let block = Arc::new(Block::new(header.clone(), interlink));
        suffix_blocks.push(block.clone());
        head = block;
    }

    Ok(suffix_blocks)
}

/// Decides whether proof `p1` is at least as good as proof `p2`.
///
/// The superblock score above the prefixes' lowest common ancestor
/// decides; equal scores fall through to the cumulative work of the
/// dense suffixes, where a tie counts in favor of `p1`.
pub fn is_better_proof(p1: &ChainProof, p2: &ChainProof, m: usize) -> bool {
    let ancestor_height = BlockChain::lowest_common_ancestor(p1.prefix(), p2.prefix())
        .map(|block| block.height())
        .unwrap_or(0);

    let s1 = score(p1.prefix(), ancestor_height, m);
    let s2 = score(p2.prefix(), ancestor_height, m);

    if s1 != s2 {
        s1 > s2
    } else {
        p1.suffix().total_difficulty() >= p2.suffix().total_difficulty()
    }
}
