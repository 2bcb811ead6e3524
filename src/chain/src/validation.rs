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

use crate::chain_data::ChainData;
use crate::light_chain::PushResult;
use block::target::{is_valid_target, target_to_compact};
use block::{Block, BlockHeader};
use num_bigint::BigUint;
use std::sync::Arc;

/// Validates an incoming header against its stored predecessor and
/// builds the block that will enter the store.
///
/// `next_target` is the engine's retarget result for the predecessor;
/// when the difficulty window is not available yet the check is
/// skipped.
pub(crate) fn validate_header(
    header: &BlockHeader,
    prev: &ChainData,
    next_target: Option<BigUint>,
) -> Result<Arc<Block>, PushResult> {
    // A retrieval-only predecessor terminates its branch.
    if !prev.is_extendable() {
        return Err(PushResult::Orphan);
    }

    if !header.verify_proof_of_work() {
        debug!("Header {} failed its proof-of-work", header.hash());
        return Err(PushResult::Invalid);
    }

    if !header.is_immediate_successor_of(prev.head.header()) {
        debug!(
            "Header {} is not an immediate successor of {}",
            header.hash(),
            prev.head.hash()
        );
        return Err(PushResult::Invalid);
    }

    match next_target {
        Some(ref target) if is_valid_target(target) => {
            if header.n_bits() != target_to_compact(target) {
                debug!(
                    "Header {} carries difficulty {:#010x}, expected {:#010x}",
                    header.hash(),
                    header.n_bits(),
                    target_to_compact(target)
                );
                return Err(PushResult::Invalid);
            }
        }
        Some(_) => {
            warn!(
                "Retarget for predecessor {} produced an inadmissible target, skipping the difficulty check",
                prev.head.hash()
            );
        }
        None => {
            debug!(
                "Difficulty window unavailable below {}, skipping the difficulty check",
                prev.head.hash()
            );
        }
    }

    // The proof-of-work check above guarantees a decodable target.
    let target = header.target().ok_or(PushResult::Invalid)?;
    let interlink = prev.head.next_interlink(&target);

    if interlink.hash() != header.interlink_hash() {
        debug!("Header {} commits to a foreign interlink", header.hash());
        return Err(PushResult::Invalid);
    }

    Ok(Arc::new(Block::new(header.clone(), interlink)))
}
