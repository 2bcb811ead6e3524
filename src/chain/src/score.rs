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

use block::target::{hash_to_target, target_depth};
use block::BlockChain;
use hashbrown::HashMap;
use num_bigint::BigUint;
use num_traits::Zero;

/// Scores the superblock quality of a proof prefix above the given
/// ancestor height.
///
/// Superblocks of depth `d` are counted for every level up to `d`; the
/// chosen level is the highest one at which at least `m` superblocks
/// accumulate (level 0 if none does). The score weighs the count at the
/// chosen level exponentially, `2^level * count`, so chains backed by
/// many deep superblocks dominate.
///
/// A prefix without blocks above the ancestor scores zero.
pub fn score(prefix: &BlockChain, ancestor_height: u64, m: usize) -> BigUint {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    let mut max_depth = 0;
    let mut total = 0;

    for block in prefix
        .blocks()
        .iter()
        .filter(|b| b.height() >= ancestor_height)
    {
        let depth = target_depth(&hash_to_target(&block.hash()));

        *counts.entry(depth).or_insert(0) += 1;
        max_depth = max_depth.max(depth);
        total += 1;
    }

    if total == 0 {
        return BigUint::zero();
    }

    let mut sum = 0;
    let mut depth = max_depth;

    loop {
        sum += counts.get(&depth).copied().unwrap_or(0);

        if sum >= m || depth == 0 {
            break;
        }

        depth -= 1;
    }

    BigUint::from(sum) << depth as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use block::target::BLOCK_TARGET_MAX;
    use block::Block;
    use std::sync::Arc;

    #[test]
    fn empty_comparison_scores_zero() {
        let chain = BlockChain::new(vec![Block::genesis()]);

        // No blocks above the ancestor height.
        assert_eq!(score(&chain, 1, 2), BigUint::zero());
    }

    #[test]
    fn shallow_blocks_score_at_level_zero() {
        let blocks = build_chain(4);
        let chain = BlockChain::new(blocks.clone());

        // With a threshold larger than the chain, the level clamps to 0
        // and every block above the ancestor counts once.
        assert_eq!(score(&chain, 0, 100), BigUint::from(blocks.len()));
        assert_eq!(score(&chain, 2, 100), BigUint::from(blocks.len() - 2));
    }

    #[test]
    fn deep_superblocks_raise_the_level() {
        let genesis = Block::genesis();
        let s1 = mine_super_child(&genesis, 3);
        let s2 = mine_super_child(&s1, 3);

        let chain = BlockChain::new(vec![genesis, s1.clone(), s2.clone()]);

        // Both mined blocks reach depth >= 3, so with m = 2 the chosen
        // level is at least 3 and the score at least 2 * 2^3.
        let result = score(&chain, 1, 2);
        assert!(result >= BigUint::from(16u8), "score {}", result);
    }

    #[test]
    fn score_is_monotone_in_added_blocks() {
        let blocks = build_chain(6);

        for cut in 1..blocks.len() {
            let shorter = BlockChain::new(blocks[..cut].to_vec());
            let longer = BlockChain::new(blocks[..cut + 1].to_vec());

            assert!(score(&longer, 0, 3) >= score(&shorter, 0, 3));
        }
    }

    #[test]
    fn superblock_depth_is_mined_not_claimed() {
        // A superblock's depth comes from its hash, not from the target
        // it was mined against.
        let genesis = Block::genesis();
        let block: Arc<Block> = mine_super_child(&genesis, 4);

        assert_eq!(block.header().target().unwrap(), *BLOCK_TARGET_MAX);
        assert!(target_depth(&hash_to_target(&block.hash())) >= 4);
    }
}
