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

use crate::header::BlockHeader;
use crate::target;
use num_bigint::BigUint;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
/// The dense tail of a chain proof: consecutive headers, one per height.
pub struct HeaderChain {
    headers: Vec<BlockHeader>,
}

impl HeaderChain {
    pub fn new(headers: Vec<BlockHeader>) -> HeaderChain {
        HeaderChain { headers }
    }

    pub fn empty() -> HeaderChain {
        HeaderChain {
            headers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn headers(&self) -> &[BlockHeader] {
        &self.headers
    }

    /// The last header of the chain.
    pub fn head(&self) -> Option<&BlockHeader> {
        self.headers.last()
    }

    /// The cumulative claimed work of the chain in fixed-point work units.
    pub fn total_difficulty(&self) -> BigUint {
        self.headers
            .iter()
            .filter_map(|h| h.target())
            .map(|t| target::difficulty(&t))
            .sum()
    }

    /// Verifies that the headers form a dense chain: each one is the
    /// immediate successor of the previous and carries valid
    /// proof-of-work. An empty chain is trivially dense.
    pub fn verify_dense(&self) -> bool {
        if !self
            .headers
            .windows(2)
            .all(|w| w[1].is_immediate_successor_of(&w[0]))
        {
            return false;
        }

        self.headers.iter().all(|h| h.verify_proof_of_work())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{difficulty, target_to_compact, BLOCK_TARGET_MAX};
    use chrono::prelude::*;
    use crypto::Hash;

    fn mined_header(height: u64, prev: Option<&BlockHeader>, seconds: i64) -> BlockHeader {
        let prev_hash = prev.map(|p| p.hash()).unwrap_or(Hash([3; 32]));
        let mut header = BlockHeader::new(
            height,
            prev_hash,
            Hash([0; 32]),
            target_to_compact(&BLOCK_TARGET_MAX),
            0,
            Utc.timestamp_opt(seconds, 0).unwrap(),
        );

        let mut nonce = 0;
        while !header.verify_proof_of_work() {
            nonce += 1;
            header.set_nonce(nonce);
        }

        header
    }

    #[test]
    fn total_difficulty_sums_header_work() {
        let h1 = mined_header(1, None, 1_000);
        let h2 = mined_header(2, Some(&h1), 1_060);

        let chain = HeaderChain::new(vec![h1, h2]);
        let per_block = difficulty(&BLOCK_TARGET_MAX);

        assert_eq!(chain.total_difficulty(), &per_block * 2u8);
    }

    #[test]
    fn dense_verification() {
        let h1 = mined_header(1, None, 1_000);
        let h2 = mined_header(2, Some(&h1), 1_060);
        let h3 = mined_header(3, Some(&h2), 1_120);

        assert!(HeaderChain::empty().verify_dense());
        assert!(HeaderChain::new(vec![h1.clone(), h2.clone(), h3.clone()]).verify_dense());

        // A gap breaks density.
        assert!(!HeaderChain::new(vec![h1, h3]).verify_dense());
    }
}
