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

use block::Block;
use num_bigint::BigUint;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
/// The weight of a stored block.
pub enum ChainWeight {
    /// The block may be extended by successors.
    Extendable {
        /// Sum of the claimed difficulty along the chain ending here.
        total_difficulty: BigUint,

        /// Sum of the work actually expended along the chain ending
        /// here, inferred from the block hashes.
        total_work: BigUint,
    },

    /// The block is present for retrieval only. It terminates its
    /// branch: no block may reference it as a predecessor.
    RetrievalOnly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Per-block bookkeeping kept in the chain store.
pub struct ChainData {
    /// The block itself.
    pub head: Arc<Block>,

    /// The cumulative weight of the chain ending at this block.
    pub weight: ChainWeight,

    /// Whether the block lies on the currently selected main chain.
    pub on_main_chain: bool,
}

impl ChainData {
    pub fn extendable(
        head: Arc<Block>,
        total_difficulty: BigUint,
        total_work: BigUint,
        on_main_chain: bool,
    ) -> ChainData {
        ChainData {
            head,
            weight: ChainWeight::Extendable {
                total_difficulty,
                total_work,
            },
            on_main_chain,
        }
    }

    /// Builds a retrieval-only entry. These are installed for the
    /// interior of an adopted proof prefix and sit on the main chain
    /// without being extendable.
    pub fn retrieval_only(head: Arc<Block>) -> ChainData {
        ChainData {
            head,
            weight: ChainWeight::RetrievalOnly,
            on_main_chain: true,
        }
    }

    pub fn is_extendable(&self) -> bool {
        match self.weight {
            ChainWeight::Extendable { .. } => true,
            ChainWeight::RetrievalOnly => false,
        }
    }

    pub fn total_difficulty(&self) -> Option<&BigUint> {
        match &self.weight {
            ChainWeight::Extendable {
                total_difficulty, ..
            } => Some(total_difficulty),
            ChainWeight::RetrievalOnly => None,
        }
    }

    pub fn total_work(&self) -> Option<&BigUint> {
        match &self.weight {
            ChainWeight::Extendable { total_work, .. } => Some(total_work),
            ChainWeight::RetrievalOnly => None,
        }
    }
}
