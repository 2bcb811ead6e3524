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
use block::Block;
use crypto::Hash;
use hashbrown::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
/// Volatile mapping from block hash to [`ChainData`]. The store lives
/// exactly as long as the engine owning it; writes are serialized by
/// the engine's dispatch queue.
pub struct ChainStore {
    data: HashMap<Hash, ChainData>,
}

impl ChainStore {
    pub fn new() -> ChainStore {
        ChainStore {
            data: HashMap::new(),
        }
    }

    pub fn get(&self, hash: &Hash) -> Option<&ChainData> {
        self.data.get(hash)
    }

    /// Convenience lookup for the stored block itself.
    pub fn get_block(&self, hash: &Hash) -> Option<Arc<Block>> {
        self.data.get(hash).map(|data| data.head.clone())
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.data.contains_key(hash)
    }

    /// Inserts or overwrites the entry for the given hash.
    pub fn put(&mut self, hash: Hash, data: ChainData) {
        self.data.insert(hash, data);
    }

    /// Removes all entries.
    pub fn truncate(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Hash, &ChainData)> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    fn entry(on_main_chain: bool) -> ChainData {
        ChainData::extendable(
            Block::genesis(),
            BigUint::from(1u8),
            BigUint::from(1u8),
            on_main_chain,
        )
    }

    #[test]
    fn put_get_roundtrip() {
        let mut store = ChainStore::new();
        let hash = Block::genesis().hash();

        assert!(store.get(&hash).is_none());

        store.put(hash, entry(true));
        assert_eq!(store.get(&hash), Some(&entry(true)));
        assert_eq!(store.get_block(&hash).unwrap().hash(), hash);
    }

    #[test]
    fn put_overwrites() {
        let mut store = ChainStore::new();
        let hash = Block::genesis().hash();

        store.put(hash, entry(true));
        store.put(hash, entry(false));

        assert_eq!(store.len(), 1);
        assert!(!store.get(&hash).unwrap().on_main_chain);
    }

    #[test]
    fn truncate_removes_everything() {
        let mut store = ChainStore::new();
        store.put(Block::genesis().hash(), entry(true));

        store.truncate();
        assert!(store.is_empty());
    }
}
