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

use crate::chain_data::{ChainData, ChainWeight};
use crate::serializer::Serializer;
use crate::store::ChainStore;
use crate::validation::validate_header;
use crate::verification::{is_better_proof, verify_proof};
use block::target::{real_difficulty, BLOCK_TARGET_MAX};
use block::{Block, BlockChain, BlockHeader, ChainProof, HeaderChain};
use constants::{
    BLOCK_TIME, DIFFICULTY_BLOCK_WINDOW, DIFFICULTY_MAX_ADJUSTMENT_FACTOR, MIN_SUPERBLOCK_COUNT,
};
use crossbeam_channel::{Receiver, Sender};
use crypto::Hash;
use lru::LruCache;
use num_bigint::BigUint;
use num_traits::One;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Size of the block lookup cache.
const BLOCK_CACHE_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i8)]
/// Outcome of pushing a header. The discriminants are wire-stable.
pub enum PushResult {
    /// The predecessor is unknown or cannot be extended.
    Orphan = -2,

    /// A proof-of-work, succession, difficulty or interlink check failed.
    Invalid = -1,

    /// The block is already in the store.
    Known = 0,

    /// The block became the new main-chain head.
    Extended = 1,

    /// The block's branch overtook the main chain.
    Rebranched = 2,

    /// The block was stored on a side branch.
    Forked = 3,
}

impl PushResult {
    /// The wire-stable integer code of the result.
    pub fn code(self) -> i8 {
        self as i8
    }

    pub fn is_ok(self) -> bool {
        self.code() >= 0
    }
}

/// A light-client chain following the heaviest known history without
/// ever downloading block bodies. Bootstraps from a chain proof and
/// extends the tip header by header.
///
/// All mutating entry points must run under the owning
/// [`LightChainRef`]'s dispatch queue; the engine itself is not aware
/// of concurrency.
pub struct LightChain {
    /// Mapping from block hash to per-block chain data.
    pub(crate) store: ChainStore,

    /// The hash of the main-chain head.
    head_hash: Hash,

    /// The chain data of the main-chain head.
    main_chain: ChainData,

    /// The proof backing our current view of the chain.
    proof: ChainProof,

    /// Live head-changed subscriptions.
    head_listeners: Vec<Sender<Arc<Block>>>,
}

impl LightChain {
    /// Builds a chain anchored at the genesis block.
    pub fn new() -> LightChain {
        let genesis = Block::genesis();
        let genesis_hash = genesis.hash();

        let main_chain = ChainData::extendable(
            genesis.clone(),
            genesis.difficulty(),
            real_difficulty(&genesis_hash),
            true,
        );

        let mut store = ChainStore::new();
        store.put(genesis_hash, main_chain.clone());

        LightChain {
            store,
            head_hash: genesis_hash,
            main_chain,
            proof: ChainProof::new(
                BlockChain::new(vec![Arc::new(genesis.to_light())]),
                HeaderChain::empty(),
            ),
            head_listeners: Vec::new(),
        }
    }

    /// The block at the tip of the main chain.
    pub fn head(&self) -> Arc<Block> {
        self.main_chain.head.clone()
    }

    /// The hash of the main-chain head.
    pub fn head_hash(&self) -> Hash {
        self.head_hash
    }

    /// The height of the main-chain head.
    pub fn height(&self) -> u64 {
        self.main_chain.head.height()
    }

    /// The proof backing the current chain view.
    pub fn proof(&self) -> &ChainProof {
        &self.proof
    }

    /// Registers a head-changed subscription. The channel receives the
    /// new head block after every extension or rebranch.
    pub fn subscribe_head_changed(&mut self) -> Receiver<Arc<Block>> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.head_listeners.push(sender);
        receiver
    }

    fn notify_head_changed(&mut self, head: Arc<Block>) {
        self.head_listeners
            .retain(|listener| listener.send(head.clone()).is_ok());
    }

    /// Verifies a chain proof and adopts it if it is better than the
    /// one we hold. Returns `false` iff verification failed; a
    /// verified but not-better proof is accepted without being adopted.
    pub fn push_proof(&mut self, proof: ChainProof) -> bool {
        let suffix_blocks = match verify_proof(&proof) {
            Ok(blocks) => blocks,
            Err(err) => {
                warn!("Rejecting chain proof: {:?}", err);
                return false;
            }
        };

        if is_better_proof(&proof, &self.proof, MIN_SUPERBLOCK_COUNT) {
            self.accept_proof(proof, suffix_blocks);
        } else {
            debug!(
                "Keeping the current proof, candidate at height {} is not better",
                proof.head_height()
            );
        }

        true
    }

    /// Installs a verified proof as the new chain view.
    ///
    /// When the prefix head already grafts onto our stored chain the
    /// suffix is simply replayed. Otherwise the store is reset: the
    /// prefix head becomes the new extendable tip and the interior of
    /// the prefix is kept for retrieval only.
    // TODO: seed the reset store from the dense tail of the proof
    // instead of the prefix head alone.
    fn accept_proof(&mut self, proof: ChainProof, suffix_blocks: Vec<Arc<Block>>) {
        let head = proof
            .prefix_head()
            .expect("A verified proof has a prefix head")
            .clone();
        let head_hash = head.hash();

        let grafts = self
            .store
            .get(&head_hash)
            .map(|data| data.is_extendable())
            .unwrap_or(false);

        if grafts {
            info!(
                "Adopting chain proof at height {}, grafting onto the current chain",
                proof.head_height()
            );
        } else {
            info!(
                "Adopting chain proof at height {}, resetting the chain store",
                proof.head_height()
            );

            self.store.truncate();

            let data = ChainData::extendable(
                head.clone(),
                head.difficulty(),
                real_difficulty(&head_hash),
                true,
            );

            self.store.put(head_hash, data.clone());
            self.head_hash = head_hash;
            self.main_chain = data;

            for block in proof.prefix().blocks() {
                if block.hash() == head_hash {
                    continue;
                }

                self.store
                    .put(block.hash(), ChainData::retrieval_only(block.clone()));
            }
        }

        self.proof = proof;

        for block in suffix_blocks {
            let result = self.push_header(block.header().clone());

            // The proof already verified; a failing suffix block means
            // the store and the verifier disagree.
            assert!(
                result.is_ok(),
                "Suffix block {} of a verified proof failed to append: {:?}",
                block.hash(),
                result
            );
        }
    }

    /// Validates and appends a single header.
    pub fn push_header(&mut self, header: BlockHeader) -> PushResult {
        let hash = header.hash();

        if self.store.contains(&hash) {
            return PushResult::Known;
        }

        let prev = match self.store.get(&header.prev_hash()) {
            Some(prev) => prev.clone(),
            None => {
                debug!("Orphan header {} at height {}", hash, header.height());
                return PushResult::Orphan;
            }
        };

        let next_target = self.next_target(&prev);

        let block = match validate_header(&header, &prev, next_target) {
            Ok(block) => block,
            Err(result) => return result,
        };

        self.push_block_internal(block, hash, &prev)
    }

    /// The append path shared by headers and proof suffixes: weighs the
    /// block against the main chain and extends, rebranches or forks.
    fn push_block_internal(
        &mut self,
        block: Arc<Block>,
        hash: Hash,
        prev: &ChainData,
    ) -> PushResult {
        let (prev_difficulty, prev_work) = match &prev.weight {
            ChainWeight::Extendable {
                total_difficulty,
                total_work,
            } => (total_difficulty.clone(), total_work.clone()),
            ChainWeight::RetrievalOnly => return PushResult::Orphan,
        };

        let total_difficulty = prev_difficulty + block.difficulty();
        let total_work = prev_work + real_difficulty(&hash);

        let main_difficulty = self
            .main_chain
            .total_difficulty()
            .expect("The main-chain head is always extendable")
            .clone();

        let mut chain_data =
            ChainData::extendable(block.clone(), total_difficulty.clone(), total_work, false);

        if block.prev_hash() == self.head_hash {
            // The block directly extends the main chain.
            chain_data.on_main_chain = true;

            self.store.put(hash, chain_data.clone());
            self.head_hash = hash;
            self.main_chain = chain_data;

            self.notify_head_changed(block);
            PushResult::Extended
        } else if total_difficulty > main_difficulty {
            // A fork became heavier than the main chain.
            self.rebranch(hash, chain_data);

            self.notify_head_changed(block);
            PushResult::Rebranched
        } else {
            // A fork, but not heavy enough to switch to.
            debug!(
                "Header {} creates a fork at height {}",
                hash,
                block.height()
            );

            self.store.put(hash, chain_data);
            PushResult::Forked
        }
    }

    /// Moves the main-chain designation from the current head to the
    /// given fork tip via their common ancestor.
    ///
    /// The walks over both branches complete before any flag is
    /// flipped, so a failed walk leaves the store untouched. A missing
    /// predecessor on either branch violates the store invariants and
    /// aborts the operation.
    fn rebranch(&mut self, new_hash: Hash, new_data: ChainData) {
        debug!("Rebranching to {}", new_hash);

        // Walk back along the fork until it touches the main chain.
        let mut fork_chain: Vec<(Hash, ChainData)> = Vec::new();
        let mut cur_hash = new_hash;
        let mut cur_data = new_data.clone();

        while !cur_data.on_main_chain {
            fork_chain.push((cur_hash, cur_data.clone()));

            let prev_hash = cur_data.head.prev_hash();
            let prev_data = self.store.get(&prev_hash);

            assert!(
                prev_data.is_some(),
                "Failed to find a fork predecessor while rebranching"
            );

            cur_hash = prev_hash;
            cur_data = prev_data.unwrap().clone();
        }

        // `cur_hash` now identifies the lowest common ancestor.
        let ancestor_hash = cur_hash;

        // Collect the old main chain down to the ancestor.
        let mut demote: Vec<(Hash, ChainData)> = Vec::new();
        let mut walk_hash = self.head_hash;

        while walk_hash != ancestor_hash {
            let data = self.store.get(&walk_hash);

            assert!(
                data.is_some(),
                "Failed to find a main-chain predecessor while rebranching"
            );

            let mut data = data.unwrap().clone();
            let prev_hash = data.head.prev_hash();

            data.on_main_chain = false;
            demote.push((walk_hash, data));
            walk_hash = prev_hash;
        }

        // Both walks succeeded; commit the flag flips.
        for (hash, data) in demote {
            self.store.put(hash, data);
        }

        for (hash, mut data) in fork_chain.into_iter().rev() {
            data.on_main_chain = true;
            self.store.put(hash, data);
        }

        let mut new_data = new_data;
        new_data.on_main_chain = true;

        self.main_chain = new_data;
        self.head_hash = new_hash;
    }

    /// Computes the proof-of-work target for the successor of the given
    /// block: the block's own target scaled by the deviation of the
    /// mean block time over the difficulty window, clamped to the
    /// maximum adjustment factor.
    ///
    /// Returns `None` when the window cannot be walked, i.e. it crosses
    /// a retrieval-only entry or leaves the store.
    pub fn next_target(&self, data: &ChainData) -> Option<BigUint> {
        let head = &data.head;

        let mut cur = head.clone();
        let mut steps: u64 = 0;

        while steps < DIFFICULTY_BLOCK_WINDOW {
            if cur.height() == 0 {
                break;
            }

            match self.store.get(&cur.prev_hash()) {
                Some(prev) if prev.is_extendable() => {
                    cur = prev.head.clone();
                    steps += 1;
                }
                _ => return None,
            }
        }

        let head_target = head.header().target()?;

        if steps == 0 {
            // The genesis block retargets to itself.
            return Some(head_target);
        }

        let expected = BLOCK_TIME * steps;
        let actual = (head.header().timestamp() - cur.header().timestamp())
            .num_seconds()
            .max(1) as u64;

        // Clamp the adjustment.
        let actual = actual
            .min(expected * DIFFICULTY_MAX_ADJUSTMENT_FACTOR)
            .max(expected / DIFFICULTY_MAX_ADJUSTMENT_FACTOR)
            .max(1);

        let next = head_target * actual / expected;

        Some(next.min(BLOCK_TARGET_MAX.clone()).max(BigUint::one()))
    }
}

#[derive(Clone)]
/// Thread-safe handle to a [`LightChain`] and its block cache.
///
/// Mutations submitted through the handle are funneled into a
/// single-writer dispatch queue and run strictly one at a time in
/// submission order; read accessors observe the state as of the last
/// completed mutation.
pub struct LightChainRef {
    chain: Arc<RwLock<LightChain>>,
    serializer: Arc<Serializer>,

    /// Block lookup cache.
    block_cache: Arc<Mutex<LruCache<Hash, Arc<Block>>>>,
}

impl LightChainRef {
    pub fn new() -> LightChainRef {
        let chain = Arc::new(RwLock::new(LightChain::new()));
        let serializer = Arc::new(Serializer::new(chain.clone()));

        LightChainRef {
            chain,
            serializer,
            block_cache: Arc::new(Mutex::new(LruCache::new(BLOCK_CACHE_SIZE))),
        }
    }

    /// See [`LightChain::push_proof`].
    pub fn push_proof(&self, proof: ChainProof) -> bool {
        self.serializer.execute(move |chain| chain.push_proof(proof))
    }

    /// See [`LightChain::push_header`].
    pub fn push_header(&self, header: BlockHeader) -> PushResult {
        self.serializer
            .execute(move |chain| chain.push_header(header))
    }

    /// See [`LightChain::subscribe_head_changed`].
    pub fn subscribe_head_changed(&self) -> Receiver<Arc<Block>> {
        self.serializer
            .execute(|chain| chain.subscribe_head_changed())
    }

    pub fn head(&self) -> Arc<Block> {
        self.chain.read().head()
    }

    pub fn head_hash(&self) -> Hash {
        self.chain.read().head_hash()
    }

    pub fn height(&self) -> u64 {
        self.chain.read().height()
    }

    /// The retarget for a successor of the stored block with the given
    /// hash. `None` if the block is unknown or the window is
    /// unavailable.
    pub fn next_target(&self, hash: &Hash) -> Option<BigUint> {
        let chain = self.chain.read();
        let data = chain.store.get(hash)?;

        chain.next_target(data)
    }

    /// Attempts to fetch a block by its hash from the cache and, if
    /// that fails, from the chain store.
    pub fn query(&self, hash: &Hash) -> Option<Arc<Block>> {
        let cache_result = {
            let mut cache = self.block_cache.lock();
            cache.get(hash).cloned()
        };

        if let Some(block) = cache_result {
            return Some(block);
        }

        let chain_result = { self.chain.read().store.get_block(hash) };

        if let Some(block) = chain_result {
            let mut cache = self.block_cache.lock();

            if cache.get(hash).is_none() {
                cache.put(*hash, block.clone());
            }

            Some(block)
        } else {
            None
        }
    }
}

impl Default for LightChainRef {
    fn default() -> LightChainRef {
        LightChainRef::new()
    }
}
