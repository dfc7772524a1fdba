// Copyright 2015-2020 Parity Technologies (UK) Ltd.
// This file is part of OpenEthereum.

// OpenEthereum is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// OpenEthereum is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with OpenEthereum.  If not, see <http://www.gnu.org/licenses/>.

//! The chain connector: routes an incoming block to the canonical chain, to
//! an alternate chain, or to the garbage buffer, and triggers a resync on
//! orphan flood. This is the engine's single entry point for new blocks; it
//! owns the repository for the duration of block application and hands
//! applied blocks, reorg signals and sync-done events to its listener.

use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use engine_types::{Block, BlockNumber, Header};
use engine_vm::{Crypto, ProofOfWork, Repository, Schedule, Vm, GARBAGE_LIMIT, MAX_EXTRA_DATA_SIZE, REORG_THRESHOLD};
use ethereum_types::{H256, U256};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

use crate::block::{apply_block, cumulative_difficulty};
use crate::engines::{validate_header, validate_uncles, UncleContext, UNCLE_GENERATION_GAP_MAX};
use crate::error::{Error, ErrorKind};
use crate::external::{BlockQueue, BlockStore, ChannelManager, Listener, Wallet};
use crate::spec::ProtocolParams;

/// The user-facing engine knobs that are not themselves protocol parameters.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// First block number to start emitting VM traces for; `-1` disables tracing.
    pub trace_start_block: i64,
    /// When `true`, the wallet/mempool boundary is never consulted.
    pub block_chain_only: bool,
    /// When `false`, transactions are decoded and classified but never executed.
    pub play_vm: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            trace_start_block: -1,
            block_chain_only: true,
            play_vm: true,
        }
    }
}

/// Accrued counters, in the spirit of the upstream client's own import report.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct ClientReport {
    pub blocks_imported: usize,
    pub transactions_applied: usize,
    pub gas_processed: u64,
}

impl ClientReport {
    fn accrue_block(&mut self, transactions: usize, gas_used: u64) {
        self.blocks_imported += 1;
        self.transactions_applied += transactions;
        self.gas_processed = self.gas_processed.saturating_add(gas_used);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChainHead {
    best_hash: H256,
    best_number: BlockNumber,
    total_difficulty: U256,
}

struct AltChain {
    tip: H256,
    total_difficulty: U256,
}

/// What happened to a block handed to [`Engine::import_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Already known; ignored.
    Duplicate,
    /// Extended the canonical head; state was applied.
    Applied { number: BlockNumber, hash: H256, gas_used: u64 },
    /// Rooted a fresh alternate chain off a known ancestor that is not the head.
    NewAltChain { tip: H256 },
    /// Extended an existing alternate chain.
    AltChainExtended { tip: H256, total_difficulty: U256, reorg_signalled: bool },
    /// No known parent; buffered. `resynced` is `true` if this arrival
    /// tipped the garbage buffer over its limit and triggered a resync.
    Orphan { resynced: bool },
}

/// Ties together the repository, the VM/crypto/PoW capability boundaries,
/// the block-storage and telemetry collaborators, and the connector's own
/// head/alt-chain/garbage bookkeeping. One instance per chain.
pub struct Engine {
    repository: Mutex<Box<dyn Repository>>,
    vm: Box<dyn Vm>,
    crypto: Box<dyn Crypto>,
    pow: Box<dyn ProofOfWork>,
    block_store: Box<dyn BlockStore>,
    block_queue: Box<dyn BlockQueue>,
    channel_manager: Box<dyn ChannelManager>,
    listener: Box<dyn Listener>,
    wallet: Option<Box<dyn Wallet>>,

    params: ProtocolParams,
    config: EngineConfig,
    schedule: Schedule,
    genesis_hash: H256,

    head: RwLock<ChainHead>,
    alt_chains: Mutex<HashMap<H256, AltChain>>,
    garbage: Mutex<Vec<Block>>,
    bad_blocks: Mutex<HashSet<H256>>,
    report: Mutex<ClientReport>,
}

#[allow(clippy::too_many_arguments)]
impl Engine {
    /// Construct an engine rooted at `genesis`, already present in `repository`/`block_store`.
    pub fn new(
        genesis: Header,
        repository: Box<dyn Repository>,
        vm: Box<dyn Vm>,
        crypto: Box<dyn Crypto>,
        pow: Box<dyn ProofOfWork>,
        block_store: Box<dyn BlockStore>,
        block_queue: Box<dyn BlockQueue>,
        channel_manager: Box<dyn ChannelManager>,
        listener: Box<dyn Listener>,
        wallet: Option<Box<dyn Wallet>>,
        params: ProtocolParams,
        config: EngineConfig,
    ) -> Self {
        let genesis_hash = genesis.hash;
        Engine {
            repository: Mutex::new(repository),
            vm,
            crypto,
            pow,
            block_store,
            block_queue,
            channel_manager,
            listener,
            wallet,
            params,
            config,
            schedule: Schedule::default(),
            genesis_hash,
            head: RwLock::new(ChainHead {
                best_hash: genesis_hash,
                best_number: genesis.number,
                total_difficulty: genesis.difficulty,
            }),
            alt_chains: Mutex::new(HashMap::new()),
            garbage: Mutex::new(Vec::new()),
            bad_blocks: Mutex::new(HashSet::new()),
            report: Mutex::new(ClientReport::default()),
        }
    }

    /// Current canonical head hash.
    pub fn best_hash(&self) -> H256 {
        self.head.read().best_hash
    }

    /// Current canonical head number.
    pub fn best_number(&self) -> BlockNumber {
        self.head.read().best_number
    }

    /// Current canonical total difficulty.
    pub fn total_difficulty(&self) -> U256 {
        self.head.read().total_difficulty
    }

    /// Accrued import counters.
    pub fn report(&self) -> ClientReport {
        self.report.lock().clone()
    }

    /// Route an incoming block through the connector's state machine: already
    /// known, extends the canonical head, roots or extends an alt chain, or
    /// is an orphan buffered against a future resync.
    pub fn import_block(&self, block: Block) -> Result<ImportOutcome, Error> {
        let hash = block.hash();

        if self.block_store.get_by_hash(&hash).is_some() {
            return Ok(ImportOutcome::Duplicate);
        }
        if self.bad_blocks.lock().contains(&hash) {
            return Err(ErrorKind::InvalidBlock(format!("block {:?} previously rejected", hash)).into());
        }

        let head = *self.head.read();

        if block.header.parent_hash == head.best_hash {
            return self.extend_head(block);
        }

        let parent_known = self.block_store.get_by_hash(&block.header.parent_hash).is_some();
        let parent_not_ahead_of_head = block.header.number as i128 <= head.best_number as i128;
        if parent_known && parent_not_ahead_of_head {
            return Ok(self.root_alt_chain(&block, head.total_difficulty));
        }

        if let Some(outcome) = self.extend_alt_chain(&block, head.total_difficulty) {
            return Ok(outcome);
        }

        Ok(self.buffer_orphan(block))
    }

    fn extend_head(&self, block: Block) -> Result<ImportOutcome, Error> {
        if let Err(e) = self.validate_block(&block) {
            self.bad_blocks.lock().insert(block.hash());
            warn!("rejecting block {:?}: {}", block.hash(), e);
            return Err(e);
        }

        let applied = {
            let mut repo = self.repository.lock();
            apply_block(&mut **repo, &*self.vm, &*self.crypto, &self.schedule, &self.params, &block)?
        };

        self.block_store.save_block(&block);

        {
            let mut head = self.head.write();
            head.best_hash = applied.hash;
            head.best_number = applied.number;
            head.total_difficulty = head.total_difficulty + cumulative_difficulty(&block);
        }

        self.report.lock().accrue_block(block.transactions.len(), applied.total_gas_used);
        self.listener.on_block(&block);
        if !self.config.block_chain_only {
            if let Some(wallet) = &self.wallet {
                wallet.remove_transactions(&block.transactions);
                wallet.process_block(&block);
            }
        }
        if self.channel_manager.is_all_sync() {
            self.listener.on_sync_done();
        }

        Ok(ImportOutcome::Applied {
            number: applied.number,
            hash: applied.hash,
            gas_used: applied.total_gas_used,
        })
    }

    fn root_alt_chain(&self, block: &Block, canonical_total_difficulty: U256) -> ImportOutcome {
        let tip = block.hash();
        debug!("rooting new alt chain at {:?}", tip);
        self.alt_chains.lock().insert(
            tip,
            AltChain {
                tip,
                total_difficulty: canonical_total_difficulty,
            },
        );
        ImportOutcome::NewAltChain { tip }
    }

    fn extend_alt_chain(&self, block: &Block, canonical_total_difficulty: U256) -> Option<ImportOutcome> {
        let mut alt_chains = self.alt_chains.lock();
        let existing_tip = *alt_chains.keys().find(|tip| **tip == block.header.parent_hash)?;

        let mut alt = alt_chains.remove(&existing_tip).expect("just located by key");
        alt.tip = block.hash();
        alt.total_difficulty = alt.total_difficulty + cumulative_difficulty(block);

        let reorg_signalled = alt.total_difficulty > canonical_total_difficulty + U256::from(REORG_THRESHOLD);
        if reorg_signalled {
            info!(
                "alt chain at {:?} exceeds canonical total difficulty by more than the reorg threshold; signalling reorg",
                alt.tip
            );
        }

        let outcome = ImportOutcome::AltChainExtended {
            tip: alt.tip,
            total_difficulty: alt.total_difficulty,
            reorg_signalled,
        };
        alt_chains.insert(alt.tip, alt);
        Some(outcome)
    }

    fn buffer_orphan(&self, block: Block) -> ImportOutcome {
        let mut garbage = self.garbage.lock();
        garbage.push(block);
        if garbage.len() > GARBAGE_LIMIT {
            drop(garbage);
            self.resync();
            return ImportOutcome::Orphan { resynced: true };
        }
        ImportOutcome::Orphan { resynced: false }
    }

    /// Destructive reset triggered by an orphan flood: clear the queue, zero
    /// total difficulty, reset the head to genesis, reopen the repository,
    /// and discard garbage and alt chains.
    fn resync(&self) {
        warn!("orphan buffer exceeded {} entries; resyncing", GARBAGE_LIMIT);
        self.block_queue.clear();
        *self.head.write() = ChainHead {
            best_hash: self.genesis_hash,
            best_number: 0,
            total_difficulty: U256::zero(),
        };
        self.repository.lock().reset();
        self.garbage.lock().clear();
        self.alt_chains.lock().clear();
    }

    fn validate_block(&self, block: &Block) -> Result<(), Error> {
        let parent = self
            .block_store
            .get_by_hash(&block.header.parent_hash)
            .ok_or_else(|| Error::from(ErrorKind::UnknownParent(block.header.parent_hash)))?
            .header;

        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        validate_header(&block.header, &parent, &self.params, MAX_EXTRA_DATA_SIZE, now, &*self.pow)?;

        if block.uncles.is_empty() {
            return Ok(());
        }

        let ancestor_hashes = self
            .block_store
            .get_list_of_hashes_start_from(&block.header.parent_hash, UNCLE_GENERATION_GAP_MAX as usize);
        let ancestor_blocks: Vec<Block> = ancestor_hashes.iter().filter_map(|h| self.block_store.get_by_hash(h)).collect();
        let ancestors: Vec<Header> = ancestor_blocks.iter().map(|b| b.header.clone()).collect();

        let mut already_included = HashSet::new();
        for ancestor in &ancestor_blocks {
            already_included.extend(ancestor.uncles.iter().map(|u| u.hash));
        }

        let mut uncle_parents = Vec::with_capacity(block.uncles.len());
        for uncle in &block.uncles {
            let uncle_parent = self
                .block_store
                .get_by_hash(&uncle.parent_hash)
                .ok_or_else(|| Error::from(ErrorKind::InvalidUncle(format!("uncle {:?}'s parent is unknown", uncle.hash))))?
                .header;
            uncle_parents.push(uncle_parent);
        }
        let uncle_contexts: Vec<UncleContext> = block
            .uncles
            .iter()
            .zip(uncle_parents.iter())
            .map(|(uncle, uncle_parent)| UncleContext { uncle, uncle_parent })
            .collect();

        validate_uncles(
            &block.header,
            &uncle_contexts,
            &ancestors,
            &already_included,
            &self.params,
            MAX_EXTRA_DATA_SIZE,
            now,
            &*self.pow,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_vm::fake::{FakeCrypto, FakePow, FakeRepository, FakeVm};
    use ethereum_types::Address;
    use std::sync::Mutex as StdMutex;

    struct NullStore {
        blocks: StdMutex<HashMap<H256, Block>>,
    }

    impl NullStore {
        fn new() -> Self {
            NullStore { blocks: StdMutex::new(HashMap::new()) }
        }
    }

    impl BlockStore for NullStore {
        fn get_by_hash(&self, hash: &H256) -> Option<Block> {
            self.blocks.lock().unwrap().get(hash).cloned()
        }
        fn get_by_number(&self, _number: BlockNumber) -> Option<Block> {
            None
        }
        fn get_list_of_hashes_start_from(&self, hash: &H256, qty: usize) -> Vec<H256> {
            let blocks = self.blocks.lock().unwrap();
            let mut out = Vec::new();
            let mut cur = *hash;
            for _ in 0..qty {
                match blocks.get(&cur) {
                    Some(b) => {
                        out.push(cur);
                        cur = b.header.parent_hash;
                    }
                    None => break,
                }
            }
            out
        }
        fn save_block(&self, block: &Block) {
            self.blocks.lock().unwrap().insert(block.hash(), block.clone());
        }
        fn reset(&self) {
            self.blocks.lock().unwrap().clear();
        }
    }

    struct NullQueue;
    impl BlockQueue for NullQueue {
        fn size(&self) -> usize {
            0
        }
        fn clear(&self) {}
        fn close(&self) {}
    }

    struct AlwaysSynced;
    impl ChannelManager for AlwaysSynced {
        fn is_all_sync(&self) -> bool {
            true
        }
    }

    struct NullListener;
    impl Listener for NullListener {
        fn on_block(&self, _block: &Block) {}
        fn on_sync_done(&self) {}
        fn trace(&self, _message: &str) {}
    }

    fn genesis() -> Header {
        Header {
            hash: H256::from_low_u64_be(1),
            parent_hash: H256::zero(),
            number: 0,
            timestamp: 0,
            difficulty: U256::from(1000),
            gas_limit: engine_vm::GENESIS_GAS_LIMIT,
            gas_used: 0,
            state_root: H256::zero(),
            coinbase: Address::zero(),
            extra_data: Vec::new(),
            min_gas_price: U256::zero(),
            has_uncles: false,
        }
    }

    fn new_engine(store: NullStore) -> Engine {
        let genesis = genesis();
        store.save_block(&Block { header: genesis.clone(), transactions: Vec::new(), uncles: Vec::new() });
        Engine::new(
            genesis,
            Box::new(FakeRepository::new()),
            Box::new(FakeVm),
            Box::new(FakeCrypto),
            Box::new(FakePow),
            Box::new(store),
            Box::new(NullQueue),
            Box::new(AlwaysSynced),
            Box::new(NullListener),
            None,
            ProtocolParams::default(),
            EngineConfig::default(),
        )
    }

    fn child_of(parent: &Header, params: &ProtocolParams, salt: u64) -> Header {
        let timestamp = parent.timestamp + 20;
        let mut h = Header {
            hash: H256::zero(),
            parent_hash: parent.hash,
            number: parent.number + 1,
            timestamp,
            difficulty: U256::zero(),
            gas_limit: 0,
            gas_used: 0,
            state_root: H256::zero(),
            coinbase: Address::from_low_u64_be(42),
            extra_data: Vec::new(),
            min_gas_price: U256::zero(),
            has_uncles: false,
        };
        h.difficulty = crate::engines::expected_difficulty(&h, parent, U256::from(params.min_gas_limit));
        h.gas_limit = crate::engines::calc_gas_limit(parent.gas_limit, parent.gas_used, params.gas_limit_bound_divisor, params.min_gas_limit);
        h.hash = H256::from_low_u64_be(1_000 + h.number * 100 + salt);
        h
    }

    #[test]
    fn extends_head_and_advances_total_difficulty() {
        let engine = new_engine(NullStore::new());
        let params = ProtocolParams::default();
        let child = child_of(&genesis(), &params, 0);
        let block = Block { header: child.clone(), transactions: Vec::new(), uncles: Vec::new() };

        let outcome = engine.import_block(block).expect("valid block applies");
        assert_eq!(outcome, ImportOutcome::Applied { number: 1, hash: child.hash, gas_used: 0 });
        assert_eq!(engine.best_number(), 1);
        assert_eq!(engine.total_difficulty(), genesis().difficulty + child.difficulty);
    }

    #[test]
    fn duplicate_block_is_ignored() {
        let engine = new_engine(NullStore::new());
        let params = ProtocolParams::default();
        let child = child_of(&genesis(), &params, 0);
        let block = Block { header: child, transactions: Vec::new(), uncles: Vec::new() };
        engine.import_block(block.clone()).expect("first import applies");
        let outcome = engine.import_block(block).expect("second import is a duplicate");
        assert_eq!(outcome, ImportOutcome::Duplicate);
    }

    #[test]
    fn fork_off_the_head_roots_a_new_alt_chain() {
        let engine = new_engine(NullStore::new());
        let params = ProtocolParams::default();
        let first = child_of(&genesis(), &params, 0);
        engine
            .import_block(Block { header: first.clone(), transactions: Vec::new(), uncles: Vec::new() })
            .expect("first child applies");

        // A second, distinct child of genesis: known parent, but not the head.
        let rival = child_of(&genesis(), &params, 1);
        let outcome = engine
            .import_block(Block { header: rival.clone(), transactions: Vec::new(), uncles: Vec::new() })
            .expect("rooting an alt chain never errors");
        assert_eq!(outcome, ImportOutcome::NewAltChain { tip: rival.hash });
        assert_eq!(engine.best_hash(), first.hash, "the canonical head is untouched by a sibling import");
    }

    #[test]
    fn orphan_flood_triggers_resync() {
        let engine = new_engine(NullStore::new());
        let mut last_outcome = None;
        for i in 0..(GARBAGE_LIMIT as u64 + 1) {
            let orphan = Header {
                hash: H256::from_low_u64_be(10_000 + i),
                parent_hash: H256::from_low_u64_be(20_000 + i), // never known
                number: 5,
                timestamp: 100,
                difficulty: U256::from(1),
                gas_limit: engine_vm::GENESIS_GAS_LIMIT,
                gas_used: 0,
                state_root: H256::zero(),
                coinbase: Address::zero(),
                extra_data: Vec::new(),
                min_gas_price: U256::zero(),
                has_uncles: false,
            };
            let block = Block { header: orphan, transactions: Vec::new(), uncles: Vec::new() };
            last_outcome = Some(engine.import_block(block).expect("orphans are buffered, not rejected"));
        }
        assert_eq!(last_outcome, Some(ImportOutcome::Orphan { resynced: true }));
        assert_eq!(engine.best_number(), 0);
        assert_eq!(engine.total_difficulty(), U256::zero());
    }
}
