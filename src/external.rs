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

//! Collaborators the chain connector is built against but does not own:
//! persistent block storage, the inbound block queue, the peer-sync
//! channel manager, the telemetry listener, and the wallet/mempool. None
//! are implemented in this crate — the connector only ever calls through
//! these traits.

use engine_types::{Block, BlockNumber};
use ethereum_types::H256;

/// Persistent storage of already-accepted blocks, keyed by hash and by
/// number along the canonical chain.
pub trait BlockStore: Send + Sync {
    /// Look up a block previously saved under this hash.
    fn get_by_hash(&self, hash: &H256) -> Option<Block>;

    /// Look up the canonical block at this number, if any.
    fn get_by_number(&self, number: BlockNumber) -> Option<Block>;

    /// `qty` ancestor hashes walking back from `hash`, closest first.
    fn get_list_of_hashes_start_from(&self, hash: &H256, qty: usize) -> Vec<H256>;

    /// Persist `block`. Idempotent: saving an already-stored hash is a no-op.
    fn save_block(&self, block: &Block);

    /// Drop all stored blocks, as part of a resync.
    fn reset(&self);
}

/// The inbound, out-of-order block queue. The producer side (peer wire
/// protocol) is entirely external; the connector only drains it.
pub trait BlockQueue: Send + Sync {
    /// Number of blocks currently queued.
    fn size(&self) -> usize;

    /// Drop all queued blocks, as part of a resync.
    fn clear(&self);

    /// Stop accepting new blocks.
    fn close(&self);
}

/// Read-only view of whether the peer-sync subsystem considers itself caught up.
pub trait ChannelManager: Send + Sync {
    /// True once every known peer has nothing left to send us.
    fn is_all_sync(&self) -> bool;
}

/// Fire-and-forget telemetry sink. No return value ever influences the engine.
pub trait Listener: Send + Sync {
    /// A block was applied to the canonical chain.
    fn on_block(&self, block: &Block);

    /// The queue drained and `ChannelManager::is_all_sync` became true.
    fn on_sync_done(&self);

    /// A developer-facing trace line, gated by `EngineConfig::trace_start_block`.
    fn trace(&self, message: &str);
}

/// The wallet/mempool boundary. Only consulted when
/// `EngineConfig::block_chain_only` is `false`.
pub trait Wallet: Send + Sync {
    /// New transactions became available (e.g. relayed by peers).
    fn add_transactions(&self, transactions: &[engine_types::SignedTransaction]);

    /// Transactions were included in an applied block and should be dropped
    /// from any pending pool.
    fn remove_transactions(&self, transactions: &[engine_types::SignedTransaction]);

    /// A block was applied; the wallet may want to reconcile its own view
    /// of balances/nonces against it.
    fn process_block(&self, block: &Block);
}
