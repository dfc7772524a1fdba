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

//! The repository contract: a nested, checkpointable key-value view of
//! accounts, balances, nonces, code and storage. The Merkle-Patricia trie
//! backing a production implementation is external to this crate; the
//! engine only ever depends on this trait.
//!
//! Nesting is modelled as a checkpoint stack on `self` rather than as a
//! chain of child objects: `start_tracking` pushes a write-buffering
//! overlay, `commit` folds the top overlay into the one below it (or into
//! the base store, if there is only one), and `rollback` discards the top
//! overlay outright. This is the same shape as the source's
//! `startTracking`/`commit`/`rollback`, just expressed without requiring a
//! new object per checkpoint.

use engine_types::Account;
use ethereum_types::{Address, H256, U256};
use parity_bytes::Bytes;

/// A nested, checkpointable view over world state.
pub trait Repository {
    /// Look up an account by address.
    fn get_account(&self, addr: &Address) -> Option<Account>;

    /// Create an account at `addr` if one does not already exist.
    fn create_account(&mut self, addr: &Address);

    /// Credit `addr` with `amount`. Creates the account first if necessary.
    fn add_balance(&mut self, addr: &Address, amount: &U256);

    /// Debit `addr` by `amount`. The caller must ensure the balance does
    /// not go negative; this is not checked here.
    fn sub_balance(&mut self, addr: &Address, amount: &U256);

    /// Increment `addr`'s nonce by one.
    fn increase_nonce(&mut self, addr: &Address);

    /// Fetch the code stored at `addr`, if any.
    fn get_code(&self, addr: &Address) -> Option<Bytes>;

    /// Store `code`, keyed by its hash, and bind `addr`'s `code_hash` to it.
    /// Returns the computed hash.
    fn save_code(&mut self, addr: &Address, code: Bytes) -> H256;

    /// Read one 32-byte storage word of `addr`. Absent words read as zero.
    fn get_storage_word(&self, addr: &Address, key: &H256) -> H256;

    /// Write one 32-byte storage word of `addr`.
    fn put_storage_word(&mut self, addr: &Address, key: H256, value: H256);

    /// Remove `addr` and all its storage (self-destruct).
    fn delete(&mut self, addr: &Address);

    /// The last-synced world-state root. Call `sync` first to flush pending writes.
    fn get_world_state_root(&self) -> H256;

    /// Flush all writes below the current checkpoint into the backing
    /// trie (external) and recompute the world-state root.
    fn sync(&mut self) -> H256;

    /// Push a new write-buffering checkpoint.
    fn start_tracking(&mut self);

    /// Fold the top checkpoint's writes into the one beneath it.
    fn commit(&mut self);

    /// Discard the top checkpoint's writes entirely.
    fn rollback(&mut self);

    /// Release any resources held by the repository (e.g. close the
    /// backing trie/database handle).
    fn close(&mut self);

    /// Close the current backing store and reopen a fresh, empty one.
    /// Used by the chain connector's resync path; equivalent to `close`
    /// followed by re-initialising the repository against an empty world
    /// state (the genesis state root).
    fn reset(&mut self);

    /// Depth of the checkpoint stack, for diagnostics and tests.
    fn tracking_depth(&self) -> usize;
}
