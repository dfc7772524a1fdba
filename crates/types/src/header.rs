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

//! Block header.

use parity_bytes::Bytes;
use ethereum_types::{Address, H256, U256};

use crate::BlockNumber;

/// A block header.
///
/// `hash` is carried on the struct rather than computed here: the hash and
/// signature primitives that would derive it from the encoded header live
/// outside this crate (see the wire/channel layer in the system design).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Hash of this header, as computed and attached by the upstream fetch layer.
    pub hash: H256,
    /// Hash of the parent block's header.
    pub parent_hash: H256,
    /// Block number; 0 for genesis.
    pub number: BlockNumber,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Block difficulty.
    pub difficulty: U256,
    /// Gas limit for this block.
    pub gas_limit: u64,
    /// Total gas used by all transactions in this block.
    pub gas_used: u64,
    /// Root of the world-state trie after this block is applied.
    pub state_root: H256,
    /// Address credited with block and uncle rewards.
    pub coinbase: Address,
    /// Arbitrary extra data, at most `MAX_EXTRA_DATA_SIZE` bytes.
    pub extra_data: Bytes,
    /// Minimum gas price accepted by the block's producer.
    pub min_gas_price: U256,
    /// Whether this block itself includes any uncles. Consulted by the
    /// difficulty formula, which rewards the parent for including uncles.
    pub has_uncles: bool,
}

impl Header {
    /// The zero hash used as `parent_hash` for genesis.
    pub fn zero_hash() -> H256 {
        H256::zero()
    }

    /// True if this header is for the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.number == 0 && self.parent_hash == Self::zero_hash()
    }
}
