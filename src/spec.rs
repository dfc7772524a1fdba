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

//! Protocol parameters common to every chain this engine runs, and the
//! genesis block they imply.

use engine_types::{Account, Header};
use engine_vm::{GENESIS_GAS_LIMIT, MIN_GAS_LIMIT};
use ethereum_types::{Address, H256, U256};

/// Parameters common to the chains this engine can run.
///
/// Analogous to the teacher's `CommonParams`, trimmed to the handful of
/// protocol constants this engine's algorithms actually consume — the
/// dozens of EIP activation block numbers on the teacher's struct belong
/// to the VM opcode schedule, which is out of scope here.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolParams {
    /// Coinbase reward for mining/producing a block.
    pub block_reward: U256,
    /// Reward credited to an uncle's own coinbase.
    pub uncle_reward: U256,
    /// Extra reward added to the including block's coinbase per uncle included.
    pub inclusion_reward: U256,
    /// Lower bound on a block's gas limit.
    pub min_gas_limit: u64,
    /// Divisor bounding how much the gas limit may change block-to-block (1/1024th).
    pub gas_limit_bound_divisor: u64,
    /// Starting nonce assigned to freshly created accounts.
    pub account_start_nonce: U256,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        ProtocolParams {
            block_reward: U256::from(5_000_000_000_000_000_000u64), // 5 ether
            uncle_reward: U256::from(3_750_000_000_000_000_000u64), // 3.75 ether (7/8 of block reward)
            inclusion_reward: U256::from(156_250_000_000_000_000u64), // block_reward / 32
            min_gas_limit: MIN_GAS_LIMIT,
            gas_limit_bound_divisor: 1024,
            account_start_nonce: U256::zero(),
        }
    }
}

/// The genesis block's fixed fields and initial account balances.
#[derive(Debug, Clone)]
pub struct Genesis {
    /// Initial difficulty.
    pub difficulty: U256,
    /// Initial timestamp.
    pub timestamp: u64,
    /// Coinbase of the genesis block (conventionally the zero address).
    pub coinbase: Address,
    /// Extra data carried by the genesis header.
    pub extra_data: Vec<u8>,
    /// Pre-funded accounts, the chain's equivalent of the source's `PodState`.
    pub accounts: Vec<(Address, Account)>,
}

impl Genesis {
    /// Build the genesis header. `state_root` must be the root of a
    /// repository already seeded with `self.accounts` (seeding the
    /// repository is the caller's job — this crate does not own the trie).
    pub fn header(&self, state_root: H256) -> Header {
        Header {
            hash: H256::zero(), // filled in by the upstream fetch/hash layer
            parent_hash: Header::zero_hash(),
            number: 0,
            timestamp: self.timestamp,
            difficulty: self.difficulty,
            gas_limit: GENESIS_GAS_LIMIT,
            gas_used: 0,
            state_root,
            coinbase: self.coinbase,
            extra_data: self.extra_data.clone(),
            min_gas_price: U256::zero(),
            has_uncles: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_header_is_well_formed() {
        let genesis = Genesis {
            difficulty: U256::from(1),
            timestamp: 0,
            coinbase: Address::zero(),
            extra_data: Vec::new(),
            accounts: Vec::new(),
        };
        let header = genesis.header(H256::zero());
        assert!(header.is_genesis());
        assert_eq!(header.gas_limit, GENESIS_GAS_LIMIT);
    }
}
