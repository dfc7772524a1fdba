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

//! The block applier: runs a validated block's transactions against the
//! repository, distributes rewards, and reconciles the resulting state root.

use engine_types::{Block, BlockNumber};
use engine_vm::{Crypto, Repository, Schedule, Vm};
use ethereum_types::{H256, U256};
use log::warn;

use crate::engines::block_reward;
use crate::error::{Error, ErrorKind};
use crate::executive::apply_transaction;
use crate::spec::ProtocolParams;

/// Outcome of successfully applying a block: what the chain connector needs
/// to advance its head and accumulators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedBlock {
    pub number: BlockNumber,
    pub hash: H256,
    pub total_gas_used: u64,
    pub state_root: H256,
}

/// Apply `block`'s transactions and rewards to `repo` in order.
///
/// Returns `Err` only for the one failure this layer itself enforces — the
/// block's declared `gas_limit` being exceeded by the sum of its
/// transactions' gas use (REDESIGN: the source never checks this; this
/// crate does). A computed-state-root disagreement is logged, not treated
/// as an error — see `DESIGN.md` for why that choice, not the alternative
/// the source's own behavior suggests, is kept.
pub fn apply_block(
    repo: &mut dyn Repository,
    vm: &dyn Vm,
    crypto: &dyn Crypto,
    schedule: &Schedule,
    params: &ProtocolParams,
    block: &Block,
) -> Result<AppliedBlock, Error> {
    let header = &block.header;

    // The whole block applies under one checkpoint: a gas-limit-exceeded
    // block must leave no trace in the repository, so nothing here commits
    // until every transaction and the reward distribution have succeeded.
    repo.start_tracking();

    let mut total_gas_used: u64 = 0;
    for tx in &block.transactions {
        let gas_used = apply_transaction(repo, vm, crypto, schedule, header, tx);
        total_gas_used = total_gas_used.saturating_add(gas_used);
    }

    if total_gas_used > header.gas_limit {
        repo.rollback();
        return Err(ErrorKind::BlockGasLimitExceeded(header.gas_limit, total_gas_used).into());
    }

    if repo.get_account(&header.coinbase).is_none() {
        repo.create_account(&header.coinbase);
    }
    for (addr, amount) in block_reward(header, &block.uncles, params) {
        if repo.get_account(&addr).is_none() {
            repo.create_account(&addr);
        }
        repo.add_balance(&addr, &amount);
    }

    repo.commit();

    let computed_root = repo.sync();
    if computed_root != header.state_root {
        warn!(
            "state root mismatch at block {} ({:?}): header says {:?}, repository computed {:?}",
            header.number, header.hash, header.state_root, computed_root
        );
    }

    Ok(AppliedBlock {
        number: header.number,
        hash: header.hash,
        total_gas_used,
        state_root: computed_root,
    })
}

/// A block's own contribution to total difficulty: just its header's
/// difficulty value — uncles contribute to rewards, not to total difficulty.
pub fn cumulative_difficulty(block: &Block) -> U256 {
    block.header.difficulty
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_types::{Action, Header, SignedTransaction, Transaction};
    use engine_vm::fake::{FakeCrypto, FakeRepository, FakeVm};
    use ethereum_types::Address;

    fn header(number: BlockNumber, gas_limit: u64, coinbase: Address) -> Header {
        Header {
            hash: H256::from_low_u64_be(number + 1),
            parent_hash: H256::from_low_u64_be(number),
            number,
            timestamp: 0,
            difficulty: U256::from(1000),
            gas_limit,
            gas_used: 0,
            state_root: H256::zero(),
            coinbase,
            extra_data: Vec::new(),
            min_gas_price: U256::zero(),
            has_uncles: false,
        }
    }

    fn transfer(sender: Address, receiver: Address, nonce: u64, value: u64) -> SignedTransaction {
        let t = Transaction {
            nonce: U256::from(nonce),
            gas_price: U256::from(1u64),
            gas_limit: U256::from(21_000u64),
            action: Action::Call(receiver),
            value: U256::from(value),
            data: Vec::new(),
        };
        SignedTransaction::new(t, Vec::new(), sender)
    }

    #[test]
    fn applies_transactions_and_pays_reward() {
        let mut repo = FakeRepository::new();
        let sender = Address::from_low_u64_be(1);
        let receiver = Address::from_low_u64_be(2);
        let coinbase = Address::from_low_u64_be(3);
        repo.create_account(&sender);
        repo.add_balance(&sender, &U256::from(1_000_000));

        let head = header(1, 4_700_000, coinbase);
        let block = Block {
            header: head.clone(),
            transactions: vec![transfer(sender, receiver, 0, 100)],
            uncles: Vec::new(),
        };

        let params = ProtocolParams::default();
        let result = apply_block(&mut repo, &FakeVm, &FakeCrypto, &Schedule::default(), &params, &block).expect("valid block applies");

        assert_eq!(result.total_gas_used, 21_000);
        assert_eq!(repo.get_account(&receiver).unwrap().balance, U256::from(100));
        assert_eq!(repo.get_account(&coinbase).unwrap().balance, params.block_reward + U256::from(21_000u64));
    }

    #[test]
    fn rejects_block_whose_gas_used_exceeds_its_limit() {
        let mut repo = FakeRepository::new();
        let sender = Address::from_low_u64_be(1);
        let receiver = Address::from_low_u64_be(2);
        let coinbase = Address::from_low_u64_be(3);
        repo.create_account(&sender);
        repo.add_balance(&sender, &U256::from(1_000_000));

        let head = header(1, 10_000, coinbase); // lower than the 21,000 a transfer costs
        let block = Block {
            header: head,
            transactions: vec![transfer(sender, receiver, 0, 100)],
            uncles: Vec::new(),
        };

        let params = ProtocolParams::default();
        let result = apply_block(&mut repo, &FakeVm, &FakeCrypto, &Schedule::default(), &params, &block);
        assert!(result.is_err());

        // The rejected block must leave no trace: the sender keeps its
        // pre-block balance and nonce, the receiver and coinbase stay
        // untouched, and no checkpoint is left open.
        assert_eq!(repo.tracking_depth(), 0);
        assert_eq!(repo.get_account(&sender).unwrap().balance, U256::from(1_000_000));
        assert_eq!(repo.get_account(&sender).unwrap().nonce, U256::zero());
        assert!(repo.get_account(&receiver).is_none());
        assert!(repo.get_account(&coinbase).is_none());
    }
}
