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

//! The VM invocation context and its result.

use engine_types::BlockNumber;
use ethereum_types::{Address, U256};
use parity_bytes::Bytes;

/// Everything the VM needs to execute one call or creation. Built from the
/// transaction, the enclosing block, and the tracked repository it will
/// read and write through.
#[derive(Debug, Clone)]
pub struct ProgramInvoke {
    /// The transaction sender.
    pub sender: Address,
    /// Contract being called, or the newly derived contract address on creation.
    pub receiver: Address,
    /// Value attached to the call or creation.
    pub value: U256,
    /// Gas made available to this invocation (`tx.gas_limit` minus the intrinsic cost is
    /// the caller's concern; this crate treats the whole prepaid amount as available).
    pub gas: U256,
    /// Gas price of the enclosing transaction, for any VM-internal gas accounting.
    pub gas_price: U256,
    /// Call data, or init code on creation.
    pub data: Bytes,
    /// Code being run: the receiver's code for a call, or `data` itself for a creation.
    pub code: Bytes,
    /// True if this invocation is a contract creation.
    pub is_create: bool,
    /// Enclosing block number.
    pub block_number: BlockNumber,
    /// Enclosing block timestamp.
    pub block_timestamp: u64,
    /// Enclosing block difficulty.
    pub block_difficulty: U256,
    /// Enclosing block gas limit.
    pub block_gas_limit: u64,
    /// Enclosing block's coinbase.
    pub coinbase: Address,
}

/// Outcome of a VM invocation. Replaces the source's thrown-exception gas
/// accounting (`OutOfGas` as a Java exception) with a plain tagged variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramOutcome {
    /// Execution completed without running out of gas.
    Halt {
        /// Gas actually consumed.
        gas_used: U256,
        /// Bytes returned by the program (init code's deploy-time return value, or call output).
        return_data: Bytes,
        /// Accounts flagged for self-destruct during this invocation.
        delete_accounts: Vec<Address>,
    },
    /// Execution ran out of gas; all prepaid gas is considered spent.
    OutOfGas {
        /// Always equal to the gas made available (`ProgramInvoke::gas`).
        gas_used: U256,
    },
    /// Any other runtime failure (e.g. invalid jump, stack underflow).
    RuntimeFailure,
}
