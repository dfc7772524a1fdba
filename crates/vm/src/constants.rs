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

//! Protocol constants.

/// Lower bound on the per-block gas limit.
pub const MIN_GAS_LIMIT: u64 = 125_000;

/// Gas limit fixed into the genesis block.
pub const GENESIS_GAS_LIMIT: u64 = 5_000_000;

/// Difficulty delta, in difficulty units, above which an alt chain triggers a reorg.
pub const REORG_THRESHOLD: u64 = 5_000;

/// Maximum number of orphan blocks held in the garbage buffer before a resync.
pub const GARBAGE_LIMIT: usize = 20;

/// Maximum length, in bytes, of a header's `extra_data`.
pub const MAX_EXTRA_DATA_SIZE: usize = 1024;

/// A header timestamp may not be more than this many seconds ahead of "now".
pub const FUTURE_TIMESTAMP_BOUND_SECS: u64 = 900;

/// Base gas cost of any transaction.
pub const TRANSACTION_GAS: u64 = 21_000;

/// Gas cost per byte of transaction data.
pub const TXDATA_GAS: u64 = 68;

/// One szabo, in wei (10^12).
pub const SZABO: u64 = 1_000_000_000_000;

/// Default minimum gas price a block producer will accept.
pub const INITIAL_MIN_GAS_PRICE: u64 = 10 * SZABO;

/// Number of generations back an uncle's parent may be from the including block.
pub const UNCLE_GENERATION_GAP: std::ops::RangeInclusive<u64> = 2..=7;

/// Number of blocks back an uncle itself may be from the including block.
pub const UNCLE_AGE: std::ops::RangeInclusive<u64> = 1..=6;
