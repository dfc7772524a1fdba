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

//! Crate-wide error type.

use ethereum_types::H256;
use unexpected::{Mismatch, OutOfBounds};

error_chain! {
    errors {
        /// A header or uncle failed the block validator.
        InvalidBlock(reason: String) {
            description("block failed validation")
            display("Invalid block: {}", reason)
        }

        /// A header field did not match its expected value.
        HeaderMismatch(field: &'static str, mismatch: Mismatch<String>) {
            description("header field mismatch")
            display("Header field '{}' mismatch: {}", field, mismatch)
        }

        /// A header field was outside its permitted range.
        HeaderOutOfBounds(field: &'static str, bounds: OutOfBounds<String>) {
            description("header field out of bounds")
            display("Header field '{}' out of bounds: {}", field, bounds)
        }

        /// An uncle referenced an ineligible or duplicate ancestor.
        InvalidUncle(reason: String) {
            description("uncle failed validation")
            display("Invalid uncle: {}", reason)
        }

        /// Total gas used by a block's transactions exceeded its gas limit.
        BlockGasLimitExceeded(limit: u64, used: u64) {
            description("block gas limit exceeded")
            display("Block gas limit exceeded: limit {}, used {}", limit, used)
        }

        /// A block was submitted whose parent is not known to this engine at all.
        UnknownParent(hash: H256) {
            description("unknown parent")
            display("Unknown parent block: {:?}", hash)
        }
    }
}
