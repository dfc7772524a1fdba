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

//! Blocks: a header, an ordered transaction list, and an uncle list.

use crate::{Header, SignedTransaction};

/// A full block as received from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The block header.
    pub header: Header,
    /// Transactions, in application order.
    pub transactions: Vec<SignedTransaction>,
    /// Uncle (ommer) headers.
    pub uncles: Vec<Header>,
}

impl Block {
    /// Convenience accessor mirroring `header.hash`.
    pub fn hash(&self) -> ethereum_types::H256 {
        self.header.hash
    }
}
