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

//! Account state as seen through the repository contract.

use ethereum_types::{H256, U256};

/// The keccak of empty code; the `code_hash` of an account with no code.
pub fn empty_code_hash() -> H256 {
    // keccak256("") — a well-known constant, not recomputed at runtime
    // since the hash primitive itself is an external collaborator.
    H256([
        0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03,
        0xc0, 0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85,
        0xa4, 0x70,
    ])
}

/// Account state: nonce, balance, code hash and storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Number of transactions sent from this account.
    pub nonce: U256,
    /// Balance, in wei.
    pub balance: U256,
    /// keccak of the account's code; `empty_code_hash()` for non-contract accounts.
    pub code_hash: H256,
    /// Root of this account's storage trie.
    pub storage_root: H256,
}

impl Account {
    /// A freshly created account: zero nonce and balance, no code, empty storage.
    pub fn new_basic() -> Self {
        Account {
            nonce: U256::zero(),
            balance: U256::zero(),
            code_hash: empty_code_hash(),
            storage_root: H256::zero(),
        }
    }

    /// True if this account has contract code associated with it.
    pub fn is_contract(&self) -> bool {
        self.code_hash != empty_code_hash()
    }
}

impl Default for Account {
    fn default() -> Self {
        Account::new_basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_account_is_not_a_contract() {
        assert!(!Account::new_basic().is_contract());
    }
}
