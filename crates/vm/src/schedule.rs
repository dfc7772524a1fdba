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

//! Gas schedule: the protocol-parameterised costs the executor applies
//! outside of VM execution itself.

use crate::constants::{TRANSACTION_GAS, TXDATA_GAS};

/// Gas costs used by the transaction executor for the parts of a
/// transaction that are not VM execution (intrinsic gas for a plain
/// transfer, in particular).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Flat per-transaction cost.
    pub tx_gas: u64,
    /// Cost per byte of transaction data.
    pub tx_data_gas: u64,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule {
            tx_gas: TRANSACTION_GAS,
            tx_data_gas: TXDATA_GAS,
        }
    }
}

impl Schedule {
    /// Intrinsic gas of a pure transfer (no code executed): `TRANSACTION + len(data) * TXDATA`.
    pub fn intrinsic_gas(&self, data_len: usize) -> u64 {
        self.tx_gas + (data_len as u64) * self.tx_data_gas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsic_gas_of_empty_transfer() {
        let s = Schedule::default();
        assert_eq!(s.intrinsic_gas(0), 21_000);
    }

    #[test]
    fn intrinsic_gas_scales_with_data() {
        let s = Schedule::default();
        assert_eq!(s.intrinsic_gas(10), 21_000 + 680);
    }
}
