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

//! Transactions, signed and unsigned.

use parity_bytes::Bytes;
use ethereum_types::{Address, U256};

/// Whether a transaction calls an existing account or creates a new contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Regular call (or plain value transfer) to `Address`.
    Call(Address),
    /// Contract creation; the new address is derived from sender + nonce.
    Create,
}

impl Action {
    /// The call target, if this is a `Call`.
    pub fn receive_address(&self) -> Option<Address> {
        match self {
            Action::Call(addr) => Some(*addr),
            Action::Create => None,
        }
    }

    /// True for `Action::Create`.
    pub fn is_create(&self) -> bool {
        matches!(self, Action::Create)
    }
}

/// The part of a transaction that is signed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Sender's account nonce at the time this transaction was authored.
    pub nonce: U256,
    /// Price per unit of gas, in wei.
    pub gas_price: U256,
    /// Maximum gas this transaction may consume.
    pub gas_limit: U256,
    /// Call or Create.
    pub action: Action,
    /// Value transferred, in wei.
    pub value: U256,
    /// Call data, or init code for a creation.
    pub data: Bytes,
}

/// Opaque signature bytes; ECDSA recovery is an external crypto collaborator.
pub type Signature = Bytes;

/// A transaction together with its raw signature, before sender recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedTransaction {
    /// The signed payload.
    pub unsigned: Transaction,
    /// Signature bytes over `unsigned`.
    pub signature: Signature,
}

/// A transaction whose sender has already been recovered by the upstream
/// verification pipeline (outside this crate's scope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The unverified transaction this was recovered from.
    pub transaction: UnverifiedTransaction,
    /// Recovered sender address.
    pub sender: Address,
}

impl SignedTransaction {
    /// Build a signed transaction from parts, for use by tests and by
    /// callers that already hold a recovered sender.
    pub fn new(unsigned: Transaction, signature: Signature, sender: Address) -> Self {
        SignedTransaction {
            transaction: UnverifiedTransaction { unsigned, signature },
            sender,
        }
    }

    /// The signed transaction body.
    pub fn tx(&self) -> &Transaction {
        &self.transaction.unsigned
    }

    /// True if this transaction creates a contract.
    pub fn is_creation(&self) -> bool {
        self.tx().action.is_create()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_receive_address() {
        let addr = Address::from_low_u64_be(9);
        assert_eq!(Action::Call(addr).receive_address(), Some(addr));
        assert_eq!(Action::Create.receive_address(), None);
    }

    #[test]
    fn creation_classification() {
        let tx = Transaction {
            nonce: U256::zero(),
            gas_price: U256::one(),
            gas_limit: U256::from(21_000),
            action: Action::Create,
            value: U256::zero(),
            data: vec![0x60],
        };
        let signed = SignedTransaction::new(tx, Vec::new(), Address::zero());
        assert!(signed.is_creation());
    }
}
