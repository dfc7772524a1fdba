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

//! Minimal in-memory stand-ins for the repository, VM and crypto
//! boundaries, in the spirit of `vm::tests::FakeExt` upstream: just enough
//! behaviour to drive the engine's tests without a real trie or
//! interpreter.

use std::collections::HashMap;

use engine_types::Account;
use ethereum_types::{Address, H256, U256};
use parity_bytes::Bytes;

use crate::program::{ProgramInvoke, ProgramOutcome};
use crate::repository::Repository;
use crate::{Crypto, ProofOfWork, Vm};
use engine_types::Header;

#[derive(Default, Clone)]
struct Overlay {
    accounts: HashMap<Address, Option<Account>>,
    storage: HashMap<(Address, H256), H256>,
    code: HashMap<H256, Bytes>,
}

/// A trivial, non-cryptographic stand-in for the keccak boundary. Good
/// enough for deterministic contract-address derivation in tests; never
/// use outside of them.
#[derive(Default, Clone, Copy)]
pub struct FakeCrypto;

impl Crypto for FakeCrypto {
    fn keccak256(&self, data: &[u8]) -> H256 {
        // FNV-1a, expanded to fill 32 bytes. Deterministic and collision-free
        // enough for test fixtures; not a real hash function.
        let mut h: u64 = 0xcbf29ce484222325;
        for &b in data {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        let mut out = [0u8; 32];
        for (i, chunk) in out.chunks_mut(8).enumerate() {
            let mixed = h.wrapping_add(i as u64).wrapping_mul(0x100000001b3);
            chunk.copy_from_slice(&mixed.to_be_bytes());
        }
        H256(out)
    }
}

/// An in-memory repository with a checkpoint stack. Holds no backing
/// trie — `sync` derives a pseudo-root from account contents via the
/// injected `Crypto`, which is enough to exercise "does the root change
/// when state changes" without a real Merkle-Patricia trie.
pub struct FakeRepository {
    base: Overlay,
    stack: Vec<Overlay>,
    root: H256,
    crypto: FakeCrypto,
}

impl Default for FakeRepository {
    fn default() -> Self {
        FakeRepository {
            base: Overlay::default(),
            stack: Vec::new(),
            root: H256::zero(),
            crypto: FakeCrypto,
        }
    }
}

impl FakeRepository {
    /// A fresh repository, as if just opened against genesis state.
    pub fn new() -> Self {
        Self::default()
    }

    fn layers(&self) -> impl Iterator<Item = &Overlay> {
        self.stack.iter().rev().chain(std::iter::once(&self.base))
    }

    fn top_mut(&mut self) -> &mut Overlay {
        self.stack.last_mut().unwrap_or(&mut self.base)
    }
}

impl Repository for FakeRepository {
    fn get_account(&self, addr: &Address) -> Option<Account> {
        for layer in self.layers() {
            if let Some(v) = layer.accounts.get(addr) {
                return v.clone();
            }
        }
        None
    }

    fn create_account(&mut self, addr: &Address) {
        if self.get_account(addr).is_none() {
            self.top_mut()
                .accounts
                .insert(*addr, Some(Account::new_basic()));
        }
    }

    fn add_balance(&mut self, addr: &Address, amount: &U256) {
        let mut acc = self.get_account(addr).unwrap_or_default();
        acc.balance += *amount;
        self.top_mut().accounts.insert(*addr, Some(acc));
    }

    fn sub_balance(&mut self, addr: &Address, amount: &U256) {
        let mut acc = self
            .get_account(addr)
            .expect("sub_balance on unknown account");
        acc.balance = acc
            .balance
            .checked_sub(*amount)
            .expect("sub_balance would drive balance negative");
        self.top_mut().accounts.insert(*addr, Some(acc));
    }

    fn increase_nonce(&mut self, addr: &Address) {
        let mut acc = self.get_account(addr).unwrap_or_default();
        acc.nonce += U256::one();
        self.top_mut().accounts.insert(*addr, Some(acc));
    }

    fn get_code(&self, addr: &Address) -> Option<Bytes> {
        let code_hash = self.get_account(addr)?.code_hash;
        for layer in self.layers() {
            if let Some(code) = layer.code.get(&code_hash) {
                return Some(code.clone());
            }
        }
        None
    }

    fn save_code(&mut self, addr: &Address, code: Bytes) -> H256 {
        let hash = self.crypto.keccak256(&code);
        self.top_mut().code.insert(hash, code);
        let mut acc = self.get_account(addr).unwrap_or_default();
        acc.code_hash = hash;
        self.top_mut().accounts.insert(*addr, Some(acc));
        hash
    }

    fn get_storage_word(&self, addr: &Address, key: &H256) -> H256 {
        for layer in self.layers() {
            if let Some(v) = layer.storage.get(&(*addr, *key)) {
                return *v;
            }
        }
        H256::zero()
    }

    fn put_storage_word(&mut self, addr: &Address, key: H256, value: H256) {
        self.top_mut().storage.insert((*addr, key), value);
    }

    fn delete(&mut self, addr: &Address) {
        self.top_mut().accounts.insert(*addr, None);
    }

    fn get_world_state_root(&self) -> H256 {
        self.root
    }

    fn sync(&mut self) -> H256 {
        assert!(
            self.stack.is_empty(),
            "sync called with an open tracking checkpoint"
        );
        let mut accounts: Vec<_> = self.base.accounts.iter().collect();
        accounts.sort_by_key(|(addr, _)| **addr);
        let mut preimage = Vec::new();
        for (addr, acc) in accounts {
            preimage.extend_from_slice(addr.as_bytes());
            if let Some(acc) = acc {
                preimage.extend_from_slice(&acc.nonce.to_big_endian_vec());
                preimage.extend_from_slice(&acc.balance.to_big_endian_vec());
                preimage.extend_from_slice(acc.code_hash.as_bytes());
            }
        }
        self.root = self.crypto.keccak256(&preimage);
        self.root
    }

    fn start_tracking(&mut self) {
        self.stack.push(Overlay::default());
    }

    fn commit(&mut self) {
        let top = self.stack.pop().expect("commit without start_tracking");
        let under = self.stack.last_mut().unwrap_or(&mut self.base);
        for (addr, acc) in top.accounts {
            under.accounts.insert(addr, acc);
        }
        for (k, v) in top.storage {
            under.storage.insert(k, v);
        }
        for (h, c) in top.code {
            under.code.insert(h, c);
        }
    }

    fn rollback(&mut self) {
        self.stack.pop().expect("rollback without start_tracking");
    }

    fn close(&mut self) {
        // No real handle to release; nothing to do.
    }

    fn reset(&mut self) {
        self.base = Overlay::default();
        self.stack.clear();
        self.root = H256::zero();
    }

    fn tracking_depth(&self) -> usize {
        self.stack.len()
    }
}

trait ToBigEndianVec {
    fn to_big_endian_vec(&self) -> Vec<u8>;
}

impl ToBigEndianVec for U256 {
    fn to_big_endian_vec(&self) -> Vec<u8> {
        let mut buf = [0u8; 32];
        self.to_big_endian(&mut buf);
        buf.to_vec()
    }
}

/// A VM double driven entirely by its init code / call data, for tests.
/// Recognised programs:
/// - `[0x60]`: on creation, deploy this single byte as runtime code.
/// - anything else on creation: halt with no returned code (plain account).
/// - `[0xfe]` anywhere: simulate a runtime failure (reverts, full gas charged).
pub struct FakeVm;

impl Vm for FakeVm {
    fn play(&self, invoke: &ProgramInvoke, _repo: &mut dyn Repository) -> ProgramOutcome {
        if invoke.code == [0xfeu8] {
            return ProgramOutcome::RuntimeFailure;
        }
        let required = U256::from(50_000u64);
        if invoke.gas < required {
            return ProgramOutcome::OutOfGas {
                gas_used: invoke.gas,
            };
        }
        let return_data = if invoke.is_create {
            invoke.code.clone()
        } else {
            Vec::new()
        };
        ProgramOutcome::Halt {
            gas_used: required,
            return_data,
            delete_accounts: Vec::new(),
        }
    }
}

/// A proof-of-work double that always reports a header's seal as valid.
pub struct FakePow;

impl ProofOfWork for FakePow {
    fn verify(&self, _header: &Header) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_tracking_rolls_back_cleanly() {
        let mut repo = FakeRepository::new();
        let addr = Address::from_low_u64_be(1);
        repo.create_account(&addr);
        repo.add_balance(&addr, &U256::from(100));

        repo.start_tracking();
        repo.add_balance(&addr, &U256::from(50));
        assert_eq!(repo.get_account(&addr).unwrap().balance, U256::from(150));
        repo.rollback();

        assert_eq!(repo.get_account(&addr).unwrap().balance, U256::from(100));
    }

    #[test]
    fn nested_tracking_commits() {
        let mut repo = FakeRepository::new();
        let addr = Address::from_low_u64_be(1);
        repo.create_account(&addr);

        repo.start_tracking();
        repo.add_balance(&addr, &U256::from(50));
        repo.commit();

        assert_eq!(repo.get_account(&addr).unwrap().balance, U256::from(50));
        assert_eq!(repo.tracking_depth(), 0);
    }

    #[test]
    fn sync_changes_root_when_state_changes() {
        let mut repo = FakeRepository::new();
        let r0 = repo.sync();
        repo.create_account(&Address::from_low_u64_be(2));
        let r1 = repo.sync();
        assert_ne!(r0, r1);
    }
}
