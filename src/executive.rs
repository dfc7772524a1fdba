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

//! Per-transaction state transition: value transfer, contract creation,
//! contract invocation and gas accounting.

use engine_types::{Header, SignedTransaction};
use engine_vm::{Crypto, ProgramInvoke, ProgramOutcome, Repository, Schedule, Vm};
use ethereum_types::{Address, U256};

/// Derive a contract's address from its creator and the creator's nonce at
/// the time of creation. The real protocol hashes an RLP encoding of the
/// pair; RLP is out of scope here, so this hashes a plain concatenation —
/// deterministic and collision-resistant enough given a real `Crypto`, which
/// is all the executor requires of it.
fn contract_address(crypto: &dyn Crypto, sender: &Address, nonce: &U256) -> Address {
    let mut preimage = Vec::with_capacity(20 + 32);
    preimage.extend_from_slice(sender.as_bytes());
    let mut nonce_be = [0u8; 32];
    nonce.to_big_endian(&mut nonce_be);
    preimage.extend_from_slice(&nonce_be);
    let hash = crypto.keccak256(&preimage);
    Address::from_slice(&hash.as_bytes()[12..])
}

/// Run one transaction against `repo` and return the gas it consumed.
///
/// Balance sufficiency for the outer value transfer and the gas prepay is
/// checked together, against the sender's balance *before either debit*:
/// a transaction that can afford its value but not value-plus-gas transfers
/// nothing and is charged no gas (beyond the unconditional nonce bump) — see
/// the worked example in `DESIGN.md` for why this reads the component design
/// as one atomic sufficiency check rather than two sequential ones.
pub fn apply_transaction(
    repo: &mut dyn Repository,
    vm: &dyn Vm,
    crypto: &dyn Crypto,
    schedule: &Schedule,
    header: &Header,
    tx: &SignedTransaction,
) -> u64 {
    let t = tx.tx();
    let sender = tx.sender;

    // 1. Sender resolution.
    let account = match repo.get_account(&sender) {
        Some(a) => a,
        None => return 0,
    };

    // 2. Nonce check.
    if account.nonce != t.nonce {
        return 0;
    }

    // 3. Nonce bump — unconditional from here on, regardless of what follows.
    repo.increase_nonce(&sender);

    // 4. Type classification.
    let is_create = t.action.is_create();
    let receiver = if is_create {
        contract_address(crypto, &sender, &t.nonce)
    } else {
        let addr = t
            .action
            .receive_address()
            .expect("a non-creation action always carries a receive address");
        if repo.get_account(&addr).is_none() {
            repo.create_account(&addr);
        }
        addr
    };
    let code = if is_create {
        t.data.clone()
    } else {
        repo.get_code(&receiver).unwrap_or_default()
    };

    // 5+6. Outer value transfer and gas prepay, gated by one sufficiency
    // check against the sender's pre-debit balance.
    let gas_debit = t.gas_limit.saturating_mul(t.gas_price);
    let required = t.value.saturating_add(gas_debit);
    if account.balance < required {
        return 0;
    }

    let mut value_pending_for_child = false;
    if !t.value.is_zero() {
        repo.sub_balance(&sender, &t.value);
        if is_create {
            value_pending_for_child = true;
        } else {
            repo.add_balance(&receiver, &t.value);
        }
    }
    repo.sub_balance(&sender, &gas_debit);
    repo.add_balance(&header.coinbase, &gas_debit);

    // 7. Execution.
    if is_create || !code.is_empty() {
        repo.start_tracking();
        if is_create {
            if value_pending_for_child {
                repo.add_balance(&receiver, &t.value);
            } else {
                repo.create_account(&receiver);
            }
        }

        let invoke = ProgramInvoke {
            sender,
            receiver,
            value: t.value,
            gas: t.gas_limit,
            gas_price: t.gas_price,
            data: t.data.clone(),
            code,
            is_create,
            block_number: header.number,
            block_timestamp: header.timestamp,
            block_difficulty: header.difficulty,
            block_gas_limit: header.gas_limit,
            coinbase: header.coinbase,
        };

        return match vm.play(&invoke, repo) {
            ProgramOutcome::Halt {
                gas_used,
                return_data,
                delete_accounts,
            } => {
                apply_program_result(repo, &sender, &header.coinbase, gas_debit, gas_used, t.gas_price, is_create, &receiver, &return_data, &delete_accounts);
                repo.commit();
                gas_used.as_u64()
            }
            ProgramOutcome::OutOfGas { gas_used } => {
                repo.rollback();
                gas_used.as_u64()
            }
            ProgramOutcome::RuntimeFailure => {
                repo.rollback();
                t.gas_limit.as_u64()
            }
        };
    }

    // 8. Pure transfer path: no code ran.
    let gas_used = schedule.intrinsic_gas(t.data.len());
    let refund = gas_debit.saturating_sub(U256::from(gas_used) * t.gas_price);
    if !refund.is_zero() {
        repo.add_balance(&sender, &refund);
        repo.sub_balance(&header.coinbase, &refund);
    }
    gas_used
}

/// §4.4.1 — apply a `Halt` program result within the still-open tracked
/// child: refund unused gas, persist newly created code, and honour any
/// self-destructs the program emitted.
#[allow(clippy::too_many_arguments)]
fn apply_program_result(
    repo: &mut dyn Repository,
    sender: &Address,
    coinbase: &Address,
    gas_debit: U256,
    gas_used: U256,
    gas_price: U256,
    is_create: bool,
    receiver: &Address,
    return_data: &[u8],
    delete_accounts: &[Address],
) {
    let refund = gas_debit.saturating_sub(gas_used * gas_price);
    if !refund.is_zero() {
        repo.add_balance(sender, &refund);
        repo.sub_balance(coinbase, &refund);
    }
    if is_create && !return_data.is_empty() {
        repo.save_code(receiver, return_data.to_vec());
    }
    for addr in delete_accounts {
        repo.delete(addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_types::{Action, Transaction};
    use engine_vm::fake::{FakeCrypto, FakeRepository, FakeVm};

    fn header() -> Header {
        Header {
            hash: Default::default(),
            parent_hash: Default::default(),
            number: 1,
            timestamp: 0,
            difficulty: U256::from(1),
            gas_limit: 4_700_000,
            gas_used: 0,
            state_root: Default::default(),
            coinbase: Address::from_low_u64_be(999),
            extra_data: Vec::new(),
            min_gas_price: U256::zero(),
            has_uncles: false,
        }
    }

    fn signed(sender: Address, nonce: u64, action: Action, value: u64, gas_limit: u64, gas_price: u64, data: Vec<u8>) -> SignedTransaction {
        let t = Transaction {
            nonce: U256::from(nonce),
            gas_price: U256::from(gas_price),
            gas_limit: U256::from(gas_limit),
            action,
            value: U256::from(value),
            data,
        };
        SignedTransaction::new(t, Vec::new(), sender)
    }

    #[test]
    fn s1_transfer_insufficient_for_value_plus_gas_transfers_nothing() {
        let mut repo = FakeRepository::new();
        let a = Address::from_low_u64_be(1);
        let b = Address::from_low_u64_be(2);
        repo.create_account(&a);
        repo.add_balance(&a, &U256::from(1000));

        let tx = signed(a, 0, Action::Call(b), 100, 21_000, 1, Vec::new());
        let used = apply_transaction(&mut repo, &FakeVm, &FakeCrypto, &Schedule::default(), &header(), &tx);

        assert_eq!(used, 0);
        assert_eq!(repo.get_account(&a).unwrap().balance, U256::from(1000));
        assert_eq!(repo.get_account(&a).unwrap().nonce, U256::one());
        assert!(repo.get_account(&b).is_none());
    }

    #[test]
    fn s1_transfer_succeeds_with_enough_balance_for_value_and_gas() {
        let mut repo = FakeRepository::new();
        let a = Address::from_low_u64_be(1);
        let b = Address::from_low_u64_be(2);
        repo.create_account(&a);
        repo.add_balance(&a, &U256::from(100_000));

        let tx = signed(a, 0, Action::Call(b), 100, 21_000, 1, Vec::new());
        let used = apply_transaction(&mut repo, &FakeVm, &FakeCrypto, &Schedule::default(), &header(), &tx);

        assert_eq!(used, 21_000);
        assert_eq!(repo.get_account(&a).unwrap().balance, U256::from(78_900));
        assert_eq!(repo.get_account(&b).unwrap().balance, U256::from(100));
        assert_eq!(repo.get_account(&header().coinbase).unwrap().balance, U256::from(21_000));
    }

    #[test]
    fn s2_creation_success_saves_returned_code() {
        let mut repo = FakeRepository::new();
        let a = Address::from_low_u64_be(1);
        repo.create_account(&a);
        repo.add_balance(&a, &U256::from(1_000_000));

        let tx = signed(a, 0, Action::Create, 0, 100_000, 1, vec![0x60]);
        let used = apply_transaction(&mut repo, &FakeVm, &FakeCrypto, &Schedule::default(), &header(), &tx);

        assert_eq!(used, 50_000);
        let new_address = contract_address(&FakeCrypto, &a, &U256::zero());
        let code = repo.get_code(&new_address).expect("contract code must be saved");
        assert_eq!(code, vec![0x60]);
    }

    #[test]
    fn s3_creation_out_of_gas_rolls_back_and_charges_full_gas_limit() {
        let mut repo = FakeRepository::new();
        let a = Address::from_low_u64_be(1);
        repo.create_account(&a);
        repo.add_balance(&a, &U256::from(1_000_000));

        let tx = signed(a, 0, Action::Create, 0, 10_000, 1, vec![0x60]);
        let used = apply_transaction(&mut repo, &FakeVm, &FakeCrypto, &Schedule::default(), &header(), &tx);

        assert_eq!(used, 10_000);
        assert_eq!(repo.tracking_depth(), 0);
        let new_address = contract_address(&FakeCrypto, &a, &U256::zero());
        assert!(repo.get_code(&new_address).is_none());
        assert!(repo.get_account(&new_address).is_none());
    }

    #[test]
    fn nonce_mismatch_is_a_no_op() {
        let mut repo = FakeRepository::new();
        let a = Address::from_low_u64_be(1);
        repo.create_account(&a);
        repo.add_balance(&a, &U256::from(1_000_000));

        let tx = signed(a, 5, Action::Call(Address::from_low_u64_be(2)), 0, 21_000, 1, Vec::new());
        let used = apply_transaction(&mut repo, &FakeVm, &FakeCrypto, &Schedule::default(), &header(), &tx);

        assert_eq!(used, 0);
        assert_eq!(repo.get_account(&a).unwrap().nonce, U256::zero());
    }
}
