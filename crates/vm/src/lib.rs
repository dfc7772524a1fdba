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

//! The external capability contracts the engine is built against: the
//! checkpointable repository, the VM invocation boundary, and the crypto
//! boundary. None of these are implemented here for production use — the
//! world-state trie, the opcode interpreter and the signature/hash
//! primitives all live outside this crate. `fake` provides minimal
//! in-memory implementations for tests.

pub mod constants;
pub mod program;
pub mod repository;
pub mod schedule;

#[cfg(any(test, feature = "test-helpers"))]
pub mod fake;

pub use constants::*;
pub use program::{ProgramInvoke, ProgramOutcome};
pub use repository::Repository;
pub use schedule::Schedule;

use engine_types::Header;
use ethereum_types::H256;

/// The crypto boundary: keccak-256 and (eventually) signature recovery live
/// outside this crate. The engine only ever calls through this trait.
pub trait Crypto: Send + Sync {
    /// keccak256 of `data`.
    fn keccak256(&self, data: &[u8]) -> H256;
}

/// The VM boundary: opcode interpretation lives outside this crate.
pub trait Vm: Send + Sync {
    /// Execute `invoke` against `repo` (a tracked child of the engine's
    /// repository) and report the outcome.
    fn play(&self, invoke: &ProgramInvoke, repo: &mut dyn Repository) -> ProgramOutcome;
}

/// The proof-of-work boundary: mining (the search for a valid seal) is out
/// of scope; only verifying a header's seal is part of the header
/// validator, delegated through this trait.
pub trait ProofOfWork: Send + Sync {
    /// True if `header`'s seal is a valid proof of work for its difficulty.
    fn verify(&self, header: &Header) -> bool;
}
