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

//! Blockchain state-transition engine.
//!
//! This crate owns the state machine that decides what a new block does to
//! a chain: header and uncle validation ([`engines`]), per-transaction
//! execution ([`executive`]), whole-block application and reward
//! distribution ([`block`]), and the connector that routes an incoming
//! block to the canonical chain, an alternate chain, or the garbage buffer
//! ([`client`]). The world-state trie, the opcode interpreter and the
//! proof-of-work search all live outside this crate, behind the trait
//! boundaries declared in [`external`] and re-exported from `engine-vm`.

#![warn(missing_docs)]

#[macro_use]
extern crate error_chain;

pub mod block;
pub mod client;
pub mod engines;
pub mod error;
pub mod executive;
pub mod external;
pub mod spec;

pub use block::{apply_block, AppliedBlock};
pub use client::{ClientReport, Engine, EngineConfig, ImportOutcome};
pub use error::{Error, ErrorKind};
pub use spec::{Genesis, ProtocolParams};

pub use engine_types as types;
pub use engine_vm as vm;
