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

//! Header validation, uncle validation and block reward distribution.
//!
//! Proof-of-work search and the opcode interpreter live outside this crate;
//! what remains here is the family of pure checks and pure arithmetic that
//! decide whether a header is acceptable and how much a block's miner (and
//! its uncles) should be paid.

use std::collections::HashSet;

use engine_types::{BlockNumber, Header};
use engine_vm::{ProofOfWork, FUTURE_TIMESTAMP_BOUND_SECS};
use ethereum_types::{H256, U256};
use log::warn;
use unexpected::{Mismatch, OutOfBounds};

use crate::error::{Error, ErrorKind};
use crate::spec::ProtocolParams;

/// How far back an uncle may be, relative to the including block.
const UNCLE_GENERATION_MIN: u64 = 1;
const UNCLE_GENERATION_MAX: u64 = 6;
/// How far back the uncle's own parent may be, relative to the including block.
const UNCLE_GENERATION_GAP_MIN: u64 = 2;
pub(crate) const UNCLE_GENERATION_GAP_MAX: u64 = 7;
/// Maximum uncles a single block may include.
const MAX_UNCLES: usize = 2;

/// Difficulty adjustment, modelled on the post-Byzantium "homeostasis"
/// formula: `parent_difficulty + parent_difficulty / 2048 * max(sigma, -99)`
/// where `sigma` is `(1 or 2) - (block_timestamp - parent_timestamp) / 9`,
/// the `2` applying when the parent itself included uncles.
pub fn expected_difficulty(header: &Header, parent: &Header, min_difficulty: U256) -> U256 {
    const BOUND_DIVISOR: u64 = 2048;
    const UNCLE_BONUS_DIVISOR: u64 = 9;

    if header.number == 0 {
        return parent.difficulty;
    }

    let threshold: i64 = if parent.has_uncles { 2 } else { 1 };
    let elapsed = header.timestamp.saturating_sub(parent.timestamp);
    let sigma = threshold - (elapsed / UNCLE_BONUS_DIVISOR) as i64;
    let sigma = sigma.max(-99);

    let adjustment = parent.difficulty / U256::from(BOUND_DIVISOR);
    let target = if sigma >= 0 {
        parent.difficulty + adjustment * U256::from(sigma as u64)
    } else {
        parent
            .difficulty
            .saturating_sub(adjustment * U256::from((-sigma) as u64))
    };

    target.max(min_difficulty)
}

/// Gas limit adjustment: `max(MIN_GAS_LIMIT, (parent.gas_limit * 1023 +
/// parent.gas_used * 6/5) / 1024)`, truncating integer arithmetic throughout.
/// `bound_divisor` is carried for callers that need it (e.g. a maximum-drift
/// check) but plays no part in the formula itself.
pub fn calc_gas_limit(parent_gas_limit: u64, parent_gas_used: u64, _bound_divisor: u64, min_gas_limit: u64) -> u64 {
    let contrib = (parent_gas_limit as u128 * 1023 + (parent_gas_used as u128) * 6 / 5) / 1024;
    (contrib as u64).max(min_gas_limit)
}

/// Checks that do not require the parent header: bounds on the header's own
/// fields, independent of chain position.
fn validate_header_params(header: &Header, params: &ProtocolParams, max_extra_data: usize, now: u64) -> Result<(), Error> {
    if header.gas_used > header.gas_limit {
        return Err(ErrorKind::BlockGasLimitExceeded(header.gas_limit, header.gas_used).into());
    }
    if header.gas_limit < params.min_gas_limit {
        return Err(ErrorKind::HeaderOutOfBounds(
            "gas_limit",
            OutOfBounds {
                min: Some(params.min_gas_limit.to_string()),
                max: None,
                found: header.gas_limit.to_string(),
            },
        )
        .into());
    }
    if header.extra_data.len() > max_extra_data {
        return Err(ErrorKind::HeaderOutOfBounds(
            "extra_data",
            OutOfBounds {
                min: None,
                max: Some(max_extra_data.to_string()),
                found: header.extra_data.len().to_string(),
            },
        )
        .into());
    }
    if header.timestamp > now + FUTURE_TIMESTAMP_BOUND_SECS {
        return Err(ErrorKind::HeaderOutOfBounds(
            "timestamp",
            OutOfBounds {
                min: None,
                max: Some(now.to_string()),
                found: header.timestamp.to_string(),
            },
        )
        .into());
    }
    Ok(())
}

/// Checks that relate a header to its parent: number sequencing, timestamp
/// ordering, difficulty and gas-limit drift.
fn validate_against_parent(header: &Header, parent: &Header, params: &ProtocolParams) -> Result<(), Error> {
    if header.number != parent.number + 1 {
        return Err(ErrorKind::HeaderMismatch(
            "number",
            Mismatch {
                expected: (parent.number + 1).to_string(),
                found: header.number.to_string(),
            },
        )
        .into());
    }
    if header.timestamp <= parent.timestamp {
        return Err(ErrorKind::HeaderOutOfBounds(
            "timestamp",
            OutOfBounds {
                min: Some((parent.timestamp + 1).to_string()),
                max: None,
                found: header.timestamp.to_string(),
            },
        )
        .into());
    }

    let expected_difficulty = expected_difficulty(header, parent, U256::from(params.min_gas_limit));
    if header.difficulty != expected_difficulty {
        return Err(ErrorKind::HeaderMismatch(
            "difficulty",
            Mismatch {
                expected: expected_difficulty.to_string(),
                found: header.difficulty.to_string(),
            },
        )
        .into());
    }

    let expected_gas_limit = calc_gas_limit(
        parent.gas_limit,
        parent.gas_used,
        params.gas_limit_bound_divisor,
        params.min_gas_limit,
    );
    if header.gas_limit != expected_gas_limit {
        return Err(ErrorKind::HeaderMismatch(
            "gas_limit",
            Mismatch {
                expected: expected_gas_limit.to_string(),
                found: header.gas_limit.to_string(),
            },
        )
        .into());
    }

    Ok(())
}

/// Full header validation: every check runs and every failure is reported,
/// rather than returning on the first passing check and skipping the rest.
pub fn validate_header(
    header: &Header,
    parent: &Header,
    params: &ProtocolParams,
    max_extra_data: usize,
    now: u64,
    pow: &dyn ProofOfWork,
) -> Result<(), Error> {
    validate_header_params(header, params, max_extra_data, now)?;
    validate_against_parent(header, parent, params)?;
    if !pow.verify(header) {
        return Err(ErrorKind::InvalidBlock("proof of work seal does not verify".into()).into());
    }
    Ok(())
}

/// An uncle together with its parent, as looked up by the caller from the
/// chain (this module has no block-storage access of its own — see the
/// external block-store boundary).
pub struct UncleContext<'a> {
    pub uncle: &'a Header,
    pub uncle_parent: &'a Header,
}

/// Validates a block's uncle list against its own header and the ancestors
/// supplied by the caller. `ancestors` must list `header`'s last
/// `UNCLE_GENERATION_MAX` direct ancestors (closest first); it is used both
/// to bound an uncle's generation gap and to reject uncles already included
/// by one of those ancestors.
#[allow(clippy::too_many_arguments)]
pub fn validate_uncles(
    header: &Header,
    uncles: &[UncleContext],
    ancestors: &[Header],
    already_included: &HashSet<H256>,
    params: &ProtocolParams,
    max_extra_data: usize,
    now: u64,
    pow: &dyn ProofOfWork,
) -> Result<(), Error> {
    if uncles.len() > MAX_UNCLES {
        return Err(ErrorKind::InvalidUncle(format!(
            "too many uncles: {} > {}",
            uncles.len(),
            MAX_UNCLES
        ))
        .into());
    }

    let mut seen = HashSet::new();
    for ctx in uncles {
        let uncle = ctx.uncle;

        if already_included.contains(&uncle.hash) {
            return Err(ErrorKind::InvalidUncle(format!("uncle {:?} already included by an ancestor", uncle.hash)).into());
        }
        if !seen.insert(uncle.hash) {
            return Err(ErrorKind::InvalidUncle(format!("uncle {:?} duplicated within this block", uncle.hash)).into());
        }
        if uncle.hash == header.hash {
            return Err(ErrorKind::InvalidUncle("uncle is the including block itself".into()).into());
        }

        let age = header.number.saturating_sub(uncle.number);
        if age < UNCLE_GENERATION_MIN || age > UNCLE_GENERATION_MAX {
            return Err(ErrorKind::HeaderOutOfBounds(
                "uncle age",
                OutOfBounds {
                    min: Some(UNCLE_GENERATION_MIN.to_string()),
                    max: Some(UNCLE_GENERATION_MAX.to_string()),
                    found: age.to_string(),
                },
            )
            .into());
        }

        let generation_gap = header.number.saturating_sub(ctx.uncle_parent.number);
        if generation_gap < UNCLE_GENERATION_GAP_MIN || generation_gap > UNCLE_GENERATION_GAP_MAX {
            return Err(ErrorKind::HeaderOutOfBounds(
                "uncle generation gap",
                OutOfBounds {
                    min: Some(UNCLE_GENERATION_GAP_MIN.to_string()),
                    max: Some(UNCLE_GENERATION_GAP_MAX.to_string()),
                    found: generation_gap.to_string(),
                },
            )
            .into());
        }

        let ancestor_known = ancestors.iter().any(|a| a.hash == ctx.uncle_parent.hash);
        if !ancestor_known {
            return Err(ErrorKind::InvalidUncle(format!(
                "uncle {:?}'s parent is not among the including block's recent ancestors",
                uncle.hash
            ))
            .into());
        }

        // An uncle must individually pass the header validator in full: its
        // own field bounds (extra-data, gas, future timestamp), the checks
        // against its parent, and its proof-of-work seal.
        validate_header(uncle, ctx.uncle_parent, params, max_extra_data, now, pow)?;
    }

    Ok(())
}

/// Credit block and uncle rewards to their respective coinbases. Returns the
/// list of `(address, amount)` credits applied, for the caller's repository
/// to apply and for telemetry.
///
/// Block number counts toward the "recently mined" gap used to scale an
/// uncle's own reward: an uncle `depth` blocks behind the including block
/// earns `uncle_reward * (8 - depth) / 8`.
pub fn block_reward(header: &Header, uncles: &[Header], params: &ProtocolParams) -> Vec<(ethereum_types::Address, U256)> {
    let mut credits = Vec::with_capacity(1 + uncles.len());

    let inclusion_bonus = params.inclusion_reward * U256::from(uncles.len() as u64);
    credits.push((header.coinbase, params.block_reward + inclusion_bonus));

    for uncle in uncles {
        let depth = header.number.saturating_sub(uncle.number);
        if depth == 0 || depth > 8 {
            warn!("uncle {:?} has an implausible depth {} relative to including block {:?}; skipping its reward", uncle.hash, depth, header.hash);
            continue;
        }
        let scaled = params.uncle_reward * U256::from(8 - depth) / U256::from(8u64);
        credits.push((uncle.coinbase, scaled));
    }

    credits
}
