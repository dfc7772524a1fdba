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

//! Formatting helpers for validation errors: "expected X, found Y" and
//! "Y out of bounds [min, max]".

use std::fmt;

/// Error indicating an expected value was not found.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Mismatch<T: fmt::Debug> {
    /// Value expected.
    pub expected: T,
    /// Value found.
    pub found: T,
}

impl<T: fmt::Debug> fmt::Display for Mismatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Expected {:?}, found {:?}", self.expected, self.found)
    }
}

/// Error indicating value found is outside of a valid range.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OutOfBounds<T: fmt::Debug> {
    /// Minimum allowed value.
    pub min: Option<T>,
    /// Maximum allowed value.
    pub max: Option<T>,
    /// Value found.
    pub found: T,
}

impl<T: fmt::Debug> fmt::Display for OutOfBounds<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => write!(
                f,
                "Should be in range {:?}-{:?}, found {:?}",
                min, max, self.found
            ),
            (Some(min), None) => write!(f, "Should be at least {:?}, found {:?}", min, self.found),
            (None, Some(max)) => write!(f, "Should be at most {:?}, found {:?}", max, self.found),
            (None, None) => write!(f, "Found {:?}", self.found),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_display() {
        let m = Mismatch {
            expected: 1u64,
            found: 2u64,
        };
        assert_eq!(format!("{}", m), "Expected 1, found 2");
    }

    #[test]
    fn out_of_bounds_display() {
        let o = OutOfBounds {
            min: Some(1u64),
            max: Some(10u64),
            found: 20u64,
        };
        assert_eq!(format!("{}", o), "Should be in range 1-10, found 20");
    }
}
