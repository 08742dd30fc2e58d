//! Authorization code candidate space
//!
//! Codes are strings over a constrained alphabet: the first and last character
//! come from the five edge symbols, every interior character from the six
//! interior symbols (edge symbols plus the `.` wildcard). The space for a
//! length `L` therefore holds `5` candidates for `L == 1` and
//! `5 * 6^(L-2) * 5` otherwise.
//!
//! Candidates are addressed by a mixed-radix counter — first character is the
//! least significant digit (base 5), then the interior digits (base 6), then
//! the last character (base 5) — so enumeration is deterministic, reproducible
//! and partitionable by contiguous index ranges without ever materializing the
//! space.

use crate::core::limits::MAX_AUTH_CODE_LEN;
use thiserror::Error;

/// Symbols allowed at the first and last position.
pub const EDGE_ALPHABET: [char; 5] = ['5', '6', '7', '8', '9'];

/// Symbols allowed at interior positions: the edge symbols plus a wildcard.
pub const INTERIOR_ALPHABET: [char; 6] = ['5', '6', '7', '8', '9', '.'];

/// Errors constructing a candidate space
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization code length must be at least 1, got {length}")]
    InvalidLength { length: usize },

    #[error("authorization code length {length} exceeds maximum {max}")]
    LengthTooLarge { length: usize, max: usize },

    #[error("candidate space for code length {length} exceeds the addressable range")]
    SpaceTooLarge { length: usize },
}

/// The full candidate space for one code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSpace {
    length: usize,
    total: u128,
}

impl CandidateSpace {
    /// Build the space for codes of `length` characters.
    pub fn new(length: usize) -> Result<Self, AuthError> {
        if length == 0 {
            return Err(AuthError::InvalidLength { length });
        }
        if length > MAX_AUTH_CODE_LEN {
            return Err(AuthError::LengthTooLarge {
                length,
                max: MAX_AUTH_CODE_LEN,
            });
        }

        let total = if length == 1 {
            5
        } else {
            6u128
                .checked_pow((length - 2) as u32)
                .and_then(|interior| interior.checked_mul(25))
                .ok_or(AuthError::SpaceTooLarge { length })?
        };

        Ok(Self { length, total })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of distinct candidates.
    pub fn total(&self) -> u128 {
        self.total
    }

    /// Decode the candidate at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= total()`.
    pub fn candidate(&self, index: u128) -> String {
        assert!(index < self.total, "candidate index out of range");

        let mut counter = index;
        let mut code = String::with_capacity(self.length);

        code.push(EDGE_ALPHABET[(counter % 5) as usize]);
        counter /= 5;

        if self.length > 1 {
            for _ in 0..self.length - 2 {
                code.push(INTERIOR_ALPHABET[(counter % 6) as usize]);
                counter /= 6;
            }
            code.push(EDGE_ALPHABET[(counter % 5) as usize]);
        }

        code
    }

    /// Iterate all candidates in index order.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.total).map(move |index| self.candidate(index))
    }
}
