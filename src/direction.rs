// SPDX-License-Identifier: MPL-2.0
//! Travel direction through a sequence.
//!
//! Every navigation rule is written once against a [`Direction`] value, so
//! stepping backward is the forward algorithm with the sign flipped.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Signed step applied to a position: `+1` or `-1`.
    #[must_use]
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    #[must_use]
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }

    /// Moves `position` one step, or returns `None` when that would go below zero.
    #[must_use]
    pub fn advance(self, position: usize) -> Option<usize> {
        position.checked_add_signed(self.step())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}
