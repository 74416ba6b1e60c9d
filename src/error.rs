//! Error type for function construction and synthesis.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::cube::Cube;

/// Errors raised by the crate.
///
/// Invariant violations of the synthesis algorithms (`UncoveredPoint`,
/// `Stalled`) indicate a defect rather than bad input; they are returned
/// instead of being printed so callers can report them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cube {cube} has free positions and no single decimal index")]
    NotAMinterm { cube: Cube },

    #[error("invalid literal {0:?}, expected '0', '1' or '-'")]
    InvalidLiteral(char),

    #[error("a function of {variables} variables needs {expected} values, got {found}")]
    ValueCountMismatch {
        variables: usize,
        expected: usize,
        found: usize,
    },

    #[error("{variables} variables exceed the supported maximum of {max}")]
    TooManyVariables { variables: usize, max: usize },

    #[error("index {index} is out of range for a function of {variables} variables")]
    IndexOutOfRange { index: usize, variables: usize },

    #[error("input of length {found} given to a function of {expected} variables")]
    ArityMismatch { expected: usize, found: usize },

    #[error("invalid random function parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("failed to allocate storage for {points} points")]
    Allocation {
        points: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("point {point} is not covered by any prime implicant")]
    UncoveredPoint { point: usize },

    #[error("synthesis assigned no product while {remaining} points are still non-zero")]
    Stalled { remaining: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
