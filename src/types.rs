//! Value types shared by cubes, functions and product stores.
//!
//! [`Literal`] describes the role a variable plays inside a product term, and
//! [`Weight`] is the output of a weighted function at a single point.
use std::fmt;

/// The role of a single variable in a product term.
///
/// # Invariants
///
/// - `Absent` and `Merged` describe the same product once merging is done;
///   cube equality and hashing treat them as one state (see [`Literal::key`]).
/// - `Merged` is only produced by [`Cube::try_merge`][crate::cube::Cube::try_merge].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Literal {
    /// The variable appears negated.
    Zero,
    /// The variable appears positive.
    One,
    /// The variable does not appear in the product.
    Absent,
    /// The variable was eliminated by merging two adjacent cubes.
    Merged,
}

impl Literal {
    /// Returns `true` if the variable does not constrain the product.
    pub fn is_free(self) -> bool {
        matches!(self, Literal::Absent | Literal::Merged)
    }

    /// Returns the fixed boolean value of the literal, or `None` if it is free.
    pub fn value(self) -> Option<bool> {
        match self {
            Literal::Zero => Some(false),
            Literal::One => Some(true),
            Literal::Absent | Literal::Merged => None,
        }
    }

    /// Canonical two-bit code used for equality and hashing.
    pub(crate) fn key(self) -> u8 {
        match self {
            Literal::Zero => 0,
            Literal::One => 1,
            Literal::Absent | Literal::Merged => 2,
        }
    }

    /// Returns `true` if the literal admits the given input bit.
    pub fn admits(self, bit: bool) -> bool {
        match self.value() {
            Some(v) => v == bit,
            None => true,
        }
    }
}

impl From<bool> for Literal {
    fn from(bit: bool) -> Self {
        if bit {
            Literal::One
        } else {
            Literal::Zero
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Literal::Zero => '0',
            Literal::One => '1',
            Literal::Absent | Literal::Merged => '-',
        };
        write!(f, "{}", c)
    }
}

/// Output of a weighted function at a single point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Weight {
    /// A natural number the representation has to reach.
    Value(u32),
    /// The point is unconstrained (or already paid for).
    DontCare,
}

impl Weight {
    pub const ZERO: Weight = Weight::Value(0);

    pub fn is_dont_care(self) -> bool {
        matches!(self, Weight::DontCare)
    }

    pub fn is_zero(self) -> bool {
        self == Weight::ZERO
    }

    /// Returns the value, or `None` for a don't-care point.
    pub fn value(self) -> Option<u32> {
        match self {
            Weight::Value(v) => Some(v),
            Weight::DontCare => None,
        }
    }

    /// Returns the value only if it is strictly positive.
    pub fn positive(self) -> Option<u32> {
        self.value().filter(|&v| v > 0)
    }
}

impl From<u32> for Weight {
    fn from(value: u32) -> Self {
        Weight::Value(value)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Value(v) => write!(f, "{}", v),
            Weight::DontCare => write!(f, "*"),
        }
    }
}
