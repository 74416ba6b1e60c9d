//! Ternary vectors: product terms and points of the boolean hypercube.
//!
//! A [`Cube`] of `n` literals describes a product over `n` variables. Fully
//! specified cubes (no free literal) are single points, which are identified
//! by their decimal index with the **first variable as the most significant
//! bit**:
//!
//! ```
//! use sopp_rs::cube::Cube;
//!
//! let p = Cube::from_decimal(6, 3);
//! assert_eq!(p.to_string(), "110");
//! assert_eq!(p.to_decimal().unwrap(), 6);
//!
//! // A product with free positions covers several points.
//! let c: Cube = "1-0".parse().unwrap();
//! assert_eq!(c.points(), vec![4, 6]);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::Literal;
use crate::utils::{pairing_many, MyHash};

/// A ternary vector.
#[derive(Debug, Clone)]
pub struct Cube {
    literals: Box<[Literal]>,
}

impl Cube {
    pub fn new(literals: impl Into<Box<[Literal]>>) -> Self {
        Self {
            literals: literals.into(),
        }
    }

    /// Builds the point with the given decimal index.
    pub fn from_decimal(index: usize, variables: usize) -> Self {
        let literals = (0..variables)
            .map(|i| Literal::from((index >> (variables - 1 - i)) & 1 == 1))
            .collect::<Vec<_>>();
        Self::new(literals)
    }

    /// Builds the point described by a boolean input.
    pub fn from_bits(bits: &[bool]) -> Self {
        Self::new(bits.iter().map(|&b| Literal::from(b)).collect::<Vec<_>>())
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Number of `One` literals.
    pub fn norm(&self) -> usize {
        self.literals.iter().filter(|&&l| l == Literal::One).count()
    }

    /// Number of free (absent or merged) literals.
    pub fn free_count(&self) -> usize {
        self.literals.iter().filter(|l| l.is_free()).count()
    }

    /// Returns `true` if no literal is free.
    pub fn is_minterm(&self) -> bool {
        self.free_count() == 0
    }

    /// Decimal index of a fully specified cube.
    pub fn to_decimal(&self) -> Result<usize> {
        self.literals.iter().try_fold(0usize, |acc, l| match l.value() {
            Some(bit) => Ok((acc << 1) | bit as usize),
            None => Err(Error::NotAMinterm { cube: self.clone() }),
        })
    }

    /// Decimal indices of every point covered by the cube, in ascending order.
    ///
    /// The result has `2^free_count()` elements.
    pub fn points(&self) -> Vec<usize> {
        let n = self.len();
        let mut base = 0usize;
        // Weights of free positions, least significant first.
        let mut free = Vec::new();
        for (i, l) in self.literals.iter().enumerate().rev() {
            let weight = 1usize << (n - 1 - i);
            match l.value() {
                Some(true) => base |= weight,
                Some(false) => {}
                None => free.push(weight),
            }
        }

        // Depositing the bits of an increasing counter into ascending weights
        // preserves the order.
        (0..1usize << free.len())
            .map(|mask| {
                free.iter()
                    .enumerate()
                    .filter(|&(j, _)| (mask >> j) & 1 == 1)
                    .fold(base, |acc, (_, &w)| acc | w)
            })
            .collect()
    }

    /// Evaluates the product at a boolean input.
    pub fn contains(&self, input: &[bool]) -> bool {
        input.len() == self.len() && self.literals.iter().zip(input).all(|(l, &b)| l.admits(b))
    }

    /// Evaluates the product at the point with the given decimal index.
    pub fn contains_index(&self, index: usize) -> bool {
        let n = self.len();
        self.literals
            .iter()
            .enumerate()
            .all(|(i, l)| l.admits((index >> (n - 1 - i)) & 1 == 1))
    }

    /// Merges two cubes that differ in exactly one fixed position.
    ///
    /// Returns `None` when the cubes differ in zero or several positions, or
    /// when a differing position is free in one of them.
    pub fn try_merge(&self, other: &Cube) -> Option<Cube> {
        if self.len() != other.len() {
            return None;
        }

        let mut diff = None;
        for (i, (a, b)) in self.literals.iter().zip(other.literals.iter()).enumerate() {
            if a.key() == b.key() {
                continue;
            }
            match (a.value(), b.value()) {
                (Some(_), Some(_)) if diff.is_none() => diff = Some(i),
                _ => return None,
            }
        }

        let i = diff?;
        let mut literals = self.literals.clone();
        literals[i] = Literal::Merged;
        Some(Cube { literals })
    }

    /// Returns `true` if every point of `self` is also a point of `other`.
    pub fn is_subcube_of(&self, other: &Cube) -> bool {
        self.len() == other.len()
            && self
                .literals
                .iter()
                .zip(other.literals.iter())
                .all(|(a, b)| b.is_free() || a.key() == b.key())
    }
}

impl PartialEq for Cube {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .literals
                .iter()
                .zip(other.literals.iter())
                .all(|(a, b)| a.key() == b.key())
    }
}

impl Eq for Cube {}

impl Hash for Cube {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        state.write_u64(MyHash::hash(self));
    }
}

impl MyHash for Cube {
    fn hash(&self) -> u64 {
        // 32 two-bit literal codes per word.
        let words = self.literals.chunks(32).map(|chunk| {
            chunk
                .iter()
                .fold(1u64, |acc, l| (acc << 2) | l.key() as u64)
        });
        pairing_many(words)
    }
}

impl Index<usize> for Cube {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for l in self.literals.iter() {
            write!(f, "{}", l)?;
        }
        Ok(())
    }
}

impl FromStr for Cube {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let literals = s
            .chars()
            .map(|c| match c {
                '0' => Ok(Literal::Zero),
                '1' => Ok(Literal::One),
                '-' => Ok(Literal::Absent),
                _ => Err(Error::InvalidLiteral(c)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Cube::new(literals))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn cube(s: &str) -> Cube {
        s.parse().unwrap()
    }

    #[test]
    fn test_from_decimal_msb_first() {
        assert_eq!(Cube::from_decimal(0, 3).to_string(), "000");
        assert_eq!(Cube::from_decimal(1, 3).to_string(), "001");
        assert_eq!(Cube::from_decimal(4, 3).to_string(), "100");
        assert_eq!(Cube::from_decimal(5, 3).to_string(), "101");
    }

    #[test]
    fn test_round_trip() {
        for n in 1..=8 {
            for index in 0..1usize << n {
                let c = Cube::from_decimal(index, n);
                assert_eq!(c.len(), n);
                assert_eq!(c.to_decimal().unwrap(), index);
            }
        }
    }

    #[test]
    fn test_to_decimal_rejects_free() {
        assert!(matches!(
            cube("1-1").to_decimal(),
            Err(Error::NotAMinterm { .. })
        ));
        let merged = cube("101").try_merge(&cube("100")).unwrap();
        assert!(merged.to_decimal().is_err());
    }

    #[test]
    fn test_points() {
        assert_eq!(cube("101").points(), vec![5]);
        assert_eq!(cube("-01").points(), vec![1, 5]);
        assert_eq!(cube("1--").points(), vec![4, 5, 6, 7]);
        assert_eq!(cube("-0-").points(), vec![0, 1, 4, 5]);
        assert_eq!(cube("---").points(), (0..8).collect::<Vec<_>>());
        assert_eq!(Cube::new(Vec::new()).points(), vec![0]);
    }

    #[test]
    fn test_points_agree_with_contains_index() {
        let c = cube("-1-0");
        for index in 0..16 {
            assert_eq!(c.points().contains(&index), c.contains_index(index));
        }
    }

    #[test]
    fn test_norm() {
        assert_eq!(cube("000").norm(), 0);
        assert_eq!(cube("1-1").norm(), 2);
        assert_eq!(cube("111").norm(), 3);
        assert_eq!(cube("1-1").free_count(), 1);
    }

    #[test]
    fn test_try_merge() {
        let m = cube("010").try_merge(&cube("011")).unwrap();
        assert_eq!(m, cube("01-"));
        assert_eq!(m[2], Literal::Merged);

        // Both free at the same position is agreement.
        let m = cube("-10").try_merge(&cube("-11")).unwrap();
        assert_eq!(m, cube("-1-"));
    }

    #[test]
    fn test_try_merge_rejects() {
        // Identical.
        assert!(cube("010").try_merge(&cube("010")).is_none());
        // Two differences.
        assert!(cube("010").try_merge(&cube("001")).is_none());
        // Free vs fixed.
        assert!(cube("01-").try_merge(&cube("011")).is_none());
        // Length mismatch.
        assert!(cube("01").try_merge(&cube("011")).is_none());
    }

    #[test]
    fn test_equality_collapses_free_literals() {
        let merged = cube("10").try_merge(&cube("11")).unwrap();
        let absent = cube("1-");
        assert_eq!(merged, absent);
        assert_eq!(MyHash::hash(&merged), MyHash::hash(&absent));
        assert_ne!(cube("10"), cube("100"));
    }

    #[test]
    fn test_contains() {
        let c = cube("1-0");
        assert!(c.contains(&[true, false, false]));
        assert!(c.contains(&[true, true, false]));
        assert!(!c.contains(&[false, true, false]));
        assert!(!c.contains(&[true, true]));
    }

    #[test]
    fn test_subcube() {
        assert!(cube("101").is_subcube_of(&cube("1-1")));
        assert!(cube("1-1").is_subcube_of(&cube("---")));
        assert!(!cube("1-1").is_subcube_of(&cube("101")));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!("01x".parse::<Cube>(), Err(Error::InvalidLiteral('x'))));
    }
}
