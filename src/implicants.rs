//! Prime implicant generation (Quine–McCluskey merge closure).
//!
//! # Algorithm
//!
//! Starting from the points a function still considers (positive or
//! don't-care), each round:
//!
//! 1. Sorts the current cubes by [norm][Cube::norm] and splits them into norm
//!    classes.
//! 2. Tries to merge every cube of class `k` with every cube of class `k + 1`.
//!    Both operands of a successful merge are marked as taken; the merged cube
//!    joins the next round.
//! 3. Moves every cube that was not taken to the result: it cannot grow any
//!    further, so it is prime.
//!
//! The loop ends after a round without merges. Cubes are deduplicated both
//! between rounds and in the result.
//!
//! # Performance
//!
//! Each round is quadratic in the size of adjacent norm classes, and the
//! number of implicants can grow exponentially with the number of variables.
//! Expect dense functions beyond 20–24 variables to be out of reach.

use std::fmt;

use log::debug;

use crate::cube::Cube;
use crate::function::FunctionPlus;
use crate::table::{IntoIter, Iter, Table};
use crate::utils::MyHash;

/// An owning, deduplicating collection of cubes of equal length.
///
/// Insertion order is preserved, which keeps every algorithm that iterates
/// over implicants deterministic.
#[derive(Debug, Clone, Default)]
pub struct Implicants {
    variables: usize,
    cubes: Table<Cube>,
}

impl Implicants {
    pub fn new(variables: usize) -> Self {
        Self {
            variables,
            cubes: Table::new(),
        }
    }

    pub fn variables(&self) -> usize {
        self.variables
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Takes ownership of a cube. Returns `false` if an equal cube is present.
    ///
    /// # Panics
    ///
    /// Panics if the cube does not have [`variables`][Self::variables] literals.
    pub fn insert(&mut self, cube: Cube) -> bool {
        assert_eq!(
            cube.len(),
            self.variables,
            "Cube {} does not have {} variables",
            cube,
            self.variables
        );
        let before = self.cubes.len();
        self.cubes.put(cube);
        self.cubes.len() > before
    }

    pub fn contains(&self, cube: &Cube) -> bool {
        self.cubes.find(MyHash::hash(cube), |c| c == cube).is_some()
    }

    /// The cube at the given position in insertion order.
    pub fn get(&self, index: usize) -> &Cube {
        &self.cubes[index]
    }

    pub fn iter(&self) -> Iter<'_, Cube> {
        self.cubes.iter()
    }

    /// Keeps only the cubes satisfying the predicate.
    pub fn retain(&mut self, keep: impl FnMut(&Cube) -> bool) {
        self.cubes.retain(keep);
    }

    pub fn into_vec(self) -> Vec<Cube> {
        self.cubes.into_iter().collect()
    }
}

impl Extend<Cube> for Implicants {
    fn extend<I: IntoIterator<Item = Cube>>(&mut self, iter: I) {
        for cube in iter {
            self.insert(cube);
        }
    }
}

impl IntoIterator for Implicants {
    type Item = Cube;
    type IntoIter = IntoIter<Cube>;

    fn into_iter(self) -> Self::IntoIter {
        self.cubes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Implicants {
    type Item = &'a Cube;
    type IntoIter = Iter<'a, Cube>;

    fn into_iter(self) -> Self::IntoIter {
        self.cubes.iter()
    }
}

impl fmt::Display for Implicants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cube in &self.cubes {
            writeln!(f, "{}", cube)?;
        }
        Ok(())
    }
}

/// Computes the prime implicants of the points `f` still considers.
///
/// With `prune_against`, first-round pairs whose operands are both don't-care
/// points of that function are marked as taken without producing a merge.
/// Pass the function synthesis started from, not a residual of it: points a
/// residual has already paid for are don't-care there too. Pruning shrinks
/// the search but may lose large implicants that contain a single constrained
/// point.
pub fn prime_implicants(f: &FunctionPlus, prune_against: Option<&FunctionPlus>) -> Implicants {
    let variables = f.variables();
    let mut primes = Implicants::new(variables);
    let mut current: Vec<Cube> = f.non_zero_cubes().collect();
    let mut round = 0;

    while !current.is_empty() {
        current.sort_by_key(Cube::norm);
        // Norms are computed after sorting, never carried over.
        let norms: Vec<usize> = current.iter().map(Cube::norm).collect();

        // Boundaries of the norm classes: class `c` is `starts[c]..starts[c + 1]`.
        let mut starts = vec![0];
        for i in 1..current.len() {
            if norms[i] != norms[i - 1] {
                starts.push(i);
            }
        }
        starts.push(current.len());

        let mut taken = vec![false; current.len()];
        let mut next = Implicants::new(variables);
        let mut merges = 0usize;

        for c in 0..starts.len().saturating_sub(2) {
            let (lo, mid, hi) = (starts[c], starts[c + 1], starts[c + 2]);
            if norms[mid] != norms[lo] + 1 {
                continue;
            }
            for i in lo..mid {
                for j in mid..hi {
                    let Some(merged) = current[i].try_merge(&current[j]) else {
                        continue;
                    };
                    taken[i] = true;
                    taken[j] = true;
                    merges += 1;

                    if let Some(original) = prune_against {
                        if round == 0
                            && original.is_dont_care_over(&current[i])
                            && original.is_dont_care_over(&current[j])
                        {
                            continue;
                        }
                    }
                    next.insert(merged);
                }
            }
        }

        let mut fresh_primes = 0usize;
        for (cube, taken) in current.into_iter().zip(taken) {
            if !taken && primes.insert(cube) {
                fresh_primes += 1;
            }
        }

        debug!(
            "prime_implicants: round {}: {} merges, {} new cubes, {} new primes",
            round,
            merges,
            next.len(),
            fresh_primes
        );

        if merges == 0 {
            break;
        }
        current = next.into_vec();
        round += 1;
    }

    primes
}
