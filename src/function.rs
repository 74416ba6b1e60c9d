//! Weighted boolean functions (`fplus`): `{0,1}^n -> N ∪ {*}`.
//!
//! A [`FunctionPlus`] stores its outputs densely, indexed by the decimal
//! encoding of the input (first variable most significant), and keeps a
//! sorted sparse index of the points that still matter for covering: every
//! point whose value is positive or don't-care. Points whose value is exactly
//! zero are never in the index.
//!
//! Every mutating method keeps the index consistent, so there is no separate
//! resynchronisation step for callers to forget.

use std::fmt;

use log::trace;
use rand::Rng;

use crate::cube::Cube;
use crate::error::{Error, Result};
use crate::types::Weight;

/// Largest supported number of variables (the dense array has `2^n` entries).
pub const MAX_VARIABLES: usize = 30;

/// How a subtraction treats values that run out.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Rule {
    /// Sop-plus semantics: a value reaching zero or below becomes don't-care.
    UpperBound,
    /// Disjoint semantics: only a value going strictly below zero becomes
    /// don't-care, so an exact zero stays a real zero.
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionPlus {
    variables: usize,
    values: Vec<Weight>,
    /// Ascending indices of points that are positive or don't-care.
    non_zeros: Vec<usize>,
}

impl FunctionPlus {
    fn alloc(variables: usize) -> Result<Vec<Weight>> {
        if variables > MAX_VARIABLES {
            return Err(Error::TooManyVariables {
                variables,
                max: MAX_VARIABLES,
            });
        }
        let points = 1usize << variables;
        let mut values = Vec::new();
        values
            .try_reserve_exact(points)
            .map_err(|source| Error::Allocation { points, source })?;
        Ok(values)
    }

    fn from_dense(variables: usize, values: Vec<Weight>) -> Self {
        let non_zeros = values
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_zero())
            .map(|(i, _)| i)
            .collect();
        Self {
            variables,
            values,
            non_zeros,
        }
    }

    /// Creates a function from all `2^variables` outputs.
    ///
    /// `values[i]` is the output at the point with decimal index `i`.
    pub fn new(variables: usize, values: impl IntoIterator<Item = Weight>) -> Result<Self> {
        let mut dense = Self::alloc(variables)?;
        let expected = 1usize << variables;
        dense.extend(values);
        if dense.len() != expected {
            return Err(Error::ValueCountMismatch {
                variables,
                expected,
                found: dense.len(),
            });
        }
        Ok(Self::from_dense(variables, dense))
    }

    /// Creates a function without don't-care points.
    ///
    /// ```
    /// use sopp_rs::function::FunctionPlus;
    /// use sopp_rs::types::Weight;
    ///
    /// let f = FunctionPlus::from_values(2, &[0, 0, 3, 5]).unwrap();
    /// assert_eq!(f.value_of(&[true, false]).unwrap(), Weight::Value(3));
    /// assert_eq!(f.non_zeros(), &[2, 3]);
    /// ```
    pub fn from_values(variables: usize, values: &[u32]) -> Result<Self> {
        Self::new(variables, values.iter().map(|&v| Weight::Value(v)))
    }

    /// Creates a function that is don't-care everywhere.
    ///
    /// Use [`set_value`][Self::set_value] to constrain points one by one.
    pub fn empty(variables: usize) -> Result<Self> {
        let mut dense = Self::alloc(variables)?;
        dense.resize(1usize << variables, Weight::DontCare);
        Ok(Self::from_dense(variables, dense))
    }

    /// Creates a random function.
    ///
    /// Each point is independently non-zero with probability
    /// `non_zero_chance / 100`, in which case its value is uniform in
    /// `[1, max_value]`. Every other point is exactly zero.
    pub fn random<R>(variables: usize, max_value: u32, non_zero_chance: u32, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        Self::random_with_dont_cares(variables, max_value, non_zero_chance, 0, rng)
    }

    /// Creates a random function with don't-care points.
    ///
    /// Like [`random`][Self::random], except that each point which was not
    /// chosen to be non-zero becomes don't-care with probability
    /// `dont_care_chance / 100`.
    pub fn random_with_dont_cares<R>(
        variables: usize,
        max_value: u32,
        non_zero_chance: u32,
        dont_care_chance: u32,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        if max_value == 0 {
            return Err(Error::InvalidParameter("max_value must be at least 1"));
        }
        if non_zero_chance > 100 || dont_care_chance > 100 {
            return Err(Error::InvalidParameter("chances are percentages in 0..=100"));
        }

        let mut dense = Self::alloc(variables)?;
        for _ in 0..1usize << variables {
            let weight = if rng.gen_bool(non_zero_chance as f64 / 100.0) {
                Weight::Value(rng.gen_range(1..=max_value))
            } else if rng.gen_bool(dont_care_chance as f64 / 100.0) {
                Weight::DontCare
            } else {
                Weight::ZERO
            };
            dense.push(weight);
        }
        Ok(Self::from_dense(variables, dense))
    }

    /// Number of input variables.
    pub fn variables(&self) -> usize {
        self.variables
    }

    /// Number of points (`2^variables`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dense outputs, indexed by decimal point index.
    pub fn values(&self) -> &[Weight] {
        &self.values
    }

    /// Output at the point with the given decimal index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn value_at(&self, index: usize) -> Weight {
        assert!(
            index < self.values.len(),
            "Index {} out of range for {} variables",
            index,
            self.variables
        );
        self.values[index]
    }

    /// Output at a boolean input.
    pub fn value_of(&self, input: &[bool]) -> Result<Weight> {
        if input.len() != self.variables {
            return Err(Error::ArityMismatch {
                expected: self.variables,
                found: input.len(),
            });
        }
        let index = Cube::from_bits(input).to_decimal()?;
        Ok(self.values[index])
    }

    /// Sets the output at a point.
    pub fn set_value(&mut self, index: usize, weight: Weight) -> Result<()> {
        if index >= self.values.len() {
            return Err(Error::IndexOutOfRange {
                index,
                variables: self.variables,
            });
        }
        self.values[index] = weight;
        match (self.non_zeros.binary_search(&index), weight.is_zero()) {
            (Ok(pos), true) => {
                self.non_zeros.remove(pos);
            }
            (Err(pos), false) => self.non_zeros.insert(pos, index),
            _ => {}
        }
        Ok(())
    }

    /// Ascending indices of all points that are positive or don't-care.
    pub fn non_zeros(&self) -> &[usize] {
        &self.non_zeros
    }

    /// The indexed points as fully specified cubes.
    pub fn non_zero_cubes(&self) -> impl Iterator<Item = Cube> + '_ {
        self.non_zeros
            .iter()
            .map(move |&i| Cube::from_decimal(i, self.variables))
    }

    /// Ascending indices of the points with a strictly positive value.
    pub fn positive_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.non_zeros
            .iter()
            .copied()
            .filter(move |&i| self.values[i].positive().is_some())
    }

    /// Returns `true` if some point still has a strictly positive value.
    pub fn has_positive(&self) -> bool {
        self.positive_points().next().is_some()
    }

    /// Returns `true` if every point of the cube is don't-care.
    pub fn is_dont_care_over(&self, cube: &Cube) -> bool {
        cube.points().into_iter().all(|p| self.values[p].is_dont_care())
    }

    /// Minimum value over the points of the cube that are not don't-care.
    ///
    /// Zeros take part in the minimum. `None` if the cube covers only
    /// don't-care points.
    pub fn min_over(&self, cube: &Cube) -> Option<u32> {
        cube.points()
            .into_iter()
            .filter_map(|p| self.values[p].value())
            .min()
    }

    /// Maximum value over the points of the cube that are not don't-care.
    pub fn max_over(&self, cube: &Cube) -> Option<u32> {
        cube.points()
            .into_iter()
            .filter_map(|p| self.values[p].value())
            .max()
    }

    fn subtract_at(&mut self, index: usize, amount: u32, rule: Rule) {
        let Weight::Value(value) = self.values[index] else {
            return;
        };
        let retired = match rule {
            Rule::UpperBound => value <= amount,
            Rule::Exact => value < amount,
        };
        self.values[index] = if retired {
            Weight::DontCare
        } else {
            Weight::Value(value - amount)
        };
    }

    /// Drops points whose value became exactly zero from the sparse index.
    ///
    /// Don't-care points stay indexed: they still help to build larger
    /// implicants.
    fn refresh_non_zeros(&mut self) {
        let values = &self.values;
        self.non_zeros.retain(|&i| !values[i].is_zero());
    }

    /// Subtracts `amount` from a single point.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn subtract(&mut self, index: usize, amount: u32, rule: Rule) {
        assert!(
            index < self.values.len(),
            "Index {} out of range for {} variables",
            index,
            self.variables
        );
        self.subtract_at(index, amount, rule);
        if self.values[index].is_zero() {
            if let Ok(pos) = self.non_zeros.binary_search(&index) {
                self.non_zeros.remove(pos);
            }
        }
    }

    /// Pays a product: subtracts `coefficient` from every point of the cube.
    pub fn apply_coefficient(&mut self, cube: &Cube, coefficient: u32, rule: Rule) {
        trace!("apply_coefficient({}, {}, {:?})", cube, coefficient, rule);
        for p in cube.points() {
            self.subtract_at(p, coefficient, rule);
        }
        self.refresh_non_zeros();
    }
}

impl fmt::Display for FunctionPlus {
    /// Karnaugh-style grid: rows are the first half of the variables and
    /// columns the second half, both in Gray code order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_vars = self.variables / 2;
        let col_vars = self.variables - row_vars;
        let gray = |i: usize| i ^ (i >> 1);

        for r in 0..1usize << row_vars {
            let row = gray(r);
            let label = Cube::from_decimal(row, row_vars);
            write!(f, "{:>width$} |", label.to_string(), width = row_vars.max(1))?;
            for c in 0..1usize << col_vars {
                let index = (row << col_vars) | gray(c);
                write!(f, " {:>3}", self.values[index].to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
