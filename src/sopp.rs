//! Weighted product terms and the deduplicating product store.
//!
//! A [`Sopp`] is a sum of weighted products: its value at an input is the sum
//! of the coefficients of the products that contain the input. The same type
//! holds both sop-plus forms (upper bounds) and disjoint sop-plus forms (exact
//! matches); the difference is only in how it was synthesized and which
//! validity check it satisfies.
//!
//! ```
//! use sopp_rs::sopp::{Product, Sopp};
//!
//! let mut s = Sopp::new(2);
//! s.add(Product::new("1-".parse().unwrap(), 2));
//! s.add(Product::new("1-".parse().unwrap(), 3));
//! s.add(Product::new("-1".parse().unwrap(), 1));
//! assert_eq!(s.len(), 2);
//! assert_eq!(s.weight_sum(), 6);
//! assert_eq!(s.value_of(&[true, true]), 6);
//! ```

use std::fmt;

use crate::cube::Cube;
use crate::function::FunctionPlus;
use crate::table::{Iter, Table};
use crate::types::Weight;
use crate::utils::MyHash;

/// A product term with a positive coefficient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    cube: Cube,
    coefficient: u32,
}

impl Product {
    /// # Panics
    ///
    /// Panics if `coefficient` is zero.
    pub fn new(cube: Cube, coefficient: u32) -> Self {
        assert!(coefficient > 0, "Product {} needs a positive coefficient", cube);
        Self { cube, coefficient }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn coefficient(&self) -> u32 {
        self.coefficient
    }

    /// Contribution of this product at a boolean input.
    pub fn value_of(&self, input: &[bool]) -> u64 {
        if self.cube.contains(input) {
            self.coefficient as u64
        } else {
            0
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.coefficient, self.cube)
    }
}

/// A sum of weighted products without duplicate products.
#[derive(Debug, Clone)]
pub struct Sopp {
    variables: usize,
    products: Table<Product>,
}

impl Sopp {
    pub fn new(variables: usize) -> Self {
        Self {
            variables,
            products: Table::new(),
        }
    }

    /// Create a store sized for about `expected` products.
    pub fn with_capacity(variables: usize, expected: usize) -> Self {
        Self {
            variables,
            products: Table::with_capacity(expected),
        }
    }

    pub fn variables(&self) -> usize {
        self.variables
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Adds a product.
    ///
    /// If an equal product is already stored, the coefficient is added to it
    /// and `false` is returned; otherwise the product is inserted and `true`
    /// is returned.
    ///
    /// # Panics
    ///
    /// Panics if the product's cube does not have [`variables`][Self::variables] literals.
    pub fn add(&mut self, product: Product) -> bool {
        assert_eq!(
            product.cube.len(),
            self.variables,
            "Product {} does not have {} variables",
            product,
            self.variables
        );

        let hash = product.cube.hash();
        match self.products.find(hash, |p| p.cube == product.cube) {
            Some(index) => {
                self.products[index].coefficient += product.coefficient;
                false
            }
            None => {
                self.products.insert(hash, product);
                true
            }
        }
    }

    /// Coefficient of the given product, if stored.
    pub fn coefficient_of(&self, cube: &Cube) -> Option<u32> {
        self.products
            .find(cube.hash(), |p| &p.cube == cube)
            .map(|index| self.products[index].coefficient)
    }

    /// Iterate over products in insertion order.
    pub fn iter(&self) -> Iter<'_, Product> {
        self.products.iter()
    }

    /// Value of the sum at a boolean input.
    pub fn value_of(&self, input: &[bool]) -> u64 {
        self.iter().map(|p| p.value_of(input)).sum()
    }

    /// Value of the sum at the point with the given decimal index.
    pub fn value_at(&self, index: usize) -> u64 {
        self.iter()
            .filter(|p| p.cube.contains_index(index))
            .map(|p| p.coefficient as u64)
            .sum()
    }

    /// Sum of all coefficients: the cost being minimized.
    pub fn weight_sum(&self) -> u64 {
        self.iter().map(|p| p.coefficient as u64).sum()
    }

    /// Values of the sum at every point.
    fn dense_values(&self) -> Vec<u64> {
        let mut dense = vec![0u64; 1usize << self.variables];
        for p in self.iter() {
            for i in p.cube.points() {
                dense[i] += p.coefficient as u64;
            }
        }
        dense
    }

    /// Checks that this is a sop-plus form of `f`.
    ///
    /// For every input: `f(x) == 0` implies `s(x) == 0`, and a positive
    /// `f(x)` implies `s(x) >= f(x)`. Don't-care inputs are unconstrained.
    /// The check visits all `2^n` inputs.
    pub fn is_valid_upper_bound_form_of(&self, f: &FunctionPlus) -> bool {
        if f.variables() != self.variables {
            return false;
        }
        self.dense_values()
            .into_iter()
            .zip(f.values())
            .all(|(s, &w)| match w {
                Weight::Value(0) => s == 0,
                Weight::Value(v) => s >= v as u64,
                Weight::DontCare => true,
            })
    }

    /// Checks that this is a disjoint sop-plus form of `f`.
    ///
    /// For every input that is not don't-care, `s(x) == f(x)`. The check
    /// visits all `2^n` inputs.
    pub fn is_valid_exact_form_of(&self, f: &FunctionPlus) -> bool {
        if f.variables() != self.variables {
            return false;
        }
        self.dense_values()
            .into_iter()
            .zip(f.values())
            .all(|(s, &w)| match w {
                Weight::Value(v) => s == v as u64,
                Weight::DontCare => true,
            })
    }
}

impl<'a> IntoIterator for &'a Sopp {
    type Item = &'a Product;
    type IntoIter = Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Sopp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        for (i, p) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}
