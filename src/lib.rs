//! # sopp-rs: Weighted sum-of-products synthesis in Rust
//!
//! **`sopp-rs`** synthesizes compact weighted sums of products for boolean functions with natural-number outputs.
//!
//! ## What is a sop-plus form?
//!
//! A function `f : {0,1}^n -> N ∪ {*}` assigns each input a natural number or a don't-care value `*`.
//! A **sop-plus** form of `f` is a sum of products, each with a positive integer coefficient, whose value is zero where `f` is zero and at least `f(x)` everywhere else.
//! A **disjoint sop-plus** (dsopp) form is one whose value equals `f(x)` at every input that is not don't-care.
//! The cost of a form is the sum of its coefficients; synthesis tries to keep it small.
//!
//! ## Key Features
//!
//! - **Quine–McCluskey core**: Prime implicants are computed by an iterative merge closure over norm classes.
//! - **Essential-first synthesis**: Essential implicants are paid first, the rest of the residual is covered greedily.
//! - **Exact forms**: Disjoint forms are built in layers with a lazily re-evaluated priority queue.
//! - **Configurable**: [`SynthesisConfig`][crate::synthesis::SynthesisConfig] selects the candidate strategy and don't-care pruning.
//!
//! ## Basic Usage
//!
//! ```rust
//! use sopp_rs::function::FunctionPlus;
//! use sopp_rs::sopp::Sopp;
//!
//! // f(x1, x2): 0 on 00, 2 elsewhere
//! let f = FunctionPlus::from_values(2, &[0, 2, 2, 2]).unwrap();
//!
//! let s = Sopp::synthesize(&f).unwrap();
//! assert!(s.is_valid_upper_bound_form_of(&f));
//! assert_eq!(s.weight_sum(), 4);
//!
//! let d = Sopp::synthesize_disjoint(&f).unwrap();
//! assert!(d.is_valid_exact_form_of(&f));
//! ```
//!
//! ## Core Components
//!
//! - **[`cube`]**: Ternary vectors, the products and points of the hypercube.
//! - **[`function`]**: The weighted function and its residual updates.
//! - **[`implicants`]** and **[`essentials`]**: Prime and essential implicants.
//! - **[`sopp`]**: The product store and validity checks.
//! - **[`synthesis`]**: The sop-plus and dsopp drivers.

pub mod cube;
pub mod error;
pub mod essentials;
pub mod function;
pub mod implicants;
pub mod sopp;
pub mod synthesis;
pub mod table;
pub mod types;
pub mod utils;

pub use cube::Cube;
pub use error::{Error, Result};
pub use function::{FunctionPlus, Rule};
pub use sopp::{Product, Sopp};
pub use synthesis::{Strategy, SynthesisConfig, Synthesizer};
pub use types::{Literal, Weight};
