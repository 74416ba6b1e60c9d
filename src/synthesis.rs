//! Synthesis of sop-plus and disjoint sop-plus forms.
//!
//! [`Synthesizer::sopp`] builds a weighted sum of products that is zero on
//! the zero points of a function and at least its value everywhere else.
//! [`Synthesizer::dsopp`] builds one that matches the function exactly.
//!
//! ```
//! use sopp_rs::function::FunctionPlus;
//! use sopp_rs::sopp::Sopp;
//!
//! let f = FunctionPlus::from_values(2, &[0, 0, 3, 5]).unwrap();
//!
//! let upper = Sopp::synthesize(&f).unwrap();
//! assert!(upper.is_valid_upper_bound_form_of(&f));
//! assert_eq!(upper.to_string(), "5*1-");
//!
//! let exact = Sopp::synthesize_disjoint(&f).unwrap();
//! assert!(exact.is_valid_exact_form_of(&f));
//! assert_eq!(exact.weight_sum(), 5);
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::cube::Cube;
use crate::error::{Error, Result};
use crate::essentials::{essential_implicants, Essentials};
use crate::function::{FunctionPlus, Rule};
use crate::implicants::{prime_implicants, Implicants};
use crate::sopp::{Product, Sopp};

/// How the sop-plus driver maintains its candidate implicants.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Strategy {
    /// Recompute the prime implicants of the residual after every round of
    /// essentials.
    #[default]
    Canonical,
    /// Compute the prime implicants once and only filter them afterwards.
    /// Faster, but the covers may be heavier.
    Experimental,
}

/// Configuration options for synthesis.
///
/// Use `SynthesisConfig::default()` for the canonical algorithm.
///
/// ```
/// use sopp_rs::synthesis::{Strategy, SynthesisConfig};
///
/// let config = SynthesisConfig::default()
///     .with_strategy(Strategy::Experimental)
///     .with_dont_care_pruning(true);
/// assert_eq!(config.strategy, Strategy::Experimental);
/// ```
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SynthesisConfig {
    /// Candidate maintenance strategy (default: `Canonical`)
    pub strategy: Strategy,
    /// Skip first-round merges of two don't-care points (default: false)
    pub dont_care_pruning: bool,
}

impl SynthesisConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_dont_care_pruning(mut self, enabled: bool) -> Self {
        self.dont_care_pruning = enabled;
        self
    }
}

#[derive(Debug)]
enum State {
    ExtractEssentials,
    AssignEssentials(Essentials),
    UpdateResidual,
    GreedyResidualCover,
    Done,
}

/// Positive residual values over the points of a cube.
fn positive_values<'a>(f: &'a FunctionPlus, cube: &Cube) -> impl Iterator<Item = u32> + 'a {
    cube.points().into_iter().filter_map(move |p| f.value_at(p).positive())
}

/// Returns `true` if every positive point of `small` is also a point of `big`.
fn covers_positive_points(f: &FunctionPlus, small: &Cube, big: &Cube) -> bool {
    small
        .points()
        .into_iter()
        .filter(|&p| f.value_at(p).positive().is_some())
        .all(|p| big.contains_index(p))
}

/// Entry of the disjoint driver's priority queue.
///
/// Ordered by the minimum residual value over the cube (larger first), then
/// by fewer free positions, then by insertion order.
#[derive(Debug, Clone)]
struct Pending {
    min: u32,
    free: usize,
    order: usize,
    cube: Cube,
}

impl Pending {
    fn new(min: u32, cube: Cube, order: usize) -> Self {
        Self {
            min,
            free: cube.free_count(),
            order,
            cube,
        }
    }

    fn key(&self) -> (u32, Reverse<usize>, Reverse<usize>) {
        (self.min, Reverse(self.free), Reverse(self.order))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Runs the synthesis algorithms with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Prime implicants of `residual`, pruned against the don't-cares of `original`.
    fn primes(&self, residual: &FunctionPlus, original: &FunctionPlus) -> Implicants {
        prime_implicants(residual, self.config.dont_care_pruning.then_some(original))
    }

    /// Synthesizes a sop-plus form of `f`.
    ///
    /// The result is zero wherever `f` is zero and at least `f(x)` wherever
    /// `f(x)` is positive. A function without positive points gives an empty
    /// form.
    pub fn sopp(&self, f: &FunctionPlus) -> Result<Sopp> {
        let mut result = Sopp::new(f.variables());
        if !f.has_positive() {
            debug!("sopp: no positive points");
            return Ok(result);
        }

        let mut residual = f.clone();
        let mut candidates = self.primes(&residual, f);
        debug!("sopp: {} prime implicants", candidates.len());

        let mut state = State::ExtractEssentials;
        let mut rounds = 0usize;
        loop {
            match &state {
                State::AssignEssentials(essentials) => {
                    debug!("sopp: round {}, assigning {} essentials", rounds, essentials.len())
                }
                other => debug!("sopp: round {}, state {:?}, {} candidates", rounds, other, candidates.len()),
            }
            state = match state {
                State::ExtractEssentials => match essential_implicants(&residual, &candidates)? {
                    None => State::GreedyResidualCover,
                    Some(essentials) => State::AssignEssentials(essentials),
                },
                State::AssignEssentials(essentials) => {
                    for cube in essentials.into_implicants() {
                        let Some(coefficient) = positive_values(&residual, &cube).max() else {
                            // Paid by an earlier essential of the same round.
                            continue;
                        };
                        trace!("sopp: essential {} with coefficient {}", cube, coefficient);
                        residual.apply_coefficient(&cube, coefficient, Rule::UpperBound);
                        result.add(Product::new(cube, coefficient));
                    }
                    State::UpdateResidual
                }
                State::UpdateResidual => {
                    rounds += 1;
                    if !residual.has_positive() {
                        State::Done
                    } else {
                        match self.config.strategy {
                            Strategy::Canonical => self.refresh_candidates(f, &residual, &mut candidates),
                            Strategy::Experimental => {
                                candidates.retain(|c| positive_values(&residual, c).next().is_some());
                                State::ExtractEssentials
                            }
                        }
                    }
                }
                State::GreedyResidualCover => {
                    Self::greedy_cover(&mut residual, &mut candidates, &mut result)?;
                    State::Done
                }
                State::Done => break,
            };
        }

        debug!("sopp: {} products, weight sum {}", result.len(), result.weight_sum());
        Ok(result)
    }

    /// Merges the prime implicants of the residual into the candidates.
    ///
    /// Candidates whose positive points are all covered by a new implicant,
    /// or that cover no positive point, are dropped.
    fn refresh_candidates(&self, original: &FunctionPlus, residual: &FunctionPlus, candidates: &mut Implicants) -> State {
        let fresh: Vec<Cube> = self
            .primes(residual, original)
            .into_iter()
            .filter(|c| !candidates.contains(c))
            .collect();

        let before = candidates.len();
        candidates.retain(|c| {
            positive_values(residual, c).next().is_some()
                && !fresh.iter().any(|n| covers_positive_points(residual, c, n))
        });
        let removed = before - candidates.len();
        let added = fresh.len();
        candidates.extend(fresh);

        debug!("sopp: {} candidates added, {} removed", added, removed);
        if added == 0 && removed == 0 {
            State::GreedyResidualCover
        } else {
            State::ExtractEssentials
        }
    }

    /// Repeatedly pays the candidate with the smallest positive minimum.
    ///
    /// A chosen candidate stays in play until all of its points are paid, so
    /// it may be chosen again at a larger minimum.
    fn greedy_cover(residual: &mut FunctionPlus, candidates: &mut Implicants, result: &mut Sopp) -> Result<()> {
        loop {
            // Smallest minimum, then fewer free positions, then candidate order.
            let best = candidates
                .iter()
                .enumerate()
                .filter_map(|(i, c)| positive_values(residual, c).min().map(|m| (m, c.free_count(), i)))
                .min();
            let Some((coefficient, _, index)) = best else {
                break;
            };

            let cube = candidates.get(index).clone();
            trace!("sopp: greedy {} with coefficient {}", cube, coefficient);
            residual.apply_coefficient(&cube, coefficient, Rule::UpperBound);
            result.add(Product::new(cube, coefficient));

            candidates.retain(|c| !residual.is_dont_care_over(c));
        }

        if residual.has_positive() {
            return Err(Error::Stalled {
                remaining: residual.positive_points().count(),
            });
        }
        Ok(())
    }

    /// Synthesizes a disjoint sop-plus form of `f`.
    ///
    /// The result equals `f(x)` at every point that is not don't-care.
    pub fn dsopp(&self, f: &FunctionPlus) -> Result<Sopp> {
        let mut result = Sopp::new(f.variables());
        let mut residual = f.clone();
        let mut round = 0usize;

        while residual.has_positive() {
            let cover = self.sopp(&residual)?;
            debug!("dsopp: round {}, {} products to place", round, cover.len());

            let mut heap = BinaryHeap::with_capacity(cover.len());
            for (order, product) in cover.iter().enumerate() {
                if let Some(min) = residual.min_over(product.cube()) {
                    heap.push(Pending::new(min, product.cube().clone(), order));
                }
            }

            let mut assigned = 0usize;
            while let Some(pending) = heap.pop() {
                let current = residual.min_over(&pending.cube);
                match current {
                    None | Some(0) => {
                        trace!("dsopp: discard {}", pending.cube);
                    }
                    Some(min) if min != pending.min => {
                        heap.push(Pending::new(min, pending.cube, pending.order));
                    }
                    Some(min) => {
                        trace!("dsopp: place {} with coefficient {}", pending.cube, min);
                        residual.apply_coefficient(&pending.cube, min, Rule::Exact);
                        result.add(Product::new(pending.cube, min));
                        assigned += 1;
                    }
                }
            }

            if assigned == 0 {
                return Err(Error::Stalled {
                    remaining: residual.positive_points().count(),
                });
            }
            round += 1;
        }

        debug!("dsopp: {} products, weight sum {}", result.len(), result.weight_sum());
        Ok(result)
    }
}

impl Sopp {
    /// Synthesizes a sop-plus form with the default configuration.
    pub fn synthesize(f: &FunctionPlus) -> Result<Sopp> {
        Synthesizer::default().sopp(f)
    }

    /// Synthesizes a disjoint sop-plus form with the default configuration.
    pub fn synthesize_disjoint(f: &FunctionPlus) -> Result<Sopp> {
        Synthesizer::default().dsopp(f)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    use super::*;
    use crate::types::Weight;

    fn cube(s: &str) -> Cube {
        s.parse().unwrap()
    }

    fn experimental() -> Synthesizer {
        Synthesizer::new(SynthesisConfig::default().with_strategy(Strategy::Experimental))
    }

    #[test]
    fn test_sopp_single_prime() {
        let f = FunctionPlus::from_values(2, &[0, 0, 3, 5]).unwrap();
        let s = Sopp::synthesize(&f).unwrap();
        assert!(s.is_valid_upper_bound_form_of(&f));
        assert!(s.weight_sum() <= 8);
        assert_eq!(s.coefficient_of(&cube("1-")), Some(5));
    }

    #[test]
    fn test_sopp_or() {
        let f = FunctionPlus::from_values(2, &[0, 2, 2, 2]).unwrap();
        let s = Sopp::synthesize(&f).unwrap();
        assert!(s.is_valid_upper_bound_form_of(&f));
        assert_eq!(s.len(), 2);
        assert_eq!(s.coefficient_of(&cube("-1")), Some(2));
        assert_eq!(s.coefficient_of(&cube("1-")), Some(2));
        assert_eq!(s.weight_sum(), 4);
    }

    #[test]
    fn test_dsopp_or() {
        let f = FunctionPlus::from_values(2, &[0, 2, 2, 2]).unwrap();
        let s = Sopp::synthesize_disjoint(&f).unwrap();
        assert!(s.is_valid_exact_form_of(&f));
        assert_eq!(s.weight_sum(), 4);
    }

    #[test]
    fn test_all_zero() {
        let f = FunctionPlus::from_values(3, &[0; 8]).unwrap();
        let s = Sopp::synthesize(&f).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.weight_sum(), 0);
        let d = Sopp::synthesize_disjoint(&f).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn test_zero_variables() {
        let f = FunctionPlus::from_values(0, &[7]).unwrap();
        let s = Sopp::synthesize(&f).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.weight_sum(), 7);
        assert_eq!(s.value_of(&[]), 7);

        let d = Sopp::synthesize_disjoint(&f).unwrap();
        assert!(d.is_valid_exact_form_of(&f));
        assert_eq!(d.weight_sum(), 7);
    }

    #[test]
    fn test_constant_function() {
        let f = FunctionPlus::from_values(3, &[4; 8]).unwrap();
        let s = Sopp::synthesize(&f).unwrap();
        assert_eq!(s.to_string(), "4*---");
        let d = Sopp::synthesize_disjoint(&f).unwrap();
        assert_eq!(d.to_string(), "4*---");
    }

    #[test]
    fn test_cyclic_cover_goes_greedy() {
        // Six points on a cycle: each one has exactly two prime coverers.
        let f = FunctionPlus::from_values(3, &[0, 1, 1, 1, 1, 1, 1, 0]).unwrap();
        let s = Sopp::synthesize(&f).unwrap();
        assert!(s.is_valid_upper_bound_form_of(&f));
        assert!(s.weight_sum() <= 6);

        let d = Sopp::synthesize_disjoint(&f).unwrap();
        assert!(d.is_valid_exact_form_of(&f));
    }

    #[test]
    fn test_greedy_repicks_partly_paid_cube() {
        // Cyclic cover where 011 is worth far more than its neighbours: the
        // cubes through 011 are first paid at 1 and must be paid again.
        let f = FunctionPlus::from_values(3, &[0, 1, 1, 10, 5, 5, 5, 0]).unwrap();
        for synthesizer in [Synthesizer::default(), experimental()] {
            let s = synthesizer.sopp(&f).unwrap();
            assert!(s.is_valid_upper_bound_form_of(&f), "{} for\n{}", s, f);
            assert!(s.value_at(3) >= 10);
            assert_eq!(s.value_at(0), 0);
            assert_eq!(s.value_at(7), 0);
        }
    }

    #[test]
    fn test_greedy_cover_pays_everything() {
        let mut residual = FunctionPlus::from_values(2, &[1, 0, 4, 1]).unwrap();
        let mut candidates = Implicants::new(2);
        candidates.extend([cube("1-"), cube("-0")]);
        let mut result = Sopp::new(2);
        Synthesizer::greedy_cover(&mut residual, &mut candidates, &mut result).unwrap();
        assert!(!residual.has_positive());
        assert!(candidates.is_empty());
        // `1-` is paid at 1 with 10 still owing 3, and chosen again at 2.
        assert_eq!(result.coefficient_of(&cube("1-")), Some(3));
        assert_eq!(result.coefficient_of(&cube("-0")), Some(1));
    }

    #[test]
    fn test_pruning_checks_original_dont_cares() {
        let synthesizer = Synthesizer::new(SynthesisConfig::default().with_dont_care_pruning(true));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for n in 1..=6 {
            for _ in 0..10 {
                let f = FunctionPlus::random_with_dont_cares(n, 6, 50, 30, &mut rng).unwrap();
                let s = synthesizer.sopp(&f).unwrap();
                assert!(s.is_valid_upper_bound_form_of(&f), "{} for\n{}", s, f);
            }
        }
    }

    #[test]
    fn test_dont_cares() {
        let mut f = FunctionPlus::from_values(2, &[0, 0, 0, 3]).unwrap();
        f.set_value(2, Weight::DontCare).unwrap();
        let s = Sopp::synthesize(&f).unwrap();
        assert_eq!(s.to_string(), "3*1-");
        let d = Sopp::synthesize_disjoint(&f).unwrap();
        assert!(d.is_valid_exact_form_of(&f));
        assert_eq!(d.weight_sum(), 3);
    }

    #[test]
    fn test_dsopp_layers() {
        // 3 on 11, 1 on the rest of `1-`: the exact form needs two layers.
        let f = FunctionPlus::from_values(2, &[0, 0, 1, 3]).unwrap();
        let d = Sopp::synthesize_disjoint(&f).unwrap();
        assert!(d.is_valid_exact_form_of(&f));
        assert_eq!(d.coefficient_of(&cube("1-")), Some(1));
        assert_eq!(d.coefficient_of(&cube("11")), Some(2));
    }

    #[test]
    fn test_random_functions() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for n in 1..=5 {
            for _ in 0..10 {
                let f = FunctionPlus::random(n, 5, 60, &mut rng).unwrap();
                let s = Sopp::synthesize(&f).unwrap();
                assert!(s.is_valid_upper_bound_form_of(&f), "sopp of\n{}gave {}", f, s);
                let d = Sopp::synthesize_disjoint(&f).unwrap();
                assert!(d.is_valid_exact_form_of(&f), "dsopp of\n{}gave {}", f, d);
            }
        }
    }

    #[test]
    fn test_experimental_strategy() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let synthesizer = experimental();
        for n in 1..=5 {
            for _ in 0..10 {
                let f = FunctionPlus::random(n, 4, 50, &mut rng).unwrap();
                let s = synthesizer.sopp(&f).unwrap();
                assert!(s.is_valid_upper_bound_form_of(&f));
                let d = synthesizer.dsopp(&f).unwrap();
                assert!(d.is_valid_exact_form_of(&f));
            }
        }
    }

    #[test]
    fn test_config_builder() {
        let config = SynthesisConfig::default();
        assert_eq!(config.strategy, Strategy::Canonical);
        assert!(!config.dont_care_pruning);

        let config = config.with_dont_care_pruning(true);
        let synthesizer = Synthesizer::new(config);
        assert!(synthesizer.config().dont_care_pruning);
    }

    #[test]
    fn test_pending_order() {
        let mut heap = BinaryHeap::new();
        heap.push(Pending::new(2, cube("1-"), 0));
        heap.push(Pending::new(3, cube("--"), 1));
        heap.push(Pending::new(3, cube("11"), 2));
        heap.push(Pending::new(3, cube("10"), 3));
        assert_eq!(heap.pop().unwrap().cube, cube("11"));
        assert_eq!(heap.pop().unwrap().cube, cube("10"));
        assert_eq!(heap.pop().unwrap().cube, cube("--"));
        assert_eq!(heap.pop().unwrap().cube, cube("1-"));
    }
}
