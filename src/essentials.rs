//! Essential implicant extraction.

use std::collections::BTreeMap;

use log::trace;

use crate::cube::Cube;
use crate::error::{Error, Result};
use crate::function::FunctionPlus;
use crate::implicants::Implicants;

/// Implicants that are the only cover of some positive point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Essentials {
    implicants: Vec<Cube>,
    points: Vec<usize>,
}

impl Essentials {
    /// Distinct essential implicants, in the order their first unique point
    /// was found.
    pub fn implicants(&self) -> &[Cube] {
        &self.implicants
    }

    /// Ascending indices of the points covered by exactly one implicant.
    pub fn points(&self) -> &[usize] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.implicants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implicants.is_empty()
    }

    pub fn into_implicants(self) -> Vec<Cube> {
        self.implicants
    }
}

/// Finds the candidates that are the only cover of some positive point of `f`.
///
/// Returns `Ok(None)` if every positive point is covered at least twice, and
/// [`Error::UncoveredPoint`] if some positive point is not covered at all.
pub fn essential_implicants(f: &FunctionPlus, candidates: &Implicants) -> Result<Option<Essentials>> {
    // Point -> indices of the candidates covering it.
    let mut cover: BTreeMap<usize, Vec<usize>> = f.positive_points().map(|p| (p, Vec::new())).collect();
    for (i, cube) in candidates.iter().enumerate() {
        for p in cube.points() {
            if let Some(coverers) = cover.get_mut(&p) {
                coverers.push(i);
            }
        }
    }

    let mut seen = vec![false; candidates.len()];
    let mut implicants = Vec::new();
    let mut points = Vec::new();
    for (point, coverers) in cover {
        match coverers.as_slice() {
            [] => return Err(Error::UncoveredPoint { point }),
            [only] => {
                let only = *only;
                trace!("point {} is covered only by {}", point, candidates.get(only));
                points.push(point);
                if !seen[only] {
                    seen[only] = true;
                    implicants.push(candidates.get(only).clone());
                }
            }
            _ => {}
        }
    }

    if implicants.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Essentials { implicants, points }))
    }
}
