//! Partition without coverage: a single cost parameter on `[0, 1]`.
//!
//! Without coverage every predictor's cost is affine in one parameter `t`:
//! `cost(t) = t * (1 - spec + rho * (sens + spec - 2)) + rho * (1 - sens)`.
//! Pairwise crossings split `[0, 1]` into intervals; each interval goes to
//! the predictor that is cheapest at its midpoint.

use crate::cost::Predictor;
use crate::partition::{best_of, rank_areas, PredictorArea};
use crate::Result;

/// Cost of `p` at `t`, ignoring coverage.
#[inline]
pub fn interval_cost(t: f64, rho: f64, p: &Predictor) -> f64 {
    let (slope, intercept) = cost_line(rho, p);
    t * slope + intercept
}

fn cost_line(rho: f64, p: &Predictor) -> (f64, f64) {
    let (sens, spec) = (p.sensitivity, p.specificity);
    (1.0 - spec + rho * (sens + spec - 2.0), rho * (1.0 - sens))
}

/// One piece of `[0, 1]` with its cheapest predictor.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    /// Index into the predictor slice.
    pub predictor: usize,
}

impl Interval {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Clone, Debug)]
pub struct IntervalPartition {
    pub rho: f64,
    /// Sorted crossings strictly inside `(0, 1)`.
    pub breakpoints: Vec<f64>,
    pub intervals: Vec<Interval>,
    /// One entry per predictor in declared order; `area` is the summed
    /// interval length (the whole segment has length 1).
    pub lengths: Vec<PredictorArea>,
}

impl IntervalPartition {
    pub fn ranking(&self) -> Vec<&PredictorArea> {
        rank_areas(&self.lengths)
    }

    pub fn best_combination(&self) -> Vec<&str> {
        best_of(&self.lengths)
    }
}

/// Crossings of every predictor pair strictly inside `(0, 1)`, sorted and
/// deduplicated. Parallel pairs do not cross.
pub fn crossing_points(rho: f64, predictors: &[Predictor]) -> Vec<f64> {
    let mut points = Vec::new();
    for (i, p1) in predictors.iter().enumerate() {
        let (m1, b1) = cost_line(rho, p1);
        for p2 in &predictors[i + 1..] {
            let (m2, b2) = cost_line(rho, p2);
            if m1 == m2 {
                continue;
            }
            let t = (b2 - b1) / (m1 - m2);
            if t > 0.0 && t < 1.0 {
                points.push(t);
            }
        }
    }
    points.sort_by(f64::total_cmp);
    points.dedup();
    points
}

/// Interval partition of `[0, 1]`; ties at a midpoint go to the predictor
/// declared first.
pub fn partition_intervals(rho: f64, predictors: &[Predictor]) -> Result<IntervalPartition> {
    let no_coverage: Vec<Predictor> = predictors
        .iter()
        .map(|p| Predictor::without_coverage(p.name.clone(), p.sensitivity, p.specificity))
        .collect();
    crate::partition::validate_inputs(rho, &no_coverage)?;

    let breakpoints = crossing_points(rho, predictors);
    let bounds: Vec<f64> = std::iter::once(0.0)
        .chain(breakpoints.iter().copied())
        .chain(std::iter::once(1.0))
        .collect();
    let mut totals = vec![0.0; predictors.len()];
    let mut intervals = Vec::with_capacity(bounds.len() - 1);
    for w in bounds.windows(2) {
        let mut iv = Interval {
            start: w[0],
            end: w[1],
            predictor: 0,
        };
        let mid = iv.midpoint();
        let mut best_cost = f64::INFINITY;
        for (i, p) in predictors.iter().enumerate() {
            let c = interval_cost(mid, rho, p);
            if c < best_cost {
                best_cost = c;
                iv.predictor = i;
            }
        }
        totals[iv.predictor] += iv.length();
        intervals.push(iv);
    }
    let lengths = predictors
        .iter()
        .zip(totals)
        .map(|(p, len)| PredictorArea {
            name: p.name.clone(),
            area: len,
            relative: len,
        })
        .collect();
    Ok(IntervalPartition {
        rho,
        breakpoints,
        intervals,
        lengths,
    })
}
