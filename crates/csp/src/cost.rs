//! Predictor cost planes and their pairwise equal-cost lines.
//!
//! A predictor with sensitivity `sens`, specificity `spec` and coverage `cov`
//! has, at prevalence `rho`, the expected cost `C(x, y) = a·(x, y) + b` over
//! the cost triangle, with
//!
//! - `a.x = cov·rho·(1 − sens) + cov − 1`
//! - `a.y = cov·(1 − rho)·(1 − spec) + cov − 1`
//! - `b   = 1 − cov`
//!
//! Two predictors cost the same along a line; `line_parameters` returns it in
//! slope/intercept form, or `None` when the planes never cross inside the
//! triangle in that form (parallel in `y`). That is not an error.

use nalgebra::Vector2;

/// A binary classifier compared in the partition.
#[derive(Clone, Debug, PartialEq)]
pub struct Predictor {
    pub name: String,
    pub sensitivity: f64,
    pub specificity: f64,
    /// Fraction of cases the predictor classifies at all.
    pub coverage: f64,
}

impl Predictor {
    pub fn new(name: impl Into<String>, sensitivity: f64, specificity: f64, coverage: f64) -> Self {
        Self {
            name: name.into(),
            sensitivity,
            specificity,
            coverage,
        }
    }

    /// Predictor of the coverage-free model (full coverage).
    pub fn without_coverage(name: impl Into<String>, sensitivity: f64, specificity: f64) -> Self {
        Self::new(name, sensitivity, specificity, 1.0)
    }

    /// Cost plane at prevalence `rho`.
    pub fn cost_plane(&self, rho: f64) -> CostPlane {
        let cov = self.coverage;
        CostPlane {
            a: Vector2::new(
                cov * rho * (1.0 - self.sensitivity) + cov - 1.0,
                cov * (1.0 - rho) * (1.0 - self.specificity) + cov - 1.0,
            ),
            b: 1.0 - cov,
        }
    }
}

/// Affine cost functional `C(z) = a·z + b` on the cost triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostPlane {
    pub a: Vector2<f64>,
    pub b: f64,
}

impl CostPlane {
    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.a.x * x + self.a.y * y + self.b
    }
}

/// Expected cost of `p` at `(x, y)`.
#[inline]
pub fn predictor_cost(x: f64, y: f64, rho: f64, p: &Predictor) -> f64 {
    p.cost_plane(rho).eval(x, y)
}

/// Slope and intercept of the line where `p1` and `p2` cost the same.
///
/// Returns `None` when the denominator vanishes (planes parallel in `y`).
/// Unrounded; `-0.0` is normalized to `0.0`.
pub fn line_parameters(rho: f64, p1: &Predictor, p2: &Predictor) -> Option<(f64, f64)> {
    let c1 = p1.cost_plane(rho);
    let c2 = p2.cost_plane(rho);
    let denominator = c1.a.y - c2.a.y;
    if denominator == 0.0 {
        return None;
    }
    let slope = (c2.a.x - c1.a.x) / denominator;
    let intercept = (c2.b - c1.b) / denominator;
    Some((slope + 0.0, intercept + 0.0))
}
