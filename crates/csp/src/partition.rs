//! Labeled partition of the cost triangle and the precision-escalation driver.
//!
//! Purpose
//! - `compute_partition`: arrangement, interaction graph and face search at one
//!   precision, returning the recovered polygons.
//! - `label_polygons`: cheapest predictor per face (evaluated at the face
//!   centroid) and per-predictor area totals.
//! - `partition_with_retry`: run at the configured precision and, when the
//!   failure is one a finer rounding may resolve, once more at the fallback.
//!
//! Ties between predictors at a centroid go to the predictor declared first.

use tracing::{debug, warn};

use crate::arrangement::build_arrangement;
use crate::cost::Predictor;
use crate::faces::{get_polygons, InteractionGraph, Polygon, SearchCfg};
use crate::geom2::{polygon_area, polygon_centroid, Point, Precision};
use crate::{CspError, Result, TRIANGLE_AREA};

/// Driver configuration.
#[derive(Clone, Copy, Debug)]
pub struct PartitionCfg {
    pub precision: Precision,
    /// Used once if the first attempt fails with a retryable error.
    pub fallback_precision: Precision,
    pub search: SearchCfg,
    /// Allowed gap between the recovered area and the triangle area.
    pub area_tolerance: f64,
}

impl Default for PartitionCfg {
    fn default() -> Self {
        Self {
            precision: Precision::DEFAULT,
            fallback_precision: Precision::FALLBACK,
            search: SearchCfg::default(),
            area_tolerance: 1e-6,
        }
    }
}

/// A recovered face with its cheapest predictor.
#[derive(Clone, Debug)]
pub struct Face {
    pub polygon: Polygon,
    pub area: f64,
    pub centroid: Point,
    /// Index into the predictor slice.
    pub predictor: usize,
}

/// Total area where one predictor is cheapest.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictorArea {
    pub name: String,
    pub area: f64,
    /// `area / 0.5`
    pub relative: f64,
}

#[derive(Clone, Debug)]
pub struct Partition {
    pub rho: f64,
    /// Precision of the attempt that succeeded.
    pub precision: Precision,
    pub faces: Vec<Face>,
    /// One entry per predictor, in declared order.
    pub areas: Vec<PredictorArea>,
}

impl Partition {
    /// Predictors by decreasing relative area, then by name.
    pub fn ranking(&self) -> Vec<&PredictorArea> {
        rank_areas(&self.areas)
    }

    /// Ranked predictors whose relative area is still positive at 3 decimals.
    pub fn best_combination(&self) -> Vec<&str> {
        best_of(&self.areas)
    }

    pub fn total_area(&self) -> f64 {
        self.faces.iter().map(|f| f.area).sum()
    }
}

pub(crate) fn rank_areas(areas: &[PredictorArea]) -> Vec<&PredictorArea> {
    let mut ranked: Vec<&PredictorArea> = areas.iter().collect();
    ranked.sort_by(|a, b| {
        b.relative
            .total_cmp(&a.relative)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

pub(crate) fn best_of(areas: &[PredictorArea]) -> Vec<&str> {
    rank_areas(areas)
        .into_iter()
        .filter(|a| (a.relative * 1000.0).round() > 0.0)
        .map(|a| a.name.as_str())
        .collect()
}

/// Check that `rho` and every predictor rate lie in `[0, 1]`.
pub fn validate_inputs(rho: f64, predictors: &[Predictor]) -> Result<()> {
    let unit = 0.0..=1.0;
    if !unit.contains(&rho) {
        return Err(CspError::InvalidInput(format!(
            "rho {rho} should be between 0 and 1"
        )));
    }
    if predictors.is_empty() {
        return Err(CspError::InvalidInput("no predictors given".into()));
    }
    for p in predictors {
        for (what, v) in [
            ("sensitivity", p.sensitivity),
            ("specificity", p.specificity),
            ("coverage", p.coverage),
        ] {
            if !unit.contains(&v) {
                return Err(CspError::InvalidInput(format!(
                    "{} {what} is {v} but should be between 0 and 1",
                    p.name
                )));
            }
        }
    }
    Ok(())
}

/// Polygons of the partition at one precision, default search limits.
pub fn compute_partition(
    rho: f64,
    predictors: &[Predictor],
    precision: Precision,
) -> Result<Vec<Polygon>> {
    compute_partition_with(rho, predictors, precision, SearchCfg::default())
}

pub fn compute_partition_with(
    rho: f64,
    predictors: &[Predictor],
    precision: Precision,
    search: SearchCfg,
) -> Result<Vec<Polygon>> {
    let arrangement = build_arrangement(rho, predictors, precision)?;
    let graph = InteractionGraph::from_lines(&arrangement.lines);
    debug!(
        edges = graph.search_edges.len(),
        incidences = graph.expected_incidences(),
        "interaction graph built"
    );
    get_polygons(&graph, &arrangement.nodes, search)
}

/// Index of the cheapest predictor at `p`; the first declared wins ties.
fn cheapest(rho: f64, predictors: &[Predictor], p: Point) -> usize {
    let mut best = 0;
    let mut best_cost = f64::INFINITY;
    for (i, pred) in predictors.iter().enumerate() {
        let c = pred.cost_plane(rho).eval(p.x, p.y);
        if c < best_cost {
            best = i;
            best_cost = c;
        }
    }
    best
}

/// Label every polygon with its cheapest predictor and total the areas.
pub fn label_polygons(
    rho: f64,
    predictors: &[Predictor],
    polygons: Vec<Polygon>,
) -> Result<(Vec<Face>, Vec<PredictorArea>)> {
    if predictors.is_empty() {
        return Err(CspError::InvalidInput("no predictors given".into()));
    }
    let mut totals = vec![0.0; predictors.len()];
    let mut faces = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        let Some(centroid) = polygon_centroid(&polygon) else {
            continue;
        };
        let area = polygon_area(&polygon);
        let predictor = cheapest(rho, predictors, centroid);
        totals[predictor] += area;
        faces.push(Face {
            polygon,
            area,
            centroid,
            predictor,
        });
    }
    let areas = predictors
        .iter()
        .zip(totals)
        .map(|(p, area)| PredictorArea {
            name: p.name.clone(),
            area,
            relative: area / TRIANGLE_AREA,
        })
        .collect();
    Ok((faces, areas))
}

fn attempt(
    rho: f64,
    predictors: &[Predictor],
    precision: Precision,
    cfg: &PartitionCfg,
) -> Result<Partition> {
    let polygons = compute_partition_with(rho, predictors, precision, cfg.search)?;
    let area: f64 = polygons.iter().map(|p| polygon_area(p)).sum();
    if (area - TRIANGLE_AREA).abs() > cfg.area_tolerance {
        return Err(CspError::AreaMismatch {
            area,
            expected: TRIANGLE_AREA,
        });
    }
    let (faces, areas) = label_polygons(rho, predictors, polygons)?;
    Ok(Partition {
        rho,
        precision,
        faces,
        areas,
    })
}

/// Labeled partition, escalating to `cfg.fallback_precision` once on a
/// retryable failure.
pub fn partition_with_retry(
    rho: f64,
    predictors: &[Predictor],
    cfg: PartitionCfg,
) -> Result<Partition> {
    validate_inputs(rho, predictors)?;
    match attempt(rho, predictors, cfg.precision, &cfg) {
        Err(err) if err.is_retryable() => {
            warn!(
                error = %err,
                from = cfg.precision.0,
                to = cfg.fallback_precision.0,
                "partition failed, retrying at finer precision"
            );
            attempt(rho, predictors, cfg.fallback_precision, &cfg)
        }
        other => other,
    }
}
