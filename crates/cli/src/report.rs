//! Text report and JSON result documents.

use std::io::{self, Write};

use csp::interval::IntervalPartition;
use csp::prelude::{Partition, Predictor, PredictorArea};
use serde::Serialize;

use crate::config::Mode;

/// `v` at 3 decimals with trailing zeros dropped (`0.190` -> `0.19`, `1.000` -> `1`).
pub fn format_value(v: f64) -> String {
    let fixed = format!("{v:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}

fn name_width(predictors: &[Predictor]) -> usize {
    predictors
        .iter()
        .map(|p| p.name.chars().count())
        .chain(std::iter::once("Predictor".len()))
        .max()
        .unwrap_or(0)
}

fn write_header<W: Write>(
    w: &mut W,
    mode: Mode,
    rho: f64,
    predictors: &[Predictor],
    best: &[&str],
) -> io::Result<()> {
    let considered = match mode {
        Mode::Coverage => "sensitivity, specificity and coverage",
        Mode::NoCoverage => "sensitivity and specificity",
    };
    let names: Vec<&str> = predictors.iter().map(|p| p.name.as_str()).collect();
    writeln!(w, "\nCLINICAL SPACE PARTITION")?;
    writeln!(w, "------------------------\n")?;
    writeln!(w, "Parameters considered: {considered}\n")?;
    writeln!(w, "Methods compared: {}\n", names.join(", "))?;
    writeln!(w, "Best combination of methods (rho={rho}): {}\n", best.join(", "))?;
    writeln!(w, "List of clinical space fraction for each predictor:\n")
}

/// Report of a partition with coverage.
pub fn write_coverage<W: Write>(
    w: &mut W,
    rho: f64,
    predictors: &[Predictor],
    part: &Partition,
) -> io::Result<()> {
    write_header(w, Mode::Coverage, rho, predictors, &part.best_combination())?;
    let width = name_width(predictors);
    writeln!(w, "{:<width$}\tAbsolute value\tRelative value", "Predictor")?;
    writeln!(w, "{:<width$}\t--------------\t--------------", "---------")?;
    for a in part.ranking() {
        writeln!(
            w,
            "{:<width$}\t{}\t\t{}",
            a.name,
            format_value(a.area),
            format_value(a.relative)
        )?;
    }
    Ok(())
}

/// Report of the coverage-free interval partition.
pub fn write_intervals<W: Write>(
    w: &mut W,
    rho: f64,
    predictors: &[Predictor],
    part: &IntervalPartition,
) -> io::Result<()> {
    write_header(w, Mode::NoCoverage, rho, predictors, &part.best_combination())?;
    let width = name_width(predictors);
    writeln!(w, "{:<width$}\tRelative value", "Predictor")?;
    writeln!(w, "{:<width$}\t--------------", "---------")?;
    for a in part.ranking() {
        writeln!(w, "{:<width$}\t{}", a.name, format_value(a.relative))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AreaRow<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute: Option<f64>,
    pub relative: f64,
}

#[derive(Debug, Serialize)]
pub struct FaceRow<'a> {
    pub predictor: &'a str,
    pub area: f64,
    pub centroid: [f64; 2],
    /// Closed ring, first vertex repeated at the end.
    pub polygon: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct IntervalRow<'a> {
    pub predictor: &'a str,
    pub start: f64,
    pub end: f64,
}

/// Machine-readable result written by `--out`.
#[derive(Debug, Serialize)]
pub struct ResultDoc<'a> {
    pub mode: &'static str,
    pub rho: f64,
    /// Decimal digits of the attempt that succeeded (coverage mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    pub predictors: Vec<&'a str>,
    pub best_combination: Vec<&'a str>,
    /// Ranked as in the text report.
    pub areas: Vec<AreaRow<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<FaceRow<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub intervals: Vec<IntervalRow<'a>>,
}

fn area_rows(ranked: Vec<&PredictorArea>, absolute: bool) -> Vec<AreaRow<'_>> {
    ranked
        .into_iter()
        .map(|a| AreaRow {
            name: &a.name,
            absolute: absolute.then_some(a.area),
            relative: a.relative,
        })
        .collect()
}

impl<'a> ResultDoc<'a> {
    pub fn coverage(rho: f64, predictors: &'a [Predictor], part: &'a Partition) -> Self {
        let faces = part
            .faces
            .iter()
            .map(|f| FaceRow {
                predictor: &predictors[f.predictor].name,
                area: f.area,
                centroid: [f.centroid.x, f.centroid.y],
                polygon: f.polygon.iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect();
        Self {
            mode: Mode::Coverage.label(),
            rho,
            precision: Some(part.precision.0),
            predictors: predictors.iter().map(|p| p.name.as_str()).collect(),
            best_combination: part.best_combination(),
            areas: area_rows(part.ranking(), true),
            faces,
            intervals: Vec::new(),
        }
    }

    pub fn intervals(rho: f64, predictors: &'a [Predictor], part: &'a IntervalPartition) -> Self {
        let intervals = part
            .intervals
            .iter()
            .map(|iv| IntervalRow {
                predictor: &predictors[iv.predictor].name,
                start: iv.start,
                end: iv.end,
            })
            .collect();
        Self {
            mode: Mode::NoCoverage.label(),
            rho,
            precision: None,
            predictors: predictors.iter().map(|p| p.name.as_str()).collect(),
            best_combination: part.best_combination(),
            areas: area_rows(part.ranking(), false),
            faces: Vec::new(),
            intervals,
        }
    }
}
