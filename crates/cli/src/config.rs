//! Run configuration: prevalence plus predictor rates, from JSON or CSV.
//!
//! JSON: `{"rho": 0.5, "predictors": [{"name": "SIFT", "values": [0.924, 0.682, 0.866]}]}`
//! with sensitivity, specificity and (for `co`) coverage in that order.
//! CSV: a `name` column plus `sensitivity`, `specificity` and `coverage`
//! columns; `--rho` comes from the command line.
//!
//! Rates are rounded to 3 decimals before they are range-checked.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csp::geom2::Precision;
use csp::prelude::Predictor;
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;

/// Smallest prevalence accepted.
pub const MIN_RHO: f64 = 0.00001;

const RATE_DIGITS: Precision = Precision(3);

/// Which partition is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Coverage,
    NoCoverage,
}

impl Mode {
    /// Rates expected per predictor, in order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Mode::Coverage => &["sensitivity", "specificity", "coverage"],
            Mode::NoCoverage => &["sensitivity", "specificity"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Coverage => "co",
            Mode::NoCoverage => "noco",
        }
    }
}

/// One predictor as read, before parsing and range checks.
#[derive(Clone, Debug)]
pub struct RawPredictor {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonConfig {
    rho: f64,
    #[serde(default)]
    predictors: Vec<JsonPredictor>,
}

#[derive(Debug, Deserialize)]
struct JsonPredictor {
    name: String,
    values: Vec<Value>,
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Validated inputs of one run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub rho: f64,
    pub predictors: Vec<Predictor>,
}

impl RunConfig {
    pub fn from_json(path: &Path, mode: Mode) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let raw: JsonConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        let rows = raw
            .predictors
            .into_iter()
            .map(|p| RawPredictor {
                name: p.name,
                values: p.values.iter().map(value_text).collect(),
            })
            .collect();
        validate(mode, raw.rho, rows)
    }

    pub fn from_csv(path: &Path, rho: f64, mode: Mode) -> Result<Self> {
        let rows = read_table(path, mode)?;
        validate(mode, rho, rows)
    }
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let col = df.column(name)?.cast(&DataType::String)?;
    let values = col
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect();
    Ok(values)
}

/// Rows of a predictor table. Columns the mode does not need are ignored;
/// a missing rate column shows up as a short row in `validate`.
fn read_table(path: &Path, mode: Mode) -> Result<Vec<RawPredictor>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading predictor table {}", path.display()))?;
    let names = text_column(&df, "name")
        .with_context(|| format!("{} needs a `name` column", path.display()))?;
    let mut columns = Vec::new();
    for field in mode.fields() {
        if df.column(field).is_ok() {
            columns.push(text_column(&df, field)?);
        }
    }
    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| RawPredictor {
            name,
            values: columns.iter().map(|c| c[i].clone()).collect(),
        })
        .collect())
}

fn describe(fields: &[&str]) -> String {
    match fields.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        Some((last, _)) => (*last).to_string(),
        None => String::new(),
    }
}

/// Check prevalence and rates; every violation is fatal.
pub fn validate(mode: Mode, rho: f64, rows: Vec<RawPredictor>) -> Result<RunConfig> {
    if !(MIN_RHO..=1.0).contains(&rho) {
        bail!("the rho value {rho} should be between {MIN_RHO} - 1");
    }
    if rows.is_empty() {
        bail!("the predictor(s) are missing");
    }
    let fields = mode.fields();
    let mut seen = HashSet::new();
    let mut predictors = Vec::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.name.clone()) {
            bail!("predictor {} is listed twice", row.name);
        }
        if row.values.len() != fields.len() {
            bail!(
                "{} information should contain {} but it has {} elements",
                row.name,
                describe(fields),
                row.values.len()
            );
        }
        let mut rates = [1.0; 3];
        for ((slot, field), text) in rates.iter_mut().zip(fields).zip(&row.values) {
            let v: f64 = text
                .trim()
                .parse()
                .map_err(|_| anyhow!("{} {field} is {text} but should be a number", row.name))?;
            let v = RATE_DIGITS.round(v);
            if !(0.0..=1.0).contains(&v) {
                bail!("{} {field} is {v} but should be between 0 - 1", row.name);
            }
            *slot = v;
        }
        predictors.push(match mode {
            Mode::Coverage => Predictor::new(row.name, rates[0], rates[1], rates[2]),
            Mode::NoCoverage => Predictor::without_coverage(row.name, rates[0], rates[1]),
        });
    }
    Ok(RunConfig { rho, predictors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn raw(name: &str, values: &[&str]) -> RawPredictor {
        RawPredictor {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn rates_are_rounded_to_three_decimals() {
        let cfg = validate(
            Mode::Coverage,
            0.5,
            vec![raw("SIFT", &["0.92449", " 0.682 ", "1"])],
        )
        .unwrap();
        let p = &cfg.predictors[0];
        assert_eq!(p.sensitivity, 0.924);
        assert_eq!(p.specificity, 0.682);
        assert_eq!(p.coverage, 1.0);
    }

    #[test]
    fn rho_out_of_range_is_fatal() {
        let rows = || vec![raw("a", &["0.5", "0.5", "0.5"])];
        let err = validate(Mode::Coverage, 0.000001, rows()).unwrap_err();
        assert!(err.to_string().contains("should be between 0.00001 - 1"));
        assert!(validate(Mode::Coverage, 1.5, rows()).is_err());
        assert!(validate(Mode::Coverage, 0.00001, rows()).is_ok());
    }

    #[test]
    fn row_shape_and_values_are_checked() {
        let err = validate(Mode::Coverage, 0.5, vec![raw("a", &["0.5", "0.5"])]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "a information should contain sensitivity, specificity and coverage but it has 2 elements"
        );
        let err = validate(Mode::NoCoverage, 0.5, vec![raw("a", &["0.5", "x"])]).unwrap_err();
        assert_eq!(err.to_string(), "a specificity is x but should be a number");
        let err = validate(Mode::NoCoverage, 0.5, vec![raw("a", &["1.2", "0.5"])]).unwrap_err();
        assert_eq!(err.to_string(), "a sensitivity is 1.2 but should be between 0 - 1");
        assert!(validate(Mode::NoCoverage, 0.5, Vec::new()).is_err());
        let twice = vec![raw("a", &["0.5", "0.5"]), raw("a", &["0.1", "0.1"])];
        assert!(validate(Mode::NoCoverage, 0.5, twice).is_err());
    }

    #[test]
    fn json_config_keeps_declared_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{"rho": 0.5, "predictors": [
                {"name": "SIFT", "values": [0.924, 0.682, 0.866]},
                {"name": "CADD", "values": ["0.995", 0.254, 1]}
            ]}"#,
        )
        .unwrap();
        let cfg = RunConfig::from_json(&path, Mode::Coverage).unwrap();
        assert_eq!(cfg.rho, 0.5);
        let names: Vec<&str> = cfg.predictors.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["SIFT", "CADD"]);
        assert_eq!(cfg.predictors[1].sensitivity, 0.995);
        assert_eq!(cfg.predictors[1].coverage, 1.0);
    }

    #[test]
    fn csv_table_is_read_by_column_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preds.csv");
        fs::write(
            &path,
            "name,specificity,sensitivity,coverage\nPolyPhen-2,0.638,0.926,0.909\nCADD,0.254,0.995,1\n",
        )
        .unwrap();
        let cfg = RunConfig::from_csv(&path, 0.5, Mode::Coverage).unwrap();
        assert_eq!(cfg.predictors.len(), 2);
        assert_eq!(cfg.predictors[0].name, "PolyPhen-2");
        assert_eq!(cfg.predictors[0].sensitivity, 0.926);
        assert_eq!(cfg.predictors[0].specificity, 0.638);
        assert_eq!(cfg.predictors[1].coverage, 1.0);

        let noco = RunConfig::from_csv(&path, 0.5, Mode::NoCoverage).unwrap();
        assert_eq!(noco.predictors[0].coverage, 1.0);
    }

    #[test]
    fn csv_without_coverage_column_is_short() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preds.csv");
        fs::write(&path, "name,sensitivity,specificity\nSIFT,0.924,0.682\n").unwrap();
        let err = RunConfig::from_csv(&path, 0.5, Mode::Coverage).unwrap_err();
        assert!(err.to_string().contains("but it has 2 elements"));
        assert!(RunConfig::from_csv(&path, 0.5, Mode::NoCoverage).is_ok());
    }
}
