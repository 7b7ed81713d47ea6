//! Domain models for the weatherstat pipeline.
//!
//! - [`WeatherRecord`] - one validated daily observation
//! - [`WeatherDataset`] - non-empty sequence of records, produced by validation
//! - [`AnalysisResult`] - everything the analyzer reports for one dataset

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

use crate::analysis::charts::ChartSpec;

// =============================================================================
// Validated input
// =============================================================================

/// One daily observation.
///
/// `month` is always derived from `date`; there is no way to set it
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherRecord {
    date: NaiveDate,
    temperature: f64,
    rainfall: f64,
    month: u32,
}

impl WeatherRecord {
    pub fn new(date: NaiveDate, temperature: f64, rainfall: f64) -> Self {
        Self {
            date,
            temperature,
            rainfall,
            month: date.month(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn rainfall(&self) -> f64 {
        self.rainfall
    }

    /// Calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }
}

/// A validated, non-empty weather time series in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherDataset {
    records: Vec<WeatherRecord>,
}

impl WeatherDataset {
    /// Wrap records, returning `None` for an empty list.
    pub fn new(records: Vec<WeatherRecord>) -> Option<Self> {
        if records.is_empty() {
            None
        } else {
            Some(Self { records })
        }
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.records.iter().map(WeatherRecord::temperature).collect()
    }

    /// Distinct months present, ascending.
    pub fn months(&self) -> BTreeSet<u32> {
        self.records.iter().map(WeatherRecord::month).collect()
    }

    /// Earliest and latest date in the series.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let first = self.records[0].date;
        self.records
            .iter()
            .fold((first, first), |(lo, hi), r| (lo.min(r.date), hi.max(r.date)))
    }
}

// =============================================================================
// Analysis output
// =============================================================================

/// Descriptive statistics over every temperature value, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureSummary {
    pub mean: f64,
    pub median: f64,
    /// Most frequent value, or the median when no value repeats.
    pub mode: f64,
    /// Sample standard deviation (N-1); NaN for a single observation.
    pub standard_deviation: f64,
}

/// One row of the monthly aggregation table, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub mean: f64,
    /// NaN (serialized as `null`) when the month has a single record.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// One-way ANOVA of temperature across months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnovaResult {
    /// Rounded to 3 decimals. Serialized as `"Infinity"` when the months
    /// have no within-group variance but different means, `null` when F is
    /// undefined.
    #[serde(serialize_with = "serialize_statistic")]
    pub f_statistic: f64,
    /// Rounded to 4 decimals.
    pub p_value: f64,
    pub significant: bool,
}

impl AnovaResult {
    /// Placeholder reported when the data spans fewer than two months.
    pub fn neutral() -> Self {
        Self {
            f_statistic: 0.0,
            p_value: 1.0,
            significant: false,
        }
    }
}

/// JSON has no infinity; spell it out so it stays distinct from NaN (`null`).
fn serialize_statistic<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_infinite() {
        serializer.serialize_str(if value.is_sign_positive() { "Infinity" } else { "-Infinity" })
    } else {
        serializer.serialize_f64(*value)
    }
}

/// The three chart specifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub temperature_trend: ChartSpec,
    pub monthly_average: ChartSpec,
    pub rainfall_trend: ChartSpec,
}

/// Complete analysis of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub record_count: usize,
    pub temperature_summary: TemperatureSummary,
    pub monthly_summary: Vec<MonthlySummary>,
    pub anova: AnovaResult,
    pub charts: Charts,
}

// =============================================================================
// Tests
// =============================================================================
