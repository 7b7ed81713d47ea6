//! Group observations by calendar month.
//!
//! ```text
//! records (input order)            →  MonthlyGroups (ascending month)
//! ┌──────────────────────────┐       ┌──────────────────────────┐
//! │ 2024-03-02  T=11.0       │       │ 1 → [2.0, 4.5]           │
//! │ 2024-01-15  T=2.0        │  →    │ 3 → [11.0]               │
//! │ 2023-01-20  T=4.5        │       └──────────────────────────┘
//! └──────────────────────────┘
//! ```
//!
//! Months from different years share a group. Only months present in the
//! data get a group.

use std::collections::BTreeMap;

use super::stats::{ensure_finite, mean, round_to, sample_std};
use crate::error::AnalysisError;
use crate::models::{MonthlySummary, WeatherDataset};

/// Temperatures keyed by month number, in input order within each month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyGroups {
    groups: BTreeMap<u32, Vec<f64>>,
}

impl MonthlyGroups {
    /// Temperature samples per month, ascending by month.
    pub fn samples(&self) -> Vec<&[f64]> {
        self.groups.values().map(Vec::as_slice).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[f64])> {
        self.groups.iter().map(|(m, v)| (*m, v.as_slice()))
    }
}

/// Partition the dataset's temperatures by month.
pub fn group_by_month(dataset: &WeatherDataset) -> MonthlyGroups {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in dataset.records() {
        groups
            .entry(record.month())
            .or_default()
            .push(record.temperature());
    }
    MonthlyGroups { groups }
}

/// Unrounded mean temperature per month, ascending by month.
pub fn monthly_means(groups: &MonthlyGroups) -> Vec<(u32, f64)> {
    groups.iter().map(|(month, values)| (month, mean(values))).collect()
}

/// Mean, std, min and max per month, rounded to 2 decimals.
///
/// `std` is left as NaN for months with a single record.
pub fn monthly_summary(groups: &MonthlyGroups) -> Result<Vec<MonthlySummary>, AnalysisError> {
    groups
        .iter()
        .map(|(month, values)| -> Result<MonthlySummary, AnalysisError> {
            let label = |stat: &str| format!("month {} {}", month, stat);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            let std = sample_std(values);
            if values.len() > 1 {
                ensure_finite(&label("standard deviation"), std)?;
            }

            Ok(MonthlySummary {
                month,
                mean: round_to(ensure_finite(&label("mean"), mean(values))?, 2),
                std: round_to(std, 2),
                min: round_to(ensure_finite(&label("min"), min)?, 2),
                max: round_to(ensure_finite(&label("max"), max)?, 2),
            })
        })
        .collect()
}
