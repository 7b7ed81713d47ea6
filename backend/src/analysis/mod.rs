//! Statistical analysis of a validated weather dataset.
//!
//! - `stats`: mean, median, mode (median fallback), sample std, rounding
//! - `grouping`: per-month partition and summary table
//! - `anova`: one-way ANOVA across months
//! - `charts`: declarative chart specifications
//! - `pipeline`: parse → validate → analyze, with progress logging

pub mod anova;
pub mod charts;
pub mod grouping;
pub mod pipeline;
pub mod stats;

pub use grouping::{group_by_month, MonthlyGroups};
pub use pipeline::{analyze_bytes, analyze_file, analyze_text, Report, SourceInfo};

use crate::error::AnalysisError;
use crate::models::{AnalysisResult, WeatherDataset};

/// Compute the full analysis bundle for `dataset`.
///
/// The dataset is trusted as validated. Either every part of the result is
/// computed or an [`AnalysisError`] is returned.
pub fn analyze(dataset: &WeatherDataset) -> Result<AnalysisResult, AnalysisError> {
    let temperature_summary = stats::summarize(&dataset.temperatures())?;

    let groups = group_by_month(dataset);
    let monthly_summary = grouping::monthly_summary(&groups)?;
    let anova = anova::test_groups(&groups.samples());
    let charts = charts::build_charts(dataset, &groups);

    Ok(AnalysisResult {
        record_count: dataset.len(),
        temperature_summary,
        monthly_summary,
        anova,
        charts,
    })
}
