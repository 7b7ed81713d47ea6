//! High-level pipeline API: raw CSV in, analysis report out.
//!
//! Combines parsing, validation and analysis, logging each step through
//! the log broadcaster.
//!
//! # Example
//!
//! ```rust,ignore
//! use weatherstat::analysis::pipeline::analyze_file;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = analyze_file(Path::new("weather.csv"))?;
//!     println!("ANOVA p-value: {}", report.analysis.anova.p_value);
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

use super::analyze;
use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::error::{PipelineResult, ValidationError};
use crate::models::{AnalysisResult, WeatherDataset};
use crate::parser::{parse_bytes_auto, parse_text_auto, RawTable};
use crate::validation::validate_table;

/// Where the analysed data came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// Result of a complete pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub source: SourceInfo,
    pub analysis: AnalysisResult,
}

/// Analyze a CSV file.
pub fn analyze_file(path: &Path) -> PipelineResult<Report> {
    log_info(format!("📖 Reading {}", path.display()));
    let bytes = std::fs::read(path)?;
    analyze_bytes(&bytes)
}

/// Analyze raw CSV bytes (encoding and delimiter auto-detected).
pub fn analyze_bytes(bytes: &[u8]) -> PipelineResult<Report> {
    log_info("Detecting encoding and separator...");
    let table = parse_bytes_auto(bytes).map_err(|e| reject(e.into()))?;
    analyze_table(table)
}

/// Analyze CSV text, e.g. pasted into a form field.
pub fn analyze_text(text: &str) -> PipelineResult<Report> {
    log_info("Detecting separator...");
    let table = parse_text_auto(text).map_err(|e| reject(e.into()))?;
    analyze_table(table)
}

fn analyze_table(table: RawTable) -> PipelineResult<Report> {
    log_success(format!("Detected encoding: {}", table.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(table.delimiter)));
    log_info(format!("📋 CSV has {} columns:", table.headers.len()));
    for (i, col) in table.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    log_info("✔️  Validating...");
    let dataset = validate_table(&table).map_err(reject)?;
    log_success(format!("{} valid records", dataset.len()));

    log_info("📊 Computing statistics...");
    let analysis = analyze(&dataset).map_err(|e| {
        log_error(e.to_string());
        e
    })?;
    log_analysis(&analysis);

    Ok(Report {
        source: source_info(&table, &dataset),
        analysis,
    })
}

fn source_info(table: &RawTable, dataset: &WeatherDataset) -> SourceInfo {
    let (first_date, last_date) = dataset.date_range();
    SourceInfo {
        encoding: table.encoding.clone(),
        delimiter: table.delimiter,
        headers: table.headers.clone(),
        row_count: dataset.len(),
        first_date,
        last_date,
    }
}

fn reject(err: ValidationError) -> ValidationError {
    log_error(err.to_string());
    err
}

fn log_analysis(analysis: &AnalysisResult) {
    let summary = &analysis.temperature_summary;
    log_success(format!(
        "Temperature: mean {}, median {}, mode {}, std {}",
        summary.mean, summary.median, summary.mode, summary.standard_deviation
    ));
    log_success(format!("{} month(s) in monthly summary", analysis.monthly_summary.len()));

    if analysis.monthly_summary.len() < 2 {
        log_warning("Data spans a single month, ANOVA skipped");
    } else if analysis.anova.significant {
        log_success(format!(
            "ANOVA: F = {}, p = {} (significant)",
            analysis.anova.f_statistic, analysis.anova.p_value
        ));
    } else {
        log_info(format!(
            "ANOVA: F = {}, p = {} (not significant)",
            analysis.anova.f_statistic, analysis.anova.p_value
        ));
    }
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    const CSV: &str = "Date,Temperature,Rainfall\n\
                       2024-01-01,2.0,0.0\n\
                       2024-01-02,3.0,1.0\n\
                       2024-02-01,8.0,4.5\n";

    #[test]
    fn test_analyze_text() {
        let report = analyze_text(CSV).unwrap();

        assert_eq!(report.source.row_count, 3);
        assert_eq!(report.source.delimiter, ',');
        assert_eq!(report.source.first_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(report.source.last_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(report.analysis.monthly_summary.len(), 2);
    }

    #[test]
    fn test_analyze_bytes_rejects_invalid() {
        let err = analyze_bytes(b"Date,Temperature\n2024-01-01,2\n").unwrap_err();
        match err {
            PipelineError::Validation(ValidationError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["Rainfall".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_analyze_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.csv");
        std::fs::write(&path, CSV).unwrap();

        let report = analyze_file(&path).unwrap();
        assert_eq!(report.analysis.record_count, 3);
    }

    #[test]
    fn test_analyze_missing_file() {
        let err = analyze_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "TAB");
        assert_eq!(format_delimiter(';'), ";");
    }
}
