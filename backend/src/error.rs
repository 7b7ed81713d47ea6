//! Error types for the weatherstat pipeline.
//!
//! One error type per layer:
//!
//! - [`ValidationError`] - raw CSV rejected before it becomes a dataset
//! - [`AnalysisError`] - unexpected computation failure in the analyzer
//! - [`PipelineError`] - parse + validate + analyze orchestration
//! - [`ServerError`] - HTTP layer
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use serde::Serialize;
use thiserror::Error;

/// Required column holding the observation date.
pub const DATE_COLUMN: &str = "Date";
/// Required column holding the daily temperature.
pub const TEMPERATURE_COLUMN: &str = "Temperature";
/// Required column holding the daily rainfall.
pub const RAINFALL_COLUMN: &str = "Rainfall";

// =============================================================================
// Validation Errors
// =============================================================================

/// Reasons a raw table is rejected by the validator.
///
/// Variants are listed in the order the checks run; the first failing check
/// wins.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Content could not be read as delimited text with a header row.
    #[error("Unable to parse: malformed or empty content ({0})")]
    Parse(String),

    /// One or more required columns are absent.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Header present but no data rows.
    #[error("CSV file is empty: no data rows after the header")]
    EmptyData,

    /// A date cell did not match any accepted date format.
    #[error(
        "Invalid date format in '{column}' column at line {line} (value '{value}'). \
         Use format like YYYY-MM-DD"
    )]
    InvalidDate {
        column: String,
        line: usize,
        value: String,
    },

    /// A numeric cell was not a finite real number.
    #[error("'{column}' column must contain numeric values (line {line}, value '{value}')")]
    InvalidNumeric {
        column: String,
        line: usize,
        value: String,
    },
}

/// Stable, serializable name of a [`ValidationError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    ParseError,
    MissingColumnsError,
    EmptyDataError,
    InvalidDateError,
    InvalidNumericError,
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::Parse(_) => ValidationErrorKind::ParseError,
            Self::MissingColumns(_) => ValidationErrorKind::MissingColumnsError,
            Self::EmptyData => ValidationErrorKind::EmptyDataError,
            Self::InvalidDate { .. } => ValidationErrorKind::InvalidDateError,
            Self::InvalidNumeric { .. } => ValidationErrorKind::InvalidNumericError,
        }
    }

    /// Columns the error refers to, empty when the failure is not column specific.
    pub fn columns(&self) -> Vec<String> {
        match self {
            Self::MissingColumns(columns) => columns.clone(),
            Self::InvalidDate { column, .. } | Self::InvalidNumeric { column, .. } => {
                vec![column.clone()]
            }
            Self::Parse(_) | Self::EmptyData => Vec::new(),
        }
    }
}

// =============================================================================
// Analysis Errors
// =============================================================================

/// Unexpected failure while computing statistics on a validated dataset.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Analysis failed: {message}")]
pub struct AnalysisError {
    pub message: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::analysis::pipeline::analyze_file`]
/// and friends.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input rejected by the validator.
    #[error("Invalid CSV data: {0}")]
    Validation(#[from] ValidationError),

    /// Analyzer failure.
    #[error("Error analyzing data: {0}")]
    Analysis(#[from] AnalysisError),

    /// Failed to read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Pipeline(PipelineError::Validation(_)) => 422,
            Self::BadRequest(_) => 400,
            Self::Pipeline(_) | Self::Internal(_) => 500,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ValidationError -> PipelineError
        let pipeline_err: PipelineError = ValidationError::EmptyData.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // AnalysisError -> PipelineError
        let pipeline_err: PipelineError = AnalysisError::new("mean is not finite").into();
        assert!(pipeline_err.to_string().contains("mean is not finite"));
    }

    #[test]
    fn test_missing_columns_lists_every_column() {
        let err = ValidationError::MissingColumns(vec!["Date".into(), "Rainfall".into()]);
        assert_eq!(err.to_string(), "Missing required columns: Date, Rainfall");
        assert_eq!(err.columns(), vec!["Date", "Rainfall"]);
        assert_eq!(err.kind(), ValidationErrorKind::MissingColumnsError);
    }

    #[test]
    fn test_invalid_numeric_format() {
        let err = ValidationError::InvalidNumeric {
            column: TEMPERATURE_COLUMN.into(),
            line: 3,
            value: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Temperature'"));
        assert!(msg.contains("abc"));
        assert_eq!(err.columns(), vec!["Temperature"]);
    }

    #[test]
    fn test_status_codes() {
        let err = ServerError::from(PipelineError::from(ValidationError::EmptyData));
        assert_eq!(err.status_code(), 422);
        assert_eq!(ServerError::BadRequest("no file".into()).status_code(), 400);
        let err = ServerError::from(PipelineError::from(AnalysisError::new("boom")));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_kind_serializes_as_name() {
        let json = serde_json::to_string(&ValidationErrorKind::InvalidDateError).unwrap();
        assert_eq!(json, "\"InvalidDateError\"");
    }
}
