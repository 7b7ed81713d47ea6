//! # Weatherstat - validation and statistics for daily weather data
//!
//! Weatherstat checks a CSV of daily observations (`Date`, `Temperature`,
//! `Rainfall`) and computes descriptive statistics, a per-month summary, a
//! one-way ANOVA across months and three chart specifications.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Validator  │────▶│  Analyzer   │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │  (typed)    │     │ (stats+ANOVA)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use weatherstat::{analyze, validate_text};
//!
//! let dataset = validate_text("Date,Temperature,Rainfall\n2024-01-01,3.5,0\n")?;
//! let result = analyze(&dataset)?;
//! println!("mean temperature: {}", result.temperature_summary.mean);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`config`] - Constants and server settings
//! - [`models`] - Weather records, dataset and result types
//! - [`parser`] - CSV parsing with auto-detection
//! - [`validation`] - Column and cell type checks
//! - [`analysis`] - Statistics, grouping, ANOVA, charts and pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Analysis
pub mod analysis;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AnalysisError, PipelineError, PipelineResult, ServerError, ServerResult, ValidationError,
    ValidationErrorKind, ValidationResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AnalysisResult, AnovaResult, Charts, MonthlySummary, TemperatureSummary, WeatherDataset,
    WeatherRecord,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto,
    parse_table, parse_text_auto, CsvError, RawRow, RawTable,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{parse_date, validate_bytes, validate_table, validate_text};

// =============================================================================
// Re-exports - Analysis
// =============================================================================

pub use analysis::charts::ChartSpec;
pub use analysis::{analyze, analyze_bytes, analyze_file, analyze_text, Report, SourceInfo};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, AnalyzeResponse, ValidateResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
