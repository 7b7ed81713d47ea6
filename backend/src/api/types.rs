//! REST API types.
//!
//! Response bodies are camelCase at the envelope level; the embedded
//! analysis keeps the library's field names so chart specs can be passed
//! through untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analysis::pipeline::{format_delimiter, Report};
use crate::error::{PipelineError, ServerError};
use crate::models::{AnalysisResult, WeatherDataset};

/// Response to a successful `POST /api/analyze`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Always "ok"; errors use [`error_response`]
    pub status: String,

    /// Uploaded file name, or `manual_input.csv` for pasted text
    pub file_name: String,

    pub source: SourceMetadata,

    pub analysis: AnalysisResult,

    /// Plotly figures for the three charts, ready for `Plotly.newPlot`
    pub figures: Figures,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Figures {
    pub temperature_trend: Value,
    pub monthly_average: Value,
    pub rainfall_trend: Value,
}

/// CSV file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl AnalyzeResponse {
    pub fn new(report: Report, file_name: impl Into<String>) -> Self {
        let charts = &report.analysis.charts;
        let figures = Figures {
            temperature_trend: charts.temperature_trend.to_plotly(),
            monthly_average: charts.monthly_average.to_plotly(),
            rainfall_trend: charts.rainfall_trend.to_plotly(),
        };
        let source = report.source;

        Self {
            job_id: Uuid::new_v4().to_string(),
            status: "ok".to_string(),
            file_name: file_name.into(),
            source: SourceMetadata {
                encoding: source.encoding,
                delimiter: format_delimiter(source.delimiter),
                row_count: source.row_count,
                columns: source.headers,
                first_date: source.first_date,
                last_date: source.last_date,
            },
            analysis: report.analysis,
            figures,
        }
    }
}

/// Response to a successful `POST /api/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub job_id: String,
    pub valid: bool,
    pub file_name: String,
    pub record_count: usize,
    /// Distinct months present, ascending
    pub months: Vec<u32>,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl ValidateResponse {
    pub fn new(dataset: &WeatherDataset, file_name: impl Into<String>) -> Self {
        let (first_date, last_date) = dataset.date_range();
        Self {
            job_id: Uuid::new_v4().to_string(),
            valid: true,
            file_name: file_name.into(),
            record_count: dataset.len(),
            months: dataset.months().into_iter().collect(),
            first_date,
            last_date,
        }
    }
}

/// Error body for any failed request.
///
/// Validation failures carry the error kind and the offending columns.
pub fn error_response(err: &ServerError) -> Value {
    let (kind, columns) = match err {
        ServerError::Pipeline(PipelineError::Validation(v)) => {
            (json!(v.kind()), json!(v.columns()))
        }
        ServerError::Pipeline(PipelineError::Analysis(_)) => (json!("AnalysisError"), json!([])),
        ServerError::Pipeline(PipelineError::Io(_)) | ServerError::Internal(_) => {
            (json!("InternalError"), json!([]))
        }
        ServerError::BadRequest(_) => (json!("BadRequest"), json!([])),
    };

    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "kind": kind,
        "error": err.to_string(),
        "columns": columns,
    })
}
