//! HTTP server for the weatherstat API.
//!
//! Accepts a CSV upload (or pasted CSV text) and returns the analysis as
//! JSON, including ready-to-plot chart figures.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/analyze`    | Validate and analyze a CSV           |
//! | POST   | `/api/validate`   | Validate only                        |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |
//!
//! Both POST endpoints take a multipart form with a `file` part or a
//! `csv_text` field. Non-blank text wins over the file.

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, AnalyzeResponse, ValidateResponse};
use crate::analysis::pipeline::{analyze_bytes, analyze_text};
use crate::config::ServerConfig;
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::validation::{validate_bytes, validate_text};

/// File name reported for pasted CSV text.
pub const MANUAL_INPUT_NAME: &str = "manual_input.csv";

/// CSV content received from a client.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadData {
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub data: UploadData,
}

impl Upload {
    /// Pick the CSV source from the form fields.
    ///
    /// Non-blank `csv_text` takes precedence; otherwise a non-empty file is
    /// used. Neither present is a bad request.
    pub fn from_parts(
        csv_text: Option<String>,
        file: Option<(Option<String>, Vec<u8>)>,
    ) -> ServerResult<Self> {
        if let Some(text) = csv_text.filter(|t| !t.trim().is_empty()) {
            return Ok(Self {
                file_name: MANUAL_INPUT_NAME.to_string(),
                data: UploadData::Text(text),
            });
        }

        match file {
            Some((name, bytes)) if !bytes.is_empty() => Ok(Self {
                file_name: name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "upload.csv".to_string()),
                data: UploadData::Bytes(bytes),
            }),
            _ => Err(ServerError::BadRequest(
                "No file or CSV data provided".to_string(),
            )),
        }
    }

    fn size(&self) -> usize {
        match &self.data {
            UploadData::Text(t) => t.len(),
            UploadData::Bytes(b) => b.len(),
        }
    }
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_upload))
        .route("/api/validate", post(validate_upload))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🌦️  Weatherstat server running on http://localhost:{}", config.port);
    println!("   POST /api/analyze  - Analyze CSV");
    println!("   POST /api/validate - Validate CSV");
    println!("   GET  /api/logs     - SSE log stream");
    println!("   GET  /health       - Health check");
    println!(
        "   Upload limit: {} MB",
        config.max_upload_bytes / (1024 * 1024)
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "weatherstat",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analyze": "POST /api/analyze",
            "validate": "POST /api/validate",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // lagged receivers just skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

type ApiError = (StatusCode, Json<Value>);

fn to_api_error(err: ServerError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error_response(&err)))
}

/// Read the `file` and `csv_text` fields of the form.
async fn read_upload(mut multipart: Multipart) -> ServerResult<Upload> {
    let mut csv_text: Option<String> = None;
    let mut file: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "csv_text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                csv_text = Some(text);
            }
            "file" => {
                let name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                file = Some((name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    Upload::from_parts(csv_text, file)
}

/// Run the full pipeline on an upload.
pub fn run_analysis(upload: Upload) -> ServerResult<AnalyzeResponse> {
    let report = match &upload.data {
        UploadData::Text(text) => analyze_text(text),
        UploadData::Bytes(bytes) => analyze_bytes(bytes),
    }?;
    Ok(AnalyzeResponse::new(report, upload.file_name))
}

/// Validate an upload without analysing it.
pub fn run_validation(upload: Upload) -> ServerResult<ValidateResponse> {
    let dataset = match &upload.data {
        UploadData::Text(text) => validate_text(text),
        UploadData::Bytes(bytes) => validate_bytes(bytes),
    }
    .map_err(PipelineError::from)?;
    Ok(ValidateResponse::new(&dataset, upload.file_name))
}

fn announce(action: &str, upload: &Upload) {
    println!("\n{}", "=".repeat(70));
    println!("📄 {}: {} ({} bytes)", action, upload.file_name, upload.size());
    println!("{}\n", "=".repeat(70));
}

/// Analyze CSV endpoint
async fn analyze_upload(multipart: Multipart) -> Result<Json<AnalyzeResponse>, ApiError> {
    let upload = read_upload(multipart).await.map_err(to_api_error)?;
    announce("ANALYZE", &upload);

    let response = tokio::task::spawn_blocking(move || run_analysis(upload))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
        .and_then(|r| r)
        .map_err(|e| {
            log_error(format!("Analysis failed: {}", e));
            to_api_error(e)
        })?;

    log_info(format!("Job {} done", response.job_id));
    Ok(Json(response))
}

/// Validate CSV endpoint
async fn validate_upload(multipart: Multipart) -> Result<Json<ValidateResponse>, ApiError> {
    let upload = read_upload(multipart).await.map_err(to_api_error)?;
    announce("VALIDATE", &upload);

    let response = tokio::task::spawn_blocking(move || run_validation(upload))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
        .and_then(|r| r)
        .map_err(|e| {
            log_error(format!("Validation failed: {}", e));
            to_api_error(e)
        })?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Date,Temperature,Rainfall\n2024-01-01,1,0\n2024-02-01,9,2\n";

    fn text(s: &str) -> Upload {
        Upload::from_parts(Some(s.to_string()), None).unwrap()
    }

    #[test]
    fn test_text_wins_over_file() {
        let upload = Upload::from_parts(
            Some(CSV.to_string()),
            Some((Some("data.csv".into()), b"other".to_vec())),
        )
        .unwrap();
        assert_eq!(upload.file_name, MANUAL_INPUT_NAME);
        assert_eq!(upload.data, UploadData::Text(CSV.to_string()));
    }

    #[test]
    fn test_blank_text_falls_back_to_file() {
        let upload = Upload::from_parts(
            Some("   \n".to_string()),
            Some((Some("data.csv".into()), CSV.as_bytes().to_vec())),
        )
        .unwrap();
        assert_eq!(upload.file_name, "data.csv");
        assert!(matches!(upload.data, UploadData::Bytes(_)));
    }

    #[test]
    fn test_no_input_is_bad_request() {
        let err = Upload::from_parts(None, Some((None, Vec::new()))).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_run_analysis_in_blocking_task() {
        let response = tokio::task::spawn_blocking(|| run_analysis(text(CSV)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.status, "ok");
        assert_eq!(response.analysis.record_count, 2);
        assert_eq!(response.analysis.monthly_summary.len(), 2);
    }

    #[tokio::test]
    async fn test_run_analysis_validation_error() {
        let err = tokio::task::spawn_blocking(|| run_analysis(text("Date,Temp\n2024-01-01,1\n")))
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(err.status_code(), 422);
        let (status, Json(body)) = to_api_error(err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "MissingColumnsError");
        assert_eq!(body["columns"], json!(["Temperature", "Rainfall"]));
    }

    #[test]
    fn test_run_validation() {
        let response = run_validation(Upload {
            file_name: "w.csv".into(),
            data: UploadData::Bytes(CSV.as_bytes().to_vec()),
        })
        .unwrap();

        assert!(response.valid);
        assert_eq!(response.months, vec![1, 2]);
    }
}
