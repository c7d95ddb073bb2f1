use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::path::Path;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::models::{AppError, ValidationResponse};
use crate::services::UploadService;
use crate::validator::{ShapefileValidator, ValidationRun};

#[derive(Clone)]
pub struct AppState {
    pub upload_service: UploadService,
    pub validator: ShapefileValidator,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            upload_service: UploadService::new(
                config.upload_dir.clone(),
                config.max_size,
                config.max_size_label.clone(),
            ),
            validator: ShapefileValidator::new(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/validate", post(validate_archive))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .layer(DefaultBodyLimit::disable())
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Shapefile Validator</title>
    <meta http-equiv="refresh" content="0; url=/static/index.html">
</head>
<body>
    <p>If you're not redirected automatically, <a href="/static/index.html">click here</a>.</p>
</body>
</html>
"#,
    )
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn validate_archive(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    state.upload_service.cleanup_stale().await;

    let mut field = loop {
        let next = match multipart.next_field().await {
            Ok(next) => next,
            Err(e) => {
                warn!("Invalid multipart form: {e}");
                return rejection(
                    StatusCode::BAD_REQUEST,
                    "Invalid multipart form",
                    "ERROR: The request body could not be parsed as a file upload.",
                    "Request could not be processed.",
                );
            }
        };
        match next {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => {
                warn!("No file uploaded");
                return rejection(
                    StatusCode::BAD_REQUEST,
                    "No file uploaded",
                    "ERROR: No file was uploaded. Please select a ZIP file containing your shapefile.",
                    "No file to validate.",
                );
            }
        }
    };

    let original_name = field.file_name().unwrap_or_default().to_string();
    if original_name.is_empty() {
        warn!("No file selected");
        return rejection(
            StatusCode::BAD_REQUEST,
            "No file selected",
            "ERROR: No file was selected. Please choose a ZIP file.",
            "No file to validate.",
        );
    }

    // Keep only the leaf of whatever path the client sent.
    let safe_name = Path::new(&original_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.zip")
        .to_string();

    let is_zip = Path::new(&safe_name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if !is_zip {
        warn!("Invalid file type: {safe_name}");
        return rejection(
            StatusCode::BAD_REQUEST,
            "Invalid file type - must be ZIP",
            "ERROR: Invalid file type. Please upload a ZIP file containing your shapefile.",
            "Only ZIP archives are accepted.",
        );
    }

    let stored = match state.upload_service.save_upload(&mut field, &safe_name).await {
        Ok(stored) => stored,
        Err(e) => {
            error!("Failed to store upload {safe_name}: {}", e.message());
            let status = StatusCode::from_u16(e.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return rejection(
                status,
                e.message(),
                &format!("ERROR: {}", e.message()),
                "File could not be stored for validation.",
            );
        }
    };

    let validator = state.validator.clone();
    let archive_path = stored.path.clone();
    let outcome =
        tokio::task::spawn_blocking(move || validator.validate(&archive_path)).await;

    // The stored archive is transient regardless of how validation went.
    state.upload_service.remove(&stored).await;

    let run = match outcome {
        Ok(Ok(run)) => run,
        Ok(Err(e)) => {
            error!("Error processing file {}: {}", stored.file_name, e.message());
            return processing_error(&safe_name, &e);
        }
        Err(e) => {
            error!("Validation task failed for {}: {e}", stored.file_name);
            return processing_error(&safe_name, &AppError::Internal(e.to_string()));
        }
    };

    info!(
        "Validation result for {}: {}",
        stored.file_name,
        if run.is_valid() { "PASSED" } else { "FAILED" }
    );
    if !run.is_valid() {
        info!("Validation errors: {:?}", run.errors());
    }

    let summary = if run.is_valid() {
        "All validation checks passed successfully!".to_string()
    } else if run.errors().is_empty() {
        "Validation failed for unknown reasons.".to_string()
    } else {
        format!(
            "Validation failed with {} error(s). See details above.",
            run.errors().len()
        )
    };

    let response = ValidationResponse {
        valid: run.is_valid(),
        error: None,
        report: compose_report(&safe_name, stored.size, &run, &summary),
        shapefiles: run.shapefiles().to_vec(),
        errors: run.errors(),
        warnings: run.warnings().to_vec(),
        filename: Some(safe_name),
        summary,
    };

    let status = if response.valid {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(response)).into_response()
}

/// Wraps the core's report with file info, the discovered shapefile list and
/// the final verdict block. Verdict wording lives here on purpose; the core
/// report never states pass/fail.
fn compose_report(filename: &str, size: u64, run: &ValidationRun, summary: &str) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!("Processing file: {filename}"));
    sections.push(format!("File size: {size} bytes"));
    sections.push(String::new());

    if run.shapefiles().is_empty() {
        sections.push("No shapefiles found in ZIP archive".to_string());
    } else {
        sections.push(format!("Found {} shapefile(s):", run.shapefiles().len()));
        for shapefile in run.shapefiles() {
            sections.push(format!("  - {shapefile}"));
        }
    }
    sections.push(String::new());

    let core_report = run.report();
    if !core_report.trim().is_empty() {
        sections.push(core_report);
        sections.push(String::new());
    }

    sections.push("=".repeat(50));
    sections.push("FINAL RESULT".to_string());
    sections.push("=".repeat(50));
    if run.is_valid() {
        sections.push(format!("VALIDATION PASSED for {filename}"));
    } else {
        sections.push(format!("VALIDATION FAILED for {filename}"));
    }
    sections.push(String::new());
    sections.push(summary.to_string());

    sections.join("\n")
}

fn rejection(status: StatusCode, error: &str, report: &str, summary: &str) -> Response {
    (status, Json(ValidationResponse::rejected(error, report, summary))).into_response()
}

fn processing_error(filename: &str, error: &AppError) -> Response {
    let message = format!("Processing error: {}", error.message());
    let mut response = ValidationResponse::rejected(
        &message,
        &format!(
            "ERROR: An error occurred while processing the file: {}",
            error.message()
        ),
        "File processing failed due to an internal error.",
    );
    response.filename = Some(filename.to_string());
    (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
}
