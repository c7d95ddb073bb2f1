pub mod error;
pub use error::{AppError, Result};

use serde::{Deserialize, Serialize};

/// Body of every `POST /validate` response, success or rejection.
///
/// The `valid` flag is the orchestrator's verdict; `report` carries the full
/// diagnostic trail including the transport's final PASSED/FAILED wording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub report: String,
    pub shapefiles: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub summary: String,
}

impl ValidationResponse {
    /// Response for requests rejected before any validation ran.
    pub fn rejected(error: &str, report: &str, summary: &str) -> Self {
        Self {
            valid: false,
            error: Some(error.to_string()),
            report: report.to_string(),
            shapefiles: Vec::new(),
            errors: vec![error.to_string()],
            warnings: Vec::new(),
            filename: None,
            summary: summary.to_string(),
        }
    }
}
