use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use chrono::Utc;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AppError, Result};

/// Uploads older than this are swept before each validation.
const STALE_AGE_SECS: u64 = 3600;

/// Persists uploaded archives under the configured directory, enforces the
/// size cap while streaming, and sweeps stale leftovers.
#[derive(Debug, Clone)]
pub struct UploadService {
    upload_dir: PathBuf,
    max_size: u64,
    max_size_label: String,
}

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl UploadService {
    pub fn new(upload_dir: PathBuf, max_size: u64, max_size_label: String) -> Self {
        Self {
            upload_dir,
            max_size,
            max_size_label,
        }
    }

    /// Streams one multipart field to disk under a unique name. The partial
    /// file is removed when the size cap is hit or a chunk fails.
    pub async fn save_upload(&self, field: &mut Field<'_>, safe_name: &str) -> Result<StoredUpload> {
        fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create upload directory: {e}")))?;

        let unique_name = unique_name(safe_name);
        let path = self.upload_dir.join(&unique_name);
        let mut file = BufWriter::new(
            fs::File::create(&path)
                .await
                .map_err(|e| AppError::Io(format!("Failed to create upload file: {e}")))?,
        );

        let mut size: u64 = 0;
        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    drop(file);
                    let _ = fs::remove_file(&path).await;
                    return Err(AppError::Upload(format!("Failed to read uploaded file: {e}")));
                }
            };

            size = size.saturating_add(chunk.len() as u64);
            if size > self.max_size {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(AppError::TooLarge(format!(
                    "File size exceeds the {} limit",
                    self.max_size_label
                )));
            }

            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(AppError::Io(format!("Failed to write upload: {e}")));
            }
        }

        file.flush()
            .await
            .map_err(|e| AppError::Io(format!("Failed to flush upload: {e}")))?;

        info!("File uploaded: {unique_name} ({size} bytes)");
        Ok(StoredUpload {
            path,
            file_name: unique_name,
            size,
        })
    }

    /// Removes the stored archive once validation is finished.
    pub async fn remove(&self, upload: &StoredUpload) {
        match fs::remove_file(&upload.path).await {
            Ok(()) => info!("Cleaned up uploaded file: {}", upload.file_name),
            Err(e) => warn!("Failed to clean up file {}: {e}", upload.file_name),
        }
    }

    /// Deletes uploads older than one hour. Sweep problems are logged, never
    /// surfaced to the submitter.
    pub async fn cleanup_stale(&self) {
        let mut entries = match fs::read_dir(&self.upload_dir).await {
            Ok(entries) => entries,
            Err(_) => return, // nothing uploaded yet
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(age) = file_age_secs(&path) {
                if age > STALE_AGE_SECS {
                    match fs::remove_file(&path).await {
                        Ok(()) => info!("Cleaned up old file: {}", path.display()),
                        Err(e) => warn!("Error during cleanup of {}: {e}", path.display()),
                    }
                }
            }
        }
    }
}

fn file_age_secs(path: &Path) -> Option<u64> {
    let modified = path.metadata().ok()?.modified().ok()?;
    modified.elapsed().ok().map(|age| age.as_secs())
}

/// Timestamp plus a short random tag keeps concurrent uploads of the same
/// file name apart.
fn unique_name(safe_name: &str) -> String {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let tag = Uuid::new_v4().simple().to_string();
    format!("{stamp}_{}_{safe_name}", &tag[..8])
}
