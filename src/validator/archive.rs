use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use super::ValidationFailure;
use crate::models::{AppError, Result};

/// Opens the ZIP container and returns its file entry names in archive
/// order. Container problems are reported as validation failures; the
/// archive content itself is not inspected here.
pub fn list_entries(zip_path: &Path) -> std::result::Result<Vec<String>, ValidationFailure> {
    let display = zip_path.display().to_string();
    let file = File::open(zip_path)
        .map_err(|e| ValidationFailure::CorruptArchive(format!("{display}: {e}")))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| match e {
        ZipError::Io(err) => ValidationFailure::CorruptArchive(format!("{display}: {err}")),
        _ => ValidationFailure::NotAZipArchive(display.clone()),
    })?;

    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| ValidationFailure::CorruptArchive(format!("{display}: {e}")))?;
        if entry.is_file() {
            names.push(entry.name().to_string());
        }
    }

    Ok(names)
}

/// Extracts every entry into `destination`. The caller owns the destination
/// directory and its removal; extraction faults propagate as hard errors
/// rather than report entries.
pub fn extract_all(zip_path: &Path, destination: &Path) -> Result<()> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| AppError::Archive(format!("Failed to reopen archive: {e}")))?;
    archive
        .extract(destination)
        .map_err(|e| AppError::Archive(format!("Failed to extract ZIP: {e}")))
}

/// Recursively lists the files under `dir`.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).map_err(|e| AppError::Io(format!("Failed to read directory: {e}")))?;

    for entry in entries {
        let entry = entry.map_err(|e| AppError::Io(format!("Failed to read entry: {e}")))?;
        let path = entry.path();
        if path.is_dir() {
            files.extend(collect_files(&path)?);
        } else {
            files.push(path);
        }
    }

    Ok(files)
}
