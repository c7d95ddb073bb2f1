pub mod archive;
pub mod discover;
pub mod inspect;
pub mod report;

pub use report::ValidationRun;

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AppError, Result};

/// Sidecar extensions every shapefile must ship with. Ancillary sidecars
/// (.cpg, .sbn, ...) are neither required nor reported.
pub const REQUIRED_EXTENSIONS: [&str; 4] = ["shp", "shx", "dbf", "prj"];

/// One failure kind per policy violation; rendered to text only at the
/// reporting boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationFailure {
    #[error("File not found: {0}")]
    ArchiveNotFound(String),

    #[error("File is not a valid ZIP archive: {0}")]
    NotAZipArchive(String),

    #[error("Unable to read ZIP archive: {0}")]
    CorruptArchive(String),

    #[error("No shapefiles found in ZIP archive")]
    NoShapefilesFound,

    #[error("{identity}: Missing required files: {}", .missing.join(", "))]
    MissingRequiredFiles {
        identity: String,
        missing: Vec<String>,
    },

    #[error("No spatial reference system found")]
    NoSpatialReference,

    #[error("Coordinate system is not WGS84. Found: {name} (EPSG:{code})")]
    NotWgs84 { name: String, code: String },

    #[error("3D geometry (Z values) detected: {0}")]
    ZDimension(String),

    #[error("Measured geometry (M values) detected: {0}")]
    MDimension(String),

    #[error("Longitude values outside valid range: {min:.6} to {max:.6}")]
    LongitudeOutOfRange { min: f64, max: f64 },

    #[error("Latitude values outside valid range: {min:.6} to {max:.6}")]
    LatitudeOutOfRange { min: f64, max: f64 },

    #[error("Cannot open shapefile: {0}")]
    UnreadableDataset(String),
}

/// Drives the whole pipeline for one archive: container inspection,
/// shapefile discovery, the per-shapefile check sequence, and the verdict.
#[derive(Debug, Clone, Default)]
pub struct ShapefileValidator;

struct SidecarSet {
    shp: PathBuf,
    prj: PathBuf,
}

impl ShapefileValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates one ZIP archive and returns the run's accumulated state.
    ///
    /// Bad input (missing file, not a ZIP, corrupt container, no shapefiles)
    /// is absorbed into the run as a single failure with an empty identity
    /// list. Only faults while setting up or filling the transient
    /// extraction directory surface as `Err`; the directory itself is
    /// removed on every exit path when its guard drops.
    pub fn validate(&self, zip_path: &Path) -> Result<ValidationRun> {
        let mut run = ValidationRun::new();

        if !zip_path.exists() {
            run.push_failure(ValidationFailure::ArchiveNotFound(
                zip_path.display().to_string(),
            ));
            return Ok(run);
        }

        let entries = match archive::list_entries(zip_path) {
            Ok(entries) => entries,
            Err(failure) => {
                run.push_failure(failure);
                return Ok(run);
            }
        };

        let identities = discover::find_shapefiles(&entries);
        if identities.is_empty() {
            run.push_failure(ValidationFailure::NoShapefilesFound);
            return Ok(run);
        }

        info!(
            "Discovered {} shapefile(s) in {}",
            identities.len(),
            zip_path.display()
        );

        let workspace = TempDir::new()
            .map_err(|e| AppError::Io(format!("Failed to create extraction directory: {e}")))?;
        archive::extract_all(zip_path, workspace.path())?;
        let extracted = archive::collect_files(workspace.path())?;

        let mut all_valid = true;
        for identity in &identities {
            if !self.validate_shapefile(&mut run, workspace.path(), &extracted, identity) {
                all_valid = false;
            }
        }

        run.set_shapefiles(identities);
        run.set_valid(all_valid);
        Ok(run)
    }

    fn validate_shapefile(
        &self,
        run: &mut ValidationRun,
        root: &Path,
        extracted: &[PathBuf],
        identity: &str,
    ) -> bool {
        run.push_detail(format!("--- Validating: {identity} ---"));

        // Gate: without the full sidecar set the remaining checks would
        // inspect an incomplete dataset, so they are skipped, not failed.
        let sidecars = match self.check_required_files(run, root, extracted, identity) {
            Some(sidecars) => sidecars,
            None => return false,
        };

        // The three downstream checks run unconditionally so one report
        // carries every finding.
        let crs_ok = self.check_coordinate_system(run, &sidecars.prj);
        let geometry_ok = self.check_geometry_type(run, &sidecars.shp);
        let range_ok = self.check_coordinate_range(run, &sidecars.shp);

        crs_ok && geometry_ok && range_ok
    }

    fn check_required_files(
        &self,
        run: &mut ValidationRun,
        root: &Path,
        extracted: &[PathBuf],
        identity: &str,
    ) -> Option<SidecarSet> {
        let mut missing = Vec::new();
        let mut shp = None;
        let mut prj = None;

        for ext in REQUIRED_EXTENSIONS {
            match find_sidecar(root, extracted, identity, ext) {
                Some(path) => match ext {
                    "shp" => shp = Some(path),
                    "prj" => prj = Some(path),
                    _ => {}
                },
                None => missing.push(format!(".{ext}")),
            }
        }

        if !missing.is_empty() {
            debug!("{identity}: missing sidecars {:?}", missing);
            run.push_failure(ValidationFailure::MissingRequiredFiles {
                identity: identity.to_string(),
                missing,
            });
            return None;
        }

        run.push_detail("✓ All required files present (.shp, .shx, .dbf, .prj)");
        // Both lookups succeeded when nothing is missing.
        Some(SidecarSet {
            shp: shp?,
            prj: prj?,
        })
    }

    fn check_coordinate_system(&self, run: &mut ValidationRun, prj_path: &Path) -> bool {
        match inspect::read_crs(prj_path) {
            Ok(crs) => {
                if crs.code.as_deref() == Some(inspect::WGS84_EPSG) {
                    run.push_detail(format!(
                        "✓ Coordinate system is WGS84 (EPSG:{})",
                        inspect::WGS84_EPSG
                    ));
                    true
                } else {
                    run.push_failure(ValidationFailure::NotWgs84 {
                        name: crs.name,
                        code: crs.code.unwrap_or_else(|| "Unknown".to_string()),
                    });
                    false
                }
            }
            Err(failure) => {
                run.push_failure(failure);
                false
            }
        }
    }

    fn check_geometry_type(&self, run: &mut ValidationRun, shp_path: &Path) -> bool {
        match inspect::read_geometry(shp_path) {
            Ok(geometry) => {
                // Z takes precedence over M; a dataset with both reports
                // only the Z failure.
                if geometry.has_z {
                    run.push_failure(ValidationFailure::ZDimension(
                        geometry.type_name.to_string(),
                    ));
                    false
                } else if geometry.has_m {
                    run.push_failure(ValidationFailure::MDimension(
                        geometry.type_name.to_string(),
                    ));
                    false
                } else {
                    run.push_detail(format!(
                        "✓ Geometry type is valid: {}",
                        geometry.type_name
                    ));
                    true
                }
            }
            Err(failure) => {
                run.push_failure(failure);
                false
            }
        }
    }

    fn check_coordinate_range(&self, run: &mut ValidationRun, shp_path: &Path) -> bool {
        let extent = match inspect::read_extent(shp_path) {
            Ok(extent) => extent,
            Err(failure) => {
                run.push_failure(failure);
                return false;
            }
        };

        let lon_range = -180.0..=180.0;
        let lat_range = -90.0..=90.0;

        if !lon_range.contains(&extent.min_x) || !lon_range.contains(&extent.max_x) {
            run.push_failure(ValidationFailure::LongitudeOutOfRange {
                min: extent.min_x,
                max: extent.max_x,
            });
            false
        } else if !lat_range.contains(&extent.min_y) || !lat_range.contains(&extent.max_y) {
            run.push_failure(ValidationFailure::LatitudeOutOfRange {
                min: extent.min_y,
                max: extent.max_y,
            });
            false
        } else {
            run.push_detail(format!(
                "✓ Coordinates are in decimal degrees (Extent: {:.6}, {:.6}, {:.6}, {:.6})",
                extent.min_x, extent.min_y, extent.max_x, extent.max_y
            ));
            true
        }
    }
}

/// Looks up `<identity>.<ext>` in the extraction directory, matching the
/// archive-relative path case-insensitively.
fn find_sidecar(
    root: &Path,
    extracted: &[PathBuf],
    identity: &str,
    ext: &str,
) -> Option<PathBuf> {
    let target = format!("{identity}.{ext}");
    extracted
        .iter()
        .find(|path| {
            path.strip_prefix(root)
                .ok()
                .map(|rel| rel.to_string_lossy().replace('\\', "/"))
                .is_some_and(|rel| rel.eq_ignore_ascii_case(&target))
        })
        .cloned()
}
