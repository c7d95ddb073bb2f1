use std::fs;
use std::path::Path;

use shapefile::{ShapeReader, ShapeType};

use super::ValidationFailure;

pub const WGS84_EPSG: &str = "4326";

/// Spatial reference read from a `.prj` sidecar.
#[derive(Debug, Clone)]
pub struct CrsInfo {
    /// Geographic coordinate system label from the WKT, `Unknown` when the
    /// definition carries none.
    pub name: String,
    /// Top-level authority code (e.g. `4326`), if the WKT declares one.
    pub code: Option<String>,
}

/// Declared geometry type of a shapefile dataset.
#[derive(Debug, Clone, Copy)]
pub struct GeometryInfo {
    pub type_name: &'static str,
    pub has_z: bool,
    pub has_m: bool,
}

/// Bounding extent from the shapefile header.
#[derive(Debug, Clone, Copy)]
pub struct Extent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Reads the spatial reference from the `.prj` sidecar. An unreadable or
/// empty definition counts as having no spatial reference at all.
pub fn read_crs(prj_path: &Path) -> Result<CrsInfo, ValidationFailure> {
    let wkt =
        fs::read_to_string(prj_path).map_err(|_| ValidationFailure::NoSpatialReference)?;
    if wkt.trim().is_empty() {
        return Err(ValidationFailure::NoSpatialReference);
    }

    Ok(CrsInfo {
        name: geogcs_name(&wkt).unwrap_or_else(|| "Unknown".to_string()),
        code: authority_code(&wkt),
    })
}

fn authority_code(wkt: &str) -> Option<String> {
    let re = regex::Regex::new(r#"(?i)AUTHORITY\["(EPSG|ESRI)",\s*"?(\d+)"?\]"#).unwrap();
    // WKT nests AUTHORITY entries for datum, prime meridian and units; the
    // last one belongs to the coordinate system itself.
    re.captures_iter(wkt).last().map(|caps| caps[2].to_string())
}

fn geogcs_name(wkt: &str) -> Option<String> {
    let re = regex::Regex::new(r#"(?i)GEOGCS\["([^"]+)""#).unwrap();
    re.captures(wkt).map(|caps| caps[1].to_string())
}

/// Opens the dataset read-only and derives the Z/M dimensionality flags from
/// its declared shape type. The handle is released when the reader drops.
pub fn read_geometry(shp_path: &Path) -> Result<GeometryInfo, ValidationFailure> {
    let reader = open_dataset(shp_path)?;
    let shape_type = reader.header().shape_type;

    Ok(GeometryInfo {
        type_name: shape_type_label(shape_type),
        has_z: has_z_dimension(shape_type),
        has_m: has_m_dimension(shape_type),
    })
}

/// Opens the dataset read-only and reads its bounding extent.
pub fn read_extent(shp_path: &Path) -> Result<Extent, ValidationFailure> {
    let reader = open_dataset(shp_path)?;
    let bbox = &reader.header().bbox;

    Ok(Extent {
        min_x: bbox.min.x,
        max_x: bbox.max.x,
        min_y: bbox.min.y,
        max_y: bbox.max.y,
    })
}

fn open_dataset(
    shp_path: &Path,
) -> Result<ShapeReader<std::io::BufReader<std::fs::File>>, ValidationFailure> {
    ShapeReader::from_path(shp_path).map_err(|e| {
        ValidationFailure::UnreadableDataset(format!("{}: {e}", shp_path.display()))
    })
}

fn has_z_dimension(shape_type: ShapeType) -> bool {
    matches!(
        shape_type,
        ShapeType::PointZ
            | ShapeType::PolylineZ
            | ShapeType::PolygonZ
            | ShapeType::MultipointZ
            | ShapeType::Multipatch
    )
}

fn has_m_dimension(shape_type: ShapeType) -> bool {
    matches!(
        shape_type,
        ShapeType::PointM | ShapeType::PolylineM | ShapeType::PolygonM | ShapeType::MultipointM
    )
}

fn shape_type_label(shape_type: ShapeType) -> &'static str {
    match shape_type {
        ShapeType::NullShape => "Null",
        ShapeType::Point => "Point",
        ShapeType::Polyline => "PolyLine",
        ShapeType::Polygon => "Polygon",
        ShapeType::Multipoint => "MultiPoint",
        ShapeType::PointZ => "PointZ",
        ShapeType::PolylineZ => "PolyLineZ",
        ShapeType::PolygonZ => "PolygonZ",
        ShapeType::MultipointZ => "MultiPointZ",
        ShapeType::PointM => "PointM",
        ShapeType::PolylineM => "PolyLineM",
        ShapeType::PolygonM => "PolygonM",
        ShapeType::MultipointM => "MultiPointM",
        ShapeType::Multipatch => "MultiPatch",
    }
}
