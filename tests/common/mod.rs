#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

// Shape type codes from the shapefile specification.
pub const POINT: i32 = 1;
pub const POLYGON: i32 = 5;
pub const POINT_Z: i32 = 11;
pub const POLYLINE_Z: i32 = 13;
pub const POINT_M: i32 = 21;

pub const WGS84_WKT: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]]"#;

pub const WEB_MERCATOR_WKT: &str = r#"PROJCS["WGS 84 / Pseudo-Mercator",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]],PROJECTION["Mercator_1SP"],PARAMETER["central_meridian",0],PARAMETER["scale_factor",1],PARAMETER["false_easting",0],PARAMETER["false_northing",0],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AXIS["Easting",EAST],AXIS["Northing",NORTH],AUTHORITY["EPSG","3857"]]"#;

/// Minimal valid `.shp`/`.shx` file: the 100-byte header alone, with the
/// given shape type and bounding box (xmin, ymin, xmax, ymax).
pub fn shp_header(shape_type: i32, bbox: [f64; 4]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(100);
    buf.extend_from_slice(&9994i32.to_be_bytes()); // file code
    buf.extend_from_slice(&[0u8; 20]); // reserved
    buf.extend_from_slice(&50i32.to_be_bytes()); // length in 16-bit words
    buf.extend_from_slice(&1000i32.to_le_bytes()); // version
    buf.extend_from_slice(&shape_type.to_le_bytes());
    for value in [bbox[0], bbox[1], bbox[2], bbox[3], 0.0, 0.0, 0.0, 0.0] {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    buf
}

/// Writes a ZIP archive containing the given entries.
pub fn build_zip(dir: &Path, name: &str, entries: &[(&str, Vec<u8>)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create zip");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (entry_name, bytes) in entries {
        zip.start_file(*entry_name, options).expect("start entry");
        zip.write_all(bytes).expect("write entry");
    }

    zip.finish().expect("finish zip");
    path
}

/// The four required sidecars for one shapefile identity, with the given
/// shape type, bounding box and projection definition.
pub fn shapefile_entries(
    identity: &str,
    shape_type: i32,
    bbox: [f64; 4],
    wkt: &str,
) -> Vec<(String, Vec<u8>)> {
    let header = shp_header(shape_type, bbox);
    vec![
        (format!("{identity}.shp"), header.clone()),
        (format!("{identity}.shx"), header),
        (format!("{identity}.dbf"), b"not a real table".to_vec()),
        (format!("{identity}.prj"), wkt.as_bytes().to_vec()),
    ]
}

/// `build_zip` for owned entry names.
pub fn build_zip_owned(dir: &Path, name: &str, entries: &[(String, Vec<u8>)]) -> PathBuf {
    let borrowed: Vec<(&str, Vec<u8>)> = entries
        .iter()
        .map(|(name, bytes)| (name.as_str(), bytes.clone()))
        .collect();
    build_zip(dir, name, &borrowed)
}
