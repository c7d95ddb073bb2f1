mod common;

use common::*;
use shapecheck::validator::{ShapefileValidator, ValidationFailure};
use tempfile::TempDir;

const GOOD_BBOX: [f64; 4] = [-10.0, 10.0, -5.0, 45.0];

#[test]
fn archive_without_shapefiles_fails_discovery() {
    let dir = TempDir::new().expect("temp dir");
    let zip = build_zip(
        dir.path(),
        "empty.zip",
        &[("readme.txt", b"nothing spatial here".to_vec())],
    );

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(!run.is_valid());
    assert!(run.shapefiles().is_empty());
    assert_eq!(run.failures(), &[ValidationFailure::NoShapefilesFound]);
}

#[test]
fn non_zip_input_is_rejected_without_checks() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("bogus.zip");
    std::fs::write(&path, b"this is not a zip archive").expect("write");

    let run = ShapefileValidator::new().validate(&path).expect("run");

    assert!(!run.is_valid());
    assert!(run.shapefiles().is_empty());
    assert_eq!(run.failures().len(), 1);
    assert!(matches!(
        run.failures()[0],
        ValidationFailure::NotAZipArchive(_)
    ));
    assert!(run.details().is_empty());
}

#[test]
fn missing_sidecars_reported_once_and_downstream_checks_skipped() {
    let dir = TempDir::new().expect("temp dir");
    let header = shp_header(POINT, GOOD_BBOX);
    let zip = build_zip(
        dir.path(),
        "partial.zip",
        &[
            ("roads.shp", header.clone()),
            ("roads.shx", header),
            // .dbf and .prj deliberately absent
        ],
    );

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(!run.is_valid());
    assert_eq!(run.shapefiles(), &["roads".to_string()]);
    assert_eq!(
        run.failures(),
        &[ValidationFailure::MissingRequiredFiles {
            identity: "roads".to_string(),
            missing: vec![".dbf".to_string(), ".prj".to_string()],
        }]
    );
    // The CRS, geometry and range checks never ran: no details beyond the
    // per-shapefile banner.
    assert_eq!(run.details(), &["--- Validating: roads ---".to_string()]);
}

#[test]
fn downstream_checks_all_run_even_when_several_fail() {
    let dir = TempDir::new().expect("temp dir");
    // Wrong CRS, Z geometry and projected-range coordinates at once.
    let entries = shapefile_entries(
        "towers",
        POINT_Z,
        [-20037508.34, -20037508.34, 20037508.34, 20037508.34],
        WEB_MERCATOR_WKT,
    );
    let zip = build_zip_owned(dir.path(), "towers.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(!run.is_valid());
    assert_eq!(run.failures().len(), 3);
    assert!(matches!(
        run.failures()[0],
        ValidationFailure::NotWgs84 { .. }
    ));
    assert!(matches!(run.failures()[1], ValidationFailure::ZDimension(_)));
    assert!(matches!(
        run.failures()[2],
        ValidationFailure::LongitudeOutOfRange { .. }
    ));
}

#[test]
fn wrong_crs_names_detected_system() {
    let dir = TempDir::new().expect("temp dir");
    let entries = shapefile_entries("parcels", POLYGON, GOOD_BBOX, WEB_MERCATOR_WKT);
    let zip = build_zip_owned(dir.path(), "parcels.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(!run.is_valid());
    assert_eq!(
        run.failures(),
        &[ValidationFailure::NotWgs84 {
            name: "WGS 84".to_string(),
            code: "3857".to_string(),
        }]
    );
    assert!(run
        .errors()
        .iter()
        .any(|e| e.contains("WGS 84") && e.contains("3857")));
}

#[test]
fn prj_without_authority_reports_unknown_code() {
    let dir = TempDir::new().expect("temp dir");
    let entries = shapefile_entries(
        "sites",
        POINT,
        GOOD_BBOX,
        r#"GEOGCS["Custom Geographic",DATUM["Custom"]]"#,
    );
    let zip = build_zip_owned(dir.path(), "sites.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert_eq!(
        run.failures(),
        &[ValidationFailure::NotWgs84 {
            name: "Custom Geographic".to_string(),
            code: "Unknown".to_string(),
        }]
    );
}

#[test]
fn z_geometry_fails_with_z_specific_error() {
    let dir = TempDir::new().expect("temp dir");
    let entries = shapefile_entries("contours", POLYLINE_Z, GOOD_BBOX, WGS84_WKT);
    let zip = build_zip_owned(dir.path(), "contours.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert_eq!(
        run.failures(),
        &[ValidationFailure::ZDimension("PolyLineZ".to_string())]
    );
}

#[test]
fn m_only_geometry_fails_with_m_specific_error() {
    let dir = TempDir::new().expect("temp dir");
    let entries = shapefile_entries("routes", POINT_M, GOOD_BBOX, WGS84_WKT);
    let zip = build_zip_owned(dir.path(), "routes.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert_eq!(
        run.failures(),
        &[ValidationFailure::MDimension("PointM".to_string())]
    );
}

#[test]
fn longitude_out_of_range_fails() {
    let dir = TempDir::new().expect("temp dir");
    let entries = shapefile_entries("west", POINT, [-200.0, 10.0, -10.0, 10.0], WGS84_WKT);
    let zip = build_zip_owned(dir.path(), "west.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert_eq!(
        run.failures(),
        &[ValidationFailure::LongitudeOutOfRange {
            min: -200.0,
            max: -10.0,
        }]
    );
}

#[test]
fn latitude_out_of_range_fails() {
    let dir = TempDir::new().expect("temp dir");
    let entries = shapefile_entries("south", POINT, [10.0, -100.0, 10.0, 50.0], WGS84_WKT);
    let zip = build_zip_owned(dir.path(), "south.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert_eq!(
        run.failures(),
        &[ValidationFailure::LatitudeOutOfRange {
            min: -100.0,
            max: 50.0,
        }]
    );
}

#[test]
fn conforming_shapefile_passes_all_checks() {
    let dir = TempDir::new().expect("temp dir");
    let entries = shapefile_entries("districts", POLYGON, GOOD_BBOX, WGS84_WKT);
    let zip = build_zip_owned(dir.path(), "districts.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(run.is_valid());
    assert_eq!(run.shapefiles(), &["districts".to_string()]);
    assert!(run.failures().is_empty());
    assert!(run.warnings().is_empty());

    let report = run.report();
    assert!(report.contains("✓ All required files present (.shp, .shx, .dbf, .prj)"));
    assert!(report.contains("✓ Coordinate system is WGS84 (EPSG:4326)"));
    assert!(report.contains("✓ Geometry type is valid: Polygon"));
    assert!(report.contains(
        "✓ Coordinates are in decimal degrees (Extent: -10.000000, 10.000000, -5.000000, 45.000000)"
    ));
    assert!(report.ends_with("All validation checks completed successfully."));
}

#[test]
fn nested_identities_stay_distinct() {
    let dir = TempDir::new().expect("temp dir");
    let mut entries = shapefile_entries("north/roads", POINT, GOOD_BBOX, WGS84_WKT);
    entries.extend(shapefile_entries("south/roads", POINT, GOOD_BBOX, WGS84_WKT));
    let zip = build_zip_owned(dir.path(), "regions.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(run.is_valid());
    assert_eq!(
        run.shapefiles(),
        &["north/roads".to_string(), "south/roads".to_string()]
    );
}

#[test]
fn overall_verdict_is_and_of_individual_verdicts() {
    let dir = TempDir::new().expect("temp dir");
    let mut entries = shapefile_entries("a", POINT, GOOD_BBOX, WGS84_WKT);
    entries.extend(shapefile_entries("b", POINT, GOOD_BBOX, WGS84_WKT));
    entries.extend(shapefile_entries("c", POINT, GOOD_BBOX, WGS84_WKT));
    // A fourth shapefile missing its .prj sinks the whole archive.
    let header = shp_header(POINT, GOOD_BBOX);
    entries.push(("d.shp".to_string(), header.clone()));
    entries.push(("d.shx".to_string(), header));
    entries.push(("d.dbf".to_string(), b"table".to_vec()));
    let zip = build_zip_owned(dir.path(), "mixed.zip", &entries);

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(!run.is_valid());
    assert_eq!(run.shapefiles().len(), 4);
    assert_eq!(
        run.failures(),
        &[ValidationFailure::MissingRequiredFiles {
            identity: "d".to_string(),
            missing: vec![".prj".to_string()],
        }]
    );
}

#[test]
fn validation_is_idempotent_across_fresh_instances() {
    let dir = TempDir::new().expect("temp dir");
    let entries = shapefile_entries("stable", POLYGON, GOOD_BBOX, WGS84_WKT);
    let zip = build_zip_owned(dir.path(), "stable.zip", &entries);

    let first = ShapefileValidator::new().validate(&zip).expect("first run");
    let second = ShapefileValidator::new().validate(&zip).expect("second run");

    assert_eq!(first.is_valid(), second.is_valid());
    assert_eq!(first.shapefiles(), second.shapefiles());
    assert_eq!(first.report(), second.report());
}

#[test]
fn sequential_runs_share_no_state() {
    let dir = TempDir::new().expect("temp dir");
    let failing = build_zip(
        dir.path(),
        "failing.zip",
        &[("orphan.shp", shp_header(POINT, GOOD_BBOX))],
    );
    let passing_entries = shapefile_entries("clean", POINT, GOOD_BBOX, WGS84_WKT);
    let passing = build_zip_owned(dir.path(), "passing.zip", &passing_entries);

    let validator = ShapefileValidator::new();

    let first = validator.validate(&failing).expect("first run");
    assert!(!first.is_valid());
    assert!(!first.failures().is_empty());

    let second = validator.validate(&passing).expect("second run");
    assert!(second.is_valid());
    assert!(second.failures().is_empty());
    assert!(!second
        .details()
        .iter()
        .any(|line| line.contains("orphan")));
}

#[test]
fn uppercase_sidecar_names_satisfy_required_files() {
    let dir = TempDir::new().expect("temp dir");
    let header = shp_header(POINT, GOOD_BBOX);
    let zip = build_zip(
        dir.path(),
        "upper.zip",
        &[
            ("coast.shp", header.clone()),
            ("coast.shx", header),
            ("coast.DBF", b"table".to_vec()),
            ("coast.PRJ", WGS84_WKT.as_bytes().to_vec()),
        ],
    );

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(run.is_valid(), "errors: {:?}", run.errors());
}

#[test]
fn unreadable_dataset_is_a_check_failure_not_a_crash() {
    let dir = TempDir::new().expect("temp dir");
    let zip = build_zip(
        dir.path(),
        "garbage.zip",
        &[
            ("junk.shp", b"not a shapefile at all".to_vec()),
            ("junk.shx", b"not an index".to_vec()),
            ("junk.dbf", b"not a table".to_vec()),
            ("junk.prj", WGS84_WKT.as_bytes().to_vec()),
        ],
    );

    let run = ShapefileValidator::new().validate(&zip).expect("run");

    assert!(!run.is_valid());
    // CRS check still passes off the .prj; both dataset-backed checks fail.
    assert_eq!(run.failures().len(), 2);
    assert!(run
        .failures()
        .iter()
        .all(|f| matches!(f, ValidationFailure::UnreadableDataset(_))));
}
