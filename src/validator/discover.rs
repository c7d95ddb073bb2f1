/// Groups archive entry names into shapefile identities.
///
/// An identity is the entry path with the `.shp` suffix stripped; entries
/// nested under sub-paths keep their full relative path, so two shapefiles
/// with the same leaf name in different folders stay distinct. Order follows
/// discovery order and duplicates are preserved.
pub fn find_shapefiles(entry_names: &[String]) -> Vec<String> {
    entry_names
        .iter()
        .filter_map(|name| strip_shp_suffix(name))
        .map(str::to_string)
        .collect()
}

fn strip_shp_suffix(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(4)?;
    let base = name.get(..split)?;
    let suffix = name.get(split..)?;
    suffix.eq_ignore_ascii_case(".shp").then_some(base)
}
