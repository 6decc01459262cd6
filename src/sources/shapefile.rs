// src/sources/shapefile.rs

//! Shapefile and dBase loaders.

use std::path::Path;

use crate::errors::Result;
use crate::formats::shapefile::{read_dbf, read_shapefile, sidecar_encoding};
use crate::formats::TextEncoding;
use crate::layer::{Feature, Field, MemoryLayer};

/// Load a shapefile. Text is decoded with the `.cpg` encoding when one is
/// present, else with `fallback`.
pub fn load_shapefile(path: &Path, fallback: TextEncoding) -> Result<MemoryLayer> {
    let encoding = sidecar_encoding(path).unwrap_or(fallback);
    let contents = read_shapefile(path, encoding)?;

    let fields: Vec<Field> = contents.table.fields.iter().map(|f| f.to_field()).collect();
    let features = contents
        .shapes
        .into_iter()
        .zip(contents.table.records)
        .enumerate()
        .map(|(id, (geometry, attributes))| Feature::new(id as u64, geometry, attributes))
        .collect();

    Ok(MemoryLayer::new(
        path.to_string_lossy().into_owned(),
        contents.shape_type.geometry_type(),
        contents.crs,
        fields,
    )
    .with_features(features))
}

/// Load a standalone `.dbf` as an attribute-only table.
pub fn load_dbf(path: &Path, fallback: TextEncoding) -> Result<MemoryLayer> {
    let encoding = sidecar_encoding(path).unwrap_or(fallback);
    let table = read_dbf(path, encoding)?;

    let fields: Vec<Field> = table.fields.iter().map(|f| f.to_field()).collect();
    let features = table
        .records
        .into_iter()
        .enumerate()
        .map(|(id, attributes)| Feature::new(id as u64, None, attributes))
        .collect();

    Ok(MemoryLayer::table(path.to_string_lossy().into_owned(), fields).with_features(features))
}
