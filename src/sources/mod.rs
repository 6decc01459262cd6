// src/sources/mod.rs

//! Open file-based layers by extension.
//!
//! These stand in for the host application's providers when the crate runs
//! on its own: everything loads into a [`MemoryLayer`].

pub mod csv_table;
pub mod geojson;
pub mod shapefile;

use std::path::Path;

use tracing::debug;

use crate::errors::{BridgeError, Result};
use crate::formats::TextEncoding;
use crate::layer::{MemoryLayer, RasterFile};
use crate::paths::has_extension;

/// Open a vector layer or table from `.shp`, `.dbf`, `.csv`, `.geojson`
/// or `.json`.
pub fn open_vector(path: &Path, encoding: TextEncoding) -> Result<MemoryLayer> {
    let name = path.to_string_lossy();
    let layer = if has_extension(&name, ".shp") {
        shapefile::load_shapefile(path, encoding)?
    } else if has_extension(&name, ".dbf") {
        shapefile::load_dbf(path, encoding)?
    } else if has_extension(&name, ".csv") {
        csv_table::load(path)?
    } else if has_extension(&name, ".geojson") || has_extension(&name, ".json") {
        geojson::load(path)?
    } else {
        return Err(BridgeError::unsupported_format(path));
    };
    debug!(path = ?path, features = layer.feature_count(), "opened vector source");
    Ok(layer)
}

/// Rasters are only ever referenced by path.
pub fn open_raster(path: &Path) -> RasterFile {
    RasterFile::new(path.to_string_lossy().into_owned())
}
