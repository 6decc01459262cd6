// src/export/raster.rs

//! Raster layers.
//!
//! The external tools read rasters through GDAL, so any source GDAL opens
//! natively is returned untouched. Sources outside that list are returned
//! untouched too: converting them is not implemented, and callers get a
//! warning instead of a converted copy.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::export::LayerExporter;
use crate::layer::RasterLayer;
use crate::paths::has_extension;

/// Extensions of raster formats GDAL reads without conversion.
///
/// A fixed list drawn from GDAL's common raster drivers. The drivers of the
/// installed GDAL are not queried, so a format missing here only costs a
/// warning: the source is still returned unchanged.
pub const GDAL_RASTER_EXTENSIONS: &[&str] = &[
    "tif", "tiff", "asc", "sdat", "sgrd", "img", "vrt", "png", "jpg", "jpeg", "jp2", "bmp",
    "gif", "nc", "hdf", "h5", "grd", "dem", "ecw", "sid", "adf", "bil", "bip", "bsq", "xyz",
    "rst", "hgt", "ntf", "pix", "mpr", "kap", "ter", "bt", "dt0", "dt1", "dt2", "gsb",
    "gtx", "ers", "hdr", "lan", "gen", "blx", "mbtiles", "gpkg",
];

impl LayerExporter<'_> {
    /// Return a GDAL-readable path for `layer`. Never writes anything.
    pub fn export_raster_layer(&self, layer: &dyn RasterLayer) -> PathBuf {
        let source = layer.source();

        if GDAL_RASTER_EXTENSIONS
            .iter()
            .any(|ext| has_extension(source, ext))
        {
            debug!(source, "raster format readable by GDAL");
        } else {
            warn!(source, "raster format not known to be readable; passing source through unconverted");
        }

        PathBuf::from(source)
    }
}
