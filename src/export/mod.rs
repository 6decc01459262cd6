// src/export/mod.rs

//! Turn layers into files external tools can read.
//!
//! Each export either hands back the layer's own source, when it already
//! satisfies the target format, or writes a fresh temporary file and returns
//! that path. Layers are only ever read.
//!
//! - [`vector`]: vector layers to ESRI Shapefile.
//! - [`table`]: attribute tables to dBase.
//! - [`raster`]: rasters pass through (see the module docs).

pub mod raster;
pub mod table;
pub mod vector;

use std::path::Path;

use crate::config::Settings;
use crate::errors::Result;
use crate::formats::{write_all, WriterFactory};
use crate::layer::{Crs, Feature, Field, GeometryType};
use crate::paths::TempFiles;

pub use raster::GDAL_RASTER_EXTENSIONS;

/// Exporter wired to its collaborators: settings, temp names and writers.
pub struct LayerExporter<'a> {
    settings: &'a Settings,
    temp: &'a dyn TempFiles,
    writers: &'a dyn WriterFactory,
}

impl<'a> LayerExporter<'a> {
    pub fn new(
        settings: &'a Settings,
        temp: &'a dyn TempFiles,
        writers: &'a dyn WriterFactory,
    ) -> Self {
        Self {
            settings,
            temp,
            writers,
        }
    }

    /// Write `features` to `output` and return how many were written.
    fn write_features(
        &self,
        output: &Path,
        fields: &[Field],
        geometry_type: GeometryType,
        crs: Option<&Crs>,
        features: impl Iterator<Item = Feature>,
    ) -> Result<usize> {
        let writer = self.writers.create(
            output,
            self.settings.encoding(),
            fields,
            geometry_type,
            crs,
        )?;
        write_all(writer, features)
    }
}
