// src/formats/mod.rs

//! File formats the external tools consume.
//!
//! - [`dbf`] and [`shp`] are the byte-level codecs.
//! - [`shapefile`] wraps them as file-backed [`FeatureWriter`]s and readers.
//! - [`FileWriterFactory`] is the default [`WriterFactory`] handed to the
//!   exporter; it picks the writer from the output extension.

pub mod dbf;
pub mod encoding;
pub mod shapefile;
pub mod shp;

use std::path::Path;

use crate::errors::{BridgeError, Result};
use crate::layer::{Crs, Feature, Field, GeometryType};
use crate::paths::has_extension;

pub use encoding::TextEncoding;
pub use shapefile::{DbfTableWriter, ShapefileWriter};

/// Sink accepting features one at a time.
///
/// `close` must be called to finalize headers; dropping a writer without
/// closing leaves a file that readers will reject.
pub trait FeatureWriter {
    fn add_feature(&mut self, feature: &Feature) -> Result<()>;
    fn close(self: Box<Self>) -> Result<()>;
}

/// Creates writers for a target path.
pub trait WriterFactory {
    fn create(
        &self,
        path: &Path,
        encoding: TextEncoding,
        fields: &[Field],
        geometry_type: GeometryType,
        crs: Option<&Crs>,
    ) -> Result<Box<dyn FeatureWriter>>;
}

/// Writes shapefiles for `.shp` targets and plain tables for `.dbf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileWriterFactory;

impl WriterFactory for FileWriterFactory {
    fn create(
        &self,
        path: &Path,
        encoding: TextEncoding,
        fields: &[Field],
        geometry_type: GeometryType,
        crs: Option<&Crs>,
    ) -> Result<Box<dyn FeatureWriter>> {
        let target = path.to_string_lossy();
        if has_extension(&target, ".shp") {
            Ok(Box::new(ShapefileWriter::create(
                path,
                encoding,
                fields,
                geometry_type,
                crs,
            )?))
        } else if has_extension(&target, ".dbf") {
            Ok(Box::new(DbfTableWriter::create(path, encoding, fields)?))
        } else {
            Err(BridgeError::unsupported_format(path))
        }
    }
}

/// Copy every feature from `features` into a fresh writer, then close it.
/// Returns the number of features written.
pub fn write_all(
    mut writer: Box<dyn FeatureWriter>,
    features: impl Iterator<Item = Feature>,
) -> Result<usize> {
    let mut count = 0;
    for feature in features {
        writer.add_feature(&feature)?;
        count += 1;
    }
    writer.close()?;
    Ok(count)
}
