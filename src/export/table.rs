// src/export/table.rs

use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::Result;
use crate::export::LayerExporter;
use crate::layer::{GeometryType, VectorLayer};
use crate::paths::{has_extension, is_ascii_path};

impl LayerExporter<'_> {
    /// Return a dBase path holding the attributes of `table`.
    ///
    /// A `.dbf` source with an ASCII path is returned unchanged; for a
    /// `.shp` source the sibling `.dbf` path is returned. Everything else is
    /// written, without geometry, to a new temp `.dbf`. The selection is not
    /// consulted for tables.
    pub fn export_table(&self, table: &dyn VectorLayer) -> Result<PathBuf> {
        let source = table.source();
        let is_shp = has_extension(source, "shp");
        let is_dbf = has_extension(source, "dbf") || is_shp;

        if is_dbf && is_ascii_path(source) {
            let path = if is_shp {
                format!("{}dbf", &source[..source.len() - 3])
            } else {
                source.to_string()
            };
            debug!(source, table = %path, "table already available as dbf");
            return Ok(PathBuf::from(path));
        }

        let output = self.temp.temp_filename("dbf")?;
        let written = self.write_features(
            &output,
            table.fields(),
            GeometryType::NoGeometry,
            table.crs(),
            table.features(),
        )?;
        info!(source, output = ?output, rows = written, "exported attribute table");
        Ok(output)
    }
}
