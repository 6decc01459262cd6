// src/export/vector.rs

use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::Result;
use crate::export::LayerExporter;
use crate::layer::VectorLayer;
use crate::paths::{has_extension, is_ascii_path};

impl LayerExporter<'_> {
    /// Return a shapefile path for `layer`, exporting when needed.
    ///
    /// - With selection use enabled and a non-empty selection, the selected
    ///   features always go to a new temp shapefile, whatever the source.
    /// - A source that is already a shapefile with an ASCII path is
    ///   returned as is.
    /// - Anything else (other formats, database or remote layers, non-ASCII
    ///   paths) is copied to a new temp shapefile.
    pub fn export_vector_layer(&self, layer: &dyn VectorLayer) -> Result<PathBuf> {
        let source = layer.source();

        if self.settings.use_selected() && layer.selected_feature_count() != 0 {
            let output = self.temp.temp_filename("shp")?;
            let written = self.write_features(
                &output,
                layer.fields(),
                layer.geometry_type(),
                layer.crs(),
                layer.selected_features(),
            )?;
            info!(source, output = ?output, features = written, "exported selected features");
            return Ok(output);
        }

        if has_extension(source, "shp") && is_ascii_path(source) {
            debug!(source, "layer is already a usable shapefile");
            return Ok(PathBuf::from(source));
        }

        let output = self.temp.temp_filename("shp")?;
        let written = self.write_features(
            &output,
            layer.fields(),
            layer.geometry_type(),
            layer.crs(),
            layer.features(),
        )?;
        info!(source, output = ?output, features = written, "exported vector layer");
        Ok(output)
    }
}
