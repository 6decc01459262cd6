// src/layer/mod.rs

//! Layer handles as seen by the exporter.
//!
//! The host owns its layers; this crate only reads them through the narrow
//! [`VectorLayer`] and [`RasterLayer`] traits. Attribute tables are vector
//! layers whose geometry type is [`GeometryType::NoGeometry`].

pub mod feature;
pub mod geometry;
pub mod memory;

pub use feature::{Feature, Field, FieldType, Value};
pub use geometry::{BBox, Coord, Geometry, GeometryType, Ring};
pub use memory::MemoryLayer;

/// WKT of EPSG:4326 in the ESRI dialect shapefile readers expect in `.prj`.
pub const WGS84_WKT: &str = "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]";

/// Coordinate reference system of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Crs {
    /// Authority id such as `EPSG:4326`.
    pub authid: Option<String>,
    pub wkt: Option<String>,
}

impl Crs {
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            authid: None,
            wkt: Some(wkt.into()),
        }
    }

    pub fn wgs84() -> Self {
        Self {
            authid: Some("EPSG:4326".to_string()),
            wkt: Some(WGS84_WKT.to_string()),
        }
    }
}

/// Read access to a vector layer or attribute table.
pub trait VectorLayer {
    /// Source path or provider URI.
    fn source(&self) -> &str;
    fn geometry_type(&self) -> GeometryType;
    fn crs(&self) -> Option<&Crs>;
    fn fields(&self) -> &[Field];
    fn selected_feature_count(&self) -> usize;
    fn selected_features(&self) -> Box<dyn Iterator<Item = Feature> + '_>;
    fn features(&self) -> Box<dyn Iterator<Item = Feature> + '_>;
}

/// Read access to a raster layer. Only its source is ever consulted.
pub trait RasterLayer {
    fn source(&self) -> &str;
}

/// Raster known only by its source path.
#[derive(Debug, Clone)]
pub struct RasterFile {
    source: String,
}

impl RasterFile {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl RasterLayer for RasterFile {
    fn source(&self) -> &str {
        &self.source
    }
}
