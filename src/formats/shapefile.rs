// src/formats/shapefile.rs

//! File-backed writers and readers: a shapefile is `.shp` + `.shx` +
//! `.dbf`, with optional `.prj` (CRS) and `.cpg` (code page) sidecars.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{BridgeError, Result};
use crate::formats::dbf::{self, DbfTable, DbfWriter};
use crate::formats::encoding::TextEncoding;
use crate::formats::shp::{self, ShapeType, ShpWriter};
use crate::formats::FeatureWriter;
use crate::layer::{Crs, Feature, Field, Geometry, GeometryType};

/// `path` with its extension replaced.
pub fn sidecar_path(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Map codec errors onto the crate error, naming the file involved.
pub(crate) fn codec_error(path: &Path, err: io::Error) -> BridgeError {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof => {
            BridgeError::invalid_data(path, err.to_string())
        }
        _ => BridgeError::Io(err),
    }
}

/// Writes features into a new shapefile.
pub struct ShapefileWriter {
    path: PathBuf,
    shapes: ShpWriter<File>,
    table: DbfWriter<File>,
}

impl ShapefileWriter {
    pub fn create(
        path: &Path,
        encoding: TextEncoding,
        fields: &[Field],
        geometry_type: GeometryType,
        crs: Option<&Crs>,
    ) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let columns = dbf::layout_fields(fields).map_err(|e| codec_error(path, e))?;
        let shapes = ShpWriter::new(
            File::create(path)?,
            File::create(sidecar_path(path, "shx"))?,
            ShapeType::for_geometry_type(geometry_type),
        )
        .map_err(|e| codec_error(path, e))?;
        let dbf_path = sidecar_path(path, "dbf");
        let table = DbfWriter::new(File::create(&dbf_path)?, columns, encoding)
            .map_err(|e| codec_error(&dbf_path, e))?;

        write_sidecars(path, encoding, crs)?;

        Ok(Self {
            path: path.to_path_buf(),
            shapes,
            table,
        })
    }
}

impl FeatureWriter for ShapefileWriter {
    fn add_feature(&mut self, feature: &Feature) -> Result<()> {
        self.shapes
            .write_shape(feature.geometry.as_ref())
            .map_err(|e| codec_error(&self.path, e))?;
        self.table
            .write_record(&feature.attributes)
            .map_err(|e| codec_error(&sidecar_path(&self.path, "dbf"), e))
    }

    fn close(self: Box<Self>) -> Result<()> {
        let this = *self;
        let records = this.shapes.record_count();
        this.shapes
            .finish()
            .map_err(|e| codec_error(&this.path, e))?;
        this.table
            .finish()
            .map_err(|e| codec_error(&sidecar_path(&this.path, "dbf"), e))?;
        debug!(path = ?this.path, records, "closed shapefile");
        Ok(())
    }
}

/// Writes rows into a standalone `.dbf` table.
pub struct DbfTableWriter {
    path: PathBuf,
    table: DbfWriter<File>,
}

impl DbfTableWriter {
    pub fn create(path: &Path, encoding: TextEncoding, fields: &[Field]) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let columns = dbf::layout_fields(fields).map_err(|e| codec_error(path, e))?;
        let table =
            DbfWriter::new(File::create(path)?, columns, encoding).map_err(|e| codec_error(path, e))?;
        fs::write(sidecar_path(path, "cpg"), encoding.code_page_name())?;

        Ok(Self {
            path: path.to_path_buf(),
            table,
        })
    }
}

impl FeatureWriter for DbfTableWriter {
    fn add_feature(&mut self, feature: &Feature) -> Result<()> {
        self.table
            .write_record(&feature.attributes)
            .map_err(|e| codec_error(&self.path, e))
    }

    fn close(self: Box<Self>) -> Result<()> {
        let this = *self;
        let records = this.table.record_count();
        this.table.finish().map_err(|e| codec_error(&this.path, e))?;
        debug!(path = ?this.path, records, "closed dbf table");
        Ok(())
    }
}

fn write_sidecars(path: &Path, encoding: TextEncoding, crs: Option<&Crs>) -> Result<()> {
    fs::write(sidecar_path(path, "cpg"), encoding.code_page_name())?;
    if let Some(wkt) = crs.and_then(|c| c.wkt.as_deref()) {
        fs::write(sidecar_path(path, "prj"), wkt)?;
    }
    Ok(())
}

/// Encoding named by a `.cpg` next to `path`, if any.
pub fn sidecar_encoding(path: &Path) -> Option<TextEncoding> {
    fs::read_to_string(sidecar_path(path, "cpg"))
        .ok()
        .and_then(|s| TextEncoding::from_code_page(&s))
}

/// Read a `.dbf` table from disk.
pub fn read_dbf(path: &Path, encoding: TextEncoding) -> Result<DbfTable> {
    let file = File::open(path)?;
    dbf::read_table(BufReader::new(file), encoding).map_err(|e| codec_error(path, e))
}

/// Shapes, attribute table and CRS of a shapefile on disk.
pub struct ShapefileContents {
    pub shape_type: ShapeType,
    pub shapes: Vec<Option<Geometry>>,
    pub table: DbfTable,
    pub crs: Option<Crs>,
}

pub fn read_shapefile(path: &Path, encoding: TextEncoding) -> Result<ShapefileContents> {
    let file = File::open(path)?;
    let (shape_type, shapes) =
        shp::read_shapes(BufReader::new(file)).map_err(|e| codec_error(path, e))?;
    let table = read_dbf(&sidecar_path(path, "dbf"), encoding)?;

    let rows = table.records.len() + table.deleted.len();
    if rows != shapes.len() {
        return Err(BridgeError::invalid_data(
            path,
            format!("{} shapes but {rows} attribute rows", shapes.len()),
        ));
    }
    // A row deleted in the table takes its shape with it.
    let shapes = if table.deleted.is_empty() {
        shapes
    } else {
        let deleted: HashSet<usize> = table.deleted.iter().copied().collect();
        shapes
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !deleted.contains(idx))
            .map(|(_, shape)| shape)
            .collect()
    };

    let crs = fs::read_to_string(sidecar_path(path, "prj"))
        .ok()
        .map(|wkt| Crs::from_wkt(wkt.trim()));

    Ok(ShapefileContents {
        shape_type,
        shapes,
        table,
        crs,
    })
}
