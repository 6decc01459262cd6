// src/formats/shp.rs

//! ESRI shapefile geometry codec (`.shp` + `.shx`).
//!
//! Both files share a 100-byte header:
//!
//! | Offset | Field       | Type      | Description                  |
//! |--------|-------------|-----------|------------------------------|
//! | 0-3    | file code   | i32 BE    | 9994                         |
//! | 24-27  | file length | i32 BE    | in 16-bit words              |
//! | 28-31  | version     | i32 LE    | 1000                         |
//! | 32-35  | shape type  | i32 LE    | see [`ShapeType`]            |
//! | 36-67  | bbox        | f64 LE x4 | xmin, ymin, xmax, ymax       |
//! | 68-99  | z/m range   | f64 LE x4 | zero for 2D files            |
//!
//! Every `.shp` record starts with its 1-based number and content length
//! (words, i32 BE); the matching `.shx` entry holds offset and length.
//! Only 2D types are supported.

use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};

use crate::layer::geometry::{is_clockwise, ring_contains};
use crate::layer::{BBox, Coord, Geometry, GeometryType, Ring};

pub const HEADER_LEN: usize = 100;
const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;
const RECORD_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
}

impl ShapeType {
    pub fn code(self) -> i32 {
        match self {
            ShapeType::Null => 0,
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
        }
    }

    pub fn from_code(code: i32) -> io::Result<Self> {
        match code {
            0 => Ok(ShapeType::Null),
            1 => Ok(ShapeType::Point),
            3 => Ok(ShapeType::PolyLine),
            5 => Ok(ShapeType::Polygon),
            8 => Ok(ShapeType::MultiPoint),
            other => Err(invalid_data(format!(
                "shape type {other} is not supported (only 2D types are)"
            ))),
        }
    }

    /// Shape type a layer's declared geometry type maps to, if known.
    pub fn for_geometry_type(geometry_type: GeometryType) -> Option<Self> {
        match geometry_type {
            GeometryType::Point => Some(ShapeType::Point),
            GeometryType::MultiPoint => Some(ShapeType::MultiPoint),
            GeometryType::LineString | GeometryType::MultiLineString => Some(ShapeType::PolyLine),
            GeometryType::Polygon | GeometryType::MultiPolygon => Some(ShapeType::Polygon),
            GeometryType::NoGeometry | GeometryType::Unknown => None,
        }
    }

    fn for_geometry(geometry: &Geometry) -> Self {
        ShapeType::for_geometry_type(geometry.geometry_type()).unwrap_or(ShapeType::Null)
    }

    /// Geometry type reported for a layer read from a file of this type.
    pub fn geometry_type(self) -> GeometryType {
        match self {
            ShapeType::Null => GeometryType::Unknown,
            ShapeType::Point => GeometryType::Point,
            ShapeType::PolyLine => GeometryType::LineString,
            ShapeType::Polygon => GeometryType::Polygon,
            ShapeType::MultiPoint => GeometryType::MultiPoint,
        }
    }
}

/// Streaming `.shp` + `.shx` writer.
///
/// The shape type may be left open and is then taken from the first
/// non-null geometry. Headers are rewritten by [`ShpWriter::finish`] once
/// file lengths and the bounding box are known.
pub struct ShpWriter<W: Write + Seek> {
    shp: BufWriter<W>,
    shx: BufWriter<W>,
    shape_type: Option<ShapeType>,
    bbox: Option<BBox>,
    offset_words: i32,
    records: i32,
}

impl<W: Write + Seek> ShpWriter<W> {
    pub fn new(shp: W, shx: W, shape_type: Option<ShapeType>) -> io::Result<Self> {
        let mut shp = BufWriter::new(shp);
        let mut shx = BufWriter::new(shx);
        shp.write_all(&[0u8; HEADER_LEN])?;
        shx.write_all(&[0u8; HEADER_LEN])?;

        Ok(Self {
            shp,
            shx,
            shape_type,
            bbox: None,
            offset_words: (HEADER_LEN / 2) as i32,
            records: 0,
        })
    }

    pub fn shape_type(&self) -> Option<ShapeType> {
        self.shape_type
    }

    /// Append one record; `None` writes a null shape.
    pub fn write_shape(&mut self, geometry: Option<&Geometry>) -> io::Result<()> {
        if let Some(geom) = geometry {
            let actual = ShapeType::for_geometry(geom);
            let declared = *self.shape_type.get_or_insert(actual);
            if !compatible(declared, geom) {
                return Err(invalid_input(format!(
                    "{:?} geometry cannot be stored in a {:?} shapefile",
                    geom.geometry_type(),
                    declared
                )));
            }
            if let Some(b) = geom.bbox() {
                match &mut self.bbox {
                    Some(total) => total.merge(&b),
                    None => self.bbox = Some(b),
                }
            }
        }

        let content = encode_shape(self.shape_type, geometry);
        let content_words = (content.len() / 2) as i32;
        self.records += 1;

        self.shp.write_all(&self.records.to_be_bytes())?;
        self.shp.write_all(&content_words.to_be_bytes())?;
        self.shp.write_all(&content)?;

        self.shx.write_all(&self.offset_words.to_be_bytes())?;
        self.shx.write_all(&content_words.to_be_bytes())?;

        self.offset_words += (RECORD_HEADER_LEN / 2) as i32 + content_words;
        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.records as usize
    }

    /// Rewrite both headers and hand back the `.shp` and `.shx` sinks.
    pub fn finish(self) -> io::Result<(W, W)> {
        let shape_type = self.shape_type.unwrap_or(ShapeType::Null);
        let shx_words = (HEADER_LEN / 2) as i32 + self.records * 4;

        let shp = patch_header(self.shp, self.offset_words, shape_type, self.bbox)?;
        let shx = patch_header(self.shx, shx_words, shape_type, self.bbox)?;
        Ok((shp, shx))
    }
}

fn patch_header<W: Write + Seek>(
    out: BufWriter<W>,
    length_words: i32,
    shape_type: ShapeType,
    bbox: Option<BBox>,
) -> io::Result<W> {
    let mut inner = out.into_inner().map_err(|e| e.into_error())?;
    inner.seek(SeekFrom::Start(0))?;
    inner.write_all(&build_header(length_words, shape_type, bbox))?;
    inner.seek(SeekFrom::End(0))?;
    inner.flush()?;
    Ok(inner)
}

fn build_header(length_words: i32, shape_type: ShapeType, bbox: Option<BBox>) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(&FILE_CODE.to_be_bytes());
    header[24..28].copy_from_slice(&length_words.to_be_bytes());
    header[28..32].copy_from_slice(&VERSION.to_le_bytes());
    header[32..36].copy_from_slice(&shape_type.code().to_le_bytes());

    let b = bbox.unwrap_or(BBox {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    });
    for (i, v) in [b.min_x, b.min_y, b.max_x, b.max_y].into_iter().enumerate() {
        let at = 36 + i * 8;
        header[at..at + 8].copy_from_slice(&v.to_le_bytes());
    }
    header
}

fn compatible(declared: ShapeType, geom: &Geometry) -> bool {
    matches!(
        (declared, geom),
        (ShapeType::Point, Geometry::Point(_))
            | (ShapeType::MultiPoint, Geometry::Point(_) | Geometry::MultiPoint(_))
            | (
                ShapeType::PolyLine,
                Geometry::LineString(_) | Geometry::MultiLineString(_)
            )
            | (
                ShapeType::Polygon,
                Geometry::Polygon(_) | Geometry::MultiPolygon(_)
            )
    )
}

/// Record content for one shape, without the record header.
fn encode_shape(shape_type: Option<ShapeType>, geometry: Option<&Geometry>) -> Vec<u8> {
    let mut buf = Vec::new();
    let (Some(shape_type), Some(geom)) = (shape_type, geometry) else {
        put_i32(&mut buf, ShapeType::Null.code());
        return buf;
    };

    put_i32(&mut buf, shape_type.code());
    match geom {
        Geometry::Point(c) => {
            if shape_type == ShapeType::MultiPoint {
                put_multipoint(&mut buf, std::slice::from_ref(c));
            } else {
                put_coord(&mut buf, *c);
            }
        }
        Geometry::MultiPoint(cs) => put_multipoint(&mut buf, cs),
        Geometry::LineString(cs) => put_parts(&mut buf, &[cs.clone()]),
        Geometry::MultiLineString(lines) => put_parts(&mut buf, lines),
        Geometry::Polygon(rings) => put_parts(&mut buf, &orient_polygon(rings)),
        Geometry::MultiPolygon(polys) => {
            let rings: Vec<Ring> = polys.iter().flat_map(|p| orient_polygon(p)).collect();
            put_parts(&mut buf, &rings);
        }
    }
    buf
}

/// Exterior ring clockwise, holes counter-clockwise.
fn orient_polygon(rings: &[Ring]) -> Vec<Ring> {
    rings
        .iter()
        .enumerate()
        .map(|(idx, ring)| {
            let want_clockwise = idx == 0;
            let mut ring = ring.clone();
            if is_clockwise(&ring) != want_clockwise {
                ring.reverse();
            }
            ring
        })
        .collect()
}

fn put_multipoint(buf: &mut Vec<u8>, coords: &[Coord]) {
    put_bbox(buf, BBox::of_coords(coords));
    put_i32(buf, coords.len() as i32);
    for c in coords {
        put_coord(buf, *c);
    }
}

fn put_parts(buf: &mut Vec<u8>, parts: &[Vec<Coord>]) {
    put_bbox(buf, BBox::of_coords(parts.iter().flatten()));
    let total: usize = parts.iter().map(Vec::len).sum();
    put_i32(buf, parts.len() as i32);
    put_i32(buf, total as i32);

    let mut start = 0i32;
    for part in parts {
        put_i32(buf, start);
        start += part.len() as i32;
    }
    for c in parts.iter().flatten() {
        put_coord(buf, *c);
    }
}

fn put_bbox(buf: &mut Vec<u8>, bbox: Option<BBox>) {
    let b = bbox.unwrap_or(BBox::of_point(Coord::new(0.0, 0.0)));
    for v in [b.min_x, b.min_y, b.max_x, b.max_y] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

fn put_coord(buf: &mut Vec<u8>, c: Coord) {
    buf.extend_from_slice(&c.x.to_le_bytes());
    buf.extend_from_slice(&c.y.to_le_bytes());
}

fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Read all shapes from a `.shp` stream. The `.shx` index is not needed
/// for a sequential read.
pub fn read_shapes<R: Read>(mut input: R) -> io::Result<(ShapeType, Vec<Option<Geometry>>)> {
    let mut header = [0u8; HEADER_LEN];
    input.read_exact(&mut header)?;

    let code = i32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    if code != FILE_CODE {
        return Err(invalid_data(format!("bad file code {code}, expected {FILE_CODE}")));
    }
    let shape_type = ShapeType::from_code(le_i32(&header, 32))?;

    let mut shapes = Vec::new();
    let mut record_header = [0u8; RECORD_HEADER_LEN];
    loop {
        match input.read_exact(&mut record_header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
        let words = i32::from_be_bytes([
            record_header[4],
            record_header[5],
            record_header[6],
            record_header[7],
        ]);
        if words < 2 {
            return Err(invalid_data(format!("record content of {words} words")));
        }
        // Read through `take` so a corrupt length cannot force a huge
        // allocation up front.
        let len = words as u64 * 2;
        let mut content = Vec::new();
        (&mut input).take(len).read_to_end(&mut content)?;
        if content.len() as u64 != len {
            return Err(invalid_data(format!(
                "record {} truncated: {} of {len} bytes",
                shapes.len() + 1,
                content.len()
            )));
        }
        shapes.push(decode_shape(&content)?);
    }

    Ok((shape_type, shapes))
}

fn decode_shape(content: &[u8]) -> io::Result<Option<Geometry>> {
    let mut cur = ByteCursor::new(content);
    match ShapeType::from_code(cur.i32()?)? {
        ShapeType::Null => Ok(None),
        ShapeType::Point => Ok(Some(Geometry::Point(cur.coord()?))),
        ShapeType::MultiPoint => {
            cur.skip(32)?;
            let n = cur.count()?;
            cur.ensure(n, COORD_LEN)?;
            let coords = (0..n).map(|_| cur.coord()).collect::<io::Result<Vec<_>>>()?;
            Ok(Some(Geometry::MultiPoint(coords)))
        }
        ShapeType::PolyLine => {
            let mut parts = read_parts(&mut cur)?;
            if parts.len() == 1 {
                Ok(Some(Geometry::LineString(parts.remove(0))))
            } else {
                Ok(Some(Geometry::MultiLineString(parts)))
            }
        }
        ShapeType::Polygon => {
            let mut polygons = group_rings(read_parts(&mut cur)?);
            if polygons.len() == 1 {
                Ok(Some(Geometry::Polygon(polygons.remove(0))))
            } else {
                Ok(Some(Geometry::MultiPolygon(polygons)))
            }
        }
    }
}

fn read_parts(cur: &mut ByteCursor<'_>) -> io::Result<Vec<Vec<Coord>>> {
    cur.skip(32)?;
    let num_parts = cur.count()?;
    let num_points = cur.count()?;
    cur.ensure(num_parts, 4)?;
    cur.ensure(num_points, COORD_LEN)?;
    let starts = (0..num_parts).map(|_| cur.count()).collect::<io::Result<Vec<_>>>()?;
    let points = (0..num_points).map(|_| cur.coord()).collect::<io::Result<Vec<_>>>()?;

    let mut parts = Vec::with_capacity(num_parts);
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(num_points);
        if start > end || end > num_points {
            return Err(invalid_data(format!("part {i} spans {start}..{end} of {num_points}")));
        }
        parts.push(points[start..end].to_vec());
    }
    Ok(parts)
}

/// Clockwise rings start polygons; each counter-clockwise ring becomes a
/// hole of the polygon whose exterior contains it.
fn group_rings(rings: Vec<Ring>) -> Vec<Vec<Ring>> {
    let mut polygons: Vec<Vec<Ring>> = Vec::new();
    let mut holes = Vec::new();

    for ring in rings {
        if is_clockwise(&ring) {
            polygons.push(vec![ring]);
        } else {
            holes.push(ring);
        }
    }

    for hole in holes {
        let probe = hole.first().copied();
        let owner = probe.and_then(|p| polygons.iter().position(|poly| ring_contains(&poly[0], p)));
        match owner {
            Some(idx) => polygons[idx].push(hole),
            // Orphan hole: keep it as a polygon of its own.
            None => polygons.push(vec![hole]),
        }
    }
    polygons
}

fn le_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

const COORD_LEN: usize = 16;

struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> io::Result<&'a [u8]> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(invalid_data(format!(
                "record truncated at byte {} (wanted {n} more)",
                self.pos
            )));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Fail unless `count` items of `item_len` bytes could still follow.
    fn ensure(&self, count: usize, item_len: usize) -> io::Result<()> {
        let remaining = self.bytes.len() - self.pos;
        match count.checked_mul(item_len) {
            Some(needed) if needed <= remaining => Ok(()),
            _ => Err(invalid_data(format!(
                "{count} items declared but only {remaining} bytes left"
            ))),
        }
    }

    fn skip(&mut self, n: usize) -> io::Result<()> {
        self.take(n).map(|_| ())
    }

    fn i32(&mut self) -> io::Result<i32> {
        let b = self.take(4)?;
        Ok(le_i32(b, 0))
    }

    fn count(&mut self) -> io::Result<usize> {
        let v = self.i32()?;
        usize::try_from(v).map_err(|_| invalid_data(format!("negative count {v}")))
    }

    fn f64(&mut self) -> io::Result<f64> {
        let b = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(f64::from_le_bytes(arr))
    }

    fn coord(&mut self) -> io::Result<Coord> {
        Ok(Coord::new(self.f64()?, self.f64()?))
    }
}

fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
