// src/layer/geometry.rs

//! 2D geometry model shared by layer sources and format writers.

/// A single XY position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A closed ring of a polygon. First and last coordinates are expected
/// to be equal.
pub type Ring = Vec<Coord>;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    MultiPoint(Vec<Coord>),
    LineString(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    /// Exterior ring first, then holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// Geometry type declared by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    /// Attribute-only table.
    NoGeometry,
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    Unknown,
}

impl GeometryType {
    pub fn has_geometry(self) -> bool {
        !matches!(self, GeometryType::NoGeometry)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn of_point(c: Coord) -> Self {
        Self {
            min_x: c.x,
            min_y: c.y,
            max_x: c.x,
            max_y: c.y,
        }
    }

    pub fn expand(&mut self, c: Coord) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
    }

    pub fn merge(&mut self, other: &BBox) {
        self.expand(Coord::new(other.min_x, other.min_y));
        self.expand(Coord::new(other.max_x, other.max_y));
    }

    /// Bounding box of a coordinate sequence; `None` when empty.
    pub fn of_coords<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let mut bbox = BBox::of_point(*iter.next()?);
        for c in iter {
            bbox.expand(*c);
        }
        Some(bbox)
    }
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
        }
    }

    /// All coordinates, in storage order.
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coord> + '_> {
        match self {
            Geometry::Point(c) => Box::new(std::iter::once(c)),
            Geometry::MultiPoint(cs) | Geometry::LineString(cs) => Box::new(cs.iter()),
            Geometry::MultiLineString(lines) => Box::new(lines.iter().flatten()),
            Geometry::Polygon(rings) => Box::new(rings.iter().flatten()),
            Geometry::MultiPolygon(polys) => Box::new(polys.iter().flatten().flatten()),
        }
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::of_coords(self.coords())
    }
}

/// Twice the signed area of a ring (shoelace). Positive for
/// counter-clockwise rings in a y-up coordinate system.
pub fn ring_signed_area2(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum()
}

pub fn is_clockwise(ring: &[Coord]) -> bool {
    ring_signed_area2(ring) < 0.0
}

/// True when `point` lies inside `ring` (even-odd rule).
pub fn ring_contains(ring: &[Coord], point: Coord) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(clockwise: bool) -> Ring {
        let mut ring = vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(0.0, 1.0),
            Coord::new(0.0, 0.0),
        ];
        if clockwise {
            ring.reverse();
        }
        ring
    }

    #[test]
    fn orientation() {
        assert!(!is_clockwise(&square(false)));
        assert!(is_clockwise(&square(true)));
        assert_eq!(ring_signed_area2(&square(false)), 2.0);
    }

    #[test]
    fn bbox_covers_all_parts() {
        let geom = Geometry::MultiLineString(vec![
            vec![Coord::new(-1.0, 2.0), Coord::new(0.0, 0.0)],
            vec![Coord::new(5.0, -3.0)],
        ]);
        let bbox = geom.bbox().unwrap();
        assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (-1.0, -3.0, 5.0, 2.0));
        assert!(Geometry::MultiPoint(vec![]).bbox().is_none());
    }

    #[test]
    fn point_in_ring() {
        assert!(ring_contains(&square(false), Coord::new(0.5, 0.5)));
        assert!(!ring_contains(&square(true), Coord::new(1.5, 0.5)));
    }
}
