// src/sources/geojson.rs

//! GeoJSON `FeatureCollection` loader.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value as Json};

use crate::errors::{BridgeError, Result};
use crate::layer::{Coord, Crs, Feature, Field, FieldType, Geometry, GeometryType, MemoryLayer, Value};

/// Load a GeoJSON file. Coordinates are taken as WGS84 (RFC 7946).
///
/// The schema is the union of all property keys in first-seen order; a
/// column is Integer when every value is integral, Double when any value is
/// fractional, Boolean when all are booleans, and String otherwise.
pub fn load(path: &Path) -> Result<MemoryLayer> {
    let text = fs::read_to_string(path)?;
    let doc: Json = serde_json::from_str(&text)
        .map_err(|e| BridgeError::invalid_data(path, format!("not valid JSON: {e}")))?;
    parse(path, &doc)
}

pub(crate) fn parse(path: &Path, doc: &Json) -> Result<MemoryLayer> {
    let bad = |msg: &str| BridgeError::invalid_data(path, msg.to_string());

    let raw_features: Vec<&Json> = match doc.get("type").and_then(Json::as_str) {
        Some("FeatureCollection") => doc
            .get("features")
            .and_then(Json::as_array)
            .ok_or_else(|| bad("FeatureCollection without a features array"))?
            .iter()
            .collect(),
        Some("Feature") => vec![doc],
        _ => return Err(bad("expected a FeatureCollection or Feature")),
    };

    let mut keys: Vec<String> = Vec::new();
    let mut props: Vec<Option<&Map<String, Json>>> = Vec::with_capacity(raw_features.len());
    let mut geometries = Vec::with_capacity(raw_features.len());

    for (idx, raw) in raw_features.iter().enumerate() {
        let geometry = match raw.get("geometry") {
            None | Some(Json::Null) => None,
            Some(g) => Some(
                parse_geometry(g)
                    .ok_or_else(|| bad(&format!("feature {idx} has an invalid geometry")))?,
            ),
        };
        geometries.push(geometry);

        let properties = raw.get("properties").and_then(Json::as_object);
        if let Some(map) = properties {
            for key in map.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        props.push(properties);
    }

    let fields: Vec<Field> = keys
        .iter()
        .map(|key| {
            let column = props.iter().filter_map(|p| p.and_then(|m| m.get(key)));
            Field::new(key.clone(), infer_type(column))
        })
        .collect();

    let geometry_type = geometries
        .iter()
        .flatten()
        .map(Geometry::geometry_type)
        .next()
        .unwrap_or(GeometryType::Unknown);

    let features = geometries
        .into_iter()
        .zip(props)
        .enumerate()
        .map(|(id, (geometry, properties))| {
            let attributes = fields
                .iter()
                .map(|f| {
                    properties
                        .and_then(|m| m.get(&f.name))
                        .map(|v| to_value(v, f.field_type))
                        .unwrap_or(Value::Null)
                })
                .collect();
            Feature::new(id as u64, geometry, attributes)
        })
        .collect();

    let source = path.to_string_lossy().into_owned();
    Ok(MemoryLayer::new(source, geometry_type, Some(Crs::wgs84()), fields).with_features(features))
}

fn infer_type<'a>(values: impl Iterator<Item = &'a Json>) -> FieldType {
    let mut seen_any = false;
    let (mut all_int, mut all_num, mut all_bool) = (true, true, true);

    for v in values.filter(|v| !v.is_null()) {
        seen_any = true;
        all_int &= v.is_i64() || v.is_u64();
        all_num &= v.is_number();
        all_bool &= v.is_boolean();
    }

    match (seen_any, all_int, all_num, all_bool) {
        (false, ..) => FieldType::String,
        (true, true, _, _) => FieldType::Integer,
        (true, _, true, _) => FieldType::Double,
        (true, _, _, true) => FieldType::Boolean,
        _ => FieldType::String,
    }
}

fn to_value(v: &Json, field_type: FieldType) -> Value {
    match (field_type, v) {
        (_, Json::Null) => Value::Null,
        (FieldType::Integer, _) => v.as_i64().map(Value::Integer).unwrap_or(Value::Null),
        (FieldType::Double, _) => v.as_f64().map(Value::Double).unwrap_or(Value::Null),
        (FieldType::Boolean, Json::Bool(b)) => Value::Boolean(*b),
        (_, Json::String(s)) => Value::String(s.clone()),
        (_, other) => Value::String(other.to_string()),
    }
}

fn parse_geometry(g: &Json) -> Option<Geometry> {
    let coords = g.get("coordinates");
    match g.get("type")?.as_str()? {
        "Point" => Some(Geometry::Point(coord(coords?)?)),
        "MultiPoint" => Some(Geometry::MultiPoint(coord_list(coords?)?)),
        "LineString" => Some(Geometry::LineString(coord_list(coords?)?)),
        "MultiLineString" => Some(Geometry::MultiLineString(nested(coords?, coord_list)?)),
        "Polygon" => Some(Geometry::Polygon(nested(coords?, coord_list)?)),
        "MultiPolygon" => Some(Geometry::MultiPolygon(nested(coords?, |p| {
            nested(p, coord_list)
        })?)),
        _ => None,
    }
}

fn coord(v: &Json) -> Option<Coord> {
    let arr = v.as_array()?;
    Some(Coord::new(arr.first()?.as_f64()?, arr.get(1)?.as_f64()?))
}

fn coord_list(v: &Json) -> Option<Vec<Coord>> {
    v.as_array()?.iter().map(coord).collect()
}

fn nested<T>(v: &Json, inner: impl Fn(&Json) -> Option<T>) -> Option<Vec<T>> {
    v.as_array()?.iter().map(inner).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::VectorLayer;

    #[test]
    fn loads_feature_collection_with_inferred_schema() {
        let doc = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [1.5, 2.5]},
                    "properties": {"name": "a", "pop": 10, "area": 1}
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": {"name": "b", "pop": null, "area": 2.5, "capital": true}
                }
            ]
        });

        let layer = parse(Path::new("cities.geojson"), &doc).unwrap();
        let types: Vec<(String, FieldType)> = layer
            .fields()
            .iter()
            .map(|f| (f.name.clone(), f.field_type))
            .collect();
        assert_eq!(
            types,
            vec![
                ("area".to_string(), FieldType::Double),
                ("name".to_string(), FieldType::String),
                ("pop".to_string(), FieldType::Integer),
                ("capital".to_string(), FieldType::Boolean),
            ]
        );
        assert_eq!(layer.geometry_type(), GeometryType::Point);

        let features: Vec<Feature> = layer.features().collect();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].attributes[0], Value::Double(1.0));
        assert_eq!(features[1].attributes[2], Value::Null);
        assert!(features[1].geometry.is_none());
    }

    #[test]
    fn rejects_other_documents() {
        let doc = serde_json::json!({"type": "Point", "coordinates": [0, 0]});
        assert!(matches!(
            parse(Path::new("x.json"), &doc),
            Err(BridgeError::InvalidData { .. })
        ));
    }
}
