// src/sources/csv_table.rs

//! Delimited text tables, loaded as attribute-only layers.

use std::path::Path;

use crate::errors::{BridgeError, Result};
use crate::layer::{Feature, Field, FieldType, MemoryLayer, Value};

/// Load a CSV file with a header row.
///
/// Empty cells are null. A column is Integer when every non-empty cell
/// parses as `i64`, Double when every one parses as `f64`, String otherwise.
pub fn load(path: &Path) -> Result<MemoryLayer> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(BridgeError::invalid_data(path, "no header row"));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        rows.push(
            (0..headers.len())
                .map(|i| record.get(i).unwrap_or("").trim().to_string())
                .collect(),
        );
    }

    let fields: Vec<Field> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| Field::new(name.clone(), infer_type(rows.iter().map(|r| r[i].as_str()))))
        .collect();

    let features = rows
        .iter()
        .enumerate()
        .map(|(id, row)| {
            let attributes = row
                .iter()
                .zip(&fields)
                .map(|(cell, field)| to_value(cell, field.field_type))
                .collect();
            Feature::new(id as u64, None, attributes)
        })
        .collect();

    Ok(MemoryLayer::table(path.to_string_lossy().into_owned(), fields).with_features(features))
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> FieldType {
    let mut seen_any = false;
    let (mut all_int, mut all_num) = (true, true);
    for cell in cells.filter(|c| !c.is_empty()) {
        seen_any = true;
        all_int &= cell.parse::<i64>().is_ok();
        all_num &= cell.parse::<f64>().is_ok();
    }
    match (seen_any, all_int, all_num) {
        (true, true, _) => FieldType::Integer,
        (true, _, true) => FieldType::Double,
        _ => FieldType::String,
    }
}

fn to_value(cell: &str, field_type: FieldType) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match field_type {
        FieldType::Integer => cell.parse().map(Value::Integer).unwrap_or(Value::Null),
        FieldType::Double => cell.parse().map(Value::Double).unwrap_or(Value::Null),
        _ => Value::String(cell.to_string()),
    }
}

fn csv_error(path: &Path, err: csv::Error) -> BridgeError {
    BridgeError::invalid_data(path, err.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::layer::{GeometryType, VectorLayer};

    #[test]
    fn loads_table_with_typed_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.csv");
        fs::write(&path, "id,name,depth\n1,North,2.5\n2,South,\n3,,7\n").unwrap();

        let layer = load(&path).unwrap();
        assert_eq!(layer.geometry_type(), GeometryType::NoGeometry);
        let types: Vec<FieldType> = layer.fields().iter().map(|f| f.field_type).collect();
        assert_eq!(types, vec![FieldType::Integer, FieldType::String, FieldType::Double]);

        let rows: Vec<Vec<Value>> = layer.features().map(|f| f.attributes).collect();
        assert_eq!(rows[1], vec![Value::Integer(2), Value::from("South"), Value::Null]);
        assert_eq!(rows[2][1], Value::Null);
        assert_eq!(rows[2][2], Value::Double(7.0));
    }
}
