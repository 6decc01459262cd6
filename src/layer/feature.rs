// src/layer/feature.rs

use chrono::NaiveDate;

use crate::layer::geometry::Geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Double,
    Date,
    Boolean,
}

/// One column of a layer's attribute schema.
///
/// `length` and `precision` follow the host's conventions: zero means
/// "let the writer pick".
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub length: usize,
    pub precision: usize,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            length: 0,
            precision: 0,
        }
    }

    pub fn with_length(mut self, length: usize, precision: usize) -> Self {
        self.length = length;
        self.precision = precision;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Integer(i64),
    Double(f64),
    Date(NaiveDate),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

/// One row of a layer: id, optional geometry and attribute values in
/// schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: u64,
    pub geometry: Option<Geometry>,
    pub attributes: Vec<Value>,
}

impl Feature {
    pub fn new(id: u64, geometry: Option<Geometry>, attributes: Vec<Value>) -> Self {
        Self {
            id,
            geometry,
            attributes,
        }
    }
}
