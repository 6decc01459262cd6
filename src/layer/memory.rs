// src/layer/memory.rs

use std::collections::BTreeSet;

use crate::layer::feature::{Feature, Field};
use crate::layer::geometry::GeometryType;
use crate::layer::{Crs, VectorLayer};

/// Vector layer or table held entirely in memory.
///
/// Every file source in [`crate::sources`] loads into one of these, and
/// tests build them directly.
#[derive(Debug, Clone)]
pub struct MemoryLayer {
    source: String,
    geometry_type: GeometryType,
    crs: Option<Crs>,
    fields: Vec<Field>,
    features: Vec<Feature>,
    selection: BTreeSet<u64>,
}

impl MemoryLayer {
    pub fn new(
        source: impl Into<String>,
        geometry_type: GeometryType,
        crs: Option<Crs>,
        fields: Vec<Field>,
    ) -> Self {
        Self {
            source: source.into(),
            geometry_type,
            crs,
            fields,
            features: Vec::new(),
            selection: BTreeSet::new(),
        }
    }

    /// Attribute-only table.
    pub fn table(source: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(source, GeometryType::NoGeometry, None, fields)
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Replace the selection. Ids that match no feature are ignored.
    pub fn select(&mut self, ids: impl IntoIterator<Item = u64>) {
        let known: BTreeSet<u64> = self.features.iter().map(|f| f.id).collect();
        self.selection = ids.into_iter().filter(|id| known.contains(id)).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl VectorLayer for MemoryLayer {
    fn source(&self) -> &str {
        &self.source
    }

    fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn selected_feature_count(&self) -> usize {
        self.selection.len()
    }

    fn selected_features(&self) -> Box<dyn Iterator<Item = Feature> + '_> {
        Box::new(
            self.features
                .iter()
                .filter(|f| self.selection.contains(&f.id))
                .cloned(),
        )
    }

    fn features(&self) -> Box<dyn Iterator<Item = Feature> + '_> {
        Box::new(self.features.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::feature::{FieldType, Value};

    fn layer() -> MemoryLayer {
        MemoryLayer::table("/tmp/t.dbf", vec![Field::new("name", FieldType::String)])
            .with_features(
                (0..4)
                    .map(|i| Feature::new(i, None, vec![Value::from(format!("row{i}"))]))
                    .collect(),
            )
    }

    #[test]
    fn selection_filters_unknown_ids() {
        let mut layer = layer();
        layer.select([1, 3, 99]);
        assert_eq!(layer.selected_feature_count(), 2);
        let ids: Vec<u64> = layer.selected_features().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 3]);

        layer.clear_selection();
        assert_eq!(layer.selected_feature_count(), 0);
        assert_eq!(layer.features().count(), 4);
    }
}
