//! Feature values and the insertion-ordered map that carries them.
//!
//! A single [`FeatureMap`] type backs the sparse map recovered from a
//! document, the default template, and the merged map used by positional
//! reconciliation. Iteration order is insertion order: re-inserting an
//! existing name replaces its value but keeps its original position, and a
//! new name is appended at the end. The positional fallback depends on this
//! ordering.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A numeric feature value as written in the source text.
///
/// Literals containing a decimal point are `Float`; all others are `Int`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
}

impl FeatureValue {
    /// Numeric value as submitted to the scorer.
    pub fn as_f64(self) -> f64 {
        match self {
            FeatureValue::Int(v) => v as f64,
            FeatureValue::Float(v) => v,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, FeatureValue::Int(_))
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Float(v) => write!(f, "{v:?}"),
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Int(v) => serializer.serialize_i64(*v),
            FeatureValue::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Insertion-ordered mapping from feature name to value. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMap {
    entries: Vec<(String, FeatureValue)>,
    index: HashMap<String, usize>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`. Returns the previous value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: FeatureValue) -> Option<FeatureValue> {
        let name = name.into();
        if let Some(&pos) = self.index.get(&name) {
            let old = std::mem::replace(&mut self.entries[pos].1, value);
            return Some(old);
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.index.get(name).map(|&pos| self.entries[pos].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = FeatureValue> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    /// Copy of `self` with every entry of `overlay` applied on top.
    ///
    /// Overlay values win; names unknown to `self` are appended in the
    /// overlay's order.
    pub fn overlaid_with(&self, overlay: &FeatureMap) -> FeatureMap {
        let mut merged = self.clone();
        for (name, value) in overlay.iter() {
            merged.insert(name, value);
        }
        merged
    }
}

impl<K: Into<String>> FromIterator<(K, FeatureValue)> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = (K, FeatureValue)>>(iter: I) -> Self {
        let mut map = FeatureMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for FeatureMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, &v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_keeps_position_and_replaces_value() {
        let mut m = FeatureMap::new();
        m.insert("a", FeatureValue::Int(1));
        m.insert("b", FeatureValue::Int(2));
        let old = m.insert("a", FeatureValue::Float(3.5));

        assert_eq!(old, Some(FeatureValue::Int(1)));
        assert_eq!(m.len(), 2);
        assert_eq!(m.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(m.get("a"), Some(FeatureValue::Float(3.5)));
    }

    #[test]
    fn overlay_appends_unknown_names() {
        let base: FeatureMap = [("x", FeatureValue::Int(0)), ("y", FeatureValue::Int(0))]
            .into_iter()
            .collect();
        let overlay: FeatureMap = [("z", FeatureValue::Int(9)), ("x", FeatureValue::Int(7))]
            .into_iter()
            .collect();

        let merged = base.overlaid_with(&overlay);
        assert_eq!(merged.names().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert_eq!(merged.get("x"), Some(FeatureValue::Int(7)));
        // Base untouched.
        assert_eq!(base.get("x"), Some(FeatureValue::Int(0)));
    }

    #[test]
    fn value_conversion() {
        assert_eq!(FeatureValue::Int(3).as_f64(), 3.0);
        assert_eq!(FeatureValue::Float(0.7).as_f64(), 0.7);
        assert!(FeatureValue::Int(1).is_int());
        assert!(!FeatureValue::Float(1.0).is_int());
    }

    #[test]
    fn serialises_in_insertion_order() {
        let m: FeatureMap = [("b", FeatureValue::Int(1)), ("a", FeatureValue::Float(1.5))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"b":1,"a":1.5}"#);
    }
}
