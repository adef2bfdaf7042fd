//! Ordered `name → value` maps for attributes and style declarations.
//!
//! Markup attribute order and declaration order are both meaningful to
//! authors, so the map keeps insertion order. Overwriting an existing key
//! keeps its original position.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclMap {
    entries: SmallVec<[(String, String); 4]>,
}

impl DeclMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Insert or overwrite. Returns the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        if let Some((_, v)) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            return Some(std::mem::replace(v, value));
        }
        self.entries.push((name, value));
        None
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeclMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = DeclMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl Serialize for DeclMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct DeclMapVisitor;

impl<'de> Visitor<'de> for DeclMapVisitor {
    type Value = DeclMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of string names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DeclMap, A::Error> {
        let mut map = DeclMap::new();
        while let Some((k, v)) = access.next_entry::<String, String>()? {
            map.set(k, v);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for DeclMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DeclMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overwrite_keeps_position() {
        let mut m = DeclMap::new();
        m.set("color", "red");
        m.set("padding", "4px");
        let prev = m.set("color", "blue");
        assert_eq!(prev.as_deref(), Some("red"));
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["color", "padding"]);
        assert_eq!(m.get("color"), Some("blue"));
    }

    #[test]
    fn json_preserves_insertion_order() {
        let m: DeclMap = [("z-index", "2"), ("align-items", "center"), ("margin", "0")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"z-index":"2","align-items":"center","margin":"0"}"#);

        let back: DeclMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn remove_and_retain() {
        let mut m: DeclMap = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(m.remove("b").as_deref(), Some("2"));
        assert_eq!(m.remove("b"), None);
        m.retain(|k, _| k != "a");
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("c"), Some("3"));
    }
}
