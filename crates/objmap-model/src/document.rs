//! Configuration document types.
//!
//! These mirror the JSON configuration file one-to-one:
//!
//! ```json
//! {
//!   "mappablePackages": ["com.example.models"],
//!   "mappings": [
//!     {
//!       "sourceClass": "com.example.models.Person",
//!       "targetClass": "com.example.models.Persoon",
//!       "fields": { "firstName": "voornaam" }
//!     }
//!   ]
//! }
//! ```

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root of a mapping configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// Namespace prefixes whose instances are converted recursively.
    #[serde(default)]
    pub mappable_packages: Vec<String>,
    /// Per type pair field correspondences, in declaration order.
    #[serde(default)]
    pub mappings: Vec<MappingEntry>,
}

/// Field correspondences for one source/target type pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    pub source_class: String,
    pub target_class: String,
    pub fields: FieldMap,
}

impl MappingEntry {
    pub fn new(source_class: impl Into<String>, target_class: impl Into<String>) -> Self {
        Self {
            source_class: source_class.into(),
            target_class: target_class.into(),
            fields: FieldMap::new(),
        }
    }
}

/// Ordered source-field to target-field map with unique source keys.
///
/// Serialized as a JSON object. Declaration order is kept so that fields
/// are transferred in the order the configuration lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair. An existing source key keeps its position and has
    /// its target replaced; the previous target is returned.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) -> Option<String> {
        let source = source.into();
        let target = target.into();
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == source) {
            return Some(std::mem::replace(&mut entry.1, target));
        }
        self.entries.push((source, target));
        None
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == source)
            .map(|(_, target)| target.as_str())
    }

    pub fn contains_source(&self, source: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (source, target) in iter {
            map.insert(source, target);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (source, target) in &self.entries {
            map.serialize_entry(source, target)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldMapVisitor)
    }
}

struct FieldMapVisitor;

impl<'de> Visitor<'de> for FieldMapVisitor {
    type Value = FieldMap;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object of source field names to target field names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
        let mut map = FieldMap::new();
        while let Some((source, target)) = access.next_entry::<String, String>()? {
            if map.contains_source(&source) {
                return Err(de::Error::custom(format_args!(
                    "duplicate field mapping for '{source}'"
                )));
            }
            map.entries.push((source, target));
        }
        Ok(map)
    }
}
