//! Flat `KEY=VALUE` configuration map and its text form.
//!
//! # Design
//! - Entries keep their first-seen position; overwriting a key updates it in place.
//! - Parsing is lenient: lines without a usable key are dropped, never reported.
//! - Values are written verbatim, so a value containing a newline does not
//!   survive a save/load round-trip.
//! - Keys arriving as JSON are rejected unless they parse back unchanged.

use std::fmt::{self, Display, Formatter};

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_CONFIG;

/// Ordered mapping from configuration key to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: Vec<(String, String)>,
}

impl ConfigMap {
    /// Construct an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Map holding the canonical default configuration.
    #[must_use]
    pub fn defaults() -> Self {
        DEFAULT_CONFIG.iter().copied().collect()
    }

    /// Parse `KEY=VALUE` lines.
    ///
    /// Only the first `=` separates key from value. Keys are trimmed and values
    /// kept verbatim apart from a CRLF line ending; lines without `=` or with an
    /// empty key are skipped. A repeated key keeps its first position and takes
    /// the last value.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut map = Self::new();
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            map.insert(key, value);
        }
        map
    }

    /// Render the map as newline-joined `KEY=VALUE` lines without a trailing newline.
    #[must_use]
    pub fn to_env_string(&self) -> String {
        self.to_string()
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, slot)) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| *existing == key)
        {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> Iter<'_> {
        let project: fn(&(String, String)) -> (&str, &str) = entry_as_str;
        self.entries.iter().map(project)
    }

    /// Iterate keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Defaults overlaid with this map's values.
    ///
    /// Default keys come first in default order, followed by keys only this map has.
    #[must_use]
    pub fn merged_over_defaults(&self) -> Self {
        let mut merged = Self::defaults();
        for (key, value) in self {
            merged.insert(key, value);
        }
        merged
    }
}

impl Display for ConfigMap {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                formatter.write_str("\n")?;
            }
            write!(formatter, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Borrowing iterator over `(key, value)` pairs.
pub type Iter<'a> =
    std::iter::Map<std::slice::Iter<'a, (String, String)>, fn(&(String, String)) -> (&str, &str)>;

fn entry_as_str((key, value): &(String, String)) -> (&str, &str) {
    (key.as_str(), value.as_str())
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for ConfigMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl Serialize for ConfigMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConfigMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConfigMapVisitor)
    }
}

struct ConfigMapVisitor;

impl<'de> Visitor<'de> for ConfigMapVisitor {
    type Value = ConfigMap;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("a flat object of configuration values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = ConfigMap::new();
        while let Some((key, ScalarValue(value))) = access.next_entry::<String, ScalarValue>()? {
            if let Some(problem) = key_problem(&key) {
                return Err(de::Error::custom(format!("invalid key {key:?}: {problem}")));
            }
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Why `key` would not come back unchanged from [`ConfigMap::parse`].
fn key_problem(key: &str) -> Option<&'static str> {
    if key.trim().is_empty() {
        Some("key is empty")
    } else if key.contains(['=', '\n', '\r']) {
        Some("key contains `=` or a line break")
    } else if key.trim() != key {
        Some("key has surrounding whitespace")
    } else {
        None
    }
}

/// Scalar JSON value coerced to its string form.
struct ScalarValue(String);

impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = ScalarValue;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(ScalarValue(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(ScalarValue(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(ScalarValue(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(ScalarValue(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(ScalarValue(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(ScalarValue(value.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarValue(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarValue(String::new()))
    }
}
