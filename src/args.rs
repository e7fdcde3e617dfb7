//! The decoded key → values bag.

use std::fmt;

use ahash::AHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Multi-map from a string key to the ordered list of values given for it.
///
/// A key that is present always has at least one value (the empty string is a valid
/// value). There is no way to create an entry with zero values: absence of the key is the
/// only representation of "no values".
///
/// ```rust
/// let args = serde_ptargs::parse("cert=abc;iat-mode=0;iat-mode=1").unwrap();
/// assert_eq!(args.get("cert"), Some("abc"));
/// assert_eq!(args.get_all("iat-mode").unwrap(), ["0", "1"]);
/// assert_eq!(args.get("missing"), None);
/// ```
#[derive(Clone, Default)]
pub struct Args {
    map: AHashMap<String, Vec<String>>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value associated with `key`, or `None` if the key is absent.
    ///
    /// Use [`Args::get_all`] when every value is needed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values associated with `key`, in order of appearance.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.map.get(key).map(Vec::as_slice)
    }

    /// Append `value` to the list of values for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.entry(key.into()).or_default().push(value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Iterate over `(key, values)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `(key, values)` pairs sorted by key.
    pub fn sorted(&self) -> Vec<(&str, &[String])> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl PartialEq for Args {
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len()
            && self
                .map
                .iter()
                .all(|(key, values)| other.map.get(key) == Some(values))
    }
}

impl Eq for Args {}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.sorted()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Args::new();
        args.extend(iter);
        args
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Args {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl IntoIterator for Args {
    type Item = (String, Vec<String>);
    type IntoIter = std::collections::hash_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

/// Serializes as a map of key to list of values, sorted by key.
///
/// This is a plain structural view for reporting; it does not produce the escaped
/// `k=v;k=v` form.
impl Serialize for Args {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.sorted();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, values) in entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}
