use crate::location::LoadingLocation;
use std::collections::BTreeMap;
use std::fmt;

/// A verified binding of an ontology URI to the place its document actually lives.
///
/// The location is an absolute or relative path on disk, a path in the bundled resources or another URL.
/// `kind` tells where the location has been found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportMapping {
    uri: String,
    location: String,
    kind: LoadingLocation,
}

impl ImportMapping {
    #[inline]
    pub fn new(uri: impl Into<String>, location: impl Into<String>, kind: LoadingLocation) -> Self {
        Self {
            uri: uri.into(),
            location: location.into(),
            kind,
        }
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[inline]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[inline]
    pub fn kind(&self) -> LoadingLocation {
        self.kind
    }
}

impl fmt::Display for ImportMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> -> <{}> ({})", self.uri, self.location, self.kind)
    }
}

/// The table of [`ImportMapping`]s of an ontology manager, keyed by ontology URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationTable {
    mappings: BTreeMap<String, ImportMapping>,
}

impl LocationTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping and returns the one it replaces, if any.
    pub fn insert(&mut self, mapping: ImportMapping) -> Option<ImportMapping> {
        self.mappings.insert(mapping.uri.clone(), mapping)
    }

    /// Removes every mapping whose recorded URI is `uri`.
    ///
    /// Returns the number of removed mappings.
    pub fn remove(&mut self, uri: &str) -> usize {
        let before = self.mappings.len();
        self.mappings.retain(|_, mapping| mapping.uri != uri);
        before - self.mappings.len()
    }

    /// The mapping registered exactly for `uri`.
    #[inline]
    pub fn get(&self, uri: &str) -> Option<&ImportMapping> {
        self.mappings.get(uri)
    }

    /// Looks up `uri`, also trying its variants with and without a trailing `#` or `/`.
    ///
    /// Namespaces are usually written `http://example.com/onto#` while `owl:imports` uses `http://example.com/onto`.
    ///
    /// ```
    /// use oxonto::{ImportMapping, LoadingLocation, LocationTable};
    ///
    /// let mut table = LocationTable::new();
    /// table.insert(ImportMapping::new("http://example.com/onto#", "/tmp/onto.ttl", LoadingLocation::Directory));
    /// assert!(table.lookup("http://example.com/onto").is_some());
    /// ```
    pub fn lookup(&self, uri: &str) -> Option<&ImportMapping> {
        if let Some(mapping) = self.mappings.get(uri) {
            return Some(mapping);
        }
        if let Some(trimmed) = uri.strip_suffix(['#', '/']) {
            return self.mappings.get(trimmed);
        }
        self.mappings
            .get(&format!("{uri}#"))
            .or_else(|| self.mappings.get(&format!("{uri}/")))
    }

    #[inline]
    pub fn contains(&self, uri: &str) -> bool {
        self.lookup(uri).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.mappings.clear();
    }

    /// Iterates over the mappings ordered by URI.
    pub fn iter(&self) -> impl Iterator<Item = &ImportMapping> {
        self.mappings.values()
    }

    /// Exports the mappings as a list ordered by URI.
    pub fn to_vec(&self) -> Vec<ImportMapping> {
        self.mappings.values().cloned().collect()
    }
}

impl FromIterator<ImportMapping> for LocationTable {
    fn from_iter<I: IntoIterator<Item = ImportMapping>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl Extend<ImportMapping> for LocationTable {
    fn extend<I: IntoIterator<Item = ImportMapping>>(&mut self, iter: I) {
        for mapping in iter {
            self.insert(mapping);
        }
    }
}

impl<'a> IntoIterator for &'a LocationTable {
    type Item = &'a ImportMapping;
    type IntoIter = std::collections::btree_map::Values<'a, String, ImportMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.values()
    }
}
