use rustc_hash::FxHashMap;
use std::fmt::Write;

/// Prefixes bound in every query sent through the manager.
pub const WELL_KNOWN_PREFIXES: [(&str, &str); 8] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("fn", "http://www.w3.org/2005/xpath-functions#"),
    ("spin", "http://spinrdf.org/spin#"),
    ("sp", "http://spinrdf.org/sp#"),
    ("spl", "http://spinrdf.org/spl#"),
];

/// Infrastructure prefixes whose namespaces are never followed as imports.
pub const SKIPPED_PREFIXES: [&str; 3] = ["xsd", "xml", "fn"];

/// An insertion-ordered map from prefixes to namespace IRIs.
///
/// The empty prefix is the base namespace.
/// One namespace may be bound to several prefixes: the first bound one is used to compact IRIs.
///
/// ```
/// use oxonto::PrefixMap;
///
/// let mut prefixes = PrefixMap::new();
/// assert!(prefixes.insert("ex", "http://example.com/"));
/// assert!(!prefixes.insert("ex", "http://example.org/"));
/// assert_eq!(prefixes.get("ex"), Some("http://example.com/"));
/// assert_eq!(prefixes.compact("http://example.com/foo").as_deref(), Some("ex:foo"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
    index: FxHashMap<String, usize>,
}

impl PrefixMap {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with the [`WELL_KNOWN_PREFIXES`].
    pub fn with_well_known() -> Self {
        WELL_KNOWN_PREFIXES.into_iter().collect()
    }

    /// Binds `prefix` unless it is already bound.
    ///
    /// Returns `true` if the binding has been added.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> bool {
        let prefix = prefix.into();
        if self.index.contains_key(&prefix) {
            return false;
        }
        self.index.insert(prefix.clone(), self.entries.len());
        self.entries.push((prefix, namespace.into()));
        true
    }

    /// Binds `prefix`, replacing its previous namespace in place.
    ///
    /// Returns the previous namespace.
    pub fn set(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Option<String> {
        let prefix = prefix.into();
        let namespace = namespace.into();
        if let Some(&position) = self.index.get(&prefix) {
            return Some(std::mem::replace(&mut self.entries[position].1, namespace));
        }
        self.index.insert(prefix.clone(), self.entries.len());
        self.entries.push((prefix, namespace));
        None
    }

    pub fn remove(&mut self, prefix: &str) -> Option<String> {
        let position = self.index.remove(prefix)?;
        let (_, namespace) = self.entries.remove(position);
        for value in self.index.values_mut() {
            if *value > position {
                *value -= 1;
            }
        }
        Some(namespace)
    }

    #[inline]
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.index
            .get(prefix)
            .map(|position| self.entries[*position].1.as_str())
    }

    #[inline]
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.index.contains_key(prefix)
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.entries.iter().any(|(_, ns)| ns == namespace)
    }

    /// The first prefix bound to `namespace`.
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, ns)| ns == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// The namespace bound to the empty prefix.
    #[inline]
    pub fn base(&self) -> Option<&str> {
        self.get("")
    }

    /// Expands a `prefix:local` name.
    ///
    /// Returns `None` if the prefix is not bound.
    pub fn expand(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        Some(format!("{}{local}", self.get(prefix)?))
    }

    /// Compacts `iri` with the longest matching namespace, using the first prefix bound to it.
    pub fn compact(&self, iri: &str) -> Option<String> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, namespace) in &self.entries {
            if namespace.is_empty() || !iri.starts_with(namespace.as_str()) {
                continue;
            }
            if best.is_none_or(|(_, ns)| namespace.len() > ns.len()) {
                best = Some((prefix, namespace));
            }
        }
        let (prefix, namespace) = best?;
        Some(format!("{prefix}:{}", &iri[namespace.len()..]))
    }

    /// The map as SPARQL `PREFIX` declarations, one per line.
    pub fn to_sparql_prefixes(&self) -> String {
        let mut output = String::new();
        for (prefix, namespace) in &self.entries {
            let _ = writeln!(output, "PREFIX {prefix}: <{namespace}>");
        }
        output
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl<P: Into<String>, N: Into<String>> FromIterator<(P, N)> for PrefixMap {
    fn from_iter<I: IntoIterator<Item = (P, N)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Adds the bindings with first-writer-wins semantics.
impl<P: Into<String>, N: Into<String>> Extend<(P, N)> for PrefixMap {
    fn extend<I: IntoIterator<Item = (P, N)>>(&mut self, iter: I) {
        for (prefix, namespace) in iter {
            self.insert(prefix, namespace);
        }
    }
}

impl PartialEq for PrefixMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for PrefixMap {}
