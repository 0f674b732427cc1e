use crate::document::OntologyDocument;
use crate::location::LoadingLocation;
use crate::mapping::LocationTable;
use crate::namespaces::{PrefixMap, SKIPPED_PREFIXES};
use crate::resolver::LocationResolver;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, warn};

/// What an [`ImportWalker::expand`] traversal did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportClosure {
    /// Imported namespaces whose documents have been read, in visit order.
    pub expanded: Vec<String>,
    /// Imported namespaces whose documents could not be found or read.
    pub unresolved: Vec<String>,
}

/// Walks the import graph of an ontology.
///
/// Each imported ontology is visited at most once per traversal, so cyclic imports terminate.
/// Documents are read at most once per walker: [`expand`](Self::expand) then
/// [`collect_imports`](Self::collect_imports) on the same walker download each import once.
/// Unreachable or invalid imports are logged and skipped.
pub struct ImportWalker<'a> {
    resolver: &'a LocationResolver,
    locations: &'a LocationTable,
    ignored: &'a [String],
    documents: RefCell<FxHashMap<(String, LoadingLocation), Option<Rc<OntologyDocument>>>>,
}

impl<'a> ImportWalker<'a> {
    pub fn new(resolver: &'a LocationResolver, locations: &'a LocationTable) -> Self {
        Self {
            resolver,
            locations,
            ignored: &[],
            documents: RefCell::default(),
        }
    }

    /// Imports that are never followed.
    #[must_use]
    pub fn with_ignored(mut self, ignored: &'a [String]) -> Self {
        self.ignored = ignored;
        self
    }

    /// Merges into `prefixes` the prefix declarations of `root` and of its transitively imported ontologies.
    ///
    /// Only imports that have a prefix in the document importing them are followed.
    /// Existing bindings of `prefixes` are never overwritten.
    pub fn expand(
        &self,
        root: &OntologyDocument,
        policy: LoadingLocation,
        prefixes: &mut PrefixMap,
    ) -> ImportClosure {
        let mut closure = ImportClosure::default();
        prefixes.extend(root.prefixes().iter());
        let mut seen = root_uris(root);
        let mut expanded_prefixes = FxHashSet::<String>::default();
        let mut worklist = VecDeque::new();
        for (prefix, uri) in root.prefixed_imports() {
            if seen.insert(uri_key(&uri).to_owned()) {
                worklist.push_back((prefix, uri));
            } else {
                prefixes.insert(prefix, uri);
            }
        }

        while let Some((prefix, uri)) = worklist.pop_front() {
            prefixes.insert(prefix.as_str(), uri.as_str());
            if prefix.is_empty() || SKIPPED_PREFIXES.contains(&prefix.as_str()) {
                continue;
            }
            if self.is_ignored(&uri) {
                debug!(uri, "Import is ignored");
                continue;
            }
            expanded_prefixes.insert(prefix.clone());
            let Some(document) = self.read(&uri, policy) else {
                warn!(prefix, uri, "Could not expand the namespaces of import");
                closure.unresolved.push(uri);
                continue;
            };
            for (p, namespace) in document.prefixes().iter() {
                if !p.is_empty() {
                    prefixes.insert(p, namespace);
                }
            }
            for (p, namespace) in document.prefixed_imports() {
                if expanded_prefixes.contains(&p) || !seen.insert(uri_key(&namespace).to_owned()) {
                    continue;
                }
                worklist.push_back((p, namespace));
            }
            closure.expanded.push(uri);
        }
        closure
    }

    /// Reads the documents of every ontology transitively imported by `root`, in visit order.
    ///
    /// Returns the imported URIs with their documents.
    pub fn collect_imports(
        &self,
        root: &OntologyDocument,
        policy: LoadingLocation,
    ) -> Vec<(String, OntologyDocument)> {
        let mut documents = Vec::new();
        let mut seen = root_uris(root);
        let mut worklist = VecDeque::new();
        for import in root.imports() {
            if seen.insert(uri_key(import.as_str()).to_owned()) {
                worklist.push_back(import.into_string());
            }
        }

        while let Some(uri) = worklist.pop_front() {
            if self.is_ignored(&uri) {
                debug!(uri, "Import is ignored");
                continue;
            }
            let Some(document) = self.read(&uri, policy) else {
                warn!(uri, "Could not load import");
                continue;
            };
            for import in document.imports() {
                if seen.insert(uri_key(import.as_str()).to_owned()) {
                    worklist.push_back(import.into_string());
                }
            }
            documents.push((uri, OntologyDocument::clone(&document)));
        }
        documents
    }

    /// The location to read `uri` from: a recorded mapping, else the URI itself if the web may be searched.
    ///
    /// The web location is not checked: reading it tells whether it exists.
    pub fn find_location(&self, uri: &str, policy: LoadingLocation) -> Option<String> {
        if let Some(mapping) = self.locations.lookup(uri) {
            return Some(mapping.location().to_owned());
        }
        if policy.allows_web() {
            return Some(uri.to_owned());
        }
        debug!(uri, policy = %policy, "No location for import");
        None
    }

    fn read(&self, uri: &str, policy: LoadingLocation) -> Option<Rc<OntologyDocument>> {
        let key = (uri_key(uri).to_owned(), policy);
        if let Some(document) = self.documents.borrow().get(&key) {
            return document.clone();
        }
        let document = self.find_location(uri, policy).and_then(|location| {
            match self.resolver.open_location(&location, Some(uri)) {
                Ok(document) => Some(Rc::new(document)),
                Err(e) => {
                    warn!(uri, location, error = %e, "Could not read import");
                    None
                }
            }
        });
        self.documents.borrow_mut().insert(key, document.clone());
        document
    }

    fn is_ignored(&self, uri: &str) -> bool {
        let key = uri_key(uri);
        self.ignored.iter().any(|ignored| uri_key(ignored) == key)
    }
}

/// The URIs a document is known under.
fn root_uris(root: &OntologyDocument) -> FxHashSet<String> {
    let mut seen = FxHashSet::default();
    if let Some(namespace) = root.base_namespace() {
        seen.insert(uri_key(namespace).to_owned());
    }
    if let Some(iri) = root.ontology_iri() {
        seen.insert(uri_key(iri.as_str()).to_owned());
    }
    seen
}

/// `http://ex.org/a#`, `http://ex.org/a/` and `http://ex.org/a` denote the same ontology.
pub(crate) fn uri_key(uri: &str) -> &str {
    uri.trim_end_matches(['#', '/'])
}
