use crate::document::{OntologyDocument, guess_format};
use crate::error::DocumentError;
use crate::location::LoadingLocation;
use crate::mapping::{ImportMapping, LocationTable};
use crate::web::{HttpWebAccess, WebAccess};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Finds where the documents of ontology URIs actually live.
///
/// Candidate locations are tried as a disk path (as is, then relative to the source directory),
/// then as a URL, then relative to the bundled resource root, as far as the [`LoadingLocation`] policy allows.
#[derive(Clone)]
pub struct LocationResolver {
    source_directory: PathBuf,
    resource_root: Option<PathBuf>,
    web: Arc<dyn WebAccess>,
}

impl LocationResolver {
    /// A resolver looking up relative paths in the working directory and the web with `web`.
    pub fn new(web: Arc<dyn WebAccess>) -> Self {
        Self {
            source_directory: PathBuf::from("."),
            resource_root: None,
            web,
        }
    }

    /// The directory relative candidate paths are resolved against.
    #[inline]
    #[must_use]
    pub fn with_source_directory(mut self, source_directory: impl Into<PathBuf>) -> Self {
        self.source_directory = source_directory.into();
        self
    }

    /// The root of the bundled resources searched when the policy allows [`LoadingLocation::Classpath`].
    #[inline]
    #[must_use]
    pub fn with_resource_root(mut self, resource_root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(resource_root.into());
        self
    }

    #[inline]
    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    #[inline]
    pub fn resource_root(&self) -> Option<&Path> {
        self.resource_root.as_deref()
    }

    #[inline]
    pub fn web(&self) -> &dyn WebAccess {
        self.web.as_ref()
    }

    /// Finds the first existing location for `candidate` and the kind of source it has been found in.
    pub fn locate(&self, candidate: &str, policy: LoadingLocation) -> Option<(String, LoadingLocation)> {
        if policy.allows_directory() {
            if Path::new(candidate).is_file() {
                return Some((candidate.to_owned(), LoadingLocation::Directory));
            }
            let in_source_directory = self.source_directory.join(candidate);
            if in_source_directory.is_file() {
                return Some((
                    in_source_directory.to_string_lossy().into_owned(),
                    LoadingLocation::Directory,
                ));
            }
            debug!(candidate, "Not found on disk");
        }
        if policy.allows_web() {
            if self.web.exists(candidate) {
                return Some((candidate.to_owned(), LoadingLocation::Web));
            }
            debug!(candidate, "Not found on the web");
        }
        if policy.allows_classpath() {
            if let Some(resource_root) = &self.resource_root {
                let resource = resource_root.join(candidate.trim_start_matches('/'));
                if resource.is_file() {
                    return Some((
                        resource.to_string_lossy().into_owned(),
                        LoadingLocation::Classpath,
                    ));
                }
                debug!(candidate, "Not found in the bundled resources");
            }
        }
        None
    }

    /// Locates `candidate` and records it as the location of `uri` in `table`.
    ///
    /// Returns the recorded mapping, or `None` if no location has been found.
    /// In that case the table is left untouched.
    pub fn resolve(
        &self,
        table: &mut LocationTable,
        uri: &str,
        candidate: &str,
        policy: LoadingLocation,
    ) -> Option<ImportMapping> {
        let Some((location, kind)) = self.locate(candidate, policy) else {
            warn!(
                uri,
                location = candidate,
                policy = %policy,
                "Ontology location does not exist, no import location mapping added"
            );
            return None;
        };
        let mapping = ImportMapping::new(uri, location, kind);
        if let Some(previous) = table.insert(mapping.clone()) {
            if previous != mapping {
                info!(
                    uri,
                    previous = previous.location(),
                    location = mapping.location(),
                    "Overwriting import location mapping"
                );
            }
        } else {
            info!(uri, location = mapping.location(), kind = %kind, "Added import location mapping");
        }
        Some(mapping)
    }

    /// Checks that a recorded location can still be read.
    pub fn is_reachable(&self, location: &str) -> bool {
        Path::new(location).is_file() || self.web.exists(location)
    }

    /// Reads the document of a recorded mapping.
    #[inline]
    pub fn open(&self, mapping: &ImportMapping) -> Result<OntologyDocument, DocumentError> {
        self.open_location(mapping.location(), Some(mapping.uri()))
    }

    /// Reads the document at `location`, a disk path or a URL.
    pub fn open_location(
        &self,
        location: &str,
        base_iri: Option<&str>,
    ) -> Result<OntologyDocument, DocumentError> {
        if Path::new(location).is_file() {
            return OntologyDocument::from_file(location, base_iri.map(strip_fragment));
        }
        let document = self.web.fetch(location)?;
        let format = guess_format(location, Some(&document.content_type), &document.body);
        debug!(location, format = %format, "Parsing downloaded ontology");
        OntologyDocument::parse_slice(&document.body, format, base_iri.map(strip_fragment))
    }
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new(Arc::new(HttpWebAccess::default()))
    }
}

fn strip_fragment(iri: &str) -> &str {
    iri.split_once('#').map_or(iri, |(base, _)| base)
}
