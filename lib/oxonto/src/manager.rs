use crate::config::{ManagerOptions, read_import_locations, write_import_locations};
use crate::document::OntologyDocument;
use crate::error::{ConfigError, DocumentError, ImportError, LoadError, RuleError, StoreError};
use crate::inference::{self, ConstraintReport, FixpointDriver, FixpointOutcome, PassOutput, RulePass};
use crate::location::LoadingLocation;
use crate::mapping::{ImportMapping, LocationTable};
use crate::namespaces::PrefixMap;
use crate::resolver::LocationResolver;
use crate::rules::{ReasonerKind, Rule, RuleSet};
use crate::store::{MemoryStore, TripleStore};
use crate::vocab::owl;
use crate::walker::{ImportWalker, uri_key};
use crate::web::{HttpWebAccess, WebAccess};
use oxiri::IriParseError;
use oxrdf::{Graph, NamedNode, Term, TermRef, TripleRef};
use oxrdfio::RdfFormat;
use rustc_hash::FxHashSet;
use sparesults::QuerySolution;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Loads ontologies with their imports, runs inferences on them and queries them.
///
/// The manager owns the import location mappings, the namespace map and the rule registry.
/// Independent managers share nothing.
///
/// ```
/// use oxonto::{LoadingLocation, OntologyManager};
/// use oxrdfio::RdfFormat;
///
/// let mut manager = OntologyManager::default();
/// let model = manager.load_ontology_from_slice(
///     b"@prefix : <http://example.com/onto#> . :Cat a <http://www.w3.org/2002/07/owl#Class> .",
///     Some("http://example.com/onto"),
///     RdfFormat::Turtle,
///     LoadingLocation::None,
/// )?;
/// assert!(manager.query_ask("ASK { :Cat a owl:Class }", &model)?);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct OntologyManager {
    options: ManagerOptions,
    resolver: LocationResolver,
    locations: LocationTable,
    namespaces: PrefixMap,
    rules: RuleSet,
}

impl OntologyManager {
    /// A manager fetching web documents over HTTP.
    pub fn new(options: ManagerOptions) -> Self {
        let web = HttpWebAccess::new(options.http_timeout(), options.http_redirection_limit());
        Self::with_web_access(options, Arc::new(web))
    }

    /// A manager fetching web documents with `web`.
    pub fn with_web_access(options: ManagerOptions, web: Arc<dyn WebAccess>) -> Self {
        let mut resolver = LocationResolver::new(web).with_source_directory(options.source_directory());
        if let Some(resource_root) = options.resource_root() {
            resolver = resolver.with_resource_root(resource_root);
        }
        Self {
            options,
            resolver,
            locations: LocationTable::new(),
            namespaces: PrefixMap::with_well_known(),
            rules: RuleSet::new(),
        }
    }

    #[inline]
    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    #[inline]
    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Forgets every mapping, namespace and registered rule. Options are kept.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.namespaces = PrefixMap::with_well_known();
        self.rules.clear();
        debug!("Ontology manager cleared");
    }

    // Import locations

    /// Records where the document of `uri` actually lives.
    ///
    /// `location` is a disk path (absolute or relative to the source directory), a URL
    /// or a path in the bundled resources, tried in that order as far as `policy` allows.
    /// Returns `None` and leaves the mappings untouched if it can't be found.
    pub fn add_import_location_mapping(
        &mut self,
        uri: &str,
        location: &str,
        policy: LoadingLocation,
    ) -> Option<ImportMapping> {
        self.resolver.resolve(&mut self.locations, uri, location, policy)
    }

    /// Returns the number of removed mappings.
    pub fn remove_import_location_mapping(&mut self, uri: &str) -> usize {
        let removed = self.locations.remove(uri);
        if removed == 0 {
            debug!(uri, "No import location mapping to remove");
        } else {
            info!(uri, "Removed import location mapping");
        }
        removed
    }

    #[inline]
    pub fn import_locations(&self) -> &LocationTable {
        &self.locations
    }

    /// Replaces every mapping. The locations are not checked.
    pub fn set_import_locations(&mut self, mappings: impl IntoIterator<Item = ImportMapping>) {
        self.locations = mappings.into_iter().collect();
    }

    /// Adds the mappings of an import location config file.
    ///
    /// Returns the number of entries whose location has been found.
    pub fn load_import_location_config(&mut self, path: impl AsRef<Path>) -> Result<usize, ConfigError> {
        let path = path.as_ref();
        let entries = read_import_locations(BufReader::new(File::open(path)?))?;
        let mut added = 0;
        for entry in &entries {
            if self
                .resolver
                .resolve(&mut self.locations, &entry.uri, &entry.path, entry.policy)
                .is_some()
            {
                added += 1;
            }
        }
        info!(path = %path.display(), entries = entries.len(), added, "Loaded import location config");
        Ok(added)
    }

    /// Writes the mappings to an import location config file.
    ///
    /// No file is written if there is no mapping.
    pub fn save_import_location_config(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if self.locations.is_empty() {
            warn!(path = %path.display(), "No import locations defined, not saving an empty config");
            return Ok(());
        }
        let file = BufWriter::new(File::create(path)?);
        write_import_locations(file, &self.locations.to_vec())?.flush()?;
        info!(path = %path.display(), mappings = self.locations.len(), "Saved import location config");
        Ok(())
    }

    // Namespaces

    /// Binds `prefix` to `uri`, replacing its previous namespace.
    ///
    /// Returns `false` if `prefix` is not a valid prefix name.
    pub fn add_prefix_mapping(&mut self, prefix: &str, uri: &str) -> bool {
        if !is_valid_prefix(prefix) {
            warn!(prefix, uri, "Could not set invalid prefix mapping");
            return false;
        }
        if let Some(previous) = self.namespaces.set(prefix, uri) {
            if previous != uri {
                debug!(prefix, previous, uri, "Overwriting prefix mapping");
            }
        }
        true
    }

    /// Binds the empty prefix.
    pub fn set_base_uri(&mut self, uri: &str) -> bool {
        debug!(previous = self.namespaces.base(), uri, "Setting base URI");
        self.add_prefix_mapping("", uri)
    }

    #[inline]
    pub fn namespaces(&self) -> &PrefixMap {
        &self.namespaces
    }

    #[inline]
    pub fn set_namespaces(&mut self, namespaces: PrefixMap) {
        self.namespaces = namespaces;
    }

    /// Expands a `prefix:local` name with the known namespaces.
    #[inline]
    pub fn expand_iri(&self, curie: &str) -> Option<String> {
        self.namespaces.expand(curie)
    }

    /// The known namespaces as SPARQL `PREFIX` declarations.
    #[inline]
    pub fn sparql_prefixes(&self) -> String {
        self.namespaces.to_sparql_prefixes()
    }

    // Models

    /// An empty model whose base namespace is `uri`.
    pub fn create_new_model(&mut self, uri: &str) -> OntologyDocument {
        self.set_base_uri(uri);
        let mut prefixes = PrefixMap::new();
        prefixes.set("", uri);
        OntologyDocument::new(Graph::new(), prefixes, Some(uri.to_owned()))
    }

    /// Loads the ontology `uri` and, as far as `policy` allows, its imports.
    ///
    /// The ontology itself is read from its import location mapping if there is one,
    /// else from the disk path `uri` (absolute or relative to the source directory),
    /// else from the web. The mappings take precedence over `policy`.
    pub fn load_ontology(
        &mut self,
        uri: &str,
        policy: LoadingLocation,
    ) -> Result<OntologyDocument, LoadError> {
        info!(uri, policy = %policy, "Loading ontology");
        let document = if let Some(mapping) = self.locations.lookup(uri) {
            self.resolver
                .open(mapping)
                .map_err(|error| document_error(uri, error))?
        } else if let Some(path) = self.disk_path(uri) {
            OntologyDocument::from_file(path, None).map_err(|error| document_error(uri, error))?
        } else {
            match self.resolver.open_location(uri, Some(uri)) {
                Ok(document) => document,
                Err(DocumentError::Io(e)) => {
                    error!(uri, error = %e, "Could not load ontology");
                    return Err(LoadError::NotFound { uri: uri.into() });
                }
                Err(error) => return Err(document_error(uri, error)),
            }
        };
        Ok(self.load_model(document, policy))
    }

    /// Parses an ontology and loads its imports as far as `policy` allows.
    pub fn load_ontology_from_slice(
        &mut self,
        data: &[u8],
        base_iri: Option<&str>,
        format: RdfFormat,
        policy: LoadingLocation,
    ) -> Result<OntologyDocument, LoadError> {
        self.load_ontology_from_reader(data, base_iri, format, policy)
    }

    /// Parses an ontology and loads its imports as far as `policy` allows.
    pub fn load_ontology_from_reader(
        &mut self,
        reader: impl Read,
        base_iri: Option<&str>,
        format: RdfFormat,
        policy: LoadingLocation,
    ) -> Result<OntologyDocument, LoadError> {
        info!(base = base_iri, format = %format, "Loading ontology from a stream");
        let document = OntologyDocument::parse_reader(reader, format, base_iri)
            .map_err(|error| document_error(base_iri.unwrap_or_default(), error))?;
        Ok(self.load_model(document, policy))
    }

    /// Reads an ontology out of `graph` of `store` and loads its imports as far as `policy` allows.
    ///
    /// The model gets the [namespaces](TripleStore::namespaces) of the store.
    pub fn load_ontology_from_store(
        &mut self,
        store: &dyn TripleStore,
        graph: Option<&NamedNode>,
        policy: LoadingLocation,
    ) -> Result<OntologyDocument, LoadError> {
        info!(graph = graph.map(NamedNode::as_str), "Loading ontology from a store");
        let triples = store.graph(graph)?;
        let document = OntologyDocument::new(
            triples,
            store.namespaces()?,
            graph.map(|g| g.as_str().to_owned()),
        );
        Ok(self.load_model(document, policy))
    }

    /// Adds the triples of `model` to `graph` of `store` and records its prefixes there.
    pub fn save_model_to_store(
        &self,
        model: &OntologyDocument,
        store: &dyn TripleStore,
        graph: Option<&NamedNode>,
    ) -> Result<(), StoreError> {
        let triples = model.graph().iter().map(TripleRef::into_owned).collect::<Vec<_>>();
        store.store_triples(&triples, graph)?;
        store.set_namespaces(&self.prefixes_with(model))?;
        info!(
            graph = graph.map(NamedNode::as_str),
            triples = triples.len(),
            "Model saved to a store"
        );
        Ok(())
    }

    /// Adds to `model` the triples of its imports.
    #[inline]
    pub fn load_imports(&mut self, model: OntologyDocument, policy: LoadingLocation) -> OntologyDocument {
        self.load_model(model, policy)
    }

    fn load_model(&mut self, mut document: OntologyDocument, policy: LoadingLocation) -> OntologyDocument {
        let start = Instant::now();
        for (prefix, namespace) in document.prefixes().iter() {
            self.namespaces.set(prefix, namespace);
        }
        if policy == LoadingLocation::None {
            debug!("Not loading any imports");
        } else {
            let walker = ImportWalker::new(&self.resolver, &self.locations)
                .with_ignored(self.options.ignored_imports());
            let closure = walker.expand(&document, policy, &mut self.namespaces);
            debug!(
                expanded = closure.expanded.len(),
                unresolved = closure.unresolved.len(),
                "Import namespaces expanded"
            );
            let imports = walker.collect_imports(&document, policy);
            let headers = import_headers(&document, &imports);
            let before = document.graph().len();
            for (uri, import) in &imports {
                for triple in import.graph() {
                    if let TermRef::NamedNode(subject) = TermRef::from(triple.subject) {
                        if headers.contains(subject.as_str()) {
                            continue;
                        }
                    }
                    document.graph_mut().insert(triple);
                }
                debug!(uri, triples = import.graph().len(), "Merged import");
            }
            debug!(
                imports = imports.len(),
                before,
                after = document.graph().len(),
                "Imports loaded"
            );
        }
        document.set_prefixes(self.namespaces.clone());
        match document.base_namespace() {
            Some(base) => info!(
                base,
                policy = %policy,
                elapsed = ?start.elapsed(),
                triples = document.graph().len(),
                "Ontology loaded"
            ),
            None => info!(
                policy = %policy,
                elapsed = ?start.elapsed(),
                triples = document.graph().len(),
                "Ontology loaded, it has no default namespace"
            ),
        }
        document
    }

    fn disk_path(&self, uri: &str) -> Option<String> {
        if Path::new(uri).is_file() {
            return Some(uri.to_owned());
        }
        let path = self.options.source_directory().join(uri);
        path.is_file().then(|| path.to_string_lossy().into_owned())
    }

    // Inference

    #[inline]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Registers `rule` for every later run, replacing and returning the rule with the same IRI.
    #[inline]
    pub fn register_rule(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule)
    }

    /// Runs the rules bound to classes until no new triple is inferred.
    ///
    /// The rules are the registered ones and the ones declared in `model`.
    /// Returns the inferred triples only, `model` is left untouched.
    pub fn run_rule_inferences(&self, model: &OntologyDocument) -> Result<FixpointOutcome, StoreError> {
        let rules = self.rules_with(model);
        let pass = RulePass::new(rules.class_rules().cloned()).with_prefixes(&self.prefixes_with(model));
        info!(rules = pass.rules().len(), "Starting rule inference");
        let outcome = FixpointDriver::new(self.options.fixpoint()).run(&pass, model.graph())?;
        info!(inferred = outcome.inferred.len(), iterations = outcome.iterations, "Rule inference done");
        Ok(outcome)
    }

    /// Checks the SPIN constraints of the registered rules and of `model` against `model`.
    ///
    /// Violations are logged as warnings and returned.
    pub fn check_constraints(&self, model: &OntologyDocument) -> Result<ConstraintReport, StoreError> {
        let rules = self.rules_with(model);
        let store = MemoryStore::from_graph(model.graph())?;
        let report = inference::check_constraints(
            &store,
            &rules,
            &self.prefixes_with(model).to_sparql_prefixes(),
            None,
        );
        info!(
            constraints = rules.constraints().count(),
            violations = report.violations.len(),
            "Constraints checked"
        );
        Ok(report)
    }

    /// Runs the built-in rules of `kind` until no new triple is inferred.
    ///
    /// Returns the inferred triples only, `model` is left untouched.
    pub fn run_class_level_inferences(
        &self,
        model: &OntologyDocument,
        kind: ReasonerKind,
    ) -> Result<FixpointOutcome, StoreError> {
        info!(reasoner = %kind, triples = model.graph().len(), "Starting class-level inference");
        let outcome =
            FixpointDriver::new(self.options.fixpoint()).run(&RulePass::for_reasoner(kind), model.graph())?;
        info!(inferred = outcome.inferred.len(), "Class-level inference done");
        Ok(outcome)
    }

    /// Runs once the rule `rule`, a full IRI or a `prefix:local` name, with `arguments` bound.
    pub fn run_rule(
        &self,
        rule: &str,
        arguments: &[(String, Term)],
        model: &OntologyDocument,
    ) -> Result<Graph, RuleError> {
        let prefixes = self.prefixes_with(model);
        let iri = full_iri(rule, &prefixes).map_err(|error| RuleError::InvalidIri {
            iri: rule.into(),
            error,
        })?;
        let store = MemoryStore::from_graph(model.graph()).map_err(|error| RuleError::Execution {
            rule: iri.clone(),
            error,
        })?;
        let start = Instant::now();
        let triples = inference::run_rule(
            &store,
            &self.rules_with(model),
            iri.as_ref(),
            arguments,
            &prefixes.to_sparql_prefixes(),
            None,
        )?;
        info!(rule = %iri, elapsed = ?start.elapsed(), triples = triples.len(), "Finished running rule");
        Ok(triples)
    }

    /// Runs once each rule of a strict subcategory of `category`, a full IRI or a `prefix:local` name.
    ///
    /// A failing rule is reported in [`PassOutput::failures`] and does not stop the other ones.
    pub fn run_rules_of_category(
        &self,
        category: &str,
        model: &OntologyDocument,
    ) -> Result<PassOutput, RuleError> {
        let prefixes = self.prefixes_with(model);
        let iri = full_iri(category, &prefixes).map_err(|error| RuleError::InvalidIri {
            iri: category.into(),
            error,
        })?;
        let execution = |error| RuleError::Execution {
            rule: iri.clone(),
            error,
        };
        let store = MemoryStore::from_graph(model.graph()).map_err(execution)?;
        let output = inference::run_rules_of_category(
            &store,
            &self.rules_with(model),
            iri.as_ref(),
            &prefixes.to_sparql_prefixes(),
            None,
        )
        .map_err(execution)?;
        info!(
            category = %iri,
            triples = output.triples.len(),
            failures = output.failures.len(),
            "Finished running rules of category"
        );
        Ok(output)
    }

    fn rules_with(&self, model: &OntologyDocument) -> RuleSet {
        let mut rules = RuleSet::from_graph(model.graph());
        rules.merge(self.rules.clone());
        rules
    }

    // Imports

    /// Declares that `model` imports `uri`, optionally binding `prefix` to it.
    pub fn add_import(
        &mut self,
        model: &mut OntologyDocument,
        uri: &str,
        prefix: Option<&str>,
    ) -> Result<(), ImportError> {
        let subject = ontology_subject(model).ok_or(ImportError::NoOntologyIri)?;
        let object = NamedNode::new(uri_key(uri)).map_err(|error| ImportError::InvalidIri {
            iri: uri.into(),
            error,
        })?;
        if let Some(prefix) = prefix {
            self.add_prefix_mapping(prefix, uri);
            model.prefixes_mut().set(prefix, uri);
        }
        model
            .graph_mut()
            .insert(TripleRef::new(subject.as_ref(), owl::IMPORTS, object.as_ref()));
        info!(ontology = %subject, import = %object, "Import added");
        Ok(())
    }

    /// Removes the `owl:imports` statement of `uri` from `model`. Prefixes are left alone.
    ///
    /// Returns `false` if there was no such statement.
    pub fn remove_import(&self, model: &mut OntologyDocument, uri: &str) -> bool {
        let Some(subject) = ontology_subject(model) else {
            return false;
        };
        let Ok(object) = NamedNode::new(uri_key(uri)) else {
            return false;
        };
        let removed = model
            .graph_mut()
            .remove(TripleRef::new(subject.as_ref(), owl::IMPORTS, object.as_ref()));
        if removed {
            info!(ontology = %subject, import = %object, "Import removed");
        }
        removed
    }

    /// The ontologies directly imported by `model`.
    pub fn imported_ontology_uris(&self, model: &OntologyDocument) -> Vec<NamedNode> {
        let Some(subject) = ontology_subject(model) else {
            return model.imports();
        };
        model
            .graph()
            .objects_for_subject_predicate(subject.as_ref(), owl::IMPORTS)
            .filter_map(|object| match object {
                TermRef::NamedNode(node) => Some(node.into_owned()),
                _ => None,
            })
            .collect()
    }

    // Queries

    pub fn query_select(
        &self,
        sparql: &str,
        model: &OntologyDocument,
    ) -> Result<Vec<QuerySolution>, StoreError> {
        self.model_store(model)?.select(&self.with_prefixes(sparql, model), None)
    }

    pub fn query_construct(&self, sparql: &str, model: &OntologyDocument) -> Result<Graph, StoreError> {
        let triples = self
            .model_store(model)?
            .construct(&self.with_prefixes(sparql, model), None)?;
        info!(triples = triples.len(), "Triples constructed by query");
        Ok(triples)
    }

    pub fn query_describe(&self, sparql: &str, model: &OntologyDocument) -> Result<Graph, StoreError> {
        self.model_store(model)?
            .describe(&self.with_prefixes(sparql, model), None)
    }

    pub fn query_ask(&self, sparql: &str, model: &OntologyDocument) -> Result<bool, StoreError> {
        self.model_store(model)?.ask(&self.with_prefixes(sparql, model), None)
    }

    /// Applies a SPARQL update to `model`. On failure `model` is left untouched.
    pub fn update(&self, sparql: &str, model: &mut OntologyDocument) -> Result<(), StoreError> {
        let store = self.model_store(model)?;
        store.update(&self.with_prefixes(sparql, model))?;
        let graph = store.graph(None)?;
        debug!(before = model.graph().len(), after = graph.len(), "Model updated");
        *model.graph_mut() = graph;
        Ok(())
    }

    fn model_store(&self, model: &OntologyDocument) -> Result<MemoryStore, StoreError> {
        if model.graph().is_empty() {
            warn!("Model is empty, the query will not return any results");
        }
        MemoryStore::from_graph(model.graph())
    }

    fn with_prefixes(&self, sparql: &str, model: &OntologyDocument) -> String {
        format!("{}\n{sparql}", self.prefixes_with(model).to_sparql_prefixes())
    }

    /// The known namespaces, overridden by the ones of `model`.
    fn prefixes_with(&self, model: &OntologyDocument) -> PrefixMap {
        let mut prefixes = self.namespaces.clone();
        for (prefix, namespace) in model.prefixes().iter() {
            prefixes.set(prefix, namespace);
        }
        prefixes
    }

    // Output

    /// Writes `model` to `path` with every known namespace.
    pub fn save_model(
        &self,
        model: &OntologyDocument,
        path: impl AsRef<Path>,
        format: RdfFormat,
    ) -> io::Result<()> {
        let path = path.as_ref();
        let start = Instant::now();
        let file = BufWriter::new(File::create(path)?);
        model
            .write_with_prefixes(file, format, &self.prefixes_with(model))?
            .flush()?;
        info!(
            path = %path.display(),
            triples = model.graph().len(),
            elapsed = ?start.elapsed(),
            "Model saved"
        );
        Ok(())
    }

    /// Serializes `model` with every known namespace.
    pub fn model_to_string(&self, model: &OntologyDocument, format: RdfFormat) -> io::Result<String> {
        let buffer = model.write_with_prefixes(Vec::new(), format, &self.prefixes_with(model))?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl Default for OntologyManager {
    fn default() -> Self {
        Self::new(ManagerOptions::default())
    }
}

fn document_error(uri: &str, error: DocumentError) -> LoadError {
    error!(uri, error = %error, "Could not read ontology");
    LoadError::Document {
        uri: uri.into(),
        error,
    }
}

/// The resource `owl:imports` statements of `model` hang from.
fn ontology_subject(model: &OntologyDocument) -> Option<NamedNode> {
    model
        .ontology_iri()
        .or_else(|| NamedNode::new(uri_key(model.base_namespace()?)).ok())
}

/// The IRIs of the imported ontologies whose header statements are dropped when merging.
fn import_headers(root: &OntologyDocument, imports: &[(String, OntologyDocument)]) -> FxHashSet<String> {
    let mut root_keys = FxHashSet::default();
    if let Some(iri) = root.ontology_iri() {
        root_keys.insert(uri_key(iri.as_str()).to_owned());
    }
    if let Some(base) = root.base_namespace() {
        root_keys.insert(uri_key(base).to_owned());
    }
    let mut headers = FxHashSet::default();
    for (uri, import) in imports {
        for iri in import
            .ontology_iri()
            .map(NamedNode::into_string)
            .into_iter()
            .chain([uri.clone()])
        {
            if !root_keys.contains(uri_key(&iri)) {
                headers.insert(iri);
            }
        }
    }
    headers
}

fn full_iri(name: &str, prefixes: &PrefixMap) -> Result<NamedNode, IriParseError> {
    NamedNode::new(prefixes.expand(name).unwrap_or_else(|| name.to_owned()))
}

/// The Turtle `PN_PREFIX` production, restricted to the common characters.
fn is_valid_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    chars.next().is_none_or(char::is_alphabetic)
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !prefix.ends_with('.')
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;

    const MODEL: &str = "@prefix : <http://ex.org/onto#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
<http://ex.org/onto> a owl:Ontology .
:Cat rdfs:subClassOf :Animal .
:tom a :Cat .";

    fn load(manager: &mut OntologyManager) -> Result<OntologyDocument, LoadError> {
        manager.load_ontology_from_slice(
            MODEL.as_bytes(),
            Some("http://ex.org/onto"),
            RdfFormat::Turtle,
            LoadingLocation::None,
        )
    }

    #[test]
    fn prefixes_are_validated() {
        let mut manager = OntologyManager::default();
        assert!(manager.add_prefix_mapping("ex", "http://ex.org/"));
        assert!(manager.add_prefix_mapping("", "http://ex.org/base#"));
        assert!(!manager.add_prefix_mapping("1ex", "http://ex.org/"));
        assert!(!manager.add_prefix_mapping("ex.", "http://ex.org/"));
        assert_eq!(manager.expand_iri("ex:a").as_deref(), Some("http://ex.org/a"));
        assert!(manager.sparql_prefixes().contains("PREFIX ex: <http://ex.org/>\n"));
    }

    #[test]
    fn new_model_has_a_base() {
        let mut manager = OntologyManager::default();
        let model = manager.create_new_model("http://ex.org/new#");
        assert_eq!(model.base_namespace(), Some("http://ex.org/new#"));
        assert_eq!(manager.namespaces().base(), Some("http://ex.org/new#"));
        assert!(model.graph().is_empty());
    }

    #[test]
    fn imports_can_be_added_and_removed() -> Result<(), ImportError> {
        let mut manager = OntologyManager::default();
        let mut model = manager.create_new_model("http://ex.org/new#");
        manager.add_import(&mut model, "http://ex.org/other#", Some("other"))?;
        assert_eq!(
            manager.imported_ontology_uris(&model),
            [NamedNode::new_unchecked("http://ex.org/other")]
        );
        assert_eq!(manager.namespaces().get("other"), Some("http://ex.org/other#"));
        assert!(manager.remove_import(&mut model, "http://ex.org/other#"));
        assert!(!manager.remove_import(&mut model, "http://ex.org/other#"));
        assert!(manager.imported_ontology_uris(&model).is_empty());
        assert_eq!(model.prefixes().get("other"), Some("http://ex.org/other#"));
        Ok(())
    }

    #[test]
    fn import_needs_an_ontology() {
        let mut manager = OntologyManager::default();
        let mut model = OntologyDocument::default();
        assert!(matches!(
            manager.add_import(&mut model, "http://ex.org/other", None),
            Err(ImportError::NoOntologyIri)
        ));
    }

    #[test]
    fn queries_get_known_prefixes() -> Result<(), Box<dyn std::error::Error>> {
        let mut manager = OntologyManager::default();
        let model = load(&mut manager)?;
        assert!(manager.query_ask("ASK { :tom a :Cat }", &model)?);
        let solutions = manager.query_select("SELECT ?c WHERE { ?c rdfs:subClassOf :Animal }", &model)?;
        assert_eq!(solutions.len(), 1);
        let constructed = manager.query_construct(
            "CONSTRUCT { ?x a :Animal } WHERE { ?x a ?c . ?c rdfs:subClassOf :Animal }",
            &model,
        )?;
        assert_eq!(constructed.len(), 1);
        Ok(())
    }

    #[test]
    fn failed_update_keeps_model() -> Result<(), Box<dyn std::error::Error>> {
        let mut manager = OntologyManager::default();
        let mut model = load(&mut manager)?;
        let size = model.graph().len();
        manager.update("INSERT DATA { :felix a :Cat }", &mut model)?;
        assert_eq!(model.graph().len(), size + 1);
        assert!(manager.update("INSERT DATA { :felix a ", &mut model).is_err());
        assert_eq!(model.graph().len(), size + 1);
        Ok(())
    }

    #[test]
    fn class_level_inference_does_not_touch_model() -> Result<(), Box<dyn std::error::Error>> {
        let mut manager = OntologyManager::default();
        let model = load(&mut manager)?;
        let size = model.graph().len();
        let outcome = manager.run_class_level_inferences(&model, ReasonerKind::RdfsSimple)?;
        assert!(outcome.is_converged());
        assert!(outcome.inferred.contains(TripleRef::new(
            NamedNode::new_unchecked("http://ex.org/onto#tom").as_ref(),
            oxrdf::vocab::rdf::TYPE,
            NamedNode::new_unchecked("http://ex.org/onto#Animal").as_ref(),
        )));
        assert_eq!(model.graph().len(), size);
        Ok(())
    }

    #[test]
    fn registered_rules_run_by_prefixed_name() -> Result<(), Box<dyn std::error::Error>> {
        let mut manager = OntologyManager::default();
        let model = load(&mut manager)?;
        manager.register_rule(Rule::new(
            NamedNode::new("http://ex.org/onto#animals")?,
            "CONSTRUCT { ?x a :Animal } WHERE { ?x a :Cat }",
        ));
        assert_eq!(manager.run_rule(":animals", &[], &model)?.len(), 1);
        assert!(matches!(
            manager.run_rule(":missing", &[], &model),
            Err(RuleError::UnknownRule(_))
        ));
        manager.clear();
        assert!(manager.rules().is_empty());
        Ok(())
    }
}
