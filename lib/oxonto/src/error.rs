use oxigraph::sparql::{QueryEvaluationError, SparqlSyntaxError, UpdateEvaluationError};
use oxigraph::store::StorageError;
use oxiri::IriParseError;
use oxrdf::NamedNode;
use oxrdfio::RdfParseError;
use sparesults::QueryResultsParseError;
use std::io;

/// An error raised while reading a single RDF document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// The bytes could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The bytes are not valid RDF in the detected format.
    #[error(transparent)]
    Parse(#[from] RdfParseError),
    /// The base IRI given for the document is not a valid IRI.
    #[error("Invalid base IRI {iri}: {error}")]
    InvalidBaseIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
}

/// Failure to load the entry ontology of a load request.
///
/// Unreachable imports never produce this error: they only make the namespace map poorer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The ontology could not be located on disk, in the bundled resources or on the web.
    #[error(
        "Could not load ontology <{uri}>. If it is not actually located at this URI, add an import location mapping before loading it"
    )]
    NotFound { uri: String },
    /// The ontology was located but could not be read.
    #[error("Could not read ontology <{uri}>: {error}")]
    Document {
        uri: String,
        #[source]
        error: DocumentError,
    },
    /// The ontology could not be read out of a triple store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An error returned by a [`TripleStore`](crate::TripleStore) operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The SPARQL query or update is not syntactically valid.
    #[error(transparent)]
    Syntax(#[from] SparqlSyntaxError),
    /// The query evaluation failed.
    #[error(transparent)]
    Evaluation(#[from] QueryEvaluationError),
    /// The update evaluation failed.
    #[error(transparent)]
    Update(#[from] UpdateEvaluationError),
    /// The underlying storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The remote endpoint could not be reached or answered with an error.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The remote endpoint returned invalid SPARQL results.
    #[error(transparent)]
    Results(#[from] QueryResultsParseError),
    /// The remote endpoint returned an invalid RDF graph.
    #[error(transparent)]
    Rdf(#[from] RdfParseError),
    /// The query returned another kind of result than the operation expects.
    #[error("Expected {expected} from the query but got {actual}")]
    UnexpectedResults {
        expected: &'static str,
        actual: &'static str,
    },
    /// The remote endpoint answered with a media type we can't parse.
    #[error("The content type {0} returned by the endpoint is not supported")]
    UnsupportedContentType(String),
    /// The triple count query did not return a usable number.
    #[error("The store did not return a valid triple count")]
    InvalidCount,
}

/// An error raised by a single rule execution.
///
/// During a fixpoint run these are collected as [`RuleFailure`](crate::RuleFailure)s and never abort the pass.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// No rule is registered under this IRI.
    #[error("Trying to execute unknown rule <{0}>")]
    UnknownRule(String),
    /// A required argument has not been bound by the caller.
    #[error("Argument {argument} of rule {rule} is missing")]
    MissingArgument { rule: NamedNode, argument: String },
    /// The rule body is empty.
    #[error("Rule {0} has no body")]
    MissingBody(NamedNode),
    /// The rule body is not a valid SPARQL CONSTRUCT query.
    #[error("Rule {rule} has an invalid body: {error}")]
    InvalidBody {
        rule: NamedNode,
        #[source]
        error: SparqlSyntaxError,
    },
    /// The rule body is a valid query but not a CONSTRUCT one.
    #[error("Rule {0} body is not a CONSTRUCT query")]
    NotConstruct(NamedNode),
    /// The constraint body is neither an ASK nor a CONSTRUCT query.
    #[error("Constraint {0} body is neither an ASK nor a CONSTRUCT query")]
    NotConstraint(NamedNode),
    /// An argument name is not a valid SPARQL variable name.
    #[error("Argument {variable} of rule {rule} is not a valid variable name")]
    InvalidVariable { rule: NamedNode, variable: String },
    /// Blank nodes cannot be bound in a `VALUES` block.
    #[error("Argument {variable} of rule {rule} is bound to a blank node")]
    BlankNodeBinding { rule: NamedNode, variable: String },
    /// The rule or category name does not expand to a valid IRI.
    #[error("Invalid rule IRI {iri}: {error}")]
    InvalidIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
    /// The store failed while evaluating the rule.
    #[error("Error running rule {rule}: {error}")]
    Execution {
        rule: NamedNode,
        #[source]
        error: StoreError,
    },
}

/// An error raised while editing the `owl:imports` statements of a model.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImportError {
    /// The model has neither an `owl:Ontology` resource nor a base namespace.
    #[error("The model has no ontology IRI to attach imports to")]
    NoOntologyIri,
    /// The imported URI is not a valid IRI.
    #[error("Invalid import IRI {iri}: {error}")]
    InvalidIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
}

/// An error raised while reading or writing an import location config file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The file is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
}
