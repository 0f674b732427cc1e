use crate::error::StoreError;
use crate::namespaces::PrefixMap;
use crate::store::{TripleStore, data_update, update_target};
use crate::web::{http_client, invalid_input_error};
use oxhttp::model::header::{ACCEPT, CONTENT_TYPE};
use oxhttp::model::{Body, Method, Request};
use oxrdf::{Graph, NamedNode, Term, Triple};
use oxrdfio::{RdfFormat, RdfParser};
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput,
};
use std::io::{Error, Result as IoResult};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::form_urlencoded;

const RESULTS_ACCEPT: &str = "application/sparql-results+json, application/sparql-results+xml;q=0.9";
const GRAPH_ACCEPT: &str =
    "application/n-triples, text/turtle;q=0.9, application/rdf+xml;q=0.8";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Endpoints and protocol options of an [`HttpStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStoreConfig {
    select_endpoint: String,
    update_endpoint: Option<String>,
    query_parameter: String,
    update_parameter: String,
    timeout: Option<Duration>,
    redirection_limit: usize,
}

impl HttpStoreConfig {
    /// Queries and updates are both sent to `endpoint` unless [`with_update_endpoint`](Self::with_update_endpoint) is used.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            select_endpoint: endpoint.into(),
            update_endpoint: None,
            query_parameter: "query".into(),
            update_parameter: "update".into(),
            timeout: None,
            redirection_limit: 5,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_update_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.update_endpoint = Some(endpoint.into());
        self
    }

    /// The form parameter carrying queries, `query` by default.
    #[inline]
    #[must_use]
    pub fn with_query_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.query_parameter = parameter.into();
        self
    }

    /// The form parameter carrying updates, `update` by default.
    #[inline]
    #[must_use]
    pub fn with_update_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.update_parameter = parameter.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_redirection_limit(mut self, redirection_limit: usize) -> Self {
        self.redirection_limit = redirection_limit;
        self
    }

    #[inline]
    pub fn select_endpoint(&self) -> &str {
        &self.select_endpoint
    }

    #[inline]
    pub fn update_endpoint(&self) -> &str {
        self.update_endpoint
            .as_deref()
            .unwrap_or(&self.select_endpoint)
    }
}

/// A [`TripleStore`] behind a [SPARQL 1.1 protocol](https://www.w3.org/TR/sparql11-protocol/) endpoint.
///
/// Queries and updates are sent as form-encoded POST requests.
///
/// The protocol has no way to list the prefixes of a store: [`namespaces`](TripleStore::namespaces)
/// returns the prefixes declared by the graphs the endpoint returned and the ones set on this store.
#[derive(Clone)]
pub struct HttpStore {
    config: HttpStoreConfig,
    client: Arc<oxhttp::Client>,
    namespaces: Arc<RwLock<PrefixMap>>,
}

impl HttpStore {
    pub fn new(config: HttpStoreConfig) -> Self {
        let client = http_client(config.timeout, config.redirection_limit);
        Self {
            config,
            client: Arc::new(client),
            namespaces: Arc::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    fn post_form(
        &self,
        url: &str,
        parameters: &[(&str, &str)],
        accept: &'static str,
    ) -> IoResult<(String, Body)> {
        let payload = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(parameters)
            .finish();
        let request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(ACCEPT, accept)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(payload.into_bytes())
            .map_err(invalid_input_error)?;
        let response = self.client.request(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::other(format!(
                "Error {} returned by {} with payload:\n{}",
                status,
                url,
                response.into_body().to_string()?
            )));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        Ok((content_type, response.into_body()))
    }

    fn query(
        &self,
        query: &str,
        graph: Option<&NamedNode>,
        accept: &'static str,
    ) -> Result<(String, Body), StoreError> {
        let mut parameters = vec![(self.config.query_parameter.as_str(), query)];
        if let Some(graph) = graph {
            parameters.push(("default-graph-uri", graph.as_str()));
        }
        debug!(endpoint = %self.config.select_endpoint, query, "Sending SPARQL query");
        Ok(self.post_form(&self.config.select_endpoint, &parameters, accept)?)
    }

    fn results(
        &self,
        query: &str,
        graph: Option<&NamedNode>,
    ) -> Result<ReaderQueryResultsParserOutput<Body>, StoreError> {
        let (content_type, body) = self.query(query, graph, RESULTS_ACCEPT)?;
        let format = QueryResultsFormat::from_media_type(&content_type)
            .ok_or(StoreError::UnsupportedContentType(content_type))?;
        Ok(QueryResultsParser::from_format(format).for_reader(body)?)
    }

    /// Deletes the remaining triples of a graph, for endpoints that ignore `CLEAR` or `DROP`.
    fn delete_all(&self, graph: Option<&NamedNode>) -> Result<(), StoreError> {
        if self.triple_count(graph)? == 0 {
            return Ok(());
        }
        warn!(
            endpoint = self.config.update_endpoint(),
            graph = %update_target(graph),
            "Graph is still not empty, deleting its triples"
        );
        self.update(&match graph {
            Some(graph) => format!("DELETE WHERE {{ GRAPH {graph} {{ ?s ?p ?o }} }}"),
            None => "DELETE WHERE { ?s ?p ?o }".to_owned(),
        })
    }
}

impl TripleStore for HttpStore {
    /// Checks that the graph contains at least one triple: the protocol has no way to observe empty graphs.
    fn graph_exists(&self, graph: &NamedNode) -> Result<bool, StoreError> {
        self.ask(&format!("ASK {{ GRAPH {graph} {{ ?s ?p ?o }} }}"), None)
    }

    fn create_graph(&self, graph: &NamedNode) -> Result<(), StoreError> {
        self.update(&format!("CREATE SILENT GRAPH {graph}"))
    }

    fn clear_graph(&self, graph: Option<&NamedNode>) -> Result<(), StoreError> {
        self.update(&format!("CLEAR SILENT {}", update_target(graph)))?;
        self.delete_all(graph)
    }

    fn delete_graph(&self, graph: &NamedNode) -> Result<(), StoreError> {
        self.update(&format!("DROP SILENT GRAPH {graph}"))?;
        self.delete_all(Some(graph))
    }

    fn triple_count(&self, graph: Option<&NamedNode>) -> Result<usize, StoreError> {
        let query = match graph {
            Some(graph) => format!("SELECT (COUNT(*) AS ?count) WHERE {{ GRAPH {graph} {{ ?s ?p ?o }} }}"),
            None => "SELECT (COUNT(*) AS ?count) WHERE { ?s ?p ?o }".to_owned(),
        };
        let solutions = self.select(&query, None)?;
        let Some(Term::Literal(count)) = solutions.first().and_then(|s| s.get("count")) else {
            return Err(StoreError::InvalidCount);
        };
        count.value().parse().map_err(|_| StoreError::InvalidCount)
    }

    fn select(
        &self,
        query: &str,
        graph: Option<&NamedNode>,
    ) -> Result<Vec<QuerySolution>, StoreError> {
        match self.results(query, graph)? {
            ReaderQueryResultsParserOutput::Solutions(solutions) => {
                Ok(solutions.collect::<Result<_, _>>()?)
            }
            ReaderQueryResultsParserOutput::Boolean(_) => Err(StoreError::UnexpectedResults {
                expected: "solutions",
                actual: "a boolean",
            }),
        }
    }

    fn construct(&self, query: &str, graph: Option<&NamedNode>) -> Result<Graph, StoreError> {
        let (content_type, body) = self.query(query, graph, GRAPH_ACCEPT)?;
        let format = RdfFormat::from_media_type(&content_type)
            .ok_or(StoreError::UnsupportedContentType(content_type))?;
        let mut parser = RdfParser::from_format(format).for_reader(body);
        let mut output = Graph::new();
        for quad in &mut parser {
            output.insert(&Triple::from(quad?));
        }
        let mut namespaces = self.namespaces.write().unwrap_or_else(PoisonError::into_inner);
        for (prefix, namespace) in parser.prefixes() {
            namespaces.set(prefix, namespace);
        }
        Ok(output)
    }

    fn ask(&self, query: &str, graph: Option<&NamedNode>) -> Result<bool, StoreError> {
        match self.results(query, graph)? {
            ReaderQueryResultsParserOutput::Boolean(value) => Ok(value),
            ReaderQueryResultsParserOutput::Solutions(_) => Err(StoreError::UnexpectedResults {
                expected: "a boolean",
                actual: "solutions",
            }),
        }
    }

    fn update(&self, update: &str) -> Result<(), StoreError> {
        debug!(endpoint = self.config.update_endpoint(), update, "Sending SPARQL update");
        self.post_form(
            self.config.update_endpoint(),
            &[(self.config.update_parameter.as_str(), update)],
            "*/*",
        )?;
        Ok(())
    }

    fn store_triples(&self, triples: &[Triple], graph: Option<&NamedNode>) -> Result<(), StoreError> {
        if triples.is_empty() {
            return Ok(());
        }
        self.update(&data_update("INSERT", triples, graph))
    }

    fn remove_triples(&self, triples: &[Triple], graph: Option<&NamedNode>) -> Result<(), StoreError> {
        if triples.is_empty() {
            return Ok(());
        }
        self.update(&data_update("DELETE", triples, graph))
    }

    fn namespaces(&self) -> Result<PrefixMap, StoreError> {
        Ok(self
            .namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set_namespaces(&self, namespaces: &PrefixMap) -> Result<(), StoreError> {
        let mut known = self.namespaces.write().unwrap_or_else(PoisonError::into_inner);
        for (prefix, namespace) in namespaces.iter() {
            known.set(prefix, namespace);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_endpoint_defaults_to_select_endpoint() {
        let config = HttpStoreConfig::new("http://localhost:7878/query");
        assert_eq!(config.update_endpoint(), "http://localhost:7878/query");
        let config = config
            .with_update_endpoint("http://localhost:7878/update")
            .with_query_parameter("q");
        assert_eq!(config.select_endpoint(), "http://localhost:7878/query");
        assert_eq!(config.update_endpoint(), "http://localhost:7878/update");
        assert_eq!(config.query_parameter, "q");
        assert_eq!(config.update_parameter, "update");
    }

    #[test]
    fn unreachable_endpoint_is_an_io_error() {
        let store = HttpStore::new(
            HttpStoreConfig::new("http://127.0.0.1:1/sparql").with_timeout(Duration::from_secs(1)),
        );
        assert!(matches!(
            store.ask("ASK {}", None),
            Err(StoreError::Io(_))
        ));
    }
}
