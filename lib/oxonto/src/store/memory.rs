use crate::error::StoreError;
use crate::namespaces::PrefixMap;
use crate::store::TripleStore;
use oxigraph::sparql::{QueryResults, SparqlEvaluator};
use oxigraph::store::Store;
use oxrdf::{Graph, GraphName, GraphNameRef, NamedNode, Triple};
use sparesults::QuerySolution;
use std::sync::{Arc, PoisonError, RwLock};

/// A [`TripleStore`] kept in memory by Oxigraph.
///
/// ```
/// use oxonto::{MemoryStore, TripleStore};
///
/// let store = MemoryStore::new()?;
/// store.update("INSERT DATA { <http://example.com/s> <http://example.com/p> <http://example.com/o> }")?;
/// assert_eq!(store.triple_count(None)?, 1);
/// assert!(store.ask("ASK { ?s ?p ?o }", None)?);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
///
/// Clones share the same content and namespaces.
#[derive(Clone)]
pub struct MemoryStore {
    store: Store,
    namespaces: Arc<RwLock<PrefixMap>>,
}

impl MemoryStore {
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self {
            store: Store::new()?,
            namespaces: Arc::default(),
        })
    }

    /// A store whose default graph contains the triples of `graph`.
    pub fn from_graph(graph: &Graph) -> Result<Self, StoreError> {
        let store = Self::new()?;
        store
            .store
            .extend(graph.iter().map(|t| t.into_owned().in_graph(GraphName::DefaultGraph)))?;
        Ok(store)
    }

    /// The underlying Oxigraph store.
    #[inline]
    pub fn inner(&self) -> &Store {
        &self.store
    }

    fn query(
        &self,
        query: &str,
        graph: Option<&NamedNode>,
    ) -> Result<QueryResults<'static>, StoreError> {
        let mut prepared = SparqlEvaluator::new().parse_query(query)?;
        if let Some(graph) = graph {
            prepared
                .dataset_mut()
                .set_default_graph(vec![graph.clone().into()]);
        }
        Ok(prepared.on_store(&self.store).execute()?)
    }
}

fn graph_name(graph: Option<&NamedNode>) -> GraphNameRef<'_> {
    graph.map_or(GraphNameRef::DefaultGraph, |graph| graph.as_ref().into())
}

impl TripleStore for MemoryStore {
    fn graph_exists(&self, graph: &NamedNode) -> Result<bool, StoreError> {
        Ok(self.store.contains_named_graph(graph.as_ref())?)
    }

    fn create_graph(&self, graph: &NamedNode) -> Result<(), StoreError> {
        Ok(self.store.insert_named_graph(graph.as_ref())?)
    }

    fn clear_graph(&self, graph: Option<&NamedNode>) -> Result<(), StoreError> {
        Ok(self.store.clear_graph(graph_name(graph))?)
    }

    fn delete_graph(&self, graph: &NamedNode) -> Result<(), StoreError> {
        Ok(self.store.remove_named_graph(graph.as_ref())?)
    }

    fn triple_count(&self, graph: Option<&NamedNode>) -> Result<usize, StoreError> {
        let mut count = 0;
        for quad in self
            .store
            .quads_for_pattern(None, None, None, Some(graph_name(graph)))
        {
            quad?;
            count += 1;
        }
        Ok(count)
    }

    fn select(
        &self,
        query: &str,
        graph: Option<&NamedNode>,
    ) -> Result<Vec<QuerySolution>, StoreError> {
        match self.query(query, graph)? {
            QueryResults::Solutions(solutions) => Ok(solutions.collect::<Result<_, _>>()?),
            QueryResults::Boolean(_) => Err(StoreError::UnexpectedResults {
                expected: "solutions",
                actual: "a boolean",
            }),
            QueryResults::Graph(_) => Err(StoreError::UnexpectedResults {
                expected: "solutions",
                actual: "a graph",
            }),
        }
    }

    fn construct(&self, query: &str, graph: Option<&NamedNode>) -> Result<Graph, StoreError> {
        match self.query(query, graph)? {
            QueryResults::Graph(triples) => {
                let mut output = Graph::new();
                for triple in triples {
                    output.insert(&triple?);
                }
                Ok(output)
            }
            QueryResults::Boolean(_) => Err(StoreError::UnexpectedResults {
                expected: "a graph",
                actual: "a boolean",
            }),
            QueryResults::Solutions(_) => Err(StoreError::UnexpectedResults {
                expected: "a graph",
                actual: "solutions",
            }),
        }
    }

    fn ask(&self, query: &str, graph: Option<&NamedNode>) -> Result<bool, StoreError> {
        match self.query(query, graph)? {
            QueryResults::Boolean(value) => Ok(value),
            QueryResults::Graph(_) => Err(StoreError::UnexpectedResults {
                expected: "a boolean",
                actual: "a graph",
            }),
            QueryResults::Solutions(_) => Err(StoreError::UnexpectedResults {
                expected: "a boolean",
                actual: "solutions",
            }),
        }
    }

    fn update(&self, update: &str) -> Result<(), StoreError> {
        SparqlEvaluator::new()
            .parse_update(update)?
            .on_store(&self.store)
            .execute()?;
        Ok(())
    }

    fn store_triples(&self, triples: &[Triple], graph: Option<&NamedNode>) -> Result<(), StoreError> {
        let graph_name = graph_name(graph).into_owned();
        Ok(self
            .store
            .extend(triples.iter().map(|t| t.clone().in_graph(graph_name.clone())))?)
    }

    fn remove_triples(&self, triples: &[Triple], graph: Option<&NamedNode>) -> Result<(), StoreError> {
        let graph_name = graph_name(graph);
        for triple in triples {
            self.store.remove(triple.as_ref().in_graph(graph_name))?;
        }
        Ok(())
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
