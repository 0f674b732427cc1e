//! A uniform query and update surface over local and remote triple stores.
//!
//! Every operation is scoped to an optional named graph. Queries use it as their default graph,
//! `None` means the store default graph.
//!
//! Stores also keep the namespace prefixes of their content, so that a model saved in a store
//! is read back with the prefixes it was written with.

mod http;
mod memory;

pub use crate::store::http::{HttpStore, HttpStoreConfig};
pub use crate::store::memory::MemoryStore;
use crate::error::StoreError;
use crate::namespaces::PrefixMap;
use oxrdf::{Graph, NamedNode, Triple, TripleRef};
use sparesults::QuerySolution;

const ALL_TRIPLES: &str = "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }";

pub trait TripleStore {
    fn graph_exists(&self, graph: &NamedNode) -> Result<bool, StoreError>;

    fn create_graph(&self, graph: &NamedNode) -> Result<(), StoreError>;

    /// Removes every triple of the graph and keeps the graph itself.
    fn clear_graph(&self, graph: Option<&NamedNode>) -> Result<(), StoreError>;

    fn delete_graph(&self, graph: &NamedNode) -> Result<(), StoreError>;

    fn triple_count(&self, graph: Option<&NamedNode>) -> Result<usize, StoreError>;

    fn select(
        &self,
        query: &str,
        graph: Option<&NamedNode>,
    ) -> Result<Vec<QuerySolution>, StoreError>;

    fn construct(&self, query: &str, graph: Option<&NamedNode>) -> Result<Graph, StoreError>;

    fn describe(&self, query: &str, graph: Option<&NamedNode>) -> Result<Graph, StoreError> {
        self.construct(query, graph)
    }

    fn ask(&self, query: &str, graph: Option<&NamedNode>) -> Result<bool, StoreError>;

    /// Executes a SPARQL update. Graphs are named in the update itself.
    fn update(&self, update: &str) -> Result<(), StoreError>;

    fn store_triple(&self, triple: TripleRef<'_>, graph: Option<&NamedNode>) -> Result<(), StoreError> {
        self.store_triples(&[triple.into_owned()], graph)
    }

    fn store_triples(&self, triples: &[Triple], graph: Option<&NamedNode>) -> Result<(), StoreError>;

    fn remove_triple(&self, triple: TripleRef<'_>, graph: Option<&NamedNode>) -> Result<(), StoreError> {
        self.remove_triples(&[triple.into_owned()], graph)
    }

    fn remove_triples(&self, triples: &[Triple], graph: Option<&NamedNode>) -> Result<(), StoreError>;

    /// All the triples of the graph.
    fn graph(&self, graph: Option<&NamedNode>) -> Result<Graph, StoreError> {
        self.construct(ALL_TRIPLES, graph)
    }

    /// The namespace prefixes known for the content of the store.
    fn namespaces(&self) -> Result<PrefixMap, StoreError>;

    /// Records `namespaces`, replacing the namespaces of the prefixes already bound.
    fn set_namespaces(&self, namespaces: &PrefixMap) -> Result<(), StoreError>;
}

/// The `GRAPH` keyword target of a SPARQL update.
fn update_target(graph: Option<&NamedNode>) -> String {
    graph.map_or_else(|| "DEFAULT".to_owned(), |graph| format!("GRAPH {graph}"))
}

/// Writes `INSERT DATA` or `DELETE DATA` operations for `triples`.
fn data_update(operation: &str, triples: &[Triple], graph: Option<&NamedNode>) -> String {
    let mut body = String::new();
    for triple in triples {
        body.push_str(&triple.to_string());
        body.push_str(" .\n");
    }
    match graph {
        Some(graph) => format!("{operation} DATA {{ GRAPH {graph} {{\n{body}}} }}"),
        None => format!("{operation} DATA {{\n{body}}}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNodeRef;

    #[test]
    fn data_updates_wrap_named_graphs() {
        let ex = NamedNodeRef::new_unchecked("http://ex.org/a");
        let triple = Triple::new(ex, ex, ex);
        assert_eq!(
            data_update("INSERT", &[triple.clone()], None),
            "INSERT DATA {\n<http://ex.org/a> <http://ex.org/a> <http://ex.org/a> .\n}"
        );
        assert_eq!(
            data_update("DELETE", &[triple], Some(&ex.into_owned())),
            "DELETE DATA { GRAPH <http://ex.org/a> {\n<http://ex.org/a> <http://ex.org/a> <http://ex.org/a> .\n} }"
        );
        assert_eq!(update_target(None), "DEFAULT");
        assert_eq!(update_target(Some(&ex.into_owned())), "GRAPH <http://ex.org/a>");
    }
}
