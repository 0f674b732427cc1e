use crate::error::DocumentError;
use crate::namespaces::PrefixMap;
use crate::vocab::owl;
use oxiri::Iri;
use oxrdf::vocab::rdf;
use oxrdf::{Graph, NamedNode, TermRef, Triple};
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

/// A parsed RDF document: its triples, its prefix declarations and its base IRI.
///
/// Prefixes of parsed documents are recorded in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OntologyDocument {
    graph: Graph,
    prefixes: PrefixMap,
    base_iri: Option<String>,
}

impl OntologyDocument {
    #[inline]
    pub fn new(graph: Graph, prefixes: PrefixMap, base_iri: Option<String>) -> Self {
        Self {
            graph,
            prefixes,
            base_iri,
        }
    }

    /// Parses a document from a [`Read`] implementation.
    ///
    /// Triples of named graphs are merged into the document graph. Blank nodes are renamed.
    ///
    /// ```
    /// use oxonto::OntologyDocument;
    /// use oxrdfio::RdfFormat;
    ///
    /// let document = OntologyDocument::parse_reader(
    ///     b"@prefix ex: <http://example.com/> . ex:a a ex:B .".as_slice(),
    ///     RdfFormat::Turtle,
    ///     None,
    /// )?;
    /// assert_eq!(document.graph().len(), 1);
    /// assert_eq!(document.prefixes().get("ex"), Some("http://example.com/"));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn parse_reader(
        reader: impl Read,
        format: RdfFormat,
        base_iri: Option<&str>,
    ) -> Result<Self, DocumentError> {
        let mut parser = RdfParser::from_format(format).rename_blank_nodes();
        if let Some(base_iri) = base_iri {
            parser = parser
                .with_base_iri(base_iri)
                .map_err(|error| DocumentError::InvalidBaseIri {
                    iri: base_iri.into(),
                    error,
                })?;
        }
        let mut parser = parser.for_reader(reader);
        let mut graph = Graph::new();
        for quad in &mut parser {
            graph.insert(&Triple::from(quad?));
        }
        let mut declared = parser
            .prefixes()
            .map(|(prefix, namespace)| (prefix.to_owned(), namespace.to_owned()))
            .collect::<Vec<_>>();
        declared.sort();
        let base_iri = parser
            .base_iri()
            .map(ToOwned::to_owned)
            .or_else(|| base_iri.map(ToOwned::to_owned));
        Ok(Self {
            graph,
            prefixes: declared.into_iter().collect(),
            base_iri,
        })
    }

    #[inline]
    pub fn parse_slice(
        slice: &[u8],
        format: RdfFormat,
        base_iri: Option<&str>,
    ) -> Result<Self, DocumentError> {
        Self::parse_reader(slice, format, base_iri)
    }

    /// Reads a document from disk, picking the format with [`guess_format`].
    pub fn from_file(path: impl AsRef<Path>, base_iri: Option<&str>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let format = guess_format(&path.to_string_lossy(), None, &data);
        debug!(path = %path.display(), format = %format, "Parsing ontology file");
        Self::parse_slice(&data, format, base_iri)
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    #[inline]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    #[inline]
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    #[inline]
    pub fn prefixes_mut(&mut self) -> &mut PrefixMap {
        &mut self.prefixes
    }

    #[inline]
    pub fn set_prefixes(&mut self, prefixes: PrefixMap) {
        self.prefixes = prefixes;
    }

    #[inline]
    pub fn base_iri(&self) -> Option<&str> {
        self.base_iri.as_deref()
    }

    #[inline]
    pub fn set_base_iri(&mut self, base_iri: Option<String>) {
        self.base_iri = base_iri;
    }

    /// The namespace of the document itself: its empty prefix if declared, else its base IRI.
    pub fn base_namespace(&self) -> Option<&str> {
        self.prefixes.base().or(self.base_iri.as_deref())
    }

    /// The IRI of the first resource typed `owl:Ontology`.
    pub fn ontology_iri(&self) -> Option<NamedNode> {
        self.graph
            .subjects_for_predicate_object(rdf::TYPE, owl::ONTOLOGY)
            .find_map(|subject| match TermRef::from(subject) {
                TermRef::NamedNode(node) => Some(node.into_owned()),
                _ => None,
            })
    }

    /// The distinct `owl:imports` targets, in graph order.
    pub fn imports(&self) -> Vec<NamedNode> {
        let mut imports: Vec<NamedNode> = Vec::new();
        for triple in self.graph.triples_for_predicate(owl::IMPORTS) {
            if let TermRef::NamedNode(node) = triple.object {
                if !imports.iter().any(|i| i.as_ref() == node) {
                    imports.push(node.into_owned());
                }
            }
        }
        imports
    }

    /// The declared prefixes whose namespace belongs to an imported ontology, in prefix order.
    ///
    /// A namespace belongs to an import when it starts with the import IRI.
    pub fn prefixed_imports(&self) -> Vec<(String, String)> {
        let imports = self.imports();
        self.prefixes
            .iter()
            .filter(|(_, namespace)| imports.iter().any(|i| namespace.starts_with(i.as_str())))
            .map(|(prefix, namespace)| (prefix.to_owned(), namespace.to_owned()))
            .collect()
    }

    /// Writes the document in `format` with its prefixes.
    ///
    /// Prefixes bound to invalid IRIs are skipped.
    #[inline]
    pub fn write<W: Write>(&self, writer: W, format: RdfFormat) -> io::Result<W> {
        self.write_with_prefixes(writer, format, &self.prefixes)
    }

    /// Writes the document in `format`, declaring `prefixes` instead of its own ones.
    pub fn write_with_prefixes<W: Write>(
        &self,
        writer: W,
        format: RdfFormat,
        prefixes: &PrefixMap,
    ) -> io::Result<W> {
        let mut serializer = RdfSerializer::from_format(format);
        for (prefix, namespace) in prefixes.iter() {
            if let Err(e) = Iri::parse(namespace) {
                debug!(prefix, namespace, error = %e, "Skipping invalid prefix");
                continue;
            }
            serializer = serializer
                .with_prefix(prefix, namespace)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        }
        let mut serializer = serializer.for_writer(writer);
        for triple in &self.graph {
            serializer.serialize_triple(triple)?;
        }
        serializer.finish()
    }

    /// Serializes the document to a string in `format`.
    pub fn to_string_in(&self, format: RdfFormat) -> io::Result<String> {
        let buffer = self.write(Vec::new(), format)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl From<Graph> for OntologyDocument {
    fn from(graph: Graph) -> Self {
        Self::new(graph, PrefixMap::new(), None)
    }
}

/// Picks the RDF format of a document.
///
/// The file extension of `location` is tried first, then the media type, then the content:
/// documents starting with an XML declaration or element are RDF/XML, the others Turtle.
///
/// ```
/// use oxonto::document::guess_format;
/// use oxrdfio::RdfFormat;
///
/// assert_eq!(guess_format("/tmp/onto.owl", None, b""), RdfFormat::RdfXml);
/// assert_eq!(guess_format("http://example.com/onto", Some("text/turtle"), b""), RdfFormat::Turtle);
/// assert_eq!(guess_format("http://example.com/onto", None, b"<?xml version=\"1.0\"?>"), RdfFormat::RdfXml);
/// assert_eq!(guess_format("http://example.com/onto", None, b"<http://a> <http://b> <http://c> ."), RdfFormat::Turtle);
/// ```
pub fn guess_format(location: &str, content_type: Option<&str>, data: &[u8]) -> RdfFormat {
    let file_name = location
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(location);
    if let Some((_, extension)) = file_name.rsplit_once('.') {
        let extension = extension.to_ascii_lowercase();
        match extension.as_str() {
            "owl" | "xml" | "rdf" => return RdfFormat::RdfXml,
            _ => {
                if let Some(format) = RdfFormat::from_extension(&extension) {
                    return format;
                }
            }
        }
    }
    if let Some(content_type) = content_type {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        // Servers use these for any text file
        if !matches!(media_type, "text/plain" | "text/html") {
            if let Some(format) = RdfFormat::from_media_type(media_type) {
                return format;
            }
        }
    }
    if looks_like_xml(data) {
        RdfFormat::RdfXml
    } else {
        RdfFormat::Turtle
    }
}

fn looks_like_xml(data: &[u8]) -> bool {
    let Some(rest) = data.trim_ascii_start().strip_prefix(b"<") else {
        return false;
    };
    match rest.first() {
        Some(b'?' | b'!') => true,
        Some(c) if c.is_ascii_alphabetic() => {
            // Element names never contain '/' while IRIs between brackets do
            let end = rest
                .iter()
                .position(|c| matches!(c, b'>' | b' ' | b'\t' | b'\r' | b'\n'))
                .unwrap_or(rest.len());
            !rest[..end].contains(&b'/')
        }
        _ => false,
    }
}
