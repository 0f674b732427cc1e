#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

mod support;

use oxonto::{ImportMapping, LoadingLocation, LocationResolver, LocationTable};
use oxrdf::NamedNode;
use std::error::Error;
use std::sync::Arc;
use support::{FakeWeb, Fixture};

#[test]
fn disk_beats_web() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let path = fixture.write("onto.ttl", "")?;
    let web = FakeWeb::new().with_turtle(&path, "");
    let resolver = LocationResolver::new(Arc::new(web));
    assert_eq!(
        resolver.locate(&path, LoadingLocation::All),
        Some((path.clone(), LoadingLocation::Directory))
    );
    assert_eq!(
        resolver.locate(&path, LoadingLocation::WebAndClasspath),
        Some((path.clone(), LoadingLocation::Web))
    );
    Ok(())
}

#[test]
fn disk_file_under_all_is_a_directory_mapping() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let path = fixture.write("onto.ttl", "")?;
    let resolver = LocationResolver::new(Arc::new(FakeWeb::new()));
    let mut table = LocationTable::new();
    let mapping = resolver.resolve(&mut table, "http://ex.org/onto#", &path, LoadingLocation::All);
    assert_eq!(
        mapping,
        Some(ImportMapping::new(
            "http://ex.org/onto#",
            path.as_str(),
            LoadingLocation::Directory
        ))
    );
    assert_eq!(table.len(), 1);
    Ok(())
}

#[test]
fn last_valid_location_wins() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let first = fixture.write("first.ttl", "")?;
    let second = fixture.write("second.ttl", "")?;
    let resolver = LocationResolver::new(Arc::new(FakeWeb::new()));
    let mut table = LocationTable::new();
    let uri = "http://ex.org/onto#";

    resolver.resolve(&mut table, uri, &first, LoadingLocation::All);
    resolver.resolve(&mut table, uri, &second, LoadingLocation::All);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(uri).map(ImportMapping::location), Some(second.as_str()));

    // Remapping to the same location does not change anything
    resolver.resolve(&mut table, uri, &second, LoadingLocation::All);
    assert_eq!(table.to_vec(), [ImportMapping::new(uri, second.as_str(), LoadingLocation::Directory)]);

    // An invalid candidate keeps the previous mapping
    let missing = fixture.path("missing.ttl");
    assert!(
        resolver
            .resolve(&mut table, uri, &missing.to_string_lossy(), LoadingLocation::All)
            .is_none()
    );
    assert_eq!(table.get(uri).map(ImportMapping::location), Some(second.as_str()));
    Ok(())
}

#[test]
fn relative_candidates_use_source_directory() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let path = fixture.write("ontologies/onto.ttl", "")?;
    let resolver =
        LocationResolver::new(Arc::new(FakeWeb::new())).with_source_directory(fixture.root());
    assert_eq!(
        resolver.locate("ontologies/onto.ttl", LoadingLocation::Directory),
        Some((path, LoadingLocation::Directory))
    );
    assert!(resolver.locate("ontologies/onto.ttl", LoadingLocation::Web).is_none());
    Ok(())
}

#[test]
fn downloaded_documents_are_parsed() -> Result<(), Box<dyn Error>> {
    let web = FakeWeb::new().with_document(
        "http://ex.org/onto",
        "application/rdf+xml",
        r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Ontology rdf:about="http://ex.org/onto"/>
</rdf:RDF>"#,
    );
    let resolver = LocationResolver::new(Arc::new(web));
    let document = resolver.open_location("http://ex.org/onto", Some("http://ex.org/onto#"))?;
    assert_eq!(
        document.ontology_iri(),
        Some(NamedNode::new_unchecked("http://ex.org/onto"))
    );
    assert!(resolver.open_location("http://ex.org/missing", None).is_err());
    Ok(())
}
