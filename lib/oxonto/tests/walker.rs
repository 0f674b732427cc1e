#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

mod support;

use oxonto::{
    ImportWalker, LoadingLocation, LocationResolver, LocationTable, OntologyDocument, PrefixMap,
};
use oxrdfio::RdfFormat;
use std::error::Error;
use std::sync::Arc;
use support::{FakeWeb, Fixture, ontology};

const A: &str = "http://ex.org/a";
const B: &str = "http://ex.org/b";
const C: &str = "http://ex.org/c";

fn parse(turtle: &str, base: &str) -> Result<OntologyDocument, Box<dyn Error>> {
    Ok(OntologyDocument::parse_slice(
        turtle.as_bytes(),
        RdfFormat::Turtle,
        Some(base),
    )?)
}

/// Publishes `turtle` under the ontology IRI and its `#` namespace.
fn publish(web: FakeWeb, uri: &str, turtle: &str) -> FakeWeb {
    web.with_turtle(uri, turtle)
        .with_turtle(&format!("{uri}#"), turtle)
}

#[test]
fn cyclic_imports_terminate() -> Result<(), Box<dyn Error>> {
    let a = ontology(
        A,
        &[("", "http://ex.org/a#"), ("b", "http://ex.org/b#")],
        &[B],
        "",
    );
    let b = ontology(
        B,
        &[("", "http://ex.org/b#"), ("a", "http://ex.org/a#"), ("bx", "http://ex.org/bx#")],
        &[A],
        "",
    );
    let web = Arc::new(publish(publish(FakeWeb::new(), A, &a), B, &b));
    let resolver = LocationResolver::new(web.clone());
    let locations = LocationTable::new();
    let walker = ImportWalker::new(&resolver, &locations);
    let root = parse(&a, A)?;

    let mut prefixes = PrefixMap::new();
    let closure = walker.expand(&root, LoadingLocation::All, &mut prefixes);
    assert_eq!(closure.expanded, ["http://ex.org/b#"]);
    assert!(closure.unresolved.is_empty());
    assert_eq!(
        prefixes.iter().collect::<Vec<_>>(),
        [
            ("", "http://ex.org/a#"),
            ("b", "http://ex.org/b#"),
            ("a", "http://ex.org/a#"),
            ("bx", "http://ex.org/bx#"),
        ]
    );

    let imports = walker.collect_imports(&root, LoadingLocation::All);
    assert_eq!(
        imports.iter().map(|(uri, _)| uri.as_str()).collect::<Vec<_>>(),
        [B]
    );
    // Both traversals share a single download of each document
    assert_eq!(web.fetched(), ["http://ex.org/b#"]);
    Ok(())
}

#[test]
fn first_declared_prefix_is_kept() -> Result<(), Box<dyn Error>> {
    let root = ontology(
        A,
        &[("", "http://ex.org/a#"), ("b", "http://ex.org/b#"), ("c", "http://ex.org/c#")],
        &[B, C],
        "",
    );
    let b = ontology(B, &[("shared", "http://ex.org/s#")], &[], "");
    let c = ontology(
        C,
        &[("common", "http://ex.org/s#"), ("shared", "http://ex.org/other#")],
        &[],
        "",
    );
    let web = publish(publish(FakeWeb::new(), B, &b), C, &c);
    let resolver = LocationResolver::new(Arc::new(web));
    let locations = LocationTable::new();
    let mut prefixes = PrefixMap::new();
    ImportWalker::new(&resolver, &locations).expand(
        &parse(&root, A)?,
        LoadingLocation::Web,
        &mut prefixes,
    );
    assert_eq!(prefixes.get("shared"), Some("http://ex.org/s#"));
    assert_eq!(prefixes.get("common"), Some("http://ex.org/s#"));
    assert_eq!(prefixes.compact("http://ex.org/s#x").as_deref(), Some("shared:x"));
    Ok(())
}

#[test]
fn document_without_imports_keeps_its_prefixes() -> Result<(), Box<dyn Error>> {
    let root = parse(
        &ontology(
            A,
            &[("", "http://ex.org/a#"), ("foaf", "http://xmlns.com/foaf/0.1/")],
            &[],
            "",
        ),
        A,
    )?;
    let resolver = LocationResolver::new(Arc::new(FakeWeb::new()));
    let locations = LocationTable::new();
    let mut prefixes = PrefixMap::new();
    let closure =
        ImportWalker::new(&resolver, &locations).expand(&root, LoadingLocation::All, &mut prefixes);
    assert!(closure.expanded.is_empty());
    assert_eq!(&prefixes, root.prefixes());
    Ok(())
}

#[test]
fn unreachable_imports_are_skipped() -> Result<(), Box<dyn Error>> {
    let root = parse(
        &ontology(
            A,
            &[("b", "http://ex.org/b#"), ("c", "http://ex.org/c#")],
            &[B, C],
            "",
        ),
        A,
    )?;
    let c = ontology(C, &[("cx", "http://ex.org/cx#")], &[], "");
    let resolver = LocationResolver::new(Arc::new(publish(FakeWeb::new(), C, &c)));
    let locations = LocationTable::new();
    let walker = ImportWalker::new(&resolver, &locations);
    let mut prefixes = PrefixMap::new();
    let closure = walker.expand(&root, LoadingLocation::All, &mut prefixes);
    assert_eq!(closure.unresolved, ["http://ex.org/b#"]);
    assert_eq!(closure.expanded, ["http://ex.org/c#"]);
    assert_eq!(prefixes.get("b"), Some("http://ex.org/b#"));
    assert_eq!(prefixes.get("cx"), Some("http://ex.org/cx#"));
    assert_eq!(walker.collect_imports(&root, LoadingLocation::All).len(), 1);
    Ok(())
}

#[test]
fn ignored_imports_are_not_followed() -> Result<(), Box<dyn Error>> {
    let root = parse(&ontology(A, &[("b", "http://ex.org/b#")], &[B], ""), A)?;
    let b = ontology(B, &[("bx", "http://ex.org/bx#")], &[], "");
    let web = Arc::new(publish(FakeWeb::new(), B, &b));
    let resolver = LocationResolver::new(web.clone());
    let locations = LocationTable::new();
    let ignored = [B.to_owned()];
    let walker = ImportWalker::new(&resolver, &locations).with_ignored(&ignored);
    let mut prefixes = PrefixMap::new();
    walker.expand(&root, LoadingLocation::All, &mut prefixes);
    assert!(walker.collect_imports(&root, LoadingLocation::All).is_empty());
    assert_eq!(prefixes.get("b"), Some("http://ex.org/b#"));
    assert!(!prefixes.contains_prefix("bx"));
    assert!(web.fetched().is_empty());
    Ok(())
}

#[test]
fn mappings_override_the_policy() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let path = fixture.write(
        "b.ttl",
        &ontology(B, &[("bx", "http://ex.org/bx#")], &[], "<http://ex.org/b#X> a <http://www.w3.org/2002/07/owl#Class> .\n"),
    )?;
    let root = parse(&ontology(A, &[("b", "http://ex.org/b#")], &[B], ""), A)?;
    let resolver = LocationResolver::new(Arc::new(FakeWeb::new()));
    let mut locations = LocationTable::new();
    resolver.resolve(&mut locations, "http://ex.org/b#", &path, LoadingLocation::Directory);
    let walker = ImportWalker::new(&resolver, &locations);

    let mut prefixes = PrefixMap::new();
    let closure = walker.expand(&root, LoadingLocation::None, &mut prefixes);
    assert_eq!(closure.expanded, ["http://ex.org/b#"]);
    assert_eq!(prefixes.get("bx"), Some("http://ex.org/bx#"));
    let imports = walker.collect_imports(&root, LoadingLocation::None);
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].1.graph().len(), 2);
    Ok(())
}
