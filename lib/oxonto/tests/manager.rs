#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

mod support;

use oxonto::{
    LoadError, LoadingLocation, ManagerOptions, MemoryStore, OntologyDocument, OntologyManager,
};
use oxrdf::vocab::rdf;
use oxrdf::{NamedNodeRef, TripleRef};
use oxrdfio::RdfFormat;
use std::error::Error;
use std::sync::Arc;
use support::{FakeWeb, Fixture, ontology};

const ZOO: &str = "http://ex.org/zoo";
const ANIMALS: &str = "http://ex.org/animals";
const OWL_ONTOLOGY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");

fn zoo() -> String {
    ontology(
        ZOO,
        &[("", "http://ex.org/zoo#"), ("animals", "http://ex.org/animals#")],
        &[ANIMALS],
        "<http://ex.org/zoo#tom> a <http://ex.org/animals#Cat> .\n",
    )
}

fn animals() -> String {
    ontology(
        ANIMALS,
        &[
            ("", "http://ex.org/animals#"),
            ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
        ],
        &[],
        ":Cat rdfs:subClassOf :Animal .\n",
    )
}

fn new_manager(fixture: &Fixture, web: FakeWeb) -> OntologyManager {
    OntologyManager::with_web_access(
        ManagerOptions::default().with_source_directory(fixture.root()),
        Arc::new(web),
    )
}

#[test]
fn loads_imports_from_mapped_files() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let zoo_path = fixture.write("zoo.ttl", &zoo())?;
    fixture.write("animals.ttl", &animals())?;
    let mut manager = new_manager(&fixture, FakeWeb::new());
    let mapping = manager.add_import_location_mapping(
        "http://ex.org/animals#",
        "animals.ttl",
        LoadingLocation::All,
    );
    assert_eq!(mapping.map(|m| m.kind()), Some(LoadingLocation::Directory));

    let model = manager.load_ontology(&zoo_path, LoadingLocation::All)?;
    let cat = NamedNodeRef::new("http://ex.org/animals#Cat")?;
    let animal = NamedNodeRef::new("http://ex.org/animals#Animal")?;
    assert!(model.graph().contains(TripleRef::new(
        cat,
        NamedNodeRef::new("http://www.w3.org/2000/01/rdf-schema#subClassOf")?,
        animal
    )));
    // The header of the imported ontology is dropped, the one of the root is kept
    assert!(!model.graph().contains(TripleRef::new(
        NamedNodeRef::new(ANIMALS)?,
        rdf::TYPE,
        OWL_ONTOLOGY
    )));
    assert!(model.graph().contains(TripleRef::new(
        NamedNodeRef::new(ZOO)?,
        rdf::TYPE,
        OWL_ONTOLOGY
    )));
    assert_eq!(model.prefixes().get("animals"), Some("http://ex.org/animals#"));
    assert_eq!(manager.namespaces().base(), Some("http://ex.org/zoo#"));
    assert!(manager.query_ask("ASK { :tom a ?c . ?c rdfs:subClassOf animals:Animal }", &model)?);
    Ok(())
}

#[test]
fn none_policy_skips_imports() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let zoo_path = fixture.write("zoo.ttl", &zoo())?;
    let web = FakeWeb::new()
        .with_turtle(ANIMALS, &animals())
        .with_turtle("http://ex.org/animals#", &animals());
    let mut manager = new_manager(&fixture, web);
    let model = manager.load_ontology(&zoo_path, LoadingLocation::None)?;
    assert_eq!(model.graph().len(), 3);
    assert_eq!(manager.imported_ontology_uris(&model).len(), 1);
    Ok(())
}

#[test]
fn loads_imports_from_the_web() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let web = Arc::new(
        FakeWeb::new()
            .with_turtle(ZOO, &zoo())
            .with_turtle(ANIMALS, &animals())
            .with_turtle("http://ex.org/animals#", &animals()),
    );
    let mut manager = OntologyManager::with_web_access(
        ManagerOptions::default().with_source_directory(fixture.root()),
        web.clone(),
    );
    let model = manager.load_ontology(ZOO, LoadingLocation::Web)?;
    assert_eq!(model.graph().len(), 4);
    // the import is downloaded once for its prefixes and its triples
    assert_eq!(
        web.fetched()
            .iter()
            .filter(|url| url.starts_with(ANIMALS))
            .count(),
        1
    );
    Ok(())
}

#[test]
fn missing_root_is_not_found() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let mut manager = new_manager(&fixture, FakeWeb::new());
    assert!(matches!(
        manager.load_ontology("http://ex.org/missing", LoadingLocation::All),
        Err(LoadError::NotFound { .. })
    ));
    let broken = fixture.write("broken.ttl", "<http://ex.org/a> <http://ex.org/b> .")?;
    assert!(matches!(
        manager.load_ontology(&broken, LoadingLocation::All),
        Err(LoadError::Document { .. })
    ));
    Ok(())
}

#[test]
fn import_location_config_round_trip() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    fixture.write("animals.ttl", &animals())?;
    let config = fixture.write(
        "config.xml",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<configs>
  <file>
    <uri>http://ex.org/animals#</uri>
    <path>animals.ttl</path>
    <location>disk</location>
  </file>
  <file>
    <uri>http://ex.org/missing#</uri>
    <path>missing.ttl</path>
  </file>
  <file>
    <path>orphan.ttl</path>
  </file>
</configs>"#,
    )?;
    let mut manager = new_manager(&fixture, FakeWeb::new());
    assert_eq!(manager.load_import_location_config(&config)?, 1);
    assert_eq!(manager.import_locations().len(), 1);

    let saved = fixture.path("saved.xml");
    manager.save_import_location_config(&saved)?;
    let mut other = new_manager(&fixture, FakeWeb::new());
    assert_eq!(other.load_import_location_config(&saved)?, 1);
    assert_eq!(
        other.import_locations().to_vec(),
        manager.import_locations().to_vec()
    );

    assert_eq!(manager.remove_import_location_mapping("http://ex.org/animals#"), 1);
    let empty = fixture.path("empty.xml");
    manager.save_import_location_config(&empty)?;
    assert!(!empty.exists());
    Ok(())
}

#[test]
fn spin_rules_of_the_model_are_run() -> Result<(), Box<dyn Error>> {
    let mut manager = OntologyManager::with_web_access(ManagerOptions::default(), Arc::new(FakeWeb::new()));
    let model = manager.load_ontology_from_slice(
        br#"@prefix : <http://ex.org/zoo#> .
@prefix spin: <http://spinrdf.org/spin#> .
@prefix sp: <http://spinrdf.org/sp#> .
:Cat spin:rule [ sp:text "CONSTRUCT { ?this a :Animal } WHERE { ?this a :Cat }" ] .
:Animal spin:rule [ sp:text "CONSTRUCT { ?this a :LivingBeing } WHERE { ?this a :Animal }" ] .
:tom a :Cat ."#,
        Some(ZOO),
        RdfFormat::Turtle,
        LoadingLocation::None,
    )?;
    let outcome = manager.run_rule_inferences(&model)?;
    assert!(outcome.is_converged());
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.inferred.len(), 2);
    assert!(outcome.inferred.contains(TripleRef::new(
        NamedNodeRef::new("http://ex.org/zoo#tom")?,
        rdf::TYPE,
        NamedNodeRef::new("http://ex.org/zoo#LivingBeing")?
    )));
    Ok(())
}

#[test]
fn spin_constraints_of_the_model_are_checked() -> Result<(), Box<dyn Error>> {
    let mut manager = OntologyManager::with_web_access(ManagerOptions::default(), Arc::new(FakeWeb::new()));
    let model = manager.load_ontology_from_slice(
        br#"@prefix : <http://ex.org/zoo#> .
@prefix spin: <http://spinrdf.org/spin#> .
@prefix sp: <http://spinrdf.org/sp#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
:Animal spin:constraint [ sp:text "ASK { FILTER NOT EXISTS { ?this :name ?name } }" ] .
:Cat rdfs:subClassOf :Animal .
:tom a :Cat ; :name "Tom" .
:felix a :Cat .
:rex a :Dog ."#,
        Some(ZOO),
        RdfFormat::Turtle,
        LoadingLocation::None,
    )?;
    let report = manager.check_constraints(&model)?;
    assert!(report.failures.is_empty());
    assert_eq!(report.violations.len(), 1);
    assert_eq!(
        report.violations[0].root,
        Some(NamedNodeRef::new("http://ex.org/zoo#felix")?.into_owned().into())
    );
    assert_eq!(report.violations[0].class.as_str(), "http://ex.org/zoo#Animal");
    Ok(())
}

#[test]
fn templates_of_a_category_are_run() -> Result<(), Box<dyn Error>> {
    let mut manager = OntologyManager::with_web_access(ManagerOptions::default(), Arc::new(FakeWeb::new()));
    let model = manager.load_ontology_from_slice(
        br#"@prefix : <http://ex.org/zoo#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix spin: <http://spinrdf.org/spin#> .
@prefix sp: <http://spinrdf.org/sp#> .
:Cleanups rdfs:subClassOf :Templates .
:feed rdfs:subClassOf :Cleanups ; spin:body [ sp:text "CONSTRUCT { ?a :fed true } WHERE { ?a a :Cat }" ] .
:broken rdfs:subClassOf :Cleanups ; spin:body [ sp:text "CONSTRUCT { ?a :fed } WHERE { ?a a :Cat }" ] .
:brush rdfs:subClassOf :Cleanups ; spin:body [ sp:text "CONSTRUCT { ?a :brushed true } WHERE { ?a a :Cat }" ] .
:tom a :Cat ."#,
        Some(ZOO),
        RdfFormat::Turtle,
        LoadingLocation::None,
    )?;
    let output = manager.run_rules_of_category(":Templates", &model)?;
    assert_eq!(output.triples.len(), 2);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].rule.as_str(), "http://ex.org/zoo#broken");
    Ok(())
}

#[test]
fn models_round_trip_through_files_and_stores() -> Result<(), Box<dyn Error>> {
    let fixture = Fixture::new()?;
    let mut manager = new_manager(&fixture, FakeWeb::new());
    let mut model = manager.create_new_model("http://ex.org/farm#");
    manager.add_import(&mut model, "http://ex.org/animals#", Some("animals"))?;
    manager.update(
        "INSERT DATA { <http://ex.org/farm#dolly> a animals:Sheep }",
        &mut model,
    )?;
    assert_eq!(model.graph().len(), 2);

    let path = fixture.path("farm.ttl");
    manager.save_model(&model, &path, RdfFormat::Turtle)?;
    let saved = std::fs::read_to_string(&path)?;
    assert!(saved.contains("@prefix animals: <http://ex.org/animals#> ."));
    let reloaded = OntologyDocument::from_file(&path, None)?;
    assert_eq!(reloaded.graph(), model.graph());
    assert!(
        manager
            .model_to_string(&model, RdfFormat::NTriples)?
            .contains("<http://ex.org/farm#dolly>")
    );

    let store = MemoryStore::new()?;
    manager.save_model_to_store(&model, &store, None)?;
    let mut other = new_manager(&fixture, FakeWeb::new());
    assert_eq!(other.namespaces().get("animals"), None);
    let from_store = other.load_ontology_from_store(&store, None, LoadingLocation::None)?;
    assert_eq!(from_store.graph(), model.graph());
    assert_eq!(from_store.prefixes().get("animals"), Some("http://ex.org/animals#"));
    assert_eq!(from_store.base_namespace(), Some("http://ex.org/farm#"));
    assert!(
        other
            .model_to_string(&from_store, RdfFormat::Turtle)?
            .contains("@prefix animals: <http://ex.org/animals#> .")
    );
    Ok(())
}
