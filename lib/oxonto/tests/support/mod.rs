#![cfg_attr(test, allow(dead_code))]

use oxonto::{WebAccess, WebDocument};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// A web made of in-memory documents, recording every download.
#[derive(Default)]
pub struct FakeWeb {
    documents: BTreeMap<String, WebDocument>,
    fetched: Mutex<Vec<String>>,
}

impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.documents.insert(
            url.to_owned(),
            WebDocument {
                content_type: content_type.to_owned(),
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    #[must_use]
    pub fn with_turtle(self, url: &str, body: &str) -> Self {
        self.with_document(url, "text/turtle", body)
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched
            .lock()
            .map(|fetched| fetched.clone())
            .unwrap_or_default()
    }
}

impl WebAccess for FakeWeb {
    fn exists(&self, url: &str) -> bool {
        self.documents.contains_key(url)
    }

    fn fetch(&self, url: &str) -> io::Result<WebDocument> {
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(url.to_owned());
        }
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{url} not found")))
    }
}

/// A temporary directory of ontology files.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Writes `content` to `name` and returns its absolute path.
    pub fn write(&self, name: &str, content: &str) -> io::Result<String> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path.to_string_lossy().into_owned())
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

/// A Turtle ontology `uri` declaring `prefixes` and importing `imports`.
pub fn ontology(uri: &str, prefixes: &[(&str, &str)], imports: &[&str], body: &str) -> String {
    let mut turtle = String::new();
    for (prefix, namespace) in prefixes {
        turtle.push_str(&format!("@prefix {prefix}: <{namespace}> .\n"));
    }
    turtle.push_str(&format!(
        "<{uri}> a <http://www.w3.org/2002/07/owl#Ontology> .\n"
    ));
    for import in imports {
        turtle.push_str(&format!(
            "<{uri}> <http://www.w3.org/2002/07/owl#imports> <{import}> .\n"
        ));
    }
    turtle.push_str(body);
    turtle
}
