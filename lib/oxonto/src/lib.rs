#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod config;
pub mod document;
mod error;
mod inference;
mod location;
mod manager;
mod mapping;
mod namespaces;
mod resolver;
mod rules;
mod store;
pub mod vocab;
mod walker;
pub mod web;

pub use crate::config::{
    ImportLocationEntry, ManagerOptions, read_import_locations, write_import_locations,
};
pub use crate::document::OntologyDocument;
pub use crate::error::{
    ConfigError, DocumentError, ImportError, LoadError, RuleError, StoreError,
};
pub use crate::inference::{
    ConstraintReport, ConstraintViolation, FixpointConfig, FixpointDriver, FixpointOutcome,
    FixpointStatus, InferencePass, PassOutput, RuleFailure, RulePass, check_constraints,
    execute_rule, run_rule, run_rules_of_category,
};
pub use crate::location::{LoadingLocation, SourceKind, UnknownSourceKind};
pub use crate::manager::OntologyManager;
pub use crate::mapping::{ImportMapping, LocationTable};
pub use crate::namespaces::{PrefixMap, SKIPPED_PREFIXES, WELL_KNOWN_PREFIXES};
pub use crate::resolver::LocationResolver;
pub use crate::rules::{
    BUILTIN_RULE_NAMESPACE, BuiltinRule, Constraint, ReasonerKind, Rule, RuleArgument, RuleSet,
};
pub use crate::store::{HttpStore, HttpStoreConfig, MemoryStore, TripleStore};
pub use crate::walker::{ImportClosure, ImportWalker};
pub use crate::web::{HttpWebAccess, WebAccess, WebDocument};
