use crate::error::{RuleError, StoreError};
use crate::namespaces::PrefixMap;
use crate::rules::{Constraint, ReasonerKind, Rule, RuleSet};
use crate::store::{MemoryStore, TripleStore};
use crate::vocab::spin;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNode, NamedNodeRef, Term, TermRef, Triple, TripleRef};
use spargebra::Query;
use rustc_hash::FxHashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// A rule execution that failed during a pass.
#[derive(Debug)]
pub struct RuleFailure {
    pub rule: NamedNode,
    pub error: RuleError,
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.error)
    }
}

/// The triples produced by an [`InferencePass`] and the rules that failed.
#[derive(Debug, Default)]
pub struct PassOutput {
    pub triples: Graph,
    pub failures: Vec<RuleFailure>,
}

/// One round of inference over the content of a store.
///
/// Returns every produced triple, new or not.
/// Individual rule failures are reported in [`PassOutput::failures`] and never abort the pass.
pub trait InferencePass {
    fn run(&self, store: &dyn TripleStore, graph: Option<&NamedNode>) -> Result<PassOutput, StoreError>;
}

impl<F: Fn(&dyn TripleStore, Option<&NamedNode>) -> Result<PassOutput, StoreError>> InferencePass
    for F
{
    fn run(&self, store: &dyn TripleStore, graph: Option<&NamedNode>) -> Result<PassOutput, StoreError> {
        self(store, graph)
    }
}

/// Runs a list of [`Rule`]s through [`TripleStore::construct`].
///
/// Rules bound to a class are run with `?this` ranging over the instances of the class
/// or of one of its subclasses.
#[derive(Debug, Clone, Default)]
pub struct RulePass {
    rules: Vec<Rule>,
    prefixes: String,
}

impl RulePass {
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            prefixes: String::new(),
        }
    }

    /// The built-in rules of a class-level reasoner.
    pub fn for_reasoner(kind: ReasonerKind) -> Self {
        Self::new(kind.rules().iter().map(|rule| rule.to_rule()))
    }

    /// Declares `prefixes` in every rule query.
    #[must_use]
    pub fn with_prefixes(mut self, prefixes: &PrefixMap) -> Self {
        self.prefixes = prefixes.to_sparql_prefixes();
        self
    }

    #[inline]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl InferencePass for RulePass {
    fn run(&self, store: &dyn TripleStore, graph: Option<&NamedNode>) -> Result<PassOutput, StoreError> {
        let mut output = PassOutput::default();
        for rule in &self.rules {
            if let Some(class) = rule.class() {
                debug!(rule = %rule, class = %class, "Running class rule");
            }
            collect(&mut output, rule, execute_rule(store, rule, &[], &self.prefixes, graph));
        }
        Ok(output)
    }
}

fn collect(output: &mut PassOutput, rule: &Rule, result: Result<Graph, RuleError>) {
    match result {
        Ok(triples) => output.triples.extend(&triples),
        Err(error) => output.failures.push(RuleFailure {
            rule: rule.iri().clone(),
            error,
        }),
    }
}

/// Runs `rule` once with `bindings` and returns what it constructs.
pub fn execute_rule(
    store: &dyn TripleStore,
    rule: &Rule,
    bindings: &[(String, Term)],
    prefixes: &str,
    graph: Option<&NamedNode>,
) -> Result<Graph, RuleError> {
    let query = rule.instantiate(bindings, prefixes)?;
    store
        .construct(&query.to_string(), graph)
        .map_err(|error| RuleError::Execution {
            rule: rule.iri().clone(),
            error,
        })
}

/// Runs the registered rule `iri` once.
///
/// Fails if the rule is unknown, if a required argument is missing or if the execution fails.
pub fn run_rule(
    store: &dyn TripleStore,
    rules: &RuleSet,
    iri: NamedNodeRef<'_>,
    bindings: &[(String, Term)],
    prefixes: &str,
    graph: Option<&NamedNode>,
) -> Result<Graph, RuleError> {
    let rule = rules
        .get(iri)
        .ok_or_else(|| RuleError::UnknownRule(iri.as_str().to_owned()))?;
    info!(rule = %rule, "Running rule");
    execute_rule(store, rule, bindings, prefixes, graph)
}

/// Runs once each registered rule belonging to a strict subcategory of `category`.
///
/// A rule belongs to the subcategories of its [category](Rule::category).
/// Rules whose IRI is declared `rdfs:subClassOf*` `category` in the store belong to them as well.
pub fn run_rules_of_category(
    store: &dyn TripleStore,
    rules: &RuleSet,
    category: NamedNodeRef<'_>,
    prefixes: &str,
    graph: Option<&NamedNode>,
) -> Result<PassOutput, StoreError> {
    let subcategories = store
        .select(
            &format!(
                "SELECT DISTINCT ?c WHERE {{ ?c <http://www.w3.org/2000/01/rdf-schema#subClassOf>* {category} FILTER(?c != {category}) }}"
            ),
            graph,
        )?
        .into_iter()
        .filter_map(|solution| match solution.get("c") {
            Some(Term::NamedNode(node)) => Some(node.clone()),
            _ => None,
        })
        .collect::<FxHashSet<_>>();
    let mut output = PassOutput::default();
    for rule in rules.templates() {
        let belongs = subcategories.contains(rule.iri())
            || rule
                .category()
                .is_some_and(|c| c.as_ref() == category || subcategories.contains(c));
        if !belongs || rule.iri().as_ref() == category {
            continue;
        }
        info!(rule = %rule, category = %category, "Running rule of category");
        let result = execute_rule(store, rule, &[], prefixes, graph);
        if let Err(error) = &result {
            warn!(rule = %rule, error = %error, "Rule failed");
        }
        collect(&mut output, rule, result);
    }
    Ok(output)
}

/// An instance of a class that violates one of the class [`Constraint`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub constraint: NamedNode,
    pub class: NamedNode,
    /// The offending resource, if the constraint names it.
    pub root: Option<Term>,
    pub message: Option<String>,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violated", self.constraint)?;
        if let Some(root) = &self.root {
            write!(f, " by {root}")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// The result of [`check_constraints`].
#[derive(Debug, Default)]
pub struct ConstraintReport {
    pub violations: Vec<ConstraintViolation>,
    /// The constraints that could not be evaluated.
    pub failures: Vec<RuleFailure>,
}

impl ConstraintReport {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks every [`Constraint`] of `rules` against the content of `graph` in `store`.
///
/// Violations are logged and returned. Constraints that fail to run are reported in
/// [`ConstraintReport::failures`] and do not stop the check.
pub fn check_constraints(
    store: &dyn TripleStore,
    rules: &RuleSet,
    prefixes: &str,
    graph: Option<&NamedNode>,
) -> ConstraintReport {
    let mut report = ConstraintReport::default();
    for constraint in rules.constraints() {
        match check_constraint(store, constraint, prefixes, graph) {
            Ok(violations) => {
                for violation in &violations {
                    warn!(class = %violation.class, "{violation}");
                }
                report.violations.extend(violations);
            }
            Err(error) => {
                warn!(constraint = %constraint, error = %error, "Constraint failed");
                report.failures.push(RuleFailure {
                    rule: constraint.iri().clone(),
                    error,
                });
            }
        }
    }
    debug!(violations = report.violations.len(), "Constraints checked");
    report
}

fn check_constraint(
    store: &dyn TripleStore,
    constraint: &Constraint,
    prefixes: &str,
    graph: Option<&NamedNode>,
) -> Result<Vec<ConstraintViolation>, RuleError> {
    let execution = |error| RuleError::Execution {
        rule: constraint.iri().clone(),
        error,
    };
    let violation = |root, message| ConstraintViolation {
        constraint: constraint.iri().clone(),
        class: constraint.class().clone(),
        root,
        message,
    };
    let query = constraint.to_query(prefixes)?;
    if matches!(query, Query::Construct { .. }) {
        let output = store.construct(&query.to_string(), graph).map_err(execution)?;
        return Ok(output
            .subjects_for_predicate_object(rdf::TYPE, spin::CONSTRAINT_VIOLATION)
            .map(|subject| {
                let root = output
                    .object_for_subject_predicate(subject, spin::VIOLATION_ROOT)
                    .map(TermRef::into_owned);
                let message = match output.object_for_subject_predicate(subject, rdfs::LABEL) {
                    Some(TermRef::Literal(label)) => Some(label.value().to_owned()),
                    _ => None,
                };
                violation(root, message)
            })
            .collect());
    }
    Ok(store
        .select(&query.to_string(), graph)
        .map_err(execution)?
        .into_iter()
        .map(|solution| violation(solution.get("this").cloned(), None))
        .collect())
}

/// Options of a [`FixpointDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixpointConfig {
    /// Maximum number of passes.
    pub max_iterations: usize,
}

impl FixpointConfig {
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for FixpointConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

/// How a fixpoint run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixpointStatus {
    /// The last pass did not produce any new triple.
    Converged,
    /// The maximum number of passes has been run without convergence.
    IterationBoundReached,
    /// The store failed during a pass. The triples inferred before are kept.
    Aborted,
}

/// The result of a [`FixpointDriver`] run.
#[derive(Debug)]
pub struct FixpointOutcome {
    /// The triples inferred by the run, without the ones of the input model.
    pub inferred: Graph,
    /// The number of passes run.
    pub iterations: usize,
    pub status: FixpointStatus,
    /// The rule failures of all passes.
    pub failures: Vec<RuleFailure>,
    /// The store error that aborted the run.
    pub error: Option<StoreError>,
}

impl FixpointOutcome {
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.status == FixpointStatus::Converged
    }
}

/// Runs an [`InferencePass`] until it stops producing new triples.
///
/// ```
/// use oxonto::{FixpointDriver, ReasonerKind, RulePass};
/// use oxrdf::vocab::{rdf, rdfs};
/// use oxrdf::{Graph, NamedNodeRef, TripleRef};
///
/// let a = NamedNodeRef::new("http://example.com/A")?;
/// let b = NamedNodeRef::new("http://example.com/B")?;
/// let c = NamedNodeRef::new("http://example.com/C")?;
/// let x = NamedNodeRef::new("http://example.com/x")?;
/// let mut model = Graph::new();
/// model.insert(TripleRef::new(a, rdfs::SUB_CLASS_OF, b));
/// model.insert(TripleRef::new(b, rdfs::SUB_CLASS_OF, c));
/// model.insert(TripleRef::new(x, rdf::TYPE, a));
///
/// let outcome = FixpointDriver::default().run(&RulePass::for_reasoner(ReasonerKind::RdfsSimple), &model)?;
/// assert!(outcome.is_converged());
/// assert!(outcome.inferred.contains(TripleRef::new(x, rdf::TYPE, c)));
/// assert!(outcome.inferred.contains(TripleRef::new(a, rdfs::SUB_CLASS_OF, c)));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FixpointDriver {
    config: FixpointConfig,
}

impl FixpointDriver {
    #[inline]
    pub fn new(config: FixpointConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> FixpointConfig {
        self.config
    }

    /// Runs `pass` on an in-memory copy of `model`. `model` itself is not modified.
    pub fn run(&self, pass: &dyn InferencePass, model: &Graph) -> Result<FixpointOutcome, StoreError> {
        let store = MemoryStore::from_graph(model)?;
        self.run_in_store(pass, &store, None)
    }

    /// Runs `pass` on the content of `graph` in `store`. New triples are added to that graph.
    ///
    /// Only reading the initial content of the graph can fail. A store error during a pass ends the run
    /// with [`FixpointStatus::Aborted`] and the triples inferred so far.
    pub fn run_in_store(
        &self,
        pass: &dyn InferencePass,
        store: &dyn TripleStore,
        graph: Option<&NamedNode>,
    ) -> Result<FixpointOutcome, StoreError> {
        let base = store.graph(graph)?;
        let mut outcome = FixpointOutcome {
            inferred: Graph::new(),
            iterations: 0,
            status: FixpointStatus::Converged,
            failures: Vec::new(),
            error: None,
        };
        loop {
            if outcome.iterations >= self.config.max_iterations {
                warn!(
                    max_iterations = self.config.max_iterations,
                    inferred = outcome.inferred.len(),
                    "Inference stopped before reaching a fixpoint"
                );
                outcome.status = FixpointStatus::IterationBoundReached;
                return Ok(outcome);
            }
            outcome.iterations += 1;
            let output = match pass.run(store, graph) {
                Ok(output) => output,
                Err(error) => return Ok(abort(outcome, error)),
            };
            for failure in &output.failures {
                warn!(rule = %failure.rule, error = %failure.error, "Rule failed");
            }
            outcome.failures.extend(output.failures);
            let delta = output
                .triples
                .iter()
                .filter(|triple| !base.contains(*triple) && !outcome.inferred.contains(*triple))
                .map(TripleRef::into_owned)
                .collect::<Vec<Triple>>();
            debug!(iteration = outcome.iterations, new_triples = delta.len(), "Inference pass done");
            if delta.is_empty() {
                info!(
                    iterations = outcome.iterations,
                    inferred = outcome.inferred.len(),
                    "Inference reached a fixpoint"
                );
                return Ok(outcome);
            }
            if let Err(error) = store.store_triples(&delta, graph) {
                return Ok(abort(outcome, error));
            }
            for triple in &delta {
                outcome.inferred.insert(triple);
            }
        }
    }
}

fn abort(mut outcome: FixpointOutcome, error: StoreError) -> FixpointOutcome {
    warn!(
        iteration = outcome.iterations,
        inferred = outcome.inferred.len(),
        error = %error,
        "Inference aborted"
    );
    outcome.status = FixpointStatus::Aborted;
    outcome.error = Some(error);
    outcome
}
