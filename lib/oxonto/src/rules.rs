use crate::error::RuleError;
use crate::vocab::{sp, spin, spl};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNode, NamedNodeRef, Term, TermRef, Variable};
use rustc_hash::FxHashMap;
use spargebra::algebra::{GraphPattern, PropertyPathExpression};
use spargebra::term::GroundTerm;
use spargebra::{Query, SparqlParser};
use std::fmt;
use tracing::{debug, warn};

/// A named argument of a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleArgument {
    name: String,
    optional: bool,
}

impl RuleArgument {
    #[inline]
    pub fn new(name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            optional,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// An inference rule: a SPARQL CONSTRUCT query whose results are new facts.
///
/// Arguments are variables of the body that are bound before execution.
/// A rule bound to a class is run with `?this` ranging over the instances of that class.
///
/// ```
/// use oxonto::{MemoryStore, Rule, TripleStore};
/// use oxrdf::{NamedNode, Term};
///
/// let store = MemoryStore::new()?;
/// store.update(
///     "INSERT DATA { <http://example.com/s> <http://example.com/p> 1 ; <http://example.com/q> 2 }",
/// )?;
/// let rule = Rule::new(
///     NamedNode::new("http://example.com/copy")?,
///     "CONSTRUCT { ?s <http://example.com/copy> ?o } WHERE { ?s ?source ?o }",
/// )
/// .with_argument("source", false);
/// let query = rule.instantiate(
///     &[("source".into(), Term::from(NamedNode::new("http://example.com/p")?))],
///     "",
/// )?;
/// assert_eq!(store.construct(&query.to_string(), None)?.len(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    iri: NamedNode,
    body: String,
    arguments: Vec<RuleArgument>,
    category: Option<NamedNode>,
    class: Option<NamedNode>,
}

impl Rule {
    pub fn new(iri: NamedNode, body: impl Into<String>) -> Self {
        Self {
            iri,
            body: body.into(),
            arguments: Vec::new(),
            category: None,
            class: None,
        }
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, optional: bool) -> Self {
        self.arguments.push(RuleArgument::new(name, optional));
        self
    }

    /// The category the rule belongs to, matched with `rdfs:subClassOf*`.
    #[must_use]
    pub fn with_category(mut self, category: NamedNode) -> Self {
        self.category = Some(category);
        self
    }

    /// Binds the rule to the instances of `class`.
    #[must_use]
    pub fn with_class(mut self, class: NamedNode) -> Self {
        self.class = Some(class);
        self
    }

    #[inline]
    pub fn iri(&self) -> &NamedNode {
        &self.iri
    }

    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[inline]
    pub fn arguments(&self) -> &[RuleArgument] {
        &self.arguments
    }

    #[inline]
    pub fn category(&self) -> Option<&NamedNode> {
        self.category.as_ref()
    }

    #[inline]
    pub fn class(&self) -> Option<&NamedNode> {
        self.class.as_ref()
    }

    /// Checks that the body is a syntactically valid CONSTRUCT query.
    ///
    /// `prefixes` is prepended to the body before parsing.
    pub fn validate(&self, prefixes: &str) -> Result<(), RuleError> {
        self.parse(prefixes).map(|_| ())
    }

    /// Parses the body, with `prefixes` prepended, as a CONSTRUCT query.
    pub fn parse(&self, prefixes: &str) -> Result<Query, RuleError> {
        let query = parse_body(&self.iri, &self.body, prefixes)?;
        if !matches!(query, Query::Construct { .. }) {
            return Err(RuleError::NotConstruct(self.iri.clone()));
        }
        Ok(query)
    }

    /// The query to run with the given argument values bound.
    ///
    /// Values are bound by joining a `VALUES` block to the body pattern.
    /// If the rule is bound to a class and `this` is not given, `?this` ranges over the instances of the class.
    ///
    /// Fails if a required argument is not bound or if a value is a blank node.
    pub fn instantiate(
        &self,
        bindings: &[(String, Term)],
        prefixes: &str,
    ) -> Result<Query, RuleError> {
        for argument in &self.arguments {
            if !argument.optional && !bindings.iter().any(|(name, _)| *name == argument.name) {
                return Err(RuleError::MissingArgument {
                    rule: self.iri.clone(),
                    argument: argument.name.clone(),
                });
            }
        }
        let Query::Construct {
            template,
            dataset,
            mut pattern,
            base_iri,
        } = self.parse(prefixes)?
        else {
            return Err(RuleError::NotConstruct(self.iri.clone()));
        };
        if let Some(class) = &self.class {
            if !bindings.iter().any(|(name, _)| name == THIS) {
                pattern = bind_first(instances_of(class), pattern);
            }
        }
        if !bindings.is_empty() {
            pattern = bind_first(values(&self.iri, bindings)?, pattern);
        }
        Ok(Query::Construct {
            template,
            dataset,
            pattern,
            base_iri,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iri)
    }
}

/// A SPIN constraint: an ASK or CONSTRUCT query checked against every instance of a class.
///
/// An ASK constraint is violated by the instances for which it returns `true`.
/// A CONSTRUCT constraint reports its violations as `spin:ConstraintViolation` resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    iri: NamedNode,
    class: NamedNode,
    body: String,
}

impl Constraint {
    pub fn new(iri: NamedNode, class: NamedNode, body: impl Into<String>) -> Self {
        Self {
            iri,
            class,
            body: body.into(),
        }
    }

    #[inline]
    pub fn iri(&self) -> &NamedNode {
        &self.iri
    }

    #[inline]
    pub fn class(&self) -> &NamedNode {
        &self.class
    }

    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The query listing the violations.
    ///
    /// An ASK body becomes `SELECT DISTINCT ?this` over the instances matching it.
    /// A CONSTRUCT body gets `?this` restricted to the instances of the class.
    pub fn to_query(&self, prefixes: &str) -> Result<Query, RuleError> {
        match parse_body(&self.iri, &self.body, prefixes)? {
            Query::Ask {
                dataset,
                pattern,
                base_iri,
            } => Ok(Query::Select {
                dataset,
                pattern: GraphPattern::Distinct {
                    inner: Box::new(GraphPattern::Project {
                        inner: Box::new(bind_first(instances_of(&self.class), pattern)),
                        variables: vec![Variable::new_unchecked(THIS)],
                    }),
                },
                base_iri,
            }),
            Query::Construct {
                template,
                dataset,
                pattern,
                base_iri,
            } => Ok(Query::Construct {
                template,
                dataset,
                pattern: bind_first(instances_of(&self.class), pattern),
                base_iri,
            }),
            _ => Err(RuleError::NotConstraint(self.iri.clone())),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iri)
    }
}

const THIS: &str = "this";

fn parse_body(iri: &NamedNode, body: &str, prefixes: &str) -> Result<Query, RuleError> {
    if body.trim().is_empty() {
        return Err(RuleError::MissingBody(iri.clone()));
    }
    SparqlParser::new()
        .parse_query(&format!("{prefixes}{body}"))
        .map_err(|error| RuleError::InvalidBody {
            rule: iri.clone(),
            error,
        })
}

fn join(left: GraphPattern, right: GraphPattern) -> GraphPattern {
    GraphPattern::Join {
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Joins `binding` at the start of the group of `pattern`, so that its variables are bound
/// when the `FILTER`, `BIND`, `OPTIONAL` and `MINUS` of the group are evaluated.
fn bind_first(binding: GraphPattern, pattern: GraphPattern) -> GraphPattern {
    match pattern {
        GraphPattern::Filter { expr, inner } => GraphPattern::Filter {
            expr,
            inner: Box::new(bind_first(binding, *inner)),
        },
        GraphPattern::Extend {
            inner,
            variable,
            expression,
        } => GraphPattern::Extend {
            inner: Box::new(bind_first(binding, *inner)),
            variable,
            expression,
        },
        GraphPattern::LeftJoin {
            left,
            right,
            expression,
        } => GraphPattern::LeftJoin {
            left: Box::new(bind_first(binding, *left)),
            right,
            expression,
        },
        GraphPattern::Minus { left, right } => GraphPattern::Minus {
            left: Box::new(bind_first(binding, *left)),
            right,
        },
        GraphPattern::Join { left, right } => GraphPattern::Join {
            left: Box::new(bind_first(binding, *left)),
            right,
        },
        GraphPattern::Distinct { inner } => GraphPattern::Distinct {
            inner: Box::new(bind_first(binding, *inner)),
        },
        GraphPattern::Reduced { inner } => GraphPattern::Reduced {
            inner: Box::new(bind_first(binding, *inner)),
        },
        GraphPattern::OrderBy { inner, expression } => GraphPattern::OrderBy {
            inner: Box::new(bind_first(binding, *inner)),
            expression,
        },
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => GraphPattern::Slice {
            inner: Box::new(bind_first(binding, *inner)),
            start,
            length,
        },
        pattern => join(binding, pattern),
    }
}

/// `?this rdf:type/rdfs:subClassOf* class`
fn instances_of(class: &NamedNode) -> GraphPattern {
    GraphPattern::Path {
        subject: Variable::new_unchecked(THIS).into(),
        path: PropertyPathExpression::Sequence(
            Box::new(PropertyPathExpression::NamedNode(rdf::TYPE.into_owned())),
            Box::new(PropertyPathExpression::ZeroOrMore(Box::new(
                PropertyPathExpression::NamedNode(rdfs::SUB_CLASS_OF.into_owned()),
            ))),
        ),
        object: class.clone().into(),
    }
}

/// A single row `VALUES` block binding each variable to its value.
fn values(rule: &NamedNode, bindings: &[(String, Term)]) -> Result<GraphPattern, RuleError> {
    let mut variables = Vec::with_capacity(bindings.len());
    let mut row = Vec::with_capacity(bindings.len());
    for (name, value) in bindings {
        let variable = Variable::new(name.as_str()).map_err(|_| RuleError::InvalidVariable {
            rule: rule.clone(),
            variable: name.clone(),
        })?;
        let value = GroundTerm::try_from(value.clone()).map_err(|_| {
            RuleError::BlankNodeBinding {
                rule: rule.clone(),
                variable: name.clone(),
            }
        })?;
        variables.push(variable);
        row.push(Some(value));
    }
    Ok(GraphPattern::Values {
        variables,
        bindings: vec![row],
    })
}

/// A registry of [`Rule`]s indexed by IRI, in insertion order, along with the [`Constraint`]s of the same model.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    index: FxHashMap<NamedNode, usize>,
    constraints: Vec<Constraint>,
}

impl RuleSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts the rules and templates declared in `graph` with the SPIN vocabulary.
    ///
    /// * `?class spin:rule ?r . ?r sp:text ?q` is a rule bound to `?class`.
    /// * `?t spin:body ?b . ?b sp:text ?q` is a template. Its arguments are given by
    ///   `?t spin:constraint [ spl:predicate ?arg ; spl:optional ?optional ]`
    ///   and its category by `?t rdfs:subClassOf ?category`.
    /// * `?class spin:constraint ?c . ?c sp:text ?q` is a constraint on the instances of `?class`.
    ///
    /// Declarations without query text are skipped.
    pub fn from_graph(graph: &Graph) -> Self {
        let mut rules = Self::new();
        for (position, triple) in graph.triples_for_predicate(spin::RULE).enumerate() {
            let TermRef::NamedNode(class) = TermRef::from(triple.subject) else {
                continue;
            };
            let Some(text) = text_of(graph, triple.object) else {
                debug!(class = %class, "Skipping rule without text");
                continue;
            };
            let iri = match triple.object {
                TermRef::NamedNode(node) => Some(node.into_owned()),
                _ => NamedNode::new(format!("{}-rule-{position}", class.as_str())).ok(),
            };
            let Some(iri) = iri else {
                warn!(class = %class, "Could not name rule");
                continue;
            };
            rules.insert(Rule::new(iri, text).with_class(class.into_owned()));
        }
        for triple in graph.triples_for_predicate(spin::BODY) {
            let TermRef::NamedNode(template) = TermRef::from(triple.subject) else {
                continue;
            };
            let Some(text) = text_of(graph, triple.object) else {
                debug!(template = %template, "Skipping template without text");
                continue;
            };
            let mut rule = Rule::new(template.into_owned(), text);
            let constraints = graph
                .objects_for_subject_predicate(template, spin::CONSTRAINT)
                .collect::<Vec<_>>();
            for constraint in constraints {
                let Some(TermRef::NamedNode(predicate)) =
                    object_of(graph, constraint, spl::PREDICATE)
                else {
                    continue;
                };
                let optional = matches!(
                    object_of(graph, constraint, spl::OPTIONAL),
                    Some(TermRef::Literal(value)) if matches!(value.value(), "true" | "1")
                );
                rule = rule.with_argument(local_name(predicate.as_str()), optional);
            }
            if let Some(TermRef::NamedNode(category)) =
                graph.object_for_subject_predicate(template, rdfs::SUB_CLASS_OF)
            {
                rule = rule.with_category(category.into_owned());
            }
            rules.insert(rule);
        }
        for (position, triple) in graph.triples_for_predicate(spin::CONSTRAINT).enumerate() {
            let TermRef::NamedNode(class) = TermRef::from(triple.subject) else {
                continue;
            };
            // template arguments are declared with spin:constraint too but carry no text
            let Some(text) = text_of(graph, triple.object) else {
                continue;
            };
            let iri = match triple.object {
                TermRef::NamedNode(node) => Some(node.into_owned()),
                _ => NamedNode::new(format!("{}-constraint-{position}", class.as_str())).ok(),
            };
            let Some(iri) = iri else {
                warn!(class = %class, "Could not name constraint");
                continue;
            };
            rules.insert_constraint(Constraint::new(iri, class.into_owned(), text));
        }
        rules
    }

    /// Registers `rule`, replacing and returning the rule with the same IRI.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        if let Some(&position) = self.index.get(&rule.iri) {
            return Some(std::mem::replace(&mut self.rules[position], rule));
        }
        self.index.insert(rule.iri.clone(), self.rules.len());
        self.rules.push(rule);
        None
    }

    /// Registers `constraint`, replacing and returning the constraint with the same IRI.
    pub fn insert_constraint(&mut self, constraint: Constraint) -> Option<Constraint> {
        if let Some(existing) = self
            .constraints
            .iter_mut()
            .find(|existing| existing.iri == constraint.iri)
        {
            return Some(std::mem::replace(existing, constraint));
        }
        self.constraints.push(constraint);
        None
    }

    /// Adds the rules and constraints of `other`, replacing those with the same IRI.
    pub fn merge(&mut self, other: Self) {
        for rule in other.rules {
            self.insert(rule);
        }
        for constraint in other.constraints {
            self.insert_constraint(constraint);
        }
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    #[inline]
    pub fn get(&self, iri: NamedNodeRef<'_>) -> Option<&Rule> {
        self.index
            .get(&iri.into_owned())
            .map(|position| &self.rules[*position])
    }

    #[inline]
    pub fn contains(&self, iri: NamedNodeRef<'_>) -> bool {
        self.get(iri).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// The rules bound to a class.
    pub fn class_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|rule| rule.class.is_some())
    }

    /// The rules that are not bound to a class.
    pub fn templates(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|rule| rule.class.is_none())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
        self.index.clear();
        self.constraints.clear();
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut rules = Self::new();
        for rule in iter {
            rules.insert(rule);
        }
        rules
    }
}

fn object_of<'a>(
    graph: &'a Graph,
    node: TermRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Option<TermRef<'a>> {
    match node {
        TermRef::NamedNode(node) => graph.object_for_subject_predicate(node, predicate),
        TermRef::BlankNode(node) => graph.object_for_subject_predicate(node, predicate),
        _ => None,
    }
}

fn text_of(graph: &Graph, node: TermRef<'_>) -> Option<String> {
    match object_of(graph, node, sp::TEXT)? {
        TermRef::Literal(text) if !text.value().trim().is_empty() => Some(text.value().to_owned()),
        _ => None,
    }
}

fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/', ':']).next().unwrap_or(iri)
}

/// Namespace of the IRIs of the [`BuiltinRule`]s.
pub const BUILTIN_RULE_NAMESPACE: &str = "urn:oxonto:rule:";

const BUILTIN_PREFIXES: &str = "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
";

/// RDFS and [OWL 2 RL](https://www.w3.org/TR/owl2-profiles/#OWL_2_RL) entailment rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinRule {
    // Schema rules
    ScmSco,  // SubClassOf transitivity
    ScmSpo,  // SubPropertyOf transitivity
    ScmEqc1, // EquivalentClass => SubClassOf
    ScmEqc2, // Mutual SubClassOf => EquivalentClass

    // Class axiom rules
    CaxSco,  // SubClassOf
    CaxEqc1, // EquivalentClasses (1)
    CaxEqc2, // EquivalentClasses (2)

    // Property axiom rules
    PrpSpo1, // SubPropertyOf
    PrpDom,  // Domain
    PrpRng,  // Range
    PrpInv1, // InverseOf (1)
    PrpInv2, // InverseOf (2)
    PrpSymp, // SymmetricProperty
    PrpTrp,  // TransitiveProperty

    // Equality rules
    EqSym,   // Symmetry of =
    EqTrans, // Transitivity of =
    EqRepS,  // Subject replacement
    EqRepO,  // Object replacement
}

impl BuiltinRule {
    pub fn name(self) -> &'static str {
        match self {
            Self::ScmSco => "scm-sco",
            Self::ScmSpo => "scm-spo",
            Self::ScmEqc1 => "scm-eqc1",
            Self::ScmEqc2 => "scm-eqc2",
            Self::CaxSco => "cax-sco",
            Self::CaxEqc1 => "cax-eqc1",
            Self::CaxEqc2 => "cax-eqc2",
            Self::PrpSpo1 => "prp-spo1",
            Self::PrpDom => "prp-dom",
            Self::PrpRng => "prp-rng",
            Self::PrpInv1 => "prp-inv1",
            Self::PrpInv2 => "prp-inv2",
            Self::PrpSymp => "prp-symp",
            Self::PrpTrp => "prp-trp",
            Self::EqSym => "eq-sym",
            Self::EqTrans => "eq-trans",
            Self::EqRepS => "eq-rep-s",
            Self::EqRepO => "eq-rep-o",
        }
    }

    /// The CONSTRUCT query of the rule, using the `rdf`, `rdfs` and `owl` prefixes.
    pub fn body(self) -> &'static str {
        match self {
            Self::ScmSco => {
                "CONSTRUCT { ?c1 rdfs:subClassOf ?c3 } WHERE { ?c1 rdfs:subClassOf ?c2 . ?c2 rdfs:subClassOf ?c3 }"
            }
            Self::ScmSpo => {
                "CONSTRUCT { ?p1 rdfs:subPropertyOf ?p3 } WHERE { ?p1 rdfs:subPropertyOf ?p2 . ?p2 rdfs:subPropertyOf ?p3 }"
            }
            Self::ScmEqc1 => {
                "CONSTRUCT { ?c1 rdfs:subClassOf ?c2 . ?c2 rdfs:subClassOf ?c1 } WHERE { ?c1 owl:equivalentClass ?c2 }"
            }
            Self::ScmEqc2 => {
                "CONSTRUCT { ?c1 owl:equivalentClass ?c2 } WHERE { ?c1 rdfs:subClassOf ?c2 . ?c2 rdfs:subClassOf ?c1 FILTER(?c1 != ?c2) }"
            }
            Self::CaxSco => {
                "CONSTRUCT { ?x rdf:type ?c2 } WHERE { ?c1 rdfs:subClassOf ?c2 . ?x rdf:type ?c1 }"
            }
            Self::CaxEqc1 => {
                "CONSTRUCT { ?x rdf:type ?c2 } WHERE { ?c1 owl:equivalentClass ?c2 . ?x rdf:type ?c1 }"
            }
            Self::CaxEqc2 => {
                "CONSTRUCT { ?x rdf:type ?c1 } WHERE { ?c1 owl:equivalentClass ?c2 . ?x rdf:type ?c2 }"
            }
            Self::PrpSpo1 => {
                "CONSTRUCT { ?x ?p2 ?y } WHERE { ?p1 rdfs:subPropertyOf ?p2 . ?x ?p1 ?y }"
            }
            Self::PrpDom => "CONSTRUCT { ?x rdf:type ?c } WHERE { ?p rdfs:domain ?c . ?x ?p ?y }",
            Self::PrpRng => {
                "CONSTRUCT { ?y rdf:type ?c } WHERE { ?p rdfs:range ?c . ?x ?p ?y FILTER(!isLiteral(?y)) }"
            }
            Self::PrpInv1 => {
                "CONSTRUCT { ?y ?p2 ?x } WHERE { ?p1 owl:inverseOf ?p2 . ?x ?p1 ?y FILTER(!isLiteral(?y)) }"
            }
            Self::PrpInv2 => {
                "CONSTRUCT { ?y ?p1 ?x } WHERE { ?p1 owl:inverseOf ?p2 . ?x ?p2 ?y FILTER(!isLiteral(?y)) }"
            }
            Self::PrpSymp => {
                "CONSTRUCT { ?y ?p ?x } WHERE { ?p rdf:type owl:SymmetricProperty . ?x ?p ?y FILTER(!isLiteral(?y)) }"
            }
            Self::PrpTrp => {
                "CONSTRUCT { ?x ?p ?z } WHERE { ?p rdf:type owl:TransitiveProperty . ?x ?p ?y . ?y ?p ?z }"
            }
            Self::EqSym => "CONSTRUCT { ?y owl:sameAs ?x } WHERE { ?x owl:sameAs ?y }",
            Self::EqTrans => {
                "CONSTRUCT { ?x owl:sameAs ?z } WHERE { ?x owl:sameAs ?y . ?y owl:sameAs ?z }"
            }
            Self::EqRepS => "CONSTRUCT { ?s2 ?p ?o } WHERE { ?s owl:sameAs ?s2 . ?s ?p ?o }",
            Self::EqRepO => "CONSTRUCT { ?s ?p ?o2 } WHERE { ?o owl:sameAs ?o2 . ?s ?p ?o }",
        }
    }

    /// The rule as a standalone [`Rule`] named `urn:oxonto:rule:{name}`.
    pub fn to_rule(self) -> Rule {
        Rule::new(
            NamedNode::new_unchecked(format!("{BUILTIN_RULE_NAMESPACE}{}", self.name())),
            format!("{BUILTIN_PREFIXES}{}", self.body()),
        )
    }
}

impl fmt::Display for BuiltinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const TRANSITIVE_RULES: &[BuiltinRule] = &[BuiltinRule::ScmSco, BuiltinRule::ScmSpo];

const RDFS_SIMPLE_RULES: &[BuiltinRule] = &[
    BuiltinRule::ScmSco,
    BuiltinRule::ScmSpo,
    BuiltinRule::CaxSco,
    BuiltinRule::PrpSpo1,
];

const RDFS_RULES: &[BuiltinRule] = &[
    BuiltinRule::ScmSco,
    BuiltinRule::ScmSpo,
    BuiltinRule::CaxSco,
    BuiltinRule::PrpSpo1,
    BuiltinRule::PrpDom,
    BuiltinRule::PrpRng,
];

const OWL_MICRO_RULES: &[BuiltinRule] = &[
    BuiltinRule::ScmSco,
    BuiltinRule::ScmSpo,
    BuiltinRule::CaxSco,
    BuiltinRule::PrpSpo1,
    BuiltinRule::PrpDom,
    BuiltinRule::PrpRng,
    BuiltinRule::ScmEqc1,
    BuiltinRule::ScmEqc2,
    BuiltinRule::CaxEqc1,
    BuiltinRule::CaxEqc2,
    BuiltinRule::PrpInv1,
    BuiltinRule::PrpInv2,
    BuiltinRule::PrpSymp,
    BuiltinRule::PrpTrp,
];

const OWL_MINI_RULES: &[BuiltinRule] = &[
    BuiltinRule::ScmSco,
    BuiltinRule::ScmSpo,
    BuiltinRule::CaxSco,
    BuiltinRule::PrpSpo1,
    BuiltinRule::PrpDom,
    BuiltinRule::PrpRng,
    BuiltinRule::ScmEqc1,
    BuiltinRule::ScmEqc2,
    BuiltinRule::CaxEqc1,
    BuiltinRule::CaxEqc2,
    BuiltinRule::PrpInv1,
    BuiltinRule::PrpInv2,
    BuiltinRule::PrpSymp,
    BuiltinRule::PrpTrp,
    BuiltinRule::EqSym,
    BuiltinRule::EqTrans,
];

const OWL_RULES: &[BuiltinRule] = &[
    BuiltinRule::ScmSco,
    BuiltinRule::ScmSpo,
    BuiltinRule::CaxSco,
    BuiltinRule::PrpSpo1,
    BuiltinRule::PrpDom,
    BuiltinRule::PrpRng,
    BuiltinRule::ScmEqc1,
    BuiltinRule::ScmEqc2,
    BuiltinRule::CaxEqc1,
    BuiltinRule::CaxEqc2,
    BuiltinRule::PrpInv1,
    BuiltinRule::PrpInv2,
    BuiltinRule::PrpSymp,
    BuiltinRule::PrpTrp,
    BuiltinRule::EqSym,
    BuiltinRule::EqTrans,
    BuiltinRule::EqRepS,
    BuiltinRule::EqRepO,
];

/// The class-level reasoners, from the weakest to the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReasonerKind {
    /// Transitivity of `rdfs:subClassOf` and `rdfs:subPropertyOf`.
    Transitive,
    /// Adds class membership and property inheritance.
    RdfsSimple,
    /// Adds domains and ranges.
    #[default]
    Rdfs,
    /// Adds equivalent classes, inverse, symmetric and transitive properties.
    OwlMicro,
    /// Adds `owl:sameAs` symmetry and transitivity.
    OwlMini,
    /// Adds `owl:sameAs` replacement.
    Owl,
}

impl ReasonerKind {
    pub const ALL: [Self; 6] = [
        Self::Transitive,
        Self::RdfsSimple,
        Self::Rdfs,
        Self::OwlMicro,
        Self::OwlMini,
        Self::Owl,
    ];

    pub fn rules(self) -> &'static [BuiltinRule] {
        match self {
            Self::Transitive => TRANSITIVE_RULES,
            Self::RdfsSimple => RDFS_SIMPLE_RULES,
            Self::Rdfs => RDFS_RULES,
            Self::OwlMicro => OWL_MICRO_RULES,
            Self::OwlMini => OWL_MINI_RULES,
            Self::Owl => OWL_RULES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Transitive => "transitive",
            Self::RdfsSimple => "rdfs-simple",
            Self::Rdfs => "rdfs",
            Self::OwlMicro => "owl-micro",
            Self::OwlMini => "owl-mini",
            Self::Owl => "owl",
        }
    }
}

impl fmt::Display for ReasonerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
