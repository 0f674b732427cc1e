//! Vocabularies used by the import walker and the rule engine that [`oxrdf::vocab`] does not provide.

pub mod owl {
    //! The subset of the [OWL 2](https://www.w3.org/TR/owl2-syntax/) vocabulary used for imports and OWL 2 RL rules.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";
    pub const ONTOLOGY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
    pub const IMPORTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
    pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
    pub const INVERSE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
    pub const SYMMETRIC_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#SymmetricProperty");
    pub const TRANSITIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
    pub const SAME_AS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
}

pub mod spin {
    //! [SPIN](https://spinrdf.org/spin.html) modeling vocabulary.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://spinrdf.org/spin#";
    /// Attaches a rule to the class whose instances it is run for.
    pub const RULE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spinrdf.org/spin#rule");
    /// The query of a template.
    pub const BODY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spinrdf.org/spin#body");
    /// A template argument declaration or a constraint on the instances of a class.
    pub const CONSTRAINT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spinrdf.org/spin#constraint");
    pub const CONSTRAINT_VIOLATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spinrdf.org/spin#ConstraintViolation");
    /// The resource a constraint violation is about.
    pub const VIOLATION_ROOT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spinrdf.org/spin#violationRoot");
}

pub mod sp {
    //! [SPIN SPARQL syntax](https://spinrdf.org/sp.html) vocabulary.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://spinrdf.org/sp#";
    /// The textual SPARQL representation of a query.
    pub const TEXT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spinrdf.org/sp#text");
}

pub mod spl {
    //! [SPIN standard modules library](https://spinrdf.org/spl.html) vocabulary.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://spinrdf.org/spl#";
    /// The property whose local name is the argument name.
    pub const PREDICATE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spinrdf.org/spl#predicate");
    pub const OPTIONAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spinrdf.org/spl#optional");
}
