//! Graph bodies for records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

use super::term::{Term, Triple};
use crate::error::{KernelError, Result};

/// A set of triples indexed by (subject, predicate).
///
/// Uses BTreeMap/BTreeSet so that iteration always yields triples in
/// canonical (subject, predicate, object) order. Duplicate triples collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Triple>", from = "Vec<Triple>")]
pub struct Graph {
    statements: BTreeMap<(Term, String), BTreeSet<Term>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.statements
            .entry((triple.subject, triple.predicate))
            .or_default()
            .insert(triple.object)
    }

    /// Insert a triple from its parts.
    pub fn add(&mut self, subject: Term, predicate: impl Into<String>, object: Term) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    /// Add every triple of `other` to this graph.
    pub fn merge(&mut self, other: &Graph) {
        for triple in other.triples() {
            self.insert(triple);
        }
    }

    /// Number of distinct triples.
    pub fn len(&self) -> usize {
        self.statements.values().map(BTreeSet::len).sum()
    }

    /// Whether the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Whether the exact triple is present.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.statements
            .get(&(triple.subject.clone(), triple.predicate.clone()))
            .is_some_and(|objects| objects.contains(&triple.object))
    }

    /// All triples in canonical order.
    pub fn triples(&self) -> impl Iterator<Item = Triple> + '_ {
        self.statements.iter().flat_map(|((subject, predicate), objects)| {
            objects
                .iter()
                .map(move |object| Triple::new(subject.clone(), predicate.clone(), object.clone()))
        })
    }

    /// Objects of `(subject, predicate)` in canonical order.
    pub fn objects<'a>(
        &'a self,
        subject: &Term,
        predicate: &str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.statements
            .get(&(subject.clone(), predicate.to_string()))
            .into_iter()
            .flat_map(|objects| objects.iter())
    }

    /// First object of `(subject, predicate)`, if any.
    pub fn first_object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.objects(subject, predicate).next()
    }

    /// Resolve a document's triples against the IRI the document will live at.
    ///
    /// Relative references are resolved per RFC 3986: `""` is `base`,
    /// `#x` is `base#x`, `sibling` replaces the last path segment and
    /// `/x` or `../x` climb from the base path. Absolute IRIs are kept as
    /// written. Predicates must be absolute.
    /// Fails with [`KernelError::BadInput`] without producing a partial graph.
    pub fn resolve(base: &str, triples: impl IntoIterator<Item = Triple>) -> Result<Self> {
        let base_url = Url::parse(base)
            .map_err(|e| KernelError::BadInput(format!("invalid base IRI {:?}: {}", base, e)))?;

        let mut graph = Graph::new();
        for triple in triples {
            let subject = match triple.subject {
                Term::Literal(value) => {
                    return Err(KernelError::BadInput(format!(
                        "literal {:?} used as subject",
                        value
                    )))
                }
                other => resolve_term(base, &base_url, other)?,
            };
            if !is_absolute_iri(&triple.predicate) {
                return Err(KernelError::BadInput(format!(
                    "predicate must be an absolute IRI: {:?}",
                    triple.predicate
                )));
            }
            let object = resolve_term(base, &base_url, triple.object)?;
            graph.add(subject, triple.predicate, object);
        }
        Ok(graph)
    }
}

/// `""` and `#x` keep `base` exactly as given so the record subject
/// matches its key byte for byte.
fn resolve_term(base: &str, base_url: &Url, term: Term) -> Result<Term> {
    match term {
        Term::Iri(iri) if is_absolute_iri(&iri) => Ok(Term::Iri(iri)),
        Term::Iri(iri) if iri.is_empty() => Ok(Term::Iri(base.to_string())),
        Term::Iri(iri) if iri.starts_with('#') => Ok(Term::Iri(format!("{}{}", base, iri))),
        Term::Iri(iri) => base_url
            .join(&iri)
            .map(|resolved| Term::Iri(resolved.into()))
            .map_err(|e| KernelError::BadInput(format!("invalid IRI {:?}: {}", iri, e))),
        Term::Blank(label) if label.is_empty() => {
            Err(KernelError::BadInput("blank node without a label".to_string()))
        }
        other => Ok(other),
    }
}

/// Whether `iri` parses as an absolute IRI (it has a scheme).
pub(crate) fn is_absolute_iri(iri: &str) -> bool {
    Url::parse(iri).is_ok()
}

impl From<Vec<Triple>> for Graph {
    fn from(triples: Vec<Triple>) -> Self {
        triples.into_iter().collect()
    }
}

impl From<Graph> for Vec<Triple> {
    fn from(graph: Graph) -> Self {
        graph.triples().collect()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        for triple in iter {
            graph.insert(triple);
        }
        graph
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}
