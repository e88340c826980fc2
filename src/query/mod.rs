//! Bulk query over the store.
//!
//! Supports the `SELECT` subset of SPARQL needed to search records:
//!
//! ```text
//! PREFIX ex: <http://example.com/>
//! SELECT DISTINCT ?bug ?title WHERE {
//!     ?bug dcterms:title ?title .
//!     ?bug oslc_cm:severity ex:Critical
//! } LIMIT 10
//! ```
//!
//! Terms may be `?var`, `<iri>`, `prefix:local`, `"literal"`, or `a` in
//! predicate position. The prefixes `rdf`, `dcterms`, `ldp`, `oslc` and
//! `oslc_cm` are predeclared. Evaluation joins the triple patterns over the
//! union of all record bodies; solutions come out in canonical triple order,
//! so equal stores give equal results.

mod parser;
pub mod results;

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Graph, Term, Triple};

pub use parser::parse;
pub use results::{QueryResults, Solution};

/// Variables returned by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `SELECT *`: every variable, in order of first appearance.
    All,
    /// Explicit variable list.
    Vars(Vec<String>),
}

/// One position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    /// Binds to any term.
    Var(String),
    /// Matches exactly this term.
    Term(Term),
}

/// A triple with variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    /// Subject position.
    pub subject: PatternTerm,
    /// Predicate position (only IRIs or variables).
    pub predicate: PatternTerm,
    /// Object position.
    pub object: PatternTerm,
}

impl TriplePattern {
    /// Extend `solution` so that this pattern matches `triple`, if possible.
    fn extend(&self, triple: &Triple, solution: &Solution) -> Option<Solution> {
        let mut out = solution.clone();
        let predicate = Term::Iri(triple.predicate.clone());
        for (pattern, term) in [
            (&self.subject, &triple.subject),
            (&self.predicate, &predicate),
            (&self.object, &triple.object),
        ] {
            match pattern {
                PatternTerm::Term(expected) if expected != term => return None,
                PatternTerm::Term(_) => {}
                PatternTerm::Var(name) => match out.get(name) {
                    Some(bound) if bound != term => return None,
                    Some(_) => {}
                    None => {
                        out.insert(name.clone(), term.clone());
                    }
                },
            }
        }
        Some(out)
    }

    fn vars(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(|p| match p {
                PatternTerm::Var(name) => Some(name.as_str()),
                PatternTerm::Term(_) => None,
            })
    }
}

/// A parsed `SELECT` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Projected variables.
    pub projection: Projection,
    /// Drop duplicate solutions.
    pub distinct: bool,
    /// Basic graph pattern.
    pub patterns: Vec<TriplePattern>,
    /// Maximum number of solutions.
    pub limit: Option<usize>,
}

impl Query {
    /// Variables returned by this query, in header order.
    pub fn projected_vars(&self) -> Vec<String> {
        match &self.projection {
            Projection::Vars(vars) => vars.clone(),
            Projection::All => {
                let mut seen = BTreeSet::new();
                self.patterns
                    .iter()
                    .flat_map(TriplePattern::vars)
                    .filter(|v| seen.insert(*v))
                    .map(str::to_string)
                    .collect()
            }
        }
    }

    /// Evaluate against the union of `graphs`.
    pub fn evaluate<'a>(&self, graphs: impl IntoIterator<Item = &'a Graph>) -> QueryResults {
        let mut dataset = Graph::new();
        for graph in graphs {
            dataset.merge(graph);
        }
        let triples: Vec<Triple> = dataset.triples().collect();

        let mut solutions: Vec<Solution> = vec![BTreeMap::new()];
        for pattern in &self.patterns {
            solutions = solutions
                .iter()
                .flat_map(|solution| {
                    triples
                        .iter()
                        .filter_map(move |triple| pattern.extend(triple, solution))
                })
                .collect();
            if solutions.is_empty() {
                break;
            }
        }

        let vars = self.projected_vars();
        let mut seen = BTreeSet::new();
        let rows: Vec<Solution> = solutions
            .into_iter()
            .map(|solution| {
                solution
                    .into_iter()
                    .filter(|(name, _)| vars.contains(name))
                    .collect::<Solution>()
            })
            .filter(|row| !self.distinct || seen.insert(row.clone()))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();

        tracing::debug!(
            patterns = self.patterns.len(),
            triples = triples.len(),
            rows = rows.len(),
            "query evaluated"
        );
        QueryResults::new(vars, rows)
    }
}
