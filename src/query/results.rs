//! Query results and their SPARQL 1.1 JSON form.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::types::Term;

/// One row: variable name to bound term. Unbound variables are absent.
pub type Solution = BTreeMap<String, Term>;

/// Materialized result of a query.
///
/// Consumed once through `IntoIterator`; serializes as
/// `application/sparql-results+json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResults {
    vars: Vec<String>,
    rows: Vec<Solution>,
}

impl QueryResults {
    pub(crate) fn new(vars: Vec<String>, rows: Vec<Solution>) -> Self {
        Self { vars, rows }
    }

    /// Projected variable names.
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// All rows.
    pub fn rows(&self) -> &[Solution] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for QueryResults {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[derive(Serialize)]
struct SparqlJson<'a> {
    head: Head<'a>,
    results: Bindings<'a>,
}

#[derive(Serialize)]
struct Head<'a> {
    vars: &'a [String],
}

#[derive(Serialize)]
struct Bindings<'a> {
    bindings: Vec<BTreeMap<&'a str, BoundValue<'a>>>,
}

#[derive(Serialize)]
struct BoundValue<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

impl<'a> From<&'a Term> for BoundValue<'a> {
    fn from(term: &'a Term) -> Self {
        let kind = match term {
            Term::Iri(_) => "uri",
            Term::Blank(_) => "bnode",
            Term::Literal(_) => "literal",
        };
        Self {
            kind,
            value: term.value(),
        }
    }
}

impl Serialize for QueryResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bindings = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(name, term)| (name.as_str(), BoundValue::from(term)))
                    .collect()
            })
            .collect();
        SparqlJson {
            head: Head { vars: &self.vars },
            results: Bindings { bindings },
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparql_json_shape() {
        let mut row = Solution::new();
        row.insert("s".into(), Term::iri("urn:a"));
        row.insert("t".into(), Term::literal("x"));
        let results = QueryResults::new(vec!["s".into(), "t".into(), "u".into()], vec![row]);

        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(
            value,
            json!({
                "head": {"vars": ["s", "t", "u"]},
                "results": {"bindings": [
                    {"s": {"type": "uri", "value": "urn:a"},
                     "t": {"type": "literal", "value": "x"}}
                ]}
            })
        );
    }

    #[test]
    fn test_into_iter_consumes_rows() {
        let results = QueryResults::new(vec![], vec![Solution::new(), Solution::new()]);
        assert_eq!(results.into_iter().count(), 2);
    }
}
