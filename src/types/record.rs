//! Records and their keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::graph::Graph;
use super::term::Term;

/// Stable, URI-like identifier of a record.
///
/// Ordered lexicographically so containment listings are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey(String);

impl RecordKey {
    /// Wrap an existing record URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Mint a fresh key under `container_uri` using a random UUID segment.
    pub fn mint(container_uri: &str) -> Self {
        Self(format!(
            "{}/{}",
            container_uri.trim_end_matches('/'),
            Uuid::new_v4()
        ))
    }

    /// Key of the member `id` of `container_uri`.
    pub fn member(container_uri: &str, id: &str) -> Self {
        Self(format!("{}/{}", container_uri.trim_end_matches('/'), id))
    }

    /// The record URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The record URI as an IRI term.
    pub fn to_term(&self) -> Term {
        Term::Iri(self.0.clone())
    }

    /// URI of a sub-resource, e.g. `<key>/preview`.
    pub fn child(&self, segment: &str) -> String {
        format!("{}/{}", self.0.trim_end_matches('/'), segment)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordKey {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

/// A graph-structured document managed by the store.
///
/// The key never changes after creation. The body is only ever replaced
/// as a whole; the store has no in-place mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable record key.
    pub key: RecordKey,
    /// Record body.
    pub body: Graph,
    /// When the record entered the store. Not part of the content tag.
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(key: RecordKey, body: Graph) -> Self {
        Self {
            key,
            body,
            created_at: Utc::now(),
        }
    }

    /// The record's own subject term.
    pub fn subject(&self) -> Term {
        self.key.to_term()
    }

    /// First literal value of `predicate` on the record subject.
    ///
    /// Resource values of the same predicate are skipped. Returns `None`
    /// when no literal value exists.
    pub fn literal_property(&self, predicate: &str) -> Option<&str> {
        self.body
            .objects(&self.subject(), predicate)
            .find_map(Term::as_literal)
    }

    /// First IRI value of `predicate` on the record subject.
    pub fn iri_property(&self, predicate: &str) -> Option<&str> {
        self.body
            .objects(&self.subject(), predicate)
            .find_map(Term::as_iri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_is_under_container() {
        let key = RecordKey::mint("http://localhost/bugs/");
        assert!(key.as_str().starts_with("http://localhost/bugs/"));
        assert_eq!(key.as_str().matches("//").count(), 1);
        assert_ne!(key, RecordKey::mint("http://localhost/bugs"));
    }

    #[test]
    fn test_child_uri() {
        let key = RecordKey::new("http://localhost/bugs/1");
        assert_eq!(key.child("preview"), "http://localhost/bugs/1/preview");
    }

    #[test]
    fn test_literal_property_ignores_references() {
        let key = RecordKey::new("http://localhost/bugs/1");
        let mut body = Graph::new();
        body.add(key.to_term(), "urn:p:title", Term::iri("http://elsewhere"));
        body.add(key.to_term(), "urn:p:desc", Term::literal("text"));
        let record = Record::new(key, body);

        assert_eq!(record.literal_property("urn:p:title"), None);
        assert_eq!(record.literal_property("urn:p:desc"), Some("text"));
        assert_eq!(record.iri_property("urn:p:title"), Some("http://elsewhere"));
    }

    #[test]
    fn test_mixed_values_of_one_predicate() {
        let key = RecordKey::new("http://localhost/bugs/1");
        let mut body = Graph::new();
        body.add(key.to_term(), "urn:p:title", Term::iri("http://elsewhere"));
        body.add(key.to_term(), "urn:p:title", Term::literal("Crash on save"));
        let record = Record::new(key, body);

        assert_eq!(record.literal_property("urn:p:title"), Some("Crash on save"));
        assert_eq!(record.iri_property("urn:p:title"), Some("http://elsewhere"));
    }
}
