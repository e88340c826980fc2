//! RDF terms and triples.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node or value in a record graph.
///
/// Variant order is significant: it fixes the canonical ordering used when
/// hashing graphs (IRIs, then blank nodes, then literals).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    /// Reference to a named resource.
    Iri(String),
    /// Reference to an anonymous resource, scoped to one graph.
    Blank(String),
    /// Plain string literal.
    Literal(String),
}

impl Term {
    /// Create an IRI term.
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    /// Create a blank node term.
    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    /// Create a literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Whether this term refers to another resource rather than carrying a value.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Iri(_) | Self::Blank(_))
    }

    /// Whether this term is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// The IRI if this is an IRI term.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal value if this is a literal term.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Lexical value regardless of kind.
    pub fn value(&self) -> &str {
        match self {
            Self::Iri(v) | Self::Blank(v) | Self::Literal(v) => v,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::Blank(label) => write!(f, "_:{}", label),
            Self::Literal(value) => write!(f, "{:?}", value),
        }
    }
}

/// A single (subject, predicate, object) statement.
///
/// Field order gives the canonical ordering: subject, predicate, object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject (IRI or blank node).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: String,
    /// Object term.
    pub object: Term,
}

impl Triple {
    /// Create a new triple.
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_flag() {
        assert!(Term::iri("http://example.com/a").is_resource());
        assert!(Term::blank("b0").is_resource());
        assert!(!Term::literal("hello").is_resource());
    }

    #[test]
    fn test_triple_ordering() {
        let s = Term::iri("http://example.com/s");
        let t1 = Triple::new(s.clone(), "http://example.com/a", Term::literal("z"));
        let t2 = Triple::new(s.clone(), "http://example.com/b", Term::literal("a"));
        let t3 = Triple::new(s, "http://example.com/b", Term::iri("http://example.com/o"));

        // Predicate dominates object
        assert!(t1 < t2);
        // IRIs sort before literals
        assert!(t3 < t2);
    }

    #[test]
    fn test_display() {
        let t = Triple::new(
            Term::iri("http://example.com/s"),
            "http://example.com/p",
            Term::literal("say \"hi\""),
        );
        assert_eq!(
            t.to_string(),
            r#"<http://example.com/s> <http://example.com/p> "say \"hi\"" ."#
        );
    }
}
