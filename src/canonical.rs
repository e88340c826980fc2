//! Canonical serialization for deterministic hashing.
//!
//! This module provides functions to serialize data in a canonical, deterministic format
//! suitable for content-derived version tags.
//!
//! ## Determinism Guarantees
//!
//! - Graphs serialize as their triple list sorted by (subject, predicate, object)
//! - Stable field order: Struct fields serialize in declaration order
//! - No HashMap allowed: Use BTreeMap for maps in hashed data
//!
//! Blank node labels are hashed as written; two graphs that differ only by a
//! blank node relabelling produce different digests.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::{Graph, Triple};

/// Triples of `graph` in canonical order.
pub fn canonical_triples(graph: &Graph) -> Vec<Triple> {
    let mut triples: Vec<Triple> = graph.triples().collect();
    triples.sort();
    triples
}

/// Serialize a value to canonical JSON bytes for hashing.
///
/// This function produces deterministic output for the same input.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// SHA-256 of the canonical bytes of a value, as lowercase hex.
pub fn canonical_digest_hex<T: Serialize>(value: &T) -> String {
    let mut hasher = Sha256::new();
    hasher.update(to_canonical_bytes(value));
    hex::encode(hasher.finalize())
}

/// SHA-256 digest of a graph's canonical triple list, as lowercase hex.
pub fn graph_digest_hex(graph: &Graph) -> String {
    canonical_digest_hex(&canonical_triples(graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Term;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(Term::iri(s), p, Term::literal(o))
    }

    #[test]
    fn test_determinism() {
        let g: Graph = vec![triple("urn:s", "urn:p", "v")].into();

        let h1 = graph_digest_hex(&g);
        let h2 = graph_digest_hex(&g);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a: Graph = vec![triple("urn:s", "urn:p", "1"), triple("urn:t", "urn:p", "2")].into();
        let b: Graph = vec![triple("urn:t", "urn:p", "2"), triple("urn:s", "urn:p", "1")].into();
        assert_eq!(graph_digest_hex(&a), graph_digest_hex(&b));
    }

    #[test]
    fn test_literal_vs_iri_differs() {
        let a: Graph = vec![triple("urn:s", "urn:p", "urn:o")].into();
        let b: Graph = vec![Triple::new(Term::iri("urn:s"), "urn:p", Term::iri("urn:o"))].into();
        assert_ne!(graph_digest_hex(&a), graph_digest_hex(&b));
    }
}
