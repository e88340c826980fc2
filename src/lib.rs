//! # ldp-kernel
//!
//! Versioned linked-data resource store with `Prefer`-driven representation
//! negotiation.
//!
//! The kernel answers one question per request:
//!
//! > Given the current records and what the client prefers, which triples do we send,
//! > and which version tag identifies them?
//!
//! ## Core Contract
//!
//! 1. Records live in one [`ResourceStore`] behind a read/write lock
//! 2. Every container membership change regenerates the container [`VersionTag`]
//!    under the same write lock
//! 3. Record tags are content-derived: equal bodies give equal tags
//! 4. `Prefer` headers change the *shape* of the output, never the data
//!
//! ## Architecture
//!
//! ```text
//! request → ResourceStore::read()/write() → VersionTag check → PreferenceSet
//!                 │                                                │
//!                 └────────────── RepresentationBuilder ◄──────────┘
//!                                        │
//!                            (lock released) → serialization
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ldp_kernel::{PreferenceSet, RepresentationBuilder, ResourceStore, Term, Triple};
//! use ldp_kernel::vocab::dcterms;
//!
//! let store = ResourceStore::new();
//! let builder = RepresentationBuilder::default();
//! let container = builder.config().container_uri.clone();
//!
//! let key = store
//!     .create_record(&container, vec![
//!         Triple::new(Term::iri(""), dcterms::TITLE, Term::literal("Crash on save")),
//!     ])
//!     .unwrap();
//!
//! let guard = store.read();
//! let record = guard.get(&key).unwrap();
//! let summary = builder.compact_summary(record);
//! assert_eq!(summary.title.as_deref(), Some("Crash on save"));
//!
//! let listing = builder.container(&guard, &PreferenceSet::new());
//! assert_eq!(listing.graph.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod error;
pub mod canonical;
pub mod vocab;
pub mod store;
pub mod negotiation;
pub mod representation;
pub mod query;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{Term, Triple, Graph, Record, RecordKey, VersionTag};
pub use types::version::{matches, is_current, check_not_modified, WILDCARD};
pub use error::{KernelError, Result};
pub use store::{ResourceStore, RecordSet, ReadGuard, WriteGuard};
pub use negotiation::{PreferenceSet, PreferenceApplied, PREFERENCE_APPLIED_VALUE};
pub use representation::{
    RepresentationBuilder, RepresentationConfig, Representation, Shape,
    CompactSummary, CompactEnvelope, Preview, RecordDetails, record_label,
};
pub use query::{Query, QueryResults, Solution};
pub use canonical::{canonical_triples, to_canonical_bytes, graph_digest_hex};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceConfig, ServiceState};
