//! Shapes the output for a record or the container from negotiated preferences.
//!
//! | Shape | Produced when |
//! |-------|---------------|
//! | `Record` | record requested, no `PreferCompact` |
//! | `CompactRecord` | record requested with `include=PreferCompact` |
//! | `FullContainer` | container requested (default) |
//! | `MinimalContainer` | `include=PreferMinimalContainer` or `omit=PreferContainment` |
//! | `Dialog` | creation dialog descriptor requested |
//!
//! Builders return owned graphs so the store lock can be released before
//! the result is serialized and written out.

pub mod compact;
pub mod config;

use crate::negotiation::{PreferenceApplied, PreferenceSet};
use crate::store::RecordSet;
use crate::types::{Graph, Record, Term, VersionTag};
use crate::vocab::{dcterms, ldp, oslc, rdf};

pub use compact::{record_label, CompactEnvelope, CompactSummary, Preview, RecordDetails};
pub use config::{RepresentationConfig, COMPACT_SEGMENT, DIALOG_SEGMENT, PREVIEW_SEGMENT};

/// Which shape a representation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Record body verbatim.
    Record,
    /// Compact resource plus the record body.
    CompactRecord,
    /// Container metadata without membership.
    MinimalContainer,
    /// Container metadata with one `ldp:contains` per member.
    FullContainer,
    /// Creation dialog descriptor.
    Dialog,
}

/// Output of a builder, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    /// Shape chosen.
    pub shape: Shape,
    /// Triples to serialize.
    pub graph: Graph,
    /// Version tag to send as `ETag`, if the resource has one.
    pub tag: Option<VersionTag>,
    /// Whether a preference changed the output.
    pub preference_applied: PreferenceApplied,
}

/// Builds representations from records, the container, and preferences.
#[derive(Debug, Clone, Default)]
pub struct RepresentationBuilder {
    config: RepresentationConfig,
}

impl RepresentationBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: RepresentationConfig) -> Self {
        Self { config }
    }

    /// The builder's configuration.
    pub fn config(&self) -> &RepresentationConfig {
        &self.config
    }

    /// Representation of a single record.
    ///
    /// The full body is always included; `PreferCompact` adds the compact
    /// resource on top.
    pub fn record(&self, record: &Record, tag: VersionTag, prefs: &PreferenceSet) -> Representation {
        let mut applied = PreferenceApplied::default();
        let (shape, graph) = if prefs.wants(oslc::PREFER_COMPACT) {
            applied.mark();
            let mut graph = self.compact_graph(record);
            graph.merge(&record.body);
            (Shape::CompactRecord, graph)
        } else {
            (Shape::Record, record.body.clone())
        };

        Representation {
            shape,
            graph,
            tag: Some(tag),
            preference_applied: applied,
        }
    }

    /// Representation of the container.
    ///
    /// Containment is included unless the client asks for a minimal
    /// container or omits containment; an explicit include of containment
    /// wins over both. `PreferDialog` adds the creation dialog.
    pub fn container(&self, records: &RecordSet, prefs: &PreferenceSet) -> Representation {
        let mut applied = PreferenceApplied::default();
        let container = Term::iri(&self.config.container_uri);

        let mut graph = Graph::new();
        graph.add(container.clone(), rdf::TYPE, Term::iri(ldp::BASIC_CONTAINER));
        graph.add(
            container.clone(),
            dcterms::TITLE,
            Term::literal(&self.config.container_title),
        );

        if prefs.wants(oslc::PREFER_DIALOG) {
            applied.mark();
            graph.merge(&self.dialog_graph());
        }

        let mut include_containment = true;
        if prefs.wants(ldp::PREFER_CONTAINMENT) {
            applied.mark();
        } else if prefs.wants(ldp::PREFER_MINIMAL_CONTAINER) || prefs.excludes(ldp::PREFER_CONTAINMENT) {
            applied.mark();
            include_containment = false;
        }

        let shape = if include_containment {
            for key in records.containment_view() {
                graph.add(container.clone(), ldp::CONTAINS, key.to_term());
            }
            Shape::FullContainer
        } else {
            Shape::MinimalContainer
        };

        Representation {
            shape,
            graph,
            tag: Some(records.container_tag().clone()),
            preference_applied: applied,
        }
    }

    /// Representation of the creation dialog descriptor.
    pub fn dialog(&self) -> Representation {
        Representation {
            shape: Shape::Dialog,
            graph: self.dialog_graph(),
            tag: None,
            preference_applied: PreferenceApplied::default(),
        }
    }

    /// Compact summary of a record.
    pub fn compact_summary(&self, record: &Record) -> CompactSummary {
        CompactSummary {
            title: record_label(record),
            icon: self.config.icon_uri.clone(),
            small_preview: Preview {
                document: record.key.child(PREVIEW_SEGMENT),
                hint_width: self.config.preview_hint_width.clone(),
                hint_height: self.config.preview_hint_height.clone(),
            },
        }
    }

    /// Compact summary as triples rooted at `<record>/compact`.
    ///
    /// The preview node is `<record>/compact#preview`, so merging this graph
    /// with the record body never touches the body's own nodes.
    pub fn compact_graph(&self, record: &Record) -> Graph {
        let summary = self.compact_summary(record);
        let compact_uri = record.key.child(COMPACT_SEGMENT);
        let preview = Term::iri(format!("{}#preview", compact_uri));
        let compact = Term::iri(compact_uri);

        let mut graph = Graph::new();
        graph.add(compact.clone(), rdf::TYPE, Term::iri(oslc::COMPACT));
        if let Some(title) = summary.title {
            graph.add(compact.clone(), dcterms::TITLE, Term::literal(title));
        }
        graph.add(compact.clone(), oslc::ICON, Term::iri(summary.icon));
        graph.add(compact, oslc::SMALL_PREVIEW, preview.clone());

        let small = summary.small_preview;
        graph.add(preview.clone(), rdf::TYPE, Term::iri(oslc::PREVIEW));
        graph.add(preview.clone(), oslc::DOCUMENT, Term::iri(small.document));
        graph.add(preview.clone(), oslc::HINT_WIDTH, Term::literal(small.hint_width));
        graph.add(preview, oslc::HINT_HEIGHT, Term::literal(small.hint_height));
        graph
    }

    /// Creation dialog descriptor triples. Independent of any record.
    pub fn dialog_graph(&self) -> Graph {
        let c = &self.config;
        let dialog = Term::iri(&c.dialog_uri);

        let mut graph = Graph::new();
        graph.add(dialog.clone(), rdf::TYPE, Term::iri(oslc::DIALOG_CLASS));
        graph.add(dialog.clone(), oslc::LABEL, Term::literal(&c.dialog_label));
        graph.add(dialog.clone(), oslc::DIALOG, Term::iri(&c.dialog_document_uri));
        graph.add(dialog.clone(), oslc::HINT_WIDTH, Term::literal(&c.dialog_hint_width));
        graph.add(dialog, oslc::HINT_HEIGHT, Term::literal(&c.dialog_hint_height));
        graph
    }
}
