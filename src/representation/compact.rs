//! Compact summaries and record view models.

use serde::Serialize;

use crate::types::Record;
use crate::vocab::{dcterms, oslc_cm};

/// Preview descriptor embedded in a compact summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    /// Document to show in the preview frame.
    pub document: String,
    /// Width hint.
    pub hint_width: String,
    /// Height hint.
    pub hint_height: String,
}

/// Reduced representation of a record for embedding in a host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactSummary {
    /// Human-readable label, absent when the record has no literal title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Icon IRI.
    pub icon: String,
    /// Small preview.
    pub small_preview: Preview,
}

/// JSON envelope: `{"compact": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactEnvelope {
    /// The summary.
    pub compact: CompactSummary,
}

/// Label of a record: its first literal `dcterms:title`.
///
/// Absent (not an error) when missing or when the title is a resource reference.
pub fn record_label(record: &Record) -> Option<String> {
    record.literal_property(dcterms::TITLE).map(str::to_string)
}

/// Display fields of a record for preview pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDetails {
    /// Record IRI.
    pub uri: String,
    /// Literal title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Severity label, when the severity is a known individual.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Literal description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RecordDetails {
    /// Extract display fields from `record`.
    pub fn from_record(record: &Record) -> Self {
        Self {
            uri: record.key.to_string(),
            title: record_label(record),
            severity: record
                .iri_property(oslc_cm::SEVERITY)
                .and_then(oslc_cm::severity_label)
                .map(str::to_string),
            description: record
                .literal_property(dcterms::DESCRIPTION)
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Graph, RecordKey, Term};
    use serde_json::json;

    fn record(build: impl FnOnce(&Term, &mut Graph)) -> Record {
        let key = RecordKey::new("http://localhost/bugs/1");
        let mut body = Graph::new();
        build(&key.to_term(), &mut body);
        Record::new(key, body)
    }

    #[test]
    fn test_label_rules() {
        let r = record(|s, g| {
            g.add(s.clone(), dcterms::TITLE, Term::literal("Crash on save"));
        });
        assert_eq!(record_label(&r).as_deref(), Some("Crash on save"));

        let r = record(|s, g| {
            g.add(s.clone(), dcterms::TITLE, Term::iri("http://elsewhere/title"));
        });
        assert_eq!(record_label(&r), None);

        let r = record(|s, g| {
            g.add(s.clone(), dcterms::TITLE, Term::iri("http://elsewhere/title"));
            g.add(s.clone(), dcterms::TITLE, Term::literal("Crash on save"));
        });
        assert_eq!(record_label(&r).as_deref(), Some("Crash on save"));

        let r = record(|_, _| {});
        assert_eq!(record_label(&r), None);
    }

    #[test]
    fn test_details() {
        let r = record(|s, g| {
            g.add(s.clone(), dcterms::TITLE, Term::literal("Crash"));
            g.add(s.clone(), dcterms::DESCRIPTION, Term::literal("Boom"));
            g.add(
                s.clone(),
                oslc_cm::SEVERITY,
                Term::iri("http://open-services.net/ns/cm#Blocker"),
            );
        });
        let details = RecordDetails::from_record(&r);
        assert_eq!(details.severity.as_deref(), Some("Blocker"));
        assert_eq!(details.description.as_deref(), Some("Boom"));
    }

    #[test]
    fn test_compact_json_shape() {
        let summary = CompactSummary {
            title: None,
            icon: "http://localhost/icon.png".into(),
            small_preview: Preview {
                document: "http://localhost/bugs/1/preview".into(),
                hint_width: "400px".into(),
                hint_height: "200px".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(CompactEnvelope { compact: summary }).unwrap(),
            json!({"compact": {
                "icon": "http://localhost/icon.png",
                "smallPreview": {
                    "document": "http://localhost/bugs/1/preview",
                    "hintWidth": "400px",
                    "hintHeight": "200px"
                }
            }})
        );
    }
}
