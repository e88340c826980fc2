//! Vocabulary IRIs used by the representation builders and negotiation.

/// RDF core vocabulary.
pub mod rdf {
    /// Namespace.
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// `rdf:type`.
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// Dublin Core terms.
pub mod dcterms {
    /// Namespace.
    pub const NS: &str = "http://purl.org/dc/terms/";
    /// `dcterms:title`.
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    /// `dcterms:description`.
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
}

/// Linked Data Platform.
pub mod ldp {
    /// Namespace.
    pub const NS: &str = "http://www.w3.org/ns/ldp#";
    /// `ldp:Resource`.
    pub const RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
    /// `ldp:BasicContainer`.
    pub const BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
    /// `ldp:contains`.
    pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
    /// Prefer token: include containment triples.
    pub const PREFER_CONTAINMENT: &str = "http://www.w3.org/ns/ldp#PreferContainment";
    /// Prefer token: container metadata only.
    pub const PREFER_MINIMAL_CONTAINER: &str = "http://www.w3.org/ns/ldp#PreferMinimalContainer";
    /// Link relation for the resource shape.
    pub const LINK_REL_CONSTRAINED_BY: &str = "http://www.w3.org/ns/ldp#constrainedBy";
}

/// OSLC core.
pub mod oslc {
    /// Namespace.
    pub const NS: &str = "http://open-services.net/ns/core#";
    /// `oslc:Compact`.
    pub const COMPACT: &str = "http://open-services.net/ns/core#Compact";
    /// `oslc:Preview`.
    pub const PREVIEW: &str = "http://open-services.net/ns/core#Preview";
    /// `oslc:Dialog`.
    pub const DIALOG_CLASS: &str = "http://open-services.net/ns/core#Dialog";
    /// `oslc:dialog`.
    pub const DIALOG: &str = "http://open-services.net/ns/core#dialog";
    /// `oslc:label`.
    pub const LABEL: &str = "http://open-services.net/ns/core#label";
    /// `oslc:icon`.
    pub const ICON: &str = "http://open-services.net/ns/core#icon";
    /// `oslc:document`.
    pub const DOCUMENT: &str = "http://open-services.net/ns/core#document";
    /// `oslc:hintWidth`.
    pub const HINT_WIDTH: &str = "http://open-services.net/ns/core#hintWidth";
    /// `oslc:hintHeight`.
    pub const HINT_HEIGHT: &str = "http://open-services.net/ns/core#hintHeight";
    /// `oslc:smallPreview`.
    pub const SMALL_PREVIEW: &str = "http://open-services.net/ns/core#smallPreview";
    /// Prefer token: compact representation.
    pub const PREFER_COMPACT: &str = "http://open-services.net/ns/core#PreferCompact";
    /// Prefer token: include creation dialogs.
    pub const PREFER_DIALOG: &str = "http://open-services.net/ns/core#PreferDialog";
    /// Link relation for the compact resource.
    pub const LINK_REL_COMPACT: &str = "http://open-services.net/ns/core#Compact";
    /// Link relation for the creation dialog.
    pub const LINK_REL_CREATION_DIALOG: &str = "http://open-services.net/ns/core#creationDialog";
}

/// OSLC change management.
pub mod oslc_cm {
    /// Namespace.
    pub const NS: &str = "http://open-services.net/ns/cm#";
    /// `oslc_cm:severity`.
    pub const SEVERITY: &str = "http://open-services.net/ns/cm#severity";

    /// Display labels for the severity individuals.
    pub const SEVERITY_LABELS: &[(&str, &str)] = &[
        ("http://open-services.net/ns/cm#Blocker", "Blocker"),
        ("http://open-services.net/ns/cm#Critical", "Critical"),
        ("http://open-services.net/ns/cm#Major", "Major"),
        ("http://open-services.net/ns/cm#Normal", "Normal"),
        ("http://open-services.net/ns/cm#Minor", "Minor"),
        ("http://open-services.net/ns/cm#SeverityUnassigned", "Unassigned"),
    ];

    /// Label for a severity IRI, if it is one of the known individuals.
    pub fn severity_label(iri: &str) -> Option<&'static str> {
        SEVERITY_LABELS
            .iter()
            .find(|(candidate, _)| *candidate == iri)
            .map(|(_, label)| *label)
    }
}

/// Well-known prefixes available to queries without a `PREFIX` declaration.
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("rdf", rdf::NS),
    ("dcterms", dcterms::NS),
    ("ldp", ldp::NS),
    ("oslc", oslc::NS),
    ("oslc_cm", oslc_cm::NS),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_live_in_their_namespace() {
        assert!(ldp::PREFER_CONTAINMENT.starts_with(ldp::NS));
        assert!(oslc::PREFER_COMPACT.starts_with(oslc::NS));
        assert!(dcterms::TITLE.starts_with(dcterms::NS));
        assert!(rdf::TYPE.starts_with(rdf::NS));
    }

    #[test]
    fn test_severity_label() {
        assert_eq!(oslc_cm::severity_label("http://open-services.net/ns/cm#Major"), Some("Major"));
        assert_eq!(
            oslc_cm::severity_label("http://open-services.net/ns/cm#SeverityUnassigned"),
            Some("Unassigned")
        );
        assert_eq!(oslc_cm::severity_label("urn:other"), None);
    }
}
