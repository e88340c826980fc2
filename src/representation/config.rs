//! Static configuration for representation building.

use serde::{Deserialize, Serialize};

/// Fixed IRIs, labels and size hints used when shaping output.
///
/// Everything here is request-independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentationConfig {
    /// IRI of the container.
    pub container_uri: String,
    /// `dcterms:title` of the container.
    pub container_title: String,
    /// Icon shown in compact summaries.
    pub icon_uri: String,
    /// IRI of the creation dialog descriptor.
    pub dialog_uri: String,
    /// Document the creation dialog opens.
    pub dialog_document_uri: String,
    /// Label of the creation dialog.
    pub dialog_label: String,
    /// Dialog width hint.
    pub dialog_hint_width: String,
    /// Dialog height hint.
    pub dialog_hint_height: String,
    /// Preview width hint.
    pub preview_hint_width: String,
    /// Preview height hint.
    pub preview_hint_height: String,
    /// Resource shape the container's members are constrained by.
    pub shape_uri: String,
}

/// Path segment appended to a record IRI for its compact resource.
pub const COMPACT_SEGMENT: &str = "compact";
/// Path segment appended to a record IRI for its preview document.
pub const PREVIEW_SEGMENT: &str = "preview";
/// Path segment of the creation dialog under the container.
pub const DIALOG_SEGMENT: &str = "creationDialog";

impl RepresentationConfig {
    /// Configuration for a deployment rooted at `base_url`.
    ///
    /// The container lives at `<base>/bugs`; icon, dialog document and shape
    /// are served from the base.
    pub fn for_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let container_uri = format!("{}/bugs", base);
        Self {
            dialog_uri: format!("{}/{}", container_uri, DIALOG_SEGMENT),
            container_uri,
            container_title: "Bug Container".to_string(),
            icon_uri: format!("{}/oslc-16x16.png", base),
            dialog_document_uri: format!("{}/newBug.html", base),
            dialog_label: "Open Bug".to_string(),
            dialog_hint_width: "450px".to_string(),
            dialog_hint_height: "395px".to_string(),
            preview_hint_width: "400px".to_string(),
            preview_hint_height: "200px".to_string(),
            shape_uri: format!("{}/Defect-shape.ttl", base),
        }
    }
}

impl Default for RepresentationConfig {
    fn default() -> Self {
        Self::for_base("http://localhost:8080")
    }
}
