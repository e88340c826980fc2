//! Version tags for conditional requests.
//!
//! Two flavors share one opaque type:
//!
//! | Flavor | Source | Changes when |
//! |--------|--------|--------------|
//! | Random | UUID v4 (122 random bits) | container membership changes |
//! | Content | SHA-256 of the canonical body | record content changes |
//!
//! The container uses a random tag so its tag is the same no matter which
//! `Prefer` shape was served. Tags are kept in HTTP entity-tag form (`"…"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::record::Record;
use crate::canonical::graph_digest_hex;
use crate::error::{KernelError, Result};

/// Wildcard accepted in `If-None-Match`.
pub const WILDCARD: &str = "*";

/// Opaque version identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionTag(String);

impl VersionTag {
    /// Wrap an existing tag string (expected in quoted entity-tag form).
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Fresh random tag.
    pub fn generate_random() -> Self {
        Self::quoted(&Uuid::new_v4().simple().to_string())
    }

    /// Tag derived from a record's canonical body.
    ///
    /// Equal content yields an equal tag in any process at any time. The
    /// record key and creation time are not part of the hash.
    pub fn from_content(record: &Record) -> Self {
        Self::quoted(&graph_digest_hex(&record.body))
    }

    fn quoted(opaque: &str) -> Self {
        Self(format!("\"{}\"", opaque))
    }

    /// The tag as a header value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether one presented header value matches `current`.
///
/// `presented` may hold several comma-separated tags; a match on any of
/// them is a match. `*` matches everything. A leading `W/` is ignored on
/// both sides.
pub fn matches(presented: &str, current: &VersionTag) -> bool {
    let current = strip_weak(current.as_str().trim());
    split_tags(presented).any(|tag| tag == WILDCARD || strip_weak(tag) == current)
}

/// Whether any of the presented header values matches `current`.
///
/// Maps to the "already current" signal of a conditional GET.
pub fn is_current<S: AsRef<str>>(presented: &[S], current: &VersionTag) -> bool {
    presented.iter().any(|value| matches(value.as_ref(), current))
}

/// Fail with [`KernelError::NotModified`] when the client already holds `current`.
pub fn check_not_modified<S: AsRef<str>>(presented: &[S], current: &VersionTag) -> Result<()> {
    if is_current(presented, current) {
        tracing::debug!(tag = %current, "conditional request matched");
        return Err(KernelError::NotModified(current.clone()));
    }
    Ok(())
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Split a header value on commas that sit outside quoted tags.
fn split_tags(value: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts.into_iter().map(str::trim).filter(|s| !s.is_empty())
}
