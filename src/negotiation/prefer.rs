//! `Prefer: return=representation` include/omit negotiation.

use serde::Serialize;
use std::collections::BTreeSet;

use super::header::{parse_elements, HeaderElement};

/// Response header value signalling an honored preference.
pub const PREFERENCE_APPLIED_VALUE: &str = "return=representation";

/// Include/omit token sets negotiated for one request.
///
/// The two sets are kept disjoint. A token named in both stays in `include`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferenceSet {
    include: BTreeSet<String>,
    omit: BTreeSet<String>,
}

impl PreferenceSet {
    /// Empty preference set (server defaults apply).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every occurrence of the `Prefer` header and union the results.
    ///
    /// Only the `return=representation` element is read; other elements and
    /// malformed input are skipped. Never fails.
    pub fn parse<S: AsRef<str>>(header_values: &[S]) -> Self {
        let mut prefs = Self::new();
        for value in header_values {
            prefs.merge_header(value.as_ref());
        }
        prefs
    }

    /// Merge the tokens of one header value into this set.
    pub fn merge_header(&mut self, header_value: &str) {
        for element in parse_elements(header_value) {
            if element.is("return", "representation") {
                collect_tokens(&element, "include", &mut self.include);
                collect_tokens(&element, "omit", &mut self.omit);
            }
        }
        let include = &self.include;
        self.omit.retain(|token| !include.contains(token));
    }

    /// True iff `token` was asked to be included.
    pub fn wants(&self, token: &str) -> bool {
        self.include.contains(token)
    }

    /// True iff `token` was asked to be omitted.
    pub fn excludes(&self, token: &str) -> bool {
        self.omit.contains(token)
    }

    /// Included tokens in sorted order.
    pub fn included(&self) -> impl Iterator<Item = &str> {
        self.include.iter().map(String::as_str)
    }

    /// Omitted tokens in sorted order.
    pub fn omitted(&self) -> impl Iterator<Item = &str> {
        self.omit.iter().map(String::as_str)
    }

    /// Whether no preference was expressed.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.omit.is_empty()
    }
}

fn collect_tokens(element: &HeaderElement, param: &str, into: &mut BTreeSet<String>) {
    if let Some(value) = element.param(param).and_then(|p| p.value.as_deref()) {
        into.extend(value.split_whitespace().map(str::to_string));
    }
}

/// Records whether a preference changed the produced representation.
///
/// Lets the client tell "asked and got it" apart from "the default happened
/// to match". Surfaced as `Preference-Applied: return=representation`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferenceApplied(bool);

impl PreferenceApplied {
    /// Mark that a preference was honored.
    pub fn mark(&mut self) {
        self.0 = true;
    }

    /// Whether any preference was honored.
    pub fn is_applied(&self) -> bool {
        self.0
    }

    /// Header value to send, if any.
    pub fn header_value(&self) -> Option<&'static str> {
        self.0.then_some(PREFERENCE_APPLIED_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_include() {
        let prefs = PreferenceSet::parse(&[r#"return=representation; include="urn:pref:A urn:pref:B""#]);
        assert!(prefs.wants("urn:pref:A"));
        assert!(prefs.wants("urn:pref:B"));
        assert_eq!(prefs.included().count(), 2);
        assert_eq!(prefs.omitted().count(), 0);
    }

    #[test]
    fn test_repeated_headers_union() {
        let prefs = PreferenceSet::parse(&[
            r#"return=representation; include="urn:pref:A""#,
            r#"return=representation; include="urn:pref:B"; omit="urn:pref:C""#,
        ]);
        assert!(prefs.wants("urn:pref:A"));
        assert!(prefs.wants("urn:pref:B"));
        assert!(prefs.excludes("urn:pref:C"));
    }

    #[test]
    fn test_other_directives_ignored() {
        let prefs = PreferenceSet::parse(&[
            r#"return=minimal; include="urn:pref:A""#,
            r#"wait=10, respond-async"#,
        ]);
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_directive_within_list() {
        let prefs = PreferenceSet::parse(&[r#"wait=10, return=representation; omit="urn:pref:X""#]);
        assert!(prefs.excludes("urn:pref:X"));
    }

    #[test]
    fn test_include_wins_over_omit() {
        let prefs = PreferenceSet::parse(&[
            r#"return=representation; omit="urn:pref:A urn:pref:B""#,
            r#"return=representation; include="urn:pref:A""#,
        ]);
        assert!(prefs.wants("urn:pref:A"));
        assert!(!prefs.excludes("urn:pref:A"));
        assert!(prefs.excludes("urn:pref:B"));
    }

    #[test]
    fn test_malformed_is_empty_not_error() {
        let prefs = PreferenceSet::parse(&[r#"return=representation; include="urn:a"#]);
        assert!(prefs.is_empty());
        assert!(PreferenceSet::parse::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_preference_applied() {
        let mut applied = PreferenceApplied::default();
        assert_eq!(applied.header_value(), None);
        applied.mark();
        assert!(applied.is_applied());
        assert_eq!(applied.header_value(), Some("return=representation"));
    }
}
