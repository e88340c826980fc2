//! Per-request content negotiation.
//!
//! Turns raw `Prefer` header values into a [`PreferenceSet`] that the
//! representation builders consult, and tracks whether any preference
//! actually changed the output.

pub mod header;
pub mod prefer;

pub use header::{parse_elements, HeaderElement, Parameter};
pub use prefer::{PreferenceApplied, PreferenceSet, PREFERENCE_APPLIED_VALUE};

/// `Prefer` request header.
pub const PREFER: &str = "Prefer";
/// `Preference-Applied` response header.
pub const PREFERENCE_APPLIED: &str = "Preference-Applied";
