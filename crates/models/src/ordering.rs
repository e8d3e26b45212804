//! Comparison policies shared by every normalizer.
//!
//! Both policies are total orders over well-formed input. Callers sort with
//! the stable `sort_by`, so elements comparing equal keep their input order.

use std::cmp::Ordering;

/// Primary collation weight: punctuation, then digits, then letters, with
/// case folded away.
fn collation_key(c: char) -> (u8, char) {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}

/// Locale-style comparison of two names.
///
/// Names compare case-insensitively first, so `abc` sorts before `Zed`.
/// Names differing only in case put lowercase first at the first case
/// difference; byte order settles anything left.
pub fn lexicographic(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(collation_key)
        .cmp(b.chars().map(collation_key))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Shorter strings first; equal lengths fall back to [`lexicographic`].
///
/// Length is measured in characters, not bytes, so non-ASCII identifiers
/// order the same way an editor would count them.
pub fn length_then_lexicographic(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| lexicographic(a, b))
}

/// Name and declared type of a class field, as captured before reordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSignature {
    pub name: String,
    /// Declared type text without the leading `:`. Empty when the field has
    /// no type annotation.
    pub type_text: String,
}

impl FieldSignature {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
        }
    }

    /// Length of `name + type`, the primary sort key for fields.
    pub fn combined_len(&self) -> usize {
        self.name.chars().count() + self.type_text.chars().count()
    }
}

/// Orders fields by the combined length of name and type, then by name.
pub fn field_order(a: &FieldSignature, b: &FieldSignature) -> Ordering {
    a.combined_len()
        .cmp(&b.combined_len())
        .then_with(|| lexicographic(&a.name, &b.name))
}
