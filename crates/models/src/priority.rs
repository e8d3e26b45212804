//! Markup attribute precedence.
//!
//! The table is an ordered list of typed matchers. An attribute name is
//! classified by the first entry that matches it; names matching nothing land
//! in the single [`AttributeMatcher::Fallback`] slot.

use std::fmt;

/// One entry of the attribute priority table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeMatcher {
    /// Structural directive such as `*ngIf`: `*` followed by word characters.
    DirectivePrefix,
    /// Template reference such as `#form`: `#` followed by word characters.
    ReferencePrefix,
    /// Exact attribute name.
    Literal(&'static str),
    /// Names starting with the prefix and carrying at least one more
    /// character, e.g. `data-` matches `data-id` but not `data-`.
    Wildcard(&'static str),
    /// `(click)`: parenthesized name, not wrapped in brackets.
    EventBinding,
    /// `[value]`: bracketed name.
    PropertyBinding,
    /// `[(ngModel)]`: parenthesized name inside brackets.
    TwoWayBinding,
    /// Slot for attributes no other entry matches.
    Fallback,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_binding_char(c: char) -> bool {
    is_word_char(c) || c == '.' || c == '-'
}

fn strip_wrapping<'a>(name: &'a str, open: &str, close: &str) -> Option<&'a str> {
    name.strip_prefix(open)?.strip_suffix(close)
}

impl AttributeMatcher {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            AttributeMatcher::DirectivePrefix => name
                .strip_prefix('*')
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(is_word_char)),
            AttributeMatcher::ReferencePrefix => name
                .strip_prefix('#')
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(is_word_char)),
            AttributeMatcher::Literal(literal) => name == *literal,
            AttributeMatcher::Wildcard(prefix) => {
                name.len() > prefix.len() && name.starts_with(prefix)
            }
            AttributeMatcher::EventBinding => strip_wrapping(name, "(", ")")
                .is_some_and(|inner| !inner.is_empty() && inner.chars().all(is_binding_char)),
            AttributeMatcher::PropertyBinding => {
                strip_wrapping(name, "[", "]").is_some_and(|inner| inner.chars().all(is_binding_char))
            }
            AttributeMatcher::TwoWayBinding => {
                strip_wrapping(name, "[(", ")]").is_some_and(|inner| inner.chars().all(is_binding_char))
            }
            AttributeMatcher::Fallback => false,
        }
    }
}

impl fmt::Display for AttributeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeMatcher::DirectivePrefix => write!(f, "*directive"),
            AttributeMatcher::ReferencePrefix => write!(f, "#reference"),
            AttributeMatcher::Literal(name) => write!(f, "{name}"),
            AttributeMatcher::Wildcard(prefix) => write!(f, "{prefix}*"),
            AttributeMatcher::EventBinding => write!(f, "(event)"),
            AttributeMatcher::PropertyBinding => write!(f, "[property]"),
            AttributeMatcher::TwoWayBinding => write!(f, "[(two-way)]"),
            AttributeMatcher::Fallback => write!(f, "<fallback>"),
        }
    }
}

/// Ordered attribute matchers with exactly one fallback slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityTable {
    entries: Vec<AttributeMatcher>,
    fallback: usize,
}

impl PriorityTable {
    /// The precedence used for component templates.
    pub fn standard() -> Self {
        use AttributeMatcher::*;

        Self {
            entries: vec![
                DirectivePrefix,
                ReferencePrefix,
                Literal("id"),
                Literal("class"),
                Fallback,
                Literal("name"),
                Wildcard("data-"),
                Literal("src"),
                Literal("for"),
                Literal("type"),
                Literal("href"),
                Literal("values"),
                Literal("title"),
                Literal("alt"),
                Literal("role"),
                Wildcard("aria-"),
                EventBinding,
                PropertyBinding,
                TwoWayBinding,
            ],
            fallback: 4,
        }
    }

    pub fn entries(&self) -> &[AttributeMatcher] {
        &self.entries
    }

    /// Index of the first entry matching `name`, or the fallback slot.
    pub fn classify(&self, name: &str) -> usize {
        self.entries
            .iter()
            .position(|entry| entry.matches(name))
            .unwrap_or(self.fallback)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::standard()
    }
}
