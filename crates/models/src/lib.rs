//! Shared types for the tso normalizers: ordering policies, the markup
//! attribute priority table, configuration and the error taxonomy.

pub mod config;
pub mod error;
pub mod ordering;
pub mod priority;

pub use config::{FormatOptions, SelectionOptions, TsoConfig};
pub use error::{ConfigError, FileError, FileErrorKind, NormalizeError, NormalizeResult};
pub use ordering::{field_order, length_then_lexicographic, lexicographic, FieldSignature};
pub use priority::{AttributeMatcher, PriorityTable};
