//! The three normalizers and the pipeline that runs one of them followed by
//! the formatter.

mod class;
pub mod decorator;
pub mod markup;
pub mod record;

use tso_models::{NormalizeResult, PriorityTable, TsoConfig};

pub use decorator::normalize_module;
pub use markup::normalize_markup;
pub use record::normalize_record;

use crate::format::{format_markup, format_typescript};
use crate::lang::FileKind;

/// Normalize and format `source` as a file of the given kind.
pub fn normalize_source(
    kind: FileKind,
    source: &str,
    config: &TsoConfig,
    table: &PriorityTable,
) -> NormalizeResult<String> {
    let options = &config.format;
    match kind {
        FileKind::Module => format_typescript(&normalize_module(source, options)?, options),
        FileKind::Record => format_typescript(&normalize_record(source, options)?, options),
        FileKind::Markup => format_markup(&normalize_markup(source, table, options)?, options),
    }
}
