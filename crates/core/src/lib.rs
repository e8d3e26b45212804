pub mod diff;
pub mod edit;
pub mod execution;
pub mod execution_stats;
pub mod format;
pub mod lang;
pub mod normalize;
pub mod tree;

pub use execution::{ExecutionError, RunConfig, RunReport};
pub use execution_stats::ExecutionStats;
pub use lang::FileKind;
pub use normalize::{normalize_markup, normalize_module, normalize_record, normalize_source};
pub use tso_models::{
    FileError, FileErrorKind, FormatOptions, NormalizeError, NormalizeResult, PriorityTable,
    TsoConfig,
};
