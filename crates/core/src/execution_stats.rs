use std::fmt;

/// Per-run counts of normalized files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExecutionStats {
    pub files_modified: usize,
    pub files_unmodified: usize,
    pub files_with_errors: usize,
}

impl ExecutionStats {
    pub fn total_files(&self) -> usize {
        self.files_modified + self.files_unmodified + self.files_with_errors
    }

    pub fn has_errors(&self) -> bool {
        self.files_with_errors > 0
    }
}

impl fmt::Display for ExecutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files processed ({} modified, {} unmodified, {} errors)",
            self.total_files(),
            self.files_modified,
            self.files_unmodified,
            self.files_with_errors
        )
    }
}
