use std::fmt;
use std::path::Path;

use ast_grep_language::SupportLang;

/// The three kinds of file a run normalizes, recognized by name suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// `*.module.ts`: decorator dependency arrays are sorted
    Module,
    /// `*.dto.ts`: fields and constructor statements are sorted
    Record,
    /// `*.html`: tag attributes are sorted
    Markup,
}

impl FileKind {
    /// Batch order: modules, then records, then markup.
    pub const ALL: [FileKind; 3] = [FileKind::Module, FileKind::Record, FileKind::Markup];

    pub fn language(self) -> SupportLang {
        match self {
            FileKind::Module | FileKind::Record => SupportLang::TypeScript,
            FileKind::Markup => SupportLang::Html,
        }
    }

    pub fn include_glob(self) -> &'static str {
        match self {
            FileKind::Module => "**/*.module.ts",
            FileKind::Record => "**/*.dto.ts",
            FileKind::Markup => "**/*.html",
        }
    }

    /// Markup selection also picks up hidden files and directories.
    pub fn includes_hidden(self) -> bool {
        matches!(self, FileKind::Markup)
    }

    /// Classify an explicitly named file by the substrings in its name.
    ///
    /// Markup is checked first, then records, then modules.
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.contains(".html") {
            Some(FileKind::Markup)
        } else if name.contains(".dto") {
            Some(FileKind::Record)
        } else if name.contains(".module") {
            Some(FileKind::Module)
        } else {
            None
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Module => write!(f, "module"),
            FileKind::Record => write!(f, "dto"),
            FileKind::Markup => write!(f, "markup"),
        }
    }
}
