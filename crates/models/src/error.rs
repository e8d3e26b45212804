//! Error types for normalization runs.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single file could not be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The file lacks the class/decorator/constructor shape a normalizer needs
    #[error("unexpected file shape: {reason}")]
    ShapeMismatch { reason: String },

    /// The source could not be parsed
    #[error("failed to parse {language} source: {message}")]
    ParseError { language: String, message: String },
}

impl NormalizeError {
    pub fn shape(reason: impl Into<String>) -> Self {
        NormalizeError::ShapeMismatch {
            reason: reason.into(),
        }
    }
}

/// Stage at which a file failed.
#[derive(Error, Debug)]
pub enum FileErrorKind {
    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Writing the normalized output failed
    #[error("failed to write file: {0}")]
    Persist(#[source] std::io::Error),
}

/// A per-file failure collected during a batch run.
#[derive(Error, Debug)]
#[error("{path}: {kind}")]
pub struct FileError {
    pub path: PathBuf,
    #[source]
    pub kind: FileErrorKind,
}

impl FileError {
    pub fn new(path: impl Into<PathBuf>, kind: FileErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn is_persistence_fault(&self) -> bool {
        matches!(self.kind, FileErrorKind::Persist(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for normalizers.
pub type NormalizeResult<T> = Result<T, NormalizeError>;
