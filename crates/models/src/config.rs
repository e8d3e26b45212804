use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Layout rules applied after normalization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatOptions {
    /// Spaces per indentation level
    pub indent_width: usize,
    /// Maximum line width before a markup start tag is broken up
    pub print_width: usize,
    /// Arrays with at least this many elements get one element per line
    pub array_break_min_items: usize,
    /// Rewrite double-quoted strings with single quotes where no escaping is needed
    pub single_quote: bool,
    /// Emit a trailing comma after the last element of a broken array
    pub trailing_comma: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            print_width: 80,
            array_break_min_items: 2,
            single_quote: true,
            trailing_comma: true,
        }
    }
}

impl FormatOptions {
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

/// Which files a batch run picks up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionOptions {
    /// Extra globs to exclude, on top of the dependency cache directory
    pub exclude: Vec<String>,
    /// Skip files ignored by `.gitignore`
    pub respect_gitignore: bool,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            respect_gitignore: true,
        }
    }
}

/// Top-level configuration, usually read from a `tso.yaml` file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TsoConfig {
    pub format: FormatOptions,
    pub selection: SelectionOptions,
}

impl TsoConfig {
    pub fn from_yaml_str(source: &str, origin: &Path) -> Result<Self, ConfigError> {
        // An empty document deserializes to null, which means "all defaults"
        if source.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: TsoConfig =
            serde_yaml::from_str(source).map_err(|source| ConfigError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_yaml_str(&source, path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.format.indent_width == 0 {
            return Err(ConfigError::Invalid(
                "format.indent_width must be at least 1".to_string(),
            ));
        }
        if self.format.array_break_min_items == 0 {
            return Err(ConfigError::Invalid(
                "format.array_break_min_items must be at least 1".to_string(),
            ));
        }
        if self.format.print_width == 0 {
            return Err(ConfigError::Invalid(
                "format.print_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
