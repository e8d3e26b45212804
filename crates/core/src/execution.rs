use std::path::PathBuf;

use ignore::{
    overrides::{Override, OverrideBuilder},
    WalkBuilder,
};
use log::{debug, info, warn};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tso_models::{FileError, FileErrorKind, PriorityTable, TsoConfig};

use crate::diff::{unified_diff, DiffOptions, FileDiff};
use crate::execution_stats::ExecutionStats;
use crate::lang::FileKind;
use crate::normalize::normalize_source;

/// Dependency caches are never normalized, whatever the configuration says.
const ALWAYS_EXCLUDED: [&str; 2] = ["!**/node_modules", "!**/node_modules/**"];

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("cannot tell how to normalize '{0}': expected a .html, .dto or .module file")]
    UnrecognizedFile(PathBuf),

    #[error("invalid selection glob '{glob}': {source}")]
    Glob {
        glob: String,
        #[source]
        source: ignore::Error,
    },

    #[error("file writer task failed: {0}")]
    Writer(#[from] JoinError),
}

/// Outcome of a run. Per-file failures never abort the batch; they end up in
/// `errors`.
#[derive(Debug, Default)]
pub struct RunReport {
    pub stats: ExecutionStats,
    pub errors: Vec<FileError>,
    /// Diffs of the files that would change, in dry-run mode only
    pub diffs: Vec<FileDiff>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        !self.stats.has_errors()
    }

    fn fail(&mut self, path: PathBuf, kind: FileErrorKind) {
        let error = FileError::new(path, kind);
        warn!("{error}");
        self.stats.files_with_errors += 1;
        self.errors.push(error);
    }
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Root of the batch walk
    pub target_path: PathBuf,
    /// Normalize only this file instead of walking `target_path`
    pub file: Option<PathBuf>,
    /// Compute diffs instead of writing files
    pub dry_run: bool,
    pub config: TsoConfig,
    pub diff: DiffOptions,
}

impl RunConfig {
    pub fn new(target_path: impl Into<PathBuf>) -> Self {
        Self {
            target_path: target_path.into(),
            file: None,
            dry_run: false,
            config: TsoConfig::default(),
            diff: DiffOptions::default(),
        }
    }

    /// Build glob overrides selecting the files of `kind`.
    fn build_globs(&self, kind: FileKind) -> Result<Override, ExecutionError> {
        let mut builder = OverrideBuilder::new(&self.target_path);

        let excludes = self.config.selection.exclude.iter().map(|glob| {
            if glob.starts_with('!') {
                glob.to_string()
            } else {
                format!("!{glob}")
            }
        });
        let globs = std::iter::once(kind.include_glob())
            .chain(ALWAYS_EXCLUDED)
            .map(str::to_string)
            .chain(excludes);

        for glob in globs {
            builder.add(&glob).map_err(|source| ExecutionError::Glob {
                glob: glob.clone(),
                source,
            })?;
        }

        builder.build().map_err(|source| ExecutionError::Glob {
            glob: kind.include_glob().to_string(),
            source,
        })
    }

    fn create_walk_builder(&self, kind: FileKind, overrides: Override) -> WalkBuilder {
        let respect_gitignore = self.config.selection.respect_gitignore;
        let mut builder = WalkBuilder::new(&self.target_path);

        builder
            .overrides(overrides)
            .follow_links(false)
            .git_ignore(respect_gitignore)
            .git_global(respect_gitignore)
            .git_exclude(respect_gitignore)
            .require_git(false)
            .parents(respect_gitignore)
            .ignore(true)
            .hidden(!kind.includes_hidden());

        builder
    }

    /// All files of `kind` under `target_path`, sorted by path.
    pub fn collect_files(&self, kind: FileKind) -> Result<Vec<PathBuf>, ExecutionError> {
        let globs = self.build_globs(kind)?;
        let walker = self.create_walk_builder(kind, globs).build();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(dir_entry) => {
                    if dir_entry.file_type().is_some_and(|ft| ft.is_file()) {
                        files.push(dir_entry.into_path());
                    }
                }
                Err(err) => warn!("Walk error: {err}"),
            }
        }

        files.sort();
        Ok(files)
    }

    /// Files to normalize, in processing order: modules, records, markup.
    pub fn plan(&self) -> Result<Vec<(FileKind, PathBuf)>, ExecutionError> {
        if let Some(file) = &self.file {
            let kind = FileKind::from_file_name(file)
                .ok_or_else(|| ExecutionError::UnrecognizedFile(file.clone()))?;
            return Ok(vec![(kind, file.clone())]);
        }

        let mut planned = Vec::new();
        for kind in FileKind::ALL {
            let files = self.collect_files(kind)?;
            debug!("Selected {} {kind} files", files.len());
            planned.extend(files.into_iter().map(|path| (kind, path)));
        }
        Ok(planned)
    }

    /// Normalize every planned file, then wait for all writes to land.
    pub async fn execute(&self) -> Result<RunReport, ExecutionError> {
        let planned = self.plan()?;
        info!(
            "Normalizing {} files under {}",
            planned.len(),
            self.file.as_deref().unwrap_or(&self.target_path).display()
        );

        let table = PriorityTable::standard();
        let mut report = RunReport::default();
        let mut writers = JoinSet::new();

        for (kind, path) in planned {
            let original = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(err) => {
                    report.fail(path, FileErrorKind::Read(err));
                    continue;
                }
            };

            let normalized = match normalize_source(kind, &original, &self.config, &table) {
                Ok(normalized) => normalized,
                Err(err) => {
                    report.fail(path, FileErrorKind::Normalize(err));
                    continue;
                }
            };

            if normalized == original {
                debug!("Unchanged {kind} file {}", path.display());
                report.stats.files_unmodified += 1;
                continue;
            }

            debug!("Normalized {kind} file {}", path.display());
            report.stats.files_modified += 1;
            if self.dry_run {
                report
                    .diffs
                    .push(unified_diff(&path, &original, &normalized, &self.diff));
            } else {
                writers.spawn(async move {
                    let result = tokio::fs::write(&path, normalized).await;
                    (path, result)
                });
            }
        }

        let mut writer_failure = None;
        while let Some(joined) = writers.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((path, Err(err))) => {
                    report.stats.files_modified -= 1;
                    report.fail(path, FileErrorKind::Persist(err));
                }
                Err(err) => writer_failure = Some(err),
            }
        }
        if let Some(err) = writer_failure {
            return Err(ExecutionError::Writer(err));
        }

        Ok(report)
    }
}
