use std::path::Path;

use similar::{ChangeTag, TextDiff};

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// How dry-run diffs are rendered.
#[derive(Clone, Debug)]
pub struct DiffOptions {
    /// Unchanged lines shown around each hunk
    pub context_lines: usize,
    /// ANSI colors; off when `NO_COLOR` is set
    pub color: bool,
    /// Maximum changed lines shown per file (0 = unlimited)
    pub max_lines_per_file: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: 3,
            color: std::env::var("NO_COLOR").is_err(),
            max_lines_per_file: 500,
        }
    }
}

impl DiffOptions {
    /// Color is disabled if `no_color` is true or if `NO_COLOR` is set.
    pub fn with_color_control(no_color: bool) -> Self {
        Self {
            color: !no_color && std::env::var("NO_COLOR").is_err(),
            ..Self::default()
        }
    }

    fn paint(&self, out: &mut String, color: &str, text: &str) {
        if self.color {
            out.push_str(color);
            out.push_str(text);
            out.push_str(RESET);
        } else {
            out.push_str(text);
        }
    }
}

/// Unified diff of one normalized file.
#[derive(Clone, Debug)]
pub struct FileDiff {
    pub path: String,
    pub diff_text: String,
    pub additions: usize,
    pub deletions: usize,
}

impl FileDiff {
    pub fn print(&self) {
        print!("{}", self.diff_text);
        println!("+{} additions, -{} deletions\n", self.additions, self.deletions);
    }
}

/// Unified diff between the file as read and its normalized form.
pub fn unified_diff(path: &Path, original: &str, normalized: &str, options: &DiffOptions) -> FileDiff {
    let diff = TextDiff::from_lines(original, normalized);
    let path_str = path.display().to_string();

    let mut diff_text = String::new();
    let mut additions = 0;
    let mut deletions = 0;
    let mut shown = 0;

    options.paint(&mut diff_text, BOLD, &format!("--- a/{path_str}"));
    diff_text.push('\n');
    options.paint(&mut diff_text, BOLD, &format!("+++ b/{path_str}"));
    diff_text.push('\n');

    'hunks: for hunk in diff
        .unified_diff()
        .context_radius(options.context_lines)
        .iter_hunks()
    {
        options.paint(&mut diff_text, CYAN, &hunk.header().to_string());

        for change in hunk.iter_changes() {
            if options.max_lines_per_file > 0 && shown >= options.max_lines_per_file {
                diff_text.push_str("\n... (diff truncated)\n");
                break 'hunks;
            }

            let line = change.to_string_lossy();
            let (sign, color) = match change.tag() {
                ChangeTag::Delete => {
                    deletions += 1;
                    ("-", RED)
                }
                ChangeTag::Insert => {
                    additions += 1;
                    ("+", GREEN)
                }
                ChangeTag::Equal => (" ", ""),
            };

            if color.is_empty() {
                diff_text.push_str(&format!("{sign}{line}"));
            } else {
                options.paint(&mut diff_text, color, &format!("{sign}{line}"));
            }
            if !line.ends_with('\n') {
                diff_text.push('\n');
            }
            shown += 1;
        }
    }

    FileDiff {
        path: path_str,
        diff_text,
        additions,
        deletions,
    }
}
