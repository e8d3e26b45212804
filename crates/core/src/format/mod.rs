//! Formatting pipeline applied to every normalized file before it is
//! persisted.

pub mod indent;
pub mod markup;
pub mod typescript;

pub use markup::format_markup;
pub use typescript::format_typescript;

/// Strip trailing whitespace, drop leading blank lines, collapse runs of
/// blank lines and end the text with exactly one newline.
pub(crate) fn tidy_lines(source: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for raw in source.split('\n') {
        let line = raw.trim_end();
        if line.is_empty() {
            if !previous_blank {
                lines.push("");
            }
            previous_blank = true;
        } else {
            lines.push(line);
            previous_blank = false;
        }
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return String::new();
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
