//! Re-indentation of TypeScript text from its syntax tree.
//!
//! A line sits one level deeper than the line holding the opener of the
//! innermost bracket pair around it, plus one more when it continues a
//! statement begun on an earlier line. A line starting with a closing bracket
//! takes the level of the line holding the matching opener. Lines starting
//! inside a template literal are kept verbatim.

use std::ops::Range;

use ast_grep_language::SupportLang;
use tso_models::{FormatOptions, NormalizeResult};

use crate::tree::{self, SgNode, SgRoot};

const OPENERS: [&str; 3] = ["{", "(", "["];
const CLOSERS: [&str; 3] = ["}", ")", "]"];

/// Nodes from `root` down to the deepest one containing `offset`.
fn path_at<'r>(root: &SgNode<'r>, offset: usize) -> Vec<SgNode<'r>> {
    let mut path = vec![root.clone()];
    loop {
        let next = path[path.len() - 1].children().find(|child| {
            let range = child.range();
            range.start <= offset && offset < range.end
        });
        match next {
            Some(child) => path.push(child),
            None => return path,
        }
    }
}

/// Opener and closer ranges of a bracket-delimited node.
fn brackets(node: &SgNode<'_>) -> Option<(Range<usize>, Range<usize>)> {
    let children: Vec<SgNode<'_>> = node.children().collect();
    if children.len() < 2 {
        return None;
    }
    let (first, last) = (&children[0], &children[children.len() - 1]);
    if OPENERS.contains(&first.kind().as_ref()) && CLOSERS.contains(&last.kind().as_ref()) {
        Some((first.range(), last.range()))
    } else {
        None
    }
}

/// Outermost node of `kind` that contains `offset` but does not start there.
fn enclosing<'r>(root: &SgNode<'r>, kind: &str, offset: usize) -> Option<SgNode<'r>> {
    path_at(root, offset)
        .into_iter()
        .find(|node| node.kind() == kind && node.range().start < offset)
}

struct Lines {
    starts: Vec<usize>,
    levels: Vec<usize>,
}

impl Lines {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(index, _)| index + 1));
        let levels = vec![0; starts.len()];
        Self { starts, levels }
    }

    fn level_at(&self, offset: usize) -> usize {
        let line = self.starts.partition_point(|start| *start <= offset) - 1;
        self.levels[line]
    }

    /// Level of the line whose first token sits at `token`.
    fn code_level(&self, root: &SgNode<'_>, token: usize, line_start: usize) -> usize {
        let path = path_at(root, token);

        if path.len() >= 2 && CLOSERS.contains(&path[path.len() - 1].kind().as_ref()) {
            if let Some((open, close)) = brackets(&path[path.len() - 2]) {
                if close.start == token {
                    return self.level_at(open.start);
                }
            }
        }

        let mut base = 0;
        let mut below = 1;
        for (index, node) in path.iter().enumerate().rev() {
            if let Some((open, close)) = brackets(node) {
                if open.end <= token && token < close.start {
                    base = self.level_at(open.start) + 1;
                    below = index + 1;
                    break;
                }
            }
        }

        // Decorators and comments on earlier lines do not make a continuation
        let continued = path.iter().skip(below).any(|node| {
            node.children().any(|child| {
                child.range().end <= line_start
                    && !matches!(child.kind().as_ref(), "decorator" | "comment")
            })
        });
        base + usize::from(continued)
    }
}

/// Re-indent `source`, strip trailing whitespace, collapse blank-line runs
/// and end the text with a single newline.
pub fn reindent(source: &str, options: &FormatOptions) -> NormalizeResult<String> {
    let grep: SgRoot = tree::parse(source, SupportLang::TypeScript)?;
    let root = grep.root();
    let unit = options.indent_unit();

    let mut lines = Lines::new(source);
    let mut out: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for (index, raw) in source.split('\n').enumerate() {
        let start = lines.starts[index];
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(template) = enclosing(&root, "template_string", start) {
            let level = lines.level_at(template.range().start);
            lines.levels[index] = level;
            out.push(line.to_string());
            previous_blank = false;
            continue;
        }

        if let Some(comment) = enclosing(&root, "comment", start) {
            let level = lines.level_at(comment.range().start);
            lines.levels[index] = level;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                out.push(String::new());
            } else {
                let pad = if trimmed.starts_with('*') { " " } else { "" };
                out.push(format!("{}{pad}{trimmed}", unit.repeat(level)));
            }
            previous_blank = false;
            continue;
        }

        let trimmed = line.trim_start();
        if trimmed.trim_end().is_empty() {
            if !previous_blank {
                out.push(String::new());
            }
            previous_blank = true;
            continue;
        }

        let token = start + (line.len() - trimmed.len());
        let level = lines.code_level(&root, token, start);
        lines.levels[index] = level;

        let line_end = start + line.len();
        let body = if enclosing(&root, "template_string", line_end).is_some() {
            trimmed
        } else {
            trimmed.trim_end()
        };
        out.push(format!("{}{body}", unit.repeat(level)));
        previous_blank = false;
    }

    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }
    if out.is_empty() {
        return Ok(String::new());
    }

    let mut text = out.join("\n");
    text.push('\n');
    Ok(text)
}
