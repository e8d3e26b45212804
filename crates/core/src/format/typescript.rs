//! Fixed-style layout for TypeScript output.

use ast_grep_language::SupportLang;
use tso_models::{FormatOptions, NormalizeResult};

use super::indent::reindent;
use crate::edit::{commit_edits, Edit};
use crate::tree::{self, line_indent, SgNode, Segment, SgRoot};

/// Upper bound on array-breaking passes; each pass breaks the outermost
/// arrays still on one line, so this is the maximum nesting handled.
const MAX_BREAK_PASSES: usize = 32;

/// Run the full TypeScript formatting pipeline over `source`.
pub fn format_typescript(source: &str, options: &FormatOptions) -> NormalizeResult<String> {
    let mut current = source.to_string();
    for _ in 0..MAX_BREAK_PASSES {
        match break_arrays_pass(&current, options)? {
            Some(next) => current = next,
            None => break,
        }
    }

    let quoted = normalize_quotes(&current, options)?;
    reindent(&quoted, options)
}

/// Lay out an array with `items` in the given order.
///
/// Arrays holding at least `array_break_min_items` elements, or carrying
/// comments, get one element per line; anything else stays inline.
pub(crate) fn render_array(
    array: &SgNode<'_>,
    items: &[&Segment<'_>],
    dangling: &[SgNode<'_>],
    source: &str,
    options: &FormatOptions,
) -> String {
    let has_comments = !dangling.is_empty() || items.iter().any(|item| item.has_comments());

    if items.len() < options.array_break_min_items && !has_comments {
        let elements: Vec<String> = items.iter().map(|item| item.text()).collect();
        return format!("[{}]", elements.join(", "));
    }

    let base = line_indent(source, array.range().start);
    let inner = format!("{base}{}", options.indent_unit());

    let mut out = String::from("[\n");
    for (index, item) in items.iter().enumerate() {
        let is_last = index + 1 == items.len();
        let separator = if !is_last || options.trailing_comma { "," } else { "" };
        out.push_str(&item.render(&item.text(), separator, &inner));
        out.push('\n');
    }
    for comment in dangling {
        out.push_str(&inner);
        out.push_str(&comment.text());
        out.push('\n');
    }
    out.push_str(base);
    out.push(']');
    out
}

/// Whether `array` already has one element per line and the configured
/// trailing comma.
fn is_broken_layout(
    array: &SgNode<'_>,
    items: &[Segment<'_>],
    source: &str,
    options: &FormatOptions,
) -> bool {
    let range = array.range();
    let mut cursor = range.start + 1;
    for item in items {
        if !source[cursor..item.start()].contains('\n') {
            return false;
        }
        cursor = item.end();
    }
    if !source[cursor..range.end - 1].contains('\n') {
        return false;
    }

    let tokens: Vec<SgNode<'_>> = array
        .children()
        .filter(|child| child.kind() != "comment")
        .collect();
    let has_trailing_comma = tokens.len() >= 2 && tokens[tokens.len() - 2].kind() == ",";
    has_trailing_comma == options.trailing_comma
}

/// Break the outermost arrays that should be multi-line but are not.
/// Returns `None` once nothing is left to break.
fn break_arrays_pass(source: &str, options: &FormatOptions) -> NormalizeResult<Option<String>> {
    let grep: SgRoot = tree::parse(source, SupportLang::TypeScript)?;
    let root = grep.root();

    let mut edits = Vec::new();
    let mut covered_until = 0;

    for array in root.dfs().filter(|node| node.kind() == "array") {
        let range = array.range();
        if range.start < covered_until {
            continue;
        }

        let segments = tree::segment_children(&array, source, &[]);
        if segments.items.len() < options.array_break_min_items {
            continue;
        }
        if is_broken_layout(&array, &segments.items, source, options) {
            continue;
        }

        let items: Vec<&Segment<'_>> = segments.items.iter().collect();
        let rendered = render_array(&array, &items, &segments.dangling, source, options);
        edits.push(Edit::replace(&array, rendered));
        covered_until = range.end;
    }

    if edits.is_empty() {
        Ok(None)
    } else {
        Ok(Some(commit_edits(source, edits)))
    }
}

/// Rewrite double-quoted strings that contain no single quote.
fn normalize_quotes(source: &str, options: &FormatOptions) -> NormalizeResult<String> {
    if !options.single_quote {
        return Ok(source.to_string());
    }

    let grep: SgRoot = tree::parse(source, SupportLang::TypeScript)?;
    let root = grep.root();

    let edits: Vec<Edit> = root
        .dfs()
        .filter(|node| node.kind() == "string")
        .filter_map(|node| {
            let text = node.text();
            let inner = text.strip_prefix('"')?.strip_suffix('"')?;
            if inner.contains('\'') {
                return None;
            }
            Some(Edit::replace(&node, format!("'{}'", inner.replace("\\\"", "\""))))
        })
        .collect();

    Ok(commit_edits(source, edits))
}
