//! Read-only access to parsed sources.
//!
//! Normalizers never mutate the tree. They walk it, group the children they
//! care about into [`Segment`]s, compute the new order and hand back
//! [`Edit`](crate::edit::Edit)s that are committed onto the source text.

use std::ops::Range;

use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_core::{AstGrep, Node};
use ast_grep_language::SupportLang;
use tso_models::{NormalizeError, NormalizeResult};

pub type SgDoc = StrDoc<SupportLang>;
pub type SgNode<'r> = Node<'r, SgDoc>;
pub type SgRoot = AstGrep<SgDoc>;

/// Parse `source`, rejecting trees that contain syntax errors.
pub fn parse(source: &str, language: SupportLang) -> NormalizeResult<SgRoot> {
    let grep = AstGrep::new(source, language);

    let error_at = grep
        .root()
        .dfs()
        .find(|node| node.kind() == "ERROR")
        .map(|node| node.range().start);

    match error_at {
        Some(offset) => Err(syntax_error(source, language, offset)),
        None => Ok(grep),
    }
}

/// Parse `source`, keeping whatever tree the parser recovered. Callers look
/// up [`error_ranges`] and leave those regions alone.
pub fn parse_recovering(source: &str, language: SupportLang) -> SgRoot {
    AstGrep::new(source, language)
}

pub fn syntax_error(source: &str, language: SupportLang, offset: usize) -> NormalizeError {
    let (line, column) = line_and_column(source, offset);
    NormalizeError::ParseError {
        language: language.to_string(),
        message: format!("syntax error at {line}:{column}"),
    }
}

/// Byte ranges of the outermost `ERROR` nodes under `root`.
pub fn error_ranges(root: &SgNode<'_>) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for node in root.dfs().filter(|node| node.kind() == "ERROR") {
        let range = node.range();
        if ranges.last().is_some_and(|last| range.end <= last.end) {
            continue;
        }
        ranges.push(range);
    }
    ranges
}

pub fn overlaps_any(range: &Range<usize>, others: &[Range<usize>]) -> bool {
    others
        .iter()
        .any(|other| range.start < other.end && other.start < range.end)
}

/// A child node together with the comments that travel with it.
///
/// Comments on their own lines before the node are `leading`; comments that
/// start on the line where the node ends are `trailing`.
pub struct Segment<'r> {
    pub node: SgNode<'r>,
    pub leading: Vec<SgNode<'r>>,
    pub trailing: Vec<SgNode<'r>>,
    /// Statement terminator (`;` or `,`) directly following the node
    pub terminator: Option<SgNode<'r>>,
}

impl<'r> Segment<'r> {
    fn new(node: SgNode<'r>, leading: Vec<SgNode<'r>>) -> Self {
        Self {
            node,
            leading,
            trailing: Vec::new(),
            terminator: None,
        }
    }

    pub fn start(&self) -> usize {
        self.leading
            .first()
            .map_or(self.node.range().start, |comment| comment.range().start)
    }

    pub fn end(&self) -> usize {
        if let Some(comment) = self.trailing.last() {
            return comment.range().end;
        }
        self.terminator
            .as_ref()
            .map_or(self.node.range().end, |token| token.range().end)
    }

    pub fn text(&self) -> String {
        self.node.text().to_string()
    }

    pub fn has_comments(&self) -> bool {
        !self.leading.is_empty() || !self.trailing.is_empty()
    }

    /// Lay the segment out starting at `indent`, with `core` in place of the
    /// node text and `separator` between the node and its trailing comments.
    pub fn render(&self, core: &str, separator: &str, indent: &str) -> String {
        let mut out = String::new();
        for comment in &self.leading {
            out.push_str(indent);
            out.push_str(&comment.text());
            out.push('\n');
        }
        out.push_str(indent);
        out.push_str(core);
        out.push_str(separator);
        for comment in &self.trailing {
            out.push(' ');
            out.push_str(&comment.text());
        }
        out
    }
}

pub struct Segments<'r> {
    pub items: Vec<Segment<'r>>,
    /// Comments after the last item, before the closing delimiter
    pub dangling: Vec<SgNode<'r>>,
}

impl Segments<'_> {
    pub fn has_comments(&self) -> bool {
        !self.dangling.is_empty() || self.items.iter().any(Segment::has_comments)
    }
}

/// Group the named children of `parent` into segments.
///
/// Anonymous tokens listed in `terminators` are attached to the preceding
/// item; every other anonymous token (brackets, separators) is dropped.
pub fn segment_children<'r>(parent: &SgNode<'r>, source: &str, terminators: &[&str]) -> Segments<'r> {
    let mut items: Vec<Segment<'r>> = Vec::new();
    let mut pending: Vec<SgNode<'r>> = Vec::new();

    for child in parent.children() {
        if child.kind() == "comment" {
            if pending.is_empty() {
                if let Some(previous) = items.last_mut() {
                    let start = child.range().start;
                    if !source[previous.end()..start].contains('\n') {
                        previous.trailing.push(child);
                        continue;
                    }
                }
            }
            pending.push(child);
        } else if child.is_named() {
            items.push(Segment::new(child, std::mem::take(&mut pending)));
        } else if terminators.iter().any(|token| child.kind() == *token) {
            if let Some(previous) = items.last_mut() {
                if previous.terminator.is_none() && previous.trailing.is_empty() && pending.is_empty() {
                    previous.terminator = Some(child);
                }
            }
        }
    }

    Segments {
        items,
        dangling: pending,
    }
}

pub fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |index| index + 1)
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(source: &str, offset: usize) -> &str {
    let start = line_start(source, offset);
    let line = &source[start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Column of `offset` within its line, counted in characters.
pub fn column(source: &str, offset: usize) -> usize {
    source[line_start(source, offset)..offset].chars().count()
}

/// 1-based line and column of `offset`.
pub fn line_and_column(source: &str, offset: usize) -> (usize, usize) {
    let line = source[..offset].matches('\n').count() + 1;
    (line, column(source, offset) + 1)
}
