//! Markup pretty-printing: start tag layout and whitespace cleanup.
//!
//! Text content is never re-flowed; only start tags are laid out again.

use ast_grep_language::SupportLang;
use tso_models::{FormatOptions, NormalizeResult};

use super::tidy_lines;
use crate::tree::{self, column, line_indent, SgNode};

pub(crate) fn is_start_tag(node: &SgNode<'_>) -> bool {
    let kind = node.kind();
    kind == "start_tag" || kind == "self_closing_tag"
}

pub(crate) fn tag_name(tag: &SgNode<'_>) -> Option<String> {
    tag.children()
        .find(|child| child.kind() == "tag_name")
        .map(|name| name.text().to_string())
}

/// Lay out a start tag that follows `preceding`, the output produced so far.
///
/// The tag goes on one line when it fits `print_width`; otherwise every
/// attribute gets its own line one level deeper than the tag's line.
pub(crate) fn layout_tag(
    name: &str,
    attributes: &[String],
    self_closing: bool,
    preceding: &str,
    options: &FormatOptions,
) -> String {
    let close = if self_closing { " />" } else { ">" };
    if attributes.is_empty() {
        return format!("<{name}{close}");
    }

    let offset = preceding.len();
    let single = format!("<{name} {}{close}", attributes.join(" "));
    let width = column(preceding, offset) + single.chars().count();
    if width <= options.print_width && !single.contains('\n') {
        return single;
    }

    let indent = line_indent(preceding, offset);
    let inner = format!("{indent}{}", options.indent_unit());
    let mut out = format!("<{name}");
    for attribute in attributes {
        out.push('\n');
        out.push_str(&inner);
        out.push_str(attribute);
    }
    out.push('\n');
    out.push_str(indent);
    out.push_str(if self_closing { "/>" } else { ">" });
    out
}

/// Rebuild `source` with start tags laid out again, front to back.
///
/// Each tag is measured against the text already produced, so a tag that
/// breaks moves the columns of the tags after it on the same line.
/// `attributes` yields a tag's attributes in output order, or `None` to keep
/// the tag as written. Tags overlapping a syntax error are always kept.
pub(crate) fn relayout_tags<'r>(
    root: &SgNode<'r>,
    source: &str,
    options: &FormatOptions,
    mut attributes: impl FnMut(&SgNode<'r>) -> Option<Vec<String>>,
) -> String {
    let errors = tree::error_ranges(root);
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;

    for tag in root.dfs().filter(is_start_tag) {
        let range = tag.range();
        if range.start < cursor || tree::overlaps_any(&range, &errors) {
            continue;
        }
        let Some(name) = tag_name(&tag) else {
            continue;
        };
        let Some(ordered) = attributes(&tag) else {
            continue;
        };

        out.push_str(&source[cursor..range.start]);
        let rendered = layout_tag(
            &name,
            &ordered,
            tag.kind() == "self_closing_tag",
            &out,
            options,
        );
        out.push_str(&rendered);
        cursor = range.end;
    }

    out.push_str(&source[cursor..]);
    out
}

fn attribute_texts(tag: &SgNode<'_>) -> Vec<String> {
    tag.children()
        .filter(|child| child.kind() == "attribute")
        .map(|attribute| attribute.text().to_string())
        .collect()
}

/// Pretty-print a markup document. Regions the parser had to recover from
/// are left as written.
pub fn format_markup(source: &str, options: &FormatOptions) -> NormalizeResult<String> {
    let grep = tree::parse_recovering(source, SupportLang::Html);
    let root = grep.root();

    let laid_out = relayout_tags(&root, source, options, |tag| Some(attribute_texts(tag)));
    Ok(tidy_lines(&laid_out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(source: &str) -> String {
        format_markup(source, &FormatOptions::default()).unwrap()
    }

    #[test]
    fn test_short_tag_unchanged() {
        let source = "<div id=\"a\" class=\"b\"></div>\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_self_closing_spacing() {
        assert_eq!(format("<br/>\n<img src=\"a.png\"/>\n"), "<br />\n<img src=\"a.png\" />\n");
    }

    #[test]
    fn test_long_tag_is_broken() {
        let source = "<div>\n  <input class=\"form-control input-lg\" type=\"text\" placeholder=\"Search for something\">\n</div>\n";
        assert_eq!(
            format(source),
            "<div>\n  <input\n    class=\"form-control input-lg\"\n    type=\"text\"\n    placeholder=\"Search for something\"\n  >\n</div>\n"
        );
    }

    #[test]
    fn test_broken_tag_that_fits_is_joined() {
        assert_eq!(
            format("<div\n  id=\"a\"\n>\n</div>\n"),
            "<div id=\"a\">\n</div>\n"
        );
    }

    #[test]
    fn test_tags_after_a_broken_tag_are_measured_where_they_land() {
        let source = "<div><span class=\"cccccccccccccccccccc\" title=\"tttttttttttttttttttt\" id=\"iiiiiiiiii\">x</span><b title=\"tttttttttt\" id=\"iiiiiiiiii\">y</b><i title=\"uuuuuuuuuu\" id=\"jjjjjjjjjj\">z</i></div>\n";
        let once = format(source);
        assert_eq!(
            once,
            "<div><span\n  class=\"cccccccccccccccccccc\"\n  title=\"tttttttttttttttttttt\"\n  id=\"iiiiiiiiii\"\n>x</span><b title=\"tttttttttt\" id=\"iiiiiiiiii\">y</b><i\n  title=\"uuuuuuuuuu\"\n  id=\"jjjjjjjjjj\"\n>z</i></div>\n"
        );
        assert_eq!(format(&once), once);
    }

    #[test]
    fn test_recovered_regions_are_kept() {
        let options = FormatOptions::default();
        assert!(format_markup("<span>{{ a < b ? 'x' : 'y' }}</span>\n", &options).is_ok());
        assert!(format_markup("<p>unclosed\n<li>one\n<li>two", &options).is_ok());
    }

    #[test]
    fn test_format_is_idempotent() {
        let once = format("<p>\n  <a href=\"https://example.com/a/very/long/path\" title=\"Example title\" class=\"link\">x</a>   \n</p>\n\n\n");
        assert_eq!(format(&once), once);
    }
}
