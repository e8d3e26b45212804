//! Attribute ordering for markup tags.

use ast_grep_language::SupportLang;
use tso_models::{FormatOptions, NormalizeResult, PriorityTable};

use crate::format::markup::{is_start_tag, relayout_tags};
use crate::tree::{self, SgNode};

fn attribute_name(attribute: &SgNode<'_>) -> String {
    attribute
        .children()
        .find(|child| child.kind() == "attribute_name")
        .map_or_else(|| attribute.text().to_string(), |name| name.text().to_string())
}

/// Attributes of `node` in priority order, or `None` when they already are.
/// Attributes that land in the same bucket keep their relative order.
fn reordered(node: &SgNode<'_>, table: &PriorityTable) -> Option<Vec<String>> {
    let mut attributes: Vec<(usize, String)> = node
        .children()
        .filter(|child| child.kind() == "attribute")
        .map(|attribute| (table.classify(&attribute_name(&attribute)), attribute.text().to_string()))
        .collect();
    if attributes.windows(2).all(|pair| pair[0].0 <= pair[1].0) {
        return None;
    }

    attributes.sort_by_key(|(bucket, _)| *bucket);
    Some(attributes.into_iter().map(|(_, text)| text).collect())
}

/// Reorder the attributes of every tag in `source` by `table`.
///
/// Text the parser could not make sense of, such as `<` inside an
/// interpolation, is left as written. Attributes that would move inside such
/// a region are a parse error.
pub fn normalize_markup(
    source: &str,
    table: &PriorityTable,
    options: &FormatOptions,
) -> NormalizeResult<String> {
    let grep = tree::parse_recovering(source, SupportLang::Html);
    let root = grep.root();

    let errors = tree::error_ranges(&root);
    if !errors.is_empty() {
        let unsafe_tag = root
            .dfs()
            .filter(|node| node.kind() == "ERROR" || is_start_tag(node))
            .filter(|node| tree::overlaps_any(&node.range(), &errors))
            .find(|node| reordered(node, table).is_some());
        if let Some(node) = unsafe_tag {
            return Err(tree::syntax_error(source, SupportLang::Html, node.range().start));
        }
    }

    Ok(relayout_tags(&root, source, options, |tag| reordered(tag, table)))
}

#[cfg(test)]
mod tests {
    use tso_models::NormalizeError;

    use super::*;

    fn normalize(source: &str) -> String {
        normalize_markup(source, &PriorityTable::standard(), &FormatOptions::default()).unwrap()
    }

    #[test]
    fn test_orders_by_priority_table() {
        assert_eq!(
            normalize("<div aria-label=\"x\" data-id=\"1\" id=\"main\"></div>\n"),
            "<div id=\"main\" data-id=\"1\" aria-label=\"x\"></div>\n"
        );
    }

    #[test]
    fn test_fallback_keeps_relative_order() {
        assert_eq!(
            normalize("<p zeta=\"1\" class=\"c\" alpha=\"2\" id=\"i\"></p>\n"),
            "<p id=\"i\" class=\"c\" zeta=\"1\" alpha=\"2\"></p>\n"
        );
    }

    #[test]
    fn test_binding_syntax() {
        assert_eq!(
            normalize("<input [(ngModel)]=\"v\" (change)=\"c()\" [disabled]=\"d\" #box *ngIf=\"s\" />\n"),
            "<input *ngIf=\"s\" #box (change)=\"c()\" [disabled]=\"d\" [(ngModel)]=\"v\" />\n"
        );
    }

    #[test]
    fn test_sorted_tags_untouched() {
        let source = "<a  id=\"x\"   href=\"#\">link</a>\n<br/>\n";
        assert_eq!(normalize(source), source);
    }

    #[test]
    fn test_recovered_regions_are_left_alone() {
        for source in [
            "<span>{{ a < b ? 'x' : 'y' }}</span>\n",
            "<p>unclosed\n<li>one\n<li>two",
        ] {
            assert_eq!(normalize(source), source);
        }
    }

    #[test]
    fn test_reordering_inside_a_syntax_error_is_refused() {
        let result = normalize_markup(
            "<div title=\"a\" id=\"b\" \"stray\"></div>\n",
            &PriorityTable::standard(),
            &FormatOptions::default(),
        );
        assert!(matches!(
            result,
            Err(NormalizeError::ParseError { ref language, .. }) if language == "Html"
        ));
    }

    #[test]
    fn test_attribute_set_is_preserved() {
        let source = "<img alt=\"a\" src=\"s\" title=\"t\" data-x=\"1\" role=\"img\" class=\"c\">\n";
        let output = normalize(source);
        for attribute in ["alt=\"a\"", "src=\"s\"", "title=\"t\"", "data-x=\"1\"", "role=\"img\"", "class=\"c\""] {
            assert_eq!(output.matches(attribute).count(), 1, "{attribute}");
        }
    }
}
