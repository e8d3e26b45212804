//! Sorting of the dependency arrays in a class decorator's configuration
//! object, as found in `*.module.ts` files.

use ast_grep_language::SupportLang;
use log::debug;
use tso_models::{length_then_lexicographic, FormatOptions, NormalizeError, NormalizeResult};

use super::class::single_class;
use crate::edit::{commit_edits, Edit};
use crate::format::typescript::render_array;
use crate::tree::{self, Segment, SgNode};

/// The object literal passed as first argument to `decorator`.
fn configuration_object<'r>(decorator: &SgNode<'r>) -> NormalizeResult<SgNode<'r>> {
    let call = decorator
        .children()
        .find(|child| child.kind() == "call_expression")
        .ok_or_else(|| NormalizeError::shape("class decorator is not a call"))?;

    let first_argument = call
        .field("arguments")
        .and_then(|arguments| {
            arguments
                .children()
                .find(|child| child.is_named() && child.kind() != "comment")
        })
        .ok_or_else(|| NormalizeError::shape("class decorator has no arguments"))?;

    if first_argument.kind() != "object" {
        return Err(NormalizeError::shape(
            "class decorator argument is not an object literal",
        ));
    }
    Ok(first_argument)
}

/// Identifiers first, sorted, then every other element in its original
/// relative order.
fn sorted_elements<'a, 'r>(items: &'a [Segment<'r>]) -> Vec<&'a Segment<'r>> {
    let (mut identifiers, others): (Vec<&Segment<'r>>, Vec<&Segment<'r>>) = items
        .iter()
        .partition(|item| item.node.kind() == "identifier");

    identifiers.sort_by(|a, b| length_then_lexicographic(&a.text(), &b.text()));
    identifiers.extend(others);
    identifiers
}

/// Sort the identifiers of every array-valued property of the class
/// decorator's configuration object.
pub fn normalize_module(source: &str, options: &FormatOptions) -> NormalizeResult<String> {
    let grep = tree::parse(source, SupportLang::TypeScript)?;
    let root = grep.root();
    let shape = single_class(&root)?;

    let decorator = shape
        .decorators
        .first()
        .ok_or_else(|| NormalizeError::shape("class has no decorator"))?;
    let object = configuration_object(decorator)?;

    let mut edits = Vec::new();
    for pair in object.children().filter(|child| child.kind() == "pair") {
        let Some(array) = pair.field("value").filter(|value| value.kind() == "array") else {
            continue;
        };

        let segments = tree::segment_children(&array, source, &[]);
        let ordered = sorted_elements(&segments.items);
        let rendered = render_array(&array, &ordered, &segments.dangling, source, options);
        if rendered != array.text() {
            if let Some(key) = pair.field("key") {
                debug!("Reordered decorator property '{}'", key.text());
            }
            edits.push(Edit::replace(&array, rendered));
        }
    }

    Ok(commit_edits(source, edits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(source: &str) -> NormalizeResult<String> {
        normalize_module(source, &FormatOptions::default())
    }

    #[test]
    fn test_sorts_identifiers_by_length_then_name() {
        let output = normalize("@NgModule({ declarations: [Charlie, Al, Bob] })\nexport class M {}\n").unwrap();
        assert_eq!(
            output,
            "@NgModule({ declarations: [\n  Al,\n  Bob,\n  Charlie,\n] })\nexport class M {}\n"
        );
    }

    #[test]
    fn test_equal_length_ties_ignore_case() {
        let output = normalize("@NgModule({ imports: [Zed, abc] })\nclass M {}\n").unwrap();
        assert_eq!(output, "@NgModule({ imports: [\n  abc,\n  Zed,\n] })\nclass M {}\n");
    }

    #[test]
    fn test_other_elements_follow_identifiers() {
        let output = normalize(
            "@NgModule({ imports: [RouterModule.forRoot(routes), Zeta, HttpModule.x(), Ab] })\nclass M {}\n",
        )
        .unwrap();
        assert_eq!(
            output,
            "@NgModule({ imports: [\n  Ab,\n  Zeta,\n  RouterModule.forRoot(routes),\n  HttpModule.x(),\n] })\nclass M {}\n"
        );
    }

    #[test]
    fn test_every_array_property_is_sorted() {
        let output = normalize("@Mod({ a: [Bb, A], b: [Ccc, Dd], c: 'x' })\nclass M {}\n").unwrap();
        assert!(output.contains("a: [\n  A,\n  Bb,\n]"));
        assert!(output.contains("b: [\n  Dd,\n  Ccc,\n]"));
        assert!(output.contains("c: 'x'"));
    }

    #[test]
    fn test_comments_travel_with_elements() {
        let output = normalize("@Mod({ a: [\n  // the big one\n  Charlie,\n  Al,\n] })\nclass M {}\n").unwrap();
        assert_eq!(
            output,
            "@Mod({ a: [\n  Al,\n  // the big one\n  Charlie,\n] })\nclass M {}\n"
        );
    }

    #[test]
    fn test_no_array_property_is_a_no_op() {
        let source = "@Mod({ id: 'x' })\nclass M {}\n";
        assert_eq!(normalize(source).unwrap(), source);
    }

    #[test]
    fn test_shape_mismatches() {
        for source in [
            "class M {}\n",
            "@Mod\nclass M {}\n",
            "@Mod('x')\nclass M {}\n",
            "@Mod()\nclass M {}\n",
            "const x = 1;\n",
            "@Mod({})\nclass A {}\n@Mod({})\nclass B {}\n",
        ] {
            assert!(
                matches!(normalize(source), Err(NormalizeError::ShapeMismatch { .. })),
                "expected shape mismatch for {source:?}"
            );
        }
    }
}
