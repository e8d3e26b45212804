//! Field and constructor ordering for data-transfer classes (`*.dto.ts`).
//!
//! The class body is rebuilt as: sorted fields, a blank line, the
//! constructor with its statements sorted, then any remaining members in
//! their original order.

use ast_grep_language::SupportLang;
use log::debug;
use tso_models::{
    field_order, length_then_lexicographic, FieldSignature, FormatOptions, NormalizeError,
    NormalizeResult,
};

use super::class::single_class;
use crate::edit::{commit_edits, Edit};
use crate::tree::{self, line_indent, Segment, SgNode};

/// A class member with the member decorators written above it.
struct Member<'a, 'r> {
    decorators: Vec<&'a Segment<'r>>,
    segment: &'a Segment<'r>,
}

impl Member<'_, '_> {
    fn render(&self, core: &str, separator: &str, indent: &str, source: &str) -> String {
        let rendered = self.segment.render(core, separator, indent);
        match self.decorators.first() {
            Some(first) => {
                let prefix = source[first.start()..self.segment.start()].trim_end();
                format!("{indent}{prefix}\n{rendered}")
            }
            None => rendered,
        }
    }

    /// Member text as written, including its terminator.
    fn render_verbatim(&self, indent: &str, source: &str) -> String {
        let node = &self.segment.node;
        let terminator = self
            .segment
            .terminator
            .as_ref()
            .map(|token| token.text().to_string())
            .unwrap_or_default();
        self.render(&format!("{}{terminator}", node.text()), "", indent, source)
    }
}

fn is_constructor(node: &SgNode<'_>) -> bool {
    node.field("name")
        .is_some_and(|name| name.text() == "constructor")
}

fn field_signature(field: &SgNode<'_>) -> NormalizeResult<FieldSignature> {
    let name = field
        .field("name")
        .ok_or_else(|| NormalizeError::shape("field declaration without a name"))?;
    let type_text = field
        .field("type")
        .map(|annotation| {
            annotation
                .text()
                .trim_start_matches(':')
                .trim()
                .to_string()
        })
        .unwrap_or_default();
    Ok(FieldSignature::new(name.text(), type_text))
}

fn is_super_call(statement: &SgNode<'_>) -> bool {
    statement
        .children()
        .find(|child| child.is_named() && child.kind() != "comment")
        .filter(|expression| expression.kind() == "call_expression")
        .and_then(|call| call.field("function"))
        .is_some_and(|function| function.kind() == "super")
}

/// Sort the top-level statements of a constructor body. A leading
/// `super(...)` call keeps its place.
fn render_constructor_body(
    body: &SgNode<'_>,
    source: &str,
    indent: &str,
    options: &FormatOptions,
) -> NormalizeResult<String> {
    let segments = tree::segment_children(body, source, &[]);
    // Stray `;` has nothing to reorder; its comments are kept at the end
    let (empty, mut statements): (Vec<&Segment<'_>>, Vec<&Segment<'_>>) = segments
        .items
        .iter()
        .partition(|item| item.node.kind() == "empty_statement");
    if let Some(statement) = statements
        .iter()
        .find(|item| item.node.kind() != "expression_statement")
    {
        return Err(NormalizeError::shape(format!(
            "constructor body contains a {} that cannot be reordered",
            statement.node.kind()
        )));
    }

    let comments: Vec<String> = empty
        .iter()
        .flat_map(|item| item.leading.iter().chain(&item.trailing))
        .chain(&segments.dangling)
        .map(|comment| comment.text().to_string())
        .collect();
    if statements.is_empty() && comments.is_empty() {
        return Ok("{}".to_string());
    }

    let pinned = match statements.first() {
        Some(first) if is_super_call(&first.node) => 1,
        _ => 0,
    };
    statements[pinned..].sort_by(|a, b| length_then_lexicographic(&a.text(), &b.text()));

    let inner = format!("{indent}{}", options.indent_unit());
    let mut lines: Vec<String> = statements
        .iter()
        .map(|statement| statement.render(&statement.text(), "", &inner))
        .collect();
    lines.extend(comments.iter().map(|comment| format!("{inner}{comment}")));

    Ok(format!("{{\n{}\n{indent}}}", lines.join("\n")))
}

/// Sort the fields and constructor statements of the single class in
/// `source`.
pub fn normalize_record(source: &str, options: &FormatOptions) -> NormalizeResult<String> {
    let grep = tree::parse(source, SupportLang::TypeScript)?;
    let root = grep.root();
    let shape = single_class(&root)?;
    let body = shape
        .class
        .field("body")
        .ok_or_else(|| NormalizeError::shape("class has no body"))?;

    let class_indent = line_indent(source, shape.class.range().start);
    let indent = format!("{class_indent}{}", options.indent_unit());

    let segments = tree::segment_children(&body, source, &[";", ","]);

    let mut fields: Vec<(FieldSignature, Member<'_, '_>)> = Vec::new();
    let mut constructor: Option<Member<'_, '_>> = None;
    let mut overloads: Vec<Member<'_, '_>> = Vec::new();
    let mut others: Vec<Member<'_, '_>> = Vec::new();
    let mut decorators = Vec::new();

    for segment in &segments.items {
        let node = &segment.node;
        if node.kind() == "decorator" {
            decorators.push(segment);
            continue;
        }

        let member = Member {
            decorators: std::mem::take(&mut decorators),
            segment,
        };
        match node.kind().as_ref() {
            "public_field_definition" => fields.push((field_signature(node)?, member)),
            "method_definition" if is_constructor(node) => {
                if constructor.is_some() {
                    return Err(NormalizeError::shape("class has more than one constructor"));
                }
                constructor = Some(member);
            }
            "method_signature" if is_constructor(node) => overloads.push(member),
            _ => others.push(member),
        }
    }

    let constructor =
        constructor.ok_or_else(|| NormalizeError::shape("class has no constructor"))?;
    let constructor_node = &constructor.segment.node;
    let constructor_body = constructor_node
        .field("body")
        .ok_or_else(|| NormalizeError::shape("constructor has no body"))?;
    let header = &source[constructor_node.range().start..constructor_body.range().start];
    let statements = render_constructor_body(&constructor_body, source, &indent, options)?;

    fields.sort_by(|(a, _), (b, _)| field_order(a, b));
    debug!(
        "Ordered {} fields: {}",
        fields.len(),
        fields
            .iter()
            .map(|(signature, _)| signature.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut blocks: Vec<String> = Vec::new();
    if !fields.is_empty() {
        let lines: Vec<String> = fields
            .iter()
            .map(|(_, member)| member.render(&member.segment.text(), ";", &indent, source))
            .collect();
        blocks.push(lines.join("\n"));
    }

    let mut constructor_lines: Vec<String> = overloads
        .iter()
        .map(|member| member.render_verbatim(&indent, source))
        .collect();
    constructor_lines.push(constructor.render(&format!("{header}{statements}"), "", &indent, source));
    blocks.push(constructor_lines.join("\n"));

    blocks.extend(others.iter().map(|member| member.render_verbatim(&indent, source)));

    let mut rendered = format!("{{\n{}\n", blocks.join("\n\n"));
    let leftovers = segments
        .dangling
        .iter()
        .map(|comment| comment.text().to_string())
        .chain(decorators.iter().map(|segment| segment.text()));
    for text in leftovers {
        rendered.push_str(&indent);
        rendered.push_str(&text);
        rendered.push('\n');
    }
    rendered.push_str(class_indent);
    rendered.push('}');

    if rendered == body.text() {
        return Ok(source.to_string());
    }
    Ok(commit_edits(source, vec![Edit::replace(&body, rendered)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(source: &str) -> NormalizeResult<String> {
        normalize_record(source, &FormatOptions::default())
    }

    #[test]
    fn test_fields_sorted_and_constructor_last() {
        let source = "export class UserDto {\n  constructor(id: number, email: string) {\n    this.email = email;\n    this.id = id;\n  }\n  email: string;\n  id: number;\n}\n";
        assert_eq!(
            normalize(source).unwrap(),
            "export class UserDto {\n  id: number;\n  email: string;\n\n  constructor(id: number, email: string) {\n    this.id = id;\n    this.email = email;\n  }\n}\n"
        );
    }

    #[test]
    fn test_field_ties_broken_by_name() {
        let source = "class A {\n  b: string;\n  a: string;\n  constructor() {}\n}\n";
        assert_eq!(
            normalize(source).unwrap(),
            "class A {\n  a: string;\n  b: string;\n\n  constructor() {}\n}\n"
        );
    }

    #[test]
    fn test_super_call_stays_first() {
        let source = "class A extends B {\n  constructor() {\n    super();\n    this.longer = 1;\n    this.a = 1;\n  }\n}\n";
        assert_eq!(
            normalize(source).unwrap(),
            "class A extends B {\n  constructor() {\n    super();\n    this.a = 1;\n    this.longer = 1;\n  }\n}\n"
        );
    }

    #[test]
    fn test_stray_semicolons_are_dropped() {
        let source = "class A {\n  constructor() {\n    this.bb = 2;;\n    this.a = 1;\n  }\n}\n";
        assert_eq!(
            normalize(source).unwrap(),
            "class A {\n  constructor() {\n    this.a = 1;\n    this.bb = 2;\n  }\n}\n"
        );
        assert_eq!(
            normalize("class A {\n  constructor() {\n    ;\n  }\n}\n").unwrap(),
            "class A {\n  constructor() {}\n}\n"
        );
    }

    #[test]
    fn test_other_members_follow_constructor() {
        let source = "class A {\n  toString() { return 'a'; }\n  b: number;\n  constructor() {}\n}\n";
        assert_eq!(
            normalize(source).unwrap(),
            "class A {\n  b: number;\n\n  constructor() {}\n\n  toString() { return 'a'; }\n}\n"
        );
    }

    #[test]
    fn test_field_comments_and_decorators_travel() {
        let source = "class A {\n  // the mail\n  @IsEmail()\n  email: string;\n  id: number; // key\n  constructor() {}\n}\n";
        assert_eq!(
            normalize(source).unwrap(),
            "class A {\n  id: number; // key\n  // the mail\n  @IsEmail()\n  email: string;\n\n  constructor() {}\n}\n"
        );
    }

    #[test]
    fn test_normalized_record_is_unchanged() {
        let source = "class A {\n  id: number;\n\n  constructor() {\n    this.id = 1;\n  }\n}\n";
        assert_eq!(normalize(source).unwrap(), source);
    }

    #[test]
    fn test_shape_mismatches() {
        for source in [
            "class A {\n  a: string;\n}\n",
            "const a = 1;\n",
            "class A {\n  constructor() {\n    if (x) {\n      y();\n    }\n  }\n}\n",
            "class A {\n  constructor() {}\n}\nclass B {\n  constructor() {}\n}\n",
        ] {
            assert!(
                matches!(normalize(source), Err(NormalizeError::ShapeMismatch { .. })),
                "expected shape mismatch for {source:?}"
            );
        }
    }
}
