use tso_models::{NormalizeError, NormalizeResult};

use crate::tree::SgNode;

const CLASS_KINDS: [&str; 2] = ["class_declaration", "abstract_class_declaration"];

/// The one top-level class of a file, with the decorators written above it.
pub(crate) struct ClassShape<'r> {
    pub class: SgNode<'r>,
    /// Decorators in source order, whether attached to the `export`
    /// statement or to the class itself
    pub decorators: Vec<SgNode<'r>>,
}

fn decorators_of<'a, 'r>(node: &'a SgNode<'r>) -> impl Iterator<Item = SgNode<'r>> + 'a {
    node.children().filter(|child| child.kind() == "decorator")
}

/// Locate the single top-level class declaration of `root`.
pub(crate) fn single_class<'r>(root: &SgNode<'r>) -> NormalizeResult<ClassShape<'r>> {
    let mut found: Vec<ClassShape<'r>> = Vec::new();

    for statement in root.children() {
        let kind = statement.kind();
        if CLASS_KINDS.contains(&kind.as_ref()) {
            let decorators = decorators_of(&statement).collect();
            found.push(ClassShape {
                class: statement,
                decorators,
            });
        } else if kind == "export_statement" {
            let class = statement
                .children()
                .find(|child| CLASS_KINDS.contains(&child.kind().as_ref()));
            if let Some(class) = class {
                let decorators = decorators_of(&statement)
                    .chain(decorators_of(&class))
                    .collect();
                found.push(ClassShape { class, decorators });
            }
        }
    }

    match found.len() {
        0 => Err(NormalizeError::shape("no class declaration found")),
        1 => Ok(found.remove(0)),
        count => Err(NormalizeError::shape(format!(
            "expected exactly one class declaration, found {count}"
        ))),
    }
}
