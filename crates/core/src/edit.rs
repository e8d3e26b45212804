use crate::tree::SgNode;

/// Replacement of a byte range of the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub start_pos: usize,
    pub end_pos: usize,
    pub inserted_text: String,
}

impl Edit {
    /// Replace the whole text of `node`.
    pub fn replace(node: &SgNode<'_>, text: impl Into<String>) -> Self {
        let range = node.range();
        Self {
            start_pos: range.start,
            end_pos: range.end,
            inserted_text: text.into(),
        }
    }

    pub fn replace_range(start_pos: usize, end_pos: usize, text: impl Into<String>) -> Self {
        Self {
            start_pos,
            end_pos,
            inserted_text: text.into(),
        }
    }
}

/// Apply `edits` to `source` in one pass.
///
/// Edits are applied in start order; an edit overlapping an earlier one is
/// skipped.
pub fn commit_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.start_pos);

    let mut new_content = String::with_capacity(source.len());
    let mut start = 0;

    for edit in edits {
        if start > edit.start_pos {
            continue;
        }
        new_content.push_str(&source[start..edit.start_pos]);
        new_content.push_str(&edit.inserted_text);
        start = edit.end_pos;
    }

    new_content.push_str(&source[start..]);
    new_content
}
