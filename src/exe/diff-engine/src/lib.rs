//! Line-level text diffing behind a small capability trait.
//!
//! The pipeline only ever talks to [`DiffEngine`]; [`LineDiffEngine`] is the
//! production implementation backed by `similar`.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod cleanup;
pub mod html;
mod line_engine;

pub use cleanup::{cleanup_merge, cleanup_semantic};
pub use html::{escape_html, pretty_html};
pub use line_engine::LineDiffEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    Equal,
    Insert,
    Delete,
}

/// One span of a diff sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOperation {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffOperation {
    pub fn new(kind: DiffKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(DiffKind::Equal, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(DiffKind::Insert, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(DiffKind::Delete, text)
    }

    /// Number of line breaks carried by this span.
    pub fn line_count(&self) -> usize {
        self.text.bytes().filter(|b| *b == b'\n').count()
    }
}

/// A diff engine usable from many threads at once.
///
/// Implementations must not keep per-call state: two comparisons running in
/// parallel never observe each other.
pub trait DiffEngine: Send + Sync {
    /// Compute the raw diff turning `left` into `right`.
    fn diff(&self, left: &str, right: &str) -> Vec<DiffOperation>;

    /// Fold low-value equalities into the surrounding edits.
    fn cleanup_semantic(&self, ops: &mut Vec<DiffOperation>) {
        cleanup_semantic(ops);
    }

    /// Render a diff sequence as a self-contained HTML fragment.
    fn render_html(&self, ops: &[DiffOperation]) -> String {
        pretty_html(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_counts_breaks_only() {
        assert_eq!(DiffOperation::equal("").line_count(), 0);
        assert_eq!(DiffOperation::equal("no newline").line_count(), 0);
        assert_eq!(DiffOperation::insert("a\nb\n").line_count(), 2);
        assert_eq!(DiffOperation::delete("\n\n\n").line_count(), 3);
    }
}
