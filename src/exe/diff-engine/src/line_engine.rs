use std::time::Duration;

use similar::{Algorithm, ChangeTag, TextDiff};

use crate::{DiffEngine, DiffKind, DiffOperation};

/// Myers line diff with an optional per-call deadline.
///
/// When the deadline passes `similar` gives up on finding a minimal script and
/// returns a coarser one, which is still a valid diff of the two inputs.
#[derive(Debug, Clone, Default)]
pub struct LineDiffEngine {
    timeout: Option<Duration>,
}

impl LineDiffEngine {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl DiffEngine for LineDiffEngine {
    fn diff(&self, left: &str, right: &str) -> Vec<DiffOperation> {
        let mut config = TextDiff::configure();
        config.algorithm(Algorithm::Myers);
        if let Some(timeout) = self.timeout {
            config.timeout(timeout);
        }
        let diff = config.diff_lines(left, right);

        let mut ops: Vec<DiffOperation> = Vec::new();
        for change in diff.iter_all_changes() {
            let kind = match change.tag() {
                ChangeTag::Equal => DiffKind::Equal,
                ChangeTag::Insert => DiffKind::Insert,
                ChangeTag::Delete => DiffKind::Delete,
            };
            match ops.last_mut() {
                Some(last) if last.kind == kind => last.text.push_str(change.value()),
                _ => ops.push(DiffOperation::new(kind, change.value())),
            }
        }
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical_texts_are_one_equality() {
        let engine = LineDiffEngine::default();
        let ops = engine.diff("line1\nline2\n", "line1\nline2\n");
        assert_eq!(ops, vec![DiffOperation::equal("line1\nline2\n")]);
    }

    #[test]
    fn disjoint_texts_delete_then_insert() {
        let engine = LineDiffEngine::default();
        let ops = engine.diff("a\nb\n", "c\nd\n");
        assert_eq!(
            ops,
            vec![DiffOperation::delete("a\nb\n"), DiffOperation::insert("c\nd\n")]
        );
    }

    #[test]
    fn shared_prefix_stays_equal() {
        let engine = LineDiffEngine::new(Some(Duration::from_secs(1)));
        let ops = engine.diff("one\ntwo\nthree\n", "one\ntwo\nfour\n");
        assert_eq!(
            ops,
            vec![
                DiffOperation::equal("one\ntwo\n"),
                DiffOperation::delete("three\n"),
                DiffOperation::insert("four\n"),
            ]
        );
    }

    #[test]
    fn empty_inputs() {
        let engine = LineDiffEngine::default();
        assert!(engine.diff("", "").is_empty());
        assert_eq!(engine.diff("", "x\n"), vec![DiffOperation::insert("x\n")]);
        assert_eq!(engine.diff("x\n", ""), vec![DiffOperation::delete("x\n")]);
    }
}
