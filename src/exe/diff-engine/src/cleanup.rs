//! Post-processing passes over a diff sequence.
//!
//! `cleanup_semantic` works on whole lines: an equality spanning fewer lines
//! than the edits on either side of it is turned into a delete/insert pair,
//! after which `cleanup_merge` coalesces the resulting runs. A shared line
//! between single-line edits is kept.

use crate::{DiffKind, DiffOperation};

/// Eliminate semantically trivial equalities, then merge runs.
pub fn cleanup_semantic(ops: &mut Vec<DiffOperation>) {
    let mut changed = false;
    // Indices of equalities seen since the last fold.
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    // Edit sizes before and after the last equality, in lines.
    let (mut inserted_before, mut deleted_before) = (0usize, 0usize);
    let (mut inserted_after, mut deleted_after) = (0usize, 0usize);

    let mut i = 0;
    while i < ops.len() {
        let len = ops[i].line_count();
        match ops[i].kind {
            DiffKind::Equal => {
                equalities.push(i);
                inserted_before = inserted_after;
                deleted_before = deleted_after;
                inserted_after = 0;
                deleted_after = 0;
                last_equality = Some(len);
                i += 1;
                continue;
            }
            DiffKind::Insert => inserted_after += len,
            DiffKind::Delete => deleted_after += len,
        }

        let fold = last_equality.is_some_and(|eq_len| {
            eq_len < inserted_before.max(deleted_before) && eq_len < inserted_after.max(deleted_after)
        });
        if !fold {
            i += 1;
            continue;
        }

        let Some(eq_idx) = equalities.pop() else {
            i += 1;
            continue;
        };
        let text = std::mem::take(&mut ops[eq_idx].text);
        ops[eq_idx] = DiffOperation::delete(text.clone());
        ops.insert(eq_idx + 1, DiffOperation::insert(text));

        // The previous equality has to be evaluated again, so restart from the
        // one before it (visiting it pushes it back) or from the top.
        equalities.pop();
        i = equalities.pop().unwrap_or(0);
        inserted_before = 0;
        deleted_before = 0;
        inserted_after = 0;
        deleted_after = 0;
        last_equality = None;
        changed = true;
    }

    if changed {
        cleanup_merge(ops);
    }
}

/// Coalesce adjacent spans of the same kind and factor shared leading or
/// trailing lines out of delete/insert runs. Deletes always precede inserts.
pub fn cleanup_merge(ops: &mut Vec<DiffOperation>) {
    let mut merged: Vec<DiffOperation> = Vec::with_capacity(ops.len());
    let mut deleted = String::new();
    let mut inserted = String::new();

    for op in ops.drain(..) {
        match op.kind {
            DiffKind::Delete => deleted.push_str(&op.text),
            DiffKind::Insert => inserted.push_str(&op.text),
            DiffKind::Equal => {
                flush_edits(&mut merged, &mut deleted, &mut inserted);
                push_equal(&mut merged, &op.text);
            }
        }
    }
    flush_edits(&mut merged, &mut deleted, &mut inserted);

    *ops = merged;
}

fn flush_edits(out: &mut Vec<DiffOperation>, deleted: &mut String, inserted: &mut String) {
    let (prefix, suffix) = if deleted.is_empty() || inserted.is_empty() {
        (0, 0)
    } else {
        common_line_affixes(deleted, inserted)
    };

    if prefix > 0 {
        push_equal(out, &deleted[..prefix]);
    }
    let del_body = &deleted[prefix..deleted.len() - suffix];
    let ins_body = &inserted[prefix..inserted.len() - suffix];
    if !del_body.is_empty() {
        out.push(DiffOperation::delete(del_body));
    }
    if !ins_body.is_empty() {
        out.push(DiffOperation::insert(ins_body));
    }
    if suffix > 0 {
        push_equal(out, &deleted[deleted.len() - suffix..]);
    }

    deleted.clear();
    inserted.clear();
}

fn push_equal(out: &mut Vec<DiffOperation>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(last) if last.kind == DiffKind::Equal => last.text.push_str(text),
        _ => out.push(DiffOperation::equal(text)),
    }
}

/// Byte lengths of the whole lines shared at the start and end of `a` and `b`.
/// The two never overlap.
fn common_line_affixes(a: &str, b: &str) -> (usize, usize) {
    let mut prefix = 0;
    for (x, y) in a.split_inclusive('\n').zip(b.split_inclusive('\n')) {
        if x != y {
            break;
        }
        prefix += x.len();
    }

    let (a_rest, b_rest) = (&a[prefix..], &b[prefix..]);
    let mut suffix = 0;
    for (x, y) in a_rest
        .split_inclusive('\n')
        .rev()
        .zip(b_rest.split_inclusive('\n').rev())
    {
        if x != y {
            break;
        }
        suffix += x.len();
    }
    (prefix, suffix)
}
