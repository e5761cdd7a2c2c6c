use diff_engine::{DiffEngine, DiffKind, DiffOperation};
use tracing::debug;

use crate::model::{ComparisonResult, FileRecord, Similarity};

/// Every unordered pair `(i, j)` with `i < j` over `n` records.
pub fn pair_indices(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

/// Lines left untouched by the diff.
pub fn equal_line_count(ops: &[DiffOperation]) -> usize {
    ops.iter()
        .filter(|op| op.kind == DiffKind::Equal)
        .map(DiffOperation::line_count)
        .sum()
}

/// Diff `left` against `right`. The similarity is relative to the left file only.
pub fn compare<'a, E: DiffEngine + ?Sized>(
    engine: &E,
    left: &'a FileRecord,
    right: &'a FileRecord,
) -> ComparisonResult<'a> {
    let mut diff = engine.diff(&left.content, &right.content);
    engine.cleanup_semantic(&mut diff);
    let similarity = Similarity::from_counts(equal_line_count(&diff), left.line_count);
    debug!(
        left = %left.submitter,
        right = %right.submitter,
        similarity = similarity.value(),
        "compared pair"
    );
    ComparisonResult { left, right, diff, similarity }
}

/// Compare every pair on up to `jobs` worker threads and hand each result to
/// `handle`. Outputs come back in pair order whatever order the workers
/// finished in.
pub fn for_each_pair<E, T, F>(engine: &E, records: &[FileRecord], jobs: usize, handle: F) -> Vec<T>
where
    E: DiffEngine + ?Sized,
    T: Send,
    F: Fn(ComparisonResult<'_>) -> T + Sync,
{
    let pairs: Vec<(usize, usize)> = pair_indices(records.len()).collect();
    if pairs.is_empty() {
        return Vec::new();
    }
    let workers = jobs.clamp(1, pairs.len());

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, (usize, usize))>();
    for job in pairs.iter().copied().enumerate() {
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    let (done_tx, done_rx) = crossbeam_channel::unbounded::<(usize, T)>();
    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            let handle = &handle;
            scope.spawn(move || {
                for (slot, (i, j)) in job_rx.iter() {
                    let result = compare(engine, &records[i], &records[j]);
                    if done_tx.send((slot, handle(result))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(done_tx);

    let mut slots: Vec<Option<T>> = (0..pairs.len()).map(|_| None).collect();
    for (slot, value) in done_rx.try_iter() {
        slots[slot] = Some(value);
    }
    slots.into_iter().flatten().collect()
}
