use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::LikediffError;
use crate::model::{FileRecord, SubmitterId};

/// Records found under a root, plus the submitters that had to be left out.
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<LikediffError>,
}

impl Collection {
    pub fn skipped_submitters(&self) -> Vec<&str> {
        self.skipped
            .iter()
            .filter_map(|e| e.submitter())
            .map(SubmitterId::as_str)
            .collect()
    }
}

/// Immediate subdirectories of `root`, ordered by name.
pub fn submitter_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)
        .with_context(|| format!("failed to list {}", root.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Read one record per submitter directory that holds `target` (ignoring case).
///
/// Only listing `root` itself can fail; every per-submitter problem ends up in
/// `Collection::skipped`.
pub fn collect_submissions(root: &Path, target: &str) -> Result<Collection> {
    let mut collection = Collection::default();
    for dir in submitter_dirs(root)? {
        let submitter = SubmitterId::from_dir(&dir);
        match read_submission(&dir, submitter, target) {
            Ok(record) => {
                debug!(submitter = %record.submitter, lines = record.line_count, "collected submission");
                collection.records.push(record);
            }
            Err(e) => {
                warn!("{e}");
                collection.skipped.push(e);
            }
        }
    }
    Ok(collection)
}

fn read_submission(dir: &Path, submitter: SubmitterId, target: &str) -> Result<FileRecord, LikediffError> {
    let Some(path) = find_matching_file(dir, target).map_err(|source| LikediffError::ReadFailure {
        submitter: submitter.clone(),
        path: dir.to_path_buf(),
        source,
    })?
    else {
        return Err(LikediffError::MissingSubmissionFile { submitter, target: target.to_string() });
    };
    FileRecord::read(submitter, dir.to_path_buf(), &path)
}

/// The file in `dir` whose name equals `target` ignoring case. With several
/// candidates the smallest name wins.
pub fn find_matching_file(dir: &Path, target: &str) -> std::io::Result<Option<PathBuf>> {
    let wanted = target.to_lowercase();
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.to_lowercase() == wanted)
        })
        .filter(|path| path.is_file())
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}
