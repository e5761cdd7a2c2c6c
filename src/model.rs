use std::fmt;
use std::path::{Path, PathBuf};

use diff_engine::DiffOperation;
use serde::Serialize;

use crate::error::LikediffError;

/// Name of the directory a submission was found in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SubmitterId(String);

impl SubmitterId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The submitter a directory stands for: its final path component.
    pub fn from_dir(dir: &Path) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        Self::new(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One submitter's copy of the target file.
///
/// `content` always holds `line_count` lines, each terminated by `\n`. The
/// raw text may break lines with `\n`, `\r\n` or a lone `\r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub submitter: SubmitterId,
    pub directory: PathBuf,
    pub content: String,
    pub line_count: usize,
}

impl FileRecord {
    pub fn from_text(submitter: SubmitterId, directory: PathBuf, raw: &str) -> Self {
        let mut content = String::with_capacity(raw.len() + 1);
        let mut line_count = 0;
        let mut rest = raw;
        while !rest.is_empty() {
            let (line, next) = match rest.find(['\r', '\n']) {
                Some(at) if rest[at..].starts_with("\r\n") => (&rest[..at], &rest[at + 2..]),
                Some(at) => (&rest[..at], &rest[at + 1..]),
                None => (rest, ""),
            };
            content.push_str(line);
            content.push('\n');
            line_count += 1;
            rest = next;
        }
        Self { submitter, directory, content, line_count }
    }

    pub fn read(submitter: SubmitterId, directory: PathBuf, path: &Path) -> Result<Self, LikediffError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LikediffError::ReadFailure {
            submitter: submitter.clone(),
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(submitter, directory, &raw))
    }
}

/// Fraction of the left file's lines left unchanged in the right one.
///
/// Not clamped. `NaN` when the left file has no lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Similarity(f64);

impl Similarity {
    pub fn from_counts(equal_lines: usize, left_lines: usize) -> Self {
        if left_lines == 0 {
            return Self(f64::NAN);
        }
        Self(equal_lines as f64 / left_lines as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_defined(self) -> bool {
        !self.0.is_nan()
    }

    /// Whole percent, rounded half away from zero; `NaN` when undefined.
    pub fn percent_label(self) -> String {
        let percent = self.0 * 100.0;
        if percent.is_nan() {
            "NaN".to_string()
        } else {
            format!("{}", percent.round() as i64)
        }
    }
}

impl From<f64> for Similarity {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// The outcome of diffing one pair. Lives only as long as its report is being written.
#[derive(Debug)]
pub struct ComparisonResult<'a> {
    pub left: &'a FileRecord,
    pub right: &'a FileRecord,
    pub diff: Vec<DiffOperation>,
    pub similarity: Similarity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(raw: &str) -> FileRecord {
        FileRecord::from_text(SubmitterId::new("a"), PathBuf::from("root/a"), raw)
    }

    #[test]
    fn content_is_newline_terminated() {
        let r = record("line1\nline2");
        assert_eq!(r.content, "line1\nline2\n");
        assert_eq!(r.line_count, 2);

        let r = record("line1\r\nline2\r\n");
        assert_eq!(r.content, "line1\nline2\n");
        assert_eq!(r.line_count, 2);
    }

    #[test]
    fn lone_carriage_returns_break_lines() {
        let r = record("one\rtwo\rthree");
        assert_eq!(r.content, "one\ntwo\nthree\n");
        assert_eq!(r.line_count, 3);

        let r = record("a\r\rb\r\n");
        assert_eq!(r.content, "a\n\nb\n");
        assert_eq!(r.line_count, 3);
    }

    #[test]
    fn blank_lines_count() {
        let r = record("a\n\n\nb\n");
        assert_eq!(r.line_count, 4);
        assert_eq!(r.content, "a\n\n\nb\n");
    }

    #[test]
    fn empty_file_has_no_lines() {
        let r = record("");
        assert_eq!(r.line_count, 0);
        assert_eq!(r.content, "");
    }

    #[test]
    fn submitter_from_dir_uses_last_component() {
        assert_eq!(SubmitterId::from_dir(Path::new("/tmp/class/alice")).as_str(), "alice");
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(Similarity::from_counts(1, 8).percent_label(), "13");
        assert_eq!(Similarity::from_counts(5, 8).percent_label(), "63");
        assert_eq!(Similarity::from_counts(3, 8).percent_label(), "38");
        assert_eq!(Similarity::from_counts(1, 3).percent_label(), "33");
        assert_eq!(Similarity::from_counts(2, 3).percent_label(), "67");
    }

    #[test]
    fn percent_bounds() {
        assert_eq!(Similarity::from_counts(0, 4).percent_label(), "0");
        assert_eq!(Similarity::from_counts(4, 4).percent_label(), "100");
        assert_eq!(Similarity::from(1.25).percent_label(), "125");
    }

    #[test]
    fn empty_left_is_undefined() {
        let s = Similarity::from_counts(0, 0);
        assert!(!s.is_defined());
        assert!(s.value().is_nan());
        assert_eq!(s.percent_label(), "NaN");
    }
}
