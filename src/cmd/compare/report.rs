use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use diff_engine::{DiffEngine, escape_html};
use tracing::debug;

use crate::error::LikediffError;
use crate::model::{ComparisonResult, FileRecord};

/// `(<P>%) <left>-<right>-<target>.html`
pub fn report_file_name(result: &ComparisonResult<'_>, target: &str) -> String {
    format!(
        "({}%) {}-{}-{}.html",
        result.similarity.percent_label(),
        result.left.submitter,
        result.right.submitter,
        target
    )
}

/// Reports land next to the submitter directories, in the left one's parent.
pub fn report_dir(left: &FileRecord) -> &Path {
    left.directory.parent().unwrap_or(left.directory.as_path())
}

pub fn report_path(result: &ComparisonResult<'_>, target: &str) -> PathBuf {
    report_dir(result.left).join(report_file_name(result, target))
}

/// Report paths handed out during one run, keyed case-insensitively.
///
/// Hyphenated submitter names can produce the same name for two pairs
/// (`a` + `b-c` and `a-b` + `c`). The first pair to claim a path writes it;
/// later ones fail instead of overwriting it.
#[derive(Debug, Default)]
pub struct ReportNames {
    claimed: Mutex<HashMap<String, String>>,
}

impl ReportNames {
    pub fn claim(&self, result: &ComparisonResult<'_>, target: &str) -> Result<PathBuf, LikediffError> {
        let path = report_path(result, target);
        let owner = format!("{}/{}", result.left.submitter, result.right.submitter);
        let key = path.to_string_lossy().to_lowercase();
        let mut claimed = self.claimed.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(first) = claimed.get(&key) {
            return Err(LikediffError::ReportWriteFailure {
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("name already used by the report for {first}"),
                ),
                path,
            });
        }
        claimed.insert(key, owner);
        Ok(path)
    }
}

pub fn render_report<E: DiffEngine + ?Sized>(engine: &E, result: &ComparisonResult<'_>, target: &str) -> String {
    let title = escape_html(&format!("{} vs {}: {}", result.left.submitter, result.right.submitter, target));
    let mut html = String::new();
    html.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&format!(
        "<p>{}% of the lines of {} are unchanged in {}.</p>\n",
        result.similarity.percent_label(),
        escape_html(result.left.submitter.as_str()),
        escape_html(result.right.submitter.as_str()),
    ));
    html.push_str("<div style=\"font-family:monospace;white-space:pre-wrap;\">");
    html.push_str(&engine.render_html(&result.diff));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Write the pair's report, replacing any earlier one with the same name.
pub fn write_report<E: DiffEngine + ?Sized>(
    engine: &E,
    result: &ComparisonResult<'_>,
    target: &str,
) -> Result<PathBuf, LikediffError> {
    let path = report_path(result, target);
    let html = render_report(engine, result, target);
    std::fs::write(&path, html).map_err(|source| LikediffError::ReportWriteFailure {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "wrote report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::compare::differ::compare;
    use crate::model::{Similarity, SubmitterId};
    use diff_engine::{DiffOperation, LineDiffEngine};
    use pretty_assertions::assert_eq;
    use std::fs;

    fn record(root: &Path, name: &str, raw: &str) -> FileRecord {
        FileRecord::from_text(SubmitterId::new(name), root.join(name), raw)
    }

    #[test]
    fn file_name_encodes_percent_and_submitters() {
        let a = record(Path::new("root"), "A", "line1\nline2\n");
        let b = record(Path::new("root"), "B", "line1\nline2\n");
        let result = compare(&LineDiffEngine::default(), &a, &b);
        assert_eq!(report_file_name(&result, "essay.txt"), "(100%) A-B-essay.txt.html");
        assert_eq!(report_path(&result, "essay.txt"), Path::new("root/(100%) A-B-essay.txt.html"));
    }

    #[test]
    fn file_name_rounds_at_half() {
        let a = record(Path::new("root"), "A", "");
        let b = record(Path::new("root"), "B", "");
        let result = ComparisonResult { left: &a, right: &b, diff: Vec::new(), similarity: Similarity::from(0.125) };
        assert_eq!(report_file_name(&result, "x.py"), "(13%) A-B-x.py.html");
        let result = ComparisonResult { similarity: Similarity::from(0.625), ..result };
        assert_eq!(report_file_name(&result, "x.py"), "(63%) A-B-x.py.html");
    }

    #[test]
    fn undefined_similarity_is_named_nan() {
        let a = record(Path::new("root"), "A", "");
        let b = record(Path::new("root"), "B", "text\n");
        let result = compare(&LineDiffEngine::default(), &a, &b);
        assert_eq!(report_file_name(&result, "essay.txt"), "(NaN%) A-B-essay.txt.html");
    }

    #[test]
    fn report_contains_marked_spans() {
        let a = record(Path::new("root"), "A", "keep\nold\n");
        let b = record(Path::new("root"), "B", "keep\nnew\n");
        let result = ComparisonResult {
            left: &a,
            right: &b,
            diff: vec![
                DiffOperation::equal("keep\n"),
                DiffOperation::delete("old\n"),
                DiffOperation::insert("new\n"),
            ],
            similarity: Similarity::from_counts(1, 2),
        };
        let html = render_report(&LineDiffEngine::default(), &result, "essay.txt");
        assert!(html.contains("<span>keep&para;<br></span>"));
        assert!(html.contains("<del style=\"background:#ffe6e6;\">old&para;<br></del>"));
        assert!(html.contains("<ins style=\"background:#e6ffe6;\">new&para;<br></ins>"));
        assert!(html.contains("<title>A vs B: essay.txt</title>"));
    }

    #[test]
    fn rewrite_replaces_existing_report() {
        let tmp = tempfile::tempdir().unwrap();
        let a = record(tmp.path(), "A", "same\n");
        let b = record(tmp.path(), "B", "same\n");
        let engine = LineDiffEngine::default();
        let result = compare(&engine, &a, &b);

        let target = report_path(&result, "essay.txt");
        fs::write(&target, "x".repeat(100_000)).unwrap();

        let first = write_report(&engine, &result, "essay.txt").unwrap();
        let first_bytes = fs::read(&first).unwrap();
        let second = write_report(&engine, &result, "essay.txt").unwrap();
        assert_eq!(first, target);
        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), first_bytes);
        assert_eq!(first_bytes, render_report(&engine, &result, "essay.txt").into_bytes());
    }

    #[test]
    fn second_claim_on_a_name_fails() {
        let a = record(Path::new("root"), "a", "x\n");
        let bc = record(Path::new("root"), "b-c", "x\n");
        let ab = record(Path::new("root"), "a-b", "x\n");
        let c = record(Path::new("root"), "c", "x\n");
        let engine = LineDiffEngine::default();
        let first = compare(&engine, &a, &bc);
        let second = compare(&engine, &ab, &c);
        assert_eq!(report_path(&first, "essay.txt"), report_path(&second, "essay.txt"));

        let names = ReportNames::default();
        assert!(names.claim(&first, "essay.txt").is_ok());
        let err = names.claim(&second, "essay.txt").unwrap_err();
        assert!(matches!(err, LikediffError::ReportWriteFailure { .. }));
        assert!(err.to_string().contains("a/b-c"));
    }

    #[test]
    fn claims_ignore_case() {
        let upper = record(Path::new("root"), "A", "x\n");
        let lower = record(Path::new("root"), "a", "x\n");
        let other = record(Path::new("root"), "B", "x\n");
        let other_lower = record(Path::new("root"), "b", "x\n");
        let engine = LineDiffEngine::default();
        let names = ReportNames::default();
        assert!(names.claim(&compare(&engine, &upper, &other), "essay.txt").is_ok());
        assert!(names.claim(&compare(&engine, &lower, &other_lower), "essay.txt").is_err());
    }

    #[test]
    fn missing_destination_is_a_write_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("gone");
        let a = record(&gone, "A", "x\n");
        let b = record(&gone, "B", "x\n");
        let engine = LineDiffEngine::default();
        let result = compare(&engine, &a, &b);
        let err = write_report(&engine, &result, "essay.txt").unwrap_err();
        assert!(matches!(err, LikediffError::ReportWriteFailure { .. }));
    }
}
