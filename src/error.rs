use std::path::PathBuf;

use thiserror::Error;

use crate::model::SubmitterId;

/// Failures isolated to one submitter or one pair. None of them stop a run.
#[derive(Debug, Error)]
pub enum LikediffError {
    #[error("no file with name '{target}' for submitter '{submitter}'")]
    MissingSubmissionFile { submitter: SubmitterId, target: String },

    #[error("could not read {} for submitter '{submitter}': {source}", .path.display())]
    ReadFailure {
        submitter: SubmitterId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write report {}: {source}", .path.display())]
    ReportWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LikediffError {
    /// The submitter a collection failure belongs to.
    pub fn submitter(&self) -> Option<&SubmitterId> {
        match self {
            Self::MissingSubmissionFile { submitter, .. } | Self::ReadFailure { submitter, .. } => {
                Some(submitter)
            }
            Self::ReportWriteFailure { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingSubmissionFile { .. } => "missing_submission_file",
            Self::ReadFailure { .. } => "read_failure",
            Self::ReportWriteFailure { .. } => "report_write_failure",
        }
    }
}
