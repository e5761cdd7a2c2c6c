pub mod collector;
pub mod differ;
pub mod picker;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use diff_engine::{DiffEngine, LineDiffEngine};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Settings, load_settings};
use crate::model::{Similarity, SubmitterId};
use crate::util::{color_enabled_stdout, plural, sym_check, sym_cross, sym_gear, sym_question};
use collector::collect_submissions;
use differ::{for_each_pair, pair_indices};
use report::{ReportNames, write_report};

pub struct CompareArgs {
    pub file: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub json: bool,
}

/// The file name being compared and the directory holding one folder per submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub filename: String,
    pub root: PathBuf,
}

impl Target {
    /// `path` is any submitter's copy, so the root is its grandparent. Only the
    /// root is resolved; a symlinked submission keeps its own name.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("{} is not a file", path.display());
        }
        let abs = std::path::absolute(path)
            .with_context(|| format!("failed to resolve {}", path.display()))?;
        let filename = abs
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("file name of {} is not valid UTF-8", path.display()))?
            .to_string();
        let root = abs
            .parent()
            .and_then(Path::parent)
            .with_context(|| format!("{} is not inside a submitter directory", path.display()))?
            .canonicalize()
            .with_context(|| format!("failed to resolve the root of {}", path.display()))?;
        Ok(Self { filename, root })
    }
}

#[derive(Debug, Serialize)]
pub struct PairOutcome {
    pub left: SubmitterId,
    pub right: SubmitterId,
    pub similarity: Similarity,
    pub percent: String,
    pub report: Option<PathBuf>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SkippedSubmitter {
    pub submitter: SubmitterId,
    pub reason: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub target: String,
    pub root: PathBuf,
    pub submissions: usize,
    pub pairs: Vec<PairOutcome>,
    pub skipped: Vec<SkippedSubmitter>,
}

impl RunSummary {
    pub fn failed_reports(&self) -> usize {
        self.pairs.iter().filter(|p| p.error.is_some()).count()
    }
}

pub fn handle_compare(args: CompareArgs) -> Result<()> {
    let settings = load_settings().unwrap_or_else(|e| {
        warn!("using default settings: {e:#}");
        Settings::default()
    });

    let file = match args.file {
        Some(file) => file,
        None => {
            let root = match args.root {
                Some(root) => root,
                None => std::env::current_dir().context("failed to get current dir")?,
            };
            match picker::pick_file(&root)? {
                Some(file) => file,
                None => {
                    println!("No file chosen. All done.");
                    return Ok(());
                }
            }
        }
    };

    let target = Target::from_path(&file)?;
    let engine = LineDiffEngine::new(settings.effective_timeout(args.timeout_ms));
    let jobs = settings.effective_jobs(args.jobs);
    info!(target = %target.filename, root = %target.root.display(), jobs, "starting comparison");

    let summary = run_pipeline(&engine, &target, jobs)?;
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to serialize run summary")?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Collect, diff every pair and write the reports. Only an unreadable root
/// aborts; everything else is recorded in the summary.
pub fn run_pipeline<E: DiffEngine + ?Sized>(engine: &E, target: &Target, jobs: usize) -> Result<RunSummary> {
    let collection = collect_submissions(&target.root, &target.filename)?;
    let total_pairs = pair_indices(collection.records.len()).count();
    info!(
        submissions = collection.records.len(),
        skipped = ?collection.skipped_submitters(),
        pairs = total_pairs,
        "collected submissions"
    );

    let pb = ProgressBar::new(total_pairs as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} pairs")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let names = ReportNames::default();
    let pairs = for_each_pair(engine, &collection.records, jobs, |result| {
        let written = names
            .claim(&result, &target.filename)
            .and_then(|_| write_report(engine, &result, &target.filename));
        let (report, error) = match written {
            Ok(path) => (Some(path), None),
            Err(e) => {
                warn!("{e}");
                (None, Some(e.to_string()))
            }
        };
        pb.inc(1);
        PairOutcome {
            left: result.left.submitter.clone(),
            right: result.right.submitter.clone(),
            similarity: result.similarity,
            percent: result.similarity.percent_label(),
            report,
            error,
        }
    });
    pb.finish_and_clear();

    let skipped = collection
        .skipped
        .iter()
        .filter_map(|e| {
            e.submitter().map(|submitter| SkippedSubmitter {
                submitter: submitter.clone(),
                reason: e.kind(),
                message: e.to_string(),
            })
        })
        .collect();

    Ok(RunSummary {
        target: target.filename.clone(),
        root: target.root.clone(),
        submissions: collection.records.len(),
        pairs,
        skipped,
    })
}

fn print_summary(summary: &RunSummary) {
    let ce = color_enabled_stdout();
    println!(
        "{} {} of '{}' under {}",
        sym_gear(ce),
        plural(summary.submissions, "submission"),
        summary.target,
        summary.root.display()
    );

    if summary.pairs.is_empty() {
        println!("{} Nothing to compare", sym_question(ce));
    }
    for pair in &summary.pairs {
        match (&pair.report, &pair.error) {
            (Some(path), _) => {
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                let note = if pair.similarity.is_defined() { "" } else { " (left file is empty)" };
                println!(
                    "{} {:>4}%  {} / {}  {}{}",
                    sym_check(ce),
                    pair.percent,
                    pair.left,
                    pair.right,
                    name.dimmed(),
                    note
                );
            }
            (None, error) => {
                println!(
                    "{} {:>4}%  {} / {}  {}",
                    sym_cross(ce),
                    pair.percent,
                    pair.left,
                    pair.right,
                    error.as_deref().unwrap_or("report not written")
                );
            }
        }
    }

    let failed = summary.failed_reports();
    if failed > 0 {
        println!("{} {} could not be written", sym_cross(ce), plural(failed, "report"));
    }

    if summary.skipped.is_empty() {
        println!("{} No submitters skipped", sym_check(ce));
    } else {
        println!("{} Skipped {}:", sym_question(ce), plural(summary.skipped.len(), "submitter"));
        for skip in &summary.skipped {
            println!("   {} ({})", skip.submitter.as_str().bold(), skip.message);
        }
    }
}
