use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use tracing::warn;

use super::collector::submitter_dirs;

/// Files sitting directly inside the submitter directories of `root`.
pub fn candidate_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir in submitter_dirs(root)? {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

/// Ask for one file of any submitter. `None` when nothing was chosen.
pub fn pick_file(root: &Path) -> Result<Option<PathBuf>> {
    if !std::io::stdin().is_terminal() {
        warn!("no file given and stdin is not a terminal; skipping the file picker");
        return Ok(None);
    }

    let candidates = candidate_files(root)?;
    if candidates.is_empty() {
        warn!(root = %root.display(), "no submitter files to pick from");
        return Ok(None);
    }

    let items: Vec<String> = candidates
        .iter()
        .map(|p| p.strip_prefix(root).unwrap_or(p).display().to_string())
        .collect();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Pick any file of any student (Esc to cancel)")
        .items(&items)
        .default(0)
        .interact_opt()
        .context("file picker failed")?;

    Ok(choice.map(|i| candidates[i].clone()))
}
