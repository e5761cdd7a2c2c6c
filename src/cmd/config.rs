use anyhow::Result;
use tracing::debug;

use crate::config::{Settings, default_jobs, load_settings, save_settings};
use crate::util::{color_enabled_stdout, sym_check, sym_gear};

pub fn handle_config(jobs: Option<usize>, timeout_ms: Option<u64>, reset: bool) -> Result<()> {
    let ce = color_enabled_stdout();
    if jobs == Some(0) {
        anyhow::bail!("--jobs must be at least 1");
    }

    let mut settings = if reset { Settings::default() } else { load_settings()? };
    debug!(?settings, reset, "loaded settings");
    if jobs.is_some() {
        settings.jobs = jobs;
    }
    if timeout_ms.is_some() {
        settings.timeout_ms = timeout_ms;
    }

    if reset || jobs.is_some() || timeout_ms.is_some() {
        save_settings(&settings)?;
        println!("{} Settings saved.", sym_check(ce));
    }

    let jobs_line = match settings.jobs {
        Some(n) => n.to_string(),
        None => format!("{} (default)", default_jobs()),
    };
    let timeout_line = match settings.timeout_ms {
        Some(0) => "none".to_string(),
        Some(ms) => format!("{ms} ms"),
        None => "none (default)".to_string(),
    };
    println!("{} jobs: {}", sym_gear(ce), jobs_line);
    println!("{} diff timeout: {}", sym_gear(ce), timeout_line);
    Ok(())
}
