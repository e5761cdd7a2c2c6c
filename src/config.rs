use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "likediff";

/// Stored defaults; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Worker threads used for the pair loop
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Per-pair diff deadline in milliseconds; unset or 0 means none
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Settings {
    pub fn effective_jobs(&self, flag: Option<usize>) -> usize {
        flag.or(self.jobs)
            .filter(|n| *n > 0)
            .unwrap_or_else(default_jobs)
    }

    /// Without a deadline the diff is always minimal, so percentages and
    /// report names do not depend on machine load.
    pub fn effective_timeout(&self, flag: Option<u64>) -> Option<Duration> {
        flag.or(self.timeout_ms)
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

pub fn load_settings() -> Result<Settings> {
    let settings: Settings = confy::load(APP_NAME, None).context("failed to load settings")?;
    Ok(settings)
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    confy::store(APP_NAME, None, settings).context("failed to save settings")?;
    Ok(())
}
