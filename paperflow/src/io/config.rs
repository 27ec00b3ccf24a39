//! Workflow configuration stored under `.paperflow/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::eligibility::SubmissionWindow;
use crate::core::types::UserId;
use crate::io::directory::LookupMode;

/// Workflow configuration (TOML).
///
/// Missing fields take their defaults. The deadline has no default: commands
/// that gate on it fail until it is configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct WorkflowConfig {
    /// End of the submission/modification window (RFC 3339). Exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_deadline: Option<DateTime<Utc>>,

    /// Treatment of chair lookup failures during status derivation.
    pub lookup_mode: LookupMode,

    /// Lifetime of cached chair assignments in seconds. `0` disables caching.
    pub chair_cache_ttl_secs: u64,

    /// Author whose papers the author commands act on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<u32>,

    /// External chair assignments file, relative to the project root. When
    /// unset, the assignments stored in the board are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chair_directory: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.author == Some(0) {
            return Err(anyhow!("author must be a non-zero user id"));
        }
        if self.chair_cache_ttl_secs != 0 && self.chair_cache_ttl().is_none() {
            return Err(anyhow!(
                "chair_cache_ttl_secs {} is out of range",
                self.chair_cache_ttl_secs
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> Result<SubmissionWindow> {
        self.submission_deadline
            .map(SubmissionWindow::new)
            .ok_or_else(|| anyhow!("submission_deadline is not configured"))
    }

    pub fn author_id(&self) -> Result<UserId> {
        self.author
            .and_then(UserId::from_raw)
            .ok_or_else(|| anyhow!("author is not configured"))
    }

    /// Cache lifetime, or `None` when caching is disabled or the configured
    /// value is not representable (rejected by [`WorkflowConfig::validate`]).
    pub fn chair_cache_ttl(&self) -> Option<Duration> {
        match self.chair_cache_ttl_secs {
            0 => None,
            secs => i64::try_from(secs).ok().and_then(Duration::try_seconds),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `WorkflowConfig::default()`.
pub fn load_config(path: &Path) -> Result<WorkflowConfig> {
    if !path.exists() {
        return Ok(WorkflowConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WorkflowConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &WorkflowConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
