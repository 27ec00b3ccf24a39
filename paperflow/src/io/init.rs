//! Initialization helpers for `.paperflow/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::board::{Board, write_board};
use super::config::{WorkflowConfig, write_config};

/// Canonical paths within `.paperflow/` for a project root.
#[derive(Debug, Clone)]
pub struct PaperflowPaths {
    pub root: PathBuf,
    pub dir: PathBuf,
    pub board_path: PathBuf,
    pub config_path: PathBuf,
}

impl PaperflowPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let dir = root.join(".paperflow");
        Self {
            root,
            board_path: dir.join("board.json"),
            config_path: dir.join("config.toml"),
            dir,
        }
    }
}

/// Options for `init_workspace`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing files.
    pub force: bool,
}

/// Create `.paperflow/` with an empty board and a default config.
///
/// Fails if `.paperflow/` already exists unless `options.force` is set.
pub fn init_workspace(root: &Path, options: &InitOptions) -> Result<PaperflowPaths> {
    let paths = PaperflowPaths::new(root);
    if paths.dir.exists() && !options.force {
        return Err(anyhow!(
            "paperflow init: .paperflow already exists (use --force to overwrite)"
        ));
    }
    if paths.dir.exists() && !paths.dir.is_dir() {
        return Err(anyhow!(
            "paperflow init: .paperflow exists but is not a directory"
        ));
    }

    fs::create_dir_all(&paths.dir)
        .with_context(|| format!("create directory {}", paths.dir.display()))?;
    write_board(&paths.board_path, &Board::default())?;
    write_config(&paths.config_path, &WorkflowConfig::default())?;

    Ok(paths)
}
