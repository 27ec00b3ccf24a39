//! Loaded `.paperflow/` state shared by the CLI commands.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::author::{Author, User};
use crate::io::board::{Board, load_board, write_board};
use crate::io::clock::Clock;
use crate::io::config::{WorkflowConfig, load_config};
use crate::io::directory::{
    CachedChairDirectory, ChairDirectory, FileChairDirectory, LookupMode,
};
use crate::io::init::PaperflowPaths;

#[derive(Debug, Clone)]
pub struct Workspace {
    pub paths: PaperflowPaths,
    pub config: WorkflowConfig,
    pub board: Board,
}

impl Workspace {
    pub fn load(root: &Path) -> Result<Self> {
        let paths = PaperflowPaths::new(root);
        let config = load_config(&paths.config_path).context("load workflow config")?;
        let board = load_board(&paths.board_path).context("load paper board")?;
        debug!(root = %root.display(), papers = board.papers.len(), "workspace loaded");
        Ok(Self {
            paths,
            config,
            board,
        })
    }

    /// Configured lookup mode, forced to strict when `strict` is set.
    pub fn lookup_mode(&self, strict: bool) -> LookupMode {
        if strict {
            LookupMode::Strict
        } else {
            self.config.lookup_mode
        }
    }

    /// Chair directory for this board, cached when a TTL is configured.
    ///
    /// A configured `chair_directory` file replaces the board's own
    /// assignments.
    pub fn directory(&self, clock: Rc<dyn Clock>) -> Box<dyn ChairDirectory> {
        match &self.config.chair_directory {
            Some(path) => {
                let directory = FileChairDirectory::new(self.paths.root.join(path));
                debug!(path = %directory.path().display(), "using external chair directory");
                self.cached(directory, clock)
            }
            None => self.cached(self.board.directory.clone(), clock),
        }
    }

    fn cached<D>(&self, directory: D, clock: Rc<dyn Clock>) -> Box<dyn ChairDirectory>
    where
        D: ChairDirectory + 'static,
    {
        match self.config.chair_cache_ttl() {
            Some(ttl) => Box::new(CachedChairDirectory::new(directory, clock, ttl)),
            None => Box::new(directory),
        }
    }

    /// The configured author with the board papers they own.
    pub fn author(&self) -> Result<Author> {
        let id = self.config.author_id()?;
        let window = self.config.window()?;
        let papers = self
            .board
            .papers
            .iter()
            .filter(|paper| paper.author() == Some(id))
            .cloned()
            .collect();
        let user = User {
            id,
            name: format!("author {}", id),
        };
        Ok(Author::with_papers(user, window, papers))
    }

    pub fn save_board(&self) -> Result<()> {
        write_board(&self.paths.board_path, &self.board)
    }
}
