//! Subprogram-chair assignment lookup.
//!
//! The assignment directory lives outside this crate. Papers query it through
//! [`ChairDirectory`] every time their stage is derived.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::types::{PaperId, UserId};
use crate::error::LookupError;
use crate::io::clock::Clock;

/// Lookup of the chair assigned to a paper.
pub trait ChairDirectory {
    /// `Ok(None)` means the paper is legitimately unassigned.
    fn assigned_chair(&self, paper: PaperId) -> Result<Option<UserId>, LookupError>;
}

/// How a failed lookup is treated during derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Failures are reported to the caller.
    Strict,
    /// Failures are logged and read as "no chair assigned".
    #[default]
    Permissive,
}

/// Resolve the chair for a possibly unpersisted paper under `mode`.
///
/// A paper without an id cannot have an assignment; no lookup is made.
pub fn resolve_chair(
    directory: &dyn ChairDirectory,
    paper: Option<PaperId>,
    mode: LookupMode,
) -> Result<Option<UserId>, LookupError> {
    let Some(paper) = paper else {
        return Ok(None);
    };
    match directory.assigned_chair(paper) {
        Ok(chair) => Ok(chair),
        Err(err) => match mode {
            LookupMode::Strict => Err(err),
            LookupMode::Permissive => {
                warn!(paper = %paper, error = %err, "chair lookup failed; treating as unassigned");
                Ok(None)
            }
        },
    }
}

/// Directory backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChairDirectory {
    assignments: HashMap<PaperId, UserId>,
    outage: Option<String>,
}

impl InMemoryChairDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw `(paper, chair)` pairs; a raw chair of `0` is unassigned.
    pub fn from_raw<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let assignments = pairs
            .into_iter()
            .filter_map(|(paper, chair)| UserId::from_raw(chair).map(|id| (PaperId(paper), id)))
            .collect();
        Self {
            assignments,
            outage: None,
        }
    }

    pub fn assign(&mut self, paper: PaperId, chair: UserId) {
        self.assignments.insert(paper, chair);
    }

    pub fn unassign(&mut self, paper: PaperId) {
        self.assignments.remove(&paper);
    }

    /// Make every lookup fail with `reason` (or succeed again with `None`).
    pub fn set_outage(&mut self, reason: Option<String>) {
        self.outage = reason;
    }

    /// Assignments sorted by paper id.
    pub fn assignments(&self) -> Vec<(PaperId, UserId)> {
        let mut pairs: Vec<_> = self.assignments.iter().map(|(p, c)| (*p, *c)).collect();
        pairs.sort();
        pairs
    }
}

impl ChairDirectory for InMemoryChairDirectory {
    fn assigned_chair(&self, paper: PaperId) -> Result<Option<UserId>, LookupError> {
        if let Some(reason) = &self.outage {
            return Err(LookupError::Unavailable {
                paper,
                reason: reason.clone(),
            });
        }
        Ok(self.assignments.get(&paper).copied())
    }
}

#[derive(Debug, Deserialize)]
struct AssignmentEntry {
    paper: u32,
    chair: u32,
}

/// Directory read from an external assignments file
/// (`[{"paper": 1, "chair": 7}, ...]`).
///
/// The file is re-read on every lookup; wrap it in [`CachedChairDirectory`]
/// to bound the reads. A missing or malformed file is a lookup failure, not
/// an empty directory.
#[derive(Debug, Clone)]
pub struct FileChairDirectory {
    path: PathBuf,
}

impl FileChairDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<InMemoryChairDirectory, String> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|err| format!("read {}: {}", self.path.display(), err))?;
        let entries: Vec<AssignmentEntry> = serde_json::from_str(&contents)
            .map_err(|err| format!("parse {}: {}", self.path.display(), err))?;
        Ok(InMemoryChairDirectory::from_raw(
            entries.into_iter().map(|entry| (entry.paper, entry.chair)),
        ))
    }
}

impl ChairDirectory for FileChairDirectory {
    fn assigned_chair(&self, paper: PaperId) -> Result<Option<UserId>, LookupError> {
        let directory = self
            .read()
            .map_err(|reason| LookupError::Unavailable { paper, reason })?;
        debug!(paper = %paper, path = %self.path.display(), "chair read from file");
        directory.assigned_chair(paper)
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    chair: Option<UserId>,
    fetched_at: DateTime<Utc>,
}

/// Time-bounded cache in front of another directory.
///
/// Successful lookups (including "unassigned") are kept for `ttl`; failures are
/// never cached. Call [`CachedChairDirectory::invalidate`] when a chair is
/// (re)assigned.
pub struct CachedChairDirectory<D> {
    inner: D,
    clock: Rc<dyn Clock>,
    ttl: Duration,
    entries: RefCell<HashMap<PaperId, CacheEntry>>,
}

impl<D: ChairDirectory> CachedChairDirectory<D> {
    pub fn new(inner: D, clock: Rc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            inner,
            clock,
            ttl,
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn invalidate(&self, paper: PaperId) {
        self.entries.borrow_mut().remove(&paper);
    }

    pub fn invalidate_all(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Mutable access to the wrapped directory. Callers reassigning chairs
    /// through it must also invalidate the affected papers.
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: ChairDirectory> ChairDirectory for CachedChairDirectory<D> {
    fn assigned_chair(&self, paper: PaperId) -> Result<Option<UserId>, LookupError> {
        let now = self.clock.now();
        if let Some(entry) = self.entries.borrow().get(&paper) {
            if now - entry.fetched_at < self.ttl {
                debug!(paper = %paper, "chair cache hit");
                return Ok(entry.chair);
            }
        }
        let chair = self.inner.assigned_chair(paper)?;
        self.entries.borrow_mut().insert(
            paper,
            CacheEntry {
                chair,
                fetched_at: now,
            },
        );
        Ok(chair)
    }
}
