//! Authors and the papers they own.
//!
//! All eligibility questions (submit, modify, delete) are asked through an
//! [`Author`], which delegates to the pure predicates in
//! [`crate::core::eligibility`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::eligibility::{self, AuthorActions, SubmissionWindow};
use crate::core::types::{PaperId, UserId};
use crate::error::{LookupError, PaperError};
use crate::io::clock::Clock;
use crate::io::directory::{ChairDirectory, LookupMode};
use crate::paper::{Paper, Subscription};

/// Underlying user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// A user acting as author.
#[derive(Debug, Clone)]
pub struct Author {
    user: User,
    window: SubmissionWindow,
    papers: Vec<Paper>,
}

impl Author {
    pub fn new(user: User, window: SubmissionWindow) -> Self {
        Self::with_papers(user, window, Vec::new())
    }

    pub fn with_papers(user: User, window: SubmissionWindow, papers: Vec<Paper>) -> Self {
        Self {
            user,
            window,
            papers,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn window(&self) -> SubmissionWindow {
        self.window
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn paper(&self, id: PaperId) -> Option<&Paper> {
        self.papers.iter().find(|paper| paper.id() == Some(id))
    }

    pub fn can_submit_or_modify(&self, clock: &dyn Clock) -> bool {
        self.window.is_open(clock.now())
    }

    pub fn can_delete(&self, paper: &Paper, clock: &dyn Clock) -> bool {
        eligibility::can_delete(paper.raw_status(), clock.now(), self.window.deadline)
    }

    /// Enabled actions for the current selection.
    pub fn actions(
        &self,
        clock: &dyn Clock,
        selected: Option<PaperId>,
        directory: &dyn ChairDirectory,
        mode: LookupMode,
    ) -> Result<AuthorActions, LookupError> {
        let status = match selected.and_then(|id| self.paper(id)) {
            Some(paper) => Some(paper.status(directory, mode)?),
            None => None,
        };
        Ok(eligibility::author_actions(
            clock.now(),
            self.window.deadline,
            status,
        ))
    }

    /// Add a new submission owned by this author.
    pub fn submit(&mut self, mut paper: Paper, clock: &dyn Clock) -> Result<&Paper, PaperError> {
        if !self.can_submit_or_modify(clock) {
            return Err(PaperError::WindowClosed);
        }
        paper.set_author(self.user.id);
        info!(author = %self.user.id, title = paper.title(), "paper submitted");
        let index = self.papers.len();
        self.papers.push(paper);
        Ok(&self.papers[index])
    }

    /// Edit an undecided paper while the window is open.
    pub fn modify<F>(&mut self, id: PaperId, clock: &dyn Clock, edit: F) -> Result<(), PaperError>
    where
        F: FnOnce(&mut Paper),
    {
        if !self.can_submit_or_modify(clock) {
            return Err(PaperError::WindowClosed);
        }
        let paper = self
            .papers
            .iter_mut()
            .find(|paper| paper.id() == Some(id))
            .ok_or(PaperError::NotFound(id))?;
        if paper.is_decided() {
            return Err(PaperError::Decided(id));
        }
        edit(paper);
        debug!(paper = %id, "paper modified");
        Ok(())
    }

    /// Remove and return a paper if deletion is currently allowed.
    pub fn withdraw(&mut self, id: PaperId, clock: &dyn Clock) -> Result<Paper, PaperError> {
        let index = self
            .papers
            .iter()
            .position(|paper| paper.id() == Some(id))
            .ok_or(PaperError::NotFound(id))?;
        if !self.can_delete(&self.papers[index], clock) {
            return Err(if self.papers[index].is_decided() {
                PaperError::Decided(id)
            } else {
                PaperError::WindowClosed
            });
        }
        info!(author = %self.user.id, paper = %id, "paper withdrawn");
        Ok(self.papers.remove(index))
    }

    /// Register a change observer on one of this author's papers.
    pub fn subscribe<F>(&mut self, id: PaperId, observer: F) -> Result<Subscription, PaperError>
    where
        F: Fn(&Paper) + 'static,
    {
        let paper = self
            .papers
            .iter_mut()
            .find(|paper| paper.id() == Some(id))
            .ok_or(PaperError::NotFound(id))?;
        Ok(paper.subscribe(observer))
    }
}
