//! Deadline and decision gates for author actions.
//!
//! The submission window is the half-open interval ending at the deadline:
//! `now == deadline` is already closed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::WorkflowStatus;

/// Configured submission/modification window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionWindow {
    pub deadline: DateTime<Utc>,
}

impl SubmissionWindow {
    pub fn new(deadline: DateTime<Utc>) -> Self {
        Self { deadline }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        can_submit_or_modify(now, self.deadline)
    }
}

/// True iff `now` is strictly before `deadline`.
pub fn can_submit_or_modify(now: DateTime<Utc>, deadline: DateTime<Utc>) -> bool {
    now < deadline
}

/// True iff the window is open and the paper has not been decided.
pub fn can_delete(status: WorkflowStatus, now: DateTime<Utc>, deadline: DateTime<Utc>) -> bool {
    can_submit_or_modify(now, deadline) && !status.is_terminal()
}

/// Reviews are released to the author only once a decision exists.
pub fn can_view_reviews(status: WorkflowStatus) -> bool {
    status.is_terminal()
}

/// Which author actions a presentation layer should currently enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorActions {
    pub add_submission: bool,
    pub view_edit: bool,
    pub delete_submission: bool,
    pub view_reviews: bool,
}

/// Compute enabled actions for an optional selected paper.
///
/// `selected` carries the selected paper's stage; `None` means nothing is
/// selected.
pub fn author_actions(
    now: DateTime<Utc>,
    deadline: DateTime<Utc>,
    selected: Option<WorkflowStatus>,
) -> AuthorActions {
    let open = can_submit_or_modify(now, deadline);
    match selected {
        None => AuthorActions {
            add_submission: open,
            ..AuthorActions::default()
        },
        Some(status) => AuthorActions {
            add_submission: open,
            view_edit: true,
            delete_submission: can_delete(status, now, deadline),
            view_reviews: can_view_reviews(status),
        },
    }
}
