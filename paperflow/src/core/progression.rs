//! Forward-only progression checks applied at the mutation boundary.
//!
//! Derivation alone cannot stop a paper from sliding back to an earlier stage
//! when its data is edited (e.g. reviews removed after a recommendation). These
//! checks compare the stage reached by the paper's own data before and after
//! an edit and reject edits that lower it. Each returns a stable error message
//! on violation.

use crate::core::types::WorkflowStatus;
use crate::core::workflow::data_stage;

/// Reviews and recommendation presence as seen by the progression checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperProgress {
    pub raw_status: WorkflowStatus,
    pub review_count: usize,
    pub has_recommendation: bool,
}

impl PaperProgress {
    fn stage(self) -> WorkflowStatus {
        data_stage(self.raw_status, self.review_count, self.has_recommendation)
    }
}

fn check_stage_kept(
    edit: &str,
    before: PaperProgress,
    after: PaperProgress,
) -> Result<(), String> {
    let (from, to) = (before.stage(), after.stage());
    if to.rank() < from.rank() {
        return Err(format!("{} would move paper back from {} to {}", edit, from, to));
    }
    Ok(())
}

/// Reject replacing the review list when it would lower the paper's stage.
///
/// A decided paper additionally keeps every review it was decided on.
pub fn check_review_replacement(current: PaperProgress, new_count: usize) -> Result<(), String> {
    if current.raw_status.is_terminal() && new_count < current.review_count {
        return Err(format!(
            "cannot drop reviews on a decided paper (status={}, current={}, new={})",
            current.raw_status, current.review_count, new_count
        ));
    }
    check_stage_kept(
        "replacing reviews",
        current,
        PaperProgress {
            review_count: new_count,
            ..current
        },
    )
}

/// Reject clearing a recommendation when it would lower the paper's stage,
/// and on any decided paper.
pub fn check_recommendation_change(
    current: PaperProgress,
    will_have_recommendation: bool,
) -> Result<(), String> {
    if current.raw_status.is_terminal()
        && current.has_recommendation
        && !will_have_recommendation
    {
        return Err(format!(
            "cannot clear recommendation on a decided paper (status={})",
            current.raw_status
        ));
    }
    check_stage_kept(
        "clearing the recommendation",
        current,
        PaperProgress {
            has_recommendation: will_have_recommendation,
            ..current
        },
    )
}

/// Reject moving a terminal raw status back into the pipeline.
///
/// Switching between the two terminal values is allowed.
pub fn check_status_seed(current: WorkflowStatus, next: WorkflowStatus) -> Result<(), String> {
    if current.is_terminal() && !next.is_terminal() {
        return Err(format!(
            "cannot move decided paper from {} back to {}",
            current, next
        ));
    }
    Ok(())
}
