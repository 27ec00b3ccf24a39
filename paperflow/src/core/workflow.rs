//! Workflow stage derivation.
//!
//! A paper's stage is never stored as ground truth. It is recomputed on every
//! read from the paper's own data plus the externally looked-up chair
//! assignment:
//! - a terminal raw status (`ACCEPT`/`DECLINE`) freezes the pipeline;
//! - otherwise the first missing prerequisite (chair, reviews, recommendation)
//!   names the stage;
//! - with every prerequisite present the paper awaits a decision.

use crate::core::types::{REQUIRED_REVIEWS, UserId, WorkflowStatus};

/// Everything the derivation reads, already fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInputs {
    /// Raw lifecycle seed stored on the paper.
    pub raw_status: WorkflowStatus,
    /// Chair assigned to the paper, if any.
    pub chair: Option<UserId>,
    /// Number of real reviews attached.
    pub review_count: usize,
    /// True when a recommendation with a named recommender is set.
    pub has_recommendation: bool,
}

/// Derive the current workflow stage. First matching rule wins.
pub fn derive_status(inputs: &StageInputs) -> WorkflowStatus {
    if inputs.raw_status.is_terminal() {
        return inputs.raw_status;
    }
    if inputs.chair.is_none() {
        return WorkflowStatus::SubprogramChairNeeded;
    }
    data_stage(
        inputs.raw_status,
        inputs.review_count,
        inputs.has_recommendation,
    )
}

/// Stage reached by the paper's own data, assuming a chair is assigned.
///
/// Chair assignment lives outside the paper, so edits to the paper can only
/// move this part of the pipeline.
pub fn data_stage(
    raw_status: WorkflowStatus,
    review_count: usize,
    has_recommendation: bool,
) -> WorkflowStatus {
    if raw_status.is_terminal() {
        return raw_status;
    }
    if review_count < REQUIRED_REVIEWS {
        return WorkflowStatus::ReviewsNeeded;
    }
    if !has_recommendation {
        return WorkflowStatus::RecommendationNeeded;
    }
    WorkflowStatus::DecisionNeeded
}
