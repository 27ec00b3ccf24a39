//! Shared deterministic types for the review workflow.
//!
//! These types define stable contracts between the entities, the core logic and
//! the I/O collaborators. They hold no references to external state.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Number of reviews a paper needs before a recommendation can be made.
pub const REQUIRED_REVIEWS: usize = 3;

/// Display text of the placeholder returned when a paper has no reviews.
pub const NO_REVIEWS_TEXT: &str = "No reviews available";

/// Identity of a user (author, chair, reviewer).
///
/// External services use the raw value `0` for "nobody"; that value never
/// becomes a `UserId`. Use [`UserId::from_raw`] at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(NonZeroU32);

impl UserId {
    /// Convert a raw identity, mapping the sentinel `0` to `None`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a paper, assigned once when the paper is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(pub u32);

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stage of a paper in the review pipeline.
///
/// Variants are declared in pipeline order; `Accept` and `Decline` are the two
/// absorbing terminal stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    SubprogramChairNeeded,
    ReviewsNeeded,
    RecommendationNeeded,
    DecisionNeeded,
    Accept,
    Decline,
}

impl WorkflowStatus {
    /// True once a final decision has been recorded.
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowStatus::Accept | WorkflowStatus::Decline)
    }

    /// Position in the pipeline. Both terminal stages share the last rank.
    pub fn rank(self) -> u8 {
        match self {
            WorkflowStatus::SubprogramChairNeeded => 0,
            WorkflowStatus::ReviewsNeeded => 1,
            WorkflowStatus::RecommendationNeeded => 2,
            WorkflowStatus::DecisionNeeded => 3,
            WorkflowStatus::Accept | WorkflowStatus::Decline => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkflowStatus::SubprogramChairNeeded => "SUBPROGRAM_CHAIR_NEEDED",
            WorkflowStatus::ReviewsNeeded => "REVIEWS_NEEDED",
            WorkflowStatus::RecommendationNeeded => "RECOMMENDATION_NEEDED",
            WorkflowStatus::DecisionNeeded => "DECISION_NEEDED",
            WorkflowStatus::Accept => "ACCEPT",
            WorkflowStatus::Decline => "DECLINE",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final decision on a paper, tracked separately from the pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcceptanceOutcome {
    #[default]
    Undecided,
    Accept,
    Decline,
}

impl AcceptanceOutcome {
    /// Terminal workflow stage matching this outcome, if decided.
    pub fn terminal_status(self) -> Option<WorkflowStatus> {
        match self {
            AcceptanceOutcome::Undecided => None,
            AcceptanceOutcome::Accept => Some(WorkflowStatus::Accept),
            AcceptanceOutcome::Decline => Some(WorkflowStatus::Decline),
        }
    }
}

impl fmt::Display for AcceptanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AcceptanceOutcome::Undecided => "UNDECIDED",
            AcceptanceOutcome::Accept => "ACCEPT",
            AcceptanceOutcome::Decline => "DECLINE",
        })
    }
}

/// A final decision as recorded by the program chair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accept,
    Decline,
}

impl Decision {
    pub fn outcome(self) -> AcceptanceOutcome {
        match self {
            Decision::Accept => AcceptanceOutcome::Accept,
            Decision::Decline => AcceptanceOutcome::Decline,
        }
    }

    pub fn status(self) -> WorkflowStatus {
        match self {
            Decision::Accept => WorkflowStatus::Accept,
            Decision::Decline => WorkflowStatus::Decline,
        }
    }
}

/// A review written by a reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: Option<UserId>,
    pub text: String,
}

impl Review {
    pub fn new(reviewer: UserId, text: impl Into<String>) -> Self {
        Self {
            reviewer: Some(reviewer),
            text: text.into(),
        }
    }

    /// Stand-in shown when a paper has no reviews yet.
    pub fn placeholder() -> Self {
        Self {
            reviewer: None,
            text: NO_REVIEWS_TEXT.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.reviewer.is_none() && self.text == NO_REVIEWS_TEXT
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A subprogram chair's recommendation on a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommender: Option<UserId>,
    pub text: String,
}

impl Recommendation {
    pub fn new(recommender: UserId, text: impl Into<String>) -> Self {
        Self {
            recommender: Some(recommender),
            text: text.into(),
        }
    }

    /// A recommendation without a named recommender counts as absent.
    pub fn is_present(&self) -> bool {
        self.recommender.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_from_raw_maps_zero_to_none() {
        assert_eq!(UserId::from_raw(0), None);
        assert_eq!(UserId::from_raw(7).map(UserId::get), Some(7));
    }

    #[test]
    fn workflow_status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&WorkflowStatus::SubprogramChairNeeded).expect("json");
        assert_eq!(json, "\"SUBPROGRAM_CHAIR_NEEDED\"");
        assert_eq!(WorkflowStatus::DecisionNeeded.to_string(), "DECISION_NEEDED");
    }

    /// Only the two decision stages absorb the pipeline.
    #[test]
    fn terminal_stages_are_accept_and_decline() {
        let terminal: Vec<WorkflowStatus> = [
            WorkflowStatus::SubprogramChairNeeded,
            WorkflowStatus::ReviewsNeeded,
            WorkflowStatus::RecommendationNeeded,
            WorkflowStatus::DecisionNeeded,
            WorkflowStatus::Accept,
            WorkflowStatus::Decline,
        ]
        .into_iter()
        .filter(|status| status.is_terminal())
        .collect();
        assert_eq!(terminal, vec![WorkflowStatus::Accept, WorkflowStatus::Decline]);
    }

    #[test]
    fn acceptance_outcome_defaults_to_undecided() {
        assert_eq!(AcceptanceOutcome::default(), AcceptanceOutcome::Undecided);
        assert_eq!(AcceptanceOutcome::default().to_string(), "UNDECIDED");
        assert_eq!(AcceptanceOutcome::Undecided.terminal_status(), None);
    }

    #[test]
    fn placeholder_review_renders_fixed_text() {
        let review = Review::placeholder();
        assert!(review.is_placeholder());
        assert_eq!(review.to_string(), "No reviews available");
    }

    #[test]
    fn recommendation_without_recommender_is_absent() {
        let rec = Recommendation {
            recommender: None,
            text: "accept".to_string(),
        };
        assert!(!rec.is_present());
    }
}
