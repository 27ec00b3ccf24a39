//! Typed errors callers are expected to branch on.

use thiserror::Error;

use crate::core::types::{PaperId, WorkflowStatus};

/// Failure of the external chair-assignment lookup.
///
/// Distinct from "no chair assigned", which is a successful `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("chair directory unavailable for paper {paper}: {reason}")]
    Unavailable { paper: PaperId, reason: String },
}

/// Rejected operation on a paper or an author's paper list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaperError {
    #[error("paper already has id {current}; cannot reassign to {requested}")]
    IdAlreadyAssigned { current: PaperId, requested: PaperId },

    #[error("submission window closed")]
    WindowClosed,

    #[error("paper {0} has a final decision")]
    Decided(PaperId),

    #[error("paper {0} not found")]
    NotFound(PaperId),

    #[error("decision requires status DECISION_NEEDED, found {0}")]
    DecisionNotReady(WorkflowStatus),

    #[error("backward transition rejected: {0}")]
    Regression(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}
