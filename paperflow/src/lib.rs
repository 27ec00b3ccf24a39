//! Review-workflow state for conference paper submissions.
//!
//! A paper moves through subprogram-chair assignment, review collection,
//! recommendation and final decision. Its stage is derived on every read from
//! the data it has accumulated plus an external chair lookup; it is never
//! stored as ground truth. Authors ask whether they may submit, modify or
//! delete papers against a configured deadline.
//!
//! - **[`core`]**: Pure, deterministic logic (stage derivation, eligibility,
//!   progression checks, table projection). No I/O.
//! - **[`io`]**: Side-effecting collaborators (config and board files, clock,
//!   chair directory).
//! - **[`paper`]** / **[`author`]**: the stateful entities.
//!
//! Orchestration modules ([`status`], [`eligibility`], [`decide`],
//! [`workspace`]) combine the above to implement CLI commands.

pub mod author;
pub mod core;
pub mod decide;
pub mod eligibility;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod paper;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod workspace;

pub use author::{Author, User};
pub use crate::core::types::{
    AcceptanceOutcome, Decision, PaperId, Recommendation, Review, UserId, WorkflowStatus,
};
pub use error::{LookupError, PaperError};
pub use paper::{Paper, Subscription};
