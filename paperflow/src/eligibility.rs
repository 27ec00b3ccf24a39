//! Eligibility checks for `paperflow can-submit` and `paperflow can-delete`.

use crate::author::Author;
use crate::core::types::PaperId;
use crate::error::PaperError;
use crate::io::clock::Clock;

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied(String),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }
}

pub fn check_submit(author: &Author, clock: &dyn Clock) -> Verdict {
    if author.can_submit_or_modify(clock) {
        Verdict::Allowed
    } else {
        Verdict::Denied(format!(
            "submission deadline {} has passed",
            author.window().deadline.to_rfc3339()
        ))
    }
}

/// Check whether the author may delete `id`. Unknown papers are an error.
pub fn check_delete(author: &Author, id: PaperId, clock: &dyn Clock) -> Result<Verdict, PaperError> {
    let paper = author.paper(id).ok_or(PaperError::NotFound(id))?;
    if author.can_delete(paper, clock) {
        return Ok(Verdict::Allowed);
    }
    if paper.is_decided() {
        return Ok(Verdict::Denied(format!(
            "paper {} has a final decision ({})",
            id,
            paper.raw_status()
        )));
    }
    Ok(Verdict::Denied(format!(
        "submission deadline {} has passed",
        author.window().deadline.to_rfc3339()
    )))
}
