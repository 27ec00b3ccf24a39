//! Recording final decisions for `paperflow decide`.

use tracing::info;

use crate::core::types::{Decision, PaperId};
use crate::error::PaperError;
use crate::io::board::Board;
use crate::io::directory::{ChairDirectory, LookupMode};

/// Record `decision` on paper `id` of `board`.
pub fn decide(
    board: &mut Board,
    id: PaperId,
    decision: Decision,
    directory: &dyn ChairDirectory,
    mode: LookupMode,
) -> Result<(), PaperError> {
    let paper = board.paper_mut(id).ok_or(PaperError::NotFound(id))?;
    paper.record_decision(decision, directory, mode)?;
    info!(paper = %id, ?decision, "decision recorded");
    Ok(())
}
