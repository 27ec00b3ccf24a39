//! Tabular projection of papers.
//!
//! Column order is a compatibility surface for table renderers and must not
//! change.

use crate::paper::Paper;

pub const PAPER_COLUMNS: [&str; 3] = ["Title", "Category", "Acceptance Status"];

/// `[title, category, acceptance outcome]` for one paper.
pub fn project_row(paper: &Paper) -> [String; 3] {
    [
        paper.title().to_string(),
        paper.category().to_string(),
        paper.acceptance().to_string(),
    ]
}

pub fn project_rows(papers: &[Paper]) -> Vec<[String; 3]> {
    papers.iter().map(project_row).collect()
}
