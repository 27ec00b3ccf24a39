//! Status and table reports for `paperflow status` and `paperflow table`.

use crate::core::projection::{PAPER_COLUMNS, project_rows};
use crate::core::types::{PaperId, WorkflowStatus};
use crate::error::LookupError;
use crate::io::directory::{ChairDirectory, LookupMode};
use crate::paper::Paper;

/// Derived stage of one paper for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub id: Option<PaperId>,
    pub title: String,
    pub status: WorkflowStatus,
}

/// Derive the stage of every paper, in input order.
pub fn status_lines(
    papers: &[Paper],
    directory: &dyn ChairDirectory,
    mode: LookupMode,
) -> Result<Vec<StatusLine>, LookupError> {
    papers
        .iter()
        .map(|paper| -> Result<StatusLine, LookupError> {
            Ok(StatusLine {
                id: paper.id(),
                title: paper.title().to_string(),
                status: paper.status(directory, mode)?,
            })
        })
        .collect()
}

/// Tab-separated `id status title` lines.
pub fn render_status(lines: &[StatusLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let id = line.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            format!("{}\t{}\t{}\n", id, line.status, line.title)
        })
        .collect()
}

/// Tab-separated table with the fixed column header.
pub fn render_table(papers: &[Paper]) -> String {
    let mut out = PAPER_COLUMNS.join("\t");
    out.push('\n');
    for row in project_rows(papers) {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AcceptanceOutcome;
    use crate::test_support::{directory_with, paper_with_id, recommendation_by, reviewed_paper};

    #[test]
    fn status_lines_follow_input_order() {
        let papers = vec![
            reviewed_paper(2, 3, Some(recommendation_by(9))),
            paper_with_id(1),
        ];
        let directory = directory_with(&[(2, 9)]);
        let lines = status_lines(&papers, &directory, LookupMode::Strict).expect("status");
        assert_eq!(
            render_status(&lines),
            "2\tDECISION_NEEDED\tPaper 2\n1\tSUBPROGRAM_CHAIR_NEEDED\tPaper 1\n"
        );
    }

    #[test]
    fn strict_failure_aborts_report() {
        let papers = vec![paper_with_id(1)];
        let mut directory = directory_with(&[]);
        directory.set_outage(Some("down".to_string()));
        assert!(status_lines(&papers, &directory, LookupMode::Strict).is_err());
    }

    #[test]
    fn table_has_header_then_rows() {
        let mut paper = paper_with_id(1);
        paper.set_acceptance(AcceptanceOutcome::Decline);
        assert_eq!(
            render_table(&[paper]),
            "Title\tCategory\tAcceptance Status\nPaper 1\tcategory\tDECLINE\n"
        );
    }
}
