//! Board load/save helpers with schema + invariant validation.
//!
//! A board is a JSON snapshot of papers and their chair assignments
//! (`.paperflow/board.json`). Identities are stored raw; `0` is the external
//! "nobody" sentinel and becomes `None` on load.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_invariants;
use crate::core::types::{
    AcceptanceOutcome, PaperId, Recommendation, Review, UserId, WorkflowStatus,
};
use crate::io::directory::InMemoryChairDirectory;
use crate::paper::Paper;

pub const BOARD_SCHEMA: &str = include_str!("../../../schemas/board/v1.schema.json");

const BOARD_VERSION: u32 = 1;

/// Papers plus the chair directory they were saved with.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub papers: Vec<Paper>,
    pub directory: InMemoryChairDirectory,
}

impl Board {
    pub fn paper(&self, id: PaperId) -> Option<&Paper> {
        self.papers.iter().find(|paper| paper.id() == Some(id))
    }

    pub fn paper_mut(&mut self, id: PaperId) -> Option<&mut Paper> {
        self.papers.iter_mut().find(|paper| paper.id() == Some(id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct BoardFile {
    version: u32,
    assignments: Vec<AssignmentRecord>,
    papers: Vec<PaperRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
struct AssignmentRecord {
    paper: u32,
    chair: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct ReviewRecord {
    reviewer: u32,
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct RecommendationRecord {
    recommender: u32,
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct PaperRecord {
    id: u32,
    author: u32,
    title: String,
    #[serde(default)]
    keywords: String,
    #[serde(default, rename = "abstract")]
    abstract_text: String,
    category: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    revised_content: String,
    #[serde(default = "default_status")]
    status: WorkflowStatus,
    #[serde(default)]
    acceptance: AcceptanceOutcome,
    #[serde(default)]
    reviews: Vec<ReviewRecord>,
    #[serde(default)]
    recommendation: Option<RecommendationRecord>,
}

fn default_status() -> WorkflowStatus {
    WorkflowStatus::SubprogramChairNeeded
}

fn raw(id: Option<UserId>) -> u32 {
    id.map_or(0, UserId::get)
}

impl PaperRecord {
    fn from_paper(paper: &Paper) -> Result<Self> {
        let id = paper
            .id()
            .ok_or_else(|| anyhow!("cannot save paper '{}' without an id", paper.title()))?;
        Ok(Self {
            id: id.0,
            author: raw(paper.author()),
            title: paper.title().to_string(),
            keywords: paper.keywords().to_string(),
            abstract_text: paper.abstract_text().to_string(),
            category: paper.category().to_string(),
            content: paper.content().to_string(),
            revised_content: paper.revised_content().to_string(),
            status: paper.raw_status(),
            acceptance: paper.acceptance(),
            reviews: paper
                .reviews()
                .iter()
                .filter(|review| !review.is_placeholder())
                .map(|review| ReviewRecord {
                    reviewer: raw(review.reviewer),
                    text: review.text.clone(),
                })
                .collect(),
            recommendation: paper.recommendation().map(|rec| RecommendationRecord {
                recommender: raw(rec.recommender),
                text: rec.text.clone(),
            }),
        })
    }

    /// Rebuild the entity. The terminal status is applied last so the
    /// progression checks see a paper still in the pipeline.
    fn into_paper(self) -> Result<Paper> {
        let mut paper = Paper::draft();
        paper.assign_id(PaperId(self.id))?;
        if let Some(author) = UserId::from_raw(self.author) {
            paper.set_author(author);
        }
        paper.set_title(self.title);
        paper.set_keywords(self.keywords);
        paper.set_abstract(self.abstract_text);
        paper.set_category(self.category);
        paper.set_content(self.content);
        paper.set_revised_content(self.revised_content);
        for review in self.reviews {
            paper.add_review(Review {
                reviewer: UserId::from_raw(review.reviewer),
                text: review.text,
            });
        }
        if let Some(rec) = self.recommendation {
            paper.set_recommendation(Some(Recommendation {
                recommender: UserId::from_raw(rec.recommender),
                text: rec.text,
            }))?;
        }
        paper.set_acceptance(self.acceptance);
        paper.set_status(Some(self.status))?;
        Ok(paper)
    }
}

/// Load and validate a board from disk (schema + invariants).
pub fn load_board(path: &Path) -> Result<Board> {
    debug!(path = %path.display(), "loading board");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read board {}", path.display()))?;
    parse_board(&contents).with_context(|| format!("load board {}", path.display()))
}

/// Parse and validate board JSON.
pub fn parse_board(contents: &str) -> Result<Board> {
    let value: Value = serde_json::from_str(contents).context("parse board json")?;
    validate_schema(&value)?;
    let file: BoardFile = serde_json::from_value(value).context("deserialize board")?;

    let papers = file
        .papers
        .into_iter()
        .map(|record| {
            let id = record.id;
            record
                .into_paper()
                .with_context(|| format!("rebuild paper {}", id))
        })
        .collect::<Result<Vec<_>>>()?;
    let assigned: Vec<PaperId> = file.assignments.iter().map(|a| PaperId(a.paper)).collect();
    let errors = validate_invariants(&papers, &assigned);
    if !errors.is_empty() {
        return Err(anyhow!("board invariants failed: {}", errors.join("; ")));
    }

    let directory =
        InMemoryChairDirectory::from_raw(file.assignments.iter().map(|a| (a.paper, a.chair)));
    debug!(papers = papers.len(), assignments = assigned.len(), "board loaded");
    Ok(Board { papers, directory })
}

/// Atomically write a board to disk (temp file + rename).
pub fn write_board(path: &Path, board: &Board) -> Result<()> {
    let file = BoardFile {
        version: BOARD_VERSION,
        assignments: board
            .directory
            .assignments()
            .into_iter()
            .map(|(paper, chair)| AssignmentRecord {
                paper: paper.0,
                chair: chair.get(),
            })
            .collect(),
        papers: board
            .papers
            .iter()
            .map(PaperRecord::from_paper)
            .collect::<Result<Vec<_>>>()?,
    };
    let mut buf = serde_json::to_string_pretty(&file).context("serialize board")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn validate_schema(board: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(BOARD_SCHEMA).context("parse board schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(board) {
        let messages = compiled
            .iter_errors(board)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "board schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("board path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp board {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace board {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::directory::{ChairDirectory, LookupMode};
    use crate::test_support::{recommendation_by, reviewed_paper, user};

    const SAMPLE: &str = r#"{
      "version": 1,
      "assignments": [{ "paper": 1, "chair": 7 }, { "paper": 2, "chair": 0 }],
      "papers": [
        {
          "id": 1,
          "author": 3,
          "title": "Lock-free queues",
          "category": "Systems",
          "reviews": [
            { "reviewer": 10, "text": "solid" },
            { "reviewer": 11, "text": "weak eval" },
            { "reviewer": 12, "text": "accept" }
          ],
          "recommendation": { "recommender": 0, "text": "pending" }
        },
        {
          "id": 2,
          "author": 3,
          "title": "Typed SQL",
          "category": "Databases",
          "status": "ACCEPT",
          "acceptance": "ACCEPT"
        }
      ]
    }"#;

    /// Sentinel ids in the file are read as absence.
    #[test]
    fn parse_maps_sentinels_to_absence() {
        let board = parse_board(SAMPLE).expect("parse");
        let first = board.paper(PaperId(1)).expect("paper 1");
        assert!(!first.has_recommendation());
        assert_eq!(
            first.status(&board.directory, LookupMode::Strict),
            Ok(WorkflowStatus::RecommendationNeeded)
        );
        assert_eq!(board.directory.assigned_chair(PaperId(2)), Ok(None));
        let second = board.paper(PaperId(2)).expect("paper 2");
        assert_eq!(second.acceptance(), AcceptanceOutcome::Accept);
        assert_eq!(second.keywords(), "");
    }

    #[test]
    fn schema_rejects_unknown_status() {
        let bad = SAMPLE.replace("\"status\": \"ACCEPT\"", "\"status\": \"DONE\"");
        let err = parse_board(&bad).expect_err("schema");
        assert!(format!("{:#}", err).contains("board schema validation failed"));
    }

    #[test]
    fn invariants_reject_duplicate_ids() {
        let dup = SAMPLE.replace("\"id\": 2", "\"id\": 1");
        let err = parse_board(&dup).expect_err("invariants");
        assert!(format!("{:#}", err).contains("duplicate paper id 1"));
    }

    /// Verifies write → load preserves papers and assignments.
    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(".paperflow").join("board.json");
        let mut board = Board::default();
        board.directory.assign(PaperId(5), user(8));
        board
            .papers
            .push(reviewed_paper(5, 3, Some(recommendation_by(8))));

        write_board(&path, &board).expect("write");
        let loaded = load_board(&path).expect("load");

        let paper = loaded.paper(PaperId(5)).expect("paper");
        assert_eq!(paper.review_count(), 3);
        assert_eq!(
            paper.status(&loaded.directory, LookupMode::Strict),
            Ok(WorkflowStatus::DecisionNeeded)
        );
    }

    #[test]
    fn empty_review_list_is_saved_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("board.json");
        let mut board = Board::default();
        board.papers.push(reviewed_paper(1, 0, None));
        write_board(&path, &board).expect("write");
        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.contains("\"reviews\": []"));
    }
}
