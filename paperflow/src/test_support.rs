//! Test-only helpers for constructing papers and collaborators.

use chrono::{DateTime, TimeZone, Utc};

use crate::core::types::{PaperId, Recommendation, Review, UserId};
use crate::io::directory::InMemoryChairDirectory;
use crate::paper::Paper;

/// Non-zero user id. Panics on `0`.
pub fn user(raw: u32) -> UserId {
    UserId::from_raw(raw).expect("test user ids are non-zero")
}

/// Fixed submission deadline used across tests.
pub fn deadline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59)
        .single()
        .expect("valid deadline")
}

/// Create a deterministic persisted paper with no reviews.
pub fn paper_with_id(id: u32) -> Paper {
    let mut paper = Paper::new(
        user(100),
        format!("Paper {}", id),
        "keywords",
        "abstract",
        "category",
        "content",
    );
    paper.assign_id(PaperId(id)).expect("fresh paper");
    paper
}

pub fn recommendation_by(recommender: u32) -> Recommendation {
    Recommendation::new(user(recommender), "recommend")
}

/// Persisted paper with `reviews` reviews and an optional recommendation.
pub fn reviewed_paper(id: u32, reviews: u32, recommendation: Option<Recommendation>) -> Paper {
    let mut paper = paper_with_id(id);
    for n in 0..reviews {
        paper.add_review(Review::new(user(200 + n), format!("review {}", n + 1)));
    }
    if recommendation.is_some() {
        paper
            .set_recommendation(recommendation)
            .expect("undecided paper accepts recommendation");
    }
    paper
}

/// Directory with raw `(paper, chair)` assignments.
pub fn directory_with(pairs: &[(u32, u32)]) -> InMemoryChairDirectory {
    InMemoryChairDirectory::from_raw(pairs.iter().copied())
}
