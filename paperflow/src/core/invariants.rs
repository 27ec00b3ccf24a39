//! Semantic invariants of a paper board not expressible via JSON Schema.

use std::collections::HashSet;

use crate::core::types::PaperId;
use crate::paper::Paper;

/// Check board invariants:
/// - Every paper has an id
/// - No duplicate paper ids
/// - At most one chair assignment per paper
pub fn validate_invariants(papers: &[Paper], assigned: &[PaperId]) -> Vec<String> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (index, paper) in papers.iter().enumerate() {
        match paper.id() {
            None => errors.push(format!("papers[{}]: missing id", index)),
            Some(id) => {
                if !seen.insert(id) {
                    errors.push(format!("duplicate paper id {} at papers[{}]", id, index));
                }
            }
        }
    }

    let mut assigned_seen = HashSet::new();
    for id in assigned {
        if !assigned_seen.insert(*id) {
            errors.push(format!("paper {} has more than one chair assignment", id));
        }
    }

    errors
}
