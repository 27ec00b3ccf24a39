//! The paper entity: workflow data, derived stage, and change observers.

use std::borrow::Cow;
use std::fmt;

use tracing::{debug, warn};

use crate::core::progression::{
    PaperProgress, check_recommendation_change, check_review_replacement, check_status_seed,
};
use crate::core::types::{
    AcceptanceOutcome, Decision, PaperId, Recommendation, Review, UserId, WorkflowStatus,
};
use crate::core::workflow::{StageInputs, derive_status};
use crate::error::{LookupError, PaperError};
use crate::io::directory::{ChairDirectory, LookupMode, resolve_chair};

/// Handle returned by [`Paper::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Observer = Box<dyn Fn(&Paper)>;

/// A paper submitted for review.
///
/// Every mutator notifies registered observers once, after the change is
/// applied, in registration order. Observers receive the paper and re-read
/// whatever they need. Rejected or no-op mutations do not notify.
pub struct Paper {
    id: Option<PaperId>,
    author: Option<UserId>,
    title: String,
    keywords: String,
    abstract_text: String,
    category: String,
    content: String,
    revised_content: String,
    recommendation: Option<Recommendation>,
    reviews: Vec<Review>,
    raw_status: WorkflowStatus,
    acceptance: AcceptanceOutcome,
    observers: Vec<(Subscription, Observer)>,
    next_subscription: u64,
}

impl Paper {
    /// Blank paper with placeholder metadata.
    pub fn draft() -> Self {
        Self {
            id: None,
            author: None,
            title: "No Title Set".to_string(),
            keywords: "No Keywords Set".to_string(),
            abstract_text: "No Abstract Set".to_string(),
            category: "No category set".to_string(),
            content: String::new(),
            revised_content: String::new(),
            recommendation: None,
            reviews: Vec::new(),
            raw_status: WorkflowStatus::SubprogramChairNeeded,
            acceptance: AcceptanceOutcome::Undecided,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// New submission with no id, reviews or recommendation.
    pub fn new(
        author: UserId,
        title: impl Into<String>,
        keywords: impl Into<String>,
        abstract_text: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            author: Some(author),
            title: title.into(),
            keywords: keywords.into(),
            abstract_text: abstract_text.into(),
            category: category.into(),
            content: content.into(),
            ..Self::draft()
        }
    }

    pub fn id(&self) -> Option<PaperId> {
        self.id
    }

    pub fn author(&self) -> Option<UserId> {
        self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn revised_content(&self) -> &str {
        &self.revised_content
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    /// Stored lifecycle seed. Use [`Paper::status`] for the current stage.
    pub fn raw_status(&self) -> WorkflowStatus {
        self.raw_status
    }

    pub fn acceptance(&self) -> AcceptanceOutcome {
        self.acceptance
    }

    pub fn is_decided(&self) -> bool {
        self.raw_status.is_terminal()
    }

    pub fn has_recommendation(&self) -> bool {
        self.recommendation
            .as_ref()
            .is_some_and(Recommendation::is_present)
    }

    /// Number of real reviews attached.
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Reviews in insertion order, or a single placeholder when there are none.
    pub fn reviews(&self) -> Cow<'_, [Review]> {
        if self.reviews.is_empty() {
            Cow::Owned(vec![Review::placeholder()])
        } else {
            Cow::Borrowed(&self.reviews)
        }
    }

    /// Derive the current workflow stage.
    ///
    /// Decided papers return their decision without consulting `directory`.
    pub fn status(
        &self,
        directory: &dyn ChairDirectory,
        mode: LookupMode,
    ) -> Result<WorkflowStatus, LookupError> {
        if self.raw_status.is_terminal() {
            return Ok(self.raw_status);
        }
        let chair = resolve_chair(directory, self.id, mode)?;
        let status = derive_status(&StageInputs {
            raw_status: self.raw_status,
            chair,
            review_count: self.reviews.len(),
            has_recommendation: self.has_recommendation(),
        });
        debug!(paper = ?self.id, %status, "derived workflow status");
        Ok(status)
    }

    pub fn subscribe(&mut self, observer: impl Fn(&Paper) + 'static) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((subscription, Box::new(observer)));
        subscription
    }

    /// Returns false if the subscription was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Assign the persistent id. Re-assigning the same id is a no-op.
    pub fn assign_id(&mut self, id: PaperId) -> Result<(), PaperError> {
        match self.id {
            Some(current) if current == id => Ok(()),
            Some(current) => Err(PaperError::IdAlreadyAssigned {
                current,
                requested: id,
            }),
            None => {
                self.id = Some(id);
                self.notify();
                Ok(())
            }
        }
    }

    pub fn set_author(&mut self, author: UserId) {
        self.author = Some(author);
        self.notify();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.notify();
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.keywords = keywords.into();
        self.notify();
    }

    pub fn set_abstract(&mut self, abstract_text: impl Into<String>) {
        self.abstract_text = abstract_text.into();
        self.notify();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.notify();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.notify();
    }

    pub fn set_revised_content(&mut self, content: impl Into<String>) {
        self.revised_content = content.into();
        self.notify();
    }

    /// Overwrite the raw status seed. `None` is ignored.
    pub fn set_status(&mut self, status: Option<WorkflowStatus>) -> Result<(), PaperError> {
        let Some(status) = status else {
            return Ok(());
        };
        check_status_seed(self.raw_status, status).map_err(|msg| self.regression(msg))?;
        self.raw_status = status;
        self.notify();
        Ok(())
    }

    /// Set or clear the recommendation. Clearing is rejected once it would
    /// send the paper back to RECOMMENDATION_NEEDED, and on decided papers.
    pub fn set_recommendation(
        &mut self,
        recommendation: Option<Recommendation>,
    ) -> Result<(), PaperError> {
        let will_have = recommendation
            .as_ref()
            .is_some_and(Recommendation::is_present);
        check_recommendation_change(self.progress(), will_have)
            .map_err(|msg| self.regression(msg))?;
        self.recommendation = recommendation;
        self.notify();
        Ok(())
    }

    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.notify();
    }

    /// Replace all reviews. Rejected if the paper would fall back to an
    /// earlier stage or a decided paper would lose reviews.
    pub fn set_reviews(&mut self, reviews: Vec<Review>) -> Result<(), PaperError> {
        check_review_replacement(self.progress(), reviews.len())
            .map_err(|msg| self.regression(msg))?;
        self.reviews = reviews;
        self.notify();
        Ok(())
    }

    pub fn set_acceptance(&mut self, outcome: AcceptanceOutcome) {
        self.acceptance = outcome;
        self.notify();
    }

    /// Record the final decision, setting both the acceptance outcome and the
    /// terminal raw status. The paper must currently await a decision.
    pub fn record_decision(
        &mut self,
        decision: Decision,
        directory: &dyn ChairDirectory,
        mode: LookupMode,
    ) -> Result<(), PaperError> {
        let status = self.status(directory, mode)?;
        if status != WorkflowStatus::DecisionNeeded {
            return Err(PaperError::DecisionNotReady(status));
        }
        self.acceptance = decision.outcome();
        self.raw_status = decision.status();
        self.notify();
        Ok(())
    }

    fn progress(&self) -> PaperProgress {
        PaperProgress {
            raw_status: self.raw_status,
            review_count: self.reviews.len(),
            has_recommendation: self.has_recommendation(),
        }
    }

    fn regression(&self, msg: String) -> PaperError {
        warn!(paper = ?self.id, %msg, "rejected backward transition");
        PaperError::Regression(msg)
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer(self);
        }
    }
}

impl Default for Paper {
    fn default() -> Self {
        Self::draft()
    }
}

/// Clones carry the data but not the observers.
impl Clone for Paper {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            author: self.author,
            title: self.title.clone(),
            keywords: self.keywords.clone(),
            abstract_text: self.abstract_text.clone(),
            category: self.category.clone(),
            content: self.content.clone(),
            revised_content: self.revised_content.clone(),
            recommendation: self.recommendation.clone(),
            reviews: self.reviews.clone(),
            raw_status: self.raw_status,
            acceptance: self.acceptance,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }
}

/// Papers are equal when they are the same value or share an assigned id.
///
/// A missing id is not treated as a shared default id (such as the external
/// `0` sentinel): two distinct unpersisted papers compare unequal, and each
/// is only equal to itself.
impl PartialEq for Paper {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl Eq for Paper {}

impl fmt::Debug for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paper")
            .field("id", &self.id)
            .field("author", &self.author)
            .field("title", &self.title)
            .field("category", &self.category)
            .field("reviews", &self.reviews.len())
            .field("recommendation", &self.recommendation)
            .field("raw_status", &self.raw_status)
            .field("acceptance", &self.acceptance)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::directory::InMemoryChairDirectory;
    use crate::test_support::{
        directory_with, paper_with_id, recommendation_by, reviewed_paper, user,
    };
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counting(paper: &mut Paper) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        paper.subscribe(move |_| seen.set(seen.get() + 1));
        count
    }

    #[test]
    fn draft_uses_placeholder_metadata() {
        let paper = Paper::draft();
        assert_eq!(paper.title(), "No Title Set");
        assert_eq!(paper.keywords(), "No Keywords Set");
        assert_eq!(paper.abstract_text(), "No Abstract Set");
        assert_eq!(paper.category(), "No category set");
        assert_eq!(paper.acceptance(), AcceptanceOutcome::Undecided);
        assert_eq!(paper.id(), None);
    }

    /// Terminal raw status wins without consulting the directory.
    #[test]
    fn decided_paper_status_skips_lookup() {
        let mut paper = paper_with_id(1);
        paper.set_status(Some(WorkflowStatus::Decline)).expect("seed");
        let mut directory = InMemoryChairDirectory::new();
        directory.set_outage(Some("down".to_string()));
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::Decline)
        );
    }

    #[test]
    fn unassigned_paper_needs_chair_even_when_complete() {
        let paper = reviewed_paper(1, 3, Some(recommendation_by(5)));
        let directory = InMemoryChairDirectory::new();
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::SubprogramChairNeeded)
        );
    }

    #[test]
    fn status_walks_the_pipeline() {
        let directory = directory_with(&[(1, 9)]);
        let mut paper = paper_with_id(1);
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::ReviewsNeeded)
        );
        for n in 0..3 {
            paper.add_review(Review::new(user(20 + n), format!("review {}", n)));
        }
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::RecommendationNeeded)
        );
        paper
            .set_recommendation(Some(recommendation_by(9)))
            .expect("recommend");
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::DecisionNeeded)
        );
        paper
            .record_decision(Decision::Accept, &directory, LookupMode::Strict)
            .expect("decide");
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::Accept)
        );
        assert_eq!(paper.acceptance(), AcceptanceOutcome::Accept);
    }

    /// A recommendation without a recommender is treated as missing.
    #[test]
    fn anonymous_recommendation_still_needs_recommendation() {
        let anonymous = Recommendation {
            recommender: None,
            text: "looks fine".to_string(),
        };
        let paper = reviewed_paper(2, 3, Some(anonymous));
        let directory = directory_with(&[(2, 4)]);
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::RecommendationNeeded)
        );
    }

    #[test]
    fn strict_mode_surfaces_lookup_failure() {
        let paper = paper_with_id(3);
        let mut directory = directory_with(&[(3, 4)]);
        directory.set_outage(Some("timeout".to_string()));
        assert!(matches!(
            paper.status(&directory, LookupMode::Strict),
            Err(LookupError::Unavailable { .. })
        ));
        assert_eq!(
            paper.status(&directory, LookupMode::Permissive),
            Ok(WorkflowStatus::SubprogramChairNeeded)
        );
    }

    #[test]
    fn empty_reviews_yield_single_placeholder() {
        let paper = paper_with_id(1);
        let reviews = paper.reviews();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].to_string(), "No reviews available");
        assert_eq!(paper.review_count(), 0);
    }

    #[test]
    fn reviews_keep_insertion_order() {
        let mut paper = paper_with_id(1);
        paper.add_review(Review::new(user(3), "second reviewer first"));
        paper.add_review(Review::new(user(2), "first reviewer second"));
        let texts: Vec<String> = paper.reviews().iter().map(ToString::to_string).collect();
        assert_eq!(texts, vec!["second reviewer first", "first reviewer second"]);
    }

    #[test]
    fn equality_is_by_assigned_id() {
        let a = paper_with_id(7);
        let mut b = Paper::draft();
        b.assign_id(PaperId(7)).expect("assign");
        b.set_title("different title");
        assert_eq!(a, b);
        assert_ne!(a, paper_with_id(8));
        assert_ne!(Some(&a), None);
    }

    /// Two unpersisted papers are distinct; each still equals itself.
    #[test]
    fn unpersisted_papers_equal_only_themselves() {
        let a = Paper::draft();
        let b = Paper::draft();
        let same = &a;
        assert_ne!(a, b);
        assert!(a.eq(same));
    }

    #[test]
    fn id_cannot_be_reassigned() {
        let mut paper = paper_with_id(1);
        assert_eq!(paper.assign_id(PaperId(1)), Ok(()));
        assert_eq!(
            paper.assign_id(PaperId(2)),
            Err(PaperError::IdAlreadyAssigned {
                current: PaperId(1),
                requested: PaperId(2),
            })
        );
    }

    /// Every mutator notifies exactly once.
    #[test]
    fn each_mutator_notifies_once() {
        let mut paper = Paper::draft();
        let count = counting(&mut paper);
        let directory = directory_with(&[(1, 9)]);

        paper.assign_id(PaperId(1)).expect("id");
        paper.set_author(user(1));
        paper.set_title("t");
        paper.set_keywords("k");
        paper.set_abstract("a");
        paper.set_category("c");
        paper.set_content("body");
        paper.set_revised_content("body v2");
        paper
            .set_status(Some(WorkflowStatus::ReviewsNeeded))
            .expect("status");
        paper.add_review(Review::new(user(2), "ok"));
        paper
            .set_reviews((2..5).map(|n| Review::new(user(n), "ok")).collect())
            .expect("reviews");
        paper
            .set_recommendation(Some(recommendation_by(3)))
            .expect("recommendation");
        paper.set_acceptance(AcceptanceOutcome::Undecided);
        paper
            .record_decision(Decision::Decline, &directory, LookupMode::Strict)
            .expect("decide");

        assert_eq!(count.get(), 14);
        assert_eq!(paper.acceptance(), AcceptanceOutcome::Decline);
    }

    #[test]
    fn observers_see_state_after_mutation() {
        let mut paper = Paper::draft();
        let titles = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&titles);
        paper.subscribe(move |p| sink.borrow_mut().push(p.title().to_string()));
        paper.set_title("Fast Consensus");
        assert_eq!(*titles.borrow(), vec!["Fast Consensus".to_string()]);
    }

    #[test]
    fn observers_run_in_registration_order() {
        let mut paper = Paper::draft();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let sink = Rc::clone(&order);
            paper.subscribe(move |_| sink.borrow_mut().push(name));
        }
        paper.set_category("systems");
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribed_observer_is_not_called() {
        let mut paper = Paper::draft();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let subscription = paper.subscribe(move |_| seen.set(seen.get() + 1));
        assert!(paper.unsubscribe(subscription));
        assert!(!paper.unsubscribe(subscription));
        paper.set_title("quiet");
        assert_eq!(count.get(), 0);
    }

    /// `set_status(None)` keeps the last status and stays silent.
    #[test]
    fn set_status_none_is_silent_noop() {
        let mut paper = paper_with_id(1);
        paper
            .set_status(Some(WorkflowStatus::Accept))
            .expect("status");
        let count = counting(&mut paper);
        assert_eq!(paper.set_status(None), Ok(()));
        assert_eq!(paper.raw_status(), WorkflowStatus::Accept);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn rejected_regression_leaves_paper_unchanged() {
        let mut paper = reviewed_paper(1, 3, Some(recommendation_by(4)));
        let count = counting(&mut paper);
        let err = paper.set_reviews(Vec::new()).expect_err("regression");
        assert!(matches!(err, PaperError::Regression(_)));
        assert_eq!(paper.review_count(), 3);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn clearing_recommendation_awaiting_decision_is_rejected() {
        let directory = directory_with(&[(1, 9)]);
        let mut paper = reviewed_paper(1, 3, Some(recommendation_by(4)));
        let count = counting(&mut paper);
        let err = paper.set_recommendation(None).expect_err("regression");
        assert!(matches!(err, PaperError::Regression(_)));
        assert!(paper.has_recommendation());
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::DecisionNeeded)
        );
        assert_eq!(count.get(), 0);
    }

    /// Three reviews moved the paper to RECOMMENDATION_NEEDED; it stays there.
    #[test]
    fn dropping_reviews_awaiting_recommendation_is_rejected() {
        let directory = directory_with(&[(1, 9)]);
        let mut paper = reviewed_paper(1, 3, None);
        assert!(matches!(
            paper.set_reviews(Vec::new()),
            Err(PaperError::Regression(_))
        ));
        assert_eq!(
            paper.status(&directory, LookupMode::Strict),
            Ok(WorkflowStatus::RecommendationNeeded)
        );
        paper
            .set_reviews((10..14).map(|n| Review::new(user(n), "replacement")).collect())
            .expect("same stage");
        assert_eq!(paper.review_count(), 4);
    }

    #[test]
    fn decision_requires_decision_needed() {
        let directory = directory_with(&[(1, 2)]);
        let mut paper = reviewed_paper(1, 2, None);
        assert_eq!(
            paper.record_decision(Decision::Decline, &directory, LookupMode::Strict),
            Err(PaperError::DecisionNotReady(WorkflowStatus::ReviewsNeeded))
        );
        assert_eq!(paper.acceptance(), AcceptanceOutcome::Undecided);
    }

    #[test]
    fn clone_drops_observers() {
        let mut paper = paper_with_id(1);
        paper.subscribe(|_| {});
        let copy = paper.clone();
        assert_eq!(copy.observer_count(), 0);
        assert_eq!(copy, paper);
    }
}
