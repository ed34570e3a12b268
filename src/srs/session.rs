//! Quiz session state machine.
//!
//! ```text
//! Empty ──(collection gains items)──► AwaitingAnswer ──check──► ShowingFeedback
//!                                          ▲                         │
//!                                          └────────advance──────────┘
//! ```
//!
//! Sessions are plain values: every transition consumes the session and returns
//! the next one. Checking is synchronous and never observable as a state of its
//! own. Calls that are not valid in the current state return the session
//! unchanged.

use serde::Serialize;

use crate::domain::{PracticeEntry, UserProfile};
use crate::srs::progression::apply_experience;
use crate::srs::scoring::{ScoreOutcome, Verdict};
use crate::srs::selector::{order_by_proficiency, patch_proficiency, ItemFingerprint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
  /// Nothing to practice
  Empty,
  AwaitingAnswer,
  ShowingFeedback,
}

/// What the learner sees after a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
  pub verdict: Verdict,
  pub exp_delta: i64,
  pub matched_tokens: Option<usize>,
  pub reference_answer: String,
  pub levels_gained: u32,
}

/// New snapshots produced by a successful check
#[derive(Debug, Clone)]
pub struct CheckOutcome<T> {
  /// Backing collection with the scored item's proficiency patched
  pub collection: Vec<T>,
  pub profile: UserProfile,
  pub score: ScoreOutcome,
}

#[derive(Debug, Clone)]
pub struct QuizSession<T> {
  working_list: Vec<T>,
  fingerprint: ItemFingerprint,
  index: usize,
  answer: String,
  feedback: Option<Feedback>,
}

impl<T: PracticeEntry> Default for QuizSession<T> {
  fn default() -> Self {
    Self {
      working_list: Vec::new(),
      fingerprint: ItemFingerprint::default(),
      index: 0,
      answer: String::new(),
      feedback: None,
    }
  }
}

impl<T: PracticeEntry> QuizSession<T> {
  /// Start a session over `collection`, weakest items first
  pub fn new(collection: &[T]) -> Self {
    Self {
      working_list: order_by_proficiency(collection),
      fingerprint: ItemFingerprint::of(collection),
      ..Self::default()
    }
  }

  /// Follow changes to the backing collection.
  ///
  /// Rebuilds (and restarts at the first item) only when items were added or
  /// removed; proficiency edits alone keep the current order and position.
  pub fn sync(self, collection: &[T]) -> Self {
    let fingerprint = ItemFingerprint::of(collection);
    if fingerprint == self.fingerprint {
      return self;
    }

    tracing::debug!(
      "Item set changed ({} -> {} items), rebuilding working list",
      self.fingerprint.len(),
      fingerprint.len()
    );
    Self::new(collection)
  }

  pub fn state(&self) -> SessionState {
    if self.working_list.is_empty() {
      SessionState::Empty
    } else if self.feedback.is_some() {
      SessionState::ShowingFeedback
    } else {
      SessionState::AwaitingAnswer
    }
  }

  pub fn current(&self) -> Option<&T> {
    self.working_list.get(self.index)
  }

  pub fn working_list(&self) -> &[T] {
    &self.working_list
  }

  pub fn index(&self) -> usize {
    self.index
  }

  /// 1-based question number and total
  pub fn position(&self) -> Option<(usize, usize)> {
    self.current().map(|_| (self.index + 1, self.working_list.len()))
  }

  pub fn answer(&self) -> &str {
    &self.answer
  }

  pub fn feedback(&self) -> Option<&Feedback> {
    self.feedback.as_ref()
  }

  pub fn last_verdict(&self) -> Option<Verdict> {
    self.feedback.as_ref().map(|f| f.verdict)
  }

  /// EXP change from the last check, 0 before any check
  pub fn last_exp_delta(&self) -> i64 {
    self.feedback.as_ref().map_or(0, |f| f.exp_delta)
  }

  /// Replace the in-progress answer; ignored unless awaiting an answer
  pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
    if self.state() == SessionState::AwaitingAnswer {
      self.answer = answer.into();
    }
    self
  }

  /// Whether `check` would score the current answer
  pub fn can_check(&self) -> bool {
    self.state() == SessionState::AwaitingAnswer
      && self
        .current()
        .is_some_and(|item| item.is_complete_answer(&self.answer))
  }

  /// Score the current answer.
  ///
  /// On success returns the session in `ShowingFeedback` together with the
  /// patched backing collection and the updated profile. Returns `None`
  /// alongside the untouched session when the answer cannot be checked.
  pub fn check(mut self, collection: &[T], profile: &UserProfile) -> (Self, Option<CheckOutcome<T>>) {
    if !self.can_check() {
      return (self, None);
    }
    let Some(item) = self.current() else {
      return (self, None);
    };

    let score = item.score(&self.answer);
    let id = item.id().to_string();
    let reference_answer = item.reference_answer().to_string();
    let progression = apply_experience(profile, score.exp_delta);

    tracing::debug!(
      "Checked item {}: {:?}, {:+} EXP, proficiency {} -> {}",
      id,
      score.verdict,
      score.exp_delta,
      item.proficiency(),
      score.proficiency
    );

    self.working_list = patch_proficiency(&self.working_list, &id, score.proficiency);
    self.feedback = Some(Feedback {
      verdict: score.verdict,
      exp_delta: score.exp_delta,
      matched_tokens: score.matched_tokens,
      reference_answer,
      levels_gained: progression.levels_gained,
    });

    let outcome = CheckOutcome {
      collection: patch_proficiency(collection, &id, score.proficiency),
      profile: progression.profile,
      score,
    };
    (self, Some(outcome))
  }

  /// Move to the next item, wrapping to the start after the last one
  pub fn advance(mut self) -> Self {
    if self.state() != SessionState::ShowingFeedback {
      return self;
    }
    self.index = (self.index + 1) % self.working_list.len();
    self.answer.clear();
    self.feedback = None;
    self
  }
}
