//! In-memory storage for the live practice sessions.
//!
//! The server practices for a single local learner, so there is exactly one
//! vocabulary session and one sentence session. Each sits behind its own lock
//! and is taken out, transitioned and put back for every request.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::db::{self, StoreResult};
use crate::domain::{PracticeEntry, SentenceItem, VocabularyItem};
use crate::srs::QuizSession;

#[derive(Debug, Default)]
pub struct PracticeSessions {
  vocabulary: Mutex<QuizSession<VocabularyItem>>,
  sentences: Mutex<QuizSession<SentenceItem>>,
}

/// Error returned when a session lock was poisoned
#[derive(Debug)]
pub struct SessionLockError;

impl std::fmt::Display for SessionLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Practice session unavailable")
  }
}

impl std::error::Error for SessionLockError {}

/// A backing collection that can be practiced and persisted
pub trait PracticeCollection: PracticeEntry + Serialize + Send + Sized + 'static {
  /// Label used in logs
  const LABEL: &'static str;

  fn session_slot(sessions: &PracticeSessions) -> &Mutex<QuizSession<Self>>;

  /// Characters expected in the answer, for fixed-length answers only
  fn answer_slots(&self) -> Option<usize>;

  fn load(conn: &Connection) -> StoreResult<Vec<Self>>;

  fn save(conn: &Connection, items: &[Self]) -> StoreResult<()>;
}

impl PracticeCollection for VocabularyItem {
  const LABEL: &'static str = "vocabulary";

  fn session_slot(sessions: &PracticeSessions) -> &Mutex<QuizSession<Self>> {
    &sessions.vocabulary
  }

  fn answer_slots(&self) -> Option<usize> {
    Some(self.target_word.trim().nfc().count())
  }

  fn load(conn: &Connection) -> StoreResult<Vec<Self>> {
    db::load_vocabulary(conn)
  }

  fn save(conn: &Connection, items: &[Self]) -> StoreResult<()> {
    db::save_vocabulary(conn, items)
  }
}

impl PracticeCollection for SentenceItem {
  const LABEL: &'static str = "sentence";

  fn session_slot(sessions: &PracticeSessions) -> &Mutex<QuizSession<Self>> {
    &sessions.sentences
  }

  fn answer_slots(&self) -> Option<usize> {
    None
  }

  fn load(conn: &Connection) -> StoreResult<Vec<Self>> {
    db::load_sentences(conn)
  }

  fn save(conn: &Connection, items: &[Self]) -> StoreResult<()> {
    db::save_sentences(conn, items)
  }
}

impl PracticeSessions {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock<T: PracticeCollection>(&self) -> Result<MutexGuard<'_, QuizSession<T>>, SessionLockError> {
    T::session_slot(self).lock().map_err(|_: PoisonError<_>| {
      tracing::error!("{} session mutex poisoned", T::LABEL);
      SessionLockError
    })
  }

  /// Run one transition on the session for `T` and store the result
  pub fn update<T, R>(
    &self,
    transition: impl FnOnce(QuizSession<T>) -> (QuizSession<T>, R),
  ) -> Result<R, SessionLockError>
  where
    T: PracticeCollection,
  {
    let mut slot = self.lock::<T>()?;
    let (next, result) = transition(std::mem::take(&mut *slot));
    *slot = next;
    Ok(result)
  }

  /// Run a fallible transition; the stored session only changes on success
  pub fn try_update<T, R, E>(
    &self,
    transition: impl FnOnce(QuizSession<T>) -> Result<(QuizSession<T>, R), E>,
  ) -> Result<R, E>
  where
    T: PracticeCollection,
    E: From<SessionLockError>,
  {
    let mut slot = self.lock::<T>()?;
    let (next, result) = transition(slot.clone())?;
    *slot = next;
    Ok(result)
  }

  /// Drop both sessions so the next request rebuilds them from storage
  pub fn reset(&self) -> Result<(), SessionLockError> {
    self.update::<VocabularyItem, _>(|_| (QuizSession::default(), ()))?;
    self.update::<SentenceItem, _>(|_| (QuizSession::default(), ()))?;
    tracing::debug!("Practice sessions reset");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::srs::SessionState;

  fn sentence(id: &str) -> SentenceItem {
    SentenceItem::new(id.to_string(), "nguồn".to_string(), "the cat".to_string())
  }

  #[test]
  fn test_update_persists_session_between_calls() {
    let sessions = PracticeSessions::new();
    let items = vec![sentence("a"), sentence("b")];

    let state = sessions
      .update::<SentenceItem, _>(|s| {
        let s = s.sync(&items).with_answer("the cat");
        let state = s.state();
        (s, state)
      })
      .unwrap();
    assert_eq!(state, SessionState::AwaitingAnswer);

    let answer = sessions
      .update::<SentenceItem, _>(|s| {
        let answer = s.answer().to_string();
        (s, answer)
      })
      .unwrap();
    assert_eq!(answer, "the cat");

    // Vocabulary session is independent
    let vocab_state = sessions
      .update::<VocabularyItem, _>(|s| {
        let state = s.state();
        (s, state)
      })
      .unwrap();
    assert_eq!(vocab_state, SessionState::Empty);
  }

  #[test]
  fn test_try_update_keeps_session_on_error() {
    let sessions = PracticeSessions::new();
    let items = vec![sentence("a")];
    sessions
      .update::<SentenceItem, _>(|s| (s.sync(&items).with_answer("draft"), ()))
      .unwrap();

    let result: Result<(), SessionLockError> =
      sessions.try_update::<SentenceItem, _, _>(|s| {
        let _ = s.with_answer("the cat").check(&items, &Default::default());
        Err(SessionLockError)
      });
    assert!(result.is_err());

    let (state, answer) = sessions
      .update::<SentenceItem, _>(|s| {
        let seen = (s.state(), s.answer().to_string());
        (s, seen)
      })
      .unwrap();
    assert_eq!(state, SessionState::AwaitingAnswer);
    assert_eq!(answer, "draft");

    sessions
      .try_update::<SentenceItem, _, SessionLockError>(|s| Ok((s.with_answer("done"), ())))
      .unwrap();
    let answer = sessions
      .update::<SentenceItem, _>(|s| {
        let answer = s.answer().to_string();
        (s, answer)
      })
      .unwrap();
    assert_eq!(answer, "done");
  }

  #[test]
  fn test_answer_slots_count_composed_characters() {
    let mut item = VocabularyItem::new(
      "v1".to_string(),
      "Ly cà phê".to_string(),
      "phe\u{302}".to_string(),
      "phê".to_string(),
    );
    assert_eq!(item.answer_slots(), Some(3));
    item.target_word = " phê ".to_string();
    assert_eq!(item.answer_slots(), Some(3));
  }

  #[test]
  fn test_reset_clears_sessions() {
    let sessions = PracticeSessions::new();
    let items = vec![sentence("a")];
    sessions
      .update::<SentenceItem, _>(|s| (s.sync(&items), ()))
      .unwrap();
    sessions.reset().unwrap();

    let state = sessions
      .update::<SentenceItem, _>(|s| {
        let state = s.state();
        (s, state)
      })
      .unwrap();
    assert_eq!(state, SessionState::Empty);
  }
}
