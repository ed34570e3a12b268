//! Practice endpoints.
//!
//! Every request loads the backing collection, syncs the live session with it
//! and applies one transition. Checks that score an answer write the patched
//! collection and the new profile back before responding.

use axum::{
  extract::{Path, State},
  Json,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, StoreResult};
use crate::domain::{Proficiency, SentenceItem, VocabularyItem};
use crate::session::PracticeCollection;
use crate::srs::{level_progress, CheckOutcome, Feedback, LevelProgress, QuizSession, SessionState};
use crate::state::AppState;

use super::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
  Vocab,
  Sentence,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
  pub answer: String,
}

/// Everything the practice screen needs
#[derive(Debug, Serialize)]
pub struct PracticeView {
  pub mode: PracticeMode,
  pub state: SessionState,
  /// 1-based question number
  pub position: Option<usize>,
  pub total: usize,
  pub item_id: Option<String>,
  pub prompt: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub answer_length: Option<usize>,
  pub proficiency: Option<Proficiency>,
  pub answer: String,
  pub can_check: bool,
  pub feedback: Option<Feedback>,
  pub profile: LevelProgress,
}

fn build_view<T: PracticeCollection>(
  mode: PracticeMode,
  session: &QuizSession<T>,
  profile: LevelProgress,
) -> PracticeView {
  let current = session.current();
  PracticeView {
    mode,
    state: session.state(),
    position: session.position().map(|(n, _)| n),
    total: session.working_list().len(),
    item_id: current.map(|i| i.id().to_string()),
    prompt: current.map(|i| i.prompt()),
    answer_length: current.and_then(|i| i.answer_slots()),
    proficiency: current.map(|i| i.proficiency()),
    answer: session.answer().to_string(),
    can_check: session.can_check(),
    feedback: session.feedback().cloned(),
    profile,
  }
}

fn view<T: PracticeCollection>(state: &AppState, mode: PracticeMode) -> Result<PracticeView, ApiError> {
  let conn = db::try_lock(&state.db)?;
  let items = T::load(&conn)?;
  let profile = db::load_profile(&conn)?;

  let view = state.sessions.update::<T, _>(|session| {
    let session = session.sync(&items);
    let view = build_view(mode, &session, level_progress(&profile));
    (session, view)
  })?;
  Ok(view)
}

/// Write a scored check back in one transaction
fn save_outcome<T: PracticeCollection>(conn: &mut Connection, outcome: &CheckOutcome<T>) -> StoreResult<()> {
  let tx = conn.transaction()?;
  T::save(&tx, &outcome.collection)?;
  db::save_profile(&tx, &outcome.profile)?;
  tx.commit()?;
  Ok(())
}

fn check<T: PracticeCollection>(
  state: &AppState,
  mode: PracticeMode,
  answer: String,
) -> Result<PracticeView, ApiError> {
  let mut conn = db::try_lock(&state.db)?;
  let items = T::load(&conn)?;
  let profile = db::load_profile(&conn)?;

  // The session moves to feedback only once the score is committed
  state.sessions.try_update::<T, _, ApiError>(|session| {
    let (session, outcome) = session.sync(&items).with_answer(answer).check(&items, &profile);
    let profile = match outcome {
      Some(outcome) => {
        save_outcome(&mut conn, &outcome)?;
        outcome.profile
      }
      // Incomplete answers leave storage as it was
      None => profile,
    };
    let view = build_view(mode, &session, level_progress(&profile));
    Ok((session, view))
  })
}

fn advance<T: PracticeCollection>(state: &AppState, mode: PracticeMode) -> Result<PracticeView, ApiError> {
  let conn = db::try_lock(&state.db)?;
  let items = T::load(&conn)?;
  let profile = db::load_profile(&conn)?;

  let view = state.sessions.update::<T, _>(|session| {
    let session = session.sync(&items).advance();
    let view = build_view(mode, &session, level_progress(&profile));
    (session, view)
  })?;
  Ok(view)
}

/// GET /practice/{mode}
pub async fn practice_view(
  State(state): State<AppState>,
  Path(mode): Path<PracticeMode>,
) -> ApiResult<PracticeView> {
  let view = match mode {
    PracticeMode::Vocab => view::<VocabularyItem>(&state, mode)?,
    PracticeMode::Sentence => view::<SentenceItem>(&state, mode)?,
  };
  Ok(Json(view))
}

/// POST /practice/{mode}/check
pub async fn practice_check(
  State(state): State<AppState>,
  Path(mode): Path<PracticeMode>,
  Json(request): Json<CheckRequest>,
) -> ApiResult<PracticeView> {
  let view = match mode {
    PracticeMode::Vocab => check::<VocabularyItem>(&state, mode, request.answer)?,
    PracticeMode::Sentence => check::<SentenceItem>(&state, mode, request.answer)?,
  };
  Ok(Json(view))
}

/// POST /practice/{mode}/next
pub async fn practice_next(
  State(state): State<AppState>,
  Path(mode): Path<PracticeMode>,
) -> ApiResult<PracticeView> {
  let view = match mode {
    PracticeMode::Vocab => advance::<VocabularyItem>(&state, mode)?,
    PracticeMode::Sentence => advance::<SentenceItem>(&state, mode)?,
  };
  Ok(Json(view))
}
