//! Vocabulary and sentence list endpoints

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  Json,
};
use serde::Deserialize;

use crate::db;
use crate::domain::{PracticeEntry, SentenceItem, VocabularyItem};
use crate::library::{self, SentenceDraft, VocabularyDraft};
use crate::state::AppState;

use super::{ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
  #[serde(default)]
  pub search: String,
}

/// GET /vocabulary?search=
pub async fn list_vocabulary(
  State(state): State<AppState>,
  Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<VocabularyItem>> {
  let conn = db::try_lock(&state.db)?;
  let items = db::load_vocabulary(&conn)?;
  let matches = library::search_vocabulary(&items, &query.search)
    .into_iter()
    .cloned()
    .collect();
  Ok(Json(matches))
}

/// POST /vocabulary
pub async fn add_vocabulary(
  State(state): State<AppState>,
  Json(draft): Json<VocabularyDraft>,
) -> Result<(StatusCode, Json<VocabularyItem>), ApiError> {
  let conn = db::try_lock(&state.db)?;
  let items = db::load_vocabulary(&conn)?;
  let updated = library::add_vocabulary(&items, draft)?;
  db::save_vocabulary(&conn, &updated)?;

  let created = updated
    .into_iter()
    .next()
    .ok_or_else(|| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Item was not saved"))?;
  Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /vocabulary/{id}
pub async fn delete_vocabulary(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let conn = db::try_lock(&state.db)?;
  let items = db::load_vocabulary(&conn)?;
  let remaining = remove(&items, &id)?;
  db::save_vocabulary(&conn, &remaining)?;
  Ok(StatusCode::NO_CONTENT)
}

/// GET /sentences
pub async fn list_sentences(State(state): State<AppState>) -> ApiResult<Vec<SentenceItem>> {
  let conn = db::try_lock(&state.db)?;
  Ok(Json(db::load_sentences(&conn)?))
}

/// POST /sentences
pub async fn add_sentence(
  State(state): State<AppState>,
  Json(draft): Json<SentenceDraft>,
) -> Result<(StatusCode, Json<SentenceItem>), ApiError> {
  let conn = db::try_lock(&state.db)?;
  let items = db::load_sentences(&conn)?;
  let updated = library::add_sentence(&items, draft)?;
  db::save_sentences(&conn, &updated)?;

  let created = updated
    .into_iter()
    .next()
    .ok_or_else(|| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Item was not saved"))?;
  Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /sentences/{id}
pub async fn delete_sentence(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let conn = db::try_lock(&state.db)?;
  let items = db::load_sentences(&conn)?;
  let remaining = remove(&items, &id)?;
  db::save_sentences(&conn, &remaining)?;
  Ok(StatusCode::NO_CONTENT)
}

fn remove<T: PracticeEntry>(items: &[T], id: &str) -> Result<Vec<T>, ApiError> {
  let remaining = library::delete_item(items, id);
  if remaining.len() == items.len() {
    return Err(ApiError::not_found(format!("No item with id '{}'", id)));
  }
  tracing::info!("Deleted item {}", id);
  Ok(remaining)
}
