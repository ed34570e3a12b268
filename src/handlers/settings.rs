//! Backup export and import

use axum::{
  extract::State,
  http::header,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;

use crate::db;
use crate::services::backup::{self, BackupData};
use crate::state::AppState;

use super::{ApiError, ApiResult};

/// GET /settings/export
///
/// Returns the signed backup as a JSON file download.
pub async fn export_data(State(state): State<AppState>) -> Result<Response, ApiError> {
  let data = {
    let conn = db::try_lock(&state.db)?;
    BackupData {
      user_profile: db::load_profile(&conn)?,
      vocab_list: db::load_vocabulary(&conn)?,
      sentence_list: db::load_sentences(&conn)?,
    }
  };

  let contents = backup::export_backup(&state.backup_key, data)?;
  let filename = backup::todays_backup_filename();
  tracing::info!("Exported backup {}", filename);

  Ok(
    (
      [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
          header::CONTENT_DISPOSITION,
          format!("attachment; filename=\"{}\"", filename),
        ),
      ],
      contents,
    )
      .into_response(),
  )
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
  pub level: u32,
  pub vocabulary: usize,
  pub sentences: usize,
}

/// POST /settings/import
///
/// Body is the backup file contents. Existing data is replaced only when the
/// backup verifies.
pub async fn import_data(State(state): State<AppState>, body: String) -> ApiResult<ImportSummary> {
  let data = backup::import_backup(&state.backup_key, &body)?;

  let mut conn = db::try_lock(&state.db)?;
  db::replace_all(&mut conn, &data.user_profile, &data.vocab_list, &data.sentence_list)?;
  state.sessions.reset()?;

  Ok(Json(ImportSummary {
    level: data.user_profile.level,
    vocabulary: data.vocab_list.len(),
    sentences: data.sentence_list.len(),
  }))
}
