pub mod library;
pub mod practice;
pub mod settings;

use axum::{
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;

use crate::db::{self, DbLockError, StoreError};
use crate::library::DraftError;
use crate::services::backup::BackupError;
use crate::session::SessionLockError;
use crate::srs::{level_progress, next_rank, LevelProgress, Rank};
use crate::state::AppState;

/// Error body returned by every JSON handler: `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
  pub status: StatusCode,
  pub message: String,
}

impl ApiError {
  pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status,
      message: message.into(),
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
  }
}

impl From<DbLockError> for ApiError {
  fn from(e: DbLockError) -> Self {
    ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
  }
}

impl From<SessionLockError> for ApiError {
  fn from(e: SessionLockError) -> Self {
    ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
  }
}

impl From<StoreError> for ApiError {
  fn from(e: StoreError) -> Self {
    tracing::error!("Store error: {}", e);
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
  }
}

impl From<DraftError> for ApiError {
  fn from(e: DraftError) -> Self {
    ApiError::bad_request(e.user_message())
  }
}

impl From<BackupError> for ApiError {
  fn from(e: BackupError) -> Self {
    match e {
      BackupError::InvalidKey | BackupError::Serialize(_) => {
        tracing::error!("Backup export failed: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
      }
      _ => ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.user_message()),
    }
  }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
  #[serde(flatten)]
  pub progress: LevelProgress,
  /// Next rank above the current one, if any
  pub next_rank: Option<&'static Rank>,
}

/// GET /profile
pub async fn profile(State(state): State<AppState>) -> ApiResult<ProfileResponse> {
  let conn = db::try_lock(&state.db)?;
  let profile = db::load_profile(&conn)?;

  Ok(Json(ProfileResponse {
    progress: level_progress(&profile),
    next_rank: next_rank(profile.level),
  }))
}

pub use library::{
  add_sentence, add_vocabulary, delete_sentence, delete_vocabulary, list_sentences,
  list_vocabulary,
};
pub use practice::{practice_check, practice_next, practice_view};
pub use settings::{export_data, import_data};
