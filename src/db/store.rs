//! Learner state documents: profile and the two item lists

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{SentenceItem, UserProfile, VocabularyItem};

pub const VOCAB_LIST_KEY: &str = "vocabList";
pub const SENTENCE_LIST_KEY: &str = "sentenceList";
pub const USER_PROFILE_KEY: &str = "userProfile";

#[derive(Debug)]
pub enum StoreError {
  Sqlite(rusqlite::Error),
  /// Stored document could not be (de)serialized
  Json { key: String, source: serde_json::Error },
}

impl StoreError {
  pub fn user_message(&self) -> String {
    match self {
      StoreError::Sqlite(_) => "Could not access saved data. Please try again.".to_string(),
      StoreError::Json { .. } => "Saved data is unreadable.".to_string(),
    }
  }
}

impl std::fmt::Display for StoreError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      StoreError::Sqlite(e) => write!(f, "Database error: {}", e),
      StoreError::Json { key, source } => write!(f, "Stored value '{}' invalid: {}", key, source),
    }
  }
}

impl std::error::Error for StoreError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      StoreError::Sqlite(e) => Some(e),
      StoreError::Json { source, .. } => Some(source),
    }
  }
}

impl From<rusqlite::Error> for StoreError {
  fn from(e: rusqlite::Error) -> Self {
    StoreError::Sqlite(e)
  }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub fn get_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
  conn
    .query_row("SELECT value FROM app_state WHERE key = ?1", params![key], |row| row.get(0))
    .optional()
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT OR REPLACE INTO app_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
    params![key, value, Utc::now().to_rfc3339()],
  )?;
  Ok(())
}

fn load_json<T: DeserializeOwned + Default>(conn: &Connection, key: &str) -> StoreResult<T> {
  match get_value(conn, key)? {
    Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Json {
      key: key.to_string(),
      source,
    }),
    None => Ok(T::default()),
  }
}

fn save_json<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> StoreResult<()> {
  let raw = serde_json::to_string(value).map_err(|source| StoreError::Json {
    key: key.to_string(),
    source,
  })?;
  set_value(conn, key, &raw)?;
  Ok(())
}

pub fn load_vocabulary(conn: &Connection) -> StoreResult<Vec<VocabularyItem>> {
  load_json(conn, VOCAB_LIST_KEY)
}

pub fn save_vocabulary(conn: &Connection, items: &[VocabularyItem]) -> StoreResult<()> {
  save_json(conn, VOCAB_LIST_KEY, items)
}

pub fn load_sentences(conn: &Connection) -> StoreResult<Vec<SentenceItem>> {
  load_json(conn, SENTENCE_LIST_KEY)
}

pub fn save_sentences(conn: &Connection, items: &[SentenceItem]) -> StoreResult<()> {
  save_json(conn, SENTENCE_LIST_KEY, items)
}

/// Stored profile; a missing or invalid one falls back to level 1
pub fn load_profile(conn: &Connection) -> StoreResult<UserProfile> {
  let profile: UserProfile = load_json(conn, USER_PROFILE_KEY)?;
  if let Err(e) = profile.validate() {
    tracing::warn!("Ignoring stored profile: {}", e);
    return Ok(UserProfile::default());
  }
  Ok(profile)
}

pub fn save_profile(conn: &Connection, profile: &UserProfile) -> StoreResult<()> {
  save_json(conn, USER_PROFILE_KEY, profile)
}

/// Replace all learner state in one transaction
pub fn replace_all(
  conn: &mut Connection,
  profile: &UserProfile,
  vocabulary: &[VocabularyItem],
  sentences: &[SentenceItem],
) -> StoreResult<()> {
  let tx = conn.transaction()?;
  save_profile(&tx, profile)?;
  save_vocabulary(&tx, vocabulary)?;
  save_sentences(&tx, sentences)?;
  tx.commit()?;
  Ok(())
}
