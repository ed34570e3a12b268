pub mod schema;
pub mod store;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use schema::run_migrations;
pub use store::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).log_warn("Could not create database directory");
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    std::fs::copy(path, &backup_path).log_warn("Could not create database backup");
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// In-memory database with migrations applied
pub fn init_memory_db() -> Result<DbPool> {
  let conn = Connection::open_in_memory()?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::UserProfile;
  use tempfile::TempDir;

  #[test]
  fn test_init_db_creates_dirs_and_persists() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("app.db");

    {
      let pool = init_db(&path).unwrap();
      let conn = try_lock(&pool).unwrap();
      save_profile(&conn, &UserProfile::new(4, 12)).unwrap();
    }

    let pool = init_db(&path).unwrap();
    let conn = try_lock(&pool).unwrap();
    assert_eq!(load_profile(&conn).unwrap(), UserProfile::new(4, 12));
    assert!(path.with_extension("db.backup").exists());
  }

  #[test]
  fn test_log_warn_helpers() {
    let ok: std::result::Result<u8, String> = Ok(3);
    let err: std::result::Result<u8, String> = Err("boom".into());
    assert_eq!(ok.log_warn("ctx"), Some(3));
    assert_eq!(err.clone().log_warn("ctx"), None);
    assert_eq!(err.log_warn_default("ctx"), 0);
  }

  #[test]
  fn test_try_lock_reports_poisoned_pool() {
    let pool = init_memory_db().unwrap();
    let poisoned = pool.clone();
    let _ = std::thread::spawn(move || {
      let _guard = poisoned.lock().unwrap();
      panic!("poison");
    })
    .join();
    assert!(try_lock(&pool).is_err());
  }
}
