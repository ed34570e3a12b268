//! Application configuration constants.
//!
//! Game tuning values live here next to the runtime settings (database path,
//! backup signing key, server address) so scoring code never carries magic numbers.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== File Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    backup: Option<BackupConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BackupConfig {
    key: Option<String>,
}

/// Read config.toml from the working directory, if present and well-formed
fn read_config_file() -> AppConfig {
    match std::fs::read_to_string("config.toml") {
        Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed config.toml: {}", e);
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

// ==================== Database Configuration ====================

/// Default location of the learner's database
pub const DEFAULT_DATABASE_PATH: &str = "data/vocab_weaver.db";

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Some(path) = read_config_file().database.and_then(|db| db.path) {
        tracing::info!("Using database from config.toml: {}", path);
        return PathBuf::from(path);
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(DEFAULT_DATABASE_PATH);
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Backup Configuration ====================

/// Built-in HMAC key for backup files.
///
/// Shipped with the application, so it only guards against casual edits of an
/// exported file, not against a determined attacker.
pub const DEFAULT_BACKUP_KEY: &str = "vocab-weaver-hmac-integrity-key-3987d6";

/// Load backup signing key with priority: config.toml > .env > built-in
pub fn load_backup_key() -> String {
    let _ = dotenvy::dotenv();

    if let Some(key) = read_config_file().backup.and_then(|b| b.key) {
        return key;
    }

    std::env::var("BACKUP_SIGNING_KEY").unwrap_or_else(|_| DEFAULT_BACKUP_KEY.to_string())
}

// ==================== Server Configuration ====================

/// Server address to bind to (local, single learner)
pub const SERVER_ADDR: &str = "127.0.0.1";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

/// Server port, overridable with PORT
pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(SERVER_PORT)
}

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, server_port())
}

// ==================== Progression Configuration ====================

/// EXP needed per level: reaching level N+1 from N costs `EXP_PER_LEVEL * N`
pub const EXP_PER_LEVEL: u64 = 50;

/// Lowest proficiency; every new item starts here
pub const MIN_PROFICIENCY: u8 = 1;

/// Highest proficiency (mastered)
pub const MAX_PROFICIENCY: u8 = 5;

// ==================== Scoring Configuration ====================

/// Base EXP for a vocabulary item before the proficiency discount
pub const WORD_BASE_EXP: i64 = 10;

/// EXP discount per proficiency step
pub const WORD_EXP_PER_PROFICIENCY: i64 = 2;

/// Fraction of the base EXP lost on a wrong vocabulary answer
pub const WRONG_ANSWER_PENALTY: f64 = 0.8;

/// Bonus fraction of matched tokens for a fully correct sentence
pub const FULL_SENTENCE_BONUS: f64 = 0.5;

/// Punctuation ignored when comparing sentence answers
pub const IGNORED_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// Replacement for the target word in a fill-in-the-blank prompt
pub const BLANK_PLACEHOLDER: &str = "______";

// ==================== Library Configuration ====================

/// Length of the random suffix appended to new item identifiers
pub const ID_SUFFIX_LEN: usize = 8;
