//! Signed export/import of the learner's data.
//!
//! ## Export Format
//! ```text
//! vocab-weaver-backup-{date}.json
//! {
//!   "data": { "userProfile": {..}, "vocabList": [..], "sentenceList": [..] },
//!   "signature": "<hex HMAC-SHA256 of the compact JSON of data>"
//! }
//! ```
//!
//! Imports verify the compact JSON of `data` exactly as it appears in the
//! file (key order preserved), so documents written by other serializers
//! verify as long as they signed the same compact text.
//!
//! The signature detects accidental edits and casual tampering. The key ships
//! with the app unless overridden, so it is an integrity check and not
//! authentication.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::{PracticeEntry, ProfileError, SentenceItem, UserProfile, VocabularyItem};

type HmacSha256 = Hmac<Sha256>;

/// Everything a backup carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub user_profile: UserProfile,
    pub vocab_list: Vec<VocabularyItem>,
    pub sentence_list: Vec<SentenceItem>,
}

/// Backup file contents: data plus its signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppBackup {
    pub data: BackupData,
    pub signature: String,
}

/// Backup document as read from disk, before the data is trusted
#[derive(Debug, Deserialize)]
struct SignedDocument {
    data: serde_json::Value,
    signature: String,
}

#[derive(Debug)]
pub enum BackupError {
    /// File is not a backup document
    Malformed(String),
    /// Signature does not match the data
    SignatureMismatch,
    InvalidProfile(ProfileError),
    DuplicateId(String),
    InvalidKey,
    Serialize(serde_json::Error),
}

impl BackupError {
    pub fn user_message(&self) -> String {
        match self {
            BackupError::Malformed(_) => "Invalid backup format.".to_string(),
            BackupError::SignatureMismatch => {
                "Verification failed. Backup may be tampered with.".to_string()
            }
            BackupError::InvalidProfile(e) => format!("Invalid backup: {}", e),
            BackupError::DuplicateId(id) => format!("Invalid backup: item id '{}' appears twice", id),
            BackupError::InvalidKey | BackupError::Serialize(_) => "Could not export data.".to_string(),
        }
    }
}

impl std::fmt::Display for BackupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupError::Malformed(msg) => write!(f, "Malformed backup: {}", msg),
            BackupError::SignatureMismatch => write!(f, "Backup signature mismatch"),
            BackupError::InvalidProfile(e) => write!(f, "Backup profile invalid: {}", e),
            BackupError::DuplicateId(id) => write!(f, "Backup has duplicate item id {}", id),
            BackupError::InvalidKey => write!(f, "Backup signing key rejected"),
            BackupError::Serialize(e) => write!(f, "Backup serialization failed: {}", e),
        }
    }
}

impl std::error::Error for BackupError {}

fn mac_for(key: &str, payload: &str) -> Result<HmacSha256, BackupError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| BackupError::InvalidKey)?;
    mac.update(payload.as_bytes());
    Ok(mac)
}

/// Hex HMAC-SHA256 of `payload`
pub fn sign_data(key: &str, payload: &str) -> Result<String, BackupError> {
    Ok(hex::encode(mac_for(key, payload)?.finalize().into_bytes()))
}

/// Constant-time check of a hex signature; malformed hex never verifies
pub fn verify_data(key: &str, payload: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    mac_for(key, payload).is_ok_and(|mac| mac.verify_slice(&expected).is_ok())
}

/// Compact JSON the signature covers
fn signing_payload<T: Serialize>(data: &T) -> Result<String, BackupError> {
    serde_json::to_string(data).map_err(BackupError::Serialize)
}

/// Build a pretty-printed signed backup document
pub fn export_backup(key: &str, data: BackupData) -> Result<String, BackupError> {
    let signature = sign_data(key, &signing_payload(&data)?)?;
    let backup = AppBackup { data, signature };
    serde_json::to_string_pretty(&backup).map_err(BackupError::Serialize)
}

/// Download name for a backup made on `date`
pub fn backup_filename(date: NaiveDate) -> String {
    format!("vocab-weaver-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Download name for a backup made today (UTC)
pub fn todays_backup_filename() -> String {
    backup_filename(Utc::now().date_naive())
}

fn ensure_unique_ids<T: PracticeEntry>(items: &[T]) -> Result<(), BackupError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            return Err(BackupError::DuplicateId(item.id().to_string()));
        }
    }
    Ok(())
}

/// Parse, verify and validate a backup document.
///
/// Nothing is returned unless the signature matches and the data satisfies
/// every invariant the engine relies on, so a failed import never touches
/// existing state.
pub fn import_backup(key: &str, contents: &str) -> Result<BackupData, BackupError> {
    let document: SignedDocument =
        serde_json::from_str(contents).map_err(|e| BackupError::Malformed(e.to_string()))?;

    if document.signature.trim().is_empty() {
        return Err(BackupError::Malformed("missing signature".to_string()));
    }
    // Payload comes from the parsed value, not the typed data, so field order
    // and unknown fields are exactly what the signer saw
    let payload = signing_payload(&document.data)?;
    let data: BackupData = serde_json::from_value(document.data)
        .map_err(|e| BackupError::Malformed(e.to_string()))?;
    if !verify_data(key, &payload, &document.signature) {
        tracing::warn!("Rejected backup with mismatched signature");
        return Err(BackupError::SignatureMismatch);
    }

    data.user_profile
        .validate()
        .map_err(BackupError::InvalidProfile)?;
    ensure_unique_ids(&data.vocab_list)?;
    ensure_unique_ids(&data.sentence_list)?;

    tracing::info!(
        "Imported backup: level {}, {} words, {} sentences",
        data.user_profile.level,
        data.vocab_list.len(),
        data.sentence_list.len()
    );
    Ok(data)
}
