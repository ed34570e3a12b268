//! Contract for the text-generation collaborator used by the add flows.
//!
//! Practice and scoring never talk to the assistant; only drafting new
//! library entries does. Network-backed implementations live outside this
//! crate and plug in through [`LanguageAssistant`].

use serde::{Deserialize, Serialize};

/// Spelling verdict for a selected word
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellCheck {
  pub is_valid: bool,
  pub suggestions: Vec<String>,
}

impl SpellCheck {
  pub fn valid() -> Self {
    Self {
      is_valid: true,
      suggestions: Vec::new(),
    }
  }
}

pub trait LanguageAssistant {
  /// Short usage explanation with examples for `word` as used in `context`
  fn explain_usage(&self, word: &str, context: &str) -> Result<String, AssistError>;

  /// Dictionary form of an inflected word
  fn lemma(&self, word: &str) -> Result<String, AssistError>;

  fn translate(&self, text: &str, target_lang: &str) -> Result<String, AssistError>;

  fn check_spelling(&self, word: &str) -> Result<SpellCheck, AssistError>;

  /// Candidate translations of `source_text`, best first
  fn suggest_translation(&self, source_text: &str, guidance: &str) -> Result<Vec<String>, AssistError>;
}

/// Assistant failures, all recoverable by retrying or fixing settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistError {
  MissingApiKey,
  InvalidApiKey,
  /// Any other service failure, with the raw message
  Service(String),
}

impl AssistError {
  /// Classify a raw service error message
  pub fn from_message(message: &str) -> Self {
    if message.contains("Requested entity was not found") || message.contains("API_KEY_INVALID") {
      AssistError::InvalidApiKey
    } else if message.contains("API_KEY") || message.to_lowercase().contains("api key") {
      AssistError::MissingApiKey
    } else {
      AssistError::Service(message.to_string())
    }
  }

  /// Message safe to show to the learner
  pub fn user_message(&self) -> String {
    match self {
      AssistError::MissingApiKey => {
        "API Key missing. Please add your API key in Settings.".to_string()
      }
      AssistError::InvalidApiKey => {
        "Invalid API Key. Please check your key in Settings and try again.".to_string()
      }
      AssistError::Service(msg) if msg.trim().is_empty() => {
        "Failed to connect to AI service. Please try again.".to_string()
      }
      AssistError::Service(msg) => msg.clone(),
    }
  }
}

impl std::fmt::Display for AssistError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      AssistError::MissingApiKey => write!(f, "assistant API key missing"),
      AssistError::InvalidApiKey => write!(f, "assistant API key rejected"),
      AssistError::Service(msg) => write!(f, "assistant service error: {}", msg),
    }
  }
}

impl std::error::Error for AssistError {}

/// Tidy raw model output: trim, drop one pair of surrounding quotes, remove `**`
pub fn clean_generated_text(raw: &str) -> String {
  let trimmed = raw.trim();
  let unquoted = ['"', '\'']
    .iter()
    .find_map(|&q| {
      trimmed
        .strip_prefix(q)
        .and_then(|rest| rest.strip_suffix(q))
    })
    .unwrap_or(trimmed);
  unquoted.replace("**", "")
}

/// Parse a `VALID` / `INVALID:a,b,c` spelling reply.
///
/// Anything unrecognised is treated as valid so a chatty reply never blocks
/// the learner.
pub fn parse_spelling_reply(reply: &str) -> SpellCheck {
  let reply = reply.trim();
  let upper = reply.to_uppercase();
  if upper == "VALID" {
    return SpellCheck::valid();
  }
  if upper.starts_with("INVALID:") {
    let suggestions = reply
      .get("INVALID:".len()..)
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
      .collect();
    return SpellCheck {
      is_valid: false,
      suggestions,
    };
  }
  SpellCheck::valid()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_message_classifies_key_errors() {
    assert_eq!(AssistError::from_message("API_KEY_INVALID: bad"), AssistError::InvalidApiKey);
    assert_eq!(
      AssistError::from_message("Requested entity was not found."),
      AssistError::InvalidApiKey
    );
    assert_eq!(AssistError::from_message("no api key set"), AssistError::MissingApiKey);
    assert_eq!(
      AssistError::from_message("timeout"),
      AssistError::Service("timeout".to_string())
    );
  }

  #[test]
  fn test_user_message_fallback_for_empty_service_error() {
    let msg = AssistError::Service(String::new()).user_message();
    assert!(msg.contains("Please try again"));
  }

  #[test]
  fn test_clean_generated_text() {
    assert_eq!(clean_generated_text("  \"quoted\"  "), "quoted");
    assert_eq!(clean_generated_text("'single'"), "single");
    assert_eq!(clean_generated_text("**bold** text"), "bold text");
    assert_eq!(clean_generated_text("\"unbalanced"), "\"unbalanced");
  }

  #[test]
  fn test_parse_spelling_reply_valid() {
    assert_eq!(parse_spelling_reply("VALID"), SpellCheck::valid());
    assert_eq!(parse_spelling_reply(" valid \n"), SpellCheck::valid());
  }

  #[test]
  fn test_parse_spelling_reply_invalid_with_suggestions() {
    let check = parse_spelling_reply("INVALID:wonderful, wonder,");
    assert!(!check.is_valid);
    assert_eq!(check.suggestions, vec!["wonderful", "wonder"]);
  }

  #[test]
  fn test_parse_spelling_reply_unrecognised_is_valid() {
    assert!(parse_spelling_reply("I think this word is fine").is_valid);
  }
}
