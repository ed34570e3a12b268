//! Saved vocabulary and sentence lists.
//!
//! Every function takes the current list and returns a new one; callers
//! persist the result. New entries go to the front of the list at the lowest
//! proficiency.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ID_SUFFIX_LEN;
use crate::db::LogOnError;
use crate::domain::{PracticeEntry, SentenceItem, VocabularyItem};
use crate::services::assistant::{clean_generated_text, AssistError, LanguageAssistant, SpellCheck};
use crate::validation::contains_whole_word;

/// Target language for sentence translations in the add flow
pub const TRANSLATION_LANGUAGE: &str = "vi";

/// Fields of a vocabulary entry before it gets an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyDraft {
  pub original_sentence: String,
  #[serde(default)]
  pub original_sentence_translation: Option<String>,
  pub target_word: String,
  pub base_word: String,
  #[serde(default)]
  pub generated_sentence: Option<String>,
}

/// Fields of a sentence entry before it gets an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceDraft {
  pub source_sentence: String,
  pub target_sentence: String,
}

/// Draft assembled with the assistant, plus advisory spelling feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistedDraft {
  pub draft: VocabularyDraft,
  pub spelling: SpellCheck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
  EmptySentence,
  EmptyWord,
  WordNotInSentence(String),
  NoSuggestion,
  Assistant(AssistError),
}

impl DraftError {
  pub fn user_message(&self) -> String {
    match self {
      DraftError::EmptySentence => "Please enter a sentence first.".to_string(),
      DraftError::EmptyWord => "Please select a word first.".to_string(),
      DraftError::WordNotInSentence(word) => {
        format!("'{}' does not appear as a whole word in the sentence.", word)
      }
      DraftError::NoSuggestion => "No translation was suggested. Please try again.".to_string(),
      DraftError::Assistant(e) => e.user_message(),
    }
  }
}

impl std::fmt::Display for DraftError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DraftError::Assistant(e) => write!(f, "{}", e),
      other => write!(f, "{}", other.user_message()),
    }
  }
}

impl std::error::Error for DraftError {}

impl From<AssistError> for DraftError {
  fn from(e: AssistError) -> Self {
    DraftError::Assistant(e)
  }
}

// ==================== Identifiers ====================

fn random_suffix() -> String {
  let mut rng = rand::rng();
  (0..ID_SUFFIX_LEN)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

/// Generate an id not accepted by `is_taken`: creation time plus random suffix
pub fn generate_item_id(is_taken: impl Fn(&str) -> bool) -> String {
  loop {
    let id = format!(
      "{}-{}",
      Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
      random_suffix()
    );
    if !is_taken(&id) {
      return id;
    }
  }
}

fn is_taken<T: PracticeEntry>(list: &[T]) -> impl Fn(&str) -> bool + '_ {
  move |id| list.iter().any(|i| i.id() == id)
}

// ==================== Add / delete / search ====================

/// Strip trailing punctuation picked up when selecting a word from a sentence
pub fn clean_selected_word(word: &str) -> &str {
  word
    .trim()
    .trim_end_matches(['.', ',', '!', '?', ';', ':', ')'])
}

fn non_empty(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

/// Prepend a new vocabulary entry built from `draft`
pub fn add_vocabulary(
  list: &[VocabularyItem],
  draft: VocabularyDraft,
) -> Result<Vec<VocabularyItem>, DraftError> {
  let sentence = draft.original_sentence.trim();
  if sentence.is_empty() {
    return Err(DraftError::EmptySentence);
  }
  let target_word = clean_selected_word(&draft.target_word);
  if target_word.is_empty() {
    return Err(DraftError::EmptyWord);
  }
  if !contains_whole_word(sentence, target_word) {
    return Err(DraftError::WordNotInSentence(target_word.to_string()));
  }
  let base_word = match draft.base_word.trim() {
    "" => target_word.to_lowercase(),
    base => base.to_lowercase(),
  };

  let mut item = VocabularyItem::new(
    generate_item_id(is_taken(list)),
    sentence.to_string(),
    target_word.to_string(),
    base_word,
  );
  item.original_sentence_translation = non_empty(draft.original_sentence_translation);
  item.generated_sentence = non_empty(draft.generated_sentence);

  tracing::info!("Saved vocabulary '{}' ({})", item.target_word, item.id);

  let mut updated = Vec::with_capacity(list.len() + 1);
  updated.push(item);
  updated.extend_from_slice(list);
  Ok(updated)
}

/// Prepend a new sentence pair built from `draft`
pub fn add_sentence(list: &[SentenceItem], draft: SentenceDraft) -> Result<Vec<SentenceItem>, DraftError> {
  let source = draft.source_sentence.trim();
  let target = draft.target_sentence.trim();
  if source.is_empty() || target.is_empty() {
    return Err(DraftError::EmptySentence);
  }

  let item = SentenceItem::new(generate_item_id(is_taken(list)), source.to_string(), target.to_string());
  tracing::info!("Saved sentence pair {}", item.id);

  let mut updated = Vec::with_capacity(list.len() + 1);
  updated.push(item);
  updated.extend_from_slice(list);
  Ok(updated)
}

/// Remove the item with `id`; unknown ids leave the list as is
pub fn delete_item<T: PracticeEntry>(list: &[T], id: &str) -> Vec<T> {
  list.iter().filter(|i| i.id() != id).cloned().collect()
}

/// Entries whose base word or target word contains `term`, ignoring case
pub fn search_vocabulary<'a>(list: &'a [VocabularyItem], term: &str) -> Vec<&'a VocabularyItem> {
  let term = term.trim().to_lowercase();
  list
    .iter()
    .filter(|e| {
      term.is_empty()
        || e.base_word.to_lowercase().contains(&term)
        || e.target_word.to_lowercase().contains(&term)
    })
    .collect()
}

// ==================== Assisted drafting ====================

/// Build a vocabulary draft for `word` in `sentence` with the assistant's help.
///
/// The lemma is required; spelling, usage explanation and translation are
/// extras whose failures are logged and left empty.
pub fn draft_vocabulary(
  assistant: &impl LanguageAssistant,
  sentence: &str,
  word: &str,
) -> Result<AssistedDraft, DraftError> {
  let sentence = sentence.trim();
  if sentence.is_empty() {
    return Err(DraftError::EmptySentence);
  }
  let word = clean_selected_word(word);
  if word.is_empty() {
    return Err(DraftError::EmptyWord);
  }

  let spelling = assistant
    .check_spelling(word)
    .log_warn("Spelling check failed")
    .unwrap_or_else(SpellCheck::valid);

  let base_word = clean_generated_text(&assistant.lemma(word)?).to_lowercase();

  let generated_sentence = assistant
    .explain_usage(word, sentence)
    .log_warn("Usage explanation failed")
    .map(|text| clean_generated_text(&text));

  let original_sentence_translation = assistant
    .translate(sentence, TRANSLATION_LANGUAGE)
    .log_warn("Sentence translation failed")
    .map(|text| clean_generated_text(&text));

  Ok(AssistedDraft {
    draft: VocabularyDraft {
      original_sentence: sentence.to_string(),
      original_sentence_translation,
      target_word: word.to_string(),
      base_word,
      generated_sentence,
    },
    spelling,
  })
}

/// Build a sentence draft from the assistant's best translation suggestion
pub fn draft_sentence(
  assistant: &impl LanguageAssistant,
  source_sentence: &str,
  guidance: &str,
) -> Result<SentenceDraft, DraftError> {
  let source = source_sentence.trim();
  if source.is_empty() {
    return Err(DraftError::EmptySentence);
  }

  let target = assistant
    .suggest_translation(source, guidance.trim())?
    .into_iter()
    .map(|s| clean_generated_text(&s))
    .find(|s| !s.is_empty())
    .ok_or(DraftError::NoSuggestion)?;

  Ok(SentenceDraft {
    source_sentence: source.to_string(),
    target_sentence: target,
  })
}
