use serde::{Deserialize, Serialize};

use crate::config;
use crate::srs::scoring::{self, ScoreOutcome};
use crate::validation;

/// Mastery of one practice item, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Proficiency(u8);

impl Proficiency {
  /// Just learned
  pub const MIN: Self = Self(config::MIN_PROFICIENCY);
  /// Mastered
  pub const MAX: Self = Self(config::MAX_PROFICIENCY);

  pub fn new(value: u8) -> Result<Self, ProficiencyError> {
    if (config::MIN_PROFICIENCY..=config::MAX_PROFICIENCY).contains(&value) {
      Ok(Self(value))
    } else {
      Err(ProficiencyError(value))
    }
  }

  pub fn get(self) -> u8 {
    self.0
  }

  /// One step up, saturating at MAX
  pub fn raised(self) -> Self {
    Self((self.0 + 1).min(config::MAX_PROFICIENCY))
  }

  /// One step down, saturating at MIN
  pub fn lowered(self) -> Self {
    Self(self.0.saturating_sub(1).max(config::MIN_PROFICIENCY))
  }

  pub fn is_mastered(self) -> bool {
    self == Self::MAX
  }
}

impl Default for Proficiency {
  fn default() -> Self {
    Self::MIN
  }
}

impl TryFrom<u8> for Proficiency {
  type Error = ProficiencyError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<Proficiency> for u8 {
  fn from(p: Proficiency) -> Self {
    p.0
  }
}

impl std::fmt::Display for Proficiency {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.0, config::MAX_PROFICIENCY)
  }
}

/// Proficiency value outside 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProficiencyError(pub u8);

impl std::fmt::Display for ProficiencyError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "proficiency {} outside {}..={}",
      self.0,
      config::MIN_PROFICIENCY,
      config::MAX_PROFICIENCY
    )
  }
}

impl std::error::Error for ProficiencyError {}

/// A word learned from a sentence, practiced as fill-in-the-blank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
  pub id: String,
  pub original_sentence: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub original_sentence_translation: Option<String>,
  /// The word as it appeared in the sentence (possibly inflected)
  pub target_word: String,
  /// Dictionary form of the word
  pub base_word: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub generated_sentence: Option<String>,
  #[serde(default)]
  pub proficiency: Proficiency,
}

impl VocabularyItem {
  pub fn new(id: String, original_sentence: String, target_word: String, base_word: String) -> Self {
    Self {
      id,
      original_sentence,
      original_sentence_translation: None,
      target_word,
      base_word,
      generated_sentence: None,
      proficiency: Proficiency::MIN,
    }
  }
}

/// A sentence pair practiced as free-text translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceItem {
  pub id: String,
  /// Sentence shown to the learner
  #[serde(alias = "vietnameseSentence")]
  pub source_sentence: String,
  /// Reference translation the answer is compared against
  #[serde(alias = "englishSentence")]
  pub target_sentence: String,
  #[serde(default)]
  pub proficiency: Proficiency,
}

impl SentenceItem {
  pub fn new(id: String, source_sentence: String, target_sentence: String) -> Self {
    Self {
      id,
      source_sentence,
      target_sentence,
      proficiency: Proficiency::MIN,
    }
  }
}

/// Behaviour shared by everything a quiz session can present
pub trait PracticeEntry: Clone {
  fn id(&self) -> &str;

  fn proficiency(&self) -> Proficiency;

  /// Copy of this entry with a new proficiency
  fn with_proficiency(&self, proficiency: Proficiency) -> Self;

  /// Question text shown to the learner
  fn prompt(&self) -> String;

  /// Expected answer, revealed with feedback
  fn reference_answer(&self) -> &str;

  /// Whether an answer is complete enough to be checked
  fn is_complete_answer(&self, answer: &str) -> bool;

  fn score(&self, answer: &str) -> ScoreOutcome;
}

impl PracticeEntry for VocabularyItem {
  fn id(&self) -> &str {
    &self.id
  }

  fn proficiency(&self) -> Proficiency {
    self.proficiency
  }

  fn with_proficiency(&self, proficiency: Proficiency) -> Self {
    Self {
      proficiency,
      ..self.clone()
    }
  }

  fn prompt(&self) -> String {
    validation::blank_out_word(&self.original_sentence, &self.target_word)
  }

  fn reference_answer(&self) -> &str {
    &self.target_word
  }

  fn is_complete_answer(&self, answer: &str) -> bool {
    validation::fills_blank(answer, &self.target_word)
  }

  fn score(&self, answer: &str) -> ScoreOutcome {
    scoring::score_word(self, answer)
  }
}

impl PracticeEntry for SentenceItem {
  fn id(&self) -> &str {
    &self.id
  }

  fn proficiency(&self) -> Proficiency {
    self.proficiency
  }

  fn with_proficiency(&self, proficiency: Proficiency) -> Self {
    Self {
      proficiency,
      ..self.clone()
    }
  }

  fn prompt(&self) -> String {
    self.source_sentence.clone()
  }

  fn reference_answer(&self) -> &str {
    &self.target_sentence
  }

  fn is_complete_answer(&self, answer: &str) -> bool {
    !answer.trim().is_empty()
  }

  fn score(&self, answer: &str) -> ScoreOutcome {
    scoring::score_sentence(self, answer)
  }
}

/// Either kind of practice item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PracticeItem {
  Vocabulary(VocabularyItem),
  Sentence(SentenceItem),
}

impl PracticeEntry for PracticeItem {
  fn id(&self) -> &str {
    match self {
      Self::Vocabulary(v) => v.id(),
      Self::Sentence(s) => s.id(),
    }
  }

  fn proficiency(&self) -> Proficiency {
    match self {
      Self::Vocabulary(v) => v.proficiency,
      Self::Sentence(s) => s.proficiency,
    }
  }

  fn with_proficiency(&self, proficiency: Proficiency) -> Self {
    match self {
      Self::Vocabulary(v) => Self::Vocabulary(v.with_proficiency(proficiency)),
      Self::Sentence(s) => Self::Sentence(s.with_proficiency(proficiency)),
    }
  }

  fn prompt(&self) -> String {
    match self {
      Self::Vocabulary(v) => v.prompt(),
      Self::Sentence(s) => s.prompt(),
    }
  }

  fn reference_answer(&self) -> &str {
    match self {
      Self::Vocabulary(v) => v.reference_answer(),
      Self::Sentence(s) => s.reference_answer(),
    }
  }

  fn is_complete_answer(&self, answer: &str) -> bool {
    match self {
      Self::Vocabulary(v) => v.is_complete_answer(answer),
      Self::Sentence(s) => s.is_complete_answer(answer),
    }
  }

  fn score(&self, answer: &str) -> ScoreOutcome {
    scoring::score_item(self, answer)
  }
}

impl From<VocabularyItem> for PracticeItem {
  fn from(item: VocabularyItem) -> Self {
    Self::Vocabulary(item)
  }
}

impl From<SentenceItem> for PracticeItem {
  fn from(item: SentenceItem) -> Self {
    Self::Sentence(item)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn vocab(id: &str) -> VocabularyItem {
    VocabularyItem::new(
      id.to_string(),
      "She runs every morning.".to_string(),
      "runs".to_string(),
      "run".to_string(),
    )
  }

  // Proficiency tests

  #[test]
  fn test_proficiency_new_in_range() {
    for v in 1..=5 {
      assert_eq!(Proficiency::new(v).unwrap().get(), v);
    }
  }

  #[test]
  fn test_proficiency_new_out_of_range() {
    assert_eq!(Proficiency::new(0), Err(ProficiencyError(0)));
    assert_eq!(Proficiency::new(6), Err(ProficiencyError(6)));
  }

  #[test]
  fn test_proficiency_raised_saturates() {
    assert_eq!(Proficiency::MIN.raised().get(), 2);
    assert_eq!(Proficiency::MAX.raised(), Proficiency::MAX);
  }

  #[test]
  fn test_proficiency_lowered_saturates() {
    assert_eq!(Proficiency::MAX.lowered().get(), 4);
    assert_eq!(Proficiency::MIN.lowered(), Proficiency::MIN);
  }

  #[test]
  fn test_proficiency_default_is_min() {
    assert_eq!(Proficiency::default(), Proficiency::MIN);
  }

  #[test]
  fn test_proficiency_display() {
    assert_eq!(Proficiency::new(3).unwrap().to_string(), "3/5");
  }

  #[test]
  fn test_proficiency_deserialize_rejects_out_of_range() {
    assert!(serde_json::from_str::<Proficiency>("0").is_err());
    assert!(serde_json::from_str::<Proficiency>("9").is_err());
    assert_eq!(serde_json::from_str::<Proficiency>("4").unwrap().get(), 4);
  }

  // Item tests

  #[test]
  fn test_new_items_start_at_min_proficiency() {
    assert_eq!(vocab("a").proficiency, Proficiency::MIN);
    let s = SentenceItem::new("b".into(), "Xin chào".into(), "Hello".into());
    assert_eq!(s.proficiency, Proficiency::MIN);
  }

  #[test]
  fn test_with_proficiency_keeps_other_fields() {
    let item = vocab("a");
    let updated = item.with_proficiency(Proficiency::new(4).unwrap());
    assert_eq!(updated.proficiency.get(), 4);
    assert_eq!(updated.target_word, item.target_word);
    assert_eq!(updated.id, item.id);
  }

  #[test]
  fn test_vocabulary_serializes_camel_case() {
    let json = serde_json::to_value(vocab("a")).unwrap();
    assert_eq!(json["targetWord"], "runs");
    assert_eq!(json["baseWord"], "run");
    assert_eq!(json["originalSentence"], "She runs every morning.");
    assert_eq!(json["proficiency"], 1);
    assert!(json.get("generatedSentence").is_none());
  }

  #[test]
  fn test_sentence_accepts_legacy_field_names() {
    let json = r#"{"id":"x","vietnameseSentence":"Tôi ăn cơm","englishSentence":"I eat rice","proficiency":2}"#;
    let item: SentenceItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.source_sentence, "Tôi ăn cơm");
    assert_eq!(item.target_sentence, "I eat rice");
    assert_eq!(item.proficiency.get(), 2);
  }

  #[test]
  fn test_vocabulary_prompt_blanks_target_word() {
    assert_eq!(vocab("a").prompt(), "She ______ every morning.");
  }

  #[test]
  fn test_vocabulary_complete_answer_requires_exact_length() {
    let item = vocab("a");
    assert!(!item.is_complete_answer("run"));
    assert!(item.is_complete_answer("runs"));
    assert!(item.is_complete_answer(" RUNS "));
    assert!(!item.is_complete_answer("running"));
  }

  #[test]
  fn test_sentence_complete_answer_requires_text() {
    let item = SentenceItem::new("b".into(), "Xin chào".into(), "Hello".into());
    assert!(!item.is_complete_answer("   "));
    assert!(item.is_complete_answer("hi"));
    assert_eq!(item.prompt(), "Xin chào");
    assert_eq!(item.reference_answer(), "Hello");
  }

  #[test]
  fn test_practice_item_dispatches_to_variant() {
    let item: PracticeItem = vocab("a").into();
    assert_eq!(item.id(), "a");
    assert_eq!(item.reference_answer(), "runs");

    let item: PracticeItem = SentenceItem::new("b".into(), "Xin chào".into(), "Hello".into()).into();
    assert_eq!(item.id(), "b");
    assert_eq!(item.with_proficiency(Proficiency::MAX).proficiency(), Proficiency::MAX);
  }

  #[test]
  fn test_practice_item_tagged_serialization() {
    let item: PracticeItem = vocab("a").into();
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["kind"], "vocabulary");
    let back: PracticeItem = serde_json::from_value(json).unwrap();
    assert_eq!(back, item);
  }
}
