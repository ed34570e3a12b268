//! Answer scoring for practice items.
//!
//! Vocabulary answers are all-or-nothing word matches whose EXP value shrinks
//! as the item's proficiency grows. Sentence answers earn one EXP per token
//! that lines up with the reference at the same position, plus a bonus when the
//! whole normalized answer equals the reference. Only a full match counts as
//! correct for proficiency, whatever the partial credit.

use serde::{Deserialize, Serialize};

use crate::config::{
  FULL_SENTENCE_BONUS, WORD_BASE_EXP, WORD_EXP_PER_PROFICIENCY, WRONG_ANSWER_PENALTY,
};
use crate::domain::{PracticeItem, Proficiency, SentenceItem, VocabularyItem};
use crate::validation::{normalize_tokens, words_match};

/// Whether an answer was fully correct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  Correct,
  Incorrect,
}

impl Verdict {
  pub fn is_correct(&self) -> bool {
    matches!(self, Self::Correct)
  }

  /// Proficiency after one attempt with this verdict
  pub fn next_proficiency(&self, current: Proficiency) -> Proficiency {
    match self {
      Self::Correct => current.raised(),
      Self::Incorrect => current.lowered(),
    }
  }
}

/// Result of scoring one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
  pub verdict: Verdict,
  /// Signed EXP change
  pub exp_delta: i64,
  /// Item proficiency after this attempt
  pub proficiency: Proficiency,
  /// Tokens matched position-by-position (sentence answers only)
  pub matched_tokens: Option<usize>,
}

/// EXP at stake for a vocabulary item: `max(1, 10 - 2 × proficiency)`
pub fn word_base_exp(proficiency: Proficiency) -> i64 {
  (WORD_BASE_EXP - WORD_EXP_PER_PROFICIENCY * i64::from(proficiency.get())).max(1)
}

/// Score a fill-in-the-blank answer against the item's target word
pub fn score_word(item: &VocabularyItem, answer: &str) -> ScoreOutcome {
  let base = word_base_exp(item.proficiency);
  let verdict = if words_match(answer, &item.target_word) {
    Verdict::Correct
  } else {
    Verdict::Incorrect
  };

  let exp_delta = match verdict {
    Verdict::Correct => base,
    Verdict::Incorrect => -((base as f64 * WRONG_ANSWER_PENALTY).round() as i64),
  };

  ScoreOutcome {
    verdict,
    exp_delta,
    proficiency: verdict.next_proficiency(item.proficiency),
    matched_tokens: None,
  }
}

/// Count positions where both token sequences hold the same token.
///
/// Only the overlapping prefix is compared; extra tokens on either side
/// are ignored.
pub fn count_aligned_tokens(reference: &[String], answer: &[String]) -> usize {
  reference
    .iter()
    .zip(answer)
    .filter(|(expected, given)| expected == given)
    .count()
}

/// Score a free-text translation against the item's reference sentence
pub fn score_sentence(item: &SentenceItem, answer: &str) -> ScoreOutcome {
  let reference = normalize_tokens(&item.target_sentence);
  let given = normalize_tokens(answer);

  let matched = count_aligned_tokens(&reference, &given);
  let verdict = if reference == given {
    Verdict::Correct
  } else {
    Verdict::Incorrect
  };

  let mut exp_delta = matched as i64;
  if verdict.is_correct() {
    exp_delta += (matched as f64 * FULL_SENTENCE_BONUS).ceil() as i64;
  }

  ScoreOutcome {
    verdict,
    exp_delta,
    proficiency: verdict.next_proficiency(item.proficiency),
    matched_tokens: Some(matched),
  }
}

/// Score any practice item with the scorer for its kind
pub fn score_item(item: &PracticeItem, answer: &str) -> ScoreOutcome {
  match item {
    PracticeItem::Vocabulary(v) => score_word(v, answer),
    PracticeItem::Sentence(s) => score_sentence(s, answer),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn word(target: &str, proficiency: u8) -> VocabularyItem {
    let mut item = VocabularyItem::new(
      "w".to_string(),
      format!("I {} every day.", target),
      target.to_string(),
      target.to_string(),
    );
    item.proficiency = Proficiency::new(proficiency).unwrap();
    item
  }

  fn sentence(reference: &str, proficiency: u8) -> SentenceItem {
    let mut item = SentenceItem::new("s".to_string(), "source".to_string(), reference.to_string());
    item.proficiency = Proficiency::new(proficiency).unwrap();
    item
  }

  // Base EXP tests

  #[test]
  fn test_word_base_exp_by_proficiency() {
    let expected = [(1, 8), (2, 6), (3, 4), (4, 2), (5, 1)];
    for (p, base) in expected {
      assert_eq!(word_base_exp(Proficiency::new(p).unwrap()), base, "proficiency {}", p);
    }
  }

  // Word scoring tests

  #[test]
  fn test_word_correct_at_min_proficiency() {
    let outcome = score_word(&word("run", 1), "run");
    assert_eq!(outcome.verdict, Verdict::Correct);
    assert_eq!(outcome.exp_delta, 8);
    assert_eq!(outcome.proficiency.get(), 2);
    assert!(outcome.matched_tokens.is_none());
  }

  #[test]
  fn test_word_incorrect_at_min_proficiency() {
    let outcome = score_word(&word("run", 1), "ran");
    assert_eq!(outcome.verdict, Verdict::Incorrect);
    assert_eq!(outcome.exp_delta, -6);
    assert_eq!(outcome.proficiency.get(), 1);
  }

  #[test]
  fn test_word_match_ignores_case_and_padding() {
    let outcome = score_word(&word("Run", 3), "  rUN ");
    assert_eq!(outcome.verdict, Verdict::Correct);
    assert_eq!(outcome.exp_delta, 4);
  }

  #[test]
  fn test_word_correct_at_max_proficiency_stays_max() {
    let outcome = score_word(&word("run", 5), "run");
    assert_eq!(outcome.exp_delta, 1);
    assert_eq!(outcome.proficiency, Proficiency::MAX);
  }

  #[test]
  fn test_word_penalty_rounding() {
    // 0.8 × {8, 6, 4, 2, 1} rounded
    let expected = [(1, -6), (2, -5), (3, -3), (4, -2), (5, -1)];
    for (p, delta) in expected {
      assert_eq!(score_word(&word("run", p), "xyz").exp_delta, delta, "proficiency {}", p);
    }
  }

  // Sentence scoring tests

  #[test]
  fn test_sentence_partial_overlap() {
    let outcome = score_sentence(&sentence("the cat sat", 2), "the dog sat");
    assert_eq!(outcome.matched_tokens, Some(2));
    assert_eq!(outcome.exp_delta, 2);
    assert_eq!(outcome.verdict, Verdict::Incorrect);
    assert_eq!(outcome.proficiency.get(), 1);
  }

  #[test]
  fn test_sentence_full_match_after_normalization() {
    let outcome = score_sentence(&sentence("Hello, world!", 1), "hello world");
    assert_eq!(outcome.verdict, Verdict::Correct);
    assert_eq!(outcome.matched_tokens, Some(2));
    assert_eq!(outcome.exp_delta, 3);
    assert_eq!(outcome.proficiency.get(), 2);
  }

  #[test]
  fn test_sentence_bonus_rounds_up() {
    let outcome = score_sentence(&sentence("I eat rice", 1), "i eat rice.");
    assert_eq!(outcome.exp_delta, 3 + 2);
  }

  #[test]
  fn test_sentence_longer_answer_not_correct() {
    // Prefix matches fully but the extra token breaks full equality
    let outcome = score_sentence(&sentence("the cat sat", 3), "the cat sat down");
    assert_eq!(outcome.matched_tokens, Some(3));
    assert_eq!(outcome.exp_delta, 3);
    assert_eq!(outcome.verdict, Verdict::Incorrect);
    assert_eq!(outcome.proficiency.get(), 2);
  }

  #[test]
  fn test_sentence_shorter_answer_partial() {
    let outcome = score_sentence(&sentence("the cat sat", 1), "the cat");
    assert_eq!(outcome.matched_tokens, Some(2));
    assert_eq!(outcome.verdict, Verdict::Incorrect);
  }

  #[test]
  fn test_sentence_shifted_tokens_earn_nothing() {
    let outcome = score_sentence(&sentence("the cat sat", 1), "a the cat sat");
    assert_eq!(outcome.matched_tokens, Some(0));
    assert_eq!(outcome.exp_delta, 0);
  }

  #[test]
  fn test_sentence_correct_at_max_stays_max() {
    let outcome = score_sentence(&sentence("yes", 5), "Yes!");
    assert_eq!(outcome.verdict, Verdict::Correct);
    assert_eq!(outcome.proficiency, Proficiency::MAX);
    assert_eq!(outcome.exp_delta, 1 + 1);
  }

  #[test]
  fn test_count_aligned_tokens() {
    let a: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    let b: Vec<String> = vec!["a".into(), "x".into(), "c".into(), "d".into()];
    assert_eq!(count_aligned_tokens(&a, &b), 2);
    assert_eq!(count_aligned_tokens(&a, &[]), 0);
  }

  #[test]
  fn test_score_item_dispatch() {
    let v: PracticeItem = word("run", 1).into();
    assert_eq!(score_item(&v, "run").exp_delta, 8);

    let s: PracticeItem = sentence("the cat sat", 1).into();
    assert_eq!(score_item(&s, "the dog sat").exp_delta, 2);
  }

  #[test]
  fn test_verdict_next_proficiency() {
    let p = Proficiency::new(3).unwrap();
    assert_eq!(Verdict::Correct.next_proficiency(p).get(), 4);
    assert_eq!(Verdict::Incorrect.next_proficiency(p).get(), 2);
  }
}
