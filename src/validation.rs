//! Answer normalization and prompt helpers.
//!
//! Two comparison modes are supported:
//! - single words: trimmed, case-insensitive equality
//! - sentences: lower-cased, punctuation stripped, split into tokens
//!
//! All text is NFC-normalized first so that precomposed and combining
//! diacritics compare equal regardless of the input method used.

use unicode_normalization::UnicodeNormalization;

use crate::config::{BLANK_PLACEHOLDER, IGNORED_PUNCTUATION};

// ============================================================================
// Normalization
// ============================================================================

/// Normalize a single-word answer: NFC, trimmed, lower-cased
pub fn normalize_word(input: &str) -> String {
  input.trim().nfc().collect::<String>().to_lowercase()
}

/// Normalize a sentence into comparison tokens.
///
/// Lower-cases, drops `. , ! ? ; :` and splits on any whitespace run.
/// Empty input yields no tokens.
pub fn normalize_tokens(input: &str) -> Vec<String> {
  let cleaned: String = input
    .nfc()
    .collect::<String>()
    .to_lowercase()
    .chars()
    .filter(|c| !IGNORED_PUNCTUATION.contains(c))
    .collect();

  cleaned.split_whitespace().map(str::to_string).collect()
}

/// Case-insensitive, whitespace-trimmed word equality
pub fn words_match(answer: &str, expected: &str) -> bool {
  normalize_word(answer) == normalize_word(expected)
}

// ============================================================================
// Answer completeness
// ============================================================================

/// Whether the answer fills every slot of the blank for `target`.
///
/// The blank has one slot per composed character of the target word, so
/// only an answer of exactly that length can be submitted.
pub fn fills_blank(answer: &str, target: &str) -> bool {
  let expected = target.trim().nfc().count();
  expected > 0 && answer.trim().nfc().count() == expected
}

// ============================================================================
// Prompts
// ============================================================================

fn is_word_char(c: Option<&char>) -> bool {
  c.is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_')
}

/// Word boundary between `chars[pos - 1]` and `chars[pos]`
fn is_boundary(chars: &[char], pos: usize) -> bool {
  let before = if pos == 0 { None } else { chars.get(pos - 1) };
  is_word_char(before) != is_word_char(chars.get(pos))
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
  a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn matches_at(haystack: &[char], start: usize, needle: &[char]) -> bool {
  start + needle.len() <= haystack.len()
    && haystack[start..start + needle.len()]
      .iter()
      .zip(needle)
      .all(|(&a, &b)| chars_eq_ignore_case(a, b))
}

fn whole_word_at(haystack: &[char], start: usize, needle: &[char]) -> bool {
  matches_at(haystack, start, needle)
    && is_boundary(haystack, start)
    && is_boundary(haystack, start + needle.len())
}

/// Replace every whole-word, case-insensitive occurrence of `word` with a blank
pub fn blank_out_word(sentence: &str, word: &str) -> String {
  let needle: Vec<char> = word.trim().nfc().collect();
  if needle.is_empty() {
    return sentence.to_string();
  }

  let chars: Vec<char> = sentence.nfc().collect();
  let mut out = String::with_capacity(sentence.len());
  let mut i = 0;

  while i < chars.len() {
    let end = i + needle.len();
    if whole_word_at(&chars, i, &needle) {
      out.push_str(BLANK_PLACEHOLDER);
      i = end;
    } else {
      out.push(chars[i]);
      i += 1;
    }
  }

  out
}

/// Whether [`blank_out_word`] would find `word` in `sentence`
pub fn contains_whole_word(sentence: &str, word: &str) -> bool {
  let needle: Vec<char> = word.trim().nfc().collect();
  let chars: Vec<char> = sentence.nfc().collect();
  !needle.is_empty() && (0..chars.len()).any(|i| whole_word_at(&chars, i, &needle))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_word() {
    assert_eq!(normalize_word("  Run "), "run");
    assert_eq!(normalize_word("RUN"), "run");
    assert_eq!(normalize_word(""), "");
  }

  #[test]
  fn test_normalize_word_composes_diacritics() {
    // "é" as e + combining acute vs precomposed
    assert_eq!(normalize_word("cafe\u{301}"), normalize_word("caf\u{e9}"));
  }

  #[test]
  fn test_normalize_tokens_strips_punctuation() {
    assert_eq!(normalize_tokens("Hello, world!"), vec!["hello", "world"]);
    assert_eq!(normalize_tokens("Wait; what: really?"), vec!["wait", "what", "really"]);
  }

  #[test]
  fn test_normalize_tokens_keeps_other_symbols() {
    // Apostrophes and hyphens are not in the ignored set
    assert_eq!(normalize_tokens("It's well-known."), vec!["it's", "well-known"]);
  }

  #[test]
  fn test_normalize_tokens_collapses_whitespace() {
    assert_eq!(normalize_tokens("  the   cat\tsat \n"), vec!["the", "cat", "sat"]);
    assert!(normalize_tokens("   ").is_empty());
    assert!(normalize_tokens("...").is_empty());
  }

  #[test]
  fn test_words_match() {
    assert!(words_match(" Run ", "run"));
    assert!(words_match("RUNS", "runs"));
    assert!(!words_match("ran", "run"));
  }

  #[test]
  fn test_fills_blank() {
    assert!(fills_blank("runs", "runs"));
    assert!(fills_blank(" abcd ", "runs"));
    assert!(!fills_blank("run", "runs"));
    assert!(!fills_blank("", ""));
  }

  #[test]
  fn test_blank_out_word_whole_words_only() {
    assert_eq!(
      blank_out_word("The cat sat on the category.", "cat"),
      "The ______ sat on the category."
    );
  }

  #[test]
  fn test_blank_out_word_case_insensitive_all_occurrences() {
    assert_eq!(blank_out_word("Run, run, RUN!", "run"), "______, ______, ______!");
  }

  #[test]
  fn test_blank_out_word_missing_word() {
    assert_eq!(blank_out_word("Nothing here", "cat"), "Nothing here");
  }

  #[test]
  fn test_blank_out_word_with_regex_metacharacters() {
    // Trailing "++" followed by a space has no word boundary, same as \b
    assert_eq!(blank_out_word("I use C++ daily", "C++"), "I use C++ daily");
    assert_eq!(blank_out_word("x.y and xzy", "x.y"), "______ and xzy");
  }

  #[test]
  fn test_blank_out_word_empty_word() {
    assert_eq!(blank_out_word("Some sentence", "  "), "Some sentence");
  }

  #[test]
  fn test_fills_blank_counts_composed_characters() {
    // e + combining acute is one slot, like the precomposed form
    assert!(fills_blank("cafe\u{301}", "caf\u{e9}"));
    assert!(fills_blank("caf\u{e9}", "cafe\u{301}"));
    assert!(!fills_blank("cafe\u{301}x", "caf\u{e9}"));
  }

  #[test]
  fn test_blank_out_word_matches_decomposed_input() {
    assert_eq!(blank_out_word("Un cafe\u{301} noir", "caf\u{e9}"), "Un ______ noir");
  }

  #[test]
  fn test_contains_whole_word() {
    assert!(contains_whole_word("She RUNS fast", "runs"));
    assert!(contains_whole_word("Run!", " run "));
    assert!(!contains_whole_word("She walks", "runs"));
    assert!(!contains_whole_word("She walks", ""));
  }

  #[test]
  fn test_contains_whole_word_agrees_with_blanking() {
    for (sentence, word) in [
      ("The category is empty.", "cat"),
      ("I use C++ daily", "C++"),
      ("The cat sat.", "cat"),
      ("x.y and xzy", "x.y"),
    ] {
      let blanked = blank_out_word(sentence, word) != sentence;
      assert_eq!(contains_whole_word(sentence, word), blanked, "{sentence} / {word}");
    }
    assert!(!contains_whole_word("The category is empty.", "cat"));
  }
}
