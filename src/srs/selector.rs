//! Practice ordering: weakest items first, stable while a session runs.
//!
//! A working list is rebuilt only when the set of item ids changes. Proficiency
//! edits on existing items are patched into the list in place so the learner
//! never sees the queue reshuffle mid-session.

use crate::domain::{PracticeEntry, Proficiency};

/// Order-independent identity of a collection: its sorted item ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFingerprint(Vec<String>);

impl ItemFingerprint {
  pub fn of<T: PracticeEntry>(items: &[T]) -> Self {
    let mut ids: Vec<String> = items.iter().map(|i| i.id().to_string()).collect();
    ids.sort_unstable();
    Self(ids)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Copy of `items` sorted by ascending proficiency.
///
/// The sort is stable, so items with equal proficiency keep their
/// collection order.
pub fn order_by_proficiency<T: PracticeEntry>(items: &[T]) -> Vec<T> {
  let mut ordered = items.to_vec();
  ordered.sort_by_key(|i| i.proficiency());
  ordered
}

/// Replace the proficiency of the item with `id`, keeping every position.
///
/// Unknown ids leave the list unchanged.
pub fn patch_proficiency<T: PracticeEntry>(items: &[T], id: &str, proficiency: Proficiency) -> Vec<T> {
  items
    .iter()
    .map(|i| if i.id() == id { i.with_proficiency(proficiency) } else { i.clone() })
    .collect()
}
