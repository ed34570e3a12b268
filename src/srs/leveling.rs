use serde::Serialize;

use crate::config::EXP_PER_LEVEL;
use crate::domain::UserProfile;
use crate::srs::rank::{rank_for_level, Rank};

/// EXP needed to go from `level` to `level + 1`.
///
/// Level 0 is treated as level 1 so the threshold is never zero.
pub fn experience_required(level: u32) -> u64 {
  EXP_PER_LEVEL * u64::from(level.max(1))
}

/// Snapshot for the profile bar
#[derive(Debug, Clone, Serialize)]
pub struct LevelProgress {
  pub level: u32,
  pub exp: u64,
  pub exp_to_next_level: u64,
  pub percent: f64,
  pub rank: &'static Rank,
}

pub fn level_progress(profile: &UserProfile) -> LevelProgress {
  let exp_to_next_level = experience_required(profile.level);
  let percent = if exp_to_next_level > 0 {
    (profile.exp as f64 / exp_to_next_level as f64) * 100.0
  } else {
    0.0
  };

  LevelProgress {
    level: profile.level,
    exp: profile.exp,
    exp_to_next_level,
    percent,
    rank: rank_for_level(profile.level),
  }
}
