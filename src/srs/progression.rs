use crate::domain::UserProfile;
use crate::srs::leveling::experience_required;

/// Profile after an EXP change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
  pub profile: UserProfile,
  pub levels_gained: u32,
}

/// Apply a signed EXP delta and roll over as many levels as it covers.
///
/// EXP is floored at zero first. Levels are never lost: a large negative
/// delta only empties the EXP bar at the current level.
pub fn apply_experience(profile: &UserProfile, delta: i64) -> Progression {
  let mut exp = if delta >= 0 {
    profile.exp.saturating_add(delta.unsigned_abs())
  } else {
    profile.exp.saturating_sub(delta.unsigned_abs())
  };
  let mut level = profile.level.max(1);
  let mut levels_gained = 0;

  // Terminates: experience_required is positive and grows with level
  let mut required = experience_required(level);
  while exp >= required {
    exp -= required;
    level += 1;
    levels_gained += 1;
    required = experience_required(level);
  }

  if levels_gained > 0 {
    tracing::info!("Level up: {} -> {} ({} EXP carried)", profile.level, level, exp);
  }

  Progression {
    profile: UserProfile { level, exp },
    levels_gained,
  }
}
