use serde::{Deserialize, Serialize};

use crate::srs::leveling::experience_required;

/// Learner level and EXP toward the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub level: u32,
  pub exp: u64,
}

impl UserProfile {
  pub fn new(level: u32, exp: u64) -> Self {
    Self { level, exp }
  }

  /// Check the invariants a profile must hold before the engine accepts it
  pub fn validate(&self) -> Result<(), ProfileError> {
    if self.level < 1 {
      return Err(ProfileError::LevelBelowOne);
    }
    let required = experience_required(self.level);
    if self.exp >= required {
      return Err(ProfileError::ExpOverflow {
        exp: self.exp,
        required,
      });
    }
    Ok(())
  }
}

impl Default for UserProfile {
  fn default() -> Self {
    Self { level: 1, exp: 0 }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
  LevelBelowOne,
  /// EXP already past the threshold for the current level
  ExpOverflow { exp: u64, required: u64 },
}

impl std::fmt::Display for ProfileError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ProfileError::LevelBelowOne => write!(f, "Profile level must be at least 1"),
      ProfileError::ExpOverflow { exp, required } => {
        write!(f, "Profile EXP {} is not below the level threshold {}", exp, required)
      }
    }
  }
}

impl std::error::Error for ProfileError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_profile() {
    let p = UserProfile::default();
    assert_eq!(p.level, 1);
    assert_eq!(p.exp, 0);
    assert!(p.validate().is_ok());
  }

  #[test]
  fn test_validate_rejects_level_zero() {
    assert_eq!(UserProfile::new(0, 0).validate(), Err(ProfileError::LevelBelowOne));
  }

  #[test]
  fn test_validate_rejects_exp_at_threshold() {
    assert_eq!(
      UserProfile::new(1, 50).validate(),
      Err(ProfileError::ExpOverflow { exp: 50, required: 50 })
    );
    assert!(UserProfile::new(2, 99).validate().is_ok());
  }

  #[test]
  fn test_profile_json_shape() {
    let json = serde_json::to_string(&UserProfile::new(3, 12)).unwrap();
    assert_eq!(json, r#"{"level":3,"exp":12}"#);
  }
}
