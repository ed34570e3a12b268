pub mod item;
pub mod profile;

pub use item::{PracticeEntry, PracticeItem, Proficiency, ProficiencyError, SentenceItem, VocabularyItem};
pub use profile::{ProfileError, UserProfile};
