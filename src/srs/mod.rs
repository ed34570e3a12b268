pub mod leveling;
pub mod progression;
pub mod rank;
pub mod scoring;
pub mod selector;
pub mod session;

pub use leveling::{experience_required, level_progress, LevelProgress};
pub use progression::{apply_experience, Progression};
pub use rank::{next_rank, rank_for_level, Rank, RankTheme};
pub use scoring::{score_item, score_sentence, score_word, ScoreOutcome, Verdict};
pub use session::{CheckOutcome, Feedback, QuizSession, SessionState};
