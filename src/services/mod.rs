//! Collaborators around the practice engine: the text-generation assistant
//! used when drafting new entries, and signed backups.

pub mod assistant;
pub mod backup;
