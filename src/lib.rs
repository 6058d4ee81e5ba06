//! Matchmaker - pairwise compatibility scoring for dating profiles
//!
//! Scores every eligible pair of profiles with a deterministic rule set plus
//! an external language-model oracle, and commits the pairs that clear the
//! configured threshold as match records.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{deterministic_score, Matchmaker, MatchmakerError, ProfileTarget};
pub use models::{MatchingOptions, NewMatch, Profile, RunReport};
