// Core algorithm exports
pub mod aggregator;
pub mod committer;
pub mod filters;
pub mod matcher;
pub mod pairing;
pub mod scoring;

pub use aggregator::{Aggregator, Compatibility};
pub use committer::{MatchCommitter, ScoredPair, Selection};
pub use filters::{EligibilityPolicy, OppositeGenderSameIntent};
pub use matcher::{Matchmaker, MatchmakerError, ProfileTarget};
pub use pairing::{pairs_for_target, unordered_pairs, CandidatePair, PairKey};
pub use scoring::deterministic_score;
