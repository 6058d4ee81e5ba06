// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CommitmentTier, CompatibilityScore, Gender, LookingFor, Match, MatchingOptions, NewMatch,
    OracleAssessment, Profile, ProfileId, RelationshipStatus, ReportedMatch,
};
pub use requests::{ListMatchesQuery, RunAllRequest, RunForProfileRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchListResponse, RunReport};
