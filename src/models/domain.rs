use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Store identifier of a profile
pub type ProfileId = i64;

/// Profile gender, stored as a single-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            "O" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Relationship status, stored as a single-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipStatus {
    #[serde(rename = "S")]
    Single,
    #[serde(rename = "D")]
    Divorced,
    #[serde(rename = "W")]
    Widowed,
}

impl RelationshipStatus {
    pub fn code(&self) -> &'static str {
        match self {
            RelationshipStatus::Single => "S",
            RelationshipStatus::Divorced => "D",
            RelationshipStatus::Widowed => "W",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(RelationshipStatus::Single),
            "D" => Some(RelationshipStatus::Divorced),
            "W" => Some(RelationshipStatus::Widowed),
            _ => None,
        }
    }
}

/// What a profile is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookingFor {
    #[serde(rename = "LT")]
    LongTerm,
    #[serde(rename = "ST")]
    ShortTerm,
    #[serde(rename = "F")]
    Friendship,
    #[serde(rename = "C")]
    Casual,
}

/// Groups of looking-for values that earn partial alignment credit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitmentTier {
    Romantic,
    Social,
}

impl LookingFor {
    pub fn code(&self) -> &'static str {
        match self {
            LookingFor::LongTerm => "LT",
            LookingFor::ShortTerm => "ST",
            LookingFor::Friendship => "F",
            LookingFor::Casual => "C",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "LT" => Some(LookingFor::LongTerm),
            "ST" => Some(LookingFor::ShortTerm),
            "F" => Some(LookingFor::Friendship),
            "C" => Some(LookingFor::Casual),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LookingFor::LongTerm => "Long-term",
            LookingFor::ShortTerm => "Short-term",
            LookingFor::Friendship => "Friendship",
            LookingFor::Casual => "Casual",
        }
    }

    pub fn tier(&self) -> CommitmentTier {
        match self {
            LookingFor::LongTerm | LookingFor::ShortTerm => CommitmentTier::Romantic,
            LookingFor::Friendship | LookingFor::Casual => CommitmentTier::Social,
        }
    }
}

/// A participant in the matching population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Profile {
    pub id: ProfileId,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 18))]
    pub age: u8,
    pub gender: Gender,
    #[serde(rename = "relationshipStatus")]
    pub relationship_status: RelationshipStatus,
    #[serde(rename = "lookingFor")]
    pub looking_for: LookingFor,
    /// Months until the profile wants to settle down
    #[serde(rename = "settleTimeline")]
    #[validate(range(max = 60))]
    pub settle_timeline: u8,
    #[serde(default)]
    pub occupation: String,
    /// Comma separated, kept as entered
    #[serde(default)]
    pub interests: String,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.age)
    }
}

/// Match record produced by a run, before the store assigns it an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    #[serde(rename = "profileAId")]
    pub profile_a: ProfileId,
    #[serde(rename = "profileBId")]
    pub profile_b: ProfileId,
    #[serde(rename = "compatibilityScore")]
    pub score: f64,
    pub rationale: String,
}

/// Persisted match record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    #[serde(rename = "profileAId")]
    pub profile_a: ProfileId,
    #[serde(rename = "profileAName")]
    pub profile_a_name: String,
    #[serde(rename = "profileBId")]
    pub profile_b: ProfileId,
    #[serde(rename = "profileBName")]
    pub profile_b_name: String,
    #[serde(rename = "compatibilityScore")]
    pub score: f64,
    pub rationale: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Match selected by a run, with both display names for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedMatch {
    #[serde(flatten)]
    pub record: NewMatch,
    #[serde(rename = "profileAName")]
    pub profile_a_name: String,
    #[serde(rename = "profileBName")]
    pub profile_b_name: String,
}

impl ReportedMatch {
    /// Display name of the other side of the match
    pub fn partner_of(&self, id: ProfileId) -> &str {
        if self.record.profile_a == id {
            &self.profile_b_name
        } else {
            &self.profile_a_name
        }
    }
}

impl fmt::Display for ReportedMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Match between {} and {}", self.profile_a_name, self.profile_b_name)
    }
}

/// Subjective sub-scores and rationale returned by the compatibility oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleAssessment {
    pub occupation: f64,
    pub interests: f64,
    pub names: f64,
    pub personality: f64,
    pub explanation: String,
}

impl OracleAssessment {
    pub fn total(&self) -> f64 {
        self.occupation + self.interests + self.names + self.personality
    }
}

/// Final compatibility of a pair whose oracle call succeeded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    /// Clamped to [0, 100]
    pub total: f64,
    pub deterministic: u8,
    pub oracle: OracleAssessment,
    pub rationale: String,
}

/// Run scoring limits
#[derive(Debug, Clone, Copy)]
pub struct MatchingOptions {
    /// Minimum final score required to commit a match
    pub threshold: f64,
    pub max_concurrent_oracle_calls: usize,
    pub oracle_timeout: std::time::Duration,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            threshold: 70.0,
            max_concurrent_oracle_calls: 4,
            oracle_timeout: std::time::Duration::from_secs(30),
        }
    }
}
