use serde::{Deserialize, Serialize};
use crate::models::domain::{Match, ReportedMatch};

/// Outcome of a single matcher run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(rename = "runId")]
    pub run_id: uuid::Uuid,
    /// Display name of the target profile for single-profile runs
    pub target: Option<String>,
    #[serde(rename = "dryRun")]
    pub dry_run: bool,
    #[serde(rename = "startedAt")]
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "finishedAt")]
    pub finished_at: chrono::DateTime<chrono::Utc>,
    pub candidates: usize,
    #[serde(rename = "preFilteredOut")]
    pub pre_filtered_out: usize,
    pub undeterminable: usize,
    #[serde(rename = "belowThreshold")]
    pub below_threshold: usize,
    /// Matches created (or that would be created on a dry run)
    #[serde(rename = "matchesCreated")]
    pub matches_created: usize,
    pub matches: Vec<ReportedMatch>,
}

/// Response for the match listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub matches: Vec<Match>,
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
