use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::ProfileId;

/// Request to run the matcher over the whole population
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunAllRequest {
    #[serde(default, alias = "dry_run", rename = "dryRun")]
    pub dry_run: bool,
}

/// Request to run the matcher for a single profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_single_target"))]
pub struct RunForProfileRequest {
    #[serde(default, alias = "profile_id", rename = "profileId")]
    pub profile_id: Option<ProfileId>,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "dry_run", rename = "dryRun")]
    pub dry_run: bool,
}

fn validate_single_target(req: &RunForProfileRequest) -> Result<(), ValidationError> {
    match (&req.profile_id, &req.name) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(ValidationError::new("exactly one of profileId or name is required")),
    }
}

/// Query parameters for listing persisted matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMatchesQuery {
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    50
}
