use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Matchmaker, MatchmakerError, ProfileTarget};
use crate::models::{
    ErrorResponse, HealthResponse, ListMatchesQuery, MatchListResponse, RunAllRequest,
    RunForProfileRequest,
};
use crate::services::PostgresClient;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub matchmaker: Matchmaker,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matchmaker/run", web::post().to(run_all))
        .route("/matchmaker/run/profile", web::post().to(run_for_profile))
        .route("/matches", web::get().to(list_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Map a run failure onto an HTTP error response
pub fn error_response(err: &MatchmakerError) -> HttpResponse {
    let (status, error) = match err {
        MatchmakerError::NotFound(_) => (StatusCode::NOT_FOUND, "Profile not found"),
        MatchmakerError::AmbiguousName { .. } => (StatusCode::CONFLICT, "Ambiguous profile name"),
        MatchmakerError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read profiles"),
        MatchmakerError::Persistence { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist matches"),
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}

/// Read the optional run-all body
///
/// An empty body means defaults. A non-empty body must be a valid request,
/// whatever its content type.
pub fn parse_run_all_body(body: &[u8]) -> Result<RunAllRequest, HttpResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RunAllRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_json".to_string(),
            message: format!("Invalid JSON: {}", e),
            status_code: 400,
        })
    })
}

/// Run the matcher over every profile
///
/// POST /api/v1/matchmaker/run
///
/// Request body (optional):
/// ```json
/// { "dryRun": false }
/// ```
async fn run_all(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let dry_run = match parse_run_all_body(&body) {
        Ok(req) => req.dry_run,
        Err(response) => return response,
    };

    tracing::info!("Matching all profiles (dry run: {})", dry_run);

    match state.matchmaker.run_all(dry_run).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            tracing::error!("Run for all profiles failed: {}", e);
            error_response(&e)
        }
    }
}

/// Run the matcher for a single profile
///
/// POST /api/v1/matchmaker/run/profile
///
/// Request body:
/// ```json
/// { "profileId": 12 } or { "name": "Jane Smith", "dryRun": true }
/// ```
async fn run_for_profile(
    state: web::Data<AppState>,
    req: web::Json<RunForProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let target = match (req.profile_id, req.name) {
        (Some(id), _) => ProfileTarget::Id(id),
        (None, Some(name)) => ProfileTarget::Name(name),
        (None, None) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                message: "profileId or name is required".to_string(),
                status_code: 400,
            });
        }
    };

    tracing::info!("Matching profile {} (dry run: {})", target, req.dry_run);

    match state.matchmaker.run_for_profile(&target, req.dry_run).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            tracing::warn!("Run for profile {} failed: {}", target, e);
            error_response(&e)
        }
    }
}

/// List persisted matches, newest first
///
/// GET /api/v1/matches?limit={limit}
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<ListMatchesQuery>,
) -> impl Responder {
    // Cap limit at 100 to prevent excessive queries
    let limit = query.limit.min(100) as usize;

    match state.postgres.list_matches(limit).await {
        Ok(matches) => HttpResponse::Ok().json(MatchListResponse {
            total_results: matches.len(),
            matches,
        }),
        Err(e) => {
            tracing::error!("Failed to list matches: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
