//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, plus the health check.

use crate::web::{assignments, auth, games, records, seeding};
use crate::web::response::{ok, HandlerResult};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::login_handler,
        auth::create_account_handler,
        records::get_user_data_handler,
        records::update_daily_data_handler,
        records::insert_activity_log_handler,
        records::students_handler,
        games::update_hints_handler,
        games::increment_score_handler,
        games::update_vocabulary_score_handler,
        games::update_vocabulary_badge_handler,
        games::update_wordsearch_score_handler,
        seeding::seed_wordscramble_handler,
        seeding::seed_vocabulary_handler,
        seeding::seed_wordsearch_handler,
        assignments::list_assignments_handler,
        assignments::create_assignment_handler,
        assignments::list_progress_handler,
        assignments::create_progress_handler,
    ),
    components(
        schemas(
            auth::LoginRequest,
            auth::LoginData,
            auth::CreateAccountRequest,
            auth::CreateAccountData,
            records::GetUserDataRequest,
            records::DailyDataRequest,
            games::ScrambleWordRequest,
            games::VocabularyScoreRequest,
            games::VocabularyBadgeRequest,
            games::WordsearchScoreRequest,
            seeding::SeedWordPayload,
            seeding::SeedWordsRequest,
            seeding::SeedResult,
            assignments::CreateAssignmentRequest,
            assignments::CreateProgressRequest,
        )
    ),
    tags(
        (name = "Student Progress API", description = "Progress tracking endpoints for the school e-learning platform. Every response is wrapped in { success, data, message }.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Health
//=========================================================================================

/// GET /health - Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health_handler() -> HandlerResult<&'static str> {
    ok("OK", "Health check passed")
}
