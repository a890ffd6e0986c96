//! services/api/src/web/records.rs
//!
//! Whole-record endpoints: fetching a record, replacing daily data and the
//! activity log, and the class roster.

use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use progress_core::{
    domain::{ActivityEntry, RosterEntry, StudentRecord},
    ports::PortError,
    progress::{RecordUpdate, UpdateCounts},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::web::response::{
    ok, reply, require, require_text, ApiResponse, HandlerError, HandlerResult, JsonBody,
};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct GetUserDataRequest {
    pub email: Option<String>,
    /// Used as the record key when `email` is absent.
    pub username: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyDataRequest {
    pub username: Option<String>,
    #[schema(value_type = Object)]
    pub daily_data: Option<Value>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RosterQuery {
    pub class: Option<String>,
    pub section: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /getUserData - Fetch a full progress record
#[utoipa::path(
    post,
    path = "/getUserData",
    request_body = GetUserDataRequest,
    responses(
        (status = 200, description = "The full record document"),
        (status = 400, description = "Neither email nor username given"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_data_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<GetUserDataRequest>,
) -> HandlerResult<StudentRecord> {
    let email = req.email.filter(|e| !e.trim().is_empty());
    let key = require_text(email.or(req.username), "email")?;
    info!("Fetching user data for {}", key);

    let record = state.store.get_record(&key).await.map_err(|e| match e {
        PortError::NotFound(_) => HandlerError::NotFound("User not found".into()),
        other => other.into(),
    })?;
    ok(record, "User found")
}

/// POST /updateDailyData - Replace a record's daily data
///
/// Creates a blank record for the username when none exists.
#[utoipa::path(
    post,
    path = "/updateDailyData",
    request_body = DailyDataRequest,
    responses(
        (status = 200, description = "Daily data stored"),
        (status = 400, description = "Username and dailyData are required"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn update_daily_data_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<DailyDataRequest>,
) -> HandlerResult<UpdateCounts> {
    let username = require_text(req.username, "username")?;
    let daily_data = require(req.daily_data.filter(|v| !v.is_null()), "dailyData")?;
    info!("Updating daily data for {}", username);

    let counts = state
        .store
        .upsert_update(&username, &RecordUpdate::ReplaceDailyData(daily_data))
        .await?;

    let message = if counts.changed() {
        "Daily data updated successfully"
    } else {
        "Daily data already up to date"
    };
    ok(counts, message)
}

/// GET|POST /insertActivityLog - Overwrite the demo student's activity log
///
/// A seeding utility: the target record comes from configuration and the log
/// contents are fixed.
#[utoipa::path(
    post,
    path = "/insertActivityLog",
    responses(
        (status = 200, description = "Activity log inserted or updated")
    )
)]
pub async fn insert_activity_log_handler(
    State(state): State<Arc<AppState>>,
) -> HandlerResult<UpdateCounts> {
    let email = &state.config.seed_activity_email;
    let counts = state
        .store
        .upsert_update(email, &RecordUpdate::ReplaceActivityLog(seed_activity_log()))
        .await?;
    info!("Activity log inserted/updated for {}: {:?}", email, counts);
    ok(counts, "Activity log inserted/updated")
}

/// GET /students - Roster summaries for one class and section
#[utoipa::path(
    get,
    path = "/students",
    params(RosterQuery),
    responses(
        (status = 200, description = "Roster summaries in store order"),
        (status = 400, description = "class and section are required")
    )
)]
pub async fn students_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RosterQuery>,
) -> HandlerResult<Vec<RosterEntry>> {
    let (Some(class), Some(section)) = (
        query.class.filter(|c| !c.trim().is_empty()),
        query.section.filter(|s| !s.trim().is_empty()),
    ) else {
        warn!("Roster requested without class or section");
        return Err(HandlerError::BadRequest(
            "Please provide class and section as query parameters".into(),
        ));
    };

    let roster = state.store.roster(class.trim(), section.trim()).await?;
    let message = format!("{} students found", roster.len());
    reply(StatusCode::OK, ApiResponse::success(roster, message))
}

pub fn seed_activity_log() -> Vec<ActivityEntry> {
    vec![
        ActivityEntry::new("2025-05-20", "Vocabulary", "Learned 5 new words", 85),
        ActivityEntry::new("2025-05-20", "Grammar", "Completed passive voice exercise", 78),
        ActivityEntry::new("2025-05-19", "Speaking", "Practiced introductions", 82),
        ActivityEntry::new("2025-05-19", "Story", "Created a short story", 90),
        ActivityEntry::new("2025-05-18", "Pronunciation", "Practiced vowel sounds", 75),
        ActivityEntry::new("2025-05-17", "Reflex", "Completed basic challenge", 65),
        ActivityEntry::new("2025-05-17", "Grammar", "Practiced using articles", 88),
        ActivityEntry::new("2025-05-16", "Vocabulary", "Reviewed 10 words", 92),
    ]
}
