//! services/api/src/web/assignments.rs
//!
//! Assignment and per-assignment progress collections used by the teacher
//! dashboard.

use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use progress_core::domain::{
    Assignment, AssignmentFilter, AssignmentProgress, ProgressFilter, ProgressStatus,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::response::{
    ok, reply, require_parsed, require_text, ApiResponse, HandlerError, HandlerResult, JsonBody,
};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignmentQuery {
    pub class: Option<String>,
    pub section: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub target_class: Option<String>,
    pub target_section: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProgressQuery {
    pub student_id: Option<String>,
    pub assignment_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressRequest {
    pub assignment_id: Option<String>,
    pub student_id: Option<String>,
    /// `pending` (default), `in-progress` or `completed`.
    pub status: Option<String>,
    pub best_score: Option<i64>,
    /// Minutes.
    pub time_spent: Option<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /api/assignments - List assignments, optionally for one class/section
#[utoipa::path(
    get,
    path = "/api/assignments",
    params(AssignmentQuery),
    responses(
        (status = 200, description = "Assignments, oldest first")
    )
)]
pub async fn list_assignments_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AssignmentQuery>,
) -> HandlerResult<Vec<Assignment>> {
    let filter = AssignmentFilter {
        class: non_blank(query.class),
        section: non_blank(query.section),
    };
    let assignments = state.store.list_assignments(&filter).await?;
    ok(assignments, "Assignments retrieved")
}

/// POST /api/assignments - Create an assignment
#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created"),
        (status = 400, description = "Missing id"),
        (status = 409, description = "An assignment with this id already exists")
    )
)]
pub async fn create_assignment_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateAssignmentRequest>,
) -> HandlerResult<Assignment> {
    let assignment = Assignment {
        id: require_text(req.id, "id")?,
        title: req.title.unwrap_or_default(),
        target_class: req.target_class.unwrap_or_default(),
        target_section: req.target_section.unwrap_or_default(),
        description: req.description.unwrap_or_default(),
        created_at: Utc::now(),
    };

    let created = state.store.create_assignment(assignment).await?;
    info!("Created assignment {}", created.id);
    reply(
        StatusCode::CREATED,
        ApiResponse::success(created, "Assignment created"),
    )
}

/// GET /api/progress - List assignment progress entries
#[utoipa::path(
    get,
    path = "/api/progress",
    params(ProgressQuery),
    responses(
        (status = 200, description = "Progress entries, oldest first")
    )
)]
pub async fn list_progress_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProgressQuery>,
) -> HandlerResult<Vec<AssignmentProgress>> {
    let filter = ProgressFilter {
        student_id: non_blank(query.student_id),
        assignment_id: non_blank(query.assignment_id),
    };
    let progress = state.store.list_progress(&filter).await?;
    ok(progress, "Progress retrieved")
}

/// POST /api/progress - Record a student's progress on an assignment
#[utoipa::path(
    post,
    path = "/api/progress",
    request_body = CreateProgressRequest,
    responses(
        (status = 201, description = "Progress recorded"),
        (status = 400, description = "Missing assignmentId or studentId, or an unknown status")
    )
)]
pub async fn create_progress_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateProgressRequest>,
) -> HandlerResult<AssignmentProgress> {
    let status = match non_blank(req.status) {
        Some(status) => require_parsed::<ProgressStatus>(Some(status), "status")?,
        None => ProgressStatus::default(),
    };
    let best_score = req.best_score.unwrap_or(0);
    let time_spent = req.time_spent.unwrap_or(0);
    if best_score < 0 || time_spent < 0 {
        return Err(HandlerError::BadRequest(
            "bestScore and timeSpent must not be negative".into(),
        ));
    }

    let progress = AssignmentProgress {
        id: Uuid::new_v4(),
        assignment_id: require_text(req.assignment_id, "assignmentId")?,
        student_id: require_text(req.student_id, "studentId")?,
        status,
        best_score,
        time_spent,
        created_at: Utc::now(),
    };

    let created = state.store.create_progress(progress).await?;
    reply(
        StatusCode::CREATED,
        ApiResponse::success(created, "Progress recorded"),
    )
}
