//! services/api/src/web/games.rs
//!
//! Per-word game progress endpoints. Each request becomes one `RecordUpdate`
//! applied atomically to the caller's record.

use axum::{extract::State, http::StatusCode};
use progress_core::{
    domain::Score,
    levels::{Difficulty, Level},
    progress::{RecordUpdate, UpdateCounts},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::web::response::{
    ok, reply, require, require_parsed, require_text, ApiResponse, HandlerError, HandlerResult,
    JsonBody,
};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

/// Identifies one word-scramble entry.
#[derive(Deserialize, ToSchema)]
pub struct ScrambleWordRequest {
    pub email: Option<String>,
    /// `easy`, `medium` or `hard`.
    pub difficulty: Option<String>,
    pub word: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct VocabularyScoreRequest {
    pub email: Option<String>,
    /// A level (`beginner`...) or a difficulty (`easy`...).
    pub difficulty: Option<String>,
    pub word: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct VocabularyBadgeRequest {
    pub email: Option<String>,
    pub badge: Option<String>,
    pub level: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct WordsearchScoreRequest {
    pub email: Option<String>,
    pub level: Option<String>,
    /// Any JSON number; fractional scores are kept as sent.
    #[schema(value_type = Option<f64>)]
    pub score: Option<Score>,
    pub word: Option<String>,
}

//=========================================================================================
// Word Scramble
//=========================================================================================

/// POST /updatehints - Count one more hint for a scramble word
///
/// Every call increments; there is no "already used" guard.
#[utoipa::path(
    post,
    path = "/updatehints",
    request_body = ScrambleWordRequest,
    responses(
        (status = 200, description = "Hint counted"),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "No record or word matched")
    )
)]
pub async fn update_hints_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ScrambleWordRequest>,
) -> HandlerResult<UpdateCounts> {
    let email = require_text(req.email, "email")?;
    let difficulty: Difficulty = require_parsed(req.difficulty, "difficulty")?;
    let word = require_text(req.word, "word")?;

    let counts = state
        .store
        .apply_update(&email, &RecordUpdate::IncrementHint { difficulty, word })
        .await?;

    if counts.modified == 0 {
        warn!("Hint update for {} matched no word", email);
        return reply(
            StatusCode::NOT_FOUND,
            ApiResponse::failure(counts, "User or word not found"),
        );
    }
    ok(counts, "Hint count updated")
}

/// POST /increment-score - Mark a scramble word solved and score it once
#[utoipa::path(
    post,
    path = "/increment-score",
    request_body = ScrambleWordRequest,
    responses(
        (status = 200, description = "Word solved, or already solved when success is false"),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn increment_score_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ScrambleWordRequest>,
) -> HandlerResult<UpdateCounts> {
    let email = require_text(req.email, "email")?;
    let difficulty: Difficulty = require_parsed(req.difficulty, "difficulty")?;
    let word = require_text(req.word, "word")?;

    let counts = state
        .store
        .apply_update(&email, &RecordUpdate::SolveScrambleWord { difficulty, word })
        .await?;

    if counts.modified == 0 {
        return reply(
            StatusCode::OK,
            ApiResponse::failure(counts, "Already solved or word not found"),
        );
    }
    info!("{} solved a {} scramble word", email, difficulty);
    ok(counts, "Word marked as solved and score incremented")
}

//=========================================================================================
// Vocabulary Arcade
//=========================================================================================

/// POST /updateVocabularyArchadeScore - Mark a vocabulary word solved and score it once
#[utoipa::path(
    post,
    path = "/updateVocabularyArchadeScore",
    request_body = VocabularyScoreRequest,
    responses(
        (status = 200, description = "Word solved"),
        (status = 400, description = "Missing fields, or word not found or already solved")
    )
)]
pub async fn update_vocabulary_score_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<VocabularyScoreRequest>,
) -> HandlerResult<UpdateCounts> {
    let email = require_text(req.email, "email")?;
    let level: Level = require_parsed(req.difficulty, "difficulty")?;
    let word = require_text(req.word, "word")?;

    let counts = state
        .store
        .apply_update(&email, &RecordUpdate::SolveVocabularyWord { level, word })
        .await?;

    if counts.modified == 0 {
        return reply(
            StatusCode::BAD_REQUEST,
            ApiResponse::failure(counts, "Word not found or already solved"),
        );
    }
    ok(counts, "Vocabulary word solved")
}

/// POST /updateVocabularyBadge - Set the badge for a vocabulary level
///
/// Last writer wins; a lower badge may replace a higher one.
#[utoipa::path(
    post,
    path = "/updateVocabularyBadge",
    request_body = VocabularyBadgeRequest,
    responses(
        (status = 200, description = "Badge set"),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_vocabulary_badge_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<VocabularyBadgeRequest>,
) -> HandlerResult<UpdateCounts> {
    let email = require_text(req.email, "email")?;
    let badge = require_text(req.badge, "badge")?;
    let level: Level = require_parsed(req.level, "level")?;

    let counts = state
        .store
        .apply_update(&email, &RecordUpdate::SetVocabularyBadge { level, badge })
        .await?;

    if counts.matched == 0 {
        return Err(HandlerError::NotFound("User not found".into()));
    }
    ok(counts, "Badge updated")
}

//=========================================================================================
// Word Search
//=========================================================================================

/// POST /updateWordsearchScore - Mark a word-search word solved and set the level score
#[utoipa::path(
    post,
    path = "/updateWordsearchScore",
    request_body = WordsearchScoreRequest,
    responses(
        (status = 200, description = "Score and word updated"),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "No update made, the word may not exist")
    )
)]
pub async fn update_wordsearch_score_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<WordsearchScoreRequest>,
) -> HandlerResult<UpdateCounts> {
    let email = require_text(req.email, "email")?;
    let level: Level = require_parsed(req.level, "level")?;
    let word = require_text(req.word, "word")?;
    let score = require(req.score, "score")?;

    let counts = state
        .store
        .apply_update(&email, &RecordUpdate::SolveWordSearchWord { level, word, score })
        .await?;

    if counts.modified == 0 {
        return reply(
            StatusCode::NOT_FOUND,
            ApiResponse::failure(counts, "No update made, the word may not exist"),
        );
    }
    ok(counts, "Score and word updated successfully")
}
