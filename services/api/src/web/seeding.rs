//! services/api/src/web/seeding.rs
//!
//! Bulk content seeding for a whole class/section. Words are appended to every
//! matching record; nothing is deduplicated.

use axum::extract::State;
use progress_core::seeding::{SeedBatch, SeedTarget, SeedWord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::web::response::{ok, require_text, HandlerError, HandlerResult, JsonBody};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedWordPayload {
    pub word: Option<String>,
    /// `easy`, `medium` or `hard`. Other values are skipped.
    pub difficulty: Option<String>,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub incorrect_definitions: Vec<String>,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub example: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SeedWordsRequest {
    pub classes: Option<String>,
    pub section: Option<String>,
    pub words: Option<Vec<SeedWordPayload>>,
}

#[derive(Serialize, ToSchema)]
pub struct SeedResult {
    /// Number of records that received the words.
    pub modified: u64,
    /// Number of submitted words dropped for an unknown difficulty.
    pub skipped: usize,
}

/// POST /update-wordscramble-words - Append scramble words to a class/section
#[utoipa::path(
    post,
    path = "/update-wordscramble-words",
    request_body = SeedWordsRequest,
    responses(
        (status = 200, description = "Words appended", body = SeedResult),
        (status = 400, description = "Missing classes, section or words"),
        (status = 404, description = "No matching students")
    )
)]
pub async fn seed_wordscramble_handler(
    state: State<Arc<AppState>>,
    body: JsonBody<SeedWordsRequest>,
) -> HandlerResult<SeedResult> {
    seed(state, body, SeedTarget::WordScramble).await
}

/// POST /update-vocab - Append vocabulary-arcade words to a class/section
#[utoipa::path(
    post,
    path = "/update-vocab",
    request_body = SeedWordsRequest,
    responses(
        (status = 200, description = "Words appended", body = SeedResult),
        (status = 400, description = "Missing classes, section or words"),
        (status = 404, description = "No matching students")
    )
)]
pub async fn seed_vocabulary_handler(
    state: State<Arc<AppState>>,
    body: JsonBody<SeedWordsRequest>,
) -> HandlerResult<SeedResult> {
    seed(state, body, SeedTarget::Vocabulary).await
}

/// POST /update-wordsearch - Append word-search words to a class/section
#[utoipa::path(
    post,
    path = "/update-wordsearch",
    request_body = SeedWordsRequest,
    responses(
        (status = 200, description = "Words appended", body = SeedResult),
        (status = 400, description = "Missing classes, section or words"),
        (status = 404, description = "No matching students")
    )
)]
pub async fn seed_wordsearch_handler(
    state: State<Arc<AppState>>,
    body: JsonBody<SeedWordsRequest>,
) -> HandlerResult<SeedResult> {
    seed(state, body, SeedTarget::WordSearch).await
}

async fn seed(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SeedWordsRequest>,
    target: SeedTarget,
) -> HandlerResult<SeedResult> {
    let class = require_text(req.classes, "classes")?;
    let section = require_text(req.section, "section")?;
    let words = match req.words {
        Some(words) if !words.is_empty() => words,
        _ => return Err(HandlerError::BadRequest("Missing required field: words".into())),
    };

    let words = words
        .into_iter()
        .filter_map(|w| {
            let word = w.word.filter(|word| !word.trim().is_empty())?;
            Some(SeedWord {
                word: word.trim().to_string(),
                difficulty: w.difficulty.unwrap_or_default(),
                hint: w.hint,
                definition: w.definition,
                incorrect_definitions: w.incorrect_definitions,
                part_of_speech: w.part_of_speech,
                example: w.example,
            })
        })
        .collect();
    let batch = SeedBatch::new(target, words);
    if batch.skipped() > 0 {
        warn!("Skipped {} words with an unknown difficulty", batch.skipped());
    }

    let modified = if batch.is_empty() {
        0
    } else {
        state.store.seed_words(&class, &section, &batch).await?
    };

    if modified == 0 {
        return Err(HandlerError::NotFound(format!(
            "No matching students found for class {} section {}",
            class, section
        )));
    }

    info!(
        "Seeded {} {:?} words into {} records of {}/{}",
        batch.word_count(),
        target,
        modified,
        class,
        section
    );
    ok(
        SeedResult {
            modified,
            skipped: batch.skipped(),
        },
        format!("Words added to {} students", modified),
    )
}
