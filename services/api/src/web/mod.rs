pub mod assignments;
pub mod auth;
pub mod games;
pub mod middleware;
pub mod records;
pub mod response;
pub mod rest;
pub mod seeding;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use self::state::AppState;

/// Builds the full API router. Cross-origin requests are allowed from anywhere.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let progress_routes = Router::new()
        .route("/login", post(auth::login_handler))
        .route("/create_account", post(auth::create_account_handler))
        .route("/getUserData", post(records::get_user_data_handler))
        .route("/updateDailyData", post(records::update_daily_data_handler))
        .route(
            "/insertActivityLog",
            get(records::insert_activity_log_handler).post(records::insert_activity_log_handler),
        )
        .route("/students", get(records::students_handler))
        .route("/updatehints", post(games::update_hints_handler))
        .route("/increment-score", post(games::increment_score_handler))
        .route(
            "/updateVocabularyArchadeScore",
            post(games::update_vocabulary_score_handler),
        )
        .route(
            "/updateVocabularyBadge",
            post(games::update_vocabulary_badge_handler),
        )
        .route(
            "/updateWordsearchScore",
            post(games::update_wordsearch_score_handler),
        )
        .route(
            "/update-wordscramble-words",
            post(seeding::seed_wordscramble_handler),
        )
        .route("/update-vocab", post(seeding::seed_vocabulary_handler))
        .route("/update-wordsearch", post(seeding::seed_wordsearch_handler));

    let assignment_routes = Router::new()
        .route(
            "/assignments",
            get(assignments::list_assignments_handler).post(assignments::create_assignment_handler),
        )
        .route(
            "/progress",
            get(assignments::list_progress_handler).post(assignments::create_progress_handler),
        );

    Router::new()
        .route("/health", get(rest::health_handler))
        .merge(progress_routes)
        .nest("/api", assignment_routes)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(cors)
        .with_state(app_state)
}
