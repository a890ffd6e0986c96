//! services/api/src/web/auth.rs
//!
//! Login and account creation endpoints.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode};
use progress_core::{
    domain::{AccountIdentity, NewAccount, Role, StudentRecord},
    ports::PortError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::response::{
    reply, require, require_list, require_parsed, require_text, ApiResponse, HandlerError,
    HandlerResult, JsonBody, OneOrMany,
};
use crate::web::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub classes: Vec<String>,
    pub sections: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub email: Option<String>,
    #[schema(value_type = Option<Vec<String>>)]
    pub classes: Option<OneOrMany>,
    #[schema(value_type = Option<Vec<String>>)]
    pub section: Option<OneOrMany>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateAccountData {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /login - Check a student's or teacher's credentials
///
/// A failed login never reveals whether the email or the password was wrong.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginData),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> HandlerResult<Option<LoginData>> {
    let email = require_text(req.email, "email")?;
    let password = require(req.password, "password")?;
    info!("Login attempt by {}", email);

    let rejected = || {
        reply(
            StatusCode::UNAUTHORIZED,
            ApiResponse::failure(None, INVALID_CREDENTIALS),
        )
    };

    // 1. Get the record and its hash by email
    let creds = match state.store.get_credentials(&email).await {
        Ok(creds) => creds,
        Err(PortError::NotFound(_)) => return rejected(),
        Err(e) => return Err(e.into()),
    };

    // 2. Verify password
    let Some(hashed) = creds.hashed_password else {
        warn!("Login for {} rejected: record has no password", email);
        return rejected();
    };
    let parsed_hash = PasswordHash::new(&hashed).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        HandlerError::Fault(format!("Unreadable password hash for {}", email))
    })?;
    let valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    if !valid {
        return rejected();
    }

    let record = creds.record;
    reply(
        StatusCode::OK,
        ApiResponse::success(
            Some(LoginData {
                id: record.id,
                email: record.email,
                full_name: record.full_name,
                role: record.role.to_string(),
                classes: record.classes,
                sections: record.sections,
            }),
            "Login successful",
        ),
    )
}

/// POST /create_account - Create a new progress record
///
/// The record is cloned from the configured template with all progress reset,
/// or built blank when no template is configured.
#[utoipa::path(
    post,
    path = "/create_account",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = CreateAccountData),
        (status = 200, description = "An account with this email already exists", body = CreateAccountData),
        (status = 400, description = "Missing email, classes or section"),
        (status = 500, description = "Template record missing or storage failure")
    )
)]
pub async fn create_account_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateAccountRequest>,
) -> HandlerResult<CreateAccountData> {
    let email = require_text(req.email, "email")?;
    let classes = require_list(req.classes, "classes")?;
    let sections = require_list(req.section, "section")?;
    let role = match req.role {
        Some(role) if !role.trim().is_empty() => require_parsed::<Role>(Some(role), "role")?,
        _ => Role::Student,
    };

    let exists = || {
        reply(
            StatusCode::OK,
            ApiResponse::failure(
                CreateAccountData {
                    status: "exists".to_string(),
                    id: None,
                },
                "An account with this email already exists",
            ),
        )
    };

    // 1. Refuse duplicates
    match state.store.get_record(&email).await {
        Ok(_) => return exists(),
        Err(PortError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    // 2. Build the record
    let identity = AccountIdentity {
        id: Uuid::new_v4().to_string(),
        email: email.clone(),
        full_name: req.full_name.unwrap_or_default().trim().to_string(),
        role,
        classes,
        sections,
    };
    let record = match &state.config.template_email {
        Some(template_email) => {
            let template = state.store.get_record(template_email).await.map_err(|e| match e {
                PortError::NotFound(_) => {
                    HandlerError::Fault(format!("Template record {} is missing", template_email))
                }
                other => other.into(),
            })?;
            StudentRecord::from_template(&template, identity)
        }
        None => StudentRecord::blank(identity),
    };

    // 3. Hash the password
    let hashed_password = match req.password.filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(&password)?),
        None => {
            warn!("Account {} created without a password; it cannot log in", email);
            None
        }
    };

    // 4. Insert, treating a lost race as "exists"
    let id = record.id.clone();
    match state
        .store
        .insert_account(NewAccount {
            record,
            hashed_password,
        })
        .await
    {
        Ok(()) => {}
        Err(PortError::Conflict(_)) => return exists(),
        Err(e) => return Err(e.into()),
    }

    info!("Created account {}", email);
    reply(
        StatusCode::CREATED,
        ApiResponse::success(
            CreateAccountData {
                status: "success".to_string(),
                id: Some(id),
            },
            "Account created",
        ),
    )
}

fn hash_password(password: &str) -> Result<String, HandlerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HandlerError::Fault(format!("Failed to hash password: {:?}", e)))
}
