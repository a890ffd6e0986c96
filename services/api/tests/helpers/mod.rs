#![allow(dead_code)]

use api_lib::{
    config::Config,
    web::{self, state::AppState},
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use progress_core::{
    domain::{
        Assignment, AssignmentFilter, AssignmentProgress, NewAccount, ProgressFilter,
        RosterEntry, StudentCredentials, StudentRecord,
    },
    ports::{PortError, PortResult, ProgressStore},
    progress::{RecordUpdate, UpdateCounts},
    seeding::SeedBatch,
    AccountIdentity,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const SEED_EMAIL: &str = "demo.student@example.com";

struct Stored {
    email: String,
    hashed_password: Option<String>,
    record: StudentRecord,
}

/// `ProgressStore` kept in memory, in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Stored>>,
    assignments: Mutex<Vec<Assignment>>,
    progress: Mutex<Vec<AssignmentProgress>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Inserts a record given as its JSON document.
    pub fn insert_json(&self, doc: Value) {
        let record: StudentRecord = serde_json::from_value(doc).unwrap();
        self.insert(record, None);
    }

    pub fn insert_with_password(&self, doc: Value, password: &str) {
        let record: StudentRecord = serde_json::from_value(doc).unwrap();
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();
        self.insert(record, Some(hash));
    }

    fn insert(&self, record: StudentRecord, hashed_password: Option<String>) {
        self.records.lock().unwrap().push(Stored {
            email: record.email.clone(),
            hashed_password,
            record,
        });
    }

    pub fn record(&self, email: &str) -> Option<StudentRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.email == email)
            .map(|s| s.record.clone())
    }

    pub fn has_password(&self, email: &str) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.email == email && s.hashed_password.is_some())
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn get_record(&self, email: &str) -> PortResult<StudentRecord> {
        Ok(self.get_credentials(email).await?.record)
    }

    async fn get_credentials(&self, email: &str) -> PortResult<StudentCredentials> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.email == email)
            .map(|s| StudentCredentials {
                record: s.record.clone(),
                hashed_password: s.hashed_password.clone(),
            })
            .ok_or_else(|| PortError::NotFound(email.to_string()))
    }

    async fn insert_account(&self, account: NewAccount) -> PortResult<()> {
        if self.record(&account.record.email).is_some() {
            return Err(PortError::Conflict(account.record.email));
        }
        self.insert(account.record, account.hashed_password);
        Ok(())
    }

    async fn roster(&self, class: &str, section: &str) -> PortResult<Vec<RosterEntry>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.record.in_roster(class, section))
            .map(|s| s.record.roster_entry())
            .collect())
    }

    async fn apply_update(&self, email: &str, update: &RecordUpdate) -> PortResult<UpdateCounts> {
        let mut records = self.records.lock().unwrap();
        Ok(match records.iter_mut().find(|s| s.email == email) {
            Some(stored) => UpdateCounts::matched(update.apply(&mut stored.record)),
            None => UpdateCounts::default(),
        })
    }

    async fn upsert_update(&self, email: &str, update: &RecordUpdate) -> PortResult<UpdateCounts> {
        let mut records = self.records.lock().unwrap();
        if let Some(stored) = records.iter_mut().find(|s| s.email == email) {
            return Ok(UpdateCounts::matched(update.apply(&mut stored.record)));
        }
        let mut record = StudentRecord::blank(AccountIdentity::from_email(email));
        update.apply(&mut record);
        records.push(Stored {
            email: email.to_string(),
            hashed_password: None,
            record,
        });
        Ok(UpdateCounts::upserted())
    }

    async fn seed_words(&self, class: &str, section: &str, batch: &SeedBatch) -> PortResult<u64> {
        let mut records = self.records.lock().unwrap();
        Ok(records
            .iter_mut()
            .filter(|s| s.record.in_class_section(class, section))
            .map(|s| batch.apply(&mut s.record))
            .filter(|changed| *changed)
            .count() as u64)
    }

    async fn list_assignments(&self, filter: &AssignmentFilter) -> PortResult<Vec<Assignment>> {
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.class.as_ref().map_or(true, |c| &a.target_class == c))
            .filter(|a| filter.section.as_ref().map_or(true, |s| &a.target_section == s))
            .cloned()
            .collect())
    }

    async fn create_assignment(&self, assignment: Assignment) -> PortResult<Assignment> {
        let mut assignments = self.assignments.lock().unwrap();
        if assignments.iter().any(|a| a.id == assignment.id) {
            return Err(PortError::Conflict(assignment.id));
        }
        assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn list_progress(&self, filter: &ProgressFilter) -> PortResult<Vec<AssignmentProgress>> {
        Ok(self
            .progress
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.student_id.as_ref().map_or(true, |s| &p.student_id == s))
            .filter(|p| {
                filter
                    .assignment_id
                    .as_ref()
                    .map_or(true, |a| &p.assignment_id == a)
            })
            .cloned()
            .collect())
    }

    async fn create_progress(&self, progress: AssignmentProgress) -> PortResult<AssignmentProgress> {
        self.progress.lock().unwrap().push(progress.clone());
        Ok(progress)
    }
}

pub fn test_config(template_email: Option<&str>) -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: String::new(),
        log_level: tracing::Level::INFO,
        db_max_connections: 1,
        template_email: template_email.map(str::to_string),
        seed_activity_email: SEED_EMAIL.to_string(),
    }
}

pub fn make_app(store: Arc<MemoryStore>) -> Router {
    make_app_with_config(store, test_config(None))
}

pub fn make_app_with_config(store: Arc<MemoryStore>, config: Config) -> Router {
    let state = Arc::new(AppState {
        store,
        config: Arc::new(config),
    });
    web::router(state)
}

/// Sends one request and returns the status and decoded JSON body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

/// A student document with one word in every game bucket.
pub fn student_doc(email: &str, class: &str, section: &str) -> Value {
    serde_json::json!({
        "id": format!("id-{}", email),
        "email": email,
        "fullName": "Test Student",
        "role": "student",
        "classes": [class],
        "sections": [section],
        "speakingCompletion": 40,
        "overall": 55,
        "timeSpent": 120,
        "wordscramble": {
            "easy": [["apple", 0, false]],
            "medium": [["planet", 0, false]],
            "hard": [["nebula", 0, false]],
            "easyscore": { "score": 0 },
            "mediumscore": { "score": 0 },
            "hardscore": { "score": 0 }
        },
        "vocabularyArchade": {
            "beginner": {
                "score": 0,
                "badge": "",
                "wordDetails": [{
                    "word": "brave",
                    "definition": "ready to face danger",
                    "incorrectDefinitions": ["sleepy", "hungry"],
                    "partOfSpeech": "adjective",
                    "example": "The brave knight.",
                    "hint": "courage",
                    "isSolved": false
                }]
            }
        },
        "wordsearch": {
            "beginner": {
                "score": 0,
                "words": [{ "word": "CAT", "hint": "pet", "solved": false }]
            }
        }
    })
}
