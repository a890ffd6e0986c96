//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ProgressStore` port from the `core` crate. Student records are stored as
//! JSONB documents in PostgreSQL and accessed with `sqlx`.
//!
//! Every record mutation locks its row (`SELECT ... FOR UPDATE`), applies the
//! domain update in memory and writes the document back in the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use progress_core::domain::{
    AccountIdentity, Assignment, AssignmentFilter, AssignmentProgress, NewAccount,
    ProgressFilter, RosterEntry, StudentCredentials, StudentRecord,
};
use progress_core::ports::{PortError, PortResult, ProgressStore};
use progress_core::progress::{RecordUpdate, UpdateCounts};
use progress_core::seeding::SeedBatch;
use serde_json::Value;
use sqlx::{types::Json, FromRow, PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ProgressStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Projects roster rows, skipping documents that no longer decode as a record.
fn roster_entries(docs: impl IntoIterator<Item = Value>) -> Vec<RosterEntry> {
    docs.into_iter()
        .filter_map(|doc| {
            let email = doc.get("email").and_then(Value::as_str).unwrap_or("?").to_string();
            match serde_json::from_value::<StudentRecord>(doc) {
                Ok(record) => Some(record.roster_entry()),
                Err(e) => {
                    warn!("Skipping undecodable record {} in roster: {}", email, e);
                    None
                }
            }
        })
        .collect()
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct StudentRow {
    email: String,
    password_hash: Option<String>,
    record: Json<StudentRecord>,
}
impl StudentRow {
    fn to_credentials(self) -> StudentCredentials {
        StudentCredentials {
            record: self.record.0,
            hashed_password: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct AssignmentRow {
    id: String,
    title: String,
    target_class: String,
    target_section: String,
    description: String,
    created_at: DateTime<Utc>,
}
impl AssignmentRow {
    fn to_domain(self) -> Assignment {
        Assignment {
            id: self.id,
            title: self.title,
            target_class: self.target_class,
            target_section: self.target_section,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ProgressRow {
    id: Uuid,
    assignment_id: String,
    student_id: String,
    status: String,
    best_score: i64,
    time_spent: i64,
    created_at: DateTime<Utc>,
}
impl ProgressRow {
    fn to_domain(self) -> PortResult<AssignmentProgress> {
        Ok(AssignmentProgress {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            status: self.status.parse().map_err(PortError::Unexpected)?,
            best_score: self.best_score,
            time_spent: self.time_spent,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// Record Helpers
//=========================================================================================

impl DbAdapter {
    async fn lock_record(
        tx: &mut Transaction<'static, Postgres>,
        email: &str,
    ) -> PortResult<Option<StudentRecord>> {
        let row: Option<(Json<StudentRecord>,)> =
            sqlx::query_as("SELECT record FROM student_records WHERE email = $1 FOR UPDATE")
                .bind(email)
                .fetch_optional(&mut **tx)
                .await
                .map_err(unexpected)?;
        Ok(row.map(|(Json(record),)| record))
    }

    async fn write_record(
        tx: &mut Transaction<'static, Postgres>,
        email: &str,
        record: &StudentRecord,
    ) -> PortResult<()> {
        sqlx::query("UPDATE student_records SET record = $2, updated_at = now() WHERE email = $1")
            .bind(email)
            .bind(Json(record))
            .execute(&mut **tx)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn update_locked(
        &self,
        email: &str,
        update: &RecordUpdate,
        create_missing: bool,
    ) -> PortResult<UpdateCounts> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let counts = match Self::lock_record(&mut tx, email).await? {
            Some(mut record) => {
                let modified = update.apply(&mut record);
                if modified {
                    Self::write_record(&mut tx, email, &record).await?;
                }
                UpdateCounts::matched(modified)
            }
            None if create_missing => {
                let mut record = StudentRecord::blank(AccountIdentity::from_email(email));
                update.apply(&mut record);
                let inserted = sqlx::query(
                    "INSERT INTO student_records (email, record) VALUES ($1, $2) ON CONFLICT (email) DO NOTHING",
                )
                .bind(email)
                .bind(Json(&record))
                .execute(&mut *tx)
                .await
                .map_err(unexpected)?;
                if inserted.rows_affected() == 1 {
                    UpdateCounts::upserted()
                } else {
                    UpdateCounts::default()
                }
            }
            None => UpdateCounts::default(),
        };

        tx.commit().await.map_err(unexpected)?;
        Ok(counts)
    }
}

//=========================================================================================
// `ProgressStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProgressStore for DbAdapter {
    async fn get_record(&self, email: &str) -> PortResult<StudentRecord> {
        Ok(self.get_credentials(email).await?.record)
    }

    async fn get_credentials(&self, email: &str) -> PortResult<StudentCredentials> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT email, password_hash, record FROM student_records WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Record {} not found", email)))?;

        if row.email != row.record.email {
            tracing::warn!("Record key {} differs from document email", row.email);
        }
        Ok(row.to_credentials())
    }

    async fn insert_account(&self, account: NewAccount) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO student_records (email, password_hash, record) VALUES ($1, $2, $3)",
        )
        .bind(&account.record.email)
        .bind(&account.hashed_password)
        .bind(Json(&account.record))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict(format!("Record {} already exists", account.record.email))
            }
            other => unexpected(other),
        })?;
        Ok(())
    }

    async fn roster(&self, class: &str, section: &str) -> PortResult<Vec<RosterEntry>> {
        let rows: Vec<(Json<Value>,)> = sqlx::query_as(
            "SELECT record FROM student_records \
             WHERE COALESCE(record->>'role', 'student') = 'student' \
               AND record->'classes' ? $1 \
               AND record->'sections' ? $2 \
             ORDER BY created_at ASC",
        )
        .bind(class)
        .bind(section)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(roster_entries(rows.into_iter().map(|(Json(doc),)| doc)))
    }

    async fn apply_update(&self, email: &str, update: &RecordUpdate) -> PortResult<UpdateCounts> {
        self.update_locked(email, update, false).await
    }

    async fn upsert_update(&self, email: &str, update: &RecordUpdate) -> PortResult<UpdateCounts> {
        self.update_locked(email, update, true).await
    }

    async fn seed_words(&self, class: &str, section: &str, batch: &SeedBatch) -> PortResult<u64> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let rows: Vec<(String, Json<StudentRecord>)> = sqlx::query_as(
            "SELECT email, record FROM student_records \
             WHERE record->'classes' ? $1 AND record->'sections' ? $2 \
             ORDER BY created_at ASC FOR UPDATE",
        )
        .bind(class)
        .bind(section)
        .fetch_all(&mut *tx)
        .await
        .map_err(unexpected)?;

        let mut modified = 0;
        for (email, Json(mut record)) in rows {
            if batch.apply(&mut record) {
                Self::write_record(&mut tx, &email, &record).await?;
                modified += 1;
            }
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(modified)
    }

    async fn list_assignments(&self, filter: &AssignmentFilter) -> PortResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            "SELECT id, title, target_class, target_section, description, created_at \
             FROM assignments \
             WHERE ($1::text IS NULL OR target_class = $1) \
               AND ($2::text IS NULL OR target_section = $2) \
             ORDER BY created_at ASC",
        )
        .bind(&filter.class)
        .bind(&filter.section)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_assignment(&self, assignment: Assignment) -> PortResult<Assignment> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            "INSERT INTO assignments (id, title, target_class, target_section, description, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, title, target_class, target_section, description, created_at",
        )
        .bind(&assignment.id)
        .bind(&assignment.title)
        .bind(&assignment.target_class)
        .bind(&assignment.target_section)
        .bind(&assignment.description)
        .bind(assignment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict(format!("Assignment {} already exists", assignment.id))
            }
            other => unexpected(other),
        })?;
        Ok(row.to_domain())
    }

    async fn list_progress(&self, filter: &ProgressFilter) -> PortResult<Vec<AssignmentProgress>> {
        let rows = sqlx::query_as::<_, ProgressRow>(
            "SELECT id, assignment_id, student_id, status, best_score, time_spent, created_at \
             FROM assignment_progress \
             WHERE ($1::text IS NULL OR student_id = $1) \
               AND ($2::text IS NULL OR assignment_id = $2) \
             ORDER BY created_at ASC",
        )
        .bind(&filter.student_id)
        .bind(&filter.assignment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn create_progress(&self, progress: AssignmentProgress) -> PortResult<AssignmentProgress> {
        let row = sqlx::query_as::<_, ProgressRow>(
            "INSERT INTO assignment_progress \
               (id, assignment_id, student_id, status, best_score, time_spent, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, assignment_id, student_id, status, best_score, time_spent, created_at",
        )
        .bind(progress.id)
        .bind(&progress.assignment_id)
        .bind(&progress.student_id)
        .bind(progress.status.as_str())
        .bind(progress.best_score)
        .bind(progress.time_spent)
        .bind(progress.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        row.to_domain()
    }
}
