//! crates/progress_core/src/ports.rs
//!
//! Defines the storage contract for the application's core logic.
//! The HTTP layer only talks to `ProgressStore`, so the document store behind it
//! can be swapped (PostgreSQL in production, in-memory in tests).

use async_trait::async_trait;

use crate::domain::{
    Assignment, AssignmentFilter, AssignmentProgress, NewAccount, ProgressFilter, RosterEntry,
    StudentCredentials, StudentRecord,
};
use crate::progress::{RecordUpdate, UpdateCounts};
use crate::seeding::SeedBatch;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the storage driver.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Port
//=========================================================================================

#[async_trait]
pub trait ProgressStore: Send + Sync {
    // --- Student Records ---
    async fn get_record(&self, email: &str) -> PortResult<StudentRecord>;

    async fn get_credentials(&self, email: &str) -> PortResult<StudentCredentials>;

    /// Inserts a new record. Fails with `Conflict` when the email is taken.
    async fn insert_account(&self, account: NewAccount) -> PortResult<()>;

    /// Student records enrolled in both `class` and `section`, projected for
    /// the roster, in store order.
    async fn roster(&self, class: &str, section: &str) -> PortResult<Vec<RosterEntry>>;

    // --- Progress Updates ---
    /// Applies `update` atomically to the record for `email`. An unknown email
    /// yields zero counts, not an error.
    async fn apply_update(&self, email: &str, update: &RecordUpdate) -> PortResult<UpdateCounts>;

    /// Like `apply_update`, but creates a blank record for `email` first when
    /// none exists.
    async fn upsert_update(&self, email: &str, update: &RecordUpdate) -> PortResult<UpdateCounts>;

    /// Appends the batch to every record in `class`/`section` and returns how
    /// many records changed. Atomicity across records is not guaranteed.
    async fn seed_words(&self, class: &str, section: &str, batch: &SeedBatch) -> PortResult<u64>;

    // --- Assignments ---
    async fn list_assignments(&self, filter: &AssignmentFilter) -> PortResult<Vec<Assignment>>;

    async fn create_assignment(&self, assignment: Assignment) -> PortResult<Assignment>;

    async fn list_progress(&self, filter: &ProgressFilter) -> PortResult<Vec<AssignmentProgress>>;

    async fn create_progress(&self, progress: AssignmentProgress) -> PortResult<AssignmentProgress>;
}
