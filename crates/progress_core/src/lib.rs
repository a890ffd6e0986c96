pub mod domain;
pub mod levels;
pub mod ports;
pub mod progress;
pub mod seeding;
pub mod template;

pub use domain::{
    AccountIdentity, ActivityEntry, Assignment, AssignmentFilter, AssignmentProgress, NewAccount,
    ProgressFilter, ProgressStatus, Role, RosterEntry, Score, StudentCredentials, StudentRecord,
};
pub use levels::{Difficulty, Level, ParseLevelError};
pub use ports::{PortError, PortResult, ProgressStore};
pub use progress::{RecordUpdate, UpdateCounts};
pub use seeding::{SeedBatch, SeedTarget, SeedWord};
pub use template::ResetProgress;
