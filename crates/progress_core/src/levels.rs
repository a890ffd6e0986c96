//! crates/progress_core/src/levels.rs
//!
//! Game difficulties and vocabulary levels, and the fixed mapping between them.
//! Every nested progress bucket is addressed through these enums rather than
//! through string-built field paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Word-scramble difficulty, as sent by the clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Vocabulary-arcade and word-search level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[serde(alias = "easy")]
    Beginner,
    #[serde(alias = "medium")]
    Intermediate,
    #[serde(alias = "hard")]
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseLevelError {
    #[error("Unknown difficulty '{0}'")]
    Difficulty(String),
    #[error("Unknown level '{0}'")]
    Level(String),
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// easy -> beginner, medium -> intermediate, hard -> advanced.
    pub fn level(self) -> Level {
        match self {
            Difficulty::Easy => Level::Beginner,
            Difficulty::Medium => Level::Intermediate,
            Difficulty::Hard => Level::Advanced,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseLevelError::Difficulty(s.to_string())),
        }
    }
}

/// Accepts both level names and their difficulty aliases, since some clients
/// address vocabulary buckets with `easy`/`medium`/`hard`.
impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => other
                .parse::<Difficulty>()
                .map(Difficulty::level)
                .map_err(|_| ParseLevelError::Level(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
