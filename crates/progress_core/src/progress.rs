//! crates/progress_core/src/progress.rs
//!
//! Single-record progress mutations. Each `RecordUpdate` is applied to one
//! loaded record by the storage adapter while it holds that record exclusively,
//! so every update is atomic per document.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{ActivityEntry, Score, StudentRecord};
use crate::levels::{Difficulty, Level};

/// Matched/modified counts reported back to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub upserted: bool,
}

impl UpdateCounts {
    /// Counts for an update against a record that exists.
    pub fn matched(modified: bool) -> Self {
        Self {
            matched: 1,
            modified: u64::from(modified),
            upserted: false,
        }
    }

    /// Counts for an upsert that had to create the record.
    pub fn upserted() -> Self {
        Self {
            matched: 0,
            modified: 0,
            upserted: true,
        }
    }

    pub fn changed(&self) -> bool {
        self.modified > 0 || self.upserted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordUpdate {
    /// Adds one hint to every scramble entry for `word`. Repeatable.
    IncrementHint { difficulty: Difficulty, word: String },
    /// Marks unsolved scramble entries for `word` solved and bumps the
    /// difficulty score once. A no-op when nothing unsolved matches.
    SolveScrambleWord { difficulty: Difficulty, word: String },
    /// Marks the first unsolved vocabulary entry for `word` solved and bumps the
    /// level score.
    SolveVocabularyWord { level: Level, word: String },
    SetVocabularyBadge { level: Level, badge: String },
    /// Marks the first word-search entry equal to `word` (upper-cased) solved and
    /// sets the level score.
    SolveWordSearchWord { level: Level, word: String, score: Score },
    ReplaceDailyData(Value),
    ReplaceActivityLog(Vec<ActivityEntry>),
}

impl RecordUpdate {
    /// Applies the update and reports whether the record changed.
    pub fn apply(&self, record: &mut StudentRecord) -> bool {
        match self {
            RecordUpdate::IncrementHint { difficulty, word } => {
                let (entries, _) = record.wordscramble.bucket_mut(*difficulty);
                let mut modified = false;
                for entry in entries.iter_mut().filter(|e| &e.word == word) {
                    entry.hints += 1;
                    modified = true;
                }
                modified
            }
            RecordUpdate::SolveScrambleWord { difficulty, word } => {
                let (entries, counter) = record.wordscramble.bucket_mut(*difficulty);
                let mut modified = false;
                for entry in entries.iter_mut().filter(|e| &e.word == word && !e.solved) {
                    entry.solved = true;
                    modified = true;
                }
                if modified {
                    counter.score.increment();
                }
                modified
            }
            RecordUpdate::SolveVocabularyWord { level, word } => {
                let bucket = record.vocabulary_archade.level_mut(*level);
                match bucket
                    .word_details
                    .iter_mut()
                    .find(|w| &w.word == word && !w.is_solved)
                {
                    Some(entry) => {
                        entry.is_solved = true;
                        bucket.score.increment();
                        true
                    }
                    None => false,
                }
            }
            RecordUpdate::SetVocabularyBadge { level, badge } => {
                let bucket = record.vocabulary_archade.level_mut(*level);
                if &bucket.badge == badge {
                    return false;
                }
                bucket.badge = badge.clone();
                true
            }
            RecordUpdate::SolveWordSearchWord { level, word, score } => {
                let target = word.to_uppercase();
                let bucket = record.wordsearch.level_mut(*level);
                let Some(entry) = bucket.words.iter_mut().find(|w| w.word == target) else {
                    return false;
                };
                let modified = !entry.solved || bucket.score != *score;
                entry.solved = true;
                bucket.score = score.clone();
                modified
            }
            RecordUpdate::ReplaceDailyData(daily_data) => {
                if &record.daily_data == daily_data {
                    return false;
                }
                record.daily_data = daily_data.clone();
                true
            }
            RecordUpdate::ReplaceActivityLog(log) => {
                if &record.activity_log == log {
                    return false;
                }
                record.activity_log = log.clone();
                true
            }
        }
    }
}
