//! crates/progress_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//!
//! A `StudentRecord` is a JSON document, so unlike most domain types these derive
//! serde: the camelCase field names below are the wire format clients read back
//! from `/getUserData`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::levels::{Difficulty, Level};

//=========================================================================================
// Student Record
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role '{}'", s)),
        }
    }
}

/// One student's (or teacher's) progress document, keyed by email.
///
/// Completion metrics and `dailyData` are opaque to the service and passed
/// through untouched. Fields this type does not know about are kept in `extra`
/// so that a round trip through the service never drops data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default)]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub sections: Vec<String>,

    #[serde(default)]
    pub speaking_completion: Value,
    #[serde(default)]
    pub pronunciation_completion: Value,
    #[serde(default)]
    pub vocabulary_completion: Value,
    #[serde(default)]
    pub grammar_completion: Value,
    #[serde(default)]
    pub story_completion: Value,
    #[serde(default)]
    pub reflex_completion: Value,
    #[serde(default)]
    pub overall: Value,
    #[serde(default)]
    pub time_spent: Value,

    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
    #[serde(default)]
    pub daily_data: Value,

    #[serde(default)]
    pub wordscramble: WordScramble,
    #[serde(default)]
    pub vocabulary_archade: VocabularyArcade,
    #[serde(default)]
    pub wordsearch: WordSearch,

    #[serde(flatten, deserialize_with = "without_credentials")]
    pub extra: Map<String, Value>,
}

/// Document keys holding credentials. They are dropped when a record is read,
/// so they can never be served back or copied into another record.
pub const CREDENTIAL_KEYS: [&str; 1] = ["password"];

fn without_credentials<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut extra = Map::deserialize(deserializer)?;
    for key in CREDENTIAL_KEYS {
        extra.remove(key);
    }
    Ok(extra)
}

/// The identity fields supplied when an account is created.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountIdentity {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub classes: Vec<String>,
    pub sections: Vec<String>,
}

impl AccountIdentity {
    /// An identity for a record created implicitly by an upsert.
    pub fn from_email(email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: String::new(),
            role: Role::Student,
            classes: Vec::new(),
            sections: Vec::new(),
        }
    }
}

/// A numeric score as stored in the document. Any JSON number is accepted;
/// integers stay integers on the way back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(Number);

impl Score {
    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }

    /// Adds one, keeping the integer or float representation.
    pub fn increment(&mut self) {
        let next = if let Some(n) = self.0.as_i64() {
            n.checked_add(1).map(Number::from)
        } else if let Some(n) = self.0.as_u64() {
            n.checked_add(1).map(Number::from)
        } else {
            Number::from_f64(self.as_f64() + 1.0)
        };
        if let Some(next) = next {
            self.0 = next;
        }
    }
}

impl Default for Score {
    fn default() -> Self {
        Self(Number::from(0))
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

impl PartialEq<i64> for Score {
    fn eq(&self, other: &i64) -> bool {
        self.0.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Score {
    fn eq(&self, other: &i32) -> bool {
        self.0.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<f64> for Score {
    fn eq(&self, other: &f64) -> bool {
        self.0.as_f64() == Some(*other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub date: String,
    pub module: String,
    pub activity: String,
    #[serde(default)]
    pub score: Score,
}

impl ActivityEntry {
    pub fn new(date: &str, module: &str, activity: &str, score: i64) -> Self {
        Self {
            date: date.to_string(),
            module: module.to_string(),
            activity: activity.to_string(),
            score: Score::from(score),
        }
    }
}

//=========================================================================================
// Word Scramble
//=========================================================================================

/// A scramble word, stored on the wire as the tuple `[word, hintCount, solved]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, i64, bool)", into = "(String, i64, bool)")]
pub struct ScrambleEntry {
    pub word: String,
    pub hints: i64,
    pub solved: bool,
}

impl ScrambleEntry {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            hints: 0,
            solved: false,
        }
    }
}

impl From<(String, i64, bool)> for ScrambleEntry {
    fn from((word, hints, solved): (String, i64, bool)) -> Self {
        Self { word, hints, solved }
    }
}

impl From<ScrambleEntry> for (String, i64, bool) {
    fn from(entry: ScrambleEntry) -> Self {
        (entry.word, entry.hints, entry.solved)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCounter {
    #[serde(default)]
    pub score: Score,
}

/// Per-difficulty scramble words with their companion `<difficulty>score` counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordScramble {
    #[serde(default)]
    pub easy: Vec<ScrambleEntry>,
    #[serde(default)]
    pub medium: Vec<ScrambleEntry>,
    #[serde(default)]
    pub hard: Vec<ScrambleEntry>,
    #[serde(default)]
    pub easyscore: ScoreCounter,
    #[serde(default)]
    pub mediumscore: ScoreCounter,
    #[serde(default)]
    pub hardscore: ScoreCounter,
}

impl WordScramble {
    pub fn bucket(&self, difficulty: Difficulty) -> (&[ScrambleEntry], &ScoreCounter) {
        match difficulty {
            Difficulty::Easy => (&self.easy, &self.easyscore),
            Difficulty::Medium => (&self.medium, &self.mediumscore),
            Difficulty::Hard => (&self.hard, &self.hardscore),
        }
    }

    pub fn bucket_mut(
        &mut self,
        difficulty: Difficulty,
    ) -> (&mut Vec<ScrambleEntry>, &mut ScoreCounter) {
        match difficulty {
            Difficulty::Easy => (&mut self.easy, &mut self.easyscore),
            Difficulty::Medium => (&mut self.medium, &mut self.mediumscore),
            Difficulty::Hard => (&mut self.hard, &mut self.hardscore),
        }
    }
}

//=========================================================================================
// Vocabulary Arcade
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyWord {
    pub word: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub incorrect_definitions: Vec<String>,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub is_solved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyLevel {
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub word_details: Vec<VocabularyWord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyArcade {
    #[serde(default)]
    pub beginner: VocabularyLevel,
    #[serde(default)]
    pub intermediate: VocabularyLevel,
    #[serde(default)]
    pub advanced: VocabularyLevel,
}

impl VocabularyArcade {
    pub fn level(&self, level: Level) -> &VocabularyLevel {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Advanced => &self.advanced,
        }
    }

    pub fn level_mut(&mut self, level: Level) -> &mut VocabularyLevel {
        match level {
            Level::Beginner => &mut self.beginner,
            Level::Intermediate => &mut self.intermediate,
            Level::Advanced => &mut self.advanced,
        }
    }
}

//=========================================================================================
// Word Search
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordSearchWord {
    pub word: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub solved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordSearchLevel {
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub words: Vec<WordSearchWord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordSearch {
    #[serde(default)]
    pub beginner: WordSearchLevel,
    #[serde(default)]
    pub intermediate: WordSearchLevel,
    #[serde(default)]
    pub advanced: WordSearchLevel,
}

impl WordSearch {
    pub fn level(&self, level: Level) -> &WordSearchLevel {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Advanced => &self.advanced,
        }
    }

    pub fn level_mut(&mut self, level: Level) -> &mut WordSearchLevel {
        match level {
            Level::Beginner => &mut self.beginner,
            Level::Intermediate => &mut self.intermediate,
            Level::Advanced => &mut self.advanced,
        }
    }
}

//=========================================================================================
// Class Roster
//=========================================================================================

/// The flattened per-student summary shown on the teacher dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub class: Option<String>,
    pub section: Option<String>,
    pub speaking: Value,
    pub pronunciation: Value,
    pub vocabulary: Value,
    pub grammar: Value,
    pub story: Value,
    pub reflex: Value,
    pub time_spent: Value,
    pub overall: Value,
}

impl StudentRecord {
    /// True for student records enrolled in both the class and the section.
    pub fn in_roster(&self, class: &str, section: &str) -> bool {
        self.role == Role::Student && self.in_class_section(class, section)
    }

    pub fn in_class_section(&self, class: &str, section: &str) -> bool {
        self.classes.iter().any(|c| c == class) && self.sections.iter().any(|s| s == section)
    }

    /// The local part of the email address.
    pub fn username(&self) -> &str {
        self.email.split('@').next().unwrap_or_default()
    }

    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            id: self.id.clone(),
            username: self.username().to_string(),
            full_name: self.full_name.clone(),
            class: self.classes.first().cloned(),
            section: self.sections.first().cloned(),
            speaking: self.speaking_completion.clone(),
            pronunciation: self.pronunciation_completion.clone(),
            vocabulary: self.vocabulary_completion.clone(),
            grammar: self.grammar_completion.clone(),
            story: self.story_completion.clone(),
            reflex: self.reflex_completion.clone(),
            time_spent: self.time_spent.clone(),
            overall: self.overall.clone(),
        }
    }
}

/// A stored record together with its password hash. Only used for login.
#[derive(Debug, Clone)]
pub struct StudentCredentials {
    pub record: StudentRecord,
    pub hashed_password: Option<String>,
}

/// A record ready to be inserted by account creation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub record: StudentRecord,
    pub hashed_password: Option<String>,
}

//=========================================================================================
// Assignments
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub target_class: String,
    pub target_section: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl ProgressStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::Pending => "pending",
            ProgressStatus::InProgress => "in-progress",
            ProgressStatus::Completed => "completed",
        }
    }
}

impl FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(ProgressStatus::Pending),
            "in-progress" => Ok(ProgressStatus::InProgress),
            "completed" => Ok(ProgressStatus::Completed),
            other => Err(format!("Unknown progress status '{}'", other)),
        }
    }
}

/// A student's progress on one assignment. `time_spent` is in minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentProgress {
    pub id: Uuid,
    pub assignment_id: String,
    pub student_id: String,
    pub status: ProgressStatus,
    pub best_score: i64,
    pub time_spent: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub class: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressFilter {
    pub student_id: Option<String>,
    pub assignment_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StudentRecord {
        serde_json::from_value(json!({
            "_id": "a@school.org",
            "id": "s-1",
            "email": "a@school.org",
            "fullName": "Ana",
            "role": "student",
            "classes": ["7", "8"],
            "sections": ["B"],
            "speakingCompletion": 40,
            "overall": 55,
            "wordscramble": {
                "easy": [["apple", 2, false]],
                "easyscore": { "score": 3 }
            },
            "vocabularyArchade": {
                "beginner": { "score": 1, "badge": "bronze", "wordDetails": [] }
            },
            "favouriteColour": "green"
        }))
        .unwrap()
    }

    #[test]
    fn record_round_trip_keeps_unknown_fields() {
        let record = sample();
        assert_eq!(record.extra.get("favouriteColour"), Some(&json!("green")));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["favouriteColour"], "green");
        assert_eq!(value["_id"], "a@school.org");
        assert_eq!(value["wordscramble"]["easy"][0], json!(["apple", 2, false]));
        assert_eq!(value["vocabularyArchade"]["beginner"]["badge"], "bronze");
    }

    #[test]
    fn missing_buckets_default_to_empty() {
        let record = sample();
        let (words, counter) = record.wordscramble.bucket(Difficulty::Hard);
        assert!(words.is_empty());
        assert_eq!(counter.score, 0);
        assert!(record.wordsearch.level(Level::Advanced).words.is_empty());
    }

    #[test]
    fn roster_entry_flattens_first_class_and_section() {
        let entry = sample().roster_entry();
        assert_eq!(entry.username, "a");
        assert_eq!(entry.class.as_deref(), Some("7"));
        assert_eq!(entry.section.as_deref(), Some("B"));
        assert_eq!(entry.speaking, json!(40));
        assert_eq!(entry.grammar, Value::Null);
    }

    #[test]
    fn roster_membership_requires_student_role() {
        let mut record = sample();
        assert!(record.in_roster("8", "B"));
        assert!(!record.in_roster("9", "B"));
        record.role = Role::Teacher;
        assert!(!record.in_roster("8", "B"));
    }

    #[test]
    fn credentials_are_dropped_on_read() {
        let mut doc = serde_json::to_value(sample()).unwrap();
        doc["password"] = json!("plain-secret");
        let record: StudentRecord = serde_json::from_value(doc).unwrap();
        assert!(!record.extra.contains_key("password"));
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["favouriteColour"], "green");
    }

    #[test]
    fn fractional_scores_decode_and_round_trip() {
        let record: StudentRecord = serde_json::from_value(json!({
            "email": "f@school.org",
            "activityLog": [
                { "date": "2025-05-20", "module": "Story", "activity": "x", "score": 90.5 }
            ],
            "wordscramble": { "easyscore": { "score": 1.5 } },
            "vocabularyArchade": { "beginner": { "score": 0.25 } },
            "wordsearch": { "beginner": { "score": 2.5 } }
        }))
        .unwrap();
        assert_eq!(record.activity_log[0].score, 90.5);
        assert_eq!(record.wordsearch.beginner.score, 2.5);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["wordscramble"]["easyscore"]["score"], json!(1.5));
        assert_eq!(value["vocabularyArchade"]["beginner"]["score"], json!(0.25));
    }

    #[test]
    fn score_increment_keeps_representation() {
        let mut whole = Score::from(3);
        whole.increment();
        assert_eq!(serde_json::to_value(&whole).unwrap(), json!(4));

        let mut fractional: Score = serde_json::from_value(json!(1.5)).unwrap();
        fractional.increment();
        assert_eq!(fractional, 2.5);
    }

    #[test]
    fn progress_status_uses_kebab_case() {
        assert_eq!(
            serde_json::to_value(ProgressStatus::InProgress).unwrap(),
            json!("in-progress")
        );
        assert_eq!("completed".parse::<ProgressStatus>(), Ok(ProgressStatus::Completed));
    }
}
