//! crates/progress_core/src/template.rs
//!
//! Construction of fresh progress records for new accounts, either from scratch
//! or from a reference record whose progress is reset.

use serde_json::{json, Number, Value};

use crate::domain::{
    AccountIdentity, ActivityEntry, Score, ScrambleEntry, StudentRecord, VocabularyArcade,
    VocabularyLevel, VocabularyWord, WordScramble, WordSearch, WordSearchLevel, WordSearchWord,
};

/// Store-native and credential keys that must not be carried from a template
/// into a new record.
const STORE_KEYS: [&str; 2] = ["_id", "password"];

/// Resets progress state: booleans to `false`, integers to `0`, recursively.
/// Text such as words, hints and definitions is left as is.
pub trait ResetProgress {
    fn reset_progress(&mut self);
}

impl<T: ResetProgress> ResetProgress for Vec<T> {
    fn reset_progress(&mut self) {
        self.iter_mut().for_each(ResetProgress::reset_progress);
    }
}

impl ResetProgress for Value {
    fn reset_progress(&mut self) {
        match self {
            Value::Bool(b) => *b = false,
            Value::Number(n) if n.is_f64() => {
                *n = Number::from_f64(0.0).unwrap_or_else(|| 0.into());
            }
            Value::Number(n) => *n = 0.into(),
            Value::Array(items) => items.iter_mut().for_each(ResetProgress::reset_progress),
            Value::Object(map) => map.values_mut().for_each(ResetProgress::reset_progress),
            Value::Null | Value::String(_) => {}
        }
    }
}

impl ResetProgress for Score {
    fn reset_progress(&mut self) {
        *self = Score::default();
    }
}

impl ResetProgress for ActivityEntry {
    fn reset_progress(&mut self) {
        self.score.reset_progress();
    }
}

impl ResetProgress for ScrambleEntry {
    fn reset_progress(&mut self) {
        self.hints = 0;
        self.solved = false;
    }
}

impl ResetProgress for WordScramble {
    fn reset_progress(&mut self) {
        for difficulty in crate::levels::Difficulty::ALL {
            let (entries, counter) = self.bucket_mut(difficulty);
            entries.reset_progress();
            counter.score.reset_progress();
        }
    }
}

impl ResetProgress for VocabularyWord {
    fn reset_progress(&mut self) {
        self.is_solved = false;
    }
}

impl ResetProgress for VocabularyLevel {
    fn reset_progress(&mut self) {
        self.score.reset_progress();
        self.word_details.reset_progress();
    }
}

impl ResetProgress for VocabularyArcade {
    fn reset_progress(&mut self) {
        for level in crate::levels::Level::ALL {
            self.level_mut(level).reset_progress();
        }
    }
}

impl ResetProgress for WordSearchWord {
    fn reset_progress(&mut self) {
        self.solved = false;
    }
}

impl ResetProgress for WordSearchLevel {
    fn reset_progress(&mut self) {
        self.score.reset_progress();
        self.words.reset_progress();
    }
}

impl ResetProgress for WordSearch {
    fn reset_progress(&mut self) {
        for level in crate::levels::Level::ALL {
            self.level_mut(level).reset_progress();
        }
    }
}

impl ResetProgress for StudentRecord {
    fn reset_progress(&mut self) {
        for metric in [
            &mut self.speaking_completion,
            &mut self.pronunciation_completion,
            &mut self.vocabulary_completion,
            &mut self.grammar_completion,
            &mut self.story_completion,
            &mut self.reflex_completion,
            &mut self.overall,
            &mut self.time_spent,
        ] {
            metric.reset_progress();
        }
        self.activity_log.reset_progress();
        self.daily_data.reset_progress();
        self.wordscramble.reset_progress();
        self.vocabulary_archade.reset_progress();
        self.wordsearch.reset_progress();
        self.extra.values_mut().for_each(ResetProgress::reset_progress);
    }
}

impl StudentRecord {
    /// A record with no progress and empty game buckets.
    pub fn blank(identity: AccountIdentity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            full_name: identity.full_name,
            role: identity.role,
            classes: identity.classes,
            sections: identity.sections,
            speaking_completion: json!(0),
            pronunciation_completion: json!(0),
            vocabulary_completion: json!(0),
            grammar_completion: json!(0),
            story_completion: json!(0),
            reflex_completion: json!(0),
            overall: json!(0),
            time_spent: json!(0),
            activity_log: Vec::new(),
            daily_data: json!([]),
            wordscramble: WordScramble::default(),
            vocabulary_archade: VocabularyArcade::default(),
            wordsearch: WordSearch::default(),
            extra: Default::default(),
        }
    }

    /// Clones the template's shape, resets its progress and applies `identity`.
    pub fn from_template(template: &StudentRecord, identity: AccountIdentity) -> Self {
        let mut record = template.clone();
        for key in STORE_KEYS {
            record.extra.remove(key);
        }
        record.reset_progress();
        record.id = identity.id;
        record.email = identity.email;
        record.full_name = identity.full_name;
        record.role = identity.role;
        record.classes = identity.classes;
        record.sections = identity.sections;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::levels::{Difficulty, Level};

    fn identity() -> AccountIdentity {
        AccountIdentity {
            id: "new-1".into(),
            email: "new@school.org".into(),
            full_name: "New Kid".into(),
            role: Role::Student,
            classes: vec!["6".into()],
            sections: vec!["C".into()],
        }
    }

    fn template() -> StudentRecord {
        serde_json::from_value(json!({
            "_id": "ref@school.org",
            "id": "ref",
            "email": "ref@school.org",
            "fullName": "Reference",
            "role": "teacher",
            "classes": ["1"],
            "sections": ["A"],
            "speakingCompletion": 88,
            "timeSpent": 12.5,
            "activityLog": [{ "date": "2025-05-20", "module": "Story", "activity": "Wrote", "score": 90 }],
            "dailyData": [{ "date": "2025-05-20", "speaking": 4, "done": true }],
            "wordscramble": {
                "medium": [["planet", 3, true]],
                "mediumscore": { "score": 5 }
            },
            "vocabularyArchade": {
                "advanced": {
                    "score": 4,
                    "badge": "gold",
                    "wordDetails": [{ "word": "vivid", "definition": "bright", "isSolved": true }]
                }
            },
            "wordsearch": {
                "beginner": { "score": 9, "words": [{ "word": "CAT", "hint": "pet", "solved": true }] }
            },
            "streak": { "days": 4, "active": true, "label": "week" }
        }))
        .unwrap()
    }

    #[test]
    fn template_reset_zeroes_every_counter_and_flag() {
        let record = StudentRecord::from_template(&template(), identity());

        assert_eq!(record.speaking_completion, json!(0));
        assert_eq!(record.time_spent, json!(0.0));
        assert_eq!(record.activity_log[0].score, 0);
        assert_eq!(record.activity_log[0].module, "Story");
        assert_eq!(record.daily_data, json!([{ "date": "2025-05-20", "speaking": 0, "done": false }]));

        let (words, counter) = record.wordscramble.bucket(Difficulty::Medium);
        assert_eq!(words[0], ScrambleEntry::new("planet"));
        assert_eq!(counter.score, 0);

        let vocab = record.vocabulary_archade.level(Level::Advanced);
        assert_eq!(vocab.score, 0);
        assert!(!vocab.word_details[0].is_solved);
        assert_eq!(vocab.word_details[0].definition, "bright");

        let search = record.wordsearch.level(Level::Beginner);
        assert_eq!(search.score, 0);
        assert!(!search.words[0].solved);

        assert_eq!(record.extra["streak"], json!({ "days": 0, "active": false, "label": "week" }));
    }

    #[test]
    fn template_identity_is_replaced() {
        let record = StudentRecord::from_template(&template(), identity());
        assert_eq!(record.id, "new-1");
        assert_eq!(record.email, "new@school.org");
        assert_eq!(record.full_name, "New Kid");
        assert_eq!(record.role, Role::Student);
        assert_eq!(record.classes, vec!["6".to_string()]);
        assert!(!record.extra.contains_key("_id"));
    }

    #[test]
    fn template_password_never_reaches_new_record() {
        let mut doc = serde_json::to_value(template()).unwrap();
        doc["password"] = json!("ref-secret");
        let decoded: StudentRecord = serde_json::from_value(doc).unwrap();
        assert!(!decoded.extra.contains_key("password"));

        let mut built = template();
        built.extra.insert("password".into(), json!("ref-secret"));
        let record = StudentRecord::from_template(&built, identity());
        assert!(!record.extra.contains_key("password"));
    }

    #[test]
    fn fractional_scores_reset_to_zero() {
        let mut doc = serde_json::to_value(template()).unwrap();
        doc["wordsearch"]["beginner"]["score"] = json!(2.5);
        doc["activityLog"][0]["score"] = json!(90.5);
        let template: StudentRecord = serde_json::from_value(doc).unwrap();

        let record = StudentRecord::from_template(&template, identity());
        assert_eq!(record.wordsearch.beginner.score, 0);
        assert_eq!(record.activity_log[0].score, 0);
    }

    #[test]
    fn blank_record_has_empty_buckets() {
        let record = StudentRecord::blank(identity());
        assert_eq!(record.overall, json!(0));
        assert!(record.activity_log.is_empty());
        assert_eq!(record.daily_data, json!([]));
        assert_eq!(record.wordscramble, WordScramble::default());
    }
}
