//! crates/progress_core/src/seeding.rs
//!
//! Bulk content seeding: words submitted for a class/section are bucketed by
//! difficulty and appended to every matching record.

use std::collections::BTreeMap;

use crate::domain::{ScrambleEntry, StudentRecord, VocabularyWord, WordSearchWord};
use crate::levels::Difficulty;

/// Which game the words are seeded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedTarget {
    /// `wordscramble.<difficulty>`
    WordScramble,
    /// `vocabularyArchade.<level>.wordDetails`
    Vocabulary,
    /// `wordsearch.<level>.words`
    WordSearch,
}

/// One submitted word. Fields a game does not use are ignored for that game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedWord {
    pub word: String,
    pub difficulty: String,
    pub hint: String,
    pub definition: String,
    pub incorrect_definitions: Vec<String>,
    pub part_of_speech: String,
    pub example: String,
}

/// Words grouped per difficulty, ready to append. Order within a bucket
/// follows submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedBatch {
    target: SeedTarget,
    buckets: BTreeMap<Difficulty, Vec<SeedWord>>,
    skipped: usize,
}

impl SeedBatch {
    /// Buckets `words` by difficulty. Words with an unrecognized difficulty are
    /// dropped and only counted.
    pub fn new(target: SeedTarget, words: Vec<SeedWord>) -> Self {
        let mut buckets: BTreeMap<Difficulty, Vec<SeedWord>> = BTreeMap::new();
        let mut skipped = 0;
        for word in words {
            match word.difficulty.parse::<Difficulty>() {
                Ok(difficulty) => buckets.entry(difficulty).or_default().push(word),
                Err(_) => skipped += 1,
            }
        }
        Self {
            target,
            buckets,
            skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn word_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Appends every bucket to the record. Existing entries are kept as they are,
    /// and no duplicate detection is done.
    pub fn apply(&self, record: &mut StudentRecord) -> bool {
        for (difficulty, words) in &self.buckets {
            match self.target {
                SeedTarget::WordScramble => {
                    let (entries, _) = record.wordscramble.bucket_mut(*difficulty);
                    entries.extend(words.iter().map(|w| ScrambleEntry::new(&w.word)));
                }
                SeedTarget::Vocabulary => {
                    let level = record.vocabulary_archade.level_mut(difficulty.level());
                    level.word_details.extend(words.iter().map(|w| VocabularyWord {
                        word: w.word.clone(),
                        definition: w.definition.clone(),
                        incorrect_definitions: w.incorrect_definitions.clone(),
                        part_of_speech: w.part_of_speech.clone(),
                        example: w.example.clone(),
                        hint: w.hint.clone(),
                        is_solved: false,
                    }));
                }
                SeedTarget::WordSearch => {
                    let level = record.wordsearch.level_mut(difficulty.level());
                    level.words.extend(words.iter().map(|w| WordSearchWord {
                        word: w.word.to_uppercase(),
                        hint: w.hint.clone(),
                        solved: false,
                    }));
                }
            }
        }
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountIdentity;
    use crate::levels::Level;

    fn word(word: &str, difficulty: &str) -> SeedWord {
        SeedWord {
            word: word.into(),
            difficulty: difficulty.into(),
            hint: format!("hint for {}", word),
            ..Default::default()
        }
    }

    fn record() -> StudentRecord {
        let mut record = StudentRecord::blank(AccountIdentity::from_email("s@school.org"));
        record.wordscramble.easy.push(ScrambleEntry::new("old"));
        record
    }

    #[test]
    fn unknown_difficulties_are_skipped() {
        let batch = SeedBatch::new(
            SeedTarget::WordScramble,
            vec![word("a", "easy"), word("b", "expert"), word("c", "")],
        );
        assert_eq!(batch.word_count(), 1);
        assert_eq!(batch.skipped(), 2);
    }

    #[test]
    fn scramble_words_append_after_existing_entries() {
        let batch = SeedBatch::new(
            SeedTarget::WordScramble,
            vec![word("sun", "easy"), word("moon", "easy"), word("galaxy", "hard")],
        );
        let mut record = record();
        assert!(batch.apply(&mut record));
        let easy: Vec<_> = record.wordscramble.easy.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(easy, ["old", "sun", "moon"]);
        assert_eq!(record.wordscramble.hard[0], ScrambleEntry::new("galaxy"));
        assert!(record.wordscramble.medium.is_empty());
    }

    #[test]
    fn seeding_twice_appends_twice() {
        let batch = SeedBatch::new(SeedTarget::WordScramble, vec![word("sun", "easy")]);
        let mut record = record();
        batch.apply(&mut record);
        batch.apply(&mut record);
        assert_eq!(record.wordscramble.easy.len(), 3);
    }

    #[test]
    fn vocabulary_words_land_in_mapped_level() {
        let mut seed = word("serene", "medium");
        seed.definition = "calm".into();
        seed.incorrect_definitions = vec!["loud".into(), "angry".into()];
        let batch = SeedBatch::new(SeedTarget::Vocabulary, vec![seed]);
        let mut record = record();
        batch.apply(&mut record);
        let level = record.vocabulary_archade.level(Level::Intermediate);
        assert_eq!(level.word_details.len(), 1);
        assert_eq!(level.word_details[0].definition, "calm");
        assert_eq!(level.word_details[0].incorrect_definitions.len(), 2);
        assert!(!level.word_details[0].is_solved);
    }

    #[test]
    fn word_search_words_are_upper_cased() {
        let batch = SeedBatch::new(SeedTarget::WordSearch, vec![word("comet", "hard")]);
        let mut record = record();
        batch.apply(&mut record);
        let level = record.wordsearch.level(Level::Advanced);
        assert_eq!(level.words[0].word, "COMET");
        assert_eq!(level.words[0].hint, "hint for comet");
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let batch = SeedBatch::new(SeedTarget::Vocabulary, vec![word("x", "impossible")]);
        let mut record = record();
        let before = record.clone();
        assert!(!batch.apply(&mut record));
        assert_eq!(record, before);
    }
}
