//! Puzzle state and guess history.
//!
//! These records are owned by the surrounding application and borrowed by the
//! recommendation pipeline for the duration of one call. The pipeline never
//! mutates or retains them; the mutating helpers here exist so callers can
//! keep the invariants without re-implementing them.
//!
//! Word identity is case-insensitive throughout; display casing is preserved
//! as entered.

use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};

/// Number of words in a completed group and in a guess.
pub const GROUP_SIZE: usize = 4;

/// Default number of wrong guesses a puzzle allows.
pub const DEFAULT_MAX_MISTAKES: u32 = 4;

/// Lifecycle of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Words remain and the mistake ceiling has not been hit.
    Active,
    /// Every word has been placed into a correct group.
    Won,
    /// The mistake ceiling was reached.
    Lost,
}

/// A historical four-word submission, correct or not.
///
/// Immutable once recorded; the constructor is the only way in (including
/// through deserialization), so the arity invariant always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGuess")]
pub struct GuessAttempt {
    words: Vec<String>,
    correct: bool,
}

/// Unvalidated guess shape accepted off the wire.
#[derive(Debug, Deserialize)]
struct RawGuess {
    words: Vec<String>,
    correct: bool,
}

impl TryFrom<RawGuess> for GuessAttempt {
    type Error = RecommendError;

    fn try_from(raw: RawGuess) -> Result<Self> {
        Self::new(raw.words, raw.correct)
    }
}

impl GuessAttempt {
    /// Record a guess of exactly [`GROUP_SIZE`] non-blank words.
    pub fn new(words: Vec<String>, correct: bool) -> Result<Self> {
        if words.len() != GROUP_SIZE {
            return Err(RecommendError::Validation {
                message: format!("a guess must contain exactly 4 words, got {}", words.len()),
            });
        }
        if words.iter().any(|w| w.trim().is_empty()) {
            return Err(RecommendError::Validation {
                message: "guess words must not be blank".to_string(),
            });
        }
        Ok(Self { words, correct })
    }

    /// The guessed words, in submission order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether this guess was a correct group.
    pub fn is_correct(&self) -> bool {
        self.correct
    }
}

/// A solved group: four words plus the connection that binds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedGroup {
    pub words: Vec<String>,
    pub connection: Option<String>,
}

/// Full puzzle state as the caller tracks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleState {
    remaining: Vec<String>,
    completed_groups: Vec<CompletedGroup>,
    mistakes: u32,
    max_mistakes: u32,
    status: GameStatus,
}

impl PuzzleState {
    /// Start a puzzle from its word pool.
    ///
    /// Words must be non-blank and unique case-insensitively; the pool must
    /// hold whole groups.
    pub fn new(words: Vec<String>, max_mistakes: u32) -> Result<Self> {
        if words.is_empty() || words.len() % GROUP_SIZE != 0 {
            return Err(RecommendError::Validation {
                message: format!(
                    "puzzle must start with a positive multiple of 4 words, got {}",
                    words.len()
                ),
            });
        }
        if words.iter().any(|w| w.trim().is_empty()) {
            return Err(RecommendError::Validation {
                message: "puzzle words must not be blank".to_string(),
            });
        }
        let mut seen: Vec<String> = Vec::with_capacity(words.len());
        for word in &words {
            let folded = word.to_lowercase();
            if seen.contains(&folded) {
                return Err(RecommendError::Validation {
                    message: format!("duplicate puzzle word: '{}'", word),
                });
            }
            seen.push(folded);
        }

        Ok(Self {
            remaining: words,
            completed_groups: Vec::new(),
            mistakes: 0,
            max_mistakes,
            status: GameStatus::Active,
        })
    }

    /// Start a puzzle with the standard mistake ceiling.
    pub fn with_default_mistakes(words: Vec<String>) -> Result<Self> {
        Self::new(words, DEFAULT_MAX_MISTAKES)
    }

    /// Words not yet placed into a correct group, in display casing.
    pub fn remaining_words(&self) -> &[String] {
        &self.remaining
    }

    /// Groups solved so far.
    pub fn completed_groups(&self) -> &[CompletedGroup] {
        &self.completed_groups
    }

    /// Wrong guesses made so far.
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// Configured mistake ceiling.
    pub fn max_mistakes(&self) -> u32 {
        self.max_mistakes
    }

    /// Current lifecycle status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether a word is still in the pool, matched case-insensitively.
    pub fn contains(&self, word: &str) -> bool {
        let folded = word.to_lowercase();
        self.remaining.iter().any(|w| w.to_lowercase() == folded)
    }

    /// Move a solved group out of the pool.
    ///
    /// All four words must still be remaining; they are matched
    /// case-insensitively and removed with their original casing. Winning
    /// empties the pool and flips the status.
    pub fn complete_group(&mut self, words: &[String], connection: Option<String>) -> Result<()> {
        if self.status != GameStatus::Active {
            return Err(RecommendError::Validation {
                message: "puzzle is no longer active".to_string(),
            });
        }
        if words.len() != GROUP_SIZE {
            return Err(RecommendError::Validation {
                message: format!("a group holds exactly 4 words, got {}", words.len()),
            });
        }
        for word in words {
            if !self.contains(word) {
                return Err(RecommendError::Validation {
                    message: format!("word '{}' is not in the remaining pool", word),
                });
            }
        }

        let folded: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let mut removed = Vec::with_capacity(GROUP_SIZE);
        self.remaining.retain(|w| {
            if folded.contains(&w.to_lowercase()) {
                removed.push(w.clone());
                false
            } else {
                true
            }
        });

        self.completed_groups.push(CompletedGroup {
            words: removed,
            connection,
        });
        if self.remaining.is_empty() {
            self.status = GameStatus::Won;
        }
        Ok(())
    }

    /// Count a wrong guess; hitting the ceiling loses the puzzle.
    pub fn record_mistake(&mut self) -> Result<()> {
        if self.status != GameStatus::Active {
            return Err(RecommendError::Validation {
                message: "puzzle is no longer active".to_string(),
            });
        }
        self.mistakes += 1;
        if self.mistakes >= self.max_mistakes {
            self.status = GameStatus::Lost;
        }
        Ok(())
    }
}
