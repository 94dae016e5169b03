//! Round state definitions
//!
//! `GameStateParts` is the shape exchanged with the presentation layer.
//! `GameState` is the validated form the game engine mutates: it can only be
//! built through validation, and once a round is over every mutator is
//! rejected.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::constants::round;

/// Round snapshot as exchanged with the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateParts {
    /// Seconds left in the round
    pub time_remaining: u32,
    /// Accumulated points
    pub score: i64,
    /// Round-termination flag
    pub is_game_over: bool,
    /// Cards/words currently in play
    pub current_hand: Vec<String>,
    /// Candidate answers presented to the player
    pub options: Vec<String>,
    /// Must be one of `options` while the round is active
    pub correct_answer: String,
    /// Cosmetic feedback string
    pub funny_message: String,
}

/// Validated state of one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateParts", into = "GameStateParts")]
pub struct GameState {
    time_remaining: u32,
    score: i64,
    is_game_over: bool,
    current_hand: Vec<String>,
    options: Vec<String>,
    correct_answer: String,
    funny_message: String,
}

/// Result of advancing the round clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Round still running
    Running { time_remaining: u32 },
    /// Clock hit zero on this tick; the round is now over
    Expired,
}

impl GameState {
    /// Fresh round with the given time limit (seconds)
    pub fn start_round(time_limit: u32) -> Self {
        Self {
            time_remaining: time_limit,
            score: 0,
            is_game_over: false,
            current_hand: Vec::new(),
            options: Vec::new(),
            correct_answer: String::new(),
            funny_message: String::new(),
        }
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn current_hand(&self) -> &[String] {
        &self.current_hand
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn funny_message(&self) -> &str {
        &self.funny_message
    }

    /// Re-check the answer invariant
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_answer(&self.options, &self.correct_answer, self.is_game_over)
    }

    /// Whether `answer` matches the current question's correct answer
    pub fn is_correct(&self, answer: &str) -> bool {
        !self.options.is_empty() && self.correct_answer == answer
    }

    /// Advance the round clock by `elapsed` seconds.
    ///
    /// The clock saturates at zero; reaching zero ends the round.
    pub fn tick(&mut self, elapsed: u32) -> Result<TickOutcome, StateError> {
        self.ensure_active()?;

        self.time_remaining = self.time_remaining.saturating_sub(elapsed);
        if self.time_remaining == 0 {
            self.is_game_over = true;
            debug!(score = self.score, "Round ended: time expired");
            return Ok(TickOutcome::Expired);
        }

        Ok(TickOutcome::Running {
            time_remaining: self.time_remaining,
        })
    }

    /// Add (or subtract) points, saturating at the `i64` bounds
    pub fn add_score(&mut self, delta: i64) -> Result<i64, StateError> {
        self.ensure_active()?;
        self.score = self.score.saturating_add(delta);
        Ok(self.score)
    }

    /// Replace the hand and the current question.
    ///
    /// Nothing is changed if the new question is invalid.
    pub fn deal(
        &mut self,
        hand: Vec<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<(), StateError> {
        self.ensure_active()?;

        let correct_answer = correct_answer.into();
        check_answer(&options, &correct_answer, false)?;

        self.current_hand = hand;
        self.options = options;
        self.correct_answer = correct_answer;
        Ok(())
    }

    pub fn set_funny_message(&mut self, message: impl Into<String>) -> Result<(), StateError> {
        self.ensure_active()?;
        self.funny_message = message.into();
        Ok(())
    }

    /// Reorder the presented options
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), StateError> {
        self.ensure_active()?;
        self.options.shuffle(rng);
        Ok(())
    }

    /// End the round early (e.g. the player quit or ran out of cards)
    pub fn finish(&mut self) -> Result<(), StateError> {
        self.ensure_active()?;
        self.is_game_over = true;
        debug!(score = self.score, time_remaining = self.time_remaining, "Round finished");
        Ok(())
    }

    /// Wire representation of this state
    pub fn to_parts(&self) -> GameStateParts {
        self.clone().into()
    }

    fn ensure_active(&self) -> Result<(), StateError> {
        if self.is_game_over {
            return Err(StateError::RoundOver);
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::start_round(round::DEFAULT_TIME_LIMIT)
    }
}

impl TryFrom<GameStateParts> for GameState {
    type Error = ValidationError;

    fn try_from(parts: GameStateParts) -> Result<Self, Self::Error> {
        check_answer(&parts.options, &parts.correct_answer, parts.is_game_over)?;

        Ok(Self {
            time_remaining: parts.time_remaining,
            score: parts.score,
            is_game_over: parts.is_game_over,
            current_hand: parts.current_hand,
            options: parts.options,
            correct_answer: parts.correct_answer,
            funny_message: parts.funny_message,
        })
    }
}

impl From<GameState> for GameStateParts {
    fn from(state: GameState) -> Self {
        Self {
            time_remaining: state.time_remaining,
            score: state.score,
            is_game_over: state.is_game_over,
            current_hand: state.current_hand,
            options: state.options,
            correct_answer: state.correct_answer,
            funny_message: state.funny_message,
        }
    }
}

// Only enforced while the round is active; a finished round is a record.
fn check_answer(
    options: &[String],
    correct_answer: &str,
    is_game_over: bool,
) -> Result<(), ValidationError> {
    if is_game_over || options.is_empty() {
        return Ok(());
    }
    if options.iter().any(|option| option == correct_answer) {
        Ok(())
    } else {
        Err(ValidationError::CorrectAnswerNotInOptions {
            answer: correct_answer.to_string(),
        })
    }
}

/// Data validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Correct answer '{answer}' is not one of the options")]
    CorrectAnswerNotInOptions { answer: String },
    #[error("Attempt numbers start at 1")]
    ZeroAttempt,
    #[error("Duplicate attempt number: {0}")]
    DuplicateAttempt(u32),
    #[error("Attempt counter exhausted")]
    AttemptsExhausted,
}

/// Round transition errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("Round is over")]
    RoundOver,
    #[error("Round is still in progress")]
    RoundInProgress,
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}
