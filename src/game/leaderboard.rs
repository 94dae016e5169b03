//! Leaderboard of finished rounds
//!
//! Entries are stored in attempt order. Score ordering is a display view
//! computed on demand.

use std::num::NonZeroU32;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::constants::leaderboard::FIRST_ATTEMPT;
use crate::game::state::{GameState, StateError, ValidationError};

/// One historical result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    attempt: NonZeroU32,
    score: i64,
}

impl LeaderboardEntry {
    pub fn new(attempt: u32, score: i64) -> Result<Self, ValidationError> {
        let attempt = NonZeroU32::new(attempt).ok_or(ValidationError::ZeroAttempt)?;
        Ok(Self { attempt, score })
    }

    /// Sequence number of the play-through (always >= 1)
    pub fn attempt(&self) -> u32 {
        self.attempt.get()
    }

    pub fn score(&self) -> i64 {
        self.score
    }
}

/// Entry with its display rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub rank: u32,
    pub entry: LeaderboardEntry,
}

/// Ordered history of past attempts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LeaderboardEntry>", into = "Vec<LeaderboardEntry>")]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attempt number the next recorded round will get
    pub fn next_attempt(&self) -> Result<u32, ValidationError> {
        match self.entries.last() {
            Some(last) => last
                .attempt
                .checked_add(1)
                .map(NonZeroU32::get)
                .ok_or(ValidationError::AttemptsExhausted),
            None => Ok(FIRST_ATTEMPT),
        }
    }

    /// Append a score under the next attempt number
    pub fn record(&mut self, score: i64) -> Result<LeaderboardEntry, ValidationError> {
        let entry = LeaderboardEntry::new(self.next_attempt()?, score)?;
        self.entries.push(entry);
        debug!(attempt = entry.attempt(), score, "Recorded leaderboard entry");
        Ok(entry)
    }

    /// Record the final score of a finished round
    pub fn record_round(&mut self, state: &GameState) -> Result<LeaderboardEntry, StateError> {
        if !state.is_game_over() {
            return Err(StateError::RoundInProgress);
        }
        Ok(self.record(state.score())?)
    }

    /// Insert an entry with an explicit attempt number, keeping attempt order
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Result<(), ValidationError> {
        match self
            .entries
            .binary_search_by_key(&entry.attempt, |e| e.attempt)
        {
            Ok(_) => Err(ValidationError::DuplicateAttempt(entry.attempt())),
            Err(index) => {
                self.entries.insert(index, entry);
                Ok(())
            }
        }
    }

    /// Entries ordered by attempt number
    pub fn by_attempt(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Entries ordered by score (desc), earlier attempts first on ties
    pub fn by_score(&self) -> Vec<LeaderboardEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.attempt.cmp(&b.attempt)));
        sorted
    }

    /// Highest score; the earliest attempt wins a tie
    pub fn best(&self) -> Option<&LeaderboardEntry> {
        self.entries
            .iter()
            .reduce(|best, e| if e.score > best.score { e } else { best })
    }

    /// Score-ordered entries with 1-based ranks
    pub fn standings(&self) -> Vec<Standing> {
        self.by_score()
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Standing {
                rank: (i + 1) as u32,
                entry,
            })
            .collect()
    }
}

impl TryFrom<Vec<LeaderboardEntry>> for Leaderboard {
    type Error = ValidationError;

    fn try_from(mut entries: Vec<LeaderboardEntry>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.attempt) {
                return Err(ValidationError::DuplicateAttempt(entry.attempt()));
            }
        }
        entries.sort_by_key(|e| e.attempt);
        Ok(Self { entries })
    }
}

impl From<Leaderboard> for Vec<LeaderboardEntry> {
    fn from(board: Leaderboard) -> Self {
        board.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(scores: &[i64]) -> Leaderboard {
        let mut board = Leaderboard::new();
        for &score in scores {
            board.record(score).unwrap();
        }
        board
    }

    fn finished_round(score: i64) -> GameState {
        let mut state = GameState::start_round(30);
        state.add_score(score).unwrap();
        state.finish().unwrap();
        state
    }

    #[test]
    fn test_entry_rejects_zero_attempt() {
        assert_eq!(LeaderboardEntry::new(0, 10), Err(ValidationError::ZeroAttempt));

        let entry = LeaderboardEntry::new(1, 10).unwrap();
        assert_eq!(entry.attempt(), 1);
        assert_eq!(entry.score(), 10);
    }

    #[test]
    fn test_record_assigns_sequential_attempts() {
        let board = board(&[5, 12, 7]);

        let attempts: Vec<u32> = board.by_attempt().iter().map(|e| e.attempt()).collect();
        assert_eq!(attempts, vec![1, 2, 3]);
        assert!(attempts.iter().all(|&a| a >= 1));
    }

    #[test]
    fn test_record_round_requires_finished_round() {
        let mut board = Leaderboard::new();
        let state = GameState::start_round(30);

        assert_eq!(board.record_round(&state), Err(StateError::RoundInProgress));
        assert!(board.is_empty());
    }

    #[test]
    fn test_record_round_uses_final_score() {
        let mut board = Leaderboard::new();

        let entry = board.record_round(&finished_round(40)).unwrap();

        assert_eq!(entry.attempt(), 1);
        assert_eq!(entry.score(), 40);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_by_score_order() {
        let board = board(&[5, 12, 7, 12]);

        let ordered: Vec<(u32, i64)> = board
            .by_score()
            .iter()
            .map(|e| (e.attempt(), e.score()))
            .collect();

        // Ties keep the earlier attempt first
        assert_eq!(ordered, vec![(2, 12), (4, 12), (3, 7), (1, 5)]);
    }

    #[test]
    fn test_best() {
        assert!(Leaderboard::new().best().is_none());

        let board = board(&[3, 9, 9, 1]);
        let best = board.best().unwrap();
        assert_eq!(best.attempt(), 2);
        assert_eq!(best.score(), 9);
    }

    #[test]
    fn test_standings_ranks() {
        let board = board(&[10, 30, 20]);
        let standings = board.standings();

        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[0].entry.score(), 30);
        assert_eq!(standings[2].rank, 3);
        assert_eq!(standings[2].entry.attempt(), 1);
    }

    #[test]
    fn test_insert_keeps_attempt_order() {
        let mut board = Leaderboard::new();
        board.insert(LeaderboardEntry::new(3, 1).unwrap()).unwrap();
        board.insert(LeaderboardEntry::new(1, 2).unwrap()).unwrap();

        assert_eq!(board.by_attempt()[0].attempt(), 1);
        assert_eq!(board.next_attempt(), Ok(4));

        let result = board.insert(LeaderboardEntry::new(3, 5).unwrap());
        assert_eq!(result, Err(ValidationError::DuplicateAttempt(3)));
    }

    #[test]
    fn test_attempts_exhausted() {
        let mut board = Leaderboard::new();
        board
            .insert(LeaderboardEntry::new(u32::MAX, 0).unwrap())
            .unwrap();

        assert_eq!(board.record(1), Err(ValidationError::AttemptsExhausted));
    }

    #[test]
    fn test_json_shape() {
        let board = board(&[15]);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"[{"attempt":1,"score":15}]"#);
    }

    #[test]
    fn test_json_load_sorts_and_validates() {
        let board: Leaderboard =
            serde_json::from_str(r#"[{"attempt":2,"score":4},{"attempt":1,"score":8}]"#).unwrap();
        assert_eq!(board.by_attempt()[0].attempt(), 1);

        let duplicate =
            serde_json::from_str::<Leaderboard>(r#"[{"attempt":1,"score":4},{"attempt":1,"score":8}]"#);
        assert!(duplicate.is_err());

        let zero = serde_json::from_str::<Leaderboard>(r#"[{"attempt":0,"score":4}]"#);
        assert!(zero.is_err());
    }
}
