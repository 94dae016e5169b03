/// Round timing constants
pub mod round {
    /// Default length of a round in seconds
    pub const DEFAULT_TIME_LIMIT: u32 = 30;
}

/// Leaderboard constants
pub mod leaderboard {
    /// Attempt number assigned to the first recorded round
    pub const FIRST_ATTEMPT: u32 = 1;
}
