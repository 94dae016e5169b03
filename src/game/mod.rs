pub mod constants;
pub mod leaderboard;
pub mod state;
