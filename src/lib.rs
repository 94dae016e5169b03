//! Card Quiz Library
//!
//! Round state and leaderboard model for a timed card/word guessing game,
//! plus the startup configuration handed to the front-end build tool.
//!
//! # Modules
//!
//! - `game` - Round state, answer validation and the leaderboard
//! - `config` - Build tool configuration (plugins, dev server port, import aliases)
//! - `env` - One-time `.env` loading performed before configuration is read

pub mod config;
pub mod env;
pub mod game;
