//! Level Cats - a 3x3 merge-grid puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic round logic (grid, fusion, timer, hidden coins)
//! - `game`: Owning controller that drives a session and tracks the best score
//! - `settings`: Round configuration and presets
//! - `highscores`: Best balance persisted across rounds

pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::BestScore;
pub use settings::{ConfigError, GameConfig, Variant};

/// Game configuration constants
pub mod consts {
    /// Side length of the grid
    pub const GRID_SIZE: usize = 3;
    /// Largest side length a config may ask for
    pub const MAX_GRID_SIZE: usize = 16;

    /// Economy defaults
    pub const STARTING_BALANCE: u64 = 500;
    pub const PURCHASE_COST: u64 = 30;
    /// Paid per level of the fused unit (level 3 fusion pays 30)
    pub const FUSION_REWARD: u64 = 10;
    pub const WIN_BONUS: u64 = 500;

    /// Once this level has been fused, purchases roll a random low level
    pub const LEVEL_SCALING_THRESHOLD: u32 = 4;

    /// Hidden coin defaults
    pub const COIN_VALUE: u64 = 50;
    pub const COIN_SPAWN_INTERVAL_SECS: u32 = 10;
    pub const COIN_LIFETIME_SECS: u32 = 5;

    /// Search reach along each direction
    pub const FUSION_REACH: isize = 2;
}
