//! Session state for one round
//!
//! All state the engine reads or writes lives here. The driver owns its own
//! presentation handles and maps them by `Coord`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::settings::{ConfigError, GameConfig};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Round in progress, all events accepted
    #[default]
    Active,
    /// Player paused, only resume or reset
    Paused,
    /// Winning level created
    Won,
    /// Timer ran out or the grid locked up
    Lost,
}

impl RoundPhase {
    /// Round ended; only reset leaves this phase
    pub fn is_over(&self) -> bool {
        matches!(self, RoundPhase::Won | RoundPhase::Lost)
    }
}

/// A transient bonus coin, unrelated to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenCoin {
    pub id: u32,
    /// Seconds until it disappears
    pub ttl_secs: u32,
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct Session {
    /// Tunables, fixed for the life of the session
    pub config: GameConfig,
    /// Seed the RNG was created from
    pub seed: u64,
    pub grid: Grid,
    pub balance: u64,
    pub time_remaining: u32,
    pub phase: RoundPhase,
    /// Highest level fused this round, scales purchase levels
    pub max_level_seen: u32,
    /// Live hidden coins (sorted by id)
    pub coins: Vec<HiddenCoin>,
    /// Seconds of active play this round
    pub elapsed_secs: u32,
    rng: Pcg32,
    next_coin_id: u32,
}

impl Session {
    /// Create a session with the default config
    pub fn new(seed: u64) -> Self {
        Self::from_valid_config(GameConfig::default(), seed)
    }

    /// Create a session, rejecting configs the engine cannot run
    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config, seed))
    }

    fn from_valid_config(config: GameConfig, seed: u64) -> Self {
        Self {
            grid: Grid::new(config.grid_size),
            balance: config.starting_balance,
            time_remaining: config.round_secs,
            phase: RoundPhase::Active,
            max_level_seen: 1,
            coins: Vec::new(),
            elapsed_secs: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_coin_id: 1,
            seed,
            config,
        }
    }

    /// Round in progress
    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn purchase_cost(&self) -> u64 {
        self.config.purchase_cost
    }

    /// Restore every round field to its start value and destroy all units.
    /// The RNG keeps its stream so successive rounds differ.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.balance = self.config.starting_balance;
        self.time_remaining = self.config.round_secs;
        self.phase = RoundPhase::Active;
        self.max_level_seen = 1;
        self.coins.clear();
        self.elapsed_secs = 0;
    }

    pub(crate) fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Allocate a new coin ID
    pub(crate) fn next_coin_id(&mut self) -> u32 {
        let id = self.next_coin_id;
        self.next_coin_id += 1;
        id
    }
}
