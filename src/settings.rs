//! Round configuration and presets
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("grid size {0} exceeds the maximum of {max}", max = MAX_GRID_SIZE)]
    GridTooLarge(usize),
    #[error("round length must be at least one second")]
    ZeroRoundLength,
    #[error("purchase cost must be positive")]
    FreePurchase,
    #[error("win level must be at least 2, got {0}")]
    WinLevelTooLow(u32),
    #[error("hidden coin {0} must be at least one second")]
    ZeroCoinTimer(&'static str),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Named round presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Three minute round, win at level 10
    #[default]
    Classic,
    /// One minute round, win at level 5
    Sprint,
    /// Three and a half minute round, win at level 10
    Marathon,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Sprint => "Sprint",
            Variant::Marathon => "Marathon",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "sprint" => Some(Variant::Sprint),
            "marathon" => Some(Variant::Marathon),
            _ => None,
        }
    }

    /// Round length in seconds
    pub fn round_secs(&self) -> u32 {
        match self {
            Variant::Classic => 180,
            Variant::Sprint => 60,
            Variant::Marathon => 210,
        }
    }

    /// Level whose creation wins the round
    pub fn win_level(&self) -> u32 {
        match self {
            Variant::Classic => 10,
            Variant::Sprint => 5,
            Variant::Marathon => 10,
        }
    }
}

/// Tunable parameters for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Preset the round values were derived from
    pub variant: Variant,

    // === Board ===
    /// Side length of the square grid
    pub grid_size: usize,

    // === Economy ===
    /// Balance at round start
    pub starting_balance: u64,
    /// Cost of buying one unit
    pub purchase_cost: u64,
    /// Reward per level of a freshly fused unit
    pub fusion_reward: u64,
    /// Bonus credited on a win
    pub win_bonus: u64,

    // === Round ===
    /// Countdown length in seconds
    pub round_secs: u32,
    /// Creating a unit of this level wins
    pub win_level: u32,

    // === Hidden coins ===
    /// Balance credited when a hidden coin is collected
    pub coin_value: u64,
    /// Seconds of active play between spawns
    pub coin_spawn_interval_secs: u32,
    /// Seconds a coin stays collectable
    pub coin_lifetime_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_variant(Variant::Classic)
    }
}

impl GameConfig {
    /// Create a config from a preset (applies preset defaults)
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            variant,
            grid_size: GRID_SIZE,
            starting_balance: STARTING_BALANCE,
            purchase_cost: PURCHASE_COST,
            fusion_reward: FUSION_REWARD,
            win_bonus: WIN_BONUS,
            round_secs: variant.round_secs(),
            win_level: variant.win_level(),
            coin_value: COIN_VALUE,
            coin_spawn_interval_secs: COIN_SPAWN_INTERVAL_SECS,
            coin_lifetime_secs: COIN_LIFETIME_SECS,
        }
    }

    /// Apply a preset (updates only the preset-dependent values)
    pub fn apply_variant(&mut self, variant: Variant) {
        self.variant = variant;
        self.round_secs = variant.round_secs();
        self.win_level = variant.win_level();
    }

    /// Check every value the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if self.round_secs == 0 {
            return Err(ConfigError::ZeroRoundLength);
        }
        if self.purchase_cost == 0 {
            return Err(ConfigError::FreePurchase);
        }
        if self.win_level < 2 {
            return Err(ConfigError::WinLevelTooLow(self.win_level));
        }
        if self.coin_spawn_interval_secs == 0 {
            return Err(ConfigError::ZeroCoinTimer("spawn interval"));
        }
        if self.coin_lifetime_secs == 0 {
            return Err(ConfigError::ZeroCoinTimer("lifetime"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "level_cats_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded {} config from LocalStorage", config.variant.as_str());
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_classic() {
        let config = GameConfig::default();
        assert_eq!(config.variant, Variant::Classic);
        assert_eq!(config.grid_size, 3);
        assert_eq!(config.starting_balance, 500);
        assert_eq!(config.purchase_cost, 30);
        assert_eq!(config.round_secs, 180);
        assert_eq!(config.win_level, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_variant_keeps_economy() {
        let mut config = GameConfig {
            purchase_cost: 45,
            ..Default::default()
        };
        config.apply_variant(Variant::Sprint);
        assert_eq!(config.round_secs, 60);
        assert_eq!(config.win_level, 5);
        assert_eq!(config.purchase_cost, 45);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("SPRINT"), Some(Variant::Sprint));
        assert_eq!(Variant::from_str("marathon"), Some(Variant::Marathon));
        assert_eq!(Variant::from_str("blitz"), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GameConfig {
            purchase_cost: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FreePurchase)));

        let config = GameConfig {
            win_level: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WinLevelTooLow(1))
        ));

        let config = GameConfig {
            grid_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyGrid)));

        let config = GameConfig {
            grid_size: MAX_GRID_SIZE + 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge(17))
        ));

        let config = GameConfig {
            grid_size: MAX_GRID_SIZE,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_rejects_huge_grid() {
        let result = GameConfig::from_json(r#"{ "grid_size": 4294967296 }"#);
        assert!(matches!(result, Err(ConfigError::GridTooLarge(_))));
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(r#"{ "round_secs": 60, "win_level": 5 }"#).unwrap();
        assert_eq!(config.round_secs, 60);
        assert_eq!(config.win_level, 5);
        assert_eq!(config.grid_size, 3);

        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "round_secs": 0 }"#),
            Err(ConfigError::ZeroRoundLength)
        ));
    }
}
