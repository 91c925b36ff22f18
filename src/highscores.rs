//! Best balance across rounds
//!
//! Persisted to LocalStorage as a single integer.

use serde::{Deserialize, Serialize};

/// Highest balance ever reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BestScore {
    pub best: u64,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "level_cats_best";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Check if a balance beats the stored best
    pub fn qualifies(&self, balance: u64) -> bool {
        balance > self.best
    }

    /// Raise the best to `balance` if it is higher.
    /// Returns true when the best changed.
    pub fn record(&mut self, balance: u64) -> bool {
        if !self.qualifies(balance) {
            return false;
        }
        self.best = balance;
        true
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = serde_json::from_str::<u64>(&json) {
                    log::info!("Loaded best score {}", best);
                    return Self { best };
                }
            }
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(&self.best) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best score saved ({})", self.best);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
