//! Level Cats entry point
//!
//! On wasm32 this exports the game controller to the JavaScript driver, which
//! owns all rendering and calls in once per second and once per player action.
//! Natively it plays a seeded demo round and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use level_cats::{Game, GameConfig, Variant};

    /// Game handle held by the JS driver. Every method returns a JSON
    /// `StepReport` (or `GameView` for `view`).
    #[wasm_bindgen]
    pub struct WebGame {
        game: Game,
    }

    fn to_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string(value).unwrap_or_else(|e| {
            log::error!("Failed to encode report: {}", e);
            String::from("null")
        })
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebGame {
            let seed = js_sys::Date::now() as u64;
            let config = GameConfig::load();
            let game = Game::with_config(config, seed).unwrap_or_else(|e| {
                log::warn!("Stored config rejected ({}), using defaults", e);
                Game::new(seed)
            });
            log::info!("Game initialized with seed: {}", seed);
            WebGame { game }
        }

        /// Switch preset and start a fresh round
        pub fn set_variant(&mut self, name: &str) -> bool {
            let Some(variant) = Variant::from_str(name) else {
                log::warn!("Unknown variant: {}", name);
                return false;
            };
            let config = GameConfig::from_variant(variant);
            config.save();
            let seed = js_sys::Date::now() as u64;
            match Game::with_config(config, seed) {
                Ok(game) => {
                    self.game = game;
                    log::info!("Switched to {} with seed: {}", variant.as_str(), seed);
                    true
                }
                Err(e) => {
                    log::error!("Preset {} rejected: {}", variant.as_str(), e);
                    false
                }
            }
        }

        pub fn view(&self) -> String {
            to_json(&self.game.view())
        }

        pub fn tick(&mut self) -> String {
            to_json(&self.game.tick())
        }

        pub fn purchase(&mut self) -> String {
            to_json(&self.game.purchase())
        }

        pub fn select(&mut self, row: i32, col: i32) -> String {
            to_json(&self.game.select(row as isize, col as isize))
        }

        pub fn collect_coin(&mut self, id: u32) -> String {
            to_json(&self.game.collect_coin(id))
        }

        pub fn toggle_pause(&mut self) -> String {
            to_json(&self.game.toggle_pause())
        }

        pub fn reset(&mut self) -> String {
            to_json(&self.game.reset())
        }

        pub fn can_purchase(&self) -> bool {
            self.game.can_purchase()
        }

        pub fn best_score(&self) -> u64 {
            self.game.best_score()
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Level Cats core loaded");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use level_cats::{Game, GameConfig};

    env_logger::init();
    log::info!("Level Cats (native) starting...");
    log::info!("Native mode runs a headless demo round - use the web build to play");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut game = match Game::with_config(GameConfig::load(), seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            return;
        }
    };

    while !game.session().phase.is_over() {
        if let Some(report) = game.autoplay_step() {
            log::debug!("{:?}", report);
        }
        // Grab every coin as soon as it shows up
        let coins: Vec<u32> = game.session().coins.iter().map(|c| c.id).collect();
        for id in coins {
            game.collect_coin(id);
        }
        game.tick();
    }

    let session = game.session();
    println!("\n{}", session.grid);
    println!(
        "{:?} with balance {} ({}s left), best {}",
        session.phase,
        session.balance,
        session.time_remaining,
        game.best_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
