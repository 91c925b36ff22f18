//! Owning controller for one player's rounds
//!
//! Wraps a `Session` and the `BestScore`, forwards each inbound event to the
//! engine, and keeps the best score current after every event.

use serde::Serialize;

use crate::highscores::BestScore;
use crate::settings::{ConfigError, GameConfig};
use crate::sim::{self, HiddenCoin, RoundPhase, Session, StepReport, Unit};

/// Full state for a driver that (re)builds its presentation from scratch
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub grid_size: usize,
    pub units: Vec<Unit>,
    pub balance: u64,
    pub time_remaining: u32,
    pub phase: RoundPhase,
    pub purchase_cost: u64,
    pub can_purchase: bool,
    pub coins: Vec<HiddenCoin>,
    pub best: u64,
}

/// Single owner of the session; drivers talk only to this
#[derive(Debug, Clone)]
pub struct Game {
    session: Session,
    best: BestScore,
}

impl Game {
    /// New game with the default config and stored best score
    pub fn new(seed: u64) -> Self {
        Self::from_parts(Session::new(seed), BestScore::load())
    }

    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::from_parts(
            Session::with_config(config, seed)?,
            BestScore::load(),
        ))
    }

    fn from_parts(session: Session, best: BestScore) -> Self {
        let mut game = Self { session, best };
        log::info!(
            "Round started (seed {}, {}s, best {})",
            game.session.seed,
            game.session.time_remaining,
            game.best.best
        );
        game.track_best();
        game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn best_score(&self) -> u64 {
        self.best.best
    }

    /// Whether the buy button should be enabled
    pub fn can_purchase(&self) -> bool {
        self.session.is_active()
            && self.session.grid.find_empty_slot().is_some()
            && self.session.balance >= self.session.purchase_cost()
    }

    pub fn view(&self) -> GameView {
        GameView {
            grid_size: self.session.grid.size(),
            units: self.session.grid.units().copied().collect(),
            balance: self.session.balance,
            time_remaining: self.session.time_remaining,
            phase: self.session.phase,
            purchase_cost: self.session.purchase_cost(),
            can_purchase: self.can_purchase(),
            coins: self.session.coins.clone(),
            best: self.best.best,
        }
    }

    /// One second elapsed
    pub fn tick(&mut self) -> StepReport {
        let report = sim::tick(&mut self.session);
        self.observe(report)
    }

    pub fn purchase(&mut self) -> StepReport {
        let report = sim::purchase(&mut self.session);
        self.observe(report)
    }

    pub fn select(&mut self, row: isize, col: isize) -> StepReport {
        let report = sim::select(&mut self.session, row, col);
        self.observe(report)
    }

    pub fn collect_coin(&mut self, id: u32) -> StepReport {
        let report = sim::collect_coin(&mut self.session, id);
        self.observe(report)
    }

    pub fn toggle_pause(&mut self) -> StepReport {
        let report = sim::toggle_pause(&mut self.session);
        self.observe(report)
    }

    /// Discard the current round and start a new one
    pub fn reset(&mut self) -> StepReport {
        let report = sim::reset(&mut self.session);
        log::info!("Round reset (best {})", self.best.best);
        self.observe(report)
    }

    /// Idle/demo mode: fuse the first fusable unit, otherwise buy one.
    /// Returns `None` when neither move is available.
    pub fn autoplay_step(&mut self) -> Option<StepReport> {
        let target = self
            .session
            .grid
            .units()
            .map(Unit::coord)
            .find(|&at| self.session.grid.find_fusion_partner(at).is_some());

        if let Some(at) = target {
            return Some(self.select(at.row as isize, at.col as isize));
        }
        if self.can_purchase() {
            return Some(self.purchase());
        }
        None
    }

    fn observe(&mut self, report: StepReport) -> StepReport {
        if let Some(reason) = report.noop {
            log::debug!("No-op: {:?}", reason);
        }
        if let Some(outcome) = report.outcome {
            log::info!(
                "Round over: {:?}, balance {}",
                outcome,
                self.session.balance
            );
        }
        self.track_best();
        report
    }

    fn track_best(&mut self) {
        if self.best.record(self.session.balance) {
            self.best.save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Variant;
    use crate::sim::{NoOpReason, Outcome};

    #[test]
    fn test_best_tracks_balance() {
        let mut game = Game::new(1);
        assert_eq!(game.best_score(), 500);

        game.purchase();
        game.purchase();
        // Balance dropped; best holds
        assert_eq!(game.session().balance, 440);
        assert_eq!(game.best_score(), 500);

        // Two level-1 units at (0,0) and (0,1)
        let report = game.select(0, 0);
        assert_eq!(report.balance, 460);
        assert_eq!(game.best_score(), 500);

        game.reset();
        assert_eq!(game.best_score(), 500);
    }

    #[test]
    fn test_best_raised_by_fusion_chain() {
        let mut game = Game::new(1);
        // Buy and fuse repeatedly; every fusion pays more than a purchase
        for _ in 0..40 {
            game.autoplay_step();
        }
        assert!(game.best_score() >= 500);
        assert!(game.best_score() >= game.session().balance);
    }

    #[test]
    fn test_can_purchase_follows_state() {
        let mut game = Game::new(1);
        assert!(game.can_purchase());
        game.toggle_pause();
        assert!(!game.can_purchase());
        assert!(!game.view().can_purchase);
        game.toggle_pause();
        assert!(game.can_purchase());
    }

    #[test]
    fn test_view_reflects_session() {
        let config = GameConfig::from_variant(Variant::Sprint);
        let mut game = Game::with_config(config, 3).unwrap();
        game.purchase();
        let view = game.view();
        assert_eq!(view.grid_size, 3);
        assert_eq!(view.units.len(), 1);
        assert_eq!(view.time_remaining, 60);
        assert_eq!(view.phase, RoundPhase::Active);
        assert_eq!(view.balance, 470);

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"phase\":\"Active\""));
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = GameConfig {
            coin_lifetime_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            Game::with_config(config, 1),
            Err(ConfigError::ZeroCoinTimer(_))
        ));
    }

    #[test]
    fn test_autoplay_reaches_terminal_or_times_out() {
        let config = GameConfig::from_variant(Variant::Sprint);
        let mut game = Game::with_config(config, 2024).unwrap();
        while !game.session().phase.is_over() {
            game.autoplay_step();
            game.tick();
        }
        let report = game.tick();
        assert_eq!(report.noop, Some(NoOpReason::RoundInactive));
        assert!(game.best_score() >= game.session().balance);
    }

    #[test]
    fn test_timeout_round() {
        let config = GameConfig {
            round_secs: 3,
            ..Default::default()
        };
        let mut game = Game::with_config(config, 1).unwrap();
        assert_eq!(game.tick().outcome, None);
        assert_eq!(game.tick().outcome, None);
        assert_eq!(game.tick().outcome, Some(Outcome::Loss));
        assert_eq!(game.purchase().noop, Some(NoOpReason::RoundInactive));
        let report = game.reset();
        assert_eq!(report.time_remaining, 3);
        assert_eq!(report.phase, RoundPhase::Active);
    }
}
