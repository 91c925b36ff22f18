//! Deterministic round logic
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Grid coordinates only, no pixels
//! - Seeded RNG only
//! - Stable row-major iteration order
//! - No rendering, storage, or platform dependencies

pub mod grid;
pub mod report;
pub mod state;
pub mod tick;

pub use grid::{Coord, DIRECTIONS, Grid, Unit};
pub use report::{CoinEvent, NoOpReason, Outcome, StepReport};
pub use state::{HiddenCoin, RoundPhase, Session};
pub use tick::{collect_coin, purchase, purchase_level, reset, select, tick, toggle_pause};
