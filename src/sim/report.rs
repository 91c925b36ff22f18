//! What each event changed, for the driver to render

use serde::{Deserialize, Serialize};

use super::grid::{Coord, Unit};
use super::state::{RoundPhase, Session};

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// Why an event changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoOpReason {
    GridFull,
    InsufficientFunds,
    NoFusionTarget,
    RoundInactive,
    /// Coin already expired, collected, or never existed
    CoinUnavailable,
}

/// Hidden coin lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinEvent {
    Spawned { id: u32, ttl_secs: u32 },
    Expired { id: u32 },
    Collected { id: u32, value: u64 },
}

/// Result of one inbound event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Units created, with their levels
    pub added: Vec<Unit>,
    /// Cells whose unit was destroyed
    pub removed: Vec<Coord>,
    pub balance_delta: i64,
    pub balance: u64,
    pub time_remaining: u32,
    pub phase: RoundPhase,
    /// Set only on the event that ended the round
    pub outcome: Option<Outcome>,
    pub noop: Option<NoOpReason>,
    pub coins: Vec<CoinEvent>,
}

impl StepReport {
    /// Current state with no changes recorded
    pub(crate) fn snapshot(session: &Session) -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            balance_delta: 0,
            balance: session.balance,
            time_remaining: session.time_remaining,
            phase: session.phase,
            outcome: None,
            noop: None,
            coins: Vec::new(),
        }
    }

    pub(crate) fn noop(session: &Session, reason: NoOpReason) -> Self {
        Self {
            noop: Some(reason),
            ..Self::snapshot(session)
        }
    }

    /// Fill in the post-event totals
    pub(crate) fn settle(mut self, session: &Session, balance_before: u64) -> Self {
        self.balance = session.balance;
        self.balance_delta = session.balance as i64 - balance_before as i64;
        self.time_remaining = session.time_remaining;
        self.phase = session.phase;
        self
    }

    pub fn is_noop(&self) -> bool {
        self.noop.is_some()
    }
}
