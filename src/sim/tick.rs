//! Round events: clock, purchase, fusion, hidden coins
//!
//! Every event runs to completion against `&mut Session` and returns a
//! `StepReport`. Terminal checks are recomputed from the grid each time.

use rand::Rng;

use super::grid::Unit;
use super::report::{CoinEvent, NoOpReason, Outcome, StepReport};
use super::state::{HiddenCoin, RoundPhase, Session};
use crate::consts::LEVEL_SCALING_THRESHOLD;

/// Advance the round clock by one second
pub fn tick(session: &mut Session) -> StepReport {
    if !session.is_active() {
        return StepReport::noop(session, NoOpReason::RoundInactive);
    }

    let balance_before = session.balance;
    let mut report = StepReport::snapshot(session);

    session.time_remaining = session.time_remaining.saturating_sub(1);
    session.elapsed_secs += 1;

    age_coins(session, &mut report);

    if session.time_remaining == 0 {
        session.phase = RoundPhase::Lost;
        report.outcome = Some(Outcome::Loss);
        log::info!("Time up with balance {}", session.balance);
    } else if session.elapsed_secs % session.config.coin_spawn_interval_secs == 0 {
        spawn_coin(session, &mut report);
    }

    report.settle(session, balance_before)
}

/// Buy a unit into the first empty cell
pub fn purchase(session: &mut Session) -> StepReport {
    purchase_with(session, purchase_level)
}

/// Purchase with an explicit level source
pub(crate) fn purchase_with(
    session: &mut Session,
    level_for: impl FnOnce(&mut Session) -> u32,
) -> StepReport {
    if !session.is_active() {
        return StepReport::noop(session, NoOpReason::RoundInactive);
    }
    let Some(slot) = session.grid.find_empty_slot() else {
        return StepReport::noop(session, NoOpReason::GridFull);
    };
    if session.balance < session.purchase_cost() {
        return StepReport::noop(session, NoOpReason::InsufficientFunds);
    }

    let balance_before = session.balance;
    let mut report = StepReport::snapshot(session);

    let level = level_for(session);
    let unit = session.grid.place(slot, level);
    session.balance -= session.purchase_cost();
    log::debug!("Bought level {} at ({}, {})", level, slot.row, slot.col);

    report.added.push(unit);
    report.outcome = resolve_terminal(session, unit);
    report.settle(session, balance_before)
}

/// Level for a newly bought unit
///
/// Always 1 until a level-4 unit has been fused, then uniform in
/// `1..=max(2, max_level_seen / 2)`.
pub fn purchase_level(session: &mut Session) -> u32 {
    if session.max_level_seen < LEVEL_SCALING_THRESHOLD {
        return 1;
    }
    let high = (session.max_level_seen / 2).max(2);
    session.rng_mut().random_range(1..=high)
}

/// Fuse the unit at `(row, col)` with the first equal-level unit in reach
pub fn select(session: &mut Session, row: isize, col: isize) -> StepReport {
    if !session.is_active() {
        return StepReport::noop(session, NoOpReason::RoundInactive);
    }
    let Some(from) = session.grid.coord(row, col) else {
        return StepReport::noop(session, NoOpReason::NoFusionTarget);
    };
    let Some(partner) = session.grid.find_fusion_partner(from) else {
        return StepReport::noop(session, NoOpReason::NoFusionTarget);
    };
    let Some(level) = session.grid.get(from).map(|u| u.level + 1) else {
        return StepReport::noop(session, NoOpReason::NoFusionTarget);
    };

    let balance_before = session.balance;
    let mut report = StepReport::snapshot(session);

    let source = session.grid.take(from);
    let neighbor = session.grid.take(partner);
    debug_assert!(source.is_some() && neighbor.is_some());
    let fused = session.grid.place(from, level);
    session.balance += level as u64 * session.config.fusion_reward;
    session.max_level_seen = session.max_level_seen.max(level);
    log::debug!(
        "Fused ({}, {}) + ({}, {}) -> level {}",
        from.row,
        from.col,
        partner.row,
        partner.col,
        level
    );

    report.removed.extend([from, partner]);
    report.added.push(fused);
    report.outcome = resolve_terminal(session, fused);
    report.settle(session, balance_before)
}

/// Win on reaching the win level, else lose on a locked full grid
fn resolve_terminal(session: &mut Session, created: Unit) -> Option<Outcome> {
    if created.level >= session.config.win_level {
        session.balance += session.config.win_bonus;
        session.phase = RoundPhase::Won;
        log::info!(
            "Reached level {} - round won with balance {}",
            created.level,
            session.balance
        );
        return Some(Outcome::Win);
    }
    if session.grid.is_full() && !session.grid.has_valid_moves() {
        session.phase = RoundPhase::Lost;
        log::info!("Grid locked - round lost with balance {}", session.balance);
        return Some(Outcome::Loss);
    }
    None
}

/// Start a new round
pub fn reset(session: &mut Session) -> StepReport {
    let balance_before = session.balance;
    let mut report = StepReport::snapshot(session);
    report.removed = session.grid.units().map(Unit::coord).collect();
    report.coins = session
        .coins
        .iter()
        .map(|c| CoinEvent::Expired { id: c.id })
        .collect();
    session.reset();
    report.settle(session, balance_before)
}

/// Pause an active round or resume a paused one
pub fn toggle_pause(session: &mut Session) -> StepReport {
    session.phase = match session.phase {
        RoundPhase::Active => RoundPhase::Paused,
        RoundPhase::Paused => RoundPhase::Active,
        RoundPhase::Won | RoundPhase::Lost => {
            return StepReport::noop(session, NoOpReason::RoundInactive);
        }
    };
    log::debug!("Round {:?}", session.phase);
    StepReport::snapshot(session)
}

/// Pick up a live hidden coin
pub fn collect_coin(session: &mut Session, id: u32) -> StepReport {
    if !session.is_active() {
        return StepReport::noop(session, NoOpReason::RoundInactive);
    }
    let Some(idx) = session.coins.iter().position(|c| c.id == id) else {
        return StepReport::noop(session, NoOpReason::CoinUnavailable);
    };

    let balance_before = session.balance;
    let mut report = StepReport::snapshot(session);

    session.coins.remove(idx);
    let value = session.config.coin_value;
    session.balance += value;
    report.coins.push(CoinEvent::Collected { id, value });
    report.settle(session, balance_before)
}

/// Count down live coins, dropping the ones whose time ran out
fn age_coins(session: &mut Session, report: &mut StepReport) {
    for coin in &mut session.coins {
        coin.ttl_secs = coin.ttl_secs.saturating_sub(1);
    }
    session.coins.retain(|coin| {
        if coin.ttl_secs == 0 {
            report.coins.push(CoinEvent::Expired { id: coin.id });
            false
        } else {
            true
        }
    });
}

fn spawn_coin(session: &mut Session, report: &mut StepReport) {
    let coin = HiddenCoin {
        id: session.next_coin_id(),
        ttl_secs: session.config.coin_lifetime_secs,
    };
    session.coins.push(coin);
    report.coins.push(CoinEvent::Spawned {
        id: coin.id,
        ttl_secs: coin.ttl_secs,
    });
}
