//! Stock ledger tests
//!
//! Exercises the ledger invariants against an in-memory model:
//! - current stock always equals the sum of applied movement deltas
//! - the non-negativity recheck refuses overdraws even when validation
//!   passed against a stale read
//! - window aggregation reconstructs boundary stock from the snapshot
//!
//! The end-to-end scenarios mirror the IN/OUT/CHECK flows.

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::models::{reconciled_quantity, utilization_rate, MovementSummary, MovementType};

// ============================================================================
// In-memory ledger model
// ============================================================================

/// Minimal model of one item's ledger: the guarded update plus the
/// append-only movement log.
struct LedgerModel {
    stock: i32,
    movements: Vec<(MovementType, i32)>,
}

impl LedgerModel {
    fn new(initial_stock: i32) -> Self {
        Self {
            stock: initial_stock,
            movements: Vec::new(),
        }
    }

    /// The guarded update: apply the delta unless it would drive stock
    /// negative.
    fn apply_movement(&mut self, movement_type: MovementType, delta: i32) -> Result<i32, &'static str> {
        if self.stock + delta < 0 {
            return Err("insufficient stock");
        }
        self.stock += delta;
        self.movements.push((movement_type, delta));
        Ok(self.stock)
    }

    fn movement_sum(&self) -> i32 {
        self.movements.iter().map(|(_, delta)| delta).sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn stock_reconciles_with_movement_sum() {
    let mut ledger = LedgerModel::new(0);
    ledger.apply_movement(MovementType::In, 100).unwrap();
    ledger.apply_movement(MovementType::Out, -30).unwrap();
    ledger.apply_movement(MovementType::In, 10).unwrap();
    ledger.apply_movement(MovementType::Check, -5).unwrap();

    assert_eq!(ledger.stock, 75);
    assert_eq!(ledger.movement_sum(), ledger.stock);
}

#[test]
fn overdraw_is_refused_and_leaves_no_movement() {
    let mut ledger = LedgerModel::new(50);
    let result = ledger.apply_movement(MovementType::Out, -60);

    assert!(result.is_err());
    assert_eq!(ledger.stock, 50);
    assert!(ledger.movements.is_empty());
}

#[test]
fn concurrent_overdraws_cannot_both_succeed() {
    // two OUT requests both validated against the same stale read of 50
    let mut ledger = LedgerModel::new(50);
    let first = ledger.apply_movement(MovementType::Out, -40);
    let second = ledger.apply_movement(MovementType::Out, -40);

    assert!(first.is_ok());
    assert!(second.is_err());
    assert!(ledger.stock >= 0);
    assert_eq!(ledger.stock, 10);
}

#[test]
fn draining_to_zero_is_allowed() {
    let mut ledger = LedgerModel::new(30);
    assert_eq!(ledger.apply_movement(MovementType::Out, -30), Ok(0));
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

/// Scenario A: receive 100 units into a new item
#[test]
fn scenario_incoming_receipt() {
    let mut ledger = LedgerModel::new(0);

    // IN detail, qty 100, completed without shortfall
    let delta = reconciled_quantity(100, None);
    ledger.apply_movement(MovementType::In, delta).unwrap();

    assert_eq!(ledger.stock, 100);
    assert_eq!(ledger.movements, vec![(MovementType::In, 100)]);
}

/// Scenario B: an OUT exceeding stock never reaches the ledger, and even
/// if it did, the recheck refuses it
#[test]
fn scenario_overdraw_rejected() {
    let mut ledger = LedgerModel::new(50);

    let requested = 60;
    let validation_passed = requested <= ledger.stock;
    assert!(!validation_passed);

    // the ledger-level recheck is the backstop
    assert!(ledger.apply_movement(MovementType::Out, -requested).is_err());
    assert_eq!(ledger.stock, 50);
}

/// Scenario C: physical check finds 35 where the system says 40
#[test]
fn scenario_check_shrinkage() {
    let mut ledger = LedgerModel::new(40);

    let system_quantity = 40;
    let counted = 35;
    let difference = counted - system_quantity;
    assert_eq!(difference, -5);

    ledger.apply_movement(MovementType::Check, difference).unwrap();
    assert_eq!(ledger.stock, 35);
    assert_eq!(ledger.movement_sum(), -5);
}

/// An IN receipt with a shortfall posts the checked quantity, not the
/// requested one
#[test]
fn scenario_short_receipt_posts_checked_quantity() {
    let mut ledger = LedgerModel::new(0);

    let delta = reconciled_quantity(100, Some(97));
    ledger.apply_movement(MovementType::In, delta).unwrap();

    assert_eq!(ledger.stock, 97);
}

// ============================================================================
// Window aggregation
// ============================================================================

#[test]
fn window_boundaries_replay_from_current_stock() {
    // movements: +100, -30 inside the window, then +20 after it;
    // current stock is therefore 90 and period end was 70
    let summary = MovementSummary::from_window(90, 100, 30, 20);

    assert_eq!(summary.total_in, 100);
    assert_eq!(summary.total_out, 30);
    assert_eq!(summary.net_movement, 70);
    assert_eq!(summary.stock_at_period_end, 70);
    assert_eq!(summary.stock_at_period_start, 0);
}

#[test]
fn empty_window_has_equal_boundaries() {
    let summary = MovementSummary::from_window(40, 0, 0, 0);
    assert_eq!(summary.stock_at_period_start, 40);
    assert_eq!(summary.stock_at_period_end, 40);
    assert_eq!(summary.net_movement, 0);
}

#[test]
fn utilization_rate_handles_zero_denominator() {
    assert_eq!(utilization_rate(30, 0), Decimal::ZERO);
    assert_eq!(utilization_rate(0, 100), Decimal::ZERO);
    assert_eq!(utilization_rate(50, 100), Decimal::new(5, 1)); // 0.5
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The ledger/item consistency invariant: after any sequence of
    /// attempted movements, stock equals initial + sum of applied deltas
    /// and never goes negative
    #[test]
    fn prop_stock_equals_movement_sum(
        initial in 0i32..1_000,
        deltas in prop::collection::vec(-500i32..500, 0..50),
    ) {
        let mut ledger = LedgerModel::new(initial);

        for delta in deltas {
            let movement_type = if delta >= 0 { MovementType::In } else { MovementType::Out };
            let _ = ledger.apply_movement(movement_type, delta);
            prop_assert!(ledger.stock >= 0);
        }

        prop_assert_eq!(ledger.stock, initial + ledger.movement_sum());
    }

    /// Window math: start + net == end for any inputs
    #[test]
    fn prop_window_net_links_boundaries(
        current in 0i64..100_000,
        total_in in 0i64..100_000,
        total_out in 0i64..100_000,
        delta_after in -100_000i64..100_000,
    ) {
        let summary = MovementSummary::from_window(current, total_in, total_out, delta_after);
        prop_assert_eq!(
            summary.stock_at_period_start + summary.net_movement,
            summary.stock_at_period_end
        );
        prop_assert_eq!(summary.net_movement, total_in - total_out);
    }
}
