//! Transaction lifecycle tests
//!
//! Covers the status state machine, code formatting and sequencing,
//! reconciled-quantity preference and parent-status derivation.

use proptest::prelude::*;

use shared::models::{
    derive_parent_status, format_item_code, format_transaction_code, parse_code_sequence,
    reconciled_quantity, TransactionStatus, TransactionType,
};

use shared::models::TransactionStatus::{Cancelled, Completed, Ordered, Pending, Received};
use shared::models::TransactionType::{Check, In, Out};

const ALL_STATUSES: [TransactionStatus; 5] = [Pending, Ordered, Received, Completed, Cancelled];
const ALL_TYPES: [TransactionType; 3] = [In, Out, Check];

// ============================================================================
// State machine
// ============================================================================

#[test]
fn in_transactions_walk_the_full_chain() {
    assert!(Pending.can_transition_to(Ordered, In));
    assert!(Ordered.can_transition_to(Received, In));
    assert!(Received.can_transition_to(Completed, In));

    // no skipping ahead
    assert!(!Pending.can_transition_to(Received, In));
    assert!(!Pending.can_transition_to(Completed, In));
    assert!(!Ordered.can_transition_to(Completed, In));
}

#[test]
fn out_and_check_complete_directly() {
    for tx_type in [Out, Check] {
        assert!(Pending.can_transition_to(Completed, tx_type));
        assert!(!Pending.can_transition_to(Ordered, tx_type));
        assert!(!Pending.can_transition_to(Received, tx_type));
    }
}

#[test]
fn transitions_are_monotonic() {
    // no going backwards along the chain
    assert!(!Ordered.can_transition_to(Pending, In));
    assert!(!Received.can_transition_to(Ordered, In));
    assert!(!Received.can_transition_to(Pending, In));
    assert!(!Completed.can_transition_to(Received, In));
}

#[test]
fn cancellation_is_reachable_from_every_non_terminal_state() {
    for tx_type in ALL_TYPES {
        assert!(Pending.can_transition_to(Cancelled, tx_type));
        assert!(Ordered.can_transition_to(Cancelled, tx_type));
        assert!(Received.can_transition_to(Cancelled, tx_type));
    }
}

#[test]
fn terminal_states_admit_no_transitions() {
    for terminal in [Completed, Cancelled] {
        assert!(terminal.is_terminal());
        for next in ALL_STATUSES {
            for tx_type in ALL_TYPES {
                assert!(
                    !terminal.can_transition_to(next, tx_type),
                    "{} -> {} should be rejected",
                    terminal,
                    next
                );
            }
        }
    }
}

#[test]
fn stock_posting_triggers_match_type() {
    // IN posts on receipt (or completion, guarded to once)
    assert!(Received.triggers_stock_posting(In));
    assert!(Completed.triggers_stock_posting(In));
    assert!(!Ordered.triggers_stock_posting(In));

    // OUT and CHECK post only on completion
    for tx_type in [Out, Check] {
        assert!(Completed.triggers_stock_posting(tx_type));
        assert!(!Received.triggers_stock_posting(tx_type));
        assert!(!Pending.triggers_stock_posting(tx_type));
    }

    // cancellation never touches stock
    for tx_type in ALL_TYPES {
        assert!(!Cancelled.triggers_stock_posting(tx_type));
    }
}

// ============================================================================
// Codes
// ============================================================================

#[test]
fn item_codes_are_zero_padded() {
    assert_eq!(format_item_code(1), "BB-0001");
    assert_eq!(format_item_code(999), "BB-0999");
    assert_eq!(format_item_code(12345), "BB-12345");
}

#[test]
fn transaction_codes_embed_the_type_segment() {
    assert_eq!(format_transaction_code(In, 1), "TRX-IN-0001");
    assert_eq!(format_transaction_code(Out, 23), "TRX-OUT-0023");
    assert_eq!(format_transaction_code(Check, 104), "TRX-CHECK-0104");
}

#[test]
fn code_sequences_round_trip() {
    assert_eq!(parse_code_sequence("BB-0001"), Some(1));
    assert_eq!(parse_code_sequence("TRX-IN-0042"), Some(42));
    assert_eq!(parse_code_sequence("TRX-CHECK-0104"), Some(104));

    // malformed suffixes are skipped, not fatal
    assert_eq!(parse_code_sequence("BB-XXXX"), None);
    assert_eq!(parse_code_sequence("legacy"), None);
}

#[test]
fn max_scan_sequencing_is_monotonic_per_scope() {
    // simulate the generator's max-scan over existing codes per scope
    let existing = ["TRX-IN-0001", "TRX-IN-0003", "TRX-OUT-0009", "BB-0007"];

    let next_in = existing
        .iter()
        .filter(|c| c.starts_with("TRX-IN-"))
        .filter_map(|c| parse_code_sequence(c))
        .max()
        .unwrap_or(0)
        + 1;
    assert_eq!(format_transaction_code(In, next_in), "TRX-IN-0004");

    // OUT sequence is independent of IN
    let next_out = existing
        .iter()
        .filter(|c| c.starts_with("TRX-OUT-"))
        .filter_map(|c| parse_code_sequence(c))
        .max()
        .unwrap_or(0)
        + 1;
    assert_eq!(format_transaction_code(Out, next_out), "TRX-OUT-0010");
}

// ============================================================================
// Reconciled quantity and parent status
// ============================================================================

#[test]
fn reconciled_quantity_prefers_the_checked_value() {
    assert_eq!(reconciled_quantity(100, Some(97)), 97);
    assert_eq!(reconciled_quantity(100, Some(0)), 0);
    // -1 sentinel and absent checks fall back to the requested quantity
    assert_eq!(reconciled_quantity(100, Some(-1)), 100);
    assert_eq!(reconciled_quantity(100, None), 100);
}

#[test]
fn parent_tracks_the_slowest_detail() {
    assert_eq!(derive_parent_status(&[Pending, Completed]), Pending);
    assert_eq!(derive_parent_status(&[Ordered, Received]), Ordered);
    assert_eq!(derive_parent_status(&[Completed, Completed]), Completed);
    assert_eq!(derive_parent_status(&[]), Pending);
}

#[test]
fn cancelled_details_are_ignored_unless_all_cancelled() {
    assert_eq!(derive_parent_status(&[Cancelled, Completed]), Completed);
    assert_eq!(derive_parent_status(&[Cancelled, Pending]), Pending);
    assert_eq!(derive_parent_status(&[Cancelled, Cancelled]), Cancelled);
}

// ============================================================================
// Property Tests
// ============================================================================

fn status_strategy() -> impl Strategy<Value = TransactionStatus> {
    prop::sample::select(ALL_STATUSES.to_vec())
}

fn type_strategy() -> impl Strategy<Value = TransactionType> {
    prop::sample::select(ALL_TYPES.to_vec())
}

proptest! {
    /// No sequence of allowed transitions ever leaves a terminal state
    #[test]
    fn prop_terminal_states_are_absorbing(
        tx_type in type_strategy(),
        attempts in prop::collection::vec(status_strategy(), 1..20),
    ) {
        let mut current = Pending;
        let mut was_terminal = false;

        for next in attempts {
            if was_terminal {
                prop_assert!(!current.can_transition_to(next, tx_type));
            }
            if current.can_transition_to(next, tx_type) {
                current = next;
            }
            was_terminal = current.is_terminal();
        }
    }

    /// Allowed non-cancel transitions only ever move forward
    #[test]
    fn prop_transitions_never_move_backwards(
        tx_type in type_strategy(),
        from in status_strategy(),
        to in status_strategy(),
    ) {
        let order = |s: TransactionStatus| ALL_STATUSES.iter().position(|x| *x == s).unwrap();
        if from.can_transition_to(to, tx_type) && to != Cancelled {
            prop_assert!(order(to) > order(from));
        }
    }

    /// Parent derivation is order-insensitive
    #[test]
    fn prop_parent_status_ignores_order(
        mut statuses in prop::collection::vec(status_strategy(), 1..8),
    ) {
        let forward = derive_parent_status(&statuses);
        statuses.reverse();
        prop_assert_eq!(derive_parent_status(&statuses), forward);
    }
}
