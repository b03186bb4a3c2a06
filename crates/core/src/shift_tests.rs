// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    not_started = { ShiftPhase::NotStarted, ShiftAction::Start, Some(ShiftPhase::Started) },
    started = { ShiftPhase::Started, ShiftAction::BreakStart, Some(ShiftPhase::OnBreak) },
    on_break = { ShiftPhase::OnBreak, ShiftAction::BreakEnd, Some(ShiftPhase::BreakDone) },
    break_done = { ShiftPhase::BreakDone, ShiftAction::End, Some(ShiftPhase::Ended) },
    ended = { ShiftPhase::Ended, ShiftAction::Start, None },
    skip_break = { ShiftPhase::Started, ShiftAction::End, None },
    double_start = { ShiftPhase::Started, ShiftAction::Start, None },
    early_break_end = { ShiftPhase::Started, ShiftAction::BreakEnd, None },
)]
fn transition_table(from: ShiftPhase, action: ShiftAction, expected: Option<ShiftPhase>) {
    match expected {
        Some(next) => assert_eq!(from.advance(action).unwrap(), next),
        None => {
            let err = from.advance(action).unwrap_err();
            assert_eq!(err.from, from);
            assert_eq!(err.action, action);
        }
    }
}

#[parameterized(
    not_started = { ShiftPhase::NotStarted, [false, true, true, true] },
    started = { ShiftPhase::Started, [true, false, true, true] },
    on_break = { ShiftPhase::OnBreak, [true, true, false, true] },
    break_done = { ShiftPhase::BreakDone, [true, true, true, false] },
    ended = { ShiftPhase::Ended, [true, true, true, true] },
)]
fn disabled_flags_follow_phase(phase: ShiftPhase, expected: [bool; 4]) {
    assert_eq!(phase.disabled_actions(), expected);
}

#[test]
fn apply_records_timestamp_and_advances() {
    let mut record = ShiftRecord::new("U1", "2026-02-10");
    record.apply(ShiftAction::Start, "2026-02-10T08:00:00-03:00").unwrap();
    assert_eq!(record.phase, ShiftPhase::Started);
    assert_eq!(
        record.timestamps.get(ShiftAction::Start),
        Some("2026-02-10T08:00:00-03:00")
    );
    assert_eq!(record.timestamps.get(ShiftAction::End), None);
}

#[test]
fn out_of_order_apply_leaves_record_untouched() {
    let mut record = ShiftRecord::new("U1", "2026-02-10");
    let before = record.clone();
    assert!(record.apply(ShiftAction::End, "2026-02-10T17:00:00-03:00").is_err());
    assert_eq!(record, before);
}

#[test]
fn full_day_sequence() {
    let mut record = ShiftRecord::new("U1", "2026-02-10");
    for (action, at) in [
        (ShiftAction::Start, "2026-02-10T08:00:00-03:00"),
        (ShiftAction::BreakStart, "2026-02-10T12:00:00-03:00"),
        (ShiftAction::BreakEnd, "2026-02-10T13:00:00-03:00"),
        (ShiftAction::End, "2026-02-10T17:00:00-03:00"),
    ] {
        record.apply(action, at).unwrap();
    }
    assert!(record.phase.is_terminal());
    assert_eq!(record.disabled_actions(), [true; 4]);
}

#[test]
fn re_entering_a_completed_step_is_rejected() {
    let mut record = ShiftRecord::new("U1", "2026-02-10");
    record.apply(ShiftAction::Start, "t0").unwrap();
    record.apply(ShiftAction::BreakStart, "t1").unwrap();
    let err = record.apply(ShiftAction::BreakStart, "t2").unwrap_err();
    assert_eq!(err.from, ShiftPhase::OnBreak);
    assert_eq!(record.timestamps.get(ShiftAction::BreakStart), Some("t1"));
}

#[test]
fn day_ownership() {
    let record = ShiftRecord::new("U1", "2026-02-10");
    assert!(record.is_for("2026-02-10"));
    assert!(!record.is_for("2026-02-11"));
}

#[test]
fn snapshot_serde_round_trip() {
    let record = ShiftRecord::builder()
        .shift_record_id("P1")
        .phase(ShiftPhase::Started)
        .build();
    let json = serde_json::to_string(&record).unwrap();
    let back: ShiftRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// From any phase, exactly one action is accepted (or none when
        /// the shift has ended), and every rejected action leaves the
        /// phase unchanged.
        #[test]
        fn exactly_one_eligible_action(phase in crate::test_support::strategies::arb_shift_phase()) {
            let actions = [
                ShiftAction::Start,
                ShiftAction::BreakStart,
                ShiftAction::BreakEnd,
                ShiftAction::End,
            ];
            let accepted = actions.iter().filter(|a| phase.allows(**a)).count();
            if phase.is_terminal() {
                prop_assert_eq!(accepted, 0);
            } else {
                prop_assert_eq!(accepted, 1);
            }
            for action in actions {
                if !phase.allows(action) {
                    prop_assert!(phase.advance(action).is_err());
                }
            }
        }
    }
}
