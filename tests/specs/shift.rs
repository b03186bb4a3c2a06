// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shift lifecycle specs
//!
//! The daily clock-in/break/clock-out sequence, end to end against the
//! fakes: ordering, the one-hour break gate, snapshot durability, and
//! countdown recovery.

use super::prelude::*;
use fw_core::{ShiftPhase, View};
use fw_storage::ShiftSnapshot;
use std::time::Duration;

#[tokio::test]
async fn clocking_in_sets_snapshot_and_button_state() {
    let spec = spec();
    spec.runtime.start_shift().await.unwrap();

    // Server-assigned id, start timestamp, derived button vector.
    let record = spec.runtime.shift_record().unwrap();
    assert_eq!(record.shift_record_id.as_ref().unwrap(), "P1");
    assert!(record.timestamps.start.is_some());
    assert_eq!(record.disabled_actions(), [true, false, true, true]);

    // The same facts survived into the durable snapshot.
    let snapshot = spec.snapshots().load().unwrap().unwrap();
    assert_eq!(snapshot.record.shift_record_id.as_ref().unwrap(), "P1");
    assert_eq!(snapshot.record.phase, ShiftPhase::Started);

    assert_eq!(spec.nav.visited(), vec![View::PendingOrders]);
}

#[tokio::test]
async fn steps_out_of_order_never_touch_the_snapshot() {
    let spec = spec();

    assert!(spec.runtime.start_break().await.is_err());
    assert!(spec.runtime.end_break().await.is_err());
    assert!(spec.runtime.end_shift().await.is_err());
    assert!(spec.snapshots().load().unwrap().is_none());
    assert_eq!(spec.backend.calls().len(), 0);

    spec.runtime.start_shift().await.unwrap();
    let before = spec.snapshots().load().unwrap();

    // Skipping the break is rejected and changes nothing.
    assert!(matches!(
        spec.runtime.end_shift().await,
        Err(WorkflowError::OutOfOrder(_))
    ));
    assert_eq!(spec.snapshots().load().unwrap(), before);
}

#[tokio::test]
async fn the_break_gate_is_exact() {
    let spec = spec();
    spec.runtime.start_shift().await.unwrap();
    spec.runtime.start_break().await.unwrap();

    // One millisecond short of an hour: rejected.
    spec.clock.advance(Duration::from_millis(3_599_999));
    assert!(matches!(
        spec.runtime.end_break().await,
        Err(WorkflowError::BreakNotElapsed { .. })
    ));

    // At the boundary: accepted.
    spec.clock.advance(Duration::from_millis(1));
    spec.runtime.end_break().await.unwrap();
    assert_eq!(
        spec.runtime.shift_record().unwrap().phase,
        ShiftPhase::BreakDone
    );
}

#[tokio::test]
async fn snapshot_round_trips_with_dedicated_break_key_recovery() {
    let spec = spec();
    let snapshots = spec.snapshots();

    // A blob written before the break field existed, plus the
    // dedicated key: load() reattaches the break start.
    let mut record = fw_core::ShiftRecord::new("U1", "2026-02-10");
    record
        .apply(fw_core::ShiftAction::Start, "2026-02-10T08:00:00-03:00")
        .unwrap();
    let legacy_blob = serde_json::json!({ "v": 1, "record": record }).to_string();
    spec.store.set("shift.snapshot", &legacy_blob).unwrap();
    spec.store
        .set("shift.break-started-at", "2026-02-10T12:00:00-03:00")
        .unwrap();

    let loaded = snapshots.load().unwrap().unwrap();
    assert_eq!(loaded.record, record);
    assert_eq!(
        loaded.break_started_at.as_deref(),
        Some("2026-02-10T12:00:00-03:00")
    );

    // And a full save/load round-trip is lossless.
    let mut snapshot = ShiftSnapshot::new(record);
    snapshot.break_started_at = Some("2026-02-10T12:00:00-03:00".into());
    snapshots.save(&snapshot).unwrap();
    assert_eq!(snapshots.load().unwrap().unwrap(), snapshot);
}

#[tokio::test(start_paused = true)]
async fn countdown_recovers_after_a_reload_and_releases_once() {
    let spec = spec();
    spec.runtime.start_shift().await.unwrap();
    spec.runtime.start_break().await.unwrap();

    // 65 minutes pass while the page is gone.
    spec.clock.advance(Duration::from_secs(65 * 60));
    let mut reloaded = spec.reload();
    assert!(reloaded.runtime.restart_break_timer().unwrap());

    // First emission is the release, not a countdown message.
    let event = reloaded.rx.recv().await.unwrap();
    assert!(matches!(event, Event::BreakReleased { .. }), "{event:?}");
    assert_eq!(reloaded.notifier.calls().len(), 1);

    // One-shot: the countdown stops after releasing.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(reloaded.rx.try_recv().is_err());
}

#[tokio::test]
async fn a_full_day_then_a_fresh_start_next_morning() {
    let spec = spec();
    spec.runtime.start_shift().await.unwrap();
    spec.runtime.start_break().await.unwrap();
    spec.clock.advance(Duration::from_secs(3600));
    spec.runtime.end_break().await.unwrap();
    spec.runtime.end_shift().await.unwrap();

    assert_eq!(spec.runtime.disabled_actions().unwrap(), [true; 4]);
    assert_eq!(spec.nav.visited().last().unwrap(), &View::CompletedOrders);

    // Same day, even after a reload, the start control stays off.
    let reloaded = spec.reload();
    reloaded
        .backend
        .fail_next("fetch-shift", fw_adapters::RemoteError::network("offline"));
    reloaded.runtime.resume().await.unwrap();
    assert!(matches!(
        reloaded.runtime.start_shift().await,
        Err(WorkflowError::OutOfOrder(_))
    ));

    // Next calendar day begins a new record.
    spec.clock.advance(Duration::from_secs(24 * 3600));
    reloaded.runtime.start_shift().await.unwrap();
    assert_eq!(
        reloaded.runtime.shift_record().unwrap().phase,
        ShiftPhase::Started
    );
}
