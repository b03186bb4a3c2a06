// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{setup, NOW_MS};
use fw_adapters::RemoteError;
use fw_core::clock::{local_date, local_iso};
use fw_core::{Event, ShiftRecord, ShiftRecordId, UserId};
use fw_storage::{ShiftSnapshot, SnapshotStore};

fn today(ctx: &crate::test_helpers::TestContext) -> String {
    local_date(ctx.clock.epoch_ms())
}

fn server_record(day: &str, phase: ShiftPhase) -> ShiftRecord {
    let mut record = ShiftRecord::new(UserId::new("U1"), day);
    record.shift_record_id = Some(ShiftRecordId::new("P1"));
    record.phase = phase;
    record.timestamps.start = Some(local_iso(NOW_MS - 4 * 3600 * 1000));
    record
}

#[tokio::test]
async fn resume_adopts_the_server_record() {
    let ctx = setup();
    ctx.backend
        .put_shift(server_record(&today(&ctx), ShiftPhase::Started));

    ctx.runtime.resume().await.unwrap();

    let record = ctx.runtime.shift_record().unwrap();
    assert_eq!(record.phase, ShiftPhase::Started);
    // Adopted state is persisted for the next reload.
    let snapshots = SnapshotStore::new(ctx.store.clone());
    assert_eq!(
        snapshots.load().unwrap().unwrap().record.phase,
        ShiftPhase::Started
    );
}

#[tokio::test]
async fn resume_prefers_server_over_conflicting_local_snapshot() {
    let ctx = setup();
    // Local claims the break is done; the server says still on break.
    let mut local = server_record(&today(&ctx), ShiftPhase::BreakDone);
    local.timestamps.break_start = Some(local_iso(NOW_MS - 2 * 3600 * 1000));
    SnapshotStore::new(ctx.store.clone())
        .save(&ShiftSnapshot::new(local))
        .unwrap();

    let mut server = server_record(&today(&ctx), ShiftPhase::OnBreak);
    server.timestamps.break_start = Some(local_iso(NOW_MS - 30 * 60_000));
    ctx.backend.put_shift(server);

    ctx.runtime.resume().await.unwrap();
    assert_eq!(ctx.runtime.shift_record().unwrap().phase, ShiftPhase::OnBreak);
}

#[tokio::test]
async fn resume_discards_local_snapshot_when_server_has_nothing() {
    let ctx = setup();
    SnapshotStore::new(ctx.store.clone())
        .save(&ShiftSnapshot::new(server_record(&today(&ctx), ShiftPhase::Started)))
        .unwrap();

    ctx.runtime.resume().await.unwrap();
    assert!(ctx.runtime.shift_record().is_none());
    assert_eq!(ctx.runtime.disabled_actions().unwrap(), [false, true, true, true]);
}

#[tokio::test]
async fn resume_keeps_local_snapshot_when_offline() {
    let ctx = setup();
    SnapshotStore::new(ctx.store.clone())
        .save(&ShiftSnapshot::new(server_record(&today(&ctx), ShiftPhase::Started)))
        .unwrap();
    ctx.backend
        .fail_next("fetch-shift", RemoteError::network("no route to host"));

    ctx.runtime.resume().await.unwrap();
    assert_eq!(ctx.runtime.shift_record().unwrap().phase, ShiftPhase::Started);
}

#[tokio::test]
async fn resume_drops_a_previous_days_snapshot() {
    let ctx = setup();
    SnapshotStore::new(ctx.store.clone())
        .save(&ShiftSnapshot::new(server_record("2020-01-01", ShiftPhase::Started)))
        .unwrap();
    ctx.backend
        .fail_next("fetch-shift", RemoteError::network("offline"));

    ctx.runtime.resume().await.unwrap();
    assert!(ctx.runtime.shift_record().is_none());
}

#[tokio::test(start_paused = true)]
async fn resume_restarts_the_countdown_when_on_break() {
    let mut ctx = setup();
    let mut server = server_record(&today(&ctx), ShiftPhase::OnBreak);
    // Break opened 65 minutes ago: the countdown should release at once.
    server.timestamps.break_start = Some(local_iso(NOW_MS - 65 * 60_000));
    ctx.backend.put_shift(server);

    ctx.runtime.resume().await.unwrap();

    let event = ctx.rx.recv().await.unwrap();
    assert!(matches!(event, Event::BreakReleased { .. }), "{event:?}");
}

#[tokio::test]
async fn authoritative_read_replaces_and_persists_the_server_record() {
    let ctx = setup();
    let order = fw_core::ServiceOrder::builder().trajectory_id("T1").build();
    ctx.runtime.start_order(&order).await.unwrap();

    // Server moved on without us.
    ctx.backend.put_latest_execution(
        fw_core::OrderExecution::builder()
            .execution_id("E9")
            .status(fw_core::ExecutionStatus::Completed)
            .build(),
    );

    let fresh = ctx
        .runtime
        .authoritative_execution(&order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fresh.execution_id, "E9");

    // Cache and persistence both follow.
    assert_eq!(ctx.runtime.cached_execution("O1").unwrap().execution_id, "E9");
    let persisted = SnapshotStore::new(ctx.store.clone())
        .load_execution(&order.id)
        .unwrap()
        .unwrap();
    assert_eq!(persisted.execution_id, "E9");
}
