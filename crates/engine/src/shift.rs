// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four-step daily shift lifecycle.
//!
//! Every operation re-checks the transition table before any capture
//! or network call, advances the materialized state only after the
//! backend accepted the step, and persists before returning — a failed
//! call leaves both the UI state and the snapshot exactly where they
//! were.

use crate::error::WorkflowError;
use crate::runtime::Runtime;
use fw_adapters::{BackendApi, CameraAdapter, GeoAdapter, NavAdapter, NotifyAdapter};
use fw_core::{
    BreakRecordId, Clock, Effect, Event, ShiftAction, ShiftRecordId, View,
};
use fw_storage::KvStore;
use std::time::Duration;

impl<S, B, G, P, N, V, C> Runtime<S, B, G, P, N, V, C>
where
    S: KvStore,
    B: BackendApi,
    G: GeoAdapter,
    P: CameraAdapter,
    N: NotifyAdapter,
    V: NavAdapter,
    C: Clock,
{
    /// Clock in: photo + position evidence, then the backend assigns
    /// the shift record id. Lands on the pending-orders view.
    pub async fn start_shift(&self) -> Result<(), WorkflowError> {
        self.ensure_shift_action(ShiftAction::Start)?;
        let evidence = self.capture_evidence("shift-start.jpg").await?;
        let record_id = self.backend.start_shift(&self.user_id, &evidence).await?;
        tracing::info!(user_id = %self.user_id, record_id = %record_id, "shift started");

        self.emit(Event::ShiftStarted {
            user_id: self.user_id.clone(),
            record_id,
            at: evidence.captured_at,
        })
        .await?;
        self.executor.execute(Effect::Navigate { view: View::PendingOrders }).await;
        Ok(())
    }

    /// Open the break: position only, no photo. Starts the countdown.
    pub async fn start_break(&self) -> Result<(), WorkflowError> {
        self.ensure_shift_action(ShiftAction::BreakStart)?;
        let record_id = self.require_shift_record_id()?;
        let coordinates = self.capture_position().await?;
        let break_id = self.backend.start_break(&record_id, &coordinates).await?;
        tracing::info!(record_id = %record_id, break_id = %break_id, "break started");

        self.emit(Event::BreakStarted {
            user_id: self.user_id.clone(),
            break_id,
            at: self.now_iso(),
        })
        .await?;
        self.restart_break_timer()?;
        Ok(())
    }

    /// Close the break. Only allowed once the minimum has elapsed
    /// since the persisted break start.
    pub async fn end_break(&self) -> Result<(), WorkflowError> {
        self.ensure_shift_action(ShiftAction::BreakEnd)?;
        let break_id = self.require_break_record_id()?;

        let raw = self
            .snapshots
            .break_started_at()?
            .or_else(|| {
                self.state
                    .lock()
                    .record
                    .as_ref()
                    .and_then(|r| r.timestamps.break_start.clone())
            })
            .ok_or(WorkflowError::BreakNotStarted)?;
        let started_ms = crate::break_timer::parse_break_start(&raw, self.clock.epoch_ms())
            .ok_or(WorkflowError::BreakNotStarted)?;

        let elapsed_ms = self.clock.epoch_ms().saturating_sub(started_ms);
        let minimum_ms = self.config.break_minimum.as_millis() as u64;
        if elapsed_ms < minimum_ms {
            return Err(WorkflowError::BreakNotElapsed {
                remaining: Duration::from_millis(minimum_ms - elapsed_ms),
            });
        }

        let coordinates = self.capture_position().await?;
        self.backend.end_break(&break_id, &coordinates).await?;
        tracing::info!(break_id = %break_id, elapsed_ms, "break ended");

        self.snapshots.clear_break()?;
        if let Some(timer) = self.break_timer.lock().take() {
            timer.stop();
        }
        self.emit(Event::BreakEnded {
            user_id: self.user_id.clone(),
            at: self.now_iso(),
        })
        .await?;
        self.executor.execute(Effect::Navigate { view: View::PendingOrders }).await;
        Ok(())
    }

    /// Clock out: photo evidence again, then mark today closed so the
    /// start controls stay off until the next calendar day.
    pub async fn end_shift(&self) -> Result<(), WorkflowError> {
        self.ensure_shift_action(ShiftAction::End)?;
        let record_id = self.require_shift_record_id()?;
        let evidence = self.capture_evidence("shift-end.jpg").await?;
        self.backend.end_shift(&record_id, &evidence).await?;
        tracing::info!(record_id = %record_id, "shift ended");

        self.emit(Event::ShiftEnded {
            user_id: self.user_id.clone(),
            record_id,
            at: evidence.captured_at,
        })
        .await?;
        self.snapshots.mark_closed(&self.today())?;
        self.executor.execute(Effect::Navigate { view: View::CompletedOrders }).await;
        Ok(())
    }

    /// (Re)start the break countdown from persisted state. Returns
    /// whether a countdown is now running.
    pub fn restart_break_timer(&self) -> Result<bool, WorkflowError> {
        let handle = crate::break_timer::spawn(
            &self.snapshots,
            self.executor.notifier().clone(),
            self.clock.clone(),
            &self.config,
            self.user_id.clone(),
            self.event_tx.clone(),
        )?;
        let mut guard = self.break_timer.lock();
        if let Some(old) = guard.take() {
            old.stop();
        }
        let running = handle.is_some();
        *guard = handle;
        Ok(running)
    }

    pub(crate) fn require_shift_record_id(&self) -> Result<ShiftRecordId, WorkflowError> {
        self.state
            .lock()
            .record
            .as_ref()
            .and_then(|r| r.shift_record_id.clone())
            .ok_or_else(|| WorkflowError::InvalidRequest("no shift record id".into()))
    }

    pub(crate) fn require_break_record_id(&self) -> Result<BreakRecordId, WorkflowError> {
        self.state
            .lock()
            .record
            .as_ref()
            .and_then(|r| r.break_record_id.clone())
            .ok_or(WorkflowError::BreakNotStarted)
    }
}

#[cfg(test)]
#[path = "shift_tests.rs"]
mod tests;
