// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for one signed-in technician.
//!
//! Holds the adapter seams, the materialized state, and the snapshot
//! store. Workflow operations live in sibling modules (`shift`,
//! `orders`, `reconcile`, `location`) as `impl Runtime` blocks.

use crate::break_timer::BreakTimerHandle;
use crate::error::WorkflowError;
use crate::executor::Executor;
use crate::location::LocationStreamHandle;
use fw_adapters::{
    BackendApi, CameraAdapter, EvidencePayload, GeoAdapter, GeoError, NavAdapter, NotifyAdapter,
};
use fw_core::clock::{local_date, local_iso};
use fw_core::{
    Clock, Coordinates, Effect, Event, OrderExecution, Photo, ShiftAction, ShiftPhase,
    ShiftRecord, UploadPayload, UserId, View, WorkflowConfig,
};
use fw_storage::{KvStore, ShiftSnapshot, ShiftState, SnapshotStore, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runtime adapter dependencies
pub struct RuntimeDeps<S, B, G, P, N, V> {
    pub store: S,
    pub backend: B,
    pub geo: G,
    pub camera: P,
    pub notifier: N,
    pub nav: V,
}

/// Runtime that drives the workflows for one authenticated user
pub struct Runtime<S: KvStore, B, G, P, N, V, C: Clock> {
    pub(crate) backend: B,
    pub(crate) geo: G,
    pub(crate) camera: P,
    pub(crate) executor: Executor<N, V>,
    pub(crate) snapshots: SnapshotStore<S>,
    pub(crate) state: Arc<Mutex<ShiftState>>,
    pub(crate) clock: C,
    pub(crate) config: WorkflowConfig,
    pub(crate) user_id: UserId,
    pub(crate) event_tx: mpsc::Sender<Event>,
    pub(crate) location_stream: Mutex<Option<LocationStreamHandle>>,
    pub(crate) break_timer: Mutex<Option<BreakTimerHandle>>,
}

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
    /// Create a new runtime
    pub fn new(
        deps: RuntimeDeps<S, B, G, P, N, V>,
        clock: C,
        config: WorkflowConfig,
        user_id: impl Into<UserId>,
        event_tx: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            backend: deps.backend,
            geo: deps.geo,
            camera: deps.camera,
            executor: Executor::new(deps.notifier, deps.nav),
            snapshots: SnapshotStore::new(deps.store),
            state: Arc::new(Mutex::new(ShiftState::default())),
            clock,
            config,
            user_id: user_id.into(),
            event_tx,
            location_stream: Mutex::new(None),
            break_timer: Mutex::new(None),
        }
    }

    /// Today's local calendar date, `YYYY-MM-DD`.
    pub(crate) fn today(&self) -> String {
        local_date(self.clock.epoch_ms())
    }

    /// Current local time as an ISO string.
    pub(crate) fn now_iso(&self) -> String {
        local_iso(self.clock.epoch_ms())
    }

    /// Today's shift record as currently materialized.
    pub fn shift_record(&self) -> Option<ShiftRecord> {
        self.state.lock().record.clone()
    }

    /// Cached execution for an order (display only, never permission).
    pub fn cached_execution(&self, order_id: &str) -> Option<OrderExecution> {
        self.state.lock().execution(order_id).cloned()
    }

    /// Per-action disabled flags for the shift controls.
    pub fn disabled_actions(&self) -> Result<[bool; 4], WorkflowError> {
        Ok(self.current_phase()?.disabled_actions())
    }

    /// The phase the shift controls should reflect right now: today's
    /// materialized record when there is one, otherwise `Ended` when
    /// today carries a closed marker, otherwise `NotStarted`.
    pub(crate) fn current_phase(&self) -> Result<ShiftPhase, WorkflowError> {
        let today = self.today();
        {
            let state = self.state.lock();
            if let Some(record) = &state.record {
                if record.user_id == self.user_id && record.is_for(&today) {
                    return Ok(record.phase);
                }
            }
        }
        if self.snapshots.closed_on()?.as_deref() == Some(today.as_str()) {
            return Ok(ShiftPhase::Ended);
        }
        Ok(ShiftPhase::NotStarted)
    }

    /// Defense in depth: reject an out-of-order action before any
    /// capture or network call, even if the UI failed to disable the
    /// control.
    pub(crate) fn ensure_shift_action(&self, action: ShiftAction) -> Result<(), WorkflowError> {
        self.current_phase()?.advance(action)?;
        Ok(())
    }

    /// Apply an event to the materialized state, persist the snapshot,
    /// and forward the event to subscribers.
    pub(crate) async fn emit(&self, event: Event) -> Result<(), WorkflowError> {
        tracing::info!(event = event.name(), "applying event");
        {
            let mut state = self.state.lock();
            state.apply_event(&event);
        }
        self.persist()?;
        if let Err(e) = self.event_tx.send(event).await {
            tracing::warn!(error = %e, "event subscriber gone");
        }
        Ok(())
    }

    /// Write the current materialized shift state as the durable
    /// snapshot. The break-start time rides along only while the break
    /// is open, so break recovery keys disappear with the break.
    pub(crate) fn persist(&self) -> Result<(), StoreError> {
        let snapshot = {
            let state = self.state.lock();
            let Some(record) = &state.record else {
                return Ok(());
            };
            let mut snapshot = ShiftSnapshot::new(record.clone());
            if record.phase == ShiftPhase::OnBreak {
                snapshot.break_started_at = record.timestamps.break_start.clone();
            }
            snapshot
        };
        self.snapshots.save(&snapshot)
    }

    /// Capture the device position within the configured timeout.
    pub(crate) async fn capture_position(&self) -> Result<Coordinates, WorkflowError> {
        let timeout = self.config.geolocation_timeout;
        match tokio::time::timeout(timeout, self.geo.capture()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(GeoError::Timeout(timeout).into()),
        }
    }

    /// Capture photo + position evidence for a workflow step.
    ///
    /// The photo comes first: a step without a frame fails with
    /// missing-evidence before geolocation is even attempted. Stamping
    /// is best-effort — an undecodable frame is uploaded as captured.
    pub(crate) async fn capture_evidence(
        &self,
        file_name: &str,
    ) -> Result<EvidencePayload, WorkflowError> {
        let photo = self
            .camera
            .capture()
            .await
            .map_err(WorkflowError::MissingEvidence)?;
        let coordinates = self.capture_position().await?;
        let captured_at = self.now_iso();

        let stamped = match photo.to_bytes() {
            Ok(bytes) => Photo::from_bytes(&fw_core::stamp_jpeg(&bytes, &self.stamp_label())),
            Err(e) => {
                tracing::warn!(error = %e, "photo stamp skipped, uploading raw frame");
                photo
            }
        };
        Ok(EvidencePayload {
            photo: UploadPayload::from_photo(&stamped, file_name)?,
            coordinates,
            captured_at,
        })
    }

    /// Localized date/time label stamped onto evidence photos.
    fn stamp_label(&self) -> String {
        use chrono::TimeZone;
        match chrono::Local.timestamp_millis_opt(self.clock.epoch_ms() as i64) {
            chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
                dt.format("%d/%m/%Y %H:%M:%S").to_string()
            }
            chrono::LocalResult::None => String::new(),
        }
    }

    /// Sign out: stop background work, wipe the durable snapshot, and
    /// land on the login view.
    pub async fn logout(&self) -> Result<(), WorkflowError> {
        self.stop_location_updates();
        if let Some(timer) = self.break_timer.lock().take() {
            timer.stop();
        }
        self.snapshots.clear_all()?;
        *self.state.lock() = ShiftState::default();
        self.executor.execute(Effect::Navigate { view: View::Login }).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
