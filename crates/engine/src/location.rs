// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Automatic technician tracking.
//!
//! A low-frequency loop captures the position and pushes it to the
//! backend, suppressing samples within the distance threshold of the
//! last pushed fix. Capture or push failures skip the sample — the
//! stream itself never dies over one bad reading.

use crate::runtime::Runtime;
use fw_adapters::{BackendApi, CameraAdapter, GeoAdapter, NavAdapter, NotifyAdapter};
use fw_core::{haversine_meters, Clock, Coordinates, Event, LocationSample, UserId};
use fw_storage::KvStore;
use std::time::Duration;
use tokio::sync::mpsc;

/// Cancellable handle to the running stream.
pub struct LocationStreamHandle {
    task: tokio::task::JoinHandle<()>,
}

impl LocationStreamHandle {
    fn stop(self) {
        self.task.abort();
    }
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
    /// Start (or restart) the periodic location stream.
    pub fn start_location_updates(&self) {
        let task = tokio::spawn(run_stream(
            self.backend.clone(),
            self.geo.clone(),
            self.clock.clone(),
            self.user_id.clone(),
            self.config.location_interval,
            self.config.location_threshold_m,
            self.event_tx.clone(),
        ));
        let mut guard = self.location_stream.lock();
        if let Some(old) = guard.take() {
            old.stop();
        }
        *guard = Some(LocationStreamHandle { task });
    }

    /// Stop the stream; a no-op when none is running.
    pub fn stop_location_updates(&self) {
        if let Some(handle) = self.location_stream.lock().take() {
            handle.stop();
            tracing::info!("location stream stopped");
        }
    }

    pub fn location_stream_running(&self) -> bool {
        self.location_stream.lock().is_some()
    }
}

async fn run_stream<B, G, C>(
    backend: B,
    geo: G,
    clock: C,
    user_id: UserId,
    every: Duration,
    threshold_m: f64,
    event_tx: mpsc::Sender<Event>,
) where
    B: BackendApi,
    G: GeoAdapter,
    C: Clock,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last_pushed: Option<Coordinates> = None;

    loop {
        ticker.tick().await;
        let fix = match geo.capture().await {
            Ok(fix) => fix,
            Err(e) => {
                tracing::warn!(error = %e, "location capture failed, skipping sample");
                continue;
            }
        };

        let should_push = match &last_pushed {
            None => true,
            Some(prev) => match haversine_meters(prev, &fix) {
                Ok(distance) => distance > threshold_m,
                Err(e) => {
                    tracing::warn!(error = %e, "distance check failed, pushing anyway");
                    true
                }
            },
        };
        if !should_push {
            tracing::debug!(fix = %fix, "within threshold of last push, suppressed");
            continue;
        }

        let sample = LocationSample {
            coordinates: fix.clone(),
            captured_at_ms: clock.epoch_ms(),
        };
        match backend.push_location(&user_id, &sample).await {
            Ok(()) => {
                last_pushed = Some(fix);
                let _ = event_tx
                    .send(Event::LocationPushed { user_id: user_id.clone(), sample })
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "location push failed, will retry next tick");
            }
        }
    }
}

#[cfg(test)]
#[path = "location_tests.rs"]
mod tests;
