// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The one-hour break countdown.
//!
//! Re-derivable from persistence: the timer reads the break start from
//! the dedicated key (falling back to the composite snapshot) so it
//! recovers after a reload. It ticks once a second, publishes a
//! formatted countdown, and emits the released event exactly once —
//! then stops itself and fires a local notification.

use crate::error::WorkflowError;
use chrono::TimeZone;
use fw_adapters::NotifyAdapter;
use fw_core::{format_remaining, Clock, Event, UserId, WorkflowConfig};
use fw_storage::{KvStore, SnapshotStore};
use std::time::Duration;
use tokio::sync::mpsc;

/// Cancellable handle to a running countdown task.
pub struct BreakTimerHandle {
    task: tokio::task::JoinHandle<()>,
}

impl BreakTimerHandle {
    /// Stop ticking. The released event will not fire after this.
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Recover the break start from persistence and start the countdown.
///
/// Returns `Ok(None)` when no break is recorded, or when the stored
/// start time is unparsable (logged, timer stays off — never a crash).
pub(crate) fn spawn<S, N, C>(
    snapshots: &SnapshotStore<S>,
    notifier: N,
    clock: C,
    config: &WorkflowConfig,
    user_id: UserId,
    event_tx: mpsc::Sender<Event>,
) -> Result<Option<BreakTimerHandle>, WorkflowError>
where
    S: KvStore,
    N: NotifyAdapter,
    C: Clock,
{
    // Dedicated key first; older snapshots only embed it in the blob.
    let raw = match snapshots.break_started_at()? {
        Some(raw) => Some(raw),
        None => snapshots
            .load()?
            .and_then(|s| s.break_started_at.or(s.record.timestamps.break_start)),
    };
    let Some(raw) = raw else {
        return Ok(None);
    };

    let Some(started_ms) = parse_break_start(&raw, clock.epoch_ms()) else {
        tracing::warn!(raw = %raw, "unparsable break start, countdown disabled");
        return Ok(None);
    };

    let minimum = config.break_minimum;
    let task = tokio::spawn(run_countdown(
        notifier, clock, minimum, started_ms, user_id, event_tx,
    ));
    Ok(Some(BreakTimerHandle { task }))
}

async fn run_countdown<N, C>(
    notifier: N,
    clock: C,
    minimum: Duration,
    started_ms: u64,
    user_id: UserId,
    event_tx: mpsc::Sender<Event>,
) where
    N: NotifyAdapter,
    C: Clock,
{
    let minimum_ms = minimum.as_millis() as u64;
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;
        let elapsed = clock.epoch_ms().saturating_sub(started_ms);
        if elapsed >= minimum_ms {
            tracing::info!(user_id = %user_id, "break released");
            if event_tx.send(Event::BreakReleased { user_id: user_id.clone() }).await.is_err() {
                tracing::warn!("event subscriber gone");
            }
            if let Err(e) = notifier
                .notify("Break", "Minimum break time has elapsed — you can end your break")
                .await
            {
                tracing::warn!(error = %e, "break notification failed");
            }
            return;
        }
        let remaining = Duration::from_millis(minimum_ms - elapsed);
        let _ = event_tx
            .send(Event::BreakTick { remaining: format_remaining(remaining) })
            .await;
    }
}

/// Parse a stored break-start time into epoch milliseconds.
///
/// Accepts a full ISO timestamp (with or without an offset) or the
/// legacy bare `HH:MM` label, which means "today at that time".
pub(crate) fn parse_break_start(raw: &str, now_ms: u64) -> Option<u64> {
    let raw = raw.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis().max(0) as u64);
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return local_millis(chrono::Local.from_local_datetime(&naive));
    }

    // Legacy label: "HH:MM"
    let (h, m) = raw.split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    let today = match chrono::Local.timestamp_millis_opt(now_ms as i64) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => dt.date_naive(),
        chrono::LocalResult::None => return None,
    };
    let naive = today.and_hms_opt(hour, minute, 0)?;
    local_millis(chrono::Local.from_local_datetime(&naive))
}

fn local_millis(result: chrono::LocalResult<chrono::DateTime<chrono::Local>>) -> Option<u64> {
    match result {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            Some(dt.timestamp_millis().max(0) as u64)
        }
        chrono::LocalResult::None => None,
    }
}

#[cfg(test)]
#[path = "break_timer_tests.rs"]
mod tests;
