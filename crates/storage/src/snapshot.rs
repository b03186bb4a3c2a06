// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted shift/break/order snapshot.
//!
//! One composite blob holds the whole shift record; the break-start
//! time is additionally written under its own key so break recovery
//! survives a torn or outdated composite blob. Service-order state is
//! cached per order, with a persisted reopen guard.

use crate::kv::{KvStore, StoreError};
use fw_core::{OrderExecution, OrderId, ShiftRecord};
use serde::{Deserialize, Serialize};

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 2;

/// Storage keys. Everything the workflows persist goes through one of
/// these, never through ad-hoc key strings.
pub mod keys {
    pub const SHIFT_SNAPSHOT: &str = "shift.snapshot";
    pub const BREAK_STARTED_AT: &str = "shift.break-started-at";
    pub const SHIFT_CLOSED_ON: &str = "shift.closed-on";

    pub fn execution(order_id: &str) -> String {
        format!("order.execution.{order_id}")
    }

    pub fn reopened(order_id: &str) -> String {
        format!("order.reopened.{order_id}")
    }
}

/// Composite persisted state for the current shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSnapshot {
    /// Schema version for migrations
    #[serde(rename = "v", default)]
    pub version: u32,
    pub record: ShiftRecord,
    /// ISO break-start time, duplicated under [`keys::BREAK_STARTED_AT`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_started_at: Option<String>,
}

impl ShiftSnapshot {
    pub fn new(record: ShiftRecord) -> Self {
        Self {
            version: CURRENT_SNAPSHOT_VERSION,
            record,
            break_started_at: None,
        }
    }
}

/// Single choke-point for reading and writing the durable snapshot.
#[derive(Clone)]
pub struct SnapshotStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> SnapshotStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Write the composite blob and mirror the break-start time under
    /// its dedicated key.
    pub fn save(&self, snapshot: &ShiftSnapshot) -> Result<(), StoreError> {
        let blob = serde_json::to_string(snapshot)?;
        self.kv.set(keys::SHIFT_SNAPSHOT, &blob)?;
        match &snapshot.break_started_at {
            Some(at) => self.kv.set(keys::BREAK_STARTED_AT, at)?,
            None => self.kv.remove(keys::BREAK_STARTED_AT)?,
        }
        Ok(())
    }

    /// Load the composite snapshot, re-attaching the break-start time
    /// from its dedicated key when the blob predates it (older schema
    /// versions stored it only separately). An unreadable blob is
    /// logged and treated as absent.
    pub fn load(&self) -> Result<Option<ShiftSnapshot>, StoreError> {
        let Some(blob) = self.kv.get(keys::SHIFT_SNAPSHOT)? else {
            return Ok(None);
        };
        let mut snapshot: ShiftSnapshot = match serde_json::from_str(&blob) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable shift snapshot");
                return Ok(None);
            }
        };
        if snapshot.break_started_at.is_none() {
            snapshot.break_started_at = self.kv.get(keys::BREAK_STARTED_AT)?;
        }
        Ok(Some(snapshot))
    }

    /// The dedicated break-start key, for timer recovery without
    /// deserializing the whole blob.
    pub fn break_started_at(&self) -> Result<Option<String>, StoreError> {
        self.kv.get(keys::BREAK_STARTED_AT)
    }

    /// Remove break-specific keys without touching shift-level state.
    pub fn clear_break(&self) -> Result<(), StoreError> {
        self.kv.remove(keys::BREAK_STARTED_AT)
    }

    /// Record that today's shift was closed so start actions stay off
    /// until the next calendar day.
    pub fn mark_closed(&self, day: &str) -> Result<(), StoreError> {
        self.kv.set(keys::SHIFT_CLOSED_ON, day)
    }

    pub fn closed_on(&self) -> Result<Option<String>, StoreError> {
        self.kv.get(keys::SHIFT_CLOSED_ON)
    }

    /// Cache the server's execution record for an order.
    pub fn save_execution(&self, execution: &OrderExecution) -> Result<(), StoreError> {
        let blob = serde_json::to_string(execution)?;
        self.kv.set(&keys::execution(&execution.order_id), &blob)
    }

    pub fn load_execution(&self, order_id: &OrderId) -> Result<Option<OrderExecution>, StoreError> {
        let Some(blob) = self.kv.get(&keys::execution(order_id))? else {
            return Ok(None);
        };
        match serde_json::from_str(&blob) {
            Ok(execution) => Ok(Some(execution)),
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "discarding unreadable cached execution");
                Ok(None)
            }
        }
    }

    pub fn clear_execution(&self, order_id: &OrderId) -> Result<(), StoreError> {
        self.kv.remove(&keys::execution(order_id))
    }

    /// Persisted double-click guard for order reopening.
    pub fn mark_reopened(&self, order_id: &OrderId) -> Result<(), StoreError> {
        self.kv.set(&keys::reopened(order_id), "1")
    }

    pub fn was_reopened(&self, order_id: &OrderId) -> Result<bool, StoreError> {
        Ok(self.kv.get(&keys::reopened(order_id))?.is_some())
    }

    /// Drop everything (logout).
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.kv.clear()
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
