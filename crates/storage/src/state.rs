// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized in-memory state derived from workflow events.
//!
//! Events are facts about what happened; state is derived from those
//! facts. **All event handlers are idempotent** — applying the same
//! event twice must produce the same state as applying it once, because
//! events are applied both for immediate visibility and again when a
//! persisted snapshot is replayed after reload. Handlers therefore
//! guard every phase advance with an `allows` check and use assignment
//! rather than accumulation.

use fw_core::{
    Event, ExecutionStatus, OrderExecution, ShiftAction, ShiftRecord, UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Extract the `YYYY-MM-DD` day prefix of an ISO timestamp.
fn day_of(at: &str) -> &str {
    if at.len() >= 10 { &at[..10] } else { at }
}

/// Materialized state for one signed-in technician.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ShiftState {
    /// Today's shift record, if any action has been recorded.
    pub record: Option<ShiftRecord>,
    /// Optimistic per-order execution cache keyed by order id. The
    /// server remains authoritative; see the engine's reconciliation.
    #[serde(default)]
    pub executions: HashMap<String, OrderExecution>,
}

impl ShiftState {
    /// Look up the cached execution for an order.
    pub fn execution(&self, order_id: &str) -> Option<&OrderExecution> {
        self.executions.get(order_id)
    }

    /// Replace the cached execution for an order.
    pub fn put_execution(&mut self, execution: OrderExecution) {
        self.executions.insert(execution.order_id.to_string(), execution);
    }

    /// Apply an event to derive state changes.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::ShiftStarted { user_id, record_id, at } => {
                let record = self.record_for(user_id, day_of(at));
                if record.phase.allows(ShiftAction::Start) {
                    // apply() cannot fail after the allows() guard
                    let _ = record.apply(ShiftAction::Start, at.clone());
                }
                record.shift_record_id = Some(record_id.clone());
            }

            Event::BreakStarted { user_id, break_id, at } => {
                let record = self.record_for(user_id, day_of(at));
                if record.phase.allows(ShiftAction::BreakStart) {
                    let _ = record.apply(ShiftAction::BreakStart, at.clone());
                }
                record.break_record_id = Some(break_id.clone());
            }

            Event::BreakEnded { user_id, at } => {
                let record = self.record_for(user_id, day_of(at));
                if record.phase.allows(ShiftAction::BreakEnd) {
                    let _ = record.apply(ShiftAction::BreakEnd, at.clone());
                }
            }

            Event::ShiftEnded { user_id, record_id, at } => {
                let record = self.record_for(user_id, day_of(at));
                if record.phase.allows(ShiftAction::End) {
                    let _ = record.apply(ShiftAction::End, at.clone());
                }
                record.shift_record_id = Some(record_id.clone());
            }

            Event::ExecutionStarted { order_id, execution_id } => {
                if let Some(execution) = self.executions.get_mut(order_id.as_str()) {
                    if execution.execution_id == *execution_id && !execution.status.is_terminal() {
                        execution.status = ExecutionStatus::Started;
                    }
                }
            }

            Event::OrderCancelled { order_id, execution_id, reason } => {
                if let Some(execution) = self.executions.get_mut(order_id.as_str()) {
                    if execution.execution_id == *execution_id {
                        execution.status = ExecutionStatus::Cancelled;
                        execution.cancel_reason = Some(reason.clone());
                    }
                }
            }

            Event::OrderCompleted { order_id, execution_id } => {
                if let Some(execution) = self.executions.get_mut(order_id.as_str()) {
                    if execution.execution_id == *execution_id {
                        execution.status = ExecutionStatus::Completed;
                    }
                }
            }

            Event::OrderReopened { order_id, execution_id } => {
                if let Some(execution) = self.executions.get_mut(order_id.as_str()) {
                    // A reopen replaces the terminal execution with the
                    // fresh one the server created.
                    if execution.execution_id != *execution_id {
                        execution.execution_id = execution_id.clone();
                        execution.status = ExecutionStatus::Started;
                        execution.cancel_reason = None;
                    }
                }
            }

            // Presentation-only events carry no persisted state
            Event::BreakTick { .. }
            | Event::BreakReleased { .. }
            | Event::LocationPushed { .. } => {}
        }
    }

    /// Today's record for the user, creating a fresh one when absent or
    /// left over from a previous calendar day.
    fn record_for(&mut self, user_id: &UserId, day: &str) -> &mut ShiftRecord {
        let stale = self
            .record
            .as_ref()
            .is_some_and(|record| record.user_id != *user_id || !record.is_for(day));
        if stale {
            self.record = None;
        }
        self.record
            .get_or_insert_with(|| ShiftRecord::new(user_id.clone(), day))
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
