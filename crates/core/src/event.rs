// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events published by the workflows.
//!
//! Serializes with `{"type": "shift:started", ...fields}` format. The
//! UI layer subscribes to these to refresh views; the materialized
//! state applies them to stay consistent with what was persisted.

use crate::geo::LocationSample;
use crate::id::{BreakRecordId, ExecutionId, OrderId, ShiftRecordId, UserId};
use crate::order::CancelReason;
use serde::{Deserialize, Serialize};

/// State changes announced by the shift and order workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "shift:started")]
    ShiftStarted {
        user_id: UserId,
        record_id: ShiftRecordId,
        at: String,
    },

    #[serde(rename = "shift:break-started")]
    BreakStarted {
        user_id: UserId,
        break_id: BreakRecordId,
        at: String,
    },

    /// Countdown update while the break minimum has not elapsed.
    #[serde(rename = "break:tick")]
    BreakTick { remaining: String },

    /// The one-hour minimum has elapsed; emitted exactly once.
    #[serde(rename = "break:released")]
    BreakReleased { user_id: UserId },

    #[serde(rename = "shift:break-ended")]
    BreakEnded { user_id: UserId, at: String },

    #[serde(rename = "shift:ended")]
    ShiftEnded {
        user_id: UserId,
        record_id: ShiftRecordId,
        at: String,
    },

    #[serde(rename = "order:execution-started")]
    ExecutionStarted {
        order_id: OrderId,
        execution_id: ExecutionId,
    },

    #[serde(rename = "order:cancelled")]
    OrderCancelled {
        order_id: OrderId,
        execution_id: ExecutionId,
        reason: CancelReason,
    },

    /// Execution submitted; the UI follows up with the signature form.
    #[serde(rename = "order:completed")]
    OrderCompleted {
        order_id: OrderId,
        execution_id: ExecutionId,
    },

    #[serde(rename = "order:reopened")]
    OrderReopened {
        order_id: OrderId,
        execution_id: ExecutionId,
    },

    #[serde(rename = "location:pushed")]
    LocationPushed {
        user_id: UserId,
        sample: LocationSample,
    },
}

impl Event {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ShiftStarted { .. } => "shift:started",
            Event::BreakStarted { .. } => "shift:break-started",
            Event::BreakTick { .. } => "break:tick",
            Event::BreakReleased { .. } => "break:released",
            Event::BreakEnded { .. } => "shift:break-ended",
            Event::ShiftEnded { .. } => "shift:ended",
            Event::ExecutionStarted { .. } => "order:execution-started",
            Event::OrderCancelled { .. } => "order:cancelled",
            Event::OrderCompleted { .. } => "order:completed",
            Event::OrderReopened { .. } => "order:reopened",
            Event::LocationPushed { .. } => "location:pushed",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
