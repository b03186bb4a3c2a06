// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daily shift record and its state machine.
//!
//! A shift moves through a one-way linear sequence: start, break start,
//! break end, end. The phase is the single source of truth; the
//! per-action disabled flags the UI needs are derived from it, never
//! stored.

use crate::id::{BreakRecordId, ShiftRecordId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four recordable shift actions, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftAction {
    Start,
    BreakStart,
    BreakEnd,
    End,
}

crate::simple_display! {
    ShiftAction {
        Start => "start",
        BreakStart => "break-start",
        BreakEnd => "break-end",
        End => "end",
    }
}

/// Where a shift record is in its daily lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPhase {
    #[default]
    NotStarted,
    Started,
    OnBreak,
    BreakDone,
    Ended,
}

crate::simple_display! {
    ShiftPhase {
        NotStarted => "not-started",
        Started => "started",
        OnBreak => "on-break",
        BreakDone => "break-done",
        Ended => "ended",
    }
}

/// An action was attempted out of lifecycle order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot record {action} while shift is {from}")]
pub struct TransitionError {
    pub from: ShiftPhase,
    pub action: ShiftAction,
}

impl ShiftPhase {
    /// The transition table: which single action each phase accepts.
    fn eligible(self) -> Option<ShiftAction> {
        match self {
            ShiftPhase::NotStarted => Some(ShiftAction::Start),
            ShiftPhase::Started => Some(ShiftAction::BreakStart),
            ShiftPhase::OnBreak => Some(ShiftAction::BreakEnd),
            ShiftPhase::BreakDone => Some(ShiftAction::End),
            ShiftPhase::Ended => None,
        }
    }

    /// Whether `action` is the next eligible step from this phase.
    pub fn allows(self, action: ShiftAction) -> bool {
        self.eligible() == Some(action)
    }

    /// Advance to the next phase, rejecting out-of-order actions.
    pub fn advance(self, action: ShiftAction) -> Result<ShiftPhase, TransitionError> {
        if !self.allows(action) {
            return Err(TransitionError { from: self, action });
        }
        Ok(match action {
            ShiftAction::Start => ShiftPhase::Started,
            ShiftAction::BreakStart => ShiftPhase::OnBreak,
            ShiftAction::BreakEnd => ShiftPhase::BreakDone,
            ShiftAction::End => ShiftPhase::Ended,
        })
    }

    /// Per-action disabled flags for the UI, in lifecycle order
    /// (start, break start, break end, end). `true` = disabled.
    pub fn disabled_actions(self) -> [bool; 4] {
        let mut flags = [true; 4];
        if let Some(action) = self.eligible() {
            flags[action as usize] = false;
        }
        flags
    }

    pub fn is_terminal(self) -> bool {
        self == ShiftPhase::Ended
    }
}

/// ISO timestamps of the recorded shift events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTimestamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl ShiftTimestamps {
    pub fn get(&self, action: ShiftAction) -> Option<&str> {
        match action {
            ShiftAction::Start => self.start.as_deref(),
            ShiftAction::BreakStart => self.break_start.as_deref(),
            ShiftAction::BreakEnd => self.break_end.as_deref(),
            ShiftAction::End => self.end.as_deref(),
        }
    }

    fn set(&mut self, action: ShiftAction, at: String) {
        let slot = match action {
            ShiftAction::Start => &mut self.start,
            ShiftAction::BreakStart => &mut self.break_start,
            ShiftAction::BreakEnd => &mut self.break_end,
            ShiftAction::End => &mut self.end,
        };
        *slot = Some(at);
    }
}

/// One technician's shift for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub user_id: UserId,
    /// Local calendar date (`YYYY-MM-DD`) this record belongs to.
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_record_id: Option<ShiftRecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_record_id: Option<BreakRecordId>,
    #[serde(default)]
    pub timestamps: ShiftTimestamps,
    #[serde(default)]
    pub phase: ShiftPhase,
}

impl ShiftRecord {
    /// Fresh record for a user and calendar day, nothing recorded yet.
    pub fn new(user_id: impl Into<UserId>, day: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            day: day.into(),
            shift_record_id: None,
            break_record_id: None,
            timestamps: ShiftTimestamps::default(),
            phase: ShiftPhase::NotStarted,
        }
    }

    /// Check that `action` would be accepted without mutating anything.
    pub fn ensure(&self, action: ShiftAction) -> Result<(), TransitionError> {
        self.phase.advance(action).map(|_| ())
    }

    /// Record `action` at the given ISO time, advancing the phase.
    pub fn apply(&mut self, action: ShiftAction, at: impl Into<String>) -> Result<(), TransitionError> {
        self.phase = self.phase.advance(action)?;
        self.timestamps.set(action, at.into());
        Ok(())
    }

    /// Derived per-action disabled flags (`true` = disabled).
    pub fn disabled_actions(&self) -> [bool; 4] {
        self.phase.disabled_actions()
    }

    /// Whether this record belongs to the given local calendar date.
    pub fn is_for(&self, day: &str) -> bool {
        self.day == day
    }
}

crate::builder! {
    pub struct ShiftRecordBuilder => ShiftRecord {
        into {
            user_id: UserId = "U1",
            day: String = "2026-02-10",
        }
        set {
            phase: ShiftPhase = ShiftPhase::NotStarted,
            timestamps: ShiftTimestamps = ShiftTimestamps::default(),
        }
        option {
            shift_record_id: ShiftRecordId = None,
            break_record_id: BreakRecordId = None,
        }
    }
}

#[cfg(test)]
#[path = "shift_tests.rs"]
mod tests;
