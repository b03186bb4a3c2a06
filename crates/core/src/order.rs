// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service orders and their execution records.
//!
//! A dispatched order carries at most one live execution; completion and
//! cancellation are terminal. The locally cached execution is a display
//! optimisation only — permission for a state change always comes from a
//! fresh server read (see the engine's reconciliation policy).

use crate::geo::Coordinates;
use crate::id::{ExecutionId, OrderId, TrajectoryId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status of one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Started,
    Completed,
    Cancelled,
}

crate::simple_display! {
    ExecutionStatus {
        Pending => "pending",
        Started => "started",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl ExecutionStatus {
    /// Completed and cancelled executions accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Cancelled)
    }
}

/// Why a technician abandoned an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum CancelReason {
    CustomerAbsent,
    AccessDenied,
    MaterialMissing,
    UnsafeConditions,
    /// Free text, mandatory for this variant.
    Other(String),
}

crate::simple_display! {
    CancelReason {
        CustomerAbsent => "customer absent",
        AccessDenied => "access denied",
        MaterialMissing => "material missing",
        UnsafeConditions => "unsafe conditions",
        Other(..) => "other",
    }
}

/// A cancellation reason failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReasonError {
    #[error("cancellation reason 'other' requires a description")]
    MissingDetail,
}

impl CancelReason {
    /// `Other` must carry a non-blank description.
    pub fn validate(&self) -> Result<(), ReasonError> {
        match self {
            CancelReason::Other(detail) if detail.trim().is_empty() => {
                Err(ReasonError::MissingDetail)
            }
            _ => Ok(()),
        }
    }
}

/// One attempt to perform a service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExecution {
    pub execution_id: ExecutionId,
    pub order_id: OrderId,
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory_id: Option<TrajectoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<CancelReason>,
}

impl OrderExecution {
    pub fn is_live(&self) -> bool {
        self.status == ExecutionStatus::Started
    }
}

/// A dispatched unit of field work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: OrderId,
    pub assignee: UserId,
    pub description: String,
    pub status: ExecutionStatus,
    /// Route leg currently underway, set by the order list when the
    /// technician departs for the site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory_id: Option<TrajectoryId>,
    /// Most recent execution known to the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<OrderExecution>,
}

crate::builder! {
    pub struct ExecutionBuilder => OrderExecution {
        into {
            execution_id: ExecutionId = "E1",
            order_id: OrderId = "O1",
        }
        set {
            status: ExecutionStatus = ExecutionStatus::Started,
        }
        option {
            trajectory_id: TrajectoryId = None,
            start_coordinates: Coordinates = None,
            end_coordinates: Coordinates = None,
            cancel_reason: CancelReason = None,
        }
    }
}

crate::builder! {
    pub struct ServiceOrderBuilder => ServiceOrder {
        into {
            id: OrderId = "O1",
            assignee: UserId = "U1",
            description: String = "meter swap",
        }
        set {
            status: ExecutionStatus = ExecutionStatus::Pending,
        }
        option {
            trajectory_id: TrajectoryId = None,
            execution: OrderExecution = None,
        }
    }
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
