// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service-order execution lifecycle.
//!
//! Start, cancel, finish, reopen — every mutating transition first
//! re-reads the authoritative execution from the server; the cache is
//! never the source of permission for a state change.

use crate::error::WorkflowError;
use crate::runtime::Runtime;
use fw_adapters::{BackendApi, CameraAdapter, GeoAdapter, NavAdapter, NotifyAdapter};
use fw_core::{CancelReason, Clock, Event, ExecutionStatus, ServiceOrder};
use fw_storage::KvStore;

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
    /// Arrive on site: close the route leg, then open an execution.
    ///
    /// Requires the trajectory the order list started when the
    /// technician departed.
    pub async fn start_order(&self, order: &ServiceOrder) -> Result<(), WorkflowError> {
        let trajectory_id = order
            .trajectory_id
            .clone()
            .ok_or(WorkflowError::TrajectoryNotStarted)?;

        let evidence = self.capture_evidence("order-start.jpg").await?;
        self.backend
            .finish_trajectory(&trajectory_id, &evidence.coordinates)
            .await?;
        let execution = self
            .backend
            .begin_execution(&order.id, &trajectory_id, &evidence)
            .await?;
        tracing::info!(
            order_id = %order.id,
            execution_id = %execution.execution_id,
            "execution started"
        );

        self.state.lock().put_execution(execution.clone());
        self.snapshots.save_execution(&execution)?;
        self.emit(Event::ExecutionStarted {
            order_id: order.id.clone(),
            execution_id: execution.execution_id,
        })
        .await?;
        Ok(())
    }

    /// Abandon the visit. The reason is mandatory; "other" needs free
    /// text. Permission comes from the server's execution status — a
    /// stale local "started" must not cancel an already-settled order.
    pub async fn cancel_order(
        &self,
        order: &ServiceOrder,
        reason: CancelReason,
    ) -> Result<(), WorkflowError> {
        reason
            .validate()
            .map_err(|e| WorkflowError::InvalidRequest(e.to_string()))?;

        let execution = self
            .authoritative_execution(&order.id)
            .await?
            .ok_or(WorkflowError::IllegalTransition { status: ExecutionStatus::Pending })?;
        if !execution.is_live() {
            return Err(WorkflowError::IllegalTransition { status: execution.status });
        }

        let evidence = self.capture_evidence("order-cancel.jpg").await?;
        self.backend
            .cancel_execution(&execution.execution_id, &reason, &evidence)
            .await?;
        tracing::info!(
            order_id = %order.id,
            execution_id = %execution.execution_id,
            reason = %reason,
            "execution cancelled"
        );

        self.emit(Event::OrderCancelled {
            order_id: order.id.clone(),
            execution_id: execution.execution_id,
            reason,
        })
        .await?;
        self.snapshots.clear_execution(&order.id)?;
        Ok(())
    }

    /// Close the visit with a final photo. The order is only fully
    /// closed once the signature form (driven by the UI off the
    /// completed event) is also submitted.
    pub async fn finish_order(&self, order: &ServiceOrder) -> Result<(), WorkflowError> {
        // Recover the in-memory reference after a reload.
        if self.state.lock().execution(order.id.as_str()).is_none() {
            if let Some(cached) = self.snapshots.load_execution(&order.id)? {
                tracing::debug!(order_id = %order.id, "recovered execution from persistence");
                self.state.lock().put_execution(cached);
            }
        }

        let execution = self
            .authoritative_execution(&order.id)
            .await?
            .ok_or(WorkflowError::IllegalTransition { status: ExecutionStatus::Pending })?;
        if !execution.is_live() {
            return Err(WorkflowError::IllegalTransition { status: execution.status });
        }

        let evidence = self.capture_evidence("order-finish.jpg").await?;
        self.backend
            .finish_execution(&execution.execution_id, &evidence)
            .await?;
        tracing::info!(
            order_id = %order.id,
            execution_id = %execution.execution_id,
            "execution completed, awaiting closing form"
        );

        self.emit(Event::OrderCompleted {
            order_id: order.id.clone(),
            execution_id: execution.execution_id,
        })
        .await?;
        // Keep the (now completed) execution cached until the closing
        // form settles the order.
        if let Some(updated) = self.cached_execution(order.id.as_str()) {
            self.snapshots.save_execution(&updated)?;
        }
        Ok(())
    }

    /// Re-dispatch an erroneously settled order: one new execution,
    /// guarded so a double click (or a reload between clicks) issues
    /// exactly one server call.
    pub async fn reopen_order(&self, order: &ServiceOrder) -> Result<(), WorkflowError> {
        if self.snapshots.was_reopened(&order.id)? {
            tracing::info!(order_id = %order.id, "reopen already issued, ignoring");
            return Ok(());
        }

        let latest = self
            .backend
            .latest_execution(&order.id)
            .await?
            .ok_or_else(|| {
                WorkflowError::InvalidRequest("order has no execution to reopen".into())
            })?;
        let coordinates = self.capture_position().await?;
        let execution = self
            .backend
            .reopen_execution(&order.id, &latest.execution_id, &coordinates)
            .await?;
        self.snapshots.mark_reopened(&order.id)?;
        tracing::info!(
            order_id = %order.id,
            execution_id = %execution.execution_id,
            "order reopened"
        );

        self.state.lock().put_execution(execution.clone());
        self.snapshots.save_execution(&execution)?;
        self.emit(Event::OrderReopened {
            order_id: order.id.clone(),
            execution_id: execution.execution_id,
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
