// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation against the authoritative backend.
//!
//! The local cache (memory + snapshot) is a display optimisation; the
//! server decides what a mutation is allowed to do. Two entry points:
//! a read-through that runs before every mutating order transition,
//! and the on-load shift reconciliation.

use crate::error::WorkflowError;
use crate::runtime::Runtime;
use fw_adapters::{BackendApi, CameraAdapter, GeoAdapter, NavAdapter, NotifyAdapter};
use fw_core::{Clock, OrderExecution, OrderId, ShiftPhase};
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
    /// Fetch the server's view of an order's execution and make the
    /// local cache agree with it. Returns the server record — callers
    /// evaluate preconditions against this, never against the cache.
    pub(crate) async fn authoritative_execution(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<OrderExecution>, WorkflowError> {
        let fresh = self.backend.latest_execution(order_id).await?;
        let cached = self.state.lock().execution(order_id).cloned();

        match (&fresh, &cached) {
            (Some(server), Some(local))
                if server.execution_id != local.execution_id
                    || server.status != local.status =>
            {
                tracing::info!(
                    order_id = %order_id,
                    cached_status = %local.status,
                    server_status = %server.status,
                    "cached execution is stale, replacing with server record"
                );
            }
            (None, Some(local)) => {
                tracing::info!(
                    order_id = %order_id,
                    cached_status = %local.status,
                    "server has no execution for this order, dropping cache"
                );
            }
            _ => {}
        }

        match &fresh {
            Some(server) => {
                self.state.lock().put_execution(server.clone());
                self.snapshots.save_execution(server)?;
            }
            None => {
                self.state.lock().executions.remove(order_id.as_str());
                self.snapshots.clear_execution(order_id)?;
            }
        }
        Ok(fresh)
    }

    /// On-load shift reconciliation.
    ///
    /// Loads the persisted snapshot (discarding records from another
    /// day or another user), asks the server for today's shift, and
    /// lets the server win whenever it answers. A transport failure
    /// keeps the local snapshot so the technician can keep working
    /// offline; the next mutating call re-validates anyway.
    pub async fn resume(&self) -> Result<(), WorkflowError> {
        let today = self.today();
        let local = self
            .snapshots
            .load()?
            .filter(|s| s.record.user_id == self.user_id && s.record.is_for(&today));

        match self.backend.fetch_shift(&self.user_id).await {
            Ok(Some(server)) if server.is_for(&today) && server.user_id == self.user_id => {
                tracing::info!(phase = %server.phase, "adopting server shift record");
                self.state.lock().record = Some(server);
                self.persist()?;
            }
            Ok(_) => {
                if let Some(snapshot) = local {
                    tracing::info!(
                        phase = %snapshot.record.phase,
                        "server reports no shift today, discarding local snapshot"
                    );
                }
                self.state.lock().record = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "shift fetch failed, trusting local snapshot");
                if let Some(snapshot) = local {
                    self.state.lock().record = Some(snapshot.record);
                }
            }
        }

        let on_break = self
            .state
            .lock()
            .record
            .as_ref()
            .is_some_and(|r| r.phase == ShiftPhase::OnBreak);
        if on_break {
            self.restart_break_timer()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
