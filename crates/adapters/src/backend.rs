// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend REST API seam.
//!
//! All mutating endpoints return the updated resource; errors follow
//! conventional HTTP status semantics. [`RemoteError`] keeps the raw
//! status and server message so the workflows can build the
//! user-facing wording per operation.

use async_trait::async_trait;
use fw_core::{
    BreakRecordId, CancelReason, Coordinates, ExecutionId, LocationSample, OrderExecution,
    OrderId, ShiftRecord, ShiftRecordId, TrajectoryId, UploadPayload, UserId,
};
use thiserror::Error;

/// A backend call failed.
#[derive(Debug, Clone, Error)]
#[error("backend call failed{}: {message}", fmt_status(.status))]
pub struct RemoteError {
    /// HTTP status, absent for connectivity failures.
    pub status: Option<u16>,
    /// Server-provided message, or the transport error text.
    pub message: String,
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

impl RemoteError {
    /// Transport-level failure (DNS, refused connection, timeout).
    pub fn network(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }

    /// HTTP-level failure with the server's message.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// User-facing wording per the presentation policy: validation
    /// failures surface the server's detail, 404 names what was
    /// missing, anything else becomes a generic connectivity message.
    pub fn user_message(&self, subject: &str) -> String {
        match self.status {
            Some(400) if !self.message.is_empty() => self.message.clone(),
            Some(404) => format!("{subject} was not found on the server"),
            Some(401) => "your session has expired, sign in again".to_string(),
            _ => "could not reach the server, check your connection and retry".to_string(),
        }
    }
}

/// Photo evidence plus where and when it was captured.
#[derive(Debug, Clone)]
pub struct EvidencePayload {
    pub photo: UploadPayload,
    pub coordinates: Coordinates,
    /// ISO capture time, also stamped onto the photo.
    pub captured_at: String,
}

/// The two logical backend services, collapsed into one client seam.
#[async_trait]
pub trait BackendApi: Clone + Send + Sync + 'static {
    // ── shift lifecycle ─────────────────────────────────────────────
    async fn start_shift(
        &self,
        user_id: &UserId,
        evidence: &EvidencePayload,
    ) -> Result<ShiftRecordId, RemoteError>;

    async fn start_break(
        &self,
        shift_record_id: &ShiftRecordId,
        coordinates: &Coordinates,
    ) -> Result<BreakRecordId, RemoteError>;

    async fn end_break(
        &self,
        break_record_id: &BreakRecordId,
        coordinates: &Coordinates,
    ) -> Result<(), RemoteError>;

    async fn end_shift(
        &self,
        shift_record_id: &ShiftRecordId,
        evidence: &EvidencePayload,
    ) -> Result<(), RemoteError>;

    /// Authoritative view of today's shift, for reconciliation on load.
    async fn fetch_shift(&self, user_id: &UserId) -> Result<Option<ShiftRecord>, RemoteError>;

    // ── service orders ──────────────────────────────────────────────
    /// Most recent execution the server knows for an order.
    async fn latest_execution(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<OrderExecution>, RemoteError>;

    async fn finish_trajectory(
        &self,
        trajectory_id: &TrajectoryId,
        coordinates: &Coordinates,
    ) -> Result<(), RemoteError>;

    async fn begin_execution(
        &self,
        order_id: &OrderId,
        trajectory_id: &TrajectoryId,
        evidence: &EvidencePayload,
    ) -> Result<OrderExecution, RemoteError>;

    async fn cancel_execution(
        &self,
        execution_id: &ExecutionId,
        reason: &CancelReason,
        evidence: &EvidencePayload,
    ) -> Result<(), RemoteError>;

    async fn finish_execution(
        &self,
        execution_id: &ExecutionId,
        evidence: &EvidencePayload,
    ) -> Result<(), RemoteError>;

    /// Create a fresh execution tied to the same dispatch.
    async fn reopen_execution(
        &self,
        order_id: &OrderId,
        previous: &ExecutionId,
        coordinates: &Coordinates,
    ) -> Result<OrderExecution, RemoteError>;

    // ── technician tracking ─────────────────────────────────────────
    async fn push_location(
        &self,
        user_id: &UserId,
        sample: &LocationSample,
    ) -> Result<(), RemoteError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::*;
    use fw_core::ExecutionStatus;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeBackendState {
        calls: Vec<String>,
        latest: HashMap<String, OrderExecution>,
        shift: Option<ShiftRecord>,
        pushed: Vec<LocationSample>,
        fail: HashMap<&'static str, RemoteError>,
        execution_seq: u32,
    }

    /// Scripted in-memory backend that records every call.
    #[derive(Clone, Default)]
    pub struct FakeBackend {
        inner: Arc<Mutex<FakeBackendState>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call made so far, as `"method arg"` strings.
        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().calls.clone()
        }

        /// How many calls hit the given method.
        pub fn call_count(&self, method: &str) -> usize {
            self.inner
                .lock()
                .calls
                .iter()
                .filter(|c| c.starts_with(method))
                .count()
        }

        /// Locations the stream actually pushed.
        pub fn pushed_locations(&self) -> Vec<LocationSample> {
            self.inner.lock().pushed.clone()
        }

        /// Script the server-side latest execution for an order.
        pub fn put_latest_execution(&self, execution: OrderExecution) {
            self.inner
                .lock()
                .latest
                .insert(execution.order_id.to_string(), execution);
        }

        /// Script the authoritative shift returned by `fetch_shift`.
        pub fn put_shift(&self, shift: ShiftRecord) {
            self.inner.lock().shift = Some(shift);
        }

        /// Make the next call to `method` fail with `error`.
        pub fn fail_next(&self, method: &'static str, error: RemoteError) {
            self.inner.lock().fail.insert(method, error);
        }

        fn record(&self, method: &'static str, arg: &str) -> Result<(), RemoteError> {
            let mut state = self.inner.lock();
            state.calls.push(format!("{method} {arg}"));
            match state.fail.remove(method) {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl BackendApi for FakeBackend {
        async fn start_shift(
            &self,
            user_id: &UserId,
            _evidence: &EvidencePayload,
        ) -> Result<ShiftRecordId, RemoteError> {
            self.record("start-shift", user_id)?;
            Ok(ShiftRecordId::new("P1"))
        }

        async fn start_break(
            &self,
            shift_record_id: &ShiftRecordId,
            _coordinates: &Coordinates,
        ) -> Result<BreakRecordId, RemoteError> {
            self.record("start-break", shift_record_id)?;
            Ok(BreakRecordId::new("B1"))
        }

        async fn end_break(
            &self,
            break_record_id: &BreakRecordId,
            _coordinates: &Coordinates,
        ) -> Result<(), RemoteError> {
            self.record("end-break", break_record_id)
        }

        async fn end_shift(
            &self,
            shift_record_id: &ShiftRecordId,
            _evidence: &EvidencePayload,
        ) -> Result<(), RemoteError> {
            self.record("end-shift", shift_record_id)
        }

        async fn fetch_shift(&self, user_id: &UserId) -> Result<Option<ShiftRecord>, RemoteError> {
            self.record("fetch-shift", user_id)?;
            Ok(self.inner.lock().shift.clone())
        }

        async fn latest_execution(
            &self,
            order_id: &OrderId,
        ) -> Result<Option<OrderExecution>, RemoteError> {
            self.record("latest-execution", order_id)?;
            Ok(self.inner.lock().latest.get(order_id.as_str()).cloned())
        }

        async fn finish_trajectory(
            &self,
            trajectory_id: &TrajectoryId,
            _coordinates: &Coordinates,
        ) -> Result<(), RemoteError> {
            self.record("finish-trajectory", trajectory_id)
        }

        async fn begin_execution(
            &self,
            order_id: &OrderId,
            trajectory_id: &TrajectoryId,
            evidence: &EvidencePayload,
        ) -> Result<OrderExecution, RemoteError> {
            self.record("begin-execution", order_id)?;
            let mut state = self.inner.lock();
            state.execution_seq += 1;
            let execution = OrderExecution {
                execution_id: ExecutionId::new(format!("E{}", state.execution_seq)),
                order_id: order_id.clone(),
                status: ExecutionStatus::Started,
                trajectory_id: Some(trajectory_id.clone()),
                start_coordinates: Some(evidence.coordinates.clone()),
                end_coordinates: None,
                cancel_reason: None,
            };
            state.latest.insert(order_id.to_string(), execution.clone());
            Ok(execution)
        }

        async fn cancel_execution(
            &self,
            execution_id: &ExecutionId,
            reason: &CancelReason,
            _evidence: &EvidencePayload,
        ) -> Result<(), RemoteError> {
            self.record("cancel-execution", execution_id)?;
            let mut state = self.inner.lock();
            for execution in state.latest.values_mut() {
                if execution.execution_id == *execution_id {
                    execution.status = ExecutionStatus::Cancelled;
                    execution.cancel_reason = Some(reason.clone());
                }
            }
            Ok(())
        }

        async fn finish_execution(
            &self,
            execution_id: &ExecutionId,
            evidence: &EvidencePayload,
        ) -> Result<(), RemoteError> {
            self.record("finish-execution", execution_id)?;
            let mut state = self.inner.lock();
            for execution in state.latest.values_mut() {
                if execution.execution_id == *execution_id {
                    execution.status = ExecutionStatus::Completed;
                    execution.end_coordinates = Some(evidence.coordinates.clone());
                }
            }
            Ok(())
        }

        async fn reopen_execution(
            &self,
            order_id: &OrderId,
            _previous: &ExecutionId,
            coordinates: &Coordinates,
        ) -> Result<OrderExecution, RemoteError> {
            self.record("reopen-execution", order_id)?;
            let mut state = self.inner.lock();
            state.execution_seq += 1;
            let execution = OrderExecution {
                execution_id: ExecutionId::new(format!("E{}", state.execution_seq)),
                order_id: order_id.clone(),
                status: ExecutionStatus::Started,
                trajectory_id: None,
                start_coordinates: Some(coordinates.clone()),
                end_coordinates: None,
                cancel_reason: None,
            };
            state.latest.insert(order_id.to_string(), execution.clone());
            Ok(execution)
        }

        async fn push_location(
            &self,
            user_id: &UserId,
            sample: &LocationSample,
        ) -> Result<(), RemoteError> {
            self.record("push-location", user_id)?;
            self.inner.lock().pushed.push(sample.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBackend;

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
