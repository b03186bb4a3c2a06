// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow error taxonomy.
//!
//! Every operation surfaces one of these; nothing retries silently and
//! nothing is swallowed. The UI turns them into wording with
//! [`WorkflowError::user_message`].

use fw_adapters::{CameraError, GeoError, RemoteError};
use fw_core::evidence::EvidenceError;
use fw_core::{format_remaining, ExecutionStatus, TransitionError};
use fw_storage::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Errors from the shift and order workflows
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A step that needs photo evidence ran without a captured frame.
    #[error("a photo is required for this step: {0}")]
    MissingEvidence(#[source] CameraError),

    /// Geolocation capture failed or timed out.
    #[error(transparent)]
    LocationUnavailable(#[from] GeoError),

    /// End-break attempted before the minimum elapsed.
    #[error("break can only end in {}", fmt_remaining(.remaining))]
    BreakNotElapsed { remaining: Duration },

    /// End-break attempted with no recorded break start.
    #[error("no break has been started")]
    BreakNotStarted,

    /// Order start attempted with no active route leg.
    #[error("the route to the site has not been started")]
    TrajectoryNotStarted,

    /// A mutating order operation against a server-confirmed status
    /// that forbids it.
    #[error("not allowed while the execution is {status}")]
    IllegalTransition { status: ExecutionStatus },

    /// A shift action arrived out of lifecycle order.
    #[error(transparent)]
    OutOfOrder(#[from] TransitionError),

    /// Caller-side validation failure (missing ids, blank reason text).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Backend HTTP failure, carrying status and message.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Durable snapshot failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Photo payload could not be decoded for upload.
    #[error(transparent)]
    Evidence(#[from] EvidenceError),
}

fn fmt_remaining(remaining: &Duration) -> String {
    format_remaining(*remaining)
}

impl WorkflowError {
    /// Human-readable wording for the UI layer. `subject` names what
    /// the operation acted on ("the shift", "the service order") for
    /// the not-found case.
    pub fn user_message(&self, subject: &str) -> String {
        match self {
            WorkflowError::Remote(e) => e.user_message(subject),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
