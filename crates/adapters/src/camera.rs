// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Camera seam.
//!
//! Field devices expose their camera as an HTTP snapshot endpoint; the
//! adapter fetches one JPEG frame per capture. A missing frame is the
//! workflows' cue to reject the step with a missing-evidence error.

use async_trait::async_trait;
use fw_core::Photo;
use std::time::Duration;
use thiserror::Error;

/// Errors from frame capture
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    #[error("no frame captured: {0}")]
    NoFrame(String),
}

/// Adapter for capturing a photo frame
#[async_trait]
pub trait CameraAdapter: Clone + Send + Sync + 'static {
    async fn capture(&self) -> Result<Photo, CameraError>;
}

/// Fetches a JPEG frame from a device snapshot URL.
#[derive(Clone)]
pub struct SnapshotCamera {
    client: reqwest::Client,
    snapshot_url: String,
}

impl SnapshotCamera {
    pub fn new(snapshot_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client, snapshot_url: snapshot_url.into() }
    }
}

#[async_trait]
impl CameraAdapter for SnapshotCamera {
    async fn capture(&self) -> Result<Photo, CameraError> {
        let response = self
            .client
            .get(&self.snapshot_url)
            .send()
            .await
            .map_err(|e| CameraError::NoFrame(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CameraError::NoFrame(format!(
                "snapshot endpoint returned {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CameraError::NoFrame(e.to_string()))?;
        if bytes.is_empty() {
            return Err(CameraError::NoFrame("empty frame".into()));
        }
        Ok(Photo::from_bytes(&bytes))
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{CameraAdapter, CameraError};
    use async_trait::async_trait;
    use fw_core::Photo;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct FakeCameraState {
        next: Result<Photo, CameraError>,
        captures: usize,
    }

    /// Scripted camera for testing
    #[derive(Clone)]
    pub struct FakeCamera {
        inner: Arc<Mutex<FakeCameraState>>,
    }

    impl FakeCamera {
        /// Always yields `photo`.
        pub fn with_photo(photo: Photo) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeCameraState { next: Ok(photo), captures: 0 })),
            }
        }

        /// Always fails, simulating a technician who skipped the photo.
        pub fn empty() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeCameraState {
                    next: Err(CameraError::NoFrame("no photo taken".into())),
                    captures: 0,
                })),
            }
        }

        pub fn captures(&self) -> usize {
            self.inner.lock().captures
        }

        /// Change what subsequent captures yield.
        pub fn set(&self, result: Result<Photo, CameraError>) {
            self.inner.lock().next = result;
        }
    }

    #[async_trait]
    impl CameraAdapter for FakeCamera {
        async fn capture(&self) -> Result<Photo, CameraError> {
            let mut state = self.inner.lock();
            state.captures += 1;
            state.next.clone()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCamera;

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
