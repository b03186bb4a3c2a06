// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Geolocation seam.
//!
//! One-shot position capture with a hard timeout: a hung GPS source
//! must surface a typed error, never block a workflow step
//! indefinitely.

use async_trait::async_trait;
use fw_core::Coordinates;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Errors from position capture
#[derive(Debug, Clone, Error)]
pub enum GeoError {
    #[error("location permission denied")]
    Denied,
    #[error("location capture timed out after {0:?}")]
    Timeout(Duration),
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for capturing the device position
#[async_trait]
pub trait GeoAdapter: Clone + Send + Sync + 'static {
    /// Capture the current position, or fail within the configured
    /// timeout.
    async fn capture(&self) -> Result<Coordinates, GeoError>;
}

/// gpsd client: connects to the daemon's TCP socket, enables the JSON
/// watch stream, and takes the first TPV report carrying a fix.
#[derive(Clone)]
pub struct GpsdSource {
    addr: String,
    timeout: Duration,
}

const WATCH_COMMAND: &str = "?WATCH={\"enable\":true,\"json\":true}\n";

impl GpsdSource {
    /// `addr` is usually `127.0.0.1:2947`.
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self { addr: addr.into(), timeout }
    }

    async fn first_fix(&self) -> Result<Coordinates, GeoError> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| GeoError::Unavailable(format!("gpsd connect failed: {e}")))?;
        stream
            .write_all(WATCH_COMMAND.as_bytes())
            .await
            .map_err(|e| GeoError::Unavailable(format!("gpsd write failed: {e}")))?;

        let mut lines = BufReader::new(stream).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| GeoError::Unavailable(format!("gpsd read failed: {e}")))?
        {
            if let Some((lat, lon)) = parse_tpv(&line) {
                return Ok(Coordinates::from_degrees(lat, lon));
            }
        }
        Err(GeoError::Unavailable("gpsd stream ended without a fix".into()))
    }
}

/// Extract latitude/longitude from a gpsd TPV report line.
///
/// Mode 2 (2D) or 3 (3D) means the receiver has a fix; anything else
/// (including VERSION/DEVICES chatter) is skipped.
fn parse_tpv(line: &str) -> Option<(f64, f64)> {
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    if value.get("class")?.as_str()? != "TPV" {
        return None;
    }
    if value.get("mode")?.as_u64()? < 2 {
        return None;
    }
    let lat = value.get("lat")?.as_f64()?;
    let lon = value.get("lon")?.as_f64()?;
    Some((lat, lon))
}

#[async_trait]
impl GeoAdapter for GpsdSource {
    async fn capture(&self) -> Result<Coordinates, GeoError> {
        tokio::time::timeout(self.timeout, self.first_fix())
            .await
            .map_err(|_| GeoError::Timeout(self.timeout))?
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{GeoAdapter, GeoError};
    use async_trait::async_trait;
    use fw_core::Coordinates;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct FakeGeoState {
        queued: VecDeque<Result<Coordinates, GeoError>>,
        fallback: Result<Coordinates, GeoError>,
        captures: usize,
    }

    /// Scripted position source for testing
    #[derive(Clone)]
    pub struct FakeGeo {
        inner: Arc<Mutex<FakeGeoState>>,
    }

    impl FakeGeo {
        /// Always returns `fix` unless specific results are queued.
        pub fn fixed(fix: Coordinates) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeGeoState {
                    queued: VecDeque::new(),
                    fallback: Ok(fix),
                    captures: 0,
                })),
            }
        }

        /// Always fails with `error` unless specific results are queued.
        pub fn failing(error: GeoError) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeGeoState {
                    queued: VecDeque::new(),
                    fallback: Err(error),
                    captures: 0,
                })),
            }
        }

        /// Queue the result of the next capture (FIFO).
        pub fn push(&self, result: Result<Coordinates, GeoError>) {
            self.inner.lock().queued.push_back(result);
        }

        /// Change what captures yield once the queue is empty.
        pub fn set_fallback(&self, result: Result<Coordinates, GeoError>) {
            self.inner.lock().fallback = result;
        }

        /// Number of captures performed.
        pub fn captures(&self) -> usize {
            self.inner.lock().captures
        }
    }

    #[async_trait]
    impl GeoAdapter for FakeGeo {
        async fn capture(&self) -> Result<Coordinates, GeoError> {
            let mut state = self.inner.lock();
            state.captures += 1;
            match state.queued.pop_front() {
                Some(result) => result,
                None => state.fallback.clone(),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeGeo;

#[cfg(test)]
#[path = "geo_tests.rs"]
mod tests;
