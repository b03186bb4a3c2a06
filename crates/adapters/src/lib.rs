// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fw-adapters: seams to the external collaborators.
//!
//! Each concern the workflows depend on — the backend REST API, the
//! geolocation source, the camera, the desktop notifier, view
//! navigation — lives behind an `async_trait` with one production
//! implementation and one recording fake (gated behind `test-support`).

pub mod backend;
pub mod camera;
pub mod geo;
mod http;
pub mod nav;
pub mod notify;

pub use backend::{BackendApi, EvidencePayload, RemoteError};
pub use camera::{CameraAdapter, CameraError, SnapshotCamera};
pub use geo::{GeoAdapter, GeoError, GpsdSource};
pub use http::HttpBackend;
pub use nav::{NavAdapter, NoopNav};
pub use notify::{DesktopNotifier, NotifyAdapter, NotifyError};

#[cfg(any(test, feature = "test-support"))]
pub use backend::FakeBackend;
#[cfg(any(test, feature = "test-support"))]
pub use camera::FakeCamera;
#[cfg(any(test, feature = "test-support"))]
pub use geo::FakeGeo;
#[cfg(any(test, feature = "test-support"))]
pub use nav::FakeNav;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifier;
