// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Navigation seam.
//!
//! The real router lives in the UI shell; the workflows only announce
//! where the technician should land after a step completes.

use async_trait::async_trait;
use fw_core::View;

/// Adapter for moving the user between views
#[async_trait]
pub trait NavAdapter: Clone + Send + Sync + 'static {
    async fn goto(&self, view: View);
}

/// Headless navigation: logs the requested view and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNav;

impl NoopNav {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NavAdapter for NoopNav {
    async fn goto(&self, view: View) {
        tracing::debug!(%view, "navigation requested");
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::NavAdapter;
    use async_trait::async_trait;
    use fw_core::View;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake navigation adapter that records visited views.
    #[derive(Clone, Default)]
    pub struct FakeNav {
        visited: Arc<Mutex<Vec<View>>>,
    }

    impl FakeNav {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn visited(&self) -> Vec<View> {
            self.visited.lock().clone()
        }
    }

    #[async_trait]
    impl NavAdapter for FakeNav {
        async fn goto(&self, view: View) {
            self.visited.lock().push(view);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNav;
