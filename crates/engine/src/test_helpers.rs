// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests: a fully-faked runtime plus the
//! handles needed to script and inspect it.

use crate::runtime::{Runtime, RuntimeDeps};
use fw_adapters::{FakeBackend, FakeCamera, FakeGeo, FakeNav, FakeNotifier};
use fw_core::test_support::{depot_coordinates, test_photo};
use fw_core::{Event, FakeClock, UserId, WorkflowConfig};
use fw_storage::MemoryStore;
use tokio::sync::mpsc;

/// A realistic "now" so local calendar math behaves.
pub(crate) const NOW_MS: u64 = 1_700_000_000_000;

pub(crate) type TestRuntime =
    Runtime<MemoryStore, FakeBackend, FakeGeo, FakeCamera, FakeNotifier, FakeNav, FakeClock>;

pub(crate) struct TestContext {
    pub runtime: TestRuntime,
    pub backend: FakeBackend,
    pub geo: FakeGeo,
    pub camera: FakeCamera,
    pub notifier: FakeNotifier,
    pub nav: FakeNav,
    pub clock: FakeClock,
    pub store: MemoryStore,
    pub rx: mpsc::Receiver<Event>,
}

pub(crate) fn setup() -> TestContext {
    setup_with_config(WorkflowConfig::default())
}

pub(crate) fn setup_with_config(config: WorkflowConfig) -> TestContext {
    let backend = FakeBackend::new();
    let geo = FakeGeo::fixed(depot_coordinates());
    let camera = FakeCamera::with_photo(test_photo());
    let notifier = FakeNotifier::new();
    let nav = FakeNav::new();
    let clock = FakeClock::new();
    clock.set_epoch_ms(NOW_MS);
    let store = MemoryStore::new();
    let (tx, rx) = mpsc::channel(256);

    let runtime = Runtime::new(
        RuntimeDeps {
            store: store.clone(),
            backend: backend.clone(),
            geo: geo.clone(),
            camera: camera.clone(),
            notifier: notifier.clone(),
            nav: nav.clone(),
        },
        clock.clone(),
        config,
        UserId::new("U1"),
        tx,
    );

    TestContext {
        runtime,
        backend,
        geo,
        camera,
        notifier,
        nav,
        clock,
        store,
        rx,
    }
}

impl TestContext {
    /// Simulate a page reload: a fresh runtime over the same durable
    /// store, backend, devices, and clock, with empty in-memory state.
    pub fn reload(&self) -> TestContext {
        let (tx, rx) = mpsc::channel(256);
        let runtime = Runtime::new(
            RuntimeDeps {
                store: self.store.clone(),
                backend: self.backend.clone(),
                geo: self.geo.clone(),
                camera: self.camera.clone(),
                notifier: self.notifier.clone(),
                nav: self.nav.clone(),
            },
            self.clock.clone(),
            WorkflowConfig::default(),
            UserId::new("U1"),
            tx,
        );
        TestContext {
            runtime,
            backend: self.backend.clone(),
            geo: self.geo.clone(),
            camera: self.camera.clone(),
            notifier: self.notifier.clone(),
            nav: self.nav.clone(),
            clock: self.clock.clone(),
            store: self.store.clone(),
            rx,
        }
    }

    /// Drain every event currently queued.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Run the full happy-path morning: clocked in, on break.
    pub async fn clock_in_and_break(&self) {
        self.runtime.start_shift().await.unwrap();
        self.runtime.start_break().await.unwrap();
    }
}
