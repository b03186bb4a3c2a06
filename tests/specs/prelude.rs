// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared spec harness: a runtime wired to recording fakes, plus the
//! durable store and clock handles the specs need to script a day.

pub(crate) use fw_adapters::{FakeBackend, FakeCamera, FakeGeo, FakeNav, FakeNotifier};
pub(crate) use fw_core::test_support::{depot_coordinates, offset_north, test_photo};
pub(crate) use fw_core::{Event, FakeClock, UserId, WorkflowConfig};
pub(crate) use fw_engine::{Runtime, RuntimeDeps, WorkflowError};
pub(crate) use fw_storage::{KvStore, MemoryStore, SnapshotStore};
use tokio::sync::mpsc;

/// A realistic "now" so local calendar math behaves.
pub(crate) const NOW_MS: u64 = 1_700_000_000_000;

pub(crate) type SpecRuntime =
    Runtime<MemoryStore, FakeBackend, FakeGeo, FakeCamera, FakeNotifier, FakeNav, FakeClock>;

pub(crate) struct Spec {
    pub runtime: SpecRuntime,
    pub backend: FakeBackend,
    pub geo: FakeGeo,
    pub camera: FakeCamera,
    pub notifier: FakeNotifier,
    pub nav: FakeNav,
    pub clock: FakeClock,
    pub store: MemoryStore,
    pub rx: mpsc::Receiver<Event>,
}

pub(crate) fn spec() -> Spec {
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
        WorkflowConfig::default(),
        UserId::new("U1"),
        tx,
    );

    Spec { runtime, backend, geo, camera, notifier, nav, clock, store, rx }
}

impl Spec {
    /// The snapshot layer over the same durable store.
    pub fn snapshots(&self) -> SnapshotStore<MemoryStore> {
        SnapshotStore::new(self.store.clone())
    }

    /// A fresh runtime over the same store/backend/devices — a reload.
    pub fn reload(&self) -> Spec {
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
        Spec {
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
}
