// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fw-storage: durable client-side snapshot layer and materialized state.
//!
//! The durable store is a plain string key-value surface (the browser
//! origin storage of the original deployment); everything above it goes
//! through [`SnapshotStore`], the single choke-point for reading and
//! writing shift/break/order state.

pub mod kv;
pub mod snapshot;
pub mod state;

pub use kv::{FileStore, KvStore, MemoryStore, StoreError};
pub use snapshot::{keys, ShiftSnapshot, SnapshotStore, CURRENT_SNAPSHOT_VERSION};
pub use state::ShiftState;
