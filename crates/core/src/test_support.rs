// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::evidence::Photo;
use crate::geo::Coordinates;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::order::ExecutionStatus;
    use crate::shift::ShiftPhase;
    use proptest::prelude::*;

    pub fn arb_shift_phase() -> impl Strategy<Value = ShiftPhase> {
        prop_oneof![
            Just(ShiftPhase::NotStarted),
            Just(ShiftPhase::Started),
            Just(ShiftPhase::OnBreak),
            Just(ShiftPhase::BreakDone),
            Just(ShiftPhase::Ended),
        ]
    }

    pub fn arb_execution_status() -> impl Strategy<Value = ExecutionStatus> {
        prop_oneof![
            Just(ExecutionStatus::Pending),
            Just(ExecutionStatus::Started),
            Just(ExecutionStatus::Completed),
            Just(ExecutionStatus::Cancelled),
        ]
    }
}

// ── Fixture factories ───────────────────────────────────────────────────

/// A syntactically valid one-segment JPEG, base64-wrapped.
pub fn test_photo() -> Photo {
    Photo::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x01, 0x02, 0xFF, 0xD9])
}

/// A reference point in the Rio de Janeiro service area.
pub fn depot_coordinates() -> Coordinates {
    Coordinates::from_degrees(-22.9, -43.2)
}

/// Coordinates roughly `meters` north of `base`.
pub fn offset_north(base: &Coordinates, meters: f64) -> Coordinates {
    #[allow(clippy::unwrap_used)]
    let (lat, lon) = base.to_degrees().unwrap();
    Coordinates::from_degrees(lat + meters / 111_195.0, lon)
}
