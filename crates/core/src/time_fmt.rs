// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Countdown formatting for the break timer.

use std::time::Duration;

/// Format remaining break time for display.
///
/// Under one hour the countdown reads `MM:SS`; at an hour or more it
/// collapses to `XhYYm` (only reachable when the stored break start
/// lies in the future, e.g. after a device clock adjustment).
pub fn format_remaining(remaining: Duration) -> String {
    let total_secs = remaining.as_secs();
    if total_secs >= 3600 {
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        format!("{hours}h{minutes:02}m")
    } else {
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
