// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    zero = { 0, "00:00" },
    under_a_minute = { 59, "00:59" },
    minutes_and_seconds = { 754, "12:34" },
    just_under_an_hour = { 3599, "59:59" },
    exactly_an_hour = { 3600, "1h00m" },
    ninety_minutes = { 5400, "1h30m" },
)]
fn formats(secs: u64, expected: &str) {
    assert_eq!(format_remaining(Duration::from_secs(secs)), expected);
}
