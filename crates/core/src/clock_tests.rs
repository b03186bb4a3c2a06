// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    let ms1 = clock.epoch_ms();
    clock.advance(Duration::from_secs(60));
    assert!(clock.now().duration_since(t1) >= Duration::from_secs(60));
    assert_eq!(clock.epoch_ms(), ms1 + 60_000);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    clock2.advance(Duration::from_secs(30));
    assert_eq!(clock1.epoch_ms(), clock2.epoch_ms());
}

#[test]
fn fake_clock_set_epoch_ms() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_700_000_000_000);
    assert_eq!(clock.epoch_ms(), 1_700_000_000_000);
}

#[test]
fn local_date_formats_calendar_day() {
    // 2023-11-14T22:13:20Z; the local rendering depends on the test
    // machine's zone, so only check the shape.
    let date = local_date(1_700_000_000_000);
    assert_eq!(date.len(), 10);
    assert_eq!(&date[4..5], "-");
    assert_eq!(&date[7..8], "-");
}

#[test]
fn local_iso_parses_back() {
    let iso = local_iso(1_700_000_000_000);
    let parsed = chrono::DateTime::parse_from_rfc3339(&iso).unwrap();
    assert_eq!(parsed.timestamp_millis(), 1_700_000_000_000);
}
