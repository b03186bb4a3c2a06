// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Technician tracking specs
//!
//! The 30-second stream with 10-meter suppression, and the logout
//! teardown.

use super::prelude::*;
use fw_core::View;

#[tokio::test(start_paused = true)]
async fn nearby_samples_are_suppressed_distant_ones_pushed() {
    let mut spec = spec();
    spec.runtime.start_location_updates();

    // No prior sample: the first fix is pushed.
    let first = wait_for_push(&mut spec).await;
    assert_eq!(first.coordinates, depot_coordinates());

    // 5 m away: suppressed. 50 m away: pushed.
    let near = offset_north(&depot_coordinates(), 5.0);
    let far = offset_north(&depot_coordinates(), 50.0);
    spec.geo.push(Ok(near.clone()));
    spec.geo.push(Ok(far.clone()));
    spec.geo.set_fallback(Ok(far.clone()));

    let second = wait_for_push(&mut spec).await;
    assert_eq!(second.coordinates, far);
    spec.runtime.stop_location_updates();

    let pushed = spec.backend.pushed_locations();
    assert_eq!(pushed.len(), 2);
    assert!(!pushed.iter().any(|s| s.coordinates == near));
}

#[tokio::test(start_paused = true)]
async fn logout_stops_the_stream_and_clears_storage() {
    let mut spec = spec();
    spec.runtime.start_shift().await.unwrap();
    spec.runtime.start_location_updates();
    let _ = wait_for_push(&mut spec).await;

    spec.runtime.logout().await.unwrap();

    assert!(spec.store.is_empty());
    assert!(!spec.runtime.location_stream_running());
    assert_eq!(spec.nav.visited().last().unwrap(), &View::Login);

    let pushes = spec.backend.call_count("push-location");
    tokio::time::sleep(std::time::Duration::from_secs(120)).await;
    assert_eq!(spec.backend.call_count("push-location"), pushes);
}

async fn wait_for_push(spec: &mut Spec) -> fw_core::LocationSample {
    loop {
        match spec.rx.recv().await {
            Some(Event::LocationPushed { sample, .. }) => return sample,
            Some(_) => continue,
            None => panic!("event channel closed"),
        }
    }
}
