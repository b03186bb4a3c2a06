// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_notifier_records_calls() {
    let notifier = FakeNotifier::new();
    notifier.notify("Break", "released").await.unwrap();

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "Break");
    assert_eq!(calls[0].message, "released");
}

#[tokio::test]
async fn fake_notifier_clones_share_state() {
    let notifier = FakeNotifier::new();
    let clone = notifier.clone();
    clone.notify("a", "b").await.unwrap();
    assert_eq!(notifier.calls().len(), 1);
}
