// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service-order specs
//!
//! Execution lifecycle with the reconciliation rule: the server is
//! consulted before every mutating transition, and the persisted
//! reopen guard makes the reopen button single-shot.

use super::prelude::*;
use fw_core::{CancelReason, ExecutionStatus, OrderExecution, ServiceOrder};

fn dispatched() -> ServiceOrder {
    ServiceOrder::builder().trajectory_id("T1").build()
}

#[tokio::test]
async fn a_visit_from_dispatch_to_completion() {
    let spec = spec();
    let order = dispatched();

    spec.runtime.start_order(&order).await.unwrap();
    assert_eq!(
        spec.backend.calls()[..2],
        ["finish-trajectory T1", "begin-execution O1"]
    );
    assert!(spec.runtime.cached_execution("O1").unwrap().is_live());

    spec.runtime.finish_order(&order).await.unwrap();
    assert_eq!(
        spec.runtime.cached_execution("O1").unwrap().status,
        ExecutionStatus::Completed
    );
}

#[tokio::test]
async fn stale_started_cache_cannot_cancel_a_settled_order() {
    let spec = spec();
    let order = dispatched();
    spec.runtime.start_order(&order).await.unwrap();

    // Meanwhile the server settled the order.
    spec.backend.put_latest_execution(
        OrderExecution::builder()
            .status(ExecutionStatus::Completed)
            .build(),
    );
    assert!(spec.runtime.cached_execution("O1").unwrap().is_live());

    let err = spec
        .runtime
        .cancel_order(&order, CancelReason::CustomerAbsent)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::IllegalTransition { status: ExecutionStatus::Completed }
    ));
    assert_eq!(spec.backend.call_count("cancel-execution"), 0);

    // And the same protection holds for a cancelled order.
    spec.backend.put_latest_execution(
        OrderExecution::builder()
            .status(ExecutionStatus::Cancelled)
            .build(),
    );
    let err = spec
        .runtime
        .cancel_order(&order, CancelReason::CustomerAbsent)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::IllegalTransition { .. }));
}

#[tokio::test]
async fn cancelling_other_requires_a_description() {
    let spec = spec();
    let order = dispatched();
    spec.runtime.start_order(&order).await.unwrap();

    let err = spec
        .runtime
        .cancel_order(&order, CancelReason::Other(String::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidRequest(_)));

    spec.runtime
        .cancel_order(&order, CancelReason::Other("street flooded".into()))
        .await
        .unwrap();
    assert_eq!(
        spec.runtime.cached_execution("O1").unwrap().status,
        ExecutionStatus::Cancelled
    );
}

#[tokio::test]
async fn double_clicking_reopen_issues_one_server_call() {
    let spec = spec();
    let order = dispatched();
    spec.backend.put_latest_execution(
        OrderExecution::builder()
            .status(ExecutionStatus::Cancelled)
            .build(),
    );

    spec.runtime.reopen_order(&order).await.unwrap();
    spec.runtime.reopen_order(&order).await.unwrap();
    assert_eq!(spec.backend.call_count("reopen-execution"), 1);

    // The guard is persisted: a reload does not re-arm the button.
    let reloaded = spec.reload();
    reloaded.runtime.reopen_order(&order).await.unwrap();
    assert_eq!(reloaded.backend.call_count("reopen-execution"), 1);
}

#[tokio::test]
async fn finishing_survives_a_reload_via_persistence() {
    let spec = spec();
    let order = dispatched();
    spec.runtime.start_order(&order).await.unwrap();

    let reloaded = spec.reload();
    assert!(reloaded.runtime.cached_execution("O1").is_none());
    reloaded.runtime.finish_order(&order).await.unwrap();
    assert_eq!(reloaded.backend.call_count("finish-execution"), 1);
}
