// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects represent UI-facing side effects the workflows request.

use serde::{Deserialize, Serialize};

/// Views the workflows can send the technician to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    PendingOrders,
    CompletedOrders,
    Login,
}

crate::simple_display! {
    View {
        PendingOrders => "pending-orders",
        CompletedOrders => "completed-orders",
        Login => "login",
    }
}

/// Side effects executed by the runtime's executor after a workflow
/// step succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Move the user to another view
    Navigate { view: View },

    /// Show a local system notification
    Notify { title: String, message: String },
}

impl Effect {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Navigate { .. } => "navigate",
            Effect::Notify { .. } => "notify",
        }
    }

    /// Key fields for the execution trace.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Navigate { view } => vec![("view", view.to_string())],
            Effect::Notify { title, .. } => vec![("title", title.clone())],
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
