// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor.

use fw_adapters::{NavAdapter, NotifyAdapter};
use fw_core::Effect;

/// Executes UI-facing effects using the configured adapters
#[derive(Clone)]
pub struct Executor<N, V> {
    notifier: N,
    nav: V,
}

impl<N, V> Executor<N, V>
where
    N: NotifyAdapter,
    V: NavAdapter,
{
    pub fn new(notifier: N, nav: V) -> Self {
        Self { notifier, nav }
    }

    /// Execute a single effect with tracing.
    pub async fn execute(&self, effect: Effect) {
        let info = {
            let fields = effect.fields();
            let mut fmt = String::new();
            for (key, val) in fields {
                fmt.push_str(key);
                fmt.push('=');
                fmt.push_str(&val);
                fmt.push(' ');
            }
            fmt.pop();
            fmt
        };
        let op = effect.name();

        match effect {
            Effect::Navigate { view } => {
                self.nav.goto(view).await;
            }
            Effect::Notify { title, message } => {
                if let Err(e) = self.notifier.notify(&title, &message).await {
                    tracing::warn!(%title, error = %e, "notification send failed");
                }
            }
        }
        tracing::info!("executed effect={op} {info}");
    }

    /// Execute multiple effects in order.
    pub async fn execute_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute(effect).await;
        }
    }

    pub(crate) fn notifier(&self) -> &N {
        &self.notifier
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
