// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID newtypes for server-assigned and locally generated identifiers.
//!
//! Most ids in this system are assigned by the backend (shift records,
//! break records, executions, trajectories) and arrive as opaque strings;
//! `new()` wraps them without interpretation. `generate()` produces a
//! local id with a type prefix for records created before the server has
//! assigned one (client correlation).

/// Returns a string slice truncated to at most `n` characters.
pub fn short(s: &str, n: usize) -> &str {
    if s.len() <= n {
        s
    } else {
        &s[..n]
    }
}

/// Define a newtype ID wrapper around `SmolStr` with a type prefix.
///
/// Generates `new()` for wrapping an existing id string, `generate()` for
/// prefixed random local ids, `as_str()`, `short()`, `Display`,
/// `From<String>`, `From<&str>`, `PartialEq<str>`, `Borrow<str>`, and
/// `Deref` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($prefix:literal);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub smol_str::SmolStr);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Wrap an existing id string (server-assigned or parsed).
            pub fn new(id: impl Into<smol_str::SmolStr>) -> Self {
                Self(id.into())
            }

            /// Generate a new random local id with the type prefix.
            pub fn generate() -> Self {
                Self(smol_str::SmolStr::new(&format!(
                    "{}{}",
                    Self::PREFIX,
                    nanoid::nanoid!(19)
                )))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns a string slice truncated to at most `n` characters.
            pub fn short(&self, n: usize) -> &str {
                $crate::id::short(&self.0, n)
            }

            /// Returns true if the ID is an empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                Self::new(s.clone())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

crate::define_id! {
    /// Identifier of an authenticated field technician.
    pub struct UserId("usr-");
}

crate::define_id! {
    /// Server-assigned id of a daily shift record (one per user per day).
    pub struct ShiftRecordId("sft-");
}

crate::define_id! {
    /// Server-assigned id of a break record within a shift.
    pub struct BreakRecordId("brk-");
}

crate::define_id! {
    /// Identifier of a dispatched service order.
    pub struct OrderId("ord-");
}

crate::define_id! {
    /// Server-assigned id of one execution attempt of a service order.
    pub struct ExecutionId("exe-");
}

crate::define_id! {
    /// Server-assigned id of a travel leg from dispatch to the client site.
    pub struct TrajectoryId("trj-");
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
