// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for resource subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackSet`] - Set of callbacks with identity-based deduplication

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Unique identifier for a subscription.
///
/// This ID is returned when registering a callback and can be used to
/// unsubscribe later. IDs are unique within a callback set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// A zero-argument change callback.
///
/// Identity is the allocation behind the `Arc`: clones of the same `Arc`
/// are the same callback, separately allocated closures are not.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// A set of change callbacks.
///
/// Registration is idempotent: adding a callback that is already present
/// returns its existing id and does not cause a second invocation. Removing
/// a callback that is not present does nothing.
///
/// Callbacks run outside the internal lock, so a callback may register or
/// remove callbacks on the same set without deadlocking. A panicking callback
/// is logged and does not stop the remaining callbacks.
pub struct CallbackSet {
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(SubscriptionId, Callback)>>,
}

impl CallbackSet {
    /// Creates an empty callback set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback unless it is already registered.
    ///
    /// Returns the id of the registration, which is the existing id when the
    /// callback was already present.
    pub fn register(&self, callback: &Callback) -> SubscriptionId {
        let mut callbacks = self.callbacks.write();
        if let Some((id, _)) = callbacks.iter().find(|(_, cb)| Arc::ptr_eq(cb, callback)) {
            return *id;
        }
        let id = self.next_id();
        callbacks.push((id, Arc::clone(callback)));
        id
    }

    /// Registers a closure. Every call creates a new registration.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.callbacks.write().push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback by identity. Returns true if it was registered.
    pub fn remove(&self, callback: &Callback) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(_, cb)| !Arc::ptr_eq(cb, callback));
        callbacks.len() != before
    }

    /// Removes a callback by subscription id. Returns true if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(sub, _)| *sub != id);
        callbacks.len() != before
    }

    /// Removes all callbacks.
    pub fn clear(&self) {
        self.callbacks.write().clear();
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns true if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }

    /// Invokes every registered callback once.
    ///
    /// Returns the number of callbacks that completed without panicking.
    pub fn notify(&self) -> usize {
        let snapshot: Vec<(SubscriptionId, Callback)> = self.callbacks.read().clone();
        let mut completed = 0;
        for (id, callback) in snapshot {
            if catch_unwind(AssertUnwindSafe(&*callback)).is_ok() {
                completed += 1;
            } else {
                tracing::warn!(subscription = %id, "Callback panicked during notification");
            }
        }
        completed
    }
}

impl Default for CallbackSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSet")
            .field("callbacks", &self.len())
            .finish_non_exhaustive()
    }
}
