// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resource table keyed by id.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::{Resource, ResourceKind};
use crate::error::ResourceError;
use crate::protocol::Outbound;
use crate::types::ResourceId;

/// The id to resource table of one bridge session.
///
/// Resources are shared as `Arc<Resource>`. Rebuilding the table drops the
/// registry's references; refreshing keeps every resource and only swaps its
/// connection handle.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: RwLock<HashMap<ResourceId, Arc<Resource>>>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a resource from a descriptor and registers it under its id.
    ///
    /// Returns `None`, leaving the table unchanged, when the descriptor is
    /// not a supported resource. Unknown types are logged at warning level,
    /// expected skips (unsupported temperature mode, sensor without state)
    /// at debug level.
    pub fn add_resource(&self, raw: &Value, outbound: &Outbound) -> Option<Arc<Resource>> {
        match Resource::from_descriptor(raw, outbound.clone()) {
            Ok(resource) => {
                let resource = Arc::new(resource);
                self.resources
                    .write()
                    .insert(resource.id(), Arc::clone(&resource));
                Some(resource)
            }
            Err(e @ (ResourceError::UnsupportedMode(_) | ResourceError::MissingState(_))) => {
                tracing::debug!(error = %e, "Skipping resource");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, descriptor = %raw, "Unsupported resource skipped");
                None
            }
        }
    }

    /// Clears the table and registers every descriptor of a snapshot's
    /// `resources` object. Returns the number of resources created.
    pub fn rebuild(&self, descriptors: &Map<String, Value>, outbound: &Outbound) -> usize {
        self.clear();
        descriptors
            .values()
            .filter_map(|raw| self.add_resource(raw, outbound))
            .count()
    }

    /// Points every registered resource at a new connection.
    pub fn refresh(&self, outbound: &Outbound) {
        for resource in self.resources.read().values() {
            resource.set_outbound(outbound.clone());
        }
    }

    /// Looks a resource up by id.
    #[must_use]
    pub fn get(&self, id: ResourceId) -> Option<Arc<Resource>> {
        self.resources.read().get(&id).cloned()
    }

    /// Looks a resource up by a raw JSON id. Non-integer ids yield `None`.
    #[must_use]
    pub fn get_by_value(&self, id: &Value) -> Option<Arc<Resource>> {
        ResourceId::from_value(id).and_then(|id| self.get(id))
    }

    /// Returns all resources of exactly `kind`, ordered by id.
    #[must_use]
    pub fn by_kind(&self, kind: ResourceKind) -> Vec<Arc<Resource>> {
        let mut matching: Vec<_> = self
            .resources
            .read()
            .values()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.id());
        matching
    }

    /// Returns all resources, ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<Resource>> {
        let mut all: Vec<_> = self.resources.read().values().cloned().collect();
        all.sort_by_key(|r| r.id());
        all
    }

    /// Removes every resource.
    pub fn clear(&self) {
        self.resources.write().clear();
    }

    /// Returns the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// Returns true if no resource is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}
