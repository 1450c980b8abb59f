// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for resource state changes.
//!
//! Each resource owns a [`CallbackSet`] of zero-argument callbacks. When the
//! bridge applies an update to a resource, its callbacks are invoked from the
//! bridge's notification task, never from the socket reader.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use nexo_lib::{Bridge, BridgeConfig};
//! use nexo_lib::types::ResourceId;
//!
//! # async fn example() -> nexo_lib::Result<()> {
//! let bridge = Bridge::new(BridgeConfig::new("192.168.1.20"))?;
//! bridge.start()?;
//! bridge.wait_for_initial_resources_load(None).await;
//!
//! if let Some(light) = bridge.get_resource_by_id(ResourceId::new(1)) {
//!     let callback: nexo_lib::subscription::Callback = Arc::new(|| println!("changed"));
//!     light.register_callback(&callback);
//!
//!     // Registering the same callback again is a no-op
//!     light.register_callback(&callback);
//!
//!     light.remove_callback(&callback);
//! }
//! # Ok(())
//! # }
//! ```

mod callback;

pub use callback::{Callback, CallbackSet, SubscriptionId};
