// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for bridge-level changes.
//!
//! Per-resource callbacks cover state changes of individual resources. This
//! module adds a broadcast stream of coarser events (connection changes,
//! snapshot loads, weather updates) for consumers that prefer a channel.
//!
//! Events are also available from [`Bridge::subscribe`](crate::Bridge::subscribe):
//!
//! ```no_run
//! use nexo_lib::{Bridge, BridgeConfig};
//! use nexo_lib::event::BridgeEvent;
//!
//! # async fn example() -> nexo_lib::Result<()> {
//! let bridge = Bridge::new(BridgeConfig::new("192.168.1.20"))?;
//! let mut events = bridge.subscribe();
//! bridge.start()?;
//!
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         BridgeEvent::ResourcesLoaded { count } => println!("{count} resources"),
//!         BridgeEvent::ResourceUpdated { id } => println!("resource {id} changed"),
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod bridge_event;
mod event_bus;

pub use bridge_event::BridgeEvent;
pub use event_bus::EventBus;
