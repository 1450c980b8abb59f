// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Nexo` Lib - A Rust library to talk to Nexo home-automation bridges.
//!
//! A Nexo bridge exposes the devices it controls as a graph of JSON
//! resources over a WebSocket on port 8766. This library keeps a typed copy
//! of that graph in sync with the bridge and encodes control commands back
//! to it.
//!
//! # Supported Resources
//!
//! - **Switches**: lights, outputs and output groups
//! - **Dimmers**: dimmers, LEDs and their groups (brightness 1-255)
//! - **Blinds**: blinds and blind groups, positioned by open percentage
//! - **Climate**: temperature sensors and thermostats
//! - **Security**: alarm partitions and gates
//! - **Sensors**: binary and analog sensors
//! - **Weather**: the bridge's weather station
//!
//! # Quick Start
//!
//! ```no_run
//! use nexo_lib::{Bridge, BridgeConfig, ResourceKind};
//!
//! #[tokio::main]
//! async fn main() -> nexo_lib::Result<()> {
//!     let bridge = Bridge::new(BridgeConfig::new("192.168.1.20"))?;
//!     bridge.start()?;
//!     bridge.wait_for_initial_resources_load(None).await;
//!
//!     for blind in bridge.get_resources_by_type(ResourceKind::Blind) {
//!         if let Some(blind) = blind.as_blind() {
//!             blind.set_position(nexo_lib::OpenPercentage::clamped(50)).await?;
//!         }
//!     }
//!
//!     bridge.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Reacting to Updates
//!
//! ```no_run
//! use nexo_lib::{Bridge, BridgeConfig, ResourceId};
//!
//! # async fn example() -> nexo_lib::Result<()> {
//! let bridge = Bridge::new(BridgeConfig::new("192.168.1.20"))?;
//! bridge.start()?;
//! bridge.wait_for_initial_resources_load(None).await;
//!
//! if let Some(light) = bridge.get_resource_by_id(ResourceId::new(12)) {
//!     let watched = std::sync::Arc::clone(&light);
//!     light.on_change(move || {
//!         let on = watched.as_switch().is_some_and(|s| s.is_on());
//!         println!("{} is now {}", watched.name(), if on { "on" } else { "off" });
//!     });
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Bridge Events
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
//!     if let BridgeEvent::ConnectionChanged { state } = event {
//!         println!("connection: {state:?}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod command;
pub mod error;
pub mod event;
pub mod protocol;
pub mod resource;
pub mod subscription;
pub mod types;
pub mod weather;

pub use bridge::{Bridge, BridgeConfig, ReconnectionPolicy};
pub use command::{
    BlindCommand, Command, DimmerCommand, ExtCommand, GateCommand, PartitionCommand,
    SwitchCommand, ThermostatCommand,
};
pub use error::{Error, ParseError, ProtocolError, ResourceError, Result, ValueError};
pub use event::{BridgeEvent, EventBus};
pub use protocol::{ConnectionState, Outbound};
pub use resource::{Resource, ResourceKind};
pub use subscription::{Callback, SubscriptionId};
pub use types::{
    BlindLevel, BlindMotion, Brightness, OpenPercentage, PartitionState, ResourceId, Temperature,
};
pub use weather::{Weather, WeatherCondition};
