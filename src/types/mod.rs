// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Nexo resource control.
//!
//! This module provides type-safe representations of values exchanged with
//! the bridge. Each type ensures values are within their valid ranges at
//! construction time, so command encoders never emit out-of-range fields.
//!
//! # Types
//!
//! - [`ResourceId`] - Integer resource identifier assigned by the bridge
//! - [`Brightness`] - Dimmer brightness level (1-255)
//! - [`OpenPercentage`] / [`BlindLevel`] - Public and wire blind positions
//! - [`BlindOperation`] / [`BlindMotion`] - Blind command codes and movement
//! - [`Temperature`] - Temperature decoded from tenths of a degree
//! - [`PartitionState`] - Alarm partition state

mod blind;
mod brightness;
mod id;
mod partition;
mod temperature;

pub use blind::{BlindLevel, BlindMotion, BlindOperation, OpenPercentage};
pub use brightness::Brightness;
pub use id::ResourceId;
pub use partition::PartitionState;
pub use temperature::{THERMOSTAT_NO_VALUE, Temperature};
