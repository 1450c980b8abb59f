// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only sensor capabilities.

use super::Resource;
use crate::types::Temperature;

/// Binary sensor `value` reported when inactive.
const BINARY_OFF: i64 = 101;
/// Binary sensor `value` reported when active.
const BINARY_ON: i64 = 102;

/// View of a binary sensor.
#[derive(Debug, Clone, Copy)]
pub struct BinarySensor<'a> {
    resource: &'a Resource,
}

impl<'a> BinarySensor<'a> {
    pub(super) fn new(resource: &'a Resource) -> Self {
        Self { resource }
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// `Some(true)` when active, `Some(false)` when inactive, `None` when the
    /// sensor reports anything else.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        match self.resource.state_i64("value") {
            Some(BINARY_OFF) => Some(false),
            Some(BINARY_ON) => Some(true),
            _ => None,
        }
    }
}

/// View of a numeric sensor.
#[derive(Debug, Clone, Copy)]
pub struct AnalogSensor<'a> {
    resource: &'a Resource,
}

impl<'a> AnalogSensor<'a> {
    pub(super) fn new(resource: &'a Resource) -> Self {
        Self { resource }
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// Returns the raw reading.
    #[must_use]
    pub fn value(&self) -> Option<i64> {
        self.resource.state_i64("value")
    }
}

/// View of a temperature sensor or thermostat reading.
#[derive(Debug, Clone, Copy)]
pub struct TemperatureSensor<'a> {
    resource: &'a Resource,
}

impl<'a> TemperatureSensor<'a> {
    pub(super) fn new(resource: &'a Resource) -> Self {
        Self { resource }
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// Returns the reading.
    #[must_use]
    pub fn temperature(&self) -> Option<Temperature> {
        self.resource
            .state_i64("value")
            .map(Temperature::from_tenths)
    }

    /// Returns the reading in degrees Celsius, one decimal.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.temperature().map(|t| t.celsius())
    }
}
