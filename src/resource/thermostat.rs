// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat capability.

use serde_json::Value;

use super::Resource;
use crate::command::ThermostatCommand;
use crate::error::Result;
use crate::types::Temperature;

/// View of a thermostat (`temperature` resource in mode 2).
#[derive(Debug, Clone, Copy)]
pub struct Thermostat<'a> {
    resource: &'a Resource,
}

impl<'a> Thermostat<'a> {
    pub(super) fn new(resource: &'a Resource) -> Self {
        Self { resource }
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// Returns the measured temperature.
    #[must_use]
    pub fn temperature(&self) -> Option<Temperature> {
        self.resource
            .state_i64("value")
            .map(Temperature::from_tenths)
    }

    /// Returns the reported value in degrees Celsius.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.temperature().map(|t| t.celsius())
    }

    /// Lowest settable target, as configured on the bridge.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.resource.attribute("min").and_then(Value::as_f64)
    }

    /// Highest settable target, as configured on the bridge.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.resource.attribute("max").and_then(Value::as_f64)
    }

    /// True when the thermostat is switched on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.resource.state_flag("is_on").unwrap_or(false)
    }

    /// True while the thermostat is actively driving its output.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.resource.state_flag("is_active").unwrap_or(false)
    }

    /// Switches on without changing the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn turn_on(&self) -> Result<()> {
        self.resource.send_command(&ThermostatCommand::On).await
    }

    /// Switches off without changing the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn turn_off(&self) -> Result<()> {
        self.resource.send_command(&ThermostatCommand::Off).await
    }

    /// Switches to the opposite of the last reported power state.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn toggle(&self) -> Result<()> {
        let command = if self.is_on() {
            ThermostatCommand::Off
        } else {
            ThermostatCommand::On
        };
        self.resource.send_command(&command).await
    }

    /// Sets the target temperature in degrees Celsius, keeping the current
    /// power state.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` for a non-finite or out-of-range target, or an
    /// error if the command could not be sent.
    pub async fn set_value(&self, celsius: f64) -> Result<()> {
        let target = match Temperature::from_celsius(celsius) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(
                    resource_id = %self.resource.id(),
                    celsius,
                    error = %e,
                    "Rejected thermostat target"
                );
                return Err(e.into());
            }
        };
        let command = ThermostatCommand::SetTarget {
            on: self.is_on(),
            target,
        };
        self.resource.send_command(&command).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{record_frames, resource};
    use crate::error::{Error, ValueError};
    use serde_json::json;

    fn thermostat(is_on: u8) -> crate::resource::Resource {
        resource(&json!({
            "id": 14, "type": "temperature", "mode": 2, "name": "Bedroom",
            "min": 5, "max": 30,
            "state": {"value": 205, "is_on": is_on, "is_active": 1}
        }))
    }

    #[test]
    fn readings() {
        let r = thermostat(1);
        let view = r.as_thermostat().unwrap();
        assert_eq!(view.temperature().unwrap().tenths(), 205);
        assert_eq!(view.min(), Some(5.0));
        assert_eq!(view.max(), Some(30.0));
        assert!(view.is_on());
        assert!(view.is_active());
    }

    #[tokio::test]
    async fn power_commands_use_sentinel() {
        let r = thermostat(1);
        let frames = record_frames(&r);
        let view = r.as_thermostat().unwrap();

        view.turn_on().await.unwrap();
        view.turn_off().await.unwrap();
        view.toggle().await.unwrap();

        let frames = frames.lock();
        assert_eq!(frames[0]["cmd"], json!({"operation": 1, "value": 32767}));
        assert_eq!(frames[1]["cmd"], json!({"operation": 0, "value": 32767}));
        assert_eq!(frames[2]["cmd"], json!({"operation": 0, "value": 32767}));
    }

    #[tokio::test]
    async fn set_value_keeps_power_state() {
        let r = thermostat(0);
        let frames = record_frames(&r);

        r.as_thermostat().unwrap().set_value(22.5).await.unwrap();
        assert_eq!(frames.lock()[0]["cmd"], json!({"operation": 0, "value": 225}));
    }

    #[tokio::test]
    async fn set_value_rejects_nan() {
        let r = thermostat(1);
        let err = r.as_thermostat().unwrap().set_value(f64::NAN).await.unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::NotFinite(_))));
    }
}
