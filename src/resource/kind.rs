// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resource kinds and their capabilities.

use std::fmt;

use crate::error::ResourceError;

/// The kind of a resource, resolved from its `type` discriminator.
///
/// Kinds are exact: a [`ResourceKind::Led`] is never reported as a
/// [`ResourceKind::Dimmer`], even though both accept the same commands.
/// Shared behavior is expressed through the capability predicates instead.
///
/// # Examples
///
/// ```
/// use nexo_lib::resource::ResourceKind;
///
/// assert_eq!(ResourceKind::resolve("led", None).unwrap(), ResourceKind::Led);
/// assert_eq!(
///     ResourceKind::resolve("temperature", Some(2)).unwrap(),
///     ResourceKind::Thermostat
/// );
/// assert!(ResourceKind::resolve("temperature", Some(3)).is_err());
/// assert!(ResourceKind::Led.is_dimmable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    /// On/off light (`light`).
    Light,
    /// Dimmable light (`dimmer`).
    Dimmer,
    /// LED strip, dimmable (`led`).
    Led,
    /// Switched output (`output`).
    Output,
    /// Group of outputs (`group_output`).
    GroupOutput,
    /// Binary sensor (`sensor`).
    BinarySensor,
    /// Numeric sensor (`analogsensor`).
    AnalogSensor,
    /// Temperature sensor (`temperature`, mode 1).
    Temperature,
    /// Thermostat (`temperature`, mode 2).
    Thermostat,
    /// Blind (`blind`).
    Blind,
    /// Group of blinds (`group_blind`).
    GroupBlind,
    /// Group of dimmers (`group_dimmer`).
    GroupDimmer,
    /// Group of LEDs (`group_led`).
    GroupLed,
    /// Gate (`gate`).
    Gate,
    /// Alarm partition (`partition`).
    Partition,
}

impl ResourceKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Light,
        Self::Dimmer,
        Self::Led,
        Self::Output,
        Self::GroupOutput,
        Self::BinarySensor,
        Self::AnalogSensor,
        Self::Temperature,
        Self::Thermostat,
        Self::Blind,
        Self::GroupBlind,
        Self::GroupDimmer,
        Self::GroupLed,
        Self::Gate,
        Self::Partition,
    ];

    /// Resolves a kind from the `type` discriminator and, for
    /// `temperature`, the `mode` field (1 = sensor, 2 = thermostat).
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::UnknownType` for an unrecognized discriminator
    /// and `ResourceError::UnsupportedMode` for a `temperature` with any other
    /// mode. A missing mode is reported as mode 0.
    pub fn resolve(kind: &str, mode: Option<i64>) -> Result<Self, ResourceError> {
        Ok(match kind {
            "light" => Self::Light,
            "dimmer" => Self::Dimmer,
            "led" => Self::Led,
            "output" => Self::Output,
            "group_output" => Self::GroupOutput,
            "sensor" => Self::BinarySensor,
            "analogsensor" => Self::AnalogSensor,
            "temperature" => match mode {
                Some(1) => Self::Temperature,
                Some(2) => Self::Thermostat,
                other => return Err(ResourceError::UnsupportedMode(other.unwrap_or_default())),
            },
            "blind" => Self::Blind,
            "group_blind" => Self::GroupBlind,
            "group_dimmer" => Self::GroupDimmer,
            "group_led" => Self::GroupLed,
            "gate" => Self::Gate,
            "partition" => Self::Partition,
            other => return Err(ResourceError::UnknownType(other.to_string())),
        })
    }

    /// Returns the wire discriminator.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dimmer => "dimmer",
            Self::Led => "led",
            Self::Output => "output",
            Self::GroupOutput => "group_output",
            Self::BinarySensor => "sensor",
            Self::AnalogSensor => "analogsensor",
            Self::Temperature | Self::Thermostat => "temperature",
            Self::Blind => "blind",
            Self::GroupBlind => "group_blind",
            Self::GroupDimmer => "group_dimmer",
            Self::GroupLed => "group_led",
            Self::Gate => "gate",
            Self::Partition => "partition",
        }
    }

    /// Accepts the on/off `operation` command.
    #[must_use]
    pub const fn is_switchable(self) -> bool {
        matches!(
            self,
            Self::Light
                | Self::Dimmer
                | Self::Led
                | Self::Output
                | Self::GroupOutput
                | Self::GroupDimmer
                | Self::GroupLed
        )
    }

    /// Accepts brightness commands.
    #[must_use]
    pub const fn is_dimmable(self) -> bool {
        matches!(
            self,
            Self::Dimmer | Self::Led | Self::GroupDimmer | Self::GroupLed
        )
    }

    /// Accepts blind commands.
    #[must_use]
    pub const fn is_blind(self) -> bool {
        matches!(self, Self::Blind | Self::GroupBlind)
    }

    /// Addresses a group of devices.
    #[must_use]
    pub const fn is_group(self) -> bool {
        matches!(
            self,
            Self::GroupOutput | Self::GroupBlind | Self::GroupDimmer | Self::GroupLed
        )
    }

    /// Reports readings only and accepts no commands.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::BinarySensor | Self::AnalogSensor | Self::Temperature
        )
    }

    /// Reports a numeric `value`.
    #[must_use]
    pub const fn is_analog(self) -> bool {
        matches!(
            self,
            Self::AnalogSensor | Self::Temperature | Self::Thermostat
        )
    }

    /// Reports a temperature in tenths of a degree.
    #[must_use]
    pub const fn is_temperature(self) -> bool {
        matches!(self, Self::Temperature | Self::Thermostat)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thermostat => f.write_str("thermostat"),
            other => f.write_str(other.wire_name()),
        }
    }
}
