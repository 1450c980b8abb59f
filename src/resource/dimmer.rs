// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness capability.

use super::Resource;
use crate::command::DimmerCommand;
use crate::error::Result;

/// Brightness view of a dimmer, LED, group dimmer or group LED.
#[derive(Debug, Clone, Copy)]
pub struct Dimmer<'a> {
    resource: &'a Resource,
}

impl<'a> Dimmer<'a> {
    pub(super) fn new(resource: &'a Resource) -> Self {
        Self { resource }
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// Returns true if the resource reports `is_on`.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.resource.state_flag("is_on").unwrap_or(false)
    }

    /// Returns the reported brightness (0-255), 0 if unknown.
    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.resource
            .state_i64("brightness")
            .map_or(0, |b| u8::try_from(b.clamp(0, 255)).unwrap_or(u8::MAX))
    }

    /// Switches on.
    ///
    /// Without a level the dimmer returns to its last remembered brightness.
    /// With a level it behaves like [`Dimmer::set_brightness`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn turn_on(&self, level: Option<i64>) -> Result<()> {
        let command = level.map_or(DimmerCommand::RestoreLast, DimmerCommand::level);
        self.resource.send_command(&command).await
    }

    /// Switches off.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn turn_off(&self) -> Result<()> {
        self.resource.send_command(&DimmerCommand::Off).await
    }

    /// Sets the brightness. Levels at or below zero switch off, levels above
    /// 255 are clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn set_brightness(&self, level: i64) -> Result<()> {
        self.resource
            .send_command(&DimmerCommand::level(level))
            .await
    }
}
