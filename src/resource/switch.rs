// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off capability.

use super::Resource;
use crate::command::SwitchCommand;
use crate::error::Result;

/// On/off view of a light, output, LED, dimmer, or one of their groups.
#[derive(Debug, Clone, Copy)]
pub struct Switch<'a> {
    resource: &'a Resource,
}

impl<'a> Switch<'a> {
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

    /// Switches on.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn turn_on(&self) -> Result<()> {
        self.resource.send_command(&SwitchCommand::On).await
    }

    /// Switches off.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn turn_off(&self) -> Result<()> {
        self.resource.send_command(&SwitchCommand::Off).await
    }

    /// Switches to the opposite of the last reported state.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn toggle(&self) -> Result<()> {
        let command = SwitchCommand::from(!self.is_on());
        self.resource.send_command(&command).await
    }
}
