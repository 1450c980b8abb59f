// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gate capability.

use super::Resource;
use crate::command::GateCommand;
use crate::error::Result;

/// View of a gate. Gates report open (1) or closed (2) in `value` and only
/// accept a toggle.
#[derive(Debug, Clone, Copy)]
pub struct Gate<'a> {
    resource: &'a Resource,
}

impl<'a> Gate<'a> {
    pub(super) fn new(resource: &'a Resource) -> Self {
        Self { resource }
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// `Some(true)` when open, `Some(false)` when closed, `None` otherwise.
    #[must_use]
    pub fn is_open(&self) -> Option<bool> {
        match self.resource.state_i64("value") {
            Some(1) => Some(true),
            Some(2) => Some(false),
            _ => None,
        }
    }

    /// Toggles the gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn toggle(&self) -> Result<()> {
        self.resource.send_command(&GateCommand::Toggle).await
    }
}
