// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off command shared by lights, outputs, LEDs and dimmers.

use crate::command::{Command, CommandPayload};

/// Command to switch a resource on or off.
///
/// # Examples
///
/// ```
/// use nexo_lib::command::{Command, SwitchCommand};
///
/// assert_eq!(SwitchCommand::On.payload().operation, Some(1));
/// assert_eq!(SwitchCommand::from(false), SwitchCommand::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchCommand {
    /// Switch off (`operation=0`).
    Off,
    /// Switch on (`operation=1`).
    On,
}

impl From<bool> for SwitchCommand {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl Command for SwitchCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Off => "switch_off",
            Self::On => "switch_on",
        }
    }

    fn payload(&self) -> CommandPayload {
        CommandPayload::operation(match self {
            Self::Off => 0,
            Self::On => 1,
        })
    }
}
