// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimmer commands.

use crate::command::{Command, CommandPayload};
use crate::types::Brightness;

/// Operation code that turns a dimmer on at its last remembered level.
const RESTORE_LAST_OPERATION: u8 = 4;

/// Command to control a dimmable resource.
///
/// Used by dimmers, LEDs, group dimmers and group LEDs.
///
/// # Examples
///
/// ```
/// use nexo_lib::command::{Command, DimmerCommand};
/// use nexo_lib::types::Brightness;
///
/// let cmd = DimmerCommand::level(128);
/// assert_eq!(cmd, DimmerCommand::On(Brightness::new(128).unwrap()));
///
/// // Negative levels take the off path
/// assert_eq!(DimmerCommand::level(-5), DimmerCommand::Off);
///
/// let restore = DimmerCommand::RestoreLast;
/// assert_eq!(restore.payload().operation, Some(4));
/// assert_eq!(restore.payload().brightness, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerCommand {
    /// Switch off.
    Off,
    /// Switch on at an explicit brightness.
    On(Brightness),
    /// Switch on at the last remembered brightness.
    RestoreLast,
}

impl DimmerCommand {
    /// Creates a command for an arbitrary requested level.
    ///
    /// Levels at or below zero become [`DimmerCommand::Off`]; levels above
    /// 255 are clamped.
    #[must_use]
    pub fn level(level: i64) -> Self {
        Brightness::from_level(level).map_or(Self::Off, Self::On)
    }
}

impl Command for DimmerCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Off => "dimmer_off",
            Self::On(_) => "dimmer_set",
            Self::RestoreLast => "dimmer_restore",
        }
    }

    fn payload(&self) -> CommandPayload {
        match self {
            Self::Off => CommandPayload::operation(0),
            Self::On(brightness) => CommandPayload {
                brightness: Some(brightness.value()),
                ..CommandPayload::operation(1)
            },
            Self::RestoreLast => CommandPayload::operation(RESTORE_LAST_OPERATION),
        }
    }
}
