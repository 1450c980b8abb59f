// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blind commands.

use crate::command::{Command, CommandPayload};
use crate::types::{BlindLevel, BlindOperation, OpenPercentage};

/// Slat angle sent with every set-level command.
pub const BLIND_SLOPE: u8 = 255;

/// Command to move or position a blind or blind group.
///
/// Positions are given as an open percentage and converted to the wire's
/// closed-amount convention when encoded.
///
/// # Examples
///
/// ```
/// use nexo_lib::command::{BlindCommand, Command};
/// use nexo_lib::types::{OpenPercentage, ResourceId};
///
/// let cmd = BlindCommand::SetPosition(OpenPercentage::new(30).unwrap());
/// assert_eq!(
///     cmd.encode(ResourceId::new(3)).unwrap(),
///     r#"{"type":"resource","id":3,"cmd":{"blind_op":64,"blind_level":70,"blind_slope":255}}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlindCommand {
    /// Stop any movement.
    Stop,
    /// Close fully.
    Close,
    /// Open fully.
    Open,
    /// Reverse direction.
    Toggle,
    /// Move to the given open percentage.
    SetPosition(OpenPercentage),
}

impl BlindCommand {
    /// Returns the operation code sent as `blind_op`.
    #[must_use]
    pub const fn operation(&self) -> BlindOperation {
        match self {
            Self::Stop => BlindOperation::Stop,
            Self::Close => BlindOperation::Close,
            Self::Open => BlindOperation::Open,
            Self::Toggle => BlindOperation::Toggle,
            Self::SetPosition(_) => BlindOperation::SetLevel,
        }
    }
}

impl Command for BlindCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Stop => "blind_stop",
            Self::Close => "blind_close",
            Self::Open => "blind_open",
            Self::Toggle => "blind_toggle",
            Self::SetPosition(_) => "blind_set_position",
        }
    }

    fn payload(&self) -> CommandPayload {
        let mut payload = CommandPayload {
            blind_op: Some(self.operation().code()),
            ..CommandPayload::default()
        };
        if let Self::SetPosition(open) = self {
            payload.blind_level = Some(BlindLevel::from(*open).value());
            payload.blind_slope = Some(BLIND_SLOPE);
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceId;

    #[test]
    fn simple_operations() {
        assert_eq!(BlindCommand::Stop.payload().blind_op, Some(0));
        assert_eq!(BlindCommand::Close.payload().blind_op, Some(1));
        assert_eq!(BlindCommand::Open.payload().blind_op, Some(2));
        assert_eq!(BlindCommand::Toggle.payload().blind_op, Some(3));
        assert_eq!(BlindCommand::Open.payload().blind_level, None);
    }

    #[test]
    fn open_encodes_without_level() {
        assert_eq!(
            BlindCommand::Open.encode(ResourceId::new(5)).unwrap(),
            r#"{"type":"resource","id":5,"cmd":{"blind_op":2}}"#
        );
    }

    #[test]
    fn set_position_inverts_percentage() {
        for p in [0u8, 1, 25, 50, 99, 100] {
            let cmd = BlindCommand::SetPosition(OpenPercentage::new(p).unwrap());
            let payload = cmd.payload();
            assert_eq!(payload.blind_op, Some(64));
            assert_eq!(payload.blind_level, Some(100 - p));
            assert_eq!(payload.blind_slope, Some(255));
        }
    }
}
