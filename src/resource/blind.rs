// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blind capability.
//!
//! The state carries `blind_level` (closed amount, 0 = open) and `blind_op`
//! (current movement). Positions are exposed as open percentages.

use super::Resource;
use crate::command::BlindCommand;
use crate::error::Result;
use crate::types::{BlindLevel, BlindMotion, OpenPercentage};

/// View of a blind or blind group.
#[derive(Debug, Clone, Copy)]
pub struct Blind<'a> {
    resource: &'a Resource,
}

impl<'a> Blind<'a> {
    pub(super) fn new(resource: &'a Resource) -> Self {
        Self { resource }
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// Returns the reported wire level, if any.
    #[must_use]
    pub fn level(&self) -> Option<BlindLevel> {
        self.resource
            .state_i64("blind_level")
            .map(BlindLevel::clamped)
    }

    /// Returns how far the blind is open.
    #[must_use]
    pub fn open_percentage(&self) -> Option<OpenPercentage> {
        self.level().map(OpenPercentage::from)
    }

    /// True when fully open.
    #[must_use]
    pub fn is_opened(&self) -> bool {
        self.level().is_some_and(|l| l.is_open())
    }

    /// True when fully closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.level().is_some_and(|l| l.is_closed())
    }

    /// Returns the reported movement.
    #[must_use]
    pub fn motion(&self) -> BlindMotion {
        self.resource
            .state_i64("blind_op")
            .map_or(BlindMotion::Unknown, BlindMotion::from_op)
    }

    /// True while moving towards closed.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.motion() == BlindMotion::Closing
    }

    /// True while moving towards open.
    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.motion() == BlindMotion::Opening
    }

    /// Whether the blind is moving, `None` when the reported operation is
    /// not a movement.
    #[must_use]
    pub fn is_moving(&self) -> Option<bool> {
        self.motion().is_moving()
    }

    /// Opens fully.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn open(&self) -> Result<()> {
        self.resource.send_command(&BlindCommand::Open).await
    }

    /// Closes fully.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn close(&self) -> Result<()> {
        self.resource.send_command(&BlindCommand::Close).await
    }

    /// Stops any movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn stop(&self) -> Result<()> {
        self.resource.send_command(&BlindCommand::Stop).await
    }

    /// Reverses direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn toggle(&self) -> Result<()> {
        self.resource.send_command(&BlindCommand::Toggle).await
    }

    /// Moves to the given open percentage.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn set_position(&self, open: OpenPercentage) -> Result<()> {
        self.resource
            .send_command(&BlindCommand::SetPosition(open))
            .await
    }
}
