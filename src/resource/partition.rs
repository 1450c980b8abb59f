// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Alarm partition capability.

use super::Resource;
use crate::command::PartitionCommand;
use crate::error::Result;
use crate::types::PartitionState;

/// View of an alarm partition.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    resource: &'a Resource,
}

impl<'a> Partition<'a> {
    pub(super) fn new(resource: &'a Resource) -> Self {
        Self { resource }
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    fn flag(&self, key: &str) -> bool {
        self.resource.state_flag(key).unwrap_or(false)
    }

    /// Returns the partition state, most severe flag first.
    #[must_use]
    pub fn state(&self) -> PartitionState {
        PartitionState::from_flags(
            self.flag("is_damaged"),
            self.flag("is_suspended"),
            self.flag("is_alarming"),
            self.flag("is_armed"),
        )
    }

    /// True when the `is_armed` flag is set.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.flag("is_armed")
    }

    /// True when the `is_alarming` flag is set.
    #[must_use]
    pub fn is_alarming(&self) -> bool {
        self.flag("is_alarming")
    }

    /// Returns the partition mode attribute.
    #[must_use]
    pub fn mode(&self) -> Option<i64> {
        self.resource.attribute("mode").and_then(serde_json::Value::as_i64)
    }

    /// Arms the partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn arm(&self, password: &str) -> Result<()> {
        self.resource
            .send_command(&PartitionCommand::arm(password))
            .await
    }

    /// Disarms the partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be sent.
    pub async fn disarm(&self, password: &str) -> Result<()> {
        self.resource
            .send_command(&PartitionCommand::disarm(password))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{record_frames, resource};
    use super::*;
    use serde_json::json;

    #[test]
    fn state_priority() {
        let r = resource(&json!({"id": 1, "type": "partition", "name": "House", "mode": 0,
            "state": {"is_armed": 1, "is_alarming": 1, "is_suspended": 0, "is_damaged": 0}}));
        let view = r.as_partition().unwrap();
        assert_eq!(view.state(), PartitionState::Alarming);
        assert!(view.is_armed());
        assert_eq!(view.mode(), Some(0));

        let idle = resource(&json!({"id": 2, "type": "partition", "name": "Garage", "state": {}}));
        assert_eq!(idle.as_partition().unwrap().state(), PartitionState::Disarmed);
    }

    #[tokio::test]
    async fn arm_and_disarm() {
        let r = resource(&json!({"id": 30, "type": "partition", "name": "House", "state": {}}));
        let frames = record_frames(&r);
        let view = r.as_partition().unwrap();

        view.arm("1234").await.unwrap();
        view.disarm("1234").await.unwrap();

        let frames = frames.lock();
        assert_eq!(frames[0]["cmd"], json!({"operation": 1, "password": "1234"}));
        assert_eq!(frames[1]["cmd"], json!({"operation": 0, "password": "1234"}));
    }
}
