// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Alarm partition commands.

use crate::command::{Command, CommandPayload};

/// Command to arm or disarm an alarm partition.
///
/// The password is sent as a JSON string, so quotes and backslashes in it
/// are escaped rather than breaking the frame.
///
/// # Examples
///
/// ```
/// use nexo_lib::command::{Command, PartitionCommand};
/// use nexo_lib::types::ResourceId;
///
/// let cmd = PartitionCommand::arm("1234");
/// assert_eq!(
///     cmd.encode(ResourceId::new(2)).unwrap(),
///     r#"{"type":"resource","id":2,"cmd":{"operation":1,"password":"1234"}}"#
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum PartitionCommand {
    /// Arm the partition.
    Arm {
        /// Alarm code.
        password: String,
    },
    /// Disarm the partition.
    Disarm {
        /// Alarm code.
        password: String,
    },
}

impl PartitionCommand {
    /// Creates an arm command.
    #[must_use]
    pub fn arm(password: impl Into<String>) -> Self {
        Self::Arm {
            password: password.into(),
        }
    }

    /// Creates a disarm command.
    #[must_use]
    pub fn disarm(password: impl Into<String>) -> Self {
        Self::Disarm {
            password: password.into(),
        }
    }
}

// Keep alarm codes out of debug logs.
impl std::fmt::Debug for PartitionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Command for PartitionCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Arm { .. } => "partition_arm",
            Self::Disarm { .. } => "partition_disarm",
        }
    }

    fn payload(&self) -> CommandPayload {
        let (operation, password) = match self {
            Self::Arm { password } => (1, password),
            Self::Disarm { password } => (0, password),
        };
        CommandPayload {
            password: Some(password.clone()),
            ..CommandPayload::operation(operation)
        }
    }
}
