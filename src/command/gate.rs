// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gate command.

use crate::command::{Command, CommandPayload};

/// Command to operate a gate. Gates only accept a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCommand {
    /// Toggle the gate (`operation=2`).
    Toggle,
}

impl Command for GateCommand {
    fn name(&self) -> &'static str {
        "gate_toggle"
    }

    fn payload(&self) -> CommandPayload {
        CommandPayload::operation(2)
    }
}
