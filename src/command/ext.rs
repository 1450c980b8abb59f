// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Custom named commands.

use serde::Serialize;

use crate::error::{ParseError, Result};

/// A vendor-defined named action, sent outside the resource envelope.
///
/// # Examples
///
/// ```
/// use nexo_lib::command::ExtCommand;
///
/// let cmd = ExtCommand::new("all_off");
/// assert_eq!(cmd.encode().unwrap(), r#"{"type":"ext_command","cmd":"all_off"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtCommand {
    name: String,
}

#[derive(Serialize)]
struct ExtEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    cmd: &'a str,
}

impl ExtCommand {
    /// Creates a custom command.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serializes the command envelope.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    pub fn encode(&self) -> Result<String> {
        let envelope = ExtEnvelope {
            kind: "ext_command",
            cmd: &self.name,
        };
        Ok(serde_json::to_string(&envelope).map_err(ParseError::from)?)
    }
}
