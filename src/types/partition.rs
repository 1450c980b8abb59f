// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Alarm partition state.

use std::fmt;

/// State of an alarm partition, derived from its flags.
///
/// When several flags are set the most severe one wins, in the order
/// damaged, suspended, alarming, armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionState {
    /// Not armed.
    Disarmed,
    /// Armed.
    Armed,
    /// Alarm triggered.
    Alarming,
    /// Arming or disarming is pending.
    Suspended,
    /// Tamper or fault detected.
    Damaged,
}

impl PartitionState {
    /// Resolves the state from the individual partition flags.
    #[must_use]
    pub const fn from_flags(damaged: bool, suspended: bool, alarming: bool, armed: bool) -> Self {
        if damaged {
            Self::Damaged
        } else if suspended {
            Self::Suspended
        } else if alarming {
            Self::Alarming
        } else if armed {
            Self::Armed
        } else {
            Self::Disarmed
        }
    }

    /// Returns a lowercase label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disarmed => "disarmed",
            Self::Armed => "armed",
            Self::Alarming => "alarming",
            Self::Suspended => "suspended",
            Self::Damaged => "damaged",
        }
    }
}

impl fmt::Display for PartitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
