// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blind position and operation types.
//!
//! The bridge reports and accepts the *closed amount* of a blind
//! (`blind_level`, 0 = fully open, 100 = fully closed). The public API works
//! with the *open percentage* instead. The two are converted with
//! `open = 100 - level` in both directions.

use std::fmt;

use crate::error::ValueError;

fn check_percent(value: u8) -> Result<u8, ValueError> {
    if value > 100 {
        return Err(ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: i64::from(value),
        });
    }
    Ok(value)
}

fn clamp_percent(value: i64) -> u8 {
    // Clamped to 0..=100, always fits.
    u8::try_from(value.clamp(0, 100)).unwrap_or(100)
}

/// How far a blind is open, as a percentage (0 = closed, 100 = open).
///
/// # Examples
///
/// ```
/// use nexo_lib::types::{BlindLevel, OpenPercentage};
///
/// let open = OpenPercentage::new(30).unwrap();
/// let level = BlindLevel::from(open);
/// assert_eq!(level.value(), 70);
/// assert_eq!(OpenPercentage::from(level), open);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpenPercentage(u8);

impl OpenPercentage {
    /// Fully closed.
    pub const CLOSED: Self = Self(0);

    /// Fully open.
    pub const OPEN: Self = Self(100);

    /// Creates an open percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        check_percent(value).map(Self)
    }

    /// Creates an open percentage, clamping to 0-100.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(clamp_percent(value))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for OpenPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Wire representation of a blind position (0 = open, 100 = closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlindLevel(u8);

impl BlindLevel {
    /// Creates a blind level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        check_percent(value).map(Self)
    }

    /// Creates a blind level, clamping to 0-100.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(clamp_percent(value))
    }

    /// Returns the level value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns true if the blind is fully open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the blind is fully closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.0 == 100
    }
}

impl From<OpenPercentage> for BlindLevel {
    fn from(open: OpenPercentage) -> Self {
        Self(100 - open.0)
    }
}

impl From<BlindLevel> for OpenPercentage {
    fn from(level: BlindLevel) -> Self {
        Self(100 - level.0)
    }
}

/// Blind operation codes understood by the bridge (`blind_op`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlindOperation {
    /// Stop any movement.
    Stop = 0,
    /// Close fully.
    Close = 1,
    /// Open fully.
    Open = 2,
    /// Reverse the current direction.
    Toggle = 3,
    /// Move to an explicit level.
    SetLevel = 64,
}

impl BlindOperation {
    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a wire code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Stop),
            1 => Some(Self::Close),
            2 => Some(Self::Open),
            3 => Some(Self::Toggle),
            64 => Some(Self::SetLevel),
            _ => None,
        }
    }
}

/// Movement reported in a blind's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlindMotion {
    /// Not moving.
    Stopped,
    /// Moving towards closed.
    Closing,
    /// Moving towards open.
    Opening,
    /// The bridge reported an operation that is not a movement.
    Unknown,
}

impl BlindMotion {
    /// Decodes the `blind_op` field of a blind state.
    #[must_use]
    pub const fn from_op(op: i64) -> Self {
        match op {
            0 => Self::Stopped,
            1 => Self::Closing,
            2 => Self::Opening,
            _ => Self::Unknown,
        }
    }

    /// Returns whether the blind is moving, or `None` if unknown.
    #[must_use]
    pub const fn is_moving(self) -> Option<bool> {
        match self {
            Self::Stopped => Some(false),
            Self::Closing | Self::Opening => Some(true),
            Self::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_inverts_open_percentage() {
        for p in 0..=100u8 {
            let level = BlindLevel::from(OpenPercentage::new(p).unwrap());
            assert_eq!(level.value(), 100 - p);
            assert_eq!(OpenPercentage::from(level).value(), p);
        }
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(OpenPercentage::new(101).is_err());
        assert!(BlindLevel::new(101).is_err());
    }

    #[test]
    fn clamping() {
        assert_eq!(OpenPercentage::clamped(-4).value(), 0);
        assert_eq!(BlindLevel::clamped(250).value(), 100);
    }

    #[test]
    fn level_extremes() {
        assert!(BlindLevel::new(0).unwrap().is_open());
        assert!(BlindLevel::new(100).unwrap().is_closed());
        assert!(!BlindLevel::new(50).unwrap().is_open());
    }

    #[test]
    fn operation_codes() {
        assert_eq!(BlindOperation::SetLevel.code(), 64);
        assert_eq!(BlindOperation::from_code(3), Some(BlindOperation::Toggle));
        assert_eq!(BlindOperation::from_code(5), None);
    }

    #[test]
    fn motion_from_op() {
        assert_eq!(BlindMotion::from_op(1), BlindMotion::Closing);
        assert_eq!(BlindMotion::from_op(2).is_moving(), Some(true));
        assert_eq!(BlindMotion::from_op(0).is_moving(), Some(false));
        assert_eq!(BlindMotion::from_op(64).is_moving(), None);
    }
}
