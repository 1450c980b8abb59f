// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for dimmer control.
//!
//! Nexo dimmers take a brightness between 1 and 255. A level of zero is not
//! a brightness: it is expressed as the switch-off operation instead.

use std::fmt;

use crate::error::ValueError;

/// Dimmer brightness level (1-255).
///
/// # Examples
///
/// ```
/// use nexo_lib::types::Brightness;
///
/// let level = Brightness::new(128).unwrap();
/// assert_eq!(level.value(), 128);
///
/// // Zero is the off path, not a brightness
/// assert!(Brightness::new(0).is_err());
/// assert_eq!(Brightness::from_level(0), None);
///
/// // Oversized levels are clamped
/// assert_eq!(Brightness::from_level(256), Some(Brightness::MAX));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Lowest brightness that still keeps the light on.
    pub const MIN: Self = Self(1);

    /// Full brightness.
    pub const MAX: Self = Self(255);

    /// Creates a brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is zero.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value == 0 {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: 255,
                actual: 0,
            });
        }
        Ok(Self(value))
    }

    /// Normalizes an arbitrary requested level.
    ///
    /// Levels at or below zero mean "off" and return `None`. Levels above
    /// 255 are clamped to [`Brightness::MAX`].
    #[must_use]
    pub fn from_level(level: i64) -> Option<Self> {
        if level <= 0 {
            return None;
        }
        Some(Self(u8::try_from(level).unwrap_or(u8::MAX)))
    }

    /// Returns the brightness value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_range() {
        assert!(Brightness::new(1).is_ok());
        assert!(Brightness::new(255).is_ok());
        assert!(Brightness::new(0).is_err());
    }

    #[test]
    fn from_level_off_path() {
        assert_eq!(Brightness::from_level(0), None);
        assert_eq!(Brightness::from_level(-5), None);
    }

    #[test]
    fn from_level_clamps() {
        assert_eq!(Brightness::from_level(256).map(|b| b.value()), Some(255));
        assert_eq!(Brightness::from_level(100_000).map(|b| b.value()), Some(255));
        assert_eq!(Brightness::from_level(1).map(|b| b.value()), Some(1));
    }

    #[test]
    fn try_from_u8() {
        let b: Result<Brightness, _> = 200u8.try_into();
        assert_eq!(b.unwrap().value(), 200);
    }
}
