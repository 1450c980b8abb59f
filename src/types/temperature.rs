// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature values reported in tenths of a degree Celsius.

use std::fmt;

use crate::error::ValueError;

/// Thermostat `value` meaning "leave the target unchanged".
pub const THERMOSTAT_NO_VALUE: i64 = 32767;

/// A temperature in degrees Celsius with one decimal of precision.
///
/// # Examples
///
/// ```
/// use nexo_lib::types::Temperature;
///
/// let t = Temperature::from_tenths(236);
/// assert!((t.celsius() - 23.6).abs() < f64::EPSILON);
/// assert_eq!(t.tenths(), 236);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature(i64);

impl Temperature {
    /// Creates a temperature from the raw wire value.
    #[must_use]
    pub const fn from_tenths(tenths: i64) -> Self {
        Self(tenths)
    }

    /// Creates a temperature from degrees Celsius, rounded to one decimal.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFinite` for NaN or infinite input, and
    /// `ValueError::OutOfRange` when the value would collide with the
    /// "no value" sentinel.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_celsius(celsius: f64) -> Result<Self, ValueError> {
        if !celsius.is_finite() {
            return Err(ValueError::NotFinite(celsius));
        }
        let tenths = (celsius * 10.0).round();
        let limit = (THERMOSTAT_NO_VALUE - 1) as f64;
        if tenths.abs() > limit {
            return Err(ValueError::OutOfRange {
                min: -(THERMOSTAT_NO_VALUE - 1),
                max: THERMOSTAT_NO_VALUE - 1,
                actual: tenths as i64,
            });
        }
        Ok(Self(tenths as i64))
    }

    /// Returns the raw value in tenths of a degree.
    #[must_use]
    pub const fn tenths(&self) -> i64 {
        self.0
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn celsius(&self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.celsius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenths_to_celsius() {
        assert!((Temperature::from_tenths(-55).celsius() + 5.5).abs() < 1e-9);
        assert_eq!(Temperature::from_tenths(215).to_string(), "21.5°C");
    }

    #[test]
    fn celsius_rounds_to_tenths() {
        assert_eq!(Temperature::from_celsius(21.5).unwrap().tenths(), 215);
        assert_eq!(Temperature::from_celsius(19.04).unwrap().tenths(), 190);
    }

    #[test]
    fn rejects_sentinel_and_nan() {
        assert!(Temperature::from_celsius(3276.7).is_err());
        assert!(Temperature::from_celsius(f64::NAN).is_err());
    }
}
