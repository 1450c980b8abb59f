// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weather station model.
//!
//! The bridge pushes `set_weather` frames describing its weather station.
//! The payload shape is loosely defined, so every field is optional and
//! unknown keys are ignored. Each frame is merged into the previous
//! reading: fields it does not carry keep their last value.
//!
//! # Examples
//!
//! ```
//! use nexo_lib::weather::{Weather, WeatherCondition};
//! use serde_json::json;
//!
//! let mut weather = Weather::default();
//! let data = json!({
//!     "devices/0": {
//!         "pictogram": "CLOUD_SUN",
//!         "air": {"temperature": 18.5, "wind": 5}
//!     }
//! });
//! weather.update_from_bridge(data.as_object().unwrap());
//!
//! assert_eq!(weather.condition(), WeatherCondition::PartlyCloudy);
//! assert_eq!(weather.wind_speed_kmh(), Some(18.0));
//! ```

mod condition;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

pub use condition::{WeatherCondition, cardinal_from_degrees};

const LIGHT_QUADRANT_KEYS: [&str; 8] = ["N", "S", "E", "W", "north", "south", "east", "west"];

/// Latest weather reading reported by the bridge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Weather {
    pictogram: Option<String>,
    conditions: Map<String, Value>,
    temperature: Option<f64>,
    wind: Option<f64>,
    wind_rose: BTreeMap<char, f64>,
    wind_bearing: Option<f64>,
    light_intensity: Option<i64>,
    light_angle: Option<i64>,
    light_quadrants: BTreeMap<char, i64>,
}

impl Weather {
    /// Merges one `set_weather` data object into this reading.
    pub fn update_from_bridge(&mut self, data: &Map<String, Value>) {
        if let Some(device) = data.get("devices/0").and_then(Value::as_object) {
            self.update_device(device);
        }

        if let Some(rose) = data
            .get("state")
            .and_then(|s| s.get("value"))
            .and_then(Value::as_object)
        {
            self.update_wind_rose(rose);
        }
    }

    fn update_device(&mut self, device: &Map<String, Value>) {
        if let Some(pictogram) = device.get("pictogram").and_then(Value::as_str)
            && !pictogram.is_empty()
        {
            self.pictogram = Some(pictogram.to_string());
        }
        if let Some(conditions) = device.get("conditions").and_then(Value::as_object) {
            self.conditions.clone_from(conditions);
        }

        if let Some(air) = device.get("air") {
            if let Some(t) = air.get("temperature").and_then(Value::as_f64) {
                self.temperature = Some(t);
            }
            if let Some(w) = air.get("wind").and_then(Value::as_f64) {
                self.wind = Some(w);
            }
        }

        if let Some(light) = device.get("light").and_then(Value::as_object) {
            if let Some(i) = light.get("intensity").and_then(as_whole) {
                self.light_intensity = Some(i);
            }
            if let Some(a) = light.get("angle").and_then(as_whole) {
                self.light_angle = Some(a);
            }
            let quadrants: BTreeMap<char, i64> = LIGHT_QUADRANT_KEYS
                .into_iter()
                .filter_map(|key| Some((compass_key(key)?, light.get(key).and_then(as_whole)?)))
                .collect();
            if !quadrants.is_empty() {
                self.light_quadrants = quadrants;
            }
        }
    }

    fn update_wind_rose(&mut self, rose: &Map<String, Value>) {
        let cleaned: BTreeMap<char, f64> = rose
            .iter()
            .filter_map(|(key, value)| Some((compass_key(key)?, value.as_f64()?)))
            .collect();
        if cleaned.is_empty() {
            return;
        }

        let get = |c: char| cleaned.get(&c).copied().unwrap_or(0.0);
        let east = get('E') - get('W');
        let north = get('N') - get('S');
        if east.abs() > 0.0 || north.abs() > 0.0 {
            let mut bearing = east.atan2(north).to_degrees();
            if bearing < 0.0 {
                bearing += 360.0;
            }
            self.wind_bearing = Some(bearing);
        }
        self.wind_rose = cleaned;
    }

    /// Returns true once the reading carries a temperature, a pictogram or
    /// condition flags.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.temperature.is_some() || self.pictogram.is_some() || !self.conditions.is_empty()
    }

    /// Classifies the current weather.
    ///
    /// A known pictogram wins; otherwise the condition flags decide.
    #[must_use]
    pub fn condition(&self) -> WeatherCondition {
        let pictogram = self.pictogram.as_deref();
        pictogram
            .and_then(WeatherCondition::from_pictogram)
            .unwrap_or_else(|| WeatherCondition::from_flags(&self.conditions, pictogram))
    }

    /// Returns the raw pictogram name.
    #[must_use]
    pub fn pictogram(&self) -> Option<&str> {
        self.pictogram.as_deref()
    }

    /// Returns the raw condition flags.
    #[must_use]
    pub fn conditions(&self) -> &Map<String, Value> {
        &self.conditions
    }

    /// Air temperature in degrees Celsius.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Wind speed in metres per second.
    #[must_use]
    pub fn wind_speed(&self) -> Option<f64> {
        self.wind
    }

    /// Wind speed in kilometres per hour.
    #[must_use]
    pub fn wind_speed_kmh(&self) -> Option<f64> {
        self.wind.map(|ms| ms * 3.6)
    }

    /// Wind rose readings keyed by `N`, `S`, `E` and `W`.
    #[must_use]
    pub fn wind_rose(&self) -> &BTreeMap<char, f64> {
        &self.wind_rose
    }

    /// Wind bearing derived from the wind rose, in degrees clockwise from
    /// north.
    #[must_use]
    pub fn wind_bearing(&self) -> Option<f64> {
        self.wind_bearing
    }

    /// 16-point compass label of [`Self::wind_bearing`].
    #[must_use]
    pub fn wind_cardinal(&self) -> Option<&'static str> {
        self.wind_bearing.map(cardinal_from_degrees)
    }

    /// Light intensity as reported by the station.
    #[must_use]
    pub fn light_intensity(&self) -> Option<i64> {
        self.light_intensity
    }

    /// Sun angle as reported by the station.
    #[must_use]
    pub fn light_angle(&self) -> Option<i64> {
        self.light_angle
    }

    /// Per-direction light readings keyed by `N`, `S`, `E` and `W`.
    #[must_use]
    pub fn light_quadrants(&self) -> &BTreeMap<char, i64> {
        &self.light_quadrants
    }
}

/// Maps a direction key (`N`, `north`, ...) to its upper-case initial.
fn compass_key(key: &str) -> Option<char> {
    key.chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| matches!(c, 'N' | 'S' | 'E' | 'W'))
}

#[allow(clippy::cast_possible_truncation)]
fn as_whole(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(weather: &mut Weather, data: Value) {
        weather.update_from_bridge(data.as_object().unwrap());
    }

    #[test]
    fn empty_reading_is_unavailable() {
        let weather = Weather::default();
        assert!(!weather.is_available());
        assert_eq!(weather.condition(), WeatherCondition::Cloudy);
        assert_eq!(weather.wind_speed_kmh(), None);
    }

    #[test]
    fn parses_station_device() {
        let mut weather = Weather::default();
        apply(
            &mut weather,
            json!({
                "devices/0": {
                    "pictogram": "sun",
                    "conditions": {"sun": 1},
                    "air": {"temperature": 21.5, "wind": 2.5},
                    "light": {"intensity": 80, "angle": 35.7, "north": 10, "E": 40, "up": 3}
                }
            }),
        );

        assert!(weather.is_available());
        assert_eq!(weather.pictogram(), Some("sun"));
        assert_eq!(weather.condition(), WeatherCondition::Sunny);
        assert_eq!(weather.temperature(), Some(21.5));
        assert_eq!(weather.wind_speed_kmh(), Some(9.0));
        assert_eq!(weather.light_intensity(), Some(80));
        assert_eq!(weather.light_angle(), Some(35));
        assert_eq!(weather.light_quadrants().get(&'N'), Some(&10));
        assert_eq!(weather.light_quadrants().get(&'E'), Some(&40));
        assert_eq!(weather.light_quadrants().len(), 2);
    }

    #[test]
    fn later_frames_keep_missing_fields() {
        let mut weather = Weather::default();
        apply(
            &mut weather,
            json!({"devices/0": {"pictogram": "CLOUD", "air": {"temperature": 10}}}),
        );
        apply(&mut weather, json!({"devices/0": {"air": {"wind": 1}}}));

        assert_eq!(weather.pictogram(), Some("CLOUD"));
        assert_eq!(weather.temperature(), Some(10.0));
        assert_eq!(weather.wind_speed(), Some(1.0));
    }

    #[test]
    fn unknown_pictogram_falls_back_to_flags() {
        let mut weather = Weather::default();
        apply(
            &mut weather,
            json!({"devices/0": {"pictogram": "DRIZZLE", "conditions": {"rain": 1}}}),
        );
        assert_eq!(weather.condition(), WeatherCondition::Rainy);
    }

    #[test]
    fn wind_rose_bearing() {
        let mut weather = Weather::default();
        apply(
            &mut weather,
            json!({"state": {"value": {"N": 0, "S": 0, "E": 8, "west": 0, "x": 4}}}),
        );
        assert_eq!(weather.wind_rose().len(), 4);
        assert!((weather.wind_bearing().unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(weather.wind_cardinal(), Some("E"));

        apply(&mut weather, json!({"state": {"value": {"S": 5, "W": 5}}}));
        let bearing = weather.wind_bearing().unwrap();
        assert!((bearing - 225.0).abs() < 1e-9);
        assert_eq!(weather.wind_cardinal(), Some("SW"));
    }

    #[test]
    fn calm_wind_rose_keeps_previous_bearing() {
        let mut weather = Weather::default();
        apply(&mut weather, json!({"state": {"value": {"N": 3}}}));
        apply(&mut weather, json!({"state": {"value": {"N": 2, "S": 2}}}));
        assert_eq!(weather.wind_bearing(), Some(0.0));
        assert_eq!(weather.wind_rose().get(&'S'), Some(&2.0));
    }

    #[test]
    fn ignores_unexpected_shapes() {
        let mut weather = Weather::default();
        apply(
            &mut weather,
            json!({"devices/0": "offline", "state": {"value": [1, 2]}}),
        );
        assert_eq!(weather, Weather::default());
    }
}
