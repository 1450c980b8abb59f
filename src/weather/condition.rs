// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weather condition classification and compass labels.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Coarse weather condition, using Home Assistant's condition vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    /// Clear sky during the day.
    Sunny,
    /// Clear sky at night.
    ClearNight,
    /// Overcast.
    Cloudy,
    /// Mixed sun or moon and clouds.
    #[serde(rename = "partlycloudy")]
    PartlyCloudy,
    /// Rain.
    Rainy,
    /// Snow or frost.
    Snowy,
    /// Thunderstorm.
    Lightning,
    /// Thunderstorm with rain.
    LightningRainy,
    /// Fog.
    Fog,
    /// Strong wind.
    Windy,
}

impl WeatherCondition {
    /// Maps a bridge pictogram name (case-insensitive) to a condition.
    #[must_use]
    pub fn from_pictogram(pictogram: &str) -> Option<Self> {
        let condition = match pictogram.to_ascii_uppercase().as_str() {
            "SUN" => Self::Sunny,
            "MOON" => Self::ClearNight,
            "CLOUD" => Self::Cloudy,
            "CLOUD_SUN" | "CLOUD_MOON" => Self::PartlyCloudy,
            "CLOUD_RAIN" | "CLOUD_SHOWERS" => Self::Rainy,
            "CLOUD_SNOW" => Self::Snowy,
            "CLOUD_THUNDER" => Self::Lightning,
            "CLOUD_THUNDER_RAIN" => Self::LightningRainy,
            "FOG" => Self::Fog,
            "WIND" => Self::Windy,
            _ => return None,
        };
        Some(condition)
    }

    /// Classifies from condition flags when the pictogram is not conclusive.
    ///
    /// Flags are checked in the order rain, frost, wind, sun. Without any
    /// set flag the pictogram decides, defaulting to [`Self::Cloudy`].
    #[must_use]
    pub fn from_flags(flags: &Map<String, Value>, pictogram: Option<&str>) -> Self {
        let set = |key: &str| flags.get(key).is_some_and(is_truthy);

        if set("rain") {
            Self::Rainy
        } else if set("frost") {
            Self::Snowy
        } else if set("wind") {
            Self::Windy
        } else if set("sun") {
            if pictogram.is_some_and(|p| p.to_ascii_uppercase().contains("CLOUD")) {
                Self::PartlyCloudy
            } else {
                Self::Sunny
            }
        } else {
            pictogram
                .and_then(Self::from_pictogram)
                .unwrap_or(Self::Cloudy)
        }
    }

    /// Returns the condition name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::ClearNight => "clear-night",
            Self::Cloudy => "cloudy",
            Self::PartlyCloudy => "partlycloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Lightning => "lightning",
            Self::LightningRainy => "lightning-rainy",
            Self::Fog => "fog",
            Self::Windy => "windy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Returns the 16-point compass label nearest to a bearing in degrees.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cardinal_from_degrees(degrees: f64) -> &'static str {
    let index = (degrees.rem_euclid(360.0) / 22.5 + 0.5) as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// Loose truthiness of a JSON flag: non-zero numbers, `true` and non-empty
/// strings or containers.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flags(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn pictogram_mapping_is_case_insensitive() {
        assert_eq!(
            WeatherCondition::from_pictogram("cloud_sun"),
            Some(WeatherCondition::PartlyCloudy)
        );
        assert_eq!(
            WeatherCondition::from_pictogram("CLOUD_THUNDER_RAIN"),
            Some(WeatherCondition::LightningRainy)
        );
        assert_eq!(WeatherCondition::from_pictogram("RAINBOW"), None);
    }

    #[test]
    fn flags_priority() {
        let f = flags(json!({"rain": 1, "frost": 1, "sun": 1}));
        assert_eq!(WeatherCondition::from_flags(&f, None), WeatherCondition::Rainy);

        let f = flags(json!({"frost": true, "wind": 1}));
        assert_eq!(WeatherCondition::from_flags(&f, None), WeatherCondition::Snowy);

        let f = flags(json!({"wind": 1, "sun": 1}));
        assert_eq!(WeatherCondition::from_flags(&f, None), WeatherCondition::Windy);
    }

    #[test]
    fn sun_flag_uses_pictogram_for_clouds() {
        let f = flags(json!({"sun": 1, "rain": 0}));
        assert_eq!(
            WeatherCondition::from_flags(&f, Some("cloud_odd")),
            WeatherCondition::PartlyCloudy
        );
        assert_eq!(WeatherCondition::from_flags(&f, None), WeatherCondition::Sunny);
    }

    #[test]
    fn no_flags_defaults_to_cloudy() {
        let f = flags(json!({"rain": 0, "sun": false}));
        assert_eq!(WeatherCondition::from_flags(&f, None), WeatherCondition::Cloudy);
        assert_eq!(
            WeatherCondition::from_flags(&f, Some("FOG")),
            WeatherCondition::Fog
        );
    }

    #[test]
    fn compass_labels() {
        assert_eq!(cardinal_from_degrees(0.0), "N");
        assert_eq!(cardinal_from_degrees(11.0), "N");
        assert_eq!(cardinal_from_degrees(12.0), "NNE");
        assert_eq!(cardinal_from_degrees(90.0), "E");
        assert_eq!(cardinal_from_degrees(225.0), "SW");
        assert_eq!(cardinal_from_degrees(350.0), "N");
        assert_eq!(cardinal_from_degrees(-90.0), "W");
    }

    #[test]
    fn serializes_like_display() {
        assert_eq!(
            serde_json::to_value(WeatherCondition::ClearNight).unwrap(),
            json!("clear-night")
        );
        assert_eq!(WeatherCondition::PartlyCloudy.to_string(), "partlycloudy");
    }
}
