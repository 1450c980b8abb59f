// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound frame decoding.
//!
//! Every frame sent by the bridge is a JSON object with an `op` field naming
//! its kind. Decoding here is pure: no state is touched, so a frame that
//! fails to decode can be dropped without side effects.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::ParseError;
use crate::types::ResourceId;

/// One entry of a `data_update` frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceUpdate {
    /// The resource the new state belongs to.
    pub id: ResourceId,
    /// The complete replacement state.
    pub state: Value,
}

/// A decoded inbound frame.
///
/// # Examples
///
/// ```
/// use nexo_lib::protocol::InboundMessage;
///
/// let frame = r#"{"op":"data_update","resources":{"x":{"id":1,"state":{"is_on":1}}}}"#;
/// match InboundMessage::parse(frame).unwrap() {
///     InboundMessage::DataUpdate(updates) => assert_eq!(updates.len(), 1),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Full snapshot. Holds the whole frame, which becomes the raw data model.
    InitialData(Value),
    /// State replacements for individual resources.
    DataUpdate(Vec<ResourceUpdate>),
    /// Custom command names announced by the bridge.
    Modifications(BTreeSet<String>),
    /// Weather description (the frame's `data` object).
    SetWeather(Value),
    /// A frame with an `op` this library does not handle.
    Unknown(String),
}

impl InboundMessage {
    /// Decodes a text frame.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` for invalid JSON, `ParseError::MissingField`
    /// when `op` is absent, and `ParseError::UnexpectedFormat` when a known
    /// frame lacks the payload it requires.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let frame: Value = serde_json::from_str(text)?;
        let op = frame
            .get("op")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingField("op".to_string()))?;

        match op {
            "initial_data" => {
                if !frame.get("resources").is_some_and(Value::is_object) {
                    return Err(ParseError::UnexpectedFormat(
                        "initial_data without a resources object".to_string(),
                    ));
                }
                Ok(Self::InitialData(frame))
            }
            "data_update" => parse_data_update(&frame).map(Self::DataUpdate),
            "modifications" => Ok(Self::Modifications(parse_ext_commands(&frame))),
            "set_weather" => match frame.get("data") {
                Some(data) if data.is_object() => Ok(Self::SetWeather(data.clone())),
                _ => Err(ParseError::UnexpectedFormat(
                    "set_weather without a data object".to_string(),
                )),
            },
            other => Ok(Self::Unknown(other.to_string())),
        }
    }

    /// Returns the `op` name of the frame.
    #[must_use]
    pub fn op(&self) -> &str {
        match self {
            Self::InitialData(_) => "initial_data",
            Self::DataUpdate(_) => "data_update",
            Self::Modifications(_) => "modifications",
            Self::SetWeather(_) => "set_weather",
            Self::Unknown(op) => op,
        }
    }
}

fn parse_data_update(frame: &Value) -> Result<Vec<ResourceUpdate>, ParseError> {
    let resources = match frame.get("resources") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ParseError::UnexpectedFormat(
                "data_update resources is not an object".to_string(),
            ));
        }
    };

    let mut updates = Vec::with_capacity(resources.len());
    for (key, entry) in resources {
        let Some(state) = entry.get("state") else {
            continue;
        };
        let Some(id) = entry.get("id").and_then(ResourceId::from_value) else {
            tracing::debug!(key = %key, "Skipping data_update entry without a valid id");
            continue;
        };
        updates.push(ResourceUpdate {
            id,
            state: state.clone(),
        });
    }
    Ok(updates)
}

fn parse_ext_commands(frame: &Value) -> BTreeSet<String> {
    let Some(ext) = frame
        .get("modifications")
        .and_then(|m| m.get("ext_commands"))
    else {
        return BTreeSet::new();
    };

    ["to_system", "to_user"]
        .iter()
        .filter_map(|direction| ext.get(*direction).and_then(Value::as_object))
        .flat_map(|names| names.keys().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_data_keeps_whole_frame() {
        let text = r#"{"op":"initial_data","resources":{"1":{"id":1,"type":"light"}}}"#;
        let msg = InboundMessage::parse(text).unwrap();
        let InboundMessage::InitialData(frame) = msg else {
            panic!("expected initial data");
        };
        assert_eq!(frame["resources"]["1"]["type"], "light");
        assert_eq!(frame["op"], "initial_data");
    }

    #[test]
    fn initial_data_requires_resources() {
        let err = InboundMessage::parse(r#"{"op":"initial_data"}"#).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedFormat(_)));
    }

    #[test]
    fn data_update_entries() {
        let text = r#"{"op":"data_update","resources":{
            "a":{"id":1,"state":{"is_on":1}},
            "b":{"id":"2","state":{"value":5}},
            "c":{"id":3},
            "d":{"state":{"value":1}}
        }}"#;
        let InboundMessage::DataUpdate(updates) = InboundMessage::parse(text).unwrap() else {
            panic!("expected data update");
        };
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().any(|u| u.id == ResourceId::new(1)));
        assert!(
            updates
                .iter()
                .any(|u| u.id == ResourceId::new(2) && u.state["value"] == 5)
        );
    }

    #[test]
    fn data_update_without_resources_is_empty() {
        let msg = InboundMessage::parse(r#"{"op":"data_update"}"#).unwrap();
        assert_eq!(msg, InboundMessage::DataUpdate(Vec::new()));
    }

    #[test]
    fn modifications_collects_both_directions() {
        let text = r#"{"op":"modifications","modifications":{"ext_commands":{
            "to_system":{"all_off":{},"scene_1":{}},
            "to_user":{"doorbell":{}}
        }}}"#;
        let InboundMessage::Modifications(names) = InboundMessage::parse(text).unwrap() else {
            panic!("expected modifications");
        };
        let names: Vec<_> = names.into_iter().collect();
        assert_eq!(names, ["all_off", "doorbell", "scene_1"]);
    }

    #[test]
    fn modifications_without_ext_commands() {
        let msg = InboundMessage::parse(r#"{"op":"modifications","modifications":{}}"#).unwrap();
        assert_eq!(msg, InboundMessage::Modifications(BTreeSet::new()));
    }

    #[test]
    fn set_weather_requires_data_object() {
        assert!(InboundMessage::parse(r#"{"op":"set_weather","data":{"devices/0":{}}}"#).is_ok());
        assert!(InboundMessage::parse(r#"{"op":"set_weather","data":5}"#).is_err());
        assert!(InboundMessage::parse(r#"{"op":"set_weather"}"#).is_err());
    }

    #[test]
    fn unknown_op() {
        let msg = InboundMessage::parse(r#"{"op":"heartbeat"}"#).unwrap();
        assert_eq!(msg.op(), "heartbeat");
        assert!(matches!(msg, InboundMessage::Unknown(_)));
    }

    #[test]
    fn malformed_frames() {
        assert!(matches!(
            InboundMessage::parse("{not json").unwrap_err(),
            ParseError::Json(_)
        ));
        assert!(matches!(
            InboundMessage::parse(r#"{"resources":{}}"#).unwrap_err(),
            ParseError::MissingField(_)
        ));
        assert!(InboundMessage::parse("[1,2]").is_err());
    }
}
