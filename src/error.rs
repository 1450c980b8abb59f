// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Nexo bridge library.
//!
//! This module provides the error hierarchy for failures across the library:
//! value validation, WebSocket communication, frame parsing, and resource
//! construction.
//!
//! Most of these errors never cross the public boundary as hard failures.
//! Connection problems are retried by the connection loop, malformed frames
//! are logged and dropped, and command methods log before returning their
//! error so that callers are free to ignore it.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing an inbound frame.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while building or operating on a resource.
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// The bridge has no open connection to write to.
    #[error("bridge is not connected")]
    NotConnected,
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A floating point value could not be represented.
    #[error("value {0} is not a finite number")]
    NotFinite(f64),
}

/// Errors related to the WebSocket transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The WebSocket library reported an error.
    #[error("websocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// Connection to the bridge failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The bridge closed the connection.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// No frame was seen within the watchdog window.
    #[error("connection silent for more than {0} ms")]
    Watchdog(u64),

    /// Invalid host or URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

impl From<tungstenite::Error> for ProtocolError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Errors related to parsing inbound frames.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the frame.
    #[error("missing field in frame: {0}")]
    MissingField(String),

    /// Unexpected frame format.
    #[error("unexpected frame format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to resource construction and control.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The `type` discriminator is not a known resource kind.
    #[error("unknown resource type: {0}")]
    UnknownType(String),

    /// A `temperature` resource reported a mode other than sensor or thermostat.
    #[error("unsupported temperature mode: {0}")]
    UnsupportedMode(i64),

    /// The descriptor has no usable integer `id`.
    #[error("resource descriptor has no valid id")]
    MissingId,

    /// The descriptor has no `type` discriminator.
    #[error("resource descriptor has no type")]
    MissingType,

    /// The device has not reported a state for this resource yet.
    #[error("resource {0} has not reported a state yet")]
    MissingState(i64),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 1,
            max: 255,
            actual: 300,
        };
        assert_eq!(err.to_string(), "value 300 is out of range [1, 255]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: -1,
        };
        let err: Error = value_err.clone().into();
        assert!(matches!(err, Error::Value(e) if e == value_err));
    }

    #[test]
    fn not_finite_compares_by_value() {
        let err = ValueError::NotFinite(f64::INFINITY);
        assert_eq!(err.to_string(), "value inf is not a finite number");
        assert_eq!(err, ValueError::NotFinite(f64::INFINITY));
        assert_ne!(ValueError::NotFinite(f64::NAN), ValueError::NotFinite(f64::NAN));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("op".to_string());
        assert_eq!(err.to_string(), "missing field in frame: op");
    }

    #[test]
    fn protocol_error_from_tungstenite() {
        let err: ProtocolError = tungstenite::Error::ConnectionClosed.into();
        assert!(matches!(err, ProtocolError::WebSocket(_)));

        let err: Error = err.into();
        assert!(err.to_string().starts_with("protocol error: websocket error"));
    }

    #[test]
    fn resource_error_display() {
        let err = ResourceError::UnknownType("sprinkler".to_string());
        assert_eq!(err.to_string(), "unknown resource type: sprinkler");
        assert_eq!(
            ResourceError::UnsupportedMode(3).to_string(),
            "unsupported temperature mode: 3"
        );
    }
}
