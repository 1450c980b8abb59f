// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocol for communicating with a Nexo bridge.
//!
//! The bridge speaks JSON over a plain WebSocket on port 8766.
//!
//! - [`InboundMessage`]: decoding of `initial_data`, `data_update`,
//!   `modifications` and `set_weather` frames
//! - [`Outbound`]: handle through which resources queue command frames
//! - [`run`]: the connect/read/reconnect loop with its watchdog
//!
//! Outbound command encoding lives in [`crate::command`].

mod message;
mod outbound;
mod websocket;

pub use message::{InboundMessage, ResourceUpdate};
pub use outbound::{DEFAULT_OUTBOUND_CAPACITY, FrameAck, Outbound, OutboundFrame};
pub use websocket::{ConnectionHandler, ConnectionSettings, ConnectionState, run};
