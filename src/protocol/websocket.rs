// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebSocket connection loop.
//!
//! The loop owns the socket. It connects, forwards every text frame to a
//! [`ConnectionHandler`], writes queued [`Outbound`] frames, and on any error
//! or close waits a fixed interval before reconnecting. A watchdog ticker
//! pings the bridge and drops the connection when nothing has been heard
//! from it for too long.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::outbound::{Outbound, OutboundFrame};
use crate::error::ProtocolError;

/// Connection state of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Not connected; a reconnect is pending.
    Disconnected,
    /// A connection attempt is in progress.
    Connecting,
    /// Connected and reading frames.
    Connected,
    /// Stopped on request; no further attempts will be made.
    Stopped,
}

impl ConnectionState {
    /// Returns true if the bridge is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Receives connection lifecycle notifications and inbound frames.
///
/// All methods are called from the connection task, in order. Frames are
/// delivered strictly in arrival order.
pub trait ConnectionHandler: Send + Sync {
    /// A new connection is open. Frames sent through `outbound` go to it.
    fn on_connected(&self, outbound: Outbound);

    /// A text frame arrived.
    fn on_frame(&self, text: &str);

    /// The connection state changed.
    fn on_state(&self, state: ConnectionState);
}

/// Settings for [`run`].
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// WebSocket URL.
    pub url: String,
    /// Fixed delay between reconnect attempts, also the watchdog period.
    pub reconnect_interval: Duration,
    /// Silence after which the connection is considered dead.
    /// `None` disables the watchdog.
    pub watchdog_timeout: Option<Duration>,
    /// Capacity of the outbound frame queue.
    pub outbound_capacity: usize,
}

/// Runs the connect/read/reconnect loop until `cancel` fires.
pub async fn run<H: ConnectionHandler>(
    settings: ConnectionSettings,
    handler: Arc<H>,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        handler.on_state(ConnectionState::Connecting);
        let result = connect_and_read(&settings, handler.as_ref(), &cancel).await;

        if cancel.is_cancelled() {
            break;
        }
        handler.on_state(ConnectionState::Disconnected);

        let delay_ms = u64::try_from(settings.reconnect_interval.as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(()) => tracing::info!(delay_ms, "Connection closed, reconnecting"),
            Err(e) => tracing::warn!(
                error = %e,
                delay_ms,
                "WebSocket error, attempting to reconnect"
            ),
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(settings.reconnect_interval) => {}
        }
    }

    handler.on_state(ConnectionState::Stopped);
    tracing::debug!("Connection loop exiting");
}

/// Opens one connection and serves it until it drops or `cancel` fires.
async fn connect_and_read<H: ConnectionHandler>(
    settings: &ConnectionSettings,
    handler: &H,
    cancel: &CancellationToken,
) -> Result<(), ProtocolError> {
    tracing::debug!(url = %settings.url, "Connecting");

    let (ws_stream, response) = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ok(()),
        result = tokio_tungstenite::connect_async(settings.url.as_str()) => result?,
    };

    tracing::info!(
        url = %settings.url,
        status = response.status().as_u16(),
        "Connected to bridge"
    );

    let (mut write, mut read) = ws_stream.split();
    let (outbound, mut outbound_rx) = Outbound::channel(settings.outbound_capacity);
    handler.on_connected(outbound);
    handler.on_state(ConnectionState::Connected);

    let period = settings.reconnect_interval.max(Duration::from_millis(1));
    let mut watchdog = tokio::time::interval_at(Instant::now() + period, period);
    watchdog.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                reject_pending(&mut outbound_rx);
                return Ok(());
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        last_seen = Instant::now();
                        tracing::trace!(len = text.len(), "Frame received");
                        handler.on_frame(text.as_str());
                    }
                    Some(Ok(Message::Close(frame))) => {
                        if let Some(cf) = frame {
                            tracing::info!(code = %cf.code, reason = %cf.reason, "Close frame received");
                        } else {
                            tracing::info!("Close frame received");
                        }
                        reject_pending(&mut outbound_rx);
                        return Ok(());
                    }
                    Some(Ok(_)) => {
                        // Ping, pong and binary frames only prove liveness.
                        last_seen = Instant::now();
                    }
                    Some(Err(e)) => {
                        reject_pending(&mut outbound_rx);
                        return Err(e.into());
                    }
                    None => {
                        tracing::info!("WebSocket stream ended");
                        reject_pending(&mut outbound_rx);
                        return Ok(());
                    }
                }
            }
            Some(frame) = outbound_rx.recv() => {
                let (text, ack) = frame.into_parts();
                tracing::debug!(len = text.len(), "Sending frame");
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    ack.complete(Err(ProtocolError::ConnectionFailed(e.to_string())));
                    reject_pending(&mut outbound_rx);
                    return Err(e.into());
                }
                ack.complete(Ok(()));
            }
            _ = watchdog.tick(), if settings.watchdog_timeout.is_some() => {
                if let Some(timeout) = settings.watchdog_timeout
                    && last_seen.elapsed() > timeout
                {
                    let silent_ms = u64::try_from(last_seen.elapsed().as_millis()).unwrap_or(u64::MAX);
                    reject_pending(&mut outbound_rx);
                    return Err(ProtocolError::Watchdog(silent_ms));
                }
                write.send(Message::Ping(Default::default())).await?;
            }
        }
    }
}

/// Fails every frame still queued for a connection that is going away.
fn reject_pending(rx: &mut mpsc::Receiver<OutboundFrame>) {
    rx.close();
    while let Ok(frame) = rx.try_recv() {
        frame.complete(Err(ProtocolError::ConnectionClosed));
    }
}
