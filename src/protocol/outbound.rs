// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound frame channel.
//!
//! Resources never touch the socket. They hold an [`Outbound`] handle that
//! queues frames to whichever task currently owns the writer half. When the
//! connection is replaced, the bridge swaps every resource's handle for one
//! bound to the new connection.

use tokio::sync::{mpsc, oneshot};

use crate::error::{Error, ProtocolError, Result};

/// Default number of frames that may be queued for the writer.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;

/// A text frame waiting to be written, with its completion signal.
#[derive(Debug)]
pub struct OutboundFrame {
    text: String,
    ack: oneshot::Sender<std::result::Result<(), ProtocolError>>,
}

impl OutboundFrame {
    /// Returns the frame text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Splits the frame into its text and completion signal.
    #[must_use]
    pub fn into_parts(self) -> (String, FrameAck) {
        (self.text, FrameAck(self.ack))
    }

    /// Reports the write outcome to the sender.
    pub fn complete(self, result: std::result::Result<(), ProtocolError>) {
        // The sender may have given up waiting.
        let _ = self.ack.send(result);
    }
}

/// Completion signal of a frame whose text has been taken.
#[derive(Debug)]
pub struct FrameAck(oneshot::Sender<std::result::Result<(), ProtocolError>>);

impl FrameAck {
    /// Reports the write outcome to the sender.
    pub fn complete(self, result: std::result::Result<(), ProtocolError>) {
        let _ = self.0.send(result);
    }
}

/// Handle used to queue frames on the current connection.
///
/// A detached handle (no connection yet) rejects every send with
/// [`Error::NotConnected`].
///
/// # Examples
///
/// ```
/// use nexo_lib::protocol::Outbound;
///
/// # async fn example() {
/// let (outbound, mut rx) = Outbound::channel(8);
/// let writer = tokio::spawn(async move {
///     let frame = rx.recv().await.unwrap();
///     assert_eq!(frame.text(), "hello");
///     frame.complete(Ok(()));
/// });
///
/// outbound.send("hello".to_string()).await.unwrap();
/// writer.await.unwrap();
///
/// assert!(Outbound::detached().send("x".to_string()).await.is_err());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Outbound {
    tx: Option<mpsc::Sender<OutboundFrame>>,
}

impl Outbound {
    /// Creates a handle with no connection behind it.
    #[must_use]
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// Creates a handle and the receiving end the writer drains.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    /// Returns true if a writer is still listening on this handle.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Returns true if both handles feed the same writer.
    #[must_use]
    pub fn same_channel(&self, other: &Self) -> bool {
        match (&self.tx, &other.tx) {
            (Some(a), Some(b)) => a.same_channel(b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Queues a frame and waits until the writer has written it.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` for a detached handle,
    /// `ProtocolError::ChannelClosed` if the connection went away before the
    /// frame was written, or the write error reported by the writer.
    pub async fn send(&self, text: String) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(Error::NotConnected)?;
        let (ack, done) = oneshot::channel();
        tx.send(OutboundFrame { text, ack })
            .await
            .map_err(|_| ProtocolError::ChannelClosed("outbound".to_string()))?;
        done.await
            .map_err(|_| ProtocolError::ChannelClosed("outbound ack".to_string()))??;
        Ok(())
    }
}
