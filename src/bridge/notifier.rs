// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notification delivery task.
//!
//! The dispatcher never runs subscriber callbacks itself. It queues a
//! [`Notification`] after applying a frame, and this task drains the queue
//! and invokes the callbacks. Notifications are delivered in queue order,
//! so updates of one resource reach its callbacks in frame order.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::session::{NotificationQueue, Session};

/// Delivers queued notifications until `cancel` fires.
///
/// Notifications already queued when the token fires are still delivered.
/// Returns the queue so a later run can resume from it.
pub(crate) async fn run(
    session: Arc<Session>,
    mut queue: NotificationQueue,
    cancel: CancellationToken,
) -> NotificationQueue {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = queue.recv() => match next {
                Some(notification) => session.deliver(notification),
                None => break,
            },
        }
    }

    while let Ok(notification) = queue.try_recv() {
        session.deliver(notification);
    }
    tracing::debug!("Notifier exiting");
    queue
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::bridge::BridgeConfig;

    const SNAPSHOT: &str =
        r#"{"op":"initial_data","resources":{"1":{"id":1,"type":"light","name":"Kitchen","state":{"is_on":0}}}}"#;
    const UPDATE: &str = r#"{"op":"data_update","resources":{"x":{"id":1,"state":{"is_on":1}}}}"#;

    #[tokio::test]
    async fn delivers_in_order_and_drains_on_cancel() {
        let (session, queue) = Session::new(&BridgeConfig::new("127.0.0.1"));
        let session = Arc::new(session);
        session.dispatch(SNAPSHOT);

        let resource = session.registry.all().remove(0);
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let observed = Arc::clone(&resource);
        resource.on_change(move || {
            recorder.lock().push(observed.state_i64("is_on"));
        });

        let cancel = CancellationToken::new();
        session.dispatch(UPDATE);
        session.dispatch(UPDATE);
        cancel.cancel();

        let queue = run(Arc::clone(&session), queue, cancel).await;
        assert_eq!(seen.lock().len(), 2);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn panicking_callback_does_not_stop_delivery() {
        let (session, queue) = Session::new(&BridgeConfig::new("127.0.0.1"));
        let session = Arc::new(session);
        session.dispatch(SNAPSHOT);

        let resource = session.registry.all().remove(0);
        let calls = Arc::new(AtomicUsize::new(0));
        resource.on_change(|| panic!("callback failure"));
        let counter = Arc::clone(&calls);
        resource.on_change(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(Arc::clone(&session), queue, cancel.clone()));
        session.dispatch(UPDATE);
        session.dispatch(UPDATE);

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while calls.load(Ordering::SeqCst) < 2 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        cancel.cancel();
        task.await.unwrap();
    }
}
