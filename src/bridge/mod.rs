// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge session management.
//!
//! A [`Bridge`] owns the connection to one Nexo bridge. It runs two
//! background tasks:
//!
//! - the connection loop, which reads frames in arrival order and applies
//!   them to the resource table, reconnecting after a fixed interval;
//! - the notifier, which runs subscriber callbacks for applied updates.
//!
//! Resources survive reconnects. Only the first `initial_data` of a bridge
//! builds the resource table; later snapshots point the existing resources
//! at the new connection.
//!
//! # Examples
//!
//! ```no_run
//! use nexo_lib::{Bridge, BridgeConfig};
//! use nexo_lib::resource::ResourceKind;
//!
//! #[tokio::main]
//! async fn main() -> nexo_lib::Result<()> {
//!     let bridge = Bridge::new(BridgeConfig::new("192.168.1.20"))?;
//!     bridge.start()?;
//!
//!     if !bridge.wait_for_initial_resources_load(None).await {
//!         eprintln!("bridge not ready yet, continuing without resources");
//!     }
//!
//!     for light in bridge.get_resources_by_type(ResourceKind::Light) {
//!         light.on_change(|| println!("light changed"));
//!         if let Some(switch) = light.as_switch() {
//!             switch.turn_on().await?;
//!         }
//!     }
//!
//!     bridge.stop().await;
//!     Ok(())
//! }
//! ```

mod config;
mod notifier;
mod session;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

pub use config::{BridgeConfig, DEFAULT_PORT, ReconnectionPolicy};

use self::session::{NotificationQueue, Session};
use crate::command::ExtCommand;
use crate::error::{ProtocolError, Result};
use crate::event::BridgeEvent;
use crate::protocol::{
    self, ConnectionHandler, ConnectionSettings, ConnectionState, DEFAULT_OUTBOUND_CAPACITY,
    Outbound,
};
use crate::resource::{Resource, ResourceKind};
use crate::subscription::{Callback, SubscriptionId};
use crate::types::ResourceId;
use crate::weather::Weather;

/// Background tasks of a bridge.
#[derive(Debug, Default)]
struct Tasks {
    cancel: CancellationToken,
    connection: Option<JoinHandle<()>>,
    notifier: Option<JoinHandle<NotificationQueue>>,
    /// The notification queue while no notifier is running.
    idle_queue: Option<NotificationQueue>,
    /// Runtime the bridge was created or started on.
    runtime: Option<Handle>,
}

impl Tasks {
    fn connection_running(&self) -> bool {
        self.connection.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn notifier_running(&self) -> bool {
        self.notifier.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Returns a live token, replacing a cancelled one when nothing runs.
    fn token(&mut self) -> CancellationToken {
        if self.cancel.is_cancelled() && !self.connection_running() && !self.notifier_running() {
            self.cancel = CancellationToken::new();
        }
        self.cancel.clone()
    }
}

/// Connection to one Nexo bridge and its resource table.
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    url: String,
    session: Arc<Session>,
    tasks: Mutex<Tasks>,
}

impl Bridge {
    /// Creates a bridge. No connection is made until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the configured host is
    /// empty.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let url = config.url()?;
        let (session, queue) = Session::new(&config);
        Ok(Self {
            config,
            url,
            session: Arc::new(session),
            tasks: Mutex::new(Tasks {
                idle_queue: Some(queue),
                runtime: Handle::try_current().ok(),
                ..Tasks::default()
            }),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the WebSocket URL of the bridge.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Launches the connection loop in the background.
    ///
    /// Clears the initialized flag so that
    /// [`wait_for_initial_resources_load`](Self::wait_for_initial_resources_load)
    /// waits for a fresh snapshot. Calling `start` while the loop is running
    /// has no effect.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::ConnectionFailed` when called outside a Tokio
    /// runtime.
    pub fn start(&self) -> Result<()> {
        let runtime = Handle::try_current()
            .map_err(|e| ProtocolError::ConnectionFailed(format!("no Tokio runtime: {e}")))?;

        let mut tasks = self.tasks.lock();
        if tasks.connection_running() {
            tracing::debug!(url = %self.url, "Bridge already running");
            return Ok(());
        }

        tasks.runtime = Some(runtime.clone());
        let cancel = tasks.token();
        self.session.reset_initialized();

        let settings = ConnectionSettings {
            url: self.url.clone(),
            reconnect_interval: self.config.reconnection.interval,
            watchdog_timeout: self.config.reconnection.watchdog_timeout(),
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        };
        let connection = protocol::run(settings, Arc::clone(&self.session), cancel);
        tasks.connection = Some(runtime.spawn(connection.instrument(self.span())));
        self.spawn_notifier(&runtime, &mut tasks);

        tracing::info!(url = %self.url, "Bridge started");
        Ok(())
    }

    /// Stops the background tasks and closes the socket.
    ///
    /// Each task gets at most [`BridgeConfig::stop_timeout`] to finish; a task
    /// that does not is aborted. Resources stay in the table but their
    /// commands fail with `Error::NotConnected` until the bridge is started
    /// again.
    pub async fn stop(&self) {
        let (connection, notifier) = {
            let mut tasks = self.tasks.lock();
            tasks.cancel.cancel();
            (tasks.connection.take(), tasks.notifier.take())
        };

        if let Some(handle) = connection {
            self.join_bounded(handle, "connection").await;
        }

        if let Some(handle) = notifier {
            let queue = self.join_bounded(handle, "notifier").await;
            self.tasks.lock().idle_queue =
                Some(queue.unwrap_or_else(|| self.session.renew_queue()));
        }

        self.session.attach(Outbound::detached());
        self.session.set_connection_state(ConnectionState::Stopped);
        tracing::info!(url = %self.url, "Bridge stopped");
    }

    async fn join_bounded<T>(&self, mut handle: JoinHandle<T>, task: &'static str) -> Option<T> {
        match tokio::time::timeout(self.config.stop_timeout, &mut handle).await {
            Ok(Ok(output)) => Some(output),
            Ok(Err(e)) => {
                tracing::warn!(task, error = %e, "Background task failed");
                None
            }
            Err(_) => {
                tracing::warn!(task, "Background task did not stop in time, aborting");
                handle.abort();
                None
            }
        }
    }

    /// Waits until the resource table has been populated, at most `timeout`
    /// (default [`BridgeConfig::initial_load_timeout`]).
    ///
    /// Returns `true` if the table is ready. A `false` result is not an
    /// error: the bridge keeps connecting in the background and callers
    /// should treat the table as empty for now.
    pub async fn wait_for_initial_resources_load(&self, timeout: Option<Duration>) -> bool {
        let timeout = timeout.unwrap_or(self.config.initial_load_timeout);
        let mut initialized = self.session.watch_initialized();

        let loaded = matches!(
            tokio::time::timeout(timeout, initialized.wait_for(|ready| *ready)).await,
            Ok(Ok(_))
        );
        if !loaded {
            tracing::warn!(
                url = %self.url,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "Resources not loaded in time"
            );
        }
        loaded
    }

    /// Returns true once the resource table has been populated since the
    /// last [`start`](Self::start).
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.session.is_initialized()
    }

    // =========================================================================
    // Resources
    // =========================================================================

    /// Returns all resources of exactly `kind`, ordered by id.
    ///
    /// Related kinds are not included: asking for
    /// [`ResourceKind::Dimmer`] does not return LEDs or dimmer groups.
    #[must_use]
    pub fn get_resources_by_type(&self, kind: ResourceKind) -> Vec<Arc<Resource>> {
        self.session.registry.by_kind(kind)
    }

    /// Looks a resource up by id.
    #[must_use]
    pub fn get_resource_by_id(&self, id: ResourceId) -> Option<Arc<Resource>> {
        self.session.registry.get(id)
    }

    /// Looks a resource up by a raw JSON id. Non-integer ids yield `None`.
    #[must_use]
    pub fn get_resource_by_value(&self, id: &Value) -> Option<Arc<Resource>> {
        self.session.registry.get_by_value(id)
    }

    /// Returns all resources, ordered by id.
    #[must_use]
    pub fn resources(&self) -> Vec<Arc<Resource>> {
        self.session.registry.all()
    }

    /// Builds a resource from a descriptor and adds it to the table.
    ///
    /// Unsupported descriptors are logged and yield `None`.
    pub fn add_resource(&self, raw: &Value) -> Option<Arc<Resource>> {
        self.session
            .registry
            .add_resource(raw, &self.session.outbound())
    }

    /// Returns the snapshot the resource table was built from, if any.
    #[must_use]
    pub fn raw_data_model(&self) -> Option<Value> {
        self.session.raw_model()
    }

    // =========================================================================
    // Custom commands
    // =========================================================================

    /// Returns the known custom command names, sorted.
    ///
    /// This is the union of the configured names and every name announced
    /// by the bridge so far.
    #[must_use]
    pub fn get_ext_commands(&self) -> Vec<String> {
        self.session.ext_commands()
    }

    /// Sends a custom command on the current connection.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` without a connection, or the write
    /// error. Failures are also logged.
    pub async fn send_ext_command(&self, name: &str) -> Result<()> {
        let result = async {
            let text = ExtCommand::new(name).encode()?;
            self.session.outbound().send(text).await
        }
        .await;

        match &result {
            Ok(()) => tracing::debug!(command = name, "Custom command sent"),
            Err(e) => tracing::error!(command = name, error = %e, "Failed to send custom command"),
        }
        result
    }

    // =========================================================================
    // Weather
    // =========================================================================

    /// Returns the latest weather reading, or `None` before the first
    /// `set_weather` frame.
    #[must_use]
    pub fn get_weather_resources(&self) -> Option<Weather> {
        self.session.weather()
    }

    /// Registers a weather listener. Registering the same callback twice
    /// returns the existing subscription.
    pub fn register_weather_listener(&self, callback: &Callback) -> SubscriptionId {
        self.session.weather_listeners.register(callback)
    }

    /// Removes a weather listener. Returns false if it was not registered.
    pub fn unregister_weather_listener(&self, callback: &Callback) -> bool {
        self.session.weather_listeners.remove(callback)
    }

    // =========================================================================
    // Events and connection state
    // =========================================================================

    /// Subscribes to bridge events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.session.events.subscribe()
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.session.connection_state()
    }

    /// Watches the connection state.
    #[must_use]
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.session.watch_connection()
    }

    // =========================================================================
    // Host-driven transport
    // =========================================================================

    /// Applies one text frame received by a transport the host owns.
    ///
    /// Frames must be passed in arrival order. This may be called from a
    /// thread outside the runtime; callbacks still run on the notifier task
    /// of the runtime the bridge was created or started on. Without any
    /// runtime, notifications stay queued until [`start`](Self::start).
    pub fn process_frame(&self, text: &str) {
        self.session.dispatch(text);
        self.ensure_notifier();
    }

    /// Points the bridge and its resources at a connection the host owns.
    ///
    /// The host drains the receiving end of `outbound` and writes each
    /// frame to its socket.
    pub fn attach_outbound(&self, outbound: Outbound) {
        self.session.on_connected(outbound);
        self.ensure_notifier();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn span(&self) -> tracing::Span {
        tracing::info_span!("nexo_bridge", host = %self.config.host)
    }

    fn ensure_notifier(&self) {
        let mut tasks = self.tasks.lock();
        if let Ok(current) = Handle::try_current() {
            tasks.runtime = Some(current);
        }
        let Some(runtime) = tasks.runtime.clone() else {
            tracing::debug!("No Tokio runtime, notifications stay queued");
            return;
        };
        self.spawn_notifier(&runtime, &mut tasks);
    }

    fn spawn_notifier(&self, runtime: &Handle, tasks: &mut Tasks) {
        if tasks.notifier_running() {
            return;
        }
        let queue = tasks
            .idle_queue
            .take()
            .unwrap_or_else(|| self.session.renew_queue());
        let cancel = tasks.token();
        let notifier = notifier::run(Arc::clone(&self.session), queue, cancel);
        tasks.notifier = Some(runtime.spawn(notifier.instrument(self.span())));
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.tasks.get_mut().cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;

    const SNAPSHOT: &str = r#"{"op":"initial_data","resources":{
        "1":{"id":1,"type":"light","name":"Kitchen","state":{"is_on":0}},
        "2":{"id":2,"type":"dimmer","name":"Hall","state":{"is_on":1,"brightness":80}},
        "3":{"id":3,"type":"led","name":"Strip","state":{"is_on":0}}
    }}"#;

    fn bridge() -> Bridge {
        Bridge::new(BridgeConfig::new("127.0.0.1").with_ext_commands(["all_off"])).unwrap()
    }

    async fn wait_until(condition: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[test]
    fn empty_host_rejected() {
        let err = Bridge::new(BridgeConfig::new("")).unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::InvalidAddress(_))
        ));
    }

    #[test]
    fn start_requires_runtime() {
        let err = bridge().start().unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ConnectionFailed(_))
        ));
    }

    #[tokio::test]
    async fn frames_drive_resources_and_callbacks() {
        let bridge = bridge();
        bridge.process_frame(SNAPSHOT);
        assert!(bridge.is_initialized());

        let light = bridge.get_resource_by_id(ResourceId::new(1)).unwrap();
        assert!(!light.as_switch().unwrap().is_on());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback: Callback = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        light.register_callback(&callback);
        light.register_callback(&callback);

        bridge.process_frame(r#"{"op":"data_update","resources":{"x":{"id":1,"state":{"is_on":1}}}}"#);
        wait_until(|| calls.load(Ordering::SeqCst) == 1).await;
        assert!(light.as_switch().unwrap().is_on());

        bridge.stop().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn frames_from_foreign_threads_reach_callbacks() {
        let bridge = Arc::new(bridge());

        let feeder = Arc::clone(&bridge);
        std::thread::spawn(move || feeder.process_frame(SNAPSHOT))
            .join()
            .unwrap();
        let light = bridge.get_resource_by_id(ResourceId::new(1)).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        light.on_change(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let feeder = Arc::clone(&bridge);
        std::thread::spawn(move || {
            feeder.process_frame(
                r#"{"op":"data_update","resources":{"x":{"id":1,"state":{"is_on":1}}}}"#,
            );
        })
        .join()
        .unwrap();

        wait_until(|| calls.load(Ordering::SeqCst) == 1).await;
        assert!(light.as_switch().unwrap().is_on());
        bridge.stop().await;
    }

    #[test]
    fn frames_without_runtime_wait_for_start() {
        let bridge = bridge();
        bridge.process_frame(SNAPSHOT);
        let light = bridge.get_resource_by_id(ResourceId::new(1)).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        light.on_change(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        bridge.process_frame(r#"{"op":"data_update","resources":{"x":{"id":1,"state":{"is_on":1}}}}"#);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            bridge.attach_outbound(Outbound::detached());
            wait_until(|| calls.load(Ordering::SeqCst) == 1).await;
            bridge.stop().await;
        });
    }

    #[tokio::test]
    async fn exact_type_queries() {
        let bridge = bridge();
        bridge.process_frame(SNAPSHOT);

        assert_eq!(bridge.get_resources_by_type(ResourceKind::Dimmer).len(), 1);
        assert_eq!(bridge.get_resources_by_type(ResourceKind::Led).len(), 1);
        assert_eq!(bridge.resources().len(), 3);
        assert!(bridge.get_resource_by_id(ResourceId::new(999)).is_none());
        assert!(bridge.get_resource_by_value(&serde_json::json!("abc")).is_none());
    }

    #[tokio::test]
    async fn add_resource_skips_unsupported_mode() {
        let bridge = bridge();
        bridge.process_frame(SNAPSHOT);

        let added = bridge.add_resource(&serde_json::json!({
            "id": 7, "type": "temperature", "mode": 3, "name": "Odd"
        }));
        assert!(added.is_none());
        assert_eq!(bridge.resources().len(), 3);
    }

    #[tokio::test]
    async fn commands_follow_attached_outbound() {
        let bridge = bridge();
        bridge.process_frame(SNAPSHOT);
        let dimmer = bridge.get_resource_by_id(ResourceId::new(2)).unwrap();

        let err = dimmer.as_dimmer().unwrap().turn_off().await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));

        let (outbound, mut rx) = Outbound::channel(4);
        bridge.attach_outbound(outbound);
        let writer = tokio::spawn(async move {
            let mut texts = Vec::new();
            while let Some(frame) = rx.recv().await {
                let (text, ack) = frame.into_parts();
                texts.push(text);
                ack.complete(Ok(()));
            }
            texts
        });

        dimmer.as_dimmer().unwrap().set_brightness(0).await.unwrap();
        bridge.send_ext_command("all_off").await.unwrap();

        bridge.attach_outbound(Outbound::detached());
        let texts = writer.await.unwrap();
        assert_eq!(
            texts,
            [
                r#"{"type":"resource","id":2,"cmd":{"operation":0}}"#,
                r#"{"type":"ext_command","cmd":"all_off"}"#,
            ]
        );
    }

    #[tokio::test]
    async fn ext_commands_and_weather() {
        let bridge = bridge();
        let mut events = bridge.subscribe();

        bridge.process_frame(
            r#"{"op":"modifications","modifications":{"ext_commands":{"to_user":{"scene_movie":{}}}}}"#,
        );
        assert_eq!(bridge.get_ext_commands(), ["all_off", "scene_movie"]);
        assert_eq!(events.recv().await.unwrap(), BridgeEvent::ExtCommandsChanged);

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let listener: Callback = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        bridge.register_weather_listener(&listener);

        bridge.process_frame(
            r#"{"op":"set_weather","data":{"devices/0":{"pictogram":"FOG","air":{"temperature":3.5}}}}"#,
        );
        wait_until(|| calls.load(Ordering::SeqCst) == 1).await;
        let weather = bridge.get_weather_resources().unwrap();
        assert_eq!(weather.temperature(), Some(3.5));

        assert!(bridge.unregister_weather_listener(&listener));
        assert!(!bridge.unregister_weather_listener(&listener));
    }

    #[tokio::test]
    async fn raw_model_keeps_building_snapshot() {
        let bridge = bridge();
        assert!(bridge.raw_data_model().is_none());

        bridge.process_frame(SNAPSHOT);
        bridge.process_frame(
            r#"{"op":"initial_data","resources":{"1":{"id":1,"type":"light","name":"Kitchen","state":{"is_on":1}}}}"#,
        );

        let raw = bridge.raw_data_model().unwrap();
        assert_eq!(raw["resources"]["3"]["name"], "Strip");
        assert_eq!(bridge.resources().len(), 3);
    }

    #[tokio::test]
    async fn wait_times_out_without_snapshot() {
        let bridge = bridge();
        assert!(
            !bridge
                .wait_for_initial_resources_load(Some(Duration::from_millis(20)))
                .await
        );

        bridge.process_frame(SNAPSHOT);
        assert!(
            bridge
                .wait_for_initial_resources_load(Some(Duration::from_millis(20)))
                .await
        );
    }

    #[tokio::test]
    async fn stop_without_start_is_harmless() {
        let bridge = bridge();
        bridge.stop().await;
        assert_eq!(bridge.connection_state(), ConnectionState::Stopped);
        bridge.stop().await;
    }
}
