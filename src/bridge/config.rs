// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration types.

use std::time::Duration;

use crate::error::ProtocolError;

/// Default WebSocket port of a Nexo bridge.
pub const DEFAULT_PORT: u16 = 8766;

/// Configuration for a [`Bridge`](super::Bridge).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use nexo_lib::{BridgeConfig, ReconnectionPolicy};
///
/// let config = BridgeConfig::new("192.168.1.20")
///     .with_reconnection(ReconnectionPolicy::new().with_interval(Duration::from_secs(2)))
///     .with_ext_commands(["scene_evening", "  "]);
///
/// assert_eq!(config.url().unwrap(), "ws://192.168.1.20:8766/");
/// assert_eq!(config.ext_commands, vec!["scene_evening".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// The bridge host name or IP address.
    pub host: String,
    /// The WebSocket port (default 8766).
    pub port: u16,
    /// Reconnection and watchdog settings.
    pub reconnection: ReconnectionPolicy,
    /// Default timeout of [`Bridge::wait_for_initial_resources_load`](super::Bridge::wait_for_initial_resources_load).
    pub initial_load_timeout: Duration,
    /// Upper bound on how long [`Bridge::stop`](super::Bridge::stop) waits
    /// for background tasks.
    pub stop_timeout: Duration,
    /// Capacity of the bridge event channel.
    pub event_capacity: usize,
    /// Custom command names known up front.
    pub ext_commands: Vec<String>,
}

impl BridgeConfig {
    /// Creates a configuration for the bridge at `host`.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim().to_string(),
            port: DEFAULT_PORT,
            reconnection: ReconnectionPolicy::default(),
            initial_load_timeout: Duration::from_secs(10),
            stop_timeout: Duration::from_secs(5),
            event_capacity: 256,
            ext_commands: Vec::new(),
        }
    }

    /// Sets the WebSocket port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the reconnection policy.
    #[must_use]
    pub fn with_reconnection(mut self, policy: ReconnectionPolicy) -> Self {
        self.reconnection = policy;
        self
    }

    /// Sets the default initial load timeout.
    #[must_use]
    pub fn with_initial_load_timeout(mut self, timeout: Duration) -> Self {
        self.initial_load_timeout = timeout;
        self
    }

    /// Sets the stop timeout.
    #[must_use]
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Sets the event channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Adds custom command names. Names are trimmed; empty names are dropped.
    #[must_use]
    pub fn with_ext_commands<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ext_commands.extend(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty()),
        );
        self
    }

    /// Returns the WebSocket URL of the bridge.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty.
    pub fn url(&self) -> Result<String, ProtocolError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "bridge host must not be empty".to_string(),
            ));
        }
        Ok(format!("ws://{host}:{}/", self.port))
    }
}

/// Reconnection and liveness settings.
///
/// The bridge reconnects after a fixed interval; there is no backoff.
/// The watchdog runs on the same period and drops a connection that has
/// been silent for longer than `watchdog_timeout`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use nexo_lib::ReconnectionPolicy;
///
/// let policy = ReconnectionPolicy::new().with_interval(Duration::from_secs(2));
/// assert_eq!(policy.watchdog_timeout(), Some(Duration::from_secs(4)));
///
/// let policy = policy.without_watchdog();
/// assert_eq!(policy.watchdog_timeout(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectionPolicy {
    /// Delay between reconnect attempts; also the watchdog period.
    pub interval: Duration,
    /// Whether the watchdog is enabled.
    pub watchdog: bool,
    /// Explicit silence limit. Defaults to twice the interval.
    pub watchdog_limit: Option<Duration>,
}

impl ReconnectionPolicy {
    /// Creates a policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reconnect interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the silence limit of the watchdog.
    #[must_use]
    pub fn with_watchdog_timeout(mut self, timeout: Duration) -> Self {
        self.watchdog = true;
        self.watchdog_limit = Some(timeout);
        self
    }

    /// Disables the watchdog.
    #[must_use]
    pub fn without_watchdog(mut self) -> Self {
        self.watchdog = false;
        self
    }

    /// Returns the effective watchdog timeout, or `None` when disabled.
    #[must_use]
    pub fn watchdog_timeout(&self) -> Option<Duration> {
        self.watchdog
            .then(|| self.watchdog_limit.unwrap_or(self.interval * 2))
    }
}

impl Default for ReconnectionPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            watchdog: true,
            watchdog_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BridgeConfig::new(" 10.0.0.5 ");

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 8766);
        assert_eq!(config.initial_load_timeout, Duration::from_secs(10));
        assert_eq!(config.stop_timeout, Duration::from_secs(5));
        assert_eq!(config.event_capacity, 256);
        assert!(config.ext_commands.is_empty());
        assert_eq!(config.url().unwrap(), "ws://10.0.0.5:8766/");
    }

    #[test]
    fn empty_host_is_invalid() {
        let err = BridgeConfig::new("   ").url().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidAddress(_)));
    }

    #[test]
    fn builder_methods() {
        let config = BridgeConfig::new("nexo.local")
            .with_port(9000)
            .with_stop_timeout(Duration::from_millis(200))
            .with_initial_load_timeout(Duration::from_secs(1))
            .with_event_capacity(8)
            .with_ext_commands(vec![" a ", "", "b"]);

        assert_eq!(config.url().unwrap(), "ws://nexo.local:9000/");
        assert_eq!(config.stop_timeout, Duration::from_millis(200));
        assert_eq!(config.initial_load_timeout, Duration::from_secs(1));
        assert_eq!(config.event_capacity, 8);
        assert_eq!(config.ext_commands, ["a", "b"]);
    }

    #[test]
    fn reconnection_policy_default() {
        let policy = ReconnectionPolicy::default();

        assert_eq!(policy.interval, Duration::from_secs(5));
        assert!(policy.watchdog);
        assert_eq!(policy.watchdog_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn explicit_watchdog_timeout() {
        let policy = ReconnectionPolicy::new()
            .without_watchdog()
            .with_watchdog_timeout(Duration::from_secs(3));

        assert_eq!(policy.watchdog_timeout(), Some(Duration::from_secs(3)));
    }
}
