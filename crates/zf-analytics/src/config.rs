// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AnalyticsError, Result};

/// Collection endpoint used when none is configured.
pub const DEFAULT_EVENT_ENDPOINT: &str = "https://events.zerofirst.io/api/v1/gateway/events";
/// Upper bound on a single send.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_EVENT_ENDPOINT: &str = "ZF_ANALYTICS_EVENT_ENDPOINT";
pub const ENV_WRITE_KEY: &str = "ZF_ANALYTICS_WRITE_KEY";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ZF_ANALYTICS_REQUEST_TIMEOUT_SECS";

/// Settings fixed for the lifetime of a client.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsConfig {
	/// Where envelopes are POSTed.
	pub event_endpoint: String,
	/// Credential sent as `X-Api-Key`. An empty key is accepted here and
	/// rejected by the server.
	pub write_key: String,
	#[serde(rename = "requestTimeoutSecs", with = "duration_secs")]
	pub request_timeout: Duration,
}

impl Default for AnalyticsConfig {
	fn default() -> Self {
		Self {
			event_endpoint: DEFAULT_EVENT_ENDPOINT.to_string(),
			write_key: String::new(),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

impl fmt::Debug for AnalyticsConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnalyticsConfig")
			.field("event_endpoint", &self.event_endpoint)
			.field("write_key", &"[REDACTED]")
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}

impl AnalyticsConfig {
	/// Reads `ZF_ANALYTICS_*` variables, using defaults for unset ones.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Like [`AnalyticsConfig::from_env`] with a custom variable source.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(endpoint) = lookup(ENV_EVENT_ENDPOINT).filter(|s| !s.is_empty()) {
			config.event_endpoint = endpoint;
		}
		if let Some(write_key) = lookup(ENV_WRITE_KEY) {
			config.write_key = write_key;
		}
		if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS).filter(|s| !s.is_empty()) {
			let secs: u64 = secs.trim().parse().map_err(|e| {
				AnalyticsError::Configuration(format!("invalid {ENV_REQUEST_TIMEOUT_SECS}: {e}"))
			})?;
			config.request_timeout = Duration::from_secs(secs);
		}

		Ok(config)
	}
}

mod duration_secs {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer};

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		u64::deserialize(deserializer).map(Duration::from_secs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn defaults() {
		let config = AnalyticsConfig::default();
		assert_eq!(config.event_endpoint, DEFAULT_EVENT_ENDPOINT);
		assert!(config.write_key.is_empty());
		assert_eq!(config.request_timeout, Duration::from_secs(10));
	}

	#[test]
	fn debug_redacts_write_key() {
		let config = AnalyticsConfig {
			write_key: "super-secret-key".to_string(),
			..Default::default()
		};
		let debug = format!("{config:?}");
		assert!(!debug.contains("super-secret-key"));
		assert!(debug.contains("[REDACTED]"));
	}

	#[test]
	fn lookup_overrides_defaults() {
		let config = AnalyticsConfig::from_lookup(lookup_from(&[
			(ENV_EVENT_ENDPOINT, "http://localhost:9000/events"),
			(ENV_WRITE_KEY, "wk"),
			(ENV_REQUEST_TIMEOUT_SECS, "3"),
		]))
		.unwrap();

		assert_eq!(config.event_endpoint, "http://localhost:9000/events");
		assert_eq!(config.write_key, "wk");
		assert_eq!(config.request_timeout, Duration::from_secs(3));
	}

	#[test]
	fn empty_lookup_is_default() {
		let config = AnalyticsConfig::from_lookup(lookup_from(&[])).unwrap();
		assert_eq!(config, AnalyticsConfig::default());
	}

	#[test]
	fn invalid_timeout_is_configuration_error() {
		let result =
			AnalyticsConfig::from_lookup(lookup_from(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")]));
		assert!(matches!(result, Err(AnalyticsError::Configuration(_))));
	}

	#[test]
	fn deserializes_partial_json() {
		let config: AnalyticsConfig =
			serde_json::from_str(r#"{"writeKey": "wk", "requestTimeoutSecs": 5}"#).unwrap();
		assert_eq!(config.event_endpoint, DEFAULT_EVENT_ENDPOINT);
		assert_eq!(config.write_key, "wk");
		assert_eq!(config.request_timeout, Duration::from_secs(5));
	}
}
