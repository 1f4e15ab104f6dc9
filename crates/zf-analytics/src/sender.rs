// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery of envelopes to the collection endpoint.
//!
//! Delivery is best-effort: one attempt per envelope, no retry and no
//! queue. Failures are logged and returned to the caller.

use reqwest::Client;
use tracing::{debug, error, info};
use zf_analytics_core::Envelope;

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};

/// Header carrying the write key.
pub const WRITE_KEY_HEADER: &str = "X-Api-Key";

/// Delivers one envelope.
#[async_trait::async_trait]
pub trait EventSender: Send + Sync + std::fmt::Debug {
	async fn send(&self, envelope: &Envelope) -> Result<()>;
}

/// Sends each envelope as a single JSON `POST`.
pub struct HttpEventSender {
	http_client: Client,
	event_endpoint: String,
	write_key: String,
}

impl std::fmt::Debug for HttpEventSender {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HttpEventSender")
			.field("event_endpoint", &self.event_endpoint)
			.field("write_key", &"[REDACTED]")
			.finish()
	}
}

impl HttpEventSender {
	pub fn new(config: &AnalyticsConfig) -> Result<Self> {
		let http_client = zf_common_http::builder()
			.timeout(config.request_timeout)
			.build()
			.map_err(|e| AnalyticsError::Configuration(format!("failed to build HTTP client: {e}")))?;

		Ok(Self {
			http_client,
			event_endpoint: config.event_endpoint.clone(),
			write_key: config.write_key.clone(),
		})
	}
}

#[async_trait::async_trait]
impl EventSender for HttpEventSender {
	async fn send(&self, envelope: &Envelope) -> Result<()> {
		debug!(
			message_id = %envelope.message_id,
			event_type = %envelope.kind(),
			"Sending analytics event"
		);

		let response = self
			.http_client
			.post(&self.event_endpoint)
			.header(WRITE_KEY_HEADER, &self.write_key)
			.json(envelope)
			.send()
			.await
			.map_err(|e| {
				error!(
					message_id = %envelope.message_id,
					error = %e,
					"Failed to send analytics event"
				);
				AnalyticsError::RequestFailed(e)
			})?;

		if !response.status().is_success() {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			error!(
				message_id = %envelope.message_id,
				status,
				message = %message,
				"Analytics endpoint rejected event"
			);
			return Err(AnalyticsError::ServerError { status, message });
		}

		Ok(())
	}
}

/// Logs envelopes instead of sending them. Useful for local development.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSender;

#[async_trait::async_trait]
impl EventSender for LogEventSender {
	async fn send(&self, envelope: &Envelope) -> Result<()> {
		let body = serde_json::to_string(envelope)?;
		info!(
			message_id = %envelope.message_id,
			event_type = %envelope.kind(),
			body = %body,
			"Analytics event (not sent)"
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;
	use zf_analytics_core::{EventPayload, MessageId, OsRandomGenerator};

	fn envelope() -> Envelope {
		Envelope {
			payload: EventPayload::Track {
				event: "X".to_string(),
				properties: None,
			},
			anonymous_id: "anon".to_string(),
			user_id: None,
			timestamp: Utc::now(),
			message_id: MessageId::generate(&OsRandomGenerator).unwrap(),
		}
	}

	#[test]
	fn http_sender_debug_redacts_write_key() {
		let config = AnalyticsConfig {
			write_key: "super-secret-key".to_string(),
			..Default::default()
		};
		let sender = HttpEventSender::new(&config).unwrap();
		assert!(!format!("{sender:?}").contains("super-secret-key"));
	}

	#[test]
	fn log_sender_always_succeeds() {
		tokio_test::block_on(LogEventSender.send(&envelope())).unwrap();
	}

	#[tokio::test]
	async fn unreachable_endpoint_is_request_failed() {
		let config = AnalyticsConfig {
			event_endpoint: "http://127.0.0.1:1/events".to_string(),
			request_timeout: std::time::Duration::from_secs(2),
			..Default::default()
		};
		let sender = HttpEventSender::new(&config).unwrap();

		let err = sender.send(&envelope()).await.unwrap_err();
		assert!(matches!(err, AnalyticsError::RequestFailed(_)));
	}
}
