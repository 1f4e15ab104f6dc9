// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The event envelope sent to the collection endpoint.
//!
//! An envelope is the kind-specific payload (`identify`, `page`, `track`)
//! plus the identity stamp every event carries. It serializes to the flat
//! camelCase JSON object the endpoint expects:
//!
//! ```json
//! {
//!   "type": "track",
//!   "event": "User Sign Up",
//!   "properties": {"method": "form"},
//!   "anonymousId": "0b6f8c0e-...",
//!   "userId": "user@example.com",
//!   "timestamp": "2025-01-01T12:00:00.000Z",
//!   "messageId": "5d1c2a44-..."
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::id::MessageId;

/// A known user identifier, either text or a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserId {
	Text(String),
	Number(serde_json::Number),
}

impl UserId {
	/// An empty string is the only empty user id; numbers are never empty.
	pub fn is_empty(&self) -> bool {
		matches!(self, UserId::Text(s) if s.is_empty())
	}

	/// Returns true if both ids name the same person.
	///
	/// Ids are compared by their stored text form, so `5` and `"5"` match.
	pub fn same_identity(&self, other: &UserId) -> bool {
		self.to_string() == other.to_string()
	}

	pub fn to_value(&self) -> Value {
		match self {
			UserId::Text(s) => Value::String(s.clone()),
			UserId::Number(n) => Value::Number(n.clone()),
		}
	}
}

impl std::fmt::Display for UserId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			UserId::Text(s) => f.write_str(s),
			UserId::Number(n) => write!(f, "{n}"),
		}
	}
}

impl From<&str> for UserId {
	fn from(s: &str) -> Self {
		UserId::Text(s.to_string())
	}
}

impl From<String> for UserId {
	fn from(s: String) -> Self {
		UserId::Text(s)
	}
}

impl From<i64> for UserId {
	fn from(n: i64) -> Self {
		UserId::Number(n.into())
	}
}

impl From<u64> for UserId {
	fn from(n: u64) -> Self {
		UserId::Number(n.into())
	}
}

impl From<i32> for UserId {
	fn from(n: i32) -> Self {
		UserId::Number(n.into())
	}
}

impl From<u32> for UserId {
	fn from(n: u32) -> Self {
		UserId::Number(n.into())
	}
}

/// The three event kinds understood by the collection endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	Identify,
	Page,
	Track,
}

impl EventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			EventKind::Identify => "identify",
			EventKind::Page => "page",
			EventKind::Track => "track",
		}
	}
}

impl std::fmt::Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind-specific part of an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventPayload {
	Identify {
		#[serde(skip_serializing_if = "Option::is_none")]
		traits: Option<Map<String, Value>>,
	},
	Page {
		#[serde(skip_serializing_if = "Option::is_none")]
		name: Option<String>,
		properties: Map<String, Value>,
	},
	Track {
		event: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		properties: Option<Map<String, Value>>,
	},
}

impl EventPayload {
	pub fn kind(&self) -> EventKind {
		match self {
			EventPayload::Identify { .. } => EventKind::Identify,
			EventPayload::Page { .. } => EventKind::Page,
			EventPayload::Track { .. } => EventKind::Track,
		}
	}
}

/// A fully populated, validated event ready to be sent exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
	#[serde(flatten)]
	pub payload: EventPayload,
	pub anonymous_id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_id: Option<UserId>,
	#[serde(serialize_with = "iso_millis::serialize")]
	pub timestamp: DateTime<Utc>,
	pub message_id: MessageId,
}

impl Envelope {
	pub fn kind(&self) -> EventKind {
		self.payload.kind()
	}

	/// Properties of a `page` or `track` event, if any.
	pub fn properties(&self) -> Option<&Map<String, Value>> {
		match &self.payload {
			EventPayload::Page { properties, .. } => Some(properties),
			EventPayload::Track { properties, .. } => properties.as_ref(),
			EventPayload::Identify { .. } => None,
		}
	}

	/// Traits of an `identify` event, if any.
	pub fn traits(&self) -> Option<&Map<String, Value>> {
		match &self.payload {
			EventPayload::Identify { traits } => traits.as_ref(),
			_ => None,
		}
	}

	pub fn to_value(&self) -> serde_json::Result<Value> {
		serde_json::to_value(self)
	}
}

/// ISO-8601 UTC timestamps with millisecond precision and a `Z` suffix.
mod iso_millis {
	use chrono::{DateTime, SecondsFormat, Utc};
	use serde::Serializer;

	pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
	}
}
