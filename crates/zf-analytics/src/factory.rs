// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Builds validated, identity-stamped envelopes.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use zf_analytics_core::{
	validate, Envelope, EventPayload, IdentifierGenerator, MessageId, PageContext, UserId,
};

use crate::error::Result;
use crate::identity::{IdentityManager, IdentitySnapshot};
use crate::properties::Properties;

/// Turns caller input into envelopes.
///
/// The caller-supplied shape is validated first, as JSON, so that a bad
/// value is reported with the field it came from. Only then is the shape
/// converted into a typed payload and stamped with the anonymous id and
/// known user id, both from one [`IdentitySnapshot`], plus the current time
/// and a fresh message id.
#[derive(Debug, Clone)]
pub struct EventFactory {
	identity: Arc<IdentityManager>,
	ids: Arc<dyn IdentifierGenerator>,
}

impl EventFactory {
	pub fn new(identity: Arc<IdentityManager>, ids: Arc<dyn IdentifierGenerator>) -> Self {
		Self { identity, ids }
	}

	pub fn identify(&self, user_id: Option<&UserId>, traits: Option<Value>) -> Result<Envelope> {
		let payload = identify_payload(user_id, traits)?;
		self.populate(payload)
	}

	/// Like [`EventFactory::identify`], stamped with an identity the caller
	/// already read.
	pub fn identify_as(
		&self,
		identity: IdentitySnapshot,
		user_id: Option<&UserId>,
		traits: Option<Value>,
	) -> Result<Envelope> {
		let payload = identify_payload(user_id, traits)?;
		self.stamp(payload, identity)
	}

	/// Builds a `page` event whose properties are `ctx` overlaid with the
	/// caller's properties. Caller keys win.
	pub fn page(
		&self,
		name: Option<&str>,
		properties: Option<Value>,
		ctx: &PageContext,
	) -> Result<Envelope> {
		let properties = match properties {
			None | Some(Value::Null) => Value::Object(ctx.to_properties()),
			Some(Value::Object(own)) => Properties::from(own).over(ctx.to_properties()).into(),
			// Left unmerged so validation reports it.
			Some(other) => other,
		};

		let mut shape = Map::new();
		shape.insert("type".to_string(), Value::from("page"));
		if let Some(name) = name.filter(|name| !name.is_empty()) {
			shape.insert("name".to_string(), Value::from(name));
		}
		shape.insert("properties".to_string(), properties);

		let mut fields = checked(shape)?;
		let name = match fields.remove("name") {
			Some(Value::String(name)) => Some(name),
			_ => None,
		};
		let payload = EventPayload::Page {
			name,
			properties: take_object(&mut fields, "properties").unwrap_or_default(),
		};
		self.populate(payload)
	}

	pub fn track(&self, event: &str, properties: Option<Value>) -> Result<Envelope> {
		let mut shape = Map::new();
		shape.insert("type".to_string(), Value::from("track"));
		shape.insert("event".to_string(), Value::from(event));
		if let Some(properties) = properties {
			shape.insert("properties".to_string(), properties);
		}

		let mut fields = checked(shape)?;
		let payload = EventPayload::Track {
			event: event.to_string(),
			properties: take_object(&mut fields, "properties"),
		};
		self.populate(payload)
	}

	fn populate(&self, payload: EventPayload) -> Result<Envelope> {
		let identity = self.identity.snapshot()?;
		self.stamp(payload, identity)
	}

	fn stamp(&self, payload: EventPayload, identity: IdentitySnapshot) -> Result<Envelope> {
		Ok(Envelope {
			payload,
			anonymous_id: identity.anonymous_id,
			user_id: identity.user_id,
			timestamp: Utc::now(),
			message_id: MessageId::generate(self.ids.as_ref())?,
		})
	}
}

fn identify_payload(user_id: Option<&UserId>, traits: Option<Value>) -> Result<EventPayload> {
	let mut shape = Map::new();
	shape.insert("type".to_string(), Value::from("identify"));
	if let Some(user_id) = user_id {
		shape.insert("userId".to_string(), user_id.to_value());
	}
	if let Some(traits) = traits {
		shape.insert("traits".to_string(), traits);
	}

	let mut fields = checked(shape)?;
	Ok(EventPayload::Identify {
		traits: take_object(&mut fields, "traits"),
	})
}

fn checked(shape: Map<String, Value>) -> Result<Map<String, Value>> {
	let mut shape = Value::Object(shape);
	validate(&shape)?;
	Ok(shape.as_object_mut().map(std::mem::take).unwrap_or_default())
}

fn take_object(fields: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
	match fields.remove(key) {
		Some(Value::Object(map)) => Some(map),
		_ => None,
	}
}
