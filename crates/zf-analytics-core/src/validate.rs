// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Structural validation of caller-supplied event shapes.
//!
//! The validator is a gate, not a sanitizer: it reports the first violation
//! and never rewrites its input. Checks run in this order:
//!
//! 1. the shape is a JSON object
//! 2. `type` is a non-empty string
//! 3. `userId`, when present, is a string or a number
//! 4. `identify`: `traits`, when present, is an object
//! 5. `track`: `event` is a non-empty string, `properties` is an object
//! 6. `page`: `name` is a string, `properties` is an object
//!
//! `null` counts as absent for every optional field.

use serde_json::Value;

use crate::error::ValidationError;

pub fn validate(shape: &Value) -> Result<(), ValidationError> {
	let Some(fields) = shape.as_object() else {
		return Err(ValidationError::new("envelope", "must be an object"));
	};

	let kind = match fields.get("type") {
		Some(Value::String(kind)) if !kind.is_empty() => kind.as_str(),
		_ => {
			return Err(ValidationError::new(
				"type",
				"is required and must be a non-empty string",
			))
		}
	};

	if let Some(user_id) = present(fields.get("userId")) {
		if !(user_id.is_string() || user_id.is_number()) {
			return Err(ValidationError::new(
				"userId",
				"must be a string or a number",
			));
		}
	}

	match kind {
		"identify" => {
			if !is_absent_or_object(fields.get("traits")) {
				return Err(ValidationError::new("traits", "must be an object"));
			}
		}
		"track" => {
			match fields.get("event") {
				Some(Value::String(event)) if !event.is_empty() => {}
				_ => {
					return Err(ValidationError::new(
						"event",
						"is required and must be a non-empty string for track events",
					))
				}
			}
			if !is_absent_or_object(fields.get("properties")) {
				return Err(ValidationError::new("properties", "must be an object"));
			}
		}
		"page" => {
			if let Some(name) = present(fields.get("name")) {
				if !name.is_string() {
					return Err(ValidationError::new("name", "must be a string"));
				}
			}
			if !is_absent_or_object(fields.get("properties")) {
				return Err(ValidationError::new("properties", "must be an object"));
			}
		}
		_ => {}
	}

	Ok(())
}

fn present(value: Option<&Value>) -> Option<&Value> {
	value.filter(|v| !v.is_null())
}

fn is_absent_or_object(value: Option<&Value>) -> bool {
	present(value).map_or(true, Value::is_object)
}
