// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Builder for event properties and identify traits.

use serde_json::{Map, Value};

/// String-keyed properties for `page`/`track` events or `identify` traits.
///
/// Keys are unique; setting a key twice keeps the last value.
///
/// # Example
///
/// ```
/// use zf_analytics::Properties;
///
/// let traits = Properties::new()
///     .set("name", "Demo User")
///     .set("email", "demo@example.com")
///     .set("age", 30);
/// assert_eq!(traits.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
	map: Map<String, Value>,
}

impl Properties {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `key` to `value`, replacing any earlier value.
	pub fn set<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.map.insert(key.into(), value.into());
		self
	}

	/// Sets `key` only when `value` is present.
	pub fn set_opt<K, V>(self, key: K, value: Option<V>) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		match value {
			Some(value) => self.set(key, value),
			None => self,
		}
	}

	/// Layers `self` over `base`; keys in `self` win.
	pub fn over(self, base: Map<String, Value>) -> Self {
		let mut map = base;
		map.extend(self.map);
		Self { map }
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.map.get(key)
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.map
	}
}

impl From<Properties> for Value {
	fn from(props: Properties) -> Self {
		Value::Object(props.map)
	}
}

impl From<Map<String, Value>> for Properties {
	fn from(map: Map<String, Value>) -> Self {
		Self { map }
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			map: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn set_replaces_existing_key() {
		let props = Properties::new().set("plan", "free").set("plan", "pro");
		assert_eq!(props.len(), 1);
		assert_eq!(props.get("plan"), Some(&Value::from("pro")));
	}

	#[test]
	fn set_opt_skips_none() {
		let props = Properties::new()
			.set_opt("author", Some("Ana"))
			.set_opt::<_, &str>("editor", None);
		assert_eq!(props.len(), 1);
		assert!(props.get("editor").is_none());
	}

	#[test]
	fn over_lets_own_keys_win() {
		let mut base = Map::new();
		base.insert("url".to_string(), Value::from("https://example.com"));
		base.insert("title".to_string(), Value::from("Home"));

		let merged = Properties::new().set("url", "override").over(base);

		assert_eq!(merged.len(), 2);
		assert_eq!(merged.get("url"), Some(&Value::from("override")));
		assert_eq!(merged.get("title"), Some(&Value::from("Home")));
	}

	#[test]
	fn converts_into_object_value() {
		let value: Value = Properties::new().set("a", 1).into();
		assert_eq!(value, serde_json::json!({"a": 1}));
	}

	#[test]
	fn collects_from_pairs() {
		let props: Properties = vec![("a", 1), ("b", 2)].into_iter().collect();
		assert_eq!(props.len(), 2);
	}

	proptest! {
		#[test]
		fn len_matches_unique_keys(keys in proptest::collection::vec("[a-z]{1,10}", 0..20)) {
			let unique: std::collections::HashSet<_> = keys.iter().cloned().collect();
			let props = keys.iter().fold(Properties::new(), |p, k| p.set(k.clone(), true));
			prop_assert_eq!(props.len(), unique.len());
		}
	}
}
