// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::StoreError;
use crate::sync::lock;

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, key: &str) -> bool {
		lock(&self.entries).contains_key(key)
	}

	pub fn len(&self) -> usize {
		lock(&self.entries).len()
	}

	pub fn is_empty(&self) -> bool {
		lock(&self.entries).is_empty()
	}
}

impl KeyValueStore for MemoryStore {
	fn name(&self) -> &'static str {
		"memory"
	}

	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(lock(&self.entries).get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		lock(&self.entries).insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn delete(&self, key: &str) -> Result<(), StoreError> {
		lock(&self.entries).remove(key);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_get_delete() {
		let store = MemoryStore::new();
		assert_eq!(store.get("k").unwrap(), None);

		store.set("k", "v").unwrap();
		assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
		assert!(store.contains("k"));

		store.delete("k").unwrap();
		assert!(store.is_empty());
	}

	#[test]
	fn delete_missing_key_is_ok() {
		let store = MemoryStore::new();
		assert!(store.delete("missing").is_ok());
	}
}
