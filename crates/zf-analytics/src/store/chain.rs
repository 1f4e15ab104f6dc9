// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tracing::{debug, warn};

use super::{KeyValueStore, MemoryStore};
use crate::error::StoreError;

/// Ordered chain of backing stores acting as one logical store.
///
/// - `get` returns the first non-empty value, skipping stores that fail
/// - `set` and `delete` apply to every store and fail only if all of them do
/// - [`StoreChain::get_and_sync`] writes a found value back to every store
///
/// Multi-store writes are sequential and not transactional. A partial write
/// heals on the next `get_and_sync`.
#[derive(Debug)]
pub struct StoreChain {
	stores: Vec<Box<dyn KeyValueStore>>,
}

impl StoreChain {
	pub fn new(stores: Vec<Box<dyn KeyValueStore>>) -> Self {
		Self { stores }
	}

	/// A chain holding a single [`MemoryStore`].
	pub fn in_memory() -> Self {
		Self::new(vec![Box::new(MemoryStore::new())])
	}

	pub fn len(&self) -> usize {
		self.stores.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stores.is_empty()
	}

	/// Reads `key` and replicates the value to every store.
	///
	/// A failed repair is logged, not returned: the value was read
	/// successfully and the next access retries the repair.
	pub fn get_and_sync(&self, key: &str) -> Result<Option<String>, StoreError> {
		let value = self.get(key)?;
		if let Some(value) = &value {
			if let Err(e) = self.set(key, value) {
				warn!(key = %key, error = %e, "read-repair failed");
			}
		}
		Ok(value)
	}

	fn for_each_store(
		&self,
		operation: &'static str,
		key: &str,
		mut apply: impl FnMut(&dyn KeyValueStore) -> Result<(), StoreError>,
	) -> Result<(), StoreError> {
		let mut failures = 0;
		for store in &self.stores {
			if let Err(e) = apply(store.as_ref()) {
				warn!(
					store = store.name(),
					key = %key,
					operation,
					error = %e,
					"backing store write failed"
				);
				failures += 1;
			}
		}

		if failures > 0 && failures == self.stores.len() {
			return Err(StoreError::AllStoresFailed {
				operation,
				stores: failures,
			});
		}
		Ok(())
	}
}

impl KeyValueStore for StoreChain {
	fn name(&self) -> &'static str {
		"chain"
	}

	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		let mut failures = 0;
		for store in &self.stores {
			match store.get(key) {
				Ok(Some(value)) if !value.is_empty() => {
					debug!(store = store.name(), key = %key, "value found");
					return Ok(Some(value));
				}
				Ok(_) => {}
				Err(e) => {
					warn!(
						store = store.name(),
						key = %key,
						error = %e,
						"backing store read failed, trying next store"
					);
					failures += 1;
				}
			}
		}

		if failures > 0 && failures == self.stores.len() {
			return Err(StoreError::AllStoresFailed {
				operation: "get",
				stores: failures,
			});
		}
		Ok(None)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.for_each_store("set", key, |store| store.set(key, value))
	}

	fn delete(&self, key: &str) -> Result<(), StoreError> {
		self.for_each_store("delete", key, |store| store.delete(key))
	}
}
