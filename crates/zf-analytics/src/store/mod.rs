// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Durable key-value storage for identity keys.
//!
//! Each storage mechanism can be cleared independently of the others (a
//! user wiping cookies, a sandbox wiping app data), so identity is
//! replicated across an ordered [`StoreChain`] of backing stores:
//!
//! - [`CookieStore`]: cookie jar file, entries expire (365 days by default)
//! - [`LocalStore`]: device-local file, entries never expire
//! - [`MemoryStore`]: process-local, for tests and ephemeral contexts
//!
//! Reads return the first value found and write it back to every store
//! (read-repair), writes and deletes go to every store.

mod chain;
mod cookie;
mod json_file;
mod local;
mod memory;

use std::sync::Arc;

pub use chain::StoreChain;
pub use cookie::{CookieStore, DEFAULT_COOKIE_MAX_AGE_DAYS, DEFAULT_COOKIE_PATH};
pub use local::LocalStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// A single string-keyed storage mechanism.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
	/// Short name used in log fields.
	fn name(&self) -> &'static str;

	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

	fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
	fn name(&self) -> &'static str {
		(**self).name()
	}

	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		(**self).get(key)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		(**self).set(key, value)
	}

	fn delete(&self, key: &str) -> Result<(), StoreError> {
		(**self).delete(key)
	}
}
