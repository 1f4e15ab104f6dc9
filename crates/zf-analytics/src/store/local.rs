// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{json_file, KeyValueStore};
use crate::error::StoreError;
use crate::sync::lock;

/// Device-local store persisted as a JSON file. Entries never expire.
///
/// Reads surface a malformed file; writes replace it.
#[derive(Debug)]
pub struct LocalStore {
	path: PathBuf,
	guard: Mutex<()>,
}

impl LocalStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			guard: Mutex::new(()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
		json_file::load(&self.path)
	}
}

impl KeyValueStore for LocalStore {
	fn name(&self) -> &'static str {
		"local"
	}

	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		let _guard = lock(&self.guard);
		Ok(self.load()?.remove(key))
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		let _guard = lock(&self.guard);
		let mut entries: BTreeMap<String, String> = json_file::load_for_write(&self.path)?;
		entries.insert(key.to_string(), value.to_string());
		json_file::save(&self.path, &entries)
	}

	fn delete(&self, key: &str) -> Result<(), StoreError> {
		let _guard = lock(&self.guard);
		match self.load() {
			Ok(mut entries) => {
				if entries.remove(key).is_some() {
					json_file::save(&self.path, &entries)?;
				}
				Ok(())
			}
			Err(StoreError::Malformed { .. }) => {
				let entries: BTreeMap<String, String> = json_file::load_for_write(&self.path)?;
				json_file::save(&self.path, &entries)
			}
			Err(e) => Err(e),
		}
	}
}
