// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{json_file, KeyValueStore};
use crate::error::StoreError;
use crate::sync::lock;

/// Cookies written by the SDK live this long unless rewritten.
pub const DEFAULT_COOKIE_MAX_AGE_DAYS: i64 = 365;
/// Path attribute recorded on every cookie; the jar is site-wide.
pub const DEFAULT_COOKIE_PATH: &str = "/";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Cookie {
	value: String,
	path: String,
	expires_at: DateTime<Utc>,
}

impl Cookie {
	fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expires_at <= now
	}
}

/// Cookie jar persisted as a JSON file.
///
/// Every write renews the cookie's expiry; expired cookies read as absent
/// and are pruned on the next write. A jar file that no longer parses is
/// replaced by the next write.
#[derive(Debug)]
pub struct CookieStore {
	path: PathBuf,
	max_age: Duration,
	guard: Mutex<()>,
}

impl CookieStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			max_age: Duration::days(DEFAULT_COOKIE_MAX_AGE_DAYS),
			guard: Mutex::new(()),
		}
	}

	/// Overrides how long written cookies stay valid.
	pub fn with_max_age(mut self, max_age: Duration) -> Self {
		self.max_age = max_age;
		self
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load(&self) -> Result<BTreeMap<String, Cookie>, StoreError> {
		json_file::load(&self.path)
	}

	fn load_for_write(&self) -> Result<BTreeMap<String, Cookie>, StoreError> {
		json_file::load_for_write(&self.path)
	}

	fn save_pruned(&self, mut jar: BTreeMap<String, Cookie>) -> Result<(), StoreError> {
		let now = Utc::now();
		jar.retain(|_, cookie| !cookie.is_expired(now));
		json_file::save(&self.path, &jar)
	}
}

impl KeyValueStore for CookieStore {
	fn name(&self) -> &'static str {
		"cookie"
	}

	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		let _guard = lock(&self.guard);
		let jar = self.load()?;
		let now = Utc::now();
		Ok(jar
			.get(key)
			.filter(|cookie| !cookie.is_expired(now))
			.map(|cookie| cookie.value.clone()))
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		let _guard = lock(&self.guard);
		let mut jar = self.load_for_write()?;
		jar.insert(
			key.to_string(),
			Cookie {
				value: value.to_string(),
				path: DEFAULT_COOKIE_PATH.to_string(),
				expires_at: Utc::now() + self.max_age,
			},
		);
		self.save_pruned(jar)
	}

	fn delete(&self, key: &str) -> Result<(), StoreError> {
		let _guard = lock(&self.guard);
		let (mut jar, repaired) = match self.load() {
			Ok(jar) => (jar, false),
			Err(StoreError::Malformed { .. }) => (self.load_for_write()?, true),
			Err(e) => return Err(e),
		};
		if jar.remove(key).is_none() && !repaired {
			return Ok(());
		}
		self.save_pruned(jar)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn store_in(dir: &tempfile::TempDir) -> CookieStore {
		CookieStore::new(dir.path().join("cookies.json"))
	}

	#[test]
	fn set_then_get() {
		let dir = tempfile::tempdir().unwrap();
		let store = store_in(&dir);

		store.set("zf_userId", "user@example.com").unwrap();
		assert_eq!(
			store.get("zf_userId").unwrap().as_deref(),
			Some("user@example.com")
		);
	}

	#[test]
	fn values_survive_reopening_the_jar() {
		let dir = tempfile::tempdir().unwrap();
		store_in(&dir).set("k", "v").unwrap();

		let reopened = store_in(&dir);
		assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
	}

	#[test]
	fn written_cookie_carries_path_and_year_expiry() {
		let dir = tempfile::tempdir().unwrap();
		let store = store_in(&dir);
		store.set("k", "v").unwrap();

		let jar = store.load().unwrap();
		let cookie = &jar["k"];
		assert_eq!(cookie.path, "/");
		let remaining = cookie.expires_at - Utc::now();
		assert!(remaining > Duration::days(364));
		assert!(remaining <= Duration::days(365));
	}

	#[test]
	fn expired_cookie_reads_as_absent() {
		let dir = tempfile::tempdir().unwrap();
		let store = store_in(&dir).with_max_age(Duration::zero());

		store.set("k", "v").unwrap();
		assert_eq!(store.get("k").unwrap(), None);
	}

	#[test]
	fn expired_cookies_are_pruned_on_write() {
		let dir = tempfile::tempdir().unwrap();
		let short_lived = store_in(&dir).with_max_age(Duration::seconds(-1));
		short_lived.set("old", "v").unwrap();

		let store = store_in(&dir);
		store.set("new", "v").unwrap();

		let jar = store.load().unwrap();
		assert!(!jar.contains_key("old"));
		assert!(jar.contains_key("new"));
	}

	#[test]
	fn delete_removes_cookie() {
		let dir = tempfile::tempdir().unwrap();
		let store = store_in(&dir);
		store.set("k", "v").unwrap();

		store.delete("k").unwrap();
		assert_eq!(store.get("k").unwrap(), None);
	}

	#[test]
	fn deleting_the_jar_file_clears_everything() {
		let dir = tempfile::tempdir().unwrap();
		let store = store_in(&dir);
		store.set("k", "v").unwrap();

		std::fs::remove_file(store.path()).unwrap();
		assert_eq!(store.get("k").unwrap(), None);
	}

	#[test]
	fn write_replaces_garbled_jar() {
		let dir = tempfile::tempdir().unwrap();
		let store = store_in(&dir);
		store.set("old", "v").unwrap();
		std::fs::write(store.path(), "{garbage").unwrap();

		assert!(matches!(store.get("old"), Err(StoreError::Malformed { .. })));
		store.set("k", "v").unwrap();
		assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
		assert_eq!(store.get("old").unwrap(), None);
	}

	#[test]
	fn delete_replaces_garbled_jar() {
		let dir = tempfile::tempdir().unwrap();
		let store = store_in(&dir);
		std::fs::write(store.path(), "{garbage").unwrap();

		store.delete("k").unwrap();
		assert_eq!(store.get("k").unwrap(), None);
	}
}
