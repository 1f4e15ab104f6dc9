// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Anonymous and known identity, persisted across sessions.
//!
//! Every browsing context has an anonymous id from the moment the manager
//! is constructed. Identifying as a known user links that anonymous id to
//! the user. Switching to a *different* known user drops the anonymous id,
//! so the next event starts a fresh anonymous context and the two people
//! are never merged.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};
use zf_analytics_core::{IdentifierGenerator, UserId};

use crate::error::Result;
use crate::store::{KeyValueStore, StoreChain};
use crate::sync::lock;

/// Storage key holding the anonymous id.
pub const ANONYMOUS_ID_KEY: &str = "zf_anonymousId";
/// Storage key holding the known user id.
pub const USER_ID_KEY: &str = "zf_userId";

/// Both ids as read under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentitySnapshot {
	pub anonymous_id: String,
	pub user_id: Option<UserId>,
}

/// Reads and writes identity through a [`StoreChain`].
///
/// Compound operations (read, compare, write) hold an internal lock so
/// concurrent callers in the same process never interleave them. Events
/// take their ids from [`IdentityManager::snapshot`], which never pairs one
/// user's anonymous id with another user's id. The lock is never held
/// across an `.await`.
#[derive(Debug)]
pub struct IdentityManager {
	store: StoreChain,
	ids: Arc<dyn IdentifierGenerator>,
	guard: Mutex<()>,
}

impl IdentityManager {
	/// Creates a manager and makes sure an anonymous id exists.
	pub fn new(store: StoreChain, ids: Arc<dyn IdentifierGenerator>) -> Result<Self> {
		let manager = Self {
			store,
			ids,
			guard: Mutex::new(()),
		};
		let anonymous_id = manager.anonymous_id()?;
		debug!(anonymous_id = %anonymous_id, "identity initialized");
		Ok(manager)
	}

	/// Returns the anonymous id, generating and persisting one if absent.
	pub fn anonymous_id(&self) -> Result<String> {
		let _guard = lock(&self.guard);
		self.anonymous_id_locked()
	}

	fn anonymous_id_locked(&self) -> Result<String> {
		if let Some(existing) = self.store.get_and_sync(ANONYMOUS_ID_KEY)? {
			return Ok(existing);
		}

		let fresh = self.ids.next_id()?;
		self.store.set(ANONYMOUS_ID_KEY, &fresh)?;
		info!(anonymous_id = %fresh, "new anonymous id");
		Ok(fresh)
	}

	/// Persists `id` as the anonymous id; `None` or empty deletes it.
	pub fn set_anonymous_id(&self, id: Option<&str>) -> Result<()> {
		let _guard = lock(&self.guard);
		match id.filter(|id| !id.is_empty()) {
			Some(id) => self.store.set(ANONYMOUS_ID_KEY, id)?,
			None => self.store.delete(ANONYMOUS_ID_KEY)?,
		}
		Ok(())
	}

	/// Returns the known user id, if any.
	///
	/// Stored ids are text; a numeric id comes back as its decimal string.
	pub fn user_id(&self) -> Result<Option<UserId>> {
		let _guard = lock(&self.guard);
		self.user_id_locked()
	}

	fn user_id_locked(&self) -> Result<Option<UserId>> {
		Ok(self.store.get_and_sync(USER_ID_KEY)?.map(UserId::Text))
	}

	/// Reads the anonymous id and the known user id together.
	pub fn snapshot(&self) -> Result<IdentitySnapshot> {
		let _guard = lock(&self.guard);
		self.snapshot_locked()
	}

	fn snapshot_locked(&self) -> Result<IdentitySnapshot> {
		Ok(IdentitySnapshot {
			anonymous_id: self.anonymous_id_locked()?,
			user_id: self.user_id_locked()?,
		})
	}

	/// Persists the known user id.
	///
	/// When a different user id was already stored, the anonymous id is
	/// deleted so the new user gets a fresh anonymous context. `None` or an
	/// empty id deletes the user id only.
	pub fn set_user_id(&self, id: Option<&UserId>) -> Result<()> {
		let _guard = lock(&self.guard);
		self.set_user_id_locked(id)
	}

	fn set_user_id_locked(&self, id: Option<&UserId>) -> Result<()> {
		let Some(id) = id.filter(|id| !id.is_empty()) else {
			self.store.delete(USER_ID_KEY)?;
			return Ok(());
		};

		let next = id.to_string();
		let previous = self.store.get_and_sync(USER_ID_KEY)?;
		self.store.set(USER_ID_KEY, &next)?;

		if let Some(previous) = previous {
			if previous != next {
				info!(
					previous_user_id = %previous,
					user_id = %next,
					"user changed, dropping anonymous id"
				);
				self.store.delete(ANONYMOUS_ID_KEY)?;
			}
		}
		Ok(())
	}

	/// Records `id` as the known user. Empty ids are ignored.
	pub fn identify(&self, id: &UserId) -> Result<()> {
		if id.is_empty() {
			debug!("ignoring empty user id");
			return Ok(());
		}
		self.set_user_id(Some(id))
	}

	/// Records `id` as the known user and reads back the resulting identity
	/// without letting another identity change slip in between.
	pub fn identify_and_snapshot(&self, id: &UserId) -> Result<IdentitySnapshot> {
		let _guard = lock(&self.guard);
		if id.is_empty() {
			debug!("ignoring empty user id");
		} else {
			self.set_user_id_locked(Some(id))?;
		}
		self.snapshot_locked()
	}

	/// Forgets the known user. The anonymous id is kept.
	pub fn reset(&self) -> Result<()> {
		self.set_user_id(None)
	}
}
