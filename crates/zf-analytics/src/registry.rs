// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Idempotent installation of a shared client.
//!
//! The first [`install`] builds the client. Every later call logs a warning
//! and returns the same handle without building again, so the identity and
//! configuration of the first install win.
//!
//! ```no_run
//! # fn main() -> zf_analytics::Result<()> {
//! let analytics = zf_analytics::install(
//!     zf_analytics::AnalyticsClient::builder().write_key("wk"),
//! )?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::client::{AnalyticsClient, AnalyticsClientBuilder};
use crate::error::Result;
use crate::sync::lock;

static GLOBAL: Registry = Registry::new();

/// Holds at most one installed client.
#[derive(Debug, Default)]
pub struct Registry {
	slot: Mutex<Option<Arc<AnalyticsClient>>>,
}

impl Registry {
	pub const fn new() -> Self {
		Self {
			slot: Mutex::new(None),
		}
	}

	/// Builds and stores a client, or returns the one already installed.
	pub fn install(&self, builder: AnalyticsClientBuilder) -> Result<Arc<AnalyticsClient>> {
		let mut slot = lock(&self.slot);
		if let Some(existing) = slot.as_ref() {
			warn!("analytics has already been initialized");
			return Ok(existing.clone());
		}

		let client = Arc::new(builder.build()?);
		*slot = Some(client.clone());
		info!("Analytics installed");
		Ok(client)
	}

	pub fn is_installed(&self) -> bool {
		lock(&self.slot).is_some()
	}

	pub fn get(&self) -> Option<Arc<AnalyticsClient>> {
		lock(&self.slot).clone()
	}
}

/// The process-wide registry.
pub fn global() -> &'static Registry {
	&GLOBAL
}

/// Installs into the process-wide registry.
pub fn install(builder: AnalyticsClientBuilder) -> Result<Arc<AnalyticsClient>> {
	GLOBAL.install(builder)
}
