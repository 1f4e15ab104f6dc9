// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sources of the current page context.

use std::sync::{Arc, RwLock};

use zf_analytics_core::PageContext;

/// Supplies the host application's current location for `page` events.
pub trait PageContextSource: Send + Sync + std::fmt::Debug {
	fn current(&self) -> PageContext;
}

/// A context that never changes.
#[derive(Debug, Clone, Default)]
pub struct StaticPageContext(pub PageContext);

impl StaticPageContext {
	pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
		Self(PageContext::new(url, title))
	}
}

impl PageContextSource for StaticPageContext {
	fn current(&self) -> PageContext {
		self.0.clone()
	}
}

/// Shared, mutable page context.
///
/// Clones share state: the host keeps one handle and calls
/// [`NavigationState::navigate`], the client reads through another.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
	current: Arc<RwLock<PageContext>>,
}

impl NavigationState {
	pub fn new(initial: PageContext) -> Self {
		Self {
			current: Arc::new(RwLock::new(initial)),
		}
	}

	pub fn navigate(&self, url: impl Into<String>, title: impl Into<String>) {
		let next = PageContext::new(url, title);
		match self.current.write() {
			Ok(mut current) => *current = next,
			Err(poisoned) => *poisoned.into_inner() = next,
		}
	}
}

impl PageContextSource for NavigationState {
	fn current(&self) -> PageContext {
		match self.current.read() {
			Ok(current) => current.clone(),
			Err(poisoned) => poisoned.into_inner().clone(),
		}
	}
}
