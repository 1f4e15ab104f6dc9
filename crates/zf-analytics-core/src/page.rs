// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page context merged into every `page` event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where the host application currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
	pub url: String,
	pub title: String,
}

impl PageContext {
	pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			title: title.into(),
		}
	}

	/// Returns the context as the base layer of `page` properties.
	pub fn to_properties(&self) -> Map<String, Value> {
		let mut map = Map::new();
		map.insert("url".to_string(), Value::String(self.url.clone()));
		map.insert("title".to_string(), Value::String(self.title.clone()));
		map
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn to_properties_has_exactly_url_and_title() {
		let ctx = PageContext::new("https://example.com/news", "News");
		let props = ctx.to_properties();
		assert_eq!(props.len(), 2);
		assert_eq!(props["url"], "https://example.com/news");
		assert_eq!(props["title"], "News");
	}

	#[test]
	fn default_context_is_empty_strings() {
		let props = PageContext::default().to_properties();
		assert_eq!(props["url"], "");
		assert_eq!(props["title"], "");
	}
}
