// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: instrument a news site with the zf-analytics SDK.
//!
//! Run with:
//!   cargo run --example news_site -p zf-analytics
//!
//! Without `ZF_ANALYTICS_WRITE_KEY` events are logged instead of sent.
//! Set `RUST_LOG=debug` to see every send.

use std::sync::Arc;

use serde_json::Value;
use tracing_subscriber::EnvFilter;
use zf_analytics::{
	AnalyticsClient, AnalyticsConfig, LogEventSender, NavigationState, PageContext, Properties,
	Result,
};

struct User<'a> {
	name: &'a str,
	email: &'a str,
	age: u32,
	gender: &'a str,
}

impl User<'_> {
	fn traits(&self) -> Value {
		Properties::new()
			.set("name", self.name)
			.set("email", self.email)
			.set("age", self.age)
			.set("gender", self.gender)
			.into()
	}
}

struct Article<'a> {
	id: u64,
	title: &'a str,
	category: &'a str,
	author: &'a str,
	read_time: Option<u32>,
}

struct Promo<'a> {
	id: &'a str,
	position: &'a str,
	kind: &'a str,
}

/// Site-level tracking calls built on the SDK.
struct SiteTracker {
	analytics: Arc<AnalyticsClient>,
	nav: NavigationState,
}

impl SiteTracker {
	async fn sign_up(&self, user: &User<'_>) -> Result<()> {
		self.analytics
			.identify_user(user.email, Some(user.traits()))
			.await?;
		self.analytics
			.track("User Sign Up", Some(Properties::new().set("method", "form").into()))
			.await?;
		Ok(())
	}

	async fn sign_in(&self, user: &User<'_>) -> Result<()> {
		self.analytics
			.identify_user(user.email, Some(user.traits()))
			.await?;
		self.analytics
			.track("User Sign In", Some(Properties::new().set("method", "form").into()))
			.await?;
		Ok(())
	}

	async fn sign_out(&self) -> Result<()> {
		self.analytics.track("User Sign Out", None).await?;
		self.analytics.logout()
	}

	async fn article_view(&self, article: &Article<'_>) -> Result<()> {
		let properties = Properties::new()
			.set("article_id", article.id)
			.set("title", article.title)
			.set("category", article.category)
			.set("author", article.author)
			.set_opt("read_time", article.read_time);
		self.analytics
			.track("Article View", Some(properties.into()))
			.await?;
		Ok(())
	}

	async fn category_view(&self, category: &str) -> Result<()> {
		let properties = Properties::new().set("category", category);
		self.analytics
			.track("Category View", Some(properties.clone().into()))
			.await?;
		self.analytics
			.page(Some(&format!("Category: {category}")), Some(properties.into()))
			.await?;
		Ok(())
	}

	async fn ad_click(&self, promo: &Promo<'_>) -> Result<()> {
		let properties = Properties::new()
			.set("ad_id", promo.id)
			.set("position", promo.position)
			.set("type", promo.kind);
		self.analytics
			.track("Ad Click", Some(properties.into()))
			.await?;
		Ok(())
	}

	async fn survey_submission(&self, answers: Properties) -> Result<()> {
		self.analytics
			.track("Survey Submission", Some(answers.into()))
			.await?;
		Ok(())
	}

	async fn page_view(&self, url: &str, title: &str) -> Result<()> {
		self.nav.navigate(url, title);
		self.analytics.page(Some(title), None).await?;
		Ok(())
	}
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let config = AnalyticsConfig::from_env()?;
	let nav = NavigationState::new(PageContext::new("https://news.example.com/", "Home"));

	let mut builder = AnalyticsClient::builder()
		.config(config.clone())
		.data_dir(std::env::temp_dir().join("zf-analytics-demo"))
		.page_context(Arc::new(nav.clone()));
	if config.write_key.is_empty() {
		println!("ZF_ANALYTICS_WRITE_KEY not set, logging events instead of sending");
		builder = builder.sender(Arc::new(LogEventSender));
	}

	let analytics = zf_analytics::install(builder)?;
	let site = SiteTracker { analytics, nav };

	println!("Anonymous id: {}", site.analytics.anonymous_id()?);

	site.page_view("https://news.example.com/", "Home").await?;

	let reader = User {
		name: "Demo Reader",
		email: "reader@example.com",
		age: 34,
		gender: "unspecified",
	};
	site.sign_up(&reader).await?;

	site.page_view("https://news.example.com/world", "World").await?;
	site.category_view("World").await?;
	site.article_view(&Article {
		id: 1042,
		title: "Rivers reach record levels",
		category: "World",
		author: "Staff",
		read_time: Some(4),
	})
	.await?;

	site.ad_click(&Promo {
		id: "promo-7",
		position: "sidebar",
		kind: "banner",
	})
	.await?;

	site.survey_submission(
		Properties::new()
			.set("satisfaction", 4)
			.set("would_recommend", true),
	)
	.await?;

	site.sign_out().await?;
	site.sign_in(&reader).await?;

	println!("Known user: {:?}", site.analytics.user_id()?);
	println!("Done.");

	Ok(())
}
