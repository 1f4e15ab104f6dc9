// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-side telemetry SDK.
//!
//! Records `identify`, `page` and `track` events tagged with a persistent
//! anonymous id and, once known, a user id. Each event is validated,
//! stamped with a timestamp and a unique message id, and sent to the
//! collection endpoint in a single best-effort `POST`.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use zf_analytics::{AnalyticsClient, Properties};
//!
//! # async fn example() -> zf_analytics::Result<()> {
//! let analytics = zf_analytics::install(
//!     AnalyticsClient::builder().write_key("your-write-key"),
//! )?;
//!
//! analytics
//!     .identify_user("user@example.com", Some(json!({"plan": "pro"})))
//!     .await?;
//! analytics.page(Some("Home"), None).await?;
//! analytics
//!     .track(
//!         "Article Viewed",
//!         Some(Properties::new().set("article_id", 42).into()),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Identity
//!
//! Identity lives in an ordered [`StoreChain`] (a cookie jar file and a
//! local storage file by default). A value cleared from one store is
//! restored from the others on the next read. Identifying as a different
//! user than the stored one starts a fresh anonymous id.
//!
//! # Errors
//!
//! Every operation returns its outcome to the caller. Validation failures
//! are reported before any network activity. Nothing is retried or queued.

pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod identity;
pub mod page;
pub mod properties;
pub mod registry;
pub mod sender;
pub mod store;
mod sync;

pub use client::{AnalyticsClient, AnalyticsClientBuilder};
pub use config::{AnalyticsConfig, DEFAULT_EVENT_ENDPOINT};
pub use error::{AnalyticsError, Result, StoreError};
pub use factory::EventFactory;
pub use identity::{IdentityManager, IdentitySnapshot, ANONYMOUS_ID_KEY, USER_ID_KEY};
pub use page::{NavigationState, PageContextSource, StaticPageContext};
pub use properties::Properties;
pub use registry::{global, install, Registry};
pub use sender::{EventSender, HttpEventSender, LogEventSender};
pub use store::{CookieStore, KeyValueStore, LocalStore, MemoryStore, StoreChain};

pub use zf_analytics_core::{
	Envelope, EventKind, EventPayload, IdentifierGenerator, MessageId, OsRandomGenerator,
	PageContext, UserId, ValidationError,
};
