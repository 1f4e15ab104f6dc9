// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The analytics client: identify, page and track.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::info;
use zf_analytics_core::{Envelope, IdentifierGenerator, OsRandomGenerator, UserId};

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::factory::EventFactory;
use crate::identity::IdentityManager;
use crate::page::{PageContextSource, StaticPageContext};
use crate::sender::{EventSender, HttpEventSender};
use crate::store::{CookieStore, LocalStore, StoreChain};

/// Subdirectory of the platform data directory used by default.
pub const DATA_DIR_NAME: &str = "zf-analytics";
pub const COOKIE_FILE_NAME: &str = "cookies.json";
pub const LOCAL_STORAGE_FILE_NAME: &str = "local_storage.json";

/// Builder for constructing an [`AnalyticsClient`].
#[derive(Default)]
pub struct AnalyticsClientBuilder {
	config: AnalyticsConfig,
	storage: Option<StoreChain>,
	data_dir: Option<PathBuf>,
	page_context: Option<Arc<dyn PageContextSource>>,
	id_generator: Option<Arc<dyn IdentifierGenerator>>,
	sender: Option<Arc<dyn EventSender>>,
}

impl AnalyticsClientBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the whole configuration. Later setters still apply.
	pub fn config(mut self, config: AnalyticsConfig) -> Self {
		self.config = config;
		self
	}

	/// Sets the collection endpoint.
	///
	/// Example: `https://events.zerofirst.io/api/v1/gateway/events`
	pub fn event_endpoint(mut self, url: impl Into<String>) -> Self {
		self.config.event_endpoint = url.into();
		self
	}

	/// Sets the write key sent with every event.
	pub fn write_key(mut self, key: impl Into<String>) -> Self {
		self.config.write_key = key.into();
		self
	}

	/// Sets the timeout for a single send.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Uses `storage` for identity instead of the default file-backed chain.
	pub fn storage(mut self, storage: StoreChain) -> Self {
		self.storage = Some(storage);
		self
	}

	/// Directory for the default cookie and local store files.
	///
	/// Defaults to `zf-analytics` under the platform local data directory.
	pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.data_dir = Some(dir.into());
		self
	}

	pub fn page_context(mut self, source: Arc<dyn PageContextSource>) -> Self {
		self.page_context = Some(source);
		self
	}

	pub fn id_generator(mut self, generator: Arc<dyn IdentifierGenerator>) -> Self {
		self.id_generator = Some(generator);
		self
	}

	/// Replaces HTTP delivery, e.g. with [`crate::LogEventSender`].
	pub fn sender(mut self, sender: Arc<dyn EventSender>) -> Self {
		self.sender = Some(sender);
		self
	}

	/// Builds the client.
	///
	/// Fails if the storage chain is empty, no data directory can be found,
	/// the OS random source is unavailable, or the HTTP client cannot be
	/// built.
	pub fn build(self) -> Result<AnalyticsClient> {
		let ids = self
			.id_generator
			.unwrap_or_else(|| Arc::new(OsRandomGenerator));

		let storage = match self.storage {
			Some(storage) => storage,
			None => default_storage(self.data_dir)?,
		};
		if storage.is_empty() {
			return Err(AnalyticsError::Configuration(
				"at least one backing store is required".to_string(),
			));
		}
		let stores = storage.len();

		let identity = Arc::new(IdentityManager::new(storage, ids.clone())?);
		let factory = EventFactory::new(identity.clone(), ids);

		let sender = match self.sender {
			Some(sender) => sender,
			None => Arc::new(HttpEventSender::new(&self.config)?),
		};
		let page_context = self
			.page_context
			.unwrap_or_else(|| Arc::new(StaticPageContext::default()));

		info!(
			event_endpoint = %self.config.event_endpoint,
			stores,
			"Analytics client initialized"
		);

		Ok(AnalyticsClient {
			inner: Arc::new(AnalyticsClientInner {
				config: self.config,
				identity,
				factory,
				sender,
				page_context,
			}),
		})
	}
}

fn default_storage(data_dir: Option<PathBuf>) -> Result<StoreChain> {
	let dir = match data_dir {
		Some(dir) => dir,
		None => dirs::data_local_dir()
			.map(|dir| dir.join(DATA_DIR_NAME))
			.ok_or_else(|| {
				AnalyticsError::Configuration("no local data directory available".to_string())
			})?,
	};

	Ok(StoreChain::new(vec![
		Box::new(CookieStore::new(dir.join(COOKIE_FILE_NAME))),
		Box::new(LocalStore::new(dir.join(LOCAL_STORAGE_FILE_NAME))),
	]))
}

#[derive(Debug)]
struct AnalyticsClientInner {
	config: AnalyticsConfig,
	identity: Arc<IdentityManager>,
	factory: EventFactory,
	sender: Arc<dyn EventSender>,
	page_context: Arc<dyn PageContextSource>,
}

/// Records identify, page and track events and sends each one once.
///
/// Every call returns the sent [`Envelope`] or the first error. Calls are
/// independent: they may run concurrently and complete in any order.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
	inner: Arc<AnalyticsClientInner>,
}

impl AnalyticsClient {
	pub fn builder() -> AnalyticsClientBuilder {
		AnalyticsClientBuilder::new()
	}

	pub fn config(&self) -> &AnalyticsConfig {
		&self.inner.config
	}

	/// Records `user_id` as the known user, then sends an `identify` event.
	///
	/// Identifying as a different user than the stored one starts a fresh
	/// anonymous id. Empty ids leave the stored identity alone.
	pub async fn identify_user(
		&self,
		user_id: impl Into<UserId>,
		traits: Option<Value>,
	) -> Result<Envelope> {
		let user_id = user_id.into();
		let identity = self.inner.identity.identify_and_snapshot(&user_id)?;
		let envelope = self.inner.factory.identify_as(
			identity,
			Some(&user_id),
			Some(traits.unwrap_or_else(empty_object)),
		)?;
		self.send_event(envelope).await
	}

	/// Sends an `identify` event with traits only. Identity is unchanged.
	///
	/// `null` traits are sent as an empty object.
	pub async fn identify_traits(&self, traits: Value) -> Result<Envelope> {
		let traits = match traits {
			Value::Null => empty_object(),
			traits => traits,
		};
		let envelope = self.inner.factory.identify(None, Some(traits))?;
		self.send_event(envelope).await
	}

	/// Sends a `page` event for the current page context.
	pub async fn page(&self, name: Option<&str>, properties: Option<Value>) -> Result<Envelope> {
		let ctx = self.inner.page_context.current();
		let envelope = self.inner.factory.page(name, properties, &ctx)?;
		self.send_event(envelope).await
	}

	pub async fn track(&self, event: &str, properties: Option<Value>) -> Result<Envelope> {
		let envelope = self
			.inner
			.factory
			.track(event, Some(properties.unwrap_or_else(empty_object)))?;
		self.send_event(envelope).await
	}

	/// Forgets the known user. Nothing is sent.
	pub fn logout(&self) -> Result<()> {
		self.inner.identity.reset()?;
		info!("Analytics user cleared");
		Ok(())
	}

	pub fn anonymous_id(&self) -> Result<String> {
		self.inner.identity.anonymous_id()
	}

	pub fn user_id(&self) -> Result<Option<UserId>> {
		self.inner.identity.user_id()
	}

	async fn send_event(&self, envelope: Envelope) -> Result<Envelope> {
		self.inner.sender.send(&envelope).await?;
		Ok(envelope)
	}
}

fn empty_object() -> Value {
	Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::page::NavigationState;
	use crate::store::{KeyValueStore, MemoryStore};
	use serde_json::json;
	use std::sync::atomic::{AtomicBool, Ordering};
	use std::sync::Mutex;
	use zf_analytics_core::{EventKind, PageContext};

	#[derive(Debug, Default)]
	struct RecordingSender {
		sent: Mutex<Vec<Envelope>>,
		should_fail: AtomicBool,
	}

	impl RecordingSender {
		fn sent(&self) -> Vec<Envelope> {
			self.sent.lock().unwrap().clone()
		}
	}

	#[async_trait::async_trait]
	impl EventSender for RecordingSender {
		async fn send(&self, envelope: &Envelope) -> Result<()> {
			if self.should_fail.load(Ordering::SeqCst) {
				return Err(AnalyticsError::ServerError {
					status: 503,
					message: "mock failure".to_string(),
				});
			}
			self.sent.lock().unwrap().push(envelope.clone());
			Ok(())
		}
	}

	fn client() -> (Arc<RecordingSender>, AnalyticsClient) {
		let sender = Arc::new(RecordingSender::default());
		let client = AnalyticsClient::builder()
			.storage(StoreChain::in_memory())
			.sender(sender.clone())
			.build()
			.unwrap();
		(sender, client)
	}

	#[test]
	fn builder_rejects_empty_storage() {
		let result = AnalyticsClient::builder()
			.storage(StoreChain::new(Vec::new()))
			.sender(Arc::new(RecordingSender::default()))
			.build();
		assert!(matches!(result, Err(AnalyticsError::Configuration(_))));
	}

	#[test]
	fn builder_setters_override_config() {
		let client = AnalyticsClient::builder()
			.config(AnalyticsConfig::default())
			.event_endpoint("http://localhost:9000/events")
			.write_key("wk")
			.request_timeout(Duration::from_secs(2))
			.storage(StoreChain::in_memory())
			.sender(Arc::new(RecordingSender::default()))
			.build()
			.unwrap();

		assert_eq!(client.config().event_endpoint, "http://localhost:9000/events");
		assert_eq!(client.config().write_key, "wk");
		assert_eq!(client.config().request_timeout, Duration::from_secs(2));
	}

	#[test]
	fn default_storage_writes_cookie_and_local_files() {
		let dir = tempfile::tempdir().unwrap();
		let client = AnalyticsClient::builder()
			.data_dir(dir.path())
			.sender(Arc::new(RecordingSender::default()))
			.build()
			.unwrap();

		let anonymous_id = client.anonymous_id().unwrap();
		let cookie = CookieStore::new(dir.path().join(COOKIE_FILE_NAME));
		let local = LocalStore::new(dir.path().join(LOCAL_STORAGE_FILE_NAME));
		assert_eq!(
			cookie.get("zf_anonymousId").unwrap().as_deref(),
			Some(anonymous_id.as_str())
		);
		assert_eq!(
			local.get("zf_anonymousId").unwrap().as_deref(),
			Some(anonymous_id.as_str())
		);
	}

	#[tokio::test]
	async fn track_sends_and_returns_envelope() {
		let (sender, client) = client();
		let envelope = client.track("X", Some(json!({"a": 1}))).await.unwrap();

		assert_eq!(envelope.kind(), EventKind::Track);
		assert_eq!(envelope.properties().unwrap()["a"], 1);
		assert_eq!(sender.sent(), vec![envelope]);
	}

	#[tokio::test]
	async fn track_without_properties_sends_empty_object() {
		let (_, client) = client();
		let envelope = client.track("X", None).await.unwrap();
		assert!(envelope.properties().unwrap().is_empty());
	}

	#[tokio::test]
	async fn validation_failure_sends_nothing() {
		let (sender, client) = client();
		let err = client.track("", None).await.unwrap_err();

		assert!(matches!(err, AnalyticsError::Validation(_)));
		assert!(sender.sent().is_empty());
	}

	#[tokio::test]
	async fn identify_user_stamps_user_and_keeps_first_anonymous_id() {
		let (_, client) = client();
		let before = client.anonymous_id().unwrap();

		let envelope = client.identify_user("u1", None).await.unwrap();
		assert_eq!(envelope.user_id, Some(UserId::from("u1")));
		assert_eq!(envelope.anonymous_id, before);
		assert!(envelope.traits().unwrap().is_empty());
	}

	#[tokio::test]
	async fn switching_users_rotates_anonymous_id() {
		let (_, client) = client();
		let first = client.identify_user("u1", None).await.unwrap();
		let again = client.identify_user("u1", None).await.unwrap();
		let second = client.identify_user("u2", None).await.unwrap();

		assert_eq!(first.anonymous_id, again.anonymous_id);
		assert_ne!(first.anonymous_id, second.anonymous_id);
	}

	#[tokio::test]
	async fn identify_traits_leaves_identity_alone() {
		let (_, client) = client();
		client.identify_user("u1", None).await.unwrap();
		let anonymous_id = client.anonymous_id().unwrap();

		let envelope = client
			.identify_traits(json!({"plan": "pro"}))
			.await
			.unwrap();
		assert_eq!(envelope.user_id, Some(UserId::from("u1")));
		assert_eq!(envelope.anonymous_id, anonymous_id);
		assert_eq!(envelope.traits().unwrap()["plan"], "pro");
	}

	#[tokio::test]
	async fn identify_traits_with_null_sends_empty_object() {
		let (sender, client) = client();
		let envelope = client.identify_traits(Value::Null).await.unwrap();

		assert_eq!(envelope.traits().map(|traits| traits.len()), Some(0));
		assert_eq!(sender.sent()[0].to_value().unwrap()["traits"], json!({}));
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
	async fn concurrent_identify_and_track_keep_users_apart() {
		let (sender, client) = client();

		let switcher = {
			let client = client.clone();
			tokio::spawn(async move {
				for i in 0..200 {
					let user = if i % 2 == 0 { "u1" } else { "u2" };
					let envelope = client.identify_user(user, None).await.unwrap();
					assert_eq!(envelope.user_id, Some(UserId::from(user)));
				}
			})
		};
		let tracker = {
			let client = client.clone();
			tokio::spawn(async move {
				for _ in 0..200 {
					client.track("Ad Click", None).await.unwrap();
				}
			})
		};
		switcher.await.unwrap();
		tracker.await.unwrap();

		let mut users_by_anonymous_id = std::collections::HashMap::new();
		for envelope in sender.sent() {
			if let Some(user_id) = envelope.user_id {
				let user_id = user_id.to_string();
				let first = users_by_anonymous_id
					.entry(envelope.anonymous_id)
					.or_insert_with(|| user_id.clone());
				assert_eq!(*first, user_id);
			}
		}
	}

	#[tokio::test]
	async fn identify_with_invalid_traits_still_records_user() {
		let (sender, client) = client();
		let err = client
			.identify_user(5, Some(json!([1, 2, 3])))
			.await
			.unwrap_err();

		assert!(matches!(err, AnalyticsError::Validation(ref e) if e.field == "traits"));
		assert!(sender.sent().is_empty());
		assert_eq!(client.user_id().unwrap(), Some(UserId::from("5")));
	}

	#[tokio::test]
	async fn page_reads_current_navigation() {
		let nav = NavigationState::new(PageContext::new("https://example.com/", "Home"));
		let client = AnalyticsClient::builder()
			.storage(StoreChain::in_memory())
			.page_context(Arc::new(nav.clone()))
			.sender(Arc::new(RecordingSender::default()))
			.build()
			.unwrap();

		nav.navigate("https://example.com/sports", "Sports");
		let envelope = client.page(None, None).await.unwrap();
		let props = envelope.properties().unwrap();
		assert_eq!(props["url"], "https://example.com/sports");
		assert_eq!(props["title"], "Sports");
	}

	#[tokio::test]
	async fn send_failure_is_returned() {
		let (sender, client) = client();
		sender.should_fail.store(true, Ordering::SeqCst);

		let err = client.track("X", None).await.unwrap_err();
		assert!(matches!(err, AnalyticsError::ServerError { status: 503, .. }));
	}

	#[tokio::test]
	async fn logout_clears_user_but_not_anonymous_id() {
		let store = Arc::new(MemoryStore::new());
		let client = AnalyticsClient::builder()
			.storage(StoreChain::new(vec![Box::new(store.clone())]))
			.sender(Arc::new(RecordingSender::default()))
			.build()
			.unwrap();

		client.identify_user("u1", None).await.unwrap();
		let anonymous_id = client.anonymous_id().unwrap();

		client.logout().unwrap();
		assert_eq!(client.user_id().unwrap(), None);
		assert!(!store.contains("zf_userId"));
		assert_eq!(client.anonymous_id().unwrap(), anonymous_id);
	}
}
