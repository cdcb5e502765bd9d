//! Public facade over the Keez API.
//!
//! [`KeezClient`] owns the token store, the retrying transport, and the token grant for one
//! application/client pair. Every business operation first obtains a valid token, then calls
//! exactly one endpoint function against the domain the token was issued for. Transport
//! failures are re-wrapped as [`Error::Api`]; token failures surface as
//! [`Error::Authentication`].

mod common;
mod invoices;
mod items;

pub use invoices::Invoices;
pub use items::Items;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{ClientConfig, HostMode},
	http::{
		HttpTransport,
		retry::{RetryPolicy, RetryingTransport},
	},
	oauth::TokenGrant,
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestKeezClient = KeezClient<ReqwestTransport>;

/// Async client for one Keez application and client.
///
/// The client is cheap to share by reference across tasks; concurrent operations that find no
/// usable token share a single token refresh.
pub struct KeezClient<T>
where
	T: ?Sized + HttpTransport,
{
	config: ClientConfig,
	transport: RetryingTransport<T>,
	grant: TokenGrant,
	store: TokenStore,
}
impl<T> KeezClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that sends every request through `transport`.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<T>>) -> Self {
		let logger = Arc::clone(&config.logger);
		let policy = RetryPolicy::new(config.max_retries, config.retry_initial_delay);
		let grant = TokenGrant::new(
			&config.application_id,
			config.secret.clone(),
			config.request_timeout,
			config.token_expiry_buffer,
		);
		let store = TokenStore::new(config.host_mode(), Arc::clone(&logger));

		Self { transport: RetryingTransport::new(transport.into(), policy, logger), grant, store, config }
	}

	/// Returns the configuration the client was built with.
	///
	/// `config().live` is the initial mode; see [`KeezClient::is_live`] for the active one.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Returns the retrying transport shared by token and business calls.
	pub fn transport(&self) -> &RetryingTransport<T> {
		&self.transport
	}

	/// Returns the token store.
	pub fn token_store(&self) -> &TokenStore {
		&self.store
	}

	/// Returns the active host mode.
	pub fn host_mode(&self) -> HostMode {
		self.store.mode()
	}

	/// Returns `true` when the production host is active.
	pub fn is_live(&self) -> bool {
		self.host_mode().is_live()
	}

	/// Returns the base domain of the active host mode.
	pub fn base_domain(&self) -> &Url {
		self.config.domains.resolve(self.host_mode())
	}

	/// Selects the production (`true`) or staging (`false`) host.
	///
	/// Switching discards the cached token so the next call authenticates against the new
	/// host. Selecting the active host keeps the cached token.
	pub fn set_live(&self, live: bool) {
		if self.store.switch_host(live) {
			self.config
				.logger
				.info(&format!("Switched to the {} host; cached token discarded", self.host_mode()));
		}
	}

	/// Returns a bearer token valid for the active host, refreshing it when necessary.
	pub async fn ensure_valid_token(&self) -> Result<TokenSecret> {
		Ok(self.authorize().await?.access_token)
	}
}
#[cfg(feature = "reqwest")]
impl KeezClient<ReqwestTransport> {
	/// Creates a client backed by a fresh reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
		Ok(Self::with_transport(config, ReqwestTransport::new()?))
	}
}
impl<T> Debug for KeezClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeezClient")
			.field("config", &self.config)
			.field("transport", &self.transport)
			.field("store", &self.store)
			.finish_non_exhaustive()
	}
}
