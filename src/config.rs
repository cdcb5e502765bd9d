//! Construction parameters for [`KeezClient`](crate::client::KeezClient).

// self
use crate::{
	_prelude::*,
	auth::{ApplicationId, ClientEid, TokenSecret},
	error::ConfigError,
	obs::{Logger, NoopLogger},
};

/// Production API domain.
pub const DEFAULT_PRODUCTION_DOMAIN: &str = "https://app.keez.ro";
/// Staging API domain.
pub const DEFAULT_STAGING_DOMAIN: &str = "https://staging.keez.ro";
/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default delay before the first retry.
pub const DEFAULT_RETRY_INITIAL_DELAY: Duration = Duration::from_secs(1);
/// Default per-call timeout for token and business requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default per-call timeout for PDF downloads.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
/// Default margin subtracted from every token lifetime.
pub const DEFAULT_TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(5 * 60);

/// Upstream host selected by the `live` flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HostMode {
	/// Production host (`live = true`).
	Production,
	/// Staging host (`live = false`).
	#[default]
	Staging,
}
impl HostMode {
	/// Maps the public `live` flag onto a host mode.
	pub const fn from_live(live: bool) -> Self {
		if live { Self::Production } else { Self::Staging }
	}

	/// Returns `true` for the production host.
	pub const fn is_live(self) -> bool {
		matches!(self, Self::Production)
	}

	/// Returns a stable label suitable for logs and errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Production => "production",
			Self::Staging => "staging",
		}
	}
}
impl Display for HostMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// The two fixed base domains a client can talk to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostDomains {
	/// Base URL used when the client is live.
	pub production: Url,
	/// Base URL used when the client targets staging.
	pub staging: Url,
}
impl HostDomains {
	/// Creates a domain pair from explicit URLs.
	pub fn new(production: Url, staging: Url) -> Self {
		Self { production, staging }
	}

	/// Resolves the base domain for the given mode.
	pub fn resolve(&self, mode: HostMode) -> &Url {
		match mode {
			HostMode::Production => &self.production,
			HostMode::Staging => &self.staging,
		}
	}

	fn validate(&self) -> Result<(), ConfigError> {
		validate_domain(HostMode::Production, &self.production)?;
		validate_domain(HostMode::Staging, &self.staging)
	}
}
impl Default for HostDomains {
	fn default() -> Self {
		Self {
			production: Url::parse(DEFAULT_PRODUCTION_DOMAIN)
				.unwrap_or_else(|_| unreachable!("Production domain constant is a valid URL.")),
			staging: Url::parse(DEFAULT_STAGING_DOMAIN)
				.unwrap_or_else(|_| unreachable!("Staging domain constant is a valid URL.")),
		}
	}
}

/// Validated client configuration.
#[derive(Clone)]
pub struct ClientConfig {
	/// Keez application identifier.
	pub application_id: ApplicationId,
	/// Keez client (company) identifier.
	pub client_eid: ClientEid,
	/// Shared secret used for the client-credentials grant.
	pub secret: TokenSecret,
	/// Initial host mode.
	pub live: bool,
	/// Injected logger.
	pub logger: Arc<dyn Logger>,
	/// Retries after the initial attempt; `0` disables retrying.
	pub max_retries: u32,
	/// Delay before the first retry; doubled for each subsequent one.
	pub retry_initial_delay: Duration,
	/// Per-call timeout for token and business requests.
	pub request_timeout: Duration,
	/// Per-call timeout for PDF downloads.
	pub download_timeout: Duration,
	/// Margin subtracted from every token lifetime.
	pub token_expiry_buffer: Duration,
	/// Production and staging base domains.
	pub domains: HostDomains,
}
impl ClientConfig {
	/// Starts a builder with the three mandatory parameters.
	pub fn builder(
		application_id: impl Into<String>,
		client_eid: impl Into<String>,
		secret: impl Into<String>,
	) -> ClientConfigBuilder {
		ClientConfigBuilder::new(application_id, client_eid, secret)
	}

	/// Returns the initial host mode.
	pub fn host_mode(&self) -> HostMode {
		HostMode::from_live(self.live)
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("application_id", &self.application_id)
			.field("client_eid", &self.client_eid)
			.field("secret", &self.secret)
			.field("live", &self.live)
			.field("max_retries", &self.max_retries)
			.field("retry_initial_delay", &self.retry_initial_delay)
			.field("request_timeout", &self.request_timeout)
			.field("download_timeout", &self.download_timeout)
			.field("token_expiry_buffer", &self.token_expiry_buffer)
			.field("domains", &self.domains)
			.finish_non_exhaustive()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone)]
pub struct ClientConfigBuilder {
	application_id: String,
	client_eid: String,
	secret: String,
	live: bool,
	logger: Arc<dyn Logger>,
	max_retries: u32,
	retry_initial_delay: Duration,
	request_timeout: Duration,
	download_timeout: Duration,
	token_expiry_buffer: Duration,
	domains: HostDomains,
}
impl ClientConfigBuilder {
	/// Creates a builder seeded with defaults for every optional parameter.
	pub fn new(
		application_id: impl Into<String>,
		client_eid: impl Into<String>,
		secret: impl Into<String>,
	) -> Self {
		Self {
			application_id: application_id.into(),
			client_eid: client_eid.into(),
			secret: secret.into(),
			live: false,
			logger: Arc::new(NoopLogger),
			max_retries: DEFAULT_MAX_RETRIES,
			retry_initial_delay: DEFAULT_RETRY_INITIAL_DELAY,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
			token_expiry_buffer: DEFAULT_TOKEN_EXPIRY_BUFFER,
			domains: HostDomains::default(),
		}
	}

	/// Selects the production (`true`) or staging (`false`) host.
	pub fn live(mut self, live: bool) -> Self {
		self.live = live;

		self
	}

	/// Injects a logger.
	pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
		self.logger = logger;

		self
	}

	/// Overrides the retry count.
	pub fn max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = max_retries;

		self
	}

	/// Overrides the delay before the first retry.
	pub fn retry_initial_delay(mut self, delay: Duration) -> Self {
		self.retry_initial_delay = delay;

		self
	}

	/// Overrides the per-call timeout for token and business requests.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the per-call timeout for PDF downloads.
	pub fn download_timeout(mut self, timeout: Duration) -> Self {
		self.download_timeout = timeout;

		self
	}

	/// Overrides the margin subtracted from token lifetimes.
	pub fn token_expiry_buffer(mut self, buffer: Duration) -> Self {
		self.token_expiry_buffer = buffer;

		self
	}

	/// Overrides the base domains.
	pub fn domains(mut self, domains: HostDomains) -> Self {
		self.domains = domains;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let application_id = ApplicationId::new(&self.application_id)?;
		let client_eid = ClientEid::new(&self.client_eid)?;
		let secret = TokenSecret::from(self.secret);

		if secret.is_blank() {
			return Err(ConfigError::EmptySecret);
		}

		self.domains.validate()?;

		validate_duration("retry_initial_delay", self.retry_initial_delay)?;
		validate_duration("request_timeout", self.request_timeout)?;
		validate_duration("download_timeout", self.download_timeout)?;
		validate_duration("token_expiry_buffer", self.token_expiry_buffer)?;

		Ok(ClientConfig {
			application_id,
			client_eid,
			secret,
			live: self.live,
			logger: self.logger,
			max_retries: self.max_retries,
			retry_initial_delay: self.retry_initial_delay,
			request_timeout: self.request_timeout,
			download_timeout: self.download_timeout,
			token_expiry_buffer: self.token_expiry_buffer,
			domains: self.domains,
		})
	}
}
impl Debug for ClientConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfigBuilder")
			.field("application_id", &self.application_id)
			.field("client_eid", &self.client_eid)
			.field("secret", &"<redacted>")
			.field("live", &self.live)
			.field("max_retries", &self.max_retries)
			.field("domains", &self.domains)
			.finish_non_exhaustive()
	}
}

fn validate_domain(mode: HostMode, url: &Url) -> Result<(), ConfigError> {
	if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() && url.has_host() {
		Ok(())
	} else {
		Err(ConfigError::InvalidDomain { mode: mode.as_str(), url: url.to_string() })
	}
}

fn validate_duration(setting: &'static str, value: Duration) -> Result<(), ConfigError> {
	if value.is_zero() { Err(ConfigError::ZeroDuration { setting }) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{IdentifierError, IdentifierKind};

	fn builder() -> ClientConfigBuilder {
		ClientConfig::builder("app-1", "client-1", "secret")
	}

	#[test]
	fn defaults_match_documented_values() {
		let config = builder().build().expect("Default configuration should be valid.");

		assert!(!config.live);
		assert_eq!(config.host_mode(), HostMode::Staging);
		assert_eq!(config.max_retries, 3);
		assert_eq!(config.retry_initial_delay, Duration::from_secs(1));
		assert!(config.request_timeout < config.download_timeout);
		assert_eq!(config.token_expiry_buffer, Duration::from_secs(300));
		assert_eq!(config.domains.resolve(HostMode::Production).as_str(), "https://app.keez.ro/");
		assert_eq!(config.domains.resolve(HostMode::Staging).as_str(), "https://staging.keez.ro/");
	}

	#[test]
	fn build_rejects_invalid_parameters() {
		assert!(matches!(
			ClientConfig::builder("", "client", "secret").build(),
			Err(ConfigError::Identifier(IdentifierError::Empty { kind: IdentifierKind::Application })),
		));
		assert!(matches!(
			ClientConfig::builder("app", "client", " ").build(),
			Err(ConfigError::EmptySecret),
		));
		assert!(matches!(
			builder().request_timeout(Duration::ZERO).build(),
			Err(ConfigError::ZeroDuration { setting: "request_timeout" }),
		));

		let ftp = HostDomains::new(
			Url::parse("ftp://app.keez.ro").expect("Fixture URL should parse."),
			Url::parse(DEFAULT_STAGING_DOMAIN).expect("Fixture URL should parse."),
		);

		assert!(matches!(
			builder().domains(ftp).build(),
			Err(ConfigError::InvalidDomain { mode: "production", .. }),
		));
	}

	#[test]
	fn debug_output_redacts_secret() {
		let config = builder().build().expect("Configuration should be valid.");

		assert!(!format!("{config:?}").contains("\"secret\""));
		assert!(!format!("{:?}", builder()).contains("\"secret\""));
	}

	#[test]
	fn live_flag_maps_to_host_mode() {
		assert_eq!(HostMode::from_live(true), HostMode::Production);
		assert!(HostMode::Production.is_live());
		assert!(!HostMode::from_live(false).is_live());
	}
}
