//! Async client for the Keez invoicing API: cached client-credential tokens, single-flight
//! refresh, and a retrying transport behind one typed facade.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod model;
pub mod oauth;
pub mod obs;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Fixtures shared by the integration tests; enabled via `cfg(test)` or the `test` feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::KeezClient,
		config::{ClientConfig, ClientConfigBuilder, HostDomains},
		http::ReqwestTransport,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = KeezClient<ReqwestTransport>;

	/// Application identifier used by test fixtures.
	pub const TEST_APPLICATION_ID: &str = "test-app-id";
	/// Client identifier used by test fixtures.
	pub const TEST_CLIENT_EID: &str = "test-client-eid";
	/// Shared secret used by test fixtures.
	pub const TEST_SECRET: &str = "test-secret";

	/// Builds domains that point both host modes at the given base URL.
	pub fn test_domains(production: &str, staging: &str) -> HostDomains {
		HostDomains::new(
			Url::parse(production).expect("Production test domain should parse."),
			Url::parse(staging).expect("Staging test domain should parse."),
		)
	}

	/// Returns a config builder seeded with the fixture identifiers and fast retry delays.
	pub fn test_config_builder(production: &str, staging: &str) -> ClientConfigBuilder {
		ClientConfig::builder(TEST_APPLICATION_ID, TEST_CLIENT_EID, TEST_SECRET)
			.domains(test_domains(production, staging))
			.retry_initial_delay(Duration::from_millis(10))
	}

	/// Builds a staging-mode client whose both domains resolve to `base_url`.
	pub fn build_reqwest_test_client(base_url: &str) -> ReqwestTestClient {
		let config = test_config_builder(base_url, base_url)
			.build()
			.expect("Test client configuration should be valid.");

		KeezClient::new(config).expect("Test client should build.")
	}

	/// JSON body returned by mocked token endpoints.
	pub fn token_body(access_token: &str, expires_in: u64) -> String {
		format!(
			"{{\"access_token\":\"{access_token}\",\"expires_in\":{expires_in},\"token_type\":\"Bearer\",\"scope\":\"public-api\"}}"
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::OnceCell as AsyncOnceCell;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
