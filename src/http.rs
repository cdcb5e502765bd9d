//! Request/response descriptors and the HTTP transport seam.
//!
//! Every call the client makes (the token grant included) is described by an [`ApiRequest`]
//! and executed by an [`HttpTransport`]. A transport returns whatever response it received,
//! whatever its status code, and reserves [`TransportError`] for exchanges where no usable
//! response arrived. Status classification and retrying happen one layer up in
//! [`retry::RetryingTransport`].

pub mod retry;

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::http::{
	HeaderMap, HeaderValue, Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, auth::TokenSecret, error::TransportError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing one request.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by the token
/// store and every facade operation of a client.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` once, honoring [`ApiRequest::timeout`].
	///
	/// Returns the received response for every status code. Connection failures and timeouts
	/// are reported as [`TransportError::Network`] and [`TransportError::Timeout`].
	fn send<'a>(&'a self, request: &'a ApiRequest) -> TransportFuture<'a>;
}
impl<T> HttpTransport for Arc<T>
where
	T: ?Sized + HttpTransport,
{
	fn send<'a>(&'a self, request: &'a ApiRequest) -> TransportFuture<'a> {
		(**self).send(request)
	}
}

/// Self-contained description of one HTTP exchange.
///
/// The descriptor is cloneable and never consumed by sending, so the identical request can be
/// re-issued on retry.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL including the query string.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
	/// Per-call timeout.
	pub timeout: Duration,
}
impl ApiRequest {
	/// Creates a body-less request that accepts JSON.
	pub fn new(method: Method, url: Url, timeout: Duration) -> Self {
		let mut headers = HeaderMap::new();

		headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		Self { method, url, headers, body: None, timeout }
	}

	/// Adds the `Authorization: Bearer` header.
	pub fn bearer(mut self, token: &TokenSecret) -> Result<Self, TransportError> {
		let mut value =
			HeaderValue::from_str(&token.bearer_value()).map_err(TransportError::invalid_request)?;

		value.set_sensitive(true);
		self.headers.insert(AUTHORIZATION, value);

		Ok(self)
	}

	/// Serializes `body` as the JSON request body.
	pub fn json<B>(mut self, body: &B) -> Result<Self, TransportError>
	where
		B: ?Sized + Serialize,
	{
		let bytes = serde_json::to_vec(body).map_err(TransportError::invalid_request)?;

		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		self.body = Some(bytes);

		Ok(self)
	}
}

/// Response received from the upstream API.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx status codes.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the body decoded lossily as UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	///
	/// An empty body decodes as JSON `null`, so `Option`/unit targets accept bodiless replies.
	pub fn json<T>(&self) -> Result<T, TransportError>
	where
		T: DeserializeOwned,
	{
		let body = if self.body.iter().all(u8::is_ascii_whitespace) {
			&b"null"[..]
		} else {
			&self.body[..]
		};
		let mut deserializer = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|e| TransportError::Decode {
			source: Arc::new(e),
			status: Some(self.status),
		})
	}
}

/// Thin wrapper around [`ReqwestClient`] implementing [`HttpTransport`].
///
/// Redirects are not followed: the Keez API answers directly, and a redirect would carry the
/// bearer token to another location.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport around a fresh client with redirects disabled.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client =
			ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send<'a>(&'a self, request: &'a ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut builder = self
				.0
				.request(request.method.clone(), request.url.clone())
				.headers(request.headers.clone())
				.timeout(request.timeout);

			if let Some(body) = request.body.as_ref() {
				builder = builder.body(body.clone());
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}
