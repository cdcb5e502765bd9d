//! Stateless request builders and decoders, one function per upstream endpoint.
//!
//! Endpoint functions never touch the token store: the caller resolves the token and base
//! domain first and passes them in through an [`EndpointContext`]. Failures are returned as
//! raw [`TransportError`]s for the facade to classify.

pub mod invoices;
pub mod items;

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	auth::{ClientEid, TokenSecret},
	error::TransportError,
	http::ApiRequest,
	model::QueryPairs,
};

/// Path prefix shared by every public API resource.
pub const API_PREFIX: [&str; 3] = ["api", "v1.0", "public-api"];

/// Everything an endpoint function needs besides its own arguments.
#[derive(Clone, Copy, Debug)]
pub struct EndpointContext<'a> {
	/// Base domain for the host mode the token was issued for.
	pub domain: &'a Url,
	/// Client identifier embedded in resource paths.
	pub client_eid: &'a ClientEid,
	/// Bearer token.
	pub token: &'a TokenSecret,
	/// Timeout for regular calls.
	pub request_timeout: Duration,
	/// Timeout for PDF downloads.
	pub download_timeout: Duration,
}
impl EndpointContext<'_> {
	/// Builds `{domain}/api/v1.0/public-api/{clientEid}/{segments..}`.
	pub fn client_url(&self, segments: &[&str]) -> Result<Url, TransportError> {
		let prefix = API_PREFIX.iter().copied().chain([self.client_eid.as_ref()]);

		join_segments(self.domain, prefix.chain(segments.iter().copied()))
	}

	/// Builds `{domain}/api/v1.0/public-api/{segments..}` for endpoints not scoped to a client.
	pub fn public_url(&self, segments: &[&str]) -> Result<Url, TransportError> {
		join_segments(self.domain, API_PREFIX.iter().copied().chain(segments.iter().copied()))
	}

	/// Starts an authenticated request using the regular timeout.
	pub fn request(&self, method: Method, url: Url) -> Result<ApiRequest, TransportError> {
		ApiRequest::new(method, url, self.request_timeout).bearer(self.token)
	}
}

/// Appends percent-encoded path segments to `domain`, keeping any path prefix it already has.
pub fn join_segments<'s, I>(domain: &Url, segments: I) -> Result<Url, TransportError>
where
	I: IntoIterator<Item = &'s str>,
{
	let mut url = domain.clone();

	url.set_query(None);
	url.set_fragment(None);
	url.path_segments_mut()
		.map_err(|_| TransportError::invalid_request(format!("{domain} cannot be a base URL")))?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}

/// Appends `pairs` as the query string; an empty set leaves the URL untouched.
pub fn with_query(mut url: Url, pairs: &QueryPairs) -> Url {
	if !pairs.is_empty() {
		url.query_pairs_mut().extend_pairs(pairs.iter());
	}

	url
}
