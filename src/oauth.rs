//! Client-credentials token grant against the Keez identity provider.
//!
//! The grant is built with the `oauth2` crate and executed through the same
//! [`RetryingTransport`] as business calls, so transient token endpoint failures are retried
//! with the client's policy.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, AuthType, ClientId, ClientSecret, HttpRequest, HttpResponse,
	RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse},
	http::StatusCode,
};
// self
use crate::{
	_prelude::*,
	auth::{ApplicationId, Credential, TokenSecret},
	config::HostMode,
	endpoint,
	error::TransportError,
	http::{ApiRequest, HttpTransport, retry::RetryingTransport},
	obs::{self, Operation, OperationOutcome, OperationSpan},
};

/// Scope requested by every grant.
pub const TOKEN_SCOPE: &str = "public-api";
/// Token endpoint path relative to the base domain.
pub const TOKEN_PATH: [&str; 3] = ["idp", "connect", "token"];

type GrantFuture<'c> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'c + Send>>;

/// Parameters of the client-credentials grant for one application.
#[derive(Clone)]
pub struct TokenGrant {
	client_id: String,
	secret: TokenSecret,
	request_timeout: Duration,
	expiry_buffer: Duration,
}
impl TokenGrant {
	/// Creates a grant for `application_id`; the OAuth client id is `app{application_id}`.
	pub fn new(
		application_id: &ApplicationId,
		secret: TokenSecret,
		request_timeout: Duration,
		expiry_buffer: Duration,
	) -> Self {
		Self { client_id: application_id.oauth_client_id(), secret, request_timeout, expiry_buffer }
	}

	/// Returns the OAuth client id sent to the token endpoint.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Returns the token endpoint for `domain`.
	pub fn token_url(domain: &Url) -> Result<Url, TransportError> {
		endpoint::join_segments(domain, TOKEN_PATH)
	}

	/// Requests a fresh credential from the `mode` host at `domain`.
	///
	/// Any failure, including a response without a positive `expires_in`, is reported as
	/// [`Error::Authentication`].
	pub async fn request<T>(
		&self,
		transport: &RetryingTransport<T>,
		mode: HostMode,
		domain: &Url,
	) -> Result<Credential>
	where
		T: ?Sized + HttpTransport,
	{
		const KIND: Operation = Operation::RefreshToken;

		let span = OperationSpan::new(KIND, mode);

		obs::record_operation_outcome(KIND, mode, OperationOutcome::Attempt);

		let result = span.instrument(self.exchange(transport, domain)).await;

		match &result {
			Ok(_) => obs::record_operation_outcome(KIND, mode, OperationOutcome::Success),
			Err(e) => {
				span.record_status(e.status());
				obs::record_operation_outcome(KIND, mode, OperationOutcome::Failure);
			},
		}

		result
	}

	async fn exchange<T>(&self, transport: &RetryingTransport<T>, domain: &Url) -> Result<Credential>
	where
		T: ?Sized + HttpTransport,
	{
		let token_url = Self::token_url(domain).map_err(Error::authentication)?;
		let oauth_client = BasicClient::new(ClientId::new(self.client_id.clone()))
			.set_client_secret(ClientSecret::new(self.secret.expose().to_owned()))
			.set_token_uri(TokenUrl::from_url(token_url))
			.set_auth_type(AuthType::RequestBody);
		let handle = GrantHandle { transport, timeout: self.request_timeout };
		let response = oauth_client
			.exchange_client_credentials()
			.add_scope(Scope::new(TOKEN_SCOPE.to_owned()))
			.request_async(&handle)
			.await
			.map_err(map_request_error)?;
		let expires_in = response
			.expires_in()
			.map(|lifetime| lifetime.as_secs())
			.ok_or_else(|| Error::authentication_message(
				"Authentication failed: token endpoint response is missing expires_in.",
			))?;
		let scope = response
			.scopes()
			.map(|scopes| scopes.iter().map(|scope| scope.as_str()).collect::<Vec<_>>().join(" "))
			.unwrap_or_else(|| TOKEN_SCOPE.to_owned());

		Credential::builder()
			.access_token(response.access_token().secret().to_owned())
			.token_type(response.token_type().as_ref())
			.scope(scope)
			.expires_in(expires_in)
			.expiry_buffer(self.expiry_buffer)
			.issued_at(OffsetDateTime::now_utc())
			.build()
			.map_err(|e| Error::authentication_message(format!("Authentication failed: {e}")))
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGrant")
			.field("client_id", &self.client_id)
			.field("secret", &self.secret)
			.field("request_timeout", &self.request_timeout)
			.field("expiry_buffer", &self.expiry_buffer)
			.finish()
	}
}

/// Adapter that lets `oauth2` dispatch its token request through a [`RetryingTransport`].
struct GrantHandle<'t, T>
where
	T: ?Sized + HttpTransport,
{
	transport: &'t RetryingTransport<T>,
	timeout: Duration,
}
impl<'c, T> AsyncHttpClient<'c> for GrantHandle<'_, T>
where
	T: ?Sized + HttpTransport,
{
	type Error = TransportError;
	type Future = GrantFuture<'c>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			let request = api_request(request, self.timeout)?;
			let response = self.transport.execute(&request).await.map_err(oauth_error_document)?;
			let mut converted = HttpResponse::new(response.body);

			*converted.status_mut() =
				StatusCode::from_u16(response.status).map_err(TransportError::invalid_request)?;
			*converted.headers_mut() = response.headers;

			Ok(converted)
		})
	}
}

fn api_request(request: HttpRequest, timeout: Duration) -> Result<ApiRequest, TransportError> {
	let (parts, body) = request.into_parts();
	let url = Url::parse(&parts.uri.to_string()).map_err(TransportError::invalid_request)?;

	Ok(ApiRequest {
		method: parts.method,
		url,
		headers: parts.headers,
		body: if body.is_empty() { None } else { Some(body) },
		timeout,
	})
}

// A fatal status whose body is an OAuth error document keeps both the status and the document.
fn oauth_error_document(err: TransportError) -> TransportError {
	match &err {
		TransportError::Status { status, body } =>
			match serde_json::from_str::<BasicErrorResponse>(body) {
				Ok(response) => oauth_error(Some(*status), &response),
				Err(_) => err,
			},
		_ => err,
	}
}

fn oauth_error(status: Option<u16>, response: &BasicErrorResponse) -> TransportError {
	TransportError::OAuth {
		status,
		error: response.error().as_ref().to_owned(),
		description: response.error_description().cloned(),
	}
}

fn map_request_error(err: RequestTokenError<TransportError, BasicErrorResponse>) -> Error {
	match err {
		RequestTokenError::Request(e) => Error::authentication(e),
		RequestTokenError::ServerResponse(response) =>
			Error::authentication(oauth_error(None, &response)),
		RequestTokenError::Parse(e, _body) =>
			Error::authentication(TransportError::Decode { source: Arc::new(e), status: None }),
		RequestTokenError::Other(message) => Error::authentication_message(format!(
			"Authentication failed: token endpoint returned an unexpected response: {message}"
		)),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn client_id_and_token_url_follow_keez_conventions() {
		let app = ApplicationId::new("42").expect("Application fixture should be valid.");
		let grant =
			TokenGrant::new(&app, TokenSecret::new("s"), Duration::from_secs(1), Duration::ZERO);
		let domain = Url::parse("https://staging.keez.ro").expect("Fixture URL should parse.");

		assert_eq!(grant.client_id(), "app42");
		assert_eq!(
			TokenGrant::token_url(&domain).expect("Token URL should build.").as_str(),
			"https://staging.keez.ro/idp/connect/token",
		);
		assert!(!format!("{grant:?}").contains("\"s\""));
	}

	#[test]
	fn oauth_error_documents_become_authentication_errors() {
		let response: BasicErrorResponse = serde_json::from_str(
			"{\"error\":\"invalid_client\",\"error_description\":\"Unknown client\"}",
		)
		.expect("Error response fixture should decode.");
		let err = map_request_error(RequestTokenError::ServerResponse(response));

		assert!(err.is_authentication());
		assert_eq!(err.status(), None);
		assert_eq!(err.message(), "Authentication failed: invalid_client: Unknown client");
	}

	#[test]
	fn fatal_statuses_with_error_documents_keep_status_and_code() {
		let err = oauth_error_document(TransportError::Status {
			status: 400,
			body: "{\"error\":\"invalid_client\",\"error_description\":\"Unknown client\"}".into(),
		});

		assert!(matches!(
			&err,
			TransportError::OAuth { status: Some(400), error, .. } if error == "invalid_client"
		));
		assert_eq!(err.detail(), "invalid_client: Unknown client");

		let plain = oauth_error_document(TransportError::Status {
			status: 503,
			body: "maintenance".into(),
		});

		assert!(matches!(plain, TransportError::Status { status: 503, .. }));
	}

	#[test]
	fn transport_failures_keep_their_status() {
		let err = map_request_error(RequestTokenError::Request(TransportError::Status {
			status: 401,
			body: "{\"error\":\"invalid_client\"}".into(),
		}));

		assert!(err.is_authentication());
		assert_eq!(err.status(), Some(401));
	}
}
