// std
use std::collections::VecDeque;
// crates.io
use httpmock::prelude::*;
use tokio::time::Instant;
// self
use keez_client::{
	_preludet::*,
	error::TransportError,
	http::{
		ApiRequest, ApiResponse, HttpTransport, ReqwestTransport, TransportFuture,
		retry::{RetryPolicy, RetryingTransport},
	},
	oauth::oauth2::http::{HeaderMap, Method},
	obs::{LogLevel, MemoryLogger, NoopLogger},
};

/// Replays a fixed sequence of outcomes and records when each attempt happened.
struct ScriptedTransport {
	outcomes: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
	attempts: Mutex<Vec<Instant>>,
}
impl ScriptedTransport {
	fn new(outcomes: impl IntoIterator<Item = Result<ApiResponse, TransportError>>) -> Self {
		Self { outcomes: Mutex::new(outcomes.into_iter().collect()), attempts: Default::default() }
	}

	fn attempts(&self) -> usize {
		self.attempts.lock().len()
	}

	fn gaps(&self) -> Vec<Duration> {
		self.attempts.lock().windows(2).map(|pair| pair[1] - pair[0]).collect()
	}
}
impl HttpTransport for ScriptedTransport {
	fn send<'a>(&'a self, _request: &'a ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			self.attempts.lock().push(Instant::now());

			self.outcomes.lock().pop_front().unwrap_or_else(|| Ok(status(200)))
		})
	}
}

fn status(code: u16) -> ApiResponse {
	ApiResponse { status: code, headers: HeaderMap::new(), body: Vec::new() }
}

fn request() -> ApiRequest {
	ApiRequest::new(
		Method::GET,
		Url::parse("https://staging.keez.ro/api/v1.0/public-api/cid/items")
			.expect("Fixture URL should parse."),
		Duration::from_secs(30),
	)
}

fn network_failure() -> TransportError {
	TransportError::network(std::io::Error::new(
		std::io::ErrorKind::ConnectionRefused,
		"connection refused",
	))
}

fn retrying(
	transport: &Arc<ScriptedTransport>,
	max_retries: u32,
) -> RetryingTransport<ScriptedTransport> {
	RetryingTransport::new(
		Arc::clone(transport),
		RetryPolicy::new(max_retries, Duration::from_secs(1)),
		Arc::new(NoopLogger),
	)
}

#[tokio::test(start_paused = true)]
async fn unavailable_responses_back_off_exponentially() {
	let transport = Arc::new(ScriptedTransport::new([
		Ok(status(503)),
		Ok(status(503)),
		Ok(status(503)),
		Ok(status(200)),
	]));
	let logger = Arc::new(MemoryLogger::default());
	let retrying = RetryingTransport::new(
		Arc::clone(&transport),
		RetryPolicy::new(3, Duration::from_secs(1)),
		logger.clone(),
	);
	let response = retrying.execute(&request()).await.expect("Fourth attempt should succeed.");

	assert_eq!(response.status, 200);
	assert_eq!(transport.attempts(), 4);
	assert_eq!(transport.gaps(), [1, 2, 4].map(Duration::from_secs));

	let warnings = logger.messages(LogLevel::Warn);

	assert_eq!(warnings.len(), 3);
	assert_eq!(
		warnings[0],
		"Retrying request GET https://staging.keez.ro/api/v1.0/public-api/cid/items (attempt 1/3) after 1000ms",
	);
	assert!(warnings[2].contains("(attempt 3/3) after 4000ms"));
}

#[tokio::test(start_paused = true)]
async fn client_errors_fail_on_the_first_attempt() {
	for code in [400, 401, 403, 404] {
		let transport = Arc::new(ScriptedTransport::new([Ok(status(code))]));
		let started = Instant::now();
		let err = retrying(&transport, 3)
			.execute(&request())
			.await
			.expect_err("Client errors should not be retried.");

		assert_eq!(err.status(), Some(code));
		assert_eq!(transport.attempts(), 1);
		assert_eq!(started.elapsed(), Duration::ZERO);
	}
}

#[tokio::test(start_paused = true)]
async fn network_failures_are_retried_like_unavailable_responses() {
	let transport = Arc::new(ScriptedTransport::new([
		Err(network_failure()),
		Err(TransportError::Timeout { source: None }),
		Ok(status(200)),
	]));
	let response = retrying(&transport, 3)
		.execute(&request())
		.await
		.expect("Third attempt should succeed.");

	assert_eq!(response.status, 200);
	assert_eq!(transport.gaps(), [1, 2].map(Duration::from_secs));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_the_last_failure() {
	let transport = Arc::new(ScriptedTransport::new([
		Ok(status(500)),
		Ok(status(429)),
		Ok(status(504)),
		Ok(status(200)),
	]));
	let err = retrying(&transport, 2)
		.execute(&request())
		.await
		.expect_err("Two retries are not enough.");

	assert_eq!(err.status(), Some(504));
	assert_eq!(transport.attempts(), 3);
}

#[tokio::test(start_paused = true)]
async fn zero_retries_disables_backoff() {
	let transport = Arc::new(ScriptedTransport::new([Err(network_failure())]));
	let started = Instant::now();
	let err = retrying(&transport, 0)
		.execute(&request())
		.await
		.expect_err("The first failure should be terminal.");

	assert!(matches!(err, TransportError::Network { .. }));
	assert_eq!(transport.attempts(), 1);
	assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn reqwest_transport_retries_unavailable_upstreams() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1.0/public-api/cid/items");
			then.status(503).body("{\"Message\":\"Service unavailable\"}");
		})
		.await;
	let transport = ReqwestTransport::new().expect("Reqwest transport should build.");
	let retrying = RetryingTransport::new(
		Arc::new(transport),
		RetryPolicy::new(2, Duration::from_millis(5)),
		Arc::new(NoopLogger),
	);
	let url = Url::parse(&server.url("/api/v1.0/public-api/cid/items"))
		.expect("Mock URL should parse.");
	let err = retrying
		.execute(&ApiRequest::new(Method::GET, url, Duration::from_secs(5)))
		.await
		.expect_err("A persistent 503 should fail.");

	assert_eq!(err.status(), Some(503));
	assert_eq!(err.detail(), "Service unavailable");

	mock.assert_calls_async(3).await;
}
