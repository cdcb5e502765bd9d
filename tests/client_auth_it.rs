// crates.io
use httpmock::{Mock, prelude::*};
// self
use keez_client::{
	_preludet::*,
	client::KeezClient,
	error::TransportError,
	model::ItemFilter,
	obs::{LogLevel, MemoryLogger},
};

const TOKEN_PATH: &str = "/idp/connect/token";
const ITEMS_PATH: &str = "/api/v1.0/public-api/test-client-eid/items";

async fn mock_token<'a>(server: &'a MockServer, access_token: &str, expires_in: u64) -> Mock<'a> {
	let body = token_body(access_token, expires_in);

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

async fn mock_items<'a>(server: &'a MockServer, access_token: &str) -> Mock<'a> {
	let bearer = format!("Bearer {access_token}");

	server
		.mock_async(|when, then| {
			when.method(GET).path(ITEMS_PATH).header("authorization", bearer);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"first\":0,\"last\":0,\"recordsCount\":0,\"data\":[]}");
		})
		.await
}

#[tokio::test]
async fn token_is_cached_between_operations() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let token = mock_token(&server, "cached-token", 3600).await;
	let items = mock_items(&server, "cached-token").await;

	for _ in 0..3 {
		client
			.get_all_items(&ItemFilter::default())
			.await
			.expect("Listing items with a cached token should succeed.");
	}

	token.assert_calls_async(1).await;
	items.assert_calls_async(3).await;

	let secret = client.ensure_valid_token().await.expect("Cached token should be returned.");

	assert_eq!(secret.expose(), "cached-token");

	token.assert_calls_async(1).await;
}

#[tokio::test]
async fn concurrent_operations_share_one_refresh() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let token = mock_token(&server, "shared-token", 3600).await;
	let items = mock_items(&server, "shared-token").await;
	let filter = ItemFilter::default();
	let (a, b, c, d, e) = tokio::join!(
		client.get_all_items(&filter),
		client.get_all_items(&filter),
		client.items().get_all(&filter),
		client.items().get_all(&filter),
		client.ensure_valid_token(),
	);

	for result in [a, b, c, d] {
		result.expect("Every concurrent operation should succeed.");
	}

	assert_eq!(e.expect("Concurrent token request should succeed.").expose(), "shared-token");

	token.assert_calls_async(1).await;
	items.assert_calls_async(4).await;
}

#[tokio::test]
async fn rejected_credentials_surface_as_authentication_errors() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let logger = Arc::new(MemoryLogger::default());
	let config = test_config_builder(&server.base_url(), &server.base_url())
		.logger(logger.clone())
		.build()?;
	let client = KeezClient::new(config)?;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let items = mock_items(&server, "never-issued").await;
	let err = client
		.get_all_items(&ItemFilter::default())
		.await
		.expect_err("An operation without a token should fail.");

	assert!(err.is_authentication());
	assert_eq!(err.status(), Some(401));
	assert!(err.message().starts_with("Authentication failed"));

	token.assert_calls_async(1).await;
	items.assert_calls_async(0).await;

	assert_eq!(logger.messages(LogLevel::Error).len(), 1);

	Ok(())
}

#[tokio::test]
async fn oauth_error_documents_are_surfaced_with_their_status() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\",\"error_description\":\"Unknown client\"}");
		})
		.await;
	let err = client.ensure_valid_token().await.expect_err("Token refresh should fail.");

	assert!(err.is_authentication());
	assert_eq!(err.status(), Some(400));
	assert_eq!(err.message(), "Authentication failed: invalid_client: Unknown client");
	assert!(matches!(
		err.cause(),
		Some(TransportError::OAuth { error, .. }) if error == "invalid_client"
	));

	token.assert_calls_async(1).await;
}

#[tokio::test]
async fn token_endpoint_outages_are_retried_before_failing() {
	let server = MockServer::start_async().await;
	let config = test_config_builder(&server.base_url(), &server.base_url())
		.max_retries(2)
		.build()
		.expect("Test client configuration should be valid.");
	let client = ReqwestTestClient::new(config).expect("Test client should build.");
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(503).body("maintenance");
		})
		.await;
	let err = client.ensure_valid_token().await.expect_err("Token refresh should fail.");

	assert!(err.is_authentication());
	assert_eq!(err.status(), Some(503));
	assert_eq!(err.message(), "Authentication failed: maintenance");

	token.assert_calls_async(3).await;
}

#[tokio::test]
async fn token_without_lifetime_is_rejected() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"no-expiry\",\"token_type\":\"Bearer\"}");
		})
		.await;
	let err =
		client.ensure_valid_token().await.expect_err("A token without expires_in is unusable.");

	assert!(err.is_authentication());
	assert_eq!(err.status(), None);

	token.assert_calls_async(1).await;
}

#[tokio::test]
async fn switching_hosts_reauthenticates_against_the_new_host() {
	let production = MockServer::start_async().await;
	let staging = MockServer::start_async().await;
	let config = test_config_builder(&production.base_url(), &staging.base_url())
		.build()
		.expect("Test client configuration should be valid.");
	let client = ReqwestTestClient::new(config).expect("Test client should build.");
	let staging_token = mock_token(&staging, "staging-token", 3600).await;
	let staging_items = mock_items(&staging, "staging-token").await;
	let production_token = mock_token(&production, "production-token", 3600).await;
	let production_items = mock_items(&production, "production-token").await;
	let filter = ItemFilter::default();

	assert!(!client.is_live());
	assert_eq!(
		client.base_domain(),
		&Url::parse(&staging.base_url()).expect("Staging URL should parse.")
	);

	client.get_all_items(&filter).await.expect("Staging call should succeed.");
	client.set_live(true);

	assert!(client.is_live());

	client.get_all_items(&filter).await.expect("Production call should succeed.");

	staging_token.assert_calls_async(1).await;
	staging_items.assert_calls_async(1).await;
	production_token.assert_calls_async(1).await;
	production_items.assert_calls_async(1).await;

	client.set_live(true);
	client.get_all_items(&filter).await.expect("Redundant switch should keep the token.");

	production_token.assert_calls_async(1).await;
	production_items.assert_calls_async(2).await;

	client.set_live(false);
	client.get_all_items(&filter).await.expect("Switching back should reauthenticate.");

	staging_token.assert_calls_async(2).await;
	staging_items.assert_calls_async(2).await;
}

#[tokio::test]
async fn lifetimes_shorter_than_the_buffer_refresh_every_call() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let token = mock_token(&server, "short-token", 60).await;
	let items = mock_items(&server, "short-token").await;

	client.get_all_items(&ItemFilter::default()).await.expect("First call should succeed.");
	client.get_all_items(&ItemFilter::default()).await.expect("Second call should succeed.");

	token.assert_calls_async(2).await;
	items.assert_calls_async(2).await;
}
