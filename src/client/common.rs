//! Plumbing shared by every facade operation.

// self
use crate::{
	_prelude::*,
	client::KeezClient,
	endpoint::EndpointContext,
	error::TransportError,
	http::HttpTransport,
	obs::{self, Operation, OperationOutcome, OperationSpan},
	store::ValidToken,
};

impl<T> KeezClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Obtains a token from the store, running the client-credentials grant when needed.
	pub(crate) async fn authorize(&self) -> Result<ValidToken> {
		self.store
			.ensure_valid_token(|mode| {
				self.grant.request(&self.transport, mode, self.config.domains.resolve(mode))
			})
			.await
	}

	/// Builds the endpoint context for a token, targeting the domain it was issued for.
	pub(crate) fn endpoint_context<'a>(&'a self, token: &'a ValidToken) -> EndpointContext<'a> {
		EndpointContext {
			domain: self.config.domains.resolve(token.mode),
			client_eid: &self.config.client_eid,
			token: &token.access_token,
			request_timeout: self.config.request_timeout,
			download_timeout: self.config.download_timeout,
		}
	}

	/// Runs one operation inside its span, recording attempt and outcome metrics.
	pub(crate) async fn instrument<R, F>(&self, operation: Operation, call: F) -> Result<R>
	where
		F: Future<Output = Result<R>>,
	{
		let mode = self.host_mode();
		let span = OperationSpan::new(operation, mode);

		obs::record_operation_outcome(operation, mode, OperationOutcome::Attempt);
		self.config
			.logger
			.debug(&format!("Starting {} on the {mode} host", operation.description()));

		let result = span.instrument(call).await;

		match &result {
			Ok(_) => obs::record_operation_outcome(operation, mode, OperationOutcome::Success),
			Err(e) => {
				span.record_status(e.status());
				obs::record_operation_outcome(operation, mode, OperationOutcome::Failure);
			},
		}

		result
	}

	/// Re-wraps an endpoint failure as [`Error::Api`] and logs it.
	pub(crate) fn classify<R>(
		&self,
		operation: Operation,
		result: Result<R, TransportError>,
	) -> Result<R> {
		result.map_err(|e| {
			let err = Error::api(operation, e);

			self.config.logger.error(err.message());

			err
		})
	}
}
