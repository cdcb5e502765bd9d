//! Bounded exponential-backoff retrying on top of an [`HttpTransport`].

// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{ApiRequest, ApiResponse, HttpTransport},
	obs::Logger,
};

/// Status codes that indicate a transient upstream condition.
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Returns `true` when a response with `status` may succeed if re-issued.
pub fn is_retryable_status(status: u16) -> bool {
	RETRYABLE_STATUS_CODES.contains(&status)
}

/// Retry budget and backoff base for one client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Retries after the initial attempt; `0` disables retrying.
	pub max_retries: u32,
	/// Delay before the first retry.
	pub initial_delay: Duration,
}
impl RetryPolicy {
	/// Creates a policy from explicit values.
	pub const fn new(max_retries: u32, initial_delay: Duration) -> Self {
		Self { max_retries, initial_delay }
	}

	/// Delay before retry number `attempt` (1-based): `initial_delay * 2^(attempt - 1)`.
	pub fn delay_for(&self, attempt: u32) -> Duration {
		let factor = 2_u32.checked_pow(attempt.saturating_sub(1)).unwrap_or(u32::MAX);

		self.initial_delay.saturating_mul(factor)
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new(crate::config::DEFAULT_MAX_RETRIES, crate::config::DEFAULT_RETRY_INITIAL_DELAY)
	}
}

/// Executes requests through an inner transport, re-issuing them on transient failures.
///
/// A failure is transient when no response arrived (network error, timeout) or the status is
/// one of [`RETRYABLE_STATUS_CODES`]. Every other non-2xx status is returned on the first
/// attempt.
pub struct RetryingTransport<T>
where
	T: ?Sized + HttpTransport,
{
	inner: Arc<T>,
	policy: RetryPolicy,
	logger: Arc<dyn Logger>,
}
impl<T> RetryingTransport<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `inner` with the given policy, logging retries to `logger`.
	pub fn new(inner: Arc<T>, policy: RetryPolicy, logger: Arc<dyn Logger>) -> Self {
		Self { inner, policy, logger }
	}

	/// Returns the active policy.
	pub fn policy(&self) -> RetryPolicy {
		self.policy
	}

	/// Returns the wrapped transport.
	pub fn inner(&self) -> &Arc<T> {
		&self.inner
	}

	/// Sends `request` until it succeeds, fails fatally, or the retry budget is spent.
	///
	/// Non-2xx responses are converted into [`TransportError::Status`]. The last failure is
	/// returned unchanged once retries are exhausted.
	pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
		let mut attempt = 0;

		loop {
			let failure = match self.inner.send(request).await {
				Ok(response) if response.is_success() => return Ok(response),
				Ok(response) =>
					TransportError::Status { status: response.status, body: response.text() },
				Err(e) => e,
			};

			if !failure.is_retryable() || attempt >= self.policy.max_retries {
				return Err(failure);
			}

			attempt += 1;

			let delay = self.policy.delay_for(attempt);

			self.logger.warn(&format!(
				"Retrying request {} {} (attempt {attempt}/{}) after {}ms",
				request.method,
				request.url,
				self.policy.max_retries,
				delay.as_millis(),
			));

			tokio::time::sleep(delay).await;
		}
	}
}
impl<T> Debug for RetryingTransport<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RetryingTransport").field("policy", &self.policy).finish_non_exhaustive()
	}
}
