//! In-memory token store with single in-flight refresh.
//!
//! [`TokenStore`] holds at most one [`Credential`] together with the host mode it belongs to.
//! When a caller needs a token and the held one is missing or expired, the store starts a
//! refresh and records it as the in-flight flight. Callers arriving while that flight is
//! pending join it instead of starting their own, and all of them observe the same outcome.
//!
//! The check-and-set of the in-flight handle happens under a synchronous lock before the first
//! `.await`, so the guarantee holds on multi-threaded runtimes as well.

// self
use crate::{_prelude::*, auth::Credential, auth::TokenSecret, config::HostMode, obs::Logger};

/// A token ready to be sent, paired with the host mode it was issued for.
#[derive(Clone, Debug)]
pub struct ValidToken {
	/// Bearer token.
	pub access_token: TokenSecret,
	/// Host the token is valid for; requests must go to this host's domain.
	pub mode: HostMode,
}

/// Per-client credential cache.
pub struct TokenStore {
	state: Mutex<StoreState>,
	logger: Arc<dyn Logger>,
}
impl TokenStore {
	/// Creates an empty store targeting `mode`.
	pub fn new(mode: HostMode, logger: Arc<dyn Logger>) -> Self {
		Self { state: Mutex::new(StoreState { mode, credential: None, in_flight: None }), logger }
	}

	/// Returns the active host mode.
	pub fn mode(&self) -> HostMode {
		self.state.lock().mode
	}

	/// Returns a snapshot of the held credential.
	pub fn credential(&self) -> Option<Credential> {
		self.state.lock().credential.clone()
	}

	/// Returns `true` while a refresh is pending.
	pub fn is_refreshing(&self) -> bool {
		self.state.lock().in_flight.as_ref().is_some_and(|flight| !flight.outcome.is_initialized())
	}

	/// Selects the production (`true`) or staging (`false`) host.
	///
	/// Switching to a different mode discards the held credential and detaches any pending
	/// refresh, whose result will then not be stored. Selecting the active mode is a no-op.
	/// Returns `true` when the mode changed.
	pub fn switch_host(&self, live: bool) -> bool {
		let mode = HostMode::from_live(live);
		let mut state = self.state.lock();

		if state.mode == mode {
			return false;
		}

		state.mode = mode;
		state.credential = None;
		state.in_flight = None;

		true
	}

	/// Returns a usable token, running `refresh` only when no usable credential is held.
	///
	/// `refresh` receives the host mode to authenticate against. It is not called when the
	/// held credential is still usable or when another caller's refresh is already pending; in
	/// the latter case this call waits for and returns that refresh's outcome. A failed refresh
	/// leaves the held credential untouched.
	pub async fn ensure_valid_token<F, Fut>(&self, refresh: F) -> Result<ValidToken>
	where
		F: FnOnce(HostMode) -> Fut,
		Fut: Future<Output = Result<Credential>>,
	{
		let (flight, started) = {
			let mut state = self.state.lock();

			if let Some(credential) =
				state.credential.as_ref().filter(|c| c.is_usable_at(OffsetDateTime::now_utc()))
			{
				return Ok(ValidToken {
					access_token: credential.access_token.clone(),
					mode: state.mode,
				});
			}

			// A resolved flight whose waiters all went away before settling it.
			state.in_flight.take_if(|flight| flight.outcome.is_initialized());

			match state.in_flight.as_ref() {
				Some(flight) => (Arc::clone(flight), false),
				None => {
					let flight = Arc::new(RefreshFlight::new(state.mode));

					state.in_flight = Some(Arc::clone(&flight));

					(flight, true)
				},
			}
		};

		if started {
			self.logger.info(&format!(
				"Token is invalid or expired, refreshing against the {} host",
				flight.mode
			));
		}

		let outcome = flight.outcome.get_or_init(|| refresh(flight.mode)).await.clone();

		if let Some(Err(e)) = self.settle(&flight, &outcome) {
			self.logger.error(&format!("Token refresh failed: {e}"));
		}

		outcome.map(|credential| ValidToken { access_token: credential.access_token, mode: flight.mode })
	}

	// Returns the outcome when this call cleared the flight; logging happens after the lock is
	// released so a logger may call back into the store.
	fn settle<'o>(
		&self,
		flight: &Arc<RefreshFlight>,
		outcome: &'o Result<Credential>,
	) -> Option<&'o Result<Credential>> {
		let mut state = self.state.lock();

		if !state.in_flight.as_ref().is_some_and(|current| Arc::ptr_eq(current, flight)) {
			return None;
		}

		state.in_flight = None;

		if let Some(credential) = outcome.as_ref().ok().filter(|_| state.mode == flight.mode) {
			state.credential = Some(credential.clone());
		}

		Some(outcome)
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("TokenStore")
			.field("mode", &state.mode)
			.field("credential", &state.credential)
			.field("refreshing", &state.in_flight.is_some())
			.finish_non_exhaustive()
	}
}

struct StoreState {
	mode: HostMode,
	credential: Option<Credential>,
	in_flight: Option<Arc<RefreshFlight>>,
}

struct RefreshFlight {
	mode: HostMode,
	outcome: AsyncOnceCell<Result<Credential>>,
}
impl RefreshFlight {
	fn new(mode: HostMode) -> Self {
		Self { mode, outcome: AsyncOnceCell::new() }
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::{
		OnceLock, Weak,
		atomic::{AtomicUsize, Ordering},
	};
	// self
	use super::*;
	use crate::obs::{LogLevel, MemoryLogger, NoopLogger};

	fn store(mode: HostMode) -> TokenStore {
		TokenStore::new(mode, Arc::new(NoopLogger))
	}

	fn credential(token: &str, expires_in: u64) -> Credential {
		Credential::builder()
			.access_token(token)
			.expires_in(expires_in)
			.expiry_buffer(Duration::from_secs(300))
			.build()
			.expect("Credential fixture should build.")
	}

	fn counting_refresh<'a>(
		calls: &'a AtomicUsize,
		token: &'static str,
		delay: Duration,
	) -> impl FnOnce(HostMode) -> Pin<Box<dyn Future<Output = Result<Credential>> + Send + 'a>> + 'a
	{
		move |_| {
			Box::pin(async move {
				calls.fetch_add(1, Ordering::SeqCst);
				tokio::time::sleep(delay).await;

				Ok(credential(token, 3600))
			})
		}
	}

	#[tokio::test]
	async fn usable_credential_is_returned_without_refreshing() {
		let store = store(HostMode::Staging);
		let calls = AtomicUsize::new(0);
		let first = store
			.ensure_valid_token(counting_refresh(&calls, "tok-1", Duration::ZERO))
			.await
			.expect("First call should refresh.");
		let second = store
			.ensure_valid_token(counting_refresh(&calls, "tok-2", Duration::ZERO))
			.await
			.expect("Second call should reuse the cached token.");

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(first.access_token.expose(), "tok-1");
		assert_eq!(second.access_token.expose(), "tok-1");
		assert_eq!(second.mode, HostMode::Staging);
	}

	#[tokio::test(start_paused = true)]
	async fn concurrent_callers_share_one_refresh() {
		let store = store(HostMode::Staging);
		let calls = AtomicUsize::new(0);
		let delay = Duration::from_millis(50);
		let (a, b, c, d) = tokio::join!(
			store.ensure_valid_token(counting_refresh(&calls, "shared", delay)),
			store.ensure_valid_token(counting_refresh(&calls, "other-b", delay)),
			store.ensure_valid_token(counting_refresh(&calls, "other-c", delay)),
			store.ensure_valid_token(counting_refresh(&calls, "other-d", delay)),
		);

		assert_eq!(calls.load(Ordering::SeqCst), 1);

		for token in [a, b, c, d] {
			assert_eq!(token.expect("Every waiter should succeed.").access_token.expose(), "shared");
		}

		assert!(!store.is_refreshing());
	}

	#[tokio::test(start_paused = true)]
	async fn refresh_failure_reaches_every_waiter_once() {
		let logger = Arc::new(MemoryLogger::default());
		let store = TokenStore::new(HostMode::Staging, logger.clone());
		let calls = AtomicUsize::new(0);
		let counter = &calls;
		let failing = move |_: HostMode| async move {
			counter.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(Duration::from_millis(10)).await;

			Err::<Credential, _>(Error::authentication_message("Authentication failed: boom"))
		};
		let (a, b, c) = tokio::join!(
			store.ensure_valid_token(failing),
			store.ensure_valid_token(counting_refresh(&calls, "unused", Duration::ZERO)),
			store.ensure_valid_token(counting_refresh(&calls, "unused", Duration::ZERO)),
		);

		assert_eq!(calls.load(Ordering::SeqCst), 1);

		for result in [a, b, c] {
			let err = result.expect_err("Every waiter should observe the failure.");

			assert!(err.is_authentication());
			assert_eq!(err.message(), "Authentication failed: boom");
		}

		assert!(store.credential().is_none());
		assert_eq!(logger.messages(LogLevel::Error).len(), 1);

		store
			.ensure_valid_token(counting_refresh(&calls, "recovered", Duration::ZERO))
			.await
			.expect("A later call should start a new refresh.");

		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[derive(Default)]
	struct ReentrantLogger {
		store: OnceLock<Weak<TokenStore>>,
		observed: Mutex<Vec<HostMode>>,
	}
	impl ReentrantLogger {
		fn observe(&self) {
			if let Some(store) = self.store.get().and_then(Weak::upgrade) {
				self.observed.lock().push(store.mode());
			}
		}
	}
	impl Logger for ReentrantLogger {
		fn info(&self, _: &str) {
			self.observe();
		}

		fn error(&self, _: &str) {
			self.observe();
		}

		fn warn(&self, _: &str) {}

		fn debug(&self, _: &str) {}
	}

	#[tokio::test]
	async fn logger_may_read_the_store_while_reporting_a_failed_refresh() {
		let logger = Arc::new(ReentrantLogger::default());
		let store = Arc::new(TokenStore::new(HostMode::Production, logger.clone()));

		logger.store.set(Arc::downgrade(&store)).expect("Logger should be wired once.");

		let err = store
			.ensure_valid_token(|_| async {
				Err::<Credential, _>(Error::authentication_message("Authentication failed: down"))
			})
			.await
			.expect_err("Refresh should fail.");

		assert!(err.is_authentication());
		assert_eq!(*logger.observed.lock(), [HostMode::Production, HostMode::Production]);
	}

	#[tokio::test]
	async fn switching_host_discards_credential_and_redundant_switch_keeps_it() {
		let store = store(HostMode::Staging);
		let calls = AtomicUsize::new(0);

		store
			.ensure_valid_token(counting_refresh(&calls, "staging", Duration::ZERO))
			.await
			.expect("Initial refresh should succeed.");

		assert!(!store.switch_host(false));
		assert!(store.credential().is_some());
		assert!(store.switch_host(true));
		assert!(store.credential().is_none());
		assert_eq!(store.mode(), HostMode::Production);

		let token = store
			.ensure_valid_token(|mode| {
				assert_eq!(mode, HostMode::Production);

				counting_refresh(&calls, "production", Duration::ZERO)(mode)
			})
			.await
			.expect("Refresh after switching should succeed.");

		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert_eq!(token.mode, HostMode::Production);
		assert_eq!(token.access_token.expose(), "production");
	}

	#[tokio::test(start_paused = true)]
	async fn refresh_started_before_a_switch_is_not_stored() {
		let store = store(HostMode::Staging);
		let calls = AtomicUsize::new(0);
		let pending =
			store.ensure_valid_token(counting_refresh(&calls, "staging", Duration::from_millis(20)));
		let switch = async {
			tokio::time::sleep(Duration::from_millis(5)).await;
			store.switch_host(true);
		};
		let (token, _) = tokio::join!(pending, switch);
		let token = token.expect("The detached refresh still resolves for its caller.");

		assert_eq!(token.mode, HostMode::Staging);
		assert!(store.credential().is_none());
		assert_eq!(store.mode(), HostMode::Production);
	}

	#[tokio::test]
	async fn expired_or_short_lived_credentials_are_refreshed() {
		let store = store(HostMode::Staging);
		let calls = AtomicUsize::new(0);
		let counter = &calls;
		let short_lived = move |_: HostMode| async move {
			counter.fetch_add(1, Ordering::SeqCst);

			Ok(credential("short", 60))
		};

		store.ensure_valid_token(short_lived).await.expect("Short-lived refresh should succeed.");

		let token = store
			.ensure_valid_token(counting_refresh(&calls, "long", Duration::ZERO))
			.await
			.expect("Second refresh should succeed.");

		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert_eq!(token.access_token.expose(), "long");
	}

	#[tokio::test(start_paused = true)]
	async fn abandoned_refresh_is_taken_over_by_the_next_caller() {
		let store = store(HostMode::Staging);
		let calls = AtomicUsize::new(0);
		let abandoned = tokio::time::timeout(
			Duration::from_millis(5),
			store.ensure_valid_token(counting_refresh(&calls, "slow", Duration::from_secs(60))),
		)
		.await;

		assert!(abandoned.is_err());

		let token = store
			.ensure_valid_token(counting_refresh(&calls, "fast", Duration::ZERO))
			.await
			.expect("The next caller should complete the refresh.");

		assert_eq!(token.access_token.expose(), "fast");
		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert!(!store.is_refreshing());
	}
}
