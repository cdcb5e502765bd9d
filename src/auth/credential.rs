//! Issued client-credential grants and their derived expiry instants.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Errors produced by [`CredentialBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned a zero lifetime.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Token endpoint returned a lifetime that cannot be represented.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Result of one client-credentials grant.
///
/// The credential is immutable: a refresh replaces it wholesale. `expires_at` is computed at
/// receipt as `issued_at + expires_in - expiry_buffer`, so it always precedes the server's
/// own expiry.
#[derive(Clone)]
pub struct Credential {
	/// Bearer token sent on every authenticated call.
	pub access_token: TokenSecret,
	/// Token type reported by the token endpoint (normally `Bearer`).
	pub token_type: String,
	/// Scope granted by the token endpoint.
	pub scope: String,
	/// Lifetime reported by the token endpoint.
	pub expires_in: Duration,
	/// Instant the token response was received.
	pub issued_at: OffsetDateTime,
	/// Instant after which the token is treated as unusable.
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Returns a builder for constructing credentials from token responses.
	pub fn builder() -> CredentialBuilder {
		CredentialBuilder::default()
	}

	/// Returns `true` if the token can still be sent at `instant`.
	pub fn is_usable_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Convenience helper that checks usability against the current UTC instant.
	pub fn is_usable(&self) -> bool {
		self.is_usable_at(OffsetDateTime::now_utc())
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("scope", &self.scope)
			.field("expires_in", &self.expires_in)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`Credential`].
#[derive(Clone, Debug, Default)]
pub struct CredentialBuilder {
	access_token: Option<TokenSecret>,
	token_type: Option<String>,
	scope: Option<String>,
	expires_in: Option<u64>,
	expiry_buffer: Duration,
	issued_at: Option<OffsetDateTime>,
}
impl CredentialBuilder {
	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::from(token.into()));

		self
	}

	/// Sets the token type.
	pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}

	/// Sets the granted scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Sets the lifetime in seconds reported by the token endpoint.
	pub fn expires_in(mut self, seconds: u64) -> Self {
		self.expires_in = Some(seconds);

		self
	}

	/// Sets the safety margin subtracted from the lifetime.
	pub fn expiry_buffer(mut self, buffer: Duration) -> Self {
		self.expiry_buffer = buffer;

		self
	}

	/// Sets the receipt instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Consumes the builder and produces a [`Credential`].
	pub fn build(self) -> Result<Credential, CredentialBuilderError> {
		let access_token = self.access_token.ok_or(CredentialBuilderError::MissingAccessToken)?;
		let expires_in = self.expires_in.ok_or(CredentialBuilderError::MissingExpiresIn)?;

		if expires_in == 0 {
			return Err(CredentialBuilderError::NonPositiveExpiresIn);
		}

		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let lifetime = i64::try_from(expires_in)
			.ok()
			.and_then(|secs| time::Duration::seconds(secs).checked_sub(buffer(self.expiry_buffer)))
			.ok_or(CredentialBuilderError::ExpiresInOutOfRange)?;
		let expires_at =
			issued_at.checked_add(lifetime).ok_or(CredentialBuilderError::ExpiresInOutOfRange)?;

		Ok(Credential {
			access_token,
			token_type: self.token_type.unwrap_or_default(),
			scope: self.scope.unwrap_or_default(),
			expires_in: Duration::from_secs(expires_in),
			issued_at,
			expires_at,
		})
	}
}

fn buffer(value: Duration) -> time::Duration {
	time::Duration::try_from(value).unwrap_or(time::Duration::MAX)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expiry_subtracts_the_safety_buffer() {
		let credential = Credential::builder()
			.access_token("access")
			.token_type("Bearer")
			.scope("public-api")
			.expires_in(3600)
			.expiry_buffer(Duration::from_secs(300))
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.build()
			.expect("Credential builder should succeed for a one-hour grant.");

		assert_eq!(credential.expires_at, macros::datetime!(2025-01-01 00:55 UTC));
		assert!(credential.is_usable_at(macros::datetime!(2025-01-01 00:54:59 UTC)));
		assert!(!credential.is_usable_at(macros::datetime!(2025-01-01 00:55 UTC)));
		assert!(!credential.is_usable_at(macros::datetime!(2025-01-01 00:58 UTC)));
	}

	#[test]
	fn lifetime_shorter_than_buffer_is_never_usable() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let credential = Credential::builder()
			.access_token("short")
			.expires_in(60)
			.expiry_buffer(Duration::from_secs(300))
			.issued_at(issued)
			.build()
			.expect("Short-lived credentials should still build.");

		assert!(!credential.is_usable_at(issued));
	}

	#[test]
	fn builder_rejects_missing_or_zero_lifetime() {
		assert_eq!(
			Credential::builder().access_token("a").build().expect_err("Lifetime is required."),
			CredentialBuilderError::MissingExpiresIn,
		);
		assert_eq!(
			Credential::builder()
				.access_token("a")
				.expires_in(0)
				.build()
				.expect_err("Zero lifetime must be rejected."),
			CredentialBuilderError::NonPositiveExpiresIn,
		);
		assert_eq!(
			Credential::builder().expires_in(10).build().expect_err("Access token is required."),
			CredentialBuilderError::MissingAccessToken,
		);
	}

	#[test]
	fn owned_and_borrowed_tokens_build_the_same_secret() {
		let owned = Credential::builder()
			.access_token(String::from("issued"))
			.expires_in(3600)
			.build()
			.expect("Owned token should build.");
		let borrowed = Credential::builder()
			.access_token("issued")
			.expires_in(3600)
			.build()
			.expect("Borrowed token should build.");

		assert_eq!(owned.access_token, borrowed.access_token);
		assert_eq!(owned.access_token.expose(), "issued");
	}

	#[test]
	fn debug_output_redacts_token() {
		let credential = Credential::builder()
			.access_token("very-secret")
			.expires_in(60)
			.build()
			.expect("Credential should build.");

		assert!(!format!("{credential:?}").contains("very-secret"));
	}
}
