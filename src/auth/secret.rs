//! Redacting wrapper for the API secret and issued access tokens.

// self
use crate::_prelude::*;

const REDACTED: &str = "<redacted>";

/// Secret string that never appears in `Debug` or `Display` output.
///
/// Cloning is cheap: every waiter of a shared token refresh receives a clone of the same
/// access token.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(Arc<str>);
impl TokenSecret {
	/// Wraps `value`.
	pub fn new(value: impl AsRef<str>) -> Self {
		Self(Arc::from(value.as_ref()))
	}

	/// Returns the raw value; never log it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` for an empty or whitespace-only secret.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}

	/// Returns the `Authorization` header value carrying this token.
	pub fn bearer_value(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(Arc::from(value))
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret({REDACTED})")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}
