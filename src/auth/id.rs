//! Identifiers of the Keez application and client a [`KeezClient`](crate::client::KeezClient)
//! acts for.
//!
//! Both values end up in URLs: the application id inside the OAuth `client_id`, the client id
//! as a path segment of every resource. Validation therefore rejects anything that would need
//! escaping to survive as a single segment.

// self
use crate::_prelude::*;

/// Longest identifier accepted, in bytes.
pub const IDENTIFIER_MAX_LEN: usize = 64;

/// Which identifier failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierKind {
	/// [`ApplicationId`].
	Application,
	/// [`ClientEid`].
	Client,
}
impl Display for IdentifierKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(match self {
			Self::Application => "Application",
			Self::Client => "Client",
		})
	}
}

/// Error returned when an identifier cannot be used in Keez URLs.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} id cannot be empty.")]
	Empty {
		/// Offending identifier.
		kind: IdentifierKind,
	},
	/// The identifier contains a character that is not allowed in a bare path segment.
	#[error("{kind} id contains {found:?}, which is not allowed in a URL path segment.")]
	InvalidCharacter {
		/// Offending identifier.
		kind: IdentifierKind,
		/// First rejected character.
		found: char,
	},
	/// The identifier is longer than [`IDENTIFIER_MAX_LEN`].
	#[error("{kind} id is {len} bytes long; at most {max} are accepted.")]
	TooLong {
		/// Offending identifier.
		kind: IdentifierKind,
		/// Actual length in bytes.
		len: usize,
		/// Maximum accepted length in bytes.
		max: usize,
	},
}

macro_rules! def_id {
	($(#[$meta:meta])* $name:ident => $kind:expr) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates and wraps `value`.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				validate($kind, &value)?;

				Ok(Self(value))
			}

			/// Returns the identifier as sent on the wire.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({})", stringify!($name), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

def_id! {
	/// Keez application identifier, issued together with the API secret.
	ApplicationId => IdentifierKind::Application
}
def_id! {
	/// Keez client (company) external identifier embedded in resource paths.
	ClientEid => IdentifierKind::Client
}

impl ApplicationId {
	/// Returns the OAuth `client_id` Keez expects for this application: `app{id}`.
	pub fn oauth_client_id(&self) -> String {
		format!("app{}", self.0)
	}
}

fn validate(kind: IdentifierKind, value: &str) -> Result<(), IdentifierError> {
	if value.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if value.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, len: value.len(), max: IDENTIFIER_MAX_LEN });
	}
	if let Some(found) = value.chars().find(|c| !is_segment_char(*c)) {
		return Err(IdentifierError::InvalidCharacter { kind, found });
	}

	Ok(())
}

// RFC 3986 unreserved characters.
fn is_segment_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_must_be_bare_path_segments() {
		assert_eq!(
			ClientEid::new("").expect_err("Empty ids must be rejected."),
			IdentifierError::Empty { kind: IdentifierKind::Client },
		);
		assert_eq!(
			ClientEid::new("a/b").expect_err("Separators must be rejected."),
			IdentifierError::InvalidCharacter { kind: IdentifierKind::Client, found: '/' },
		);
		assert_eq!(
			ApplicationId::new("app 1").expect_err("Whitespace must be rejected."),
			IdentifierError::InvalidCharacter { kind: IdentifierKind::Application, found: ' ' },
		);
		assert!(ApplicationId::new("a".repeat(IDENTIFIER_MAX_LEN)).is_ok());
		assert!(matches!(
			ApplicationId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { len: 65, .. })
		));
	}

	#[test]
	fn application_id_derives_the_oauth_client_id() {
		let app: ApplicationId = "4f2a9c".parse().expect("Application fixture should be valid.");

		assert_eq!(app.oauth_client_id(), "app4f2a9c");
		assert_eq!(format!("{app:?}"), "ApplicationId(4f2a9c)");
		assert_eq!(app.to_string(), "4f2a9c");
	}

	#[test]
	fn deserialization_validates() {
		let client: ClientEid =
			serde_json::from_str("\"client-42\"").expect("Client id should deserialize.");

		assert_eq!(client.as_str(), "client-42");
		assert!(serde_json::from_str::<ClientEid>("\"client?42\"").is_err());
	}
}
