//! Redacted wrapper for renewal and access credentials.

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Opaque credential string kept out of logs.
///
/// Both the long-lived renewal credential and the short-lived access credential travel in
/// this wrapper. Formatting never prints the value; [`fingerprint`](Self::fingerprint) gives
/// a stable, non-reversible tag for correlating rotations in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSecret(String);
impl CredentialSecret {
	const FINGERPRINT_LEN: usize = 12;

	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Wraps `value` unless it is empty or whitespace-only.
	pub fn non_empty(value: impl Into<String>) -> Option<Self> {
		let value = value.into();

		if value.trim().is_empty() { None } else { Some(Self(value)) }
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns the first hex characters of the SHA-256 digest of the secret.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());
		let mut out = String::with_capacity(Self::FINGERPRINT_LEN);

		for byte in digest.iter().take(Self::FINGERPRINT_LEN / 2) {
			out.push_str(&format!("{byte:02x}"));
		}

		out
	}
}
impl AsRef<str> for CredentialSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for CredentialSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CredentialSecret").field(&"<redacted>").finish()
	}
}
impl Display for CredentialSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = CredentialSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "CredentialSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn non_empty_rejects_blank_values() {
		assert!(CredentialSecret::non_empty("").is_none());
		assert!(CredentialSecret::non_empty("   ").is_none());
		assert_eq!(
			CredentialSecret::non_empty("rt-1").map(|secret| secret.expose().to_owned()),
			Some("rt-1".into())
		);
	}

	#[test]
	fn fingerprint_is_stable_and_short() {
		let a = CredentialSecret::new("refresh-a");
		let b = CredentialSecret::new("refresh-b");

		assert_eq!(a.fingerprint(), CredentialSecret::new("refresh-a").fingerprint());
		assert_ne!(a.fingerprint(), b.fingerprint());
		assert_eq!(a.fingerprint().len(), 12);
		assert!(!a.fingerprint().contains("refresh"));
	}
}
