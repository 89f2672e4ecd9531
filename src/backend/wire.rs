//! JSON payloads exchanged with the backend.

// crates.io
use serde::{
	Deserializer,
	de::{IgnoredAny, SeqAccess, Visitor},
};
// self
use crate::{
	_prelude::*,
	auth::{CourseId, DeviceId, UserProfile},
};

/// Body of `POST auth/refresh`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
	pub refresh_token: &'a str,
}

/// Body of a 2xx `POST auth/refresh` response.
///
/// Every field is optional on the wire so a partial payload surfaces as a precise
/// missing-field error instead of an opaque decode failure.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
	/// Short-lived access credential.
	#[serde(default)]
	pub access_token: Option<String>,
	/// Rotated renewal credential.
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Authenticated user.
	#[serde(default)]
	pub user: Option<UserProfile>,
}

/// Body of `POST auth/logout`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogoutRequest<'a> {
	pub device_id: &'a DeviceId,
}

/// One element of the `GET course-enrollment/courses/{userId}` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
	/// Enrollment record identifier.
	#[serde(default)]
	pub id: Option<String>,
	/// Enrolled course; absent when the backend did not expand the relation.
	#[serde(default)]
	pub course: Option<CourseSummary>,
}

/// `GET course-enrollment/courses/{userId}` response reduced to its authoritative entry.
///
/// Only index 0 is decoded. Later entries are skipped unvalidated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EnrollmentListing {
	pub first: Option<Enrollment>,
}
impl<'de> Deserialize<'de> for EnrollmentListing {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct FirstOnly;
		impl<'de> Visitor<'de> for FirstOnly {
			type Value = EnrollmentListing;

			fn expecting(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("a list of enrollments")
			}

			fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
			where
				A: SeqAccess<'de>,
			{
				let first = seq.next_element::<Enrollment>()?;

				while seq.next_element::<IgnoredAny>()?.is_some() {}

				Ok(EnrollmentListing { first })
			}
		}

		deserializer.deserialize_seq(FirstOnly)
	}
}

/// Course fields the session bootstrap cares about.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CourseSummary {
	/// Course identifier.
	pub id: CourseId,
	/// Course title.
	#[serde(default)]
	pub title: Option<String>,
}

/// Error payload returned by the backend on non-2xx responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ErrorPayload {
	#[serde(default)]
	message: Option<serde_json::Value>,
	#[serde(default)]
	error: Option<String>,
}
impl ErrorPayload {
	const PREVIEW_LIMIT: usize = 256;

	/// Extracts a human-readable message from an error body, truncated for logs.
	pub(crate) fn preview(body: &[u8]) -> Option<String> {
		let message = match serde_json::from_slice::<ErrorPayload>(body) {
			Ok(payload) => payload.message_text(),
			Err(_) => {
				let text = String::from_utf8_lossy(body).trim().to_owned();

				(!text.is_empty()).then_some(text)
			},
		}?;

		Some(truncate_preview(message))
	}

	fn message_text(self) -> Option<String> {
		match self.message {
			Some(serde_json::Value::String(text)) => Some(text),
			Some(serde_json::Value::Array(items)) => {
				let joined = items
					.iter()
					.filter_map(serde_json::Value::as_str)
					.collect::<Vec<_>>()
					.join("; ");

				(!joined.is_empty()).then_some(joined)
			},
			_ => self.error,
		}
	}
}

fn truncate_preview(text: String) -> String {
	if text.chars().count() <= ErrorPayload::PREVIEW_LIMIT {
		return text;
	}

	let mut buf: String = text.chars().take(ErrorPayload::PREVIEW_LIMIT).collect();

	buf.push('…');

	buf
}
