//! Identifiers issued by the LMS backend.
//!
//! User and course ids are backend record keys (object ids or slugs). They travel as URL path
//! segments of the enrollment endpoint and as the persisted `courseId` value, so only ASCII
//! letters, digits, `-` and `_` are accepted. Device ids are opaque tags the backend hands out
//! with the user record and only ever travel inside a JSON body.

// std
use std::{
	hash::{Hash, Hasher},
	marker::PhantomData,
};
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// Validation rules for one family of identifiers.
pub trait IdKind {
	/// Label used in errors and `Debug` output.
	const LABEL: &'static str;
	/// Maximum length in bytes.
	const MAX_LEN: usize;

	/// Whether `ch` may appear in an identifier of this family.
	fn permits(ch: char) -> bool;
}

/// Marker for user record keys.
#[derive(Debug)]
pub enum UserKind {}
impl IdKind for UserKind {
	const LABEL: &'static str = "User";
	const MAX_LEN: usize = 64;

	fn permits(ch: char) -> bool {
		is_record_key_char(ch)
	}
}

/// Marker for course record keys.
#[derive(Debug)]
pub enum CourseKind {}
impl IdKind for CourseKind {
	const LABEL: &'static str = "Course";
	const MAX_LEN: usize = 64;

	fn permits(ch: char) -> bool {
		is_record_key_char(ch)
	}
}

/// Marker for device tags.
#[derive(Debug)]
pub enum DeviceKind {}
impl IdKind for DeviceKind {
	const LABEL: &'static str = "Device";
	const MAX_LEN: usize = 128;

	fn permits(ch: char) -> bool {
		!ch.is_whitespace() && !ch.is_control()
	}
}

/// Backend identifier of an LMS user.
pub type UserId = Id<UserKind>;
/// Backend identifier of a course.
pub type CourseId = Id<CourseKind>;
/// Identifier of the device a renewal credential was issued to.
pub type DeviceId = Id<DeviceKind>;

/// Validated identifier of the family `K`.
pub struct Id<K>
where
	K: IdKind,
{
	value: String,
	kind: PhantomData<K>,
}
impl<K> Id<K>
where
	K: IdKind,
{
	/// Validates `value` against the rules of `K`.
	pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
		let value = value.into();

		validate::<K>(&value)?;

		Ok(Self { value, kind: PhantomData })
	}
}
impl<K> Clone for Id<K>
where
	K: IdKind,
{
	fn clone(&self) -> Self {
		Self { value: self.value.clone(), kind: PhantomData }
	}
}
impl<K> PartialEq for Id<K>
where
	K: IdKind,
{
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}
impl<K> Eq for Id<K> where K: IdKind {}
impl<K> Hash for Id<K>
where
	K: IdKind,
{
	fn hash<H>(&self, state: &mut H)
	where
		H: Hasher,
	{
		self.value.hash(state);
	}
}
impl<K> AsRef<str> for Id<K>
where
	K: IdKind,
{
	fn as_ref(&self) -> &str {
		&self.value
	}
}
impl<K> Debug for Id<K>
where
	K: IdKind,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}({})", K::LABEL, self.value)
	}
}
impl<K> Display for Id<K>
where
	K: IdKind,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.value)
	}
}
impl<K> Serialize for Id<K>
where
	K: IdKind,
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.value)
	}
}
impl<'de, K> Deserialize<'de> for Id<K>
where
	K: IdKind,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Self::new(raw).map_err(D::Error::custom)
	}
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Identifier family.
		kind: &'static str,
	},
	/// The identifier is longer than its family allows.
	#[error("{kind} identifier is {len} bytes long; the limit is {max}.")]
	TooLong {
		/// Identifier family.
		kind: &'static str,
		/// Observed length in bytes.
		len: usize,
		/// Maximum length in bytes.
		max: usize,
	},
	/// The identifier contains a character its family rejects.
	#[error("{kind} identifier contains {ch:?} at byte {position}.")]
	InvalidCharacter {
		/// Identifier family.
		kind: &'static str,
		/// Offending character.
		ch: char,
		/// Byte offset of the character.
		position: usize,
	},
}

fn is_record_key_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_')
}

fn validate<K>(value: &str) -> Result<(), IdentifierError>
where
	K: IdKind,
{
	if value.is_empty() {
		return Err(IdentifierError::Empty { kind: K::LABEL });
	}
	if value.len() > K::MAX_LEN {
		return Err(IdentifierError::TooLong { kind: K::LABEL, len: value.len(), max: K::MAX_LEN });
	}
	if let Some((position, ch)) = value.char_indices().find(|(_, ch)| !K::permits(*ch)) {
		return Err(IdentifierError::InvalidCharacter { kind: K::LABEL, ch, position });
	}

	Ok(())
}
