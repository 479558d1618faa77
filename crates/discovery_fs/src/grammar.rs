//! Identifier grammar: `family_rest_of_name[_major[_minor]]`.
//!
//! Tokens are split on `_`, empty tokens dropped. The first token is the
//! family once there is more than one token. Trailing numeric tokens are the
//! version:
//!
//! | identifier      | family | name        | version |
//! |-----------------|--------|-------------|---------|
//! | `foo`           | `foo`  | `foo`       | none    |
//! | `foo_bar`       | `foo`  | `foo_bar`   | none    |
//! | `foo_2`         | `foo`  | `foo`       | 2.0     |
//! | `mix_float_2_1` | `mix`  | `mix_float` | 2.1     |
//! | `foo_2_bar`     | error  |             |         |
//!
//! The name is the identifier with the version suffix and the `_` before it
//! removed; nothing else is normalised. A numeric token followed by a
//! non-numeric one is rejected rather than read as part of the name.

use nodedef_registry::Version;

/// Why an identifier does not fit the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
	#[error("identifier has no tokens")]
	Empty,

	#[error("identifier '{identifier}' has a version token before a name token")]
	VersionBeforeName { identifier: String },

	#[error("identifier '{identifier}' has version token '{token}' out of range")]
	VersionOutOfRange { identifier: String, token: String },
}

/// Family, name and version recovered from an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIdentifier {
	pub family: String,
	pub name: String,
	/// [`Version::invalid`] when the identifier carries no version.
	pub version: Version,
}

pub fn split_identifier(identifier: &str) -> Result<SplitIdentifier, IdentifierError> {
	let tokens = tokenize(identifier);

	let (last, prev) = match tokens.as_slice() {
		[] => return Err(IdentifierError::Empty),
		[_] => {
			return Ok(SplitIdentifier {
				family: identifier.to_owned(),
				name: identifier.to_owned(),
				version: Version::invalid(),
			});
		}
		[.., prev, last] => (*last, *prev),
	};

	let family = tokens[0].1.to_owned();
	let last_num = numeric(identifier, last.1)?;
	let prev_num = numeric(identifier, prev.1)?;

	let (suffix_start, version) = match (prev_num, last_num) {
		// With two tokens the first must stay as the name.
		(Some(major), Some(minor)) if tokens.len() > 2 => (prev.0, Version::new(major, minor)),
		(_, Some(major)) => (last.0, Version::major_only(major)),
		(Some(_), None) => {
			return Err(IdentifierError::VersionBeforeName {
				identifier: identifier.to_owned(),
			});
		}
		(None, None) => (identifier.len(), Version::invalid()),
	};

	Ok(SplitIdentifier {
		family,
		name: identifier[..suffix_start].trim_end_matches('_').to_owned(),
		version,
	})
}

/// Non-empty `_`-separated tokens with their byte offsets.
fn tokenize(identifier: &str) -> Vec<(usize, &str)> {
	let mut tokens = Vec::new();
	let mut offset = 0;
	for token in identifier.split('_') {
		if !token.is_empty() {
			tokens.push((offset, token));
		}
		offset += token.len() + 1;
	}
	tokens
}

/// `Some` for an all-digit token, `None` for anything else.
fn numeric(identifier: &str, token: &str) -> Result<Option<u32>, IdentifierError> {
	if !token.bytes().all(|b| b.is_ascii_digit()) {
		return Ok(None);
	}
	token
		.parse::<u32>()
		.map(Some)
		.map_err(|_| IdentifierError::VersionOutOfRange {
			identifier: identifier.to_owned(),
			token: token.to_owned(),
		})
}
