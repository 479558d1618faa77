use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Version of a node definition.
///
/// A `(major, minor)` pair plus a flag marking it as the default version of its
/// family. Equality, ordering and hashing only look at the numbers, so a default
/// and a non-default `2.1` compare equal.
///
/// `0.0` is the invalid version and stands in for "no version".
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
pub struct Version {
	major: u32,
	minor: u32,
	is_default: bool,
}

impl Version {
	/// Creates a non-default version.
	pub const fn new(major: u32, minor: u32) -> Self {
		Self {
			major,
			minor,
			is_default: false,
		}
	}

	/// Creates a major-only version (`minor` is zero).
	pub const fn major_only(major: u32) -> Self {
		Self::new(major, 0)
	}

	/// Returns the invalid version.
	pub const fn invalid() -> Self {
		Self::new(0, 0)
	}

	/// Returns a copy of this version flagged as the default.
	#[must_use]
	pub const fn as_default(self) -> Self {
		Self {
			is_default: true,
			..self
		}
	}

	pub const fn major(&self) -> u32 {
		self.major
	}

	pub const fn minor(&self) -> u32 {
		self.minor
	}

	pub const fn is_default(&self) -> bool {
		self.is_default
	}

	/// Returns true unless this is `0.0`.
	pub const fn is_valid(&self) -> bool {
		self.major != 0 || self.minor != 0
	}
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.major == other.major && self.minor == other.minor
	}
}

impl Eq for Version {}

impl Hash for Version {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.major.hash(state);
		self.minor.hash(state);
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		self.major.cmp(&other.major).then_with(|| self.minor.cmp(&other.minor))
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_valid() {
			write!(f, "{}.{}", self.major, self.minor)
		} else {
			write!(f, "<invalid version>")
		}
	}
}

impl fmt::Debug for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Version({self}")?;
		if self.is_default {
			write!(f, ", default")?;
		}
		write!(f, ")")
	}
}

/// Query-time predicate over versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VersionFilter {
	/// Only entries whose version is flagged default.
	DefaultOnly,
	/// Every entry, regardless of version.
	#[default]
	AllVersions,
}

impl VersionFilter {
	/// Returns true if `version` passes the filter.
	pub fn matches(self, version: &Version) -> bool {
		match self {
			Self::DefaultOnly => version.is_default(),
			Self::AllVersions => true,
		}
	}
}
