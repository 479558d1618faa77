use serde::{Deserialize, Serialize};

use super::TokenMap;
use super::version::Version;

/// Unparsed record locating and identifying one node definition.
///
/// Produced by discovery plugins (or synthesized by the registry for
/// out-of-band lookups) and never modified once indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResult {
	/// Unique key within [`Self::source_type`].
	pub identifier: String,
	pub version: Version,
	/// Display name; usually the identifier with any version suffix removed.
	pub name: String,
	/// Grouping label shared by related nodes. Empty when ungrouped.
	pub family: String,
	/// Selects the parser plugin; usually a file extension.
	pub discovery_type: String,
	/// Namespace of the parser plugin that owns [`Self::discovery_type`].
	pub source_type: String,
	/// Location as discovered.
	pub uri: String,
	/// Location after asset resolution.
	pub resolved_uri: String,
	/// Inline definition text. When present the parser reads this instead of
	/// [`Self::resolved_uri`].
	pub source_code: Option<String>,
	pub metadata: TokenMap,
	/// Opaque payload for the parser plugin.
	pub blind_data: String,
	/// Selects one definition inside an asset that holds several.
	pub sub_identifier: Option<String>,
	/// Extra identifiers this definition answers to.
	pub aliases: Vec<String>,
}

impl DiscoveryResult {
	#[allow(clippy::too_many_arguments, reason = "constructor for all required fields")]
	pub fn new(
		identifier: impl Into<String>,
		version: Version,
		name: impl Into<String>,
		family: impl Into<String>,
		discovery_type: impl Into<String>,
		source_type: impl Into<String>,
		uri: impl Into<String>,
		resolved_uri: impl Into<String>,
	) -> Self {
		Self {
			identifier: identifier.into(),
			version,
			name: name.into(),
			family: family.into(),
			discovery_type: discovery_type.into(),
			source_type: source_type.into(),
			uri: uri.into(),
			resolved_uri: resolved_uri.into(),
			source_code: None,
			metadata: TokenMap::new(),
			blind_data: String::new(),
			sub_identifier: None,
			aliases: Vec::new(),
		}
	}

	#[must_use]
	pub fn with_source_code(mut self, source_code: impl Into<String>) -> Self {
		self.source_code = Some(source_code.into());
		self
	}

	#[must_use]
	pub fn with_metadata(mut self, metadata: TokenMap) -> Self {
		self.metadata = metadata;
		self
	}

	#[must_use]
	pub fn with_blind_data(mut self, blind_data: impl Into<String>) -> Self {
		self.blind_data = blind_data.into();
		self
	}

	#[must_use]
	pub fn with_sub_identifier(mut self, sub_identifier: impl Into<String>) -> Self {
		self.sub_identifier = Some(sub_identifier.into());
		self
	}

	#[must_use]
	pub fn with_aliases(mut self, aliases: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.aliases = aliases.into_iter().map(Into::into).collect();
		self
	}

	/// Identity fields a parsed node must reproduce exactly.
	pub fn identity(&self) -> NodeIdentity<'_> {
		NodeIdentity {
			identifier: &self.identifier,
			name: &self.name,
			version: self.version,
			family: &self.family,
			source_type: &self.source_type,
		}
	}

	/// True if the parser reads inline text rather than a fetched file.
	pub fn has_source_code(&self) -> bool {
		self.source_code.is_some()
	}
}

/// Borrowed identity of a node or discovery result.
///
/// Two identities are equal when every field is equal; versions compare
/// without their default flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdentity<'a> {
	pub identifier: &'a str,
	pub name: &'a str,
	pub version: Version,
	pub family: &'a str,
	pub source_type: &'a str,
}

impl NodeIdentity<'_> {
	/// Names of the fields that differ from `other`, in declaration order.
	pub fn mismatched_fields(&self, other: &NodeIdentity<'_>) -> Vec<&'static str> {
		let mut fields = Vec::new();
		if self.identifier != other.identifier {
			fields.push("identifier");
		}
		if self.name != other.name {
			fields.push("name");
		}
		if self.version != other.version {
			fields.push("version");
		}
		if self.family != other.family {
			fields.push("family");
		}
		if self.source_type != other.source_type {
			fields.push("source_type");
		}
		fields
	}
}

impl std::fmt::Display for NodeIdentity<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}:{}:{}:{}:{}",
			self.identifier, self.version, self.name, self.family, self.source_type
		)
	}
}
