//! Parsed node definitions.

use indexmap::IndexMap;

use super::TokenMap;
use super::discovery::{DiscoveryResult, NodeIdentity};
use super::property::Property;
use super::version::Version;

/// An immutable, parsed node definition.
///
/// Properties keep their declaration order and are split into input and
/// output partitions; names are unique within each partition.
#[derive(Debug, Clone)]
pub struct Node {
	identifier: String,
	version: Version,
	name: String,
	family: String,
	context: String,
	source_type: String,
	definition_uri: String,
	implementation_uri: String,
	properties: Vec<Property>,
	inputs: IndexMap<String, usize>,
	outputs: IndexMap<String, usize>,
	metadata: TokenMap,
	source_code: Option<String>,
	is_valid: bool,
}

impl Node {
	/// Builds the explicitly-invalid node a parser returns for input it cannot use.
	///
	/// Carries only the discovery-time fields, so it always passes identity
	/// validation and caches like any other parse result.
	pub fn invalid(dr: &DiscoveryResult) -> Self {
		NodeBuilder::from_discovery(dr).valid(false).build()
	}

	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	pub fn version(&self) -> Version {
		self.version
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn family(&self) -> &str {
		&self.family
	}

	/// Free-form role tag (e.g. `pattern`, `surface`).
	pub fn context(&self) -> &str {
		&self.context
	}

	pub fn source_type(&self) -> &str {
		&self.source_type
	}

	pub fn definition_uri(&self) -> &str {
		&self.definition_uri
	}

	pub fn implementation_uri(&self) -> &str {
		&self.implementation_uri
	}

	/// All properties in declaration order.
	pub fn properties(&self) -> &[Property] {
		&self.properties
	}

	pub fn input(&self, name: &str) -> Option<&Property> {
		self.inputs.get(name).map(|&idx| &self.properties[idx])
	}

	pub fn output(&self, name: &str) -> Option<&Property> {
		self.outputs.get(name).map(|&idx| &self.properties[idx])
	}

	pub fn input_names(&self) -> impl Iterator<Item = &str> {
		self.inputs.keys().map(String::as_str)
	}

	pub fn output_names(&self) -> impl Iterator<Item = &str> {
		self.outputs.keys().map(String::as_str)
	}

	pub fn metadata(&self) -> &TokenMap {
		&self.metadata
	}

	pub fn source_code(&self) -> Option<&str> {
		self.source_code.as_deref()
	}

	pub fn is_valid(&self) -> bool {
		self.is_valid
	}

	pub fn identity(&self) -> NodeIdentity<'_> {
		NodeIdentity {
			identifier: &self.identifier,
			name: &self.name,
			version: self.version,
			family: &self.family,
			source_type: &self.source_type,
		}
	}
}

/// Assembles a [`Node`]; used by parser plugins.
#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
	identifier: String,
	version: Version,
	name: String,
	family: String,
	context: String,
	source_type: String,
	definition_uri: String,
	implementation_uri: String,
	properties: Vec<Property>,
	metadata: TokenMap,
	source_code: Option<String>,
	validity: Option<bool>,
}

impl NodeBuilder {
	/// Starts from the identity fields alone.
	pub fn new(
		identifier: impl Into<String>,
		version: Version,
		name: impl Into<String>,
		family: impl Into<String>,
		source_type: impl Into<String>,
	) -> Self {
		Self {
			identifier: identifier.into(),
			version,
			name: name.into(),
			family: family.into(),
			source_type: source_type.into(),
			..Self::default()
		}
	}

	/// Starts from a discovery result, copying identity, URIs, metadata and source code.
	///
	/// Both URIs default to the resolved URI.
	pub fn from_discovery(dr: &DiscoveryResult) -> Self {
		Self {
			identifier: dr.identifier.clone(),
			version: dr.version,
			name: dr.name.clone(),
			family: dr.family.clone(),
			source_type: dr.source_type.clone(),
			definition_uri: dr.resolved_uri.clone(),
			implementation_uri: dr.resolved_uri.clone(),
			metadata: dr.metadata.clone(),
			source_code: dr.source_code.clone(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn context(mut self, context: impl Into<String>) -> Self {
		self.context = context.into();
		self
	}

	#[must_use]
	pub fn definition_uri(mut self, uri: impl Into<String>) -> Self {
		self.definition_uri = uri.into();
		self
	}

	#[must_use]
	pub fn implementation_uri(mut self, uri: impl Into<String>) -> Self {
		self.implementation_uri = uri.into();
		self
	}

	#[must_use]
	pub fn property(mut self, property: Property) -> Self {
		self.properties.push(property);
		self
	}

	#[must_use]
	pub fn properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
		self.properties.extend(properties);
		self
	}

	#[must_use]
	pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata.insert(key.into(), value.into());
		self
	}

	#[must_use]
	pub fn source_code(mut self, source_code: impl Into<String>) -> Self {
		self.source_code = Some(source_code.into());
		self
	}

	/// Overrides the property-count validity rule.
	#[must_use]
	pub fn valid(mut self, is_valid: bool) -> Self {
		self.validity = Some(is_valid);
		self
	}

	// Editing identity fields is only useful to parsers that derive identity
	// from the definition itself; the registry discards mismatches.

	#[must_use]
	pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
		self.identifier = identifier.into();
		self
	}

	#[must_use]
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	#[must_use]
	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	#[must_use]
	pub fn family(mut self, family: impl Into<String>) -> Self {
		self.family = family.into();
		self
	}

	#[must_use]
	pub fn source_type(mut self, source_type: impl Into<String>) -> Self {
		self.source_type = source_type.into();
		self
	}

	/// Partitions properties and freezes the node.
	///
	/// A property whose name is already taken in its partition is dropped with
	/// a warning; the first declaration wins.
	pub fn build(self) -> Node {
		let mut properties = Vec::with_capacity(self.properties.len());
		let mut inputs = IndexMap::new();
		let mut outputs = IndexMap::new();

		for property in self.properties {
			let partition = if property.is_output() { &mut outputs } else { &mut inputs };
			if partition.contains_key(property.name()) {
				tracing::warn!(
					node = %self.identifier,
					property = property.name(),
					output = property.is_output(),
					"duplicate property name; keeping first declaration"
				);
				continue;
			}
			partition.insert(property.name().to_owned(), properties.len());
			properties.push(property);
		}

		let is_valid = self.validity.unwrap_or(!properties.is_empty());

		Node {
			identifier: self.identifier,
			version: self.version,
			name: self.name,
			family: self.family,
			context: self.context,
			source_type: self.source_type,
			definition_uri: self.definition_uri,
			implementation_uri: self.implementation_uri,
			properties,
			inputs,
			outputs,
			metadata: self.metadata,
			source_code: self.source_code,
			is_valid,
		}
	}
}
