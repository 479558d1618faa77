//! Node properties and the type-token layer.
//!
//! A property's type token (`"color"`, `"float"`, ...) is its nominal shading
//! type. [`PropertyType`] maps tokens to the [`ValueKind`] a default value is
//! expected to carry; that mapping is the only conversion policy in the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TokenMap;
use super::value::{Value, ValueKind};

/// Well-known property metadata keys.
pub mod metadata_keys {
	pub const LABEL: &str = "label";
	pub const HELP: &str = "help";
	pub const PAGE: &str = "page";
	pub const WIDGET: &str = "widget";
	pub const IMPLEMENTATION_NAME: &str = "implementationName";
	pub const IS_ASSET_IDENTIFIER: &str = "isAssetIdentifier";
}

/// Property type tokens understood by the property layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyType {
	Int,
	String,
	Float,
	Color,
	Color4,
	Point,
	Normal,
	Vector,
	Matrix,
	Struct,
	Terminal,
	Vstruct,
	/// Any token the property layer has no mapping for.
	Other(String),
}

impl PropertyType {
	pub fn from_token(token: &str) -> Self {
		match token {
			"int" => Self::Int,
			"string" => Self::String,
			"float" => Self::Float,
			"color" => Self::Color,
			"color4" => Self::Color4,
			"point" => Self::Point,
			"normal" => Self::Normal,
			"vector" => Self::Vector,
			"matrix" => Self::Matrix,
			"struct" => Self::Struct,
			"terminal" => Self::Terminal,
			"vstruct" => Self::Vstruct,
			other => Self::Other(other.to_owned()),
		}
	}

	pub fn as_token(&self) -> &str {
		match self {
			Self::Int => "int",
			Self::String => "string",
			Self::Float => "float",
			Self::Color => "color",
			Self::Color4 => "color4",
			Self::Point => "point",
			Self::Normal => "normal",
			Self::Vector => "vector",
			Self::Matrix => "matrix",
			Self::Struct => "struct",
			Self::Terminal => "terminal",
			Self::Vstruct => "vstruct",
			Self::Other(token) => token,
		}
	}

	/// Kind of a scalar default for this type, if the type has one.
	pub fn scalar_kind(&self) -> Option<ValueKind> {
		match self {
			Self::Int => Some(ValueKind::Int),
			Self::String => Some(ValueKind::String),
			Self::Float => Some(ValueKind::Float),
			Self::Color | Self::Point | Self::Normal | Self::Vector => Some(ValueKind::Float3),
			Self::Color4 => Some(ValueKind::Float4),
			Self::Matrix => Some(ValueKind::Matrix),
			Self::Struct | Self::Terminal | Self::Vstruct | Self::Other(_) => None,
		}
	}
}

impl fmt::Display for PropertyType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_token())
	}
}

/// A named, typed input or output slot on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
	name: String,
	type_name: String,
	default: Option<Value>,
	is_output: bool,
	array_size: usize,
	is_dynamic_array: bool,
	is_connectable: bool,
	metadata: TokenMap,
}

impl Property {
	/// Creates a scalar, connectable input.
	pub fn input(name: impl Into<String>, type_name: impl Into<String>) -> Self {
		Self::new(name.into(), type_name.into(), false)
	}

	/// Creates a scalar, connectable output.
	pub fn output(name: impl Into<String>, type_name: impl Into<String>) -> Self {
		Self::new(name.into(), type_name.into(), true)
	}

	fn new(name: String, type_name: String, is_output: bool) -> Self {
		Self {
			name,
			type_name,
			default: None,
			is_output,
			array_size: 0,
			is_dynamic_array: false,
			is_connectable: true,
			metadata: TokenMap::new(),
		}
	}

	#[must_use]
	pub fn with_default(mut self, value: impl Into<Value>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Makes this a fixed-size array. Zero means scalar.
	#[must_use]
	pub fn with_array_size(mut self, size: usize) -> Self {
		self.array_size = size;
		self
	}

	#[must_use]
	pub fn dynamic_array(mut self) -> Self {
		self.is_dynamic_array = true;
		self
	}

	#[must_use]
	pub fn connectable(mut self, connectable: bool) -> Self {
		self.is_connectable = connectable;
		self
	}

	#[must_use]
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata.insert(key.into(), value.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn property_type(&self) -> PropertyType {
		PropertyType::from_token(&self.type_name)
	}

	pub fn default_value(&self) -> Option<&Value> {
		self.default.as_ref()
	}

	pub fn is_output(&self) -> bool {
		self.is_output
	}

	pub fn array_size(&self) -> usize {
		self.array_size
	}

	pub fn is_dynamic_array(&self) -> bool {
		self.is_dynamic_array
	}

	pub fn is_array(&self) -> bool {
		self.array_size > 0 || self.is_dynamic_array
	}

	pub fn is_connectable(&self) -> bool {
		self.is_connectable
	}

	pub fn metadata(&self) -> &TokenMap {
		&self.metadata
	}

	pub fn label(&self) -> Option<&str> {
		self.metadata.get(metadata_keys::LABEL).map(String::as_str)
	}

	pub fn help(&self) -> Option<&str> {
		self.metadata.get(metadata_keys::HELP).map(String::as_str)
	}

	pub fn page(&self) -> Option<&str> {
		self.metadata.get(metadata_keys::PAGE).map(String::as_str)
	}

	pub fn widget(&self) -> Option<&str> {
		self.metadata.get(metadata_keys::WIDGET).map(String::as_str)
	}

	/// Name the implementation uses for this property, falling back to [`Self::name`].
	pub fn implementation_name(&self) -> &str {
		self.metadata
			.get(metadata_keys::IMPLEMENTATION_NAME)
			.map_or(self.name.as_str(), String::as_str)
	}

	/// True if metadata marks the property as holding an asset path.
	pub fn is_asset_identifier(&self) -> bool {
		self.metadata.contains_key(metadata_keys::IS_ASSET_IDENTIFIER)
	}

	/// Kind the default value should carry, or `None` when the type token has no mapping.
	pub fn expected_kind(&self) -> Option<ValueKind> {
		let scalar = self.property_type().scalar_kind()?;
		Some(if self.is_array() { ValueKind::Array } else { scalar })
	}

	/// Checks the default value against the type token.
	///
	/// Missing defaults and unmapped type tokens always pass. Array properties
	/// need an array default whose elements all have the scalar kind.
	pub fn default_matches_type(&self) -> bool {
		let Some(default) = &self.default else {
			return true;
		};
		let Some(scalar) = self.property_type().scalar_kind() else {
			return true;
		};
		if self.is_array() {
			match default {
				Value::Array(items) => items.iter().all(|item| item.kind() == scalar),
				_ => false,
			}
		} else {
			default.kind() == scalar
		}
	}

	/// Returns true if an output of one property may feed the input of the other.
	///
	/// Directions must differ and both sides must be connectable. Types must
	/// match exactly, except that the three-float family (`color`, `point`,
	/// `normal`, `vector`, `float[3]`) connects freely.
	pub fn can_connect_to(&self, other: &Property) -> bool {
		if self.is_output == other.is_output || !self.is_connectable || !other.is_connectable {
			return false;
		}

		if self.type_name == other.type_name
			&& self.array_size == other.array_size
			&& self.is_dynamic_array == other.is_dynamic_array
		{
			return true;
		}

		self.is_float3_like() && other.is_float3_like()
	}

	fn is_float3_like(&self) -> bool {
		match self.property_type() {
			PropertyType::Float => self.array_size == 3 && !self.is_dynamic_array,
			ty => ty.scalar_kind() == Some(ValueKind::Float3) && !self.is_array(),
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(Property::input("a", "float").with_default(1.0), true)]
	#[case(Property::input("a", "float").with_default(1), false)]
	#[case(Property::input("a", "color").with_default([0.0, 0.5, 1.0]), true)]
	#[case(Property::input("a", "color").with_default(0.5), false)]
	#[case(Property::input("a", "int").with_array_size(2).with_default(vec![1, 2]), true)]
	#[case(Property::input("a", "int").dynamic_array().with_default(3), false)]
	#[case(Property::input("a", "string").dynamic_array().with_default(vec!["x", "y"]), true)]
	#[case(Property::input("a", "vstruct").with_default(3), true)]
	#[case(Property::input("a", "shaderGlobals").with_default("anything"), true)]
	#[case(Property::input("a", "float"), true)]
	fn default_type_check(#[case] property: Property, #[case] expected: bool) {
		assert_eq!(property.default_matches_type(), expected);
	}

	#[test]
	fn connections_require_opposite_directions() {
		let out = Property::output("out", "float");
		let input = Property::input("in", "float");
		assert!(out.can_connect_to(&input));
		assert!(input.can_connect_to(&out));
		assert!(!input.can_connect_to(&Property::input("other", "float")));
		assert!(!out.can_connect_to(&input.clone().connectable(false)));
	}

	#[test]
	fn three_float_family_connects_across_tokens() {
		let color_out = Property::output("out", "color");
		assert!(color_out.can_connect_to(&Property::input("p", "point")));
		assert!(color_out.can_connect_to(&Property::input("f", "float").with_array_size(3)));
		assert!(!color_out.can_connect_to(&Property::input("f", "float")));
		assert!(!color_out.can_connect_to(&Property::input("c", "color").dynamic_array()));
	}

	#[test]
	fn metadata_accessors_fall_back() {
		let plain = Property::input("roughness", "float");
		assert_eq!(plain.implementation_name(), "roughness");
		assert_eq!(plain.label(), None);

		let decorated = plain
			.with_metadata(metadata_keys::IMPLEMENTATION_NAME, "specular_roughness")
			.with_metadata(metadata_keys::LABEL, "Roughness")
			.with_metadata(metadata_keys::IS_ASSET_IDENTIFIER, "");
		assert_eq!(decorated.implementation_name(), "specular_roughness");
		assert_eq!(decorated.label(), Some("Roughness"));
		assert!(decorated.is_asset_identifier());
	}

	#[test]
	fn unknown_tokens_round_trip() {
		assert_eq!(PropertyType::from_token("custom").as_token(), "custom");
		assert_eq!(PropertyType::from_token("color4"), PropertyType::Color4);
		assert_eq!(PropertyType::Normal.to_string(), "normal");
	}
}
