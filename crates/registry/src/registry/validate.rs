use crate::model::{DiscoveryResult, Node};

/// Returns true if `node` may be cached for `dr`.
///
/// The identity must match exactly. Property defaults that disagree with
/// their type token are reported but do not reject the node.
pub(crate) fn validate_node(node: &Node, dr: &DiscoveryResult) -> bool {
	let mismatched = node.identity().mismatched_fields(&dr.identity());
	if !mismatched.is_empty() {
		tracing::error!(
			parsed = %node.identity(),
			discovered = %dr.identity(),
			uri = %dr.resolved_uri,
			fields = ?mismatched,
			"parsed node does not match its discovery result; discarding"
		);
		return false;
	}

	for property in node.properties() {
		if !property.default_matches_type() {
			tracing::warn!(
				node = %dr.identifier,
				property = property.name(),
				type_name = property.type_name(),
				expected = ?property.expected_kind(),
				actual = ?property.default_value().map(|value| value.kind()),
				"default value does not match property type"
			);
		}
	}

	true
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::model::{NodeBuilder, Property, Version};

	fn discovery() -> DiscoveryResult {
		DiscoveryResult::new("add_2", Version::major_only(2), "add", "add", "osl", "OSL", "a", "a")
	}

	#[rstest]
	#[case::identifier(NodeBuilder::from_discovery(&discovery()).identifier("add_3"))]
	#[case::name(NodeBuilder::from_discovery(&discovery()).name("sub"))]
	#[case::version(NodeBuilder::from_discovery(&discovery()).version(Version::new(2, 1)))]
	#[case::family(NodeBuilder::from_discovery(&discovery()).family(""))]
	#[case::source_type(NodeBuilder::from_discovery(&discovery()).source_type("glslfx"))]
	fn any_identity_mismatch_rejects(#[case] builder: NodeBuilder) {
		let node = builder.property(Property::input("a", "float")).build();
		assert!(!validate_node(&node, &discovery()));
	}

	#[test]
	fn default_flag_is_not_part_of_identity() {
		let node = NodeBuilder::from_discovery(&discovery())
			.version(Version::major_only(2).as_default())
			.build();
		assert!(validate_node(&node, &discovery()));
	}

	#[test]
	fn mistyped_default_only_warns() {
		let node = NodeBuilder::from_discovery(&discovery())
			.property(Property::input("a", "float").with_default("oops"))
			.build();
		assert!(validate_node(&node, &discovery()));
	}
}
