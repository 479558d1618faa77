use std::collections::BTreeSet;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::model::{DiscoveryResult, VersionFilter};

/// Append-only table of discovery results with identifier, alias and name indices.
///
/// Positions in `results` are discovery order; every index lists positions
/// in ascending order.
#[derive(Debug, Default)]
pub(crate) struct DiscoveryIndex {
	results: Vec<Arc<DiscoveryResult>>,
	by_identifier: FxHashMap<String, Vec<usize>>,
	by_alias: FxHashMap<String, Vec<usize>>,
	by_name: FxHashMap<String, Vec<usize>>,
	source_types: BTreeSet<String>,
}

impl DiscoveryIndex {
	/// Single insertion point; every index is updated here.
	pub(crate) fn insert(&mut self, dr: DiscoveryResult) {
		let pos = self.results.len();
		self.by_identifier.entry(dr.identifier.clone()).or_default().push(pos);
		self.by_name.entry(dr.name.clone()).or_default().push(pos);
		for alias in &dr.aliases {
			let positions = self.by_alias.entry(alias.clone()).or_default();
			if positions.last() != Some(&pos) {
				positions.push(pos);
			}
		}
		if !dr.source_type.is_empty() && !self.source_types.contains(&dr.source_type) {
			self.source_types.insert(dr.source_type.clone());
		}
		self.results.push(Arc::new(dr));
	}

	pub(crate) fn extend(&mut self, results: impl IntoIterator<Item = DiscoveryResult>) {
		for dr in results {
			self.insert(dr);
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.results.len()
	}

	pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<DiscoveryResult>> {
		self.results.iter()
	}

	/// Results whose identifier is `identifier`, then results aliased to it.
	pub(crate) fn with_identifier(&self, identifier: &str) -> Vec<Arc<DiscoveryResult>> {
		let direct = Self::positions(&self.by_identifier, identifier);
		let aliased = Self::positions(&self.by_alias, identifier);
		direct
			.iter()
			.chain(aliased.iter().filter(|pos| !direct.contains(pos)))
			.map(|&pos| Arc::clone(&self.results[pos]))
			.collect()
	}

	/// Results with identifier `identifier`, ignoring aliases.
	pub(crate) fn with_exact_identifier(&self, identifier: &str) -> Vec<Arc<DiscoveryResult>> {
		self.collect(Self::positions(&self.by_identifier, identifier))
	}

	pub(crate) fn with_name(&self, name: &str) -> Vec<Arc<DiscoveryResult>> {
		self.collect(Self::positions(&self.by_name, name))
	}

	pub(crate) fn matching(&self, family: Option<&str>, filter: VersionFilter) -> Vec<Arc<DiscoveryResult>> {
		self.results
			.iter()
			.filter(|dr| matches_family_and_filter(dr, family, filter))
			.cloned()
			.collect()
	}

	pub(crate) fn source_types(&self) -> impl Iterator<Item = &str> {
		self.source_types.iter().map(String::as_str)
	}

	fn positions<'a>(index: &'a FxHashMap<String, Vec<usize>>, key: &str) -> &'a [usize] {
		index.get(key).map(Vec::as_slice).unwrap_or_default()
	}

	fn collect(&self, positions: &[usize]) -> Vec<Arc<DiscoveryResult>> {
		positions.iter().map(|&pos| Arc::clone(&self.results[pos])).collect()
	}
}

/// `None` matches every family.
pub(crate) fn matches_family_and_filter(dr: &DiscoveryResult, family: Option<&str>, filter: VersionFilter) -> bool {
	family.is_none_or(|family| dr.family == family) && filter.matches(&dr.version)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::Version;

	fn dr(identifier: &str, name: &str, source_type: &str) -> DiscoveryResult {
		DiscoveryResult::new(identifier, Version::invalid(), name, "", "osl", source_type, "", "")
	}

	fn identifiers(results: &[Arc<DiscoveryResult>]) -> Vec<(&str, &str)> {
		results.iter().map(|dr| (dr.identifier.as_str(), dr.source_type.as_str())).collect()
	}

	#[test]
	fn identifier_lookup_lists_direct_matches_before_aliases() {
		let mut index = DiscoveryIndex::default();
		index.insert(dr("b", "b", "OSL").with_aliases(["a"]));
		index.insert(dr("a", "a", "OSL"));
		index.insert(dr("a", "a", "glslfx"));

		assert_eq!(
			identifiers(&index.with_identifier("a")),
			vec![("a", "OSL"), ("a", "glslfx"), ("b", "OSL")]
		);
		assert_eq!(identifiers(&index.with_exact_identifier("a")).len(), 2);
		assert!(index.with_identifier("missing").is_empty());
	}

	#[test]
	fn repeated_alias_is_indexed_once() {
		let mut index = DiscoveryIndex::default();
		index.insert(dr("b", "b", "OSL").with_aliases(["a", "a"]));
		assert_eq!(index.with_identifier("a").len(), 1);
	}

	#[test]
	fn source_types_are_sorted_unique_and_non_empty() {
		let mut index = DiscoveryIndex::default();
		index.extend([dr("a", "a", "glslfx"), dr("b", "b", "OSL"), dr("c", "c", ""), dr("d", "d", "OSL")]);
		assert_eq!(index.source_types().collect::<Vec<_>>(), vec!["OSL", "glslfx"]);
		assert_eq!(index.len(), 4);
	}

	#[test]
	fn family_and_filter_combine() {
		let mut plain = dr("mix_float_2", "mix_float", "OSL");
		plain.family = "mix".to_owned();
		plain.version = Version::major_only(2);
		let mut default = plain.clone();
		default.identifier = "mix_float_3".to_owned();
		default.version = Version::major_only(3).as_default();

		let mut index = DiscoveryIndex::default();
		index.extend([plain, default]);

		assert_eq!(index.matching(Some("mix"), VersionFilter::AllVersions).len(), 2);
		assert_eq!(index.matching(None, VersionFilter::DefaultOnly).len(), 1);
		assert!(index.matching(Some("add"), VersionFilter::AllVersions).is_empty());
	}
}
