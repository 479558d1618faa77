use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use super::NodeRegistry;
use super::index::matches_family_and_filter;
use crate::identifier::{identifier_for_asset, identifier_for_source_code};
use crate::model::{DiscoveryResult, Node, TokenMap, Version, VersionFilter};
use crate::resolver::AssetPath;

impl NodeRegistry {
	/// Identifiers of every discovered definition in `family` (all when `None`)
	/// passing `filter`, in discovery order. Never parses.
	pub fn identifiers(&self, family: Option<&str>, filter: VersionFilter) -> Vec<String> {
		let index = self.index.read();
		let mut seen = FxHashSet::default();
		index
			.iter()
			.filter(|dr| matches_family_and_filter(dr, family, filter))
			.map(|dr| &dr.identifier)
			.filter(|identifier| seen.insert(*identifier))
			.cloned()
			.collect()
	}

	/// Names of every discovered definition in `family` passing `filter`, in discovery order. Never parses.
	pub fn names(&self, family: Option<&str>, filter: VersionFilter) -> Vec<String> {
		let index = self.index.read();
		let mut seen = FxHashSet::default();
		index
			.iter()
			.filter(|dr| matches_family_and_filter(dr, family, filter))
			.map(|dr| &dr.name)
			.filter(|name| seen.insert(*name))
			.cloned()
			.collect()
	}

	/// Returns the node for `identifier`.
	///
	/// With an empty `source_type_priority` this is the first node that parses
	/// among the matches, in discovery order. Otherwise each source type is
	/// tried in turn. Definitions aliased to `identifier` are tried after
	/// direct matches.
	pub fn get_by_identifier(&self, identifier: &str, source_type_priority: &[&str]) -> Option<Arc<Node>> {
		let candidates = self.index.read().with_identifier(identifier);
		self.first_by_priority(&candidates, source_type_priority)
	}

	pub fn get_by_identifier_and_type(&self, identifier: &str, source_type: &str) -> Option<Arc<Node>> {
		let candidates = self.index.read().with_identifier(identifier);
		self.first_with_source_type(&candidates, source_type)
	}

	/// Like [`Self::get_by_identifier`], over names and restricted by `filter`.
	pub fn get_by_name(&self, name: &str, source_type_priority: &[&str], filter: VersionFilter) -> Option<Arc<Node>> {
		let candidates = self.named(name, filter);
		self.first_by_priority(&candidates, source_type_priority)
	}

	pub fn get_by_name_and_type(&self, name: &str, source_type: &str, filter: VersionFilter) -> Option<Arc<Node>> {
		let candidates = self.named(name, filter);
		self.first_with_source_type(&candidates, source_type)
	}

	/// Every node for `identifier`, one per source type, in discovery order.
	pub fn get_all_by_identifier(&self, identifier: &str) -> Vec<Arc<Node>> {
		let candidates = self.index.read().with_exact_identifier(identifier);
		self.parse_all(&candidates)
	}

	pub fn get_all_by_name(&self, name: &str, filter: VersionFilter) -> Vec<Arc<Node>> {
		let candidates = self.named(name, filter);
		self.parse_all(&candidates)
	}

	/// Parses every matching definition in parallel and returns the full set.
	///
	/// Definitions already cached are not parsed again. The result holds one
	/// node per (identifier, source type), in discovery order.
	pub fn get_by_family(&self, family: Option<&str>, filter: VersionFilter) -> Vec<Arc<Node>> {
		let candidates = self.index.read().matching(family, filter);

		candidates.par_iter().for_each(|dr| {
			self.find_or_parse(dr);
		});

		let cache = self.cache.read();
		let mut seen = FxHashSet::default();
		candidates
			.iter()
			.filter_map(|dr| cache.get(&dr.identifier, &dr.source_type))
			.filter(|node| seen.insert(Arc::as_ptr(node)))
			.collect()
	}

	/// Parses an asset directly, bypassing discovery.
	///
	/// The discovery type is the asset's extension; the identifier is derived
	/// from the asset path and `metadata`. When `source_type` is `None` the
	/// owning parser's source type is used. Repeated calls with the same
	/// arguments return the cached node.
	pub fn get_from_asset(
		&self,
		asset: &AssetPath,
		metadata: &TokenMap,
		sub_identifier: Option<&str>,
		source_type: Option<&str>,
	) -> Option<Arc<Node>> {
		let discovery_type = self.resolver.extension(&asset.path);
		let Some(parser) = self.parsers.for_discovery_type(&discovery_type) else {
			tracing::debug!(
				asset = %asset.path,
				%discovery_type,
				"no parser for asset discovery type; ignoring"
			);
			return None;
		};

		let identifier = identifier_for_asset(asset, metadata, sub_identifier, source_type);
		let source_type = source_type.unwrap_or(&parser.source_type);
		if let Some(node) = self.get_by_identifier_and_type(&identifier, source_type) {
			return Some(node);
		}

		let resolved_uri = asset.resolved_or_path();
		let name = std::path::Path::new(resolved_uri)
			.file_name()
			.map_or_else(|| resolved_uri.to_owned(), |name| name.to_string_lossy().into_owned());
		let mut dr = DiscoveryResult::new(
			identifier,
			Version::invalid(),
			name,
			"",
			discovery_type,
			source_type,
			asset.path.clone(),
			resolved_uri,
		)
		.with_metadata(metadata.clone());
		dr.sub_identifier = sub_identifier.map(str::to_owned);

		self.parse_synthetic(parser, dr)
	}

	/// Parses inline definition text directly, bypassing discovery.
	///
	/// The parser is the first one in the roster producing `source_type`, the
	/// same first-registrant rule that settles discovery-type ownership. The
	/// identifier is derived from the text and `metadata`.
	pub fn get_from_source_text(&self, source_text: &str, source_type: &str, metadata: &TokenMap) -> Option<Arc<Node>> {
		let Some(parser) = self.parsers.for_source_type(source_type) else {
			tracing::debug!(%source_type, "no parser for source type; ignoring source text");
			return None;
		};

		let identifier = identifier_for_source_code(source_text, metadata);
		if let Some(node) = self.get_by_identifier_and_type(&identifier, source_type) {
			return Some(node);
		}

		let dr = DiscoveryResult::new(
			identifier.clone(),
			Version::invalid(),
			identifier,
			"",
			source_type,
			source_type,
			"",
			"",
		)
		.with_source_code(source_text)
		.with_metadata(metadata.clone());

		let node = self.parse_synthetic(parser, dr);
		if node.is_none() {
			tracing::error!(%source_type, "could not create node from source text");
		}
		node
	}

	fn named(&self, name: &str, filter: VersionFilter) -> Vec<Arc<DiscoveryResult>> {
		let mut candidates = self.index.read().with_name(name);
		candidates.retain(|dr| filter.matches(&dr.version));
		candidates
	}

	fn first_by_priority(&self, candidates: &[Arc<DiscoveryResult>], source_type_priority: &[&str]) -> Option<Arc<Node>> {
		if source_type_priority.is_empty() {
			return candidates.iter().find_map(|dr| self.find_or_parse(dr));
		}
		source_type_priority
			.iter()
			.find_map(|source_type| self.first_with_source_type(candidates, source_type))
	}

	fn first_with_source_type(&self, candidates: &[Arc<DiscoveryResult>], source_type: &str) -> Option<Arc<Node>> {
		candidates
			.iter()
			.filter(|dr| dr.source_type == source_type)
			.find_map(|dr| self.find_or_parse(dr))
	}

	fn parse_all(&self, candidates: &[Arc<DiscoveryResult>]) -> Vec<Arc<Node>> {
		let mut seen = FxHashSet::default();
		candidates
			.iter()
			.filter_map(|dr| self.find_or_parse(dr))
			.filter(|node| seen.insert(Arc::as_ptr(node)))
			.collect()
	}
}
