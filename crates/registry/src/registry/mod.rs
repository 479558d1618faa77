//! The node registry.
//!
//! # Role
//!
//! Owns the plugin rosters, the discovery index and the parsed-node cache.
//! Discovery runs eagerly at construction; parsing is deferred until a lookup
//! asks for a node.
//!
//! # Invariants
//!
//! - Discovery results are immutable once indexed.
//! - A node is cached only if its identity matches the discovery result it
//!   was parsed from. At most one node is cached per (identifier, source type),
//!   and the first one stored is returned to every caller.
//! - Extension points fail once the cache holds any node.
//!
//! # Concurrency
//!
//! Construction and the `&mut self` extension points are single-threaded.
//! Lookups may run from any number of threads. The index and the cache sit
//! behind separate [`RwLock`]s; when both are held the index is locked first.
//! Parsers always run with neither lock held, so two threads may parse the
//! same definition and the loser's node is dropped.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::model::{DiscoveryResult, Node};
use crate::plugin::roster::{self, DiscoveryEntry, ParserEntry, ParserRoster};
use crate::plugin::{DiscoveryPlugin, ParserPlugin, PluginDirectory};
use crate::resolver::{AssetResolver, LocalResolver};

mod cache;
mod index;
mod lookup;
mod validate;


use cache::NodeCache;
use index::DiscoveryIndex;

pub struct NodeRegistry {
	config: RegistryConfig,
	resolver: Arc<dyn AssetResolver>,
	parsers: ParserRoster,
	discovery: Vec<DiscoveryEntry>,
	index: RwLock<DiscoveryIndex>,
	cache: RwLock<NodeCache>,
}

impl NodeRegistry {
	/// Instantiates plugins from `directory` and runs discovery.
	///
	/// Parsers are instantiated before discovery plugins so that discovery can
	/// ask which source type owns a discovery type. Both are instantiated in
	/// type-name order, skipping names `config` disables.
	pub fn new(config: RegistryConfig, directory: &PluginDirectory, resolver: Arc<dyn AssetResolver>) -> Self {
		let mut registry = Self {
			config,
			resolver,
			parsers: ParserRoster::default(),
			discovery: Vec::new(),
			index: RwLock::new(DiscoveryIndex::default()),
			cache: RwLock::new(NodeCache::default()),
		};

		if registry.config.skip_parser_plugin_discovery {
			tracing::debug!("skipping parser plugin discovery");
		} else {
			let parsers = roster::instantiate_parsers(directory, directory.parser_type_names(), &registry.config);
			registry.parsers.extend(parsers);
		}

		if registry.config.skip_discovery_plugin_discovery {
			tracing::debug!("skipping discovery plugin discovery");
		} else {
			let plugins = roster::instantiate_discovery(directory, directory.discovery_type_names(), &registry.config);
			registry.run_discovery(plugins);
		}

		tracing::debug!(
			parsers = registry.parsers.type_names().count(),
			discovery_plugins = registry.discovery.len(),
			discovery_results = registry.discovery_result_count(),
			"node registry ready"
		);
		registry
	}

	/// Environment config, link-time plugins, local filesystem resolution.
	pub fn with_defaults() -> Self {
		Self::new(
			RegistryConfig::from_env(),
			&PluginDirectory::from_inventory(),
			Arc::new(LocalResolver),
		)
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	pub fn resolver(&self) -> &dyn AssetResolver {
		self.resolver.as_ref()
	}

	/// Runs `plugins` and adds them to the roster.
	pub fn add_discovery_plugins(&mut self, plugins: Vec<Box<dyn DiscoveryPlugin>>) -> Result<()> {
		self.ensure_unparsed("add_discovery_plugins")?;
		let entries = plugins
			.into_iter()
			.map(|plugin| DiscoveryEntry { type_name: None, plugin })
			.collect();
		self.run_discovery(entries);
		Ok(())
	}

	/// Instantiates the named discovery plugin types from `directory` and runs them.
	///
	/// Fails without running anything if a name is unknown to `directory`.
	pub fn add_discovery_plugin_types(&mut self, directory: &PluginDirectory, names: &[&str]) -> Result<()> {
		self.ensure_unparsed("add_discovery_plugin_types")?;
		roster::check_discovery_names(directory, names)?;
		let plugins = roster::instantiate_discovery(directory, names.iter().copied(), &self.config);
		self.run_discovery(plugins);
		Ok(())
	}

	/// Adds already-instantiated parsers, keyed by type name.
	pub fn add_parser_plugins(&mut self, plugins: Vec<(String, Box<dyn ParserPlugin>)>) -> Result<()> {
		self.ensure_unparsed("add_parser_plugins")?;
		self.parsers.extend(plugins);
		Ok(())
	}

	/// Instantiates the named parser types from `directory`.
	pub fn add_parser_plugin_types(&mut self, directory: &PluginDirectory, names: &[&str]) -> Result<()> {
		self.ensure_unparsed("add_parser_plugin_types")?;
		roster::check_parser_names(directory, names)?;
		let plugins = roster::instantiate_parsers(directory, names.iter().copied(), &self.config);
		self.parsers.extend(plugins);
		Ok(())
	}

	/// Indexes a result found outside the plugin system.
	pub fn add_discovery_result(&self, dr: DiscoveryResult) -> Result<()> {
		self.ensure_unparsed("add_discovery_result")?;
		self.index.write().insert(dr);
		Ok(())
	}

	/// Search locations reported by every discovery plugin, in roster order.
	pub fn search_uris(&self) -> Vec<String> {
		self.discovery.iter().flat_map(|entry| entry.plugin.search_uris()).collect()
	}

	/// Source types of every indexed discovery result, sorted.
	pub fn source_types(&self) -> Vec<String> {
		self.index.read().source_types().map(str::to_owned).collect()
	}

	/// Parser plugin type names in roster order.
	pub fn parser_type_names(&self) -> Vec<String> {
		self.parsers.type_names().map(str::to_owned).collect()
	}

	pub fn discovery_result_count(&self) -> usize {
		self.index.read().len()
	}

	pub fn cached_node_count(&self) -> usize {
		self.cache.read().len()
	}

	fn ensure_unparsed(&self, operation: &'static str) -> Result<()> {
		if self.cache.read().is_empty() {
			return Ok(());
		}
		tracing::error!(operation, "extension point used after nodes were parsed; ignoring");
		Err(RegistryError::ExtensionAfterParse { operation })
	}

	/// Runs each plugin once, indexing its results under one write lock.
	fn run_discovery(&mut self, plugins: Vec<DiscoveryEntry>) {
		for entry in plugins {
			let results = entry.plugin.discover(&self.parsers);
			tracing::debug!(
				plugin = entry.type_name.as_deref().unwrap_or("<instance>"),
				results = results.len(),
				"ran discovery plugin"
			);
			self.index.write().extend(results);
			self.discovery.push(entry);
		}
	}

	/// Returns the cached node for `dr`, parsing and caching it on a miss.
	///
	/// `None` when no parser owns the discovery type or the parsed node fails
	/// validation.
	fn find_or_parse(&self, dr: &DiscoveryResult) -> Option<Arc<Node>> {
		if let Some(node) = self.cache.read().get(&dr.identifier, &dr.source_type) {
			return Some(node);
		}

		let Some(parser) = self.parsers.for_discovery_type(&dr.discovery_type) else {
			tracing::debug!(
				node = %dr.name,
				discovery_type = %dr.discovery_type,
				"no parser for discovery type; ignoring"
			);
			return None;
		};

		let node = self.parse(parser, dr);
		if !validate::validate_node(&node, dr) {
			return None;
		}
		Some(self.cache.write().insert(node))
	}

	/// Parses `dr` with `parser`, outside of any lock.
	fn parse(&self, parser: &ParserEntry, dr: &DiscoveryResult) -> Node {
		if !dr.has_source_code() && !self.resolver.fetch_to_local(&dr.uri, &dr.resolved_uri) {
			tracing::warn!(
				node = %dr.identifier,
				uri = %dr.uri,
				resolved_uri = %dr.resolved_uri,
				"could not fetch definition; marking node invalid"
			);
			return Node::invalid(dr);
		}

		tracing::trace!(node = %dr.identifier, parser = %parser.type_name, "parsing node");
		parser.plugin.parse(dr)
	}

	/// Parses a result the registry synthesized itself, then indexes and caches it.
	///
	/// The index write lock is held across the cache insert so a concurrent
	/// call for the same key either sees this node or stores its own first,
	/// and the losing result is never indexed.
	fn parse_synthetic(&self, parser: &ParserEntry, dr: DiscoveryResult) -> Option<Arc<Node>> {
		let node = self.parse(parser, &dr);
		if !validate::validate_node(&node, &dr) {
			return None;
		}

		let mut index = self.index.write();
		if let Some(existing) = self.cache.read().get(&dr.identifier, &dr.source_type) {
			return Some(existing);
		}
		index.insert(dr);
		let node = self.cache.write().insert(node);
		drop(index);
		Some(node)
	}
}

impl std::fmt::Debug for NodeRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NodeRegistry")
			.field("config", &self.config)
			.field("parsers", &self.parser_type_names())
			.field("discovery_results", &self.discovery_result_count())
			.field("cached_nodes", &self.cached_node_count())
			.finish_non_exhaustive()
	}
}
