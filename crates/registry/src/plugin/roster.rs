//! Instantiated plugins, in registration order.

use rustc_hash::FxHashMap;

use super::{DiscoveryContext, DiscoveryPlugin, ParserPlugin, PluginDirectory};
use crate::config::RegistryConfig;
use crate::error::{PluginKind, RegistryError, Result};

pub(crate) struct ParserEntry {
	pub(crate) type_name: String,
	pub(crate) source_type: String,
	pub(crate) plugin: Box<dyn ParserPlugin>,
}

/// Parser plugins plus the discovery-type ownership map.
#[derive(Default)]
pub(crate) struct ParserRoster {
	entries: Vec<ParserEntry>,
	by_discovery_type: FxHashMap<String, usize>,
}

impl ParserRoster {
	/// Appends plugins sorted by type name, claiming their discovery types.
	///
	/// A discovery type already owned by an earlier parser stays with it; the
	/// conflict is logged as a configuration error.
	pub(crate) fn extend(&mut self, mut plugins: Vec<(String, Box<dyn ParserPlugin>)>) {
		plugins.sort_by(|a, b| a.0.cmp(&b.0));

		for (type_name, plugin) in plugins {
			let idx = self.entries.len();
			let discovery_types = plugin.discovery_types();
			tracing::debug!(plugin = %type_name, ?discovery_types, "registered parser plugin");

			for discovery_type in discovery_types {
				if let Some(&owner) = self.by_discovery_type.get(&discovery_type) {
					tracing::error!(
						plugin = %type_name,
						discovery_type = %discovery_type,
						owner = %self.entries[owner].type_name,
						"discovery type already claimed by another parser plugin"
					);
					continue;
				}
				self.by_discovery_type.insert(discovery_type, idx);
			}

			self.entries.push(ParserEntry {
				source_type: plugin.source_type(),
				type_name,
				plugin,
			});
		}
	}

	pub(crate) fn for_discovery_type(&self, discovery_type: &str) -> Option<&ParserEntry> {
		self.by_discovery_type.get(discovery_type).map(|&idx| &self.entries[idx])
	}

	/// First parser in roster order producing `source_type`.
	pub(crate) fn for_source_type(&self, source_type: &str) -> Option<&ParserEntry> {
		self.entries.iter().find(|entry| entry.source_type == source_type)
	}

	pub(crate) fn type_names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|entry| entry.type_name.as_str())
	}
}

impl DiscoveryContext for ParserRoster {
	fn source_type(&self, discovery_type: &str) -> Option<String> {
		self.for_discovery_type(discovery_type).map(|entry| entry.source_type.clone())
	}
}

pub(crate) struct DiscoveryEntry {
	/// `None` for plugins handed over already instantiated.
	pub(crate) type_name: Option<String>,
	pub(crate) plugin: Box<dyn DiscoveryPlugin>,
}

/// Fails with the first name in `names` that `directory` has no parser factory for.
pub(crate) fn check_parser_names(directory: &PluginDirectory, names: &[&str]) -> Result<()> {
	check_known(names, |name| directory.parser(name).is_some(), PluginKind::Parser)
}

/// Fails with the first name in `names` that `directory` has no discovery factory for.
pub(crate) fn check_discovery_names(directory: &PluginDirectory, names: &[&str]) -> Result<()> {
	check_known(names, |name| directory.discovery(name).is_some(), PluginKind::Discovery)
}

fn check_known(names: &[&str], known: impl Fn(&str) -> bool, kind: PluginKind) -> Result<()> {
	match names.iter().find(|name| !known(name)) {
		Some(unknown) => {
			tracing::error!(plugin = %unknown, %kind, "unknown plugin type");
			Err(RegistryError::UnknownPluginType {
				kind,
				name: (*unknown).to_owned(),
			})
		}
		None => Ok(()),
	}
}

/// Instantiates the named parsers that `config` does not disable, sorted and de-duplicated.
///
/// Names without a factory are skipped.
pub(crate) fn instantiate_parsers<'a>(
	directory: &PluginDirectory,
	names: impl IntoIterator<Item = &'a str>,
	config: &RegistryConfig,
) -> Vec<(String, Box<dyn ParserPlugin>)> {
	sorted_unique(names)
		.into_iter()
		.filter(|name| enabled(config, name, PluginKind::Parser))
		.filter_map(|name| directory.parser(name).map(|factory| (name.to_owned(), factory())))
		.collect()
}

/// Instantiates the named discovery plugins that `config` does not disable, sorted and de-duplicated.
pub(crate) fn instantiate_discovery<'a>(
	directory: &PluginDirectory,
	names: impl IntoIterator<Item = &'a str>,
	config: &RegistryConfig,
) -> Vec<DiscoveryEntry> {
	sorted_unique(names)
		.into_iter()
		.filter(|name| enabled(config, name, PluginKind::Discovery))
		.filter_map(|name| {
			directory.discovery(name).map(|factory| DiscoveryEntry {
				type_name: Some(name.to_owned()),
				plugin: factory(),
			})
		})
		.collect()
}

fn sorted_unique<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
	let mut names: Vec<&str> = names.into_iter().collect();
	names.sort_unstable();
	names.dedup();
	names
}

fn enabled(config: &RegistryConfig, name: &str, kind: PluginKind) -> bool {
	if config.is_disabled(name) {
		tracing::debug!(plugin = %name, %kind, "plugin disabled by configuration");
		return false;
	}
	true
}
