use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{DiscoveryPlugin, ParserPlugin};

pub type ParserFactory = Arc<dyn Fn() -> Box<dyn ParserPlugin> + Send + Sync>;
pub type DiscoveryFactory = Arc<dyn Fn() -> Box<dyn DiscoveryPlugin> + Send + Sync>;

/// Link-time parser plugin registration.
///
/// ```ignore
/// inventory::submit! {
///     ParserPluginDef::new("OslParser", || Box::new(OslParser::default()))
/// }
/// ```
pub struct ParserPluginDef {
	pub name: &'static str,
	pub create: fn() -> Box<dyn ParserPlugin>,
}

impl ParserPluginDef {
	pub const fn new(name: &'static str, create: fn() -> Box<dyn ParserPlugin>) -> Self {
		Self { name, create }
	}
}

inventory::collect!(ParserPluginDef);

/// Link-time discovery plugin registration.
pub struct DiscoveryPluginDef {
	pub name: &'static str,
	pub create: fn() -> Box<dyn DiscoveryPlugin>,
}

impl DiscoveryPluginDef {
	pub const fn new(name: &'static str, create: fn() -> Box<dyn DiscoveryPlugin>) -> Self {
		Self { name, create }
	}
}

inventory::collect!(DiscoveryPluginDef);

/// Plugin factories keyed by type name.
///
/// Names iterate in sorted order, which is the order the registry
/// instantiates them in. Registering a name twice keeps the first factory.
#[derive(Clone, Default)]
pub struct PluginDirectory {
	parsers: BTreeMap<String, ParserFactory>,
	discovery: BTreeMap<String, DiscoveryFactory>,
}

impl PluginDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Collects every [`ParserPluginDef`] and [`DiscoveryPluginDef`] linked into the binary.
	pub fn from_inventory() -> Self {
		let mut directory = Self::new();
		for def in inventory::iter::<ParserPluginDef> {
			directory.insert_parser(def.name, Arc::new(def.create));
		}
		for def in inventory::iter::<DiscoveryPluginDef> {
			directory.insert_discovery(def.name, Arc::new(def.create));
		}
		directory
	}

	#[must_use]
	pub fn with_parser<F>(mut self, name: impl Into<String>, factory: F) -> Self
	where
		F: Fn() -> Box<dyn ParserPlugin> + Send + Sync + 'static,
	{
		self.insert_parser(name, Arc::new(factory));
		self
	}

	#[must_use]
	pub fn with_discovery<F>(mut self, name: impl Into<String>, factory: F) -> Self
	where
		F: Fn() -> Box<dyn DiscoveryPlugin> + Send + Sync + 'static,
	{
		self.insert_discovery(name, Arc::new(factory));
		self
	}

	pub fn insert_parser(&mut self, name: impl Into<String>, factory: ParserFactory) {
		let name = name.into();
		if self.parsers.contains_key(&name) {
			tracing::warn!(plugin = %name, "parser plugin type registered twice; keeping first");
			return;
		}
		self.parsers.insert(name, factory);
	}

	pub fn insert_discovery(&mut self, name: impl Into<String>, factory: DiscoveryFactory) {
		let name = name.into();
		if self.discovery.contains_key(&name) {
			tracing::warn!(plugin = %name, "discovery plugin type registered twice; keeping first");
			return;
		}
		self.discovery.insert(name, factory);
	}

	pub fn parser_type_names(&self) -> impl Iterator<Item = &str> {
		self.parsers.keys().map(String::as_str)
	}

	pub fn discovery_type_names(&self) -> impl Iterator<Item = &str> {
		self.discovery.keys().map(String::as_str)
	}

	pub fn parser(&self, name: &str) -> Option<&ParserFactory> {
		self.parsers.get(name)
	}

	pub fn discovery(&self, name: &str) -> Option<&DiscoveryFactory> {
		self.discovery.get(name)
	}

	pub fn parsers(&self) -> impl Iterator<Item = (&str, &ParserFactory)> {
		self.parsers.iter().map(|(name, factory)| (name.as_str(), factory))
	}

	pub fn discovery_plugins(&self) -> impl Iterator<Item = (&str, &DiscoveryFactory)> {
		self.discovery.iter().map(|(name, factory)| (name.as_str(), factory))
	}
}

impl fmt::Debug for PluginDirectory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PluginDirectory")
			.field("parsers", &self.parsers.keys().collect::<Vec<_>>())
			.field("discovery", &self.discovery.keys().collect::<Vec<_>>())
			.finish()
	}
}
