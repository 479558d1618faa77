//! Plugin contracts and the plugin directory.
//!
//! # Role
//!
//! Discovery plugins find definitions cheaply; parser plugins turn one
//! definition into a [`Node`]. Both are instantiated by the registry from a
//! [`PluginDirectory`] of factories keyed by stable type names.
//!
//! # Invariants
//!
//! - Plugins never panic across their boundary. Discovery returns partial or
//!   empty results on failure; parsing returns [`Node::invalid`].
//! - A discovery type is owned by at most one parser per registry. The first
//!   claimant in instantiation order wins.

use crate::model::{DiscoveryResult, Node};

mod directory;
pub(crate) mod roster;

pub use directory::{DiscoveryFactory, DiscoveryPluginDef, ParserFactory, ParserPluginDef, PluginDirectory};

/// Scans a resource space and reports unparsed definitions.
///
/// Each plugin runs once per registry, at construction or when added.
pub trait DiscoveryPlugin: Send + Sync {
	fn discover(&self, ctx: &dyn DiscoveryContext) -> Vec<DiscoveryResult>;

	/// Locations this plugin searches. Diagnostic only.
	fn search_uris(&self) -> Vec<String> {
		Vec::new()
	}
}

/// Registry state a discovery plugin may consult while it runs.
pub trait DiscoveryContext {
	/// Source type of the parser that owns `discovery_type`, if any.
	fn source_type(&self, discovery_type: &str) -> Option<String>;
}

/// Parses one discovery result into a node.
pub trait ParserPlugin: Send + Sync {
	/// Parses `dr`. The result must reproduce the identity of `dr`; otherwise
	/// the registry discards it.
	fn parse(&self, dr: &DiscoveryResult) -> Node;

	/// Discovery types (usually file extensions) this parser handles.
	fn discovery_types(&self) -> Vec<String>;

	/// Namespace of the nodes this parser produces.
	fn source_type(&self) -> String;
}

/// Context with no parsers; every discovery type is unowned.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParsers;

impl DiscoveryContext for NoParsers {
	fn source_type(&self, _discovery_type: &str) -> Option<String> {
		None
	}
}
