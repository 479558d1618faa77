//! Plugin-driven registry of node definitions.
//!
//! Discovery plugins find definitions (shader files, inline source, asset
//! entries) and report them as [`DiscoveryResult`]s. Parser plugins turn a
//! result into an immutable [`Node`] the first time a lookup asks for it.
//! [`NodeRegistry`] indexes results by identifier, alias and name, and caches
//! parsed nodes by (identifier, source type).
//!
//! # Modules
//!
//! - [`model`] - Versions, values, properties, discovery results and nodes
//! - [`plugin`] - Discovery and parser plugin contracts, plugin directory
//! - [`resolver`] - Asset resolution boundary
//! - [`config`] - Construction settings from the environment or TOML
//! - [`identifier`] - Content-derived identifiers for out-of-band parses
//!
//! # Example
//!
//! ```ignore
//! let registry = NodeRegistry::with_defaults();
//! let node = registry.get_by_identifier("mix_float_2_1", &["OSL"]);
//! ```

pub mod config;
pub mod error;
pub mod identifier;
pub mod model;
pub mod plugin;
mod registry;
pub mod resolver;

pub use config::RegistryConfig;
pub use error::{ConfigError, PluginKind, RegistryError, Result};
pub use model::{
	DiscoveryResult, Node, NodeBuilder, NodeIdentity, Property, PropertyType, TokenMap, Value, ValueKind, Version,
	VersionFilter,
};
pub use plugin::{
	DiscoveryContext, DiscoveryPlugin, DiscoveryPluginDef, NoParsers, ParserPlugin, ParserPluginDef, PluginDirectory,
};
pub use registry::NodeRegistry;
pub use resolver::{AssetPath, AssetResolver, LocalResolver};
