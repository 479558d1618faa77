//! Filesystem discovery for the node registry.
//!
//! [`discover_nodes`] walks a list of search paths, keeps files whose
//! extension is allowed, and turns each file name into a
//! [`DiscoveryResult`](nodedef_registry::DiscoveryResult) using the identifier
//! grammar in [`grammar`]. [`FsDiscoveryPlugin`] wraps the walk as a discovery
//! plugin and is linked into [`PluginDirectory::from_inventory`] under the
//! name `FsDiscoveryPlugin`.
//!
//! [`PluginDirectory::from_inventory`]: nodedef_registry::PluginDirectory::from_inventory

mod discover;
pub mod grammar;
mod plugin;

pub use discover::{
	ALLOWED_EXTS_ENV, DiscoveredFile, FOLLOW_SYMLINKS_ENV, FsDiscoveryOptions, SEARCH_PATHS_ENV, discover_files, discover_nodes,
};
pub use grammar::{IdentifierError, SplitIdentifier, split_identifier};
pub use plugin::{FsDiscoveryPlugin, ResultFilter};
