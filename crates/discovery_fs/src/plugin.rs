use std::sync::Arc;

use nodedef_registry::{AssetResolver, DiscoveryContext, DiscoveryPlugin, DiscoveryPluginDef, DiscoveryResult, LocalResolver};

use crate::discover::{FsDiscoveryOptions, discover_nodes};

/// Edits or drops each result before it reaches the registry.
pub type ResultFilter = Box<dyn Fn(DiscoveryResult) -> Option<DiscoveryResult> + Send + Sync>;

/// Discovery plugin over a set of filesystem search paths.
pub struct FsDiscoveryPlugin {
	options: FsDiscoveryOptions,
	resolver: Arc<dyn AssetResolver>,
	filter: Option<ResultFilter>,
}

impl FsDiscoveryPlugin {
	pub fn new(options: FsDiscoveryOptions, resolver: Arc<dyn AssetResolver>) -> Self {
		Self {
			options,
			resolver,
			filter: None,
		}
	}

	/// Options from the `NODEDEF_FS_*` environment variables, local resolution.
	pub fn from_env() -> Self {
		Self::new(FsDiscoveryOptions::from_env(), Arc::new(LocalResolver))
	}

	#[must_use]
	pub fn with_filter<F>(mut self, filter: F) -> Self
	where
		F: Fn(DiscoveryResult) -> Option<DiscoveryResult> + Send + Sync + 'static,
	{
		self.filter = Some(Box::new(filter));
		self
	}

	pub fn options(&self) -> &FsDiscoveryOptions {
		&self.options
	}
}

impl DiscoveryPlugin for FsDiscoveryPlugin {
	fn discover(&self, ctx: &dyn DiscoveryContext) -> Vec<DiscoveryResult> {
		let results = discover_nodes(&self.options, self.resolver.as_ref(), ctx);
		match &self.filter {
			Some(filter) => results.into_iter().filter_map(filter).collect(),
			None => results,
		}
	}

	fn search_uris(&self) -> Vec<String> {
		self.options
			.search_paths
			.iter()
			.map(|path| path.to_string_lossy().into_owned())
			.collect()
	}
}

impl std::fmt::Debug for FsDiscoveryPlugin {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FsDiscoveryPlugin")
			.field("options", &self.options)
			.field("filtered", &self.filter.is_some())
			.finish_non_exhaustive()
	}
}

inventory::submit! {
	DiscoveryPluginDef::new("FsDiscoveryPlugin", || Box::new(FsDiscoveryPlugin::from_env()))
}
