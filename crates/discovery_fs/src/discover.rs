//! Recursive directory walk feeding filesystem discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use nodedef_registry::config::{parse_flag, split_list};
use nodedef_registry::{AssetResolver, DiscoveryContext, DiscoveryResult};

use crate::grammar::split_identifier;

pub const SEARCH_PATHS_ENV: &str = "NODEDEF_FS_SEARCH_PATHS";
pub const ALLOWED_EXTS_ENV: &str = "NODEDEF_FS_ALLOWED_EXTS";
pub const FOLLOW_SYMLINKS_ENV: &str = "NODEDEF_FS_FOLLOW_SYMLINKS";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FsDiscoveryOptions {
	/// Roots walked in order. Earlier roots win identifier clashes.
	pub search_paths: Vec<PathBuf>,
	/// Extensions accepted, with or without a leading dot, any case.
	pub allowed_extensions: Vec<String>,
	pub follow_symlinks: bool,
}

impl FsDiscoveryOptions {
	pub fn new(search_paths: impl IntoIterator<Item = impl Into<PathBuf>>, allowed_extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			search_paths: search_paths.into_iter().map(Into::into).collect(),
			allowed_extensions: allowed_extensions.into_iter().map(Into::into).collect(),
			follow_symlinks: false,
		}
	}

	#[must_use]
	pub fn follow_symlinks(mut self, follow: bool) -> Self {
		self.follow_symlinks = follow;
		self
	}

	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let search_paths = lookup(SEARCH_PATHS_ENV)
			.map(|value| std::env::split_paths(&value).filter(|path| !path.as_os_str().is_empty()).collect())
			.unwrap_or_default();
		let allowed_extensions = lookup(ALLOWED_EXTS_ENV).map(|value| split_list(&value)).unwrap_or_default();
		let follow_symlinks = match lookup(FOLLOW_SYMLINKS_ENV) {
			None => false,
			Some(value) => parse_flag(&value).unwrap_or_else(|| {
				tracing::warn!(var = FOLLOW_SYMLINKS_ENV, %value, "unrecognized boolean; not following symlinks");
				false
			}),
		};

		Self {
			search_paths,
			allowed_extensions,
			follow_symlinks,
		}
	}

	fn extension_filter(&self) -> HashSet<String> {
		self.allowed_extensions
			.iter()
			.map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
			.filter(|ext| !ext.is_empty())
			.collect()
	}
}

/// One file accepted by the walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredFile {
	pub uri: String,
	pub resolved_uri: String,
	/// Lower-cased extension.
	pub discovery_type: String,
}

/// Walks every search path and returns the files with an allowed extension.
///
/// Files come back root by root, sorted by file name within a root.
pub fn discover_files(options: &FsDiscoveryOptions, resolver: &dyn AssetResolver) -> Vec<DiscoveredFile> {
	let filter = options.extension_filter();
	let mut files = Vec::new();
	if filter.is_empty() {
		tracing::debug!("no allowed extensions; filesystem discovery finds nothing");
		return files;
	}

	for root in &options.search_paths {
		if !root.exists() {
			tracing::debug!(root = %root.display(), "search path does not exist; skipping");
			continue;
		}

		for entry in build_walk(root, options).build() {
			let entry = match entry {
				Ok(entry) => entry,
				Err(err) => {
					tracing::warn!(root = %root.display(), error = %err, "fs.discover.walk_error");
					continue;
				}
			};
			if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
				continue;
			}

			let Some(discovery_type) = entry
				.path()
				.extension()
				.and_then(|ext| ext.to_str())
				.map(|ext| ext.to_ascii_lowercase())
				.filter(|ext| filter.contains(ext))
			else {
				continue;
			};

			let uri = entry.path().to_string_lossy().into_owned();
			let resolved_uri = resolver.resolve(&uri);
			files.push(DiscoveredFile {
				uri,
				resolved_uri,
				discovery_type,
			});
		}
	}

	files
}

/// Walks every search path and splits each file name into a discovery result.
///
/// The first file seen for an (identifier, discovery type) pair wins. Files
/// whose names break the identifier grammar are skipped with a warning.
pub fn discover_nodes(options: &FsDiscoveryOptions, resolver: &dyn AssetResolver, ctx: &dyn DiscoveryContext) -> Vec<DiscoveryResult> {
	let mut seen = HashSet::new();
	let mut results = Vec::new();

	for file in discover_files(options, resolver) {
		let Some(identifier) = Path::new(&file.uri).file_stem().and_then(|stem| stem.to_str()).map(str::to_owned) else {
			tracing::warn!(uri = %file.uri, "file name is not valid UTF-8; skipping");
			continue;
		};

		if !seen.insert((identifier.clone(), file.discovery_type.clone())) {
			tracing::debug!(
				%identifier,
				discovery_type = %file.discovery_type,
				uri = %file.uri,
				"duplicate definition; keeping the first one found"
			);
			continue;
		}

		let split = match split_identifier(&identifier) {
			Ok(split) => split,
			Err(err) => {
				tracing::warn!(uri = %file.uri, error = %err, "invalid node identifier; skipping");
				continue;
			}
		};

		let source_type = ctx.source_type(&file.discovery_type).unwrap_or_default();
		results.push(DiscoveryResult::new(
			identifier,
			split.version.as_default(),
			split.name,
			split.family,
			file.discovery_type,
			source_type,
			file.uri,
			file.resolved_uri,
		));
	}

	tracing::debug!(results = results.len(), "fs.discover.complete");
	results
}

fn build_walk(root: &Path, options: &FsDiscoveryOptions) -> WalkBuilder {
	let mut walker = WalkBuilder::new(root);

	walker
		.standard_filters(false)
		.follow_links(options.follow_symlinks)
		.sort_by_file_name(|a, b| a.cmp(b));

	walker
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;
	use std::fs;

	use nodedef_registry::{LocalResolver, NoParsers, Version};
	use pretty_assertions::assert_eq;

	use super::*;

	struct Owners;

	impl DiscoveryContext for Owners {
		fn source_type(&self, discovery_type: &str) -> Option<String> {
			(discovery_type == "osl").then(|| "OSL".to_owned())
		}
	}

	fn touch(path: &Path) {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).expect("create parent");
		}
		fs::write(path, "").expect("write file");
	}

	#[test]
	fn extension_filter_normalizes_entries() {
		let options = FsDiscoveryOptions::new(Vec::<PathBuf>::new(), [" .OSL", "glslfx", "", "."]);
		let mut filter: Vec<_> = options.extension_filter().into_iter().collect();
		filter.sort();
		assert_eq!(filter, vec!["glslfx", "osl"]);
	}

	#[test]
	fn environment_populates_options() {
		let vars: HashMap<&str, String> = HashMap::from([
			(SEARCH_PATHS_ENV, std::env::join_paths(["/a", "/b"]).expect("join").to_string_lossy().into_owned()),
			(ALLOWED_EXTS_ENV, "osl, glslfx".to_owned()),
			(FOLLOW_SYMLINKS_ENV, "On".to_owned()),
		]);
		let options = FsDiscoveryOptions::from_lookup(|key| vars.get(key).cloned());

		assert_eq!(options.search_paths, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
		assert_eq!(options.allowed_extensions, vec!["osl", "glslfx"]);
		assert!(options.follow_symlinks);
	}

	#[test]
	fn bad_symlink_flag_falls_back_to_off() {
		let options = FsDiscoveryOptions::from_lookup(|key| (key == FOLLOW_SYMLINKS_ENV).then(|| "maybe".to_owned()));
		assert!(!options.follow_symlinks);
		assert!(options.search_paths.is_empty());
	}

	#[test]
	fn files_are_sorted_and_filtered_case_insensitively() {
		let dir = tempfile::tempdir().expect("tempdir");
		touch(&dir.path().join("b.OSL"));
		touch(&dir.path().join("a.osl"));
		touch(&dir.path().join("nested/c.osl"));
		touch(&dir.path().join("notes.txt"));

		let options = FsDiscoveryOptions::new([dir.path()], ["osl"]);
		let files = discover_files(&options, &LocalResolver);
		let names: Vec<_> = files
			.iter()
			.map(|file| Path::new(&file.uri).file_name().and_then(|n| n.to_str()).unwrap_or_default().to_owned())
			.collect();

		assert_eq!(names, vec!["a.osl", "b.OSL", "c.osl"]);
		assert!(files.iter().all(|file| file.discovery_type == "osl"));
	}

	#[test]
	fn hidden_and_ignored_files_are_still_found() {
		let dir = tempfile::tempdir().expect("tempdir");
		fs::write(dir.path().join(".ignore"), "skipped.osl\n").expect("write ignore");
		touch(&dir.path().join("skipped.osl"));
		touch(&dir.path().join(".hidden.osl"));

		let files = discover_files(&FsDiscoveryOptions::new([dir.path()], ["osl"]), &LocalResolver);
		assert_eq!(files.len(), 2);
	}

	#[test]
	fn nodes_carry_grammar_split_and_owner() {
		let dir = tempfile::tempdir().expect("tempdir");
		touch(&dir.path().join("mix_float_2_1.osl"));

		let options = FsDiscoveryOptions::new([dir.path()], ["osl"]);
		let results = discover_nodes(&options, &LocalResolver, &Owners);
		assert_eq!(results.len(), 1);

		let dr = &results[0];
		assert_eq!(dr.identifier, "mix_float_2_1");
		assert_eq!(dr.name, "mix_float");
		assert_eq!(dr.family, "mix");
		assert_eq!(dr.discovery_type, "osl");
		assert_eq!(dr.source_type, "OSL");
		assert_eq!(dr.version, Version::new(2, 1));
		assert!(dr.version.is_default());
		assert_eq!(dr.resolved_uri, LocalResolver.resolve(&dr.uri));
	}

	#[test]
	fn unowned_discovery_types_get_empty_source_type() {
		let dir = tempfile::tempdir().expect("tempdir");
		touch(&dir.path().join("surface.osl"));

		let results = discover_nodes(&FsDiscoveryOptions::new([dir.path()], ["osl"]), &LocalResolver, &NoParsers);
		assert_eq!(results[0].source_type, "");
	}

	#[test]
	fn no_extensions_means_no_results() {
		let dir = tempfile::tempdir().expect("tempdir");
		touch(&dir.path().join("surface.osl"));

		let results = discover_nodes(&FsDiscoveryOptions::new([dir.path()], Vec::<String>::new()), &LocalResolver, &NoParsers);
		assert!(results.is_empty());
	}
}
