//! Asset resolution boundary.

use std::path::Path;

/// Maps discovered URIs to concrete locations and makes them readable locally.
///
/// Implementations are shared across lookup threads.
pub trait AssetResolver: Send + Sync {
	/// Resolves a URI. Returns an empty string when the URI cannot be resolved.
	fn resolve(&self, uri: &str) -> String;

	/// Makes `resolved_uri` readable as a local file. Returns false on failure.
	fn fetch_to_local(&self, uri: &str, resolved_uri: &str) -> bool;

	/// Lower-cased extension of `path`, without the dot. Empty when there is none.
	fn extension(&self, path: &str) -> String;
}

/// Resolver for plain local filesystem paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalResolver;

impl AssetResolver for LocalResolver {
	fn resolve(&self, uri: &str) -> String {
		match std::fs::canonicalize(uri) {
			Ok(path) => path.to_string_lossy().into_owned(),
			Err(_) => uri.to_owned(),
		}
	}

	fn fetch_to_local(&self, _uri: &str, resolved_uri: &str) -> bool {
		Path::new(resolved_uri).is_file()
	}

	fn extension(&self, path: &str) -> String {
		Path::new(path)
			.extension()
			.map(|ext| ext.to_string_lossy().to_ascii_lowercase())
			.unwrap_or_default()
	}
}

/// An asset reference as authored, plus its resolved location when known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPath {
	pub path: String,
	pub resolved_path: Option<String>,
}

impl AssetPath {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			resolved_path: None,
		}
	}

	pub fn resolved(path: impl Into<String>, resolved_path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			resolved_path: Some(resolved_path.into()),
		}
	}

	/// The resolved path if present and non-empty, else the authored path.
	pub fn resolved_or_path(&self) -> &str {
		match self.resolved_path.as_deref() {
			Some(resolved) if !resolved.is_empty() => resolved,
			_ => &self.path,
		}
	}
}
