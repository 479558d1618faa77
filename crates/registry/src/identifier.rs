//! Content-derived identifiers for nodes that never went through discovery.
//!
//! The hash is a streaming XXH3-64 (seed 0) over the primary content followed
//! by each metadata key and value in key order. Every field is written as its
//! byte length (`u64`, little-endian) and then its bytes, so no choice of
//! content or metadata can shift a field boundary.

use xxhash_rust::xxh3::Xxh3;

use crate::model::TokenMap;
use crate::resolver::AssetPath;

fn content_hash(content: &str, metadata: &TokenMap) -> u64 {
	let mut hasher = Xxh3::new();
	update_field(&mut hasher, content);
	for (key, value) in metadata {
		update_field(&mut hasher, key);
		update_field(&mut hasher, value);
	}
	hasher.digest()
}

fn update_field(hasher: &mut Xxh3, field: &str) {
	hasher.update(&(field.len() as u64).to_le_bytes());
	hasher.update(field.as_bytes());
}

/// Identifier for a node parsed straight from an asset: `{hash:016x}<{sub}><{source_type}>`.
pub fn identifier_for_asset(
	asset: &AssetPath,
	metadata: &TokenMap,
	sub_identifier: Option<&str>,
	source_type: Option<&str>,
) -> String {
	format!(
		"{:016x}<{}><{}>",
		content_hash(&asset.path, metadata),
		sub_identifier.unwrap_or_default(),
		source_type.unwrap_or_default()
	)
}

/// Identifier for a node parsed from inline source text: `{hash:016x}`.
pub fn identifier_for_source_code(source_code: &str, metadata: &TokenMap) -> String {
	format!("{:016x}", content_hash(source_code, metadata))
}
