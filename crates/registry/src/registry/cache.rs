use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::model::Node;

/// Parsed nodes keyed by (identifier, source type).
///
/// Insertion never replaces: the first node stored under a key is the one
/// every later caller gets back.
#[derive(Debug, Default)]
pub(crate) struct NodeCache {
	nodes: FxHashMap<String, FxHashMap<String, Arc<Node>>>,
	len: usize,
}

impl NodeCache {
	pub(crate) fn get(&self, identifier: &str, source_type: &str) -> Option<Arc<Node>> {
		self.nodes.get(identifier)?.get(source_type).cloned()
	}

	/// Stores `node` unless the key is taken, returning the surviving node.
	pub(crate) fn insert(&mut self, node: Node) -> Arc<Node> {
		let by_source_type = self.nodes.entry(node.identifier().to_owned()).or_default();
		if let Some(existing) = by_source_type.get(node.source_type()) {
			tracing::trace!(
				node = %node.identifier(),
				source_type = %node.source_type(),
				"node already cached; discarding duplicate parse"
			);
			return Arc::clone(existing);
		}

		let node = Arc::new(node);
		by_source_type.insert(node.source_type().to_owned(), Arc::clone(&node));
		self.len += 1;
		node
	}

	pub(crate) fn len(&self) -> usize {
		self.len
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.len == 0
	}
}
