//! Discovery records and parsed node definitions.

use std::collections::BTreeMap;

pub mod discovery;
pub mod node;
pub mod property;
pub mod value;
pub mod version;

pub use discovery::{DiscoveryResult, NodeIdentity};
pub use node::{Node, NodeBuilder};
pub use property::{Property, PropertyType, metadata_keys};
pub use value::{Value, ValueKind};
pub use version::{Version, VersionFilter};

/// String-to-string metadata. Ordered so that iteration (and hashing over it) is deterministic.
pub type TokenMap = BTreeMap<String, String>;
