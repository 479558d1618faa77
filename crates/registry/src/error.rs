/// Plugin kinds, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
	Discovery,
	Parser,
}

impl std::fmt::Display for PluginKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Discovery => write!(f, "discovery"),
			Self::Parser => write!(f, "parser"),
		}
	}
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: std::path::PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid registry config: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Registry errors.
///
/// Only extension points fail loudly; lookups report misses as `None` or an
/// empty `Vec`.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	/// An extension point was used after the first node was parsed.
	#[error("{operation} cannot be called after nodes have been parsed")]
	ExtensionAfterParse { operation: &'static str },

	/// A plugin type name has no factory in the directory.
	#[error("unknown {kind} plugin type '{name}'")]
	UnknownPluginType { kind: PluginKind, name: String },
}

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
