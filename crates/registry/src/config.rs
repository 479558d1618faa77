//! Registry construction settings.
//!
//! Settings come from the process environment ([`RegistryConfig::from_env`])
//! or a TOML document ([`RegistryConfig::from_toml_str`]). Unset values keep
//! their defaults: every plugin enabled, both auto-discovery passes on.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DISABLE_PLUGINS_ENV: &str = "NODEDEF_DISABLE_PLUGINS";
pub const SKIP_DISCOVERY_PLUGIN_DISCOVERY_ENV: &str = "NODEDEF_SKIP_DISCOVERY_PLUGIN_DISCOVERY";
pub const SKIP_PARSER_PLUGIN_DISCOVERY_ENV: &str = "NODEDEF_SKIP_PARSER_PLUGIN_DISCOVERY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Plugin type names that are never instantiated.
	pub disabled_plugins: Vec<String>,
	/// Skip instantiating discovery plugins from the plugin directory.
	pub skip_discovery_plugin_discovery: bool,
	/// Skip instantiating parser plugins from the plugin directory.
	pub skip_parser_plugin_discovery: bool,
}

impl RegistryConfig {
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds a config from an arbitrary variable source.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let disabled_plugins = lookup(DISABLE_PLUGINS_ENV)
			.map(|value| split_list(&value))
			.unwrap_or_default();

		Self {
			disabled_plugins,
			skip_discovery_plugin_discovery: flag_from(&lookup, SKIP_DISCOVERY_PLUGIN_DISCOVERY_ENV),
			skip_parser_plugin_discovery: flag_from(&lookup, SKIP_PARSER_PLUGIN_DISCOVERY_ENV),
		}
	}

	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&input)
	}

	pub fn is_disabled(&self, type_name: &str) -> bool {
		self.disabled_plugins.iter().any(|name| name == type_name)
	}
}

/// Parses a boolean setting: `1/true/yes/on` or `0/false/no/off`, any case.
pub fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// Splits a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(str::to_owned)
		.collect()
}

fn flag_from(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
	let Some(value) = lookup(key) else {
		return false;
	};

	parse_flag(&value).unwrap_or_else(|| {
		tracing::warn!(variable = key, value = %value, "ignoring unrecognized boolean value");
		false
	})
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
		move |key| vars.get(key).cloned()
	}

	#[rstest]
	#[case("1", Some(true))]
	#[case("TRUE", Some(true))]
	#[case(" yes ", Some(true))]
	#[case("On", Some(true))]
	#[case("0", Some(false))]
	#[case("false", Some(false))]
	#[case("NO", Some(false))]
	#[case("off", Some(false))]
	#[case("2", None)]
	#[case("", None)]
	fn flag_values(#[case] input: &str, #[case] expected: Option<bool>) {
		assert_eq!(parse_flag(input), expected);
	}

	#[test]
	fn empty_environment_yields_defaults() {
		assert_eq!(RegistryConfig::from_lookup(lookup(&[])), RegistryConfig::default());
	}

	#[test]
	fn environment_populates_every_field() {
		let config = RegistryConfig::from_lookup(lookup(&[
			(DISABLE_PLUGINS_ENV, "OslParser, ,SdrFsDiscovery,"),
			(SKIP_DISCOVERY_PLUGIN_DISCOVERY_ENV, "yes"),
			(SKIP_PARSER_PLUGIN_DISCOVERY_ENV, "bogus"),
		]));

		assert_eq!(config.disabled_plugins, vec!["OslParser", "SdrFsDiscovery"]);
		assert!(config.skip_discovery_plugin_discovery);
		assert!(!config.skip_parser_plugin_discovery);
		assert!(config.is_disabled("OslParser"));
		assert!(!config.is_disabled("oslparser"));
	}

	#[test]
	fn toml_document_round_trips_fields() {
		let config = RegistryConfig::from_toml_str(
			r#"
disabled_plugins = ["ArgsParser"]
skip_parser_plugin_discovery = true
"#,
		)
		.expect("valid config");

		assert_eq!(config.disabled_plugins, vec!["ArgsParser"]);
		assert!(config.skip_parser_plugin_discovery);
		assert!(!config.skip_discovery_plugin_discovery);
	}

	#[test]
	fn toml_rejects_unknown_fields() {
		let err = RegistryConfig::from_toml_str("disable_plugins = []").expect_err("unknown field");
		assert!(matches!(err, ConfigError::Toml(_)));
	}

	#[test]
	fn load_reports_missing_file_path() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("missing.toml");
		let err = RegistryConfig::load(&path).expect_err("missing file");
		assert!(matches!(err, ConfigError::Io { path: ref p, .. } if p == &path));
	}

	#[test]
	fn load_reads_file() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("registry.toml");
		std::fs::write(&path, "skip_discovery_plugin_discovery = true\n").expect("write config");
		assert!(RegistryConfig::load(&path).expect("load").skip_discovery_plugin_discovery);
	}
}
