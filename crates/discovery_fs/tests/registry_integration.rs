//! Filesystem discovery feeding a live registry.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use nodedef_discovery_fs::{FsDiscoveryOptions, FsDiscoveryPlugin};
use nodedef_registry::{
	DiscoveryPlugin, DiscoveryResult, LocalResolver, Node, NodeBuilder, NodeRegistry, ParserPlugin, PluginDirectory, Property,
	RegistryConfig, Version, VersionFilter,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Reads `input <name> <type>` / `output <name> <type>` lines from the definition file.
struct LineParser;

impl ParserPlugin for LineParser {
	fn parse(&self, dr: &DiscoveryResult) -> Node {
		let Ok(text) = fs::read_to_string(&dr.resolved_uri) else {
			return Node::invalid(dr);
		};
		let properties = text.lines().filter_map(|line| match line.split_whitespace().collect::<Vec<_>>().as_slice() {
			["input", name, type_name] => Some(Property::input(*name, *type_name)),
			["output", name, type_name] => Some(Property::output(*name, *type_name)),
			_ => None,
		});
		NodeBuilder::from_discovery(dr).properties(properties).build()
	}

	fn discovery_types(&self) -> Vec<String> {
		vec!["osl".to_owned()]
	}

	fn source_type(&self) -> String {
		"OSL".to_owned()
	}
}

fn write(path: &Path, contents: &str) {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).expect("create parent");
	}
	fs::write(path, contents).expect("write definition");
}

fn registry(plugin: FsDiscoveryPlugin) -> NodeRegistry {
	let _ = tracing_subscriber::fmt::try_init();
	let directory = PluginDirectory::new().with_parser("LineParser", || Box::new(LineParser) as Box<dyn ParserPlugin>);
	let mut registry = NodeRegistry::new(RegistryConfig::default(), &directory, Arc::new(LocalResolver));
	registry
		.add_discovery_plugins(vec![Box::new(plugin) as Box<dyn DiscoveryPlugin>])
		.expect("nothing parsed yet");
	registry
}

fn plugin(roots: &[&Path]) -> FsDiscoveryPlugin {
	FsDiscoveryPlugin::new(FsDiscoveryOptions::new(roots.iter().copied(), ["osl", "glslfx"]), Arc::new(LocalResolver))
}

#[test]
fn discovered_files_parse_on_lookup() {
	let dir = tempfile::tempdir().expect("tempdir");
	write(&dir.path().join("mix_float_2_1.osl"), "input a float\ninput b float\noutput out float\n");

	let registry = registry(plugin(&[dir.path()]));
	assert_eq!(registry.discovery_result_count(), 1);
	assert_eq!(registry.source_types(), vec!["OSL"]);
	assert_eq!(registry.cached_node_count(), 0);

	let node = registry.get_by_identifier("mix_float_2_1", &["OSL"]).expect("parsed node");
	assert_eq!(node.name(), "mix_float");
	assert_eq!(node.family(), "mix");
	assert_eq!(node.version(), Version::new(2, 1));
	assert_eq!(node.input_names().collect::<Vec<_>>(), vec!["a", "b"]);
	assert!(node.output("out").is_some());

	let by_name = registry
		.get_by_name("mix_float", &[], VersionFilter::DefaultOnly)
		.expect("default version");
	assert!(Arc::ptr_eq(&node, &by_name));
}

#[test]
fn earlier_roots_win_identifier_clashes() {
	let first = tempfile::tempdir().expect("tempdir");
	let second = tempfile::tempdir().expect("tempdir");
	write(&first.path().join("surface.osl"), "input first float\n");
	write(&second.path().join("nested/surface.osl"), "input second float\n");

	let registry = registry(plugin(&[first.path(), second.path()]));
	assert_eq!(registry.discovery_result_count(), 1);

	let node = registry.get_by_identifier("surface", &[]).expect("parsed node");
	assert!(node.input("first").is_some());
	assert!(node.input("second").is_none());
}

#[test]
fn same_identifier_with_different_extensions_both_survive() {
	let dir = tempfile::tempdir().expect("tempdir");
	write(&dir.path().join("surface.osl"), "");
	write(&dir.path().join("surface.glslfx"), "");

	let registry = registry(plugin(&[dir.path()]));
	assert_eq!(registry.discovery_result_count(), 2);
	assert_eq!(registry.identifiers(None, VersionFilter::AllVersions), vec!["surface"]);

	// Only the osl file has a parser.
	assert_eq!(registry.get_all_by_identifier("surface").len(), 1);
}

#[rstest]
#[case::version_before_name("foo_2_bar.osl")]
#[case::version_out_of_range("foo_99999999999.osl")]
fn grammar_failures_are_skipped(#[case] file_name: &str) {
	let dir = tempfile::tempdir().expect("tempdir");
	write(&dir.path().join(file_name), "");
	write(&dir.path().join("valid.osl"), "");

	let registry = registry(plugin(&[dir.path()]));
	assert_eq!(registry.identifiers(None, VersionFilter::AllVersions), vec!["valid"]);
}

#[test]
fn missing_roots_are_skipped() {
	let dir = tempfile::tempdir().expect("tempdir");
	write(&dir.path().join("valid.osl"), "");
	let missing = dir.path().join("does-not-exist");

	let registry = registry(plugin(&[missing.as_path(), dir.path()]));
	assert_eq!(registry.discovery_result_count(), 1);
	assert_eq!(registry.search_uris().len(), 2);
}

#[test]
fn family_lookup_parses_every_version() {
	let dir = tempfile::tempdir().expect("tempdir");
	write(&dir.path().join("mix_float_1.osl"), "");
	write(&dir.path().join("mix_float_2.osl"), "");
	write(&dir.path().join("add_float.osl"), "");

	let registry = registry(plugin(&[dir.path()]));
	let mut identifiers: Vec<_> = registry
		.get_by_family(Some("mix"), VersionFilter::AllVersions)
		.iter()
		.map(|node| node.identifier().to_owned())
		.collect();
	identifiers.sort();

	assert_eq!(identifiers, vec!["mix_float_1", "mix_float_2"]);
	assert_eq!(registry.cached_node_count(), 2);
}

#[test]
fn filter_can_edit_and_drop_results() {
	let dir = tempfile::tempdir().expect("tempdir");
	write(&dir.path().join("keep.osl"), "");
	write(&dir.path().join("drop.osl"), "");

	let plugin = plugin(&[dir.path()]).with_filter(|mut dr| {
		if dr.identifier == "drop" {
			return None;
		}
		dr.aliases.push("kept".to_owned());
		Some(dr)
	});
	let registry = registry(plugin);

	assert_eq!(registry.identifiers(None, VersionFilter::AllVersions), vec!["keep"]);
	let node = registry.get_by_identifier("kept", &[]).expect("alias lookup");
	assert_eq!(node.identifier(), "keep");
}

#[test]
fn plugin_is_registered_for_auto_discovery() {
	let directory = PluginDirectory::from_inventory();
	assert!(directory.discovery_type_names().any(|name| name == "FsDiscoveryPlugin"));
}

#[cfg(unix)]
#[rstest]
#[case(false, 1)]
#[case(true, 2)]
fn symlinked_directories_follow_the_option(#[case] follow: bool, #[case] expected: usize) {
	let root = tempfile::tempdir().expect("tempdir");
	let outside = tempfile::tempdir().expect("tempdir");
	write(&root.path().join("local.osl"), "");
	write(&outside.path().join("linked.osl"), "");
	std::os::unix::fs::symlink(outside.path(), root.path().join("link")).expect("symlink");

	let options = FsDiscoveryOptions::new([root.path()], ["osl"]).follow_symlinks(follow);
	let registry = registry(FsDiscoveryPlugin::new(options, Arc::new(LocalResolver)));
	assert_eq!(registry.discovery_result_count(), expected);
}
