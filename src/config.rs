//! Options of a code generation run.

use arcstr::ArcStr;
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options of a single plugin, passed to it untouched.
pub type PluginConfig = Map<String, Value>;

/// Options of a code generation run, usually read from a JSON file.
///
/// Every field is optional:
/// ```
/// # use graphql_codegen_core::GeneratorConfig;
/// let config = GeneratorConfig::from_json(r#"{
///     "flattenTypes": true,
///     "plugins": {"typescript": {"enumsAsTypes": true}}
/// }"#).unwrap();
///
/// assert!(config.generate_documents);
/// assert!(config.flatten_types);
/// assert_eq!(config.plugins.len(), 1);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Whether backends should emit schema types.
    pub generate_schema: bool,

    /// Whether documents should be processed at all.
    pub generate_documents: bool,

    /// Whether fragments should be inlined into flat field lists.
    pub flatten_types: bool,

    /// Plugins to run, in order, with their options.
    pub plugins: IndexMap<ArcStr, PluginConfig, FnvBuildHasher>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generate_schema: true,
            generate_documents: true,
            flatten_types: false,
            plugins: IndexMap::default(),
        }
    }
}

impl GeneratorConfig {
    /// Reads a [`GeneratorConfig`] from its JSON representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Options of the plugin called `name`, if it's configured.
    pub fn plugin_config(&self, name: &str) -> Option<&PluginConfig> {
        self.plugins.get(name)
    }

    /// Names of the configured plugins, in order.
    pub fn plugin_names(&self) -> Vec<ArcStr> {
        self.plugins.keys().cloned().collect()
    }
}
