//! Build configuration files.
//!
//! A build configuration pins the recipe revision, the install prefix and the
//! variant selection so a build can be reproduced later:
//!
//! ```json
//! {
//!   "schema": "v4",
//!   "prefix": "/opt/hcl",
//!   "variants": { "thallium": true, "rpclib": false, "verbs": true }
//! }
//! ```
//!
//! Variant names are kept as strings so a file written for another revision
//! still loads; undeclared names are skipped when the selection is applied.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::logic::resolver::{resolve, Resolution};
use crate::types::SchemaVersion;
use crate::variant_set::VariantSet;

/// Default install prefix when none is configured.
pub const DEFAULT_PREFIX: &str = "/usr/local";

/// Build configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub schema: SchemaVersion,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub variants: BTreeMap<String, bool>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            schema: SchemaVersion::LATEST,
            prefix: default_prefix(),
            variants: BTreeMap::new(),
        }
    }
}

impl BuildConfig {
    /// Create a new configuration with the latest schema and no selections
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize build configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write build configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read build configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse build configuration JSON")?;

        tracing::debug!(schema = %config.schema, variants = config.variants.len(), "loaded build configuration");
        Ok(config)
    }

    /// The variant selection applied over the schema defaults
    pub fn to_variant_set(&self) -> VariantSet {
        VariantSet::from_selections(
            self.schema,
            self.variants.iter().map(|(name, on)| (name.as_str(), *on)),
        )
    }

    /// Record a selection, replacing any earlier value for the same name
    pub fn select(&mut self, name: impl Into<String>, enabled: bool) {
        self.variants.insert(name.into(), enabled);
    }

    /// Resolve this configuration
    pub fn resolve(&self) -> Result<Resolution> {
        let resolution = resolve(&self.to_variant_set(), &self.prefix)?;
        Ok(resolution)
    }

    /// Validate the configuration
    ///
    /// Checks the prefix, then performs a trial resolution so conflicting
    /// selections are reported with the rule's diagnostic.
    pub fn validate(&self) -> Result<()> {
        let prefix = self.prefix.trim();
        if prefix.is_empty() {
            anyhow::bail!("Install prefix must be specified");
        }
        if !Path::new(prefix).is_absolute() {
            anyhow::bail!("Install prefix must be an absolute path, got {:?}", prefix);
        }
        if prefix.contains(char::is_whitespace) {
            anyhow::bail!("Install prefix cannot contain whitespace");
        }

        let schema = crate::schema::schema(self.schema);
        for name in self.variants.keys() {
            if schema.variant_by_name(name).is_none() {
                tracing::warn!(variant = %name, schema = %self.schema, "variant not declared by this schema");
            }
        }

        resolve(&self.to_variant_set(), &self.prefix)
            .with_context(|| format!("Variant selection is not valid for schema {}", self.schema))?;
        Ok(())
    }
}
