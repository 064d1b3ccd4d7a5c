//! Configuration handling for tugoutline

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::ConvertOptions;
use crate::error::OutlineError;
use crate::provider::{builtin_provider, ProviderRegistry, BUILTIN_PROVIDERS};

/// Project directory holding `config.toml`.
pub const CONFIG_DIR: &str = ".tugoutline";

/// Tugoutline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutlineConfig {
    /// Outline construction settings
    #[serde(default)]
    pub outline: OutlineSettings,

    /// Metadata provider settings
    #[serde(default)]
    pub providers: ProviderSettings,
}

/// Outline construction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSettings {
    /// Merge every context; when false only the first context is converted
    #[serde(default = "default_merge_contexts")]
    pub merge_contexts: bool,

    /// Emit property and event accessors as children
    #[serde(default)]
    pub expose_accessors: bool,
}

/// Metadata provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Built-in providers to register, in registration order
    #[serde(default = "default_enabled_providers")]
    pub enabled: Vec<String>,
}

fn default_merge_contexts() -> bool {
    true
}

fn default_enabled_providers() -> Vec<String> {
    BUILTIN_PROVIDERS.iter().map(|s| s.to_string()).collect()
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            merge_contexts: default_merge_contexts(),
            expose_accessors: false,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled_providers(),
        }
    }
}

impl OutlineConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, OutlineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            OutlineError::config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: OutlineConfig = toml::from_str(&content)
            .map_err(|e| OutlineError::config(format!("failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from .tugoutline/config.toml in the given project root
    pub fn load_from_project(project_root: &Path) -> Result<Self, OutlineError> {
        let config_path = project_root.join(CONFIG_DIR).join("config.toml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(OutlineConfig::default())
        }
    }

    /// Reject provider names that are not built in or are listed twice.
    pub fn validate(&self) -> Result<(), OutlineError> {
        for (index, name) in self.providers.enabled.iter().enumerate() {
            if !BUILTIN_PROVIDERS.contains(&name.as_str()) {
                return Err(OutlineError::config(format!(
                    "unknown provider '{}' (expected one of: {})",
                    name,
                    BUILTIN_PROVIDERS.join(", ")
                )));
            }
            if self.providers.enabled[..index].contains(name) {
                return Err(OutlineError::config(format!(
                    "provider '{}' is enabled more than once",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Registry with the enabled providers, in configured order.
    pub fn registry(&self) -> Result<ProviderRegistry, OutlineError> {
        self.validate()?;
        let mut registry = ProviderRegistry::new();
        for name in &self.providers.enabled {
            let provider = builtin_provider(name)
                .ok_or_else(|| OutlineError::config(format!("unknown provider '{}'", name)))?;
            registry.register(provider);
        }
        Ok(registry)
    }

    /// Conversion switches derived from the `[outline]` table.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            expose_accessors: self.outline.expose_accessors,
        }
    }
}

/// Find the project root by searching upward for a `.tugoutline/` directory.
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return None,
        }
    }
}
