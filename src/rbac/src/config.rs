//! Authorization configuration loading and validation

use crate::descriptor::DescriptorRegistry;
use crate::inheritance::MethodInheritance;
use crate::manager::DefaultAuthorizationManager;
use crate::notify::BroadcastNotifier;
use crate::store::{ConfigurationStore, FileConfigurationStore, InMemoryConfigurationStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Complete RBAC configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RbacConfig {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub notifier: NotifierSection,

    #[serde(default)]
    pub inheritance: InheritanceSection,

    #[serde(default)]
    pub descriptors: DescriptorSection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Snapshot location, required by the file backend
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierSection {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InheritanceSection {
    #[serde(default = "default_true")]
    pub use_default_rules: bool,
    /// Extra rules; a rule for a default method replaces the default one
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DescriptorSection {
    #[serde(default = "default_true")]
    pub builtin: bool,
}

impl Default for NotifierSection {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for InheritanceSection {
    fn default() -> Self {
        Self {
            use_default_rules: true,
            rules: BTreeMap::new(),
        }
    }
}

impl Default for DescriptorSection {
    fn default() -> Self {
        Self { builtin: true }
    }
}

fn default_true() -> bool { true }
fn default_channel_capacity() -> usize { BroadcastNotifier::DEFAULT_CAPACITY }

impl RbacConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .context("Failed to read RBAC configuration file")?;

        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse RBAC configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.store.backend == StoreBackend::File && self.store.path.is_none() {
            anyhow::bail!("File store backend requires store.path");
        }

        if self.notifier.channel_capacity == 0 {
            anyhow::bail!("Notifier channel capacity must be greater than 0");
        }

        for (method, implied) in &self.inheritance.rules {
            if method.trim().is_empty() || method.contains(',') {
                anyhow::bail!("Invalid inheritance rule method '{}'", method);
            }
            if implied.iter().any(|m| m.trim().is_empty() || m.contains(',')) {
                anyhow::bail!("Inheritance rule for '{}' has an invalid method", method);
            }
        }

        Ok(())
    }

    /// Build the configured store
    pub fn build_store(&self) -> Result<Arc<dyn ConfigurationStore>> {
        match (self.store.backend, &self.store.path) {
            (StoreBackend::Memory, _) => Ok(Arc::new(InMemoryConfigurationStore::new())),
            (StoreBackend::File, Some(path)) => {
                let store = FileConfigurationStore::open(path).with_context(|| {
                    format!("Failed to open security configuration {}", path.display())
                })?;
                Ok(Arc::new(store))
            }
            (StoreBackend::File, None) => anyhow::bail!("File store backend requires store.path"),
        }
    }

    /// Build the configured method inheritance rules
    pub fn build_inheritance(&self) -> MethodInheritance {
        let mut inheritance = if self.inheritance.use_default_rules {
            MethodInheritance::default()
        } else {
            MethodInheritance::empty()
        };

        for (method, implied) in &self.inheritance.rules {
            inheritance.set_rule(method.clone(), implied.iter().cloned());
        }
        inheritance
    }

    /// Build the configured descriptor registry
    pub fn build_descriptors(&self) -> DescriptorRegistry {
        if self.descriptors.builtin {
            DescriptorRegistry::with_defaults()
        } else {
            DescriptorRegistry::new()
        }
    }

    /// Validate and assemble a manager
    ///
    /// The notifier is returned alongside so the host can subscribe to
    /// change events.
    pub fn build(&self) -> Result<(DefaultAuthorizationManager, Arc<BroadcastNotifier>)> {
        self.validate()?;

        let notifier = Arc::new(BroadcastNotifier::new(self.notifier.channel_capacity));
        let manager = DefaultAuthorizationManager::new(
            self.build_store()?,
            Arc::new(self.build_inheritance()),
            notifier.clone(),
            Arc::new(self.build_descriptors()),
        );

        info!("RBAC manager built with {:?} store", self.store.backend);
        Ok((manager, notifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inheritance::InheritanceResolver;
    use crate::manager::AuthorizationManager;
    use crate::types::Role;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RbacConfig::from_toml_str("").unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.notifier.channel_capacity, 256);
        assert!(config.inheritance.use_default_rules);
        assert!(config.descriptors.builtin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = RbacConfig::from_toml_str(
            r#"
            [store]
            backend = "file"
            path = "/var/lib/rbac/security.json"

            [notifier]
            channel_capacity = 16

            [inheritance]
            use_default_rules = false
            [inheritance.rules]
            delete = ["create", "read"]

            [descriptors]
            builtin = false
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.notifier.channel_capacity, 16);
        assert!(config.validate().is_ok());

        let inheritance = config.build_inheritance();
        assert_eq!(
            inheritance.inherited_methods("delete"),
            vec!["delete", "create", "read"]
        );
        assert_eq!(inheritance.inherited_methods("update"), vec!["update"]);
        assert!(config.build_descriptors().is_empty());
    }

    #[test]
    fn test_validation_errors() {
        let config = RbacConfig::from_toml_str("[store]\nbackend = \"file\"").unwrap();
        assert!(config.validate().is_err());

        let config = RbacConfig::from_toml_str("[notifier]\nchannel_capacity = 0").unwrap();
        assert!(config.validate().is_err());

        let config = RbacConfig::from_toml_str("[inheritance.rules]\n\"a,b\" = [\"read\"]").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(RbacConfig::from_toml_str("[store]\nbackend = \"ldap\"").is_err());
    }

    #[test]
    fn test_build_file_backed_manager() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("rbac.toml");
        let store_path = dir.path().join("security.json");
        std::fs::write(
            &config_path,
            format!("[store]\nbackend = \"file\"\npath = {:?}\n", store_path.to_string_lossy()),
        )
        .unwrap();

        let config = RbacConfig::load(&config_path).unwrap();
        let (manager, notifier) = config.build().unwrap();
        let _events = notifier.subscribe();

        manager.add_role(&Role::new("admin", "Admin")).unwrap();
        assert!(store_path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(RbacConfig::load("/nonexistent/rbac.toml").is_err());
    }
}
