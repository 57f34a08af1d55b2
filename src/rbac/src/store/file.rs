//! JSON file-backed configuration store

use super::memory::InMemoryConfigurationStore;
use super::{ConfigurationStore, SecurityConfiguration};
use crate::error::{RbacError, Result};
use crate::types::{PrivilegeRecord, RoleRecord};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Configuration store persisted as a single JSON document
///
/// Reads are served from memory. A mutation is applied to a staged copy,
/// written to a synced temporary file in the same directory and renamed over
/// the document; only then does it become visible to readers. If writing
/// fails, neither the file nor the in-memory state changes.
#[derive(Debug)]
pub struct FileConfigurationStore {
    path: PathBuf,
    inner: InMemoryConfigurationStore,
    write_lock: Mutex<()>,
}

impl FileConfigurationStore {
    /// Open the store at `path`, loading it if the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.is_dir() {
            return Err(RbacError::Storage(format!(
                "{} is a directory, not a configuration file",
                path.display()
            )));
        }

        let configuration = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str::<SecurityConfiguration>(&contents)?
        } else {
            SecurityConfiguration::default()
        };

        info!(
            "Opened security configuration {} with {} roles, {} privileges",
            path.display(),
            configuration.roles.len(),
            configuration.privileges.len()
        );

        Ok(Self {
            path,
            inner: InMemoryConfigurationStore::from_configuration(configuration),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> SecurityConfiguration {
        self.inner.snapshot()
    }

    fn mutate<F>(&self, operation: F) -> Result<()>
    where
        F: FnOnce(&InMemoryConfigurationStore) -> Result<()>,
    {
        let _guard = self.write_lock.lock();
        let staged = InMemoryConfigurationStore::from_configuration(self.inner.snapshot());

        operation(&staged)?;

        let configuration = staged.snapshot();
        if let Err(e) = self.persist(&configuration) {
            warn!("Failed to persist {}: {}", self.path.display(), e);
            return Err(e);
        }

        self.inner.replace(configuration);
        Ok(())
    }

    fn persist(&self, configuration: &SecurityConfiguration) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent)?;
                parent
            }
            _ => Path::new("."),
        };

        // Dropped (and removed) on every early return
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, configuration)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        info!("Persisted security configuration to {}", self.path.display());
        Ok(())
    }
}

impl ConfigurationStore for FileConfigurationStore {
    fn list_roles(&self) -> Result<Vec<RoleRecord>> {
        self.inner.list_roles()
    }

    fn read_role(&self, id: &str) -> Result<RoleRecord> {
        self.inner.read_role(id)
    }

    fn create_role(&self, role: &mut RoleRecord) -> Result<()> {
        self.mutate(|staged| staged.create_role(role))
    }

    fn update_role(&self, role: &mut RoleRecord) -> Result<()> {
        self.mutate(|staged| staged.update_role(role))
    }

    fn delete_role(&self, id: &str) -> Result<()> {
        self.mutate(|staged| staged.delete_role(id))
    }

    fn list_privileges(&self) -> Result<Vec<PrivilegeRecord>> {
        self.inner.list_privileges()
    }

    fn read_privilege(&self, id: &str) -> Result<PrivilegeRecord> {
        self.inner.read_privilege(id)
    }

    fn create_privilege(&self, privilege: &mut PrivilegeRecord) -> Result<()> {
        self.mutate(|staged| staged.create_privilege(privilege))
    }

    fn update_privilege(&self, privilege: &mut PrivilegeRecord) -> Result<()> {
        self.mutate(|staged| staged.update_privilege(privilege))
    }

    fn delete_privilege(&self, id: &str) -> Result<()> {
        self.mutate(|staged| staged.delete_privilege(id))
    }
}
