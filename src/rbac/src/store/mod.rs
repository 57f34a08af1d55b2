//! Configuration storage
//!
//! The store is the source of truth for role and privilege records. It owns
//! identity (id generation and uniqueness), version tokens and not-found
//! reporting; the authorization manager delegates all of that to it.

mod file;
mod memory;

pub use file::FileConfigurationStore;
pub use memory::InMemoryConfigurationStore;

use crate::error::Result;
use crate::types::{PrivilegeRecord, RoleRecord};
use serde::{Deserialize, Serialize};

/// Configuration store trait
///
/// `create_*` and `update_*` take the record mutably: the store may assign an
/// id and always writes the new version token back into it.
pub trait ConfigurationStore: Send + Sync {
    /// List all role records
    fn list_roles(&self) -> Result<Vec<RoleRecord>>;

    /// Read a role, failing with `RoleNotFound` if absent
    fn read_role(&self, id: &str) -> Result<RoleRecord>;

    /// Create a role
    fn create_role(&self, role: &mut RoleRecord) -> Result<()>;

    /// Replace an existing role, failing with `RoleNotFound` if absent
    fn update_role(&self, role: &mut RoleRecord) -> Result<()>;

    /// Delete a role, failing with `RoleNotFound` if absent
    fn delete_role(&self, id: &str) -> Result<()>;

    /// List all privilege records
    fn list_privileges(&self) -> Result<Vec<PrivilegeRecord>>;

    /// Read a privilege, failing with `PrivilegeNotFound` if absent
    fn read_privilege(&self, id: &str) -> Result<PrivilegeRecord>;

    /// Create a privilege
    fn create_privilege(&self, privilege: &mut PrivilegeRecord) -> Result<()>;

    /// Replace an existing privilege, failing with `PrivilegeNotFound` if absent
    fn update_privilege(&self, privilege: &mut PrivilegeRecord) -> Result<()>;

    /// Delete a privilege, failing with `PrivilegeNotFound` if absent
    fn delete_privilege(&self, id: &str) -> Result<()>;
}

/// Serializable snapshot of the whole security configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfiguration {
    #[serde(default)]
    pub roles: Vec<RoleRecord>,

    #[serde(default)]
    pub privileges: Vec<PrivilegeRecord>,
}

/// Version token following `current`
///
/// Tokens are decimal counters; anything unparseable restarts at 1.
pub(crate) fn next_version(current: Option<&str>) -> String {
    current
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(1, |v| v + 1)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version() {
        assert_eq!(next_version(None), "1");
        assert_eq!(next_version(Some("1")), "2");
        assert_eq!(next_version(Some("41")), "42");
        assert_eq!(next_version(Some("etag-abc")), "1");
    }
}
