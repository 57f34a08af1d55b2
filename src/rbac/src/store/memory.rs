//! In-memory configuration store

use super::{next_version, ConfigurationStore, SecurityConfiguration};
use crate::error::{RbacError, Result};
use crate::types::{PrivilegeRecord, RoleRecord};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    roles: BTreeMap<String, RoleRecord>,
    privileges: BTreeMap<String, PrivilegeRecord>,
}

/// In-memory configuration store
///
/// Records are kept in id order, so listings are deterministic.
#[derive(Debug, Default)]
pub struct InMemoryConfigurationStore {
    state: RwLock<State>,
}

impl InMemoryConfigurationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from a snapshot
    ///
    /// Later records replace earlier ones with the same id.
    pub fn from_configuration(configuration: SecurityConfiguration) -> Self {
        let state = State {
            roles: configuration
                .roles
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
            privileges: configuration
                .privileges
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
        };

        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> SecurityConfiguration {
        let state = self.state.read();
        SecurityConfiguration {
            roles: state.roles.values().cloned().collect(),
            privileges: state.privileges.values().cloned().collect(),
        }
    }

    /// Replace the whole contents with a snapshot
    pub(crate) fn replace(&self, configuration: SecurityConfiguration) {
        let restored = Self::from_configuration(configuration);
        *self.state.write() = restored.state.into_inner();
    }
}

/// Reject an update whose version token does not match the stored one
fn check_version(id: &str, incoming: Option<&str>, stored: Option<&str>) -> Result<()> {
    match incoming {
        Some(expected) if Some(expected) != stored => Err(RbacError::ConcurrentModification {
            id: id.to_string(),
            expected: expected.to_string(),
            actual: stored.unwrap_or("none").to_string(),
        }),
        _ => Ok(()),
    }
}

/// Reject a record without a display name
fn require_name(kind: &str, id: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RbacError::InvalidInput(format!(
            "{} '{}' has an empty name",
            kind, id
        )));
    }
    Ok(())
}

fn assign_id(id: &mut String) {
    if id.is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

impl ConfigurationStore for InMemoryConfigurationStore {
    fn list_roles(&self) -> Result<Vec<RoleRecord>> {
        Ok(self.state.read().roles.values().cloned().collect())
    }

    fn read_role(&self, id: &str) -> Result<RoleRecord> {
        self.state
            .read()
            .roles
            .get(id)
            .cloned()
            .ok_or_else(|| RbacError::RoleNotFound(id.to_string()))
    }

    fn create_role(&self, role: &mut RoleRecord) -> Result<()> {
        require_name("role", &role.id, &role.name)?;
        let mut state = self.state.write();

        assign_id(&mut role.id);
        if state.roles.contains_key(&role.id) {
            return Err(RbacError::DuplicateRole(role.id.clone()));
        }

        role.version = Some(next_version(None));
        state.roles.insert(role.id.clone(), role.clone());

        debug!("Stored role '{}'", role.id);
        Ok(())
    }

    fn update_role(&self, role: &mut RoleRecord) -> Result<()> {
        require_name("role", &role.id, &role.name)?;
        let mut state = self.state.write();

        let stored = state
            .roles
            .get_mut(&role.id)
            .ok_or_else(|| RbacError::RoleNotFound(role.id.clone()))?;
        check_version(&role.id, role.version.as_deref(), stored.version.as_deref())?;

        role.version = Some(next_version(stored.version.as_deref()));
        *stored = role.clone();

        debug!("Updated role '{}' to version {:?}", role.id, role.version);
        Ok(())
    }

    fn delete_role(&self, id: &str) -> Result<()> {
        self.state
            .write()
            .roles
            .remove(id)
            .map(|_| debug!("Removed role '{}'", id))
            .ok_or_else(|| RbacError::RoleNotFound(id.to_string()))
    }

    fn list_privileges(&self) -> Result<Vec<PrivilegeRecord>> {
        Ok(self.state.read().privileges.values().cloned().collect())
    }

    fn read_privilege(&self, id: &str) -> Result<PrivilegeRecord> {
        self.state
            .read()
            .privileges
            .get(id)
            .cloned()
            .ok_or_else(|| RbacError::PrivilegeNotFound(id.to_string()))
    }

    fn create_privilege(&self, privilege: &mut PrivilegeRecord) -> Result<()> {
        require_name("privilege", &privilege.id, &privilege.name)?;
        let mut state = self.state.write();

        assign_id(&mut privilege.id);
        if state.privileges.contains_key(&privilege.id) {
            return Err(RbacError::DuplicatePrivilege(privilege.id.clone()));
        }

        privilege.version = Some(next_version(None));
        state
            .privileges
            .insert(privilege.id.clone(), privilege.clone());

        debug!("Stored privilege '{}'", privilege.id);
        Ok(())
    }

    fn update_privilege(&self, privilege: &mut PrivilegeRecord) -> Result<()> {
        require_name("privilege", &privilege.id, &privilege.name)?;
        let mut state = self.state.write();

        let stored = state
            .privileges
            .get_mut(&privilege.id)
            .ok_or_else(|| RbacError::PrivilegeNotFound(privilege.id.clone()))?;
        check_version(
            &privilege.id,
            privilege.version.as_deref(),
            stored.version.as_deref(),
        )?;

        privilege.version = Some(next_version(stored.version.as_deref()));
        *stored = privilege.clone();

        debug!(
            "Updated privilege '{}' to version {:?}",
            privilege.id, privilege.version
        );
        Ok(())
    }

    fn delete_privilege(&self, id: &str) -> Result<()> {
        self.state
            .write()
            .privileges
            .remove(id)
            .map(|_| debug!("Removed privilege '{}'", id))
            .ok_or_else(|| RbacError::PrivilegeNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: &str) -> RoleRecord {
        RoleRecord {
            id: id.to_string(),
            name: format!("Role {}", id),
            ..Default::default()
        }
    }

    fn privilege(id: &str) -> PrivilegeRecord {
        PrivilegeRecord {
            id: id.to_string(),
            name: format!("Privilege {}", id),
            privilege_type: "method".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_read_role() {
        let store = InMemoryConfigurationStore::new();
        let mut record = role("admin");

        store.create_role(&mut record).unwrap();
        assert_eq!(record.version.as_deref(), Some("1"));

        let stored = store.read_role("admin").unwrap();
        assert_eq!(stored, record);
    }

    #[test]
    fn test_create_assigns_missing_id() {
        let store = InMemoryConfigurationStore::new();
        let mut record = role("");

        store.create_role(&mut record).unwrap();
        assert!(!record.id.is_empty());
        assert!(store.read_role(&record.id).is_ok());

        let mut record = privilege("");
        store.create_privilege(&mut record).unwrap();
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn test_blank_names_rejected() {
        let store = InMemoryConfigurationStore::new();

        let mut nameless = RoleRecord {
            id: "admin".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            store.create_role(&mut nameless),
            Err(RbacError::InvalidInput(_))
        ));
        assert!(nameless.version.is_none());
        assert!(store.list_roles().unwrap().is_empty());

        let mut record = privilege("p1");
        store.create_privilege(&mut record).unwrap();
        record.name = "   ".to_string();
        assert!(matches!(
            store.update_privilege(&mut record),
            Err(RbacError::InvalidInput(_))
        ));
        assert_eq!(store.read_privilege("p1").unwrap().name, "Privilege p1");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let store = InMemoryConfigurationStore::new();
        store.create_role(&mut role("admin")).unwrap();
        store.create_privilege(&mut privilege("p1")).unwrap();

        assert!(matches!(
            store.create_role(&mut role("admin")),
            Err(RbacError::DuplicateRole(id)) if id == "admin"
        ));
        assert!(matches!(
            store.create_privilege(&mut privilege("p1")),
            Err(RbacError::DuplicatePrivilege(id)) if id == "p1"
        ));
    }

    #[test]
    fn test_missing_records() {
        let store = InMemoryConfigurationStore::new();

        assert!(matches!(store.read_role("x"), Err(RbacError::RoleNotFound(_))));
        assert!(matches!(store.update_role(&mut role("x")), Err(RbacError::RoleNotFound(_))));
        assert!(matches!(store.delete_role("x"), Err(RbacError::RoleNotFound(_))));

        assert!(matches!(store.read_privilege("x"), Err(RbacError::PrivilegeNotFound(_))));
        assert!(matches!(
            store.update_privilege(&mut privilege("x")),
            Err(RbacError::PrivilegeNotFound(_))
        ));
        assert!(matches!(store.delete_privilege("x"), Err(RbacError::PrivilegeNotFound(_))));
    }

    #[test]
    fn test_update_bumps_version() {
        let store = InMemoryConfigurationStore::new();
        let mut record = role("admin");
        store.create_role(&mut record).unwrap();

        record.name = "Administrators".to_string();
        store.update_role(&mut record).unwrap();
        assert_eq!(record.version.as_deref(), Some("2"));

        // No version token skips the check
        let mut blind = role("admin");
        store.update_role(&mut blind).unwrap();
        assert_eq!(blind.version.as_deref(), Some("3"));
    }

    #[test]
    fn test_stale_version_rejected() {
        let store = InMemoryConfigurationStore::new();
        let mut record = privilege("p1");
        store.create_privilege(&mut record).unwrap();

        let mut stale = record.clone();
        store.update_privilege(&mut record).unwrap();

        let err = store.update_privilege(&mut stale).unwrap_err();
        match err {
            RbacError::ConcurrentModification { id, expected, actual } => {
                assert_eq!(id, "p1");
                assert_eq!(expected, "1");
                assert_eq!(actual, "2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_listing_is_sorted_and_snapshot_round_trips() {
        let store = InMemoryConfigurationStore::new();
        for id in ["c", "a", "b"] {
            store.create_role(&mut role(id)).unwrap();
        }
        store.create_privilege(&mut privilege("p1")).unwrap();

        let ids: Vec<String> = store.list_roles().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let snapshot = store.snapshot();
        let restored = InMemoryConfigurationStore::from_configuration(snapshot.clone());
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn test_delete() {
        let store = InMemoryConfigurationStore::new();
        store.create_role(&mut role("admin")).unwrap();
        store.delete_role("admin").unwrap();
        assert!(store.list_roles().unwrap().is_empty());
    }
}
